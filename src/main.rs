use anyhow::{Context, Result};
use tracing::*;

use host_panel::{auth::AuthGate, cli, logger, server, session::SessionCodec};

#[actix_web::main]
async fn main() -> Result<()> {
    cli::manager::init();
    logger::manager::init()?;

    // Keys live as long as the process, a restart logs everybody out
    let codec = SessionCodec::generate().context("Failed to create session keys")?;
    let gate = AuthGate::with_fixed_credentials(codec);

    let config = server::ServerConfig::new(cli::manager::web_root());
    let address = cli::manager::server_address();

    if let Err(error) = server::run(&address, config, gate).await {
        error!("Web server at {address} failed: {error}");
        return Err(error).with_context(|| format!("Failed running web server at {address}"));
    }

    Ok(())
}
