use std::{path::PathBuf, sync::Arc};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, author)]
pub struct Args {
    /// Sets the address for the web server, ":PORT" listens on all interfaces.
    #[arg(
        long,
        alias = "addr",
        value_name = "HOST:PORT",
        default_value = ":8080",
        env = "HOST_PANEL_ADDRESS",
        value_parser = parse_address
    )]
    address: String,

    /// Directory holding login.html, panel.html and the static/ assets.
    #[arg(long, value_name = "PATH", default_value = "./www")]
    web_root: PathBuf,

    /// Directory for the rolling log files.
    #[arg(long, value_name = "PATH", default_value = "./logs")]
    log_path: PathBuf,

    /// Turn all log categories up to Debug, for more information check RUST_LOG env variable.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
struct Manager {
    args: Args,
}

lazy_static! {
    static ref MANAGER: Arc<Manager> = Arc::new(Manager {
        args: Args::parse()
    });
}

// Construct our manager, should be done inside main
pub fn init() {
    MANAGER.as_ref();
}

// Check if the verbosity parameter was used
pub fn is_verbose() -> bool {
    MANAGER.args.verbose
}

// Return the desired address for the web server
pub fn server_address() -> String {
    MANAGER.args.address.clone()
}

pub fn web_root() -> PathBuf {
    MANAGER.args.web_root.clone()
}

pub fn log_path() -> PathBuf {
    MANAGER.args.log_path.clone()
}

// Return the command line used to start this application
pub fn command_line_string() -> String {
    std::env::args().collect::<Vec<String>>().join(" ")
}

// Return the parsed arguments
pub fn command_line() -> String {
    format!("{:?}", MANAGER.args)
}

/// Accept `host:port`, or a bare `:port` meaning every interface.
fn parse_address(address: &str) -> Result<String, String> {
    let address = address.trim();
    let normalized = match address.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => address.to_string(),
    };

    let Some((host, port)) = normalized.rsplit_once(':') else {
        return Err(format!("Missing port in {address:?}"));
    };
    if host.is_empty() {
        return Err(format!("Missing host in {address:?}"));
    }
    port.parse::<u16>()
        .map_err(|error| format!("Invalid port in {address:?}: {error}"))?;

    Ok(normalized)
}
