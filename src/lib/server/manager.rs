use std::path::PathBuf;

use actix_web::{web, App, HttpServer};
use tracing::*;
use tracing_actix_web::TracingLogger;

use crate::auth::AuthGate;

use super::pages;

/// Where the pages and static assets are read from.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub web_root: PathBuf,
}

impl ServerConfig {
    pub fn new(web_root: impl Into<PathBuf>) -> Self {
        Self {
            web_root: web_root.into(),
        }
    }

    pub fn page(&self, name: &str) -> PathBuf {
        self.web_root.join(name)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.web_root.join("static")
    }
}

// Start the web server with the desired address
pub async fn run(
    server_address: &str,
    config: ServerConfig,
    gate: AuthGate,
) -> Result<(), std::io::Error> {
    let config = web::Data::new(config);
    let gate = web::Data::new(gate);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(config.clone())
            .app_data(gate.clone())
            .configure(|cfg| configure_routes(cfg, &config))
    })
    .bind(server_address)?;

    info!("Starting web server at {server_address}");
    server.run().await
}

/// Register every route on a `ServiceConfig`.
///
/// Expects `web::Data<ServerConfig>` and `web::Data<AuthGate>` to be
/// registered on the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig, config: &ServerConfig) {
    cfg.route("/", web::get().to(pages::index))
        .route("/panel", web::get().to(pages::panel))
        // Method guards stay on the route so other methods get 405
        .service(web::resource("/login").route(web::post().to(pages::login)))
        .service(web::resource("/logout").route(web::post().to(pages::logout)))
        // Streaming endpoints don't look at the session, see `pages::memory_stream`
        .route("/websocket", web::get().to(pages::memory_stream))
        .route("/websocket1", web::get().to(pages::cpu_stream))
        .service(actix_files::Files::new("/static", config.static_dir()));
}
