pub mod error;
pub mod manager;
pub mod pages;

pub use manager::{configure_routes, run, ServerConfig};
