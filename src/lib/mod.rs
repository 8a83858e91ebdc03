#[macro_use]
extern crate lazy_static;
extern crate tracing;

pub mod auth;
pub mod cli;
pub mod logger;
pub mod metrics;
pub mod server;
pub mod session;
pub mod stream;
