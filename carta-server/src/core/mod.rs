//! Core server infrastructure

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::{ResourceVersions, ServerState};
