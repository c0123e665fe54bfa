pub mod configuration;
pub mod list;
pub mod server;
