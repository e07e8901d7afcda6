pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod log;
pub mod messages;
pub mod server;
pub mod services;
pub mod span;
