use color_eyre::eyre::{ensure, Report};
use std::env;
use tracing::{info, warn};

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    /// Reads the process environment. Load `.env` before calling this.
    pub fn from_env() -> Result<Self, Report> {
        let database_url = load("DATABASE_URL", "sqlite://polls.db");
        ensure!(
            database_url.starts_with("sqlite:"),
            "DATABASE_URL must be a sqlite url, got {}",
            database_url
        );

        let admin_username = load("ADMIN_USERNAME", "admin");
        ensure!(!admin_username.trim().is_empty(), "ADMIN_USERNAME must not be blank");

        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            warn!("ADMIN_PASSWORD not set, seeding admin with the default password");
            DEFAULT_ADMIN_PASSWORD.to_owned()
        });
        ensure!(!admin_password.is_empty(), "ADMIN_PASSWORD must not be empty");

        Ok(Self {
            database_url,
            bind_address: load("BIND_ADDRESS", "127.0.0.1:8080"),
            admin_username: admin_username.trim().to_owned(),
            admin_password,
        })
    }
}

fn load(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    })
}
