//! Runtime parameters, read from the command line or the environment (a `.env`
//! file in the working directory is loaded first).

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::server::{RouterOptions, errors::ErrorMode};

#[derive(Debug, Clone, Parser)]
#[command(name = "freelanced", version, about = "JSON API for the freelance marketplace database")]
pub struct Params {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 3005)]
    pub port: u16,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Directory with static files (and the dashboard page)
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// How store failures are reported: `compat` answers 500 for every failure,
    /// `typed` uses 404/400/503 depending on the failure
    #[arg(long, env = "ERROR_MODE", value_enum, default_value_t = ErrorMode::Compat)]
    pub error_mode: ErrorMode,
}

impl Params {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            error_mode: self.error_mode,
            static_dir: self.static_dir.clone(),
        }
    }
}
