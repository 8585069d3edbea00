pub mod error;
pub mod models;
pub mod repository;

use std::time::Duration;

pub use color_eyre::{
    eyre::{bail, eyre as err, Context, Report},
    install,
};
pub use error::Error;

/// Value of `database` selecting the in-process store instead of PostgreSQL
pub const MEMORY_DATABASE: &str = "memory";

#[twelf::config]
pub struct Conf {
    /// PostgreSQL connection URI, or `memory` for the in-process store
    pub database: String,

    /// Address the HTTP server binds to
    pub address: Option<String>,

    /// Per-operation database timeout, in seconds
    pub timeout: Option<u64>,

    /// Connection attempts made before giving up on the database
    pub connect_retries: Option<u32>,
}

impl Conf {
    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or("0.0.0.0:8080")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(10))
    }

    pub fn connect_retries(&self) -> u32 {
        self.connect_retries.unwrap_or(5).max(1)
    }
}
