use std::net::{IpAddr, SocketAddr};

use clap::Args;
use tasktracker_core::calendar::TimeZoneSetting;
use tasktracker_db::{DbBackend, DbConfig};

/// Server settings, each overridable from the environment.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "TASKTRACKER_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    #[arg(long, env = "TASKTRACKER_PORT", default_value_t = 3720)]
    pub port: u16,

    /// Storage backend: sqlite, postgres or memory
    #[arg(long, env = "TASKTRACKER_DB_BACKEND", default_value = "sqlite", value_parser = parse_backend)]
    pub db_backend: DbBackend,

    /// SQLite file; defaults to $XDG_DATA_HOME/tasktracker/tasktracker.db
    #[arg(long, env = "TASKTRACKER_SQLITE_PATH")]
    pub sqlite_path: Option<String>,

    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Zone "today" is evaluated in: "local" or a UTC offset like +05:30
    #[arg(long, env = "TASKTRACKER_TIMEZONE", default_value = "local")]
    pub timezone: TimeZoneSetting,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.db_backend,
            sqlite_path: self.sqlite_path.clone(),
            database_url: self.database_url.clone(),
        }
    }
}

fn parse_backend(s: &str) -> Result<DbBackend, String> {
    DbBackend::parse_str(s)
        .ok_or_else(|| format!("unknown backend {s:?} (expected sqlite, postgres or memory)"))
}
