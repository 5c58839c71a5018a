pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use tasktracker_core::task::{CreateTask, Task, TaskFilter, UpdateTask};

pub use memory::MemoryDatabase;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Internal(String),
}

/// Storage collaborator for task records.
///
/// Services receive an `Arc<dyn Database>` so the backing store can be
/// SQLite, Postgres or the in-memory fake without the callers noticing.
/// Every listing is ordered by `due_date` ascending, then `id`.
#[async_trait]
pub trait Database: Send + Sync {
    /// Insert a task; the backend assigns a fresh id that is never reused.
    async fn create_task(&self, input: &CreateTask) -> Result<Task, DbError>;
    async fn get_task(&self, id: i64) -> Result<Task, DbError>;
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, DbError>;
    /// Rewrite the mutable columns of one task in a single statement.
    /// Returns `NotFound` without touching anything when `id` is unknown.
    async fn update_task(&self, id: i64, update: &UpdateTask) -> Result<Task, DbError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DbBackend {
    #[default]
    Sqlite,
    Postgres,
    Memory,
}

impl DbBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbBackend::Sqlite => "sqlite",
            DbBackend::Postgres => "postgres",
            DbBackend::Memory => "memory",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "sqlite" => Some(DbBackend::Sqlite),
            "postgres" | "postgresql" => Some(DbBackend::Postgres),
            "memory" => Some(DbBackend::Memory),
            _ => None,
        }
    }
}

impl fmt::Display for DbBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    pub backend: DbBackend,
    /// Defaults to `<data_dir>/tasktracker.db`.
    pub sqlite_path: Option<String>,
    pub database_url: Option<String>,
}

/// Open the backend selected by `config`, running migrations where needed.
pub async fn open_database(config: &DbConfig) -> Result<Arc<dyn Database>, DbError> {
    tracing::debug!(backend = %config.backend, "opening database");
    match config.backend {
        DbBackend::Memory => Ok(Arc::new(MemoryDatabase::new())),
        DbBackend::Sqlite => open_sqlite(config),
        DbBackend::Postgres => open_postgres(config).await,
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(config: &DbConfig) -> Result<Arc<dyn Database>, DbError> {
    Ok(Arc::new(SqliteDatabase::open(config)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_config: &DbConfig) -> Result<Arc<dyn Database>, DbError> {
    Err(DbError::Internal(
        "sqlite backend not compiled in (enable the `sqlite` feature)".into(),
    ))
}

#[cfg(feature = "postgres")]
async fn open_postgres(config: &DbConfig) -> Result<Arc<dyn Database>, DbError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| DbError::Internal("postgres backend requires DATABASE_URL".into()))?;
    Ok(Arc::new(postgres::PostgresDatabase::connect(url).await?))
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_config: &DbConfig) -> Result<Arc<dyn Database>, DbError> {
    Err(DbError::Internal(
        "postgres backend not compiled in (enable the `postgres` feature)".into(),
    ))
}

/// `$XDG_DATA_HOME/tasktracker`, falling back to `~/.local/share/tasktracker`.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("tasktracker")
}
