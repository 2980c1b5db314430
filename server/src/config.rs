//! Command-line and environment configuration for the server binary.

use std::sync::Arc;

use clap::{Parser, ValueEnum};

use crate::model::CreateRule;
use crate::store::{MemoryStore, SqliteStore, StoreResult, TodoStore};

/// `--database` value selecting the in-process store instead of SQLite.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "HTTP API for the todo list")]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite database file, or `:memory:` for a non-persistent store.
    #[arg(long, env = "DATABASE_PATH", default_value = "todos.db")]
    pub database: String,

    /// In development mode, 500 responses include the underlying error.
    #[arg(long = "env", env = "APP_ENV", value_enum, default_value_t = RunMode::Development)]
    pub mode: RunMode,

    /// Validation applied to the text of new todos.
    #[arg(long, env = "CREATE_RULE", value_enum, default_value_t = CreateRule::Legacy)]
    pub create_rule: CreateRule,

    /// Log specification, e.g. `info` or `todo_server=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings {
            mode: self.mode,
            create_rule: self.create_rule,
        }
    }

    pub fn open_store(&self) -> StoreResult<Arc<dyn TodoStore>> {
        if self.database == IN_MEMORY_DATABASE {
            return Ok(Arc::new(MemoryStore::new()));
        }
        Ok(Arc::new(SqliteStore::open(&self.database)?))
    }
}

/// Behavior switches the request handlers consult.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub mode: RunMode,
    pub create_rule: CreateRule,
}
