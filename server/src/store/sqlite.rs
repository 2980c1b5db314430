//! SQLite-backed store.
//!
//! # Invariants
//! - Migrations are applied before the store hands out any data.
//! - Schema version is tracked in `PRAGMA user_version`.
//! - Timestamps are stored as Unix milliseconds.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{StoreError, StoreResult, TodoStore};
use crate::model::{now, Todo, TodoId, TodoText};

const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("migrations/0001_init.sql"))];

const SELECT_SQL: &str = "SELECT id, text, completed, created_at, updated_at FROM todos";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        info!(
            "event=db_open module=store status=start mode=file path={}",
            path.display()
        );
        let result = Connection::open(path)
            .map_err(StoreError::from)
            .and_then(Self::bootstrap);
        log_open("file", started_at, &result);
        result
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let started_at = Instant::now();
        info!("event=db_open module=store status=start mode=memory");
        let result = Connection::open_in_memory()
            .map_err(StoreError::from)
            .and_then(Self::bootstrap);
        log_open("memory", started_at, &result);
        result
    }

    fn bootstrap(mut conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn log_open(mode: &str, started_at: Instant, result: &StoreResult<SqliteStore>) {
    match result {
        Ok(_) => info!(
            "event=db_open module=store status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=store status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
}

fn apply_migrations(conn: &mut Connection) -> StoreResult<()> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = MIGRATIONS.last().map_or(0, |(version, _)| *version);

    if current > latest {
        return Err(StoreError::UnsupportedSchema {
            found: current,
            supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        tx.execute_batch(sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {version};"))?;
    }
    tx.commit()?;
    Ok(())
}

fn select_one(conn: &Connection, id: TodoId) -> StoreResult<Option<Todo>> {
    let raw = conn
        .query_row(
            &format!("{SELECT_SQL} WHERE id = ?1"),
            params![id.to_string()],
            RawTodo::from_row,
        )
        .optional()?;
    raw.map(RawTodo::into_todo).transpose()
}

struct RawTodo {
    id: String,
    text: String,
    completed: bool,
    created_at: i64,
    updated_at: i64,
}

impl RawTodo {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            completed: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_todo(self) -> StoreResult<Todo> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|err| StoreError::InvalidData(format!("id `{}`: {err}", self.id)))?;
        Ok(Todo {
            id,
            text: self.text,
            completed: self.completed,
            created_at: millis_to_datetime(self.created_at)?,
            updated_at: millis_to_datetime(self.updated_at)?,
        })
    }
}

fn millis_to_datetime(millis: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StoreError::InvalidData(format!("timestamp out of range: {millis}")))
}

impl TodoStore for SqliteStore {
    fn list(&self) -> StoreResult<Vec<Todo>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_SQL} ORDER BY created_at DESC, seq DESC"))?;
        let rows = stmt.query_map([], RawTodo::from_row)?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?.into_todo()?);
        }
        Ok(todos)
    }

    fn create(&self, text: TodoText) -> StoreResult<Todo> {
        let todo = Todo::new(text);
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO todos (id, text, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                todo.id.to_string(),
                todo.text,
                todo.completed,
                todo.created_at.timestamp_millis(),
                todo.updated_at.timestamp_millis(),
            ],
        )?;
        Ok(todo)
    }

    fn get(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let conn = self.conn()?;
        select_one(&conn, id)
    }

    fn update_text(&self, id: TodoId, text: TodoText) -> StoreResult<Option<Todo>> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE todos SET text = ?1, updated_at = MAX(?2, created_at) WHERE id = ?3",
            params![text.as_str(), now().timestamp_millis(), id.to_string()],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        select_one(&conn, id)
    }

    fn toggle(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE todos SET completed = 1 - completed, updated_at = MAX(?1, created_at)
             WHERE id = ?2",
            params![now().timestamp_millis(), id.to_string()],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        select_one(&conn, id)
    }

    fn delete(&self, id: TodoId) -> StoreResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM todos WHERE id = ?1", params![id.to_string()])?;
        Ok(changed > 0)
    }
}
