use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::ServerError;

/// Columns added after the first release. Older databases get them on startup.
const ADDITIVE_COLUMNS: &[(&str, &str)] = &[("lat", "REAL"), ("lng", "REAL")];

/// The storage handle. Opened once at startup and handed to whoever needs it;
/// clones share the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| ServerError::DbError(format!("Open DB failed: {e}")))?;

        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(|e| ServerError::DbError(format!("Set journal mode failed: {e}")))?;
        tracing::debug!("opened {} (journal_mode={mode})", path.display());

        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, ServerError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ServerError::DbError(format!("Open DB failed: {e}")))?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        let mut guard = self.conn.lock().map_err(|_| {
            tracing::error!("database mutex poisoned");
            ServerError::InternalError
        })?;
        f(&mut *guard)
    }
}

/// Initialize database from a SQL schema file, then apply additive migrations.
pub fn init_db(db: &Database, schema_path: &str) -> Result<(), ServerError> {
    let schema_sql = fs::read_to_string(schema_path)
        .map_err(|e| ServerError::DbError(format!("Failed to read schema file: {e}")))?;

    db.with_conn(|conn| {
        conn.execute_batch(&schema_sql)
            .map_err(|e| ServerError::DbError(format!("Failed to apply schema: {e}")))?;
        migrate(conn)
    })?;

    tracing::info!("database initialized from {schema_path}");
    Ok(())
}

/// Adds any missing optional columns. Existing rows get NULL.
pub fn migrate(conn: &Connection) -> Result<(), ServerError> {
    let existing = column_names(conn, "leads")?;

    for (column, sql_type) in ADDITIVE_COLUMNS {
        if !existing.iter().any(|c| c == column) {
            conn.execute_batch(&format!("ALTER TABLE leads ADD COLUMN {column} {sql_type}"))
                .map_err(|e| ServerError::DbError(format!("Failed to add {column}: {e}")))?;
            tracing::info!("migrated leads: added column {column}");
        }
    }
    Ok(())
}

fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

    let mut names = Vec::new();
    for name in rows {
        names.push(name?);
    }
    Ok(names)
}
