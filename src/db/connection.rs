use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, ErrorCode};
use tracing::{debug, info, warn};

use crate::error::{OpenFailure, StoreError};

/// Where the catalogue lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// SQLite file on disk. Parent directories are created on first use.
    File(PathBuf),
    /// Private in-memory database, gone once the connection closes.
    Memory,
}

impl StoreLocation {
    fn describe(&self) -> PathBuf {
        match self {
            StoreLocation::File(path) => path.clone(),
            StoreLocation::Memory => PathBuf::from(":memory:"),
        }
    }
}

/// Owns the single SQLite connection used by the catalogue. The connection is
/// opened the first time it is needed and reopened after it has been dropped,
/// either explicitly through [`Connector::close`] or because an operation
/// reported it as unusable.
pub(crate) struct Connector {
    location: StoreLocation,
    conn: Option<Connection>,
}

impl Connector {
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            conn: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Borrow the live connection, establishing it first if necessary.
    pub fn get(&mut self) -> Result<&Connection, StoreError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => open_and_prepare(&self.location)?,
        };
        Ok(&*self.conn.insert(conn))
    }

    /// Drop the connection when `err` says it can no longer be trusted, so the
    /// next call starts from a fresh handle.
    pub fn invalidate_if_broken(&mut self, err: &rusqlite::Error) {
        if is_connection_failure(err) && self.conn.take().is_some() {
            warn!(error = %err, "dropping unusable database connection");
        }
    }

    /// Release the connection. A later call to [`Connector::get`] reopens it.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, err)| StoreError::Close(err))?;
            info!(location = %self.location.describe().display(), "database connection closed");
        }
        Ok(())
    }
}

fn is_connection_failure(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(
            ErrorCode::CannotOpen
                | ErrorCode::SystemIoFailure
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::NotADatabase
        )
    )
}

fn open_and_prepare(location: &StoreLocation) -> Result<Connection, StoreError> {
    let conn = match location {
        StoreLocation::File(path) => open_file(path)?,
        StoreLocation::Memory => Connection::open_in_memory().map_err(|err| StoreError::Open {
            path: location.describe(),
            source: err.into(),
        })?,
    };
    ensure_schema(&conn)?;
    info!(location = %location.describe().display(), "connected to database");
    Ok(conn)
}

fn open_file(path: &Path) -> Result<Connection, StoreError> {
    let open_error = |source: OpenFailure| StoreError::Open {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| open_error(err.into()))?;
    }

    Connection::open(path).map_err(|err| open_error(err.into()))
}

/// Create the `books` table when it does not exist yet.
fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            publication_year INTEGER NOT NULL,
            storyline_score REAL NOT NULL,
            language_style_score REAL NOT NULL,
            originality_score REAL NOT NULL,
            rating REAL NOT NULL
        )",
        [],
    )
    .map_err(StoreError::Schema)?;
    debug!("books table ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_is_lazy() {
        let mut connector = Connector::new(StoreLocation::Memory);
        assert!(!connector.is_open());
        connector.get().expect("open in-memory database");
        assert!(connector.is_open());
    }

    #[test]
    fn close_then_get_reopens() {
        let mut connector = Connector::new(StoreLocation::Memory);
        connector.get().expect("first open");
        connector.close().expect("close");
        assert!(!connector.is_open());
        connector.get().expect("reopen");
        assert!(connector.is_open());
    }

    #[test]
    fn schema_exists_after_open() {
        let mut connector = Connector::new(StoreLocation::Memory);
        let conn = connector.get().expect("open");
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'books'",
                [],
                |row| row.get(0),
            )
            .expect("query sqlite_master");
        assert_eq!(count, 1);
    }

    #[test]
    fn constraint_errors_keep_the_connection() {
        let mut connector = Connector::new(StoreLocation::Memory);
        connector.get().expect("open");
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            None,
        );
        connector.invalidate_if_broken(&err);
        assert!(connector.is_open());

        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_IOERR),
            None,
        );
        connector.invalidate_if_broken(&err);
        assert!(!connector.is_open());
    }
}
