use tracing::{error, info, warn};

use crate::error::StoreError;
use crate::models::BookRecord;

use super::books::{delete_book, fetch_book, fetch_books, insert_book, update_book};
use super::connection::{Connector, StoreLocation};

/// Persistence operations the coordinator relies on. Every call either
/// completes its single statement or reports why it did not.
pub trait BookStore {
    /// Insert `book`, write the generated id back onto it and return the id.
    /// The id stays unset when the insert fails.
    fn create(&mut self, book: &mut BookRecord) -> Result<i64, StoreError>;

    /// Every stored book, ratings recomputed from the scores.
    fn read_all(&mut self) -> Result<Vec<BookRecord>, StoreError>;

    /// The book with `id`, or `None` when there is no such row.
    fn read_by_id(&mut self, id: i64) -> Result<Option<BookRecord>, StoreError>;

    /// Overwrite the stored row carrying `book`'s id. Nothing is inserted when
    /// the id is unknown.
    fn update(&mut self, book: &BookRecord) -> Result<(), StoreError>;

    /// Remove the row with `id`. Returns whether a row was actually deleted;
    /// an unknown id is not an error.
    fn delete(&mut self, id: i64) -> Result<bool, StoreError>;
}

/// SQLite-backed catalogue owning its connection.
pub struct SqliteCatalog {
    connector: Connector,
}

impl SqliteCatalog {
    /// Prepare a catalogue for `location`. Nothing is opened until the first
    /// operation.
    pub fn new(location: StoreLocation) -> Self {
        Self {
            connector: Connector::new(location),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StoreLocation::Memory)
    }

    pub fn is_connected(&self) -> bool {
        self.connector.is_open()
    }

    /// Open the connection now instead of on first use. Startup calls this so
    /// a bad database path is reported before the terminal UI takes over.
    pub fn connect(&mut self) -> Result<(), StoreError> {
        self.connector.get().map(|_| ())
    }

    /// Release the connection. The next operation reconnects.
    pub fn close(&mut self) -> Result<(), StoreError> {
        self.connector.close()
    }

    /// Run one statement against the live connection, mapping and logging any
    /// failure. Broken connections are dropped so the next call reconnects.
    fn run<T>(
        &mut self,
        action: &'static str,
        op: impl FnOnce(&rusqlite::Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let result = {
            let conn = self.connector.get().inspect_err(|err| {
                error!(error = %err, action, "database unavailable");
            })?;
            op(conn)
        };

        result.map_err(|err| {
            error!(error = %err, action, "book query failed");
            self.connector.invalidate_if_broken(&err);
            StoreError::query(action, err)
        })
    }
}

impl BookStore for SqliteCatalog {
    fn create(&mut self, book: &mut BookRecord) -> Result<i64, StoreError> {
        let id = self.run("insert", |conn| insert_book(conn, book))?;
        book.assign_id(id);
        info!(id, title = book.title(), "book added");
        Ok(id)
    }

    fn read_all(&mut self) -> Result<Vec<BookRecord>, StoreError> {
        self.run("load", fetch_books)
    }

    fn read_by_id(&mut self, id: i64) -> Result<Option<BookRecord>, StoreError> {
        self.run("look up", |conn| fetch_book(conn, id))
    }

    fn update(&mut self, book: &BookRecord) -> Result<(), StoreError> {
        let id = book.id().ok_or(StoreError::MissingId)?;
        let updated = self.run("update", |conn| update_book(conn, id, book))?;
        if updated == 0 {
            warn!(id, "update matched no book");
            return Err(StoreError::NotFound(id));
        }
        info!(id, title = book.title(), "book updated");
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<bool, StoreError> {
        let deleted = self.run("delete", |conn| delete_book(conn, id))?;
        if deleted == 0 {
            warn!(id, "delete matched no book");
        } else {
            info!(id, "book deleted");
        }
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> BookRecord {
        BookRecord::new("Dune", "Herbert", 1965, 4.0, 5.0, 3.0)
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let mut catalog = SqliteCatalog::in_memory();
        let mut first = dune();
        let mut second = BookRecord::new("Emma", "Austen", 1815, 3.0, 4.0, 4.0);

        let first_id = catalog.create(&mut first).expect("insert first");
        let second_id = catalog.create(&mut second).expect("insert second");

        assert_eq!(first.id(), Some(first_id));
        assert_eq!(second.id(), Some(second_id));
        assert!(second_id > first_id);
    }

    #[test]
    fn read_all_returns_rows_in_id_order() {
        let mut catalog = SqliteCatalog::in_memory();
        for title in ["C", "A", "B"] {
            let mut book = BookRecord::new(title, "Anon", 2001, 1.0, 2.0, 3.0);
            catalog.create(&mut book).expect("insert");
        }

        let titles: Vec<String> = catalog
            .read_all()
            .expect("load")
            .iter()
            .map(|book| book.title().to_string())
            .collect();
        assert_eq!(titles, ["C", "A", "B"]);
    }

    #[test]
    fn update_without_id_is_refused() {
        let mut catalog = SqliteCatalog::in_memory();
        let err = catalog.update(&dune()).unwrap_err();
        assert!(matches!(err, StoreError::MissingId));
    }

    #[test]
    fn update_unknown_id_inserts_nothing() {
        let mut catalog = SqliteCatalog::in_memory();
        let mut ghost = dune();
        ghost.assign_id(42);

        let err = catalog.update(&ghost).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(42)));
        assert!(catalog.read_all().expect("load").is_empty());
    }

    #[test]
    fn delete_unknown_id_is_a_no_op() {
        let mut catalog = SqliteCatalog::in_memory();
        let mut book = dune();
        catalog.create(&mut book).expect("insert");

        assert!(!catalog.delete(999).expect("delete"));
        assert_eq!(catalog.read_all().expect("load").len(), 1);
    }

    #[test]
    fn connect_is_deferred_until_first_use() {
        let mut catalog = SqliteCatalog::in_memory();
        assert!(!catalog.is_connected());
        catalog.read_all().expect("load");
        assert!(catalog.is_connected());
    }
}
