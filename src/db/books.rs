use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::BookRecord;

/// Columns read back for every book. The stored `rating` column is left out:
/// the rating is always recomputed from the three scores.
const BOOK_COLUMNS: &str = "id, title, author, publication_year, storyline_score,
     language_style_score, originality_score";

/// Fetch every book ordered by id so the table keeps a stable layout between
/// reloads.
pub(crate) fn fetch_books(conn: &Connection) -> rusqlite::Result<Vec<BookRecord>> {
    let mut stmt = conn.prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))?;
    let books = stmt
        .query_map([], book_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(books)
}

/// Look up one book by primary key.
pub(crate) fn fetch_book(conn: &Connection, id: i64) -> rusqlite::Result<Option<BookRecord>> {
    conn.query_row(
        &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
        [id],
        book_from_row,
    )
    .optional()
}

/// Insert a new row and return the id SQLite generated for it.
pub(crate) fn insert_book(conn: &Connection, book: &BookRecord) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO books (title, author, publication_year, storyline_score,
             language_style_score, originality_score, rating)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            book.title(),
            book.author(),
            book.publication_year(),
            book.storyline_score(),
            book.language_score(),
            book.originality_score(),
            book.rating(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite every column of the row with the given id. Returns the number of
/// rows touched, which is zero when the id does not exist.
pub(crate) fn update_book(
    conn: &Connection,
    id: i64,
    book: &BookRecord,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE books
         SET title = ?1, author = ?2, publication_year = ?3, storyline_score = ?4,
             language_style_score = ?5, originality_score = ?6, rating = ?7
         WHERE id = ?8",
        params![
            book.title(),
            book.author(),
            book.publication_year(),
            book.storyline_score(),
            book.language_score(),
            book.originality_score(),
            book.rating(),
            id,
        ],
    )
}

/// Remove the row with the given id, returning how many rows went away.
pub(crate) fn delete_book(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM books WHERE id = ?1", params![id])
}

/// Rows pass through the validating setters, so a year or score that was
/// written out of range by another client reads back as the default.
fn book_from_row(row: &Row<'_>) -> rusqlite::Result<BookRecord> {
    let mut book = BookRecord::default();
    book.assign_id(row.get(0)?);
    book.set_title(row.get::<_, String>(1)?);
    book.set_author(row.get::<_, String>(2)?);
    book.set_publication_year(row.get(3)?);
    book.set_storyline_score(row.get(4)?);
    book.set_language_score(row.get(5)?);
    book.set_originality_score(row.get(6)?);
    Ok(book)
}
