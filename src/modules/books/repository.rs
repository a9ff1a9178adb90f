//! Book persistence. Reads join the author so a loaded book always carries
//! its author summary.

use rusqlite::{params, OptionalExtension, Row};
use shelf_db::{Database, DbError, DbResult, Page};

use super::models::{Book, BookId};
use crate::modules::authors::models::Author;

const BOOK_SELECT_SQL: &str = "SELECT
    b.id,
    b.title,
    b.cover_text,
    a.id AS author_id,
    a.first_name AS author_first_name,
    a.last_name AS author_last_name
FROM book b
LEFT JOIN author a ON a.id = b.author_id";

/// Persistence gateway for books.
pub trait BookRepository: Send + Sync {
    fn find_all(&self) -> DbResult<Vec<Book>>;
    fn find(&self, id: BookId) -> DbResult<Option<Book>>;
    /// One page ordered by id ascending.
    fn find_page(&self, page: Page) -> DbResult<Vec<Book>>;
    /// Inserts when `id` is unset (and assigns it), updates otherwise. The
    /// stored author reference follows `book.author`.
    fn persist(&self, book: &mut Book) -> DbResult<BookId>;
    fn remove(&self, id: BookId) -> DbResult<()>;
}

pub struct SqliteBookRepository {
    db: Database,
}

impl SqliteBookRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl BookRepository for SqliteBookRepository {
    fn find_all(&self) -> DbResult<Vec<Book>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} ORDER BY b.id ASC;"))?;
            let books = stmt
                .query_map([], parse_book_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(books)
        })
    }

    fn find(&self, id: BookId) -> DbResult<Option<Book>> {
        self.db.with_conn(|conn| {
            let book = conn
                .query_row(
                    &format!("{BOOK_SELECT_SQL} WHERE b.id = ?1;"),
                    [id],
                    parse_book_row,
                )
                .optional()?;
            Ok(book)
        })
    }

    fn find_page(&self, page: Page) -> DbResult<Vec<Book>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{BOOK_SELECT_SQL} ORDER BY b.id ASC LIMIT ?1 OFFSET ?2;"
            ))?;
            let books = stmt
                .query_map(params![i64::from(page.limit), page.offset()], parse_book_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(books)
        })
    }

    fn persist(&self, book: &mut Book) -> DbResult<BookId> {
        let author_id = book.author_id();
        self.db.with_conn(|conn| match book.id {
            None => {
                conn.execute(
                    "INSERT INTO book (title, cover_text, author_id) VALUES (?1, ?2, ?3);",
                    params![book.title, book.cover_text, author_id],
                )?;
                let id = conn.last_insert_rowid();
                book.id = Some(id);
                Ok(id)
            }
            Some(id) => {
                let changed = conn.execute(
                    "UPDATE book SET title = ?1, cover_text = ?2, author_id = ?3 WHERE id = ?4;",
                    params![book.title, book.cover_text, author_id, id],
                )?;
                if changed == 0 {
                    return Err(DbError::NotFound { entity: "book", id });
                }
                Ok(id)
            }
        })
    }

    fn remove(&self, id: BookId) -> DbResult<()> {
        self.db.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM book WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(DbError::NotFound { entity: "book", id });
            }
            Ok(())
        })
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    let author = match row.get::<_, Option<i64>>("author_id")? {
        Some(author_id) => Some(Author {
            id: Some(author_id),
            first_name: row.get("author_first_name")?,
            last_name: row.get("author_last_name")?,
        }),
        None => None,
    };

    Ok(Book {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        cover_text: row.get("cover_text")?,
        author,
    })
}
