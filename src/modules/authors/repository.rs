//! Author persistence.

use rusqlite::{params, OptionalExtension, Row};
use shelf_db::{Database, DbError, DbResult, Page};

use super::models::{Author, AuthorId};

const AUTHOR_SELECT_SQL: &str = "SELECT id, first_name, last_name FROM author";

/// Persistence gateway for authors.
pub trait AuthorRepository: Send + Sync {
    fn find_all(&self) -> DbResult<Vec<Author>>;
    fn find(&self, id: AuthorId) -> DbResult<Option<Author>>;
    /// One page ordered by id ascending.
    fn find_page(&self, page: Page) -> DbResult<Vec<Author>>;
    /// Inserts when `id` is unset (and assigns it), updates otherwise.
    fn persist(&self, author: &mut Author) -> DbResult<AuthorId>;
    fn remove(&self, id: AuthorId) -> DbResult<()>;
}

pub struct SqliteAuthorRepository {
    db: Database,
}

impl SqliteAuthorRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl AuthorRepository for SqliteAuthorRepository {
    fn find_all(&self) -> DbResult<Vec<Author>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"))?;
            let authors = stmt
                .query_map([], parse_author_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(authors)
        })
    }

    fn find(&self, id: AuthorId) -> DbResult<Option<Author>> {
        self.db.with_conn(|conn| {
            let author = conn
                .query_row(
                    &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
                    [id],
                    parse_author_row,
                )
                .optional()?;
            Ok(author)
        })
    }

    fn find_page(&self, page: Page) -> DbResult<Vec<Author>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{AUTHOR_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"
            ))?;
            let authors = stmt
                .query_map(params![i64::from(page.limit), page.offset()], parse_author_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(authors)
        })
    }

    fn persist(&self, author: &mut Author) -> DbResult<AuthorId> {
        self.db.with_conn(|conn| match author.id {
            None => {
                conn.execute(
                    "INSERT INTO author (first_name, last_name) VALUES (?1, ?2);",
                    params![author.first_name, author.last_name],
                )?;
                let id = conn.last_insert_rowid();
                author.id = Some(id);
                Ok(id)
            }
            Some(id) => {
                let changed = conn.execute(
                    "UPDATE author SET first_name = ?1, last_name = ?2 WHERE id = ?3;",
                    params![author.first_name, author.last_name, id],
                )?;
                if changed == 0 {
                    return Err(DbError::NotFound {
                        entity: "author",
                        id,
                    });
                }
                Ok(id)
            }
        })
    }

    fn remove(&self, id: AuthorId) -> DbResult<()> {
        self.db.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM author WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(DbError::NotFound {
                    entity: "author",
                    id,
                });
            }
            Ok(())
        })
    }
}

fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::migrated_db;

    fn repo_with(count: usize) -> SqliteAuthorRepository {
        let repo = SqliteAuthorRepository::new(migrated_db());
        for i in 0..count {
            repo.persist(&mut Author::new(format!("Prenom {i}"), format!("Nom {i}")))
                .unwrap();
        }
        repo
    }

    #[test]
    fn persist_assigns_id_then_updates_in_place() {
        let repo = repo_with(0);
        let mut author = Author::new("Victor", "Hugo");

        let id = repo.persist(&mut author).unwrap();
        assert_eq!(author.id, Some(id));

        author.last_name = "Hugo (updated)".into();
        assert_eq!(repo.persist(&mut author).unwrap(), id);

        let stored = repo.find(id).unwrap().unwrap();
        assert_eq!(stored.last_name, "Hugo (updated)");
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn pages_are_ordered_by_id_with_offset() {
        let repo = repo_with(7);

        let first = repo.find_page(Page::new(1, 3)).unwrap();
        let third = repo.find_page(Page::new(3, 3)).unwrap();
        let beyond = repo.find_page(Page::new(4, 3)).unwrap();

        let names: Vec<_> = first.iter().map(|a| a.first_name.as_str()).collect();
        assert_eq!(names, vec!["Prenom 0", "Prenom 1", "Prenom 2"]);
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].first_name, "Prenom 6");
        assert!(beyond.is_empty());
    }

    #[test]
    fn remove_deletes_and_reports_missing_rows() {
        let repo = repo_with(1);
        let id = repo.find_all().unwrap()[0].id.unwrap();

        repo.remove(id).unwrap();
        assert!(repo.find(id).unwrap().is_none());
        assert!(matches!(
            repo.remove(id),
            Err(DbError::NotFound { entity: "author", .. })
        ));
    }

    #[test]
    fn updating_a_vanished_author_is_not_found() {
        let repo = repo_with(0);
        let mut ghost = Author {
            id: Some(99),
            first_name: "Ghost".into(),
            last_name: "Writer".into(),
        };
        assert!(matches!(
            repo.persist(&mut ghost),
            Err(DbError::NotFound { id: 99, .. })
        ));
    }
}
