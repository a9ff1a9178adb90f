//! Demo data: ten authors and twenty books.

use anyhow::Context;
use serde::Serialize;

use crate::modules::authors::models::Author;
use crate::modules::authors::AUTHORS_CACHE_TAG;
use crate::modules::books::models::Book;
use crate::modules::books::BOOKS_CACHE_TAG;
use crate::state::AppState;

const AUTHOR_COUNT: usize = 10;
const BOOK_COUNT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub authors: usize,
    pub books: usize,
    /// Set when existing authors stopped the run
    pub skipped: bool,
}

/// Inserts the demo catalogue. Does nothing when authors already exist,
/// unless `force` is set, in which case the rows are appended.
pub async fn seed(state: &AppState, force: bool) -> anyhow::Result<SeedReport> {
    let existing = state
        .authors
        .find_all()
        .context("failed to count existing authors")?
        .len();
    if existing > 0 && !force {
        tracing::info!(existing, "authors already present, skipping fixtures");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    let mut authors = Vec::with_capacity(AUTHOR_COUNT);
    for i in 0..AUTHOR_COUNT {
        let mut author = Author::new(format!("Prenom {i}"), format!("Nom {i}"));
        state
            .authors
            .persist(&mut author)
            .with_context(|| format!("failed to insert author {i}"))?;
        authors.push(author);
    }

    for i in 0..BOOK_COUNT {
        let mut book = Book::new(
            format!("Titre {i}"),
            Some(format!("Quatrième de couverture numéro : {i}")),
        );
        book.author = Some(authors[i % AUTHOR_COUNT].clone());
        state
            .books
            .persist(&mut book)
            .with_context(|| format!("failed to insert book {i}"))?;
    }

    state
        .cache
        .invalidate_tags(&[AUTHORS_CACHE_TAG, BOOKS_CACHE_TAG])
        .await;

    tracing::info!(
        authors = AUTHOR_COUNT,
        books = BOOK_COUNT,
        "fixtures loaded"
    );
    Ok(SeedReport {
        authors: AUTHOR_COUNT,
        books: BOOK_COUNT,
        skipped: false,
    })
}
