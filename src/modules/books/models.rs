use serde::Deserialize;
use serde_json::Value;
use shelf_kernel::validation::{Constraints, Validate, Violation};

use crate::modules::authors::models::{Author, AuthorId};
use crate::serializer::{self, Group, GroupSerialize, Hydrate, Projection};

pub type BookId = i64;

const TITLE_MAX_LENGTH: usize = 255;

/// Request-body key carrying the author reference. It is read from the raw
/// body and never part of the validated book input.
pub const AUTHOR_REFERENCE_KEY: &str = "idAuthor";

/// Id used when the body names no author; it never resolves.
pub const UNRESOLVED_AUTHOR_ID: AuthorId = -1;

/// A book together with its (optional) author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Assigned by the store on first persist
    pub id: Option<BookId>,
    pub title: String,
    pub cover_text: Option<String>,
    pub author: Option<Author>,
}

impl Book {
    pub fn new(title: impl Into<String>, cover_text: Option<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            cover_text,
            author: None,
        }
    }

    pub fn author_id(&self) -> Option<AuthorId> {
        self.author.as_ref().and_then(|author| author.id)
    }
}

/// Book fields accepted from a request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: Option<String>,
    /// `Some(None)` when the body sends `"coverText": null`
    #[serde(default, deserialize_with = "serializer::nullable")]
    pub cover_text: Option<Option<String>>,
}

impl From<BookInput> for Book {
    fn from(input: BookInput) -> Self {
        Self::new(input.title.unwrap_or_default(), input.cover_text.flatten())
    }
}

impl Hydrate<BookInput> for Book {
    fn hydrate(&mut self, input: BookInput) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(cover_text) = input.cover_text {
            self.cover_text = cover_text;
        }
    }
}

impl Validate for Book {
    fn validate(&self) -> Vec<Violation> {
        Constraints::new()
            .not_blank("title", Some(self.title.as_str()))
            .max_length("title", Some(self.title.as_str()), TITLE_MAX_LENGTH)
            .finish()
    }
}

impl GroupSerialize for Book {
    fn project(&self, groups: &[Group]) -> Value {
        const BOOKS: &[Group] = &[Group::GetBooks];

        Projection::new(groups)
            .field("id", BOOKS, self.id)
            .field("title", BOOKS, self.title.as_str())
            .field("coverText", BOOKS, self.cover_text.as_deref())
            .nested("author", BOOKS, self.author.as_ref())
            .finish()
    }
}

/// Reads `idAuthor` from a raw JSON body.
///
/// Returns `None` when the key is absent or null. Integers and numeric
/// strings are taken as is; any other value yields an id that resolves to
/// no author.
pub fn requested_author_id(raw: &Value) -> Option<AuthorId> {
    let value = raw.get(AUTHOR_REFERENCE_KEY)?;
    match value {
        Value::Null => None,
        Value::Number(number) => Some(number.as_i64().unwrap_or(UNRESOLVED_AUTHOR_ID)),
        Value::String(text) => Some(text.trim().parse().unwrap_or(UNRESOLVED_AUTHOR_ID)),
        _ => Some(UNRESOLVED_AUTHOR_ID),
    }
}
