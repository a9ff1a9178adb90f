use serde::Deserialize;
use serde_json::Value;
use shelf_kernel::validation::{Constraints, Validate, Violation};

use crate::serializer::{Group, GroupSerialize, Hydrate, Projection};

pub type AuthorId = i64;

const NAME_MAX_LENGTH: usize = 255;

/// A persisted (or about to be persisted) author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Assigned by the store on first persist
    pub id: Option<AuthorId>,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Author fields accepted from a request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<AuthorInput> for Author {
    fn from(input: AuthorInput) -> Self {
        Self::new(
            input.first_name.unwrap_or_default(),
            input.last_name.unwrap_or_default(),
        )
    }
}

impl Hydrate<AuthorInput> for Author {
    fn hydrate(&mut self, input: AuthorInput) {
        if let Some(first_name) = input.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            self.last_name = last_name;
        }
    }
}

impl Validate for Author {
    fn validate(&self) -> Vec<Violation> {
        Constraints::new()
            .not_blank("firstName", Some(self.first_name.as_str()))
            .max_length("firstName", Some(self.first_name.as_str()), NAME_MAX_LENGTH)
            .not_blank("lastName", Some(self.last_name.as_str()))
            .max_length("lastName", Some(self.last_name.as_str()), NAME_MAX_LENGTH)
            .finish()
    }
}

// Books embed the author summary, so every author field is visible in both groups.
impl GroupSerialize for Author {
    fn project(&self, groups: &[Group]) -> Value {
        const SUMMARY: &[Group] = &[Group::GetAuthors, Group::GetBooks];

        Projection::new(groups)
            .field("id", SUMMARY, self.id)
            .field("firstName", SUMMARY, self.first_name.as_str())
            .field("lastName", SUMMARY, self.last_name.as_str())
            .finish()
    }
}
