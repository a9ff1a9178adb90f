//! JSON wire conversion with named visibility groups.
//!
//! Each record declares, field by field, which groups expose it. Serializing
//! with a set of groups keeps only fields visible in at least one of them;
//! null fields are left out.

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_json::{Map, Value};
use shelf_http::AppError;

/// Named field-visibility group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    GetAuthors,
    GetBooks,
}

impl Group {
    pub fn name(&self) -> &'static str {
        match self {
            Group::GetAuthors => "getAuthors",
            Group::GetBooks => "getBooks",
        }
    }
}

/// Per-type projection onto the requested groups.
pub trait GroupSerialize {
    fn project(&self, groups: &[Group]) -> Value;
}

/// Builder used by [`GroupSerialize`] impls to declare fields.
pub struct Projection<'g> {
    groups: &'g [Group],
    fields: Map<String, Value>,
}

impl<'g> Projection<'g> {
    pub fn new(groups: &'g [Group]) -> Self {
        Self {
            groups,
            fields: Map::new(),
        }
    }

    fn visible(&self, visible_in: &[Group]) -> bool {
        visible_in.iter().any(|group| self.groups.contains(group))
    }

    pub fn field(mut self, name: &str, visible_in: &[Group], value: impl Into<Value>) -> Self {
        if self.visible(visible_in) {
            let value = value.into();
            if !value.is_null() {
                self.fields.insert(name.to_string(), value);
            }
        }
        self
    }

    /// Embeds a related record projected with the same groups.
    pub fn nested<T: GroupSerialize>(
        mut self,
        name: &str,
        visible_in: &[Group],
        related: Option<&T>,
    ) -> Self {
        if self.visible(visible_in) {
            if let Some(related) = related {
                self.fields
                    .insert(name.to_string(), related.project(self.groups));
            }
        }
        self
    }

    pub fn finish(self) -> Value {
        Value::Object(self.fields)
    }
}

pub fn serialize<T: GroupSerialize>(record: &T, groups: &[Group]) -> Value {
    record.project(groups)
}

pub fn serialize_list<T: GroupSerialize>(records: &[T], groups: &[Group]) -> Value {
    Value::Array(records.iter().map(|record| record.project(groups)).collect())
}

/// Parses a request body into a fresh input instance.
pub fn deserialize<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::bad_request(format!("Malformed JSON body: {err}")))
}

/// Keeps an explicit `null` apart from a missing key: missing is `None`
/// (via `#[serde(default)]`), `null` is `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Rehydrates an existing record in place from a parsed input. Fields absent
/// from the input keep their current value.
pub trait Hydrate<I> {
    fn hydrate(&mut self, input: I);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    struct Sample {
        id: i64,
        secret: Option<String>,
        child: Option<Box<Sample>>,
    }

    impl GroupSerialize for Sample {
        fn project(&self, groups: &[Group]) -> Value {
            Projection::new(groups)
                .field("id", &[Group::GetAuthors, Group::GetBooks], self.id)
                .field("secret", &[Group::GetBooks], self.secret.clone())
                .nested("child", &[Group::GetBooks], self.child.as_deref())
                .finish()
        }
    }

    #[test]
    fn fields_outside_requested_groups_are_dropped() {
        let sample = Sample {
            id: 1,
            secret: Some("s".into()),
            child: None,
        };
        assert_eq!(serialize(&sample, &[Group::GetAuthors]), json!({"id": 1}));
        assert_eq!(
            serialize(&sample, &[Group::GetBooks]),
            json!({"id": 1, "secret": "s"})
        );
    }

    #[test]
    fn null_fields_and_missing_relations_are_omitted() {
        let sample = Sample {
            id: 2,
            secret: None,
            child: Some(Box::new(Sample {
                id: 3,
                secret: None,
                child: None,
            })),
        };
        assert_eq!(
            serialize(&sample, &[Group::GetBooks]),
            json!({"id": 2, "child": {"id": 3}})
        );
    }

    #[test]
    fn no_group_means_empty_object() {
        let sample = Sample {
            id: 4,
            secret: None,
            child: None,
        };
        assert_eq!(serialize(&sample, &[]), json!({}));
    }

    #[test]
    fn lists_project_every_item() {
        let items = vec![
            Sample { id: 1, secret: None, child: None },
            Sample { id: 2, secret: None, child: None },
        ];
        assert_eq!(
            serialize_list(&items, &[Group::GetAuthors]),
            json!([{"id": 1}, {"id": 2}])
        );
    }

    #[test]
    fn malformed_body_is_bad_request() {
        #[derive(Debug, Deserialize)]
        struct Input {
            #[allow(dead_code)]
            name: Option<String>,
        }

        let err = deserialize::<Input>(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
        assert!(deserialize::<Input>(br#"{"name": "x", "extra": 1}"#).is_ok());
    }

    #[test]
    fn group_names_match_wire_names() {
        assert_eq!(Group::GetAuthors.name(), "getAuthors");
        assert_eq!(Group::GetBooks.name(), "getBooks");
    }
}
