//! Tag catalog and association types
//!
//! Interests and languages share the same catalog shape: a numeric id and a
//! unique name. Languages carry a proficiency level on the association.

use serde::{Deserialize, Serialize};

/// Identifier of a catalog entry (interest or language)
pub type TagId = i64;

/// The two tag dimensions a user profile can be associated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Interest,
    Language,
}

crate::impl_domain_enum_conversions!(TagKind {
    Interest => "interest",
    Language => "language",
});

/// Catalog entry: a named tag with its persistent id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub id: TagId,
    pub name: String,
}

impl TagEntry {
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// How well a user speaks an associated language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Fluent,
}

crate::impl_domain_enum_conversions!(Proficiency {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Fluent => "fluent",
});

/// A language requested by name together with the desired proficiency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChoice {
    pub name: String,
    pub proficiency: Proficiency,
}

impl LanguageChoice {
    pub fn new(name: impl Into<String>, proficiency: Proficiency) -> Self {
        Self { name: name.into(), proficiency }
    }
}

/// A resolved language association on a user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub language: TagEntry,
    pub proficiency: Proficiency,
}

/// Persisted association between a user and a catalog entry
///
/// `attr` is the per-association payload: `()` for interests, [`Proficiency`]
/// for languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLink<A> {
    pub user_id: uuid::Uuid,
    pub tag_id: TagId,
    pub attr: A,
}
