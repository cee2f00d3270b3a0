//! Domain types and models

pub mod tag;
pub mod user;

pub use tag::{
    LanguageChoice, LanguageSkill, Proficiency, TagEntry, TagId, TagKind, TagLink,
};
pub use user::{
    NewUserProfile, TagMatchMode, UserFilter, UserProfile, UserRole, UserWithTags,
};
