//! User profile types
//!
//! Profiles are never physically deleted by the service; deactivation flips
//! `is_active` and the row stays behind for audit and re-activation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tag::{LanguageSkill, TagEntry};

/// Role a user holds on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Doctor,
    Student,
    Patient,
}

crate::impl_domain_enum_conversions!(UserRole {
    Doctor => "doctor",
    Student => "student",
    Patient => "patient",
});

/// User profile stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub location: Option<String>,
    /// Years-of-practice indicator; 0 for users who have not set it
    pub experience_level: i64,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_picture_url: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub last_updated_at: i64,
}

/// Payload for creating a new user profile
///
/// Identity (uuid) and timestamps are generated at insert time; `is_active`
/// starts true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserProfile {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub location: Option<String>,
    pub experience_level: i64,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_picture_url: Option<String>,
    pub phone_number: Option<String>,
}

impl NewUserProfile {
    /// Create a payload with the required fields; optional fields start empty
    /// and `experience_level` starts at 0.
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            role,
            location: None,
            experience_level: 0,
            date_of_birth: None,
            profile_picture_url: None,
            phone_number: None,
        }
    }
}

/// A profile together with its resolved tag associations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithTags {
    pub profile: UserProfile,
    pub interests: Vec<TagEntry>,
    pub languages: Vec<LanguageSkill>,
}

/// How a multi-tag filter matches within one tag dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMatchMode {
    /// User holds at least one of the listed tags
    #[default]
    Any,
    /// User holds every listed tag
    All,
}

/// Filter for listing user profiles
///
/// Dimensions compose with AND. Tag name lists are resolved against the
/// catalog first; a dimension whose resolved id set is empty is dropped from
/// the query rather than matching nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub email: Option<String>,
    pub active: Option<bool>,
    pub interests: Vec<String>,
    pub languages: Vec<String>,
    pub tag_match: TagMatchMode,
}

impl UserFilter {
    /// Filter matching every profile.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter matching active profiles only.
    pub fn active_only() -> Self {
        Self { active: Some(true), ..Self::default() }
    }

    /// Filter matching profiles with the given role.
    pub fn by_role(role: UserRole) -> Self {
        Self { role: Some(role), ..Self::default() }
    }

    /// True when no dimension is set.
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.email.is_none()
            && self.active.is_none()
            && self.interests.is_empty()
            && self.languages.is_empty()
    }
}
