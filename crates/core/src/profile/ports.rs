//! Port interface for profile management
//!
//! This trait defines the boundary between core business logic and the
//! infrastructure implementation for user profile operations. The embedding
//! layer (HTTP handlers, jobs) talks to this port only.

use async_trait::async_trait;
use medmatch_domain::{
    LanguageChoice, NewUserProfile, Result, UserFilter, UserProfile, UserWithTags,
};
use uuid::Uuid;

use crate::reconcile::ReconcileOutcome;

/// High-level user profile operations
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Create a profile and attach its initial interests and languages.
    ///
    /// Runs as one atomic unit: if any association write fails, the profile
    /// row is not created either.
    async fn create_user(
        &self,
        new_user: NewUserProfile,
        interests: Vec<String>,
        languages: Vec<LanguageChoice>,
    ) -> Result<UserWithTags>;

    /// Replace the user's interests with the given names.
    ///
    /// Unknown names are dropped; an unknown user id is a `NotFound` error.
    async fn update_interests(
        &self,
        user_id: Uuid,
        interests: Vec<String>,
    ) -> Result<ReconcileOutcome>;

    /// Replace the user's languages with the given name/proficiency choices.
    async fn update_languages(
        &self,
        user_id: Uuid,
        languages: Vec<LanguageChoice>,
    ) -> Result<ReconcileOutcome>;

    /// Deactivate a profile, returning the updated row.
    ///
    /// An absent user yields `Ok(None)` rather than an error.
    async fn deactivate(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    /// Fetch a profile with its associations.
    async fn get(&self, user_id: Uuid) -> Result<Option<UserWithTags>>;

    /// Fetch a bare profile by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>>;

    /// List profiles (with associations) matching the filter.
    async fn list(&self, filter: UserFilter) -> Result<Vec<UserWithTags>>;
}
