//! Transactional profile service implementing the `ProfileDirectory` port.
//!
//! Every write runs inside a single immediate transaction on one pooled
//! connection: the profile row, the interest reconciliation and the language
//! reconciliation either all commit or all roll back. The reconciliation
//! engine stays storage-agnostic; this service hands it adapters that borrow
//! the open transaction.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use medmatch_core::ProfileDirectory;
//! use medmatch_domain::{NewUserProfile, UserRole};
//! use medmatch_infra::database::DbManager;
//! use medmatch_infra::services::ProfileService;
//!
//! # async fn example() {
//! let db = Arc::new(DbManager::new("medmatch.db", 4).unwrap());
//! db.run_migrations().unwrap();
//! let directory = ProfileService::new(db);
//!
//! let created = directory
//!     .create_user(
//!         NewUserProfile::new("ada@example.com", "Ada Moreau", UserRole::Doctor),
//!         vec!["cardiology".into()],
//!         vec![],
//!     )
//!     .await
//!     .unwrap();
//! assert_eq!(created.interests.len(), 1);
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use medmatch_core::{reconcile, DesiredTags, ProfileDirectory, ReconcileOutcome};
use medmatch_domain::{
    LanguageChoice, MedMatchError, NewUserProfile, Result, TagKind, UserFilter, UserProfile,
    UserWithTags,
};
use rusqlite::{Connection, TransactionBehavior};
use tokio::task;
use tracing::info;
use uuid::Uuid;

use crate::database::association_store::{SqliteInterestStore, SqliteLanguageStore};
use crate::database::catalog_repository::{self, SqliteTagCatalog};
use crate::database::manager::DbManager;
use crate::database::user_repository::{self, ResolvedUserFilter};
use crate::errors::InfraError;

/// SQLite-backed implementation of [`ProfileDirectory`].
pub struct ProfileService {
    db: Arc<DbManager>,
}

impl ProfileService {
    /// Create a new service on top of the shared pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileDirectory for ProfileService {
    async fn create_user(
        &self,
        new_user: NewUserProfile,
        interests: Vec<String>,
        languages: Vec<LanguageChoice>,
    ) -> Result<UserWithTags> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || create_user_blocking(&db, new_user, interests, languages))
            .await
            .map_err(map_join_error)?
    }

    async fn update_interests(
        &self,
        user_id: Uuid,
        interests: Vec<String>,
    ) -> Result<ReconcileOutcome> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || update_interests_blocking(&db, user_id, interests))
            .await
            .map_err(map_join_error)?
    }

    async fn update_languages(
        &self,
        user_id: Uuid,
        languages: Vec<LanguageChoice>,
    ) -> Result<ReconcileOutcome> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || update_languages_blocking(&db, user_id, languages))
            .await
            .map_err(map_join_error)?
    }

    async fn deactivate(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || deactivate_blocking(&db, user_id))
            .await
            .map_err(map_join_error)?
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<UserWithTags>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || get_blocking(&db, user_id)).await.map_err(map_join_error)?
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let db = Arc::clone(&self.db);
        let email = email.to_string();
        task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            user_repository::find_by_email(&conn, &email)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, filter: UserFilter) -> Result<Vec<UserWithTags>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || list_blocking(&db, filter)).await.map_err(map_join_error)?
    }
}

// =============================================================================
// Blocking bodies
// =============================================================================

fn create_user_blocking(
    db: &DbManager,
    new_user: NewUserProfile,
    interests: Vec<String>,
    languages: Vec<LanguageChoice>,
) -> Result<UserWithTags> {
    let mut conn = db.get_connection()?;
    let tx =
        conn.transaction_with_behavior(TransactionBehavior::Immediate).map_err(map_sql_error)?;

    let now = Utc::now().timestamp();
    let profile = UserProfile {
        uuid: Uuid::new_v4(),
        email: new_user.email,
        name: new_user.name,
        role: new_user.role,
        location: new_user.location,
        experience_level: new_user.experience_level,
        date_of_birth: new_user.date_of_birth,
        profile_picture_url: new_user.profile_picture_url,
        phone_number: new_user.phone_number,
        is_active: true,
        created_at: now,
        last_updated_at: now,
    };
    user_repository::insert_profile(&tx, &profile)?;

    let catalog = SqliteTagCatalog::new(&tx);

    let interest_store = SqliteInterestStore::new(&tx);
    reconcile(
        &interest_store,
        &catalog,
        profile.uuid,
        TagKind::Interest,
        &DesiredTags::from_names(interests),
    )?;

    let language_store = SqliteLanguageStore::new(&tx);
    let desired = DesiredTags::new(
        languages.into_iter().map(|choice| (choice.name, choice.proficiency)).collect(),
    );
    reconcile(&language_store, &catalog, profile.uuid, TagKind::Language, &desired)?;

    let user = load_user_with_tags(&tx, profile)?;
    tx.commit().map_err(map_sql_error)?;

    info!(user_id = %user.profile.uuid, "user profile created");
    Ok(user)
}

fn update_interests_blocking(
    db: &DbManager,
    user_id: Uuid,
    interests: Vec<String>,
) -> Result<ReconcileOutcome> {
    let mut conn = db.get_connection()?;
    let tx =
        conn.transaction_with_behavior(TransactionBehavior::Immediate).map_err(map_sql_error)?;

    if !user_repository::profile_exists(&tx, user_id)? {
        return Err(MedMatchError::NotFound(format!("user profile {user_id} not found")));
    }

    let catalog = SqliteTagCatalog::new(&tx);
    let store = SqliteInterestStore::new(&tx);
    let outcome =
        reconcile(&store, &catalog, user_id, TagKind::Interest, &DesiredTags::from_names(interests))?;

    tx.commit().map_err(map_sql_error)?;

    info!(
        user_id = %user_id,
        added = outcome.added,
        updated = outcome.updated,
        removed = outcome.removed,
        "interests reconciled"
    );
    Ok(outcome)
}

fn update_languages_blocking(
    db: &DbManager,
    user_id: Uuid,
    languages: Vec<LanguageChoice>,
) -> Result<ReconcileOutcome> {
    let mut conn = db.get_connection()?;
    let tx =
        conn.transaction_with_behavior(TransactionBehavior::Immediate).map_err(map_sql_error)?;

    if !user_repository::profile_exists(&tx, user_id)? {
        return Err(MedMatchError::NotFound(format!("user profile {user_id} not found")));
    }

    let catalog = SqliteTagCatalog::new(&tx);
    let store = SqliteLanguageStore::new(&tx);
    let desired = DesiredTags::new(
        languages.into_iter().map(|choice| (choice.name, choice.proficiency)).collect(),
    );
    let outcome = reconcile(&store, &catalog, user_id, TagKind::Language, &desired)?;

    tx.commit().map_err(map_sql_error)?;

    info!(
        user_id = %user_id,
        added = outcome.added,
        updated = outcome.updated,
        removed = outcome.removed,
        "languages reconciled"
    );
    Ok(outcome)
}

fn deactivate_blocking(db: &DbManager, user_id: Uuid) -> Result<Option<UserProfile>> {
    let mut conn = db.get_connection()?;
    let tx =
        conn.transaction_with_behavior(TransactionBehavior::Immediate).map_err(map_sql_error)?;

    let touched = user_repository::set_inactive(&tx, user_id, Utc::now().timestamp())?;
    if touched == 0 {
        return Ok(None);
    }

    let profile = user_repository::find_by_uuid(&tx, user_id)?;
    tx.commit().map_err(map_sql_error)?;

    info!(user_id = %user_id, "user profile deactivated");
    Ok(profile)
}

fn get_blocking(db: &DbManager, user_id: Uuid) -> Result<Option<UserWithTags>> {
    let conn = db.get_connection()?;

    match user_repository::find_by_uuid(&conn, user_id)? {
        Some(profile) => Ok(Some(load_user_with_tags(&conn, profile)?)),
        None => Ok(None),
    }
}

fn list_blocking(db: &DbManager, filter: UserFilter) -> Result<Vec<UserWithTags>> {
    let conn = db.get_connection()?;

    let interest_ids = resolve_filter_ids(&conn, TagKind::Interest, &filter.interests)?;
    let language_ids = resolve_filter_ids(&conn, TagKind::Language, &filter.languages)?;

    let resolved = ResolvedUserFilter {
        role: filter.role,
        email: filter.email,
        active: filter.active,
        interest_ids,
        language_ids,
        tag_match: filter.tag_match,
    };

    let profiles = user_repository::list_profiles(&conn, &resolved)?;
    profiles.into_iter().map(|profile| load_user_with_tags(&conn, profile)).collect()
}

/// Resolve a filter dimension to catalog ids; unknown names drop out, and a
/// dimension that resolves to nothing is skipped entirely.
fn resolve_filter_ids(conn: &Connection, kind: TagKind, names: &[String]) -> Result<Vec<i64>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let entries = catalog_repository::resolve_names(conn, kind, names)?;
    Ok(entries.into_iter().map(|entry| entry.id).collect())
}

fn load_user_with_tags(conn: &Connection, profile: UserProfile) -> Result<UserWithTags> {
    let interests = user_repository::interests_of(conn, profile.uuid)?;
    let languages = user_repository::languages_of(conn, profile.uuid)?;
    Ok(UserWithTags { profile, interests, languages })
}

fn map_sql_error(err: rusqlite::Error) -> MedMatchError {
    MedMatchError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> MedMatchError {
    MedMatchError::Internal(format!("Task join error: {err}"))
}

// =============================================================================
// Tests
// =============================================================================
