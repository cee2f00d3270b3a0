//! Catalog administration service.
//!
//! Thin async facade over the interest and language catalogs. Deletions are
//! guarded by the schema: an entry still referenced by any user association
//! cannot be removed.

use std::sync::Arc;

use medmatch_domain::{MedMatchError, Result, TagEntry, TagId, TagKind};
use rusqlite::TransactionBehavior;
use tokio::task;
use tracing::info;

use crate::database::catalog_repository;
use crate::database::manager::DbManager;
use crate::errors::InfraError;

/// Administrative operations on the tag catalogs.
pub struct CatalogService {
    db: Arc<DbManager>,
}

impl CatalogService {
    /// Create a new service on top of the shared pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// List one catalog, ordered by name.
    pub async fn list(&self, kind: TagKind) -> Result<Vec<TagEntry>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<TagEntry>> {
            let conn = db.get_connection()?;
            catalog_repository::list_entries(&conn, kind)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Add a new entry and return it with its generated id.
    ///
    /// # Errors
    /// Returns `InvalidInput` for blank names and a `Database` error when the
    /// name already exists in the catalog.
    pub async fn add(&self, kind: TagKind, name: &str) -> Result<TagEntry> {
        if name.trim().is_empty() {
            return Err(MedMatchError::InvalidInput("tag name must not be empty".into()));
        }

        let db = Arc::clone(&self.db);
        let name = name.to_string();
        task::spawn_blocking(move || -> Result<TagEntry> {
            let conn = db.get_connection()?;
            let entry = catalog_repository::insert_entry(&conn, kind, &name)?;
            info!(kind = %kind, tag_id = entry.id, name = %entry.name, "catalog entry added");
            Ok(entry)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Delete an entry by id, returning the removed entry.
    ///
    /// Unknown ids come back as `None`. Entries still referenced by user
    /// associations fail with a foreign key violation. The lookup and the
    /// delete share one immediate transaction, so of two racing deleters
    /// exactly one receives the entry.
    pub async fn delete(&self, kind: TagKind, id: TagId) -> Result<Option<TagEntry>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<TagEntry>> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let Some(entry) = catalog_repository::find_entry(&tx, kind, id)? else {
                return Ok(None);
            };
            catalog_repository::delete_entry(&tx, kind, id)?;
            tx.commit().map_err(map_sql_error)?;

            info!(kind = %kind, tag_id = id, "catalog entry removed");
            Ok(Some(entry))
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_sql_error(err: rusqlite::Error) -> MedMatchError {
    MedMatchError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> MedMatchError {
    MedMatchError::Internal(format!("Task join error: {err}"))
}
