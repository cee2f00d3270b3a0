//! Tag catalog persistence and the name-resolution adapter.
//!
//! Both catalogs (interests and languages) share one schema shape, so every
//! accessor takes the [`TagKind`] and dispatches on the backing table.

use medmatch_core::TagCatalog;
use medmatch_domain::{MedMatchError, Result, TagEntry, TagId, TagKind};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::InfraError;

fn catalog_table(kind: TagKind) -> &'static str {
    match kind {
        TagKind::Interest => "interests",
        TagKind::Language => "languages",
    }
}

/// Resolve tag names against one catalog.
///
/// Unknown names are simply absent from the result. Entries come back
/// ordered by id.
pub fn resolve_names(conn: &Connection, kind: TagKind, names: &[String]) -> Result<Vec<TagEntry>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; names.len()].join(", ");
    let sql = format!(
        "SELECT id, name FROM {} WHERE name IN ({placeholders}) ORDER BY id ASC",
        catalog_table(kind)
    );

    let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(names.iter()), |row| {
            Ok(TagEntry { id: row.get(0)?, name: row.get(1)? })
        })
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;

    Ok(rows)
}

/// List a full catalog ordered by name.
pub fn list_entries(conn: &Connection, kind: TagKind) -> Result<Vec<TagEntry>> {
    let sql = format!("SELECT id, name FROM {} ORDER BY name ASC", catalog_table(kind));

    let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
    let rows = stmt
        .query_map([], |row| Ok(TagEntry { id: row.get(0)?, name: row.get(1)? }))
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;

    Ok(rows)
}

/// Insert a new entry and return it with its generated id.
pub fn insert_entry(conn: &Connection, kind: TagKind, name: &str) -> Result<TagEntry> {
    let sql = format!("INSERT INTO {} (name) VALUES (?1)", catalog_table(kind));
    conn.execute(&sql, params![name]).map_err(map_sql_error)?;

    Ok(TagEntry { id: conn.last_insert_rowid(), name: name.to_string() })
}

/// Fetch a single entry by id.
pub fn find_entry(conn: &Connection, kind: TagKind, id: TagId) -> Result<Option<TagEntry>> {
    let sql = format!("SELECT id, name FROM {} WHERE id = ?1", catalog_table(kind));

    conn.query_row(&sql, params![id], |row| Ok(TagEntry { id: row.get(0)?, name: row.get(1)? }))
        .optional()
        .map_err(map_sql_error)
}

/// Delete an entry by id, returning the number of rows removed.
///
/// Fails with a foreign key violation while any association still
/// references the entry.
pub fn delete_entry(conn: &Connection, kind: TagKind, id: TagId) -> Result<usize> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", catalog_table(kind));
    conn.execute(&sql, params![id]).map_err(map_sql_error)
}

/// Read-side adapter that resolves desired tag names inside the caller's
/// transaction.
pub struct SqliteTagCatalog<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteTagCatalog<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl TagCatalog for SqliteTagCatalog<'_> {
    fn resolve(&self, kind: TagKind, names: &[String]) -> Result<Vec<TagEntry>> {
        resolve_names(self.conn, kind, names)
    }
}

fn map_sql_error(err: rusqlite::Error) -> MedMatchError {
    MedMatchError::from(InfraError::from(err))
}
