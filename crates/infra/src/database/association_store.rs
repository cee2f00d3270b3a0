//! SQLite adapters for the user-tag association stores.
//!
//! Both adapters borrow the caller's connection. Inside a service that
//! borrow is the open transaction, so nothing here commits; the caller
//! decides the fate of every write.

use std::str::FromStr;

use medmatch_core::AssociationStore;
use medmatch_domain::{MedMatchError, Proficiency, Result, TagId, TagLink};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::errors::InfraError;

/// Store for the attribute-free user-interest associations.
pub struct SqliteInterestStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteInterestStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl AssociationStore for SqliteInterestStore<'_> {
    type Attr = ();

    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<TagLink<()>>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT interest_id FROM user_interests
                 WHERE user_uuid = ?1 ORDER BY interest_id ASC",
            )
            .map_err(map_sql_error)?;

        let ids = stmt
            .query_map(params![user_id.to_string()], |row| row.get::<_, TagId>(0))
            .map_err(map_sql_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(map_sql_error)?;

        Ok(ids.into_iter().map(|tag_id| TagLink { user_id, tag_id, attr: () }).collect())
    }

    fn insert_many(&self, user_id: Uuid, links: &[(TagId, ())]) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT INTO user_interests (user_uuid, interest_id) VALUES (?1, ?2)")
            .map_err(map_sql_error)?;

        let uuid = user_id.to_string();
        for &(tag_id, ()) in links {
            stmt.execute(params![uuid, tag_id]).map_err(map_sql_error)?;
        }

        Ok(())
    }

    fn update_attribute(&self, user_id: Uuid, tag_id: TagId, _attr: &()) -> Result<()> {
        // Interests carry no attribute; the contract still requires the row
        // to exist.
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM user_interests WHERE user_uuid = ?1 AND interest_id = ?2",
                params![user_id.to_string(), tag_id],
                |row| row.get::<_, i32>(0),
            )
            .optional()
            .map_err(map_sql_error)?;

        if found.is_none() {
            return Err(MedMatchError::Database(format!(
                "no interest association to update for user {user_id} and tag {tag_id}"
            )));
        }

        Ok(())
    }

    fn remove_many(&self, user_id: Uuid, tag_ids: &[TagId]) -> Result<()> {
        // An empty IN () list is invalid SQL.
        if tag_ids.is_empty() {
            return Ok(());
        }

        let id_list = tag_ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        let sql =
            format!("DELETE FROM user_interests WHERE user_uuid = ?1 AND interest_id IN ({id_list})");
        self.conn.execute(&sql, params![user_id.to_string()]).map_err(map_sql_error)?;

        Ok(())
    }
}

/// Store for the user-language associations and their proficiency attribute.
pub struct SqliteLanguageStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteLanguageStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl AssociationStore for SqliteLanguageStore<'_> {
    type Attr = Proficiency;

    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<TagLink<Proficiency>>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT language_id, proficiency FROM user_languages
                 WHERE user_uuid = ?1 ORDER BY language_id ASC",
            )
            .map_err(map_sql_error)?;

        let rows = stmt
            .query_map(params![user_id.to_string()], |row| {
                Ok((row.get::<_, TagId>(0)?, parse_proficiency(row.get(1)?)?))
            })
            .map_err(map_sql_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(map_sql_error)?;

        Ok(rows.into_iter().map(|(tag_id, attr)| TagLink { user_id, tag_id, attr }).collect())
    }

    fn insert_many(&self, user_id: Uuid, links: &[(TagId, Proficiency)]) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare(
                "INSERT INTO user_languages (user_uuid, language_id, proficiency)
                 VALUES (?1, ?2, ?3)",
            )
            .map_err(map_sql_error)?;

        let uuid = user_id.to_string();
        for (tag_id, proficiency) in links {
            stmt.execute(params![uuid, tag_id, proficiency.to_string()]).map_err(map_sql_error)?;
        }

        Ok(())
    }

    fn update_attribute(&self, user_id: Uuid, tag_id: TagId, attr: &Proficiency) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE user_languages SET proficiency = ?1
                 WHERE user_uuid = ?2 AND language_id = ?3",
                params![attr.to_string(), user_id.to_string(), tag_id],
            )
            .map_err(map_sql_error)?;

        if changed == 0 {
            return Err(MedMatchError::Database(format!(
                "no language association to update for user {user_id} and tag {tag_id}"
            )));
        }

        Ok(())
    }

    fn remove_many(&self, user_id: Uuid, tag_ids: &[TagId]) -> Result<()> {
        // An empty IN () list is invalid SQL.
        if tag_ids.is_empty() {
            return Ok(());
        }

        let id_list = tag_ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        let sql =
            format!("DELETE FROM user_languages WHERE user_uuid = ?1 AND language_id IN ({id_list})");
        self.conn.execute(&sql, params![user_id.to_string()]).map_err(map_sql_error)?;

        Ok(())
    }
}

fn parse_proficiency(value: String) -> rusqlite::Result<Proficiency> {
    Proficiency::from_str(&value)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, err.into()))
}

fn map_sql_error(err: rusqlite::Error) -> MedMatchError {
    MedMatchError::from(InfraError::from(err))
}

// =============================================================================
// Tests
// =============================================================================
