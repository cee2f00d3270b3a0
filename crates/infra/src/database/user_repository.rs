//! User profile persistence helpers.
//!
//! Synchronous accessors that operate on a borrowed connection so the
//! services can compose them with the association stores inside a single
//! transaction. Listing builds its WHERE clause dynamically from a
//! [`ResolvedUserFilter`] whose tag names have already been resolved to
//! catalog ids.

use std::str::FromStr;

use chrono::NaiveDate;
use medmatch_domain::{
    LanguageSkill, MedMatchError, Proficiency, Result, TagEntry, TagId, TagMatchMode, UserProfile,
    UserRole,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use uuid::Uuid;

use crate::errors::InfraError;

/// Insert a full profile row.
pub fn insert_profile(conn: &Connection, profile: &UserProfile) -> Result<()> {
    let uuid = profile.uuid.to_string();
    let role = profile.role.to_string();
    let date_of_birth = profile.date_of_birth.map(|date| date.to_string());
    let is_active = bool_to_int(profile.is_active);

    let params: [&dyn ToSql; 12] = [
        &uuid,
        &profile.email,
        &profile.name,
        &role,
        &profile.location,
        &profile.experience_level,
        &date_of_birth,
        &profile.profile_picture_url,
        &profile.phone_number,
        &is_active,
        &profile.created_at,
        &profile.last_updated_at,
    ];

    conn.execute(
        "INSERT INTO user_profiles (
            uuid, email, name, role, location, experience_level, date_of_birth,
            profile_picture_url, phone_number, is_active, created_at, last_updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params.as_slice(),
    )
    .map_err(map_sql_error)?;

    Ok(())
}

/// Check whether a profile row exists for the given user.
pub fn profile_exists(conn: &Connection, user_id: Uuid) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM user_profiles WHERE uuid = ?1",
            params![user_id.to_string()],
            |row| row.get::<_, i32>(0),
        )
        .optional()
        .map_err(map_sql_error)?;

    Ok(found.is_some())
}

/// Fetch a profile by its uuid.
pub fn find_by_uuid(conn: &Connection, user_id: Uuid) -> Result<Option<UserProfile>> {
    conn.query_row(
        "SELECT uuid, email, name, role, location, experience_level, date_of_birth,
                profile_picture_url, phone_number, is_active, created_at, last_updated_at
         FROM user_profiles WHERE uuid = ?1",
        params![user_id.to_string()],
        map_profile_row,
    )
    .optional()
    .map_err(map_sql_error)
}

/// Fetch a profile by its unique email.
pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<UserProfile>> {
    conn.query_row(
        "SELECT uuid, email, name, role, location, experience_level, date_of_birth,
                profile_picture_url, phone_number, is_active, created_at, last_updated_at
         FROM user_profiles WHERE email = ?1",
        params![email],
        map_profile_row,
    )
    .optional()
    .map_err(map_sql_error)
}

/// Flip a profile to inactive, returning the number of rows touched.
pub fn set_inactive(conn: &Connection, user_id: Uuid, timestamp: i64) -> Result<usize> {
    conn.execute(
        "UPDATE user_profiles SET is_active = 0, last_updated_at = ?1 WHERE uuid = ?2",
        params![timestamp, user_id.to_string()],
    )
    .map_err(map_sql_error)
}

/// Filter with tag names already resolved to catalog ids.
///
/// Empty id vectors mean the dimension was either not requested or resolved
/// to nothing known, and is skipped entirely.
#[derive(Debug, Default)]
pub struct ResolvedUserFilter {
    pub role: Option<UserRole>,
    pub email: Option<String>,
    pub active: Option<bool>,
    pub interest_ids: Vec<TagId>,
    pub language_ids: Vec<TagId>,
    pub tag_match: TagMatchMode,
}

/// List profiles matching the filter, ordered by creation time then email.
pub fn list_profiles(conn: &Connection, filter: &ResolvedUserFilter) -> Result<Vec<UserProfile>> {
    let mut sql = String::from(
        "SELECT uuid, email, name, role, location, experience_level, date_of_birth,
                profile_picture_url, phone_number, is_active, created_at, last_updated_at
         FROM user_profiles",
    );

    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(role) = filter.role {
        params.push(Box::new(role.to_string()));
        clauses.push(format!("role = ?{}", params.len()));
    }
    if let Some(email) = &filter.email {
        params.push(Box::new(email.clone()));
        clauses.push(format!("email = ?{}", params.len()));
    }
    if let Some(active) = filter.active {
        params.push(Box::new(bool_to_int(active)));
        clauses.push(format!("is_active = ?{}", params.len()));
    }
    if !filter.interest_ids.is_empty() {
        clauses.push(tag_clause(
            "user_interests",
            "interest_id",
            &filter.interest_ids,
            filter.tag_match,
        ));
    }
    if !filter.language_ids.is_empty() {
        clauses.push(tag_clause(
            "user_languages",
            "language_id",
            &filter.language_ids,
            filter.tag_match,
        ));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at ASC, email ASC");

    let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params.iter().map(|param| &**param)), map_profile_row)
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;

    Ok(rows)
}

/// Interests of a user, sorted by name.
pub fn interests_of(conn: &Connection, user_id: Uuid) -> Result<Vec<TagEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT i.id, i.name FROM interests i
             JOIN user_interests ui ON ui.interest_id = i.id
             WHERE ui.user_uuid = ?1
             ORDER BY i.name ASC",
        )
        .map_err(map_sql_error)?;

    let rows = stmt
        .query_map(params![user_id.to_string()], |row| {
            Ok(TagEntry { id: row.get(0)?, name: row.get(1)? })
        })
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;

    Ok(rows)
}

/// Languages of a user with their proficiency, sorted by name.
pub fn languages_of(conn: &Connection, user_id: Uuid) -> Result<Vec<LanguageSkill>> {
    let mut stmt = conn
        .prepare(
            "SELECT l.id, l.name, ul.proficiency FROM languages l
             JOIN user_languages ul ON ul.language_id = l.id
             WHERE ul.user_uuid = ?1
             ORDER BY l.name ASC",
        )
        .map_err(map_sql_error)?;

    let rows = stmt
        .query_map(params![user_id.to_string()], |row| {
            Ok(LanguageSkill {
                language: TagEntry { id: row.get(0)?, name: row.get(1)? },
                proficiency: parse_proficiency(row.get(2)?)?,
            })
        })
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;

    Ok(rows)
}

// =============================================================================
// Helper Functions
// =============================================================================

// Ids are our own i64 catalog keys, so inlining them keeps the clause free of
// placeholder renumbering.
fn tag_clause(table: &str, id_column: &str, ids: &[TagId], mode: TagMatchMode) -> String {
    let id_list = ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    match mode {
        TagMatchMode::Any => format!(
            "EXISTS (SELECT 1 FROM {table} t WHERE t.user_uuid = user_profiles.uuid \
             AND t.{id_column} IN ({id_list}))"
        ),
        TagMatchMode::All => format!(
            "(SELECT COUNT(DISTINCT t.{id_column}) FROM {table} t \
             WHERE t.user_uuid = user_profiles.uuid AND t.{id_column} IN ({id_list})) = {}",
            ids.len()
        ),
    }
}

/// Map a row to a UserProfile
fn map_profile_row(row: &Row) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        uuid: parse_uuid(row.get(0)?)?,
        email: row.get(1)?,
        name: row.get(2)?,
        role: parse_role(row.get(3)?)?,
        location: row.get(4)?,
        experience_level: row.get(5)?,
        date_of_birth: parse_date(row.get(6)?)?,
        profile_picture_url: row.get(7)?,
        phone_number: row.get(8)?,
        is_active: int_to_bool(row.get(9)?),
        created_at: row.get(10)?,
        last_updated_at: row.get(11)?,
    })
}

fn parse_uuid(value: String) -> rusqlite::Result<Uuid> {
    Uuid::from_str(&value)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err)))
}

fn parse_role(value: String) -> rusqlite::Result<UserRole> {
    UserRole::from_str(&value)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, err.into()))
}

fn parse_date(value: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    value
        .map(|raw| {
            NaiveDate::from_str(&raw).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
            })
        })
        .transpose()
}

fn parse_proficiency(value: String) -> rusqlite::Result<Proficiency> {
    Proficiency::from_str(&value)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, err.into()))
}

fn map_sql_error(err: rusqlite::Error) -> MedMatchError {
    MedMatchError::from(InfraError::from(err))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64) -> bool {
    value != 0
}

// =============================================================================
// Tests
// =============================================================================
