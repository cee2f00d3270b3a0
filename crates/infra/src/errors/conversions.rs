//! Conversions from external infrastructure errors into domain errors.

use medmatch_domain::MedMatchError;
use r2d2::Error as PoolError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MedMatchError);

impl From<InfraError> for MedMatchError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MedMatchError> for InfraError {
    fn from(value: MedMatchError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoMedMatchError {
    fn into_medmatch(self) -> MedMatchError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → MedMatchError */
/* -------------------------------------------------------------------------- */

/// Map a raw SQLite failure by primary and extended result code.
///
/// Constraint violations keep a recognisable message because callers surface
/// them to users (duplicate email, referenced catalog entry).
fn map_sqlite_failure(err: rusqlite::ffi::Error, message: &str) -> MedMatchError {
    use rusqlite::ffi::{SQLITE_CONSTRAINT_FOREIGNKEY, SQLITE_CONSTRAINT_UNIQUE};
    use rusqlite::ErrorCode;

    let detail = match (err.code, err.extended_code) {
        (ErrorCode::DatabaseBusy, _) => "database is busy".to_string(),
        (ErrorCode::DatabaseLocked, _) => "database is locked".to_string(),
        (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_UNIQUE) => {
            "unique constraint violation".to_string()
        }
        (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_FOREIGNKEY) => {
            "foreign key constraint violation".to_string()
        }
        (code, extended) => format!("sqlite failure {code:?} (code {extended}): {message}"),
    };
    MedMatchError::Database(detail)
}

impl IntoMedMatchError for SqlError {
    fn into_medmatch(self) -> MedMatchError {
        match self {
            SqlError::SqliteFailure(err, maybe_message) => {
                map_sqlite_failure(err, maybe_message.as_deref().unwrap_or_default())
            }
            SqlError::QueryReturnedNoRows => {
                MedMatchError::NotFound("no rows returned by query".into())
            }
            SqlError::FromSqlConversionFailure(_, _, cause) => {
                MedMatchError::Database(format!("stored value failed to convert: {cause}"))
            }
            SqlError::InvalidColumnType(_, _, ty) => {
                MedMatchError::Database(format!("unexpected column type: {ty}"))
            }
            SqlError::Utf8Error(_) => {
                MedMatchError::Database("non-UTF-8 text returned from sqlite".into())
            }
            SqlError::InvalidParameterName(name) => {
                MedMatchError::Database(format!("invalid parameter name: {name}"))
            }
            SqlError::InvalidPath(path) => {
                MedMatchError::Database(format!("invalid database path: {}", path.display()))
            }
            SqlError::InvalidQuery => MedMatchError::Database("invalid SQL query".into()),
            other => MedMatchError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_medmatch())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → MedMatchError */
/* -------------------------------------------------------------------------- */

impl IntoMedMatchError for PoolError {
    fn into_medmatch(self) -> MedMatchError {
        MedMatchError::Database(format!("connection pool error: {self}"))
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(value.into_medmatch())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
