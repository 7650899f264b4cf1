//! Institution service — archive-creating organisations within a project.
//!
//! DESIGN
//! ======
//! Registration number and name identify an institution and are immutable
//! once created. The creator and signer fields are filled in later through
//! `update_details`, which never touches the identifying columns.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::db::retry::{Transient, with_retry};
use crate::db::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION, has_sqlstate};
use crate::services::{fits, required_text};
use crate::state::AppState;

pub const REG_NR_MAX: i64 = 999_999_999_999;
pub const NAME_MAX_CHARS: usize = 200;
pub const PERSON_MAX_CHARS: usize = 30;
pub const POSITION_MAX_CHARS: usize = 200;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InstitutionError {
    #[error("institution not found: {0}")]
    NotFound(i64),
    #[error("project not found: {0}")]
    ProjectNotFound(i64),
    #[error("institution already exists")]
    AlreadyExists,
    #[error("invalid value for {0}")]
    InvalidValue(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Transient for InstitutionError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Database(e) if e.is_transient())
    }
}

/// Row of the `institutions` table.
#[derive(Debug, Clone, Serialize)]
pub struct Institution {
    pub id: i64,
    pub reg_nr: i64,
    pub name: String,
    pub creator: String,
    pub creator_position: String,
    pub signer: String,
    pub signer_position: String,
    pub project_id: i64,
}

impl fmt::Display for Institution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.reg_nr)
    }
}

/// Fields a client may change after creation. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstitutionDetails {
    pub creator: Option<String>,
    pub creator_position: Option<String>,
    pub signer: Option<String>,
    pub signer_position: Option<String>,
}

type InstitutionTuple = (i64, i64, String, String, String, String, String, i64);

const INSTITUTION_COLUMNS: &str =
    "id, reg_nr, name, creator, creator_position, signer, signer_position, project_id";

fn from_tuple(
    (id, reg_nr, name, creator, creator_position, signer, signer_position, project_id): InstitutionTuple,
) -> Institution {
    Institution { id, reg_nr, name, creator, creator_position, signer, signer_position, project_id }
}

/// Check a registration number and name, returning the trimmed name.
///
/// # Errors
///
/// Returns `InvalidValue` naming the first offending field.
pub fn validate_identity(reg_nr: i64, name: &str) -> Result<&str, InstitutionError> {
    if !(1..=REG_NR_MAX).contains(&reg_nr) {
        return Err(InstitutionError::InvalidValue("reg_nr"));
    }
    required_text(name, NAME_MAX_CHARS).ok_or(InstitutionError::InvalidValue("name"))
}

/// Check the length limits of every provided detail field.
///
/// # Errors
///
/// Returns `InvalidValue` naming the first offending field.
pub fn validate_details(details: &InstitutionDetails) -> Result<(), InstitutionError> {
    let checks = [
        ("creator", details.creator.as_deref(), PERSON_MAX_CHARS),
        ("creator_position", details.creator_position.as_deref(), POSITION_MAX_CHARS),
        ("signer", details.signer.as_deref(), PERSON_MAX_CHARS),
        ("signer_position", details.signer_position.as_deref(), POSITION_MAX_CHARS),
    ];
    for (field, value, max_chars) in checks {
        if value.is_some_and(|v| !fits(v, max_chars)) {
            return Err(InstitutionError::InvalidValue(field));
        }
    }
    Ok(())
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create a new institution in a project.
///
/// # Errors
///
/// Returns `InvalidValue`, `AlreadyExists` when the registration number or
/// name is taken, `ProjectNotFound`, or a database error.
pub async fn add_institution(
    state: &AppState,
    reg_nr: i64,
    name: &str,
    project_id: i64,
) -> Result<Institution, InstitutionError> {
    let name = validate_identity(reg_nr, name)?;
    let institution = with_retry(state.db_retry, "add_institution", || {
        insert_institution(&state.pool, reg_nr, name, project_id)
    })
    .await?;
    info!(institution_id = institution.id, %institution, project_id, "institution created");
    Ok(institution)
}

/// Update creator/signer details. Registration number and name are never changed.
///
/// # Errors
///
/// Returns `InvalidValue`, `NotFound`, or a database error.
pub async fn update_details(
    state: &AppState,
    id: i64,
    details: &InstitutionDetails,
) -> Result<Institution, InstitutionError> {
    validate_details(details)?;
    with_retry(state.db_retry, "update_institution_details", || async move {
        sqlx::query_as::<_, InstitutionTuple>(&format!(
            "UPDATE institutions SET
                creator = COALESCE($2, creator),
                creator_position = COALESCE($3, creator_position),
                signer = COALESCE($4, signer),
                signer_position = COALESCE($5, signer_position)
             WHERE id = $1
             RETURNING {INSTITUTION_COLUMNS}"
        ))
        .bind(id)
        .bind(details.creator.as_deref())
        .bind(details.creator_position.as_deref())
        .bind(details.signer.as_deref())
        .bind(details.signer_position.as_deref())
        .fetch_optional(&state.pool)
        .await?
        .map(from_tuple)
        .ok_or(InstitutionError::NotFound(id))
    })
    .await
}

/// Load a single institution.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_institution(state: &AppState, id: i64) -> Result<Institution, InstitutionError> {
    with_retry(state.db_retry, "get_institution", || fetch_institution(&state.pool, id)).await
}

/// List institutions, optionally restricted to one project.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_institutions(
    state: &AppState,
    project_id: Option<i64>,
) -> Result<Vec<Institution>, InstitutionError> {
    with_retry(state.db_retry, "list_institutions", || async move {
        let rows = sqlx::query_as::<_, InstitutionTuple>(&format!(
            "SELECT {INSTITUTION_COLUMNS} FROM institutions
             WHERE $1::BIGINT IS NULL OR project_id = $1
             ORDER BY name ASC"
        ))
        .bind(project_id)
        .fetch_all(&state.pool)
        .await?;
        Ok::<_, InstitutionError>(rows.into_iter().map(from_tuple).collect())
    })
    .await
}

async fn insert_institution(
    pool: &PgPool,
    reg_nr: i64,
    name: &str,
    project_id: i64,
) -> Result<Institution, InstitutionError> {
    let project_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
        .bind(project_id)
        .fetch_one(pool)
        .await?;
    if !project_exists {
        return Err(InstitutionError::ProjectNotFound(project_id));
    }

    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM institutions WHERE reg_nr = $1 OR name = $2)",
    )
    .bind(reg_nr)
    .bind(name)
    .fetch_one(pool)
    .await?;
    if taken {
        return Err(InstitutionError::AlreadyExists);
    }

    sqlx::query_as::<_, InstitutionTuple>(&format!(
        "INSERT INTO institutions (reg_nr, name, project_id) VALUES ($1, $2, $3)
         RETURNING {INSTITUTION_COLUMNS}"
    ))
    .bind(reg_nr)
    .bind(name)
    .bind(project_id)
    .fetch_one(pool)
    .await
    .map(from_tuple)
    .map_err(|e| {
        if has_sqlstate(&e, UNIQUE_VIOLATION) {
            InstitutionError::AlreadyExists
        } else if has_sqlstate(&e, FOREIGN_KEY_VIOLATION) {
            InstitutionError::ProjectNotFound(project_id)
        } else {
            InstitutionError::Database(e)
        }
    })
}

pub(crate) async fn fetch_institution(pool: &PgPool, id: i64) -> Result<Institution, InstitutionError> {
    sqlx::query_as::<_, InstitutionTuple>(&format!(
        "SELECT {INSTITUTION_COLUMNS} FROM institutions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .map(from_tuple)
    .ok_or(InstitutionError::NotFound(id))
}

#[cfg(test)]
#[path = "institution_test.rs"]
mod tests;
