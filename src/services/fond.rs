//! Fond service — the archival fond attached to an institution.
//!
//! DESIGN
//! ======
//! Each institution owns at most one fond; the institution id doubles as the
//! fond's primary key. Fond codes are unique across all institutions.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::db::retry::{Transient, with_retry};
use crate::db::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION, has_sqlstate, violated_constraint};
use crate::services::required_text;
use crate::state::AppState;

pub const FOND_CODE_MAX_CHARS: usize = 30;
pub const ARCH_ABBREVIATION_MAX_CHARS: usize = 5;
pub const ARCH_TITLE_MAX_CHARS: usize = 100;
pub const FOND_TITLE_MAX_CHARS: usize = 500;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FondError {
    #[error("fond not found for institution {0}")]
    NotFound(i64),
    #[error("institution not found: {0}")]
    InstitutionNotFound(i64),
    #[error("fond already exists: {0}")]
    AlreadyExists(String),
    #[error("institution {0} already has a fond")]
    InstitutionHasFond(i64),
    #[error("invalid value for {0}")]
    InvalidValue(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Transient for FondError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Database(e) if e.is_transient())
    }
}

/// Row of the `fonds` table.
#[derive(Debug, Clone, Serialize)]
pub struct Fond {
    pub institution_id: i64,
    pub fond_code: String,
    pub arch_abbreviation: String,
    pub arch_title: String,
    pub fond_number: i32,
    pub fond_title: String,
    pub subfond: bool,
}

impl fmt::Display for Fond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fond_code)
    }
}

/// Payload for creating a fond.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFond {
    pub fond_code: String,
    pub arch_abbreviation: String,
    pub arch_title: String,
    pub fond_number: i32,
    pub fond_title: String,
    #[serde(default)]
    pub subfond: bool,
}

type FondTuple = (i64, String, String, String, i32, String, bool);

const FOND_COLUMNS: &str = "institution_id, fond_code, arch_abbreviation, arch_title, fond_number, fond_title, subfond";

fn from_tuple(
    (institution_id, fond_code, arch_abbreviation, arch_title, fond_number, fond_title, subfond): FondTuple,
) -> Fond {
    Fond { institution_id, fond_code, arch_abbreviation, arch_title, fond_number, fond_title, subfond }
}

/// Check every field of `new` and return a copy with text fields trimmed.
///
/// # Errors
///
/// Returns `InvalidValue` naming the first offending field.
pub fn validate_new_fond(new: &NewFond) -> Result<NewFond, FondError> {
    let text = |value: &str, max_chars: usize, field: &'static str| {
        required_text(value, max_chars)
            .map(str::to_owned)
            .ok_or(FondError::InvalidValue(field))
    };

    let fond_code = text(&new.fond_code, FOND_CODE_MAX_CHARS, "fond_code")?;
    let arch_abbreviation = text(&new.arch_abbreviation, ARCH_ABBREVIATION_MAX_CHARS, "arch_abbreviation")?;
    let arch_title = text(&new.arch_title, ARCH_TITLE_MAX_CHARS, "arch_title")?;
    if new.fond_number <= 0 {
        return Err(FondError::InvalidValue("fond_number"));
    }
    let fond_title = text(&new.fond_title, FOND_TITLE_MAX_CHARS, "fond_title")?;

    Ok(NewFond {
        fond_code,
        arch_abbreviation,
        arch_title,
        fond_number: new.fond_number,
        fond_title,
        subfond: new.subfond,
    })
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create the fond of an institution.
///
/// # Errors
///
/// Returns `InvalidValue`, `InstitutionNotFound`, `AlreadyExists` when the
/// code is taken, `InstitutionHasFond`, or a database error.
pub async fn add_fond(state: &AppState, institution_id: i64, new: &NewFond) -> Result<Fond, FondError> {
    let new = validate_new_fond(new)?;
    let fond = with_retry(state.db_retry, "add_fond", || insert_fond(&state.pool, institution_id, &new)).await?;
    info!(institution_id, fond_code = %fond, "fond created");
    Ok(fond)
}

/// Load the fond of an institution.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_fond(state: &AppState, institution_id: i64) -> Result<Fond, FondError> {
    with_retry(state.db_retry, "get_fond", || fetch_fond(&state.pool, institution_id)).await
}

/// List all fonds ordered by code.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_fonds(state: &AppState) -> Result<Vec<Fond>, FondError> {
    with_retry(state.db_retry, "list_fonds", || async move {
        let rows = sqlx::query_as::<_, FondTuple>(&format!("SELECT {FOND_COLUMNS} FROM fonds ORDER BY fond_code ASC"))
            .fetch_all(&state.pool)
            .await?;
        Ok::<_, FondError>(rows.into_iter().map(from_tuple).collect())
    })
    .await
}

async fn insert_fond(pool: &PgPool, institution_id: i64, new: &NewFond) -> Result<Fond, FondError> {
    let (institution_exists, has_fond, code_taken) = sqlx::query_as::<_, (bool, bool, bool)>(
        "SELECT
            EXISTS(SELECT 1 FROM institutions WHERE id = $1),
            EXISTS(SELECT 1 FROM fonds WHERE institution_id = $1),
            EXISTS(SELECT 1 FROM fonds WHERE fond_code = $2)",
    )
    .bind(institution_id)
    .bind(&new.fond_code)
    .fetch_one(pool)
    .await?;

    if !institution_exists {
        return Err(FondError::InstitutionNotFound(institution_id));
    }
    if code_taken {
        return Err(FondError::AlreadyExists(new.fond_code.clone()));
    }
    if has_fond {
        return Err(FondError::InstitutionHasFond(institution_id));
    }

    sqlx::query_as::<_, FondTuple>(&format!(
        "INSERT INTO fonds ({FOND_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {FOND_COLUMNS}"
    ))
    .bind(institution_id)
    .bind(&new.fond_code)
    .bind(&new.arch_abbreviation)
    .bind(&new.arch_title)
    .bind(new.fond_number)
    .bind(&new.fond_title)
    .bind(new.subfond)
    .fetch_one(pool)
    .await
    .map(from_tuple)
    .map_err(|e| {
        if has_sqlstate(&e, UNIQUE_VIOLATION) {
            unique_conflict(violated_constraint(&e), institution_id, &new.fond_code)
        } else if has_sqlstate(&e, FOREIGN_KEY_VIOLATION) {
            FondError::InstitutionNotFound(institution_id)
        } else {
            FondError::Database(e)
        }
    })
}

/// Primary key name of `fonds`; its column is the owning institution id.
const FONDS_PKEY: &str = "fonds_pkey";

/// Error for a unique violation raised by a concurrent insert.
fn unique_conflict(constraint: Option<&str>, institution_id: i64, fond_code: &str) -> FondError {
    if constraint == Some(FONDS_PKEY) {
        FondError::InstitutionHasFond(institution_id)
    } else {
        FondError::AlreadyExists(fond_code.to_owned())
    }
}

pub(crate) async fn fetch_fond(pool: &PgPool, institution_id: i64) -> Result<Fond, FondError> {
    sqlx::query_as::<_, FondTuple>(&format!("SELECT {FOND_COLUMNS} FROM fonds WHERE institution_id = $1"))
        .bind(institution_id)
        .fetch_optional(pool)
        .await?
        .map(from_tuple)
        .ok_or(FondError::NotFound(institution_id))
}

#[cfg(test)]
#[path = "fond_test.rs"]
mod tests;
