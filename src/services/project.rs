//! Project service — creation, lookup and validation status.
//!
//! DESIGN
//! ======
//! A project groups the institutions whose inventories are prepared together.
//! Names are unique; uniqueness is checked up front for a clear error and
//! enforced again by the table constraint for concurrent inserts.

use std::fmt;

use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;

use crate::db::retry::{Transient, with_retry};
use crate::db::{UNIQUE_VIOLATION, has_sqlstate};
use crate::services::required_text;
use crate::state::AppState;

pub const PROJECT_NAME_MAX_CHARS: usize = 50;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project not found: {0}")]
    NotFound(i64),
    #[error("project already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid project name")]
    InvalidName,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Transient for ProjectError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Database(e) if e.is_transient())
    }
}

/// Row of the `projects` table.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub validated: bool,
}

impl Project {
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.validated
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

type ProjectTuple = (i64, String, OffsetDateTime, bool);

fn from_tuple((id, name, created_at, validated): ProjectTuple) -> Project {
    Project { id, name, created_at, validated }
}

/// Trimmed project name, or `InvalidName` when blank or too long.
///
/// # Errors
///
/// Returns `ProjectError::InvalidName` for names that cannot be stored.
pub fn validate_project_name(name: &str) -> Result<&str, ProjectError> {
    required_text(name, PROJECT_NAME_MAX_CHARS).ok_or(ProjectError::InvalidName)
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create a new project.
///
/// # Errors
///
/// Returns `InvalidName`, `AlreadyExists`, or a database error.
pub async fn add_project(state: &AppState, name: &str) -> Result<Project, ProjectError> {
    let name = validate_project_name(name)?;
    let project = with_retry(state.db_retry, "add_project", || insert_project(&state.pool, name)).await?;
    info!(project_id = project.id, name = %project.name, "project created");
    Ok(project)
}

/// Load a single project.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_project(state: &AppState, id: i64) -> Result<Project, ProjectError> {
    with_retry(state.db_retry, "get_project", || fetch_project(&state.pool, id)).await
}

/// List all projects, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_projects(state: &AppState) -> Result<Vec<Project>, ProjectError> {
    with_retry(state.db_retry, "list_projects", || async move {
        let rows = sqlx::query_as::<_, ProjectTuple>(
            "SELECT id, name, created_at, validated FROM projects ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&state.pool)
        .await?;
        Ok::<_, ProjectError>(rows.into_iter().map(from_tuple).collect())
    })
    .await
}

/// Mark a project as validated. Marking an already validated project is a no-op.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn change_validation_status(state: &AppState, id: i64) -> Result<Project, ProjectError> {
    let project = with_retry(state.db_retry, "change_validation_status", || async move {
        sqlx::query_as::<_, ProjectTuple>(
            "UPDATE projects SET validated = TRUE WHERE id = $1
             RETURNING id, name, created_at, validated",
        )
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .map(from_tuple)
        .ok_or(ProjectError::NotFound(id))
    })
    .await?;
    info!(project_id = id, validated = project.is_validated(), "project validation status changed");
    Ok(project)
}

async fn insert_project(pool: &PgPool, name: &str) -> Result<Project, ProjectError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM projects WHERE name = $1)")
        .bind(name)
        .fetch_one(pool)
        .await?;
    if exists {
        return Err(ProjectError::AlreadyExists(name.to_owned()));
    }

    sqlx::query_as::<_, ProjectTuple>(
        "INSERT INTO projects (name) VALUES ($1)
         RETURNING id, name, created_at, validated",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .map(from_tuple)
    .map_err(|e| {
        if has_sqlstate(&e, UNIQUE_VIOLATION) {
            ProjectError::AlreadyExists(name.to_owned())
        } else {
            ProjectError::Database(e)
        }
    })
}

pub(crate) async fn fetch_project(pool: &PgPool, id: i64) -> Result<Project, ProjectError> {
    sqlx::query_as::<_, ProjectTuple>("SELECT id, name, created_at, validated FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(from_tuple)
        .ok_or(ProjectError::NotFound(id))
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
