use super::*;

fn sample_project(validated: bool) -> Project {
    Project {
        id: 1,
        name: "test".into(),
        created_at: OffsetDateTime::UNIX_EPOCH,
        validated,
    }
}

// =============================================================================
// validate_project_name
// =============================================================================

#[test]
fn validate_project_name_accepts_and_trims() {
    assert_eq!(validate_project_name("  new_project ").unwrap(), "new_project");
}

#[test]
fn validate_project_name_rejects_blank() {
    assert!(matches!(validate_project_name(""), Err(ProjectError::InvalidName)));
    assert!(matches!(validate_project_name("   "), Err(ProjectError::InvalidName)));
}

#[test]
fn validate_project_name_enforces_length_limit() {
    let exact = "a".repeat(PROJECT_NAME_MAX_CHARS);
    assert!(validate_project_name(&exact).is_ok());

    let long = "a".repeat(PROJECT_NAME_MAX_CHARS + 1);
    assert!(matches!(validate_project_name(&long), Err(ProjectError::InvalidName)));
}

#[test]
fn validate_project_name_counts_characters_not_bytes() {
    let latvian = "ā".repeat(PROJECT_NAME_MAX_CHARS);
    assert!(validate_project_name(&latvian).is_ok());
}

// =============================================================================
// Project
// =============================================================================

#[test]
fn project_displays_as_name() {
    assert_eq!(sample_project(false).to_string(), "test");
}

#[test]
fn project_validation_flag() {
    assert!(!sample_project(false).is_validated());
    assert!(sample_project(true).is_validated());
}

#[test]
fn project_serializes_created_at_as_rfc3339() {
    let json = serde_json::to_value(sample_project(false)).unwrap();
    assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
    assert_eq!(json["validated"], false);
}

#[test]
fn only_database_errors_are_transient() {
    assert!(ProjectError::Database(sqlx::Error::PoolTimedOut).is_transient());
    assert!(!ProjectError::InvalidName.is_transient());
    assert!(!ProjectError::AlreadyExists("x".into()).is_transient());
}

#[tokio::test]
async fn add_project_rejects_invalid_name_without_touching_database() {
    let state = crate::state::test_helpers::test_app_state();
    let result = add_project(&state, &"a".repeat(51)).await;
    assert!(matches!(result, Err(ProjectError::InvalidName)));
}

// =============================================================================
// Live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::state::test_helpers::{live_app_state, unique_suffix};

    #[tokio::test]
    async fn add_project_then_duplicate_is_rejected() {
        let state = live_app_state().await;
        let name = format!("project-{}", unique_suffix());

        let project = add_project(&state, &name).await.expect("project should be created");
        assert_eq!(project.name, name);
        assert!(!project.is_validated());

        let duplicate = add_project(&state, &name).await;
        assert!(matches!(duplicate, Err(ProjectError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn change_validation_status_sets_flag() {
        let state = live_app_state().await;
        let project = add_project(&state, &format!("validate-{}", unique_suffix()))
            .await
            .expect("project should be created");

        let updated = change_validation_status(&state, project.id).await.expect("should validate");
        assert!(updated.is_validated());

        let again = change_validation_status(&state, project.id).await.expect("should stay validated");
        assert!(again.is_validated());
    }

    #[tokio::test]
    async fn change_validation_status_unknown_project() {
        let state = live_app_state().await;
        let result = change_validation_status(&state, i64::MAX).await;
        assert!(matches!(result, Err(ProjectError::NotFound(_))));
    }
}
