use super::*;

fn sample_new_fond() -> NewFond {
    NewFond {
        fond_code: " LVVA-400 ".into(),
        arch_abbreviation: "LNA".into(),
        arch_title: "Valsts arhīvs".into(),
        fond_number: 400,
        fond_title: "Valsts meži".into(),
        subfond: false,
    }
}

#[test]
fn fond_displays_as_code() {
    let fond = Fond {
        institution_id: 1,
        fond_code: "1".into(),
        arch_abbreviation: "LNA".into(),
        arch_title: "Valsts arhivs".into(),
        fond_number: 400,
        fond_title: "Valsts mezi".into(),
        subfond: false,
    };
    assert_eq!(fond.to_string(), "1");
}

#[test]
fn validate_new_fond_trims_text_fields() {
    let validated = validate_new_fond(&sample_new_fond()).unwrap();
    assert_eq!(validated.fond_code, "LVVA-400");
    assert_eq!(validated.fond_number, 400);
    assert!(!validated.subfond);
}

#[test]
fn validate_new_fond_rejects_long_abbreviation() {
    let new = NewFond { arch_abbreviation: "LVVALNA".into(), ..sample_new_fond() };
    assert!(matches!(validate_new_fond(&new), Err(FondError::InvalidValue("arch_abbreviation"))));
}

#[test]
fn validate_new_fond_rejects_blank_code() {
    let new = NewFond { fond_code: "  ".into(), ..sample_new_fond() };
    assert!(matches!(validate_new_fond(&new), Err(FondError::InvalidValue("fond_code"))));
}

#[test]
fn validate_new_fond_rejects_non_positive_number() {
    let new = NewFond { fond_number: 0, ..sample_new_fond() };
    assert!(matches!(validate_new_fond(&new), Err(FondError::InvalidValue("fond_number"))));
}

#[test]
fn new_fond_subfond_defaults_to_false() {
    let new: NewFond = serde_json::from_str(
        r#"{"fond_code":"1","arch_abbreviation":"LNA","arch_title":"Valsts arhivs","fond_number":400,"fond_title":"Valsts mezi"}"#,
    )
    .unwrap();
    assert!(!new.subfond);
}

#[test]
fn new_fond_rejects_wrong_number_type() {
    let parsed = serde_json::from_str::<NewFond>(
        r#"{"fond_code":"1","arch_abbreviation":"LNA","arch_title":"A","fond_number":"400","fond_title":"T"}"#,
    );
    assert!(parsed.is_err());
}

#[test]
fn primary_key_conflict_means_institution_has_fond() {
    assert!(matches!(
        unique_conflict(Some("fonds_pkey"), 7, "1"),
        FondError::InstitutionHasFond(7)
    ));
}

#[test]
fn code_conflict_means_fond_exists() {
    assert!(matches!(
        unique_conflict(Some("fonds_fond_code_key"), 7, "1"),
        FondError::AlreadyExists(code) if code == "1"
    ));
    assert!(matches!(unique_conflict(None, 7, "1"), FondError::AlreadyExists(_)));
}

// =============================================================================
// Live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::services::institution::add_institution;
    use crate::services::project::add_project;
    use crate::state::test_helpers::{live_app_state, unique_reg_nr, unique_suffix};

    #[tokio::test]
    async fn add_fond_enforces_one_fond_per_institution_and_unique_code() {
        let state = live_app_state().await;
        let suffix = unique_suffix();
        let project = add_project(&state, &format!("fond-{suffix}")).await.unwrap();
        let institution = add_institution(&state, unique_reg_nr(), &format!("inst-{suffix}"), project.id)
            .await
            .unwrap();

        let new = NewFond { fond_code: format!("code-{suffix}"), ..sample_new_fond() };
        let fond = add_fond(&state, institution.id, &new).await.unwrap();
        assert_eq!(fond.institution_id, institution.id);

        let second = NewFond { fond_code: format!("other-{suffix}"), ..sample_new_fond() };
        assert!(matches!(
            add_fond(&state, institution.id, &second).await,
            Err(FondError::InstitutionHasFond(_))
        ));
        assert!(matches!(add_fond(&state, institution.id, &new).await, Err(FondError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn add_fond_unknown_institution() {
        let state = live_app_state().await;
        let new = NewFond { fond_code: format!("orphan-{}", unique_suffix()), ..sample_new_fond() };
        assert!(matches!(
            add_fond(&state, i64::MAX, &new).await,
            Err(FondError::InstitutionNotFound(_))
        ));
    }
}
