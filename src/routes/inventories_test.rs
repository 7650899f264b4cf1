use super::*;
use crate::services::inventory::{FieldError, INVENTORY_KEY, ValidationErrors};

#[test]
fn inventory_error_to_status_maps_each_variant() {
    assert_eq!(inventory_error_to_status(&InventoryError::FondNotFound(1)), StatusCode::NOT_FOUND);
    assert_eq!(inventory_error_to_status(&InventoryError::AlreadyExists(2)), StatusCode::CONFLICT);
    assert_eq!(
        inventory_error_to_status(&InventoryError::Invalid(ValidationErrors::new())),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        inventory_error_to_status(&InventoryError::Database(sqlx::Error::PoolTimedOut)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn validation_errors_are_returned_as_field_map() {
    let errors = ValidationErrors::from([("type", FieldError::WrongValue)]);
    let (status, Json(body)) = inventory_error(InventoryError::Invalid(errors));
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["type"], "wrong value");
}

#[test]
fn duplicate_inventory_is_reported_under_inventory_key() {
    let (status, Json(body)) = inventory_error(InventoryError::AlreadyExists(2));
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["errors"][INVENTORY_KEY].is_string());
}

#[test]
fn missing_fond_uses_plain_error_body() {
    let (status, Json(body)) = inventory_error(InventoryError::FondNotFound(9));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "fond not found for institution 9");
}

#[test]
fn response_flattens_inventory_and_adds_media() {
    let inventory = Inventory {
        id: 1,
        number: 2,
        postfix: "a".into(),
        kind: "foto".into(),
        electronic: false,
        last_gv: 55,
        start_date: None,
        end_date: None,
        storage_term: "Ilgstoši glabājamās lietas".into(),
        items_per_period: None,
        total_items: Some(60),
        fond_id: 1,
        fond_code: "1".into(),
    };
    let json = serde_json::to_value(to_response(inventory)).unwrap();
    assert_eq!(json["number"], 2);
    assert_eq!(json["type"], "foto");
    assert_eq!(json["media"], "papīrs");
}
