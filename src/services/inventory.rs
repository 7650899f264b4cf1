//! Inventory service — inventory lists imported from VVAIS reports.
//!
//! DESIGN
//! ======
//! A VVAIS report arrives as a loose JSON object. `validate_inventory` checks
//! the fields an inventory list needs and collects one error per failing
//! field, so the client can show every problem at once. Only a fully valid
//! report is written to `inventory_lists`.
//!
//! ERROR HANDLING
//! ==============
//! An inventory whose number already exists is reported before field
//! validation, under the `inventory` key of the same error map. The unique
//! index on `number` catches imports that race past the existence check.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::PgPool;
use time::Date;
use tracing::info;

use crate::db::retry::{Transient, with_retry};
use crate::db::{UNIQUE_VIOLATION, has_sqlstate};
use crate::services::classifier::{StorageTerm, VvaisMedia, VvaisType};
use crate::state::AppState;

/// Error map key used when the inventory list as a whole is rejected.
pub const INVENTORY_KEY: &str = "inventory";

/// Error map message for a duplicate inventory number.
pub const ALREADY_EXISTS_MSG: &str = "already exists";

// =============================================================================
// TYPES
// =============================================================================

/// Why a single report field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    NoValue,
    WrongValue,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValue => f.write_str("value is missing"),
            Self::WrongValue => f.write_str("wrong value"),
        }
    }
}

/// Failing fields keyed by report field name.
pub type ValidationErrors = BTreeMap<&'static str, FieldError>;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("fond not found for institution {0}")]
    FondNotFound(i64),
    #[error("inventory list already exists: {0}")]
    AlreadyExists(i32),
    #[error("invalid inventory fields: {}", .0.keys().copied().collect::<Vec<_>>().join(", "))]
    Invalid(ValidationErrors),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Transient for InventoryError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Database(e) if e.is_transient())
    }
}

impl InventoryError {
    /// Field-keyed messages for rejected reports; `None` for other errors.
    #[must_use]
    pub fn error_map(&self) -> Option<BTreeMap<&'static str, String>> {
        match self {
            Self::AlreadyExists(_) => Some(BTreeMap::from([(INVENTORY_KEY, ALREADY_EXISTS_MSG.to_owned())])),
            Self::Invalid(errors) => Some(errors.iter().map(|(field, err)| (*field, err.to_string())).collect()),
            Self::FondNotFound(_) | Self::Database(_) => None,
        }
    }
}

/// A report that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VvaisInventory {
    pub number: i32,
    pub postfix: char,
    pub kind: VvaisType,
    pub electronic: bool,
    pub last_gv: i32,
    pub total_items: i32,
    pub storage_term: StorageTerm,
}

/// Row of the `inventory_lists` table joined with its fond code.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    pub id: i64,
    pub number: i32,
    pub postfix: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub electronic: bool,
    pub last_gv: i32,
    #[serde(serialize_with = "serialize_date")]
    pub start_date: Option<Date>,
    #[serde(serialize_with = "serialize_date")]
    pub end_date: Option<Date>,
    pub storage_term: String,
    pub items_per_period: Option<i32>,
    pub total_items: Option<i32>,
    pub fond_id: i64,
    pub fond_code: String,
}

impl Inventory {
    #[must_use]
    pub fn media(&self) -> VvaisMedia {
        VvaisMedia::from_electronic(self.electronic)
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}.US", self.fond_code, self.number)
    }
}

fn serialize_date<S: serde::Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.collect_str(d),
        None => serializer.serialize_none(),
    }
}

type InventoryTuple = (
    i64,
    i32,
    String,
    String,
    bool,
    i32,
    Option<Date>,
    Option<Date>,
    String,
    Option<i32>,
    Option<i32>,
    i64,
    String,
);

const INVENTORY_SELECT: &str = "i.id, i.number, i.postfix, i.type, i.electronic, i.last_gv, i.start_date,
    i.end_date, i.storage_term, i.items_per_period, i.total_items, i.fond_id, f.fond_code";

fn from_tuple(
    (
        id,
        number,
        postfix,
        kind,
        electronic,
        last_gv,
        start_date,
        end_date,
        storage_term,
        items_per_period,
        total_items,
        fond_id,
        fond_code,
    ): InventoryTuple,
) -> Inventory {
    Inventory {
        id,
        number,
        postfix,
        kind,
        electronic,
        last_gv,
        start_date,
        end_date,
        storage_term,
        items_per_period,
        total_items,
        fond_id,
        fond_code,
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

fn integer(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|n| i32::try_from(n).ok())
}

fn single_letter(value: &Value) -> Option<char> {
    let mut chars = value.as_str()?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => Some(c),
        _ => None,
    }
}

fn check<T>(
    report: &Map<String, Value>,
    field: &'static str,
    errors: &mut ValidationErrors,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let Some(value) = report.get(field) else {
        errors.insert(field, FieldError::NoValue);
        return None;
    };
    let parsed = parse(value);
    if parsed.is_none() {
        errors.insert(field, FieldError::WrongValue);
    }
    parsed
}

/// Validate a VVAIS report.
///
/// Checks `number`, `postfix`, `type`, `electronic`, `last_gv`,
/// `total_items` and `storage_term`. Other keys are ignored.
///
/// # Errors
///
/// Returns every failing field: `NoValue` when the key is absent,
/// `WrongValue` when its value has the wrong type or is not an accepted
/// classifier value.
pub fn validate_inventory(report: &Map<String, Value>) -> Result<VvaisInventory, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let number = check(report, "number", &mut errors, integer);
    let postfix = check(report, "postfix", &mut errors, single_letter);
    let kind = check(report, "type", &mut errors, |v| v.as_str().and_then(VvaisType::from_str));
    let electronic = check(report, "electronic", &mut errors, Value::as_bool);
    let last_gv = check(report, "last_gv", &mut errors, integer);
    let total_items = check(report, "total_items", &mut errors, integer);
    let storage_term = check(report, "storage_term", &mut errors, |v| {
        v.as_str().and_then(StorageTerm::from_str)
    });

    match (number, postfix, kind, electronic, last_gv, total_items, storage_term) {
        (
            Some(number),
            Some(postfix),
            Some(kind),
            Some(electronic),
            Some(last_gv),
            Some(total_items),
            Some(storage_term),
        ) if errors.is_empty() => Ok(VvaisInventory {
            number,
            postfix,
            kind,
            electronic,
            last_gv,
            total_items,
            storage_term,
        }),
        _ => Err(errors),
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create an inventory list for the fond of `fond_id` from a VVAIS report.
///
/// # Errors
///
/// Returns `FondNotFound`, `AlreadyExists` when an inventory list with the
/// same number exists, `Invalid` with every failing field, or a database error.
pub async fn add_inventory_from_vvais(
    state: &AppState,
    fond_id: i64,
    report: &Map<String, Value>,
) -> Result<Inventory, InventoryError> {
    let inventory = with_retry(state.db_retry, "add_inventory_from_vvais", || {
        insert_inventory(&state.pool, fond_id, report)
    })
    .await?;
    info!(inventory_id = inventory.id, %inventory, "inventory list created");
    Ok(inventory)
}

/// List the inventory lists of a fond ordered by number.
///
/// # Errors
///
/// Returns `FondNotFound` or a database error.
pub async fn list_inventories(state: &AppState, fond_id: i64) -> Result<Vec<Inventory>, InventoryError> {
    with_retry(state.db_retry, "list_inventories", || async move {
        ensure_fond(&state.pool, fond_id).await?;
        let rows = sqlx::query_as::<_, InventoryTuple>(&format!(
            "SELECT {INVENTORY_SELECT}
             FROM inventory_lists i JOIN fonds f ON f.institution_id = i.fond_id
             WHERE i.fond_id = $1
             ORDER BY i.number ASC, i.postfix ASC"
        ))
        .bind(fond_id)
        .fetch_all(&state.pool)
        .await?;
        Ok::<_, InventoryError>(rows.into_iter().map(from_tuple).collect())
    })
    .await
}

async fn ensure_fond(pool: &PgPool, fond_id: i64) -> Result<(), InventoryError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM fonds WHERE institution_id = $1)")
        .bind(fond_id)
        .fetch_one(pool)
        .await?;
    if exists { Ok(()) } else { Err(InventoryError::FondNotFound(fond_id)) }
}

async fn insert_inventory(
    pool: &PgPool,
    fond_id: i64,
    report: &Map<String, Value>,
) -> Result<Inventory, InventoryError> {
    ensure_fond(pool, fond_id).await?;

    if let Some(number) = report.get("number").and_then(integer) {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM inventory_lists WHERE number = $1)")
            .bind(number)
            .fetch_one(pool)
            .await?;
        if exists {
            return Err(InventoryError::AlreadyExists(number));
        }
    }

    let validated = validate_inventory(report).map_err(InventoryError::Invalid)?;

    let row = sqlx::query_as::<_, InventoryTuple>(&format!(
        "WITH i AS (
            INSERT INTO inventory_lists
                (number, postfix, type, electronic, last_gv, total_items, storage_term, fond_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
         )
         SELECT {INVENTORY_SELECT} FROM i JOIN fonds f ON f.institution_id = i.fond_id"
    ))
    .bind(validated.number)
    .bind(validated.postfix.to_string())
    .bind(validated.kind.as_str())
    .bind(validated.electronic)
    .bind(validated.last_gv)
    .bind(validated.total_items)
    .bind(validated.storage_term.as_str())
    .bind(fond_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if has_sqlstate(&e, UNIQUE_VIOLATION) {
            InventoryError::AlreadyExists(validated.number)
        } else {
            InventoryError::Database(e)
        }
    })?;

    Ok(from_tuple(row))
}

#[cfg(test)]
#[path = "inventory_test.rs"]
mod tests;
