//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own record validation and persistence so route handlers
//! can stay focused on request decoding and status mapping. Every public
//! operation runs its queries through `db::retry::with_retry`.

pub mod classifier;
pub mod fond;
pub mod institution;
pub mod inventory;
pub mod project;

/// Whether `value` fits a `VARCHAR(max_chars)` column.
pub(crate) fn fits(value: &str, max_chars: usize) -> bool {
    value.chars().count() <= max_chars
}

/// Trimmed `value` when it is non-blank and fits `max_chars`.
pub(crate) fn required_text(value: &str, max_chars: usize) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && fits(value, max_chars)).then_some(value)
}
