//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool and the retry policy every service call runs
//! under. Both are cheap to clone.

use sqlx::PgPool;

use crate::db::retry::RetryPolicy;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub db_retry: RetryPolicy,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, db_retry: RetryPolicy) -> Self {
        Self { pool, db_retry }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
