//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the records API and stitches it with Leptos SSR
//! rendering under a single Axum router. Paths outside `/api` and `/pkg` are
//! rendered by the Leptos app shell.

pub mod fonds;
pub mod institutions;
pub mod inventories;
pub mod projects;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Error response: status plus `{"error": ...}` body.
pub(crate) type ApiError = (StatusCode, Json<serde_json::Value>);

pub(crate) fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    if status.is_server_error() {
        tracing::error!(%status, error = %message, "request failed");
        return (status, Json(json!({ "error": "internal error" })));
    }
    (status, Json(json!({ "error": message.to_string() })))
}

/// Records API routes.
pub(crate) fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/projects", get(projects::list_projects).post(projects::create_project))
        .route("/api/projects/{id}", get(projects::get_project))
        .route("/api/projects/{id}/validate", post(projects::validate_project))
        .route(
            "/api/institutions",
            get(institutions::list_institutions).post(institutions::create_institution),
        )
        .route(
            "/api/institutions/{id}",
            get(institutions::get_institution).patch(institutions::update_institution),
        )
        .route("/api/institutions/{id}/fond", get(fonds::get_fond).post(fonds::create_fond))
        .route(
            "/api/institutions/{id}/fond/inventories",
            get(inventories::list_inventories).post(inventories::create_inventory),
        )
        .route("/api/fonds", get(fonds::list_fonds))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// API routes + Leptos SSR app + static `/pkg` assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `Cargo.toml` `[package.metadata.leptos]` section).
pub fn app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        // The route table is empty, so every remaining path renders the bare shell.
        .fallback(leptos_axum::render_app_to_stream({
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        }))
        .with_state(leptos_options.clone());

    // Serve Leptos static assets (WASM, CSS, JS) from the site root /pkg directory.
    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .merge(leptos_router)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
