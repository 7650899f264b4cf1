//! # client
//!
//! Leptos + WASM frontend for the OPEX archival inventory tool.
//!
//! The crate exposes the root `App` component and the SSR HTML `shell`.
//! The server renders both through `leptos_axum`; the browser hydrates them
//! through [`hydrate`] when built with the `hydrate` feature.

pub mod app;
pub mod components;

/// Browser entry point: installs logging and hydrates the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("hydrating opex client");

    leptos::mount::hydrate_body(app::App);
}
