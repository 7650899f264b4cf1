//! Site header with the application title.

#[cfg(test)]
#[path = "header_test.rs"]
mod header_test;

use leptos::prelude::*;

use crate::app::ShellRegion;

/// Application name shown in the header and the document title.
pub const APP_TITLE: &str = "OPEX";

/// Subtitle describing what the tool does.
pub const APP_SUBTITLE: &str = "Arhīva uzskaites saraksti";

/// Link target of the header title.
pub const HOME_HREF: &str = "/";

/// Header shown above the routed content.
#[component]
pub fn SiteHeader() -> impl IntoView {
    view! {
        <header class=ShellRegion::Header.class()>
            <a href=HOME_HREF class="app-header-title">
                <h1>{APP_TITLE}</h1>
            </a>
            <p class="app-header-subtitle">{APP_SUBTITLE}</p>
        </header>
    }
}
