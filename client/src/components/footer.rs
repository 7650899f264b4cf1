//! Site footer.

#[cfg(test)]
#[path = "footer_test.rs"]
mod footer_test;

use leptos::prelude::*;

use crate::app::ShellRegion;
use crate::components::header::APP_TITLE;

/// Footer shown below the routed content.
#[component]
pub fn SiteFooter() -> impl IntoView {
    view! {
        <footer class=ShellRegion::Footer.class()>
            <span>{footer_notice()}</span>
        </footer>
    }
}

/// Footer line: application name plus crate version, e.g. `OPEX v0.1.0`.
pub(crate) fn footer_notice() -> String {
    format!("{APP_TITLE} v{}", env!("CARGO_PKG_VERSION"))
}
