//! Root application component with routing.
//!
//! LAYOUT
//! ======
//! The app is a router boundary around three regions rendered in a fixed
//! order: site header, routed outlet, site footer. The route table is empty,
//! so the outlet renders nothing for every path.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos::tachys::view::any_view::{AnyView, IntoAny};
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Router, Routes};

use crate::components::footer::SiteFooter;
use crate::components::header::{APP_TITLE, SiteHeader};

/// One region of the app layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellRegion {
    Header,
    Outlet,
    Footer,
}

impl ShellRegion {
    /// CSS class of the element wrapping this region.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Header => "app-header",
            Self::Outlet => "app-outlet",
            Self::Footer => "app-footer",
        }
    }
}

/// Render order of the app regions inside the router.
pub const SHELL_LAYOUT: [ShellRegion; 3] = [ShellRegion::Header, ShellRegion::Outlet, ShellRegion::Footer];

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="lv">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/opex.css"/>
        <Title text=APP_TITLE/>

        <Router>
            {SHELL_LAYOUT.into_iter().map(render_region).collect_view()}
        </Router>
    }
}

fn render_region(region: ShellRegion) -> AnyView {
    match region {
        ShellRegion::Header => view! { <SiteHeader/> }.into_any(),
        ShellRegion::Outlet => view! {
            <main class=region.class()>
                // No routes are registered yet; unmatched paths render nothing.
                <Routes fallback=|| ()>{()}</Routes>
            </main>
        }
        .into_any(),
        ShellRegion::Footer => view! { <SiteFooter/> }.into_any(),
    }
}
