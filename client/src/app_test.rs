use super::*;

#[test]
fn layout_renders_header_outlet_footer_in_order() {
    assert_eq!(SHELL_LAYOUT, [ShellRegion::Header, ShellRegion::Outlet, ShellRegion::Footer]);
}

#[test]
fn layout_has_single_outlet() {
    let outlets = SHELL_LAYOUT
        .iter()
        .filter(|region| **region == ShellRegion::Outlet)
        .count();
    assert_eq!(outlets, 1);
}

#[test]
fn region_classes_are_distinct() {
    let classes = SHELL_LAYOUT.map(ShellRegion::class);
    assert_eq!(classes, ["app-header", "app-outlet", "app-footer"]);
}

// =============================================================
// SSR rendering
// =============================================================

#[cfg(feature = "ssr")]
fn render_app_at(path: &str) -> String {
    use leptos_router::location::RequestUrl;

    let owner = Owner::new();
    owner.with(|| {
        provide_context(RequestUrl::new(path));
        view! { <App/> }.to_html()
    })
}

/// Content of the first `<main class="app-outlet">` element, hydration markers removed.
#[cfg(feature = "ssr")]
fn outlet_content(html: &str) -> String {
    let open = r#"<main class="app-outlet">"#;
    let start = html.find(open).expect("outlet should render") + open.len();
    let end = start + html[start..].find("</main>").expect("outlet should close");

    let mut content = html[start..end].replace("<!>", "");
    while let Some(comment) = content.find("<!--") {
        let close = content[comment..].find("-->").map_or(content.len(), |i| comment + i + 3);
        content.replace_range(comment..close, "");
    }
    content
}

#[cfg(feature = "ssr")]
#[test]
fn rendered_app_places_header_outlet_footer_in_order() {
    let html = render_app_at("/");

    let header = html.find(r#"class="app-header""#).expect("header should render");
    let outlet = html.find(r#"class="app-outlet""#).expect("outlet should render");
    let footer = html.find(r#"class="app-footer""#).expect("footer should render");
    assert!(header < outlet, "header must precede outlet: {html}");
    assert!(outlet < footer, "outlet must precede footer: {html}");
    assert!(html.contains(&footer_notice_text()));
}

#[cfg(feature = "ssr")]
#[test]
fn rendered_outlet_is_empty_for_any_path() {
    for path in ["/", "/projects", "/institutions/7/fond", "/no/such/page"] {
        let html = render_app_at(path);
        assert_eq!(outlet_content(&html), "", "routed content leaked at {path}: {html}");
    }
}

#[cfg(feature = "ssr")]
fn footer_notice_text() -> String {
    format!("OPEX v{}", env!("CARGO_PKG_VERSION"))
}
