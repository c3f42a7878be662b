use log::warn;

use crate::{
    api::{Api, NavSource, Transport},
    html::{el, icon, Markup},
    model::{guest_menu, AuthButton, NavItem},
    page::Page,
};

pub const NAV_CONTAINER: &str = "nav-items";
pub const AUTH_CONTAINER: &str = "auth-buttons";

/// Fills the navigation list from the backend, or with the guest menu when
/// that fails.
pub async fn load_navigation<T: Transport>(api: &Api<T>, page: &mut Page, source: NavSource) {
    let items = match api.navigation(source).await {
        Ok(navigation) => navigation.into_items(),
        Err(e) => {
            warn!("Failed to load navigation: {}", e);
            guest_menu()
        }
    };
    let path = page.location().path().to_string();
    page.set_html(NAV_CONTAINER, render_nav(&items, &path));
}

pub fn render_nav(items: &[NavItem], path: &str) -> Markup {
    Markup::concat(items.iter().map(|item| {
        let link = el("a").attr("href", &item.url);
        let link = if item.is_active(path) {
            link.class("active")
        } else {
            link
        };
        el("li").child(link.text(&item.text)).render()
    }))
}

pub async fn load_auth_button<T: Transport>(api: &Api<T>, page: &mut Page) {
    let html = match api.auth_buttons().await {
        Ok(button) => render_auth_button(&button),
        Err(e) => {
            warn!("Failed to load auth buttons: {}", e);
            login_link()
        }
    };
    page.set_html(AUTH_CONTAINER, html);
}

pub fn render_auth_button(button: &AuthButton) -> Markup {
    let url = button.url.as_deref().unwrap_or("/login.html");
    let label = Markup::concat([
        icon(button.icon.as_deref().unwrap_or_default(), "me-2"),
        Markup::text(button.text.as_deref().unwrap_or_default()),
    ]);

    if button.authenticated {
        el("form")
            .attr("method", button.method.as_deref().unwrap_or("post"))
            .attr("action", url)
            .attr("style", "display: inline;")
            .child(
                el("button")
                    .attr("type", "submit")
                    .class("custom-btn custom-border-btn btn")
                    .child(label),
            )
            .render()
    } else {
        el("a")
            .attr("href", url)
            .class("custom-btn custom-border-btn btn")
            .child(label)
            .render()
    }
}

fn login_link() -> Markup {
    el("a")
        .attr("href", "/login.html")
        .class("custom-btn custom-border-btn btn")
        .child(icon("bi-box-arrow-in-right", "me-2"))
        .text("Login")
        .render()
}
