use std::time::Duration;

use crate::{
    html::{el, icon, Markup},
    page::{overlay_scope, Action, Page, Task},
};

pub const POPUP_TIMEOUT: Duration = Duration::from_secs(5);
pub const ALERT_CONTAINER: &str = "alert-container";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    fn icon(&self) -> &'static str {
        match self {
            Self::Success => "bi-check-circle",
            Self::Error => "bi-exclamation-triangle",
        }
    }
    fn color(&self) -> &'static str {
        match self {
            Self::Success => "#28a745",
            Self::Error => "#dc3545",
        }
    }
    fn alert_class(&self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Error => "alert-danger",
        }
    }
}

/// Modal overlay closed by its OK button or after [`POPUP_TIMEOUT`].
pub fn show_popup(page: &mut Page, title: &str, message: &str, severity: Severity) -> u64 {
    let color = severity.color();
    let id = page.add_overlay(|id| {
        let body = el("div")
            .class("popup")
            .attr(
                "style",
                "background: white; padding: 2rem; border-radius: 10px; \
                 max-width: 400px; text-align: center; box-shadow: 0 4px 6px rgba(0,0,0,0.1);",
            )
            .child(
                el("div")
                    .attr(
                        "style",
                        format!("font-size: 3rem; margin-bottom: 1rem; color: {};", color),
                    )
                    .child(icon(severity.icon(), "")),
            )
            .child(
                el("h3")
                    .attr("style", format!("margin-bottom: 1rem; color: {};", color))
                    .text(title),
            )
            .child(el("p").attr("style", "margin-bottom: 1.5rem;").text(message))
            .child(
                el("button")
                    .id(&close_button(id))
                    .class("btn btn-primary")
                    .text("OK"),
            );

        el("div")
            .class("popup-overlay")
            .attr(
                "style",
                "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
                 background: rgba(0,0,0,0.5); display: flex; justify-content: center; \
                 align-items: center; z-index: 9999;",
            )
            .child(body)
            .render()
    });

    page.bind(&overlay_scope(id), &close_button(id), Action::ClosePopup(id));
    page.schedule(POPUP_TIMEOUT, Task::RemoveOverlay(id));
    id
}

pub fn close_button(popup: u64) -> String {
    format!("popup-close-{}", popup)
}

/// Dismissible banner in [`ALERT_CONTAINER`], gone after [`POPUP_TIMEOUT`].
pub fn show_alert(page: &mut Page, severity: Severity, message: &str) {
    let html = el("div")
        .class(&format!(
            "alert {} alert-dismissible fade show",
            severity.alert_class()
        ))
        .attr("role", "alert")
        .text(message)
        .child(
            el("button")
                .id("alert-close")
                .attr("type", "button")
                .class("btn-close")
                .attr("aria-label", "Close"),
        )
        .render();

    page.set_html(ALERT_CONTAINER, html.clone());
    page.bind(ALERT_CONTAINER, "alert-close", Action::DismissAlert);
    page.schedule(
        POPUP_TIMEOUT,
        Task::ClearIfUnchanged {
            id: ALERT_CONTAINER.to_string(),
            html,
        },
    );
}

pub fn dismiss_alert(page: &mut Page) {
    page.set_html(ALERT_CONTAINER, Markup::default());
}
