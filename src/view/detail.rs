use log::{debug, warn};

use crate::{
    api::{Api, Transport},
    html::{el, icon, Markup},
    model::{text_or, PostingView, ViewerState},
    page::{Action, FormKind, Page},
    utils::long_date,
};

pub const LOADING: &str = "loading-container";
pub const CONTENT: &str = "posting-content";
pub const ACTIONS: &str = "action-buttons";
pub const APPLY_FORM: &str = "application-form";
pub const APPLY_BUTTON: &str = "show-application-form";
pub const CANCEL_BUTTON: &str = "hide-application-form";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPanel {
    Owner,
    Apply { posting_id: i64 },
    AlreadyApplied,
    Login,
}

impl ActionPanel {
    /// Owner, then can-apply, then has-applied, then anonymous. `None` when
    /// no flag matches. Without viewer flags (legacy payload) the apply panel
    /// is always offered.
    pub fn select(viewer: Option<ViewerState>, posting_id: i64) -> Option<Self> {
        let Some(viewer) = viewer else {
            return Some(Self::Apply { posting_id });
        };
        if viewer.is_owner {
            Some(Self::Owner)
        } else if viewer.can_apply {
            Some(Self::Apply { posting_id })
        } else if viewer.has_applied {
            Some(Self::AlreadyApplied)
        } else if !viewer.is_authenticated {
            Some(Self::Login)
        } else {
            None
        }
    }
}

pub fn mount(page: &mut Page) {
    page.declare(LOADING, Markup::trusted("Loading..."));
    page.declare(CONTENT, Markup::default());
    page.hide(CONTENT);
    for id in [
        "posting-title",
        "posting-category",
        "posting-description",
        "posting-views",
        "posting-applications",
        "posting-date",
        "posting-author",
        ACTIONS,
    ] {
        page.declare(id, Markup::default());
    }
}

fn error_block(text: &str) -> Markup {
    el("div").class("alert alert-danger").text(text).render()
}

/// Reads `?hash=` from the page location and loads that posting.
pub async fn load<T: Transport>(api: &Api<T>, page: &mut Page) {
    let Some(hash) = page.location().query("hash").map(str::to_string) else {
        page.set_html(CONTENT, error_block("No posting hash provided"));
        page.show(CONTENT);
        return;
    };

    match api.posting_view(&hash).await {
        Ok(view) => display(page, &view),
        Err(e) => {
            warn!("Failed to load posting {}: {}", hash, e);
            page.hide(LOADING);
            page.set_html(CONTENT, error_block("Failed to load posting details"));
            page.show(CONTENT);
        }
    }
}

pub fn display(page: &mut Page, view: &PostingView) {
    let posting = view.posting();
    page.hide(LOADING);
    page.show(CONTENT);

    page.set_text("posting-title", posting.title.as_deref().unwrap_or_default());
    page.set_text(
        "posting-category",
        posting.category.as_deref().unwrap_or_default(),
    );
    page.set_html(
        "posting-description",
        Markup::multiline(posting.post_description.as_deref().unwrap_or_default()),
    );
    page.set_text("posting-views", posting.views().to_string());
    page.set_text("posting-applications", posting.applications().to_string());
    if let Some(created) = &posting.created_at {
        page.set_text("posting-date", long_date(created));
    }
    page.set_text("posting-author", text_or(&posting.creator_name, "Anonymous"));

    let panel = ActionPanel::select(view.viewer(), posting.id.unwrap_or_default());
    install_panel(page, panel);
}

fn install_panel(page: &mut Page, panel: Option<ActionPanel>) {
    page.set_html(APPLY_FORM, Markup::default());
    let Some(panel) = panel else {
        debug!("no action panel matches the viewer");
        page.set_html(ACTIONS, Markup::default());
        return;
    };

    match panel {
        ActionPanel::Owner => page.set_html(
            ACTIONS,
            Markup::concat([
                el("div")
                    .class("alert alert-info")
                    .attr("role", "alert")
                    .child(icon("bi-info-circle", "me-2"))
                    .text("This is your posting")
                    .render(),
                el("a")
                    .attr("href", "/my-postings.html")
                    .class("btn btn-outline-primary")
                    .child(icon("bi-gear", "me-2"))
                    .text("Manage Posting")
                    .render(),
            ]),
        ),
        ActionPanel::Apply { posting_id } => install_apply_panel(page, posting_id),
        ActionPanel::AlreadyApplied => page.set_html(
            ACTIONS,
            Markup::concat([
                el("div")
                    .class("alert alert-success")
                    .attr("role", "alert")
                    .child(icon("bi-check-circle", "me-2"))
                    .text("You have already applied to this position")
                    .render(),
                el("button")
                    .class("btn btn-outline-secondary")
                    .flag("disabled", true)
                    .child(icon("bi-check", "me-2"))
                    .text("Application Submitted")
                    .render(),
            ]),
        ),
        ActionPanel::Login => page.set_html(
            ACTIONS,
            el("a")
                .attr("href", "/login.html")
                .class("btn btn-primary btn-lg")
                .child(icon("bi-box-arrow-in-right", "me-2"))
                .text("Login to Apply")
                .render(),
        ),
    }
}

fn textarea(name: &str, label: &str, rows: u32, placeholder: &str) -> Markup {
    el("div")
        .class("mb-3")
        .child(
            el("label")
                .attr("for", name)
                .class("form-label")
                .text(label),
        )
        .child(
            el("textarea")
                .class("form-control")
                .id(name)
                .attr("name", name)
                .attr("rows", rows)
                .attr("placeholder", placeholder),
        )
        .render()
}

fn install_apply_panel(page: &mut Page, posting_id: i64) {
    let form = el("form")
        .id("apply-form")
        .attr("action", "/api/applications")
        .attr("method", "post")
        .child(
            el("input")
                .attr("type", "hidden")
                .attr("name", "posting_id")
                .attr("value", posting_id),
        )
        .child(textarea(
            "message",
            "Message (Optional)",
            3,
            "Brief message to the employer...",
        ))
        .child(textarea(
            "cover_letter",
            "Cover Letter (Optional)",
            5,
            "Tell them why you're interested in this position...",
        ))
        .child(
            el("div")
                .class("d-flex gap-2")
                .child(
                    el("button")
                        .id("apply-submit")
                        .attr("type", "submit")
                        .class("btn btn-success")
                        .text("Submit Application"),
                )
                .child(
                    el("button")
                        .id(CANCEL_BUTTON)
                        .attr("type", "button")
                        .class("btn btn-secondary")
                        .text("Cancel"),
                ),
        );

    page.set_html(
        ACTIONS,
        el("button")
            .id(APPLY_BUTTON)
            .attr("type", "button")
            .class("btn btn-primary btn-lg")
            .child(icon("bi-envelope", "me-2"))
            .text("Apply Now")
            .render(),
    );
    page.set_html(
        APPLY_FORM,
        el("div")
            .class("mt-3 p-3 border rounded")
            .child(el("h5").text("Apply for this Position"))
            .child(form)
            .render(),
    );
    page.hide(APPLY_FORM);

    page.bind(ACTIONS, APPLY_BUTTON, Action::ShowApplicationForm);
    page.bind(APPLY_FORM, CANCEL_BUTTON, Action::HideApplicationForm);
    page.declare_form(
        "apply-form",
        FormKind::Apply,
        "apply-submit",
        Markup::text("Submit Application"),
        &[("posting_id", true), ("message", false), ("cover_letter", false)],
    );
    page.fill("posting_id", posting_id.to_string());
}

pub fn show_form(page: &mut Page) {
    page.show(APPLY_FORM);
}

pub fn hide_form(page: &mut Page) {
    page.hide(APPLY_FORM);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{api::stub::StubTransport, page::Location};

    fn viewer(is_owner: bool, can_apply: bool, has_applied: bool, auth: bool) -> ViewerState {
        ViewerState {
            is_owner,
            can_apply,
            has_applied,
            is_authenticated: auth,
        }
    }

    #[test]
    fn owner_takes_priority() {
        let panel = ActionPanel::select(Some(viewer(true, true, true, true)), 1);
        assert_eq!(panel, Some(ActionPanel::Owner));
    }

    #[test]
    fn priority_order() {
        assert_eq!(
            ActionPanel::select(Some(viewer(false, true, true, true)), 4),
            Some(ActionPanel::Apply { posting_id: 4 })
        );
        assert_eq!(
            ActionPanel::select(Some(viewer(false, false, true, true)), 4),
            Some(ActionPanel::AlreadyApplied)
        );
        assert_eq!(
            ActionPanel::select(Some(viewer(false, false, false, false)), 4),
            Some(ActionPanel::Login)
        );
        assert_eq!(
            ActionPanel::select(Some(viewer(false, false, false, true)), 4),
            None
        );
        assert_eq!(
            ActionPanel::select(None, 4),
            Some(ActionPanel::Apply { posting_id: 4 })
        );
    }

    fn detail_page(query: &str) -> Page {
        let mut page = Page::new(Location::parse(&format!("/posting-detail.html{}", query)));
        mount(&mut page);
        page
    }

    #[tokio::test]
    async fn can_apply_embeds_posting_id() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/postings/view/abc",
            200,
            json!({
                "posting": { "id": 42, "title": "Line cook", "category": "Food",
                             "post_description": "Chop\n<b>fast</b>", "views": 3,
                             "created_at": "2024-01-05T10:00:00Z" },
                "can_apply": true,
                "is_authenticated": true
            }),
        ));
        let mut page = detail_page("?hash=abc");

        load(&api, &mut page).await;

        assert!(!page.is_visible(LOADING));
        assert!(page.is_visible(CONTENT));
        assert_eq!(page.html("posting-title"), "Line cook");
        assert_eq!(page.html("posting-description"), "Chop<br>&lt;b&gt;fast&lt;/b&gt;");
        assert_eq!(page.html("posting-date"), "January 5, 2024");
        assert_eq!(page.html("posting-author"), "Anonymous");
        assert_eq!(page.html("posting-applications"), "0");

        assert!(page.html(ACTIONS).contains("Apply Now"));
        assert!(page
            .html(APPLY_FORM)
            .contains("<input type=\"hidden\" name=\"posting_id\" value=\"42\">"));
        assert!(!page.is_visible(APPLY_FORM));
        assert_eq!(page.value("posting_id"), "42");
        assert_eq!(page.click(APPLY_BUTTON), Some(Action::ShowApplicationForm));
        assert_eq!(page.click(CANCEL_BUTTON), Some(Action::HideApplicationForm));
    }

    #[tokio::test]
    async fn owner_panel_wins_over_can_apply() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/postings/view/abc",
            200,
            json!({ "posting": { "id": 1, "title": "Mine" }, "is_owner": true, "can_apply": true }),
        ));
        let mut page = detail_page("?hash=abc");

        load(&api, &mut page).await;

        let html = page.html(ACTIONS);
        assert!(html.contains("This is your posting"));
        assert!(!html.contains("Apply Now"));
        assert!(page.click(APPLY_BUTTON).is_none());
    }

    #[tokio::test]
    async fn null_flags_keep_the_owner_panel() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/postings/view/abc",
            200,
            json!({ "posting": { "id": 42, "title": "Mine" }, "is_owner": true,
                    "can_apply": null, "has_applied": null, "is_authenticated": true }),
        ));
        let mut page = detail_page("?hash=abc");

        load(&api, &mut page).await;

        assert_eq!(page.html("posting-title"), "Mine");
        assert!(page.html(ACTIONS).contains("This is your posting"));
        assert!(!page.html(APPLY_FORM).contains("posting_id"));
    }

    #[tokio::test]
    async fn undecodable_wrapped_payload_is_a_load_error() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/postings/view/abc",
            200,
            json!({ "posting": { "id": "42" }, "is_owner": true }),
        ));
        let mut page = detail_page("?hash=abc");

        load(&api, &mut page).await;

        assert!(page.html(CONTENT).contains("Failed to load posting details"));
        assert_eq!(page.html(ACTIONS), "");
    }

    #[tokio::test]
    async fn legacy_payload_always_offers_apply() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/postings/view/old",
            200,
            json!({ "id": 9, "title": "Legacy", "post_description": "x", "creator_name": "Bob" }),
        ));
        let mut page = detail_page("?hash=old");

        load(&api, &mut page).await;

        assert!(page.html(ACTIONS).contains("Apply Now"));
        assert!(page.html(APPLY_FORM).contains("value=\"9\""));
        assert_eq!(page.html("posting-author"), "Bob");
    }

    #[tokio::test]
    async fn no_matching_flag_leaves_panel_empty() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/postings/view/abc",
            200,
            json!({ "posting": { "id": 1 }, "is_authenticated": true }),
        ));
        let mut page = detail_page("?hash=abc");

        load(&api, &mut page).await;

        assert_eq!(page.html(ACTIONS), "");
    }

    #[tokio::test]
    async fn unauthenticated_viewer_gets_login_link() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/postings/view/abc",
            200,
            json!({ "posting": { "id": 1 }, "is_authenticated": false }),
        ));
        let mut page = detail_page("?hash=abc");

        load(&api, &mut page).await;

        assert!(page.html(ACTIONS).contains("Login to Apply"));
    }

    #[tokio::test]
    async fn missing_hash_makes_no_request() {
        let api = Api::new(StubTransport::new());
        let mut page = detail_page("");

        load(&api, &mut page).await;

        assert!(page.html(CONTENT).contains("No posting hash provided"));
        assert!(api.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_shows_error_block() {
        let api = Api::new(StubTransport::new().fail("GET /api/postings/view/abc"));
        let mut page = detail_page("?hash=abc");

        load(&api, &mut page).await;

        assert!(!page.is_visible(LOADING));
        assert!(page.is_visible(CONTENT));
        assert!(page.html(CONTENT).contains("Failed to load posting details"));
    }
}
