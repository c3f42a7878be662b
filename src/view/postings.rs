use std::time::Duration;

use log::{error, warn};

use crate::{
    api::{Api, ApiError, PostingSource, Transport},
    html::{el, icon, Markup},
    model::Posting,
    page::{Action, Page, Task},
    utils::truncate,
};

use super::{
    dashboard,
    popup::{show_alert, Severity},
};

pub const POSTINGS_BODY: &str = "postings-tbody";
pub const LOAD_BUTTON: &str = "load-data-btn";
const DESCRIPTION_LIMIT: usize = 100;
const BUTTON_RESET_DELAY: Duration = Duration::from_secs(2);

pub fn row_id(posting: i64) -> String {
    format!("posting-row-{}", posting)
}

pub fn delete_button(posting: i64) -> String {
    format!("delete-posting-{}", posting)
}

fn message_row(columns: u32, class: &str, text: &str) -> Markup {
    el("tr")
        .child(
            el("td")
                .attr("colspan", columns)
                .class(class)
                .text(text),
        )
        .render()
}

fn load_label(icon_name: &str, text: &str) -> Markup {
    Markup::concat([Markup::text(text), Markup::trusted(" "), icon(icon_name, "ms-2")])
}

//==============================================================================
// Public list
//==============================================================================

pub fn mount_list(page: &mut Page) {
    page.declare(LOAD_BUTTON, load_label("bi-arrow-clockwise", "Load Postings"));
    page.declare(POSTINGS_BODY, Markup::default());
    page.bind("data-view", LOAD_BUTTON, Action::LoadPostings);
}

/// Handler of the Load button.
pub async fn load_list<T: Transport>(api: &Api<T>, page: &mut Page, source: PostingSource) {
    page.set_html(LOAD_BUTTON, load_label("bi-hourglass-split", "Loading..."));
    page.set_disabled(LOAD_BUTTON, true);

    match api.postings(source).await {
        Ok(postings) => {
            page.set_html(POSTINGS_BODY, Markup::default());
            if postings.is_empty() {
                page.set_html(POSTINGS_BODY, message_row(4, "text-center", "No postings found"));
            }
            for posting in &postings {
                page.append_child(POSTINGS_BODY, None, list_row(posting));
            }
            page.set_html(LOAD_BUTTON, load_label("bi-check-circle", "Load Postings"));
        }
        Err(e) => {
            warn!("Failed to load postings: {}", e);
            page.set_html(
                POSTINGS_BODY,
                message_row(4, "text-center text-danger", "Error loading data"),
            );
            page.set_html(LOAD_BUTTON, load_label("bi-exclamation-triangle", "Error"));
        }
    }

    page.schedule(
        BUTTON_RESET_DELAY,
        Task::RestoreButton {
            id: LOAD_BUTTON.to_string(),
            label: load_label("bi-arrow-clockwise", "Load Postings"),
        },
    );
}

pub fn list_row(posting: &Posting) -> Markup {
    let id = posting
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    el("tr")
        .child(el("td").text(id))
        .child(el("td").text(posting.title()))
        .child(el("td").text(posting.category()))
        .child(el("td").text(truncate(posting.description(), DESCRIPTION_LIMIT)))
        .render()
}

//==============================================================================
// My postings
//==============================================================================

pub fn mount_mine(page: &mut Page) {
    dashboard::mount(page);
    page.declare(POSTINGS_BODY, Markup::default());
    page.declare(super::popup::ALERT_CONTAINER, Markup::default());
}

pub async fn load_mine<T: Transport>(api: &Api<T>, page: &mut Page) {
    match api.postings(PostingSource::Mine).await {
        Ok(postings) => display_mine(page, &postings),
        Err(e) => {
            warn!("Failed to load my postings: {}", e);
            page.set_html(
                POSTINGS_BODY,
                message_row(7, "text-center text-danger", "Failed to load your postings"),
            );
        }
    }
}

pub fn display_mine(page: &mut Page, postings: &[Posting]) {
    page.set_html(POSTINGS_BODY, Markup::default());
    if postings.is_empty() {
        page.set_html(POSTINGS_BODY, message_row(7, "text-center", "No postings found"));
        return;
    }

    for posting in postings {
        let Some(id) = posting.id else {
            warn!("posting without id skipped: {:?}", posting.title);
            continue;
        };
        let row = row_id(id);
        page.append_child(POSTINGS_BODY, Some(&row), owned_row(id, posting));
        page.bind(
            &row,
            &delete_button(id),
            Action::DeletePosting {
                id,
                title: posting.title.clone().unwrap_or_default(),
            },
        );
    }
}

fn badge(class: &str, text: impl AsRef<str>) -> Markup {
    el("span").class(class).text(text).render()
}

fn owned_row(id: i64, posting: &Posting) -> Markup {
    let actions = el("div")
        .class("btn-group btn-group-sm")
        .attr("role", "group")
        .child(
            el("a")
                .attr(
                    "href",
                    format!(
                        "/posting-detail.html?hash={}",
                        urlencoding::encode(&posting.public_key())
                    ),
                )
                .class("btn btn-outline-primary")
                .attr("title", "View")
                .child(icon("bi-eye", "")),
        )
        .child(
            el("a")
                .attr("href", format!("/manage-posting.html?id={}", id))
                .class("btn btn-outline-warning")
                .attr("title", "Edit")
                .child(icon("bi-pencil", "")),
        )
        .child(
            el("button")
                .id(&delete_button(id))
                .class("btn btn-outline-danger")
                .attr("title", "Delete")
                .child(icon("bi-trash", "")),
        );

    el("tr")
        .id(&row_id(id))
        .child(el("td").child(el("strong").text(posting.title())))
        .child(el("td").child(badge("badge bg-secondary", posting.category())))
        .child(el("td").child(badge(
            "badge bg-success",
            posting.status.as_deref().unwrap_or("N/A"),
        )))
        .child(el("td").child(badge("badge bg-info", posting.views().to_string())))
        .child(el("td").child(badge(
            "badge bg-success",
            posting.applications().to_string(),
        )))
        .child(el("td").text(posting.formatted_date.as_deref().unwrap_or("N/A")))
        .child(el("td").child(actions))
        .render()
}

/// Handler of a row's Delete button.
pub async fn delete_posting<T: Transport>(api: &Api<T>, page: &mut Page, id: i64, title: &str) {
    let question = format!(
        "Are you sure you want to delete \"{}\"?\n\nThis action cannot be undone.",
        title
    );
    if !page.confirm(&question) {
        return;
    }

    match api.delete_posting(id).await {
        Ok(()) => {
            page.remove(&row_id(id));
            dashboard::load_stats(api, page).await;
            show_alert(page, Severity::Success, "Posting deleted successfully!");
            load_mine(api, page).await;
        }
        Err(e @ ApiError::Rejected { .. }) => {
            show_alert(
                page,
                Severity::Error,
                e.detail().unwrap_or("Failed to delete posting"),
            );
        }
        Err(e) => {
            error!("Error deleting posting: {}", e);
            show_alert(
                page,
                Severity::Error,
                "An error occurred while deleting the posting",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{api::stub::StubTransport, page::Location, view::popup::ALERT_CONTAINER};

    fn three_postings() -> serde_json::Value {
        json!([
            { "id": 1, "hash": "h1", "title": "Cook", "category": "Food", "status": "active",
              "views": 10, "application_count": 2, "formatted_date": "Jan 1, 2024" },
            { "id": 2, "hash": "h2", "title": "Baker", "category": "Food", "status": "active" },
            { "id": 3, "hash": "h3", "title": "Driver", "category": "Transport", "status": "active" }
        ])
    }

    fn mine_page() -> Page {
        let mut page = Page::new(Location::parse("/my-postings.html"));
        mount_mine(&mut page);
        page
    }

    #[test]
    fn list_row_degrades_missing_fields() {
        let html = list_row(&Posting::default()).into_string();
        assert_eq!(
            html,
            "<tr><td>N/A</td><td>N/A</td><td>N/A</td><td>N/A</td></tr>"
        );
    }

    #[test]
    fn list_row_truncates_long_descriptions() {
        let posting = Posting {
            id: Some(1),
            post_description: Some("x".repeat(150)),
            ..Default::default()
        };
        let html = list_row(&posting).into_string();
        assert!(html.contains(&format!("<td>{}...</td>", "x".repeat(100))));
    }

    #[test]
    fn owned_row_defaults_counts_to_zero() {
        let mut page = mine_page();
        let posting = Posting {
            id: Some(5),
            title: Some("<i>Chef</i>".to_string()),
            ..Default::default()
        };
        display_mine(&mut page, &[posting]);

        let html = page.html(POSTINGS_BODY);
        assert!(html.contains("<span class=\"badge bg-info\">0</span>"));
        assert!(html.contains("<span class=\"badge bg-success\">0</span>"));
        assert!(html.contains("&lt;i&gt;Chef&lt;/i&gt;"));
        assert!(html.contains("href=\"/posting-detail.html?hash=5\""));
        assert_eq!(
            page.bound(&delete_button(5)),
            Some(&Action::DeletePosting {
                id: 5,
                title: "<i>Chef</i>".to_string()
            })
        );
    }

    #[tokio::test]
    async fn public_list_renders_and_resets_button() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/postings",
            200,
            json!({ "postings": [{ "id": 7, "title": "Cook" }] }),
        ));
        let mut page = Page::new(Location::parse("/data-view"));
        mount_list(&mut page);

        load_list(&api, &mut page, PostingSource::All).await;

        assert!(page.html(POSTINGS_BODY).contains("<td>7</td><td>Cook</td>"));
        assert!(page.html(LOAD_BUTTON).contains("bi-check-circle"));
        assert!(page.is_disabled(LOAD_BUTTON));
        page.advance(BUTTON_RESET_DELAY);
        assert!(page.html(LOAD_BUTTON).contains("bi-arrow-clockwise"));
        assert!(!page.is_disabled(LOAD_BUTTON));
    }

    #[tokio::test]
    async fn empty_and_failed_lists() {
        let api = Api::new(
            StubTransport::new()
                .reply("GET /api/postings", 200, json!([]))
                .fail("GET /api/postings"),
        );
        let mut page = Page::new(Location::parse("/data-view"));
        mount_list(&mut page);

        load_list(&api, &mut page, PostingSource::All).await;
        assert!(page
            .html(POSTINGS_BODY)
            .contains("colspan=\"4\" class=\"text-center\">No postings found"));

        load_list(&api, &mut page, PostingSource::All).await;
        assert!(page.html(POSTINGS_BODY).contains("Error loading data"));
        assert!(page.html(LOAD_BUTTON).contains("Error"));
    }

    #[tokio::test]
    async fn empty_my_postings_spans_all_columns() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/postings/my-postings",
            200,
            json!([]),
        ));
        let mut page = mine_page();

        load_mine(&api, &mut page).await;

        assert!(page
            .html(POSTINGS_BODY)
            .contains("<td colspan=\"7\" class=\"text-center\">No postings found</td>"));
    }

    #[tokio::test]
    async fn reload_unbinds_vanished_rows() {
        let api = Api::new(
            StubTransport::new()
                .reply(
                    "GET /api/postings/my-postings",
                    200,
                    json!([{ "id": 1, "title": "Cook" }, { "id": 2, "title": "Baker" }]),
                )
                .reply("GET /api/postings/my-postings", 200, json!([{ "id": 1, "title": "Cook" }])),
        );
        let mut page = mine_page();
        load_mine(&api, &mut page).await;
        assert!(page.click(&delete_button(2)).is_some());

        load_mine(&api, &mut page).await;

        assert!(!page.contains(&row_id(2)));
        assert!(page.click(&delete_button(2)).is_none());
        assert!(page.click(&delete_button(1)).is_some());
    }

    #[tokio::test]
    async fn delete_removes_only_that_row() {
        let api = Api::new(
            StubTransport::new()
                .reply("GET /api/postings/my-postings", 200, three_postings())
                .reply(
                    "GET /api/postings/my-postings",
                    200,
                    json!([{ "id": 1, "title": "Cook" }, { "id": 3, "title": "Driver" }]),
                )
                .reply("DELETE /api/postings/2", 200, json!({}))
                .reply(
                    "GET /api/dashboard/stats",
                    200,
                    json!({ "overview": { "total_postings": 2, "total_views": 10, "total_applications": 2 } }),
                ),
        );
        let mut page = mine_page();
        page.answer_confirm(true);
        load_mine(&api, &mut page).await;
        assert!(page.contains(&row_id(2)));

        delete_posting(&api, &mut page, 2, "Baker").await;

        assert!(!page.contains(&row_id(2)));
        assert!(page.contains(&row_id(1)));
        assert!(page.contains(&row_id(3)));
        assert_eq!(page.html("total-postings"), "2");
        assert!(page.html(ALERT_CONTAINER).contains("Posting deleted successfully!"));
        assert_eq!(
            page.dialogs(),
            ["Are you sure you want to delete \"Baker\"?\n\nThis action cannot be undone."]
        );
        assert!(page.click(&delete_button(2)).is_none());
    }

    #[tokio::test]
    async fn rejected_delete_keeps_row_and_shows_detail() {
        let api = Api::new(
            StubTransport::new()
                .reply("GET /api/postings/my-postings", 200, three_postings())
                .reply(
                    "DELETE /api/postings/2",
                    403,
                    json!({ "detail": "You can only delete your own postings" }),
                ),
        );
        let mut page = mine_page();
        page.answer_confirm(true);
        load_mine(&api, &mut page).await;

        delete_posting(&api, &mut page, 2, "Baker").await;

        for id in 1..=3 {
            assert!(page.contains(&row_id(id)));
        }
        let alert = page.html(ALERT_CONTAINER);
        assert!(alert.contains("alert-danger"));
        assert!(alert.contains("You can only delete your own postings"));
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let api = Api::new(StubTransport::new());
        let mut page = mine_page();
        page.answer_confirm(false);

        delete_posting(&api, &mut page, 2, "Baker").await;

        assert!(api.transport().requests().is_empty());
        assert_eq!(page.dialogs().len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_shows_generic_alert() {
        let api = Api::new(StubTransport::new().fail("DELETE /api/postings/2"));
        let mut page = mine_page();
        page.answer_confirm(true);

        delete_posting(&api, &mut page, 2, "Baker").await;

        assert!(page
            .html(ALERT_CONTAINER)
            .contains("An error occurred while deleting the posting"));
    }
}
