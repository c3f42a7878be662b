use futures::try_join;
use log::{info, warn};

use crate::{
    api::{Api, Transport},
    html::{el, icon, Markup},
    model::{text_or, Application, Posting, ProfileData, ProfileSource, User},
    page::{Action, FormKind, Page},
    utils::long_date,
};

use super::form;

pub const ACTIVITY: &str = "recent-activity";
pub const MODAL: &str = "application-modal";
pub const MODAL_BODY: &str = "application-modal-body";
pub const MODAL_CLOSE: &str = "application-modal-close";
const STAT_COUNTERS: [&str; 3] = ["total-postings", "total-applications", "member-since"];

pub fn application_entry(index: usize) -> String {
    format!("application-entry-{}", index)
}

pub fn mount(page: &mut Page) {
    form::mount(page, FormKind::Profile);
    for id in STAT_COUNTERS {
        page.declare(id, Markup::trusted("-"));
    }
    page.declare(ACTIVITY, Markup::default());
    page.declare(MODAL_BODY, Markup::default());
    page.declare(
        MODAL,
        el("button")
            .id(MODAL_CLOSE)
            .attr("type", "button")
            .class("btn-close")
            .attr("aria-label", "Close")
            .render(),
    );
    page.hide(MODAL);
    page.hide(MODAL_BODY);
    page.bind(MODAL, MODAL_CLOSE, Action::CloseApplication);
}

/// Loads `/api/profile/data`. Returns the id of the profile owner, when the
/// backend tells us.
pub async fn load<T: Transport>(api: &Api<T>, page: &mut Page) -> Option<i64> {
    match api.profile_data().await {
        Ok(data) => {
            let data = ProfileData::from(ProfileSource::Aggregated(data));
            fill_user(page, &data.user);
            display_stats(page, &data);
            display_activity(page, &data.recent_postings, &data.recent_applications);
            data.user.id
        }
        Err(e) => {
            warn!("Failed to load profile: {}", e);
            page.set_html(
                ACTIVITY,
                el("p")
                    .class("text-center text-danger")
                    .text("Error loading recent activity.")
                    .render(),
            );
            None
        }
    }
}

/// Older page: the user record and the two per-user lists, the lists fetched
/// together.
pub async fn load_by_user<T: Transport>(api: &Api<T>, page: &mut Page, user_id: i64) {
    let user = match api.user(user_id).await {
        Ok(user) => {
            fill_user(page, &user);
            user
        }
        Err(e) => {
            info!("Unable to load user profile: {}", e);
            User::default()
        }
    };

    let lists = try_join!(
        api.postings_by_user(user_id),
        api.applications_by_user(user_id)
    );
    match lists {
        Ok((postings, applications)) => {
            let data = ProfileData::from(ProfileSource::PerUser {
                user,
                postings,
                applications,
            });
            display_stats(page, &data);
            display_activity(page, &data.recent_postings, &data.recent_applications);
        }
        Err(e) => {
            warn!("Failed to load user activity: {}", e);
            for id in STAT_COUNTERS {
                page.set_text(id, "Error");
            }
            page.set_html(
                ACTIVITY,
                el("p")
                    .class("text-center text-danger")
                    .text("Error loading recent activity.")
                    .render(),
            );
        }
    }
}

fn fill_user(page: &mut Page, user: &User) {
    page.fill("name", user.name.clone().unwrap_or_default());
    page.fill("surname", user.surname.clone().unwrap_or_default());
    page.fill("username", user.username.clone().unwrap_or_default());
    page.fill("email", user.email.clone().unwrap_or_default());
}

fn display_stats(page: &mut Page, data: &ProfileData) {
    let Some(stats) = &data.stats else {
        return;
    };
    let count = |n: Option<u64>| n.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
    page.set_text("total-postings", count(stats.total_postings));
    page.set_text("total-applications", count(stats.total_applications));
    page.set_text("member-since", text_or(&stats.member_since, "-"));
}

pub fn status_badge(application: &Application) -> Markup {
    let status = application.status();
    el("span")
        .class(status.badge_class())
        .text(status.label())
        .render()
}

fn posting_entry(posting: &Posting) -> Markup {
    el("li")
        .class("list-group-item d-flex align-items-center")
        .child(icon("bi-briefcase", "me-2 text-primary"))
        .child(
            el("div")
                .child(el("strong").text(posting.title()))
                .text(format!(" - {}", posting.category())),
        )
        .render()
}

fn application_item(index: usize, application: &Application) -> Markup {
    let applied = application
        .applied_at
        .as_deref()
        .map(long_date)
        .unwrap_or_default();
    el("li")
        .id(&application_entry(index))
        .class("list-group-item list-group-item-action d-flex justify-content-between align-items-center")
        .attr("role", "button")
        .child(
            el("div")
                .child(icon("bi-send", "me-2 text-success"))
                .child(el("strong").text(application.title()))
                .text(format!(" - {}", text_or(&application.category, "N/A")))
                .child(el("small").class("d-block text-muted").text(applied)),
        )
        .child(status_badge(application))
        .render()
}

fn display_activity(page: &mut Page, postings: &[Posting], applications: &[Application]) {
    if postings.is_empty() && applications.is_empty() {
        page.set_html(
            ACTIVITY,
            el("p")
                .class("text-center text-muted")
                .text("No recent activity found.")
                .render(),
        );
        return;
    }

    let mut html = Markup::default();
    if !postings.is_empty() {
        html.push(el("h5").text("Your Recent Postings:"));
        html.push(
            el("ul")
                .class("list-group mb-3")
                .children(postings.iter().map(posting_entry)),
        );
    }
    if !applications.is_empty() {
        html.push(el("h5").text("Your Recent Applications:"));
        html.push(
            el("ul").class("list-group").children(
                applications
                    .iter()
                    .enumerate()
                    .map(|(i, application)| application_item(i, application)),
            ),
        );
    }
    page.set_html(ACTIVITY, html);

    for (i, application) in applications.iter().enumerate() {
        page.bind(
            ACTIVITY,
            &application_entry(i),
            Action::ShowApplication(Box::new(application.clone())),
        );
    }
}

fn detail_section(title: &str, body: Markup) -> Markup {
    el("div")
        .class("mb-3")
        .child(el("h6").class("text-muted").text(title))
        .child(body)
        .render()
}

/// Fills and opens the modal for an application the page already has.
pub fn show_application(page: &mut Page, application: &Application) {
    let date = |raw: &Option<String>| {
        raw.as_deref()
            .map(long_date)
            .unwrap_or_else(|| "N/A".to_string())
    };

    let mut body = Markup::default();
    body.push(
        el("div")
            .class("d-flex justify-content-between align-items-start mb-3")
            .child(
                el("div")
                    .child(el("h4").text(application.title()))
                    .child(
                        el("p")
                            .class("text-muted mb-0")
                            .text(format!(
                                "{} · {}",
                                text_or(&application.category, "N/A"),
                                text_or(&application.posting_creator_name, "Anonymous")
                            )),
                    ),
            )
            .child(status_badge(application)),
    );
    body.push(detail_section(
        "Job Description",
        el("p")
            .text_multiline(text_or(&application.post_description, "No description provided."))
            .render(),
    ));
    body.push(
        el("div")
            .class("row mb-3")
            .child(
                el("div")
                    .class("col-6")
                    .child(el("h6").class("text-muted").text("Applied"))
                    .child(el("p").text(date(&application.applied_at))),
            )
            .child(
                el("div")
                    .class("col-6")
                    .child(el("h6").class("text-muted").text("Posted"))
                    .child(el("p").text(date(&application.posting_created_at))),
            ),
    );
    if let Some(message) = application.message.as_deref().filter(|m| !m.is_empty()) {
        body.push(detail_section(
            "Your Message",
            el("p").text_multiline(message).render(),
        ));
    }
    if let Some(letter) = application.cover_letter.as_deref().filter(|m| !m.is_empty()) {
        body.push(detail_section(
            "Cover Letter",
            el("p").text_multiline(letter).render(),
        ));
    }

    page.set_html(MODAL_BODY, body);
    page.show(MODAL_BODY);
    page.show(MODAL);
}

pub fn close_application(page: &mut Page) {
    page.hide(MODAL);
    page.hide(MODAL_BODY);
}
