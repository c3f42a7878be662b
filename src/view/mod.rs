pub mod dashboard;
pub mod detail;
pub mod form;
pub mod nav;
pub mod popup;
pub mod postings;
pub mod profile;

use log::debug;

use crate::{
    api::{Api, PostingSource, Transport},
    page::{Action, Page},
};

use form::{FormSpec, Submitted};

/// Runs the handler bound to `id`, if any. `user` is the profile the page is
/// about, used when a profile form is submitted.
pub async fn click<T: Transport>(api: &Api<T>, page: &mut Page, id: &str, user: i64) -> bool {
    let Some(action) = page.click(id) else {
        debug!("nothing bound to #{}", id);
        return false;
    };
    dispatch(api, page, action, user).await;
    true
}

pub async fn dispatch<T: Transport>(api: &Api<T>, page: &mut Page, action: Action, user: i64) {
    match action {
        Action::ClosePopup(id) => page.remove_overlay(id),
        Action::DismissAlert => popup::dismiss_alert(page),
        Action::ShowApplicationForm => detail::show_form(page),
        Action::HideApplicationForm => detail::hide_form(page),
        Action::DeletePosting { id, title } => {
            postings::delete_posting(api, page, id, &title).await
        }
        Action::ShowApplication(application) => profile::show_application(page, &application),
        Action::CloseApplication => profile::close_application(page),
        Action::LoadPostings => postings::load_list(api, page, PostingSource::All).await,
        Action::Submit(kind) => {
            let spec = FormSpec::for_kind(kind, user);
            if form::submit(api, page, &spec).await == Submitted::Incomplete {
                popup::show_popup(
                    page,
                    "Missing fields",
                    "Please fill in all required fields.",
                    popup::Severity::Error,
                );
            }
        }
    }
}
