mod api;
mod config;
mod html;
mod model;
mod page;
mod utils;
mod view;

use std::error::Error;

use api::{Api, FormData, HttpTransport, NavSource, Transport};
use config::{command::ListSource, Command, Config, FormArgs};
use log::{info, warn};
use page::{FormKind, Location, Page};
use view::{detail, form, nav, postings, profile};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();
    info!("# Job Board #");
    info!("backend {}", config.backend());
    info!("");

    let api = Api::new(HttpTransport::new(&config)?);
    let page = run(&api, config.command()).await;

    info!("");
    println!("{}", config.format().render(&page.render()));
    if let Some(url) = page.navigated_to() {
        info!("Next page: {}", url);
    }
    Ok(())
}

/// Builds the page a command stands for and runs its script against it.
async fn run<T: Transport>(api: &Api<T>, command: &Command) -> Page {
    match command {
        Command::Nav { path, legacy } => {
            let mut page = Page::new(Location::parse(path));
            let source = if *legacy {
                NavSource::AuthStatus
            } else {
                NavSource::Navigation
            };
            step!("Navigation", nav::load_navigation(api, &mut page, source).await);
            page
        }
        Command::AuthButtons => {
            let mut page = Page::new(Location::parse("/"));
            step!("Auth buttons", nav::load_auth_button(api, &mut page).await);
            page
        }
        Command::Postings { source } => {
            let mut page = Page::new(Location::parse("/data-view"));
            postings::mount_list(&mut page);
            match source {
                ListSource::All => {
                    step!(
                        "Postings",
                        view::click(api, &mut page, postings::LOAD_BUTTON, 0).await
                    );
                }
                ListSource::Data => {
                    step!(
                        "Postings",
                        postings::load_list(api, &mut page, (*source).into()).await
                    );
                }
            }
            page
        }
        Command::MyPostings => my_postings(api).await,
        Command::Delete { id, yes } => {
            let mut page = my_postings(api).await;
            page.answer_confirm(*yes);
            if !step!(
                "Delete",
                view::click(api, &mut page, &postings::delete_button(*id), 0).await
            ) {
                warn!("Posting {} is not one of yours", id);
            }
            for question in page.dialogs() {
                info!("Confirm: {}", question.replace('\n', " "));
            }
            if !yes {
                info!("Nothing deleted, pass --yes to confirm");
            }
            page
        }
        Command::Dashboard => {
            let mut page = Page::new(Location::parse("/my-postings"));
            view::dashboard::mount(&mut page);
            step!("Stats", view::dashboard::load_stats(api, &mut page).await);
            page
        }
        Command::Posting { hash, open } => {
            let mut page = posting_detail(api, hash).await;
            if *open {
                view::click(api, &mut page, detail::APPLY_BUTTON, 0).await;
            }
            page
        }
        Command::Profile { user_id, show } => {
            let (mut page, user) = profile_page(api, *user_id).await;
            if let Some(index) = show {
                let entry = profile::application_entry(*index);
                if !view::click(api, &mut page, &entry, user).await {
                    warn!("No application at index {}", index);
                }
            }
            page
        }
        Command::Login(args) => submit_static(api, FormKind::Login, "/login", args).await,
        Command::Register(args) => {
            submit_static(api, FormKind::Register, "/register", args).await
        }
        Command::Contact(args) => submit_static(api, FormKind::Contact, "/contact", args).await,
        Command::UpdateProfile(args) => {
            let (mut page, _) = profile_page(api, Some(args.user_id)).await;
            fill(&mut page, args.fields());
            submit(api, &mut page, FormKind::Profile, args.user_id).await;
            page
        }
        Command::Apply(args) => {
            let mut page = posting_detail(api, &args.hash).await;
            if !view::click(api, &mut page, detail::APPLY_BUTTON, 0).await {
                warn!("This posting does not take applications from you");
                return page;
            }
            fill(&mut page, args.fields());
            submit(api, &mut page, FormKind::Apply, 0).await;
            page
        }
    }
}

async fn my_postings<T: Transport>(api: &Api<T>) -> Page {
    let mut page = Page::new(Location::parse("/my-postings"));
    postings::mount_mine(&mut page);
    step!("My postings", postings::load_mine(api, &mut page).await);
    step!("Stats", view::dashboard::load_stats(api, &mut page).await);
    page
}

async fn posting_detail<T: Transport>(api: &Api<T>, hash: &str) -> Page {
    let url = format!("/posting-detail?hash={}", urlencoding::encode(hash));
    let mut page = Page::new(Location::parse(&url));
    detail::mount(&mut page);
    step!("Posting", detail::load(api, &mut page).await);
    page
}

/// The profile page, and the id of its owner when known.
async fn profile_page<T: Transport>(api: &Api<T>, user_id: Option<i64>) -> (Page, i64) {
    let mut page = Page::new(Location::parse("/profile"));
    profile::mount(&mut page);
    let owner = match user_id {
        Some(id) => {
            step!("Profile", profile::load_by_user(api, &mut page, id).await);
            Some(id)
        }
        None => step!("Profile", profile::load(api, &mut page).await),
    };
    (page, owner.unwrap_or_default())
}

async fn submit_static<T: Transport>(
    api: &Api<T>,
    kind: FormKind,
    path: &str,
    args: &impl FormArgs,
) -> Page {
    let mut page = Page::new(Location::parse(path));
    form::mount(&mut page, kind);
    fill(&mut page, args.fields());
    submit(api, &mut page, kind, 0).await;
    page
}

fn fill(page: &mut Page, fields: FormData) {
    for (name, value) in fields.iter() {
        page.set_value(name, value);
    }
}

/// Clicks the form's submit button, then lets a pending redirect happen.
async fn submit<T: Transport>(api: &Api<T>, page: &mut Page, kind: FormKind, user: i64) {
    let spec = form::FormSpec::for_kind(kind, user);
    let Some(button) = page.submit_button(spec.form).map(str::to_string) else {
        warn!("No form #{} on this page", spec.form);
        return;
    };
    step!("Submit", view::click(api, page, &button, user).await);
    page.advance(form::REDIRECT_DELAY);
}
