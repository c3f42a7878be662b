use log::warn;

use crate::{
    api::{Api, Transport},
    html::Markup,
    model::Overview,
    page::Page,
};

pub const COUNTERS: [&str; 4] = [
    "total-postings",
    "total-views",
    "total-applications",
    "avg-applications",
];

/// Counters start as `-` until the stats arrive.
pub fn mount(page: &mut Page) {
    for id in COUNTERS {
        page.declare(id, Markup::trusted("-"));
    }
}

/// Failures leave the placeholders alone.
pub async fn load_stats<T: Transport>(api: &Api<T>, page: &mut Page) {
    match api.dashboard_stats().await {
        Ok(stats) => {
            if let Some(overview) = stats.overview {
                display(page, &overview);
            }
        }
        Err(e) => warn!("Failed to load dashboard stats: {}", e),
    }
}

pub fn display(page: &mut Page, overview: &Overview) {
    page.set_text(
        "total-postings",
        overview.total_postings.unwrap_or_default().to_string(),
    );
    page.set_text(
        "total-views",
        overview.total_views.unwrap_or_default().to_string(),
    );
    page.set_text(
        "total-applications",
        overview.total_applications.unwrap_or_default().to_string(),
    );
    page.set_text(
        "avg-applications",
        overview.average_applications().to_string(),
    );
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{api::stub::StubTransport, page::Location};

    #[tokio::test]
    async fn writes_counters_and_average() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/dashboard/stats",
            200,
            json!({ "overview": { "total_postings": 3, "total_views": 40, "total_applications": 7 } }),
        ));
        let mut page = Page::new(Location::parse("/my-postings.html"));
        mount(&mut page);

        load_stats(&api, &mut page).await;

        assert_eq!(page.html("total-postings"), "3");
        assert_eq!(page.html("total-views"), "40");
        assert_eq!(page.html("total-applications"), "7");
        assert_eq!(page.html("avg-applications"), "2.3");
    }

    #[tokio::test]
    async fn zero_postings_average_is_zero() {
        let api = Api::new(StubTransport::new().reply(
            "GET /api/dashboard/stats",
            200,
            json!({ "overview": { "total_postings": 0, "total_applications": 5 } }),
        ));
        let mut page = Page::new(Location::parse("/my-postings.html"));
        mount(&mut page);

        load_stats(&api, &mut page).await;

        assert_eq!(page.html("avg-applications"), "0");
        assert_eq!(page.html("total-views"), "0");
    }

    #[tokio::test]
    async fn failure_keeps_placeholders() {
        let api = Api::new(StubTransport::new().fail("GET /api/dashboard/stats"));
        let mut page = Page::new(Location::parse("/my-postings.html"));
        mount(&mut page);

        load_stats(&api, &mut page).await;

        for id in COUNTERS {
            assert_eq!(page.html(id), "-");
        }
    }
}
