pub mod application;
pub mod auth;
pub mod posting;
pub mod profile;
pub mod stats;

pub use application::*;
pub use auth::*;
pub use posting::*;
pub use profile::*;
pub use stats::*;

/// Falls back when the value is missing or empty, the way the pages treat
/// falsy strings.
pub fn text_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}
