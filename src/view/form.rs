use std::time::Duration;

use log::{info, warn};

use crate::{
    api::{Api, ApiError, FormTarget, Transport},
    html::{el, Markup},
    page::{FormKind, Page, Task},
};

use super::popup::{show_popup, Severity};

pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

const CONNECTION_ERROR: &str = "Connection error. Please try again.";

/// How one form is submitted and what the user sees afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSpec {
    pub form: &'static str,
    pub target: FormTarget,
    pub busy: &'static str,
    pub success_title: &'static str,
    pub success_message: &'static str,
    /// Prefer the backend's `message` over `success_message`.
    pub server_message: bool,
    pub reset: bool,
    pub redirect: Option<&'static str>,
    pub error_title: &'static str,
    pub error_fallback: &'static str,
}

impl FormSpec {
    /// `user` is the profile being edited, only used by [`FormKind::Profile`].
    pub fn for_kind(kind: FormKind, user: i64) -> Self {
        match kind {
            FormKind::Login => Self {
                form: "login-form",
                target: FormTarget::Login,
                busy: "Logging in...",
                success_title: "Success!",
                success_message: "Login successful. Redirecting...",
                server_message: false,
                reset: false,
                redirect: Some("/data-view"),
                error_title: "Login Failed",
                error_fallback: "Invalid email or password",
            },
            FormKind::Register => Self {
                form: "register-form",
                target: FormTarget::Register,
                busy: "Creating Account...",
                success_title: "Account Created!",
                success_message:
                    "Your account has been created successfully. Redirecting to login...",
                server_message: false,
                reset: false,
                redirect: Some("/login"),
                error_title: "Registration Failed",
                error_fallback: "Unable to create account. Please try again.",
            },
            FormKind::Contact => Self {
                form: "contact-form",
                target: FormTarget::Contact,
                busy: "Sending...",
                success_title: "Message Sent!",
                success_message: "Thank you for your message! We will get back to you soon.",
                server_message: true,
                reset: true,
                redirect: None,
                error_title: "Send Failed",
                error_fallback: "Unable to send message. Please try again.",
            },
            FormKind::Profile => Self {
                form: "profile-form",
                target: FormTarget::UpdateUser(user),
                busy: "Updating...",
                success_title: "Profile Updated!",
                success_message: "Your profile has been updated successfully.",
                server_message: true,
                reset: false,
                redirect: None,
                error_title: "Update Failed",
                error_fallback: "Unable to update profile. Please try again.",
            },
            FormKind::Apply => Self {
                form: "apply-form",
                target: FormTarget::Apply,
                busy: "Submitting...",
                success_title: "Application Sent!",
                success_message: "Your application has been submitted.",
                server_message: true,
                reset: true,
                redirect: None,
                error_title: "Application Failed",
                error_fallback: "Unable to submit application. Please try again.",
            },
        }
    }
}

/// Outcome of a submission, for callers and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Sent,
    Rejected,
    Failed,
    /// Required fields were empty, nothing was sent.
    Incomplete,
    /// No such form on this page, or its button is disabled.
    Ignored,
}

pub async fn submit<T: Transport>(api: &Api<T>, page: &mut Page, spec: &FormSpec) -> Submitted {
    let Some(button) = page.submit_button(spec.form).map(str::to_string) else {
        warn!("no form #{} on this page", spec.form);
        return Submitted::Ignored;
    };
    if page.is_disabled(&button) {
        return Submitted::Ignored;
    }
    let missing = page.missing_fields(spec.form);
    if !missing.is_empty() {
        warn!("#{} is missing {}", spec.form, missing.join(", "));
        return Submitted::Incomplete;
    }
    let Some(data) = page.form_data(spec.form) else {
        return Submitted::Ignored;
    };

    let original = page
        .element(&button)
        .map(|e| e.html())
        .unwrap_or_default();
    page.set_text(&button, spec.busy);
    page.set_disabled(&button, true);

    let outcome = match api.submit(spec.target, data).await {
        Ok(body) => {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| spec.server_message && !m.is_empty())
                .unwrap_or(spec.success_message);
            show_popup(page, spec.success_title, message, Severity::Success);
            if spec.reset {
                page.reset_form(spec.form);
            }
            if let Some(url) = spec.redirect {
                page.schedule(REDIRECT_DELAY, Task::Navigate(url.to_string()));
            }
            info!("#{} submitted", spec.form);
            Submitted::Sent
        }
        Err(e @ ApiError::Rejected { .. }) => {
            let message = e.detail().unwrap_or(spec.error_fallback);
            show_popup(page, spec.error_title, message, Severity::Error);
            Submitted::Rejected
        }
        Err(e) => {
            warn!("#{} failed: {}", spec.form, e);
            show_popup(page, "Error", CONNECTION_ERROR, Severity::Error);
            Submitted::Failed
        }
    };

    page.set_html(&button, original);
    page.set_disabled(&button, false);
    outcome
}

fn field(name: &str, label: &str, kind: &str, required: bool) -> Markup {
    el("div")
        .class("mb-3")
        .child(
            el("label")
                .attr("for", name)
                .class("form-label")
                .text(label),
        )
        .child(
            el("input")
                .attr("type", kind)
                .class("form-control")
                .id(name)
                .attr("name", name)
                .flag("required", required),
        )
        .render()
}

struct Layout {
    form: &'static str,
    submit: &'static str,
    label: &'static str,
    /// name, label, input type, required
    fields: &'static [(&'static str, &'static str, &'static str, bool)],
}

fn layout(kind: FormKind) -> Layout {
    match kind {
        FormKind::Login => Layout {
            form: "login-form",
            submit: "login-submit",
            label: "Login",
            fields: &[
                ("email", "Email", "email", true),
                ("password", "Password", "password", true),
            ],
        },
        FormKind::Register => Layout {
            form: "register-form",
            submit: "register-submit",
            label: "Create Account",
            fields: &[
                ("name", "Name", "text", true),
                ("surname", "Surname", "text", true),
                ("username", "Username", "text", true),
                ("email", "Email", "email", true),
                ("password", "Password", "password", true),
            ],
        },
        FormKind::Contact => Layout {
            form: "contact-form",
            submit: "contact-submit",
            label: "Send Message",
            fields: &[
                ("name", "Name", "text", true),
                ("email", "Email", "email", true),
                ("message", "Message", "text", true),
            ],
        },
        FormKind::Profile => Layout {
            form: "profile-form",
            submit: "profile-submit",
            label: "Update Profile",
            fields: &[
                ("name", "Name", "text", false),
                ("surname", "Surname", "text", false),
                ("username", "Username", "text", false),
                ("email", "Email", "email", false),
            ],
        },
        FormKind::Apply => Layout {
            form: "apply-form",
            submit: "apply-submit",
            label: "Submit Application",
            fields: &[
                ("posting_id", "", "hidden", true),
                ("message", "Message (Optional)", "text", false),
                ("cover_letter", "Cover Letter (Optional)", "text", false),
            ],
        },
    }
}

/// Declares one of the static forms on a fresh page, with its markup.
pub fn mount(page: &mut Page, kind: FormKind) {
    let layout = layout(kind);
    let markup = el("form")
        .id(layout.form)
        .children(
            layout
                .fields
                .iter()
                .map(|(name, label, kind, required)| field(name, label, kind, *required)),
        )
        .child(
            el("button")
                .id(layout.submit)
                .attr("type", "submit")
                .class("btn btn-primary")
                .text(layout.label),
        )
        .render();
    page.declare(&format!("{}-markup", layout.form), markup);

    let names: Vec<(&str, bool)> = layout.fields.iter().map(|(n, _, _, r)| (*n, *r)).collect();
    page.declare_form(
        layout.form,
        kind,
        layout.submit,
        Markup::text(layout.label),
        &names,
    );
}
