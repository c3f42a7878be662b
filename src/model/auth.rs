use serde::{Deserialize, Serialize};

/// `/api/auth/buttons`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct AuthButton {
    #[serde(default)]
    pub authenticated: bool,
    pub method: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub text: Option<String>,
}

/// `/api/auth/status`
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default)]
pub struct AuthStatus {
    #[serde(default)]
    pub authenticated: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub url: String,
    pub text: String,
    pub path_check: Option<String>,
}

impl NavItem {
    fn fixed(url: &str, text: &str) -> Self {
        Self {
            url: url.to_string(),
            text: text.to_string(),
            path_check: Some(url.to_string()),
        }
    }
    pub fn is_active(&self, path: &str) -> bool {
        self.path_check.as_deref() == Some(path)
    }
}

/// Either an explicit item list (`/api/navigation`) or the bare auth flag the
/// older `/api/auth/status` returns.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Navigation {
    Items { nav_items: Vec<NavItem> },
    Status(AuthStatus),
}

impl Navigation {
    pub fn into_items(self) -> Vec<NavItem> {
        match self {
            Self::Items { nav_items } => nav_items,
            Self::Status(AuthStatus {
                authenticated: true,
            }) => authenticated_menu(),
            Self::Status(_) => guest_menu(),
        }
    }
}

pub fn authenticated_menu() -> Vec<NavItem> {
    vec![
        NavItem::fixed("/data-view", "Data View"),
        NavItem::fixed("/contact", "Contact Form"),
        NavItem::fixed("/profile", "User Profile"),
    ]
}

pub fn guest_menu() -> Vec<NavItem> {
    vec![
        NavItem::fixed("/login", "Login Form"),
        NavItem::fixed("/register", "Create an account"),
        NavItem::fixed("/contact", "Contact Form"),
    ]
}
