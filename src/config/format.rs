use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the rendered page is printed.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Raw page markup
    Html,
    /// Markup converted to readable text
    #[default]
    Text,
}

impl OutputFormat {
    pub fn render(&self, html: &str) -> String {
        match self {
            Self::Html => html.to_string(),
            Self::Text => htmd::convert(html).unwrap_or_else(|_| html.to_string()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Text => write!(f, "text"),
        }
    }
}
