use std::fmt;

use serde::{Deserialize, Serialize};

use super::text_or;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Application {
    pub posting_id: Option<i64>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub cover_letter: Option<String>,
    pub applied_at: Option<String>,
    pub posting_creator_name: Option<String>,
    pub post_description: Option<String>,
    pub posting_created_at: Option<String>,
}

impl Application {
    pub fn title(&self) -> &str {
        text_or(&self.title, "Untitled posting")
    }
    pub fn status(&self) -> ApplicationStatus {
        self.status
            .as_deref()
            .map(ApplicationStatus::parse)
            .unwrap_or(ApplicationStatus::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Unknown,
}

impl ApplicationStatus {
    pub fn parse(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            _ => Self::Unknown,
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Unknown => "Unknown",
        }
    }
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "badge bg-warning text-dark",
            Self::Accepted => "badge bg-success",
            Self::Rejected => "badge bg-danger",
            Self::Unknown => "badge bg-secondary",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
