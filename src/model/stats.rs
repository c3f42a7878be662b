use serde::{Deserialize, Serialize};

/// `/api/dashboard/stats`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct DashboardStats {
    pub overview: Option<Overview>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Overview {
    pub total_postings: Option<u64>,
    pub total_views: Option<u64>,
    pub total_applications: Option<u64>,
}

impl Overview {
    /// Applications per posting, one decimal place. Zero without postings.
    pub fn average_applications(&self) -> f64 {
        match self.total_postings {
            Some(postings) if postings > 0 => {
                let applications = self.total_applications.unwrap_or_default() as f64;
                (applications / postings as f64 * 10.0).round() / 10.0
            }
            _ => 0.0,
        }
    }
}
