use serde::{Deserialize, Serialize};

use super::{Application, Posting};

/// How many entries the per-user activity feed keeps of each kind.
pub const RECENT_LIMIT: usize = 3;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub member_since: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ProfileStats {
    pub total_postings: Option<u64>,
    pub total_applications: Option<u64>,
    pub member_since: Option<String>,
}

/// `/api/profile/data`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ProfileData {
    pub user: User,
    pub stats: Option<ProfileStats>,
    pub recent_postings: Vec<Posting>,
    pub recent_applications: Vec<Application>,
}

/// The two ways a profile page can be fed, normalized into [`ProfileData`]
/// before anything is rendered.
#[derive(Debug, Clone)]
pub enum ProfileSource {
    Aggregated(ProfileData),
    PerUser {
        user: User,
        postings: Vec<Posting>,
        applications: Vec<Application>,
    },
}

impl From<ProfileSource> for ProfileData {
    fn from(source: ProfileSource) -> Self {
        match source {
            ProfileSource::Aggregated(data) => data,
            ProfileSource::PerUser {
                user,
                mut postings,
                mut applications,
            } => {
                let stats = ProfileStats {
                    total_postings: Some(postings.len() as u64),
                    total_applications: Some(applications.len() as u64),
                    member_since: user.member_since.clone(),
                };
                postings.truncate(RECENT_LIMIT);
                applications.truncate(RECENT_LIMIT);
                Self {
                    user,
                    stats: Some(stats),
                    recent_postings: postings,
                    recent_applications: applications,
                }
            }
        }
    }
}
