use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::text_or;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Posting {
    pub id: Option<i64>,
    pub hash: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub post_description: Option<String>,
    pub views: Option<u64>,
    pub application_count: Option<u64>,
    pub applications_count: Option<u64>,
    pub status: Option<String>,
    pub formatted_date: Option<String>,
    pub created_at: Option<String>,
    pub creator_name: Option<String>,
    /// Set by list endpoints for postings of the current user.
    pub is_own: Option<bool>,
}

impl Posting {
    pub fn title(&self) -> &str {
        text_or(&self.title, "N/A")
    }
    pub fn category(&self) -> &str {
        text_or(&self.category, "N/A")
    }
    pub fn description(&self) -> &str {
        text_or(&self.post_description, "N/A")
    }
    pub fn views(&self) -> u64 {
        self.views.unwrap_or_default()
    }
    /// Older payloads spell the counter `applications_count`.
    pub fn applications(&self) -> u64 {
        self.application_count
            .filter(|count| *count > 0)
            .or(self.applications_count)
            .unwrap_or_default()
    }
    /// Identifier used in detail links: the public hash, or the id for rows
    /// that predate hashes.
    pub fn public_key(&self) -> String {
        match (&self.hash, self.id) {
            (Some(hash), _) if !hash.is_empty() => hash.clone(),
            (_, Some(id)) => id.to_string(),
            _ => String::new(),
        }
    }
}

/// `/api/postings*` answer either with a bare array or a wrapped one.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum PostingList {
    Bare(Vec<Posting>),
    Wrapped { postings: Vec<Posting> },
    Missing,
}

impl PostingList {
    pub fn into_vec(self) -> Vec<Posting> {
        match self {
            Self::Bare(list) | Self::Wrapped { postings: list } => list,
            Self::Missing => vec![],
        }
    }
}

/// Viewer flags computed by the backend for one posting.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ViewerState {
    #[serde(deserialize_with = "null_as_false")]
    pub is_owner: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub can_apply: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub has_applied: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub is_authenticated: bool,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize, Debug, Clone)]
pub struct WrappedPostingView {
    pub posting: Posting,
    #[serde(flatten)]
    pub viewer: ViewerState,
}

/// `/api/postings/view/:hash`. The legacy shape is the bare posting with no
/// viewer flags. A `posting` key marks the current shape, and a current
/// payload that does not decode is an error, never a legacy posting.
#[derive(Debug, Clone)]
pub enum PostingView {
    Current(WrappedPostingView),
    Legacy(Posting),
}

impl<'de> Deserialize<'de> for PostingView {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let view = if value.get("posting").is_some() {
            serde_json::from_value(value).map(Self::Current)
        } else {
            serde_json::from_value(value).map(Self::Legacy)
        };
        view.map_err(de::Error::custom)
    }
}

impl PostingView {
    pub fn posting(&self) -> &Posting {
        match self {
            Self::Current(view) => &view.posting,
            Self::Legacy(posting) => posting,
        }
    }
    pub fn viewer(&self) -> Option<ViewerState> {
        match self {
            Self::Current(view) => Some(view.viewer),
            Self::Legacy(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn posting_list_accepts_both_shapes() {
        let bare: PostingList = serde_json::from_value(json!([{ "id": 1 }])).unwrap();
        let wrapped: PostingList =
            serde_json::from_value(json!({ "postings": [{ "id": 1 }, { "id": 2 }] })).unwrap();
        let null: PostingList = serde_json::from_value(json!(null)).unwrap();

        assert_eq!(bare.into_vec().len(), 1);
        assert_eq!(wrapped.into_vec().len(), 2);
        assert!(null.into_vec().is_empty());
    }

    #[test]
    fn posting_view_detects_legacy_shape() {
        let current: PostingView = serde_json::from_value(json!({
            "posting": { "id": 3, "title": "Cook" },
            "is_owner": false,
            "can_apply": true
        }))
        .unwrap();
        let viewer = current.viewer().unwrap();
        assert!(viewer.can_apply && !viewer.is_owner && !viewer.has_applied);
        assert_eq!(current.posting().id, Some(3));

        let legacy: PostingView =
            serde_json::from_value(json!({ "id": 4, "title": "Baker" })).unwrap();
        assert!(legacy.viewer().is_none());
        assert_eq!(legacy.posting().title(), "Baker");
    }

    #[test]
    fn null_viewer_flags_read_as_false() {
        let view: PostingView = serde_json::from_value(json!({
            "posting": { "id": 42, "title": "Mine" },
            "is_owner": true,
            "can_apply": null,
            "has_applied": null,
            "is_authenticated": true
        }))
        .unwrap();
        let viewer = view.viewer().unwrap();
        assert!(viewer.is_owner && !viewer.can_apply && !viewer.has_applied);
        assert_eq!(view.posting().id, Some(42));
    }

    #[test]
    fn broken_wrapped_payload_is_not_legacy() {
        let view = serde_json::from_value::<PostingView>(json!({
            "posting": { "id": "forty-two" },
            "is_owner": true
        }));
        assert!(view.is_err());
    }

    #[test]
    fn missing_fields_degrade() {
        let posting = Posting {
            title: Some(String::new()),
            applications_count: Some(4),
            ..Default::default()
        };
        assert_eq!(posting.title(), "N/A");
        assert_eq!(posting.category(), "N/A");
        assert_eq!(posting.views(), 0);
        assert_eq!(posting.applications(), 4);
        assert_eq!(posting.public_key(), "");
    }
}
