pub mod http;
#[cfg(test)]
pub mod stub;

use std::future::Future;

use log::debug;
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{
    Application, AuthButton, DashboardStats, Navigation, Posting, PostingList, PostingView,
    User,
};

pub use http::HttpTransport;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx answer carrying the backend's `{detail}` body.
    #[error("request rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    /// A body that is not the JSON we expected.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ApiError {
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref().filter(|d| !d.is_empty()),
            _ => None,
        }
    }
}

impl From<reqwest_middleware::Error> for ApiError {
    fn from(e: reqwest_middleware::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Ordered `name=value` pairs sent as a multipart body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub form: Option<FormData>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            form: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request to the backend. Credentials are the transport's concern.
pub trait Transport: Sync {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, ApiError>> + Send;
}

/// Where a form submission goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Login,
    Register,
    Contact,
    UpdateUser(i64),
    Apply,
}

impl FormTarget {
    pub fn method(&self) -> Method {
        match self {
            Self::UpdateUser(_) => Method::PUT,
            _ => Method::POST,
        }
    }
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/api/login".to_string(),
            Self::Register => "/api/users".to_string(),
            Self::Contact => "/api/contact".to_string(),
            Self::UpdateUser(id) => format!("/api/users/{}", id),
            Self::Apply => "/api/applications".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingSource {
    All,
    /// Older name of the public list.
    Data,
    Mine,
}

impl PostingSource {
    pub fn path(&self) -> &'static str {
        match self {
            Self::All => "/api/postings",
            Self::Data => "/api/postings-data",
            Self::Mine => "/api/postings/my-postings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSource {
    Navigation,
    AuthStatus,
}

impl NavSource {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Navigation => "/api/navigation",
            Self::AuthStatus => "/api/auth/status",
        }
    }
}

/// Typed view of the backend endpoints.
#[derive(Debug, Clone)]
pub struct Api<T> {
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn exchange(&self, request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        debug!("{} {}", request.method, request.path);
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response.body);
        }

        let body: ErrorBody = serde_json::from_slice(&response.body)?;
        let detail = body
            .detail
            .and_then(|d| d.as_str().map(str::to_string));
        debug!("rejected with {} ({:?})", response.status, detail);
        Err(ApiError::Rejected {
            status: response.status,
            detail,
        })
    }

    async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let body = self.exchange(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn auth_buttons(&self) -> Result<AuthButton, ApiError> {
        self.call(ApiRequest::get("/api/auth/buttons")).await
    }

    pub async fn navigation(&self, source: NavSource) -> Result<Navigation, ApiError> {
        self.call(ApiRequest::get(source.path())).await
    }

    /// Submits a form and returns the decoded success body.
    pub async fn submit(&self, target: FormTarget, form: FormData) -> Result<Value, ApiError> {
        let request = ApiRequest {
            method: target.method(),
            path: target.path(),
            form: Some(form),
        };
        self.call(request).await
    }

    pub async fn user(&self, id: i64) -> Result<User, ApiError> {
        self.call(ApiRequest::get(format!("/api/users/{}", id))).await
    }

    pub async fn postings(&self, source: PostingSource) -> Result<Vec<Posting>, ApiError> {
        let list: PostingList = self.call(ApiRequest::get(source.path())).await?;
        Ok(list.into_vec())
    }

    pub async fn postings_by_user(&self, id: i64) -> Result<Vec<Posting>, ApiError> {
        let list: PostingList = self
            .call(ApiRequest::get(format!("/api/postings/by_user/{}", id)))
            .await?;
        Ok(list.into_vec())
    }

    pub async fn applications_by_user(&self, id: i64) -> Result<Vec<Application>, ApiError> {
        self.call(ApiRequest::get(format!("/api/applications/by_user/{}", id)))
            .await
    }

    pub async fn delete_posting(&self, id: i64) -> Result<(), ApiError> {
        let request = ApiRequest {
            method: Method::DELETE,
            path: format!("/api/postings/{}", id),
            form: None,
        };
        self.exchange(request).await?;
        Ok(())
    }

    pub async fn posting_view(&self, hash: &str) -> Result<PostingView, ApiError> {
        let path = format!("/api/postings/view/{}", urlencoding::encode(hash));
        self.call(ApiRequest::get(path)).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.call(ApiRequest::get("/api/dashboard/stats")).await
    }

    pub async fn profile_data(&self) -> Result<crate::model::ProfileData, ApiError> {
        self.call(ApiRequest::get("/api/profile/data")).await
    }
}
