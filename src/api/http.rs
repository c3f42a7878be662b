use log::{log_enabled, trace};
use reqwest::{header, multipart, Client, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};

use crate::config::Config;

use super::{ApiError, ApiRequest, RawResponse, Transport};

/// Talks to the real backend. Cookies set by the backend (login) are kept
/// for the rest of the process, on top of the configured session.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ClientWithMiddleware,
    base: Url,
    session: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(concat!("jobboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client: ClientBuilder::new(client).build(),
            base: config.backend().clone(),
            session: config.session(),
        })
    }

    fn wrap_request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(session) => builder.header(header::COOKIE, session),
            None => builder,
        }
    }
}

/// Joins an API path onto the backend URL, keeping any path prefix the
/// backend is mounted under.
fn endpoint(base: &Url, path: &str) -> Result<Url, ApiError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ApiError::Network(format!("invalid url {}: {}", path, e)))
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let url = endpoint(&self.base, &request.path)?;
        let mut builder = self.client.request(request.method, url);
        if let Some(form) = request.form {
            let mut multipart = multipart::Form::new();
            for (name, value) in form.iter() {
                multipart = multipart.text(name.to_string(), value.to_string());
            }
            builder = builder.multipart(multipart);
        }

        let response = self.wrap_request(builder).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        if log_enabled!(log::Level::Trace) {
            trace!("{} {}", status, String::from_utf8_lossy(&body));
        }

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(base: &str, path: &str) -> String {
        endpoint(&Url::parse(base).unwrap(), path).unwrap().to_string()
    }

    #[test]
    fn endpoint_keeps_backend_prefix() {
        assert_eq!(
            join("http://localhost:8000", "/api/postings"),
            "http://localhost:8000/api/postings"
        );
        assert_eq!(
            join("http://host/app", "/api/postings/view/a%2Fb"),
            "http://host/app/api/postings/view/a%2Fb"
        );
        assert_eq!(
            join("http://host/app/", "/api/login"),
            "http://host/app/api/login"
        );
    }
}
