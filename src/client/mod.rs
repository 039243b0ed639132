//! HTTP client for the Seyren API
//!
//! [`SeyrenClient`] owns one `reqwest` session bound to a base URL and
//! optional credentials. Operations are grouped by resource:
//! alerts (`alerts.rs`), checks and subscriptions (`checks.rs`),
//! metrics and charts (`metrics.rs`). Paged collections go through
//! [`paginate::fetch_all`].

mod alerts;
mod checks;
pub mod config;
mod metrics;
pub mod paginate;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Auth, ClientConfig, DEFAULT_URL};
pub use metrics::ChartOptions;
pub use paginate::{Cursor, Page};

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{Result, SeyrenError};

/// Client for a single Seyren instance
#[derive(Debug, Clone)]
pub struct SeyrenClient {
    base_url: Url,
    http: reqwest::Client,
    auth: Option<Auth>,
}

impl SeyrenClient {
    /// Client for `url` with default settings
    pub fn new(url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(config.url.trim())
            .map_err(|e| SeyrenError::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SeyrenError::InvalidUrl(format!(
                "{}: cannot carry a path",
                config.url
            )));
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            http: builder.build()?,
            auth: config.auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/api/<segments...>`, each segment percent-encoded
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SeyrenError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url);
        match &self.auth {
            Some(auth) => auth.apply(request),
            None => request,
        }
    }

    /// Send a request, turning any non-success status into an error
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(method = %method, url = %url, "Seyren API call");

        let response = self.http.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                "Seyren API call failed"
            );
            return Err(SeyrenError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// GET `url` and decode the JSON body
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .execute(self.request(Method::GET, url).query(query))
            .await?;
        decode(response).await
    }
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| SeyrenError::MalformedResponse(e.to_string()))
}

/// Id of a created resource, taken from the `Location` header
pub(crate) fn created_id(response: &Response) -> Option<String> {
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)?
        .to_str()
        .ok()?;
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
