//! HTTP client for the workspace API.
//!
//! Every endpoint answers with the same envelope, `{ success, data, message }`.
//! [`ApiClient`] attaches the session's bearer token, unwraps the envelope and
//! maps failures onto [`DeskError`]:
//!
//! - transport failures become `Http`, or `Timeout` when the client-side
//!   deadline passed;
//! - HTTP 401 becomes `Unauthorized`;
//! - other 4xx responses become `Validation` with any field messages;
//! - a `success: false` envelope becomes `Rejected`.
//!
//! There are no retries.

pub mod auth;
pub mod companies;
pub mod error;
pub mod issues;
pub mod projects;
pub mod sprints;
pub mod stats;

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{DeskError, Result};
use crate::list::{IssueFilters, ListQuery, ListSource, PaginatedList, ProjectFilters};
use crate::session::SessionContext;
use crate::types::{Issue, Project};

/// The response envelope shared by every endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<Value>,
}

impl<T> Envelope<T> {
    /// The envelope's message, whether sent as a string or as
    /// `{ error_message }`.
    pub fn message(&self) -> Option<String> {
        let message = self.message.as_ref()?;
        error::extract_message(&serde_json::json!({ "message": message }))
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    base: Url,
    timeout: Duration,
    session: SessionContext,
}

impl ApiClient {
    /// Build a client for `config`, authenticating with `session`.
    pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self> {
        let base_url = config.base_url()?;
        let base = Url::parse(&base_url)
            .map_err(|e| DeskError::InvalidUrl(base_url.clone(), e.to_string()))?;
        let timeout = config.timeout();
        let http = Client::builder()
            .user_agent(concat!("issuedesk/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            base,
            timeout,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// `segments` appended to the base URL's path, each percent-encoded, so
    /// an id can never reach a different endpoint.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a path to extend.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request to `segments`, with the bearer token when signed in.
    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        let builder = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and unwrap the envelope.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Envelope<T>> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(%method, %path, "api request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| error::from_transport(e, self.timeout))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| error::from_transport(e, self.timeout))?;

        if !status.is_success() {
            let err = error::from_status(status, &body);
            tracing::warn!(%method, %path, status = status.as_u16(), error = %err, "api request failed");
            return Err(err);
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            let message = envelope
                .message()
                .unwrap_or_else(|| "request was rejected".to_string());
            tracing::warn!(%method, %path, %message, "api request rejected");
            return Err(DeskError::Rejected(message));
        }
        tracing::debug!(%method, %path, status = status.as_u16(), "api response");
        Ok(envelope)
    }

    /// Send a request and return the envelope's `data`.
    pub(crate) async fn send_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.send::<T>(builder)
            .await?
            .data
            .ok_or_else(|| DeskError::Other("response carried no data".to_string()))
    }

    /// Send a mutation whose response data is not needed. Returns the
    /// server's message, if any.
    pub(crate) async fn send_ack(&self, builder: RequestBuilder) -> Result<Option<String>> {
        Ok(self.send::<Value>(builder).await?.message())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.send_data(self.request(Method::GET, segments)).await
    }

    pub(crate) async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_data(self.request(Method::POST, segments).json(body))
            .await
    }

    pub(crate) async fn patch<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_data(self.request(Method::PATCH, segments).json(body))
            .await
    }
}

impl ListSource<Issue, IssueFilters> for ApiClient {
    fn fetch(
        &self,
        query: &ListQuery<IssueFilters>,
    ) -> impl Future<Output = Result<PaginatedList<Issue>>> + Send {
        let builder = self.request(Method::GET, &["issues"]).query(&query.params());
        async move { self.send_data(builder).await }
    }
}

impl ListSource<Project, ProjectFilters> for ApiClient {
    fn fetch(
        &self,
        query: &ListQuery<ProjectFilters>,
    ) -> impl Future<Output = Result<PaginatedList<Project>>> + Send {
        let builder = self
            .request(Method::GET, &["projects"])
            .query(&query.params())
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache");
        async move { self.send_data(builder).await }
    }
}
