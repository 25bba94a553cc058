//! HTTP client for the twin registry's read-only graph endpoints.
//!
//! The engine only ever consumes two endpoints, `/api/v1/things` and
//! `/api/v1/relationships`. Both wrap their payload in a
//! `{ success, data }` envelope, and `data` may itself be a
//! `{ data: [...], count }` page depending on the handler, so unwrapping
//! is defensive about both shapes.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use twinmap_core::{Relation, Thing};

const THINGS_PATH: &str = "/api/v1/things";
const RELATIONSHIPS_PATH: &str = "/api/v1/relationships";

/// Default per-request timeout. Expiry surfaces as a recoverable fetch
/// failure, never a hang.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned an unsuccessful envelope: {message}")]
    Api { endpoint: String, message: String },
}

/// Something that can produce the raw thing and relation collections the
/// graph is built from.
///
/// The engine is generic over this so it can be driven by an in-memory
/// source in tests instead of a live backend.
pub trait GraphSource {
    fn fetch_graph(
        &self,
    ) -> impl Future<Output = Result<(Vec<Thing>, Vec<Relation>), ClientError>> + Send;
}

/// Response envelope shared by all registry endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    error: Option<String>,
    data: Option<Payload<T>>,
}

/// The `data` field is either a bare list or a page wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Page {
        data: Vec<T>,
        #[serde(default)]
        #[allow(dead_code)]
        count: Option<u64>,
    },
    List(Vec<T>),
}

impl<T> Envelope<T> {
    fn into_items(self, endpoint: &str) -> Result<Vec<T>, ClientError> {
        if !self.success {
            return Err(ClientError::Api {
                endpoint: endpoint.to_string(),
                message: self.error.unwrap_or_else(|| "no error message".to_string()),
            });
        }
        Ok(match self.data {
            Some(Payload::Page { data, .. }) => data,
            Some(Payload::List(items)) => items,
            None => Vec::new(),
        })
    }
}

/// Client for the twin registry HTTP API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_things(&self) -> Result<Vec<Thing>, ClientError> {
        self.fetch_list(THINGS_PATH).await
    }

    pub async fn fetch_relations(&self) -> Result<Vec<Relation>, ClientError> {
        self.fetch_list(RELATIONSHIPS_PATH).await
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "fetching collection");

        let envelope: Envelope<T> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        envelope.into_items(path)
    }
}

impl GraphSource for ApiClient {
    /// Fetch both collections concurrently; the graph builder needs both
    /// at once, so either failure fails the whole load.
    async fn fetch_graph(&self) -> Result<(Vec<Thing>, Vec<Relation>), ClientError> {
        tokio::try_join!(self.fetch_things(), self.fetch_relations())
    }
}
