use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::auth::Token;
use crate::builds::{BuildSource, PageRequest};
use crate::error::Result;
use crate::http::{build_client, decode_json, parse_base_url, with_segments};

/// Client for the builds API that stores raw ingestion records.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

/// Envelope of every builds API response.
#[derive(Deserialize)]
struct BuildsResponse {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

impl ApiClient {
    /// Create a new builds API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root (e.g., "http://localhost:6500/api")
    /// * `token` - Optional bearer token
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL or token is invalid.
    pub fn new(base_url: &str, token: Option<Token>) -> Result<Self> {
        let client = build_client("application/json", token.as_ref())?;
        let base_url = parse_base_url(base_url)?;

        Ok(Self { client, base_url })
    }

    fn page_url(&self, request: &PageRequest) -> Result<Url> {
        with_segments(
            &self.base_url,
            [
                "builds".to_string(),
                "limit".to_string(),
                request.limit.to_string(),
                "offset".to_string(),
                request.offset.to_string(),
                request.filter.as_str().to_string(),
                request.user_id.to_string(),
            ],
        )
    }

    /// Fetch one page of raw records from
    /// `GET /builds/limit/{limit}/offset/{offset}/{filter}/{userId}`.
    ///
    /// A response without a `data` array is treated as an empty page.
    pub async fn fetch_builds(&self, request: &PageRequest) -> Result<Vec<Value>> {
        let url = self.page_url(request)?;
        debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        let body: BuildsResponse = decode_json(response).await?;

        Ok(body.data.unwrap_or_default())
    }
}

#[async_trait]
impl BuildSource for ApiClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Value>> {
        self.fetch_builds(request).await
    }
}
