use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{BuildLensError, Result};

const USER_AGENT: &str = concat!("buildlens/", env!("CARGO_PKG_VERSION"));

/// Builds an HTTP client with the crate user agent and optional bearer auth.
pub fn build_client(accept: &'static str, token: Option<&Token>) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(accept));

    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|e| BuildLensError::Config(format!("Invalid token: {e}")))?;
        headers.insert(AUTHORIZATION, value);
    }

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| BuildLensError::Config(format!("Failed to create HTTP client: {e}")))
}

/// Parses a base URL, normalizing it to end with a slash so path segments append.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url =
        Url::parse(base_url).map_err(|e| BuildLensError::Config(format!("Invalid base URL: {e}")))?;

    if url.cannot_be_a_base() {
        return Err(BuildLensError::Config(format!(
            "Invalid base URL: {base_url} cannot carry a path"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Appends escaped path segments to a base URL.
pub fn with_segments<I, S>(base: &Url, segments: I) -> Result<Url>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| BuildLensError::Config(format!("Invalid base URL: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Decodes a JSON body, turning non-2xx statuses into `Api` errors.
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        return Err(BuildLensError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}
