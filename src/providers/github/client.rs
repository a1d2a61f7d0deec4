use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

use crate::auth::Token;
use crate::error::Result;
use crate::http::{build_client, decode_json, parse_base_url, with_segments};
use crate::providers::enrichment::{ProfileLookup, UserProfile};

use super::types::GitHubUser;

/// GitHub REST client used to enrich builds with user profiles.
#[derive(Clone)]
pub struct GitHubClient {
    /// HTTP client
    client: Client,
    /// Base URL for the GitHub API
    base_url: Url,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `token` - Optional GitHub personal access token, raises the rate limit
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL or token is invalid.
    pub fn new(base_url: &str, token: Option<Token>) -> Result<Self> {
        let client = build_client("application/vnd.github+json", token.as_ref())?;
        let base_url = parse_base_url(base_url)?;

        Ok(Self { client, base_url })
    }

    /// Fetch a user from `GET /users/{username}`.
    pub async fn fetch_user(&self, username: &str) -> Result<GitHubUser> {
        let url = with_segments(&self.base_url, ["users", username])?;
        let response = self.client.get(url).send().await?;
        let user: GitHubUser = decode_json(response).await?;

        debug!(
            "Fetched GitHub profile for {}",
            user.login.as_deref().unwrap_or(username)
        );
        Ok(user)
    }
}

#[async_trait]
impl ProfileLookup for GitHubClient {
    async fn fetch_profile(&self, username: &str) -> Result<UserProfile> {
        self.fetch_user(username).await.map(UserProfile::from)
    }
}
