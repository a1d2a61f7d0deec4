use serde::Deserialize;

use crate::providers::enrichment::UserProfile;

/// Subset of the GitHub `GET /users/{username}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    /// Login handle, absent from some GitHub Enterprise responses
    #[serde(default)]
    pub login: Option<String>,
    /// Display name, unset when the user never configured one
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl From<GitHubUser> for UserProfile {
    fn from(user: GitHubUser) -> Self {
        Self {
            display_name: user.name.filter(|name| !name.is_empty()),
            avatar_url: user.avatar_url,
        }
    }
}
