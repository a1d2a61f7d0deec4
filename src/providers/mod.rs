//! Provider-specific payload normalization.
//!
//! Each supported provider implements [`ProviderNormalizer`]. Extraction is
//! synchronous and may leave behind a [`PendingLookup`] that the enrichment
//! phase resolves over the network.

mod bitbucket;
pub mod enrichment;
pub mod github;
pub mod payload;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::builds::types::{Provider, RawIngestionRecord};
use crate::error::{BuildLensError, Result};

pub use bitbucket::BitbucketNormalizer;
pub use github::GitHubNormalizer;

/// Provider-derived decoration for a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderExtract {
    pub display_name: Option<String>,
    pub commit_message: Option<String>,
    pub author_avatar_url: Option<String>,
    pub committer_avatar_url: Option<String>,
    /// Overrides the commit date derived from the shared identity fields.
    pub commit_date: Option<DateTime<Utc>>,
}

/// A secondary profile lookup that would complete an extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingLookup {
    /// Fetch the commit author's avatar.
    AuthorAvatar { username: String },
    /// Fetch the display name of the user who opened the pull request.
    DisplayName { username: String },
}

impl PendingLookup {
    pub fn username(&self) -> &str {
        match self {
            Self::AuthorAvatar { username } | Self::DisplayName { username } => username,
        }
    }
}

/// Output of the synchronous extraction phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingExtract {
    pub extract: ProviderExtract,
    pub lookup: Option<PendingLookup>,
}

impl From<ProviderExtract> for PendingExtract {
    fn from(extract: ProviderExtract) -> Self {
        Self {
            extract,
            lookup: None,
        }
    }
}

pub trait ProviderNormalizer: Send + Sync {
    fn extract(&self, payload: &Value) -> PendingExtract;
}

/// The normalizer for a provider, or `None` when the provider is not supported.
pub fn normalizer_for(provider: Provider) -> Option<&'static dyn ProviderNormalizer> {
    match provider {
        Provider::GitHub => Some(&GitHubNormalizer),
        Provider::Bitbucket => Some(&BitbucketNormalizer),
        Provider::GitLab | Provider::Gogs => None,
    }
}

/// Resolves the provider of a record and its normalizer.
///
/// # Errors
///
/// - `MalformedPayload` if the record carries no provider tag
/// - `UnsupportedProvider` if the tag is unknown or has no normalizer
pub fn resolve(
    record: &RawIngestionRecord,
) -> Result<(Provider, &'static dyn ProviderNormalizer)> {
    let tag = record
        .provider_tag()
        .ok_or_else(|| BuildLensError::malformed(record.id, "missing provider tag"))?;

    let unsupported = || BuildLensError::UnsupportedProvider {
        record_id: record.id,
        provider: tag.to_string(),
    };

    let provider = Provider::from_tag(tag).ok_or_else(unsupported)?;
    let normalizer = normalizer_for(provider).ok_or_else(unsupported)?;

    Ok((provider, normalizer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with_provider(tag: &str) -> RawIngestionRecord {
        RawIngestionRecord::from_value(json!({
            "id": 4,
            "repository": { "full_name": "a/b", "repository_provider": tag },
            "jobs": [],
        }))
        .unwrap()
    }

    #[test]
    fn test_supported_providers_resolve() {
        let (provider, _) = resolve(&record_with_provider("github")).unwrap();
        assert_eq!(provider, Provider::GitHub);

        let (provider, _) = resolve(&record_with_provider("bitbucket")).unwrap();
        assert_eq!(provider, Provider::Bitbucket);
    }

    #[test]
    fn test_gitlab_and_gogs_are_unsupported() {
        for tag in ["gitlab", "gogs"] {
            let err = resolve(&record_with_provider(tag)).err().unwrap();
            match err {
                BuildLensError::UnsupportedProvider {
                    record_id,
                    provider,
                } => {
                    assert_eq!(record_id, 4);
                    assert_eq!(provider, tag);
                }
                other => panic!("expected unsupported provider, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let err = resolve(&record_with_provider("sourcehut")).err().unwrap();
        assert!(matches!(err, BuildLensError::UnsupportedProvider { .. }));
    }

    #[test]
    fn test_missing_tag_is_malformed() {
        let record = RawIngestionRecord::from_value(json!({ "id": 4, "jobs": [] })).unwrap();
        let err = resolve(&record).err().unwrap();
        assert!(matches!(err, BuildLensError::MalformedPayload { .. }));
    }
}
