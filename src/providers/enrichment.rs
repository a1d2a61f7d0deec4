use async_trait::async_trait;
use log::{debug, warn};

use crate::error::Result;

use super::{PendingExtract, PendingLookup, ProviderExtract};

/// Public profile of a provider user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Source of user profiles for best-effort enrichment.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<UserProfile>;
}

/// Resolves the pending lookup of an extract, if any.
///
/// Lookup failures are logged and leave the dependent field unset. They are
/// never retried and never fail the build. With no `lookup` configured the
/// extract is returned as-is.
pub async fn complete(pending: PendingExtract, lookup: Option<&dyn ProfileLookup>) -> ProviderExtract {
    let PendingExtract { extract, lookup: request } = pending;

    let Some(request) = request else {
        return extract;
    };

    let Some(lookup) = lookup else {
        debug!("Enrichment disabled, skipping profile lookup for {}", request.username());
        return extract;
    };

    let profile = match lookup.fetch_profile(request.username()).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Profile lookup for {} failed: {e}", request.username());
            return extract;
        }
    };

    match request {
        PendingLookup::AuthorAvatar { .. } => ProviderExtract {
            author_avatar_url: profile.avatar_url,
            ..extract
        },
        PendingLookup::DisplayName { .. } => ProviderExtract {
            display_name: profile.display_name,
            ..extract
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::BuildLensError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory profile source that counts calls and fails for unknown users.
    #[derive(Default)]
    pub(crate) struct StubLookup {
        pub profiles: HashMap<String, UserProfile>,
        pub calls: AtomicUsize,
    }

    impl StubLookup {
        pub(crate) fn with(username: &str, name: &str, avatar: &str) -> Self {
            let mut profiles = HashMap::new();
            profiles.insert(
                username.to_string(),
                UserProfile {
                    display_name: Some(name.to_string()),
                    avatar_url: Some(avatar.to_string()),
                },
            );
            Self {
                profiles,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProfileLookup for StubLookup {
        async fn fetch_profile(&self, username: &str) -> Result<UserProfile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.profiles
                .get(username)
                .cloned()
                .ok_or_else(|| BuildLensError::Api {
                    status: 404,
                    message: "Not Found".to_string(),
                })
        }
    }

    fn pending(lookup: Option<PendingLookup>) -> PendingExtract {
        PendingExtract {
            extract: ProviderExtract {
                commit_message: Some("fix tests".to_string()),
                committer_avatar_url: Some("https://avatars/committer".to_string()),
                ..Default::default()
            },
            lookup,
        }
    }

    #[tokio::test]
    async fn test_no_pending_lookup_makes_no_call() {
        let stub = StubLookup::default();
        let extract = complete(pending(None), Some(&stub)).await;

        assert_eq!(stub.calls(), 0);
        assert_eq!(extract.commit_message.as_deref(), Some("fix tests"));
    }

    #[tokio::test]
    async fn test_author_avatar_lookup_fills_only_avatar() {
        let stub = StubLookup::with("octocat", "The Octocat", "https://avatars/octocat");
        let request = PendingLookup::AuthorAvatar {
            username: "octocat".to_string(),
        };

        let extract = complete(pending(Some(request)), Some(&stub)).await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(extract.author_avatar_url.as_deref(), Some("https://avatars/octocat"));
        assert_eq!(extract.display_name, None);
        assert_eq!(extract.committer_avatar_url.as_deref(), Some("https://avatars/committer"));
    }

    #[tokio::test]
    async fn test_display_name_lookup_fills_only_name() {
        let stub = StubLookup::with("octocat", "The Octocat", "https://avatars/octocat");
        let request = PendingLookup::DisplayName {
            username: "octocat".to_string(),
        };

        let extract = complete(pending(Some(request)), Some(&stub)).await;

        assert_eq!(extract.display_name.as_deref(), Some("The Octocat"));
        assert_eq!(extract.author_avatar_url, None);
    }

    #[tokio::test]
    async fn test_failed_lookup_leaves_field_unset() {
        let stub = StubLookup::default();
        let request = PendingLookup::AuthorAvatar {
            username: "ghost".to_string(),
        };

        let extract = complete(pending(Some(request)), Some(&stub)).await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(extract.author_avatar_url, None);
        assert_eq!(extract.commit_message.as_deref(), Some("fix tests"));
    }

    #[tokio::test]
    async fn test_disabled_enrichment_skips_lookup() {
        let request = PendingLookup::DisplayName {
            username: "octocat".to_string(),
        };

        let extract = complete(pending(Some(request)), None).await;

        assert_eq!(extract.display_name, None);
    }
}
