use log::debug;
use serde_json::Value;

use crate::providers::payload::{last_entry, str_at, string_at};
use crate::providers::{PendingExtract, PendingLookup, ProviderExtract, ProviderNormalizer};

/// Normalizes GitHub webhook payloads.
///
/// Three payload shapes are recognized, checked in this order:
/// - a commit (`sha` at the top level), carrying both avatars and the committer name
/// - a push (`head_commit`), where the author avatar may need a profile lookup
/// - a pull request (`pull_request`), where the display name needs a profile lookup
pub struct GitHubNormalizer;

impl ProviderNormalizer for GitHubNormalizer {
    fn extract(&self, payload: &Value) -> PendingExtract {
        let commit_message = commit_message(payload);

        if str_at(payload, "/sha").is_some() {
            return ProviderExtract {
                display_name: string_at(payload, "/commit/committer/name"),
                commit_message,
                author_avatar_url: string_at(payload, "/author/avatar_url"),
                committer_avatar_url: string_at(payload, "/committer/avatar_url"),
                ..Default::default()
            }
            .into();
        }

        if let Some(head_commit) = payload.get("head_commit").filter(|v| v.is_object()) {
            return push_extract(payload, head_commit, commit_message);
        }

        if payload.get("pull_request").is_some_and(Value::is_object) {
            let sender_avatar = string_at(payload, "/sender/avatar_url");
            return PendingExtract {
                extract: ProviderExtract {
                    commit_message,
                    author_avatar_url: sender_avatar.clone(),
                    committer_avatar_url: sender_avatar,
                    ..Default::default()
                },
                lookup: string_at(payload, "/sender/login")
                    .map(|username| PendingLookup::DisplayName { username }),
            };
        }

        debug!("GitHub payload has no commit, push or pull request shape");
        ProviderExtract {
            commit_message,
            ..Default::default()
        }
        .into()
    }
}

fn commit_message(payload: &Value) -> Option<String> {
    string_at(payload, "/commit/message")
        .or_else(|| last_entry(payload, "/commits").and_then(|c| string_at(c, "/message")))
        .or_else(|| string_at(payload, "/pull_request/title"))
        .or_else(|| string_at(payload, "/head_commit/message"))
}

/// Push events only carry the sender's avatar. When the head commit was
/// authored by someone other than its committer, the author's avatar has to
/// be looked up. Without an author username the author avatar stays unset.
fn push_extract(payload: &Value, head_commit: &Value, commit_message: Option<String>) -> PendingExtract {
    let committer_avatar = string_at(payload, "/sender/avatar_url");
    let author = str_at(head_commit, "/author/username");
    let committer = str_at(head_commit, "/committer/username");

    let (author_avatar_url, lookup) = match (author, committer) {
        (Some(author), Some(committer)) if author == committer => (committer_avatar.clone(), None),
        (Some(author), _) => {
            let lookup = PendingLookup::AuthorAvatar {
                username: author.to_string(),
            };
            (None, Some(lookup))
        }
        (None, _) => (None, None),
    };

    PendingExtract {
        extract: ProviderExtract {
            display_name: string_at(head_commit, "/author/name"),
            commit_message,
            author_avatar_url,
            committer_avatar_url: committer_avatar,
            ..Default::default()
        },
        lookup,
    }
}
