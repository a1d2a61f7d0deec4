use serde_json::Value;

use super::payload::{parse_timestamp, str_at, string_at};
use super::{PendingExtract, ProviderExtract, ProviderNormalizer};

/// Normalizes Bitbucket Cloud `repo:push` and `pullrequest:*` payloads.
///
/// Everything needed is in the payload, so no profile lookup is ever requested.
pub struct BitbucketNormalizer;

impl ProviderNormalizer for BitbucketNormalizer {
    fn extract(&self, payload: &Value) -> PendingExtract {
        let actor = ProviderExtract {
            display_name: string_at(payload, "/actor/display_name"),
            author_avatar_url: string_at(payload, "/actor/links/avatar/href"),
            ..Default::default()
        };

        if let Some(commit) = payload.pointer("/push/changes/0/commits/0") {
            return ProviderExtract {
                commit_message: string_at(commit, "/message"),
                committer_avatar_url: string_at(commit, "/author/user/links/avatar/href"),
                commit_date: str_at(commit, "/date").and_then(parse_timestamp),
                ..actor
            }
            .into();
        }

        if let Some(pull_request) = payload.get("pullrequest").filter(|v| v.is_object()) {
            return ProviderExtract {
                commit_message: string_at(pull_request, "/description")
                    .or_else(|| string_at(pull_request, "/title")),
                committer_avatar_url: string_at(pull_request, "/author/links/avatar/href"),
                commit_date: str_at(pull_request, "/updated_on").and_then(parse_timestamp),
                ..actor
            }
            .into();
        }

        actor.into()
    }
}
