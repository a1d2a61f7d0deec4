use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{BuildLensError, Result};
use crate::providers::payload::{first_str, last_entry, parse_timestamp, str_at, string_at};

use super::types::RawIngestionRecord;

const TAG_REF_PREFIX: &str = "refs/tags/";

/// Where a commit sha can live, in priority order. First hit wins.
const COMMIT_SHA_CANDIDATES: &[&str] = &[
    // GitHub pull_request event
    "/pull_request/head/sha",
    // GitHub/Gogs push event
    "/after",
    // GitHub commit payload
    "/sha",
    // GitLab merge_request event
    "/object_attributes/last_commit/id",
    // Bitbucket push
    "/push/changes/0/commits/0/hash",
    // Bitbucket pull request
    "/pullrequest/source/commit/hash",
    "/pull_request/source/commit/hash",
    "/commit/id",
];

/// Provider-independent identity of a build, computed once per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityFields {
    pub id: u64,
    pub pr: Option<u64>,
    pub repository_name: String,
    pub branch: Option<String>,
    pub commit_sha: Option<String>,
    pub tag: Option<String>,
    pub commit_date: Option<DateTime<Utc>>,
}

impl IdentityFields {
    /// Extracts identity fields from a record and its payload.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPayload` when neither the record nor the payload names
    /// the repository.
    pub fn extract(record: &RawIngestionRecord) -> Result<Self> {
        let payload = &record.data;

        let repository_name = repository_name(record)
            .ok_or_else(|| BuildLensError::malformed(record.id, "missing repository identity"))?;

        Ok(Self {
            id: record.id,
            pr: record.pr,
            repository_name,
            branch: record.branch.clone().filter(|b| !b.is_empty()),
            commit_sha: commit_sha(payload),
            tag: tag(payload),
            commit_date: commit_date(payload),
        })
    }
}

fn repository_name(record: &RawIngestionRecord) -> Option<String> {
    record
        .repository
        .as_ref()
        .and_then(|repo| repo.full_name.clone())
        .filter(|name| !name.is_empty())
        .or_else(|| string_at(&record.data, "/repository/full_name"))
}

fn commit_sha(payload: &Value) -> Option<String> {
    first_str(payload, COMMIT_SHA_CANDIDATES).map(ToString::to_string)
}

fn tag(payload: &Value) -> Option<String> {
    str_at(payload, "/ref")
        .and_then(|git_ref| git_ref.strip_prefix(TAG_REF_PREFIX))
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
}

fn commit_date(payload: &Value) -> Option<DateTime<Utc>> {
    str_at(payload, "/pull_request/updated_at")
        .or_else(|| str_at(payload, "/commit/author/date"))
        .or_else(|| last_entry(payload, "/commits").and_then(|c| str_at(c, "/timestamp")))
        .or_else(|| str_at(payload, "/head_commit/timestamp"))
        .and_then(parse_timestamp)
}
