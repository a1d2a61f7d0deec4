use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{BuildLensError, Result};

/// Lifecycle state of a single job as reported by the CI executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Success,
    Failed,
}

/// A job execution record. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub status: JobStatus,
    #[serde(default, alias = "startTime")]
    pub start_time: Option<i64>,
    #[serde(default, alias = "endTime")]
    pub end_time: Option<i64>,
}

/// Derived build state. Never read from a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Queued,
    Running,
    Passed,
    Failed,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// VCS integration that produced a webhook payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    GitHub,
    Bitbucket,
    GitLab,
    Gogs,
}

impl Provider {
    /// Resolves a provider tag (`github`, `bitbucket`, ...). Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "github" => Some(Self::GitHub),
            "bitbucket" => Some(Self::Bitbucket),
            "gitlab" => Some(Self::GitLab),
            "gogs" => Some(Self::Gogs),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Bitbucket => "bitbucket",
            Self::GitLab => "gitlab",
            Self::Gogs => "gogs",
        }
    }
}

/// Which builds the retrieval endpoint should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildFilter {
    #[default]
    All,
    Pr,
    Commits,
}

impl BuildFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pr => "pr",
            Self::Commits => "commits",
        }
    }
}

/// Repository block attached to an ingestion record by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepositoryRef {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub repository_provider: Option<String>,
}

/// One row from the builds store: jobs plus the webhook payload that triggered them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawIngestionRecord {
    pub id: u64,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub pr: Option<u64>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
    #[serde(default)]
    pub jobs: Option<Vec<Job>>,
    #[serde(default, alias = "payload")]
    pub data: Value,
}

impl RawIngestionRecord {
    /// Decodes one record from the retrieval response.
    ///
    /// Decoding is per record so a broken document only fails itself.
    pub fn from_value(value: Value) -> Result<Self> {
        let record_id = value.get("id").and_then(Value::as_u64);
        serde_json::from_value(value).map_err(|e| BuildLensError::MalformedPayload {
            record_id,
            reason: e.to_string(),
        })
    }

    /// The provider tag, preferring the top-level field over the repository block.
    pub fn provider_tag(&self) -> Option<&str> {
        self.provider.as_deref().or_else(|| {
            self.repository
                .as_ref()
                .and_then(|repo| repo.repository_provider.as_deref())
        })
    }
}

/// The provider-agnostic build produced from one ingestion record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Build {
    pub id: u64,
    pub provider: Provider,
    pub pr: Option<u64>,
    pub repository_name: String,
    pub branch: Option<String>,
    pub commit_sha: Option<String>,
    pub tag: Option<String>,
    pub display_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub committer_avatar_url: Option<String>,
    pub commit_message: Option<String>,
    pub commit_date: Option<DateTime<Utc>>,
    pub build_duration_seconds: Option<i64>,
    pub status: BuildStatus,
}
