use std::sync::Arc;

use serde_json::Value;

use crate::error::{BuildLensError, Result};
use crate::providers::{self, enrichment, enrichment::ProfileLookup};

use super::duration::estimate_duration;
use super::identity::IdentityFields;
use super::status::aggregate_status;
use super::types::{Build, RawIngestionRecord};

/// Assembles canonical [`Build`]s from raw ingestion records.
///
/// Holds no per-record state, so one builder can serve any number of
/// records concurrently.
#[derive(Clone, Default)]
pub struct BuildAggregateBuilder {
    lookup: Option<Arc<dyn ProfileLookup>>,
}

impl BuildAggregateBuilder {
    /// Creates a builder. Without a `lookup`, fields that need a profile lookup stay unset.
    pub fn new(lookup: Option<Arc<dyn ProfileLookup>>) -> Self {
        Self { lookup }
    }

    /// Decodes a raw record document and builds it.
    ///
    /// # Errors
    ///
    /// See [`Self::build_record`]; undecodable documents are `MalformedPayload`.
    pub async fn build(&self, document: Value, now: i64) -> Result<Build> {
        let record = RawIngestionRecord::from_value(document)?;
        self.build_record(&record, now).await
    }

    /// Builds one record. `now` is Unix seconds, used for running builds.
    ///
    /// # Errors
    ///
    /// - `MalformedPayload` when the jobs array, the provider tag or the
    ///   repository identity is missing, or the payload is not an object
    /// - `UnsupportedProvider` for GitLab, Gogs and unknown provider tags
    pub async fn build_record(&self, record: &RawIngestionRecord, now: i64) -> Result<Build> {
        let jobs = record
            .jobs
            .as_deref()
            .ok_or_else(|| BuildLensError::malformed(record.id, "missing jobs array"))?;

        if !record.data.is_object() {
            return Err(BuildLensError::malformed(record.id, "payload is not an object"));
        }

        let (provider, normalizer) = providers::resolve(record)?;
        let identity = IdentityFields::extract(record)?;

        let status = aggregate_status(jobs);
        let build_duration_seconds = estimate_duration(jobs, status, now);

        let pending = normalizer.extract(&record.data);
        let extract = enrichment::complete(pending, self.lookup.as_deref()).await;

        Ok(Build {
            id: identity.id,
            provider,
            pr: identity.pr,
            repository_name: identity.repository_name,
            branch: identity.branch,
            commit_sha: identity.commit_sha,
            tag: identity.tag,
            display_name: extract.display_name,
            author_avatar_url: extract.author_avatar_url,
            committer_avatar_url: extract.committer_avatar_url,
            commit_message: extract.commit_message,
            commit_date: extract.commit_date.or(identity.commit_date),
            build_duration_seconds,
            status,
        })
    }
}
