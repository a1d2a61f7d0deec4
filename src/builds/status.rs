use super::types::{BuildStatus, Job, JobStatus};

/// Derives a build's status from its jobs.
///
/// Rules are applied in a fixed order and the last one that matches wins:
/// 1. `queued` by default
/// 2. `running` if any job is running
/// 3. `failed` if any job failed
/// 4. `passed` if every job succeeded (and there is at least one job)
///
/// So `{failed, running}` is `failed`, and an empty job list stays `queued`.
pub fn aggregate_status(jobs: &[Job]) -> BuildStatus {
    let mut status = BuildStatus::Queued;

    if jobs.iter().any(|job| job.status == JobStatus::Running) {
        status = BuildStatus::Running;
    }

    if jobs.iter().any(|job| job.status == JobStatus::Failed) {
        status = BuildStatus::Failed;
    }

    if !jobs.is_empty() && jobs.iter().all(|job| job.status == JobStatus::Success) {
        status = BuildStatus::Passed;
    }

    status
}
