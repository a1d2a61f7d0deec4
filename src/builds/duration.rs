use super::types::{BuildStatus, Job, JobStatus};

/// Longest `end - start` among jobs that carry both timestamps.
///
/// A job whose span does not fit in an `i64` counts as unknown.
fn completed_span(jobs: &[Job]) -> Option<i64> {
    jobs.iter()
        .filter_map(|job| job.end_time?.checked_sub(job.start_time?))
        .max()
}

/// Time since the earliest still-running job started.
fn elapsed_running(jobs: &[Job], now: i64) -> Option<i64> {
    jobs.iter()
        .filter(|job| job.status == JobStatus::Running)
        .filter_map(|job| job.start_time)
        .min()
        .and_then(|started| now.checked_sub(started))
}

/// Estimates how long a build has taken, in seconds.
///
/// Finished builds report their longest job span. Running builds report the
/// larger of the longest finished span and the time the oldest running job
/// has been going, and report nothing unless both are known.
///
/// `now` is Unix seconds, in the same unit as the job timestamps.
pub fn estimate_duration(jobs: &[Job], status: BuildStatus, now: i64) -> Option<i64> {
    let completed = completed_span(jobs);

    if status != BuildStatus::Running {
        return completed;
    }

    match (completed, elapsed_running(jobs, now)) {
        (Some(completed), Some(elapsed)) => Some(completed.max(elapsed)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(start: i64, end: i64) -> Job {
        Job {
            status: JobStatus::Success,
            start_time: Some(start),
            end_time: Some(end),
        }
    }

    fn running(start: i64) -> Job {
        Job {
            status: JobStatus::Running,
            start_time: Some(start),
            end_time: None,
        }
    }

    #[cfg(test)]
    mod finished_builds {
        use super::*;

        #[test]
        fn reports_single_job_span() {
            let jobs = vec![finished(0, 10)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Passed, 1_000), Some(10));
        }

        #[test]
        fn reports_longest_job_span() {
            let jobs = vec![finished(0, 10), finished(5, 45), finished(20, 30)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Failed, 1_000), Some(40));
        }

        #[test]
        fn is_unknown_without_jobs() {
            assert_eq!(estimate_duration(&[], BuildStatus::Queued, 1_000), None);
        }

        #[test]
        fn ignores_spans_that_overflow() {
            let jobs = vec![finished(i64::MIN, 1), finished(100, 130)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Passed, 0), Some(30));

            let jobs = vec![finished(i64::MIN, i64::MAX)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Failed, 0), None);
        }

        #[test]
        fn ignores_jobs_missing_a_timestamp() {
            let jobs = vec![
                Job {
                    status: JobStatus::Queued,
                    start_time: None,
                    end_time: None,
                },
                finished(100, 107),
            ];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Failed, 1_000), Some(7));
        }
    }

    #[cfg(test)]
    mod running_builds {
        use super::*;

        #[test]
        fn elapsed_running_time_wins_when_longer() {
            let now = 1_000;
            let jobs = vec![finished(900, 905), running(now - 8)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Running, now), Some(8));
        }

        #[test]
        fn completed_span_wins_when_longer() {
            let now = 1_000;
            let jobs = vec![finished(900, 912), running(now - 3)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Running, now), Some(12));
        }

        #[test]
        fn uses_earliest_running_start() {
            let now = 1_000;
            let jobs = vec![finished(950, 951), running(now - 4), running(now - 30)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Running, now), Some(30));
        }

        #[test]
        fn is_unknown_when_elapsed_time_overflows() {
            let jobs = vec![finished(0, 10), running(i64::MIN)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Running, i64::MAX), None);
        }

        #[test]
        fn is_unknown_with_only_a_running_job() {
            let jobs = vec![running(990)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Running, 1_000), None);
        }

        #[test]
        fn is_unknown_without_a_running_job() {
            let jobs = vec![finished(0, 10)];
            assert_eq!(estimate_duration(&jobs, BuildStatus::Running, 1_000), None);
        }
    }
}
