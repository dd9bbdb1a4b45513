//! Job poller: waits for an asynchronously running build job to finish.

use crate::api::HostingApi;
use crate::error::HarnessError;
use crate::job::JobHandle;
use crate::retry::{with_retries, RetryConfig};
use crate::status::JobStatus;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Polling policy for the wait loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status queries.
    pub interval: Duration,

    /// Maximum total time to wait for a terminal status.
    pub max_wait: Duration,

    /// Retry policy applied to each individual status query.
    pub retry: RetryConfig,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(20),
            max_wait: Duration::from_secs(30 * 60),
            retry: RetryConfig::default(),
        }
    }
}

/// Polls a job until it reaches a terminal status.
#[derive(Debug, Clone, Default)]
pub struct JobPoller {
    config: PollConfig,
}

impl JobPoller {
    /// Create a poller with the given policy.
    pub fn new(config: PollConfig) -> Self {
        JobPoller { config }
    }

    /// Query the job status until it leaves the in-progress set and return
    /// the final observed status.
    ///
    /// The status is checked immediately after each query, so a job that is
    /// already terminal on the first poll returns without any interval
    /// sleep. Each query is retried per the configured [`RetryConfig`];
    /// once the retry budget is exhausted the error propagates and no
    /// status is returned. When the next query would land at or past the
    /// `max_wait` deadline, the poller gives up with
    /// [`HarnessError::PollTimeout`] carrying the last observed status.
    pub async fn wait_for_terminal(
        &self,
        hosting: &dyn HostingApi,
        handle: &JobHandle,
    ) -> Result<JobStatus> {
        let started = tokio::time::Instant::now();

        loop {
            let status = with_retries(&self.config.retry, "get_job", || {
                hosting.get_job(&handle.app_id, &handle.branch_name, &handle.job_id)
            })
            .await?;

            info!(job = handle.display_id(), status = %status, "Build job status");

            if status.is_terminal() {
                return Ok(status);
            }

            let waited = started.elapsed();
            if waited + self.config.interval >= self.config.max_wait {
                return Err(HarnessError::PollTimeout {
                    waited,
                    last_status: status,
                });
            }

            tokio::time::sleep(self.config.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::ScriptedControlPlane;
    use crate::job::JobSummary;

    fn handle() -> JobHandle {
        JobHandle::new(
            "app-1",
            "main",
            &JobSummary {
                job_id: "1".to_string(),
                job_arn: None,
            },
        )
    }

    fn fast_config() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(5),
            max_wait: Duration::from_secs(60),
            retry: RetryConfig::none(),
        }
    }

    #[tokio::test]
    async fn test_one_query_per_status_element() {
        let plane = ScriptedControlPlane::with_statuses(&[
            JobStatus::Pending,
            JobStatus::Provisioning,
            JobStatus::Running,
            JobStatus::Succeed,
        ]);
        let poller = JobPoller::new(fast_config());

        let status = poller.wait_for_terminal(&plane, &handle()).await.unwrap();
        assert_eq!(status, JobStatus::Succeed);
        assert_eq!(plane.get_job_calls(), 4);
    }

    #[tokio::test]
    async fn test_first_status_terminal_returns_immediately() {
        let plane = ScriptedControlPlane::with_statuses(&[JobStatus::Failed]);
        let poller = JobPoller::new(PollConfig {
            // An hour-long interval would hang the test if slept even once.
            interval: Duration::from_secs(3600),
            max_wait: Duration::from_secs(7200),
            retry: RetryConfig::none(),
        });

        let status = poller.wait_for_terminal(&plane, &handle()).await.unwrap();
        assert_eq!(status, JobStatus::Failed);
        assert_eq!(plane.get_job_calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_status_ends_the_wait() {
        let plane = ScriptedControlPlane::with_statuses(&[
            JobStatus::Running,
            JobStatus::Other("SUSPENDED".to_string()),
        ]);
        let poller = JobPoller::new(fast_config());

        let status = poller.wait_for_terminal(&plane, &handle()).await.unwrap();
        assert_eq!(status, JobStatus::Other("SUSPENDED".to_string()));
        assert_eq!(plane.get_job_calls(), 2);
    }

    #[tokio::test]
    async fn test_query_failure_aborts_without_status() {
        let plane = ScriptedControlPlane::with_statuses(&[
            JobStatus::Running,
            JobStatus::Running,
            JobStatus::Succeed,
        ]);
        plane.fail_get_job_on_call(2, "throttled");
        let poller = JobPoller::new(fast_config());

        let result = poller.wait_for_terminal(&plane, &handle()).await;
        assert!(matches!(result, Err(HarnessError::Api { .. })));
        assert_eq!(plane.get_job_calls(), 2);
    }

    #[tokio::test]
    async fn test_query_failure_retried_then_recovers() {
        let plane =
            ScriptedControlPlane::with_statuses(&[JobStatus::Running, JobStatus::Succeed]);
        plane.fail_get_job_on_call(2, "throttled");
        let poller = JobPoller::new(PollConfig {
            interval: Duration::from_millis(5),
            max_wait: Duration::from_secs(60),
            retry: RetryConfig {
                max_retries: 1,
                backoff_base_ms: 1,
            },
        });

        let status = poller.wait_for_terminal(&plane, &handle()).await.unwrap();
        assert_eq!(status, JobStatus::Succeed);
        // Second observation took two attempts: the failure plus the retry.
        assert_eq!(plane.get_job_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_wait_times_out_with_last_status() {
        let plane = ScriptedControlPlane::stuck_on(JobStatus::Running);
        let poller = JobPoller::new(PollConfig {
            interval: Duration::from_secs(20),
            max_wait: Duration::from_secs(60),
            retry: RetryConfig::none(),
        });

        let result = poller.wait_for_terminal(&plane, &handle()).await;
        match result {
            Err(HarnessError::PollTimeout { last_status, .. }) => {
                assert_eq!(last_status, JobStatus::Running);
            }
            other => panic!("expected PollTimeout, got {:?}", other),
        }
        // Polls at t=0s, 20s, 40s; the next query would land on the
        // 60s deadline.
        assert_eq!(plane.get_job_calls(), 3);
    }
}
