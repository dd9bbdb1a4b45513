//! Build job status and job type as reported by the hosting control plane.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a build job.
///
/// The control plane reports status as an upper-case string. Statuses the
/// provider adds later must not wedge the poller, so unrecognized strings
/// are preserved in [`JobStatus::Other`] and treated as terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// Queued, not yet picked up.
    Pending,

    /// Build environment is being provisioned.
    Provisioning,

    /// Build is executing.
    Running,

    /// Cancellation requested, not yet effective.
    Cancelling,

    /// Build finished successfully.
    Succeed,

    /// Build finished with an error.
    Failed,

    /// Build was cancelled before completing.
    Cancelled,

    /// Any status string this crate does not recognize.
    Other(String),
}

impl JobStatus {
    /// Whether the job is still making progress.
    ///
    /// Only `CANCELLING`, `RUNNING`, `PENDING`, and `PROVISIONING` count as
    /// in-progress; everything else (including unrecognized statuses) ends
    /// the wait.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            JobStatus::Cancelling
                | JobStatus::Running
                | JobStatus::Pending
                | JobStatus::Provisioning
        )
    }

    /// Whether the job has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        !self.is_in_progress()
    }

    /// The wire representation used by the control plane.
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Provisioning => "PROVISIONING",
            JobStatus::Running => "RUNNING",
            JobStatus::Cancelling => "CANCELLING",
            JobStatus::Succeed => "SUCCEED",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => JobStatus::Pending,
            "PROVISIONING" => JobStatus::Provisioning,
            "RUNNING" => JobStatus::Running,
            "CANCELLING" => JobStatus::Cancelling,
            "SUCCEED" => JobStatus::Succeed,
            "FAILED" => JobStatus::Failed,
            "CANCELLED" => JobStatus::Cancelled,
            _ => JobStatus::Other(s),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        JobStatus::from(s.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of job to start on a branch.
///
/// The harness only ever starts `RELEASE` jobs; the other kinds exist on
/// the wire and are kept for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    /// Build and deploy the head commit of the branch.
    Release,

    /// Re-run a previous job.
    Retry,

    /// Deploy without a connected repository.
    Manual,

    /// Job triggered by a repository webhook.
    WebHook,
}

impl JobType {
    /// The wire representation used by the control plane.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Release => "RELEASE",
            JobType::Retry => "RETRY",
            JobType::Manual => "MANUAL",
            JobType::WebHook => "WEB_HOOK",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_progress_set() {
        for status in [
            JobStatus::Cancelling,
            JobStatus::Running,
            JobStatus::Pending,
            JobStatus::Provisioning,
        ] {
            assert!(status.is_in_progress(), "{} should be in progress", status);
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn test_terminal_set() {
        for status in [JobStatus::Succeed, JobStatus::Failed, JobStatus::Cancelled] {
            assert!(status.is_terminal(), "{} should be terminal", status);
        }
    }

    #[test]
    fn test_unknown_status_is_terminal() {
        let status = JobStatus::from("SOMETHING_NEW");
        assert_eq!(status, JobStatus::Other("SOMETHING_NEW".to_string()));
        assert!(status.is_terminal());
    }

    #[test]
    fn test_wire_round_trip() {
        for wire in ["PENDING", "RUNNING", "SUCCEED", "FAILED", "WEIRD"] {
            let status = JobStatus::from(wire);
            assert_eq!(status.as_str(), wire);
        }
    }

    #[test]
    fn test_status_serde_uses_wire_strings() {
        let json = serde_json::to_string(&JobStatus::Succeed).unwrap();
        assert_eq!(json, "\"SUCCEED\"");
        let back: JobStatus = serde_json::from_str("\"PROVISIONING\"").unwrap();
        assert_eq!(back, JobStatus::Provisioning);
    }

    #[test]
    fn test_job_type_wire_format() {
        assert_eq!(JobType::Release.as_str(), "RELEASE");
        let json = serde_json::to_string(&JobType::WebHook).unwrap();
        assert_eq!(json, "\"WEB_HOOK\"");
    }
}
