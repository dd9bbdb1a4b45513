//! Identifiers for provisioned resources and triggered build jobs.

use serde::{Deserialize, Serialize};

/// Handle to one triggered build job.
///
/// The identifying fields are fixed for the lifetime of a run; only the
/// job's status is re-read between polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Application the job belongs to.
    pub app_id: String,

    /// Branch the job was started from.
    pub branch_name: String,

    /// Job identifier assigned by the control plane.
    pub job_id: String,

    /// Job ARN, kept for log messages.
    pub job_arn: Option<String>,
}

impl JobHandle {
    /// Build a handle from a freshly started job.
    pub fn new(app_id: &str, branch_name: &str, summary: &JobSummary) -> Self {
        JobHandle {
            app_id: app_id.to_string(),
            branch_name: branch_name.to_string(),
            job_id: summary.job_id.clone(),
            job_arn: summary.job_arn.clone(),
        }
    }

    /// Identifier used in log lines: the ARN when the control plane
    /// returned one, the bare job id otherwise.
    pub fn display_id(&self) -> &str {
        self.job_arn.as_deref().unwrap_or(&self.job_id)
    }
}

/// Summary returned when a job is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Job identifier assigned by the control plane.
    pub job_id: String,

    /// Job ARN, when the control plane returns one.
    pub job_arn: Option<String>,
}

/// Role created through the identity API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRole {
    /// Role name (also used for deletion).
    pub role_name: String,

    /// Role ARN, passed to the application as its service role.
    pub role_arn: String,
}

/// Identifiers captured during provisioning, consumed by teardown.
///
/// Passed explicitly through the lifecycle so cleanup never depends on
/// mutable state shared with the build flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedStack {
    /// Name of the throwaway trust role.
    pub role_name: String,

    /// ARN of the trust role.
    pub role_arn: String,

    /// Identifier of the hosted application.
    pub app_id: String,

    /// Branch linked to the source repository.
    pub branch_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_from_summary() {
        let summary = JobSummary {
            job_id: "7".to_string(),
            job_arn: Some("arn:aws:amplify:us-east-1:1:apps/a/branches/main/jobs/7".to_string()),
        };
        let handle = JobHandle::new("app-1", "main", &summary);
        assert_eq!(handle.app_id, "app-1");
        assert_eq!(handle.branch_name, "main");
        assert_eq!(handle.job_id, "7");
        assert!(handle.display_id().starts_with("arn:"));
    }

    #[test]
    fn test_display_id_falls_back_to_job_id() {
        let summary = JobSummary {
            job_id: "42".to_string(),
            job_arn: None,
        };
        let handle = JobHandle::new("app-1", "main", &summary);
        assert_eq!(handle.display_id(), "42");
    }
}
