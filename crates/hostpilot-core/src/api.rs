//! Control-plane API traits.
//!
//! The harness talks to two external collaborators: an identity service
//! (roles and policies) and the hosting service (apps, branches, jobs).
//! Implementations (HTTP adapter, in-memory fakes) must conform to these.

use crate::job::{CreatedRole, JobSummary};
use crate::status::{JobStatus, JobType};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Request to create a hosted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAppRequest {
    /// Application name; also used as the trust role name.
    pub name: String,

    /// Source repository URL the app builds from.
    pub repository: String,

    /// OAuth token granting read access to the repository.
    pub oauth_token: String,

    /// ARN of the role the build service assumes.
    pub service_role_arn: String,

    /// Environment variables injected into every build.
    pub environment_variables: HashMap<String, String>,
}

/// Identity service: trust roles and managed policies.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Create a role with the given trust policy document (JSON string).
    async fn create_role(&self, role_name: &str, trust_policy: &str) -> Result<CreatedRole>;

    /// Attach a managed policy to a role.
    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> Result<()>;

    /// Delete a role by name.
    async fn delete_role(&self, role_name: &str) -> Result<()>;
}

/// Hosting service: applications, branches, and build jobs.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Create an application; returns its identifier.
    async fn create_app(&self, request: &CreateAppRequest) -> Result<String>;

    /// Link a branch of the app's repository.
    async fn create_branch(&self, app_id: &str, branch_name: &str) -> Result<()>;

    /// Start a job on a branch; returns the job summary.
    async fn start_job(
        &self,
        app_id: &str,
        branch_name: &str,
        job_type: JobType,
    ) -> Result<JobSummary>;

    /// Read the current status of a job.
    async fn get_job(&self, app_id: &str, branch_name: &str, job_id: &str) -> Result<JobStatus>;

    /// Delete an application by identifier.
    async fn delete_app(&self, app_id: &str) -> Result<()>;
}
