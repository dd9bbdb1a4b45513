//! REST control-plane client
//!
//! Implements [`IdentityApi`] and [`HostingApi`] over the provider's
//! management API: JSON bodies, bearer-token auth, fail-fast on any
//! non-2xx response. Retry policy lives in the poller, not here.

use async_trait::async_trait;
use hostpilot_core::{
    CreateAppRequest, CreatedRole, HarnessError, HostingApi, IdentityApi, JobStatus, JobSummary,
    JobType, Result,
};
use tracing::debug;

use crate::wire::*;

/// Endpoints and credentials for the management API.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the hosting service (apps, branches, jobs).
    pub hosting_base_url: String,

    /// Base URL of the identity service (roles, policies).
    pub identity_base_url: String,

    /// Bearer token for both services.
    pub api_token: String,
}

impl HttpConfig {
    /// Provider-default endpoints for a region.
    pub fn for_region(region: &str, api_token: &str) -> Self {
        HttpConfig {
            hosting_base_url: format!("https://amplify.{}.amazonaws.com", region),
            identity_base_url: "https://iam.amazonaws.com".to_string(),
            api_token: api_token.to_string(),
        }
    }
}

/// HTTP client for both control-plane services.
pub struct ControlPlaneClient {
    config: HttpConfig,
    http: reqwest::Client,
}

impl ControlPlaneClient {
    /// Create a client for the given endpoints.
    pub fn new(config: HttpConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hostpilot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport)?;

        Ok(ControlPlaneClient { config, http })
    }

    fn hosting_url(&self, path: &str) -> String {
        format!("{}{}", self.config.hosting_base_url, path)
    }

    fn identity_url(&self, path: &str) -> String {
        format!("{}{}", self.config.identity_base_url, path)
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        operation: &str,
        url: String,
        body: &B,
    ) -> Result<reqwest::Response> {
        debug!(operation, url = %url, "POST");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        check(operation, response).await
    }

    async fn delete(&self, operation: &str, url: String) -> Result<()> {
        debug!(operation, url = %url, "DELETE");
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(transport)?;
        check(operation, response).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityApi for ControlPlaneClient {
    async fn create_role(&self, role_name: &str, trust_policy: &str) -> Result<CreatedRole> {
        let body = CreateRoleBody {
            role_name: role_name.to_string(),
            assume_role_policy_document: trust_policy.to_string(),
        };
        let response = self
            .post_json("create_role", self.identity_url("/roles"), &body)
            .await?;
        let parsed: CreateRoleResponse = response.json().await.map_err(transport)?;

        Ok(CreatedRole {
            role_name: parsed.role.role_name,
            role_arn: parsed.role.arn,
        })
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        let body = AttachPolicyBody {
            policy_arn: policy_arn.to_string(),
        };
        self.post_json(
            "attach_role_policy",
            self.identity_url(&format!("/roles/{}/policies", role_name)),
            &body,
        )
        .await?;
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> Result<()> {
        self.delete(
            "delete_role",
            self.identity_url(&format!("/roles/{}", role_name)),
        )
        .await
    }
}

#[async_trait]
impl HostingApi for ControlPlaneClient {
    async fn create_app(&self, request: &CreateAppRequest) -> Result<String> {
        let body = CreateAppBody {
            name: request.name.clone(),
            repository: request.repository.clone(),
            oauth_token: request.oauth_token.clone(),
            iam_service_role_arn: request.service_role_arn.clone(),
            environment_variables: request.environment_variables.clone(),
        };
        let response = self
            .post_json("create_app", self.hosting_url("/apps"), &body)
            .await?;
        let parsed: CreateAppResponse = response.json().await.map_err(transport)?;

        Ok(parsed.app.app_id)
    }

    async fn create_branch(&self, app_id: &str, branch_name: &str) -> Result<()> {
        let body = CreateBranchBody {
            branch_name: branch_name.to_string(),
        };
        self.post_json(
            "create_branch",
            self.hosting_url(&format!("/apps/{}/branches", app_id)),
            &body,
        )
        .await?;
        Ok(())
    }

    async fn start_job(
        &self,
        app_id: &str,
        branch_name: &str,
        job_type: JobType,
    ) -> Result<JobSummary> {
        let body = StartJobBody {
            job_type: job_type.as_str().to_string(),
        };
        let response = self
            .post_json(
                "start_job",
                self.hosting_url(&format!("/apps/{}/branches/{}/jobs", app_id, branch_name)),
                &body,
            )
            .await?;
        let parsed: StartJobResponse = response.json().await.map_err(transport)?;

        Ok(JobSummary {
            job_id: parsed.job_summary.job_id,
            job_arn: parsed.job_summary.job_arn,
        })
    }

    async fn get_job(&self, app_id: &str, branch_name: &str, job_id: &str) -> Result<JobStatus> {
        let url = self.hosting_url(&format!(
            "/apps/{}/branches/{}/jobs/{}",
            app_id, branch_name, job_id
        ));
        debug!(operation = "get_job", url = %url, "GET");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(transport)?;
        let response = check("get_job", response).await?;
        let parsed: GetJobResponse = response.json().await.map_err(transport)?;

        let status = parsed
            .job
            .summary
            .status
            .ok_or_else(|| HarnessError::api("get_job", "response had no job status"))?;
        Ok(JobStatus::from(status))
    }

    async fn delete_app(&self, app_id: &str) -> Result<()> {
        self.delete("delete_app", self.hosting_url(&format!("/apps/{}", app_id)))
            .await
    }
}

fn transport(err: reqwest::Error) -> HarnessError {
    HarnessError::Transport(err.to_string())
}

async fn check(operation: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(HarnessError::api(
        operation,
        format!("HTTP {}: {}", status.as_u16(), body),
    ))
}
