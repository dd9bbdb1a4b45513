//! Build lifecycle harness.
//!
//! Sequences the end-to-end flow: provision a throwaway trust role and
//! hosted application, link a branch, start a release job, and poll it to
//! a terminal status. Every call is awaited before the next; there is no
//! concurrent work. Teardown consumes the [`ProvisionedStack`] captured
//! during provisioning, so cleanup never depends on shared mutable state.

use crate::api::{CreateAppRequest, HostingApi, IdentityApi};
use crate::config::HarnessConfig;
use crate::job::{JobHandle, ProvisionedStack};
use crate::policy::{cli_pin, live_updates_value, TrustPolicy, LIVE_UPDATES_VAR};
use crate::poller::JobPoller;
use crate::status::{JobStatus, JobType};
use crate::Result;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

/// Final result of one verified build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// The terminal status the poller observed.
    pub final_status: JobStatus,

    /// Handle of the polled job.
    pub job: JobHandle,
}

impl BuildOutcome {
    /// Whether the build finished with `SUCCEED`.
    pub fn succeeded(&self) -> bool {
        self.final_status == JobStatus::Succeed
    }
}

/// Drives the provision / build / teardown lifecycle.
pub struct BuildHarness {
    config: HarnessConfig,
}

impl BuildHarness {
    /// Create a harness for the given configuration.
    pub fn new(config: HarnessConfig) -> Self {
        BuildHarness { config }
    }

    /// The configuration this harness runs with.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Provision the trust role, application, and branch.
    ///
    /// The role is created first so its ARN can be handed to the app as
    /// the service role. If a later step fails, resources created so far
    /// are deleted best-effort before the error propagates.
    pub async fn provision(
        &self,
        identity: &dyn IdentityApi,
        hosting: &dyn HostingApi,
    ) -> Result<ProvisionedStack> {
        let name = unique_resource_name();

        let trust_policy = TrustPolicy::assume_role_for(&self.config.service_principal);
        let role = identity
            .create_role(&name, &trust_policy.to_document()?)
            .await?;
        info!(role = %role.role_name, "Created trust role");

        match self.provision_app(identity, hosting, &name, &role.role_arn).await {
            Ok(app_id) => Ok(ProvisionedStack {
                role_name: role.role_name,
                role_arn: role.role_arn,
                app_id,
                branch_name: self.config.branch_name.clone(),
            }),
            Err(err) => {
                if let Err(cleanup_err) = identity.delete_role(&role.role_name).await {
                    warn!(role = %role.role_name, error = %cleanup_err,
                        "Failed to roll back trust role");
                }
                Err(err)
            }
        }
    }

    async fn provision_app(
        &self,
        identity: &dyn IdentityApi,
        hosting: &dyn HostingApi,
        name: &str,
        role_arn: &str,
    ) -> Result<String> {
        identity
            .attach_role_policy(name, &self.config.build_policy_arn)
            .await?;

        let pin = cli_pin(&self.config.cli_package, &self.config.cli_version);
        let mut environment_variables = HashMap::new();
        environment_variables.insert(LIVE_UPDATES_VAR.to_string(), live_updates_value(&[pin])?);

        let app_id = hosting
            .create_app(&CreateAppRequest {
                name: name.to_string(),
                repository: self.config.repository.clone(),
                oauth_token: self.config.oauth_token.clone(),
                service_role_arn: role_arn.to_string(),
                environment_variables,
            })
            .await?;
        info!(app_id = %app_id, "Created application");

        if let Err(err) = hosting
            .create_branch(&app_id, &self.config.branch_name)
            .await
        {
            if let Err(cleanup_err) = hosting.delete_app(&app_id).await {
                warn!(app_id = %app_id, error = %cleanup_err,
                    "Failed to roll back application");
            }
            return Err(err);
        }
        info!(branch = %self.config.branch_name, "Linked branch");

        Ok(app_id)
    }

    /// Start a `RELEASE` job on the provisioned branch and wait for it to
    /// reach a terminal status.
    pub async fn run_build(
        &self,
        hosting: &dyn HostingApi,
        stack: &ProvisionedStack,
    ) -> Result<BuildOutcome> {
        let summary = hosting
            .start_job(&stack.app_id, &stack.branch_name, JobType::Release)
            .await?;
        let job = JobHandle::new(&stack.app_id, &stack.branch_name, &summary);
        info!(job = job.display_id(), "Started build job");

        let poller = JobPoller::new(self.config.poll);
        let final_status = poller.wait_for_terminal(hosting, &job).await?;
        info!(job = job.display_id(), status = %final_status, "Build job finished");

        Ok(BuildOutcome { final_status, job })
    }

    /// Delete the application and the trust role.
    ///
    /// Both deletions are attempted exactly once even when the first one
    /// fails; the first failure is returned after both attempts.
    pub async fn teardown(
        &self,
        identity: &dyn IdentityApi,
        hosting: &dyn HostingApi,
        stack: &ProvisionedStack,
    ) -> Result<()> {
        let mut first_failure = None;

        if let Err(err) = hosting.delete_app(&stack.app_id).await {
            warn!(app_id = %stack.app_id, error = %err, "Failed to delete application");
            first_failure = Some(err);
        }

        if let Err(err) = identity.delete_role(&stack.role_name).await {
            warn!(role = %stack.role_name, error = %err, "Failed to delete trust role");
            first_failure.get_or_insert(err);
        }

        match first_failure {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    /// Provision, build, and tear down in one call.
    ///
    /// Teardown runs whether or not the build step failed. A build error
    /// takes precedence over a teardown error in the returned result.
    pub async fn run_to_completion(
        &self,
        identity: &dyn IdentityApi,
        hosting: &dyn HostingApi,
    ) -> Result<BuildOutcome> {
        let stack = self.provision(identity, hosting).await?;

        let build = self.run_build(hosting, &stack).await;
        let cleanup = self.teardown(identity, hosting, &stack).await;

        let outcome = build?;
        cleanup?;
        Ok(outcome)
    }
}

/// Unique name for the throwaway role and application.
///
/// The original flow named resources after the wall clock alone; a uuid
/// suffix keeps concurrent harness runs in one account from colliding.
fn unique_resource_name() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!(
        "hostpilot-{}-{}",
        Utc::now().format("%Y%m%d%H%M%S"),
        &uuid[..8]
    )
}
