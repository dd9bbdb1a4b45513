//! In-memory fakes for the control-plane traits (testing only)
//!
//! Provides `ScriptedControlPlane`, which satisfies both [`IdentityApi`]
//! and [`HostingApi`] without any external dependencies: job statuses are
//! replayed from a script, every mutating call is recorded, and individual
//! calls can be made to fail on demand.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{CreateAppRequest, HostingApi, IdentityApi};
use crate::error::HarnessError;
use crate::job::{CreatedRole, JobSummary};
use crate::status::{JobStatus, JobType};
use crate::Result;

#[derive(Debug)]
struct Script {
    statuses: Vec<JobStatus>,
    next: usize,
    repeat_last: bool,
}

/// Scripted in-memory control plane.
///
/// `get_job` replays the configured status sequence one element per
/// successful call. An injected failure does not consume an element, so a
/// retried query observes the status the failed attempt would have.
#[derive(Debug)]
pub struct ScriptedControlPlane {
    script: Mutex<Script>,
    get_job_calls: Mutex<u64>,
    fail_get_job: Mutex<Option<(u64, String)>>,
    fail_create_branch: Mutex<bool>,
    fail_delete_app: Mutex<bool>,
    operations: Mutex<Vec<String>>,
}

impl ScriptedControlPlane {
    /// Control plane that replays `statuses` in order from `get_job`.
    pub fn with_statuses(statuses: &[JobStatus]) -> Self {
        ScriptedControlPlane {
            script: Mutex::new(Script {
                statuses: statuses.to_vec(),
                next: 0,
                repeat_last: false,
            }),
            get_job_calls: Mutex::new(0),
            fail_get_job: Mutex::new(None),
            fail_create_branch: Mutex::new(false),
            fail_delete_app: Mutex::new(false),
            operations: Mutex::new(Vec::new()),
        }
    }

    /// Control plane whose job never leaves `status`.
    pub fn stuck_on(status: JobStatus) -> Self {
        let plane = Self::with_statuses(&[status]);
        plane.script.lock().unwrap().repeat_last = true;
        plane
    }

    /// Make the `call`-th `get_job` attempt (1-based, counting failures)
    /// return an API error with `message`.
    pub fn fail_get_job_on_call(&self, call: u64, message: &str) {
        *self.fail_get_job.lock().unwrap() = Some((call, message.to_string()));
    }

    /// Make `create_branch` fail. The attempt is still recorded.
    pub fn fail_create_branch(&self) {
        *self.fail_create_branch.lock().unwrap() = true;
    }

    /// Make `delete_app` fail. The attempt is still recorded.
    pub fn fail_delete_app(&self) {
        *self.fail_delete_app.lock().unwrap() = true;
    }

    /// Total `get_job` attempts, including injected failures.
    pub fn get_job_calls(&self) -> u64 {
        *self.get_job_calls.lock().unwrap()
    }

    /// All recorded mutating calls, in order, as `"name:arg"` strings.
    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }

    /// Number of recorded calls whose name matches `operation`.
    pub fn count_of(&self, operation: &str) -> usize {
        self.operations
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.split(':').next() == Some(operation))
            .count()
    }

    fn record(&self, entry: String) {
        self.operations.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl IdentityApi for ScriptedControlPlane {
    async fn create_role(&self, role_name: &str, _trust_policy: &str) -> Result<CreatedRole> {
        self.record(format!("create_role:{}", role_name));
        Ok(CreatedRole {
            role_name: role_name.to_string(),
            role_arn: format!("arn:aws:iam::123456789012:role/{}", role_name),
        })
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        self.record(format!("attach_role_policy:{}:{}", role_name, policy_arn));
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> Result<()> {
        self.record(format!("delete_role:{}", role_name));
        Ok(())
    }
}

#[async_trait]
impl HostingApi for ScriptedControlPlane {
    async fn create_app(&self, request: &CreateAppRequest) -> Result<String> {
        self.record(format!("create_app:{}", request.name));
        Ok("app-1".to_string())
    }

    async fn create_branch(&self, app_id: &str, branch_name: &str) -> Result<()> {
        self.record(format!("create_branch:{}:{}", app_id, branch_name));
        if *self.fail_create_branch.lock().unwrap() {
            return Err(HarnessError::api("create_branch", "branch not found"));
        }
        Ok(())
    }

    async fn start_job(
        &self,
        app_id: &str,
        branch_name: &str,
        job_type: JobType,
    ) -> Result<JobSummary> {
        self.record(format!("start_job:{}:{}:{}", app_id, branch_name, job_type));
        Ok(JobSummary {
            job_id: "1".to_string(),
            job_arn: Some(format!(
                "arn:aws:amplify:us-east-1:123456789012:apps/{}/branches/{}/jobs/1",
                app_id, branch_name
            )),
        })
    }

    async fn get_job(&self, _app_id: &str, _branch_name: &str, _job_id: &str) -> Result<JobStatus> {
        let call = {
            let mut calls = self.get_job_calls.lock().unwrap();
            *calls += 1;
            *calls
        };

        if let Some((fail_call, message)) = self.fail_get_job.lock().unwrap().as_ref() {
            if call == *fail_call {
                return Err(HarnessError::api("get_job", message.clone()));
            }
        }

        let mut script = self.script.lock().unwrap();
        if script.next < script.statuses.len() {
            let status = script.statuses[script.next].clone();
            if !(script.repeat_last && script.next + 1 == script.statuses.len()) {
                script.next += 1;
            }
            Ok(status)
        } else {
            Err(HarnessError::api("get_job", "status script exhausted"))
        }
    }

    async fn delete_app(&self, app_id: &str) -> Result<()> {
        self.record(format!("delete_app:{}", app_id));
        if *self.fail_delete_app.lock().unwrap() {
            return Err(HarnessError::api("delete_app", "app is busy"));
        }
        Ok(())
    }
}
