//! Hostpilot core - hosted-app build verification
//!
//! Provides the domain model and lifecycle harness for verifying that a
//! hosting provider can build an application end to end:
//! - Provisions a throwaway trust role and hosted application
//! - Links a source-control branch and starts a release job
//! - Polls the job to a terminal status with bounded wait and retry
//! - Tears the provisioned resources down regardless of the outcome
//!
//! The control plane is abstracted behind [`IdentityApi`] and
//! [`HostingApi`]; `hostpilot-http` implements them over REST, and
//! [`fakes::ScriptedControlPlane`] implements them in memory for tests.

pub mod api;
pub mod config;
pub mod error;
pub mod fakes;
pub mod harness;
pub mod job;
pub mod policy;
pub mod poller;
pub mod retry;
pub mod status;
pub mod telemetry;

// Re-export key types
pub use api::{CreateAppRequest, HostingApi, IdentityApi};
pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use harness::{BuildHarness, BuildOutcome};
pub use job::{CreatedRole, JobHandle, JobSummary, ProvisionedStack};
pub use poller::{JobPoller, PollConfig};
pub use retry::RetryConfig;
pub use status::{JobStatus, JobType};
