//! Harness configuration
//!
//! Supplied either from `HOSTPILOT_*` environment variables or from a
//! JSON params file. The oauth token is a secret; `Debug` redacts it.

use crate::error::HarnessError;
use crate::poller::PollConfig;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default service principal allowed to assume the build role.
pub const DEFAULT_SERVICE_PRINCIPAL: &str = "amplify.amazonaws.com";

/// Default managed policy attached to the build role.
pub const DEFAULT_BUILD_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/AdministratorAccess-Amplify";

/// Default CLI package pinned through `_LIVE_UPDATES`.
pub const DEFAULT_CLI_PACKAGE: &str = "@aws-amplify/cli";

/// Configuration for one harness run.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct HarnessConfig {
    /// Provider region the app is created in.
    pub region: String,

    /// Source repository URL the app builds from.
    pub repository: String,

    /// OAuth token granting read access to the repository.
    pub oauth_token: String,

    /// Branch to link and build.
    #[serde(default = "default_branch")]
    pub branch_name: String,

    /// CLI package pinned for the build.
    #[serde(default = "default_cli_package")]
    pub cli_package: String,

    /// Exact CLI version to pin.
    pub cli_version: String,

    /// Service principal the trust role allows to assume it.
    #[serde(default = "default_service_principal")]
    pub service_principal: String,

    /// Managed policy attached to the trust role.
    #[serde(default = "default_build_policy_arn")]
    pub build_policy_arn: String,

    /// Polling policy for the job wait loop.
    #[serde(default)]
    pub poll: PollConfig,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_cli_package() -> String {
    DEFAULT_CLI_PACKAGE.to_string()
}

fn default_service_principal() -> String {
    DEFAULT_SERVICE_PRINCIPAL.to_string()
}

fn default_build_policy_arn() -> String {
    DEFAULT_BUILD_POLICY_ARN.to_string()
}

impl HarnessConfig {
    /// Read configuration from `HOSTPILOT_*` environment variables.
    ///
    /// Required: `HOSTPILOT_REGION`, `HOSTPILOT_REPOSITORY`,
    /// `HOSTPILOT_OAUTH_TOKEN`, `HOSTPILOT_CLI_VERSION`. Optional:
    /// `HOSTPILOT_BRANCH`, `HOSTPILOT_SERVICE_PRINCIPAL`,
    /// `HOSTPILOT_BUILD_POLICY_ARN`.
    pub fn from_env() -> Result<Self> {
        Ok(HarnessConfig {
            region: require_env("HOSTPILOT_REGION")?,
            repository: require_env("HOSTPILOT_REPOSITORY")?,
            oauth_token: require_env("HOSTPILOT_OAUTH_TOKEN")?,
            branch_name: std::env::var("HOSTPILOT_BRANCH").unwrap_or_else(|_| default_branch()),
            cli_package: std::env::var("HOSTPILOT_CLI_PACKAGE")
                .unwrap_or_else(|_| default_cli_package()),
            cli_version: require_env("HOSTPILOT_CLI_VERSION")?,
            service_principal: std::env::var("HOSTPILOT_SERVICE_PRINCIPAL")
                .unwrap_or_else(|_| default_service_principal()),
            build_policy_arn: std::env::var("HOSTPILOT_BUILD_POLICY_ARN")
                .unwrap_or_else(|_| default_build_policy_arn()),
            poll: PollConfig::default(),
        })
    }

    /// Read configuration from a JSON params file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: HarnessConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot provision anything.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("region", &self.region),
            ("repository", &self.repository),
            ("oauth_token", &self.oauth_token),
            ("branch_name", &self.branch_name),
            ("cli_version", &self.cli_version),
        ] {
            if value.is_empty() {
                return Err(HarnessError::InvalidConfig(format!("{} is empty", field)));
            }
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| HarnessError::MissingConfig(name.to_string()))
}

impl fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("region", &self.region)
            .field("repository", &self.repository)
            .field("oauth_token", &"<redacted>")
            .field("branch_name", &self.branch_name)
            .field("cli_package", &self.cli_package)
            .field("cli_version", &self.cli_version)
            .field("service_principal", &self.service_principal)
            .field("build_policy_arn", &self.build_policy_arn)
            .field("poll", &self.poll)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> HarnessConfig {
        HarnessConfig {
            region: "us-east-1".to_string(),
            repository: "https://github.com/acme/storefront".to_string(),
            oauth_token: "gho_secret".to_string(),
            branch_name: "main".to_string(),
            cli_package: default_cli_package(),
            cli_version: "12.10.1".to_string(),
            service_principal: default_service_principal(),
            build_policy_arn: default_build_policy_arn(),
            poll: PollConfig::default(),
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("gho_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut config = sample();
        config.repository = String::new();
        assert!(matches!(
            config.validate(),
            Err(HarnessError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_params_file_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "region": "eu-west-1",
                "repository": "https://github.com/acme/storefront",
                "oauth_token": "gho_secret",
                "cli_version": "12.10.1"
            }}"#
        )
        .unwrap();

        let config = HarnessConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.branch_name, "main");
        assert_eq!(config.service_principal, DEFAULT_SERVICE_PRINCIPAL);
        assert_eq!(config.build_policy_arn, DEFAULT_BUILD_POLICY_ARN);
        assert_eq!(config.poll, PollConfig::default());
    }

    #[test]
    fn test_params_file_rejects_empty_required_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "region": "",
                "repository": "https://github.com/acme/storefront",
                "oauth_token": "gho_secret",
                "cli_version": "12.10.1"
            }}"#
        )
        .unwrap();

        assert!(HarnessConfig::from_json_file(file.path()).is_err());
    }
}
