//! Trust policy documents and the build-time CLI version pin.
//!
//! The identity API takes the trust policy as a JSON document string; the
//! hosting API takes the CLI pin as the `_LIVE_UPDATES` environment
//! variable, a JSON array of package pins.

use crate::Result;
use serde::{Deserialize, Serialize};

/// Name of the environment variable the build machine reads to pin
/// build-time packages.
pub const LIVE_UPDATES_VAR: &str = "_LIVE_UPDATES";

/// IAM-style trust policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustPolicy {
    #[serde(rename = "Version")]
    pub version: String,

    #[serde(rename = "Statement")]
    pub statement: Vec<TrustStatement>,
}

/// One statement of a trust policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustStatement {
    #[serde(rename = "Effect")]
    pub effect: String,

    #[serde(rename = "Principal")]
    pub principal: ServicePrincipal,

    #[serde(rename = "Action")]
    pub action: String,
}

/// Service principal allowed to assume the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePrincipal {
    #[serde(rename = "Service")]
    pub service: String,
}

impl TrustPolicy {
    /// Policy allowing `service` to assume the role via `sts:AssumeRole`.
    pub fn assume_role_for(service: &str) -> Self {
        TrustPolicy {
            version: "2012-10-17".to_string(),
            statement: vec![TrustStatement {
                effect: "Allow".to_string(),
                principal: ServicePrincipal {
                    service: service.to_string(),
                },
                action: "sts:AssumeRole".to_string(),
            }],
        }
    }

    /// Serialize to the document string the identity API expects.
    pub fn to_document(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One package pin inside `_LIVE_UPDATES`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagePin {
    /// Package name (e.g. "@aws-amplify/cli").
    pub pkg: String,

    /// Package ecosystem (e.g. "npm").
    #[serde(rename = "type")]
    pub kind: String,

    /// Exact version to install.
    pub version: String,
}

/// Render the `_LIVE_UPDATES` value for a set of pins.
pub fn live_updates_value(pins: &[PackagePin]) -> Result<String> {
    Ok(serde_json::to_string(pins)?)
}

/// The single pin the harness uses: the provider CLI at a fixed version.
pub fn cli_pin(package: &str, version: &str) -> PackagePin {
    PackagePin {
        pkg: package.to_string(),
        kind: "npm".to_string(),
        version: version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_policy_document_shape() {
        let policy = TrustPolicy::assume_role_for("amplify.amazonaws.com");
        let doc = policy.to_document().unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();

        assert_eq!(value["Version"], "2012-10-17");
        assert_eq!(value["Statement"][0]["Effect"], "Allow");
        assert_eq!(
            value["Statement"][0]["Principal"]["Service"],
            "amplify.amazonaws.com"
        );
        assert_eq!(value["Statement"][0]["Action"], "sts:AssumeRole");
    }

    #[test]
    fn test_live_updates_value() {
        let pins = vec![cli_pin("@aws-amplify/cli", "12.10.1")];
        let value = live_updates_value(&pins).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&value).unwrap();

        assert_eq!(parsed[0]["pkg"], "@aws-amplify/cli");
        assert_eq!(parsed[0]["type"], "npm");
        assert_eq!(parsed[0]["version"], "12.10.1");
    }

    #[test]
    fn test_live_updates_is_an_array() {
        let value = live_updates_value(&[]).unwrap();
        assert_eq!(value, "[]");
    }
}
