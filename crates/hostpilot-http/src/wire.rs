//! Wire format of the REST management API.
//!
//! The provider speaks camelCase JSON; these structs are the request and
//! response bodies the client exchanges, nothing more. Response structs
//! ignore fields the harness does not consume.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppBody {
    pub name: String,
    pub repository: String,
    pub oauth_token: String,
    pub iam_service_role_arn: String,
    pub environment_variables: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppResponse {
    pub app: AppBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppBody {
    pub app_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchBody {
    pub branch_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartJobBody {
    pub job_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartJobResponse {
    pub job_summary: JobSummaryBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummaryBody {
    pub job_id: String,
    #[serde(default)]
    pub job_arn: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetJobResponse {
    pub job: JobBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBody {
    pub summary: JobSummaryBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleBody {
    pub role_name: String,
    pub assume_role_policy_document: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleResponse {
    pub role: RoleBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBody {
    pub role_name: String,
    pub arn: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachPolicyBody {
    pub policy_arn: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app_body_is_camel_case() {
        let body = CreateAppBody {
            name: "hostpilot-x".to_string(),
            repository: "https://github.com/acme/storefront".to_string(),
            oauth_token: "gho_secret".to_string(),
            iam_service_role_arn: "arn:aws:iam::1:role/hostpilot-x".to_string(),
            environment_variables: HashMap::new(),
        };
        let value = serde_json::to_value(&body).unwrap();

        assert!(value.get("oauthToken").is_some());
        assert!(value.get("iamServiceRoleArn").is_some());
        assert!(value.get("environmentVariables").is_some());
        assert!(value.get("oauth_token").is_none());
    }

    #[test]
    fn test_get_job_response_parses_nested_status() {
        let response: GetJobResponse = serde_json::from_str(
            r#"{"job": {"summary": {"jobId": "7", "jobArn": "arn:x", "status": "RUNNING"}}}"#,
        )
        .unwrap();
        assert_eq!(response.job.summary.job_id, "7");
        assert_eq!(response.job.summary.status.as_deref(), Some("RUNNING"));
    }

    #[test]
    fn test_start_job_response_tolerates_missing_arn() {
        let response: StartJobResponse =
            serde_json::from_str(r#"{"jobSummary": {"jobId": "7"}}"#).unwrap();
        assert_eq!(response.job_summary.job_id, "7");
        assert!(response.job_summary.job_arn.is_none());
    }

    #[test]
    fn test_create_role_response_parses() {
        let response: CreateRoleResponse = serde_json::from_str(
            r#"{"role": {"roleName": "hostpilot-x", "arn": "arn:aws:iam::1:role/hostpilot-x"}}"#,
        )
        .unwrap();
        assert_eq!(response.role.role_name, "hostpilot-x");
        assert!(response.role.arn.starts_with("arn:aws:iam"));
    }
}
