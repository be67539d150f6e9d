//! Scheduler API client implementation using reqwest.

use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::domain::{AppError, DeploymentConfig, FlowParameters};
use crate::ports::{DeploymentId, DeploymentRegistry};
use crate::services::http_client::{describe_failure, endpoint};

const SCHEDULE_TIMEZONE: &str = "UTC";

/// HTTP client for a Prefect-compatible deployments API.
#[derive(Clone)]
pub struct PrefectHttpRegistry {
    api_url: Url,
    api_key: Option<String>,
    client: Client,
}

impl std::fmt::Debug for PrefectHttpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefectHttpRegistry")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct FlowRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct DeploymentRequest<'a> {
    name: &'a str,
    flow_id: &'a str,
    work_pool_name: &'a str,
    parameters: &'a FlowParameters,
    tags: &'a [String],
    schedules: Vec<ScheduleRequest<'a>>,
    job_variables: JobVariables<'a>,
    enforce_parameter_schema: bool,
}

#[derive(Debug, Serialize)]
struct ScheduleRequest<'a> {
    schedule: CronSpec<'a>,
    active: bool,
}

#[derive(Debug, Serialize)]
struct CronSpec<'a> {
    cron: &'a str,
    timezone: &'a str,
}

#[derive(Debug, Serialize)]
struct JobVariables<'a> {
    image: &'a str,
    command: &'a str,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

impl PrefectHttpRegistry {
    pub fn new(api_url: Url, api_key: Option<String>, client: Client) -> Self {
        Self { api_url, api_key, client }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn post_for_id<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        deployment: &str,
    ) -> Result<String, AppError> {
        let registry_error =
            |details: String| AppError::Registry { deployment: deployment.to_string(), details };

        let url = endpoint(&self.api_url, path)?;
        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .map_err(|e| registry_error(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let (_, message) = describe_failure(response);
            return Err(registry_error(format!("POST {} rejected: {}", path, message)));
        }

        let parsed: Value = response
            .json()
            .map_err(|e| registry_error(format!("Failed to parse response: {}", e)))?;
        let id: IdResponse = serde_json::from_value(parsed)
            .map_err(|e| registry_error(format!("No id in response from {}: {}", path, e)))?;
        Ok(id.id)
    }
}

impl DeploymentRegistry for PrefectHttpRegistry {
    fn register(&self, config: &DeploymentConfig) -> Result<DeploymentId, AppError> {
        let deployment = config.deployment_name.as_str();
        let flow_id =
            self.post_for_id("flows/", &FlowRequest { name: &config.flow_name }, deployment)?;

        let schedules = config
            .schedule
            .iter()
            .map(|cron| ScheduleRequest {
                schedule: CronSpec { cron: cron.as_str(), timezone: SCHEDULE_TIMEZONE },
                active: true,
            })
            .collect();

        let request = DeploymentRequest {
            name: deployment,
            flow_id: &flow_id,
            work_pool_name: &config.work_pool,
            parameters: &config.parameters,
            tags: &config.tags,
            schedules,
            job_variables: JobVariables { image: &config.image.name, command: &config.command },
            enforce_parameter_schema: false,
        };

        let id = self.post_for_id("deployments/", &request, deployment)?;
        Ok(DeploymentId(id))
    }
}
