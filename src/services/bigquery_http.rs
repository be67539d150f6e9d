//! BigQuery warehouse adapter using the REST API.

use std::thread;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::domain::{AppError, Column, Credentials, TableData};
use crate::ports::{Warehouse, WarehouseConnector};
use crate::services::gcp_auth::{AmbientAuth, token_source};
use crate::services::http_client::{build_client, describe_failure, endpoint};

const JOB_POLL_INTERVAL: Duration = Duration::from_secs(1);
const JOB_WAIT_LIMIT: Duration = Duration::from_secs(300);
const MULTIPART_BOUNDARY: &str = "flowdeploy_load_job_boundary";
const JOB_DONE: &str = "DONE";

/// API and media upload base URLs of the BigQuery service.
#[derive(Debug, Clone)]
pub struct BigQueryUrls {
    pub api: Url,
    pub upload: Url,
}

/// Opens authenticated BigQuery sessions.
#[derive(Debug, Clone)]
pub struct BigQueryConnector {
    urls: BigQueryUrls,
    default_project: Option<String>,
    ambient: AmbientAuth,
    timeout_secs: u64,
}

impl BigQueryConnector {
    pub fn new(
        urls: BigQueryUrls,
        default_project: Option<String>,
        ambient: AmbientAuth,
        timeout_secs: u64,
    ) -> Self {
        Self { urls, default_project, ambient, timeout_secs }
    }
}

impl WarehouseConnector for BigQueryConnector {
    fn connect(&self, credentials: Credentials) -> Result<Box<dyn Warehouse>, AppError> {
        let project_id = match &credentials {
            Credentials::ServiceAccount(key) => {
                key.project_id.clone().or_else(|| self.default_project.clone())
            }
            Credentials::Ambient => self.default_project.clone(),
        }
        .ok_or_else(|| AppError::config_error("GCP_PROJECT_ID environment variable not set"))?;

        let client = build_client(self.timeout_secs)?;
        let token = token_source(credentials, &self.ambient, client.clone())?.access_token()?;

        Ok(Box::new(BigQueryWarehouse {
            urls: self.urls.clone(),
            project_id,
            token,
            client,
            poll_interval: JOB_POLL_INTERVAL,
            wait_limit: JOB_WAIT_LIMIT,
        }))
    }
}

/// One authenticated BigQuery session bound to a project.
pub struct BigQueryWarehouse {
    urls: BigQueryUrls,
    project_id: String,
    token: String,
    client: Client,
    poll_interval: Duration,
    wait_limit: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DatasetRequest<'a> {
    dataset_reference: DatasetReference<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DatasetReference<'a> {
    project_id: &'a str,
    dataset_id: &'a str,
}

#[derive(Debug, Serialize)]
struct LoadJobRequest<'a> {
    configuration: JobConfiguration<'a>,
}

#[derive(Debug, Serialize)]
struct JobConfiguration<'a> {
    load: LoadConfiguration<'a>,
}

/// Replace-on-load settings: the table is created if absent and its
/// contents are swapped only when the job succeeds.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadConfiguration<'a> {
    destination_table: TableReference<'a>,
    schema: TableSchema,
    source_format: &'static str,
    write_disposition: &'static str,
    create_disposition: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TableReference<'a> {
    project_id: &'a str,
    dataset_id: &'a str,
    table_id: &'a str,
}

#[derive(Debug, Serialize)]
struct TableSchema {
    fields: Vec<FieldSchema>,
}

#[derive(Debug, Serialize)]
struct FieldSchema {
    name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    mode: &'static str,
}

impl From<&Column> for FieldSchema {
    fn from(column: &Column) -> Self {
        Self { name: column.name, kind: column.kind.as_str(), mode: "NULLABLE" }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Job {
    job_reference: JobReference,
    #[serde(default)]
    status: JobStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatus {
    #[serde(default)]
    state: String,
    #[serde(default)]
    error_result: Option<JobError>,
}

#[derive(Debug, Deserialize)]
struct JobError {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

fn warehouse_error(operation: &str, details: String) -> AppError {
    AppError::Warehouse { operation: operation.to_string(), details }
}

/// Rows as newline-delimited JSON, the media part of a load job.
fn to_ndjson(data: &TableData) -> Result<String, AppError> {
    let mut out = String::new();
    for row in &data.rows {
        let line = serde_json::to_string(row)
            .map_err(|e| warehouse_error("copy", format!("Failed to encode row: {}", e)))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// `multipart/related` body holding the job resource and its media.
fn multipart_body(metadata: &str, media: &str) -> String {
    format!(
        "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n\
         --{b}\r\nContent-Type: application/octet-stream\r\n\r\n{media}\r\n--{b}--\r\n",
        b = MULTIPART_BOUNDARY,
    )
}

impl BigQueryWarehouse {
    fn url(&self, path: &str) -> Result<Url, AppError> {
        endpoint(&self.urls.api, &format!("projects/{}/{}", self.project_id, path))
    }

    fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response, AppError> {
        request
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| warehouse_error(operation, format!("HTTP request failed: {}", e)))
    }

    fn parse<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(warehouse_error(operation, describe_failure(response).1));
        }
        response
            .json()
            .map_err(|e| warehouse_error(operation, format!("Failed to parse response: {}", e)))
    }

    fn insert_load_job(&self, data: &TableData, dataset: &str, table: &str) -> Result<Job, AppError> {
        let operation = "copy";
        let request = LoadJobRequest {
            configuration: JobConfiguration {
                load: LoadConfiguration {
                    destination_table: TableReference {
                        project_id: &self.project_id,
                        dataset_id: dataset,
                        table_id: table,
                    },
                    schema: TableSchema {
                        fields: data.columns.iter().map(FieldSchema::from).collect(),
                    },
                    source_format: "NEWLINE_DELIMITED_JSON",
                    write_disposition: "WRITE_TRUNCATE",
                    create_disposition: "CREATE_IF_NEEDED",
                },
            },
        };
        let metadata = serde_json::to_string(&request)
            .map_err(|e| warehouse_error(operation, format!("Failed to encode job: {}", e)))?;

        let mut url = endpoint(&self.urls.upload, &format!("projects/{}/jobs", self.project_id))?;
        url.query_pairs_mut().append_pair("uploadType", "multipart");

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, format!("multipart/related; boundary={}", MULTIPART_BOUNDARY))
            .body(multipart_body(&metadata, &to_ndjson(data)?));
        Self::parse(self.send(request, operation)?, operation)
    }

    fn get_job(&self, reference: &JobReference) -> Result<Job, AppError> {
        let operation = "copy";
        let mut url = self.url(&format!("jobs/{}", reference.job_id))?;
        if let Some(location) = &reference.location {
            url.query_pairs_mut().append_pair("location", location);
        }
        Self::parse(self.send(self.client.get(url), operation)?, operation)
    }

    /// Poll until the job is done, then report its final error, if any.
    fn wait_for_job(&self, mut job: Job) -> Result<(), AppError> {
        let deadline = Instant::now() + self.wait_limit;
        while job.status.state != JOB_DONE {
            if Instant::now() >= deadline {
                return Err(warehouse_error(
                    "copy",
                    format!(
                        "load job {} still {} after {}s",
                        job.job_reference.job_id,
                        job.status.state,
                        self.wait_limit.as_secs()
                    ),
                ));
            }
            thread::sleep(self.poll_interval);
            job = self.get_job(&job.job_reference)?;
            debug!(job = %job.job_reference.job_id, state = %job.status.state, "Polled load job");
        }

        match job.status.error_result {
            Some(error) => Err(warehouse_error(
                "copy",
                format!(
                    "load job {} failed ({}): {}",
                    job.job_reference.job_id, error.reason, error.message
                ),
            )),
            None => Ok(()),
        }
    }
}

impl Warehouse for BigQueryWarehouse {
    fn create_dataset(&self, dataset: &str, exists_ok: bool) -> Result<(), AppError> {
        let operation = "create dataset";
        let body = DatasetRequest {
            dataset_reference: DatasetReference { project_id: &self.project_id, dataset_id: dataset },
        };
        let response = self.send(self.client.post(self.url("datasets")?).json(&body), operation)?;
        let status = response.status();
        if status.is_success() || (status == StatusCode::CONFLICT && exists_ok) {
            return Ok(());
        }
        Err(warehouse_error(operation, describe_failure(response).1))
    }

    fn copy(&self, data: &TableData, table_name: &str) -> Result<(), AppError> {
        let (dataset, table) = table_name.split_once('.').ok_or_else(|| {
            warehouse_error("copy", format!("table name '{}' must be dataset.table", table_name))
        })?;

        let job = self.insert_load_job(data, dataset, table)?;
        debug!(job = %job.job_reference.job_id, table = %table_name, "Submitted load job");
        self.wait_for_job(job)
    }
}
