use std::time::Duration;

use async_trait::async_trait;
use common::aurora::{HostStatus, JobConfiguration, ScheduledTask, TaskQuery};
use common::{Error, ResponseCode, Result, SchedulerApi};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Scheduler client speaking the JSON flavour of the scheduler API
/// (`POST /apibeta/<method>` with the call arguments as a JSON object).
#[derive(Debug, Clone)]
pub struct ApiBetaClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl ApiBetaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::transport)?;
        Ok(Self::from_client(http, base_url))
    }

    pub fn from_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
        }
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    async fn call<A: Serialize + ?Sized>(&self, method: &str, args: &A) -> Result<ResponseResult> {
        let url = format!("{}/apibeta/{}", self.base_url, method);
        debug!("Calling scheduler: {}", url);

        let mut request = self.http.post(&url).json(args);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(Error::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(Error::transport)?;

        // The scheduler reports most failures inside a regular envelope, even on 4xx/5xx.
        let envelope: ApiResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(Error::Transport(
                    format!("scheduler returned {status} for {method}").into(),
                ))
            }
        };

        envelope.into_result()
    }
}

#[async_trait]
impl SchedulerApi for ApiBetaClient {
    async fn get_tasks_without_configs(&self, query: &TaskQuery) -> Result<Vec<ScheduledTask>> {
        let result = self
            .call("getTasksWithoutConfigs", &json!({ "query": query }))
            .await?;
        Ok(result.schedule_status_result.unwrap_or_default().tasks)
    }

    async fn get_task_status(&self, query: &TaskQuery) -> Result<Vec<ScheduledTask>> {
        let result = self.call("getTaskStatus", &json!({ "query": query })).await?;
        Ok(result.schedule_status_result.unwrap_or_default().tasks)
    }

    async fn get_jobs(&self, role: Option<&str>) -> Result<Vec<JobConfiguration>> {
        let args = match role {
            Some(role) => json!({ "ownerRole": role }),
            None => json!({}),
        };
        let result = self.call("getJobs", &args).await?;
        Ok(result.get_jobs_result.unwrap_or_default().configs)
    }

    async fn maintenance_status(&self, hosts: &[String]) -> Result<Vec<HostStatus>> {
        let result = self
            .call("maintenanceStatus", &json!({ "hosts": { "hostNames": hosts } }))
            .await?;
        Ok(result.maintenance_status_result.unwrap_or_default().statuses)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    response_code: ResponseCode,
    #[serde(default)]
    details: Vec<ResponseDetail>,
    #[serde(default)]
    result: Option<ResponseResult>,
}

impl ApiResponse {
    fn into_result(self) -> Result<ResponseResult> {
        if self.response_code != ResponseCode::Ok {
            let message = self
                .details
                .into_iter()
                .map(|d| d.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::Scheduler {
                code: self.response_code,
                message,
            });
        }
        Ok(self.result.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct ResponseDetail {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseResult {
    schedule_status_result: Option<ScheduleStatusResult>,
    get_jobs_result: Option<GetJobsResult>,
    maintenance_status_result: Option<MaintenanceStatusResult>,
}

#[derive(Debug, Default, Deserialize)]
struct ScheduleStatusResult {
    #[serde(default)]
    tasks: Vec<ScheduledTask>,
}

#[derive(Debug, Default, Deserialize)]
struct GetJobsResult {
    #[serde(default)]
    configs: Vec<JobConfiguration>,
}

#[derive(Debug, Default, Deserialize)]
struct MaintenanceStatusResult {
    #[serde(default)]
    statuses: Vec<HostStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_once;
    use common::aurora::{MaintenanceMode, ScheduleStatus, LIVE_STATES};

    fn client_for(url: &str) -> ApiBetaClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        ApiBetaClient::from_client(http, url)
    }

    #[tokio::test]
    async fn task_status_posts_query_and_decodes_tasks() {
        let body = json!({
            "responseCode": "OK",
            "details": [],
            "result": {
                "scheduleStatusResult": {
                    "tasks": [{
                        "assignedTask": {
                            "taskId": "t-0",
                            "instanceId": 0,
                            "task": { "job": { "role": "www", "environment": "prod", "name": "hello" } }
                        },
                        "status": "RUNNING"
                    }]
                }
            }
        });
        let (url, request) = serve_once("200 OK", body.to_string()).await;

        let query = TaskQuery::new().with_role("www").with_statuses(LIVE_STATES);
        let tasks = client_for(&url).get_task_status(&query).await.unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, ScheduleStatus::Running);
        assert_eq!(tasks[0].assigned_task.task.job.name, "hello");

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /apibeta/getTaskStatus "));
        let sent: serde_json::Value =
            serde_json::from_str(request.split("\r\n\r\n").nth(1).unwrap()).unwrap();
        assert_eq!(sent["query"]["role"], "www");
        assert!(sent["query"].get("environment").is_none());
    }

    #[tokio::test]
    async fn basic_auth_header_is_sent() {
        let body = json!({ "responseCode": "OK", "result": { "getJobsResult": { "configs": [] } } });
        let (url, request) = serve_once("200 OK", body.to_string()).await;

        let jobs = client_for(&url)
            .with_basic_auth("aurora", "secret")
            .get_jobs(None)
            .await
            .unwrap();
        assert!(jobs.is_empty());

        let request = request.await.unwrap().to_lowercase();
        assert!(request.contains("authorization: basic "));
    }

    #[tokio::test]
    async fn maintenance_status_decodes_host_modes() {
        let body = json!({
            "responseCode": "OK",
            "result": {
                "maintenanceStatusResult": {
                    "statuses": [
                        { "host": "agent-1", "mode": "DRAINED" },
                        { "host": "agent-2", "mode": "NONE" }
                    ]
                }
            }
        });
        let (url, request) = serve_once("200 OK", body.to_string()).await;

        let hosts = vec!["agent-1".to_string(), "agent-2".to_string()];
        let statuses = client_for(&url).maintenance_status(&hosts).await.unwrap();
        assert_eq!(statuses[0].mode, MaintenanceMode::Drained);
        assert_eq!(statuses[1].host, "agent-2");

        let request = request.await.unwrap();
        assert!(request.contains(r#"{"hosts":{"hostNames":["agent-1","agent-2"]}}"#));
    }

    #[tokio::test]
    async fn error_response_code_becomes_scheduler_error() {
        let body = json!({
            "responseCode": "INVALID_REQUEST",
            "details": [{ "message": "role is required" }, { "message": "try again" }]
        });
        let (url, _request) = serve_once("400 Bad Request", body.to_string()).await;

        let err = client_for(&url).get_jobs(Some("www")).await.unwrap_err();
        match err {
            Error::Scheduler { code, message } => {
                assert_eq!(code, ResponseCode::InvalidRequest);
                assert_eq!(message, "role is required; try again");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_envelope_failure_is_transport_error() {
        let (url, _request) = serve_once("503 Service Unavailable", "down".to_string()).await;

        let err = client_for(&url).get_jobs(None).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
