use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client::testing::{serve_once, unreachable_url};
use common::aurora::{
    AssignedTask, HostStatus, JobConfiguration, JobKey, ScheduleStatus, ScheduledTask, TaskConfig,
    TaskQuery,
};
use common::{Error, LeaderResolver, Result, SchedulerApi};
use tokio::task::JoinHandle;
use tracing::subscriber::DefaultGuard;

use super::Context;
use crate::config::Config;
use crate::output::Output;

pub fn context(json: bool, leader: Arc<dyn LeaderResolver>) -> Context<Vec<u8>> {
    Context {
        config: Config::default(),
        leader,
        http: reqwest::Client::builder().no_proxy().build().unwrap(),
        out: Output::new(json, Vec::new()),
    }
}

pub fn printed(ctx: &Context<Vec<u8>>) -> String {
    String::from_utf8(ctx.out.get_ref().clone()).unwrap()
}

/// Log lines written while a [`capture_logs`] guard is alive.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's log output into a buffer until the guard drops.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

pub fn task(role: &str, name: &str, instance: i32, status: ScheduleStatus) -> ScheduledTask {
    ScheduledTask {
        assigned_task: AssignedTask {
            task_id: format!("{role}-prod-{name}-{instance}"),
            slave_host: Some("agent-1".to_string()),
            instance_id: instance,
            task: TaskConfig {
                job: JobKey {
                    role: role.to_string(),
                    environment: "prod".to_string(),
                    name: name.to_string(),
                },
                ..Default::default()
            },
            ..Default::default()
        },
        status,
        failure_count: 0,
        extra: Default::default(),
    }
}

pub fn job(role: &str, name: &str, instances: i32) -> JobConfiguration {
    JobConfiguration {
        key: JobKey {
            role: role.to_string(),
            environment: "prod".to_string(),
            name: name.to_string(),
        },
        instance_count: instances,
        ..Default::default()
    }
}

/// In-memory scheduler that records what it was asked for.
#[derive(Default)]
pub struct FakeScheduler {
    pub tasks: Vec<ScheduledTask>,
    pub jobs: Vec<JobConfiguration>,
    pub statuses: Vec<HostStatus>,
    pub fail: bool,
    pub queries: Mutex<Vec<TaskQuery>>,
    pub roles: Mutex<Vec<Option<String>>>,
    pub hosts: Mutex<Vec<Vec<String>>>,
}

impl FakeScheduler {
    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Transport("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SchedulerApi for FakeScheduler {
    async fn get_tasks_without_configs(&self, query: &TaskQuery) -> Result<Vec<ScheduledTask>> {
        self.queries.lock().unwrap().push(query.clone());
        self.check()?;
        Ok(self.tasks.clone())
    }

    async fn get_task_status(&self, query: &TaskQuery) -> Result<Vec<ScheduledTask>> {
        self.queries.lock().unwrap().push(query.clone());
        self.check()?;
        Ok(self.tasks.clone())
    }

    async fn get_jobs(&self, role: Option<&str>) -> Result<Vec<JobConfiguration>> {
        self.roles.lock().unwrap().push(role.map(str::to_string));
        self.check()?;
        Ok(self.jobs.clone())
    }

    async fn maintenance_status(&self, hosts: &[String]) -> Result<Vec<HostStatus>> {
        self.hosts.lock().unwrap().push(hosts.to_vec());
        self.check()?;
        Ok(self.statuses.clone())
    }
}

type ResolverCall = (String, Vec<String>, String);

/// Leader resolver answering with a fixed address.
pub struct FakeResolver {
    leader: Option<String>,
    calls: Mutex<Vec<ResolverCall>>,
}

impl FakeResolver {
    pub fn new(leader: &str) -> Self {
        Self {
            leader: Some(leader.to_string()),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn failing() -> Self {
        Self {
            leader: None,
            calls: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> Vec<ResolverCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, kind: &str, endpoints: &[String], path: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((kind.to_string(), endpoints.to_vec(), path.to_string()));
        self.leader.clone().ok_or_else(|| Error::NoLeader {
            path: path.to_string(),
        })
    }
}

#[async_trait]
impl LeaderResolver for FakeResolver {
    async fn aurora_leader(&self, endpoints: &[String], path: &str) -> Result<String> {
        self.answer("aurora", endpoints, path)
    }

    async fn mesos_leader(&self, endpoints: &[String], path: &str) -> Result<String> {
        self.answer("mesos", endpoints, path)
    }
}

/// Serves one canned agent `/state` response; the handle yields the raw request.
pub async fn agent_state(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let (url, request) = serve_once(status, body).await;
    (format!("{url}/state"), request)
}

pub async fn unreachable_agent() -> String {
    format!("{}/state", unreachable_url().await)
}
