//! Scheduler data model as exchanged over the JSON API.
//!
//! Only the fields the client reads are typed; everything else a scheduler
//! sends back is kept in `extra` so JSON output stays faithful.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Init,
    Throttled,
    Pending,
    Assigned,
    Starting,
    Running,
    Finished,
    Preempting,
    Restarting,
    Draining,
    Failed,
    Killed,
    Killing,
    Lost,
    Partitioned,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

/// Statuses of tasks that currently occupy resources on an agent.
pub const LIVE_STATES: [ScheduleStatus; 5] = [
    ScheduleStatus::Killing,
    ScheduleStatus::Preempting,
    ScheduleStatus::Restarting,
    ScheduleStatus::Draining,
    ScheduleStatus::Running,
];

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Init => "INIT",
            Self::Throttled => "THROTTLED",
            Self::Pending => "PENDING",
            Self::Assigned => "ASSIGNED",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Finished => "FINISHED",
            Self::Preempting => "PREEMPTING",
            Self::Restarting => "RESTARTING",
            Self::Draining => "DRAINING",
            Self::Failed => "FAILED",
            Self::Killed => "KILLED",
            Self::Killing => "KILLING",
            Self::Lost => "LOST",
            Self::Partitioned => "PARTITIONED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(status)
    }
}

/// Filter for task lookups. A `None` field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<BTreeSet<ScheduleStatus>>,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty strings leave the field unconstrained.
    pub fn with_environment(mut self, environment: &str) -> Self {
        self.environment = non_empty(environment);
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = non_empty(role);
        self
    }

    pub fn with_job_name(mut self, name: &str) -> Self {
        self.job_name = non_empty(name);
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ScheduleStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobKey {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub name: String,
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.role, self.environment, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    #[serde(default)]
    pub job: JobKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default)]
    pub is_service: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTask {
    #[serde(default)]
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slave_host: Option<String>,
    #[serde(default)]
    pub instance_id: i32,
    #[serde(default)]
    pub task: TaskConfig,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assigned_ports: BTreeMap<String, i32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub assigned_task: AssignedTask,
    pub status: ScheduleStatus,
    #[serde(default)]
    pub failure_count: i32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl fmt::Display for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assigned = &self.assigned_task;
        write!(
            f,
            "{} instance={} task={} status={}",
            assigned.task.job, assigned.instance_id, assigned.task_id, self.status
        )?;
        if let Some(host) = &assigned.slave_host {
            write!(f, " host={host}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfiguration {
    #[serde(default)]
    pub key: JobKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_schedule: Option<String>,
    #[serde(default)]
    pub instance_count: i32,
    #[serde(default)]
    pub task_config: TaskConfig,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl fmt::Display for JobConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instances={}", self.key, self.instance_count)?;
        if let Some(cron) = &self.cron_schedule {
            write!(f, " cron=\"{cron}\"")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceMode {
    None,
    Scheduled,
    Draining,
    Drained,
}

impl fmt::Display for MaintenanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Self::None => "NONE",
            Self::Scheduled => "SCHEDULED",
            Self::Draining => "DRAINING",
            Self::Drained => "DRAINED",
        };
        f.write_str(mode)
    }
}

/// Maintenance state of a single agent host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStatus {
    pub host: String,
    pub mode: MaintenanceMode,
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Result: {}:{}", self.host, self.mode)
    }
}
