use async_trait::async_trait;

use crate::aurora::{HostStatus, JobConfiguration, ScheduledTask, TaskQuery};
use crate::Result;

/// Read-only view of the scheduler API used by the `fetch` commands.
#[async_trait]
pub trait SchedulerApi: Send + Sync {
    async fn get_tasks_without_configs(&self, query: &TaskQuery) -> Result<Vec<ScheduledTask>>;

    async fn get_task_status(&self, query: &TaskQuery) -> Result<Vec<ScheduledTask>>;

    /// `None` lists jobs for every role.
    async fn get_jobs(&self, role: Option<&str>) -> Result<Vec<JobConfiguration>>;

    async fn maintenance_status(&self, hosts: &[String]) -> Result<Vec<HostStatus>>;
}

/// Resolves the current leader of a Zookeeper-backed election.
#[async_trait]
pub trait LeaderResolver: Send + Sync {
    /// Returns the leading scheduler's URL, e.g. `http://aurora.local:8081`.
    async fn aurora_leader(&self, endpoints: &[String], path: &str) -> Result<String>;

    /// Returns the leading Mesos master as `host:port`.
    async fn mesos_leader(&self, endpoints: &[String], path: &str) -> Result<String>;
}
