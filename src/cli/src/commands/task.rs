use std::io::Write;

use clap::Parser;
use common::aurora::{LIVE_STATES, TaskQuery};
use common::{Result, SchedulerApi};
use tracing::info;

use super::Context;

#[derive(Debug, Parser)]
pub struct TaskFilter {
    /// Aurora environment
    #[clap(short, long, default_value = "")]
    pub environment: String,

    /// Aurora role
    #[clap(short, long, default_value = "")]
    pub role: String,

    /// Aurora job name
    #[clap(short, long, default_value = "")]
    pub name: String,
}

impl TaskFilter {
    /// Blank flags are left out of the query rather than matched literally.
    pub fn query(&self) -> TaskQuery {
        TaskQuery::new()
            .with_environment(&self.environment)
            .with_role(&self.role)
            .with_job_name(&self.name)
    }
}

pub async fn fetch_task_config<W: Write>(
    ctx: &mut Context<W>,
    scheduler: &dyn SchedulerApi,
    filter: &TaskFilter,
) -> Result<()> {
    info!(
        "Fetching job configuration for [{}/{}/{}]",
        filter.environment, filter.role, filter.name
    );

    let tasks = scheduler.get_tasks_without_configs(&filter.query()).await?;
    ctx.out.list(&tasks)
}

pub async fn fetch_task_status<W: Write>(
    ctx: &mut Context<W>,
    scheduler: &dyn SchedulerApi,
    filter: &TaskFilter,
) -> Result<()> {
    info!(
        "Fetching task status for [{}/{}/{}]",
        filter.environment, filter.role, filter.name
    );

    let query = filter.query().with_statuses(LIVE_STATES);
    let tasks = scheduler.get_task_status(&query).await?;
    ctx.out.list(&tasks)
}
