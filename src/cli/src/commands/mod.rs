pub mod jobs;
pub mod leader;
pub mod mesos;
pub mod status;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use client::ApiBetaClient;
use common::{Error, LeaderResolver, Result, SchedulerApi};
use tracing::info;

use crate::cli::{Fetch, MesosAction, TaskAction};
use crate::config::Config;
use crate::output::Output;

/// Everything a single command invocation needs.
pub struct Context<W: Write = io::Stdout> {
    pub config: Config,
    pub leader: Arc<dyn LeaderResolver>,
    pub http: reqwest::Client,
    pub out: Output<W>,
}

pub async fn dispatch<W: Write>(ctx: &mut Context<W>, action: &Fetch) -> Result<()> {
    match action {
        // Leader lookups go straight to Zookeeper and never need a scheduler.
        Fetch::Leader(args) => leader::fetch_leader(ctx, args).await,
        Fetch::Mesos(MesosAction::Leader(args)) => mesos::fetch_mesos_leader(ctx, args).await,
        Fetch::Task(TaskAction::Config(filter)) => {
            let scheduler = connect_scheduler(ctx).await?;
            task::fetch_task_config(ctx, scheduler.as_ref(), filter).await
        }
        Fetch::Task(TaskAction::Status(filter)) => {
            let scheduler = connect_scheduler(ctx).await?;
            task::fetch_task_status(ctx, scheduler.as_ref(), filter).await
        }
        Fetch::Jobs(args) => {
            let scheduler = connect_scheduler(ctx).await?;
            jobs::fetch_jobs(ctx, scheduler.as_ref(), args).await
        }
        Fetch::Status(args) => {
            let scheduler = connect_scheduler(ctx).await?;
            status::fetch_host_status(ctx, scheduler.as_ref(), args).await
        }
    }
}

async fn connect_scheduler<W: Write>(ctx: &Context<W>) -> Result<Box<dyn SchedulerApi>> {
    let url = scheduler_url(ctx).await?;
    let config = &ctx.config.scheduler;

    let mut client = ApiBetaClient::new(&url, Duration::from_secs(config.timeout))?;
    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        client = client.with_basic_auth(username, password);
    }
    Ok(Box::new(client))
}

async fn scheduler_url<W: Write>(ctx: &Context<W>) -> Result<String> {
    if let Some(url) = &ctx.config.scheduler.url {
        return Ok(url.clone());
    }

    let zookeeper = &ctx.config.zookeeper;
    if zookeeper.nodes.is_empty() {
        return Err(Error::NoScheduler);
    }

    info!("Looking up scheduler leader in Zookeeper: {:?}", zookeeper.nodes);
    ctx.leader.aurora_leader(&zookeeper.nodes, &zookeeper.path).await
}
