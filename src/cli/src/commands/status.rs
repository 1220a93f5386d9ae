use std::io::Write;

use clap::Parser;
use common::{Result, SchedulerApi};
use tracing::info;

use super::Context;

#[derive(Debug, Parser)]
pub struct Status {
    /// Agent hosts to report on
    #[arg(value_name = "HOST", required = true)]
    pub hosts: Vec<String>,
}

pub async fn fetch_host_status<W: Write>(
    ctx: &mut Context<W>,
    scheduler: &dyn SchedulerApi,
    args: &Status,
) -> Result<()> {
    info!("Fetching maintenance status for {:?}", args.hosts);

    let statuses = scheduler.maintenance_status(&args.hosts).await?;
    ctx.out.list(&statuses)
}
