use std::io::Write;

use clap::Parser;
use common::{Error, Result, SchedulerApi};
use tracing::{info, warn};

use super::Context;

/// Matches every role.
pub const ALL_ROLES: &str = "*";

#[derive(Debug, Parser)]
pub struct Jobs {
    /// Aurora role, or `*` for all roles
    #[clap(short, long)]
    pub role: Option<String>,
}

pub async fn fetch_jobs<W: Write>(
    ctx: &mut Context<W>,
    scheduler: &dyn SchedulerApi,
    args: &Jobs,
) -> Result<()> {
    let role = args.role.as_deref().unwrap_or_default();
    info!("Fetching jobs under role: {}", role);

    let role = match role {
        "" => return Err(Error::Validation("Role must be specified.".to_string())),
        ALL_ROLES => {
            warn!("This is an expensive operation.");
            None
        }
        role => Some(role),
    };

    let jobs = scheduler.get_jobs(role).await?;
    ctx.out.list(&jobs)
}
