use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{jobs::Jobs, leader::Leader, mesos::MesosLeader, status::Status, task::TaskFilter};

#[derive(Debug, Parser)]
#[command(
    name = "australis",
    about = "Query an Aurora scheduler and its Mesos cluster",
    version
)]
pub struct Cli {
    #[clap(flatten)]
    pub global: GlobalArgs,

    #[clap(subcommand)]
    pub action: Action,
}

// Scheduler connection flags go before the subcommand; output and logging
// flags are accepted anywhere.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Path to a TOML config file
    #[arg(long, global = true, default_value = "australis.toml")]
    pub config: PathBuf,

    /// Scheduler base URL, e.g. `http://aurora.local:8081`
    #[arg(long = "scheduler-addr", alias = "scheduler_addr")]
    pub scheduler_addr: Option<String>,

    /// Comma separated Zookeeper nodes used to find the scheduler
    #[arg(short, long, value_delimiter = ',')]
    pub zookeeper: Vec<String>,

    /// Username for the scheduler API
    #[arg(long)]
    pub username: Option<String>,

    /// Password for the scheduler API
    #[arg(long)]
    pub password: Option<String>,

    /// Print results as JSON
    #[arg(long = "json", visible_alias = "toJSON", global = true)]
    pub json: bool,

    /// Default log level, `RUST_LOG` takes precedence
    #[arg(long = "log-level", alias = "logLevel", global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Fetch information from Aurora
    #[command(subcommand)]
    Fetch(Fetch),
}

#[derive(Debug, Subcommand)]
pub enum Fetch {
    /// Task information from Aurora
    #[command(subcommand)]
    Task(TaskAction),

    /// Fetch the jobs configured under a role
    Jobs(Jobs),

    /// Fetch the maintenance status of agent hosts
    Status(Status),

    /// Fetch the current Aurora leader from Zookeeper
    Leader(Leader),

    /// Fetch information from Mesos
    #[command(subcommand)]
    Mesos(MesosAction),
}

#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Fetch task configurations
    Config(TaskFilter),

    /// Fetch the status of live tasks
    Status(TaskFilter),
}

#[derive(Debug, Subcommand)]
pub enum MesosAction {
    /// Fetch the current Mesos-master leader.
    ///
    /// Without Zookeeper nodes the local Mesos agent is asked for its
    /// master, falling back to a Zookeeper on localhost.
    Leader(MesosLeader),
}
