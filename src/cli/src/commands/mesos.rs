use std::fs;
use std::io::Write;

use clap::Parser;
use common::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

use super::Context;

const ZK_PREFIX: &str = "zk://";
const FILE_PREFIX: &str = "file://";

/// Seed used when neither arguments nor the local agent name a Zookeeper.
const FALLBACK_ZK_NODE: &str = "localhost";

/// If no nodes are given, the leader is taken from the local Mesos agent,
/// or from a Zookeeper on localhost.
#[derive(Debug, Parser)]
pub struct MesosLeader {
    /// Zookeeper nodes, `host` or `host:port`
    #[arg(value_name = "ZK_NODE")]
    pub nodes: Vec<String>,

    /// Znode where the Mesos leader election happens [default: /mesos]
    #[arg(long = "zk-path", alias = "zkPath")]
    pub zk_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AgentState {
    #[serde(default)]
    flags: AgentFlags,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentFlags {
    #[serde(default)]
    pub master: String,

    /// `master` holds the master's address itself rather than a Zookeeper or file reference.
    #[serde(skip)]
    pub has_master: bool,
}

impl AgentFlags {
    /// Rewrites `master` into either a direct address or a Zookeeper host list.
    ///
    /// Accepted forms:
    /// - `host:port`
    /// - `zk://host1:port1,host2:port2,.../path`
    /// - `zk://username:password@host1:port1,host2:port2,.../path`
    /// - `file:///path/to/file`, whose content is one of the forms above
    pub fn normalize(&mut self) -> Result<()> {
        if let Some(rest) = self.master.strip_prefix(ZK_PREFIX) {
            let hosts = match rest.find('@') {
                Some(at) => &rest[at + 1..],
                None => rest,
            };
            let hosts = match hosts.rfind('/') {
                Some(end) => &hosts[..end],
                None => hosts,
            };
            self.master = hosts.to_string();
        } else if let Some(path) = self.master.strip_prefix(FILE_PREFIX) {
            let content = fs::read_to_string(path)?;
            if content.contains(FILE_PREFIX) {
                return Err(Error::InvalidMasterFileContent);
            }
            self.master = content.trim().to_string();
            return self.normalize();
        } else {
            self.has_master = true;
        }
        Ok(())
    }
}

/// Asks a Mesos agent which master it follows.
///
/// A non-200 answer yields `None`. The response body is consumed by the
/// decode whether or not it succeeds.
pub async fn fetch_master_from_agent(
    http: &reqwest::Client,
    url: &str,
) -> Result<Option<AgentFlags>> {
    let response = http.get(url).send().await.map_err(Error::transport)?;
    if response.status() != StatusCode::OK {
        debug!("Mesos agent at {} answered {}", url, response.status());
        return Ok(None);
    }

    let state: AgentState = response.json().await.map_err(Error::transport)?;
    let mut flags = state.flags;
    flags.normalize()?;
    Ok(Some(flags))
}

pub async fn fetch_mesos_leader<W: Write>(ctx: &mut Context<W>, args: &MesosLeader) -> Result<()> {
    let mut nodes = args.nodes.clone();

    if nodes.is_empty() {
        match fetch_master_from_agent(&ctx.http, &ctx.config.mesos.agent_state_url).await {
            Ok(Some(flags)) if !flags.master.is_empty() => {
                if flags.has_master {
                    return ctx.out.line(&flags.master);
                }
                nodes.extend(flags.master.split(',').map(str::to_string));
            }
            Ok(_) => {
                debug!("unable to fetch Mesos leader via local Mesos agent: no master flag");
                nodes.push(FALLBACK_ZK_NODE.to_string());
            }
            Err(e) => {
                debug!("unable to fetch Mesos leader via local Mesos agent: {}", e);
                nodes.push(FALLBACK_ZK_NODE.to_string());
            }
        }
    }

    info!("Fetching Mesos-master leader from Zookeeper node(s): {:?}", nodes);

    let path = args.zk_path.as_deref().unwrap_or(&ctx.config.mesos.path);
    let leader = ctx.leader.mesos_leader(&nodes, path).await?;
    ctx.out.line(leader)
}
