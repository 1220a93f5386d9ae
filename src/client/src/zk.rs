use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use common::{Error, LeaderResolver, Result};
use serde::Deserialize;
use tracing::{debug, info};
use zookeeper::{WatchedEvent, Watcher, ZooKeeper};

pub const DEFAULT_ZK_PORT: u16 = 2181;

const AURORA_MEMBER_PREFIX: &str = "member_";
const MESOS_MEMBER_PREFIX: &str = "json.info_";

/// Leader lookup against a Zookeeper ensemble.
///
/// Each lookup opens its own session on a blocking thread and closes it
/// once the leader's znode has been read.
#[derive(Debug, Clone)]
pub struct ZkLeaderResolver {
    timeout: Duration,
}

impl ZkLeaderResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn leader_data(
        &self,
        endpoints: &[String],
        path: &str,
        prefix: &'static str,
    ) -> Result<Vec<u8>> {
        if endpoints.is_empty() {
            return Err(Error::Validation(
                "At least one Zookeeper node address must be passed in.".to_string(),
            ));
        }

        let servers = format_servers(endpoints);
        let path = path.to_string();
        let timeout = self.timeout;

        tokio::task::spawn_blocking(move || read_leader(&servers, &path, prefix, timeout))
            .await
            .map_err(Error::transport)?
    }
}

#[async_trait]
impl LeaderResolver for ZkLeaderResolver {
    async fn aurora_leader(&self, endpoints: &[String], path: &str) -> Result<String> {
        let data = self.leader_data(endpoints, path, AURORA_MEMBER_PREFIX).await?;
        aurora_url(&data, path)
    }

    async fn mesos_leader(&self, endpoints: &[String], path: &str) -> Result<String> {
        let data = self.leader_data(endpoints, path, MESOS_MEMBER_PREFIX).await?;
        mesos_address(&data, path)
    }
}

struct SessionWatcher;

impl Watcher for SessionWatcher {
    fn handle(&self, event: WatchedEvent) {
        debug!("Zookeeper event: {:?}", event);
    }
}

fn read_leader(servers: &str, path: &str, prefix: &str, timeout: Duration) -> Result<Vec<u8>> {
    info!("Connecting to Zookeeper at {}", servers);
    let zk = ZooKeeper::connect(servers, timeout, SessionWatcher)
        .map_err(|e| Error::Zookeeper(e.to_string()))?;

    let data = read_leader_data(&zk, path, prefix);

    if let Err(e) = zk.close() {
        debug!("Failed to close Zookeeper session: {}", e);
    }

    data
}

fn read_leader_data(zk: &ZooKeeper, path: &str, prefix: &str) -> Result<Vec<u8>> {
    let children = zk
        .get_children(path, false)
        .map_err(|e| Error::Zookeeper(format!("{path}: {e}")))?;

    let leader = leader_member(&children, prefix).ok_or_else(|| Error::NoLeader {
        path: path.to_string(),
    })?;

    let node = format!("{}/{}", path.trim_end_matches('/'), leader);
    debug!("Reading leader znode {}", node);

    let (data, _stat) = zk
        .get_data(&node, false)
        .map_err(|e| Error::Zookeeper(format!("{node}: {e}")))?;
    Ok(data)
}

/// Bare hosts get the default client port.
pub fn format_servers(endpoints: &[String]) -> String {
    endpoints
        .iter()
        .map(|endpoint| {
            if endpoint.contains(':') {
                endpoint.clone()
            } else {
                format!("{endpoint}:{DEFAULT_ZK_PORT}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Election members are sequential znodes; the lowest sequence number leads.
fn leader_member<'a>(children: &'a [String], prefix: &str) -> Option<&'a str> {
    children
        .iter()
        .filter_map(|child| {
            let sequence = child.strip_prefix(prefix)?.parse::<u64>().ok()?;
            Some((sequence, child.as_str()))
        })
        .min()
        .map(|(_, child)| child)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceInstance {
    service_endpoint: Endpoint,
    #[serde(default)]
    additional_endpoints: BTreeMap<String, Endpoint>,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    host: String,
    port: u16,
}

fn aurora_url(data: &[u8], path: &str) -> Result<String> {
    let instance: ServiceInstance = serde_json::from_slice(data)?;

    if instance.additional_endpoints.len() > 1 {
        return Err(Error::AmbiguousEndpoints {
            path: path.to_string(),
        });
    }

    let url = match instance.additional_endpoints.into_iter().next() {
        Some((scheme, endpoint)) => format!("{}://{}:{}", scheme, endpoint.host, endpoint.port),
        None => format!(
            "http://{}:{}",
            instance.service_endpoint.host, instance.service_endpoint.port
        ),
    };
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct MasterInfo {
    #[serde(default)]
    address: Option<MasterAddress>,
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default)]
    port: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct MasterAddress {
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    port: u32,
}

fn mesos_address(data: &[u8], path: &str) -> Result<String> {
    let info: MasterInfo = serde_json::from_slice(data)?;

    if let Some(address) = info.address {
        let host = address
            .ip
            .filter(|ip| !ip.is_empty())
            .or(address.hostname.filter(|h| !h.is_empty()));
        if let Some(host) = host {
            return Ok(format!("{}:{}", host, address.port));
        }
    }

    match (info.hostname, info.port) {
        (Some(host), Some(port)) if !host.is_empty() => Ok(format!("{host}:{port}")),
        _ => Err(Error::NoLeader {
            path: path.to_string(),
        }),
    }
}
