use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cli::GlobalArgs;

pub const LOCAL_AGENT_STATE_URL: &str = "http://127.0.0.1:5051/state";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub zookeeper: ZookeeperConfig,
    pub mesos: MesosConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Base URL of the scheduler. When unset the leader is looked up in Zookeeper.
    pub url: Option<String>,

    pub username: Option<String>,
    pub password: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            timeout: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZookeeperConfig {
    pub nodes: Vec<String>,

    /// Znode under which schedulers run their leader election
    pub path: String,

    /// Session timeout in seconds
    pub timeout: u64,
}

impl Default for ZookeeperConfig {
    fn default() -> Self {
        Self {
            nodes: vec![],
            path: "/aurora/scheduler".to_string(),
            timeout: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MesosConfig {
    /// State endpoint of the local Mesos agent
    pub agent_state_url: String,

    /// Znode under which Mesos masters run their leader election
    pub path: String,
}

impl Default for MesosConfig {
    fn default() -> Self {
        Self {
            agent_state_url: LOCAL_AGENT_STATE_URL.to_string(),
            path: "/mesos".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then `AUSTRALIS_` variables, then flags.
    pub fn load(args: &GlobalArgs) -> Result<Self, figment::Error> {
        Self::figment(&args.config)
            .merge(Serialized::defaults(overrides(args)))
            .extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("AUSTRALIS_").split("__"))
    }
}

fn overrides(args: &GlobalArgs) -> Value {
    let mut scheduler = Map::new();
    if let Some(url) = &args.scheduler_addr {
        scheduler.insert("url".to_string(), url.clone().into());
    }
    if let Some(username) = &args.username {
        scheduler.insert("username".to_string(), username.clone().into());
    }
    if let Some(password) = &args.password {
        scheduler.insert("password".to_string(), password.clone().into());
    }

    let mut zookeeper = Map::new();
    if !args.zookeeper.is_empty() {
        zookeeper.insert("nodes".to_string(), args.zookeeper.clone().into());
    }

    let mut root = Map::new();
    root.insert("scheduler".to_string(), scheduler.into());
    root.insert("zookeeper".to_string(), zookeeper.into());
    root.into()
}
