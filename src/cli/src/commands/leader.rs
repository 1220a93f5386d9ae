use std::io::Write;

use clap::Parser;
use common::{Error, Result};
use tracing::info;

use super::Context;

/// Pass Zookeeper nodes separated by a space.
#[derive(Debug, Parser)]
pub struct Leader {
    /// Zookeeper nodes, `host` or `host:port`
    #[arg(value_name = "ZK_NODE", required = true)]
    pub nodes: Vec<String>,

    /// Znode where the scheduler leader election happens [default: /aurora/scheduler]
    #[arg(long = "zk-path", alias = "zkPath")]
    pub zk_path: Option<String>,
}

pub async fn fetch_leader<W: Write>(ctx: &mut Context<W>, args: &Leader) -> Result<()> {
    info!("Fetching leader from {:?}", args.nodes);

    if args.nodes.is_empty() {
        return Err(Error::Validation(
            "At least one Zookeeper node address must be passed in.".to_string(),
        ));
    }

    let path = args.zk_path.as_deref().unwrap_or(&ctx.config.zookeeper.path);
    let url = ctx.leader.aurora_leader(&args.nodes, path).await?;
    ctx.out.line(url)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::commands::testing::{FakeResolver, context, printed};

    #[tokio::test]
    async fn prints_leader_url() {
        let resolver = Arc::new(FakeResolver::new("http://aurora-1:8081"));
        let mut ctx = context(true, resolver.clone());
        let args = Leader {
            nodes: vec!["zk1:2181".to_string()],
            zk_path: None,
        };

        fetch_leader(&mut ctx, &args).await.unwrap();

        assert_eq!(printed(&ctx), "http://aurora-1:8081\n");
        assert_eq!(
            resolver.calls(),
            vec![(
                "aurora".to_string(),
                vec!["zk1:2181".to_string()],
                "/aurora/scheduler".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn custom_path_and_missing_nodes() {
        let resolver = Arc::new(FakeResolver::new("http://aurora-1:8081"));
        let mut ctx = context(false, resolver.clone());

        let args = Leader {
            nodes: vec!["zk1".to_string()],
            zk_path: Some("/custom/scheduler".to_string()),
        };
        fetch_leader(&mut ctx, &args).await.unwrap();
        assert_eq!(resolver.calls()[0].2, "/custom/scheduler");

        let args = Leader {
            nodes: vec![],
            zk_path: None,
        };
        assert!(matches!(
            fetch_leader(&mut ctx, &args).await,
            Err(Error::Validation(_))
        ));
        assert_eq!(resolver.calls().len(), 1);
    }

    #[tokio::test]
    async fn resolver_failure_propagates() {
        let mut ctx = context(false, Arc::new(FakeResolver::failing()));
        let args = Leader {
            nodes: vec!["zk1".to_string()],
            zk_path: None,
        };

        let err = fetch_leader(&mut ctx, &args).await.unwrap_err();
        assert!(matches!(err, Error::NoLeader { .. }));
        assert!(printed(&ctx).is_empty());
    }
}
