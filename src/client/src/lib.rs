//! Concrete backends for the collaborator traits in `common`.

pub mod scheduler;
pub mod zk;

pub use scheduler::ApiBetaClient;
pub use zk::ZkLeaderResolver;

/// One-shot HTTP fixtures shared with the CLI tests.
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
