//! Discovery of the platform (and therefore the path limit) of a node.
//!
//! Finding out what OS a node runs usually needs a round-trip to the agent, so
//! the transport layer supplies a [`PlatformProbe`] and the locator only talks
//! to that trait.

use crate::node::ExecutionNode;
use crate::types::{PathLimit, PlatformKind};
use thiserror::Error;

/// Why a probe could not tell what platform a node runs.
///
/// Every variant is inconclusive: the locator leaves the workspace alone and
/// does not remember the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The round-trip to the node failed.
    #[error("communication with node failed: {0}")]
    Communication(String),

    /// The caller cancelled the probe before it finished.
    #[error("interrupted while probing node")]
    Interrupted,
}

/// Asks a node which platform family it runs.
///
/// Implementations may block. They own their timeouts and must turn a
/// cancellation into [`ProbeError::Interrupted`] rather than panicking.
pub trait PlatformProbe: Send + Sync {
    fn platform_kind(&self, node: &dyn ExecutionNode) -> Result<PlatformKind, ProbeError>;

    /// Maximum path length on `node`.
    fn max_path_length(&self, node: &dyn ExecutionNode) -> Result<PathLimit, ProbeError> {
        self.platform_kind(node).map(PlatformKind::max_path_length)
    }
}

impl<P: PlatformProbe + ?Sized> PlatformProbe for std::sync::Arc<P> {
    fn platform_kind(&self, node: &dyn ExecutionNode) -> Result<PlatformKind, ProbeError> {
        (**self).platform_kind(node)
    }

    fn max_path_length(&self, node: &dyn ExecutionNode) -> Result<PathLimit, ProbeError> {
        (**self).max_path_length(node)
    }
}

/// Reports the platform this process runs on.
///
/// This is the agent side of a probe: run it on the node and ship the answer
/// back through whatever transport the caller uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPlatformProbe;

impl PlatformProbe for LocalPlatformProbe {
    fn platform_kind(&self, _node: &dyn ExecutionNode) -> Result<PlatformKind, ProbeError> {
        Ok(PlatformKind::current())
    }
}

/// Reports the same platform for every node.
#[derive(Debug, Clone, Copy)]
pub struct FixedPlatformProbe(pub PlatformKind);

impl PlatformProbe for FixedPlatformProbe {
    fn platform_kind(&self, _node: &dyn ExecutionNode) -> Result<PlatformKind, ProbeError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::StaticNode;
    use std::sync::Arc;

    struct Unreachable;

    impl PlatformProbe for Unreachable {
        fn platform_kind(&self, _node: &dyn ExecutionNode) -> Result<PlatformKind, ProbeError> {
            Err(ProbeError::Communication("channel closed".to_string()))
        }
    }

    #[test]
    fn test_fixed_probe_limits() {
        let node = StaticNode::agent("win", 1, "C:\\ws");
        let probe = FixedPlatformProbe(PlatformKind::Windows);
        assert_eq!(probe.max_path_length(&node), Ok(PathLimit::WINDOWS));

        let probe = FixedPlatformProbe(PlatformKind::Other);
        assert_eq!(probe.max_path_length(&node), Ok(PathLimit::POSIX));
    }

    #[test]
    fn test_local_probe_matches_build_target() {
        let node = StaticNode::agent("here", 1, "/ws");
        let expected = if cfg!(windows) {
            PathLimit::WINDOWS
        } else {
            PathLimit::POSIX
        };
        assert_eq!(LocalPlatformProbe.max_path_length(&node), Ok(expected));
    }

    #[test]
    fn test_failure_propagates_through_default_method() {
        let node = StaticNode::agent("gone", 1, "/ws");
        let err = Unreachable.max_path_length(&node).unwrap_err();
        assert_eq!(err.to_string(), "communication with node failed: channel closed");
    }

    #[test]
    fn test_arc_probe_delegates() {
        let node = StaticNode::agent("win", 1, "C:\\ws");
        let probe = Arc::new(FixedPlatformProbe(PlatformKind::Windows));
        assert_eq!(probe.platform_kind(&node), Ok(PlatformKind::Windows));
    }
}
