//! Execution nodes as seen by the locator.

use crate::path::RemotePath;
use crate::types::NodeIdentity;

/// A node builds can be assigned to.
///
/// Implemented by the execution layer; the locator only reads from it.
pub trait ExecutionNode {
    /// Identity of this node for the lifetime of its current connection.
    fn identity(&self) -> NodeIdentity;

    /// `false` for the controller itself, whose workspace root is operator
    /// configured and never rewritten.
    fn is_remote_agent(&self) -> bool;

    /// Root under which per-job workspaces live; `None` while offline.
    fn workspace_root(&self) -> Option<RemotePath>;
}

/// Plain in-memory node description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticNode {
    pub identity: NodeIdentity,
    pub remote_agent: bool,
    pub workspace_root: Option<RemotePath>,
}

impl StaticNode {
    /// An online remote agent.
    pub fn agent(
        name: impl Into<String>,
        session: u64,
        workspace_root: impl Into<RemotePath>,
    ) -> Self {
        Self {
            identity: NodeIdentity::new(name, session),
            remote_agent: true,
            workspace_root: Some(workspace_root.into()),
        }
    }

    /// The controller node.
    pub fn controller(workspace_root: impl Into<RemotePath>) -> Self {
        Self {
            identity: NodeIdentity::new("built-in", 0),
            remote_agent: false,
            workspace_root: Some(workspace_root.into()),
        }
    }

    /// Same node after it lost its connection.
    pub fn offline(mut self) -> Self {
        self.workspace_root = None;
        self
    }

    /// Same node after a reconnect, which always yields a new session.
    pub fn reconnected(mut self, session: u64) -> Self {
        self.identity = NodeIdentity::new(self.identity.name().to_string(), session);
        self
    }
}

impl ExecutionNode for StaticNode {
    fn identity(&self) -> NodeIdentity {
        self.identity.clone()
    }

    fn is_remote_agent(&self) -> bool {
        self.remote_agent
    }

    fn workspace_root(&self) -> Option<RemotePath> {
        self.workspace_root.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_and_controller() {
        let agent = StaticNode::agent("linux-1", 3, "/var/agent/workspace");
        assert!(agent.is_remote_agent());
        assert_eq!(
            agent.workspace_root().map(|p| p.to_string()),
            Some("/var/agent/workspace".to_string())
        );

        let controller = StaticNode::controller("/var/lib/ci/workspace");
        assert!(!controller.is_remote_agent());
    }

    #[test]
    fn test_offline_and_reconnect() {
        let agent = StaticNode::agent("linux-1", 3, "/ws");
        let offline = agent.clone().offline();
        assert_eq!(offline.workspace_root(), None);

        let back = agent.reconnected(4);
        assert_eq!(back.identity(), NodeIdentity::new("linux-1", 4));
    }
}
