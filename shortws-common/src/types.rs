//! Common types shared by the locator, the cache and the probes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a connected execution node.
///
/// A node that disconnects and reconnects comes back with a new `session`,
/// so anything keyed by the old identity is stale from that point on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIdentity {
    name: String,
    session: u64,
}

impl NodeIdentity {
    pub fn new(name: impl Into<String>, session: u64) -> Self {
        Self {
            name: name.into(),
            session,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session(&self) -> u64 {
        self.session
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.session)
    }
}

/// Operating system family reported by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Windows,
    /// Linux, macOS and anything else that is not Windows.
    Other,
}

impl PlatformKind {
    /// Platform of the process this code runs in.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }

    /// Maximum path length we assume for this platform family.
    pub fn max_path_length(self) -> PathLimit {
        match self {
            Self::Windows => PathLimit::WINDOWS,
            Self::Other => PathLimit::POSIX,
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Maximum number of characters a platform allows in a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathLimit(pub u32);

impl PathLimit {
    /// Classic `MAX_PATH`.
    pub const WINDOWS: PathLimit = PathLimit(260);
    /// `PATH_MAX` on Linux; good enough for other unixes too.
    pub const POSIX: PathLimit = PathLimit(4096);

    pub fn chars(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PathLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a job as seen by the workspace locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobIdentity {
    /// Slash separated hierarchical name, e.g. `folder/sub/job`.
    pub full_name: String,
    /// Leaf name, e.g. `job`.
    pub name: String,
}

impl JobIdentity {
    pub fn new(full_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            name: name.into(),
        }
    }

    /// Build an identity from a hierarchical name, taking the last segment as leaf.
    pub fn from_full_name(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = full_name
            .rsplit('/')
            .next()
            .unwrap_or(full_name.as_str())
            .to_string();
        Self { full_name, name }
    }
}

impl fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_identity_display() {
        let id = NodeIdentity::new("win-agent-3", 7);
        assert_eq!(id.to_string(), "win-agent-3#7");
        assert_eq!(id.name(), "win-agent-3");
        assert_eq!(id.session(), 7);
    }

    #[test]
    fn test_reconnect_is_a_new_identity() {
        let before = NodeIdentity::new("agent", 1);
        let after = NodeIdentity::new("agent", 2);
        assert_ne!(before, after);
    }

    #[test]
    fn test_platform_limits() {
        assert_eq!(PlatformKind::Windows.max_path_length(), PathLimit(260));
        assert_eq!(PlatformKind::Other.max_path_length(), PathLimit(4096));
    }

    #[test]
    fn test_platform_kind_serde() {
        let json = serde_json::to_string(&PlatformKind::Windows).unwrap();
        assert_eq!(json, "\"windows\"");
        let parsed: PlatformKind = serde_json::from_str("\"other\"").unwrap();
        assert_eq!(parsed, PlatformKind::Other);
    }

    #[test]
    fn test_job_identity_from_full_name() {
        let job = JobIdentity::from_full_name("this_is_my_folder_alright/and_a_project_in_it");
        assert_eq!(job.name, "and_a_project_in_it");
        assert_eq!(job.full_name, "this_is_my_folder_alright/and_a_project_in_it");

        let top = JobIdentity::from_full_name("short_project_name");
        assert_eq!(top.name, "short_project_name");
    }
}
