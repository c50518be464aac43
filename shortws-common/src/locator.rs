//! Workspace locator: decides whether a job gets a shortened workspace on a node.
//!
//! # Decision Path
//!
//! 1. Controller node → unchanged (its workspace root is operator configured).
//! 2. Node offline (no workspace root) → unchanged.
//! 3. Path limit from the cache, or probed and cached. Inconclusive probe →
//!    unchanged, nothing cached.
//! 4. `headroom = limit - len(default)`. Above the configured build path
//!    length → unchanged.
//! 5. Candidate is `root/<short name><digest>`; used only when strictly shorter
//!    than the default.
//!
//! Nothing here fails a build: every problem resolves to the default path.

use crate::cache::LimitCache;
use crate::config::ShorteningConfig;
use crate::digest::name_suffix;
use crate::node::ExecutionNode;
use crate::path::RemotePath;
use crate::probe::{PlatformProbe, ProbeError};
use crate::transform::transform_name;
use crate::types::{JobIdentity, PathLimit};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Why the default workspace path was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnchangedReason {
    /// The controller's own workspace is never rewritten.
    ControllerNode,
    /// Node is offline; we cannot tell what the path would look like.
    WorkspaceRootUnknown,
    /// Platform limit could not be discovered.
    ProbeInconclusive,
    /// There is plenty of room below the platform limit.
    HeadroomSufficient,
    /// The shortened path would not be shorter than the default.
    NoImprovement,
}

impl UnchangedReason {
    pub fn code(self) -> &'static str {
        match self {
            Self::ControllerNode => "controller_node",
            Self::WorkspaceRootUnknown => "workspace_root_unknown",
            Self::ProbeInconclusive => "probe_inconclusive",
            Self::HeadroomSufficient => "headroom_sufficient",
            Self::NoImprovement => "no_improvement",
        }
    }
}

impl fmt::Display for UnchangedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a locator decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PathDecision {
    /// Use the default workspace path.
    Unchanged { reason: UnchangedReason },
    /// Use `path` instead of the default; always strictly shorter.
    Shortened { path: RemotePath },
}

impl PathDecision {
    fn unchanged(reason: UnchangedReason) -> Self {
        Self::Unchanged { reason }
    }

    /// The replacement path, if any.
    pub fn path(&self) -> Option<&RemotePath> {
        match self {
            Self::Shortened { path } => Some(path),
            Self::Unchanged { .. } => None,
        }
    }

    pub fn into_path(self) -> Option<RemotePath> {
        match self {
            Self::Shortened { path } => Some(path),
            Self::Unchanged { .. } => None,
        }
    }

    pub fn is_shortened(&self) -> bool {
        matches!(self, Self::Shortened { .. })
    }
}

/// Default workspace of `job` under `root`, mirroring the folder hierarchy.
pub fn default_workspace(root: &RemotePath, job: &JobIdentity) -> RemotePath {
    root.child(&job.full_name)
}

/// Shortened workspace candidate of `job` under `root`.
pub fn shortened_workspace(
    root: &RemotePath,
    job: &JobIdentity,
    config: &ShorteningConfig,
) -> RemotePath {
    let name = transform_name(&job.name, config);
    let suffix = name_suffix(&job.full_name);
    root.child(&format!("{name}{suffix}"))
}

/// Picks workspace paths that fit within a node's path limit.
///
/// Stateless apart from the shared [`LimitCache`]; safe to call from many
/// threads at once.
pub struct WorkspaceLocator<P> {
    config: ShorteningConfig,
    probe: P,
    cache: Arc<LimitCache>,
}

impl<P: PlatformProbe> WorkspaceLocator<P> {
    /// Create a locator with its own cache sized from `config`.
    pub fn new(config: ShorteningConfig, probe: P) -> Self {
        let cache = Arc::new(LimitCache::new(config.cache_capacity));
        Self::with_cache(config, probe, cache)
    }

    /// Create a locator sharing an existing cache, e.g. one the execution
    /// layer invalidates on reconnect.
    pub fn with_cache(config: ShorteningConfig, probe: P, cache: Arc<LimitCache>) -> Self {
        Self {
            config,
            probe,
            cache,
        }
    }

    pub fn config(&self) -> &ShorteningConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<LimitCache> {
        &self.cache
    }

    /// Replacement workspace for `job` on `node`, or `None` to keep the default.
    pub fn locate(&self, job: &JobIdentity, node: &dyn ExecutionNode) -> Option<RemotePath> {
        self.decide(job, node).into_path()
    }

    /// Decide whether `job` on `node` should use a shortened workspace.
    pub fn decide(&self, job: &JobIdentity, node: &dyn ExecutionNode) -> PathDecision {
        if !node.is_remote_agent() {
            return PathDecision::unchanged(UnchangedReason::ControllerNode);
        }

        let Some(root) = node.workspace_root() else {
            debug!(
                job = %job,
                node = %node.identity(),
                reason = UnchangedReason::WorkspaceRootUnknown.code(),
                "Node offline, keeping default workspace"
            );
            return PathDecision::unchanged(UnchangedReason::WorkspaceRootUnknown);
        };

        let default_path = default_workspace(&root, job);
        let default_len = default_path.char_len();

        let Some(limit) = self.path_limit(node) else {
            return PathDecision::unchanged(UnchangedReason::ProbeInconclusive);
        };

        let headroom = i64::from(limit.chars()) - default_len as i64;
        let budget = i64::from(self.config.build_path_length);
        if headroom > budget {
            debug!(
                job = %job,
                node = %node.identity(),
                limit = limit.chars(),
                headroom,
                budget,
                reason = UnchangedReason::HeadroomSufficient.code(),
                "Enough headroom, keeping default workspace"
            );
            return PathDecision::unchanged(UnchangedReason::HeadroomSufficient);
        }

        let candidate = shortened_workspace(&root, job, &self.config);
        let candidate_len = candidate.char_len();
        if candidate_len >= default_len {
            debug!(
                job = %job,
                node = %node.identity(),
                default_len,
                candidate_len,
                reason = UnchangedReason::NoImprovement.code(),
                "Shortened workspace would not be shorter, keeping default"
            );
            return PathDecision::unchanged(UnchangedReason::NoImprovement);
        }

        info!(
            job = %job,
            node = %node.identity(),
            default = %default_path,
            shortened = %candidate,
            headroom,
            "Using shortened workspace"
        );
        PathDecision::Shortened { path: candidate }
    }

    /// Cached path limit of `node`, probing on a miss. `None` means the probe
    /// was inconclusive and the headroom should be treated as unbounded.
    fn path_limit(&self, node: &dyn ExecutionNode) -> Option<PathLimit> {
        let identity = node.identity();
        if let Some(limit) = self.cache.get(&identity) {
            return Some(limit);
        }

        match self.probe.max_path_length(node) {
            Ok(limit) => {
                self.cache.put(identity, limit);
                Some(limit)
            }
            Err(ProbeError::Interrupted) => {
                info!(
                    node = %identity,
                    "Interrupted while trying to discover max path length on node"
                );
                None
            }
            Err(err) => {
                info!(
                    node = %identity,
                    error = %err,
                    "Unable to discover max path length on node"
                );
                None
            }
        }
    }
}

impl<P> fmt::Debug for WorkspaceLocator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceLocator")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
