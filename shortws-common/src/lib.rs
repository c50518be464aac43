//! Shared library for shortws.
//!
//! Build agents place each job's workspace at `<workspace root>/<full job
//! name>`. Deep folder hierarchies can push that past the path limit of the
//! agent's platform. [`WorkspaceLocator`] spots the jobs at risk and hands out
//! a shorter, deterministic replacement of the form
//! `<workspace root>/<abbreviated name><8 hex digest>`.

pub mod cache;
pub mod config;
pub mod digest;
pub mod locator;
pub mod logging;
pub mod node;
pub mod path;
pub mod probe;
pub mod transform;
pub mod types;

pub use cache::LimitCache;
pub use config::{ConfigSource, EnvError, LoadedConfig, ShorteningConfig, Sourced};
pub use digest::name_suffix;
pub use locator::{
    PathDecision, UnchangedReason, WorkspaceLocator, default_workspace, shortened_workspace,
};
pub use logging::{LogConfig, LogFormat, LoggingError, LoggingGuards, init_logging};
pub use node::{ExecutionNode, StaticNode};
pub use path::RemotePath;
pub use probe::{FixedPlatformProbe, LocalPlatformProbe, PlatformProbe, ProbeError};
pub use transform::{abbreviate, transform_name};
pub use types::{JobIdentity, NodeIdentity, PathLimit, PlatformKind};
