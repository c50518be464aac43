//! Paths on a remote execution node.
//!
//! A workspace root belongs to the agent's filesystem, not ours, so `PathBuf`
//! (which follows the local OS rules) is the wrong model. `RemotePath` keeps the
//! raw string and infers the separator from the path itself, the same way the
//! agent would interpret it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path string interpreted with the conventions of the node that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemotePath(String);

impl RemotePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, which is what platform path limits count.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether this path is written in Windows form (`C:\...` or `\\server\...`).
    pub fn is_windows_style(&self) -> bool {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => true,
            _ => self.0.starts_with("\\\\"),
        }
    }

    pub fn separator(&self) -> char {
        if self.is_windows_style() { '\\' } else { '/' }
    }

    /// Resolve `relative` under this path.
    ///
    /// `relative` uses `/` between segments (hierarchical job names do); on a
    /// Windows-style root those are rewritten to `\`.
    pub fn child(&self, relative: &str) -> RemotePath {
        let sep = self.separator();
        let relative = relative.trim_start_matches(['/', '\\']);
        let relative = if sep == '\\' {
            relative.replace('/', "\\")
        } else {
            relative.to_string()
        };

        let base = self.0.trim_end_matches(['/', '\\']);
        if base.is_empty() && sep == '/' && self.0.starts_with('/') {
            return RemotePath(format!("/{relative}"));
        }
        RemotePath(format!("{base}{sep}{relative}"))
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RemotePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RemotePath {
    fn from(value: String) -> Self {
        Self(value)
    }
}
