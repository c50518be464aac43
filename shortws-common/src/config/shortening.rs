//! Tunables for workspace path shortening.

use super::env::{EnvError, EnvParser};
use super::source::Sourced;
use serde::{Deserialize, Serialize};

/// Default headroom (in characters) a build should have below the platform limit.
pub const DEFAULT_BUILD_PATH_LENGTH: u32 = 512;

/// Default number of nodes whose path limit is remembered.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Immutable snapshot of the shortening tunables.
///
/// Built once at startup and handed to the locator, so a single decision
/// always sees one consistent set of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShorteningConfig {
    /// Path length that should stay available inside the workspace. Shortening
    /// only kicks in once the headroom drops to this value or below.
    #[serde(default = "default_build_path_length")]
    pub build_path_length: u32,
    /// Literal text removed from the job name before truncation.
    #[serde(default)]
    pub strip_text: Option<String>,
    /// Delete space characters from the job name.
    #[serde(default)]
    pub remove_blanks: bool,
    /// Prepended to the shortened name.
    #[serde(default)]
    pub initial_prefix: Option<String>,
    /// Replaces the `...` truncation marker; `---` when unset.
    #[serde(default)]
    pub ellipsis_replacement: Option<String>,
    /// Capacity of the per-node path limit cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for ShorteningConfig {
    fn default() -> Self {
        Self {
            build_path_length: DEFAULT_BUILD_PATH_LENGTH,
            strip_text: None,
            remove_blanks: false,
            initial_prefix: None,
            ellipsis_replacement: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ShorteningConfig {
    pub fn with_build_path_length(mut self, length: u32) -> Self {
        self.build_path_length = length;
        self
    }

    pub fn with_strip_text(mut self, text: impl Into<String>) -> Self {
        self.strip_text = Some(text.into());
        self
    }

    pub fn with_remove_blanks(mut self, remove: bool) -> Self {
        self.remove_blanks = remove;
        self
    }

    pub fn with_initial_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.initial_prefix = Some(prefix.into());
        self
    }

    pub fn with_ellipsis_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.ellipsis_replacement = Some(replacement.into());
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Load from `SHORTWS_*` environment variables.
    pub fn from_env() -> LoadedConfig {
        let mut parser = EnvParser::new();
        let sources = ShorteningConfigSources::parse(&mut parser);
        LoadedConfig {
            config: sources.to_config(),
            sources,
            errors: parser.take_errors(),
        }
    }
}

fn default_build_path_length() -> u32 {
    DEFAULT_BUILD_PATH_LENGTH
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

/// Every tunable along with where its value came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShorteningConfigSources {
    pub build_path_length: Sourced<u32>,
    pub strip_text: Sourced<Option<String>>,
    pub remove_blanks: Sourced<bool>,
    pub initial_prefix: Sourced<Option<String>>,
    pub ellipsis_replacement: Sourced<Option<String>>,
    pub cache_capacity: Sourced<usize>,
}

impl ShorteningConfigSources {
    fn parse(parser: &mut EnvParser) -> Self {
        Self {
            build_path_length: parser.get_u32_range(
                "BUILD_PATH_LENGTH",
                DEFAULT_BUILD_PATH_LENGTH,
                0,
                u16::MAX as u32,
            ),
            strip_text: parser.get_optional_string("STRIP_TEXT"),
            remove_blanks: parser.get_bool("REMOVE_BLANKS", false),
            initial_prefix: parser.get_optional_string("INITIAL_PREFIX"),
            ellipsis_replacement: parser.get_optional_string("ELLIPSIS_REPLACEMENT"),
            cache_capacity: parser.get_usize_range(
                "CACHE_CAPACITY",
                DEFAULT_CACHE_CAPACITY,
                1,
                1_000_000,
            ),
        }
    }

    pub fn to_config(&self) -> ShorteningConfig {
        ShorteningConfig {
            build_path_length: self.build_path_length.value,
            strip_text: self.strip_text.value.clone(),
            remove_blanks: self.remove_blanks.value,
            initial_prefix: self.initial_prefix.value.clone(),
            ellipsis_replacement: self.ellipsis_replacement.value.clone(),
            cache_capacity: self.cache_capacity.value,
        }
    }
}

/// Result of loading the configuration from the environment.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ShorteningConfig,
    pub sources: ShorteningConfigSources,
    /// Problems found while parsing; affected values fell back to defaults.
    pub errors: Vec<EnvError>,
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, env_test_lock};
    use std::env;

    const VARS: [&str; 6] = [
        "SHORTWS_BUILD_PATH_LENGTH",
        "SHORTWS_STRIP_TEXT",
        "SHORTWS_REMOVE_BLANKS",
        "SHORTWS_INITIAL_PREFIX",
        "SHORTWS_ELLIPSIS_REPLACEMENT",
        "SHORTWS_CACHE_CAPACITY",
    ];

    fn cleanup_env() {
        for var in VARS {
            // SAFETY: env_test_lock serialises every test that touches the environment
            unsafe { env::remove_var(var) };
        }
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: env_test_lock serialises every test that touches the environment
        unsafe { env::set_var(key, value) };
    }

    #[test]
    fn test_defaults_without_env() {
        let _guard = env_test_lock();
        cleanup_env();

        let loaded = ShorteningConfig::from_env();
        assert_eq!(loaded.config, ShorteningConfig::default());
        assert!(loaded.errors.is_empty());
        assert_eq!(loaded.sources.build_path_length.source, ConfigSource::Default);
    }

    #[test]
    fn test_from_env_reads_every_tunable() {
        let _guard = env_test_lock();
        cleanup_env();

        set_env("SHORTWS_BUILD_PATH_LENGTH", "128");
        set_env("SHORTWS_STRIP_TEXT", "release_");
        set_env("SHORTWS_REMOVE_BLANKS", "yes");
        set_env("SHORTWS_INITIAL_PREFIX", "ws_");
        set_env("SHORTWS_ELLIPSIS_REPLACEMENT", "~");
        set_env("SHORTWS_CACHE_CAPACITY", "16");

        let loaded = ShorteningConfig::from_env();
        let expected = ShorteningConfig::default()
            .with_build_path_length(128)
            .with_strip_text("release_")
            .with_remove_blanks(true)
            .with_initial_prefix("ws_")
            .with_ellipsis_replacement("~")
            .with_cache_capacity(16);
        assert_eq!(loaded.config, expected);
        assert!(loaded.errors.is_empty());
        assert_eq!(
            loaded.sources.strip_text.var.as_deref(),
            Some("SHORTWS_STRIP_TEXT")
        );

        cleanup_env();
    }

    #[test]
    fn test_bad_values_fall_back_and_are_reported() {
        let _guard = env_test_lock();
        cleanup_env();

        set_env("SHORTWS_BUILD_PATH_LENGTH", "-3");
        set_env("SHORTWS_CACHE_CAPACITY", "0");

        let loaded = ShorteningConfig::from_env();
        assert_eq!(loaded.config.build_path_length, DEFAULT_BUILD_PATH_LENGTH);
        assert_eq!(loaded.config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(loaded.errors.len(), 2);

        cleanup_env();
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ShorteningConfig =
            serde_json::from_str(r#"{"remove_blanks": true}"#).unwrap();
        assert!(config.remove_blanks);
        assert_eq!(config.build_path_length, DEFAULT_BUILD_PATH_LENGTH);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }
}
