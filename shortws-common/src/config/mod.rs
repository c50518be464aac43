//! Configuration for shortws.
//!
//! There is no config file: every tunable comes from a `SHORTWS_*` environment
//! variable, read once at startup into an immutable [`ShorteningConfig`].

pub mod env;
pub mod shortening;
pub mod source;

pub use env::{EnvError, EnvParser};
pub use shortening::{
    DEFAULT_BUILD_PATH_LENGTH, DEFAULT_CACHE_CAPACITY, LoadedConfig, ShorteningConfig,
    ShorteningConfigSources,
};
pub use source::{ConfigSource, Sourced};

#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
