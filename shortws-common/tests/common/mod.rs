use shortws_common::{ExecutionNode, PlatformKind, PlatformProbe, ProbeError};
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

#[allow(dead_code)]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .json(),
            )
            .with(filter)
            .init();
    });
}

/// Probe that reports a fixed platform and counts how often it was asked.
#[allow(dead_code)]
pub struct CountingProbe {
    kind: PlatformKind,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingProbe {
    pub fn new(kind: PlatformKind) -> Self {
        Self {
            kind,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PlatformProbe for CountingProbe {
    fn platform_kind(&self, _node: &dyn ExecutionNode) -> Result<PlatformKind, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.kind)
    }
}

/// Workspace directory of a test agent, separator included.
#[allow(dead_code)]
pub const WS_DIR: &str = "/home/ci/agent-0/workspace/";

#[allow(dead_code)]
pub fn ws_root() -> &'static str {
    WS_DIR.trim_end_matches('/')
}
