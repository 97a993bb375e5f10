// OS counter collection behind a platform-neutral interface

mod error;
pub mod fields;
mod linux;
mod portable;

pub use error::CollectError;
pub use linux::{GlobalMemory, ProcCollector, ProcessMemory, ProcessTimes};
pub use portable::{SysinfoCollector, UnsupportedCollector};

use crate::config::CollectorConfig;
use crate::models::{CounterMap, Dimension, Scalar};

/// Source of process and machine counters.
///
/// Both methods are best-effort: a counter group that cannot be read or parsed is left
/// out of `scalars`, and nothing is ever reported to the caller. Callers must tolerate
/// maps with fewer dimensions than usual.
pub trait CounterCollector: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// CPU time, page faults and memory segments of the current process.
    fn collect_process_counters(&self, scalars: &mut CounterMap);

    /// Machine-wide memory counters.
    fn collect_global_counters(&self, scalars: &mut CounterMap);
}

/// Picks the collector for the running platform.
pub fn platform_collector(config: &CollectorConfig) -> Box<dyn CounterCollector> {
    let collector: Box<dyn CounterCollector> = if cfg!(target_os = "linux") {
        Box::new(ProcCollector::from_config(config))
    } else if sysinfo::IS_SUPPORTED_SYSTEM {
        Box::new(SysinfoCollector::new())
    } else {
        Box::new(UnsupportedCollector)
    };
    tracing::info!(
        collector = collector.name(),
        os = std::env::consts::OS,
        "counter collector selected"
    );
    collector
}

pub(crate) fn add_scalar(scalars: &mut CounterMap, dimension: Dimension, value: i64) {
    scalars.insert(dimension, Scalar::new(dimension, value));
}
