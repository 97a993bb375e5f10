// Counters for targets without /proc: sysinfo where supported, nothing otherwise

use super::{CollectError, CounterCollector, add_scalar};
use crate::models::{CounterMap, Dimension};
use std::sync::{Mutex, PoisonError};
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Resident memory of this process plus machine memory totals, via `sysinfo`.
/// CPU-time, fault and segment dimensions are not reported on this path.
pub struct SysinfoCollector {
    sys: Mutex<System>,
    pid: Option<Pid>,
}

impl Default for SysinfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoCollector {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "current pid unavailable; process counters disabled");
                None
            }
        };
        Self {
            sys: Mutex::new(System::new()),
            pid,
        }
    }

    /// Resident set size of this process, in bytes.
    pub fn read_working_set(&self) -> Result<u64, CollectError> {
        let pid = self.pid.ok_or(CollectError::ProcessUnavailable)?;
        let mut sys = self.sys.lock().unwrap_or_else(PoisonError::into_inner);
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        sys.process(pid)
            .map(|p| p.memory())
            .ok_or(CollectError::ProcessUnavailable)
    }
}

fn clamp(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}

impl CounterCollector for SysinfoCollector {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn collect_process_counters(&self, scalars: &mut CounterMap) {
        match self.read_working_set() {
            Ok(bytes) => add_scalar(scalars, Dimension::WORKING_SET, clamp(bytes)),
            Err(e) => tracing::debug!(
                error = %e,
                operation = "collect_process_counters",
                "working set skipped"
            ),
        }
    }

    fn collect_global_counters(&self, scalars: &mut CounterMap) {
        // Fresh handle per call: machine-wide state, nothing shared with process sampling.
        let mut sys = System::new();
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            tracing::debug!(
                operation = "collect_global_counters",
                "memory totals unavailable"
            );
            return;
        }
        add_scalar(scalars, Dimension::PHYSICAL_TOTAL, clamp(total));
        add_scalar(scalars, Dimension::USED_MEM, clamp(sys.used_memory()));
        add_scalar(scalars, Dimension::FREE_MEM, clamp(sys.free_memory()));
    }
}

/// Platforms with no counter source: every collection adds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedCollector;

impl CounterCollector for UnsupportedCollector {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn collect_process_counters(&self, _scalars: &mut CounterMap) {}

    fn collect_global_counters(&self, _scalars: &mut CounterMap) {}
}
