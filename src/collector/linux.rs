// Linux counters from the /proc pseudo-filesystem.

use super::fields::{self, MEMINFO, MEMINFO_KEYS, PROCESS_STAT, PROCESS_STATM};
use super::{CollectError, CounterCollector, add_scalar};
use crate::config::CollectorConfig;
use crate::models::{CounterMap, Dimension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Fault and CPU-time counters of the current process, CPU times in clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessTimes {
    pub minflt: i64,
    pub majflt: i64,
    pub utime: i64,
    pub stime: i64,
}

/// Memory segments of the current process, in pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessMemory {
    pub resident: i64,
    pub trs: i64,
    pub drs: i64,
    pub lrs: i64,
}

/// Machine-wide memory, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalMemory {
    pub total: i64,
    pub used: i64,
    pub free: i64,
    pub buffers: i64,
    pub cache: i64,
}

pub struct ProcCollector {
    proc_root: PathBuf,
    page_size: i64,
    tick_ms: i64,
    /// Serializes process-counter reads. Global counters are read without it.
    process_lock: Mutex<()>,
}

impl ProcCollector {
    pub fn new(proc_root: impl Into<PathBuf>, page_size: i64, tick_ms: i64) -> Self {
        Self {
            proc_root: proc_root.into(),
            page_size,
            tick_ms,
            process_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(
            config.proc_root.clone(),
            config.page_size_bytes,
            config.clock_tick_ms,
        )
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    pub fn read_process_times(&self) -> Result<ProcessTimes, CollectError> {
        let [minflt, majflt, utime, stime] = PROCESS_STAT.read(&self.proc_root)?;
        Ok(ProcessTimes {
            minflt,
            majflt,
            utime,
            stime,
        })
    }

    pub fn read_process_memory(&self) -> Result<ProcessMemory, CollectError> {
        let [resident, trs, drs, lrs] = PROCESS_STATM.read(&self.proc_root)?;
        Ok(ProcessMemory {
            resident,
            trs,
            drs,
            lrs,
        })
    }

    /// Reads the legacy meminfo table; current kernels' `Key: value kB` layout is the fallback.
    pub fn read_global_memory(&self) -> Result<GlobalMemory, CollectError> {
        match MEMINFO.read(&self.proc_root) {
            Ok([total, used, free, buffers, cache]) => Ok(GlobalMemory {
                total,
                used,
                free,
                buffers,
                cache,
            }),
            Err(e) if e.is_malformed() => {
                let path = MEMINFO.path(&self.proc_root);
                let content =
                    std::fs::read_to_string(&path).map_err(|source| CollectError::Io {
                        path: path.clone(),
                        source,
                    })?;
                let [total, free, buffers, cache] =
                    fields::decode_keyed(&path, &content, MEMINFO_KEYS).map_err(|_| e)?;
                Ok(GlobalMemory {
                    total,
                    used: total.saturating_sub(free),
                    free,
                    buffers,
                    cache,
                })
            }
            Err(e) => Err(e),
        }
    }

    fn add_process_times(&self, scalars: &mut CounterMap, t: ProcessTimes) {
        add_scalar(scalars, Dimension::USER_TIME, t.utime.saturating_mul(self.tick_ms));
        add_scalar(scalars, Dimension::KERNEL_TIME, t.stime.saturating_mul(self.tick_ms));
        add_scalar(
            scalars,
            Dimension::CPU_TIME,
            t.utime
                .saturating_add(t.stime)
                .saturating_mul(self.tick_ms),
        );
        add_scalar(scalars, Dimension::SOFT_PAGE_FAULTS, t.minflt);
        add_scalar(scalars, Dimension::HARD_PAGE_FAULTS, t.majflt);
    }

    fn add_process_memory(&self, scalars: &mut CounterMap, m: ProcessMemory) {
        add_scalar(scalars, Dimension::WORKING_SET, m.resident.saturating_mul(self.page_size));
        add_scalar(scalars, Dimension::TRS, m.trs.saturating_mul(self.page_size));
        add_scalar(scalars, Dimension::DRS, m.drs.saturating_mul(self.page_size));
        add_scalar(scalars, Dimension::LRS, m.lrs.saturating_mul(self.page_size));
    }
}

impl CounterCollector for ProcCollector {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn collect_process_counters(&self, scalars: &mut CounterMap) {
        let (times, memory) = {
            let _guard = self
                .process_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            (self.read_process_times(), self.read_process_memory())
        };

        match times {
            Ok(t) => self.add_process_times(scalars, t),
            Err(e) => tracing::debug!(
                error = %e,
                operation = "collect_process_counters",
                "process stat skipped"
            ),
        }
        match memory {
            Ok(m) => self.add_process_memory(scalars, m),
            Err(e) => tracing::debug!(
                error = %e,
                operation = "collect_process_counters",
                "process statm skipped"
            ),
        }
    }

    fn collect_global_counters(&self, scalars: &mut CounterMap) {
        match self.read_global_memory() {
            Ok(m) => {
                add_scalar(scalars, Dimension::PHYSICAL_TOTAL, m.total);
                add_scalar(scalars, Dimension::USED_MEM, m.used);
                add_scalar(scalars, Dimension::FREE_MEM, m.free);
                add_scalar(scalars, Dimension::BUFFERS, m.buffers);
                add_scalar(scalars, Dimension::SYSTEM_CACHE, m.cache);
            }
            Err(e) => tracing::debug!(
                error = %e,
                operation = "collect_global_counters",
                "meminfo skipped"
            ),
        }
    }
}
