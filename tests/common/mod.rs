// Shared test helpers: fixture /proc trees

use procmeter::collector::ProcCollector;
use std::path::Path;
use tempfile::TempDir;

pub const PAGE_SIZE: i64 = 4096;
pub const TICK_MS: i64 = 10;

/// A stat line with the given fault and tick counters at their kernel positions.
pub fn stat_line(minflt: i64, majflt: i64, utime: i64, stime: i64) -> String {
    format!(
        "4242 (java) S 1 4242 4242 0 -1 4194560 {} 12 {} 3 {} {} 5 6 20 0 31 0 1234 0 0\n",
        minflt, majflt, utime, stime
    )
}

pub fn statm_line(resident: i64, trs: i64, drs: i64, lrs: i64) -> String {
    format!("2000 {} 50 {} {} {} 0\n", resident, trs, drs, lrs)
}

pub const LEGACY_MEMINFO: &str = "        total:    used:    free:  shared: buffers:  cached:\n\
Mem:  1050000000 800000000 250000000 0 40000000 300000000\n\
Swap: 2000000000 0 2000000000\n";

pub struct ProcFixture {
    pub dir: TempDir,
}

impl ProcFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("self")).unwrap();
        Self { dir }
    }

    /// Fixture with consistent stat, statm and legacy meminfo files.
    pub fn complete() -> Self {
        let f = Self::new();
        f.write("self/stat", &stat_line(1500, 7, 250, 40));
        f.write("self/statm", &statm_line(100, 5, 60, 0));
        f.write("meminfo", LEGACY_MEMINFO);
        f
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) {
        std::fs::write(self.dir.path().join(rel), content).unwrap();
    }

    pub fn collector(&self) -> ProcCollector {
        ProcCollector::new(self.root(), PAGE_SIZE, TICK_MS)
    }
}
