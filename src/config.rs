use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub collector: CollectorConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// Root of the proc pseudo-filesystem; tests point this at a fixture tree.
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,
    #[serde(default = "default_page_size_bytes")]
    pub page_size_bytes: i64,
    /// Duration of one kernel clock tick.
    #[serde(default = "default_clock_tick_ms")]
    pub clock_tick_ms: i64,
}

fn default_proc_root() -> PathBuf {
    PathBuf::from("/proc")
}

fn default_page_size_bytes() -> i64 {
    4096
}

fn default_clock_tick_ms() -> i64 {
    10
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            proc_root: default_proc_root(),
            page_size_bytes: default_page_size_bytes(),
            clock_tick_ms: default_clock_tick_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub sample_interval_ms: u64,
    /// Stop after this many data points; 0 samples until shutdown.
    #[serde(default)]
    pub max_samples: u32,
    /// How often to log run stats at INFO level.
    pub stats_log_interval_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// When set, the finished run is written here as JSON.
    pub path: Option<String>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.collector.proc_root.as_os_str().is_empty(),
            "collector.proc_root must be non-empty"
        );
        anyhow::ensure!(
            self.collector.page_size_bytes > 0,
            "collector.page_size_bytes must be > 0, got {}",
            self.collector.page_size_bytes
        );
        anyhow::ensure!(
            self.collector.clock_tick_ms > 0,
            "collector.clock_tick_ms must be > 0, got {}",
            self.collector.clock_tick_ms
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        if let Some(path) = &self.output.path {
            anyhow::ensure!(!path.is_empty(), "output.path must be non-empty when set");
        }
        Ok(())
    }
}
