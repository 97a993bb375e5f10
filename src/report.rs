// Run persistence (JSON) and a plain-text summary for logs

use crate::models::{Run, Scalar};
use std::fmt::Write as _;
use std::path::Path;

pub fn write_json(path: &Path, run: &Run) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(run)?;
    std::fs::write(path, json)?;
    tracing::debug!(
        path = %path.display(),
        points = run.len(),
        operation = "write_json",
        "Run written"
    );
    Ok(())
}

pub fn read_json(path: &Path) -> anyhow::Result<Run> {
    let s = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&s)?)
}

/// One row per dimension: value at its first and last occurrence, and the change between them.
pub fn render_summary(run: &Run) -> String {
    if run.is_empty() {
        return "no data points\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<18} {:>14} {:>14} {:>14}",
        "dimension", "first", "last", "delta"
    );
    for dim in run.dimensions() {
        let mut seen = run.points().iter().filter_map(|p| p.scalar(dim));
        let Some(first) = seen.next().copied() else {
            continue;
        };
        let last = seen.last().copied().unwrap_or(first);
        let delta = Scalar::new(dim, last.magnitude().saturating_sub(first.magnitude()));
        let _ = writeln!(
            out,
            "{:<18} {:>14} {:>14} {:>14}",
            dim.name(),
            first.display_value(),
            last.display_value(),
            delta.display_value()
        );
    }
    out
}
