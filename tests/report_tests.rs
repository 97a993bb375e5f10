// Run persistence and summary rendering tests

use procmeter::models::{CounterMap, DataPoint, Dimension, Run, Scalar};
use procmeter::report;

fn point(step: u32, entries: &[(Dimension, i64)]) -> DataPoint {
    let map: CounterMap = entries
        .iter()
        .map(|&(d, v)| (d, Scalar::new(d, v)))
        .collect();
    DataPoint::new(step, map)
}

fn sample_run() -> Run {
    Run::from_points(vec![
        point(
            0,
            &[(Dimension::CPU_TIME, 100), (Dimension::WORKING_SET, 4096)],
        ),
        point(
            1,
            &[(Dimension::CPU_TIME, 350), (Dimension::WORKING_SET, 8192)],
        ),
    ])
}

#[test]
fn json_round_trip_through_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("run.json");
    let run = sample_run();
    report::write_json(&path, &run).unwrap();
    assert!(path.exists());
    let back = report::read_json(&path).unwrap();
    assert_eq!(back, run);
}

#[test]
fn json_lists_points_with_named_scalars() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("run.json");
    report::write_json(&path, &sample_run()).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["points"][1]["step"], 1);
    assert_eq!(v["points"][1]["scalars"]["CPU_TIME"], 350);
}

#[test]
fn read_json_missing_file_is_error() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(report::read_json(&dir.path().join("absent.json")).is_err());
}

#[test]
fn summary_shows_first_last_delta() {
    let text = report::render_summary(&sample_run());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("dimension"));
    let cpu = lines.iter().find(|l| l.starts_with("CPU_TIME")).unwrap();
    assert!(cpu.contains("100 ms"));
    assert!(cpu.contains("350 ms"));
    assert!(cpu.contains("250 ms"));
    let ws = lines.iter().find(|l| l.starts_with("WORKING_SET")).unwrap();
    assert!(ws.contains("4.00 KB"));
    assert!(ws.contains("8.00 KB"));
}

#[test]
fn summary_uses_occurrences_not_step_bounds() {
    let run = Run::from_points(vec![
        point(0, &[(Dimension::CPU_TIME, 10)]),
        point(1, &[(Dimension::CPU_TIME, 20), (Dimension::HARD_PAGE_FAULTS, 4)]),
    ]);
    let text = report::render_summary(&run);
    let faults = text
        .lines()
        .find(|l| l.starts_with("HARD_PAGE_FAULTS"))
        .unwrap();
    let cols: Vec<&str> = faults.split_whitespace().collect();
    assert_eq!(cols, vec!["HARD_PAGE_FAULTS", "4", "4", "0"]);
}

#[test]
fn summary_of_empty_run() {
    assert_eq!(report::render_summary(&Run::new()), "no data points\n");
}
