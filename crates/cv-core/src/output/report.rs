//! Run Reports
//!
//! Writes the run report as pretty JSON into an output directory.

use cv_events::RunReport;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SimError;

pub const REPORT_FILE_NAME: &str = "report.json";
pub const EVENTS_FILE_NAME: &str = "events.jsonl";

/// Write `report` to `<dir>/report.json`, creating `dir` if needed.
pub fn write_report(dir: impl AsRef<Path>, report: &RunReport) -> Result<PathBuf, SimError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(REPORT_FILE_NAME);
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_events::fixtures::sample_metrics;

    #[test]
    fn test_write_report_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("run");
        let report = RunReport::new(42, serde_json::json!({ "width": 40 }), sample_metrics(5));

        let path = write_report(&out, &report).unwrap();
        assert_eq!(path, out.join(REPORT_FILE_NAME));

        let parsed: RunReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert_eq!(parsed.seed, 42);
        assert_eq!(parsed.metrics.len(), 6);
    }
}
