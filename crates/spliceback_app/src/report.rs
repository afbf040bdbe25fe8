use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use spliceback_core::{BatchSummary, ContainerFormat};

#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    reference: String,
    format: &'static str,
    timestamp: String,
    total_candidates: usize,
    repaired: usize,
    failed: usize,
    bytes_written: u64,
    interrupted: bool,
    log: &'a [String],
}

/// Writes `repair-report.json` into the output directory: what was
/// repaired against which reference, when, and the per-file log lines.
pub fn write_report(
    output_dir: &Path,
    reference: &Path,
    format: ContainerFormat,
    summary: &BatchSummary,
    log: &[String],
) -> anyhow::Result<PathBuf> {
    let report = BatchReport {
        reference: reference.display().to_string(),
        format: format.name(),
        timestamp: Utc::now().to_rfc3339(),
        total_candidates: summary.total,
        repaired: summary.repaired,
        failed: summary.failed,
        bytes_written: summary.bytes_written,
        interrupted: summary.interrupted,
        log,
    };

    // An all-failures batch never reaches the repair step that creates
    // the output directory.
    fs::create_dir_all(output_dir)?;

    let path = output_dir.join("repair-report.json");
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(&path, json)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_round_trips_the_summary() {
        let dir = TempDir::new().unwrap();
        let summary = BatchSummary {
            total: 2,
            repaired: 1,
            failed: 1,
            bytes_written: 1032,
            interrupted: false,
        };
        let log = vec![
            "a.MTS.bad repaired, saved to /out/a.MTS".to_string(),
            "error repairing b.MTS.bad: corrupted file unreadable: b.MTS.bad".to_string(),
        ];

        let path = write_report(
            dir.path(),
            Path::new("/cards/ref.MTS"),
            ContainerFormat::Mts,
            &summary,
            &log,
        )
        .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["format"], "MTS");
        assert_eq!(parsed["total_candidates"], 2);
        assert_eq!(parsed["repaired"], 1);
        assert_eq!(parsed["failed"], 1);
        assert_eq!(parsed["bytes_written"], 1032);
        assert_eq!(parsed["log"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_report_creates_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("never-created");
        let summary = BatchSummary {
            total: 1,
            failed: 1,
            ..Default::default()
        };

        let path = write_report(
            &out,
            Path::new("ref.MXF"),
            ContainerFormat::Mxf,
            &summary,
            &[],
        )
        .unwrap();
        assert!(path.is_file());
    }
}
