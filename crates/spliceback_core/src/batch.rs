use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::repair::RepairRequest;
use crate::types::ContainerFormat;

/// Callbacks the shell hangs its progress bar, log pane and completion
/// dialog on. Fire-and-forget and strictly ordered: one progress+log pair
/// per file, then a single completion message.
pub trait RepairObserver {
    fn on_progress(&mut self, percent: u8);
    fn on_log(&mut self, message: &str);
    fn on_complete(&mut self, summary: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BatchSummary {
    pub total: usize,
    pub repaired: usize,
    pub failed: usize,
    pub bytes_written: u64,
    pub interrupted: bool,
}

/// Finds corrupted candidates in `source_dir`: regular files whose name
/// carries the format token as a pseudo-extension followed by at least one
/// more segment (`*.MTS.*`), matched case-insensitively.
///
/// Directory iteration order is platform-dependent, so candidates are
/// sorted by name to keep batch order deterministic.
pub fn discover_candidates(
    source_dir: impl AsRef<Path>,
    format: ContainerFormat,
) -> std::io::Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(source_dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_candidate_name(name, format) {
                candidates.push(entry.path());
            }
        }
    }
    candidates.sort();
    Ok(candidates)
}

fn is_candidate_name(name: &str, format: ContainerFormat) -> bool {
    let token = format!(".{}.", format.name());
    let upper = name.to_ascii_uppercase();
    match upper.find(&token) {
        Some(idx) => idx > 0 && idx + token.len() < upper.len(),
        None => false,
    }
}

/// Runs repairs strictly sequentially, one [`RepairRequest`] per
/// candidate, against a single reference file and output directory.
///
/// A failing file is logged and never blocks the files after it. The stop
/// flag is consulted only between files; a repair in flight always runs to
/// completion.
pub struct BatchRunner {
    reference: PathBuf,
    output_dir: PathBuf,
    format: ContainerFormat,
}

impl BatchRunner {
    pub fn new(
        reference: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        format: ContainerFormat,
    ) -> Self {
        Self {
            reference: reference.into(),
            output_dir: output_dir.into(),
            format,
        }
    }

    pub fn run(
        &self,
        candidates: &[PathBuf],
        running: &AtomicBool,
        observer: &mut dyn RepairObserver,
    ) -> BatchSummary {
        let total = candidates.len();
        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };

        for (index, candidate) in candidates.iter().enumerate() {
            if !running.load(Ordering::SeqCst) {
                summary.interrupted = true;
                break;
            }

            let file_name = candidate
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown");

            let request = RepairRequest::new(
                &self.reference,
                candidate,
                &self.output_dir,
                self.format,
            );
            match request.run() {
                Ok(output_path) => {
                    summary.repaired += 1;
                    summary.bytes_written += fs::metadata(&output_path)
                        .map(|m| m.len())
                        .unwrap_or(0);
                    observer.on_log(&format!(
                        "{file_name} repaired, saved to {}",
                        output_path.display()
                    ));
                }
                Err(e) => {
                    summary.failed += 1;
                    observer.on_log(&format!("error repairing {file_name}: {e}"));
                }
            }
            observer.on_progress(((index + 1) * 100 / total) as u8);
        }

        let processed = summary.repaired + summary.failed;
        let message = if summary.interrupted {
            format!(
                "Batch interrupted: {processed}/{total} file(s) processed, \
                 {} repaired, {} failed.",
                summary.repaired, summary.failed
            )
        } else {
            format!(
                "All {total} file(s) processed: {} repaired, {} failed.",
                summary.repaired, summary.failed
            )
        };
        observer.on_complete(&message);

        summary
    }
}
