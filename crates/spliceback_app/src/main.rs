//! spliceback - XDCAM header repair tool
//!
//! Splices the intact fixed-length header of a known-good reference clip
//! onto corrupted MTS/MXF recordings, one folder at a time.

mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use spliceback_core::{discover_candidates, BatchRunner, ContainerFormat, RepairObserver};

#[derive(Parser, Debug)]
#[command(name = "spliceback")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Known-good clip whose header is trusted
    #[arg(short, long)]
    reference: PathBuf,

    /// Folder holding the corrupted clips (named like clip001.MTS.bad)
    #[arg(short, long)]
    source: PathBuf,

    /// Output directory; defaults to a "Repaired" folder next to the reference
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format override (MTS or MXF); defaults to the reference file's extension
    #[arg(short, long)]
    format: Option<String>,

    /// Write repair-report.json into the output directory
    #[arg(long, default_value_t = false)]
    report: bool,
}

struct CliObserver {
    bar: ProgressBar,
    lines: Vec<String>,
}

impl RepairObserver for CliObserver {
    fn on_progress(&mut self, percent: u8) {
        self.bar.set_position(u64::from(percent));
    }

    fn on_log(&mut self, message: &str) {
        self.bar.println(message);
        self.lines.push(message.to_string());
    }

    fn on_complete(&mut self, summary: &str) {
        self.bar.finish_and_clear();
        println!("{summary}");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    // Format resolution is the batch-level precondition; nothing is
    // opened before it succeeds.
    let format = match &args.format {
        Some(token) => ContainerFormat::parse(token)?,
        None => ContainerFormat::from_path(&args.reference)?,
    };

    if !args.reference.is_file() {
        bail!("Reference file does not exist: {}", args.reference.display());
    }
    if !args.source.is_dir() {
        bail!("Corrupted folder does not exist: {}", args.source.display());
    }

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.reference));

    let candidates = discover_candidates(&args.source, format)
        .with_context(|| format!("Failed to list {}", args.source.display()))?;
    if candidates.is_empty() {
        bail!(
            "No corrupted *.{format}.* files found in {}",
            args.source.display()
        );
    }

    println!("[Batch] Reference: {}", args.reference.display());
    println!(
        "[Batch] Format: {} (header {} bytes)",
        format,
        format.header_len()
    );
    println!(
        "[Batch] {} candidate file(s) in {}",
        candidates.len(),
        args.source.display()
    );

    let start_time = Instant::now();

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:50.cyan/blue}] {pos}%")
            .expect("invalid progress bar template - this is a bug")
            .progress_chars("##-"),
    );
    let mut observer = CliObserver {
        bar,
        lines: Vec::new(),
    };

    let runner = BatchRunner::new(&args.reference, &output_dir, format);
    let summary = runner.run(&candidates, &running, &mut observer);

    if args.report {
        let report_path = report::write_report(
            &output_dir,
            &args.reference,
            format,
            &summary,
            &observer.lines,
        )?;
        println!("[Batch] Report written to {}", report_path.display());
    }

    let elapsed = start_time.elapsed();

    println!("\n╔════════════════════════════════════════╗");
    if summary.interrupted {
        println!("║       === Repair Interrupted ===       ║");
    } else {
        println!("║        === Repair Finished ===         ║");
    }
    println!("╠════════════════════════════════════════╣");
    println!(
        "║ Elapsed Time:       {:>18} ║",
        format!("{:.1}s", elapsed.as_secs_f64())
    );
    println!("║ Candidates:         {:>18} ║", summary.total);
    println!("║ Repaired:           {:>18} ║", summary.repaired);
    println!("║ Failed:             {:>18} ║", summary.failed);
    println!(
        "║ Bytes Written:      {:>18} ║",
        format_size(summary.bytes_written, BINARY)
    );
    println!("╠════════════════════════════════════════╣");
    println!("║ Files saved to:     {:<18} ║", output_dir.display());
    println!("╚════════════════════════════════════════╝");

    Ok(())
}

fn default_output_dir(reference: &Path) -> PathBuf {
    reference
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("Repaired")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir_is_sibling_of_reference() {
        assert_eq!(
            default_output_dir(Path::new("/cards/A003/ref.MTS")),
            PathBuf::from("/cards/A003/Repaired")
        );
        assert_eq!(
            default_output_dir(Path::new("ref.MTS")),
            PathBuf::from("Repaired")
        );
    }
}
