use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{RepairError, Result};
use crate::types::ContainerFormat;

/// One file to repair against one reference. Consumed by [`run`], never
/// retained afterwards.
///
/// The repair itself is a blocking splice: the format's fixed-length
/// header is taken from the reference file, the corrupted file's bytes
/// from that offset onward are kept verbatim, and everything before it
/// is discarded.
#[derive(Debug, Clone)]
pub struct RepairRequest {
    pub reference: PathBuf,
    pub corrupted: PathBuf,
    pub output_dir: PathBuf,
    pub format: ContainerFormat,
}

impl RepairRequest {
    pub fn new(
        reference: impl Into<PathBuf>,
        corrupted: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        format: ContainerFormat,
    ) -> Self {
        Self {
            reference: reference.into(),
            corrupted: corrupted.into(),
            output_dir: output_dir.into(),
            format,
        }
    }

    /// Performs the repair and returns the output path.
    ///
    /// If the corrupted file is shorter than the header, the output is
    /// exactly the reference header. If the reference is shorter than the
    /// header, its full length is used as-is (permissive truncated read,
    /// matching the field tool's behavior).
    pub fn run(&self) -> Result<PathBuf> {
        let header_len = self.format.header_len();
        let mut repaired = read_reference_header(&self.reference, header_len)?;

        let corrupted =
            fs::read(&self.corrupted).map_err(|source| RepairError::CorruptedUnreadable {
                path: self.corrupted.clone(),
                source,
            })?;
        if corrupted.len() > header_len {
            repaired.extend_from_slice(&corrupted[header_len..]);
        }

        fs::create_dir_all(&self.output_dir).map_err(|source| {
            RepairError::OutputDirUnwritable {
                path: self.output_dir.clone(),
                source,
            }
        })?;

        let stem = output_stem(&self.corrupted);
        let output_path = self
            .output_dir
            .join(format!("{stem}.{}", self.format.extension()));
        write_repaired(&output_path, &repaired)?;

        Ok(output_path)
    }
}

/// Reads up to `len` leading bytes; a shorter reference contributes
/// whatever it has.
fn read_reference_header(path: &Path, len: usize) -> Result<Vec<u8>> {
    let unreadable = |source| RepairError::ReferenceUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unreadable)?;
    let mut header = Vec::with_capacity(len);
    file.take(len as u64)
        .read_to_end(&mut header)
        .map_err(unreadable)?;
    Ok(header)
}

/// Strips the corrupted file's name down to its recording basename.
///
/// Corrupted clips carry compound names like `clip001.MTS.bad`, so the
/// extension strip runs twice, unconditionally. Names with fewer
/// extensions lose whatever is present and nothing more.
fn output_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    strip_extension(strip_extension(name)).to_string()
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        // A leading dot is a hidden-file marker, not an extension.
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

fn write_repaired(path: &Path, data: &[u8]) -> Result<()> {
    let failed = |source| RepairError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(failed)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(data).map_err(failed)?;
    writer.flush().map_err(failed)?;
    Ok(())
}
