use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("unsupported format: {0} (expected MTS or MXF)")]
    UnsupportedFormat(String),

    #[error("reference file unreadable: {path}")]
    ReferenceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupted file unreadable: {path}")]
    CorruptedUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output directory unwritable: {path}")]
    OutputDirUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RepairError>;
