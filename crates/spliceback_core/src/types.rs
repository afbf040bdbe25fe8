use std::path::Path;

use crate::error::{RepairError, Result};

/// Container formats this tool knows how to splice.
///
/// Each format carries a fixed-length header that is assumed intact only
/// in a known-good reference file. The lengths differ by two orders of
/// magnitude: MTS is a short transport-stream prefix, MXF a large
/// container-metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    Mts,
    Mxf,
}

impl ContainerFormat {
    /// Number of leading bytes taken from the reference file.
    #[must_use]
    pub const fn header_len(&self) -> usize {
        match self {
            Self::Mts => 768,
            Self::Mxf => 524_308,
        }
    }

    /// Canonical (uppercase) extension for repaired output files.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mts => "MTS",
            Self::Mxf => "MXF",
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mts => "MTS",
            Self::Mxf => "MXF",
        }
    }

    /// Resolves a format token, case-insensitively.
    ///
    /// This is the batch-level precondition: it runs before any file is
    /// opened, since the result determines how many reference bytes to
    /// read.
    pub fn parse(token: &str) -> Result<Self> {
        match token.to_ascii_uppercase().as_str() {
            "MTS" => Ok(Self::Mts),
            "MXF" => Ok(Self::Mxf),
            _ => Err(RepairError::UnsupportedFormat(token.to_string())),
        }
    }

    /// Derives the format from a file's extension, typically the
    /// reference file the user picked.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Self::parse(ext)
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_len() {
        assert_eq!(ContainerFormat::Mts.header_len(), 768);
        assert_eq!(ContainerFormat::Mxf.header_len(), 524_308);
    }

    #[test]
    fn test_extension() {
        assert_eq!(ContainerFormat::Mts.extension(), "MTS");
        assert_eq!(ContainerFormat::Mxf.extension(), "MXF");
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(ContainerFormat::parse("MTS").unwrap(), ContainerFormat::Mts);
        assert_eq!(ContainerFormat::parse("mts").unwrap(), ContainerFormat::Mts);
        assert_eq!(ContainerFormat::parse("mxf").unwrap(), ContainerFormat::Mxf);
        assert_eq!(ContainerFormat::parse("MxF").unwrap(), ContainerFormat::Mxf);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            ContainerFormat::parse("MOV"),
            Err(RepairError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ContainerFormat::parse(""),
            Err(RepairError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ContainerFormat::from_path("/media/card/ref.MTS").unwrap(),
            ContainerFormat::Mts
        );
        assert_eq!(
            ContainerFormat::from_path("clip.mxf").unwrap(),
            ContainerFormat::Mxf
        );
        assert!(ContainerFormat::from_path("/media/card/ref").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ContainerFormat::Mts), "MTS");
        assert_eq!(format!("{}", ContainerFormat::Mxf), "MXF");
    }
}
