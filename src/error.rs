//! Error types for solsplit library.

use std::io;
use thiserror::Error;

/// Result type alias for solsplit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort processing of a single document.
///
/// Conditions that only affect one region or one media asset are not errors;
/// they are reported as [`Warning`](crate::Warning)s in the split report.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a zip-based DOCX package.
    #[error("Unknown file format: not a valid DOCX package")]
    UnknownFormat,

    /// The zip container could not be read.
    #[error("Package error: {0}")]
    Package(#[from] zip::result::ZipError),

    /// A required part of the package is missing.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// The document XML is malformed.
    #[error("XML error: {0}")]
    Xml(String),

    /// Error serializing a report.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            _ => Error::Xml(err.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(
            err.to_string(),
            "Unknown file format: not a valid DOCX package"
        );

        let err = Error::MissingPart("word/document.xml".to_string());
        assert_eq!(err.to_string(), "Missing package part: word/document.xml");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_attr_error_conversion() {
        let err: Error = quick_xml::events::attributes::AttrError::ExpectedEq(3).into();
        assert!(matches!(err, Error::Xml(_)));
    }
}
