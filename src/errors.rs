/*!
 * Error types for the docx-checkbox-fix application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when reading or writing a document package
#[derive(Error, Debug)]
pub enum DocxError {
    /// The file is not a readable zip archive
    #[error("Failed to read document package: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A required part is absent from the package
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// The XML of a part could not be parsed or written
    #[error("Malformed XML in {part}: {message}")]
    Xml {
        /// Name of the package part
        part: String,
        /// Parser or writer message
        message: String,
    },

    /// A part is not valid UTF-8
    #[error("Part {0} is not valid UTF-8")]
    Encoding(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from document package handling
    #[error("Document error: {0}")]
    Docx(#[from] DocxError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
