//! Error handling for qrender.
//! Defines the fatal error types and the result alias used throughout the application.
//! Problems in the directive structure of a template are not errors; they are
//! reported as [`crate::processor::Diagnostic`] values and processing continues.

use std::io;
use thiserror::Error;

/// Fatal errors that abort a rendering run.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    #[error("Template file does not exist: {template}.")]
    TemplateDoesNotExistError { template: String },

    #[error("Template path is a directory, not a file: {template}.")]
    TemplateIsDirectoryError { template: String },

    #[error("Failed to create output directory for {output}: {source}.")]
    OutputDirectoryError { output: String, source: io::Error },

    #[error("Output file exists but is not writable: {output}: {source}.")]
    OutputNotWritableError { output: String, source: io::Error },

    /// The environment file could not be read
    #[error("Failed to read env file {path}: {source}.")]
    EnvFileError { path: String, source: io::Error },

    /// Represents errors in the contents of a structured environment file
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Writing to or flushing the output sink failed
    #[error("Failed to write output: {0}.")]
    WriteError(io::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("Error: {err}");
    std::process::exit(1);
}
