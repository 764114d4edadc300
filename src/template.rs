//! Template input and output sink handling.

use crate::error::{Error, Result};
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Checks that the template path exists and is a regular file.
///
/// # Errors
/// * `Error::TemplateDoesNotExistError` if nothing exists at `path`
/// * `Error::TemplateIsDirectoryError` if `path` is a directory
pub fn check_template_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            Error::TemplateDoesNotExistError { template: path.display().to_string() }
        }
        _ => Error::IoError(e),
    })?;
    if metadata.is_dir() {
        return Err(Error::TemplateIsDirectoryError { template: path.display().to_string() });
    }
    Ok(())
}

pub fn read_template<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    debug!("Reading template {}", path.display());
    fs::read_to_string(path).map_err(Error::IoError)
}

/// Makes sure the output file can be created.
///
/// Missing parent directories are created. An existing file must be writable.
pub fn prepare_output_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let output = || path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| Error::OutputDirectoryError { output: output(), source })?;
    }

    if path.exists() {
        OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| Error::OutputNotWritableError { output: output(), source })?;
    }
    Ok(())
}

/// Opens the buffered output sink: the given file, or stdout when `None`.
///
/// The writer flushes whatever it buffered when dropped, so output written
/// before a failure is kept. Callers flush explicitly on success to observe
/// flush errors.
pub fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => {
            debug!("Writing output to {}", path.display());
            Box::new(File::create(path).map_err(Error::IoError)?)
        }
        None => Box::new(io::stdout().lock()),
    };
    Ok(BufWriter::new(sink))
}
