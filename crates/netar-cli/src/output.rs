//! Output destinations.
//!
//! A file destination is only replaced once the whole conversion result is
//! on disk next to it, so a failed run never leaves a truncated file behind.

use std::{
    io::{self, Write},
    path::Path,
};

use log::debug;
use tempfile::NamedTempFile;

/// Write `contents` to `path`, replacing any existing file atomically.
///
/// The bytes go to a temporary file in the destination's directory, which is
/// then renamed over `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    debug!(temp_path = file.path().display().to_string(); "Output staged");

    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Write `contents` to standard output.
pub fn write_stdout(contents: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(contents)?;
    stdout.flush()
}
