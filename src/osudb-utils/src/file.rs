use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use thiserror::Error;

/// Errors that may occur when loading a file into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The file does not fit into the address space.
    #[error("file of {0} bytes is too large to load into memory")]
    TooLarge(u64),

    /// The file contents did not match the size reported by the OS.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: u64, actual: u64 },
}

fn capacity_for(size: u64) -> Result<usize, LoadError> {
    usize::try_from(size).map_err(|_| LoadError::TooLarge(size))
}

/// Loads the entire file at `path` into a buffer sized exactly to its
/// length.
///
/// Either the full contents are returned or an error; partially read
/// buffers are discarded.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Box<[u8]>, LoadError> {
    let path = path.as_ref();
    let io_error = |source| LoadError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = fs::File::open(path).map_err(io_error)?;
    let expected = file.metadata().map_err(io_error)?.len();

    // Read one byte past the expected size so that files which grew
    // in the meantime are caught as well.
    let mut buf = Vec::with_capacity(capacity_for(expected)?);
    file.take(expected.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(io_error)?;

    let actual = buf.len() as u64;
    if actual != expected {
        log::error!("failed to read '{}': {actual}/{expected} bytes", path.display());
        return Err(LoadError::ShortRead { expected, actual });
    }

    log::debug!("loaded {expected} bytes from '{}'", path.display());
    Ok(buf.into_boxed_slice())
}
