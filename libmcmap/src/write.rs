use std::{io::Write, path::Path};

use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::{Error, Result};

/// Writes `bytes` to `path` so that the destination either holds the complete output or is left
/// untouched.
///
/// The data goes to a temporary file in the destination directory first, which is then renamed
/// over `path`.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let to_error = |source| Error::EncodeIo {
        path: path.to_owned(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(to_error)?;
    tmp.write_all(bytes).map_err(to_error)?;
    tmp.flush().map_err(to_error)?;
    tmp.persist(path).map_err(|e| to_error(e.error))?;
    debug!("wrote {} bytes", bytes.len());
    Ok(())
}
