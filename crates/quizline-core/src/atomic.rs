//! Whole-file rewrites that never leave a partial file behind.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `contents` to a temp file next to `path`, then rename it over
/// `path`. On any failure the previous file is left untouched.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
