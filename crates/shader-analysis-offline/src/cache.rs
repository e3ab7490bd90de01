//! Defines where reports are written to by default.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Returns path to the directory where reports are written to by default.
///
/// Possible values by OS are:
/// * Windows: `C:/users/<user>/AppData/Local/shader-analysis/reports`
/// * Mac: `~/Library/Caches/shader-analysis/reports`
/// * Linux: `~/.cache/shader-analysis/reports`
///
/// # Errors
///
/// Fails if there is no cache directory available.
#[inline]
pub fn reports_dir() -> Result<PathBuf, CacheDirError> {
    let dir = directories::BaseDirs::new()
        .ok_or(CacheDirError(()))?
        .cache_dir()
        .join("shader-analysis")
        .join("reports");
    Ok(dir)
}

/// Makes sure the given output directory exists, creating it if needed.
///
/// Calling this any number of times has the same effect as calling it once.
///
/// # Errors
///
/// Fails if the directory could not be created.
#[inline]
pub fn prepare_output_dir(output_dir: &Path) -> io::Result<()> {
    if output_dir.is_dir() {
        return Ok(());
    }
    log::debug!("creating output directory '{}'", output_dir.display());
    fs::create_dir_all(output_dir)
}

/// An error indicating that there is no cache directory available.
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not find cache directory")]
pub struct CacheDirError(());

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn prepare_output_dir_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let output_dir = temp.path().join("nested").join("reports");

        prepare_output_dir(&output_dir).unwrap();
        prepare_output_dir(&output_dir).unwrap();
        assert!(output_dir.is_dir());
    }
}
