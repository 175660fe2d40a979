//! Output artifacts written at the end of a run.
//!
//! # Submodules
//!
//! - [`json`]: serializes the merged record list to a JSON file
//! - [`page`]: renders the HTML fragment and patches the marker-bounded
//!   region of the persisted page
//!
//! Both artifacts go through [`write_atomic`]: content is written to a
//! sibling temp file and renamed into place, so a crashed run leaves the
//! previous artifact intact instead of a torn file.

pub mod json;
pub mod page;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::PersistError;

/// Write `contents` to `path` via temp-file-then-rename.
pub(crate) async fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, contents).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmp_path_keeps_full_name() {
        assert_eq!(
            tmp_path(Path::new("out/news.json")),
            PathBuf::from("out/news.json.tmp")
        );
    }

    #[tokio::test]
    async fn test_write_atomic_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("news.json");

        write_atomic(&target, "[]").await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "[]");
        assert!(!target.with_file_name("news.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("news.json");

        write_atomic(&target, "old").await.unwrap();
        write_atomic(&target, "new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }
}
