use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use keeper_core::error::Result;

/// Returns the file's content, or `None` when it is missing or blank.
pub fn read_if_present(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(content))
}

/// Replaces `path` with `content` via a synced temporary file and a rename,
/// so readers see either the old or the new file.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content)?;
        tmp_file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_and_blank_files_read_as_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.toml");
        assert_eq!(read_if_present(&path).unwrap(), None);

        fs::write(&path, "  \n").unwrap();
        assert_eq!(read_if_present(&path).unwrap(), None);
    }

    #[test]
    fn test_write_creates_parents_and_leaves_no_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("file.json");

        write_atomic(&path, b"{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!path.with_extension("tmp").exists());
    }
}
