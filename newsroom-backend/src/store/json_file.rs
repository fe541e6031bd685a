use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::StoreError;

/// Load a JSON document, falling back to `T::default()` when the file is
/// missing or unreadable. Corrupt files are logged, not fatal.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            log::warn!("Could not read {}: {}; starting empty", path.display(), e);
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Could not parse {}: {}; starting empty", path.display(), e);
            T::default()
        }
    }
}

/// Replace `path` with the pretty-printed JSON of `value`.
///
/// Writes to a sibling temp file, syncs it, then renames over the target, so
/// a crash leaves either the old or the new document on disk.
pub fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::new(path, format!("serialize: {}", e)))?;

    let tmp_path = temp_path(path);
    let mut file =
        File::create(&tmp_path).map_err(|e| StoreError::new(&tmp_path, format!("create: {}", e)))?;
    file.write_all(&json)
        .and_then(|_| file.sync_all())
        .map_err(|e| StoreError::new(&tmp_path, format!("write: {}", e)))?;
    fs::rename(&tmp_path, path).map_err(|e| StoreError::new(path, format!("rename: {}", e)))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Vec<String> = load_or_default(&dir.path().join("absent.json"));
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        let loaded: BTreeMap<String, u32> = load_or_default(&path);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_write_atomic_replaces_contents_and_cleans_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        write_atomic(&path, &vec!["a"]).unwrap();
        write_atomic(&path, &vec!["a", "b"]).unwrap();

        let loaded: Vec<String> = load_or_default(&path);
        assert_eq!(loaded, vec!["a", "b"]);
        assert!(!dir.path().join("items.json.tmp").exists());

        // Pretty output with two-space indentation
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"a\""));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("items.json");
        let err = write_atomic(&path, &vec![1]).unwrap_err();
        assert!(err.message.starts_with("create"));
    }
}
