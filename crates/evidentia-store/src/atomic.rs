//! Atomic file writes: readers must see the previous complete record or the
//! new one, never a partial file (spec §4.1 "Operations").

use crate::error::StoreResult;
use std::io::Write;
use std::path::Path;

/// Writes `bytes` to `path` via a temp file in the same directory followed
/// by a rename, so a crash mid-write leaves the previous content (or
/// nothing, on first write) rather than a truncated file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Writes a serializable value as pretty JSON via [`write_atomic`].
pub fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &bytes)
}

/// Reads and parses a JSON file, returning `Ok(None)` if it does not exist.
pub fn read_json_opt<T: serde::de::DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes).map_err(|source| crate::StoreError::Malformed {
                path: path.display().to_string(),
                source,
            })?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_read_json_roundtrips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("record.json");
        write_json_atomic(&path, &vec![1, 2, 3]).unwrap();
        let read: Option<Vec<i32>> = read_json_opt(&path).unwrap();
        assert_eq!(read, Some(vec![1, 2, 3]));
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let read: Option<Vec<i32>> = read_json_opt(&path).unwrap();
        assert_eq!(read, None);
    }

    #[test]
    fn second_write_replaces_first_atomically() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("record.json");
        write_json_atomic(&path, &"first").unwrap();
        write_json_atomic(&path, &"second").unwrap();
        let read: Option<String> = read_json_opt(&path).unwrap();
        assert_eq!(read, Some("second".to_string()));
    }
}
