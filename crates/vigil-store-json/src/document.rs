//! [`Document`]: one collection stored as a single JSON array on disk.

use std::{
  io::{ErrorKind, Write as _},
  marker::PhantomData,
  path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// A whole-collection JSON file.
///
/// Holds only the path; every call goes to disk.
#[derive(Debug, Clone)]
pub struct Document<R> {
  path:    PathBuf,
  _record: PhantomData<fn() -> R>,
}

impl<R> Document<R>
where
  R: Serialize + DeserializeOwned + Send + Sync,
{
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), _record: PhantomData }
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Read the whole collection. A file that does not exist yet is an empty
  /// collection.
  pub async fn load_all(&self) -> Result<Vec<R>> {
    let bytes = match tokio::fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        tracing::debug!(path = %self.path.display(), "no document yet, starting empty");
        return Ok(Vec::new());
      }
      Err(source) => return Err(self.io_error(source)),
    };

    let records: Vec<R> = serde_json::from_slice(&bytes).map_err(|source| {
      Error::Json { path: self.path.clone(), source }
    })?;
    tracing::debug!(path = %self.path.display(), count = records.len(), "loaded document");
    Ok(records)
  }

  /// Overwrite the whole collection with `records`, pretty-printed.
  ///
  /// The containing directory is created if needed. Each save writes its own
  /// temp file next to the document and renames it into place, so readers
  /// see either the old or the new document and overlapping saves never
  /// share a file. The last rename wins.
  pub async fn save_all(&self, records: &[R]) -> Result<()> {
    let body = serde_json::to_vec_pretty(records).map_err(|source| {
      Error::Json { path: self.path.clone(), source }
    })?;

    let path = self.path.clone();
    tokio::task::spawn_blocking(move || write_replacing(&path, &body))
      .await
      .map_err(|e| self.io_error(std::io::Error::other(e)))??;

    tracing::info!(path = %self.path.display(), count = records.len(), "saved document");
    Ok(())
  }

  fn io_error(&self, source: std::io::Error) -> Error {
    Error::Io { path: self.path.clone(), source }
  }
}

/// Write `body` to a fresh temp file in the directory of `path`, then
/// rename it over `path`.
fn write_replacing(path: &Path, body: &[u8]) -> Result<()> {
  let dir = match path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
    _ => PathBuf::from("."),
  };
  std::fs::create_dir_all(&dir)
    .map_err(|source| Error::Io { path: dir.clone(), source })?;

  let mut tmp = NamedTempFile::new_in(&dir)
    .map_err(|source| Error::Io { path: dir.clone(), source })?;
  tmp
    .write_all(body)
    .map_err(|source| Error::Io { path: tmp.path().to_path_buf(), source })?;

  tmp.persist(path).map_err(|e| {
    let tmp_path = e.file.path().to_path_buf();
    Error::Io { path: tmp_path, source: e.error }
  })?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let doc = Document::<u32>::new(dir.path().join("absent.json"));
    assert!(doc.load_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn save_creates_directory_and_pretty_prints() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/numbers.json");
    let doc = Document::<u32>::new(&path);

    doc.save_all(&[3, 1, 2]).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'), "expected pretty output: {text}");
    assert_eq!(doc.load_all().await.unwrap(), [3, 1, 2]);

    // No temp files left behind.
    let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
      .unwrap()
      .map(|e| e.unwrap().file_name())
      .collect();
    assert_eq!(entries, ["numbers.json"]);
  }

  #[tokio::test]
  async fn malformed_file_is_an_error_not_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Document::<u32>::new(&path).load_all().await.unwrap_err();
    assert!(matches!(err, Error::Json { .. }));
  }

  #[tokio::test]
  async fn unreadable_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where a file is expected.
    let err = Document::<u32>::new(dir.path()).load_all().await.unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn overlapping_saves_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let doc = Document::<u32>::new(dir.path().join("numbers.json"));

    let mut tasks = Vec::new();
    for n in 0..32u32 {
      let doc = doc.clone();
      tasks.push(tokio::spawn(async move {
        doc.save_all(&[n; 64]).await?;
        doc.load_all().await
      }));
    }
    for task in tasks {
      let loaded = task.await.unwrap().unwrap();
      // Whatever save won, the document is whole.
      assert_eq!(loaded.len(), 64);
      assert!(loaded.iter().all(|v| *v == loaded[0]));
    }
  }
}
