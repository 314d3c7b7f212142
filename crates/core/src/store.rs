//! Named model storage.
//!
//! Maps a human-chosen model name to `<models_dir>/<name>.json` and moves
//! engines in and out of those files.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::engine::ClusterEngine;
use crate::error::{Error, Result};

/// File extension for saved models
pub const MODEL_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct ModelStore {
  root: PathBuf,
}

impl ModelStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Store rooted at the platform data directory
  pub fn open_default() -> Self {
    Self::new(crate::dirs::default_models_dir())
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// File that holds the model called `name`
  pub fn path_for(&self, name: &str) -> Result<PathBuf> {
    let name = validate_name(name)?;
    Ok(self.root.join(format!("{}.{}", name, MODEL_EXTENSION)))
  }

  pub fn exists(&self, name: &str) -> bool {
    self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
  }

  /// Write `engine` under `name`, replacing any previous model of that name
  pub fn save(&self, name: &str, engine: &ClusterEngine) -> Result<PathBuf> {
    let path = self.path_for(name)?;
    fs::create_dir_all(&self.root)?;

    // Write to a sibling temp file first so a failed write never truncates a model
    let tmp = path.with_extension(format!("{}.tmp", MODEL_EXTENSION));
    fs::write(&tmp, engine.to_bytes()?)?;
    if let Err(e) = fs::rename(&tmp, &path) {
      let _ = fs::remove_file(&tmp);
      return Err(e.into());
    }

    info!(path = %path.display(), clusters = engine.clusters().len(), "Model saved");
    Ok(path)
  }

  pub fn load(&self, name: &str) -> Result<ClusterEngine> {
    let path = self.path_for(name)?;
    if !path.is_file() {
      return Err(Error::ModelNotFound {
        name: name.to_string(),
        path,
      });
    }

    let engine = ClusterEngine::from_bytes(&fs::read(&path)?)?;
    info!(path = %path.display(), clusters = engine.clusters().len(), "Model loaded");
    Ok(engine)
  }

  /// Names of all saved models, sorted
  pub fn list(&self) -> Result<Vec<String>> {
    if !self.root.is_dir() {
      return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&self.root)? {
      let path = entry?.path();
      if path.is_file()
        && path.extension().and_then(|e| e.to_str()) == Some(MODEL_EXTENSION)
        && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
      {
        names.push(stem.to_string());
      }
    }
    names.sort();
    Ok(names)
  }
}

/// Names become file stems, so they must be non-blank single path components
fn validate_name(name: &str) -> Result<&str> {
  let trimmed = name.trim();
  if trimmed.is_empty()
    || trimmed == "."
    || trimmed == ".."
    || trimmed.contains(['/', '\\'])
    || trimmed.contains('\0')
  {
    return Err(Error::InvalidModelName(name.to_string()));
  }
  Ok(trimmed)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prompt::NoPrompt;
  use tempfile::TempDir;

  fn engine() -> ClusterEngine {
    let mut engine = ClusterEngine::new(3.0).unwrap();
    engine.add_text("hello world", Some("alice"), &mut NoPrompt).unwrap();
    engine
  }

  #[test]
  fn test_save_and_load() {
    let temp = TempDir::new().unwrap();
    let store = ModelStore::new(temp.path().join("models"));

    let path = store.save("speeches", &engine()).unwrap();
    assert_eq!(path, temp.path().join("models").join("speeches.json"));
    assert!(store.exists("speeches"));

    let loaded = store.load("speeches").unwrap();
    assert_eq!(loaded.clusters(), engine().clusters());
  }

  #[test]
  fn test_load_missing() {
    let temp = TempDir::new().unwrap();
    let store = ModelStore::new(temp.path());
    assert!(matches!(store.load("nope"), Err(Error::ModelNotFound { .. })));
  }

  #[test]
  fn test_load_malformed() {
    let temp = TempDir::new().unwrap();
    let store = ModelStore::new(temp.path());
    std::fs::write(temp.path().join("broken.json"), "{").unwrap();
    assert!(matches!(store.load("broken"), Err(Error::MalformedModel(_))));
  }

  #[test]
  fn test_invalid_names() {
    let store = ModelStore::new("/tmp/unused");
    for bad in ["", "  ", "..", "a/b", "a\\b"] {
      assert!(matches!(store.path_for(bad), Err(Error::InvalidModelName(_))), "{bad:?}");
    }
    assert!(!store.exists("../escape"));
  }

  #[test]
  fn test_list_sorted_models_only() {
    let temp = TempDir::new().unwrap();
    let store = ModelStore::new(temp.path());
    assert!(store.list().unwrap().is_empty());

    store.save("zeta", &engine()).unwrap();
    store.save("alpha", &engine()).unwrap();
    std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

    assert_eq!(store.list().unwrap(), vec!["alpha", "zeta"]);
  }

  #[test]
  fn test_save_overwrites() {
    let temp = TempDir::new().unwrap();
    let store = ModelStore::new(temp.path());
    store.save("m", &engine()).unwrap();

    let mut bigger = engine();
    bigger.add_text("another text", Some("bob"), &mut NoPrompt).unwrap();
    store.save("m", &bigger).unwrap();

    assert_eq!(store.load("m").unwrap().clusters().len(), bigger.clusters().len());
    assert_eq!(store.list().unwrap(), vec!["m"]);
  }

  #[test]
  fn test_failed_save_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let store = ModelStore::new(temp.path());
    // A directory in the model's place makes the final rename fail
    let blocker = temp.path().join("m.json");
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), "x").unwrap();

    assert!(matches!(store.save("m", &engine()), Err(Error::Io(_))));
    assert!(!temp.path().join("m.json.tmp").exists());
    assert!(blocker.join("keep").is_file());
  }
}
