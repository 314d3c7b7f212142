use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Model has no clusters to compare against")]
  EmptyModel,

  #[error("Invalid threshold {0}: must be finite and greater than zero")]
  InvalidThreshold(f64),

  #[error("No label was provided for a text that needs one")]
  LabelRequired,

  #[error("Invalid label: {0:?}")]
  InvalidLabel(String),

  #[error("Invalid model name: {0:?}")]
  InvalidModelName(String),

  #[error("Model not found: {name} ({})", path.display())]
  ModelNotFound { name: String, path: PathBuf },

  #[error("Malformed model: {0}")]
  MalformedModel(String),

  #[error("Serialization: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Config: {0}")]
  Config(#[from] toml::de::Error),

  #[error("IO: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
