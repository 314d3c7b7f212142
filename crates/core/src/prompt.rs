//! Label prompting strategies.
//!
//! The engine asks a [`LabelPrompt`] for a cluster name whenever a text
//! cannot be attributed and the caller gave no label hint. Interactive
//! front ends implement it over a terminal; automated callers use
//! [`FixedLabel`] or [`NoPrompt`].

use crate::error::{Error, Result};

/// Source of labels for texts the engine could not attribute
pub trait LabelPrompt {
  /// Return the label to file `text` under
  fn request_label(&mut self, text: &str) -> Result<String>;
}

impl<F> LabelPrompt for F
where
  F: FnMut(&str) -> Result<String>,
{
  fn request_label(&mut self, text: &str) -> Result<String> {
    self(text)
  }
}

/// Always answers with the same label
#[derive(Debug, Clone)]
pub struct FixedLabel(pub String);

impl FixedLabel {
  pub fn new(label: impl Into<String>) -> Self {
    Self(label.into())
  }
}

impl LabelPrompt for FixedLabel {
  fn request_label(&mut self, _text: &str) -> Result<String> {
    Ok(self.0.clone())
  }
}

/// Refuses every request with [`Error::LabelRequired`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl LabelPrompt for NoPrompt {
  fn request_label(&mut self, _text: &str) -> Result<String> {
    Err(Error::LabelRequired)
  }
}
