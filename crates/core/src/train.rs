//! Supervised training from labeled text files.
//!
//! Each file holds texts by a single author, one per line. The file stem is
//! the author label, and every non-blank line is added with that label as
//! its hint, so no prompting ever happens during training.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::engine::{ClusterEngine, Decision};
use crate::error::{Error, Result};
use crate::prompt::NoPrompt;

/// Per-file training outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileReport {
  pub path: PathBuf,
  pub label: String,
  /// Lines added to the model
  pub lines: usize,
  /// Lines whose nearest cluster was within threshold
  pub matched: usize,
  /// Lines filed under the label although no cluster was close enough
  pub forced: usize,
  /// Lines that matched a cluster other than the file's own label
  pub attributed_elsewhere: usize,
}

/// Summary of a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingReport {
  pub files: Vec<FileReport>,
}

impl TrainingReport {
  pub fn total_lines(&self) -> usize {
    self.files.iter().map(|f| f.lines).sum()
  }

  pub fn total_forced(&self) -> usize {
    self.files.iter().map(|f| f.forced).sum()
  }

  pub fn total_attributed_elsewhere(&self) -> usize {
    self.files.iter().map(|f| f.attributed_elsewhere).sum()
  }
}

/// Label for a training file: its name without extension
pub fn label_for_path(path: &Path) -> Result<String> {
  path
    .file_stem()
    .and_then(|s| s.to_str())
    .map(str::to_string)
    .filter(|s| !s.trim().is_empty())
    .ok_or_else(|| Error::InvalidLabel(path.display().to_string()))
}

/// Add every non-blank line of `text` to `engine` under `label`
pub fn train_text(engine: &mut ClusterEngine, label: &str, text: &str) -> Result<FileReport> {
  let mut report = FileReport {
    label: label.to_string(),
    ..Default::default()
  };

  for line in text.trim().lines().filter(|l| !l.trim().is_empty()) {
    let assignment = engine.add_text(line, Some(label), &mut NoPrompt)?;
    report.lines += 1;
    match assignment.decision {
      Decision::Matched if assignment.label != label => report.attributed_elsewhere += 1,
      Decision::Matched => report.matched += 1,
      Decision::Forced => report.forced += 1,
      Decision::Bootstrap | Decision::Prompted => {}
    }
  }

  if report.attributed_elsewhere > 0 {
    warn!(
      label,
      count = report.attributed_elsewhere,
      "Training lines were attributed to other clusters; consider a smaller threshold"
    );
  }
  Ok(report)
}

/// Train a fresh model from labeled files
pub fn train_from_files<P: AsRef<Path>>(paths: &[P], threshold: f64) -> Result<(ClusterEngine, TrainingReport)> {
  let mut engine = ClusterEngine::new(threshold)?;
  let report = train_into(&mut engine, paths)?;
  Ok((engine, report))
}

/// Train an existing model further from labeled files
pub fn train_into<P: AsRef<Path>>(engine: &mut ClusterEngine, paths: &[P]) -> Result<TrainingReport> {
  let mut report = TrainingReport::default();

  for path in paths {
    let path = path.as_ref();
    let label = label_for_path(path)?;
    let text = std::fs::read_to_string(path)?;

    let mut file_report = train_text(engine, &label, &text)?;
    file_report.path = path.to_path_buf();
    info!(path = %path.display(), label = %label, lines = file_report.lines, "Training file processed");
    report.files.push(file_report);
  }

  Ok(report)
}
