//! Supervised training from labeled files

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use stylo_core::{Config, TrainingReport, train_from_files};
use tracing::info;

use super::{SAVE_QUESTION, model_store, stdio_console};

/// Train a model from files named after their authors, then save it
pub fn cmd_train(
  config: &Config,
  files: &[PathBuf],
  threshold: Option<f64>,
  name: Option<&str>,
  json_output: bool,
) -> Result<()> {
  let threshold = threshold.unwrap_or(config.clustering.threshold);
  info!(threshold, files = files.len(), "Training from files");

  let (mut engine, report) = train_from_files(files, threshold).context("Training failed")?;
  engine.set_classify_grows_vocabulary(config.clustering.classify_grows_vocabulary);

  if json_output {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report, threshold);
  }

  let name = match name {
    Some(name) => name.to_string(),
    None => match stdio_console().ask_non_blank(SAVE_QUESTION)? {
      Some(name) => name,
      None => bail!("No model name given; the trained model was not saved"),
    },
  };

  let path = model_store(config)
    .save(&name, &engine)
    .with_context(|| format!("Failed to save model {:?}", name))?;
  println!("Model {} saved to {}", name, path.display());

  Ok(())
}

fn print_report(report: &TrainingReport, threshold: f64) {
  println!("Training Summary (threshold {})", threshold);
  println!("================\n");

  for file in &report.files {
    println!("{:<20} {:>5} lines", file.label, file.lines);
    if file.forced > 0 {
      println!("{:<20} {:>5} outside threshold, kept by label", "", file.forced);
    }
    if file.attributed_elsewhere > 0 {
      println!("{:<20} {:>5} attributed to another author", "", file.attributed_elsewhere);
    }
  }

  println!();
  println!("Total: {} lines from {} files", report.total_lines(), report.files.len());
  if report.total_attributed_elsewhere() > 0 {
    println!("Some lines landed in other authors' clusters; a smaller threshold keeps authors apart.");
  }
}
