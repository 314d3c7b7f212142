//! Attribute texts with a saved model

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use stylo_core::{Classification, ClusterEngine, Config};
use tracing::info;

use super::{TEXT_QUESTION, model_store, stdio_console};
use crate::console::Console;

/// Load a model and attribute the given texts, or read texts interactively if none are given
pub fn cmd_predict(
  config: &Config,
  model: &str,
  threshold: Option<f64>,
  texts: &[String],
  json_output: bool,
) -> Result<()> {
  let mut engine = model_store(config)
    .load(model)
    .with_context(|| format!("Failed to load model {:?}", model))?;

  if let Some(threshold) = threshold {
    engine.set_threshold(threshold)?;
    info!(threshold, "Threshold for inference");
  }

  if texts.is_empty() {
    println!("Model {} loaded.", model);
    let count = run_predict_session(&mut engine, &mut stdio_console())?;
    info!(count, "Prediction session finished");
    return Ok(());
  }

  let mut results = Vec::with_capacity(texts.len());
  for text in texts {
    results.push((text.as_str(), engine.classify(text)?));
  }

  if json_output {
    let json: Vec<_> = results
      .iter()
      .map(|(text, c)| serde_json::json!({ "text": text, "label": c.label(), "classification": c }))
      .collect();
    println!("{}", serde_json::to_string_pretty(&json)?);
  } else {
    for (text, classification) in &results {
      println!("{}", describe(classification));
      println!("  {}", text);
    }
  }

  Ok(())
}

/// Read texts until `exit`, printing who each one appears to be by.
///
/// Returns how many texts were classified.
pub fn run_predict_session<R: BufRead, W: Write>(
  engine: &mut ClusterEngine,
  console: &mut Console<R, W>,
) -> Result<usize> {
  let mut count = 0;
  while let Some(text) = console.next_text(TEXT_QUESTION)? {
    if text.trim().is_empty() {
      continue;
    }
    let classification = engine.classify(&text)?;
    console.say(describe(&classification))?;
    count += 1;
  }
  Ok(count)
}

fn describe(classification: &Classification) -> String {
  match classification {
    Classification::Recognized { label, distance } => {
      format!("The text appears to be by: {} (distance {:.3})", label, distance)
    }
    Classification::Unrecognized { nearest_distance } => format!(
      "The text appears to be by: {} (nearest author at distance {:.3})",
      classification.label(),
      nearest_distance
    ),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;
  use stylo_core::NoPrompt;

  #[test]
  fn test_predict_session() {
    let mut engine = ClusterEngine::new(1.0).unwrap();
    engine.add_text("hello world", Some("alice"), &mut NoPrompt).unwrap();

    let input = "hello world\n\nnothing alike at all\nexit\nnever read\n";
    let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let count = run_predict_session(&mut engine, &mut console).unwrap();

    assert_eq!(count, 2);
    let output = String::from_utf8_lossy(console.output()).to_string();
    assert!(output.contains("by: alice (distance 0.000)"), "{output}");
    assert!(output.contains("by: unrecognized"), "{output}");
    assert_eq!(engine.cluster("alice").unwrap().len(), 1);
  }

  #[test]
  fn test_predict_session_on_empty_model_fails() {
    let mut engine = ClusterEngine::new(1.0).unwrap();
    let mut console = Console::new(Cursor::new(b"text\n".to_vec()), Vec::new());
    assert!(run_predict_session(&mut engine, &mut console).is_err());
  }
}
