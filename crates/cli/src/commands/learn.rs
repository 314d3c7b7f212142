//! Manual, interactive clustering

use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};
use stylo_core::{ClusterEngine, Config, Error};
use tracing::{info, warn};

use super::{SAVE_QUESTION, TEXT_QUESTION, model_store, stdio_console};
use crate::console::{Console, ConsolePrompt};

/// Cluster texts typed at the terminal, asking for an author whenever none is close enough
pub fn cmd_learn(config: &Config, threshold: Option<f64>, model: Option<&str>, resume: bool) -> Result<()> {
  let store = model_store(config);

  let mut engine = match (resume, model) {
    (true, Some(name)) => {
      let mut engine = store
        .load(name)
        .with_context(|| format!("Failed to load model {:?}", name))?;
      if let Some(threshold) = threshold {
        engine.set_threshold(threshold)?;
      }
      println!("Model {} loaded ({} authors).", name, engine.clusters().len());
      engine
    }
    (true, None) => bail!("--resume needs --model to know which model to continue"),
    (false, _) => ClusterEngine::new(threshold.unwrap_or(config.clustering.threshold))?
      .with_classify_grows_vocabulary(config.clustering.classify_grows_vocabulary),
  };
  info!(threshold = engine.threshold(), "Threshold for manual clustering");

  let mut console = stdio_console();
  let added = run_learn_session(&mut engine, &mut console)?;
  info!(added, "Manual session finished");

  let name = match model {
    Some(name) => name.to_string(),
    None => match console.ask_non_blank(SAVE_QUESTION)? {
      Some(name) => name,
      None => bail!("No model name given; the model was not saved"),
    },
  };

  let path = store
    .save(&name, &engine)
    .with_context(|| format!("Failed to save model {:?}", name))?;
  println!("Model {} saved to {}", name, path.display());

  Ok(())
}

/// Read texts until `exit`, filing each under its nearest author or asking for one.
///
/// Returns how many texts were added to the model.
pub fn run_learn_session<R: BufRead, W: Write>(
  engine: &mut ClusterEngine,
  console: &mut Console<R, W>,
) -> Result<usize> {
  let mut added = 0;
  while let Some(text) = console.next_text(TEXT_QUESTION)? {
    if text.trim().is_empty() {
      continue;
    }

    let result = engine.add_text(&text, None, &mut ConsolePrompt::new(console));
    match result {
      Ok(assignment) => {
        console.say(format!("The text appears to be by: {}", assignment.label))?;
        added += 1;
      }
      Err(Error::LabelRequired) => {
        warn!("No author given; text skipped");
        console.say("No author given; text skipped.")?;
      }
      Err(e) => return Err(e.into()),
    }
  }
  Ok(added)
}
