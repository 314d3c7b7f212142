//! Model inspection commands (inspect, models)

use anyhow::{Context, Result};
use serde::Serialize;
use stylo_core::{ClusterEngine, Config};

use super::model_store;

#[derive(Debug, Serialize)]
struct ModelSummary<'a> {
  name: &'a str,
  threshold: f64,
  vocabulary_size: usize,
  classify_grows_vocabulary: bool,
  authors: Vec<AuthorSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct AuthorSummary<'a> {
  label: &'a str,
  texts: usize,
  distinct_ngrams: usize,
  top_ngrams: Vec<(&'a str, f64)>,
}

fn summarize<'a>(name: &'a str, engine: &'a ClusterEngine, top: usize) -> ModelSummary<'a> {
  ModelSummary {
    name,
    threshold: engine.threshold(),
    vocabulary_size: engine.vocabulary().len(),
    classify_grows_vocabulary: engine.classify_grows_vocabulary(),
    authors: engine
      .clusters()
      .iter()
      .map(|c| AuthorSummary {
        label: c.label(),
        texts: c.len(),
        distinct_ngrams: c.centroid().len(),
        top_ngrams: c.centroid().top(top),
      })
      .collect(),
  }
}

/// Show a saved model's authors and their most characteristic n-grams
pub fn cmd_inspect(config: &Config, model: &str, top: usize, json_output: bool) -> Result<()> {
  let engine = model_store(config)
    .load(model)
    .with_context(|| format!("Failed to load model {:?}", model))?;
  let summary = summarize(model, &engine, top);

  if json_output {
    println!("{}", serde_json::to_string_pretty(&summary)?);
    return Ok(());
  }

  println!("Model Details");
  println!("=============\n");
  println!("Name:       {}", summary.name);
  println!("Threshold:  {}", summary.threshold);
  println!("Vocabulary: {} n-grams", summary.vocabulary_size);
  println!("Authors:    {}", summary.authors.len());

  for author in &summary.authors {
    println!();
    println!("{} ({} texts, {} distinct n-grams)", author.label, author.texts, author.distinct_ngrams);
    for (ngram, mean) in &author.top_ngrams {
      println!("  {:>7.3}  {}", mean, ngram);
    }
  }

  Ok(())
}

/// List saved models
pub fn cmd_models(config: &Config) -> Result<()> {
  let store = model_store(config);
  let names = store.list().context("Failed to list models")?;

  if names.is_empty() {
    println!("No models saved in {}", store.root().display());
    return Ok(());
  }

  println!("Models in {}:", store.root().display());
  for name in names {
    println!("  {}", name);
  }
  Ok(())
}
