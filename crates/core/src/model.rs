//! Model persistence.
//!
//! A model is written as a single JSON document holding the vocabulary in
//! coordinate order, every cluster with its profiles and centroid in
//! creation order, and the threshold. Loading validates the document
//! against the model invariants before handing back an engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::centroid::compute_centroid;
use crate::cluster::Cluster;
use crate::engine::{ClusterEngine, validate_threshold};
use crate::error::{Error, Result};
use crate::vocabulary::Vocabulary;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Tolerance when checking stored centroids against their recomputed mean
const CENTROID_EPSILON: f64 = 1e-9;

#[derive(Debug, Serialize, Deserialize)]
struct ModelDocument {
  format_version: u32,
  saved_at: DateTime<Utc>,
  threshold: f64,
  #[serde(default = "default_classify_grows_vocabulary")]
  classify_grows_vocabulary: bool,
  vocabulary: Vocabulary,
  clusters: Vec<Cluster>,
}

fn default_classify_grows_vocabulary() -> bool {
  true
}

impl ClusterEngine {
  /// Serialize the entire model
  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    let document = ModelDocument {
      format_version: FORMAT_VERSION,
      saved_at: Utc::now(),
      threshold: self.threshold,
      classify_grows_vocabulary: self.classify_grows_vocabulary,
      vocabulary: self.vocabulary.clone(),
      clusters: self.clusters.clone(),
    };
    let bytes = serde_json::to_vec(&document)?;
    debug!(bytes = bytes.len(), clusters = self.clusters.len(), "Serialized model");
    Ok(bytes)
  }

  /// Rebuild a model written by [`ClusterEngine::to_bytes`]
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    let document: ModelDocument =
      serde_json::from_slice(bytes).map_err(|e| Error::MalformedModel(e.to_string()))?;
    validate(&document)?;
    debug!(
      saved_at = %document.saved_at,
      clusters = document.clusters.len(),
      vocabulary = document.vocabulary.len(),
      "Deserialized model"
    );

    // Stored means only pass the tolerance check; the loaded model uses exact ones
    let mut clusters = document.clusters;
    clusters.iter_mut().for_each(Cluster::recompute_centroid);

    Ok(Self {
      vocabulary: document.vocabulary,
      clusters,
      threshold: document.threshold,
      classify_grows_vocabulary: document.classify_grows_vocabulary,
    })
  }
}

fn validate(document: &ModelDocument) -> Result<()> {
  if document.format_version != FORMAT_VERSION {
    return Err(Error::MalformedModel(format!(
      "unsupported format version {} (expected {})",
      document.format_version, FORMAT_VERSION
    )));
  }

  validate_threshold(document.threshold).map_err(|e| Error::MalformedModel(e.to_string()))?;

  let mut labels = HashSet::new();
  for cluster in &document.clusters {
    let label = cluster.label();
    if label.trim().is_empty() {
      return Err(Error::MalformedModel("cluster with blank label".to_string()));
    }
    if !labels.insert(label) {
      return Err(Error::MalformedModel(format!("duplicate cluster {:?}", label)));
    }
    if cluster.is_empty() {
      return Err(Error::MalformedModel(format!("cluster {:?} has no examples", label)));
    }
    if let Some(missing) = cluster
      .examples()
      .iter()
      .flat_map(|p| p.keys())
      .find(|k| !document.vocabulary.contains(k))
    {
      return Err(Error::MalformedModel(format!(
        "cluster {:?} uses n-gram {:?} missing from the vocabulary",
        label, missing
      )));
    }
    if !cluster
      .centroid()
      .approx_eq(&compute_centroid(cluster.examples()), CENTROID_EPSILON)
    {
      return Err(Error::MalformedModel(format!(
        "centroid of cluster {:?} does not match its examples",
        label
      )));
    }
  }

  Ok(())
}
