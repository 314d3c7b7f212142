use serde::{Deserialize, Serialize};

use crate::centroid::{Centroid, compute_centroid};
use crate::profile::FrequencyProfile;

/// A named author cluster: every profile ever filed under the label, plus their mean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
  label: String,
  examples: Vec<FrequencyProfile>,
  centroid: Centroid,
}

impl Cluster {
  /// A cluster seeded with its first profile
  pub fn new(label: impl Into<String>, first: FrequencyProfile) -> Self {
    let mut cluster = Self {
      label: label.into(),
      examples: Vec::new(),
      centroid: Centroid::default(),
    };
    cluster.push(first);
    cluster
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn examples(&self) -> &[FrequencyProfile] {
    &self.examples
  }

  pub fn centroid(&self) -> &Centroid {
    &self.centroid
  }

  pub fn len(&self) -> usize {
    self.examples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.examples.is_empty()
  }

  /// Append a profile and recompute the centroid from every example
  pub fn push(&mut self, profile: FrequencyProfile) {
    self.examples.push(profile);
    self.centroid = compute_centroid(&self.examples);
  }

  /// Replace the centroid with the exact mean of the examples
  pub(crate) fn recompute_centroid(&mut self) {
    self.centroid = compute_centroid(&self.examples);
  }
}
