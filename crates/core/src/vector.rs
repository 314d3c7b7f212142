//! Dense vectorization over a vocabulary snapshot and Euclidean distance.

use crate::centroid::Centroid;
use crate::profile::FrequencyProfile;
use crate::vocabulary::Vocabulary;

/// A sparse n-gram → value mapping that can be laid out on a vocabulary
pub trait SparseTerms {
  fn terms(&self) -> Vec<(&str, f64)>;
}

impl SparseTerms for FrequencyProfile {
  fn terms(&self) -> Vec<(&str, f64)> {
    self.iter().map(|(k, v)| (k, v as f64)).collect()
  }
}

impl SparseTerms for Centroid {
  fn terms(&self) -> Vec<(&str, f64)> {
    self.iter().collect()
  }
}

/// Lay `sparse` out as a dense vector with one coordinate per vocabulary term.
///
/// Terms absent from the vocabulary have no coordinate and are dropped.
pub fn vectorize<T: SparseTerms + ?Sized>(sparse: &T, vocabulary: &Vocabulary) -> Vec<f64> {
  let mut dense = vec![0.0; vocabulary.len()];
  for (term, value) in sparse.terms() {
    if let Some(idx) = vocabulary.index_of(term) {
      dense[idx] = value;
    }
  }
  dense
}

/// Euclidean distance; a shorter vector is treated as zero-padded
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
  let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
  long
    .iter()
    .enumerate()
    .map(|(i, &x)| {
      let d = x - short.get(i).copied().unwrap_or(0.0);
      d * d
    })
    .sum::<f64>()
    .sqrt()
}
