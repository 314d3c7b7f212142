use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ngram::extract_ngrams;

/// Occurrence count of every n-gram in a single text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyProfile {
  counts: BTreeMap<String, u32>,
}

impl FrequencyProfile {
  /// Count a flat n-gram sequence.
  ///
  /// Pure counting: registering the keys into a vocabulary is the caller's job.
  pub fn from_ngrams<I, S>(ngrams: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut counts = BTreeMap::new();
    for gram in ngrams {
      *counts.entry(gram.as_ref().to_string()).or_insert(0) += 1;
    }
    Self { counts }
  }

  /// Tokenize `text` and count its n-grams
  pub fn from_text(text: &str) -> Self {
    Self::from_ngrams(extract_ngrams(text))
  }

  /// Count for `ngram`, 0 if it never occurred
  pub fn get(&self, ngram: &str) -> u32 {
    self.counts.get(ngram).copied().unwrap_or(0)
  }

  pub fn contains(&self, ngram: &str) -> bool {
    self.counts.contains_key(ngram)
  }

  /// Number of distinct n-grams
  pub fn len(&self) -> usize {
    self.counts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  /// Sum of all counts
  pub fn total(&self) -> u64 {
    self.counts.values().map(|&c| c as u64).sum()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
    self.counts.iter().map(|(k, &v)| (k.as_str(), v))
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.counts.keys().map(String::as_str)
  }

  /// The `n` most frequent n-grams, highest count first, ties alphabetical
  pub fn most_common(&self, n: usize) -> Vec<(&str, u32)> {
    let mut entries: Vec<(&str, u32)> = self.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.truncate(n);
    entries
  }
}

impl<S: Into<String>> FromIterator<(S, u32)> for FrequencyProfile {
  fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
    Self {
      counts: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
    }
  }
}
