use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profile::FrequencyProfile;

/// Mean count of every n-gram across a cluster's profiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centroid {
  means: BTreeMap<String, f64>,
}

impl Centroid {
  /// Mean for `ngram`, 0.0 if no profile in the cluster contains it
  pub fn get(&self, ngram: &str) -> f64 {
    self.means.get(ngram).copied().unwrap_or(0.0)
  }

  pub fn len(&self) -> usize {
    self.means.len()
  }

  pub fn is_empty(&self) -> bool {
    self.means.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
    self.means.iter().map(|(k, &v)| (k.as_str(), v))
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.means.keys().map(String::as_str)
  }

  /// The `n` n-grams with the highest mean, ties alphabetical
  pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = self.iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.truncate(n);
    entries
  }

  /// Same keys and every mean within `epsilon`
  pub fn approx_eq(&self, other: &Centroid, epsilon: f64) -> bool {
    self.means.len() == other.means.len()
      && self
        .means
        .iter()
        .all(|(k, v)| other.means.get(k).is_some_and(|o| (v - o).abs() <= epsilon))
  }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Centroid {
  fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
    Self {
      means: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
    }
  }
}

/// Recompute a centroid from scratch: per n-gram sum divided by profile count.
///
/// An empty cluster yields an empty centroid.
pub fn compute_centroid(profiles: &[FrequencyProfile]) -> Centroid {
  if profiles.is_empty() {
    return Centroid::default();
  }

  let mut totals: BTreeMap<String, u64> = BTreeMap::new();
  for profile in profiles {
    for (gram, count) in profile.iter() {
      *totals.entry(gram.to_string()).or_insert(0) += count as u64;
    }
  }

  let size = profiles.len() as f64;
  Centroid {
    means: totals.into_iter().map(|(k, sum)| (k, sum as f64 / size)).collect(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_empty_cluster() {
    assert!(compute_centroid(&[]).is_empty());
  }

  #[test]
  fn test_single_profile_is_its_own_mean() {
    let profile = FrequencyProfile::from_text("hello world");
    let centroid = compute_centroid(std::slice::from_ref(&profile));
    let expected: Centroid = [("hello", 1.0), ("world", 1.0), ("hello world", 1.0)].into_iter().collect();
    assert_eq!(centroid, expected);
  }

  #[test]
  fn test_mean_over_profiles() {
    let profiles = vec![
      FrequencyProfile::from_text("hello world"),
      FrequencyProfile::from_text("hello there world"),
    ];
    let centroid = compute_centroid(&profiles);
    assert_eq!(centroid.get("hello"), 1.0);
    assert_eq!(centroid.get("world"), 1.0);
    assert_eq!(centroid.get("there"), 0.5);
    assert_eq!(centroid.get("hello world"), 0.5);
    assert_eq!(centroid.get("hello there"), 0.5);
    assert_eq!(centroid.get("there world"), 0.5);
    assert_eq!(centroid.get("hello there world"), 0.5);
    assert_eq!(centroid.get("absent"), 0.0);
    assert_eq!(centroid.len(), 7);
  }

  #[test]
  fn test_top() {
    let profiles = vec![
      FrequencyProfile::from_text("a a b"),
      FrequencyProfile::from_text("a c"),
    ];
    let centroid = compute_centroid(&profiles);
    let top = centroid.top(1);
    assert_eq!(top, vec![("a", 1.5)]);
  }

  #[test]
  fn test_approx_eq() {
    let a: Centroid = [("x", 0.5), ("y", 1.0)].into_iter().collect();
    let b: Centroid = [("x", 0.5 + 1e-12), ("y", 1.0)].into_iter().collect();
    let c: Centroid = [("x", 0.5)].into_iter().collect();
    assert!(a.approx_eq(&b, 1e-9));
    assert!(!a.approx_eq(&c, 1e-9));
  }
}
