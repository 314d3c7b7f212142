//! Online nearest-centroid clustering engine.
//!
//! Every text is reduced to an n-gram [`FrequencyProfile`], laid out on the
//! current [`Vocabulary`] and compared by Euclidean distance against each
//! cluster's centroid laid out on the same vocabulary. The nearest cluster
//! wins if it is strictly closer than the threshold; otherwise the text is
//! filed under the caller's label hint or a label obtained from a
//! [`LabelPrompt`].
//!
//! Ties between equally distant clusters go to the cluster created first.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::centroid::Centroid;
use crate::cluster::Cluster;
use crate::error::{Error, Result};
use crate::ngram::extract_ngrams;
use crate::profile::FrequencyProfile;
use crate::prompt::LabelPrompt;
use crate::vector::{euclidean, vectorize};
use crate::vocabulary::Vocabulary;

/// Label reported for texts no cluster is close enough to
pub const UNRECOGNIZED: &str = "unrecognized";

/// Number of top n-grams logged per processed text
const LOGGED_TOP_NGRAMS: usize = 5;

/// How `add_text` arrived at its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
  /// The model had no clusters yet
  Bootstrap,
  /// Nearest centroid was strictly within the threshold
  Matched,
  /// No centroid was close enough; the caller's label hint was used
  Forced,
  /// No centroid was close enough; the label prompt supplied the label
  Prompted,
}

/// Outcome of [`ClusterEngine::add_text`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
  pub label: String,
  pub decision: Decision,
  /// Distance to the nearest centroid before the text was filed (None on bootstrap)
  pub distance: Option<f64>,
}

impl Assignment {
  pub fn label(&self) -> &str {
    &self.label
  }
}

/// Outcome of [`ClusterEngine::classify`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Classification {
  Recognized { label: String, distance: f64 },
  Unrecognized { nearest_distance: f64 },
}

impl Classification {
  /// The cluster label, or [`UNRECOGNIZED`]
  pub fn label(&self) -> &str {
    match self {
      Classification::Recognized { label, .. } => label,
      Classification::Unrecognized { .. } => UNRECOGNIZED,
    }
  }

  pub fn is_recognized(&self) -> bool {
    matches!(self, Classification::Recognized { .. })
  }

  /// Distance to the nearest centroid
  pub fn distance(&self) -> f64 {
    match self {
      Classification::Recognized { distance, .. } => *distance,
      Classification::Unrecognized { nearest_distance } => *nearest_distance,
    }
  }
}

impl fmt::Display for Classification {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Reject thresholds that cannot separate anything
pub fn validate_threshold(threshold: f64) -> Result<f64> {
  if threshold.is_finite() && threshold > 0.0 {
    Ok(threshold)
  } else {
    Err(Error::InvalidThreshold(threshold))
  }
}

/// The whole model: vocabulary, clusters (with centroids) and threshold
#[derive(Debug, Clone)]
pub struct ClusterEngine {
  pub(crate) vocabulary: Vocabulary,
  pub(crate) clusters: Vec<Cluster>,
  pub(crate) threshold: f64,
  pub(crate) classify_grows_vocabulary: bool,
}

impl ClusterEngine {
  /// An empty model
  pub fn new(threshold: f64) -> Result<Self> {
    let threshold = validate_threshold(threshold)?;
    info!(threshold, "Initialized clustering model");
    Ok(Self {
      vocabulary: Vocabulary::new(),
      clusters: Vec::new(),
      threshold,
      classify_grows_vocabulary: true,
    })
  }

  /// Whether `classify` registers unseen n-grams into the vocabulary (default: true)
  pub fn with_classify_grows_vocabulary(mut self, grows: bool) -> Self {
    self.classify_grows_vocabulary = grows;
    self
  }

  pub fn set_classify_grows_vocabulary(&mut self, grows: bool) {
    self.classify_grows_vocabulary = grows;
  }

  pub fn classify_grows_vocabulary(&self) -> bool {
    self.classify_grows_vocabulary
  }

  pub fn threshold(&self) -> f64 {
    self.threshold
  }

  /// Replace the threshold; applies from the next call
  pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
    self.threshold = validate_threshold(threshold)?;
    info!(threshold, "Threshold updated");
    Ok(())
  }

  pub fn vocabulary(&self) -> &Vocabulary {
    &self.vocabulary
  }

  /// Clusters in creation order
  pub fn clusters(&self) -> &[Cluster] {
    &self.clusters
  }

  pub fn cluster(&self, label: &str) -> Option<&Cluster> {
    self.clusters.iter().find(|c| c.label() == label)
  }

  pub fn centroid(&self, label: &str) -> Option<&Centroid> {
    self.cluster(label).map(Cluster::centroid)
  }

  pub fn labels(&self) -> impl Iterator<Item = &str> {
    self.clusters.iter().map(Cluster::label)
  }

  /// True when no cluster exists yet
  pub fn is_empty(&self) -> bool {
    self.clusters.is_empty()
  }

  /// Attribute `text` to a cluster, creating one if needed, and update its centroid.
  ///
  /// `label_hint` bypasses the threshold when no cluster is close enough;
  /// without it, `prompt` is asked for a label. The vocabulary grows before
  /// any decision is made, so it keeps the text's n-grams even if the prompt fails.
  /// A blank hint is an error (`InvalidLabel`), not a request to prompt; pass `None` to prompt.
  pub fn add_text<P>(&mut self, text: &str, label_hint: Option<&str>, prompt: &mut P) -> Result<Assignment>
  where
    P: LabelPrompt + ?Sized,
  {
    let hint = label_hint.map(normalize_label).transpose()?;

    let ngrams = extract_ngrams(text);
    let profile = FrequencyProfile::from_ngrams(&ngrams);
    self.vocabulary.register(&ngrams);
    debug!(top = ?profile.most_common(LOGGED_TOP_NGRAMS), "Most frequent n-grams");

    let vector = vectorize(&profile, &self.vocabulary);
    let Some((nearest, distance)) = self.nearest(&vector, &self.vocabulary) else {
      let label = match hint {
        Some(label) => label,
        None => request_label(prompt, text)?,
      };
      self.file_under(&label, profile);
      info!(label = %label, "Created first cluster");
      return Ok(Assignment {
        label,
        decision: Decision::Bootstrap,
        distance: None,
      });
    };

    if distance < self.threshold {
      let cluster = &mut self.clusters[nearest];
      cluster.push(profile);
      info!(label = %cluster.label(), distance, "Text added to nearest cluster");
      return Ok(Assignment {
        label: cluster.label().to_string(),
        decision: Decision::Matched,
        distance: Some(distance),
      });
    }

    let (label, decision) = match hint {
      Some(label) => {
        warn!(
          label = %label,
          distance,
          threshold = self.threshold,
          "Text added to hinted cluster although no centroid was within threshold"
        );
        (label, Decision::Forced)
      }
      None => {
        let label = request_label(prompt, text)?;
        info!(label = %label, distance, "Text labeled manually");
        (label, Decision::Prompted)
      }
    };
    self.file_under(&label, profile);

    Ok(Assignment {
      label,
      decision,
      distance: Some(distance),
    })
  }

  /// Attribute `text` without changing any cluster.
  ///
  /// Unless `classify_grows_vocabulary` is off, the text's n-grams are still
  /// registered into the vocabulary. Distances are the same either way.
  pub fn classify(&mut self, text: &str) -> Result<Classification> {
    if self.clusters.is_empty() {
      return Err(Error::EmptyModel);
    }

    let ngrams = extract_ngrams(text);
    let profile = FrequencyProfile::from_ngrams(&ngrams);

    let scratch;
    let vocabulary = if self.classify_grows_vocabulary {
      self.vocabulary.register(&ngrams);
      &self.vocabulary
    } else {
      let mut extended = self.vocabulary.clone();
      extended.register(&ngrams);
      scratch = extended;
      &scratch
    };

    let vector = vectorize(&profile, vocabulary);
    let (nearest, distance) = self.nearest(&vector, vocabulary).ok_or(Error::EmptyModel)?;

    if distance < self.threshold {
      let label = self.clusters[nearest].label().to_string();
      info!(label = %label, distance, "Text identified");
      Ok(Classification::Recognized { label, distance })
    } else {
      info!(distance, threshold = self.threshold, "Text not recognized");
      Ok(Classification::Unrecognized {
        nearest_distance: distance,
      })
    }
  }

  /// Distance from `vector` to every centroid, in cluster creation order
  pub fn distances(&self, vector: &[f64], vocabulary: &Vocabulary) -> Vec<(&str, f64)> {
    self
      .clusters
      .iter()
      .map(|c| (c.label(), euclidean(vector, &vectorize(c.centroid(), vocabulary))))
      .collect()
  }

  /// Index and distance of the closest cluster; the earliest cluster wins ties
  fn nearest(&self, vector: &[f64], vocabulary: &Vocabulary) -> Option<(usize, f64)> {
    let distances = self.distances(vector, vocabulary);
    debug!(?distances, "Distances to centroids");

    let mut best: Option<(usize, f64)> = None;
    for (idx, (_, distance)) in distances.into_iter().enumerate() {
      match best {
        Some((_, current)) if distance >= current => {}
        _ => best = Some((idx, distance)),
      }
    }
    best
  }

  /// Append `profile` to the cluster named `label`, creating it if new
  fn file_under(&mut self, label: &str, profile: FrequencyProfile) {
    match self.clusters.iter_mut().find(|c| c.label() == label) {
      Some(cluster) => cluster.push(profile),
      None => {
        self.clusters.push(Cluster::new(label, profile));
        debug!(label, clusters = self.clusters.len(), "New cluster");
      }
    }
  }
}

/// Labels are trimmed and must not be blank
fn normalize_label(label: &str) -> Result<String> {
  let trimmed = label.trim();
  if trimmed.is_empty() {
    return Err(Error::InvalidLabel(label.to_string()));
  }
  Ok(trimmed.to_string())
}

fn request_label<P: LabelPrompt + ?Sized>(prompt: &mut P, text: &str) -> Result<String> {
  let answer = prompt.request_label(text)?;
  normalize_label(&answer).map_err(|_| Error::LabelRequired)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::centroid::compute_centroid;
  use crate::prompt::{FixedLabel, NoPrompt};
  use pretty_assertions::assert_eq;

  fn trained(threshold: f64) -> ClusterEngine {
    let mut engine = ClusterEngine::new(threshold).unwrap();
    engine.add_text("hello world", Some("alice"), &mut NoPrompt).unwrap();
    engine
  }

  #[test]
  fn test_new_rejects_bad_thresholds() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
      assert!(matches!(ClusterEngine::new(bad), Err(Error::InvalidThreshold(_))));
    }
    assert!(ClusterEngine::new(0.01).is_ok());
  }

  #[test]
  fn test_set_threshold() {
    let mut engine = trained(3.0);
    engine.set_threshold(1.5).unwrap();
    assert_eq!(engine.threshold(), 1.5);
    assert!(engine.set_threshold(-2.0).is_err());
    assert_eq!(engine.threshold(), 1.5);
  }

  #[test]
  fn test_bootstrap_with_hint() {
    let mut engine = ClusterEngine::new(3.0).unwrap();
    let assignment = engine.add_text("hello world", Some("alice"), &mut NoPrompt).unwrap();
    assert_eq!(assignment.label(), "alice");
    assert_eq!(assignment.decision, Decision::Bootstrap);
    assert_eq!(assignment.distance, None);

    let cluster = engine.cluster("alice").unwrap();
    assert_eq!(cluster.len(), 1);
    let expected: FrequencyProfile = [("hello", 1), ("world", 1), ("hello world", 1)].into_iter().collect();
    assert_eq!(cluster.examples()[0], expected);
    assert_eq!(engine.vocabulary().len(), 3);
  }

  #[test]
  fn test_bootstrap_prompts_without_hint() {
    let mut engine = ClusterEngine::new(3.0).unwrap();
    let assignment = engine.add_text("hi", None, &mut FixedLabel::new("carol")).unwrap();
    assert_eq!(assignment.label(), "carol");
    assert_eq!(assignment.decision, Decision::Bootstrap);
  }

  #[test]
  fn test_bootstrap_without_any_label_fails() {
    let mut engine = ClusterEngine::new(3.0).unwrap();
    let result = engine.add_text("hi", None, &mut NoPrompt);
    assert!(matches!(result, Err(Error::LabelRequired)));
    assert!(engine.is_empty());
  }

  #[test]
  fn test_blank_prompt_answer_is_label_required() {
    let mut engine = ClusterEngine::new(3.0).unwrap();
    let result = engine.add_text("hi", None, &mut FixedLabel::new("   "));
    assert!(matches!(result, Err(Error::LabelRequired)));
  }

  #[test]
  fn test_blank_hint_is_invalid_label() {
    let mut engine = ClusterEngine::new(3.0).unwrap();
    let result = engine.add_text("hi", Some(""), &mut NoPrompt);
    assert!(matches!(result, Err(Error::InvalidLabel(_))));
  }

  #[test]
  fn test_second_text_matches_existing_cluster() {
    let mut engine = trained(3.0);
    let assignment = engine
      .add_text("hello there world", Some("alice"), &mut NoPrompt)
      .unwrap();
    assert_eq!(assignment.label(), "alice");
    assert_eq!(assignment.decision, Decision::Matched);
    // profile {hello, there, world, hello there, there world, hello there world}
    // vs centroid {hello, world, hello world}: differs on 5 coordinates by 1
    assert!((assignment.distance.unwrap() - 5f64.sqrt()).abs() < 1e-12);

    let cluster = engine.cluster("alice").unwrap();
    assert_eq!(cluster.len(), 2);
    assert_eq!(cluster.centroid().get("hello"), 1.0);
    assert_eq!(cluster.centroid().get("there"), 0.5);
    assert_eq!(cluster.centroid().get("hello world"), 0.5);
    assert_eq!(engine.vocabulary().len(), 7);
  }

  #[test]
  fn test_forced_split_uses_hint_not_prompt() {
    let mut engine = trained(3.0);
    engine.add_text("hello there world", Some("alice"), &mut NoPrompt).unwrap();
    engine.set_threshold(0.1).unwrap();

    let mut prompted = false;
    let mut prompt = |_: &str| -> Result<String> {
      prompted = true;
      Ok("never".to_string())
    };
    let assignment = engine
      .add_text("completely unrelated content here", Some("bob"), &mut prompt)
      .unwrap();
    assert!(!prompted);
    assert_eq!(assignment.label(), "bob");
    assert_eq!(assignment.decision, Decision::Forced);
    assert!(assignment.distance.unwrap() >= 0.1);
    assert_eq!(engine.clusters().len(), 2);
    assert_eq!(engine.cluster("bob").unwrap().len(), 1);
  }

  #[test]
  fn test_hint_forces_even_into_existing_far_cluster() {
    let mut engine = trained(0.5);
    let assignment = engine.add_text("something else entirely", Some("alice"), &mut NoPrompt).unwrap();
    assert_eq!(assignment.decision, Decision::Forced);
    assert_eq!(engine.clusters().len(), 1);
    assert_eq!(engine.cluster("alice").unwrap().len(), 2);
  }

  #[test]
  fn test_manual_mode_prompts_when_far() {
    let mut engine = trained(1.0);
    let assignment = engine.add_text("new voice here", None, &mut FixedLabel::new("dave")).unwrap();
    assert_eq!(assignment.decision, Decision::Prompted);
    assert_eq!(assignment.label(), "dave");
  }

  #[test]
  fn test_manual_mode_matches_without_prompt() {
    let mut engine = trained(3.0);
    let assignment = engine.add_text("hello world", None, &mut NoPrompt).unwrap();
    assert_eq!(assignment.decision, Decision::Matched);
    assert_eq!(assignment.distance, Some(0.0));
  }

  #[test]
  fn test_threshold_boundary_is_not_a_match() {
    // "a" vs centroid {"b": 1}: distance is exactly sqrt(2)
    let mut engine = ClusterEngine::new(2f64.sqrt()).unwrap();
    engine.add_text("b", Some("bea"), &mut NoPrompt).unwrap();
    let classification = engine.classify("a").unwrap();
    assert_eq!(classification.distance(), 2f64.sqrt());
    assert_eq!(classification.label(), UNRECOGNIZED);

    let assignment = engine.add_text("a", None, &mut FixedLabel::new("ann")).unwrap();
    assert_eq!(assignment.decision, Decision::Prompted);

    // Nudging the threshold just above turns it into a match
    engine.set_threshold(2f64.sqrt() + 1e-9).unwrap();
    assert_eq!(engine.classify("b").unwrap().label(), "bea");
  }

  #[test]
  fn test_tie_goes_to_earliest_cluster() {
    // "c" is exactly sqrt(2) away from both single-unigram centroids
    let mut engine = ClusterEngine::new(10.0).unwrap();
    engine.add_text("a", Some("first"), &mut NoPrompt).unwrap();
    engine.set_threshold(0.5).unwrap();
    engine.add_text("b", Some("second"), &mut NoPrompt).unwrap();
    engine.set_threshold(10.0).unwrap();

    let classification = engine.classify("c").unwrap();
    assert_eq!(classification.label(), "first");

    let assignment = engine.add_text("c", None, &mut NoPrompt).unwrap();
    assert_eq!(assignment.label(), "first");
  }

  #[test]
  fn test_classify_empty_model() {
    let mut engine = ClusterEngine::new(3.0).unwrap();
    assert!(matches!(engine.classify("anything"), Err(Error::EmptyModel)));
    assert!(engine.vocabulary().is_empty());
  }

  #[test]
  fn test_classify_unrecognized() {
    let mut engine = trained(0.1);
    engine.add_text("completely unrelated content here", Some("bob"), &mut NoPrompt).unwrap();
    let classification = engine.classify("xyz totally novel phrase").unwrap();
    assert!(!classification.is_recognized());
    assert_eq!(classification.label(), UNRECOGNIZED);
    assert_eq!(classification.to_string(), UNRECOGNIZED);
  }

  #[test]
  fn test_classify_does_not_touch_clusters() {
    let mut engine = trained(3.0);
    let before: Vec<_> = engine.clusters().to_vec();
    let classification = engine.classify("hello world").unwrap();
    assert_eq!(classification.label(), "alice");
    assert_eq!(engine.clusters(), before.as_slice());
  }

  #[test]
  fn test_classify_grows_vocabulary_by_default() {
    let mut engine = trained(3.0);
    assert!(engine.classify_grows_vocabulary());
    engine.classify("brand new words").unwrap();
    assert!(engine.vocabulary().contains("brand new words"));
    assert_eq!(engine.vocabulary().len(), 3 + 6);
  }

  #[test]
  fn test_classify_can_leave_vocabulary_alone() {
    let mut grows = trained(3.0);
    let mut frozen = trained(3.0).with_classify_grows_vocabulary(false);

    let a = grows.classify("hello brand new world").unwrap();
    let b = frozen.classify("hello brand new world").unwrap();
    assert_eq!(a, b);
    assert_eq!(frozen.vocabulary().len(), 3);
    assert!(grows.vocabulary().len() > 3);
  }

  #[test]
  fn test_classify_is_deterministic() {
    let mut engine = trained(3.0);
    engine.add_text("good morning everyone", Some("bob"), &mut NoPrompt).unwrap();
    let first = engine.classify("hello everyone").unwrap();
    for _ in 0..5 {
      assert_eq!(engine.classify("hello everyone").unwrap(), first);
    }
  }

  #[test]
  fn test_vocabulary_is_monotonic() {
    let mut engine = ClusterEngine::new(1.0).unwrap();
    let texts = [
      "the quick brown fox",
      "jumps over the lazy dog",
      "the quick brown fox",
      "a completely different sentence",
      "dog",
    ];
    let mut last = 0;
    for (i, text) in texts.iter().enumerate() {
      let label = format!("author{}", i % 2);
      engine.add_text(text, Some(&label), &mut NoPrompt).unwrap();
      assert!(engine.vocabulary().len() >= last);
      last = engine.vocabulary().len();
      engine.classify("unseen tokens appear here").unwrap();
      assert!(engine.vocabulary().len() >= last);
      last = engine.vocabulary().len();
    }
  }

  #[test]
  fn test_centroids_always_exact_mean() {
    let mut engine = ClusterEngine::new(2.5).unwrap();
    let texts = [
      "we shall fight on the beaches",
      "we shall never surrender",
      "ask not what your country can do for you",
      "we shall fight in the fields",
      "ask what you can do for your country",
      "never never never give up",
    ];
    let mut counter = 0;
    let mut prompt = |_: &str| -> Result<String> {
      counter += 1;
      Ok(format!("speaker{}", counter))
    };
    for text in texts {
      engine.add_text(text, None, &mut prompt).unwrap();
      for cluster in engine.clusters() {
        let rebuilt = compute_centroid(cluster.examples());
        assert!(cluster.centroid().approx_eq(&rebuilt, 1e-12));
        for profile in cluster.examples() {
          assert!(profile.keys().all(|k| engine.vocabulary().contains(k)));
        }
      }
    }
    let total: usize = engine.clusters().iter().map(Cluster::len).sum();
    assert_eq!(total, texts.len());
  }

  #[test]
  fn test_labels_in_creation_order() {
    let mut engine = ClusterEngine::new(0.1).unwrap();
    for (text, label) in [("x", "zed"), ("y", "amy"), ("z", "mo")] {
      engine.add_text(text, Some(label), &mut NoPrompt).unwrap();
    }
    assert_eq!(engine.labels().collect::<Vec<_>>(), vec!["zed", "amy", "mo"]);
    assert!(engine.centroid("amy").is_some());
    assert!(engine.centroid("nobody").is_none());
  }
}
