//! Append-only n-gram vocabulary.
//!
//! Each n-gram gets an index the first time it is registered and keeps it
//! forever. That index is the n-gram's coordinate in every dense vector, so
//! vectors built at different sizes agree on every shared coordinate and
//! differ only by trailing zeros.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
  terms: Vec<String>,
  index: HashMap<String, usize>,
}

impl Vocabulary {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.terms.len()
  }

  pub fn is_empty(&self) -> bool {
    self.terms.is_empty()
  }

  pub fn contains(&self, term: &str) -> bool {
    self.index.contains_key(term)
  }

  /// Coordinate of `term`, if it has been registered
  pub fn index_of(&self, term: &str) -> Option<usize> {
    self.index.get(term).copied()
  }

  /// Term registered at `index`
  pub fn term(&self, index: usize) -> Option<&str> {
    self.terms.get(index).map(String::as_str)
  }

  /// All terms in coordinate order
  pub fn terms(&self) -> &[String] {
    &self.terms
  }

  /// Register a single term, returning its index and whether it was new
  pub fn insert(&mut self, term: &str) -> (usize, bool) {
    if let Some(&idx) = self.index.get(term) {
      return (idx, false);
    }
    let idx = self.terms.len();
    self.terms.push(term.to_string());
    self.index.insert(term.to_string(), idx);
    (idx, true)
  }

  /// Register every term in order of first appearance; returns how many were new
  pub fn register<I, S>(&mut self, terms: I) -> usize
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    terms.into_iter().filter(|t| self.insert(t.as_ref()).1).count()
  }
}

impl TryFrom<Vec<String>> for Vocabulary {
  type Error = String;

  fn try_from(terms: Vec<String>) -> Result<Self, Self::Error> {
    let mut index = HashMap::with_capacity(terms.len());
    for (i, term) in terms.iter().enumerate() {
      if index.insert(term.clone(), i).is_some() {
        return Err(format!("duplicate vocabulary term {:?}", term));
      }
    }
    Ok(Self { terms, index })
  }
}

impl From<Vocabulary> for Vec<String> {
  fn from(vocabulary: Vocabulary) -> Self {
    vocabulary.terms
  }
}
