//! Tokenization and n-gram extraction.
//!
//! Texts are lowercased and split on whitespace. Every text yields three
//! n-gram families (orders 1 through 3), each n-gram rendered as its tokens
//! joined by a single space.

/// Highest n-gram order extracted from a text
pub const MAX_ORDER: usize = 3;

/// Lowercase the text and split it on whitespace
pub fn tokenize(text: &str) -> Vec<String> {
  text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Contiguous windows of `n` tokens, space-joined.
///
/// Yields nothing when there are fewer than `n` tokens or when `n` is zero.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
  if n == 0 || tokens.len() < n {
    return Vec::new();
  }
  tokens.windows(n).map(|window| window.join(" ")).collect()
}

/// Unigrams, then bigrams, then trigrams of `text`, duplicates preserved
pub fn extract_ngrams(text: &str) -> Vec<String> {
  let tokens = tokenize(text);
  (1..=MAX_ORDER).flat_map(|n| ngrams(&tokens, n)).collect()
}
