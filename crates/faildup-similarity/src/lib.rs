//! Failure-message similarity via TF-IDF vectors and cosine scoring.
//!
//! 1. Tokenize each message by splitting on boundaries between word
//!    characters (Unicode letters, digits, underscore) and everything else,
//!    lowercasing, and dropping single-character tokens
//! 2. Fit a vocabulary over the distinct messages of one invocation
//! 3. Weight term counts by smoothed inverse document frequency
//! 4. Score each requested pair with cosine similarity
//!
//! Scoring every distinct pair is O(N^2) in the number of messages; a few
//! thousand failures already means millions of pairs. That pairwise step is
//! the scalability ceiling of the whole tool.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

pub use faildup_math::cosine_similarity as cosine_sim_vectors;
use faildup_math::{cosine_from_parts, sparse_dot};

/// Tokens shorter than this many characters carry no signal (`E` prefixes,
/// line digits).
const MIN_TOKEN_LEN: usize = 2;

/// Tokenize text by splitting on word-character boundaries.
///
/// Word characters are Unicode alphanumerics and `_`, so Cyrillic or CJK
/// text tokenizes like ASCII. Tokens are lowercased; tokens shorter than two
/// characters are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (i, c) in text.char_indices() {
        let is_token_char = c.is_alphanumeric() || c == '_';
        match (start, is_token_char) {
            (None, true) => start = Some(i),
            (Some(s), false) => {
                push_token(&mut tokens, &text[s..i]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push_token(&mut tokens, &text[s..]);
    }
    tokens
}

fn push_token(tokens: &mut Vec<String>, raw: &str) {
    if raw.chars().nth(MIN_TOKEN_LEN - 1).is_some() {
        tokens.push(raw.to_lowercase());
    }
}

/// Term weights for one message, as `(term index, weight)` sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
    squared_norm: f64,
}

impl SparseVector {
    fn from_entries(entries: Vec<(usize, f64)>) -> Self {
        let squared_norm = entries.iter().map(|(_, w)| w * w).sum();
        Self {
            entries,
            squared_norm,
        }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// True when the message produced no vocabulary terms.
    pub fn is_zero(&self) -> bool {
        self.squared_norm == 0.0
    }

    pub fn to_dense(&self, dimension: usize) -> Vec<f64> {
        let mut dense = vec![0.0; dimension];
        for &(i, w) in &self.entries {
            if i < dimension {
                dense[i] = w;
            }
        }
        dense
    }

    /// Cosine similarity in `[0, 1]`; `0.0` when either side is featureless.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        cosine_from_parts(
            sparse_dot(&self.entries, &other.entries),
            self.squared_norm,
            other.squared_norm,
        )
    }
}

/// A TF-IDF vocabulary fitted over one corpus of messages.
///
/// Every vector produced by one model shares its feature space, so vectors
/// from different models must never be compared.
#[derive(Debug, Clone, Default)]
pub struct TfIdfModel {
    terms: Vec<String>,
    index: FxHashMap<String, usize>,
    idf: Vec<f64>,
    documents: usize,
}

impl TfIdfModel {
    /// Fit the vocabulary and idf weights.
    ///
    /// Duplicate documents count once. Idf is the smoothed
    /// `ln((1 + n) / (1 + df)) + 1`, so a term present everywhere weighs 1.0.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        let mut n = 0usize;

        for doc in documents {
            let doc = doc.as_ref();
            if !seen.insert(doc) {
                continue;
            }
            n += 1;
            let mut terms = tokenize(doc);
            terms.sort_unstable();
            terms.dedup();
            for term in terms {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms = Vec::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        let mut index = FxHashMap::default();
        for (i, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1 + n) as f64 / (1 + df) as f64).ln() + 1.0);
            index.insert(term.clone(), i);
            terms.push(term);
        }

        Self {
            terms,
            index,
            idf,
            documents: n,
        }
    }

    /// Vocabulary size; the length of every dense vector.
    pub fn dimension(&self) -> usize {
        self.terms.len()
    }

    /// Number of distinct documents the model was fitted on.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Vocabulary terms in vector-component order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index.get(term).map(|&i| self.idf[i])
    }

    /// Dense vector with one component per vocabulary term.
    pub fn vectorize(&self, text: &str) -> Vec<f64> {
        self.vectorize_sparse(text).to_dense(self.dimension())
    }

    /// Sparse form of [`TfIdfModel::vectorize`]. Terms outside the vocabulary
    /// are ignored.
    pub fn vectorize_sparse(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&i) = self.index.get(&token) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }
        let entries = counts
            .into_iter()
            .map(|(i, tf)| (i, tf * self.idf[i]))
            .collect();
        SparseVector::from_entries(entries)
    }
}

/// Number of distinct unordered pairs over `n` items.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// All distinct unordered index pairs `(i, j)` with `i < j`, in
/// lexicographic order.
pub fn pair_indices(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(pair_count(n));
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Message pairs matching [`pair_indices`] over `messages`.
pub fn message_pairs<S: AsRef<str>>(messages: &[S]) -> Vec<(&str, &str)> {
    pair_indices(messages.len())
        .into_iter()
        .map(|(i, j)| (messages[i].as_ref(), messages[j].as_ref()))
        .collect()
}

/// Score each pair, preserving input order.
///
/// The model is fitted once over every distinct text appearing in `pairs`.
pub fn score_pairs<A, B>(pairs: &[(A, B)]) -> Vec<f64>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if pairs.is_empty() {
        return Vec::new();
    }

    let mut slot: FxHashMap<&str, usize> = FxHashMap::default();
    let mut texts: Vec<&str> = Vec::new();
    for (a, b) in pairs {
        for text in [a.as_ref(), b.as_ref()] {
            slot.entry(text).or_insert_with(|| {
                texts.push(text);
                texts.len() - 1
            });
        }
    }

    let model = TfIdfModel::fit(&texts);
    let vectors: Vec<SparseVector> = texts.iter().map(|t| model.vectorize_sparse(t)).collect();

    pairs
        .iter()
        .map(|(a, b)| {
            let va = &vectors[slot[a.as_ref()]];
            let vb = &vectors[slot[b.as_ref()]];
            va.cosine(vb)
        })
        .collect()
}

/// Score every distinct pair of `messages`, in [`pair_indices`] order.
pub fn score_failures<S: AsRef<str>>(messages: &[S]) -> Vec<f64> {
    score_pairs(&message_pairs(messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_basic() {
        let tokens = tokenize("def test_02():\n>       assert False\nE       assert False");
        assert_eq!(
            tokens,
            vec!["def", "test_02", "assert", "false", "assert", "false"]
        );
    }

    #[test]
    fn tokenize_drops_single_chars_and_lowercases() {
        assert_eq!(tokenize("E x 8 ValueError"), vec!["valueerror"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("!!! ... ???").is_empty());
    }

    #[test]
    fn tokenize_keeps_non_ascii_words() {
        assert_eq!(
            tokenize("Ошибка: Соединение 断言失败 й"),
            vec!["ошибка", "соединение", "断言失败"]
        );
    }

    #[test]
    fn fit_counts_duplicate_documents_once() {
        let model = TfIdfModel::fit(&["alpha beta", "alpha beta", "gamma"]);
        assert_eq!(model.documents(), 2);
        assert_eq!(model.terms(), &["alpha", "beta", "gamma"]);
    }

    #[test]
    fn idf_of_ubiquitous_term_is_one() {
        let model = TfIdfModel::fit(&["common alpha", "common beta", "common gamma"]);
        let idf = model.idf("common").unwrap();
        assert!((idf - 1.0).abs() < 1e-12);
        assert!(model.idf("alpha").unwrap() > idf);
        assert!(model.idf("missing").is_none());
    }

    #[test]
    fn vectorize_has_component_per_term() {
        let model = TfIdfModel::fit(&["alpha beta", "beta gamma"]);
        let v = model.vectorize("alpha alpha unknown");
        assert_eq!(v.len(), 3);
        assert!(v[0] > 0.0);
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn sparse_and_dense_cosine_agree() {
        let model = TfIdfModel::fit(&["alpha beta beta", "beta gamma", "delta"]);
        let a = model.vectorize_sparse("alpha beta beta");
        let b = model.vectorize_sparse("beta gamma");
        let dense = cosine_sim_vectors(
            &model.vectorize("alpha beta beta"),
            &model.vectorize("beta gamma"),
        );
        assert!((a.cosine(&b) - dense).abs() < 1e-12);
    }

    #[test]
    fn pair_indices_are_lexicographic() {
        assert_eq!(
            pair_indices(4),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
        assert!(pair_indices(1).is_empty());
        assert!(pair_indices(0).is_empty());
    }

    #[test]
    fn pair_count_matches_formula() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(5), 10);
    }

    #[test]
    fn score_pairs_empty_input() {
        let pairs: Vec<(&str, &str)> = Vec::new();
        assert!(score_pairs(&pairs).is_empty());
    }

    #[test]
    fn featureless_message_scores_zero() {
        let scores = score_pairs(&[("", "assert False"), ("!", "?")]);
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn score_failures_on_permutations_is_positive() {
        let messages = [
            "i am failure 1",
            "i am failure 2",
            "i am failure 3",
            "i am failure 4",
        ];
        let mut pairs = Vec::new();
        for a in messages {
            for b in messages {
                if a != b {
                    pairs.push((a, b));
                }
            }
        }
        let scores = score_pairs(&pairs);
        assert_eq!(scores.len(), 12);
        assert!(scores.iter().sum::<f64>() > 0.0);
    }
}
