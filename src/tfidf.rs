//! TF-IDF vectorizer over unigrams and bigrams.
//!
//! Vocabulary and IDF weights come only from the documents passed to
//! [`TfidfVectorizer::fit_transform`]; [`TfidfVectorizer::transform`] never
//! grows the vocabulary.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use tracing::debug;

use crate::stop_words::is_stop_word;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// Sparse row: (feature index, weight), sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|&(idx, _)| idx);
        Self { entries }
    }

    pub fn get(&self, idx: usize) -> f64 {
        self.entries
            .binary_search_by_key(&idx, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.0)
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn l2_normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in self.entries.iter_mut() {
                *w /= norm;
            }
        }
        self
    }
}

/// Cosine similarity in [0, 1]. Zero vectors score 0.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_ngram: usize,
    max_features: Option<usize>,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// Unigrams and bigrams, English stop words removed, no feature cap.
    pub fn new() -> Self {
        Self {
            max_ngram: 2,
            max_features: None,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn with_max_ngram(mut self, max_ngram: usize) -> Self {
        self.max_ngram = max_ngram.max(1);
        self
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&idx| self.idf[idx])
    }

    /// Tokens, stop words dropped, then n-grams up to `max_ngram` built from
    /// the surviving neighbours.
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let lower = doc.to_lowercase();
        let tokens: Vec<&str> = TOKEN
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| !is_stop_word(t))
            .collect();

        let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        for n in 2..=self.max_ngram {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    fn count_terms(&self, doc: &str) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for term in self.analyze(doc) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }

    /// Learns vocabulary and IDF from `docs` and returns their L2-normalized rows.
    pub fn fit_transform<S: AsRef<str>>(&mut self, docs: &[S]) -> Vec<SparseVector> {
        let counts: Vec<HashMap<String, usize>> =
            docs.iter().map(|d| self.count_terms(d.as_ref())).collect();

        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();
        for doc_counts in &counts {
            for (term, &n) in doc_counts {
                *corpus_freq.entry(term.as_str()).or_insert(0) += n;
            }
        }

        let mut kept: Vec<(&str, usize)> = corpus_freq.into_iter().collect();
        if let Some(limit) = self.max_features {
            if kept.len() > limit {
                // Highest corpus frequency first, ties alphabetical.
                kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                kept.truncate(limit);
            }
        }

        let mut terms: Vec<String> = kept.into_iter().map(|(t, _)| t.to_string()).collect();
        terms.sort();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        let mut df = vec![0usize; self.vocabulary.len()];
        for doc_counts in &counts {
            for term in doc_counts.keys() {
                if let Some(&idx) = self.vocabulary.get(term) {
                    df[idx] += 1;
                }
            }
        }

        let n_docs = docs.len() as f64;
        self.idf = df
            .iter()
            .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        debug!(
            documents = docs.len(),
            features = self.vocabulary.len(),
            "fitted tf-idf vocabulary"
        );

        counts.iter().map(|c| self.weigh(c)).collect()
    }

    /// Projects `doc` onto the fitted vocabulary; unknown terms are dropped.
    pub fn transform(&self, doc: &str) -> SparseVector {
        self.weigh(&self.count_terms(doc))
    }

    fn weigh(&self, counts: &HashMap<String, usize>) -> SparseVector {
        let entries = counts
            .iter()
            .filter_map(|(term, &n)| {
                self.vocabulary
                    .get(term)
                    .map(|&idx| (idx, n as f64 * self.idf[idx]))
            })
            .collect();
        SparseVector::from_entries(entries).l2_normalized()
    }
}
