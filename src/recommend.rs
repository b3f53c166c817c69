use std::collections::HashSet;
use tracing::debug;

use crate::models::{JobPosting, RecommendationResult, ScoredPosting, UserQuery};
use crate::normalize::normalize;
use crate::tfidf::{TfidfVectorizer, cosine_similarity};

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_MAX_FEATURES: usize = 500;

/// How many times each field is repeated in a posting's composite document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWeights {
    pub qualification: usize,
    pub skills: usize,
    pub languages: usize,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            qualification: 3,
            skills: 2,
            languages: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecommendConfig {
    pub top_k: usize,
    pub max_features: usize,
    pub weights: FieldWeights,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_features: DEFAULT_MAX_FEATURES,
            weights: FieldWeights::default(),
        }
    }
}

/// Top three distinct roles for the given profile.
pub fn recommend<'a>(
    qualification: &str,
    skills: &[String],
    languages: &[String],
    catalog: &'a [JobPosting],
) -> RecommendationResult<'a> {
    let query = UserQuery::new(qualification, skills, languages);
    recommend_with(&RecommendConfig::default(), &query, catalog)
}

pub fn recommend_with<'a>(
    config: &RecommendConfig,
    query: &UserQuery,
    catalog: &'a [JobPosting],
) -> RecommendationResult<'a> {
    if catalog.is_empty() {
        return RecommendationResult::default();
    }

    let scores = score_catalog(config, query, catalog);
    let scored: Vec<ScoredPosting<'a>> = catalog
        .iter()
        .zip(scores)
        .map(|(posting, score)| ScoredPosting { posting, score })
        .collect();

    let result = select_distinct_roles(scored, config.top_k);
    debug!(
        catalog = catalog.len(),
        selected = result.len(),
        "ranked catalog"
    );
    result
}

/// Similarity of every posting to the query, in catalog order.
pub fn score_catalog(config: &RecommendConfig, query: &UserQuery, catalog: &[JobPosting]) -> Vec<f64> {
    let corpus: Vec<String> = catalog
        .iter()
        .map(|p| composite_document(p, &config.weights))
        .collect();

    let mut vectorizer = TfidfVectorizer::new().with_max_features(config.max_features);
    let rows = vectorizer.fit_transform(corpus.as_slice());
    let query_vec = vectorizer.transform(&query_document(query));

    rows.iter()
        .map(|row| cosine_similarity(&query_vec, row))
        .collect()
}

/// Each normalized field repeated by its weight, all space-joined.
pub fn composite_document(posting: &JobPosting, weights: &FieldWeights) -> String {
    let fields = [
        (normalize(&posting.qualification), weights.qualification),
        (normalize(&posting.skills), weights.skills),
        (normalize(&posting.languages), weights.languages),
    ];

    let mut parts: Vec<&str> = Vec::new();
    for (text, times) in &fields {
        if text.is_empty() {
            continue;
        }
        parts.extend(std::iter::repeat_n(text.as_str(), *times));
    }
    parts.join(" ")
}

/// Query text is joined first and normalized once, with no field weighting.
pub fn query_document(query: &UserQuery) -> String {
    normalize(&format!(
        "{} {} {}",
        query.qualification,
        query.skills.join(" "),
        query.languages.join(" ")
    ))
}

/// Stable sort by descending score, then keep the first posting seen for each
/// title until `top_k` titles are chosen.
pub fn select_distinct_roles<'a>(
    mut scored: Vec<ScoredPosting<'a>>,
    top_k: usize,
) -> RecommendationResult<'a> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();
    for candidate in scored {
        if seen.len() >= top_k {
            break;
        }
        if seen.insert(candidate.posting.title.as_str()) {
            entries.push(candidate);
        }
    }

    RecommendationResult { entries }
}
