use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::Deserialize;

use super::ArtifactError;

/// Default word pattern of the fitting library: runs of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse feature row: `(feature index, weight)` pairs in ascending index order.
pub type SparseRow = Vec<(usize, f64)>;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Fitted parameters as exported to JSON, before validation.
#[derive(Debug, Deserialize)]
pub struct TfidfParams {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub binary: bool,
}

impl TfidfParams {
    /// Parameters with the fitting library's defaults around a vocabulary and idf vector.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Option<Vec<f64>>) -> Self {
        TfidfParams {
            vocabulary,
            idf,
            lowercase: true,
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            stop_words: Vec::new(),
            norm: default_norm(),
            sublinear_tf: false,
            binary: false,
        }
    }
}

/// A pre-fitted TF-IDF transformer. Read-only once built.
#[derive(Debug, Deserialize)]
#[serde(try_from = "TfidfParams")]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    norm: Option<Norm>,
    sublinear_tf: bool,
    binary: bool,
}

impl TryFrom<TfidfParams> for TfidfVectorizer {
    type Error = ArtifactError;

    fn try_from(params: TfidfParams) -> Result<Self, Self::Error> {
        let n_features = params.vocabulary.len();

        let mut seen = vec![false; n_features];
        for (term, &index) in &params.vocabulary {
            if index >= n_features || seen[index] {
                return Err(ArtifactError::Invalid(format!(
                    "vocabulary term '{}' has index {} outside a dense range of {} features",
                    term, index, n_features
                )));
            }
            seen[index] = true;
        }

        if let Some(idf) = &params.idf {
            if idf.len() != n_features {
                return Err(ArtifactError::Invalid(format!(
                    "idf has {} entries but vocabulary has {} terms",
                    idf.len(),
                    n_features
                )));
            }
        }

        let (min_n, max_n) = params.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::Invalid(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_pattern = Regex::new(&params.token_pattern)?;
        if token_pattern.captures_len() > 2 {
            return Err(ArtifactError::Invalid(format!(
                "token_pattern '{}' has more than one capturing group",
                params.token_pattern
            )));
        }

        Ok(TfidfVectorizer {
            vocabulary: params.vocabulary,
            idf: params.idf,
            lowercase: params.lowercase,
            token_pattern,
            ngram_range: params.ngram_range,
            stop_words: params.stop_words.into_iter().collect(),
            norm: params.norm,
            sublinear_tf: params.sublinear_tf,
            binary: params.binary,
        })
    }
}

impl TfidfVectorizer {
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Splits a document into the terms looked up in the vocabulary.
    fn analyze(&self, doc: &str) -> Vec<String> {
        let doc: Cow<str> = if self.lowercase {
            Cow::Owned(doc.to_lowercase())
        } else {
            Cow::Borrowed(doc)
        };

        // A single capturing group selects the token, as the fitting library does.
        let tokens: Vec<&str> = if self.token_pattern.captures_len() == 2 {
            self.token_pattern
                .captures_iter(&doc)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect()
        } else {
            self.token_pattern
                .find_iter(&doc)
                .map(|m| m.as_str())
                .collect()
        };
        let tokens: Vec<&str> = tokens
            .into_iter()
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    pub fn transform(&self, doc: &str) -> SparseRow {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(doc) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .map(|(index, count)| {
                let mut weight = if self.binary { 1.0 } else { count };
                if self.sublinear_tf {
                    weight = 1.0 + weight.ln();
                }
                if let Some(idf) = &self.idf {
                    weight *= idf[index];
                }
                (index, weight)
            })
            .collect();

        normalize(&mut row, self.norm);
        row
    }

    pub fn transform_batch(&self, docs: &[String]) -> Vec<SparseRow> {
        docs.iter().map(|doc| self.transform(doc)).collect()
    }
}

fn normalize(row: &mut SparseRow, norm: Option<Norm>) {
    let magnitude = match norm {
        Some(Norm::L2) => row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
        Some(Norm::L1) => row.iter().map(|(_, v)| v.abs()).sum::<f64>(),
        None => return,
    };
    if magnitude > 0.0 {
        for (_, value) in row.iter_mut() {
            *value /= magnitude;
        }
    }
}
