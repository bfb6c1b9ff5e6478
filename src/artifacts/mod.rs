//! Pre-fitted model artifacts: the TF-IDF vectorizer and the classifier.
//!
//! Both are produced outside this service and exported as JSON. They are
//! loaded once at startup and never mutated afterwards.

pub mod classifier;
pub mod vectorizer;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

pub use classifier::{Classifier, LinearModel, MultinomialNb};
pub use vectorizer::{SparseRow, TfidfParams, TfidfVectorizer};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid token pattern: {0}")]
    TokenPattern(#[from] regex::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[error("vectorizer produces {vectorizer} features but classifier expects {classifier}")]
    FeatureMismatch { vectorizer: usize, classifier: usize },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_vectorizer(path: &Path) -> Result<TfidfVectorizer, ArtifactError> {
    read_json(path)
}

pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
    let classifier: Box<dyn Classifier> = read_json(path)?;
    classifier.validate()?;
    Ok(classifier)
}

/// The vectorizer and classifier pair, checked to agree on the feature space.
#[derive(Debug)]
pub struct Artifacts {
    vectorizer: TfidfVectorizer,
    classifier: Box<dyn Classifier>,
}

impl Artifacts {
    pub fn new(
        vectorizer: TfidfVectorizer,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self, ArtifactError> {
        if vectorizer.n_features() != classifier.n_features() {
            return Err(ArtifactError::FeatureMismatch {
                vectorizer: vectorizer.n_features(),
                classifier: classifier.n_features(),
            });
        }
        Ok(Artifacts {
            vectorizer,
            classifier,
        })
    }

    pub fn load(vectorizer_path: &Path, model_path: &Path) -> Result<Self, ArtifactError> {
        let classifier = load_classifier(model_path)?;
        let vectorizer = load_vectorizer(vectorizer_path)?;
        Self::new(vectorizer, classifier)
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Vectorizes the texts and returns one raw class label per text, in order.
    pub fn predict(&self, texts: &[String]) -> Vec<i64> {
        let rows = self.vectorizer.transform_batch(texts);
        self.classifier.predict(&rows)
    }
}
