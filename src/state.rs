use std::path::PathBuf;

use crate::artifacts::Artifacts;
use crate::error::PredictError;
use crate::io_struct::{Prediction, PredictResponse};
use crate::sentiment::{distribution, label_name};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub vectorizer_path: PathBuf,
    pub model_path: PathBuf,
    pub require_artifacts: bool,
    pub max_upload_bytes: usize,
    pub log_level: log::LevelFilter,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            host: "0.0.0.0".to_string(),
            port: 5001,
            vectorizer_path: PathBuf::from("tfidf_vectorizer.json"),
            model_path: PathBuf::from("sentiment_model.json"),
            require_artifacts: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: log::LevelFilter::Info,
        }
    }
}

/// Immutable per-process context shared by every request handler.
#[derive(Debug)]
pub struct ServiceState {
    artifacts: Option<Artifacts>,
    pub max_upload_bytes: usize,
}

impl ServiceState {
    /// Loads the artifacts named by `config`.
    ///
    /// A load failure is logged and leaves the service running without
    /// artifacts, unless `require_artifacts` is set.
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let artifacts = match Artifacts::load(&config.vectorizer_path, &config.model_path) {
            Ok(artifacts) => {
                log::info!(
                    "Model and vectorizer loaded successfully ({} features, classes {:?})",
                    artifacts.vectorizer().n_features(),
                    artifacts.classifier().classes()
                );
                Some(artifacts)
            }
            Err(e) if config.require_artifacts => {
                return Err(anyhow::Error::new(e).context("Failed to load model artifacts"));
            }
            Err(e) => {
                log::error!("Error loading model or vectorizer: {}", e);
                None
            }
        };
        Ok(Self {
            artifacts,
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    pub fn with_artifacts(artifacts: Artifacts) -> Self {
        Self {
            artifacts: Some(artifacts),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn without_artifacts() -> Self {
        Self {
            artifacts: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn artifacts_loaded(&self) -> bool {
        self.artifacts.is_some()
    }

    /// Classifies `texts` and summarizes the labels.
    pub fn classify(&self, texts: &[String]) -> Result<PredictResponse, PredictError> {
        if texts.is_empty() {
            return Err(PredictError::NoInputProvided);
        }
        let artifacts = self
            .artifacts
            .as_ref()
            .ok_or(PredictError::ArtifactsUnavailable)?;

        let labels = artifacts.predict(texts);
        log::info!("Predictions: {:?}", labels);

        let names = labels.iter().map(|&label| label_name(label)).collect();
        Ok(PredictResponse {
            prediction: Prediction::from_vec(names),
            distribution: distribution(&labels),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{LinearModel, TfidfParams, TfidfVectorizer};
    use crate::io_struct::SingleOrBatch;
    use std::collections::HashMap;

    fn toy_state() -> ServiceState {
        let vocabulary: HashMap<String, usize> = [("love", 0), ("hate", 1), ("okay", 2)]
            .into_iter()
            .map(|(t, i)| (t.to_string(), i))
            .collect();
        let vectorizer = TfidfVectorizer::try_from(TfidfParams::new(vocabulary, None)).unwrap();
        let classifier = LinearModel::new(
            vec![0, 1, 2],
            vec![
                vec![0.0, 1.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
            vec![0.0, 0.0, 0.1],
        )
        .unwrap();
        ServiceState::with_artifacts(Artifacts::new(vectorizer, Box::new(classifier)).unwrap())
    }

    #[test]
    fn test_single_text_gives_scalar() {
        let resp = toy_state().classify(&["I love it".to_string()]).unwrap();
        assert_eq!(resp.prediction, SingleOrBatch::Single("positive".to_string()));
        assert_eq!(resp.distribution.positive, 1.0);
    }

    #[test]
    fn test_batch_keeps_order() {
        let texts: Vec<String> = ["hate", "love", "okay", "love"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let resp = toy_state().classify(&texts).unwrap();
        assert_eq!(
            resp.prediction,
            SingleOrBatch::Batch(vec![
                "negative".to_string(),
                "positive".to_string(),
                "neutral".to_string(),
                "positive".to_string(),
            ])
        );
        assert_eq!(resp.distribution.positive, 0.5);
        assert_eq!(resp.distribution.negative, 0.25);
        assert_eq!(resp.distribution.neutral, 0.25);
    }

    #[test]
    fn test_empty_input_checked_before_artifacts() {
        let err = ServiceState::without_artifacts().classify(&[]).unwrap_err();
        assert!(matches!(err, PredictError::NoInputProvided));

        let err = ServiceState::without_artifacts()
            .classify(&["hello".to_string()])
            .unwrap_err();
        assert!(matches!(err, PredictError::ArtifactsUnavailable));
    }

    #[test]
    fn test_missing_artifact_files() {
        let config = ServiceConfig {
            vectorizer_path: PathBuf::from("/nonexistent/vectorizer.json"),
            model_path: PathBuf::from("/nonexistent/model.json"),
            ..ServiceConfig::default()
        };
        let state = ServiceState::new(&config).unwrap();
        assert!(!state.artifacts_loaded());

        let strict = ServiceConfig {
            require_artifacts: true,
            ..config
        };
        assert!(ServiceState::new(&strict).is_err());
    }
}
