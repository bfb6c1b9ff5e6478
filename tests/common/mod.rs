// Shared by several integration test crates
#![allow(dead_code)]

use sentiment_api::artifacts::{Artifacts, Classifier, TfidfVectorizer};
use sentiment_api::state::ServiceState;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub const BOUNDARY: &str = "----sentiment-test-boundary";

/// Five-term vocabulary: love/great lean positive, hate/awful negative, okay neutral.
pub fn vectorizer_json() -> Value {
    json!({
        "vocabulary": {"love": 0, "great": 1, "hate": 2, "awful": 3, "okay": 4},
        "idf": [1.2, 1.5, 1.2, 1.8, 1.1],
        "lowercase": true,
        "token_pattern": "(?u)\\b\\w\\w+\\b",
        "ngram_range": [1, 1],
        "norm": "l2",
        "sublinear_tf": false
    })
}

/// Texts without known terms fall to the neutral intercept.
pub fn classifier_json() -> Value {
    json!({
        "kind": "linear",
        "classes": [0, 1, 2],
        "coef": [
            [0.0, 0.0, 1.0, 1.0, 0.0],
            [1.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 1.0]
        ],
        "intercept": [0.0, 0.0, 0.1]
    })
}

pub fn toy_artifacts() -> Artifacts {
    let vectorizer: TfidfVectorizer =
        serde_json::from_value(vectorizer_json()).expect("fixture vectorizer");
    let classifier: Box<dyn Classifier> =
        serde_json::from_value(classifier_json()).expect("fixture classifier");
    Artifacts::new(vectorizer, classifier).expect("fixture artifacts agree")
}

pub fn toy_state() -> ServiceState {
    ServiceState::with_artifacts(toy_artifacts())
}

/// Writes both fixture artifacts into `dir`, returning (vectorizer, model) paths.
pub fn write_artifacts(dir: &Path) -> (PathBuf, PathBuf) {
    let vectorizer_path = dir.join("tfidf_vectorizer.json");
    let model_path = dir.join("sentiment_model.json");
    std::fs::write(&vectorizer_path, vectorizer_json().to_string()).unwrap();
    std::fs::write(&model_path, classifier_json().to_string()).unwrap();
    (vectorizer_path, model_path)
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, content) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
