use serde::{Deserialize, Serialize};

/// A scalar for exactly one item, an array otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SingleOrBatch<T> {
    Single(T),
    Batch(Vec<T>),
}

impl<T> SingleOrBatch<T> {
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() == 1 {
            if let Some(item) = items.pop() {
                return SingleOrBatch::Single(item);
            }
        }
        SingleOrBatch::Batch(items)
    }
}

pub type Prediction = SingleOrBatch<String>;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Distribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictResponse {
    pub prediction: Prediction,
    pub distribution: Distribution,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Fields of a url-encoded `/predict` form.
#[derive(Debug, Default, Deserialize)]
pub struct TextForm {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_prediction_serializes_as_scalar() {
        let resp = PredictResponse {
            prediction: Prediction::from_vec(vec!["positive".to_string()]),
            distribution: Distribution {
                positive: 1.0,
                neutral: 0.0,
                negative: 0.0,
            },
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "prediction": "positive",
                "distribution": {"positive": 1.0, "neutral": 0.0, "negative": 0.0}
            })
        );
    }

    #[test]
    fn test_batch_prediction_serializes_as_array() {
        let prediction = Prediction::from_vec(vec!["negative".to_string(), "neutral".to_string()]);
        assert_eq!(
            serde_json::to_value(&prediction).unwrap(),
            json!(["negative", "neutral"])
        );
    }
}
