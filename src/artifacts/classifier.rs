use serde::{Deserialize, Serialize};

use super::ArtifactError;
use super::vectorizer::SparseRow;

/// A fitted model mapping sparse feature rows to integer class labels.
///
/// Implementations are tagged by `kind` in the exported JSON so the loader can
/// pick the decision function without knowing it up front.
#[typetag::serde(tag = "kind")]
pub trait Classifier: std::fmt::Debug + Send + Sync {
    fn classes(&self) -> &[i64];

    fn n_features(&self) -> usize;

    /// Checks the shapes of the fitted parameters.
    fn validate(&self) -> Result<(), ArtifactError>;

    /// One score per row of the decision matrix.
    fn decision_function(&self, row: &SparseRow) -> Vec<f64>;

    fn predict_one(&self, row: &SparseRow) -> i64 {
        let scores = self.decision_function(row);
        self.classes()[argmax(&scores)]
    }

    fn predict(&self, rows: &[SparseRow]) -> Vec<i64> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}

/// Index of the first maximal score.
pub fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}

fn sparse_dot(weights: &[f64], row: &SparseRow) -> f64 {
    row.iter().map(|&(index, value)| weights[index] * value).sum()
}

/// Returns the shared row width, failing on ragged or empty matrices.
fn matrix_width(name: &str, matrix: &[Vec<f64>]) -> Result<usize, ArtifactError> {
    let width = match matrix.first() {
        Some(row) => row.len(),
        None => return Err(ArtifactError::Invalid(format!("{} has no rows", name))),
    };
    if let Some((i, row)) = matrix.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(ArtifactError::Invalid(format!(
            "{} row {} has {} columns, expected {}",
            name,
            i,
            row.len(),
            width
        )));
    }
    Ok(width)
}

/// Linear decision function shared by logistic regression and linear SVMs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    classes: Vec<i64>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearModel {
    pub fn new(
        classes: Vec<i64>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    ) -> Result<Self, ArtifactError> {
        let model = LinearModel {
            classes,
            coef,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    fn is_binary(&self) -> bool {
        self.coef.len() == 1 && self.classes.len() == 2
    }
}

#[typetag::serde(name = "linear")]
impl Classifier for LinearModel {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        matrix_width("coef", &self.coef)?;
        if self.intercept.len() != self.coef.len() {
            return Err(ArtifactError::Invalid(format!(
                "intercept has {} entries but coef has {} rows",
                self.intercept.len(),
                self.coef.len()
            )));
        }
        if !self.is_binary() && self.coef.len() != self.classes.len() {
            return Err(ArtifactError::Invalid(format!(
                "coef has {} rows but there are {} classes",
                self.coef.len(),
                self.classes.len()
            )));
        }
        Ok(())
    }

    fn decision_function(&self, row: &SparseRow) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(weights, bias)| sparse_dot(weights, row) + bias)
            .collect()
    }

    fn predict_one(&self, row: &SparseRow) -> i64 {
        let scores = self.decision_function(row);
        if self.is_binary() {
            if scores[0] > 0.0 {
                self.classes[1]
            } else {
                self.classes[0]
            }
        } else {
            self.classes[argmax(&scores)]
        }
    }
}

/// Multinomial naive Bayes: joint log likelihood over the TF-IDF row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    classes: Vec<i64>,
    feature_log_prob: Vec<Vec<f64>>,
    class_log_prior: Vec<f64>,
}

impl MultinomialNb {
    pub fn new(
        classes: Vec<i64>,
        feature_log_prob: Vec<Vec<f64>>,
        class_log_prior: Vec<f64>,
    ) -> Result<Self, ArtifactError> {
        let model = MultinomialNb {
            classes,
            feature_log_prob,
            class_log_prior,
        };
        model.validate()?;
        Ok(model)
    }
}

#[typetag::serde(name = "multinomial_nb")]
impl Classifier for MultinomialNb {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        matrix_width("feature_log_prob", &self.feature_log_prob)?;
        if self.feature_log_prob.len() != self.classes.len()
            || self.class_log_prior.len() != self.classes.len()
        {
            return Err(ArtifactError::Invalid(format!(
                "{} classes, {} feature_log_prob rows, {} class_log_prior entries",
                self.classes.len(),
                self.feature_log_prob.len(),
                self.class_log_prior.len()
            )));
        }
        Ok(())
    }

    fn decision_function(&self, row: &SparseRow) -> Vec<f64> {
        self.feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(log_prob, prior)| sparse_dot(log_prob, row) + prior)
            .collect()
    }
}
