use std::fmt;

use crate::io_struct::Distribution;

/// Sentiment classes the classifier was trained on, keyed by raw label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Negative,
    Positive,
    Neutral,
}

impl Sentiment {
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(Sentiment::Negative),
            1 => Some(Sentiment::Positive),
            2 => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    pub fn label(&self) -> i64 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Positive => 1,
            Sentiment::Neutral => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable name for a raw label. Unknown labels pass through as their number.
pub fn label_name(label: i64) -> String {
    match Sentiment::from_label(label) {
        Some(sentiment) => sentiment.to_string(),
        None => label.to_string(),
    }
}

/// Fraction of labels falling into each sentiment. All zeros for no labels.
pub fn distribution(labels: &[i64]) -> Distribution {
    let total = labels.len();
    let fraction = |sentiment: Sentiment| {
        if total == 0 {
            return 0.0;
        }
        let count = labels.iter().filter(|&&l| l == sentiment.label()).count();
        count as f64 / total as f64
    };
    Distribution {
        positive: fraction(Sentiment::Positive),
        neutral: fraction(Sentiment::Neutral),
        negative: fraction(Sentiment::Negative),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_names() {
        assert_eq!(label_name(0), "negative");
        assert_eq!(label_name(1), "positive");
        assert_eq!(label_name(2), "neutral");
        assert_eq!(label_name(7), "7");
        assert_eq!(label_name(-1), "-1");
    }

    #[test]
    fn test_distribution_fractions() {
        let d = distribution(&[1, 1, 0, 2]);
        assert_eq!(d.positive, 0.5);
        assert_eq!(d.negative, 0.25);
        assert_eq!(d.neutral, 0.25);
        assert!((d.positive + d.neutral + d.negative - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_empty_is_zero() {
        let d = distribution(&[]);
        assert_eq!((d.positive, d.neutral, d.negative), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_unmapped_labels_count_toward_total_only() {
        let d = distribution(&[1, 9]);
        assert_eq!(d.positive, 0.5);
        assert_eq!(d.neutral + d.negative, 0.0);
    }
}
