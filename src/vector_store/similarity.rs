//! Similarity metrics over embedding vectors
//!
//! Every metric yields a score where higher means more similar, so results
//! from any metric sort with the same comparator.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Similarity metrics supported by the vector store
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    #[default]
    Cosine,
    Euclidean,
    Dot,
}

impl SimilarityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Euclidean => "euclidean",
            SimilarityMetric::Dot => "dot",
        }
    }

    /// Score two vectors of equal length
    pub fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            SimilarityMetric::Cosine => cosine_similarity(a, b),
            SimilarityMetric::Euclidean => 1.0 / (1.0 + euclidean_distance(a, b)),
            SimilarityMetric::Dot => dot_product(a, b),
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(SimilarityMetric::Cosine),
            "euclidean" | "l2" => Ok(SimilarityMetric::Euclidean),
            "dot" | "dot_product" => Ok(SimilarityMetric::Dot),
            other => Err(format!("unknown similarity metric '{}'", other)),
        }
    }
}

/// Accepts the same names as [`FromStr`], so config, HTTP and CLI agree
impl<'de> Deserialize<'de> for SimilarityMetric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity; an all-zero vector scores 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return 0.0;
    }
    dot_product(a, b) / denom
}

pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_cosine() {
        assert!(approx(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0));
        assert!(approx(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0));
        assert!(approx(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0));
        assert!(approx(cosine_similarity(&[3.0, 4.0], &[6.0, 8.0]), 1.0));
    }

    #[test]
    fn test_cosine_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_euclidean_score() {
        let metric = SimilarityMetric::Euclidean;
        assert!(approx(metric.score(&[1.0, 1.0], &[1.0, 1.0]), 1.0));
        // distance 5 -> 1 / 6
        assert!(approx(metric.score(&[0.0, 0.0], &[3.0, 4.0]), 1.0 / 6.0));
    }

    #[test]
    fn test_dot_score() {
        assert!(approx(SimilarityMetric::Dot.score(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0));
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!("Cosine".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Cosine);
        assert_eq!("euclidean".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Euclidean);
        assert_eq!("dot".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Dot);
        assert!("manhattan".parse::<SimilarityMetric>().is_err());
    }

    #[test]
    fn test_deserialize_matches_from_str() {
        for (name, metric) in [
            ("\"Cosine\"", SimilarityMetric::Cosine),
            ("\"l2\"", SimilarityMetric::Euclidean),
            ("\"EUCLIDEAN\"", SimilarityMetric::Euclidean),
            ("\"dot_product\"", SimilarityMetric::Dot),
        ] {
            assert_eq!(serde_json::from_str::<SimilarityMetric>(name).unwrap(), metric);
        }
        assert!(serde_json::from_str::<SimilarityMetric>("\"manhattan\"").is_err());
        assert_eq!(serde_json::to_string(&SimilarityMetric::Dot).unwrap(), "\"dot\"");
    }
}
