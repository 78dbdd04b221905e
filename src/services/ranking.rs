use std::{collections::HashMap, path::Path};

use serde::Deserialize;

/// Errors raised while loading or querying a ranking model
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("factor length mismatch: user has {user}, item has {item}")]
    DimensionMismatch { user: usize, item: usize },

    #[error("non-finite estimate")]
    NonFinite,
}

/// Output of a single model prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prediction {
    /// Full prediction carrying an estimate
    Estimate { est: f64 },
    /// Bare score
    Scalar(f64),
}

impl Prediction {
    /// Preference score, preferring `est` when the prediction carries one
    pub fn score(&self) -> Result<f64, ModelError> {
        let value = match self {
            Prediction::Estimate { est } => *est,
            Prediction::Scalar(value) => *value,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ModelError::NonFinite)
        }
    }
}

/// Externally trained model estimating how much a user likes an item
#[cfg_attr(test, mockall::automock)]
pub trait RankingModel: Send + Sync {
    fn predict(&self, user_id: &str, item_id: &str) -> Result<Prediction, ModelError>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Factors {
    #[serde(default)]
    pub bias: f64,
    #[serde(default)]
    pub factors: Vec<f64>,
}

/// Biased matrix-factorization model stored as JSON
///
/// Prediction is `global_mean + item.bias`, plus `user.bias + user · item`
/// when the user is known, clipped to `rating_scale` if one is given.
#[derive(Debug, Clone, Deserialize)]
pub struct FactorModel {
    pub global_mean: f64,
    #[serde(default)]
    pub rating_scale: Option<(f64, f64)>,
    #[serde(default)]
    pub users: HashMap<String, Factors>,
    #[serde(default)]
    pub items: HashMap<String, Factors>,
}

impl FactorModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path)?;
        let model: FactorModel = serde_json::from_str(&contents)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if !self.global_mean.is_finite() {
            return Err(ModelError::Invalid("global_mean is not finite".to_string()));
        }
        if let Some((min, max)) = self.rating_scale {
            if min.is_nan() || max.is_nan() || min > max {
                return Err(ModelError::Invalid(format!(
                    "rating_scale [{}, {}] is empty",
                    min, max
                )));
            }
        }
        if self.items.is_empty() {
            return Err(ModelError::Invalid("model has no items".to_string()));
        }
        Ok(())
    }
}

impl RankingModel for FactorModel {
    fn predict(&self, user_id: &str, item_id: &str) -> Result<Prediction, ModelError> {
        let item = self
            .items
            .get(item_id)
            .ok_or_else(|| ModelError::UnknownItem(item_id.to_string()))?;

        let mut est = self.global_mean + item.bias;
        if let Some(user) = self.users.get(user_id) {
            if user.factors.len() != item.factors.len() {
                return Err(ModelError::DimensionMismatch {
                    user: user.factors.len(),
                    item: item.factors.len(),
                });
            }
            est += user.bias;
            est += user
                .factors
                .iter()
                .zip(&item.factors)
                .map(|(u, i)| u * i)
                .sum::<f64>();
        }

        if let Some((min, max)) = self.rating_scale {
            est = est.clamp(min, max);
        }

        let prediction = Prediction::Estimate { est };
        prediction.score()?;
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MODEL_JSON: &str = r#"{
        "global_mean": 3.5,
        "rating_scale": [0.5, 5.0],
        "users": {
            "jane": {"bias": 0.25, "factors": [1.0, 0.5]}
        },
        "items": {
            "1": {"bias": 0.0, "factors": [0.5, 1.0]},
            "2": {"bias": -1.0, "factors": [-1.0, 0.0]},
            "3": {"bias": 2.0, "factors": [2.0, 2.0]},
            "4": {"bias": 0.0, "factors": [1.0]}
        }
    }"#;

    fn model() -> FactorModel {
        serde_json::from_str(MODEL_JSON).unwrap()
    }

    #[test]
    fn test_known_user_prediction() {
        let prediction = model().predict("jane", "1").unwrap();
        // 3.5 + 0.0 + 0.25 + (0.5 + 0.5)
        assert_eq!(prediction.score().unwrap(), 4.75);
    }

    #[test]
    fn test_prediction_is_clipped() {
        let prediction = model().predict("jane", "3").unwrap();
        assert_eq!(prediction.score().unwrap(), 5.0);
    }

    #[test]
    fn test_unknown_user_uses_item_baseline() {
        let prediction = model().predict("stranger", "2").unwrap();
        assert_eq!(prediction, Prediction::Estimate { est: 2.5 });
    }

    #[test]
    fn test_unknown_item_fails() {
        assert!(matches!(
            model().predict("jane", "99"),
            Err(ModelError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_factor_mismatch_fails() {
        assert!(matches!(
            model().predict("jane", "4"),
            Err(ModelError::DimensionMismatch { user: 2, item: 1 })
        ));
    }

    #[test]
    fn test_scalar_and_non_finite_scores() {
        assert_eq!(Prediction::Scalar(0.75).score().unwrap(), 0.75);
        assert!(Prediction::Scalar(f64::NAN).score().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MODEL_JSON.as_bytes()).unwrap();
        let loaded = FactorModel::load(file.path()).unwrap();
        assert_eq!(loaded.items.len(), 4);
    }

    #[test]
    fn test_load_rejects_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95 not json").unwrap();
        assert!(FactorModel::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_empty_scale() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"global_mean": 3.0, "rating_scale": [5.0, 1.0], "items": {"1": {}}}"#)
            .unwrap();
        assert!(matches!(
            FactorModel::load(file.path()),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FactorModel::load(Path::new("/nonexistent/model.json")),
            Err(ModelError::Io(_))
        ));
    }
}
