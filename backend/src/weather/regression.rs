use std::{fs::File, io, io::Read, path::Path};

use serde::Deserialize;
use thiserror::Error;

use super::FeatureVector;
use crate::models::Prediction;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid model definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model {model} has {features} feature(s) but {coefficients} coefficient(s)")]
    LengthMismatch {
        model: &'static str,
        features: usize,
        coefficients: usize,
    },
    #[error("model {0} has no features")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegressionModel {
    features: Vec<String>,
    coefficients: Vec<f64>,
    #[serde(default)]
    intercept: f64,
}

impl RegressionModel {
    /// A feature the vector does not carry contributes 0.
    pub fn predict(&self, input: &FeatureVector) -> f64 {
        self.features
            .iter()
            .zip(&self.coefficients)
            .map(|(name, coef)| coef * input.get(name).unwrap_or(0.0))
            .sum::<f64>()
            + self.intercept
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    fn validate(&self, model: &'static str) -> Result<(), ModelError> {
        if self.features.is_empty() {
            return Err(ModelError::Empty(model));
        }
        if self.features.len() != self.coefficients.len() {
            return Err(ModelError::LengthMismatch {
                model,
                features: self.features.len(),
                coefficients: self.coefficients.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSet {
    pub vvn: RegressionModel,
    pub vvx: RegressionModel,
    pub cloud_base: RegressionModel,
}

impl ModelSet {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let set: Self = serde_json::from_reader(reader)?;
        set.vvn.validate("vvn")?;
        set.vvx.validate("vvx")?;
        set.cloud_base.validate("cloud_base")?;
        Ok(set)
    }

    pub fn predict(&self, input: &FeatureVector) -> Prediction {
        Prediction {
            vvn: self.vvn.predict(input),
            vvx: self.vvx.predict(input),
            cloud_base: self.cloud_base.predict(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::Observation;
    use std::io::Write;

    fn model(json: &str) -> RegressionModel {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn unknown_features_count_as_zero() {
        let m = model(r#"{"features": ["TN", "visibility_km"], "coefficients": [2.0, 100.0], "intercept": 0.5}"#);
        let obs = Observation {
            temp: 3.0,
            ..Observation::default()
        };
        let input = FeatureVector::from_observation(&obs, 6);
        assert_eq!(m.predict(&input), 6.5);
    }

    #[test]
    fn rejects_length_mismatch() {
        let json = r#"{
            "vvn": {"features": ["TN"], "coefficients": [1.0]},
            "vvx": {"features": ["TN", "UX"], "coefficients": [1.0]},
            "cloud_base": {"features": ["TN"], "coefficients": [1.0]}
        }"#;
        let err = ModelSet::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::LengthMismatch {
                model: "vvx",
                features: 2,
                coefficients: 1
            }
        ));
    }

    #[test]
    fn rejects_empty_model() {
        let json = r#"{
            "vvn": {"features": [], "coefficients": []},
            "vvx": {"features": ["TN"], "coefficients": [1.0]},
            "cloud_base": {"features": ["TN"], "coefficients": [1.0]}
        }"#;
        assert!(matches!(
            ModelSet::from_reader(json.as_bytes()),
            Err(ModelError::Empty("vvn"))
        ));
    }

    #[test]
    fn bundled_models_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(include_bytes!("../../data/models.json"))
            .unwrap();
        let set = ModelSet::from_path(file.path()).unwrap();
        assert!(set.cloud_base.features().contains(&"dew_point".to_string()));
    }

    #[test]
    fn missing_model_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelSet::from_path(dir.path().join("absent.json")),
            Err(ModelError::Io(_))
        ));
    }
}
