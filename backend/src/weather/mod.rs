//! Live observations in, VVN / VVX / cloud base out.
//!
//! Observations come either from the Weerlive API or from a snapshot file;
//! predictions are pre-fitted linear models evaluated over a fixed set of
//! named features.

pub mod features;
pub mod observation;
pub mod regression;

use std::io;

use chrono::{Datelike, Local};
use thiserror::Error;

use crate::models::Prediction;

pub use features::FeatureVector;
pub use observation::{Observation, ObservationSource, ObservationTable, WeerliveClient};
pub use regression::{ModelError, ModelSet, RegressionModel};

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather service returned status {0}")]
    Status(u16),
    #[error("weather service returned no observation for {0:?}")]
    NoObservation(String),
    #[error("no snapshot observation for {0:?}")]
    UnknownLocation(String),
    #[error("invalid observation payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read observations: {0}")]
    Io(#[from] io::Error),
    #[error("model produced a non-finite {0}")]
    NonFinite(&'static str),
}

pub struct WeatherService {
    source: ObservationSource,
    models: ModelSet,
}

impl WeatherService {
    pub fn new(source: ObservationSource, models: ModelSet) -> Self {
        Self { source, models }
    }

    /// Predicts for the current local month. Cloud base is in hectometres.
    pub async fn predict(&self, location: &str) -> Result<Prediction, WeatherError> {
        self.predict_for_month(location, Local::now().month()).await
    }

    pub async fn predict_for_month(
        &self,
        location: &str,
        month: u32,
    ) -> Result<Prediction, WeatherError> {
        let observation = self.source.fetch(location).await?;
        let features = FeatureVector::from_observation(&observation, month);
        let prediction = self.models.predict(&features);
        for (name, value) in [
            ("VVN", prediction.vvn),
            ("VVX", prediction.vvx),
            ("cloud_base", prediction.cloud_base),
        ] {
            if !value.is_finite() {
                return Err(WeatherError::NonFinite(name));
            }
        }
        Ok(prediction)
    }
}
