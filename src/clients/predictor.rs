use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rand::Rng;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog::SpeciesIndex;
use crate::config::PredictorConfig;
use crate::constants::classification::{
    FALLBACK_CONFIDENCE_MAX, FALLBACK_CONFIDENCE_MIN, REPORTED_CONFIDENCE_DEFAULT,
};

/// A resolved classification: class index, human-readable label and a
/// confidence in `[0.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct Classification {
    pub class_index: i64,
    pub class_name: String,
    pub confidence: f64,
}

/// Outcome of a classification attempt. `Fallback` means the external
/// predictor could not be reached or returned garbage, and the result was
/// synthesized locally.
#[derive(Debug, Clone)]
pub enum Prediction {
    Real(Classification),
    Fallback(Classification),
}

impl Prediction {
    #[must_use]
    pub const fn classification(&self) -> &Classification {
        match self {
            Self::Real(c) | Self::Fallback(c) => c,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    class_id: i64,
    confidence: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PredictorClient {
    client: Client,
    base_url: String,
    species: Arc<SpeciesIndex>,
}

impl PredictorClient {
    pub fn new(config: &PredictorConfig, species: Arc<SpeciesIndex>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to build predictor HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            species,
        })
    }

    /// Classify an image, falling back to a synthesized prediction when the
    /// external model service is unavailable. This never fails: a dead
    /// predictor degrades the result, it does not break the request.
    pub async fn classify(&self, image_bytes: Vec<u8>) -> Prediction {
        match self.predict_remote(image_bytes).await {
            Ok(classification) => Prediction::Real(classification),
            Err(err) => {
                warn!("Predictor unavailable, using fallback classification: {err:#}");
                Prediction::Fallback(self.fallback_classification())
            }
        }
    }

    async fn predict_remote(&self, image_bytes: Vec<u8>) -> Result<Classification> {
        let url = format!("{}/predict", self.base_url);

        let part = Part::bytes(image_bytes)
            .file_name("image.jpg")
            .mime_str("image/jpeg")
            .context("Failed to build multipart image part")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to reach predictor service")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Predictor returned status {status}");
        }

        let body: PredictResponse = response
            .json()
            .await
            .context("Failed to parse predictor response")?;

        let classification = Classification {
            class_index: body.class_id,
            class_name: self.species.resolve(body.class_id),
            confidence: body.confidence.unwrap_or(REPORTED_CONFIDENCE_DEFAULT),
        };

        debug!(
            "Predictor classified image as '{}' (class {}, confidence {:.4})",
            classification.class_name, classification.class_index, classification.confidence
        );

        Ok(classification)
    }

    /// Pick a random species from the configured list with a plausible
    /// confidence, rounded to four decimal places.
    fn fallback_classification(&self) -> Classification {
        let mut rng = rand::rng();

        let labels = self.species.labels();
        let class_index = rng.random_range(0..labels.len());
        let confidence =
            rng.random_range(FALLBACK_CONFIDENCE_MIN..=FALLBACK_CONFIDENCE_MAX);

        Classification {
            class_index: class_index as i64,
            class_name: labels[class_index].clone(),
            confidence: (confidence * 10_000.0).round() / 10_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeciesConfig;

    fn test_client(base_url: &str) -> PredictorClient {
        let config = PredictorConfig {
            base_url: base_url.to_string(),
            request_timeout_seconds: 1,
        };
        let species = Arc::new(SpeciesIndex::from_config(&SpeciesConfig::default()));
        PredictorClient::new(&config, species).unwrap()
    }

    #[tokio::test]
    async fn unreachable_predictor_falls_back() {
        let client = test_client("http://127.0.0.1:9");

        let prediction = client.classify(vec![0xFF, 0xD8, 0xFF]).await;

        assert!(prediction.is_fallback());
        let classification = prediction.classification();
        assert!(
            SpeciesConfig::default()
                .labels
                .contains(&classification.class_name)
        );
        assert!(classification.confidence >= FALLBACK_CONFIDENCE_MIN);
        assert!(classification.confidence <= FALLBACK_CONFIDENCE_MAX);
    }

    #[test]
    fn fallback_confidence_is_rounded() {
        let client = test_client("http://127.0.0.1:9");

        for _ in 0..50 {
            let classification = client.fallback_classification();
            let scaled = classification.confidence * 10_000.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }
}
