//! Satellite measurement client.
//!
//! Thin HTTP client for a measurement service that resolves coordinates to
//! imagery-derived metrics. Responses are range-checked before they are
//! accepted: a provider returning nonsense fails the whole analysis rather
//! than feeding a corrupt area into every valuation model.

use async_trait::async_trait;
use std::time::Duration;

use terraval_core::SatelliteMetrics;

use super::{MeasurementProvider, ProviderError};
use crate::config::MeasurementConfig;

#[derive(Debug)]
pub struct EarthObservationClient {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl EarthObservationClient {
    pub fn from_config(config: &MeasurementConfig) -> Result<Self, ProviderError> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            ProviderError::NotConfigured("measurement endpoint not set".to_string())
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        Ok(Self {
            endpoint,
            timeout: config.timeout,
            client,
        })
    }
}

/// Reject out-of-range metrics before they reach any model.
fn validate(metrics: &SatelliteMetrics) -> Result<(), ProviderError> {
    if !metrics.area_sqm.is_finite() || metrics.area_sqm < 0.0 {
        return Err(ProviderError::InvalidMeasurement(format!(
            "area_sqm out of range: {}",
            metrics.area_sqm
        )));
    }
    if !metrics.ndvi.is_finite() || !(-1.0..=1.0).contains(&metrics.ndvi) {
        return Err(ProviderError::InvalidMeasurement(format!(
            "ndvi out of range: {}",
            metrics.ndvi
        )));
    }
    if !metrics.cloud_coverage.is_finite() || !(0.0..=100.0).contains(&metrics.cloud_coverage) {
        return Err(ProviderError::InvalidMeasurement(format!(
            "cloud_coverage out of range: {}",
            metrics.cloud_coverage
        )));
    }
    Ok(())
}

#[async_trait]
impl MeasurementProvider for EarthObservationClient {
    async fn measure(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<SatelliteMetrics, ProviderError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("latitude", latitude), ("longitude", longitude)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let metrics: SatelliteMetrics = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        validate(&metrics)?;
        Ok(metrics)
    }

    fn name(&self) -> &str {
        "earth-observation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_endpoint_fails() {
        let config = MeasurementConfig::default();
        assert!(matches!(
            EarthObservationClient::from_config(&config),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_validate_accepts_sane_metrics() {
        let metrics = SatelliteMetrics {
            area_sqm: 200.0,
            ndvi: 0.7,
            cloud_coverage: 5.0,
        };
        assert!(validate(&metrics).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_ndvi() {
        let metrics = SatelliteMetrics {
            area_sqm: 200.0,
            ndvi: 1.7,
            cloud_coverage: 5.0,
        };
        assert!(matches!(
            validate(&metrics),
            Err(ProviderError::InvalidMeasurement(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_area() {
        let metrics = SatelliteMetrics {
            area_sqm: -1.0,
            ndvi: 0.5,
            cloud_coverage: 5.0,
        };
        assert!(validate(&metrics).is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let metrics = SatelliteMetrics {
            area_sqm: f64::NAN,
            ndvi: 0.5,
            cloud_coverage: 5.0,
        };
        assert!(validate(&metrics).is_err());
    }
}
