//! Panel orchestration: concurrent fan-out, deterministic fan-in.
//!
//! The three agents are mutually independent and run concurrently with no
//! shared mutable state; opinions are aggregated only after all return.
//! The satellite measurement is the one input with no substitute — its
//! failure aborts the whole analysis rather than feeding fabricated data
//! into every model.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use terraval_core::{
    consensus, AnalysisRequest, ConsensusOutcome, SatelliteMetrics, ValuationOpinion,
};

use crate::agents::ValuationAgent;
use crate::providers::{MeasurementProvider, ProviderError};

/// The panel refuses to aggregate fewer valid opinions than this.
pub const MIN_VALID_OPINIONS: usize = 2;

/// Errors that abort a panel run.
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("satellite measurement failed: {0}")]
    Measurement(#[from] ProviderError),

    #[error("no satellite data in request and no measurement provider configured")]
    NoMeasurement,

    #[error("insufficient valid opinions: {valid} of {total} agents responded")]
    InsufficientOpinions { valid: usize, total: usize },
}

/// The aggregated result of one panel run.
#[derive(Debug, Clone, Serialize)]
pub struct PanelReport {
    pub consensus: ConsensusOutcome,
    pub opinions: Vec<ValuationOpinion>,
    pub satellite_data: SatelliteMetrics,
    pub evaluated_at: DateTime<Utc>,
}

/// Resolve satellite metrics for a request.
///
/// Request-supplied metrics win; otherwise the measurement provider is
/// consulted. Failure is fatal — no synthetic data, ever.
pub async fn resolve_metrics(
    request: &AnalysisRequest,
    measurement: Option<&Arc<dyn MeasurementProvider>>,
) -> Result<SatelliteMetrics, PanelError> {
    if let Some(metrics) = request.satellite_data {
        return Ok(metrics);
    }

    let provider = measurement.ok_or(PanelError::NoMeasurement)?;
    tracing::info!(
        latitude = request.latitude,
        longitude = request.longitude,
        provider = provider.name(),
        "fetching satellite measurement"
    );
    Ok(provider.measure(request.latitude, request.longitude).await?)
}

pub struct Panel {
    agents: Vec<Arc<dyn ValuationAgent>>,
    measurement: Option<Arc<dyn MeasurementProvider>>,
}

impl Panel {
    pub fn new(agents: Vec<Arc<dyn ValuationAgent>>) -> Self {
        Self {
            agents,
            measurement: None,
        }
    }

    pub fn with_measurement(mut self, provider: Arc<dyn MeasurementProvider>) -> Self {
        self.measurement = Some(provider);
        self
    }

    /// Run every agent concurrently and aggregate their opinions.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<PanelReport, PanelError> {
        let metrics = resolve_metrics(request, self.measurement.as_ref()).await?;
        tracing::info!(
            area_sqm = metrics.area_sqm,
            ndvi = metrics.ndvi,
            cloud_coverage = metrics.cloud_coverage,
            "satellite metrics resolved"
        );

        let opinions: Vec<ValuationOpinion> = join_all(
            self.agents
                .iter()
                .map(|agent| agent.analyze(request, &metrics)),
        )
        .await;

        for opinion in &opinions {
            match &opinion.error {
                Some(error) => {
                    tracing::warn!(agent = %opinion.agent, error = %error, "agent failed")
                }
                None => tracing::info!(
                    agent = %opinion.agent,
                    valuation = opinion.valuation,
                    confidence = opinion.confidence,
                    "agent opinion received"
                ),
            }
        }

        let valid = opinions.iter().filter(|o| o.is_valid()).count();
        if valid < MIN_VALID_OPINIONS {
            return Err(PanelError::InsufficientOpinions {
                valid,
                total: opinions.len(),
            });
        }

        let outcome = consensus(&opinions).ok_or(PanelError::InsufficientOpinions {
            valid: 0,
            total: opinions.len(),
        })?;

        tracing::info!(
            final_valuation = outcome.final_valuation,
            final_confidence = outcome.final_confidence,
            consensus_score = outcome.consensus_score,
            "consensus reached"
        );

        Ok(PanelReport {
            consensus: outcome,
            opinions,
            satellite_data: metrics,
            evaluated_at: Utc::now(),
        })
    }
}
