//! # terraval-runtime
//!
//! Provider integrations and valuation agents for terraval.
//!
//! `terraval-core` is fully deterministic and never touches the network;
//! this crate supplies everything that does:
//! - the three capability boundaries (text reasoning, comparable-price
//!   search, satellite measurement), each an injectable trait object built
//!   from configuration
//! - the market aggregator that turns search results into a market signal
//! - the three valuation agents and the panel orchestrator that runs them
//!   concurrently and aggregates their opinions
//!
//! ## Degradation policy
//!
//! Within one agent every external call is wrapped so failures degrade
//! locally: an unreachable search provider means "no market signal", an
//! unreachable reasoning provider means canned prose and a locally screened
//! document verdict. Only a satellite-measurement failure aborts an
//! analysis, because no substitute data exists that would not corrupt every
//! downstream valuation.

pub mod agents;
pub mod config;
pub mod market;
pub mod orchestrator;
pub mod prompts;
pub mod providers;

// Re-export main types at crate root
pub use agents::{build_agent, build_agents, Appraiser, Assessor, FailedAgent, Surveyor, ValuationAgent};
pub use config::{ConfigError, MeasurementConfig, ReasoningConfig, RuntimeConfig, SearchConfig};
pub use market::MarketAggregator;
pub use orchestrator::{resolve_metrics, Panel, PanelError, PanelReport, MIN_VALID_OPINIONS};
pub use providers::{
    build_measurement_provider, build_reasoning_provider, build_search_provider, ApiCredential,
    ChatCompletionsProvider, CredentialSource, CustomSearchProvider, EarthObservationClient,
    MeasurementProvider, ProviderError, ReasoningProvider, ResponseFormat, SearchHit,
    SearchProvider,
};
