//! terraval CLI.
//!
//! Invocation surface for the valuation pipeline: a single JSON request via
//! argument or stdin, exactly one JSON object on stdout. All diagnostics go
//! to stderr so the result stream stays machine-parseable.
//!
//! ```text
//! echo '{"latitude":13.08,"longitude":80.27,"satellite_data":{...}}' | terraval panel
//! terraval analyze --agent surveyor '{"latitude":13.08,...}'
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use terraval_core::{validate_request, AnalysisRequest, ModelVariant};
use terraval_runtime::{
    build_agent, build_agents, build_measurement_provider, resolve_metrics, Panel, RuntimeConfig,
};

#[derive(Parser)]
#[command(
    name = "terraval",
    about = "Multi-agent land valuation from satellite metrics, market search, and document verification",
    version
)]
struct Cli {
    /// Path to a YAML runtime configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single agent and print its opinion.
    Analyze {
        /// Which agent to run: appraiser, surveyor, or assessor.
        #[arg(long, default_value = "appraiser")]
        agent: String,

        /// Analysis request as JSON; read from stdin when omitted.
        request: Option<String>,
    },

    /// Run all three agents concurrently and print the aggregated report.
    Panel {
        /// Analysis request as JSON; read from stdin when omitted.
        request: Option<String>,
    },
}

fn read_request(argument: Option<String>) -> Result<AnalysisRequest> {
    let raw = match argument {
        Some(json) => json,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read request from stdin")?;
            buffer
        }
    };

    let value: serde_json::Value =
        serde_json::from_str(&raw).context("request is not valid JSON")?;

    if let Err(errors) = validate_request(&value) {
        bail!("request failed schema validation:\n  {}", errors.join("\n  "));
    }

    serde_json::from_value(value).context("request does not match the expected shape")
}

fn load_config(path: Option<&PathBuf>) -> Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(RuntimeConfig::default()),
    }
}

fn emit<T: serde::Serialize>(result: &T) -> Result<()> {
    // The one and only write to stdout.
    println!("{}", serde_json::to_string(result)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Analyze { agent, request } => {
            let variant: ModelVariant = agent.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let request = read_request(request)?;

            let measurement = build_measurement_provider(&config.measurement)
                .context("measurement provider misconfigured")?;
            let metrics = resolve_metrics(&request, measurement.as_ref())
                .await
                .context("satellite metrics unavailable")?;

            let agent = build_agent(variant, &config);
            let opinion = agent.analyze(&request, &metrics).await;
            emit(&opinion)
        }

        Command::Panel { request } => {
            let request = read_request(request)?;

            let mut panel = Panel::new(build_agents(&config));
            if let Some(provider) = build_measurement_provider(&config.measurement)
                .context("measurement provider misconfigured")?
            {
                panel = panel.with_measurement(provider);
            }

            let report = panel.run(&request).await.context("panel analysis failed")?;
            emit(&report)
        }
    }
}
