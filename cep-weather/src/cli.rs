use std::{path::PathBuf, sync::Arc};

use cep_weather_core::{Config, HttpOrchestratorClient, WeatherService, provider};
use clap::{Parser, Subcommand};

use crate::{edge, orchestrator, server, telemetry};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cep-weather", version, about = "CEP to temperature services")]
pub struct Cli {
    /// Optional TOML config file; environment variables take precedence.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the edge validator.
    Edge {
        /// Listen port (default 8081).
        #[arg(long)]
        port: Option<u16>,

        /// Base URL of the lookup orchestrator.
        #[arg(long)]
        orchestrator_url: Option<String>,
    },

    /// Run the lookup orchestrator.
    Orchestrator {
        /// Listen port (default 8082).
        #[arg(long)]
        port: Option<u16>,

        /// Report a fixed 25 °C instead of calling the temperature provider.
        #[arg(long)]
        test_mode: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load(self.config.as_deref())?;

        match self.command {
            Command::Edge { port, orchestrator_url } => {
                if let Some(port) = port {
                    config.edge.port = port;
                }
                if let Some(url) = orchestrator_url {
                    config.edge.orchestrator_url = url;
                }

                let _telemetry = telemetry::init(&config.telemetry, "cep-edge")?;
                tracing::info!(orchestrator_url = %config.edge.orchestrator_url, "starting edge validator");

                let http = provider::http_client(config.http_timeout())?;
                let client = HttpOrchestratorClient::new(config.edge.orchestrator_url.clone(), http);

                server::run(edge::router(Arc::new(client)), config.edge.port)
            }
            Command::Orchestrator { port, test_mode } => {
                if let Some(port) = port {
                    config.orchestrator.port = port;
                }
                config.orchestrator.test_mode |= test_mode;

                let _telemetry = telemetry::init(&config.telemetry, "cep-orchestrator")?;
                tracing::info!(config = ?config.orchestrator, "starting lookup orchestrator");
                if config.orchestrator.test_mode {
                    tracing::info!("running in test mode");
                }

                let http = provider::http_client(config.http_timeout())?;
                let service = WeatherService::from_config(&config.orchestrator, http);

                server::run(orchestrator::router(Arc::new(service)), config.orchestrator.port)
            }
        }
    }
}
