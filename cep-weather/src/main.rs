//! Binary crate for the `cep-weather` services.
//!
//! One executable, two services:
//! - `cep-weather edge`: validates the CEP and forwards it to the orchestrator
//! - `cep-weather orchestrator`: resolves the city and fetches its temperature

use clap::Parser;

mod cli;
mod edge;
mod error;
mod orchestrator;
mod routes;
mod server;
mod telemetry;

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run()
}
