#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod telemetry;

use clap::Parser;
use config::CliArgs;
use plume::GeneratorConfig;
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = GeneratorConfig::try_from(args.generator)?;

    init_telemetry()?;
    tracing::debug!(?config, "starting");

    let mut stdout = std::io::stdout().lock();
    commands::execute(args.command, &config, &mut stdout)
}
