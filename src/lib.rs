//! ackbridge - translate CloudFormation resource definitions into ACK custom resources
//!
//! The heavy lifting lives in the workspace crates:
//!
//! - `ackbridge-common` - source stacks, target charts, tokens, errors, logging
//! - `ackbridge-mappers` - per-type mappers and the registry that holds them
//! - `ackbridge-adapter` - reference resolution, export binding, attribute rewriting
//!
//! This crate is the `ackbridge` command line front end.

pub mod commands;
pub mod config;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

use ackbridge_common::telemetry::{LogFormat, TelemetryConfig};

/// ackbridge - CloudFormation to ACK translator
#[derive(Parser, Debug)]
#[command(name = "ackbridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log line format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate an input document into Kubernetes manifests
    Synth(commands::synth::SynthArgs),
    /// List the supported CloudFormation resource types
    Mappers(commands::mappers::MappersArgs),
}

impl Cli {
    /// Logging settings from the global flags
    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            level: self.log_level.clone(),
            format: self.log_format,
        }
    }

    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Synth(args) => commands::synth::run(args),
            Commands::Mappers(args) => commands::mappers::run(args),
        }
    }
}
