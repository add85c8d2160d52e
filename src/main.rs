//! ackbridge CLI

use clap::Parser;

use ackbridge::{Cli, Result};
use ackbridge_common::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry(cli.telemetry_config())?;
    cli.run()
}
