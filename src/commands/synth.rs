//! Synth command

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use ackbridge_common::yaml::to_yaml_multi;
use ackbridge_mappers::MapperRegistry;

use crate::config::SynthInput;
use crate::{Error, Result};

/// Chart name used when none is given
pub const DEFAULT_CHART_NAME: &str = "ackbridge";

#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Input document with resources, manifests and tokens
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Write manifests to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Chart name, used as the prefix of generated object names
    #[arg(long, env = "ACKBRIDGE_CHART", default_value = DEFAULT_CHART_NAME)]
    pub chart: String,

    /// Namespace for objects that do not set one
    #[arg(long, env = "ACKBRIDGE_NAMESPACE")]
    pub namespace: Option<String>,
}

pub fn run(args: SynthArgs) -> Result<()> {
    let input = SynthInput::load(&args.file)?;
    let rendered = synth(input, &args.chart, args.namespace.as_deref())?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &rendered).map_err(|e| Error::io(&path, e))?;
            info!(path = %path.display(), "Wrote manifests");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .map_err(|e| Error::io("<stdout>", e))?;
        }
    }
    Ok(())
}

/// Translate an input document into a multi-document YAML stream
pub fn synth(input: SynthInput, chart_name: &str, namespace: Option<&str>) -> Result<String> {
    let chart = input.into_chart(chart_name, namespace, MapperRegistry::with_defaults())?;
    let docs = chart.synth()?;
    Ok(to_yaml_multi(&docs)?)
}
