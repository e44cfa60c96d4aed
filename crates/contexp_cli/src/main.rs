use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use contexp_core::{scan_region, DoubleDouble, Scalar};
use serde::Serialize;

mod args;
mod diagnostics;
mod render;

use args::{Cli, Command, Precision, ScanArgs, ScanParameters};

/// Classifies the continued exponential over a region of the complex plane.
///
/// Example:
///   contexp scan -1 0.5 2 3 40 40 --format csv -o field.csv
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scan(args) => run_scan(&args),
        Command::Probe(args) => with_stdout(|out| diagnostics::write_probe(&args, out)),
        Command::Limits => with_stdout(diagnostics::write_limits),
    }
}

fn with_stdout(body: impl FnOnce(&mut dyn Write) -> Result<()>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    body(&mut out)?;
    out.flush().context("Failed to flush stdout")
}

fn run_scan(args: &ScanArgs) -> Result<()> {
    let params = args.resolve()?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match args.precision {
        Precision::Double => scan_and_render::<f64>(&params, args, &mut out)?,
        Precision::DoubleDouble => scan_and_render::<DoubleDouble>(&params, args, &mut out)?,
    }
    out.flush().context("Failed to flush scan output")?;

    if let Some(path) = &args.output {
        log::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn scan_and_render<T>(params: &ScanParameters, args: &ScanArgs, out: &mut dyn Write) -> Result<()>
where
    T: Scalar + std::fmt::Display + std::fmt::LowerExp + Serialize,
{
    let region = params.region::<T>()?;
    let result = scan_region(&region, params.vector_length).context("Scan failed")?;
    if args.kinds && args.format != render::OutputFormat::Json {
        log::warn!("--kinds only applies to JSON output");
    }
    render::write_result(args.format, &result, args.kinds, out)
}
