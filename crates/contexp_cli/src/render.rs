//! Output formats for a finished scan.

use anyhow::{Context, Result};
use clap::ValueEnum;
use contexp_core::{Classification, ScanMetadata, ScanResult};
use serde::Serialize;
use std::fmt::{Display, LowerExp};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Header plus whitespace-separated codes, one row per line.
    #[default]
    Text,
    /// Comment-prefixed metadata followed by comma-separated rows.
    Csv,
    /// Metadata and codes as one JSON document.
    Json,
}

const CSV_FORMAT_VERSION: &str = "2.0";

pub fn write_result<T>(
    format: OutputFormat,
    result: &ScanResult<T>,
    include_kinds: bool,
    out: &mut dyn Write,
) -> Result<()>
where
    T: Display + LowerExp + Serialize,
{
    match format {
        OutputFormat::Text => write_text(result, out),
        OutputFormat::Csv => write_csv(result, out),
        OutputFormat::Json => write_json(result, include_kinds, out),
    }
    .context("Failed to write scan output")
}

fn write_text<T: Display>(result: &ScanResult<T>, out: &mut dyn Write) -> Result<()> {
    let meta = &result.metadata;
    writeln!(
        out,
        "calcMField [{}, {}][{}, {}]",
        meta.min_re, meta.max_re, meta.min_im, meta.max_im
    )?;
    writeln!(out, "d(Re)={} d(Im)={}", meta.step_re, meta.step_im)?;
    for row in result.grid.rows() {
        let line: Vec<String> = row.iter().map(|c| c.code().to_string()).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

fn write_csv_header<T: Display + LowerExp>(
    meta: &ScanMetadata<T>,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "# Continued Exponential Calculator Output")?;
    writeln!(out, "# Format Version: {CSV_FORMAT_VERSION}")?;
    writeln!(
        out,
        "# Grid Range: [{:.3}, {:.3}] x [{:.3}, {:.3}]",
        meta.min_re, meta.max_re, meta.min_im, meta.max_im
    )?;
    writeln!(out, "# Resolution: {}x{}", meta.num_re, meta.num_im)?;
    writeln!(out, "# Step: d(Re)={} d(Im)={}", meta.step_re, meta.step_im)?;
    writeln!(
        out,
        "# Parameters: eps={:.6e}, vector_length={}, max_lookback={}",
        meta.eps, meta.vector_length, meta.max_lookback
    )?;
    writeln!(
        out,
        "# Data Format: Each row represents one scan line of the complex plane"
    )?;
    writeln!(
        out,
        "# Values: positive=cycle_length or steps_to_zero, 0=no_cycle, -1=divergence/NaN"
    )?;
    Ok(())
}

fn write_csv<T: Display + LowerExp>(result: &ScanResult<T>, out: &mut dyn Write) -> Result<()> {
    write_csv_header(&result.metadata, out)?;
    for row in result.grid.rows() {
        let line: Vec<String> = row.iter().map(|c| c.code().to_string()).collect();
        writeln!(out, "{}", line.join(","))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonPayload<'a, T> {
    metadata: &'a ScanMetadata<T>,
    codes: Vec<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kinds: Option<Vec<&'a [Classification]>>,
}

fn write_json<T: Serialize>(
    result: &ScanResult<T>,
    include_kinds: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let payload = JsonPayload {
        metadata: &result.metadata,
        codes: result.grid.codes(),
        kinds: include_kinds.then(|| result.grid.rows().collect()),
    };
    serde_json::to_writer_pretty(&mut *out, &payload).context("Serialization error")?;
    writeln!(out)?;
    Ok(())
}
