//! Command-line arguments and the scan parameter fallback chain.

use crate::render::OutputFormat;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use contexp_core::{
    RegionSpec, Scalar, DEFAULT_EPS, DEFAULT_MAX_LOOKBACK, DEFAULT_VECTOR_LENGTH,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "contexp",
    about = "Classifies the continued exponential F(n) = exp(z * F(n-1)) over a region of the complex plane",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a rectangle and print the grid of classification codes.
    Scan(ScanArgs),
    /// Print the iterates at a single point.
    Probe(ProbeArgs),
    /// Print precision and range of the available scalar types.
    Limits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Precision {
    /// IEEE double (53-bit significand).
    Double,
    /// Double-double (106-bit significand).
    #[default]
    DoubleDouble,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// MIN_RE MAX_RE MIN_IM MAX_IM [NUM_RE NUM_IM [EPS [VECTOR_LENGTH]]]
    #[arg(value_name = "PARAM", num_args = 0..=8, allow_negative_numbers = true)]
    pub params: Vec<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, value_enum, default_value_t = Precision::DoubleDouble)]
    pub precision: Precision,

    /// How far back the cycle detector searches.
    #[arg(long)]
    pub max_lookback: Option<usize>,

    /// JSON file with any subset of the scan parameters.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the grid here instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Include the classification kind of every cell (JSON only).
    #[arg(long)]
    pub kinds: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Real part of z.
    #[arg(allow_negative_numbers = true, default_value_t = -2.475409836065573771)]
    pub re: f64,

    /// Imaginary part of z.
    #[arg(allow_negative_numbers = true, default_value_t = 4.175609756097561132)]
    pub im: f64,

    /// Number of iterates to compute.
    #[arg(long, default_value_t = 10)]
    pub length: usize,

    #[arg(long, value_enum, default_value_t = Precision::DoubleDouble)]
    pub precision: Precision,
}

/// Fully resolved scan parameters, in f64 as read from the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParameters {
    pub min_re: f64,
    pub max_re: f64,
    pub min_im: f64,
    pub max_im: f64,
    pub num_re: usize,
    pub num_im: usize,
    pub eps: f64,
    pub vector_length: usize,
    pub max_lookback: usize,
}

impl Default for ScanParameters {
    fn default() -> Self {
        let region = RegionSpec::<f64>::default();
        Self {
            min_re: region.min_re,
            max_re: region.max_re,
            min_im: region.min_im,
            max_im: region.max_im,
            num_re: region.num_re,
            num_im: region.num_im,
            eps: DEFAULT_EPS,
            vector_length: DEFAULT_VECTOR_LENGTH,
            max_lookback: DEFAULT_MAX_LOOKBACK,
        }
    }
}

/// How the positional parameters were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// At least the four bounds were given.
    Explicit,
    /// Fewer than four values; `partial` when some but not all bounds were given.
    Defaults { partial: bool },
}

impl ScanParameters {
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Applies `MIN_RE MAX_RE MIN_IM MAX_IM [NUM_RE NUM_IM [EPS [VECTOR_LENGTH]]]`
    /// on top of `self`. Each group is only read once the previous group is
    /// complete; with fewer than four values nothing is applied.
    pub fn apply_positional(mut self, values: &[f64]) -> Result<(Self, Resolution)> {
        if values.len() < 4 {
            return Ok((
                self,
                Resolution::Defaults {
                    partial: !values.is_empty(),
                },
            ));
        }
        if values.len() > 8 {
            bail!("Expected at most 8 parameters, got {}.", values.len());
        }

        self.min_re = values[0];
        self.max_re = values[1];
        self.min_im = values[2];
        self.max_im = values[3];

        if values.len() == 5 {
            warn!("NUM_RE given without NUM_IM; keeping {}x{} ticks", self.num_re, self.num_im);
        }
        if values.len() >= 6 {
            self.num_re = to_count(values[4], "NUM_RE")?;
            self.num_im = to_count(values[5], "NUM_IM")?;
        }
        if let Some(&eps) = values.get(6) {
            self.eps = eps;
        }
        if let Some(&length) = values.get(7) {
            self.vector_length = to_count(length, "VECTOR_LENGTH")?;
            if self.vector_length == 0 {
                bail!("VECTOR_LENGTH must be at least 1.");
            }
        }

        Ok((self, Resolution::Explicit))
    }

    pub fn region<T: Scalar>(&self) -> Result<RegionSpec<T>> {
        let cast = |value: f64, name: &str| {
            T::from_f64(value).with_context(|| format!("{name}={value} is not representable"))
        };
        Ok(RegionSpec {
            min_re: cast(self.min_re, "min_re")?,
            max_re: cast(self.max_re, "max_re")?,
            min_im: cast(self.min_im, "min_im")?,
            max_im: cast(self.max_im, "max_im")?,
            num_re: self.num_re,
            num_im: self.num_im,
            eps: cast(self.eps, "eps")?,
            max_lookback: self.max_lookback,
        })
    }

    fn usage(&self) -> String {
        format!(
            "Input of parameters via arguments: [min Real={}, max Real={}, min Imaginary={}, \
             max Imaginary={}], [ticks on real axis={}, ticks on imaginary axis={}], \
             [epsilon for cycle detection={:e}], [maximum steps at every point={}]",
            self.min_re,
            self.max_re,
            self.min_im,
            self.max_im,
            self.num_re,
            self.num_im,
            self.eps,
            self.vector_length
        )
    }
}

fn to_count(value: f64, name: &str) -> Result<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > usize::MAX as f64 {
        bail!("{name} must be a non-negative integer, got {value}.");
    }
    Ok(value as usize)
}

impl ScanArgs {
    /// Config file, then positionals, then flags.
    pub fn resolve(&self) -> Result<ScanParameters> {
        let base = match &self.config {
            Some(path) => ScanParameters::from_config_file(path)?,
            None => ScanParameters::default(),
        };

        let (mut params, resolution) = base.apply_positional(&self.params)?;
        match resolution {
            Resolution::Defaults { partial } => {
                if partial {
                    warn!("Error parsing parameters: using standard parameters");
                }
                info!("{}", params.usage());
            }
            Resolution::Explicit => {
                info!(
                    "Using eps={:e}, ticks on real/imag axis: ({}, {}), vector of length {}",
                    params.eps, params.num_re, params.num_im, params.vector_length
                );
            }
        }

        if let Some(lookback) = self.max_lookback {
            params.max_lookback = lookback;
        }
        Ok(params)
    }
}
