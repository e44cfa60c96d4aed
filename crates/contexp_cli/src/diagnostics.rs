//! `limits` and `probe`: precision report and single-point iterate dump.

use crate::args::{Precision, ProbeArgs};
use anyhow::{bail, Result};
use contexp_core::sequence::FIRST_STORED_ITERATION;
use contexp_core::{generate, DoubleDouble, IterationBuffer, Scalar};
use num_complex::Complex;
use std::fmt::LowerExp;
use std::io::Write;

/// What `limits` reports about one scalar type.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarLimits {
    pub name: &'static str,
    pub mantissa_bits: u32,
    pub decimal_digits: u32,
    pub size_bytes: usize,
    pub epsilon: String,
    pub min_positive: String,
    pub max: String,
    pub has_infinity: bool,
    pub has_nan: bool,
    pub pi: String,
}

fn decimal_digits(mantissa_bits: u32) -> u32 {
    // floor((p - 1) * log10(2))
    ((mantissa_bits - 1) as f64 * std::f64::consts::LOG10_2).floor() as u32
}

fn limits_of<T: Scalar + LowerExp>(
    name: &'static str,
    mantissa_bits: u32,
    pi: T,
) -> ScalarLimits {
    let digits = decimal_digits(mantissa_bits);
    ScalarLimits {
        name,
        mantissa_bits,
        decimal_digits: digits,
        size_bytes: std::mem::size_of::<T>(),
        epsilon: format!("{:e}", T::epsilon()),
        min_positive: format!("{:e}", T::min_positive_value()),
        max: format!("{:e}", T::max_value()),
        has_infinity: T::infinity().is_infinite(),
        has_nan: T::nan().is_nan(),
        pi: format!("{:.*e}", digits as usize, pi),
    }
}

pub fn scalar_limits() -> Vec<ScalarLimits> {
    vec![
        limits_of::<f64>("double", f64::MANTISSA_DIGITS, std::f64::consts::PI),
        limits_of::<DoubleDouble>(
            "double-double",
            DoubleDouble::MANTISSA_DIGITS,
            DoubleDouble::PI,
        ),
    ]
}

pub fn write_limits(out: &mut dyn Write) -> Result<()> {
    for limits in scalar_limits() {
        writeln!(out, "{}:", limits.name)?;
        writeln!(out, "  size in bytes:       {}", limits.size_bytes)?;
        writeln!(out, "  mantissa bits:       {}", limits.mantissa_bits)?;
        writeln!(out, "  decimal digits:      {}", limits.decimal_digits)?;
        writeln!(out, "  epsilon:             {}", limits.epsilon)?;
        writeln!(out, "  min positive:        {}", limits.min_positive)?;
        writeln!(out, "  max:                 {}", limits.max)?;
        writeln!(out, "  has infinity:        {}", limits.has_infinity)?;
        writeln!(out, "  has quiet NaN:       {}", limits.has_nan)?;
        writeln!(out, "  rounding:            to nearest")?;
        writeln!(out, "  pi:                  {}", limits.pi)?;
    }
    Ok(())
}

pub fn write_probe(args: &ProbeArgs, out: &mut dyn Write) -> Result<()> {
    match args.precision {
        Precision::Double => probe::<f64>(args, f64::MANTISSA_DIGITS, out),
        Precision::DoubleDouble => probe::<DoubleDouble>(args, DoubleDouble::MANTISSA_DIGITS, out),
    }
}

fn probe<T: Scalar + LowerExp>(
    args: &ProbeArgs,
    mantissa_bits: u32,
    out: &mut dyn Write,
) -> Result<()> {
    let (Some(re), Some(im)) = (T::from_f64(args.re), T::from_f64(args.im)) else {
        bail!("z = {} + {}i is not representable", args.re, args.im);
    };
    let z = Complex::new(re, im);
    let mut buffer = IterationBuffer::new(args.length)?;
    let status = generate(z, &mut buffer);
    let digits = decimal_digits(mantissa_bits) as usize;

    writeln!(out, "z = {:.*e} {:+.*e}i", digits, z.re, digits, z.im)?;
    writeln!(out, "status code: {}", status.code())?;
    for (idx, value) in buffer.valid().iter().enumerate() {
        writeln!(
            out,
            "F({}) = {:.*e} {:+.*e}i",
            idx + FIRST_STORED_ITERATION,
            digits,
            value.re,
            digits,
            value.im
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{decimal_digits, scalar_limits, write_limits, write_probe};
    use crate::args::{Precision, ProbeArgs};

    #[test]
    fn decimal_digits_match_ieee_and_double_double() {
        assert_eq!(decimal_digits(53), 15);
        assert_eq!(decimal_digits(106), 31);
    }

    #[test]
    fn double_double_reports_more_digits_same_range() {
        let limits = scalar_limits();
        assert_eq!(limits.len(), 2);
        let (double, dd) = (&limits[0], &limits[1]);
        assert_eq!(double.size_bytes, 8);
        assert_eq!(dd.size_bytes, 16);
        assert!(dd.mantissa_bits > double.mantissa_bits);
        assert_eq!(double.max, dd.max);
        assert!(double.has_infinity && dd.has_infinity);
        assert!(dd.pi.starts_with("3.14159265358979323846264338"));
    }

    #[test]
    fn limits_lists_both_types() {
        let mut out = Vec::new();
        write_limits(&mut out).expect("writes");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("double:\n"));
        assert!(text.contains("double-double:\n"));
    }

    fn probe_text(re: f64, length: usize, precision: Precision) -> String {
        let args = ProbeArgs {
            re,
            im: 0.0,
            length,
            precision,
        };
        let mut out = Vec::new();
        write_probe(&args, &mut out).expect("writes");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn probe_prints_status_and_each_iterate() {
        let text = probe_text(-40.0, 4, Precision::Double);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "status code: 0");
        assert_eq!(lines.len(), 2 + 4);
        assert!(lines[2].starts_with("F(2) = 4.24835425529158"));
        assert!(lines[5].starts_with("F(5) = "));
    }

    #[test]
    fn probe_stops_at_collapse() {
        let text = probe_text(-50.0, 10, Precision::DoubleDouble);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "status code: 2");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn probe_rejects_empty_buffer() {
        let args = ProbeArgs {
            re: 0.0,
            im: 0.0,
            length: 0,
            precision: Precision::Double,
        };
        assert!(write_probe(&args, &mut Vec::new()).is_err());
    }
}
