//! Double-double extended precision scalar.
//!
//! A value is the unevaluated sum `hi + lo` of two f64 with `|lo| <= ulp(hi) / 2`,
//! giving roughly 106 significand bits over the f64 exponent range. This is the
//! wide type the field scan runs on by default; it plays the role `long double`
//! plays on x87 hardware, but portably and with more digits.
//!
//! `exp`, `sin`, `cos`, `sqrt`, `hypot` and `ln` are carried out in full
//! double-double precision since the continued exponential only needs those.
//! The inverse trigonometric and inverse hyperbolic functions fall back to f64
//! on the leading component.

use num_traits::{Float, FromPrimitive, Num, One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::FpCategory;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct DoubleDouble {
    pub hi: f64,
    pub lo: f64,
}

/// s + err == a + b exactly.
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

/// Like `two_sum`, requires |a| >= |b|.
#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    (s, b - (s - a))
}

/// p + err == a * b exactly.
#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    (p, a.mul_add(b, -p))
}

impl DoubleDouble {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 0.0);
    pub const PI: Self = Self::new(3.141_592_653_589_793_116e0, 1.224_646_799_147_353_207e-16);
    pub const FRAC_PI_2: Self =
        Self::new(1.570_796_326_794_896_558e0, 6.123_233_995_736_766_036e-17);
    pub const E: Self = Self::new(2.718_281_828_459_045_091e0, 1.445_646_891_729_250_158e-16);
    pub const LN_2: Self = Self::new(6.931_471_805_599_452_862e-1, 2.319_046_813_846_299_558e-17);

    /// Number of significand bits carried by `hi + lo`.
    pub const MANTISSA_DIGITS: u32 = 106;

    pub const fn new(hi: f64, lo: f64) -> Self {
        Self { hi, lo }
    }

    /// Non-finite leading parts swallow the trailing part.
    #[inline]
    fn from_parts(s: f64, e: f64) -> Self {
        if !s.is_finite() {
            return Self::new(s, 0.0);
        }
        let (hi, lo) = quick_two_sum(s, e);
        Self::new(hi, lo)
    }

    /// Multiplies by `2^k` without rounding (barring overflow/underflow).
    fn scale_pow2(self, k: i32) -> Self {
        let k1 = k / 2;
        let k2 = k - k1;
        let f1 = 2.0_f64.powi(k1);
        let f2 = 2.0_f64.powi(k2);
        let hi = self.hi * f1 * f2;
        if !hi.is_finite() {
            return Self::new(hi, 0.0);
        }
        Self::new(hi, self.lo * f1 * f2)
    }

    fn square(self) -> Self {
        self * self
    }

    /// sin and cos of |r| <= pi/4 by Taylor series.
    fn sin_cos_taylor(r: Self) -> (Self, Self) {
        let r2 = r.square();

        let mut sin = r;
        let mut term = r;
        let mut k = 1.0;
        for _ in 0..30 {
            term = -term * r2 / Self::from((k + 1.0) * (k + 2.0));
            k += 2.0;
            sin += term;
            if term.hi.abs() <= sin.hi.abs() * 1e-34 {
                break;
            }
        }

        let mut cos = Self::ONE;
        let mut term = Self::ONE;
        let mut k = 0.0;
        for _ in 0..30 {
            term = -term * r2 / Self::from((k + 1.0) * (k + 2.0));
            k += 2.0;
            cos += term;
            if term.hi.abs() <= cos.hi.abs() * 1e-34 {
                break;
            }
        }

        (sin, cos)
    }

    /// Writes `d.ddd...e<exp>` with `precision` fractional digits, using the
    /// full double-double significand.
    fn fmt_scientific(self, f: &mut fmt::Formatter<'_>, precision: usize) -> fmt::Result {
        if !self.hi.is_finite() || self.hi == 0.0 || self.hi.abs() < 1e-290 {
            return fmt::LowerExp::fmt(&self.hi, f);
        }

        let ten = Self::from(10.0);
        let mut x = self.abs();
        let mut exp10 = x.hi.log10().floor() as i32;
        x = x / ten.powi(exp10);
        if x >= ten {
            x = x / ten;
            exp10 += 1;
        } else if x < Self::ONE {
            x = x * ten;
            exp10 -= 1;
        }

        // One guard digit for rounding.
        let mut digits: Vec<u8> = Vec::with_capacity(precision + 2);
        for _ in 0..precision + 2 {
            let d = x.floor().hi.clamp(0.0, 9.0);
            digits.push(d as u8);
            x = (x - Self::from(d)) * ten;
        }
        let guard = digits.pop().unwrap_or(0);
        if guard >= 5 {
            let mut idx = digits.len();
            let mut carry = true;
            while carry && idx > 0 {
                idx -= 1;
                if digits[idx] == 9 {
                    digits[idx] = 0;
                } else {
                    digits[idx] += 1;
                    carry = false;
                }
            }
            if carry {
                digits.insert(0, 1);
                digits.pop();
                exp10 += 1;
            }
        }

        let mut out = String::with_capacity(precision + 8);
        if self.hi < 0.0 {
            out.push('-');
        } else if f.sign_plus() {
            out.push('+');
        }
        out.push(char::from(b'0' + digits[0]));
        if precision > 0 {
            out.push('.');
            out.extend(digits[1..].iter().map(|d| char::from(b'0' + d)));
        }
        out.push('e');
        out.push_str(&exp10.to_string());
        // `pad` would treat the precision as a truncation length.
        match f.width() {
            Some(width) => write!(f, "{out:>width$}"),
            None => f.write_str(&out),
        }
    }
}

impl From<f64> for DoubleDouble {
    fn from(value: f64) -> Self {
        Self::new(value, 0.0)
    }
}

impl FromStr for DoubleDouble {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<f64>().map(Self::from)
    }
}

impl fmt::Display for DoubleDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.hi, f)
    }
}

impl fmt::LowerExp for DoubleDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(precision) => self.fmt_scientific(f, precision),
            None => fmt::LowerExp::fmt(&self.hi, f),
        }
    }
}

impl Zero for DoubleDouble {
    fn zero() -> Self {
        Self::ZERO
    }
    fn is_zero(&self) -> bool {
        self.hi == 0.0
    }
}

impl One for DoubleDouble {
    fn one() -> Self {
        Self::ONE
    }
}

impl Add for DoubleDouble {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let (s1, s2) = two_sum(self.hi, rhs.hi);
        if !s1.is_finite() {
            return Self::new(s1, 0.0);
        }
        let (t1, t2) = two_sum(self.lo, rhs.lo);
        let (s1, s2) = quick_two_sum(s1, s2 + t1);
        Self::from_parts(s1, s2 + t2)
    }
}

impl Sub for DoubleDouble {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for DoubleDouble {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let (p1, p2) = two_prod(self.hi, rhs.hi);
        if !p1.is_finite() {
            return Self::new(p1, 0.0);
        }
        Self::from_parts(p1, p2 + (self.hi * rhs.lo + self.lo * rhs.hi))
    }
}

impl Div for DoubleDouble {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        if rhs.hi.is_infinite() && self.hi.is_finite() {
            return Self::from(self.hi / rhs.hi);
        }
        let q1 = self.hi / rhs.hi;
        if !q1.is_finite() {
            return Self::new(q1, 0.0);
        }
        let r = self - rhs * Self::from(q1);
        let q2 = r.hi / rhs.hi;
        let r = r - rhs * Self::from(q2);
        let q3 = r.hi / rhs.hi;
        let (q1, q2) = quick_two_sum(q1, q2);
        Self::new(q1, q2) + Self::from(q3)
    }
}

impl Neg for DoubleDouble {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.hi, -self.lo)
    }
}

impl Rem for DoubleDouble {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        self - (self / rhs).trunc() * rhs
    }
}

impl AddAssign for DoubleDouble {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl SubAssign for DoubleDouble {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl MulAssign for DoubleDouble {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
impl DivAssign for DoubleDouble {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}
impl RemAssign for DoubleDouble {
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

impl Num for DoubleDouble {
    type FromStrRadixErr = num_traits::ParseFloatError;
    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        <f64 as Num>::from_str_radix(str, radix).map(Self::from)
    }
}

impl ToPrimitive for DoubleDouble {
    fn to_i64(&self) -> Option<i64> {
        self.trunc().hi.to_i64()
    }
    fn to_u64(&self) -> Option<u64> {
        self.trunc().hi.to_u64()
    }
    fn to_f64(&self) -> Option<f64> {
        Some(self.hi)
    }
}

impl FromPrimitive for DoubleDouble {
    fn from_i64(n: i64) -> Option<Self> {
        let hi = n as f64;
        let lo = (i128::from(n) - hi as i128) as f64;
        Some(Self::from_parts(hi, lo))
    }
    fn from_u64(n: u64) -> Option<Self> {
        let hi = n as f64;
        let lo = (i128::from(n) - hi as i128) as f64;
        Some(Self::from_parts(hi, lo))
    }
    fn from_f64(n: f64) -> Option<Self> {
        Some(Self::from(n))
    }
}

impl num_traits::NumCast for DoubleDouble {
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        n.to_f64().map(<Self as From<f64>>::from)
    }
}

impl Float for DoubleDouble {
    fn nan() -> Self {
        Self::new(f64::NAN, 0.0)
    }
    fn infinity() -> Self {
        Self::new(f64::INFINITY, 0.0)
    }
    fn neg_infinity() -> Self {
        Self::new(f64::NEG_INFINITY, 0.0)
    }
    fn neg_zero() -> Self {
        Self::new(-0.0, 0.0)
    }
    fn min_value() -> Self {
        Self::new(f64::MIN, 0.0)
    }
    fn min_positive_value() -> Self {
        Self::new(f64::MIN_POSITIVE, 0.0)
    }
    fn max_value() -> Self {
        Self::new(f64::MAX, 0.0)
    }
    fn epsilon() -> Self {
        // 2^-104
        Self::new(f64::EPSILON * f64::EPSILON, 0.0)
    }
    fn is_nan(self) -> bool {
        self.hi.is_nan()
    }
    fn is_infinite(self) -> bool {
        self.hi.is_infinite()
    }
    fn is_finite(self) -> bool {
        self.hi.is_finite()
    }
    fn is_normal(self) -> bool {
        self.hi.is_normal()
    }
    fn classify(self) -> FpCategory {
        self.hi.classify()
    }
    fn floor(self) -> Self {
        let hi = self.hi.floor();
        if hi == self.hi {
            Self::from_parts(hi, self.lo.floor())
        } else {
            Self::from(hi)
        }
    }
    fn ceil(self) -> Self {
        let hi = self.hi.ceil();
        if hi == self.hi {
            Self::from_parts(hi, self.lo.ceil())
        } else {
            Self::from(hi)
        }
    }
    fn round(self) -> Self {
        let half = Self::from(0.5);
        if self.hi >= 0.0 {
            (self + half).floor()
        } else {
            (self - half).ceil()
        }
    }
    fn trunc(self) -> Self {
        if self.hi >= 0.0 {
            self.floor()
        } else {
            self.ceil()
        }
    }
    fn fract(self) -> Self {
        self - self.trunc()
    }
    fn abs(self) -> Self {
        if self.hi.is_sign_negative() {
            -self
        } else {
            self
        }
    }
    fn signum(self) -> Self {
        Self::from(self.hi.signum())
    }
    fn is_sign_positive(self) -> bool {
        self.hi.is_sign_positive()
    }
    fn is_sign_negative(self) -> bool {
        self.hi.is_sign_negative()
    }
    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }
    fn recip(self) -> Self {
        Self::ONE / self
    }

    fn powi(self, n: i32) -> Self {
        if n == 0 {
            return Self::ONE;
        }
        let mut base = self;
        let mut exp = n.unsigned_abs();
        let mut acc = Self::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                acc *= base;
            }
            base = base.square();
            exp >>= 1;
        }
        if n < 0 {
            acc.recip()
        } else {
            acc
        }
    }

    fn powf(self, n: Self) -> Self {
        if self.hi <= 0.0 {
            return Self::from(self.hi.powf(n.hi));
        }
        (n * self.ln()).exp()
    }

    fn sqrt(self) -> Self {
        if self.hi == 0.0 {
            return self;
        }
        if self.hi < 0.0 {
            return Self::nan();
        }
        if !self.hi.is_finite() {
            return Self::from(self.hi.sqrt());
        }
        let x = 1.0 / self.hi.sqrt();
        let ax = self.hi * x;
        let correction = (self - Self::from(ax).square()).hi * (x * 0.5);
        let (hi, lo) = two_sum(ax, correction);
        Self::new(hi, lo)
    }

    fn exp(self) -> Self {
        if self.hi.is_nan() {
            return self;
        }
        if self.hi > 709.8 {
            return Self::infinity();
        }
        if self.hi < -745.2 {
            return Self::ZERO;
        }
        if self.hi == 0.0 {
            return Self::ONE;
        }

        // exp(x) = 2^k * (1 + expm1(r))^512 with x = k ln2 + 512 r.
        let k = (self.hi / Self::LN_2.hi).round();
        let r = (self - Self::LN_2 * Self::from(k)).scale_pow2(-9);

        let mut s = r;
        let mut term = r;
        for i in 2..=20 {
            term = term * r / Self::from(f64::from(i));
            s += term;
            if term.hi.abs() <= s.hi.abs() * 1e-34 {
                break;
            }
        }
        for _ in 0..9 {
            s = s.scale_pow2(1) + s.square();
        }

        (s + Self::ONE).scale_pow2(k as i32)
    }

    fn exp2(self) -> Self {
        (self * Self::LN_2).exp()
    }
    fn ln(self) -> Self {
        if self.hi.is_nan() || self.hi < 0.0 {
            return Self::nan();
        }
        if self.hi == 0.0 {
            return Self::neg_infinity();
        }
        if self.hi.is_infinite() {
            return self;
        }
        // Newton on exp: x <- x + a * exp(-x) - 1.
        let mut x = Self::from(self.hi.ln());
        for _ in 0..2 {
            x = x + self * (-x).exp() - Self::ONE;
        }
        x
    }
    fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }
    fn log2(self) -> Self {
        self.ln() / Self::LN_2
    }
    fn log10(self) -> Self {
        self.ln() / Self::from(10.0).ln()
    }

    fn max(self, other: Self) -> Self {
        if self > other || other.is_nan() {
            self
        } else {
            other
        }
    }
    fn min(self, other: Self) -> Self {
        if self < other || other.is_nan() {
            self
        } else {
            other
        }
    }

    fn abs_sub(self, other: Self) -> Self {
        if self <= other {
            Self::ZERO
        } else {
            self - other
        }
    }

    fn cbrt(self) -> Self {
        if self.hi == 0.0 || !self.hi.is_finite() {
            return Self::from(self.hi.cbrt());
        }
        let y = Self::from(self.hi.cbrt());
        y - (y.powi(3) - self) / (Self::from(3.0) * y.square())
    }
    fn hypot(self, other: Self) -> Self {
        let a = self.abs();
        let b = other.abs();
        if a.is_infinite() || b.is_infinite() {
            return Self::infinity();
        }
        if a.is_nan() || b.is_nan() {
            return Self::nan();
        }
        let (big, small) = if a >= b { (a, b) } else { (b, a) };
        if big.is_zero() {
            return Self::ZERO;
        }
        let ratio = small / big;
        big * (Self::ONE + ratio.square()).sqrt()
    }

    fn sin(self) -> Self {
        self.sin_cos().0
    }
    fn cos(self) -> Self {
        self.sin_cos().1
    }
    fn tan(self) -> Self {
        let (s, c) = self.sin_cos();
        s / c
    }
    fn asin(self) -> Self {
        Self::from(self.hi.asin())
    }
    fn acos(self) -> Self {
        Self::from(self.hi.acos())
    }
    fn atan(self) -> Self {
        Self::from(self.hi.atan())
    }
    fn atan2(self, other: Self) -> Self {
        Self::from(self.hi.atan2(other.hi))
    }
    fn sin_cos(self) -> (Self, Self) {
        if !self.hi.is_finite() {
            return (Self::nan(), Self::nan());
        }
        if self.hi == 0.0 {
            return (self, Self::ONE);
        }
        // Past ~2^53 * pi/2 the quadrant count `j` is no longer exact.
        if self.hi.abs() > 1.0e16 {
            let (s, c) = self.hi.sin_cos();
            return (Self::from(s), Self::from(c));
        }

        let j = (self.hi / Self::FRAC_PI_2.hi).round();
        let r = self - Self::FRAC_PI_2 * Self::from(j);
        let (s, c) = Self::sin_cos_taylor(r);
        match (j as i64).rem_euclid(4) {
            0 => (s, c),
            1 => (c, -s),
            2 => (-s, -c),
            _ => (-c, s),
        }
    }

    fn exp_m1(self) -> Self {
        self.exp() - Self::ONE
    }
    fn ln_1p(self) -> Self {
        (Self::ONE + self).ln()
    }
    fn sinh(self) -> Self {
        let e = self.exp();
        (e - e.recip()).scale_pow2(-1)
    }
    fn cosh(self) -> Self {
        let e = self.exp();
        (e + e.recip()).scale_pow2(-1)
    }
    fn tanh(self) -> Self {
        if self.hi.abs() > 40.0 {
            return Self::from(self.hi.signum());
        }
        let e2 = self.scale_pow2(1).exp();
        (e2 - Self::ONE) / (e2 + Self::ONE)
    }
    fn asinh(self) -> Self {
        Self::from(self.hi.asinh())
    }
    fn acosh(self) -> Self {
        Self::from(self.hi.acosh())
    }
    fn atanh(self) -> Self {
        Self::from(self.hi.atanh())
    }

    fn integer_decode(self) -> (u64, i16, i8) {
        self.hi.integer_decode()
    }
}

#[cfg(test)]
mod tests {
    use super::DoubleDouble;
    use num_complex::Complex;
    use num_traits::{Float, FromPrimitive, Zero};

    fn dd(v: f64) -> DoubleDouble {
        DoubleDouble::from(v)
    }

    fn assert_close(actual: DoubleDouble, expected: DoubleDouble, tol: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff.hi <= tol,
            "expected {:?}, got {:?} (diff {:e})",
            expected,
            actual,
            diff.hi
        );
    }

    #[test]
    fn addition_keeps_bits_lost_by_f64() {
        let tiny = dd(1e-20);
        let sum = DoubleDouble::ONE + tiny;
        assert_eq!(sum.hi, 1.0);
        assert_eq!((sum - DoubleDouble::ONE).hi, 1e-20);
        assert_eq!(1.0 + 1e-20 - 1.0, 0.0);
    }

    #[test]
    fn division_round_trips_through_multiplication() {
        let third = DoubleDouble::ONE / dd(3.0);
        assert_close(third * dd(3.0), DoubleDouble::ONE, 1e-31);
        let q = dd(22.0) / dd(7.0);
        assert_close(q * dd(7.0), dd(22.0), 1e-30);
    }

    #[test]
    fn sqrt_squares_back() {
        let s = dd(2.0).sqrt();
        assert_close(s * s, dd(2.0), 1e-30);
        assert!(dd(-1.0).sqrt().is_nan());
        assert!(dd(0.0).sqrt().is_zero());
    }

    #[test]
    fn exp_matches_known_constants() {
        assert_close(DoubleDouble::ONE.exp(), DoubleDouble::E, 1e-30);
        assert_close(DoubleDouble::LN_2.exp(), dd(2.0), 1e-30);
        assert_close(dd(-1.0).exp() * dd(1.0).exp(), DoubleDouble::ONE, 1e-30);
        assert_eq!(dd(0.0).exp(), DoubleDouble::ONE);
    }

    #[test]
    fn exp_agrees_with_f64_to_double_precision() {
        for &x in &[-30.5, -2.25, 0.001, 0.75, 5.0, 88.0, 300.0] {
            let wide = dd(x).exp();
            let narrow = x.exp();
            assert!(
                ((wide.hi - narrow) / narrow).abs() < 1e-15,
                "exp({x}) = {wide:?}, f64 says {narrow}"
            );
        }
    }

    #[test]
    fn exp_saturates_outside_f64_range() {
        assert!(dd(1000.0).exp().is_infinite());
        assert!(dd(-1000.0).exp().is_zero());
        assert!(dd(f64::NAN).exp().is_nan());
    }

    #[test]
    fn ln_inverts_exp() {
        for &x in &[0.1, 1.5, 10.0, 12345.678] {
            assert_close(dd(x).ln().exp(), dd(x), x * 1e-30);
        }
        assert!(dd(-1.0).ln().is_nan());
        assert!(dd(0.0).ln().is_infinite());
    }

    #[test]
    fn sin_cos_satisfy_pythagorean_identity() {
        for &x in &[0.7, 2.5, -3.9, 100.0, 1.0e6] {
            let (s, c) = dd(x).sin_cos();
            assert_close(s * s + c * c, DoubleDouble::ONE, 1e-29);
            assert!((s.hi - x.sin()).abs() < 1e-12);
            assert!((c.hi - x.cos()).abs() < 1e-12);
        }
    }

    #[test]
    fn sin_cos_hit_quadrant_points() {
        assert_close(DoubleDouble::FRAC_PI_2.sin(), DoubleDouble::ONE, 1e-30);
        assert_close(DoubleDouble::FRAC_PI_2.cos(), DoubleDouble::ZERO, 1e-30);
        assert_close(DoubleDouble::PI.sin(), DoubleDouble::ZERO, 1e-30);
        assert_close(DoubleDouble::PI.cos(), -DoubleDouble::ONE, 1e-30);
    }

    #[test]
    fn sin_cos_of_large_arguments_use_the_trailing_component() {
        // 6014219207724216.5 is not representable in f64.
        let (s, c) = DoubleDouble::new(6014219207724216.0, 0.5).sin_cos();
        assert!((s.hi + 0.188_977_404_679_836_16).abs() < 1e-12);
        assert!((c.hi + 0.981_981_435_934_749_96).abs() < 1e-12);
        let (s_hi, _) = dd(6014219207724216.0).sin_cos();
        assert!((s_hi.hi - 0.304_943_703_884_021_84).abs() < 1e-12);
    }

    #[test]
    fn hypot_scales_without_overflow() {
        assert_close(dd(3.0).hypot(dd(4.0)), dd(5.0), 1e-30);
        let big = dd(1e200).hypot(dd(1e200));
        assert!(big.is_finite());
        assert!((big.hi / 1e200 - 2.0_f64.sqrt()).abs() < 1e-15);
        assert!(dd(f64::INFINITY).hypot(dd(f64::NAN)).is_infinite());
    }

    #[test]
    fn floor_respects_trailing_component() {
        let just_below_three = DoubleDouble::new(3.0, -1e-20);
        assert_eq!(just_below_three.floor(), dd(2.0));
        assert_eq!(just_below_three.ceil(), dd(3.0));
        assert_eq!(just_below_three.trunc(), dd(2.0));
    }

    #[test]
    fn from_i64_is_exact_beyond_53_bits() {
        let n = (1_i64 << 60) + 1;
        let value = DoubleDouble::from_i64(n).expect("i64 converts");
        assert_eq!(value.hi, (1_i64 << 60) as f64);
        assert_eq!(value.lo, 1.0);
    }

    #[test]
    fn non_finite_values_propagate_as_nan() {
        let inf = DoubleDouble::infinity();
        assert!((inf * DoubleDouble::ZERO).is_nan());
        assert!((inf - inf).is_nan());
        assert!((DoubleDouble::ONE / DoubleDouble::ZERO).is_infinite());
    }

    #[test]
    fn complex_exp_overflow_becomes_nan_like_f64() {
        let wide = Complex::new(dd(1000.0), dd(0.0)).exp();
        let narrow = Complex::new(1000.0_f64, 0.0).exp();
        assert_eq!(wide.im.is_nan(), narrow.im.is_nan());
        assert!(wide.re.is_infinite() && wide.im.is_nan());
    }

    #[test]
    fn complex_exp_tracks_f64() {
        let z = Complex::new(-0.4, 2.3);
        let wide = Complex::new(dd(z.re), dd(z.im)).exp();
        let narrow = z.exp();
        assert!((wide.re.hi - narrow.re).abs() < 1e-15);
        assert!((wide.im.hi - narrow.im).abs() < 1e-15);
    }

    #[test]
    fn scientific_formatting_uses_both_components() {
        assert_eq!(format!("{:.5e}", dd(1234.5)), "1.23450e3");
        assert_eq!(format!("{:.2e}", dd(-0.000999)), "-9.99e-4");
        assert_eq!(
            format!("{:.20e}", DoubleDouble::PI),
            "3.14159265358979323846e0"
        );
        assert_eq!(format!("{:.3e}", dd(9.9996)), "1.000e1");
        assert_eq!(format!("{:.6e}", dd(1e-16)), "1.000000e-16");
        assert_eq!(format!("{}", dd(0.25)), "0.25");
        assert_eq!(format!("{:+.2e}", dd(0.5)), "+5.00e-1");
    }

    #[test]
    fn parses_from_decimal_strings() {
        let v: DoubleDouble = " -2.5 ".parse().expect("parses");
        assert_eq!(v, dd(-2.5));
        assert!("abc".parse::<DoubleDouble>().is_err());
    }
}
