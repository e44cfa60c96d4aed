use num_complex::Complex;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as the component type of a complex sample.
/// Must support the `Float` operations (`exp`, `sin`, `cos`, `hypot`, NaN tests),
/// debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// One point of the complex plane, or one iterate of a sequence.
pub type ComplexSample<T> = Complex<T>;

/// A one-parameter complex map, iterated as `x_{n} = apply(z, x_{n-1})`
/// starting from `seed()`.
pub trait IteratedMap<T: Scalar> {
    /// The conceptual iterate before the first application. Never stored.
    fn seed(&self) -> ComplexSample<T>;

    /// Evaluates the next iterate for parameter `z`.
    fn apply(&self, z: ComplexSample<T>, prev: ComplexSample<T>) -> ComplexSample<T>;
}

/// The continued exponential F(0) = 1, F(n) = exp(z * F(n-1)).
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuedExponential;

impl<T: Scalar> IteratedMap<T> for ContinuedExponential {
    fn seed(&self) -> ComplexSample<T> {
        Complex::new(T::one(), T::zero())
    }

    #[inline]
    fn apply(&self, z: ComplexSample<T>, prev: ComplexSample<T>) -> ComplexSample<T> {
        complex_mul(z, prev).exp()
    }
}

/// Complex product with C99 Annex G infinity recovery.
///
/// The textbook formula turns an infinite operand into NaN in both parts
/// (`0 * inf`, `inf - inf`). When that happens and an operand or partial
/// product is infinite, infinite operands are boxed to signed 0/1, NaN
/// partners become signed zeros, and the product is rescaled to a signed
/// infinity. Finite products are bit-identical to `lhs * rhs`.
pub fn complex_mul<T: Scalar>(lhs: ComplexSample<T>, rhs: ComplexSample<T>) -> ComplexSample<T> {
    let (mut a, mut b, mut c, mut d) = (lhs.re, lhs.im, rhs.re, rhs.im);
    let (ac, bd, ad, bc) = (a * c, b * d, a * d, b * c);
    let re = ac - bd;
    let im = ad + bc;
    if !(re.is_nan() && im.is_nan()) {
        return Complex::new(re, im);
    }

    let mut recalc = false;
    if a.is_infinite() || b.is_infinite() {
        a = box_infinity(a);
        b = box_infinity(b);
        c = nan_to_zero(c);
        d = nan_to_zero(d);
        recalc = true;
    }
    if c.is_infinite() || d.is_infinite() {
        c = box_infinity(c);
        d = box_infinity(d);
        a = nan_to_zero(a);
        b = nan_to_zero(b);
        recalc = true;
    }
    if !recalc && [ac, bd, ad, bc].iter().any(|p| p.is_infinite()) {
        a = nan_to_zero(a);
        b = nan_to_zero(b);
        c = nan_to_zero(c);
        d = nan_to_zero(d);
        recalc = true;
    }
    if !recalc {
        return Complex::new(re, im);
    }

    let inf = T::infinity();
    Complex::new(inf * (a * c - b * d), inf * (a * d + b * c))
}

/// ±1 for an infinity, ±0 otherwise, keeping the sign.
fn box_infinity<T: Scalar>(x: T) -> T {
    let unit = if x.is_infinite() { T::one() } else { T::zero() };
    unit.copysign(x)
}

fn nan_to_zero<T: Scalar>(x: T) -> T {
    if x.is_nan() {
        T::zero().copysign(x)
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::{complex_mul, ContinuedExponential, IteratedMap};
    use crate::double_double::DoubleDouble;
    use num_complex::Complex;
    use num_traits::Float;

    #[test]
    fn continued_exponential_starts_from_one() {
        let seed: Complex<f64> = ContinuedExponential.seed();
        assert_eq!(seed, Complex::new(1.0, 0.0));
        let seed: Complex<DoubleDouble> = ContinuedExponential.seed();
        assert_eq!(seed.re, DoubleDouble::from(1.0));
    }

    #[test]
    fn continued_exponential_applies_exp_of_product() {
        let z = Complex::new(0.5, -0.25);
        let prev = Complex::new(2.0, 1.0);
        let next = ContinuedExponential.apply(z, prev);
        assert_eq!(next, (z * prev).exp());
    }

    #[test]
    fn finite_products_match_plain_multiplication() {
        let cases = [
            (Complex::new(0.5, -0.25), Complex::new(2.0, 1.0)),
            (Complex::new(-3.0, 0.0), Complex::new(1e300, -1e-300)),
            (Complex::new(0.0, 3.0), Complex::new(-7.5, 2.25)),
        ];
        for (lhs, rhs) in cases {
            assert_eq!(complex_mul(lhs, rhs), lhs * rhs);
        }
    }

    #[test]
    fn infinite_operand_keeps_a_signed_infinity() {
        let z = Complex::new(0.0, 3.0);
        let prev = Complex::new(f64::NEG_INFINITY, f64::INFINITY);
        let plain = z * prev;
        assert!(plain.re.is_nan() && plain.im.is_nan());

        let product = complex_mul(z, prev);
        assert_eq!(product, Complex::new(f64::NEG_INFINITY, f64::NEG_INFINITY));
        // exp(-inf - inf i) collapses to zero instead of NaN.
        assert_eq!(product.exp(), Complex::new(0.0, 0.0));

        let swapped = complex_mul(Complex::new(f64::INFINITY, f64::INFINITY), z);
        assert_eq!(swapped, Complex::new(f64::NEG_INFINITY, f64::INFINITY));
    }

    #[test]
    fn overflowing_partial_products_are_recovered() {
        // b * d and b * c overflow while a is NaN.
        let product = complex_mul(Complex::new(f64::NAN, 1e200), Complex::new(1e200, 1e200));
        assert_eq!(product, Complex::new(f64::NEG_INFINITY, f64::INFINITY));
    }

    #[test]
    fn nan_operands_stay_nan() {
        let product = complex_mul(Complex::new(f64::NAN, 0.0), Complex::new(1.0, 1.0));
        assert!(product.re.is_nan() && product.im.is_nan());
    }

    #[test]
    fn infinity_recovery_works_in_double_double() {
        let z = Complex::new(DoubleDouble::ZERO, DoubleDouble::from(3.0));
        let prev = Complex::new(DoubleDouble::neg_infinity(), DoubleDouble::infinity());
        let product = complex_mul(z, prev);
        assert!(product.re.is_infinite() && product.re.is_sign_negative());
        assert!(product.im.is_infinite() && product.im.is_sign_negative());
        let next = ContinuedExponential.apply(z, prev);
        assert_eq!(next, Complex::new(DoubleDouble::ZERO, DoubleDouble::ZERO));
    }
}
