use crate::error::ScanError;
use crate::traits::{ComplexSample, ContinuedExponential, IteratedMap, Scalar};
use num_complex::Complex;

/// Magnitude below which an iterate counts as having collapsed onto zero.
/// Independent of the cycle tolerance.
pub const NULL_THRESHOLD: f64 = 1e-18;

/// Iteration count assigned to the first stored iterate. The seed is
/// iteration 1 and is never written to the buffer.
pub const FIRST_STORED_ITERATION: usize = 2;

/// Outcome of filling an [`IterationBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// An iterate compared unequal to itself (NaN). Slots from the failure on
    /// are undefined.
    Diverged,
    /// An iterate fell below [`NULL_THRESHOLD`] at this iteration count.
    ConvergedAt(usize),
    /// Every slot holds a valid, non-null iterate.
    Inconclusive,
}

impl Status {
    /// -1 for `Diverged`, n for `ConvergedAt(n)`, 0 for `Inconclusive`.
    pub fn code(self) -> i64 {
        match self {
            Status::Diverged => -1,
            Status::ConvergedAt(n) => n as i64,
            Status::Inconclusive => 0,
        }
    }
}

/// Fixed-capacity scratch storage for one sequence, reused across grid points.
#[derive(Debug, Clone)]
pub struct IterationBuffer<T: Scalar> {
    values: Vec<ComplexSample<T>>,
    valid: usize,
}

impl<T: Scalar> IterationBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self, ScanError> {
        if capacity == 0 {
            return Err(ScanError::InvalidSettings(
                "vector length must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            values: vec![Complex::new(T::zero(), T::zero()); capacity],
            valid: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Number of leading slots written with valid iterates by the last generation.
    pub fn valid_len(&self) -> usize {
        self.valid
    }

    /// The valid prefix written by the last generation.
    pub fn valid(&self) -> &[ComplexSample<T>] {
        &self.values[..self.valid]
    }
}

/// Fills `buffer` with F(2), F(3), ... of the continued exponential at `z`.
pub fn generate<T: Scalar>(z: ComplexSample<T>, buffer: &mut IterationBuffer<T>) -> Status {
    generate_with(&ContinuedExponential, z, buffer)
}

/// Fills `buffer` with successive iterates of `map` at parameter `z`, stopping
/// at the first NaN (`Diverged`) or the first near-zero iterate (`ConvergedAt`).
pub fn generate_with<T, M>(map: &M, z: ComplexSample<T>, buffer: &mut IterationBuffer<T>) -> Status
where
    T: Scalar,
    M: IteratedMap<T>,
{
    let threshold = T::from_f64(NULL_THRESHOLD).unwrap_or_else(T::min_positive_value);
    let mut result = map.seed();
    buffer.valid = 0;

    for (idx, slot) in buffer.values.iter_mut().enumerate() {
        result = map.apply(z, result);
        *slot = result;

        // Same as `result != result`: either component is NaN.
        if result.re.is_nan() || result.im.is_nan() {
            return Status::Diverged;
        }
        buffer.valid = idx + 1;

        if result.norm() < threshold {
            return Status::ConvergedAt(idx + FIRST_STORED_ITERATION);
        }
    }

    Status::Inconclusive
}
