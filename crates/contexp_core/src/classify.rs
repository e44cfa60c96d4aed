use crate::cycle::detect_cycle;
use crate::sequence::{generate_with, IterationBuffer, Status};
use crate::traits::{ComplexSample, ContinuedExponential, IteratedMap, Scalar};
use serde::{Deserialize, Serialize};

/// Classification of one parameter value.
///
/// `code()` gives the integer stored in a grid cell. `Converged` and `Cycle`
/// both produce positive codes and cannot be told apart from the integer
/// alone; the variant is the only place the distinction survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// The sequence produced NaN.
    Diverged,
    /// The sequence fell below the null threshold at iteration `steps`.
    Converged { steps: usize },
    /// The last iterate repeats the one `period` steps earlier within eps.
    Cycle { period: usize },
    /// Neither collapse nor a cycle within the buffer and lookback window.
    Undetermined,
}

impl Classification {
    /// -1 for divergence, 0 for undetermined, otherwise the step count or period.
    pub fn code(self) -> i64 {
        match self {
            Classification::Diverged => -1,
            Classification::Converged { steps } => steps as i64,
            Classification::Cycle { period } => period as i64,
            Classification::Undetermined => 0,
        }
    }
}

/// Classifies the continued exponential at `z`.
pub fn classify<T: Scalar>(
    z: ComplexSample<T>,
    buffer: &mut IterationBuffer<T>,
    eps: T,
    max_lookback: usize,
) -> Classification {
    classify_with(&ContinuedExponential, z, buffer, eps, max_lookback)
}

/// Runs the generator for `map` at `z` and, only if it is inconclusive,
/// the cycle detector over the filled buffer.
pub fn classify_with<T, M>(
    map: &M,
    z: ComplexSample<T>,
    buffer: &mut IterationBuffer<T>,
    eps: T,
    max_lookback: usize,
) -> Classification
where
    T: Scalar,
    M: IteratedMap<T>,
{
    match generate_with(map, z, buffer) {
        Status::Diverged => Classification::Diverged,
        Status::ConvergedAt(steps) => Classification::Converged { steps },
        Status::Inconclusive => match detect_cycle(buffer.valid(), eps, max_lookback) {
            0 => Classification::Undetermined,
            period => Classification::Cycle { period },
        },
    }
}
