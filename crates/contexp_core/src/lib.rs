pub mod classify;
pub mod cycle;
pub mod double_double;
pub mod error;
pub mod scan;
pub mod sequence;
/// The `contexp_core` crate classifies the continued exponential
/// F(0) = 1, F(n) = exp(z * F(n-1)) over a rectangle of the complex plane.
/// It is generic over the scalar type, supporting both standard floating-point
/// arithmetic (`f64`) and double-double extended precision.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `IteratedMap` (the map being iterated).
/// - **Sequence**: fills a reusable `IterationBuffer` and reports divergence or collapse to zero.
/// - **Cycle**: backward search for a near-repeat of the last iterate.
/// - **Classify**: combines the two into one integer code per point.
/// - **Scan**: drives the classifier over a grid and returns codes plus metadata.
pub mod traits;

pub use classify::{classify, classify_with, Classification};
pub use cycle::detect_cycle;
pub use double_double::DoubleDouble;
pub use error::ScanError;
pub use scan::{
    scan, scan_region, scan_with, ClassificationGrid, RegionSpec, ScanMetadata, ScanResult,
    DEFAULT_EPS, DEFAULT_MAX_LOOKBACK, DEFAULT_VECTOR_LENGTH,
};
pub use sequence::{generate, generate_with, IterationBuffer, Status, NULL_THRESHOLD};
pub use traits::{complex_mul, ComplexSample, ContinuedExponential, IteratedMap, Scalar};
