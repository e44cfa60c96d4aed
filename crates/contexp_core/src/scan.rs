use crate::classify::{classify_with, Classification};
use crate::error::ScanError;
use crate::sequence::IterationBuffer;
use crate::traits::{ContinuedExponential, IteratedMap, Scalar};
use log::{debug, info, trace};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Default sequence length per point.
pub const DEFAULT_VECTOR_LENGTH: usize = 1900;
/// Default cap on how far back the cycle detector searches.
pub const DEFAULT_MAX_LOOKBACK: usize = 255;
/// Default cycle-match tolerance.
pub const DEFAULT_EPS: f64 = 1e-16;

fn cast<T: Scalar>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// The rectangle to sample and the per-point classification parameters.
///
/// `num_re` and `num_im` count interior steps: the grid has `num_re + 1`
/// columns and `num_im + 1` rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec<T> {
    pub min_re: T,
    pub max_re: T,
    pub min_im: T,
    pub max_im: T,
    pub num_re: usize,
    pub num_im: usize,
    pub eps: T,
    pub max_lookback: usize,
}

impl<T: Scalar> Default for RegionSpec<T> {
    fn default() -> Self {
        Self {
            min_re: cast(-1.0),
            max_re: cast(0.5),
            min_im: cast(2.0),
            max_im: cast(3.0),
            num_re: 20,
            num_im: 20,
            eps: cast(DEFAULT_EPS),
            max_lookback: DEFAULT_MAX_LOOKBACK,
        }
    }
}

impl<T: Scalar> RegionSpec<T> {
    pub fn validate(&self) -> Result<(), ScanError> {
        if !(self.min_re <= self.max_re) || !(self.min_im <= self.max_im) {
            return Err(ScanError::InvalidRegion {
                min_re: self.min_re.to_f64().unwrap_or(f64::NAN),
                max_re: self.max_re.to_f64().unwrap_or(f64::NAN),
                min_im: self.min_im.to_f64().unwrap_or(f64::NAN),
                max_im: self.max_im.to_f64().unwrap_or(f64::NAN),
            });
        }
        if !(self.eps > T::zero()) {
            return Err(ScanError::InvalidSettings(
                "eps must be positive".to_string(),
            ));
        }
        let columns = self.num_re.checked_add(1);
        let rows = self.num_im.checked_add(1);
        if columns.zip(rows).and_then(|(c, r)| c.checked_mul(r)).is_none() {
            return Err(ScanError::InvalidSettings(format!(
                "grid of {} x {} steps is too large",
                self.num_re, self.num_im
            )));
        }
        Ok(())
    }

    /// Spacing between columns and rows. The divisors include one extra step
    /// so `max_re` and `min_im` are never sampled.
    pub fn step_sizes(&self) -> (T, T) {
        let one = T::one();
        let re_steps = T::from_usize(self.num_re).unwrap_or_else(T::nan);
        let im_steps = T::from_usize(self.num_im).unwrap_or_else(T::nan);
        (
            (self.max_re - self.min_re) / (one + re_steps),
            (self.max_im - self.min_im) / (one + im_steps),
        )
    }

    pub fn columns(&self) -> usize {
        self.num_re + 1
    }

    pub fn rows(&self) -> usize {
        self.num_im + 1
    }
}

/// Row-major grid of classifications. Row 0 is the top (`max_im`), column 0
/// the left edge (`min_re`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridParts")]
pub struct ClassificationGrid {
    width: usize,
    height: usize,
    cells: Vec<Classification>,
}

/// Unchecked wire form of [`ClassificationGrid`].
#[derive(Deserialize)]
struct GridParts {
    width: usize,
    height: usize,
    cells: Vec<Classification>,
}

impl TryFrom<GridParts> for ClassificationGrid {
    type Error = ScanError;

    fn try_from(parts: GridParts) -> Result<Self, Self::Error> {
        let expected = parts.width.checked_mul(parts.height);
        if parts.width == 0 || parts.height == 0 || expected != Some(parts.cells.len()) {
            return Err(ScanError::InvalidSettings(format!(
                "grid of {} x {} cannot hold {} cells",
                parts.width,
                parts.height,
                parts.cells.len()
            )));
        }
        Ok(Self {
            width: parts.width,
            height: parts.height,
            cells: parts.cells,
        })
    }
}

impl ClassificationGrid {
    fn with_dimensions(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: Vec::with_capacity(width * height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Classification> {
        if col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[Classification]> {
        let start = row.checked_mul(self.width)?;
        self.cells.get(start..start + self.width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Classification]> {
        self.cells.chunks(self.width)
    }

    pub fn cells(&self) -> &[Classification] {
        &self.cells
    }

    /// The integer codes, one vector per row.
    pub fn codes(&self) -> Vec<Vec<i64>> {
        self.rows()
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }
}

/// Everything a consumer needs to place and label the grid without
/// recomputing anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata<T> {
    pub min_re: T,
    pub max_re: T,
    pub min_im: T,
    pub max_im: T,
    pub num_re: usize,
    pub num_im: usize,
    pub step_re: T,
    pub step_im: T,
    pub eps: T,
    pub max_lookback: usize,
    pub vector_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult<T> {
    pub metadata: ScanMetadata<T>,
    pub grid: ClassificationGrid,
}

/// Allocates one buffer of `vector_length` and scans `region` with it.
pub fn scan_region<T: Scalar>(
    region: &RegionSpec<T>,
    vector_length: usize,
) -> Result<ScanResult<T>, ScanError> {
    region.validate()?;
    let mut buffer = IterationBuffer::new(vector_length)?;
    scan(region, &mut buffer)
}

/// Classifies the continued exponential over `region`, reusing `buffer` for
/// every point.
pub fn scan<T: Scalar>(
    region: &RegionSpec<T>,
    buffer: &mut IterationBuffer<T>,
) -> Result<ScanResult<T>, ScanError> {
    scan_with(&ContinuedExponential, region, buffer)
}

pub fn scan_with<T, M>(
    map: &M,
    region: &RegionSpec<T>,
    buffer: &mut IterationBuffer<T>,
) -> Result<ScanResult<T>, ScanError>
where
    T: Scalar,
    M: IteratedMap<T>,
{
    region.validate()?;

    let (step_re, step_im) = region.step_sizes();
    let width = region.columns();
    let height = region.rows();
    let metadata = ScanMetadata {
        min_re: region.min_re,
        max_re: region.max_re,
        min_im: region.min_im,
        max_im: region.max_im,
        num_re: region.num_re,
        num_im: region.num_im,
        step_re,
        step_im,
        eps: region.eps,
        max_lookback: region.max_lookback,
        vector_length: buffer.capacity(),
    };

    info!(
        "Scanning [{}, {}] x [{}, {}]: {}x{} points, d(Re)={} d(Im)={}",
        region.min_re.to_f64().unwrap_or(f64::NAN),
        region.max_re.to_f64().unwrap_or(f64::NAN),
        region.min_im.to_f64().unwrap_or(f64::NAN),
        region.max_im.to_f64().unwrap_or(f64::NAN),
        width,
        height,
        step_re.to_f64().unwrap_or(f64::NAN),
        step_im.to_f64().unwrap_or(f64::NAN),
    );

    let mut grid = ClassificationGrid::with_dimensions(width, height);
    for row in 0..height {
        let row_offset = T::from_usize(row).unwrap_or_else(T::nan) * step_im;
        let mut z = Complex::new(region.min_re, region.max_im - row_offset);
        for col in 0..width {
            let class = classify_with(map, z, buffer, region.eps, region.max_lookback);
            trace!("({row}, {col}) z={:?} -> {:?}", z, class);
            grid.cells.push(class);
            z.re = z.re + step_re;
        }
        debug!("Row {}/{} done", row + 1, height);
    }

    Ok(ScanResult { metadata, grid })
}
