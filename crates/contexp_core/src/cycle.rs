use crate::traits::{ComplexSample, Scalar};

/// Searches backward from the second-to-last iterate for one within `eps` of
/// the last, looking at most `max_lookback` steps back.
///
/// Returns the backward distance of the closest match (1 = the previous
/// iterate), or 0 when the window holds no match. Only meaningful on a
/// sequence of valid iterates.
pub fn detect_cycle<T: Scalar>(values: &[ComplexSample<T>], eps: T, max_lookback: usize) -> usize {
    let Some((&last, earlier)) = values.split_last() else {
        return 0;
    };

    earlier
        .iter()
        .rev()
        .take(max_lookback)
        .position(|&current| (current - last).norm() < eps)
        .map_or(0, |idx| idx + 1)
}
