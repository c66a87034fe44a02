//! Random sampling of package lists.

use crate::error::{GraphError, Result};
use rand::Rng;

/// Keep each element of `items` independently at random.
///
/// A `rate` up to 1 is the probability of keeping each element. A rate above
/// 1 is a target count, converted to the fraction `rate / items.len()`.
///
/// # Errors
/// Returns error if `rate` is negative or NaN.
pub fn sample<T, R>(items: Vec<T>, rate: f64, rng: &mut R) -> Result<Vec<T>>
where
    R: Rng + ?Sized,
{
    if rate.is_nan() || rate < 0.0 {
        return Err(GraphError::InvalidSampleRate { rate });
    }
    if items.is_empty() {
        return Ok(items);
    }

    let fraction = if rate > 1.0 {
        rate / items.len() as f64
    } else {
        rate
    };

    Ok(items
        .into_iter()
        .filter(|_| rng.gen_range(0.0..1.0) < fraction)
        .collect())
}
