/// Computes a single percentile value from sorted data.
///
/// This function uses the nearest-rank method: for a dataset with `n` values,
/// the percentile `p` (a fraction in `[0, 1]`) is the value at position
/// `floor(n * p)`, clamped to the last index.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `percentile` - The percentile to compute, as a fraction (`0.5` is the median)
///
/// # Returns
///
/// The value at the specified percentile, or `None` if the input is empty.
///
/// # Panics
///
/// Panics if `sorted_values` is not sorted in ascending order.
///
/// # Examples
///
/// ```
/// use rld_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&values, 0.5), Some(3.0));
/// assert_eq!(compute_percentile(&values, 0.25), Some(2.0));
/// assert_eq!(compute_percentile(&values, 1.0), Some(5.0));
/// assert_eq!(compute_percentile(&[], 0.5), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );
    if sorted_values.is_empty() {
        return None;
    }
    let idx = (sorted_values.len() as f64 * percentile.clamp(0.0, 1.0)) as usize;
    let idx = idx.min(sorted_values.len() - 1);
    Some(sorted_values[idx])
}
