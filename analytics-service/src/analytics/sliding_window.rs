use reading_client::domain::Reading;

/// Window size actually used for a request of `n` over `len` readings.
///
/// `n <= 0` behaves as 1 and `n > len` behaves as `len`. Returns 0 only when
/// there are no readings.
pub fn effective_window(n: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let upper = i64::try_from(len).unwrap_or(i64::MAX);
    // Clamped into [1, len], so the cast cannot truncate.
    n.clamp(1, upper) as usize
}

/// Mean `units` over the last `n` readings (clamped, see [`effective_window`]).
///
/// `readings` must already be ascending by date; no re-sorting happens here.
/// An empty slice yields `0.0`.
pub fn sliding_average(readings: &[Reading], n: i64) -> f64 {
    let k = effective_window(n, readings.len());
    if k == 0 {
        return 0.0;
    }

    let sum: f64 = readings[readings.len() - k..]
        .iter()
        .map(Reading::units_or_zero)
        .sum();
    sum / k as f64
}
