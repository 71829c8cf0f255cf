//! Compound annual growth rate over annual statement values.

/// CAGR in percent over `years`, from annual values ordered most recent
/// first.
///
/// Needs at least `years + 1` observations so the span has both endpoints,
/// and both endpoints must be positive; a loss-making endpoint makes the
/// geometric rate meaningless, so the result is `None`, never zero.
pub fn cagr(values: &[f64], years: usize) -> Option<f64> {
    if years == 0 || values.len() < years + 1 {
        return None;
    }
    let latest = values[0];
    let oldest = values[years];
    if latest <= 0.0 || oldest <= 0.0 {
        return None;
    }
    Some(((latest / oldest).powf(1.0 / years as f64) - 1.0) * 100.0)
}
