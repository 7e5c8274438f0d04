use num_traits::Float;

/// Name of the column the engine appends to the enriched frame.
pub const DAILY_RETURNS: &str = "Daily Returns";

/// Period-over-period returns derived from a closing-price series.
///
/// The series has the same length as its source: entry *i* holds
/// `close[i] / close[i-1] - 1` for *i ≥ 1*, and entry 0 is undefined since
/// there is no prior close to compare. An undefined entry is `None`, never
/// zero, and aggregate statistics must exclude it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries<T> {
    values: Vec<Option<T>>,
}

impl<T: Float> ReturnSeries<T> {
    /// Returns the number of entries, defined or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the entries as a slice, oldest first.
    pub fn as_slice(&self) -> &[Option<T>] {
        &self.values
    }

    /// Returns an iterator over all entries, undefined ones included.
    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.values.iter().copied()
    }

    /// Returns an iterator over the defined entries only.
    pub fn defined(&self) -> impl Iterator<Item = T> + '_ {
        self.values.iter().copied().flatten()
    }

    /// Returns the number of defined entries.
    pub fn defined_count(&self) -> usize {
        self.defined().count()
    }
}

/// Computes period-over-period returns from a closing-price series.
///
/// Entry 0 is undefined. A zero prior close makes the return at that
/// position undefined rather than failing the whole computation; every other
/// position is computed normally. Non-finite quotients are likewise marked
/// undefined instead of being propagated into downstream statistics.
///
/// # Arguments
///
/// * `closes` - The closing prices, oldest first
///
/// # Returns
///
/// * `ReturnSeries<T>` - Same length as `closes`, with `max(n - 1, 0)`
///   defined entries for well-formed input
///
/// # Examples
///
/// ```
/// use historical_volatility::compute_returns;
///
/// let returns = compute_returns(&[100.0, 102.0, 101.0]);
/// let entries: Vec<Option<f64>> = returns.iter().collect();
/// assert!(entries[0].is_none());
/// assert!((entries[1].unwrap_or(0.0) - 0.02).abs() < 1e-12);
/// ```
pub fn compute_returns<T: Float>(closes: &[T]) -> ReturnSeries<T> {
    let mut values = Vec::with_capacity(closes.len());
    if !closes.is_empty() {
        values.push(None);
    }
    for pair in closes.windows(2) {
        let (prev, close) = (pair[0], pair[1]);
        let ret = close / prev - T::one();
        values.push((!prev.is_zero() && ret.is_finite()).then_some(ret));
    }
    ReturnSeries { values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn length_matches_source() {
        assert_eq!(compute_returns::<f64>(&[]).len(), 0);
        assert_eq!(compute_returns(&[100.0]).len(), 1);
        assert_eq!(compute_returns(&[100.0, 101.0, 102.0]).len(), 3);
    }

    #[test]
    fn defined_count_is_n_minus_one() {
        assert_eq!(compute_returns::<f64>(&[]).defined_count(), 0);
        assert_eq!(compute_returns(&[100.0]).defined_count(), 0);
        assert_eq!(compute_returns(&[100.0, 101.0]).defined_count(), 1);
        assert_eq!(
            compute_returns(&[100.0, 102.0, 101.0, 101.0, 105.0]).defined_count(),
            4
        );
    }

    #[test]
    fn leading_entry_is_undefined() {
        let returns = compute_returns(&[100.0, 102.0]);
        assert_eq!(returns.as_slice()[0], None);
    }

    #[test]
    fn reference_series_values() {
        let returns = compute_returns(&[100.0, 102.0, 101.0, 101.0, 105.0]);
        let expected = [0.02, -0.00980392156862745, 0.0, 0.039603960396039604];
        let defined: Vec<f64> = returns.defined().collect();
        assert_eq!(defined.len(), expected.len());
        for (value, want) in defined.iter().zip(expected) {
            assert_approx_eq!(value, want, 1e-12);
        }
    }

    #[test]
    fn invariant_under_uniform_price_scaling() {
        let closes = [100.0, 102.0, 101.0, 101.0, 105.0];
        let scaled: Vec<f64> = closes.iter().map(|c| c * 3.7).collect();

        let base: Vec<f64> = compute_returns(&closes).defined().collect();
        let shifted: Vec<f64> = compute_returns(&scaled).defined().collect();
        assert_eq!(base.len(), shifted.len());
        for (a, b) in base.iter().zip(shifted) {
            assert_approx_eq!(a, b, 1e-12);
        }
    }

    #[test]
    fn zero_prior_close_is_undefined_at_that_position_only() {
        let returns = compute_returns(&[100.0, 0.0, 50.0, 55.0]);
        let entries: Vec<Option<f64>> = returns.iter().collect();
        assert_eq!(entries[0], None);
        assert_eq!(entries[1], Some(-1.0));
        assert_eq!(entries[2], None);
        match entries[3] {
            Some(value) => assert_approx_eq!(value, 0.1, 1e-12),
            None => panic!("expected a defined return"),
        }
        assert_eq!(returns.defined_count(), 2);
    }
}
