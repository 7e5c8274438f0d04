use num_traits::Float;

use tracing::debug;

use crate::{
    CLOSE, Cell, Error, Frame, Kbn, Result,
    returns::{DAILY_RETURNS, compute_returns},
};

/// Conventional number of trading days per year for fixed annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualization policy: how many return periods a year is taken to hold.
///
/// The two policies are distinct and not equivalent; pick the one that
/// matches how the dataset is understood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// A constant period count, conventionally [`TRADING_DAYS_PER_YEAR`].
    Fixed(f64),
    /// The dataset's own row count, for length-adaptive annualization.
    SeriesLength,
}

impl Scale {
    /// Resolves the policy to a concrete period count for a dataset with
    /// the given number of rows.
    pub fn resolve(&self, rows: usize) -> f64 {
        match self {
            Self::Fixed(scale) => *scale,
            Self::SeriesLength => rows as f64,
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::Fixed(TRADING_DAYS_PER_YEAR)
    }
}

/// Daily and annualized volatility of one price series.
///
/// `None` means the statistic is undefined (fewer than two usable return
/// observations). It is a valid result, distinct from zero volatility, and
/// serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct VolatilityResult {
    /// Sample standard deviation of the defined daily returns.
    pub daily: Option<f64>,
    /// Daily volatility scaled by the square root of the period count.
    pub annualized: Option<f64>,
}

/// Computes the sample standard deviation of a sequence of observations.
///
/// Uses the N−1 denominator and compensated summation. Undefined entries
/// must already be filtered out by the caller; feed it
/// [`ReturnSeries::defined`](crate::ReturnSeries::defined).
///
/// # Arguments
///
/// * `values` - The defined observations
///
/// # Returns
///
/// * `Option<T>` - The sample standard deviation, or `None` with fewer than
///   two observations, where sample variance is undefined
///
/// # Examples
///
/// ```
/// use assert_approx_eq::assert_approx_eq;
/// use historical_volatility::sample_stddev;
///
/// let stddev = sample_stddev([1.0f64, 2.0, 3.0, 4.0]);
/// assert_approx_eq!(stddev.unwrap_or(0.0), 1.2909944487358056, 1e-12);
///
/// assert_eq!(sample_stddev([0.5]), None);
/// ```
pub fn sample_stddev<T: Float + Default>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut count = 0usize;
    let mut sum = Kbn::<T>::default();
    let mut sum_sq = Kbn::<T>::default();
    for value in values {
        count += 1;
        sum += value;
        sum_sq += value * value;
    }

    if count < 2 {
        return None;
    }
    let n = T::from(count)?;
    let mean = sum.total() / n;
    let variance = (sum_sq.total() - n * mean * mean) / (n - T::one());
    // Rounding can push a zero-dispersion variance marginally negative.
    Some(variance.max(T::zero()).sqrt())
}

/// Scales a daily volatility to an annualized one.
///
/// # Arguments
///
/// * `daily` - The daily volatility
/// * `scale` - The number of return periods to compound over
///
/// # Returns
///
/// * `Result<T>` - `daily * sqrt(scale)`, or `Error::InvalidScale` unless
///   `scale` is finite and strictly positive
///
/// # Examples
///
/// ```
/// use historical_volatility::annualize;
///
/// assert!((annualize(0.02f64, 9.0)? - 0.06).abs() < 1e-15);
/// assert!(annualize(0.02, 0.0).is_err());
/// # Ok::<(), historical_volatility::Error>(())
/// ```
pub fn annualize<T: Float>(daily: T, scale: T) -> Result<T> {
    if !scale.is_finite() || scale <= T::zero() {
        return Err(Error::InvalidScale(scale.to_f64().unwrap_or(f64::NAN)));
    }
    Ok(daily * scale.sqrt())
}

/// Computes daily and annualized volatility from a tabular price series.
///
/// The engine holds only its annualization policy; every [`run`] is an
/// independent, side-effect-free invocation.
///
/// [`run`]: VolatilityEngine::run
///
/// # Examples
///
/// ```
/// use assert_approx_eq::assert_approx_eq;
/// use historical_volatility::{Cell, Frame, Scale, VolatilityEngine};
///
/// let mut frame = Frame::new(vec!["Close"])?;
/// for close in [100.0, 102.0, 101.0, 101.0, 105.0] {
///     frame.push_row(vec![Cell::Number(close)])?;
/// }
///
/// let engine = VolatilityEngine::new(Scale::Fixed(252.0));
/// let (enriched, result) = engine.run(frame)?;
///
/// assert_approx_eq!(result.daily.unwrap_or(0.0), 0.0219437, 1e-6);
/// assert_approx_eq!(result.annualized.unwrap_or(0.0), 0.3483456, 1e-6);
/// assert!(enriched.contains_column("Daily Returns"));
/// # Ok::<(), historical_volatility::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityEngine {
    /// Annualization policy applied to every run.
    scale: Scale,
}

impl VolatilityEngine {
    /// Creates an engine with the given annualization policy.
    pub const fn new(scale: Scale) -> Self {
        Self { scale }
    }

    /// Returns the engine's annualization policy.
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    /// Runs the volatility computation over one price series.
    ///
    /// Steps, in order: normalize column names, validate the resolved
    /// scale, extract `Close`, compute daily returns (appended to the frame
    /// as the `Daily Returns` column, undefined entries as empty cells),
    /// take their sample standard deviation, annualize.
    ///
    /// The input frame must not already carry a `Daily Returns` column.
    ///
    /// # Arguments
    ///
    /// * `frame` - The price series, oldest row first
    ///
    /// # Returns
    ///
    /// * `Result<(Frame, VolatilityResult)>` - The enriched frame and the
    ///   two statistics; schema and scale violations fail the whole run
    pub fn run(&self, frame: Frame) -> Result<(Frame, VolatilityResult)> {
        let frame = frame.normalize_columns()?;

        let scale = self.scale.resolve(frame.row_count());
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidScale(scale));
        }

        let closes = frame.numeric_column(CLOSE)?;
        let returns = compute_returns(&closes);
        let daily = sample_stddev(returns.defined());
        let annualized = daily.map(|d| annualize(d, scale)).transpose()?;

        debug!(
            rows = frame.row_count(),
            defined = returns.defined_count(),
            scale,
            "computed volatility"
        );

        let frame = frame.with_column(DAILY_RETURNS, returns.iter().map(Cell::from).collect())?;
        Ok((frame, VolatilityResult { daily, annualized }))
    }
}
