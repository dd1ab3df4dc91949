//! # Portfolio Metrics
//!
//! $$
//! \text{CAGR} = \Big(\frac{V_T}{V_0}\Big)^{1/y} - 1
//! $$
//!
//! Scalar performance summaries of a simulated portfolio value series:
//! total return, CAGR, return volatility and maximum drawdown.

use chrono::Datelike;
use chrono::NaiveDate;
use ndarray::Array2;
use ndarray::ArrayView1;
use statrs::statistics::Statistics;

use crate::error::AnalyticsError;
use crate::error::AnalyticsResult;
use crate::types::PortfolioMetrics;
use crate::types::PortfolioValue;

/// Whole-month difference between two calendar dates.
///
/// Day-of-month is ignored on purpose: the year count feeding CAGR is
/// month-based to stay comparable with monthly-sampled return data.
fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
  (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

/// Total return over a window.
pub fn portfolio_return(start_value: f64, end_value: f64) -> f64 {
  end_value / start_value - 1.0
}

/// Compound annual growth rate over whole-month years.
///
/// A window spanning less than one whole calendar month cannot be
/// annualized and is rejected.
pub fn cagr(
  start_value: f64,
  end_value: f64,
  start_date: NaiveDate,
  end_date: NaiveDate,
) -> AnalyticsResult<f64> {
  if start_value <= 0.0 || end_value <= 0.0 {
    return Err(AnalyticsError::validation(format!(
      "cagr needs positive start and end values, got {start_value} and {end_value}"
    )));
  }

  let months = months_between(start_date, end_date);
  if months <= 0 {
    return Err(AnalyticsError::insufficient_data(format!(
      "cagr needs a window of at least one whole month, {start_date} to {end_date} spans {months}"
    )));
  }

  let years = months as f64 / 12.0;
  Ok((end_value / start_value).powf(1.0 / years) - 1.0)
}

/// Maximum drawdown of a value series as a positive fraction.
///
/// Zero or one observation means no drawdown is observable; 0.0 is
/// returned in that case.
pub fn max_drawdown(values: &[f64]) -> f64 {
  let mut peak = f64::NEG_INFINITY;
  let mut worst = 0.0_f64;
  for &value in values {
    peak = peak.max(value);
    if peak > 0.0 {
      worst = worst.max((peak - value) / peak);
    }
  }
  worst
}

/// Portfolio standard deviation `sqrt(wᵀ Σ w)` for a weight vector.
///
/// No clamping is applied: a non-positive-semidefinite covariance can
/// produce `NaN`, which the optimizer surfaces as a failure instead of
/// a silently wrong answer.
pub fn portfolio_std(weights: &[f64], covariance: &Array2<f64>) -> f64 {
  let w = ArrayView1::from(weights);
  let sigma_w = covariance.dot(&w);
  w.dot(&sigma_w).sqrt()
}

/// Compute all metrics of a simulated value series.
///
/// The standard deviation uses the sample (n-1) estimator over
/// period-over-period value ratios; with exactly one period return it
/// is defined as 0.0 rather than left to library behavior.
pub fn portfolio_metrics(
  values: &[PortfolioValue],
  start_date: NaiveDate,
  end_date: NaiveDate,
) -> AnalyticsResult<PortfolioMetrics> {
  if values.len() < 2 {
    return Err(AnalyticsError::insufficient_data(format!(
      "metrics need at least two observations, got {}",
      values.len()
    )));
  }

  let series: Vec<f64> = values.iter().map(|v| v.portfolio_value).collect();
  let start_value = series[0];
  let end_value = series[series.len() - 1];

  let period_returns: Vec<f64> = series
    .windows(2)
    .map(|pair| pair[1] / pair[0] - 1.0)
    .collect();
  let standard_deviation = if period_returns.len() < 2 {
    0.0
  } else {
    period_returns.iter().std_dev()
  };

  Ok(PortfolioMetrics {
    portfolio_return: portfolio_return(start_value, end_value),
    cagr: cagr(start_value, end_value, start_date, end_date)?,
    standard_deviation,
    max_drawdown: max_drawdown(&series),
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use chrono::NaiveDate;

  use super::cagr;
  use super::max_drawdown;
  use super::portfolio_metrics;
  use super::portfolio_return;
  use super::portfolio_std;
  use crate::error::AnalyticsError;
  use crate::types::PortfolioValue;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn series(values: &[f64]) -> Vec<PortfolioValue> {
    values
      .iter()
      .enumerate()
      .map(|(i, &v)| PortfolioValue {
        date: date(2024, 1, 1)
          .checked_add_months(chrono::Months::new(i as u32))
          .unwrap(),
        portfolio_value: v,
        holdings: vec![],
      })
      .collect()
  }

  #[test]
  fn doubling_over_four_years() {
    let value = cagr(100.0, 200.0, date(2020, 1, 1), date(2024, 1, 1)).unwrap();
    assert_relative_eq!(value, 2.0_f64.powf(0.25) - 1.0, epsilon = 1e-12);
  }

  #[test]
  fn cagr_rejects_sub_month_window() {
    let err = cagr(100.0, 101.0, date(2024, 1, 1), date(2024, 1, 20)).unwrap_err();
    assert!(matches!(err, AnalyticsError::InsufficientData { .. }));
  }

  #[test]
  fn drawdown_tracks_running_peak() {
    let dd = max_drawdown(&[100.0, 120.0, 90.0, 110.0]);
    assert_relative_eq!(dd, 0.25, epsilon = 1e-12);
  }

  #[test]
  fn drawdown_of_monotone_series_is_zero() {
    assert_eq!(max_drawdown(&[100.0, 105.0, 110.0]), 0.0);
    assert_eq!(max_drawdown(&[100.0]), 0.0);
    assert_eq!(max_drawdown(&[]), 0.0);
  }

  #[test]
  fn std_of_known_series() {
    let values = series(&[100.0, 110.0, 99.0]);
    let metrics = portfolio_metrics(&values, date(2024, 1, 1), date(2024, 3, 1)).unwrap();

    // returns are +10% and -10%, sample std = sqrt(0.02)
    assert_relative_eq!(metrics.standard_deviation, 0.02_f64.sqrt(), epsilon = 1e-12);
    assert_relative_eq!(metrics.portfolio_return, -0.01, epsilon = 1e-12);
  }

  #[test]
  fn single_period_return_has_zero_std() {
    let values = series(&[100.0, 104.0]);
    let metrics = portfolio_metrics(&values, date(2024, 1, 1), date(2024, 2, 1)).unwrap();

    assert_eq!(metrics.standard_deviation, 0.0);
    assert_relative_eq!(metrics.portfolio_return, 0.04, epsilon = 1e-12);
  }

  #[test]
  fn single_observation_is_insufficient() {
    let values = series(&[100.0]);
    let err = portfolio_metrics(&values, date(2024, 1, 1), date(2024, 2, 1)).unwrap_err();
    assert!(matches!(err, AnalyticsError::InsufficientData { .. }));
  }

  #[test]
  fn portfolio_std_matches_hand_computation() {
    let cov = ndarray::array![[0.04, 0.01], [0.01, 0.09]];
    let std = portfolio_std(&[0.5, 0.5], &cov);
    assert_relative_eq!(std, (0.25_f64 * (0.04 + 0.09 + 0.02)).sqrt(), epsilon = 1e-12);
  }

  #[test]
  fn simple_return_is_end_over_start() {
    assert_relative_eq!(portfolio_return(200.0, 205.0), 0.025, epsilon = 1e-12);
  }
}
