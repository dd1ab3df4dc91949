//! # Expected Returns
//!
//! $$
//! \hat\mu = \Big(\prod_{t=1}^{N}(1+r_t)\Big)^{f/N} - 1
//! $$
//!
//! Historical expected-return estimators, annualized by sampling
//! frequency.

use ndarray::Axis;

use crate::error::AnalyticsError;
use crate::error::AnalyticsResult;
use crate::table::ReturnsTable;
use crate::types::ExpectedReturn;
use crate::types::Frequency;

/// Geometric-mean expected returns over the observed window.
///
/// Each periodic return must lie in `(-1, +inf)`; a security that lost
/// its full value (or more) in one period has no defined geometric mean
/// and is rejected with a validation error rather than propagated as
/// `NaN`.
pub fn historical_expected_returns(
  table: &ReturnsTable,
  frequency: Frequency,
) -> AnalyticsResult<Vec<ExpectedReturn>> {
  let n = table.n_periods();
  if n == 0 {
    return Err(AnalyticsError::insufficient_data(
      "expected returns need at least one observation",
    ));
  }

  let values = table.values();
  let degenerate: Vec<String> = table
    .ids()
    .iter()
    .zip(values.axis_iter(Axis(1)))
    .filter(|(_, col)| col.iter().any(|r| *r <= -1.0))
    .map(|(id, _)| id.clone())
    .collect();
  if !degenerate.is_empty() {
    return Err(AnalyticsError::validation(format!(
      "periodic returns must be greater than -1, violated by: {}",
      degenerate.join(", ")
    )));
  }

  let inv_years = frequency.periods_per_year() / n as f64;
  let estimates = table
    .ids()
    .iter()
    .zip(values.axis_iter(Axis(1)))
    .map(|(id, col)| {
      let growth = col.fold(1.0, |acc, r| acc * (1.0 + r));
      ExpectedReturn {
        id: id.clone(),
        expected_return: growth.powf(inv_years) - 1.0,
      }
    })
    .collect();

  Ok(estimates)
}

/// Arithmetic-mean expected returns, scaled linearly to one year.
pub fn mean_expected_returns(
  table: &ReturnsTable,
  frequency: Frequency,
) -> AnalyticsResult<Vec<ExpectedReturn>> {
  let n = table.n_periods();
  if n == 0 {
    return Err(AnalyticsError::insufficient_data(
      "expected returns need at least one observation",
    ));
  }

  let ppy = frequency.periods_per_year();
  let values = table.values();
  let estimates = table
    .ids()
    .iter()
    .zip(values.axis_iter(Axis(1)))
    .map(|(id, col)| ExpectedReturn {
      id: id.clone(),
      expected_return: col.sum() / n as f64 * ppy,
    })
    .collect();

  Ok(estimates)
}
