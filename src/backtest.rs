//! # Backtest Simulator
//!
//! $$
//! V_i(t) = a_i \prod_{s \le t} (1 + r_{i,s})
//! $$
//!
//! Buy-and-hold simulation of a static portfolio over a historical
//! window. The first period in the window anchors at par: its return
//! is forced to zero for every security so a partial period straddling
//! the window boundary is not double-counted.

use chrono::NaiveDate;
use impl_new_derive::ImplNew;
use ndarray::Axis;
use tracing::debug;

use crate::error::AnalyticsError;
use crate::error::AnalyticsResult;
use crate::metrics::portfolio_metrics;
use crate::table::ReturnsTable;
use crate::types::BacktestResult;
use crate::types::Holding;
use crate::types::PortfolioValue;

/// Static portfolio plus the window to simulate it over.
#[derive(ImplNew, Clone, Debug)]
pub struct BacktestScenario {
  /// Holdings with monetary amounts invested at the window start.
  pub portfolio: Vec<Holding>,
  /// First date of the window, inclusive.
  pub start_date: NaiveDate,
  /// Last date of the window, inclusive.
  pub end_date: NaiveDate,
}

fn validate_holdings(holdings: &[Holding]) -> AnalyticsResult<()> {
  if holdings.is_empty() {
    return Err(AnalyticsError::validation("portfolio has no holdings"));
  }
  for (i, holding) in holdings.iter().enumerate() {
    if holdings[..i].iter().any(|h| h.id == holding.id) {
      return Err(AnalyticsError::validation(format!(
        "duplicate holding: {}",
        holding.id
      )));
    }
  }
  Ok(())
}

/// Simulate per-holding and total portfolio value over the window.
///
/// Fails fast with the full missing-identifier list when any requested
/// security is absent from the returns table; partial results are
/// never produced.
pub fn simulate(
  holdings: &[Holding],
  returns: &ReturnsTable,
  start_date: NaiveDate,
  end_date: NaiveDate,
) -> AnalyticsResult<Vec<PortfolioValue>> {
  validate_holdings(holdings)?;

  let ids: Vec<String> = holdings.iter().map(|h| h.id.clone()).collect();
  let window = returns.select(&ids)?.window(start_date, end_date)?;
  if window.n_periods() == 0 {
    return Err(AnalyticsError::insufficient_data(format!(
      "no observations between {start_date} and {end_date}"
    )));
  }

  debug!(
    n_periods = window.n_periods(),
    n_securities = window.n_securities(),
    "simulating portfolio"
  );

  let mut growth = window.values().to_owned();
  // The window's first observation anchors at par value.
  growth.row_mut(0).fill(0.0);
  growth.mapv_inplace(|r| 1.0 + r);
  growth.accumulate_axis_inplace(Axis(0), |&prev, cur| *cur *= prev);

  let series = window
    .dates()
    .iter()
    .zip(growth.axis_iter(Axis(0)))
    .map(|(date, factors)| {
      let values: Vec<Holding> = holdings
        .iter()
        .zip(factors.iter())
        .map(|(holding, factor)| Holding::new(holding.id.clone(), holding.amount * factor))
        .collect();
      let portfolio_value = values.iter().map(|h| h.amount).sum();

      PortfolioValue {
        date: *date,
        portfolio_value,
        holdings: values,
      }
    })
    .collect();

  Ok(series)
}

/// Simulate a scenario and summarize it in one call.
pub fn run_backtest(
  scenario: &BacktestScenario,
  returns: &ReturnsTable,
) -> AnalyticsResult<BacktestResult> {
  let portfolio_values = simulate(
    &scenario.portfolio,
    returns,
    scenario.start_date,
    scenario.end_date,
  )?;
  let metrics = portfolio_metrics(&portfolio_values, scenario.start_date, scenario.end_date)?;

  Ok(BacktestResult {
    metrics,
    portfolio_values,
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use chrono::NaiveDate;

  use super::run_backtest;
  use super::simulate;
  use super::BacktestScenario;
  use crate::error::AnalyticsError;
  use crate::table::ReturnsTable;
  use crate::types::Holding;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn monthly_table(ids: Vec<String>, rows: Vec<Vec<f64>>) -> ReturnsTable {
    let dates = (0..rows.len())
      .map(|i| {
        date(2024, 1, 31)
          .checked_add_months(chrono::Months::new(i as u32))
          .unwrap()
      })
      .collect();
    ReturnsTable::from_rows(ids, dates, rows).unwrap()
  }

  #[test]
  fn single_security_growth_path() {
    let table = monthly_table(
      vec!["aaa".into()],
      vec![vec![0.0], vec![0.1], vec![-0.1]],
    );
    let holdings = [Holding::new("aaa", 100.0)];

    let series = simulate(&holdings, &table, date(2024, 1, 1), date(2024, 12, 31)).unwrap();

    let values: Vec<f64> = series.iter().map(|v| v.portfolio_value).collect();
    assert_relative_eq!(values[0], 100.0, epsilon = 1e-9);
    assert_relative_eq!(values[1], 110.0, epsilon = 1e-9);
    assert_relative_eq!(values[2], 99.0, epsilon = 1e-9);
  }

  #[test]
  fn first_window_return_is_forced_to_zero() {
    // non-zero first-period return must not move the starting value
    let table = monthly_table(vec!["aaa".into()], vec![vec![0.5], vec![0.1]]);
    let holdings = [Holding::new("aaa", 100.0)];

    let series = simulate(&holdings, &table, date(2024, 1, 1), date(2024, 12, 31)).unwrap();

    assert_relative_eq!(series[0].portfolio_value, 100.0, epsilon = 1e-9);
    assert_relative_eq!(series[1].portfolio_value, 110.0, epsilon = 1e-9);
  }

  #[test]
  fn two_security_portfolio_sums_per_date() {
    let table = monthly_table(
      vec!["aaa".into(), "bbb".into()],
      vec![vec![0.0, 0.0], vec![0.1, -0.05]],
    );
    let holdings = [Holding::new("aaa", 100.0), Holding::new("bbb", 100.0)];

    let series = simulate(&holdings, &table, date(2024, 1, 1), date(2024, 12, 31)).unwrap();

    assert_relative_eq!(series[0].portfolio_value, 200.0, epsilon = 1e-9);
    assert_relative_eq!(series[1].portfolio_value, 205.0, epsilon = 1e-9);

    let breakdown = &series[1].holdings;
    assert_relative_eq!(breakdown[0].amount, 110.0, epsilon = 1e-9);
    assert_relative_eq!(breakdown[1].amount, 95.0, epsilon = 1e-9);
  }

  #[test]
  fn missing_securities_fail_fast() {
    let table = monthly_table(vec!["aaa".into()], vec![vec![0.0], vec![0.1]]);
    let holdings = [Holding::new("aaa", 100.0), Holding::new("zzz", 50.0)];

    let err = simulate(&holdings, &table, date(2024, 1, 1), date(2024, 12, 31)).unwrap_err();
    assert_eq!(err, AnalyticsError::security_not_found(vec!["zzz".into()]));
  }

  #[test]
  fn duplicate_holdings_are_rejected() {
    let table = monthly_table(vec!["aaa".into()], vec![vec![0.0], vec![0.1]]);
    let holdings = [Holding::new("aaa", 100.0), Holding::new("aaa", 50.0)];

    let err = simulate(&holdings, &table, date(2024, 1, 1), date(2024, 12, 31)).unwrap_err();
    assert!(matches!(err, AnalyticsError::Validation { .. }));
  }

  #[test]
  fn empty_window_is_insufficient_data() {
    let table = monthly_table(vec!["aaa".into()], vec![vec![0.0], vec![0.1]]);
    let holdings = [Holding::new("aaa", 100.0)];

    let err = simulate(&holdings, &table, date(2030, 1, 1), date(2030, 12, 31)).unwrap_err();
    assert!(matches!(err, AnalyticsError::InsufficientData { .. }));
  }

  #[test]
  fn backtest_combines_series_and_metrics() {
    let table = monthly_table(
      vec!["aaa".into()],
      vec![vec![0.0], vec![0.1], vec![-0.1]],
    );
    let scenario = BacktestScenario::new(
      vec![Holding::new("aaa", 100.0)],
      date(2024, 1, 1),
      date(2024, 4, 1),
    );

    let result = run_backtest(&scenario, &table).unwrap();

    assert_eq!(result.portfolio_values.len(), 3);
    assert_relative_eq!(result.metrics.portfolio_return, -0.01, epsilon = 1e-9);
    assert_relative_eq!(result.metrics.max_drawdown, 0.1, epsilon = 1e-9);
  }
}
