//! # Shared Types
//!
//! Carrier types shared by the estimators, the optimizer and the
//! backtest simulator.

use chrono::NaiveDate;

/// Sampling frequency of a return series.
///
/// Annualization is always an explicit configuration choice; nothing is
/// inferred from date spacing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Frequency {
  /// 252 observations per year.
  Daily,
  /// 12 observations per year.
  #[default]
  Monthly,
  /// 1 observation per year.
  Yearly,
}

impl Frequency {
  /// Number of observation periods per year.
  pub fn periods_per_year(&self) -> f64 {
    match self {
      Frequency::Daily => 252.0,
      Frequency::Monthly => 12.0,
      Frequency::Yearly => 1.0,
    }
  }

  /// Parse a frequency from string.
  pub fn from_str(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "daily" | "d" => Self::Daily,
      "yearly" | "annual" | "y" => Self::Yearly,
      _ => Self::Monthly,
    }
  }
}

/// A position in a single security.
///
/// `amount` is a monetary value in backtest inputs and outputs, and a
/// dimensionless weight in optimizer outputs; the consuming component
/// decides the interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct Holding {
  /// Security identifier.
  pub id: String,
  /// Invested amount or portfolio weight.
  pub amount: f64,
}

impl Holding {
  pub fn new(id: impl Into<String>, amount: f64) -> Self {
    Self {
      id: id.into(),
      amount,
    }
  }
}

/// Annualized expected return for a single security.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpectedReturn {
  /// Security identifier.
  pub id: String,
  /// Annualized expected return as a signed fraction.
  pub expected_return: f64,
}

/// Portfolio value at a single date, with the per-holding breakdown
/// re-expressed as absolute values at that date.
#[derive(Clone, Debug)]
pub struct PortfolioValue {
  pub date: NaiveDate,
  pub portfolio_value: f64,
  pub holdings: Vec<Holding>,
}

/// Scalar summary of a portfolio value series.
#[derive(Clone, Copy, Debug, Default)]
pub struct PortfolioMetrics {
  /// Total return over the window, `value(end)/value(start) - 1`.
  pub portfolio_return: f64,
  /// Compound annual growth rate over whole-month years.
  pub cagr: f64,
  /// Sample standard deviation of period-over-period returns.
  pub standard_deviation: f64,
  /// Largest peak-to-trough decline, as a positive fraction.
  pub max_drawdown: f64,
}

/// Backtest output: the simulated value series plus its metrics.
#[derive(Clone, Debug)]
pub struct BacktestResult {
  pub metrics: PortfolioMetrics,
  pub portfolio_values: Vec<PortfolioValue>,
}

#[cfg(test)]
mod tests {
  use super::Frequency;

  #[test]
  fn frequency_periods_per_year() {
    assert_eq!(Frequency::Daily.periods_per_year(), 252.0);
    assert_eq!(Frequency::Monthly.periods_per_year(), 12.0);
    assert_eq!(Frequency::Yearly.periods_per_year(), 1.0);
  }

  #[test]
  fn frequency_from_str_defaults_to_monthly() {
    assert_eq!(Frequency::from_str("daily"), Frequency::Daily);
    assert_eq!(Frequency::from_str("annual"), Frequency::Yearly);
    assert_eq!(Frequency::from_str("whatever"), Frequency::Monthly);
  }
}
