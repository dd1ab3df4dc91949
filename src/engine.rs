//! # Analytics Engine
//!
//! High-level orchestration facade: one configured entry point for the
//! estimator, optimizer and backtest workflows over a caller-supplied
//! returns table.

use crate::backtest::run_backtest;
use crate::backtest::BacktestScenario;
use crate::error::AnalyticsResult;
use crate::optimize::efficient_frontier;
use crate::optimize::min_volatility;
use crate::optimize::Constraint;
use crate::optimize::FrontierConfig;
use crate::optimize::FrontierOutcome;
use crate::returns::historical_expected_returns;
use crate::risk::risk_model;
use crate::risk::RiskModel;
use crate::risk::RiskModelMethod;
use crate::table::ReturnsTable;
use crate::types::BacktestResult;
use crate::types::ExpectedReturn;
use crate::types::Frequency;
use crate::types::Holding;

/// Runtime configuration for [`AnalyticsEngine`].
#[derive(Clone, Debug, Default)]
pub struct AnalyticsConfig {
  /// Sampling frequency of the input tables.
  pub frequency: Frequency,
  /// Covariance estimator used by [`AnalyticsEngine::risk_model`].
  pub risk_model: RiskModelMethod,
  /// Frontier sweep configuration.
  pub frontier: FrontierConfig,
}

/// Single entry-point engine for the portfolio analytics workflows.
#[derive(Clone, Debug)]
pub struct AnalyticsEngine {
  config: AnalyticsConfig,
}

impl AnalyticsEngine {
  /// Construct a new engine with explicit configuration.
  pub fn new(config: AnalyticsConfig) -> Self {
    Self { config }
  }

  /// Borrow engine configuration.
  pub fn config(&self) -> &AnalyticsConfig {
    &self.config
  }

  /// Annualized geometric-mean expected returns for every security in
  /// the table.
  pub fn expected_returns(&self, table: &ReturnsTable) -> AnalyticsResult<Vec<ExpectedReturn>> {
    historical_expected_returns(table, self.config.frequency)
  }

  /// Annualized risk model with the configured estimator.
  pub fn risk_model(&self, table: &ReturnsTable) -> AnalyticsResult<RiskModel> {
    risk_model(table, self.config.risk_model, self.config.frequency)
  }

  /// Global minimum-volatility portfolio, returned as weight holdings.
  pub fn min_volatility_portfolio(&self, table: &ReturnsTable) -> AnalyticsResult<Vec<Holding>> {
    let expected = self.expected_returns(table)?;
    let model = self.risk_model(table)?;

    let mu: Vec<f64> = expected.iter().map(|e| e.expected_return).collect();
    let weights = min_volatility(&mu, &model.matrix, &[Constraint::budget()])?;

    Ok(
      model
        .ids
        .iter()
        .zip(weights.iter())
        .map(|(id, w)| Holding::new(id.clone(), *w))
        .collect(),
    )
  }

  /// Efficient frontier from the configured estimators and sweep.
  pub fn efficient_frontier(&self, table: &ReturnsTable) -> AnalyticsResult<Vec<FrontierOutcome>> {
    let expected = self.expected_returns(table)?;
    let model = self.risk_model(table)?;
    efficient_frontier(&expected, &model, &self.config.frontier)
  }

  /// Backtest a static portfolio and summarize it.
  pub fn backtest(
    &self,
    scenario: &BacktestScenario,
    table: &ReturnsTable,
  ) -> AnalyticsResult<BacktestResult> {
    run_backtest(scenario, table)
  }
}
