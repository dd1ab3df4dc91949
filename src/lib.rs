//! # frontier-rs
//!
//! $$
//! \min_{\mathbf{w}\in[0,1]^n,\ \mathbf{1}^\top\mathbf{w}=1}
//! \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}
//! $$
//!
//! Portfolio analytics over a fixed universe of securities: historical
//! expected returns, sample and shrinkage risk models, constrained
//! minimum-volatility optimization swept into an efficient frontier,
//! and buy-and-hold backtesting with performance metrics.
//!
//! All computations are synchronous pure functions over immutable
//! in-memory tables; loading returns from storage, metadata catalogs
//! and presentation are the caller's concern.

pub mod backtest;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod optimize;
pub mod returns;
pub mod risk;
pub mod table;
pub mod types;

pub use backtest::run_backtest;
pub use backtest::simulate;
pub use backtest::BacktestScenario;
pub use engine::AnalyticsConfig;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use error::AnalyticsResult;
pub use metrics::cagr;
pub use metrics::max_drawdown;
pub use metrics::portfolio_metrics;
pub use metrics::portfolio_return;
pub use metrics::portfolio_std;
pub use optimize::best_sharpe;
pub use optimize::efficient_frontier;
pub use optimize::min_volatility;
pub use optimize::min_volatility_with_config;
pub use optimize::Constraint;
pub use optimize::ConstraintFn;
pub use optimize::FrontierConfig;
pub use optimize::FrontierOutcome;
pub use optimize::FrontierPoint;
pub use optimize::SolverConfig;
pub use returns::historical_expected_returns;
pub use returns::mean_expected_returns;
pub use risk::condition_number;
pub use risk::ledoit_wolf_covariance;
pub use risk::risk_model;
pub use risk::sample_covariance;
pub use risk::RiskModel;
pub use risk::RiskModelMethod;
pub use table::ReturnsTable;
pub use types::BacktestResult;
pub use types::ExpectedReturn;
pub use types::Frequency;
pub use types::Holding;
pub use types::PortfolioMetrics;
pub use types::PortfolioValue;
