//! # Optimization
//!
//! $$
//! \sigma_p = \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}
//! $$
//!
//! Constrained minimum-volatility optimization and the efficient
//! frontier sweep built on top of it.

pub mod constraint;
pub mod frontier;
pub mod solver;

pub use constraint::Constraint;
pub use constraint::ConstraintFn;
pub use frontier::best_sharpe;
pub use frontier::efficient_frontier;
pub use frontier::FrontierConfig;
pub use frontier::FrontierOutcome;
pub use frontier::FrontierPoint;
pub use solver::min_volatility;
pub use solver::min_volatility_with_config;
pub use solver::SolverConfig;
