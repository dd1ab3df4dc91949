//! # Minimum-Volatility Solver
//!
//! $$
//! \min_{\mathbf{w}} \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}
//! \quad \text{s.t.} \quad c_i(\mathbf{w}) = 0,\ d_j(\mathbf{w}) \ge 0,\ w \in [0,1]^n
//! $$
//!
//! Constrained local minimization of portfolio volatility. Weights are
//! reparameterized through a softmax, so the box bounds and the budget
//! constraint hold structurally; the remaining constraints are driven
//! to tolerance by a sequence of stiffening quadratic penalties, each
//! round warm-started from the previous optimum. The objective is a
//! convex quadratic form over a convex feasible set, so the local
//! optimum found is the global one whenever the risk model is positive
//! semidefinite.
//!
//! Tie-breaking at degenerate optima follows the deterministic
//! Nelder-Mead reflection sequence: repeated calls return the same
//! vertex.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::solver::neldermead::NelderMead;
use ndarray::Array2;
use tracing::debug;

use super::constraint::Constraint;
use crate::error::AnalyticsError;
use crate::error::AnalyticsResult;
use crate::metrics::portfolio_std;

/// Tunables of the penalized Nelder-Mead solve.
#[derive(Clone, Debug)]
pub struct SolverConfig {
  /// Iteration cap per penalty round.
  pub max_iters: u64,
  /// Simplex standard-deviation termination tolerance.
  pub sd_tolerance: f64,
  /// Escalating quadratic penalty weights, one solve per entry.
  pub penalties: Vec<f64>,
  /// Largest acceptable constraint violation at the solution.
  pub constraint_tolerance: f64,
}

impl Default for SolverConfig {
  fn default() -> Self {
    Self {
      max_iters: 5000,
      sd_tolerance: 1e-10,
      penalties: vec![1e2, 1e4, 1e6],
      constraint_tolerance: 1e-4,
    }
  }
}

fn softmax(x: &[f64]) -> Vec<f64> {
  let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
  let sum: f64 = exps.iter().sum();

  if sum < 1e-15 {
    vec![1.0 / x.len() as f64; x.len()]
  } else {
    exps.iter().map(|&e| e / sum).collect()
  }
}

struct MinVolCost {
  risk_model: Array2<f64>,
  constraints: Vec<Constraint>,
  penalty: f64,
}

impl CostFunction for MinVolCost {
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
    let w = softmax(x);
    let volatility = portfolio_std(&w, &self.risk_model);
    if !volatility.is_finite() {
      return Err(argmin::core::Error::msg(
        "portfolio variance is not finite; risk model may not be positive semidefinite",
      ));
    }

    let breach: f64 = self
      .constraints
      .iter()
      .map(|c| {
        let v = c.violation(&w);
        v * v
      })
      .sum();

    Ok(volatility + self.penalty * breach)
  }
}

/// Minimum-volatility weights with the default solver configuration.
///
/// Seeded from equal weights. Box bounds `[0, 1]` per weight are part
/// of the contract; `constraints` must still include the budget
/// constraint, and may pin the portfolio return or add arbitrary
/// equality/inequality conditions.
pub fn min_volatility(
  expected_returns: &[f64],
  risk_model: &Array2<f64>,
  constraints: &[Constraint],
) -> AnalyticsResult<Vec<f64>> {
  min_volatility_with_config(
    expected_returns,
    risk_model,
    constraints,
    &SolverConfig::default(),
  )
}

/// Minimum-volatility weights with explicit solver tunables.
pub fn min_volatility_with_config(
  expected_returns: &[f64],
  risk_model: &Array2<f64>,
  constraints: &[Constraint],
  config: &SolverConfig,
) -> AnalyticsResult<Vec<f64>> {
  let n = expected_returns.len();
  if n == 0 {
    return Err(AnalyticsError::validation(
      "optimization needs at least one security",
    ));
  }
  if risk_model.nrows() != n || risk_model.ncols() != n {
    return Err(AnalyticsError::validation(format!(
      "risk model is {}x{} but {n} expected returns were given",
      risk_model.nrows(),
      risk_model.ncols()
    )));
  }
  if config.penalties.is_empty() {
    return Err(AnalyticsError::validation(
      "solver config needs at least one penalty round",
    ));
  }

  // Zero logits map to the equal-weight seed.
  let mut x0 = vec![0.0; n];

  for &penalty in &config.penalties {
    let cost = MinVolCost {
      risk_model: risk_model.clone(),
      constraints: constraints.to_vec(),
      penalty,
    };

    let mut simplex = Vec::with_capacity(n + 1);
    simplex.push(x0.clone());
    for i in 0..n {
      let mut point = x0.clone();
      point[i] += 1.0;
      simplex.push(point);
    }

    let solver = NelderMead::new(simplex)
      .with_sd_tolerance(config.sd_tolerance)
      .map_err(|e| AnalyticsError::optimization(format!("solver setup failed: {e}")))?;

    let res = Executor::new(cost, solver)
      .configure(|state| state.max_iters(config.max_iters))
      .run()
      .map_err(|e| AnalyticsError::optimization(format!("solver failed: {e}")))?;

    x0 = res
      .state
      .best_param
      .ok_or_else(|| AnalyticsError::optimization("solver returned no parameters"))?;
    debug!(penalty, best_cost = res.state.best_cost, "penalty round done");
  }

  let weights = softmax(&x0);
  for constraint in constraints {
    let violation = constraint.violation(&weights);
    if violation > config.constraint_tolerance {
      return Err(AnalyticsError::optimization(format!(
        "constraint violated by {violation:.3e} after final penalty round"
      )));
    }
  }

  Ok(weights)
}
