//! # Efficient Frontier
//!
//! $$
//! \{\, (\sigma_k, r_k) : r_k = r_{\min} + k\,\Delta r \,\}
//! $$
//!
//! Sweep of return-pinned minimum-volatility solves across evenly
//! spaced targets. Every point is an independent solve: the sweep runs
//! in parallel and a failed target is reported in place, never
//! aborting the rest of the frontier.

use ndarray::Array1;
use ndarray_stats::QuantileExt;
use rayon::prelude::*;
use tracing::info;
use tracing::warn;

use super::constraint::Constraint;
use super::solver::min_volatility_with_config;
use super::solver::SolverConfig;
use crate::error::AnalyticsError;
use crate::error::AnalyticsResult;
use crate::metrics::portfolio_std;
use crate::risk::RiskModel;
use crate::types::ExpectedReturn;
use crate::types::Holding;

/// Sweep configuration.
#[derive(Clone, Debug)]
pub struct FrontierConfig {
  /// Number of target returns between the per-security minimum and
  /// maximum, both inclusive.
  pub n_points: usize,
  /// Risk-free rate used for the sharpe ratio of each point.
  pub risk_free: f64,
  /// Solver tunables shared by every point.
  pub solver: SolverConfig,
}

impl Default for FrontierConfig {
  fn default() -> Self {
    Self {
      n_points: 20,
      risk_free: 0.0,
      solver: SolverConfig::default(),
    }
  }
}

/// One solved point on the efficient frontier.
#[derive(Clone, Debug)]
pub struct FrontierPoint {
  /// Weight allocation, ordered like the risk model.
  pub portfolio: Vec<Holding>,
  /// Weighted expected return of the allocation.
  pub expected_return: f64,
  /// Annualized volatility implied by the risk model.
  pub implied_standard_deviation: f64,
  /// `(expected_return - risk_free) / implied_standard_deviation`.
  pub sharpe: f64,
}

/// Result of one frontier target: the solved point or the per-point
/// error marker.
#[derive(Clone, Debug)]
pub struct FrontierOutcome {
  pub target_return: f64,
  pub point: Result<FrontierPoint, AnalyticsError>,
}

/// Sweep the efficient frontier.
///
/// Expected returns and risk model must cover the same securities in
/// the same order. Targets are evenly spaced over the closed range of
/// per-security expected returns; outcomes preserve target order.
pub fn efficient_frontier(
  expected_returns: &[ExpectedReturn],
  risk_model: &RiskModel,
  config: &FrontierConfig,
) -> AnalyticsResult<Vec<FrontierOutcome>> {
  if config.n_points < 2 {
    return Err(AnalyticsError::validation(
      "frontier sweep needs at least two target returns",
    ));
  }
  if expected_returns.len() != risk_model.n_securities()
    || expected_returns
      .iter()
      .zip(risk_model.ids.iter())
      .any(|(e, id)| &e.id != id)
  {
    return Err(AnalyticsError::validation(
      "expected returns and risk model must cover the same securities in the same order",
    ));
  }

  let mu: Vec<f64> = expected_returns.iter().map(|e| e.expected_return).collect();
  let mu_arr = Array1::from(mu.clone());
  let t_min = *mu_arr
    .min()
    .map_err(|_| AnalyticsError::validation("expected returns are empty or contain NaN"))?;
  let t_max = *mu_arr
    .max()
    .map_err(|_| AnalyticsError::validation("expected returns are empty or contain NaN"))?;

  let step = (t_max - t_min) / (config.n_points - 1) as f64;
  let targets: Vec<f64> = (0..config.n_points)
    .map(|k| t_min + step * k as f64)
    .collect();

  info!(
    n_points = config.n_points,
    t_min, t_max, "sweeping efficient frontier"
  );

  let outcomes = targets
    .into_par_iter()
    .map(|target| {
      // Each point binds its own target through a fresh constraint set.
      let constraints = [
        Constraint::budget(),
        Constraint::target_return(mu.clone(), target),
      ];

      let point = min_volatility_with_config(&mu, &risk_model.matrix, &constraints, &config.solver)
        .map(|weights| frontier_point(&weights, &mu, risk_model, config.risk_free))
        .map_err(|e| {
          let e = e.with_target(target);
          warn!(target_return = target, error = %e, "frontier point failed");
          e
        });

      FrontierOutcome {
        target_return: target,
        point,
      }
    })
    .collect();

  Ok(outcomes)
}

fn frontier_point(
  weights: &[f64],
  mu: &[f64],
  risk_model: &RiskModel,
  risk_free: f64,
) -> FrontierPoint {
  let expected_return: f64 = weights.iter().zip(mu.iter()).map(|(w, m)| w * m).sum();
  let implied_standard_deviation = portfolio_std(weights, &risk_model.matrix);
  let sharpe = if implied_standard_deviation > 1e-12 {
    (expected_return - risk_free) / implied_standard_deviation
  } else {
    0.0
  };

  let portfolio = risk_model
    .ids
    .iter()
    .zip(weights.iter())
    .map(|(id, w)| Holding::new(id.clone(), *w))
    .collect();

  FrontierPoint {
    portfolio,
    expected_return,
    implied_standard_deviation,
    sharpe,
  }
}

/// Highest-sharpe point among the solved outcomes, if any solve
/// succeeded.
pub fn best_sharpe(outcomes: &[FrontierOutcome]) -> Option<&FrontierPoint> {
  outcomes
    .iter()
    .filter_map(|o| o.point.as_ref().ok())
    .max_by(|a, b| {
      a.sharpe
        .partial_cmp(&b.sharpe)
        .unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;
  use tracing_test::traced_test;

  use super::best_sharpe;
  use super::efficient_frontier;
  use super::FrontierConfig;
  use crate::error::AnalyticsError;
  use crate::optimize::solver::SolverConfig;
  use crate::risk::RiskModel;
  use crate::types::ExpectedReturn;

  fn expected(pairs: &[(&str, f64)]) -> Vec<ExpectedReturn> {
    pairs
      .iter()
      .map(|(id, er)| ExpectedReturn {
        id: (*id).into(),
        expected_return: *er,
      })
      .collect()
  }

  fn two_asset_model() -> RiskModel {
    RiskModel::new(
      vec!["aaa".into(), "bbb".into()],
      array![[0.04, 0.0], [0.0, 0.02]],
    )
    .unwrap()
  }

  #[test]
  #[traced_test]
  fn sweep_covers_the_target_range_in_order() {
    let mu = expected(&[("aaa", 0.05), ("bbb", 0.10)]);
    let config = FrontierConfig {
      n_points: 5,
      ..FrontierConfig::default()
    };

    let outcomes = efficient_frontier(&mu, &two_asset_model(), &config).unwrap();

    assert_eq!(outcomes.len(), 5);
    assert_abs_diff_eq!(outcomes[0].target_return, 0.05, epsilon = 1e-12);
    assert_abs_diff_eq!(outcomes[4].target_return, 0.10, epsilon = 1e-12);
    for pair in outcomes.windows(2) {
      assert!(pair[0].target_return < pair[1].target_return);
    }

    for outcome in &outcomes {
      let point = outcome.point.as_ref().expect("point should solve");
      assert_abs_diff_eq!(point.expected_return, outcome.target_return, epsilon = 1e-3);
      let sum: f64 = point.portfolio.iter().map(|h| h.amount).sum();
      assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-6);
    }

    assert!(logs_contain("sweeping efficient frontier"));
  }

  #[test]
  fn volatility_rises_toward_the_high_return_end() {
    let mu = expected(&[("aaa", 0.05), ("bbb", 0.10)]);
    let config = FrontierConfig {
      n_points: 4,
      ..FrontierConfig::default()
    };

    let outcomes = efficient_frontier(&mu, &two_asset_model(), &config).unwrap();
    let stds: Vec<f64> = outcomes
      .iter()
      .map(|o| o.point.as_ref().unwrap().implied_standard_deviation)
      .collect();

    // with var(bbb) < var(aaa) the minimum sits between the endpoints
    assert!(stds[3] > stds[2]);
    assert!(stds[0] > stds[2]);
  }

  #[test]
  fn failed_points_do_not_abort_the_sweep() {
    let mu = expected(&[("aaa", 0.05), ("bbb", 0.10)]);
    let config = FrontierConfig {
      n_points: 3,
      solver: SolverConfig {
        constraint_tolerance: 0.0,
        ..SolverConfig::default()
      },
      ..FrontierConfig::default()
    };

    let outcomes = efficient_frontier(&mu, &two_asset_model(), &config).unwrap();

    assert_eq!(outcomes.len(), 3);
    for outcome in &outcomes {
      match &outcome.point {
        Err(AnalyticsError::Optimization { target_return, .. }) => {
          assert_eq!(*target_return, Some(outcome.target_return));
        }
        other => panic!("expected per-point failure, got {other:?}"),
      }
    }
  }

  #[test]
  fn mismatched_orderings_are_rejected() {
    let mu = expected(&[("bbb", 0.10), ("aaa", 0.05)]);
    let err = efficient_frontier(&mu, &two_asset_model(), &FrontierConfig::default()).unwrap_err();

    assert!(matches!(err, AnalyticsError::Validation { .. }));
  }

  #[test]
  fn best_sharpe_picks_the_highest_ratio() {
    let mu = expected(&[("aaa", 0.05), ("bbb", 0.10)]);
    let config = FrontierConfig {
      n_points: 6,
      ..FrontierConfig::default()
    };

    let outcomes = efficient_frontier(&mu, &two_asset_model(), &config).unwrap();
    let best = best_sharpe(&outcomes).unwrap();

    for outcome in &outcomes {
      if let Ok(point) = &outcome.point {
        assert!(best.sharpe >= point.sharpe);
      }
    }
  }
}
