//! # Constraints
//!
//! Declarative constraints over a weight vector. Each constraint owns
//! its inputs, so a frontier sweep binds one target per point instead
//! of sharing late-bound state across iterations.

use std::fmt;
use std::sync::Arc;

/// Pure constraint function over portfolio weights.
pub type ConstraintFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// A declarative optimizer constraint.
///
/// Equality constraints must evaluate to zero at the solution,
/// inequality constraints to a non-negative value.
#[derive(Clone)]
pub enum Constraint {
  Equality(ConstraintFn),
  Inequality(ConstraintFn),
}

impl Constraint {
  /// Equality constraint from any pure function of the weights.
  pub fn equality(f: impl Fn(&[f64]) -> f64 + Send + Sync + 'static) -> Self {
    Self::Equality(Arc::new(f))
  }

  /// Inequality (`>= 0`) constraint from any pure function of the
  /// weights.
  pub fn inequality(f: impl Fn(&[f64]) -> f64 + Send + Sync + 'static) -> Self {
    Self::Inequality(Arc::new(f))
  }

  /// Weights sum to one. Part of the minimum constraint set of every
  /// solve.
  pub fn budget() -> Self {
    Self::equality(|w| w.iter().sum::<f64>() - 1.0)
  }

  /// Weighted expected return pinned to `target`.
  ///
  /// Moves its own copy of the expected returns and the target into
  /// the closure; each frontier point constructs one independently.
  pub fn target_return(expected_returns: Vec<f64>, target: f64) -> Self {
    Self::equality(move |w| {
      w.iter()
        .zip(expected_returns.iter())
        .map(|(wi, mu)| wi * mu)
        .sum::<f64>()
        - target
    })
  }

  /// Evaluate the raw constraint function at `w`.
  pub fn evaluate(&self, w: &[f64]) -> f64 {
    match self {
      Self::Equality(f) | Self::Inequality(f) => f(w),
    }
  }

  /// Absolute breach at `w`: distance from zero for equalities, the
  /// shortfall below zero for inequalities.
  pub fn violation(&self, w: &[f64]) -> f64 {
    match self {
      Self::Equality(f) => f(w).abs(),
      Self::Inequality(f) => (-f(w)).max(0.0),
    }
  }
}

impl fmt::Debug for Constraint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Equality(_) => f.write_str("Constraint::Equality"),
      Self::Inequality(_) => f.write_str("Constraint::Inequality"),
    }
  }
}
