//! # Errors
//!
//! Error taxonomy shared by every analytics module.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors produced by the analytics engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
  /// One or more requested securities have no return data.
  #[error("no return data for securities: {}", .ids.join(", "))]
  SecurityNotFound {
    /// Every missing identifier, in request order.
    ids: Vec<String>,
  },

  /// A window yielded fewer observations than the computation requires.
  #[error("insufficient data: {reason}")]
  InsufficientData { reason: String },

  /// The constrained solver failed to converge.
  #[error("optimization failed{}: {}", .target_return.map(|t| format!(" at target return {t}")).unwrap_or_default(), .reason)]
  Optimization {
    /// Target return of the failed frontier point, if any.
    target_return: Option<f64>,
    reason: String,
  },

  /// Malformed inputs: shape mismatches, bad constraints, bad dates.
  #[error("validation failed: {reason}")]
  Validation { reason: String },
}

impl AnalyticsError {
  /// Missing-security error carrying every absent identifier.
  pub fn security_not_found(ids: Vec<String>) -> Self {
    Self::SecurityNotFound { ids }
  }

  /// Too few observations for the requested computation.
  pub fn insufficient_data(reason: impl Into<String>) -> Self {
    Self::InsufficientData {
      reason: reason.into(),
    }
  }

  /// Solver failure outside a frontier sweep.
  pub fn optimization(reason: impl Into<String>) -> Self {
    Self::Optimization {
      target_return: None,
      reason: reason.into(),
    }
  }

  /// Solver failure for a specific frontier target.
  pub fn optimization_at(target_return: f64, reason: impl Into<String>) -> Self {
    Self::Optimization {
      target_return: Some(target_return),
      reason: reason.into(),
    }
  }

  /// Malformed input error.
  pub fn validation(reason: impl Into<String>) -> Self {
    Self::Validation {
      reason: reason.into(),
    }
  }

  /// Attach a frontier target to an optimization error, leaving other
  /// variants untouched.
  pub(crate) fn with_target(self, target: f64) -> Self {
    match self {
      Self::Optimization { reason, .. } => Self::Optimization {
        target_return: Some(target),
        reason,
      },
      other => other,
    }
  }
}
