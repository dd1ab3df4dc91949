//! # Risk Models
//!
//! $$
//! \hat\Sigma_{LW} = (1-\delta^\*)\,S + \delta^\*\,\bar\mu I
//! $$
//!
//! Covariance estimation: unbiased sample covariance and Ledoit-Wolf
//! analytic shrinkage toward a scaled-identity target. Shrinkage is
//! the estimator of choice when observations are scarce relative to
//! the number of securities and the sample covariance turns
//! ill-conditioned.

use nalgebra::DMatrix;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::AnalyticsError;
use crate::error::AnalyticsResult;
use crate::table::ReturnsTable;
use crate::types::Frequency;

/// Annualized covariance matrix keyed by security ordering.
#[derive(Clone, Debug)]
pub struct RiskModel {
  /// Security identifiers, matching the matrix row/column ordering.
  pub ids: Vec<String>,
  /// Square symmetric covariance matrix.
  pub matrix: Array2<f64>,
}

impl RiskModel {
  /// Wrap an existing covariance matrix, checking shape and symmetry.
  pub fn new(ids: Vec<String>, matrix: Array2<f64>) -> AnalyticsResult<Self> {
    let n = ids.len();
    if matrix.nrows() != n || matrix.ncols() != n {
      return Err(AnalyticsError::validation(format!(
        "risk model is {}x{} but carries {n} ids",
        matrix.nrows(),
        matrix.ncols()
      )));
    }
    for i in 0..n {
      for j in (i + 1)..n {
        if (matrix[(i, j)] - matrix[(j, i)]).abs() > 1e-9 {
          return Err(AnalyticsError::validation(format!(
            "risk model is not symmetric at ({i}, {j})"
          )));
        }
      }
    }

    Ok(Self { ids, matrix })
  }

  /// Number of securities covered by the model.
  pub fn n_securities(&self) -> usize {
    self.ids.len()
  }
}

/// Covariance estimation method. Callers pick one explicitly; there is
/// no fallback between the two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RiskModelMethod {
  /// Unbiased sample covariance.
  #[default]
  Sample,
  /// Ledoit-Wolf shrinkage toward a scaled identity.
  LedoitWolf,
}

impl RiskModelMethod {
  /// Parse a method from string.
  pub fn from_str(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "ledoit-wolf" | "ledoitwolf" | "shrinkage" | "lw" => Self::LedoitWolf,
      _ => Self::Sample,
    }
  }
}

fn centered_returns(table: &ReturnsTable) -> AnalyticsResult<Array2<f64>> {
  let n = table.n_periods();
  if n < 2 {
    return Err(AnalyticsError::insufficient_data(format!(
      "covariance estimation needs at least two observations, got {n}"
    )));
  }
  if table.n_securities() == 0 {
    return Err(AnalyticsError::validation(
      "covariance estimation needs at least one security",
    ));
  }

  let values = table.values().to_owned();
  let means: Array1<f64> = values.sum_axis(Axis(0)) / n as f64;
  Ok(values - &means)
}

/// Unbiased sample covariance of the period returns, scaled by
/// periods-per-year to annualize.
pub fn sample_covariance(
  table: &ReturnsTable,
  frequency: Frequency,
) -> AnalyticsResult<RiskModel> {
  let centered = centered_returns(table)?;
  let n = table.n_periods();
  let scale = frequency.periods_per_year() / (n - 1) as f64;
  let matrix = centered.t().dot(&centered) * scale;

  RiskModel::new(table.ids().to_vec(), matrix)
}

/// Ledoit-Wolf shrinkage covariance, annualized by periods-per-year.
///
/// The shrinkage intensity is the closed-form minimizer of the expected
/// Frobenius-norm error between the shrunk estimator and the true
/// covariance, computed from sample fourth moments and clipped to
/// `[0, 1]`. The target is `mean(diag(S)) * I`.
pub fn ledoit_wolf_covariance(
  table: &ReturnsTable,
  frequency: Frequency,
) -> AnalyticsResult<RiskModel> {
  let centered = centered_returns(table)?;
  let n = table.n_periods() as f64;
  let p = table.n_securities() as f64;

  // ML covariance, the estimator the intensity formula is derived for.
  let emp = centered.t().dot(&centered) / n;
  let mu = emp.diag().sum() / p;

  let target = Array2::<f64>::eye(table.n_securities()) * mu;
  let delta = (&emp - &target).mapv(|v| v * v).sum() / p;

  let squared = centered.mapv(|v| v * v);
  let beta_raw =
    ((squared.t().dot(&squared) / n) - emp.mapv(|v| v * v)).sum() / (n * p);
  let beta = beta_raw.max(0.0).min(delta);

  let shrinkage = if delta > 0.0 { beta / delta } else { 0.0 };
  let mut shrunk = emp * (1.0 - shrinkage);
  shrunk
    .diag_mut()
    .map_inplace(|v| *v += shrinkage * mu);

  let matrix = shrunk * frequency.periods_per_year();
  RiskModel::new(table.ids().to_vec(), matrix)
}

/// Estimate a risk model with the explicitly selected method.
pub fn risk_model(
  table: &ReturnsTable,
  method: RiskModelMethod,
  frequency: Frequency,
) -> AnalyticsResult<RiskModel> {
  match method {
    RiskModelMethod::Sample => sample_covariance(table, frequency),
    RiskModelMethod::LedoitWolf => ledoit_wolf_covariance(table, frequency),
  }
}

/// Spectral condition number of a symmetric matrix.
pub fn condition_number(matrix: &Array2<f64>) -> f64 {
  let n = matrix.nrows();
  if n == 0 || matrix.ncols() != n {
    return f64::NAN;
  }

  let data: Vec<f64> = matrix.iter().copied().collect();
  let eigenvalues = DMatrix::from_row_slice(n, n, &data)
    .symmetric_eigen()
    .eigenvalues;

  let max = eigenvalues.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
  let min = eigenvalues
    .iter()
    .fold(f64::INFINITY, |acc, v| acc.min(v.abs()));

  if min <= 0.0 {
    f64::INFINITY
  } else {
    max / min
  }
}
