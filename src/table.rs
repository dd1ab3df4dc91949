//! # Returns Table
//!
//! Date-indexed table of periodic fractional returns, one column per
//! security. This is the in-memory form of the returns-repository
//! output contract: rows share one strictly increasing date axis and
//! missing observations are never zero-filled here.

use chrono::NaiveDate;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;

use crate::error::AnalyticsError;
use crate::error::AnalyticsResult;

/// Aligned periodic returns for a set of securities.
#[derive(Clone, Debug)]
pub struct ReturnsTable {
  ids: Vec<String>,
  dates: Vec<NaiveDate>,
  values: Array2<f64>,
}

impl ReturnsTable {
  /// Build a table from an already aligned return matrix.
  ///
  /// Rows are periods, columns follow `ids`. Dates must be strictly
  /// increasing and shapes must agree.
  pub fn new(
    ids: Vec<String>,
    dates: Vec<NaiveDate>,
    values: Array2<f64>,
  ) -> AnalyticsResult<Self> {
    if values.nrows() != dates.len() {
      return Err(AnalyticsError::validation(format!(
        "return matrix has {} rows but {} dates",
        values.nrows(),
        dates.len()
      )));
    }
    if values.ncols() != ids.len() {
      return Err(AnalyticsError::validation(format!(
        "return matrix has {} columns but {} ids",
        values.ncols(),
        ids.len()
      )));
    }
    for pair in dates.windows(2) {
      if pair[0] >= pair[1] {
        return Err(AnalyticsError::validation(format!(
          "dates must be strictly increasing, got {} before {}",
          pair[0], pair[1]
        )));
      }
    }
    for (i, id) in ids.iter().enumerate() {
      if ids[..i].contains(id) {
        return Err(AnalyticsError::validation(format!(
          "duplicate security id: {id}"
        )));
      }
    }

    Ok(Self { ids, dates, values })
  }

  /// Build a table from per-period rows, each row ordered like `ids`.
  pub fn from_rows(
    ids: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
  ) -> AnalyticsResult<Self> {
    let n_cols = ids.len();
    let mut flat = Vec::with_capacity(rows.len() * n_cols);
    for (i, row) in rows.iter().enumerate() {
      if row.len() != n_cols {
        return Err(AnalyticsError::validation(format!(
          "row {i} has {} entries, expected {n_cols}",
          row.len()
        )));
      }
      flat.extend_from_slice(row);
    }

    let values = Array2::from_shape_vec((rows.len(), n_cols), flat)
      .map_err(|e| AnalyticsError::validation(format!("bad return matrix shape: {e}")))?;
    Self::new(ids, dates, values)
  }

  /// Security identifiers, in column order.
  pub fn ids(&self) -> &[String] {
    &self.ids
  }

  /// Shared date axis.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Full return matrix view, rows = periods.
  pub fn values(&self) -> ArrayView2<'_, f64> {
    self.values.view()
  }

  /// Number of observed periods.
  pub fn n_periods(&self) -> usize {
    self.dates.len()
  }

  /// Number of securities.
  pub fn n_securities(&self) -> usize {
    self.ids.len()
  }

  /// Return column view for a single security.
  pub fn column(&self, id: &str) -> Option<ArrayView1<'_, f64>> {
    let idx = self.ids.iter().position(|i| i == id)?;
    Some(self.values.column(idx))
  }

  /// Restrict to the requested securities, reordering columns to the
  /// request order. Every missing id is reported at once.
  pub fn select(&self, ids: &[String]) -> AnalyticsResult<Self> {
    let mut indices = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in ids {
      match self.ids.iter().position(|i| i == id) {
        Some(idx) => indices.push(idx),
        None => missing.push(id.clone()),
      }
    }
    if !missing.is_empty() {
      return Err(AnalyticsError::security_not_found(missing));
    }

    let mut values = Array2::zeros((self.n_periods(), ids.len()));
    for (j, &idx) in indices.iter().enumerate() {
      values.column_mut(j).assign(&self.values.column(idx));
    }

    Self::new(ids.to_vec(), self.dates.clone(), values)
  }

  /// Restrict rows to the inclusive `[start, end]` date range.
  pub fn window(&self, start: NaiveDate, end: NaiveDate) -> AnalyticsResult<Self> {
    if start > end {
      return Err(AnalyticsError::validation(format!(
        "window start {start} is after end {end}"
      )));
    }

    let rows: Vec<usize> = self
      .dates
      .iter()
      .enumerate()
      .filter(|(_, d)| **d >= start && **d <= end)
      .map(|(i, _)| i)
      .collect();

    let dates = rows.iter().map(|&i| self.dates[i]).collect();
    let mut values = Array2::zeros((rows.len(), self.n_securities()));
    for (i, &idx) in rows.iter().enumerate() {
      values.row_mut(i).assign(&self.values.row(idx));
    }

    Self::new(self.ids.clone(), dates, values)
  }
}
