//! Pareto dominance and reference points of sets of objective vectors.
//!
//! All objectives are minimized.

use std::cmp::Ordering;

use crate::error::{Error, Result};

/// Describes Pareto dominance for slices of objective values.
pub(crate) trait ParetoDominance {
  /// Returns `Less` if `self` dominates `other`, `Greater` if `other`
  /// dominates `self`, otherwise `Equal`. `self` dominates `other` if no
  /// value of `self` is greater than the respective `other` value and at
  /// least one is lower. NaN values never decide dominance.
  fn dominance(&self, other: &Self) -> Ordering;
}

impl ParetoDominance for [f64] {
  fn dominance(&self, other: &Self) -> Ordering {
    let mut ord = Ordering::Equal;
    for (a, b) in self.iter().zip(other) {
      match (ord, a.partial_cmp(b).unwrap_or(Ordering::Equal)) {
        (Ordering::Equal, next_ord) => ord = next_ord,
        (Ordering::Greater, Ordering::Less)
        | (Ordering::Less, Ordering::Greater) => return Ordering::Equal,
        _ => {}
      }
    }
    ord
  }
}

fn check_points(points: &[Vec<f64>]) -> Result<usize> {
  let Some(first) = points.first() else {
    return Err(Error::invalid("the set of points is empty"));
  };
  let dim = first.len();
  if dim == 0 {
    return Err(Error::invalid("points must have at least one component"));
  }
  if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| p.len() != dim)
  {
    return Err(Error::invalid(format!(
      "all points must have dimension {dim}, but point {i} has dimension {}",
      p.len()
    )));
  }
  Ok(dim)
}

/// Returns `true` if `a` Pareto-dominates `b`.
///
/// # Errors
///
/// Fails with [`Error::InvalidArgument`] if `a` and `b` have different
/// lengths.
///
/// # Examples
/// ```
/// # use decompose::pareto::pareto_dominance;
/// assert!(pareto_dominance(&[1.0, 2.0], &[2.0, 2.0]).unwrap());
/// assert!(!pareto_dominance(&[1.0, 3.0], &[2.0, 2.0]).unwrap());
/// ```
pub fn pareto_dominance(a: &[f64], b: &[f64]) -> Result<bool> {
  if a.len() != b.len() {
    return Err(Error::invalid(format!(
      "cannot compare objective vectors of lengths {} and {}",
      a.len(),
      b.len()
    )));
  }
  Ok(a.dominance(b) == Ordering::Less)
}

/// Indices of the points not dominated by any other point, in increasing
/// order.
///
/// # Errors
///
/// Fails with [`Error::InvalidArgument`] if `points` is empty or its points
/// have different dimensions.
pub fn non_dominated_front(points: &[Vec<f64>]) -> Result<Vec<usize>> {
  check_points(points)?;
  Ok(
    (0..points.len())
      .filter(|&i| {
        points
          .iter()
          .all(|p| p.dominance(&points[i]) != Ordering::Less)
      })
      .collect(),
  )
}

/// The ideal point: the component-wise minimum of `points`.
///
/// # Errors
///
/// Fails with [`Error::InvalidArgument`] if `points` is empty or its points
/// have different dimensions.
pub fn ideal(points: &[Vec<f64>]) -> Result<Vec<f64>> {
  let dim = check_points(points)?;
  Ok(points.iter().fold(vec![f64::INFINITY; dim], |acc, p| {
    acc.iter().zip(p).map(|(a, b)| a.min(*b)).collect()
  }))
}

/// The nadir point: the component-wise maximum of the non-dominated points.
///
/// # Errors
///
/// Fails with [`Error::InvalidArgument`] if `points` is empty or its points
/// have different dimensions.
pub fn nadir(points: &[Vec<f64>]) -> Result<Vec<f64>> {
  let dim = check_points(points)?;
  Ok(non_dominated_front(points)?.into_iter().fold(
    vec![f64::NEG_INFINITY; dim],
    |acc, i| acc.iter().zip(&points[i]).map(|(a, b)| a.max(*b)).collect(),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn points() -> Vec<Vec<f64>> {
    vec![
      vec![1.0, 5.0],
      vec![2.0, 2.0],
      vec![5.0, 1.0],
      vec![3.0, 3.0],
      vec![6.0, 6.0],
    ]
  }

  #[test]
  fn test_pareto_dominance() {
    assert_eq!([1.0, 2.0, 3.0].dominance(&[1.0, 2.0, 3.0]), Ordering::Equal);
    assert_eq!([1.0, 2.0, 3.0].dominance(&[3.0, 2.0, 1.0]), Ordering::Equal);
    assert_eq!(
      [-2.0, 1.0, 3.0].dominance(&[2.0, -1.0, -3.0]),
      Ordering::Equal
    );

    assert_eq!(
      [10.0, 2.0, 3.0].dominance(&[1.0, 2.0, 3.0]),
      Ordering::Greater
    );
    assert_eq!(
      [1.0, 2.0, 30.0].dominance(&[1.0, 2.0, 3.0]),
      Ordering::Greater
    );

    assert_eq!([1.0, 2.0, 3.0].dominance(&[1.0, 20.0, 3.0]), Ordering::Less);
    assert_eq!(
      [-1.0, 2.0, -3.0].dominance(&[2.0, 2.0, 4.0]),
      Ordering::Less
    );

    assert_eq!([1.0; 0].dominance(&[0.0; 0]), Ordering::Equal);
  }

  #[test]
  fn test_pareto_dominance_fn() {
    assert!(pareto_dominance(&[0.0, 0.0], &[0.0, 1.0]).unwrap());
    assert!(!pareto_dominance(&[0.0, 1.0], &[0.0, 1.0]).unwrap());
    assert!(!pareto_dominance(&[0.0, 1.0], &[0.0, 0.0]).unwrap());
    assert!(pareto_dominance(&[0.0], &[0.0, 1.0]).is_err());
  }

  #[test]
  fn test_non_dominated_front() {
    assert_eq!(non_dominated_front(&points()).unwrap(), vec![0, 1, 2]);
    let duplicated = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
    assert_eq!(non_dominated_front(&duplicated).unwrap(), vec![0, 1]);
  }

  #[test]
  fn test_ideal_and_nadir() {
    assert_eq!(ideal(&points()).unwrap(), vec![1.0, 1.0]);
    assert_eq!(nadir(&points()).unwrap(), vec![5.0, 5.0]);
    let single = vec![vec![3.0, -1.0, 2.0]];
    assert_eq!(ideal(&single).unwrap(), single[0]);
    assert_eq!(nadir(&single).unwrap(), single[0]);
  }

  #[test]
  fn test_malformed_points() {
    assert!(ideal(&[]).is_err());
    assert!(nadir(&[vec![]]).is_err());
    assert!(non_dominated_front(&[vec![1.0], vec![1.0, 2.0]]).is_err());
  }
}
