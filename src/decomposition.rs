//! Scalarization of objective vectors.
//!
//! A vector of `n` objectives `f` is reduced to a single scalar using a weight
//! vector `w` (a point of the unit simplex) and a reference point `z`:
//!
//! | Method                           | Scalar                        |
//! |:---------------------------------|:------------------------------|
//! | [`Method::Weighted`]             | `sum_i w_i * f_i`             |
//! | [`Method::Tchebycheff`]          | `max_i w_i * abs(f_i - z_i)`  |
//! | [`Method::BoundaryIntersection`] | `d1 + THETA * d2`             |
//!
//! For boundary intersection, with `i = w / |w|`, `d1 = (f - z) . i` is the
//! distance travelled along the weight direction and
//! `d2 = |(f - z) - d1 i|` is the distance from it, penalized by [`THETA`].
//!
//! See Q. Zhang and H. Li, *MOEA/D: A Multiobjective Evolutionary Algorithm
//! Based on Decomposition*.

mod weights;

use std::{fmt, str::FromStr};

use itertools::izip;
use serde::{Deserialize, Serialize};

pub use weights::{decomposition_weights, WeightGeneration};

use crate::error::{Error, Result};

/// Penalty applied to the distance from the weight direction by boundary
/// intersection.
pub const THETA: f64 = 5.0;

/// A decomposition method.
#[derive(
  Debug,
  Default,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
pub enum Method {
  /// Weighted sum of the objectives.
  #[default]
  #[serde(rename = "weighted")]
  Weighted,
  /// Largest weighted distance from the reference point. Handles non-convex
  /// fronts.
  #[serde(rename = "tchebycheff")]
  Tchebycheff,
  /// Penalty-based boundary intersection.
  #[serde(rename = "bi")]
  BoundaryIntersection,
}

impl Method {
  /// Every available method.
  pub const ALL: [Method; 3] =
    [Self::Weighted, Self::Tchebycheff, Self::BoundaryIntersection];

  /// The textual name of the method: `"weighted"`, `"tchebycheff"` or `"bi"`.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Weighted => "weighted",
      Self::Tchebycheff => "tchebycheff",
      Self::BoundaryIntersection => "bi",
    }
  }
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Method {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|m| m.as_str() == s)
      .ok_or_else(|| {
        Error::invalid(format!(
          "unknown decomposition method '{s}', choose one of 'weighted', \
           'tchebycheff', 'bi'"
        ))
      })
  }
}

/// Decomposes the objective vector `f` into a single scalar.
///
/// `z` is ignored by [`Method::Weighted`] but must still have the right
/// length.
///
/// # Errors
///
/// Fails with [`Error::InvalidArgument`] if `f`, `weight` and `z` are empty
/// or have different lengths, or if boundary intersection is requested with
/// a zero weight vector.
///
/// # Examples
/// ```
/// # use decompose::decomposition::{decompose_objectives, Method};
/// let f = [1.0, 2.0, 3.0];
/// let w = [0.1, 0.1, 0.8];
/// let z = [5.0, 5.0, 5.0];
/// let scalar = decompose_objectives(&f, &w, &z, Method::Weighted).unwrap();
/// assert!((scalar - 2.7).abs() < 1e-12);
/// ```
pub fn decompose_objectives(
  f: &[f64],
  weight: &[f64],
  z: &[f64],
  method: Method,
) -> Result<f64> {
  if f.len() != weight.len() {
    return Err(Error::invalid(format!(
      "the fitness vector has length {} but the weight has length {}",
      f.len(),
      weight.len()
    )));
  }
  if weight.len() != z.len() {
    return Err(Error::invalid(format!(
      "the weight has length {} but the reference point has length {}",
      weight.len(),
      z.len()
    )));
  }
  if f.is_empty() {
    return Err(Error::invalid("cannot decompose an empty fitness vector"));
  }
  match method {
    Method::Weighted => Ok(izip!(f, weight).map(|(f, w)| w * f).sum()),
    Method::Tchebycheff => Ok(
      izip!(f, weight, z)
        .map(|(f, w, z)| w * (f - z).abs())
        .fold(f64::NEG_INFINITY, f64::max),
    ),
    Method::BoundaryIntersection => boundary_intersection(f, weight, z),
  }
}

fn boundary_intersection(f: &[f64], weight: &[f64], z: &[f64]) -> Result<f64> {
  let norm = weight.iter().map(|w| w * w).sum::<f64>().sqrt();
  if norm == 0.0 {
    return Err(Error::invalid(
      "boundary intersection needs a non-zero weight vector",
    ));
  }
  let direction = weight.iter().map(|w| w / norm).collect::<Vec<_>>();
  let d1 = izip!(f, z, &direction)
    .map(|(f, z, i)| (f - z) * i)
    .sum::<f64>();
  let d2 = izip!(f, z, &direction)
    .map(|(f, z, i)| (f - z - d1 * i).powi(2))
    .sum::<f64>()
    .sqrt();
  Ok(d1 + THETA * d2)
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  const F: [f64; 2] = [1.0, 1.0];
  const W: [f64; 2] = [0.5, 0.5];
  const Z: [f64; 2] = [0.0, 0.0];

  #[test]
  fn test_weighted() {
    let d = decompose_objectives(&F, &W, &Z, Method::Weighted).unwrap();
    assert_relative_eq!(d, 1.0);
    // the reference point plays no role
    let d = decompose_objectives(&F, &W, &[7.0, -3.0], Method::Weighted);
    assert_relative_eq!(d.unwrap(), 1.0);
  }

  #[test]
  fn test_tchebycheff() {
    let d = decompose_objectives(&F, &W, &Z, Method::Tchebycheff).unwrap();
    assert_relative_eq!(d, 0.5);
    let d =
      decompose_objectives(&[3.0, 2.0], &W, &[1.0, 1.0], Method::Tchebycheff);
    assert_relative_eq!(d.unwrap(), 1.0);
  }

  #[test]
  fn test_boundary_intersection() {
    let d =
      decompose_objectives(&F, &W, &Z, Method::BoundaryIntersection).unwrap();
    assert_relative_eq!(d, 2.0_f64.sqrt(), max_relative = 1e-12);
  }

  #[test]
  fn test_boundary_intersection_penalizes_deviation() {
    // f - z = (1, 0) against the diagonal: d1 = d2 = 1 / sqrt(2)
    let d = decompose_objectives(
      &[1.0, 0.0],
      &W,
      &Z,
      Method::BoundaryIntersection,
    )
    .unwrap();
    let expected = (1.0 + THETA) / 2.0_f64.sqrt();
    assert_relative_eq!(d, expected, max_relative = 1e-12);
  }

  #[test]
  fn test_zero_weight() {
    let r = decompose_objectives(
      &F,
      &[0.0, 0.0],
      &Z,
      Method::BoundaryIntersection,
    );
    assert!(matches!(r, Err(Error::InvalidArgument(_))));
    let r = decompose_objectives(&F, &[0.0, 0.0], &Z, Method::Tchebycheff);
    assert_relative_eq!(r.unwrap(), 0.0);
  }

  #[test]
  fn test_zero_weight_component() {
    let w = [1.0, 0.0];
    let f = [2.0, 9.0];
    for method in Method::ALL {
      let d = decompose_objectives(&f, &w, &Z, method).unwrap();
      assert!(d.is_finite(), "{method} produced {d}");
    }
  }

  #[test]
  fn test_length_mismatch() {
    for method in Method::ALL {
      assert!(decompose_objectives(&F, &[1.0], &Z, method).is_err());
      assert!(decompose_objectives(&F, &W, &[0.0; 3], method).is_err());
      assert!(decompose_objectives(&[], &[], &[], method).is_err());
    }
  }

  #[test]
  fn test_method_names() {
    for method in Method::ALL {
      assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
    }
    assert_eq!(Method::default(), Method::Weighted);
    assert!(matches!(
      "my_method".parse::<Method>(),
      Err(Error::InvalidArgument(_))
    ));
  }

  #[test]
  fn test_method_serde_uses_names() {
    let json = serde_json::to_string(&Method::BoundaryIntersection).unwrap();
    assert_eq!(json, "\"bi\"");
    let m: Method = serde_json::from_str("\"tchebycheff\"").unwrap();
    assert_eq!(m, Method::Tchebycheff);
  }
}
