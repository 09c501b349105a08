//! Generation of weight vectors on the unit simplex.

use std::{fmt, iter, str::FromStr};

use itertools::Itertools;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How [`decomposition_weights`] spreads weight vectors over the simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightGeneration {
  /// A uniform lattice. Only possible for specific numbers of weights.
  #[serde(rename = "grid")]
  Grid,
  /// Uniformly distributed random weights.
  #[serde(rename = "random")]
  Random,
  /// Weights following a Halton sequence, covering the simplex more evenly
  /// than random ones.
  #[serde(rename = "low discrepancy")]
  LowDiscrepancy,
}

impl WeightGeneration {
  /// The textual name: `"grid"`, `"random"` or `"low discrepancy"`.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Grid => "grid",
      Self::Random => "random",
      Self::LowDiscrepancy => "low discrepancy",
    }
  }
}

impl fmt::Display for WeightGeneration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for WeightGeneration {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    [Self::Grid, Self::Random, Self::LowDiscrepancy]
      .into_iter()
      .find(|m| m.as_str() == s)
      .ok_or_else(|| {
        Error::invalid(format!(
          "unknown weight generation method '{s}', choose one of 'grid', \
           'random', 'low discrepancy'"
        ))
      })
  }
}

/// Generates `n_w` weight vectors of dimension `n_f` to decompose a problem
/// with `n_f` objectives.
///
/// Every vector lies on the unit simplex. The first `n_f` vectors are always
/// the canonical ones `[1, 0, ...]`, `[0, 1, ...]`, ... `seed` only affects
/// [`WeightGeneration::Random`].
///
/// # Errors
///
/// Fails with [`Error::InvalidArgument`] if `n_f < 2`, if `n_w < n_f`, or if
/// a grid is requested and no uniform lattice of `n_w` points exists in
/// dimension `n_f`.
///
/// # Examples
/// ```
/// # use decompose::decomposition::{decomposition_weights, WeightGeneration};
/// let w =
///   decomposition_weights(2, 4, WeightGeneration::LowDiscrepancy, 0).unwrap();
/// assert_eq!(w, vec![
///   vec![1.0, 0.0],
///   vec![0.0, 1.0],
///   vec![0.25, 0.75],
///   vec![0.75, 0.25],
/// ]);
/// ```
pub fn decomposition_weights(
  n_f: usize,
  n_w: usize,
  method: WeightGeneration,
  seed: u64,
) -> Result<Vec<Vec<f64>>> {
  if n_f < 2 {
    return Err(Error::invalid(format!(
      "weights can only be generated for at least 2 objectives, {n_f} \
       requested"
    )));
  }
  if n_w < n_f {
    return Err(Error::invalid(format!(
      "at least as many weights as objectives ({n_f}) must be generated, \
       {n_w} requested"
    )));
  }
  debug!("generating {n_w} weights in dimension {n_f} with method '{method}'");
  let mut weights = canonical(n_f);
  match method {
    WeightGeneration::Grid => {
      let divisions = grid_divisions(n_f, n_w)?;
      weights.extend(
        lattice(n_f, divisions)
          .into_iter()
          .filter(|w| !w.contains(&1.0)),
      );
    }
    WeightGeneration::Random => {
      let mut rng = StdRng::seed_from_u64(seed);
      weights.extend((n_f..n_w).map(|_| {
        sample_from_simplex((1..n_f).map(|_| rng.gen::<f64>()).collect())
      }));
    }
    WeightGeneration::LowDiscrepancy => {
      let bases = primes(n_f - 1);
      weights.extend((n_f..n_w).map(|index| {
        sample_from_simplex(
          bases
            .iter()
            .map(|&base| radical_inverse(index as u64, base))
            .collect(),
        )
      }));
    }
  }
  Ok(weights)
}

fn canonical(n_f: usize) -> Vec<Vec<f64>> {
  (0..n_f)
    .map(|i| (0..n_f).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
    .collect()
}

/// Number of points of the simplex lattice with `divisions` divisions in
/// dimension `n_f`, i.e. `C(divisions + n_f - 1, n_f - 1)`, or `None` on
/// overflow.
fn lattice_size(n_f: usize, divisions: usize) -> Option<usize> {
  (1..n_f).try_fold(1usize, |acc, k| {
    acc.checked_mul(divisions + k).map(|v| v / k)
  })
}

fn grid_divisions(n_f: usize, n_w: usize) -> Result<usize> {
  let mut divisions = 1;
  loop {
    match lattice_size(n_f, divisions) {
      Some(size) if size == n_w => return Ok(divisions),
      Some(size) if size < n_w => divisions += 1,
      _ => {
        return Err(Error::invalid(format!(
          "a uniform grid of {n_w} weights does not exist in dimension \
           {n_f}, try the 'low discrepancy' method instead"
        )))
      }
    }
  }
}

/// Das-Dennis points: every vector whose components are multiples of
/// `1 / divisions` and sum to one.
fn lattice(n_f: usize, divisions: usize) -> Vec<Vec<f64>> {
  fn fill(
    depth: usize,
    remaining: usize,
    divisions: usize,
    current: &mut Vec<f64>,
    points: &mut Vec<Vec<f64>>,
  ) {
    if depth == current.len() - 1 {
      current[depth] = remaining as f64 / divisions as f64;
      points.push(current.clone());
      return;
    }
    for i in 0..=remaining {
      current[depth] = i as f64 / divisions as f64;
      fill(depth + 1, remaining - i, divisions, current, points);
    }
  }

  let mut points = Vec::new();
  fill(0, divisions, divisions, &mut vec![0.0; n_f], &mut points);
  points
}

/// Maps a point of the unit hypercube of dimension `n - 1` to the simplex
/// of dimension `n`: the sorted coordinates split `[0, 1]` into `n` pieces.
fn sample_from_simplex(mut r: Vec<f64>) -> Vec<f64> {
  r.sort_by(f64::total_cmp);
  iter::once(0.0)
    .chain(r)
    .chain(iter::once(1.0))
    .tuple_windows()
    .map(|(a, b)| b - a)
    .collect()
}

/// The van der Corput radical inverse of `index` in `base`.
fn radical_inverse(mut index: u64, base: u64) -> f64 {
  let inv_base = 1.0 / base as f64;
  let mut factor = inv_base;
  let mut result = 0.0;
  while index > 0 {
    result += (index % base) as f64 * factor;
    index /= base;
    factor *= inv_base;
  }
  result
}

/// The first `n` prime numbers.
fn primes(n: usize) -> Vec<u64> {
  let mut primes = Vec::with_capacity(n);
  let mut candidate = 2u64;
  while primes.len() < n {
    if primes.iter().all(|p| candidate % p != 0) {
      primes.push(candidate);
    }
    candidate += 1;
  }
  primes
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  fn assert_on_simplex(weights: &[Vec<f64>], n_f: usize) {
    for w in weights {
      assert_eq!(w.len(), n_f);
      assert!(w.iter().all(|&x| (0.0..=1.0).contains(&x)), "{w:?}");
      assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }
  }

  #[test]
  fn test_argument_checks() {
    for method in [
      WeightGeneration::Grid,
      WeightGeneration::Random,
      WeightGeneration::LowDiscrepancy,
    ] {
      assert!(decomposition_weights(1, 5, method, 0).is_err());
      assert!(decomposition_weights(3, 2, method, 0).is_err());
    }
  }

  #[test]
  fn test_low_discrepancy_sequence() {
    let w =
      decomposition_weights(2, 6, WeightGeneration::LowDiscrepancy, 33)
        .unwrap();
    assert_eq!(
      w,
      vec![
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.25, 0.75],
        vec![0.75, 0.25],
        vec![0.125, 0.875],
        vec![0.625, 0.375],
      ]
    );
  }

  #[test]
  fn test_low_discrepancy_higher_dimension() {
    let w =
      decomposition_weights(4, 50, WeightGeneration::LowDiscrepancy, 0)
        .unwrap();
    assert_eq!(w.len(), 50);
    assert_eq!(&w[..4], canonical(4).as_slice());
    assert_on_simplex(&w, 4);
  }

  #[test]
  fn test_grid() {
    let w = decomposition_weights(3, 6, WeightGeneration::Grid, 0).unwrap();
    assert_eq!(w.len(), 6);
    assert_eq!(&w[..3], canonical(3).as_slice());
    assert_on_simplex(&w, 3);
    assert!(w.contains(&vec![0.5, 0.5, 0.0]));
    assert!(w.contains(&vec![0.0, 0.5, 0.5]));
    assert!(w.contains(&vec![0.5, 0.0, 0.5]));
  }

  #[test]
  fn test_grid_in_two_dimensions_always_exists() {
    for n_w in 2..20 {
      let w =
        decomposition_weights(2, n_w, WeightGeneration::Grid, 0).unwrap();
      assert_eq!(w.len(), n_w);
      assert_on_simplex(&w, 2);
    }
  }

  #[test]
  fn test_grid_must_be_uniform() {
    assert!(decomposition_weights(3, 7, WeightGeneration::Grid, 0).is_err());
    assert!(decomposition_weights(3, 10, WeightGeneration::Grid, 0).is_ok());
  }

  #[test]
  fn test_random_is_seeded() {
    let a = decomposition_weights(3, 20, WeightGeneration::Random, 7).unwrap();
    let b = decomposition_weights(3, 20, WeightGeneration::Random, 7).unwrap();
    let c = decomposition_weights(3, 20, WeightGeneration::Random, 8).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(&a[..3], canonical(3).as_slice());
    assert_on_simplex(&a, 3);
  }

  #[test]
  fn test_method_names() {
    assert_eq!(
      "low discrepancy".parse::<WeightGeneration>().unwrap(),
      WeightGeneration::LowDiscrepancy
    );
    assert_eq!("grid".parse::<WeightGeneration>().unwrap().as_str(), "grid");
    assert!("sobol".parse::<WeightGeneration>().is_err());
  }

  #[test]
  fn test_lattice_size() {
    assert_eq!(lattice_size(2, 4), Some(5));
    assert_eq!(lattice_size(3, 2), Some(6));
    assert_eq!(lattice(3, 2).len(), 6);
    assert_eq!(lattice(4, 3).len(), lattice_size(4, 3).unwrap());
  }

  #[test]
  fn test_primes() {
    assert_eq!(primes(5), vec![2, 3, 5, 7, 11]);
  }
}
