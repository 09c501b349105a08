//! Sparsity patterns of gradients and hessians.
//!
//! A gradient sparsity pattern lists the `(i, j)` pairs for which
//! `df_i / dx_j` may be non-zero. A hessians sparsity pattern holds one list
//! per fitness component, each made of `(j, k)` pairs of the lower triangle
//! (`k <= j`) of that component's hessian. Pairs are kept in strictly
//! increasing lexicographic order.

use itertools::Itertools;

use crate::error::{Error, Result};

/// Non-zero entries of a gradient or of a single hessian.
pub type SparsityPattern = Vec<(usize, usize)>;

/// Returns the dense gradient pattern for `nf` fitness components and `nx`
/// decision variables.
///
/// # Examples
/// ```
/// # use decompose::sparsity::dense_gradient;
/// assert_eq!(dense_gradient(1, 2), vec![(0, 0), (0, 1)]);
/// ```
pub fn dense_gradient(nf: usize, nx: usize) -> SparsityPattern {
  (0..nf).cartesian_product(0..nx).collect()
}

/// Returns the dense hessians patterns (lower triangles) for `nf` fitness
/// components and `nx` decision variables.
///
/// # Examples
/// ```
/// # use decompose::sparsity::dense_hessians;
/// assert_eq!(dense_hessians(1, 2), vec![vec![(0, 0), (1, 0), (1, 1)]]);
/// ```
pub fn dense_hessians(nf: usize, nx: usize) -> Vec<SparsityPattern> {
  let lower = (0..nx)
    .flat_map(|j| (0..=j).map(move |k| (j, k)))
    .collect::<SparsityPattern>();
  vec![lower; nf]
}

fn check_ordering(pattern: &[(usize, usize)], what: &str) -> Result<()> {
  match pattern.iter().tuple_windows().find(|(a, b)| a >= b) {
    Some((a, b)) => Err(Error::invalid(format!(
      "the {what} sparsity pattern must be strictly increasing, but {a:?} \
       is followed by {b:?}"
    ))),
    None => Ok(()),
  }
}

/// Checks a user-provided gradient pattern against problem dimensions.
pub(crate) fn check_gradient_sparsity(
  pattern: &[(usize, usize)],
  nf: usize,
  nx: usize,
) -> Result<()> {
  if let Some(&(i, j)) = pattern.iter().find(|&&(i, j)| i >= nf || j >= nx) {
    return Err(Error::invalid(format!(
      "invalid pair ({i}, {j}) in the gradient sparsity pattern of a \
       problem with fitness dimension {nf} and {nx} decision variables"
    )));
  }
  check_ordering(pattern, "gradient")
}

/// Checks user-provided hessians patterns against problem dimensions.
pub(crate) fn check_hessians_sparsity(
  patterns: &[SparsityPattern],
  nf: usize,
  nx: usize,
) -> Result<()> {
  if patterns.len() != nf {
    return Err(Error::invalid(format!(
      "the hessians sparsity must hold one pattern per fitness component \
       ({nf}), but {} were provided",
      patterns.len()
    )));
  }
  for pattern in patterns {
    if let Some(&(j, k)) = pattern.iter().find(|&&(j, k)| j >= nx || k > j) {
      return Err(Error::invalid(format!(
        "invalid pair ({j}, {k}) in a hessian sparsity pattern of a problem \
         with {nx} decision variables, only the lower triangle is allowed"
      )));
    }
    check_ordering(pattern, "hessian")?;
  }
  Ok(())
}
