use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  problem::{Bounds, ThreadSafety, UserProblem},
};

/// The multidimensional Rosenbrock function on `[-5, 10]^dim`.
///
/// `f(x) = sum_i 100 (x_{i+1} - x_i^2)^2 + (x_i - 1)^2`, minimized at
/// `x = [1, ..., 1]` where it is zero. Provides an analytic gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RosenbrockRepr")]
pub struct Rosenbrock {
  dim: usize,
}

#[derive(Deserialize)]
struct RosenbrockRepr {
  dim: usize,
}

impl TryFrom<RosenbrockRepr> for Rosenbrock {
  type Error = Error;

  fn try_from(repr: RosenbrockRepr) -> Result<Self> {
    Self::new(repr.dim)
  }
}

impl Rosenbrock {
  /// Creates a Rosenbrock problem of the given dimension.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::InvalidArgument`] if `dim < 2`.
  pub fn new(dim: usize) -> Result<Self> {
    if dim < 2 {
      return Err(Error::invalid(format!(
        "the Rosenbrock problem must have at least 2 dimensions, {dim} \
         requested"
      )));
    }
    Ok(Self { dim })
  }

  /// The global minimizer.
  pub fn best_known(&self) -> Vec<f64> {
    vec![1.0; self.dim]
  }

  fn check_dimension(&self, x: &[f64]) -> Result<()> {
    if x.len() != self.dim {
      return Err(Error::invalid(format!(
        "the Rosenbrock problem has {} dimensions, a vector of length {} was \
         passed",
        self.dim,
        x.len()
      )));
    }
    Ok(())
  }
}

impl Default for Rosenbrock {
  fn default() -> Self {
    Self { dim: 2 }
  }
}

impl UserProblem for Rosenbrock {
  fn fitness(&self, x: &[f64]) -> Result<Vec<f64>> {
    self.check_dimension(x)?;
    let f = x
      .windows(2)
      .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (w[0] - 1.0).powi(2))
      .sum();
    Ok(vec![f])
  }

  fn bounds(&self) -> Bounds {
    (vec![-5.0; self.dim], vec![10.0; self.dim])
  }

  fn name(&self) -> String {
    "Multidimensional Rosenbrock Function".into()
  }

  fn has_gradient(&self) -> bool {
    true
  }

  fn gradient(&self, x: &[f64]) -> Result<Vec<f64>> {
    self.check_dimension(x)?;
    let mut g = vec![0.0; x.len()];
    for (i, w) in x.windows(2).enumerate() {
      let r = w[1] - w[0] * w[0];
      g[i] += -400.0 * w[0] * r + 2.0 * (w[0] - 1.0);
      g[i + 1] += 200.0 * r;
    }
    Ok(g)
  }

  fn thread_safety(&self) -> ThreadSafety {
    ThreadSafety::Constant
  }
}
