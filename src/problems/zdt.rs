use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  problem::{Bounds, ThreadSafety, UserProblem},
};

/// The bi-objective ZDT test suite by Zitzler, Deb and Thiele.
///
/// Problems 1, 2, 3, 4 and 6 are available. ZDT5 is defined on bit strings
/// and has no continuous encoding here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ZdtRepr")]
pub struct Zdt {
  id: u32,
  param: usize,
}

#[derive(Deserialize)]
struct ZdtRepr {
  id: u32,
  param: usize,
}

impl TryFrom<ZdtRepr> for Zdt {
  type Error = Error;

  fn try_from(repr: ZdtRepr) -> Result<Self> {
    Self::new(repr.id, repr.param)
  }
}

impl Zdt {
  /// Creates the ZDT problem `id` with `param` decision variables.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::InvalidArgument`] if `id` is not one of 1, 2, 3, 4,
  /// 6 or if `param < 2`.
  pub fn new(id: u32, param: usize) -> Result<Self> {
    if !matches!(id, 1..=4 | 6) {
      return Err(Error::invalid(format!(
        "ZDT{id} is not available, choose one of ZDT1, ZDT2, ZDT3, ZDT4, \
         ZDT6"
      )));
    }
    if param < 2 {
      return Err(Error::invalid(format!(
        "ZDT problems need at least 2 decision variables, {param} requested"
      )));
    }
    Ok(Self { id, param })
  }

  /// The problem number.
  pub fn id(&self) -> u32 {
    self.id
  }

  /// Convergence metric of a decision vector: `g(x) - 1`, zero when `x`
  /// lies on the Pareto optimal front.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::InvalidArgument`] if `x` has the wrong length.
  pub fn p_distance(&self, x: &[f64]) -> Result<f64> {
    self.check_dimension(x)?;
    Ok(self.g(x) - 1.0)
  }

  fn check_dimension(&self, x: &[f64]) -> Result<()> {
    if x.len() != self.param {
      return Err(Error::invalid(format!(
        "ZDT{} has {} decision variables, a vector of length {} was passed",
        self.id,
        self.param,
        x.len()
      )));
    }
    Ok(())
  }

  fn g(&self, x: &[f64]) -> f64 {
    let tail = &x[1..];
    let n = tail.len() as f64;
    match self.id {
      4 => {
        1.0
          + 10.0 * n
          + tail
            .iter()
            .map(|xi| xi * xi - 10.0 * (4.0 * PI * xi).cos())
            .sum::<f64>()
      }
      6 => 1.0 + 9.0 * (tail.iter().sum::<f64>() / n).powf(0.25),
      _ => 1.0 + 9.0 * tail.iter().sum::<f64>() / n,
    }
  }
}

impl Default for Zdt {
  fn default() -> Self {
    Self { id: 1, param: 30 }
  }
}

impl UserProblem for Zdt {
  fn fitness(&self, x: &[f64]) -> Result<Vec<f64>> {
    self.check_dimension(x)?;
    let g = self.g(x);
    let f1 = match self.id {
      6 => 1.0 - (-4.0 * x[0]).exp() * (6.0 * PI * x[0]).sin().powi(6),
      _ => x[0],
    };
    let h = match self.id {
      2 | 6 => 1.0 - (f1 / g).powi(2),
      3 => 1.0 - (f1 / g).sqrt() - f1 / g * (10.0 * PI * f1).sin(),
      _ => 1.0 - (f1 / g).sqrt(),
    };
    Ok(vec![f1, g * h])
  }

  fn bounds(&self) -> Bounds {
    let mut lower = vec![0.0; self.param];
    let mut upper = vec![1.0; self.param];
    if self.id == 4 {
      lower[1..].fill(-5.0);
      upper[1..].fill(5.0);
    }
    (lower, upper)
  }

  fn nobj(&self) -> usize {
    2
  }

  fn name(&self) -> String {
    format!("ZDT{}", self.id)
  }

  fn thread_safety(&self) -> ThreadSafety {
    ThreadSafety::Constant
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;
  use crate::problem::Problem;

  #[test]
  fn test_construction() {
    assert!(Zdt::new(0, 2).is_err());
    assert!(Zdt::new(5, 2).is_err());
    assert!(Zdt::new(7, 2).is_err());
    assert!(Zdt::new(1, 1).is_err());
    assert!(Zdt::new(6, 10).is_ok());
  }

  #[test]
  fn test_zdt1() {
    let p = Problem::new(Zdt::new(1, 2).unwrap()).unwrap();
    let f = p.fitness(&[1.0, 1.0]).unwrap();
    assert_relative_eq!(f[0], 1.0);
    assert_relative_eq!(f[1], 10.0 * (1.0 - 0.1_f64.sqrt()));
    assert_eq!(p.fitness(&[0.0, 0.0]).unwrap(), vec![0.0, 1.0]);
  }

  #[test]
  fn test_pareto_front_values() {
    let x = [0.25, 0.0, 0.0];
    let zdt1 = Zdt::new(1, 3).unwrap().fitness(&x).unwrap();
    assert_relative_eq!(zdt1[1], 0.5);
    let zdt2 = Zdt::new(2, 3).unwrap().fitness(&x).unwrap();
    assert_relative_eq!(zdt2[1], 0.9375);
    let zdt3 = Zdt::new(3, 3).unwrap().fitness(&x).unwrap();
    assert_relative_eq!(
      zdt3[1],
      1.0 - 0.5 - 0.25 * (2.5 * PI).sin(),
      epsilon = 1e-12
    );
  }

  #[test]
  fn test_zdt4_bounds_and_front() {
    let zdt4 = Zdt::new(4, 3).unwrap();
    let (lower, upper) = zdt4.bounds();
    assert_eq!(lower, vec![0.0, -5.0, -5.0]);
    assert_eq!(upper, vec![1.0, 5.0, 5.0]);
    assert_relative_eq!(zdt4.p_distance(&[0.5, 0.0, 0.0]).unwrap(), 0.0);
  }

  #[test]
  fn test_zdt6() {
    let zdt6 = Zdt::new(6, 2).unwrap();
    let f = zdt6.fitness(&[0.0, 0.0]).unwrap();
    assert_relative_eq!(f[0], 1.0);
    assert_relative_eq!(f[1], 0.0);
  }

  #[test]
  fn test_p_distance() {
    let zdt1 = Zdt::new(1, 3).unwrap();
    assert_relative_eq!(zdt1.p_distance(&[0.3, 0.0, 0.0]).unwrap(), 0.0);
    assert_relative_eq!(zdt1.p_distance(&[0.3, 1.0, 1.0]).unwrap(), 9.0);
    assert!(zdt1.p_distance(&[0.3]).is_err());
  }

  #[test]
  fn test_fitness_checks_dimension() {
    let zdt6 = Zdt::new(6, 3).unwrap();
    for x in [&[][..], &[0.5], &[0.5, 0.5, 0.5, 0.5]] {
      assert!(matches!(zdt6.fitness(x), Err(Error::InvalidArgument(_))));
    }
  }

  #[test]
  fn test_deserialize_validates() {
    let zdt: Zdt = serde_json::from_str(r#"{"id":4,"param":5}"#).unwrap();
    assert_eq!(zdt, Zdt::new(4, 5).unwrap());
    for json in [
      r#"{"id":5,"param":5}"#,
      r#"{"id":7,"param":5}"#,
      r#"{"id":1,"param":1}"#,
    ] {
      assert!(serde_json::from_str::<Zdt>(json).is_err(), "{json}");
    }
  }
}
