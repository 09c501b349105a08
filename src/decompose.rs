//! The decompose meta-problem.
//!
//! [`Decompose`] turns a multi-objective, unconstrained problem into a
//! single-objective one whose fitness is the [scalarization] of the original
//! objectives with a fixed weight vector and a reference point. The result
//! implements [`UserProblem`], so it can be used wherever a single-objective
//! problem is expected.
//!
//! The reference point is often taken as the ideal point of the problem,
//! which is unknown in advance. With ideal point adaptation enabled, every
//! fitness evaluation first lowers each component of the reference point to
//! the corresponding objective value if the latter is smaller, and only then
//! decomposes the objectives against the updated point.
//!
//! Decomposed problems do not expose gradients or hessians, even if the inner
//! problem does: Tchebycheff and boundary intersection decompositions are not
//! differentiable everywhere.
//!
//! [scalarization]: crate::decomposition

use std::cell::RefCell;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
  decomposition::{decompose_objectives, Method},
  error::{Error, Result},
  problem::{fmt_vector, Bounds, Problem, ThreadSafety, UserProblem},
  problems::NullProblem,
};

/// Largest accepted distance between the sum of the weights and one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-8;

/// Decomposition parameters of a [`Decompose`] meta-problem.
///
/// # Examples
/// ```
/// # use decompose::{decomposition::Method, DecomposeConfig};
/// let config = DecomposeConfig::builder()
///   .method(Method::Tchebycheff)
///   .adapt_ideal(true)
///   .build();
/// assert_eq!(config.weight, vec![0.5, 0.5]);
/// ```
#[derive(TypedBuilder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecomposeConfig {
  /// The weight vector, a point of the unit simplex with one component per
  /// objective.
  #[builder(default = vec![0.5, 0.5])]
  pub weight: Vec<f64>,
  /// The initial reference point, one component per objective.
  #[builder(default = vec![0.0, 0.0])]
  pub z: Vec<f64>,
  /// The decomposition method.
  #[builder(default)]
  pub method: Method,
  /// Whether the reference point tracks the best objective values seen.
  #[builder(default)]
  pub adapt_ideal: bool,
}

impl Default for DecomposeConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

/// A multi-objective problem decomposed into a single-objective one.
///
/// The reference point lives in a [`RefCell`] so that
/// [`fitness`](UserProblem::fitness) can adapt it through a shared
/// reference. As a consequence a `Decompose` is `Send` but not `Sync`: a
/// single instance cannot be evaluated from several threads at once, clone
/// one per worker instead. Clones never share their reference points.
///
/// # Examples
/// ```
/// # use decompose::{decomposition::Method, problems::Zdt, Decompose, Problem};
/// let udp = Decompose::new(
///   Zdt::new(1, 2).unwrap(),
///   vec![0.5, 0.5],
///   vec![2.0, 2.0],
///   Method::Tchebycheff,
///   true,
/// )
/// .unwrap();
/// let p = Problem::new(udp).unwrap();
/// assert_eq!(p.nobj(), 1);
/// p.fitness(&[0.0, 0.0]).unwrap();
/// assert_eq!(p.udp().z(), vec![0.0, 1.0]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
  try_from = "DecomposeRepr<P>",
  bound(deserialize = "P: UserProblem + Deserialize<'de>")
)]
pub struct Decompose<P> {
  problem: Problem<P>,
  weight: Vec<f64>,
  z: RefCell<Vec<f64>>,
  method: Method,
  adapt_ideal: bool,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "P: UserProblem + Deserialize<'de>"))]
struct DecomposeRepr<P> {
  problem: Problem<P>,
  weight: Vec<f64>,
  z: Vec<f64>,
  method: Method,
  adapt_ideal: bool,
}

impl<P> TryFrom<DecomposeRepr<P>> for Decompose<P> {
  type Error = Error;

  fn try_from(repr: DecomposeRepr<P>) -> Result<Self> {
    check_category(&repr.problem)?;
    check_weight(&repr.weight, repr.problem.nobj())?;
    check_reference_point(&repr.z, repr.problem.nobj())?;
    Ok(Self {
      problem: repr.problem,
      weight: repr.weight,
      z: RefCell::new(repr.z),
      method: repr.method,
      adapt_ideal: repr.adapt_ideal,
    })
  }
}

fn check_category<P>(problem: &Problem<P>) -> Result<()> {
  if problem.nobj() < 2 {
    return Err(Error::invalid(format!(
      "decomposition requires a multi-objective problem, but '{}' has {} \
       objective(s)",
      problem.name(),
      problem.nobj()
    )));
  }
  if problem.nc() > 0 {
    return Err(Error::invalid(format!(
      "decomposition requires an unconstrained problem, but '{}' has {} \
       equality and {} inequality constraint(s)",
      problem.name(),
      problem.nec(),
      problem.nic()
    )));
  }
  Ok(())
}

fn check_weight(weight: &[f64], nobj: usize) -> Result<()> {
  if weight.len() != nobj {
    return Err(Error::invalid(format!(
      "the weight has length {}, but the problem has {nobj} objectives",
      weight.len()
    )));
  }
  if let Some(w) = weight.iter().find(|w| !w.is_finite()) {
    return Err(Error::invalid(format!(
      "the weight must be finite, but it contains {w}"
    )));
  }
  if let Some(w) = weight.iter().find(|&&w| w < 0.0) {
    return Err(Error::invalid(format!(
      "the weight must be non-negative, but it contains {w}"
    )));
  }
  let sum = weight.iter().sum::<f64>();
  if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
    return Err(Error::invalid(format!(
      "the weight must sum to 1, but it sums to {sum}"
    )));
  }
  Ok(())
}

fn check_reference_point(z: &[f64], nobj: usize) -> Result<()> {
  if z.len() != nobj {
    return Err(Error::invalid(format!(
      "the reference point has length {}, but the problem has {nobj} \
       objectives",
      z.len()
    )));
  }
  if z.iter().any(|z| z.is_nan()) {
    return Err(Error::invalid("the reference point contains NaN"));
  }
  Ok(())
}

impl<P: UserProblem> Decompose<P> {
  /// Decomposes `problem` with the given weight vector, reference point and
  /// method, optionally adapting the reference point to the ideal point.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::InvalidArgument`] if the problem cannot be
  /// wrapped by a [`Problem`], is single-objective or constrained, if the
  /// weight does not have one finite, non-negative component per objective
  /// summing to one, or if the reference point does not have one component
  /// per objective or contains NaN.
  pub fn new(
    problem: P,
    weight: Vec<f64>,
    z: Vec<f64>,
    method: Method,
    adapt_ideal: bool,
  ) -> Result<Self> {
    let problem = Problem::new(problem)?;
    check_category(&problem)?;
    check_weight(&weight, problem.nobj())?;
    check_reference_point(&z, problem.nobj())?;
    debug!(
      "decomposing '{}' with method '{method}', weight {}, reference point \
       {} (adaptation: {adapt_ideal})",
      problem.name(),
      fmt_vector(&weight),
      fmt_vector(&z)
    );
    Ok(Self {
      problem,
      weight,
      z: RefCell::new(z),
      method,
      adapt_ideal,
    })
  }

  /// Decomposes `problem` with the parameters of `config`.
  ///
  /// # Errors
  ///
  /// Fails like [`Decompose::new`].
  pub fn from_config(problem: P, config: DecomposeConfig) -> Result<Self> {
    let DecomposeConfig {
      weight,
      z,
      method,
      adapt_ideal,
    } = config;
    Self::new(problem, weight, z, method, adapt_ideal)
  }

  /// The fitness of the inner, multi-objective problem.
  ///
  /// # Errors
  ///
  /// Fails like [`Problem::fitness`] on the inner problem.
  pub fn original_fitness(&self, dv: &[f64]) -> Result<Vec<f64>> {
    self.problem.fitness(dv)
  }

  /// Decomposes the fitness vector `f` with the given weight and reference
  /// point, using this problem's method. The stored weight and reference
  /// point are neither used nor modified.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::InvalidArgument`] if `f`, `weight` and `z` have
  /// different lengths.
  pub fn decompose_fitness(
    &self,
    f: &[f64],
    weight: &[f64],
    z: &[f64],
  ) -> Result<Vec<f64>> {
    Ok(vec![decompose_objectives(f, weight, z, self.method)?])
  }
}

impl<P> Decompose<P> {
  /// The current reference point.
  pub fn z(&self) -> Vec<f64> {
    self.z.borrow().clone()
  }

  /// The weight vector.
  pub fn weight(&self) -> &[f64] {
    &self.weight
  }

  /// The decomposition method.
  pub fn method(&self) -> Method {
    self.method
  }

  /// Whether the reference point is adapted to the ideal point.
  pub fn adapt_ideal(&self) -> bool {
    self.adapt_ideal
  }

  /// The inner, multi-objective problem.
  pub fn inner(&self) -> &Problem<P> {
    &self.problem
  }
}

impl Default for Decompose<NullProblem> {
  /// Decomposes a bi-objective [`NullProblem`] with the default
  /// [`DecomposeConfig`].
  fn default() -> Self {
    let udp = NullProblem::with_objectives(2);
    let (lower, upper) = udp.bounds();
    let DecomposeConfig {
      weight,
      z,
      method,
      adapt_ideal,
    } = DecomposeConfig::default();
    Self {
      problem: Problem::assemble(udp, lower, upper),
      weight,
      z: RefCell::new(z),
      method,
      adapt_ideal,
    }
  }
}

impl<P: UserProblem> UserProblem for Decompose<P> {
  fn fitness(&self, dv: &[f64]) -> Result<Vec<f64>> {
    let f = self.problem.fitness(dv)?;
    if self.adapt_ideal {
      let mut z = self.z.borrow_mut();
      for (z, f) in z.iter_mut().zip(&f) {
        *z = z.min(*f);
      }
      trace!("reference point adapted to {}", fmt_vector(&z));
    }
    self.decompose_fitness(&f, &self.weight, &self.z.borrow())
  }

  fn bounds(&self) -> Bounds {
    self.problem.bounds()
  }

  fn name(&self) -> String {
    format!("{} [decomposed]", self.problem.name())
  }

  fn extra_info(&self) -> String {
    let mut info = self.problem.extra_info();
    if !info.is_empty() && !info.ends_with('\n') {
      info.push('\n');
    }
    info.push_str(&format!(
      "\tDecomposition method: {}\n\tDecomposition weight: {}\n\t\
       Decomposition reference: {}\n\tIdeal point adaptation: {}",
      self.method,
      fmt_vector(&self.weight),
      fmt_vector(&self.z.borrow()),
      self.adapt_ideal
    ));
    info
  }

  fn thread_safety(&self) -> ThreadSafety {
    self.problem.thread_safety().min(ThreadSafety::Basic)
  }
}
