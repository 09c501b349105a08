//! The problem abstraction.
//!
//! A *user problem* is any type implementing [`UserProblem`]: it computes a
//! fitness vector for a decision vector and declares its box-bounds. Every
//! other capability (more objectives, constraints, gradients, hessians and
//! their sparsity) is optional and is advertised explicitly through the
//! trait's provided methods, which user problems override when they support
//! it.
//!
//! A [`Problem`] wraps a user problem, validates it once, caches its
//! metadata and checks every evaluation against it. It also counts fitness,
//! gradient and hessians evaluations and has a stable textual
//! representation, so two problems in the same state print identically.
//!
//! The fitness vector of a problem with `nobj` objectives, `nec` equality
//! constraints and `nic` inequality constraints has `nobj + nec + nic`
//! components, objectives first. All objectives are minimized.

use std::{
  fmt,
  sync::atomic::{AtomicU64, Ordering},
};

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  problems::NullProblem,
  sparsity::{
    check_gradient_sparsity,
    check_hessians_sparsity,
    dense_gradient,
    dense_hessians,
    SparsityPattern,
  },
};

/// Lower and upper box-bounds of decision vectors.
pub type Bounds = (Vec<f64>, Vec<f64>);

/// How a problem may be shared between threads.
///
/// Levels are ordered: `None < Basic < Constant`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThreadSafety {
  /// The problem must not be used from more than one thread at a time, not
  /// even through distinct copies.
  None,
  /// Distinct copies may be used from distinct threads concurrently, but a
  /// single instance must only be used by one thread at a time.
  Basic,
  /// A single instance may be evaluated from many threads concurrently.
  Constant,
}

impl fmt::Display for ThreadSafety {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let level = match self {
      Self::None => "none",
      Self::Basic => "basic",
      Self::Constant => "constant",
    };
    f.write_str(level)
  }
}

/// A user-defined optimization problem.
///
/// Only [`fitness`](UserProblem::fitness) and
/// [`bounds`](UserProblem::bounds) are required. The remaining methods
/// describe optional capabilities and come with defaults describing a
/// single-objective, unconstrained problem without derivatives.
///
/// # Examples
/// ```
/// # use decompose::{Bounds, Problem, Result, UserProblem};
/// struct Schaffer;
///
/// impl UserProblem for Schaffer {
///   fn fitness(&self, x: &[f64]) -> Result<Vec<f64>> {
///     Ok(vec![x[0].powi(2), (x[0] - 2.0).powi(2)])
///   }
///
///   fn bounds(&self) -> Bounds {
///     (vec![-10.0], vec![10.0])
///   }
///
///   fn nobj(&self) -> usize {
///     2
///   }
/// }
///
/// let p = Problem::new(Schaffer).unwrap();
/// assert_eq!(p.fitness(&[1.0]).unwrap(), vec![1.0, 1.0]);
/// ```
pub trait UserProblem {
  /// Computes the fitness vector of a decision vector.
  ///
  /// # Errors
  ///
  /// Any error is forwarded to the caller unchanged. Use
  /// [`Error::evaluation`] to wrap foreign errors.
  fn fitness(&self, dv: &[f64]) -> Result<Vec<f64>>;

  /// Returns the box-bounds of the decision vector.
  fn bounds(&self) -> Bounds;

  /// Number of objectives.
  fn nobj(&self) -> usize {
    1
  }

  /// Number of equality constraints.
  fn nec(&self) -> usize {
    0
  }

  /// Number of inequality constraints.
  fn nic(&self) -> usize {
    0
  }

  /// Human readable name of the problem.
  fn name(&self) -> String {
    std::any::type_name::<Self>().to_owned()
  }

  /// Additional human readable information about the problem.
  fn extra_info(&self) -> String {
    String::new()
  }

  /// Whether [`gradient`](UserProblem::gradient) is implemented.
  fn has_gradient(&self) -> bool {
    false
  }

  /// Computes the non-zero entries of the gradient, following
  /// [`gradient_sparsity`](UserProblem::gradient_sparsity) or the dense
  /// pattern.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::Logic`] unless overridden.
  fn gradient(&self, _dv: &[f64]) -> Result<Vec<f64>> {
    Err(Error::logic(format!(
      "the gradient has been requested but it is not implemented in the \
       problem '{}'",
      self.name()
    )))
  }

  /// The gradient sparsity pattern, if the problem provides one. `None`
  /// means dense.
  fn gradient_sparsity(&self) -> Option<SparsityPattern> {
    None
  }

  /// Whether [`hessians`](UserProblem::hessians) is implemented.
  fn has_hessians(&self) -> bool {
    false
  }

  /// Computes the non-zero entries of every fitness component's hessian.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::Logic`] unless overridden.
  fn hessians(&self, _dv: &[f64]) -> Result<Vec<Vec<f64>>> {
    Err(Error::logic(format!(
      "the hessians have been requested but they are not implemented in the \
       problem '{}'",
      self.name()
    )))
  }

  /// The hessians sparsity patterns, if the problem provides them. `None`
  /// means dense.
  fn hessians_sparsity(&self) -> Option<Vec<SparsityPattern>> {
    None
  }

  /// The thread safety level of the problem.
  fn thread_safety(&self) -> ThreadSafety {
    ThreadSafety::Basic
  }
}

/// A validated user problem with cached metadata and evaluation counters.
///
/// Deserializing a problem validates the user problem again and recomputes
/// the cached metadata from it. Only the counters are taken from the input.
#[derive(Debug, Serialize, Deserialize)]
#[serde(
  try_from = "ProblemRepr<P>",
  bound(deserialize = "P: UserProblem + Deserialize<'de>")
)]
pub struct Problem<P> {
  udp: P,
  lower: Vec<f64>,
  upper: Vec<f64>,
  nobj: usize,
  nec: usize,
  nic: usize,
  name: String,
  has_gradient: bool,
  has_gradient_sparsity: bool,
  has_hessians: bool,
  has_hessians_sparsity: bool,
  gs_dim: usize,
  hs_dim: Vec<usize>,
  thread_safety: ThreadSafety,
  fevals: AtomicU64,
  gevals: AtomicU64,
  hevals: AtomicU64,
}

#[derive(Deserialize)]
struct ProblemRepr<P> {
  udp: P,
  fevals: u64,
  gevals: u64,
  hevals: u64,
}

impl<P: UserProblem> TryFrom<ProblemRepr<P>> for Problem<P> {
  type Error = Error;

  fn try_from(repr: ProblemRepr<P>) -> Result<Self> {
    let problem = Self::new(repr.udp)?;
    problem.fevals.store(repr.fevals, Ordering::Relaxed);
    problem.gevals.store(repr.gevals, Ordering::Relaxed);
    problem.hevals.store(repr.hevals, Ordering::Relaxed);
    Ok(problem)
  }
}

fn check_bounds(lower: &[f64], upper: &[f64]) -> Result<()> {
  if lower.len() != upper.len() {
    return Err(Error::invalid(format!(
      "the length of the lower bounds ({}) differs from the length of the \
       upper bounds ({})",
      lower.len(),
      upper.len()
    )));
  }
  if lower.is_empty() {
    return Err(Error::invalid(
      "the bounds of a problem must have at least one component",
    ));
  }
  for (i, (lb, ub)) in lower.iter().zip(upper).enumerate() {
    if lb.is_nan() || ub.is_nan() {
      return Err(Error::invalid(format!(
        "NaN detected in the bounds at index {i}"
      )));
    }
    if lb > ub {
      return Err(Error::invalid(format!(
        "the lower bound at index {i} ({lb}) is greater than the upper bound \
         ({ub})"
      )));
    }
  }
  Ok(())
}

pub(crate) fn fmt_vector(v: &[f64]) -> String {
  format!("[{}]", v.iter().join(", "))
}

impl<P: UserProblem> Problem<P> {
  /// Validates a user problem and wraps it.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::InvalidArgument`] if the bounds are malformed (empty,
  /// of different lengths, containing NaN or with a lower bound above the
  /// upper one), if the problem has no objectives, or if a user provided
  /// sparsity pattern does not fit the problem's dimensions.
  pub fn new(udp: P) -> Result<Self> {
    let (lower, upper) = udp.bounds();
    check_bounds(&lower, &upper)?;
    if udp.nobj() == 0 {
      return Err(Error::invalid(
        "a problem must have at least one objective",
      ));
    }
    let nx = lower.len();
    let nf = udp.nobj() + udp.nec() + udp.nic();
    if let Some(pattern) = udp.gradient_sparsity() {
      check_gradient_sparsity(&pattern, nf, nx)?;
    }
    if let Some(patterns) = udp.hessians_sparsity() {
      check_hessians_sparsity(&patterns, nf, nx)?;
    }
    let problem = Self::assemble(udp, lower, upper);
    debug!(
      "created problem '{}' with {} variables and fitness dimension {}",
      problem.name,
      problem.nx(),
      problem.nf()
    );
    Ok(problem)
  }

  /// Builds the container without validating the user problem.
  pub(crate) fn assemble(udp: P, lower: Vec<f64>, upper: Vec<f64>) -> Self {
    let nx = lower.len();
    let nf = udp.nobj() + udp.nec() + udp.nic();
    let gradient_sparsity = udp.gradient_sparsity();
    let hessians_sparsity = udp.hessians_sparsity();
    Self {
      nobj: udp.nobj(),
      nec: udp.nec(),
      nic: udp.nic(),
      name: udp.name(),
      has_gradient: udp.has_gradient(),
      has_gradient_sparsity: gradient_sparsity.is_some(),
      has_hessians: udp.has_hessians(),
      has_hessians_sparsity: hessians_sparsity.is_some(),
      gs_dim: gradient_sparsity.map_or(nf * nx, |p| p.len()),
      hs_dim: hessians_sparsity.map_or_else(
        || vec![nx * (nx + 1) / 2; nf],
        |ps| ps.iter().map(Vec::len).collect(),
      ),
      thread_safety: udp.thread_safety(),
      fevals: AtomicU64::new(0),
      gevals: AtomicU64::new(0),
      hevals: AtomicU64::new(0),
      udp,
      lower,
      upper,
    }
  }

  fn check_decision_vector(&self, dv: &[f64]) -> Result<()> {
    if dv.len() != self.nx() {
      return Err(Error::invalid(format!(
        "a decision vector of length {} was passed to the problem '{}', \
         which has {} decision variables",
        dv.len(),
        self.name,
        self.nx()
      )));
    }
    Ok(())
  }

  /// Computes the fitness vector of a decision vector and increments the
  /// fitness evaluations counter.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::InvalidArgument`] if `dv` or the returned fitness
  /// have the wrong length. Errors of the user problem are forwarded.
  pub fn fitness(&self, dv: &[f64]) -> Result<Vec<f64>> {
    self.check_decision_vector(dv)?;
    let f = self.udp.fitness(dv)?;
    if f.len() != self.nf() {
      return Err(Error::invalid(format!(
        "the fitness computed by the problem '{}' has length {}, but the \
         fitness dimension is {}",
        self.name,
        f.len(),
        self.nf()
      )));
    }
    self.fevals.fetch_add(1, Ordering::Relaxed);
    Ok(f)
  }

  /// Computes the fitness of each decision vector in order.
  ///
  /// # Errors
  ///
  /// Fails with the first error raised by [`fitness`](Problem::fitness).
  pub fn batch_fitness(&self, dvs: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    dvs.iter().map(|dv| self.fitness(dv)).collect()
  }

  /// Computes the fitness of each decision vector, splitting the batch into
  /// chunks evaluated on rayon's thread pool. The output keeps the order of
  /// the input.
  ///
  /// **For cheap fitness functions parallelization may only decrease
  /// performance because of the overhead it introduces. Benchmark if in
  /// doubt.**
  ///
  /// # Errors
  ///
  /// Fails with [`Error::Logic`] unless the problem's thread safety is
  /// [`ThreadSafety::Constant`]. Otherwise fails like
  /// [`fitness`](Problem::fitness).
  pub fn par_batch_fitness(&self, dvs: &[Vec<f64>]) -> Result<Vec<Vec<f64>>>
  where
    P: Sync,
  {
    if self.thread_safety < ThreadSafety::Constant {
      return Err(Error::logic(format!(
        "the problem '{}' has thread safety level '{}' and cannot be \
         evaluated concurrently",
        self.name, self.thread_safety
      )));
    }
    let chunk_size = (dvs.len() / rayon::current_num_threads()).max(1);
    dvs
      .par_chunks(chunk_size)
      .flat_map_iter(|chunk| chunk.iter().map(|dv| self.fitness(dv)))
      .collect()
  }

  /// Computes the gradient and increments the gradient evaluations counter.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::Logic`] if the problem has no gradient and with
  /// [`Error::InvalidArgument`] on dimension mismatches.
  pub fn gradient(&self, dv: &[f64]) -> Result<Vec<f64>> {
    if !self.has_gradient {
      return Err(Error::logic(format!(
        "the gradient has been requested but it is not implemented in the \
         problem '{}'",
        self.name
      )));
    }
    self.check_decision_vector(dv)?;
    let g = self.udp.gradient(dv)?;
    if g.len() != self.gs_dim {
      return Err(Error::invalid(format!(
        "the gradient computed by the problem '{}' has length {}, but its \
         sparsity pattern has {} entries",
        self.name,
        g.len(),
        self.gs_dim
      )));
    }
    self.gevals.fetch_add(1, Ordering::Relaxed);
    Ok(g)
  }

  /// Computes the hessians and increments the hessians evaluations counter.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::Logic`] if the problem has no hessians and with
  /// [`Error::InvalidArgument`] on dimension mismatches.
  pub fn hessians(&self, dv: &[f64]) -> Result<Vec<Vec<f64>>> {
    if !self.has_hessians {
      return Err(Error::logic(format!(
        "the hessians have been requested but they are not implemented in \
         the problem '{}'",
        self.name
      )));
    }
    self.check_decision_vector(dv)?;
    let h = self.udp.hessians(dv)?;
    let lengths = h.iter().map(Vec::len).collect::<Vec<_>>();
    if lengths != self.hs_dim {
      return Err(Error::invalid(format!(
        "the hessians computed by the problem '{}' have lengths {:?}, but \
         their sparsity patterns have {:?} entries",
        self.name, lengths, self.hs_dim
      )));
    }
    self.hevals.fetch_add(1, Ordering::Relaxed);
    Ok(h)
  }

  /// The gradient sparsity pattern: the user provided one or the dense one.
  pub fn gradient_sparsity(&self) -> SparsityPattern {
    self
      .udp
      .gradient_sparsity()
      .unwrap_or_else(|| dense_gradient(self.nf(), self.nx()))
  }

  /// The hessians sparsity patterns: the user provided ones or the dense
  /// ones.
  pub fn hessians_sparsity(&self) -> Vec<SparsityPattern> {
    self
      .udp
      .hessians_sparsity()
      .unwrap_or_else(|| dense_hessians(self.nf(), self.nx()))
  }

  /// Additional information provided by the user problem.
  pub fn extra_info(&self) -> String {
    self.udp.extra_info()
  }
}

impl<P> Problem<P> {
  /// The wrapped user problem.
  pub fn udp(&self) -> &P {
    &self.udp
  }

  /// Consumes the container, returning the user problem.
  pub fn into_udp(self) -> P {
    self.udp
  }

  /// The box-bounds.
  pub fn bounds(&self) -> Bounds {
    (self.lower.clone(), self.upper.clone())
  }

  /// The lower box-bounds.
  pub fn lower_bounds(&self) -> &[f64] {
    &self.lower
  }

  /// The upper box-bounds.
  pub fn upper_bounds(&self) -> &[f64] {
    &self.upper
  }

  /// Number of decision variables.
  pub fn nx(&self) -> usize {
    self.lower.len()
  }

  /// Fitness dimension: objectives plus constraints.
  pub fn nf(&self) -> usize {
    self.nobj + self.nec + self.nic
  }

  /// Number of objectives.
  pub fn nobj(&self) -> usize {
    self.nobj
  }

  /// Number of equality constraints.
  pub fn nec(&self) -> usize {
    self.nec
  }

  /// Number of inequality constraints.
  pub fn nic(&self) -> usize {
    self.nic
  }

  /// Total number of constraints.
  pub fn nc(&self) -> usize {
    self.nec + self.nic
  }

  /// Number of successful fitness evaluations.
  pub fn fevals(&self) -> u64 {
    self.fevals.load(Ordering::Relaxed)
  }

  /// Number of successful gradient evaluations.
  pub fn gevals(&self) -> u64 {
    self.gevals.load(Ordering::Relaxed)
  }

  /// Number of successful hessians evaluations.
  pub fn hevals(&self) -> u64 {
    self.hevals.load(Ordering::Relaxed)
  }

  /// The problem's name.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Whether the problem provides a gradient.
  pub fn has_gradient(&self) -> bool {
    self.has_gradient
  }

  /// Whether the problem provides its own gradient sparsity pattern.
  pub fn has_gradient_sparsity(&self) -> bool {
    self.has_gradient_sparsity
  }

  /// Whether the problem provides hessians.
  pub fn has_hessians(&self) -> bool {
    self.has_hessians
  }

  /// Whether the problem provides its own hessians sparsity patterns.
  pub fn has_hessians_sparsity(&self) -> bool {
    self.has_hessians_sparsity
  }

  /// The thread safety level of the problem.
  pub fn thread_safety(&self) -> ThreadSafety {
    self.thread_safety
  }
}

impl Default for Problem<NullProblem> {
  fn default() -> Self {
    let udp = NullProblem::default();
    let (lower, upper) = udp.bounds();
    Self::assemble(udp, lower, upper)
  }
}

impl<P: Clone> Clone for Problem<P> {
  fn clone(&self) -> Self {
    Self {
      udp: self.udp.clone(),
      lower: self.lower.clone(),
      upper: self.upper.clone(),
      nobj: self.nobj,
      nec: self.nec,
      nic: self.nic,
      name: self.name.clone(),
      has_gradient: self.has_gradient,
      has_gradient_sparsity: self.has_gradient_sparsity,
      has_hessians: self.has_hessians,
      has_hessians_sparsity: self.has_hessians_sparsity,
      gs_dim: self.gs_dim,
      hs_dim: self.hs_dim.clone(),
      thread_safety: self.thread_safety,
      fevals: AtomicU64::new(self.fevals()),
      gevals: AtomicU64::new(self.gevals()),
      hevals: AtomicU64::new(self.hevals()),
    }
  }
}

impl<P: UserProblem> fmt::Display for Problem<P> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Problem name: {}", self.name)?;
    writeln!(f, "\tGlobal dimension:\t\t\t{}", self.nx())?;
    writeln!(f, "\tFitness dimension:\t\t\t{}", self.nf())?;
    writeln!(f, "\tNumber of objectives:\t\t\t{}", self.nobj)?;
    writeln!(f, "\tEquality constraints dimension:\t\t{}", self.nec)?;
    writeln!(f, "\tInequality constraints dimension:\t{}", self.nic)?;
    writeln!(f, "\tLower bounds: {}", fmt_vector(&self.lower))?;
    writeln!(f, "\tUpper bounds: {}", fmt_vector(&self.upper))?;
    writeln!(f, "\tHas gradient: {}", self.has_gradient)?;
    writeln!(
      f,
      "\tUser implemented gradient sparsity: {}",
      self.has_gradient_sparsity
    )?;
    writeln!(f, "\tHas hessians: {}", self.has_hessians)?;
    writeln!(
      f,
      "\tUser implemented hessians sparsity: {}",
      self.has_hessians_sparsity
    )?;
    writeln!(f, "\tFitness evaluations: {}", self.fevals())?;
    writeln!(f, "\tGradient evaluations: {}", self.gevals())?;
    writeln!(f, "\tHessians evaluations: {}", self.hevals())?;
    writeln!(f, "\tThread safety: {}", self.thread_safety)?;
    let extra = self.extra_info();
    if !extra.is_empty() {
      write!(f, "\nExtra info:\n{extra}\n")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;
  use crate::problems::{Rosenbrock, Zdt};

  #[derive(Debug, Clone)]
  struct Sphere {
    sparsity: Option<SparsityPattern>,
  }

  impl UserProblem for Sphere {
    fn fitness(&self, dv: &[f64]) -> Result<Vec<f64>> {
      Ok(vec![dv.iter().map(|x| x * x).sum()])
    }

    fn bounds(&self) -> Bounds {
      (vec![-1.0; 3], vec![1.0; 3])
    }

    fn name(&self) -> String {
      "Sphere".into()
    }

    fn has_gradient(&self) -> bool {
      true
    }

    fn gradient(&self, dv: &[f64]) -> Result<Vec<f64>> {
      Ok(dv.iter().map(|x| 2.0 * x).collect())
    }

    fn gradient_sparsity(&self) -> Option<SparsityPattern> {
      self.sparsity.clone()
    }

    fn thread_safety(&self) -> ThreadSafety {
      ThreadSafety::Constant
    }
  }

  struct Broken;

  impl UserProblem for Broken {
    fn fitness(&self, dv: &[f64]) -> Result<Vec<f64>> {
      if dv[0] > 0.5 {
        Err(Error::evaluation("diverged"))
      } else {
        Ok(vec![1.0, 2.0])
      }
    }

    fn bounds(&self) -> Bounds {
      (vec![0.0], vec![1.0])
    }
  }

  struct Bounded(Vec<f64>, Vec<f64>);

  impl UserProblem for Bounded {
    fn fitness(&self, _: &[f64]) -> Result<Vec<f64>> {
      Ok(vec![0.0])
    }

    fn bounds(&self) -> Bounds {
      (self.0.clone(), self.1.clone())
    }
  }

  #[test]
  fn test_bounds_validation() {
    assert!(Problem::new(Bounded(vec![], vec![])).is_err());
    assert!(Problem::new(Bounded(vec![0.0], vec![1.0, 2.0])).is_err());
    assert!(Problem::new(Bounded(vec![2.0], vec![1.0])).is_err());
    assert!(Problem::new(Bounded(vec![f64::NAN], vec![1.0])).is_err());
    assert!(Problem::new(Bounded(vec![1.0], vec![1.0])).is_ok());
    assert!(Problem::new(Bounded(vec![f64::NEG_INFINITY], vec![0.0])).is_ok());
  }

  #[test]
  fn test_metadata() {
    let p = Problem::new(Zdt::new(1, 2).unwrap()).unwrap();
    assert_eq!(p.nx(), 2);
    assert_eq!(p.nobj(), 2);
    assert_eq!(p.nf(), 2);
    assert_eq!(p.nc(), 0);
    assert_eq!(p.name(), "ZDT1");
    assert_eq!(p.bounds(), (vec![0.0, 0.0], vec![1.0, 1.0]));
    assert_eq!(p.thread_safety(), ThreadSafety::Constant);
  }

  #[test]
  fn test_fitness_counts_evaluations() {
    let p = Problem::new(Rosenbrock::new(2).unwrap()).unwrap();
    assert_eq!(p.fevals(), 0);
    assert_relative_eq!(p.fitness(&[1.0, 1.0]).unwrap()[0], 0.0);
    p.fitness(&[0.0, 0.0]).unwrap();
    assert_eq!(p.fevals(), 2);
    assert!(matches!(
      p.fitness(&[1.0, 2.0, 3.0]),
      Err(Error::InvalidArgument(_))
    ));
    assert_eq!(p.fevals(), 2);
  }

  #[test]
  fn test_fitness_dimension_is_checked() {
    let p = Problem::new(Broken).unwrap();
    assert!(matches!(p.fitness(&[0.0]), Err(Error::InvalidArgument(_))));
    assert!(matches!(p.fitness(&[1.0]), Err(Error::Evaluation(_))));
    assert_eq!(p.fevals(), 0);
  }

  #[test]
  fn test_gradient() {
    let p = Problem::new(Sphere { sparsity: None }).unwrap();
    assert!(p.has_gradient());
    assert!(!p.has_gradient_sparsity());
    assert_eq!(p.gradient(&[1.0, 2.0, 3.0]).unwrap(), vec![2.0, 4.0, 6.0]);
    assert_eq!(p.gevals(), 1);
    assert_eq!(p.gradient_sparsity(), dense_gradient(1, 3));
    assert!(matches!(p.hessians(&[1.0, 2.0, 3.0]), Err(Error::Logic(_))));
    assert_eq!(p.hessians_sparsity(), dense_hessians(1, 3));
  }

  #[test]
  fn test_gradient_length_follows_sparsity() {
    let p = Problem::new(Sphere {
      sparsity: Some(vec![(0, 0), (0, 2)]),
    })
    .unwrap();
    assert!(p.has_gradient_sparsity());
    assert!(matches!(
      p.gradient(&[1.0, 2.0, 3.0]),
      Err(Error::InvalidArgument(_))
    ));
    assert_eq!(p.gevals(), 0);
    assert!(Problem::new(Sphere {
      sparsity: Some(vec![(0, 3)])
    })
    .is_err());
  }

  #[test]
  fn test_missing_gradient_is_a_logic_error() {
    let p = Problem::new(Zdt::new(1, 2).unwrap()).unwrap();
    assert!(matches!(p.gradient(&[0.5, 0.5]), Err(Error::Logic(_))));
    assert!(matches!(p.hessians(&[0.5, 0.5]), Err(Error::Logic(_))));
  }

  #[test]
  fn test_batch_fitness() {
    let p = Problem::new(Zdt::new(2, 5).unwrap()).unwrap();
    let dvs = (0..64)
      .map(|i| vec![f64::from(i) / 64.0; 5])
      .collect::<Vec<_>>();
    let sequential = p.batch_fitness(&dvs).unwrap();
    let parallel = p.par_batch_fitness(&dvs).unwrap();
    assert_eq!(sequential, parallel);
    assert_eq!(p.fevals(), 128);
  }

  #[test]
  fn test_parallel_batch_requires_constant_thread_safety() {
    let p = Problem::new(Bounded(vec![0.0], vec![1.0])).unwrap();
    assert!(matches!(
      p.par_batch_fitness(&[vec![0.0]]),
      Err(Error::Logic(_))
    ));
    assert_eq!(p.batch_fitness(&[vec![0.0]]).unwrap(), vec![vec![0.0]]);
  }

  #[test]
  fn test_clone_copies_counters() {
    let p = Problem::new(Zdt::new(1, 2).unwrap()).unwrap();
    p.fitness(&[0.5, 0.5]).unwrap();
    let q = p.clone();
    assert_eq!(q.fevals(), 1);
    q.fitness(&[0.5, 0.5]).unwrap();
    assert_eq!(p.fevals(), 1);
    assert_eq!(q.fevals(), 2);
  }

  #[test]
  fn test_display() {
    let p = Problem::new(Zdt::new(1, 2).unwrap()).unwrap();
    p.fitness(&[0.5, 0.5]).unwrap();
    let s = p.to_string();
    assert!(s.starts_with("Problem name: ZDT1\n"));
    assert!(s.contains("\tGlobal dimension:\t\t\t2\n"));
    assert!(s.contains("\tLower bounds: [0, 0]\n"));
    assert!(s.contains("\tFitness evaluations: 1\n"));
    assert!(s.contains("\tThread safety: constant\n"));
    assert_eq!(s, p.clone().to_string());
  }

  #[test]
  fn test_default_is_null_problem() {
    let p = Problem::default();
    assert_eq!(p.nobj(), 1);
    assert_eq!(p.nx(), 1);
    assert_eq!(p.fitness(&[0.5]).unwrap(), vec![0.0]);
  }

  #[test]
  fn test_serde_round_trip() {
    let p = Problem::new(Zdt::new(3, 4).unwrap()).unwrap();
    p.fitness(&[0.1, 0.2, 0.3, 0.4]).unwrap();
    let json = serde_json::to_string(&p).unwrap();
    let q: Problem<Zdt> = serde_json::from_str(&json).unwrap();
    assert_eq!(q.fevals(), 1);
    assert_eq!(p.to_string(), q.to_string());
  }

  #[test]
  fn test_deserialize_recomputes_metadata() {
    let p = Problem::new(Zdt::new(1, 2).unwrap()).unwrap();
    let json = serde_json::to_string(&p)
      .unwrap()
      .replace("\"nobj\":2", "\"nobj\":7");
    let q: Problem<Zdt> = serde_json::from_str(&json).unwrap();
    assert_eq!(q.nobj(), 2);
    assert_eq!(p.to_string(), q.to_string());
  }

  #[test]
  fn test_deserialize_validates_user_problem() {
    let json = serde_json::to_string(&Problem::new(Zdt::default()).unwrap())
      .unwrap()
      .replace("\"param\":30", "\"param\":1");
    assert!(serde_json::from_str::<Problem<Zdt>>(&json).is_err());
  }
}
