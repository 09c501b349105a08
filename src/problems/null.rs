use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  problem::{Bounds, ThreadSafety, UserProblem},
};

/// A placeholder problem with a one-dimensional decision vector in `[0, 1]`
/// whose fitness is always zero.
///
/// Used as the default inner problem of containers and meta-problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NullProblemRepr")]
pub struct NullProblem {
  nobj: usize,
  nec: usize,
  nic: usize,
}

#[derive(Deserialize)]
struct NullProblemRepr {
  nobj: usize,
  nec: usize,
  nic: usize,
}

impl TryFrom<NullProblemRepr> for NullProblem {
  type Error = Error;

  fn try_from(repr: NullProblemRepr) -> Result<Self> {
    Self::new(repr.nobj, repr.nec, repr.nic)
  }
}

impl NullProblem {
  /// Creates a null problem with the given numbers of objectives, equality
  /// and inequality constraints.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::InvalidArgument`] if `nobj` is zero.
  pub fn new(nobj: usize, nec: usize, nic: usize) -> Result<Self> {
    if nobj == 0 {
      return Err(Error::invalid(
        "the null problem must have at least one objective",
      ));
    }
    Ok(Self { nobj, nec, nic })
  }

  /// The infallible multi-objective constructor used by default
  /// meta-problems.
  pub(crate) fn with_objectives(nobj: usize) -> Self {
    Self {
      nobj: nobj.max(1),
      nec: 0,
      nic: 0,
    }
  }
}

impl Default for NullProblem {
  fn default() -> Self {
    Self::with_objectives(1)
  }
}

impl UserProblem for NullProblem {
  fn fitness(&self, _: &[f64]) -> Result<Vec<f64>> {
    Ok(vec![0.0; self.nobj + self.nec + self.nic])
  }

  fn bounds(&self) -> Bounds {
    (vec![0.0], vec![1.0])
  }

  fn nobj(&self) -> usize {
    self.nobj
  }

  fn nec(&self) -> usize {
    self.nec
  }

  fn nic(&self) -> usize {
    self.nic
  }

  fn name(&self) -> String {
    "Null problem".into()
  }

  fn thread_safety(&self) -> ThreadSafety {
    ThreadSafety::Constant
  }
}
