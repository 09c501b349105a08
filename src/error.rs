//! Error type shared by every problem, meta-problem and utility of the crate.

/// An alias for results returned throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by problems, meta-problems and utilities.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// An argument violates a documented invariant: wrong dimensions, values
  /// off the simplex, unknown method names and so on. Always recoverable by
  /// retrying with corrected arguments.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A capability was invoked on a problem that does not provide it.
  #[error("logic error: {0}")]
  Logic(String),

  /// A user problem failed while computing its fitness, gradient or
  /// hessians. Meta-problems pass these through untouched.
  #[error("problem evaluation failed")]
  Evaluation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidArgument(msg.into())
  }

  pub(crate) fn logic(msg: impl Into<String>) -> Self {
    Self::Logic(msg.into())
  }

  /// Wraps an arbitrary error raised by user problem code.
  pub fn evaluation<E>(err: E) -> Self
  where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
  {
    Self::Evaluation(err.into())
  }
}
