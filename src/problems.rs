//! Reference problems.
//!
//! Small, well known problems used to exercise problems and meta-problems:
//! the [`NullProblem`] placeholder, the single-objective [`Rosenbrock`]
//! function and the bi-objective [`Zdt`] suite.

mod null;
mod rosenbrock;
mod zdt;

pub use null::NullProblem;
pub use rosenbrock::Rosenbrock;
pub use zdt::Zdt;
