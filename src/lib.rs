//! **decompose** reduces multi-objective optimization problems to
//! single-objective ones, so that any single-objective optimizer can be used
//! to approximate a point of their Pareto front.
//!
//! Here's a [quick start example](#example) for the impatient.
//!
//! The crate is built around a few abstractions:
//! - **User problem** - anything implementing [`UserProblem`]: a fitness
//!   function over box-bounded decision vectors, plus optional capabilities
//!   (several objectives, constraints, gradients, hessians) advertised
//!   explicitly through the trait's methods
//! - **Problem** - the [`Problem`] container, which validates a user problem
//!   once, checks every evaluation against it, counts evaluations and prints
//!   a stable textual representation
//! - **Decomposition** - the scalarization of an objective vector with a
//!   weight vector and a reference point, see [`decomposition`]
//! - **Meta-problem** - [`Decompose`], a user problem wrapping a
//!   multi-objective one and exposing the decomposition of its objectives as
//!   a single objective
//!
//! # Decomposition methods
//!
//! Three methods are available, all described in the [`decomposition`]
//! module: weighted sum, Tchebycheff and penalty-based boundary
//! intersection. The weighted sum only reaches the convex parts of a Pareto
//! front, the other two reach any Pareto optimal point with a suitable
//! weight.
//!
//! Tchebycheff and boundary intersection measure distances from a reference
//! point, ideally the *ideal point* of the problem. As it is rarely known
//! beforehand, [`Decompose`] can adapt its reference point during the
//! optimization, lowering it to every better objective value it evaluates.
//!
//! To cover the whole front, decompose the problem once per weight vector.
//! [`decomposition_weights`] generates evenly spread weights for that.
//!
//! # Threads
//!
//! Adapting the reference point mutates the meta-problem during fitness
//! evaluation, so a [`Decompose`] is `Send` but not `Sync`: clone one per
//! worker. Problems reporting [`ThreadSafety::Constant`] can be evaluated in
//! parallel with [`Problem::par_batch_fitness`], powered by [rayon].
//!
//! # Example
//!
//! Decompose the ZDT1 problem with Tchebycheff and an adaptive reference
//! point, then evaluate it like any other single-objective problem.
//! ```
//! use decompose::{
//!   decomposition::Method,
//!   problems::Zdt,
//!   Decompose,
//!   DecomposeConfig,
//!   Problem,
//! };
//!
//! let config = DecomposeConfig::builder()
//!   .weight(vec![0.3, 0.7])
//!   .z(vec![1.0, 1.0])
//!   .method(Method::Tchebycheff)
//!   .adapt_ideal(true)
//!   .build();
//! let udp = Decompose::from_config(Zdt::new(1, 30).unwrap(), config).unwrap();
//! let problem = Problem::new(udp).unwrap();
//!
//! let f = problem.fitness(&[0.5; 30]).unwrap();
//! assert_eq!(f.len(), 1);
//! // the original objectives are still at hand
//! let objectives = problem.udp().original_fitness(&[0.5; 30]).unwrap();
//! assert_eq!(objectives.len(), 2);
//! assert_eq!(problem.udp().z()[0], 0.5);
//! println!("{problem}");
//! ```
//!
//! [`decomposition_weights`]: crate::decomposition::decomposition_weights
//! [rayon]: https://docs.rs/rayon

#![warn(missing_docs)]

pub mod decompose;
pub mod decomposition;
pub mod error;
pub mod pareto;
pub mod problem;
pub mod problems;
pub mod sparsity;

pub use decompose::{Decompose, DecomposeConfig};
pub use error::{Error, Result};
pub use problem::{Bounds, Problem, ThreadSafety, UserProblem};
