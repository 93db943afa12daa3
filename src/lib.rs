//! Multi-dimensional 0/1 knapsack solver.
//!
//! Picks the subset of items maximizing total profit under any number of
//! simultaneous capacity constraints, using a generational genetic
//! algorithm:
//!
//! - **Problem model**: profits, per-constraint weight rows, and bag
//!   limits, all `f64` ([`Problem`], [`Constraint`], [`Solution`]).
//! - **Solver** ([`ga`]): fitness-proportionate selection over a
//!   duplicate-free feasible population, uniform crossover, single-bit
//!   mutation, and worst-member replacement; seedable, cancellable, and
//!   paceable for step-by-step observation.
//! - **Instance files** ([`or_library`]): parser for Beasley's
//!   OR-Library `mknap` format, including the recorded optima.
//!
//! # Quick start
//!
//! ```
//! use mknapsack::ga::{GaConfig, GaRunner};
//! use mknapsack::{Constraint, Problem};
//!
//! let problem = Problem::new(
//!     vec![60.0, 100.0, 120.0],
//!     vec![Constraint::new(vec![10.0, 20.0, 30.0], 50.0)],
//! );
//! let config = GaConfig::default()
//!     .with_population_size(10)
//!     .with_generations_limit(100)
//!     .with_seed(7);
//!
//! let result = GaRunner::run(&problem, &config)?;
//! println!("best {} with profit {}", result.best, result.best_fitness);
//! # Ok::<(), mknapsack::Error>(())
//! ```

pub mod error;
pub mod ga;
pub mod or_library;
pub mod problem;

pub use error::{Error, Result};
pub use problem::{Constraint, Problem, Solution};
