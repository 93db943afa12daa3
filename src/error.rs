//! Error types.
//!
//! Infeasibility is deliberately *not* represented here: an infeasible
//! solution evaluates to the [`INFEASIBLE`](crate::ga::INFEASIBLE) fitness
//! sentinel and flows through the algorithm as ordinary data. Errors are
//! reserved for conditions that make a solve (or parse) impossible to
//! continue: malformed input, invalid configuration, and populations the
//! reproduction cycle cannot work with.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of parsing and solving.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A configuration parameter is out of its documented range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A constraint's weight vector does not match the item count.
    #[error("constraint {index}: expected {expected} weights, found {found}")]
    ConstraintLength {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// The problem data is structurally unusable (no items, negative or
    /// non-finite numbers).
    #[error("invalid problem: {0}")]
    Problem(String),

    /// A token in the OR-Library input stream is not a number.
    #[error("token {position} is not a number: {lexeme:?}")]
    ParseToken { position: usize, lexeme: String },

    /// A header token that declares a problem, item, or constraint count
    /// is not a usable non-negative integer.
    #[error("token {position} is not a valid count: {lexeme:?}")]
    ParseCount { position: usize, lexeme: String },

    /// The OR-Library input ended before the declared data was complete.
    #[error("unexpected end of input while reading {expected}")]
    ParseEof { expected: &'static str },

    /// Initialization failed to find even one feasible solution within
    /// its attempt budget. When feasible solutions exist but distinct
    /// ones run out, initialization degrades to near-duplicates instead
    /// of failing.
    #[error(
        "initial population: no feasible solution found in {attempts} attempts \
         (target size {target})"
    )]
    PopulationInit { target: usize, attempts: usize },

    /// Roulette selection saw an infeasible member; the fitness-proportional
    /// distribution is undefined over negative values.
    #[error("stalled population: member {index} has negative fitness {fitness}")]
    StalledNegativeFitness { index: usize, fitness: f64 },

    /// Roulette selection saw a population whose total fitness is not
    /// positive; every selection probability would be zero or undefined.
    #[error("stalled population: total fitness {total} is not positive")]
    StalledZeroFitness { total: f64 },
}
