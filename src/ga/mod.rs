//! Genetic Algorithm solver for the multi-dimensional 0/1 knapsack.
//!
//! A generational GA over fixed-length binary solutions: the population
//! holds only feasible members, parents are drawn by fitness-proportionate
//! roulette, offspring come from uniform crossover and single-bit-flip
//! mutation, and each generation replaces its worst members with the
//! admitted offspring.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, probabilities, seed)
//! - [`GaRunner`]: Executes the solve loop
//! - [`GaResult`]: Final result with per-generation statistics
//! - [`Evaluator`]: Scores solutions; [`INFEASIBLE`] marks constraint violations
//! - [`Population`]: Duplicate-free pool of feasible solutions
//!
//! # Submodules
//!
//! - [`reproduction`]: Parent selection, uniform crossover, and mutation
//!   operators, usable on their own
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"
//! - Chu & Beasley (1998), "A Genetic Algorithm for the Multidimensional
//!   Knapsack Problem"

mod config;
mod evaluate;
mod population;
pub mod reproduction;
mod runner;

pub use config::{GaConfig, Mutation};
pub use evaluate::{Evaluator, INFEASIBLE};
pub use population::Population;
pub use runner::{GaResult, GaRunner, GenerationStats};
