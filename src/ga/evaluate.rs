//! Fitness evaluation.
//!
//! Fitness of a selection is its total profit when every constraint holds,
//! and the [`INFEASIBLE`] sentinel otherwise. The sentinel is ordinary
//! data: infeasible offspring are scored and rejected by admission checks,
//! they are not errors. Fitness is recomputed on every call, never cached,
//! so a mutated solution can simply be re-scored.

use crate::problem::{Problem, Solution};

/// Fitness assigned to any selection that violates at least one
/// constraint. Strictly below every feasible fitness, since profits are
/// non-negative.
pub const INFEASIBLE: f64 = -1.0;

/// Scores solutions against one problem instance.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    problem: &'a Problem,
}

impl<'a> Evaluator<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        Self { problem }
    }

    pub fn problem(&self) -> &Problem {
        self.problem
    }

    /// Total profit of the selection, or [`INFEASIBLE`] if any constraint
    /// is violated.
    ///
    /// A total weight exactly equal to the bag limit is feasible.
    /// Constraints are checked in order and the first violation
    /// short-circuits.
    pub fn fitness(&self, solution: &Solution) -> f64 {
        debug_assert_eq!(solution.len(), self.problem.item_count());
        for constraint in &self.problem.constraints {
            let weight: f64 = constraint
                .weights
                .iter()
                .zip(solution.bits())
                .filter(|(_, &selected)| selected)
                .map(|(&w, _)| w)
                .sum();
            if weight > constraint.bag_limit {
                return INFEASIBLE;
            }
        }
        self.problem
            .profits
            .iter()
            .zip(solution.bits())
            .filter(|(_, &selected)| selected)
            .map(|(&p, _)| p)
            .sum()
    }

    /// Whether the selection satisfies every constraint.
    pub fn is_feasible(&self, solution: &Solution) -> bool {
        self.fitness(solution) >= 0.0
    }
}
