//! Population management.
//!
//! The population invariant, both at initialization and across
//! generations, is that every member is feasible and no two members share
//! a bit string. Selection pressure over duplicates would collapse the
//! roulette wheel, so admission checks enforce distinctness everywhere a
//! solution enters the pool.

use rand::Rng;

use super::config::GaConfig;
use super::evaluate::Evaluator;
use crate::error::{Error, Result};
use crate::problem::Solution;

/// Random draws allowed per requested member before initialization gives
/// up. The total budget is `population_size * ATTEMPTS_PER_MEMBER`.
const ATTEMPTS_PER_MEMBER: usize = 200;

/// Consecutive duplicate rejections before initialization starts
/// interleaving derived neighbors of admitted members with the fresh
/// random draws. Random draws that keep collapsing onto the same
/// repaired solutions rarely recover on their own, but draws must keep
/// running: neighbors only reach subsets of what is already admitted.
const DUPLICATE_STREAK_LIMIT: usize = 25;

/// A duplicate-free pool of feasible solutions.
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Solution>,
}

impl Population {
    /// Builds an initial population of exactly `config.population_size`
    /// feasible solutions, pairwise distinct as far as the instance
    /// allows.
    ///
    /// Candidates are drawn uniformly at random. With `config.repair` set
    /// (the default), an infeasible draw has random set bits cleared until
    /// it becomes feasible; clearing bits never breaks feasibility because
    /// weights are non-negative. Without repair, infeasible draws are
    /// discarded.
    ///
    /// Distinctness is bounded-effort: when the attempt budget runs out
    /// before the target size is reached, the remaining slots are filled
    /// with near-duplicates of admitted members and a warning is logged.
    /// That keeps a request like size 10 on an instance with only 7
    /// distinct feasible solutions runnable, at reduced diversity.
    /// Returns [`Error::PopulationInit`] only when not a single feasible
    /// solution was found within the budget.
    pub fn initialize<R: Rng + ?Sized>(
        evaluator: &Evaluator<'_>,
        config: &GaConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let target = config.population_size;
        let item_count = evaluator.problem().item_count();
        let budget = target.saturating_mul(ATTEMPTS_PER_MEMBER);

        let mut members: Vec<Solution> = Vec::with_capacity(target);
        let mut attempts = 0;
        let mut duplicate_streak = 0;
        while members.len() < target && attempts < budget {
            attempts += 1;

            let derive = duplicate_streak >= DUPLICATE_STREAK_LIMIT
                && !members.is_empty()
                && attempts % 2 == 0;
            let candidate = if derive {
                derive_neighbor(&members, rng)
            } else {
                let mut candidate = Solution::random(item_count, rng);
                if config.repair {
                    repair(&mut candidate, evaluator, rng);
                }
                candidate
            };

            if !evaluator.is_feasible(&candidate) {
                continue;
            }
            if members.contains(&candidate) {
                duplicate_streak += 1;
                continue;
            }
            duplicate_streak = 0;
            members.push(candidate);
        }

        if members.is_empty() {
            return Err(Error::PopulationInit { target, attempts });
        }
        if members.len() < target {
            log::warn!(
                "initial population degraded: {} distinct feasible members \
                 for a target of {target} after {attempts} attempts, filling \
                 the rest with near-duplicates",
                members.len(),
            );
            while members.len() < target {
                let filler = derive_neighbor(&members, rng);
                members.push(filler);
            }
        }

        Ok(Self { members })
    }

    /// Whether `candidate` may join this population: feasible and not
    /// bit-identical to any current member.
    pub fn is_admissible(&self, candidate: &Solution, evaluator: &Evaluator<'_>) -> bool {
        evaluator.is_feasible(candidate) && !self.members.contains(candidate)
    }

    /// Replaces the worst members with `offspring`, preserving the
    /// population size.
    ///
    /// Members are ranked by `fitnesses` ascending; the worst member is
    /// overwritten by the first offspring, the second worst by the second,
    /// and so on. Ties keep their original order, so among equally bad
    /// members the earlier one is replaced first. A batch larger than the
    /// population is truncated.
    pub fn replace_worst(&mut self, fitnesses: &[f64], offspring: Vec<Solution>) {
        debug_assert_eq!(fitnesses.len(), self.members.len());
        let mut order: Vec<usize> = (0..self.members.len()).collect();
        order.sort_by(|&a, &b| fitnesses[a].total_cmp(&fitnesses[b]));
        for (slot, child) in order.into_iter().zip(offspring) {
            self.members[slot] = child;
        }
    }

    /// Scores every member, in member order.
    pub fn fitnesses(&self, evaluator: &Evaluator<'_>) -> Vec<f64> {
        self.members.iter().map(|m| evaluator.fitness(m)).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Solution] {
        &self.members
    }
}

/// Clears random set bits until the solution is feasible. Leaves the
/// all-zeros solution untouched if even that is infeasible (possible only
/// with a negative bag limit).
fn repair<R: Rng + ?Sized>(solution: &mut Solution, evaluator: &Evaluator<'_>, rng: &mut R) {
    while !evaluator.is_feasible(solution) {
        let set = solution.selected();
        if set.is_empty() {
            return;
        }
        solution.set(set[rng.random_range(0..set.len())], false);
    }
}

/// A lighter copy of a random admitted member: one set bit cleared.
/// Stays feasible because weights are non-negative.
fn derive_neighbor<R: Rng + ?Sized>(members: &[Solution], rng: &mut R) -> Solution {
    let mut neighbor = members[rng.random_range(0..members.len())].clone();
    let set = neighbor.selected();
    if !set.is_empty() {
        neighbor.set(set[rng.random_range(0..set.len())], false);
    }
    neighbor
}
