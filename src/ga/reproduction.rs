//! Reproduction: parent selection, crossover, and mutation.
//!
//! Selection is fitness-proportionate (roulette wheel) over a population
//! whose members are all feasible, so every fitness is non-negative and
//! probabilities are plain fitness shares. Crossover is uniform with
//! complementary children, mutation is a single-bit flip.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use rand::Rng;

use super::config::Mutation;
use super::evaluate::Evaluator;
use crate::error::{Error, Result};
use crate::problem::Solution;

/// Roulette spins allowed for the second parent before giving up on
/// drawing a distinct one. Past the cap the second parent is forced to
/// differ by flipping one bit of a copy of the first, so a wheel that
/// keeps landing on a single member cannot hang the generation.
const PARENT_RETRY_LIMIT: usize = 64;

/// The member with the highest fitness, or `None` for an empty slice.
///
/// Ties keep the earliest member.
pub fn fittest<'a>(members: &'a [Solution], evaluator: &Evaluator<'_>) -> Option<&'a Solution> {
    let mut best: Option<(&Solution, f64)> = None;
    for member in members {
        let fitness = evaluator.fitness(member);
        match best {
            Some((_, best_fitness)) if fitness <= best_fitness => {}
            _ => best = Some((member, fitness)),
        }
    }
    best.map(|(member, _)| member)
}

/// Fitness-proportionate selection probabilities: each member's share of
/// the total fitness.
///
/// A negative fitness means an infeasible member leaked into the
/// population and the distribution is undefined; a non-positive total
/// means every member has zero profit and the wheel has nowhere to land.
/// Both are reported as stalled-population errors rather than producing a
/// wheel that spins forever or divides by zero.
pub fn selection_probabilities(fitnesses: &[f64]) -> Result<Vec<f64>> {
    for (index, &fitness) in fitnesses.iter().enumerate() {
        if fitness < 0.0 {
            return Err(Error::StalledNegativeFitness { index, fitness });
        }
    }
    let total: f64 = fitnesses.iter().sum();
    if total <= 0.0 {
        return Err(Error::StalledZeroFitness { total });
    }
    Ok(fitnesses.iter().map(|&f| f / total).collect())
}

/// Draws two distinct parents by roulette wheel.
///
/// Each spin lands in the cumulative probability interval covering it;
/// intervals are half-open, so a member with probability zero is never
/// chosen. The second parent is re-drawn until it differs from the first,
/// up to [`PARENT_RETRY_LIMIT`] spins.
pub fn select_parents<R: Rng + ?Sized>(
    members: &[Solution],
    probabilities: &[f64],
    rng: &mut R,
) -> (Solution, Solution) {
    debug_assert_eq!(members.len(), probabilities.len());
    let first = spin(probabilities, rng);
    for _ in 0..PARENT_RETRY_LIMIT {
        let second = spin(probabilities, rng);
        if members[second] != members[first] {
            return (members[first].clone(), members[second].clone());
        }
    }

    // The wheel is stuck on one member. Force a one-bit difference so
    // crossover still has two distinct parents to work with.
    let parent1 = members[first].clone();
    let mut parent2 = parent1.clone();
    if !parent2.is_empty() {
        parent2.flip(rng.random_range(0..parent2.len()));
    }
    (parent1, parent2)
}

/// One roulette spin: walk the cumulative distribution until it covers
/// the drawn point.
fn spin<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> usize {
    let point = rng.random_range(0.0..1.0);
    let mut cumulative = 0.0;
    for (index, &p) in probabilities.iter().enumerate() {
        cumulative += p;
        if point < cumulative {
            return index;
        }
    }
    probabilities.len() - 1 // floating-point fallback
}

/// Uniform crossover with complementary children.
///
/// With probability `probability` each gene position swaps between the
/// children on a fair coin, so whatever child one takes from one parent,
/// child two takes from the other. Otherwise the children are plain
/// copies of the parents. The parents are never modified.
pub fn uniform_crossover<R: Rng + ?Sized>(
    parent1: &Solution,
    parent2: &Solution,
    probability: f64,
    rng: &mut R,
) -> (Solution, Solution) {
    debug_assert_eq!(parent1.len(), parent2.len());
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();
    if !rng.random_bool(probability) {
        return (child1, child2);
    }
    for i in 0..child1.len() {
        if rng.random_bool(0.5) {
            child1.set(i, parent2.bit(i));
            child2.set(i, parent1.bit(i));
        }
    }
    (child1, child2)
}

/// With probability `probability`, flips one uniformly random bit.
///
/// Under [`Mutation::Greedy`] the flip is reverted if it lowered fitness,
/// so greedy mutation never makes a solution worse.
pub fn mutate<R: Rng + ?Sized>(
    solution: &mut Solution,
    probability: f64,
    strategy: Mutation,
    evaluator: &Evaluator<'_>,
    rng: &mut R,
) {
    if solution.is_empty() || !rng.random_bool(probability) {
        return;
    }
    let index = rng.random_range(0..solution.len());
    match strategy {
        Mutation::Flip => solution.flip(index),
        Mutation::Greedy => {
            let before = evaluator.fitness(solution);
            solution.flip(index);
            if evaluator.fitness(solution) < before {
                solution.flip(index);
            }
        }
    }
}
