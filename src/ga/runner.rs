//! GA solve loop execution.
//!
//! [`GaRunner`] orchestrates the complete run:
//! initialization → probabilities → selection → crossover → mutation →
//! admission → replacement → repeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::GaConfig;
use super::evaluate::Evaluator;
use super::population::Population;
use super::reproduction::{
    fittest, mutate, select_parents, selection_probabilities, uniform_crossover,
};
use crate::error::Result;
use crate::problem::{Problem, Solution};

/// Parent pairings allowed per offspring slot before a generation settles
/// for a partial batch.
const OFFSPRING_ATTEMPTS_PER_SLOT: usize = 100;

/// Per-generation progress of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation index; zero is the initial population.
    pub generation: usize,

    /// Highest fitness in the population at this generation.
    pub best_fitness: f64,

    /// Mean fitness over the population at this generation.
    pub average_fitness: f64,
}

/// Result of a GA solve run.
///
/// Contains the fittest solution of the final population, along with
/// statistics about the run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult {
    /// The fittest solution in the final population.
    pub best: Solution,

    /// Fitness of `best`.
    pub best_fitness: f64,

    /// Number of generations completed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Wall-clock duration of the run, including initialization.
    pub elapsed: Duration,

    /// The problem's known optimal profit, `0.0` when unknown. Carried
    /// over from [`Problem::optimal`] so a caller can compare.
    pub optimal: f64,

    /// Best and average fitness per generation, starting with the
    /// initial population at index zero.
    pub history: Vec<GenerationStats>,
}

/// Executes the GA solve loop.
///
/// # Usage
///
/// ```
/// use mknapsack::ga::{GaConfig, GaRunner};
/// use mknapsack::{Constraint, Problem};
///
/// let problem = Problem::new(
///     vec![60.0, 100.0, 120.0],
///     vec![Constraint::new(vec![10.0, 20.0, 30.0], 50.0)],
/// )
/// .with_optimal(220.0);
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_generations_limit(50)
///     .with_seed(42);
///
/// let result = GaRunner::run(&problem, &config)?;
/// assert_eq!(result.best_fitness, 220.0);
/// # Ok::<(), mknapsack::Error>(())
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA solve loop to the configured generation limit.
    pub fn run(problem: &Problem, config: &GaConfig) -> Result<GaResult> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// at the next generation boundary and reports the best solution
    /// found so far. No generation is interrupted mid-step.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or problem, when initialization
    /// cannot find any feasible solution, or when a generation's
    /// selection sees a stalled population (negative or all-zero
    /// fitness).
    pub fn run_with_cancel(
        problem: &Problem,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        config.validate()?;
        problem.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };

        let evaluator = Evaluator::new(problem);
        let started = Instant::now();

        // 1. Initial population
        let mut population = Population::initialize(&evaluator, config, &mut rng)?;
        let mut fitnesses = population.fitnesses(&evaluator);

        let mut history = Vec::with_capacity(config.generations_limit + 1);
        history.push(stats_for(0, &fitnesses));

        log::debug!(
            "initialized population of {} for {} items in {:?}",
            population.len(),
            problem.item_count(),
            started.elapsed()
        );

        let mut generations = 0;
        let mut cancelled = false;

        // 2. Evolutionary loop
        for generation in 1..=config.generations_limit {
            // Cancellation is checked only at the step boundary
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if !config.step_delay.is_zero() {
                thread::sleep(config.step_delay);
            }

            // 3. Selection probabilities over the current members
            let probabilities = selection_probabilities(&fitnesses).inspect_err(|err| {
                log::error!("generation {generation}: {err}");
            })?;

            // 4. Offspring assembly
            let offspring =
                breed_offspring(&population, &probabilities, config, &evaluator, &mut rng);

            // 5. Survivor replacement and re-evaluation
            population.replace_worst(&fitnesses, offspring);
            fitnesses = population.fitnesses(&evaluator);

            generations = generation;
            let stats = stats_for(generation, &fitnesses);
            log::debug!(
                "generation {generation}: best {}, average {:.3}",
                stats.best_fitness,
                stats.average_fitness
            );
            history.push(stats);
        }

        // 6. Report the fittest member of the final population
        let best = fittest(population.members(), &evaluator)
            .expect("population must not be empty")
            .clone();
        let best_fitness = evaluator.fitness(&best);
        let elapsed = started.elapsed();
        log::info!(
            "solve finished: best fitness {best_fitness} after {generations} \
             generations in {elapsed:?}"
        );

        Ok(GaResult {
            best,
            best_fitness,
            generations,
            cancelled,
            elapsed,
            optimal: problem.optimal,
            history,
        })
    }
}

/// Assembles one generation's offspring batch.
///
/// Parents are drawn by roulette, crossed over, and mutated; a child is
/// admitted only if it is feasible and duplicates neither a population
/// member nor an already admitted sibling. When the attempt budget runs
/// out before the quota is met, the partial batch is returned and a
/// warning is logged; a saturated population, where every feasible
/// solution is already a member, would otherwise spin forever.
fn breed_offspring<R: Rng + ?Sized>(
    population: &Population,
    probabilities: &[f64],
    config: &GaConfig,
    evaluator: &Evaluator<'_>,
    rng: &mut R,
) -> Vec<Solution> {
    let quota = config.offspring_count();
    let budget = quota.saturating_mul(OFFSPRING_ATTEMPTS_PER_SLOT);
    let mut batch: Vec<Solution> = Vec::with_capacity(quota);
    let mut attempts = 0;

    while batch.len() < quota && attempts < budget {
        attempts += 1;
        let (parent1, parent2) = select_parents(population.members(), probabilities, rng);
        let (mut child1, mut child2) =
            uniform_crossover(&parent1, &parent2, config.crossover_probability, rng);
        for child in [&mut child1, &mut child2] {
            mutate(child, config.mutate_probability, config.mutation, evaluator, rng);
        }
        for child in [child1, child2] {
            if batch.len() == quota {
                break;
            }
            if population.is_admissible(&child, evaluator) && !batch.contains(&child) {
                batch.push(child);
            }
        }
    }

    if batch.len() < quota {
        log::warn!(
            "offspring batch incomplete: {} of {quota} admitted after {attempts} pairings",
            batch.len()
        );
    }
    batch
}

/// Best and average fitness of one generation.
fn stats_for(generation: usize, fitnesses: &[f64]) -> GenerationStats {
    let best_fitness = fitnesses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average_fitness = fitnesses.iter().sum::<f64>() / fitnesses.len() as f64;
    GenerationStats {
        generation,
        best_fitness,
        average_fitness,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::problem::Constraint;

    fn classic() -> Problem {
        Problem::new(
            vec![60.0, 100.0, 120.0],
            vec![Constraint::new(vec![10.0, 20.0, 30.0], 50.0)],
        )
        .with_optimal(220.0)
    }

    fn classic_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(10)
            .with_generations_limit(200)
            .with_mutate_probability(0.1)
            .with_crossover_probability(0.9)
            .with_offsprings_proportion(0.5)
            .with_seed(42)
    }

    #[test]
    fn test_classic_instance_converges_to_optimum() {
        let problem = classic();
        let result = GaRunner::run(&problem, &classic_config()).unwrap();

        assert_eq!(
            result.best_fitness, 220.0,
            "expected the known optimum, got {}",
            result.best_fitness
        );
        assert_eq!(result.best.bits(), &[false, true, true]);
        assert_eq!(result.generations, 200);
        assert_eq!(result.optimal, 220.0);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_history_covers_every_generation() {
        let problem = classic();
        let config = classic_config().with_generations_limit(30);
        let result = GaRunner::run(&problem, &config).unwrap();

        // Initial population plus one entry per generation
        assert_eq!(result.history.len(), 31);
        assert_eq!(result.history[0].generation, 0);
        assert_eq!(result.history.last().unwrap().generation, 30);
        for stats in &result.history {
            assert!(stats.best_fitness >= stats.average_fitness);
        }
    }

    #[test]
    fn test_best_fitness_never_decreases() {
        // With half the population replaced per generation the best
        // member always survives, so the best fitness is monotone.
        let problem = classic();
        let result = GaRunner::run(&problem, &classic_config()).unwrap();

        for window in result.history.windows(2) {
            assert!(
                window[1].best_fitness >= window[0].best_fitness,
                "best fitness decreased: {} after {}",
                window[1].best_fitness,
                window[0].best_fitness
            );
        }
    }

    #[test]
    fn test_same_seed_reproduces_the_run() {
        let problem = classic();
        let config = classic_config().with_generations_limit(50).with_seed(7);

        let first = GaRunner::run(&problem, &config).unwrap();
        let second = GaRunner::run(&problem, &config).unwrap();

        assert_eq!(first.best, second.best);
        assert_eq!(first.best_fitness, second.best_fitness);
        assert_eq!(first.history.len(), second.history.len());
        for (a, b) in first.history.iter().zip(&second.history) {
            assert_eq!(a, b, "histories diverged at generation {}", a.generation);
        }
    }

    #[test]
    fn test_zero_generations_reports_initial_best() {
        let problem = classic();
        let config = classic_config().with_generations_limit(0);
        let result = GaRunner::run(&problem, &config).unwrap();

        assert_eq!(result.generations, 0);
        assert_eq!(result.history.len(), 1);
        assert!(result.best_fitness >= 0.0);
    }

    #[test]
    fn test_cancel_flag_stops_before_next_generation() {
        let problem = classic();
        let config = classic_config().with_generations_limit(10_000);

        let cancel = Arc::new(AtomicBool::new(true));
        let result = GaRunner::run_with_cancel(&problem, &config, Some(cancel)).unwrap();

        assert!(result.cancelled, "expected cancelled result");
        assert_eq!(result.generations, 0, "flag was set before the first step");
        assert!(result.best_fitness >= 0.0);
    }

    #[test]
    fn test_cancellation_from_another_thread() {
        let problem = classic();
        let config = classic_config()
            .with_generations_limit(1_000_000)
            .with_step_delay(Duration::from_millis(1));

        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            flag.store(true, Ordering::Relaxed);
        });

        let result = GaRunner::run_with_cancel(&problem, &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert!(result.generations < 1_000_000, "should have stopped early");
    }

    #[test]
    fn test_step_delay_paces_the_loop() {
        let problem = classic();
        let config = classic_config()
            .with_generations_limit(3)
            .with_step_delay(Duration::from_millis(5));
        let result = GaRunner::run(&problem, &config).unwrap();

        assert!(
            result.elapsed >= Duration::from_millis(15),
            "three 5ms steps should take at least 15ms, took {:?}",
            result.elapsed
        );
    }

    #[test]
    fn test_zero_profit_population_is_reported_stalled() {
        let problem = Problem::new(
            vec![0.0, 0.0, 0.0],
            vec![Constraint::new(vec![1.0, 1.0, 1.0], 10.0)],
        );
        let config = GaConfig::default()
            .with_population_size(4)
            .with_generations_limit(5)
            .with_seed(1);

        let result = GaRunner::run(&problem, &config);
        assert!(matches!(result, Err(Error::StalledZeroFitness { .. })));
    }

    #[test]
    fn test_saturated_population_completes_with_partial_batches() {
        // Four members over an instance with exactly four feasible
        // solutions: every offspring duplicates a member, so each
        // generation exhausts its pairing budget and proceeds with an
        // empty batch instead of spinning.
        let problem = Problem::new(
            vec![1.0, 2.0],
            vec![Constraint::new(vec![1.0, 1.0], 10.0)],
        );
        let config = GaConfig::default()
            .with_population_size(4)
            .with_generations_limit(10)
            .with_seed(5);

        let result = GaRunner::run(&problem, &config).unwrap();
        assert_eq!(result.generations, 10);
        assert_eq!(result.best_fitness, 3.0, "both items fit");
        for stats in &result.history {
            assert_eq!(stats.best_fitness, 3.0, "static population, static best");
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let problem = classic();
        let config = GaConfig {
            population_size: 1,
            ..GaConfig::default()
        };
        assert!(matches!(
            GaRunner::run(&problem, &config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_problem_is_rejected() {
        let problem = Problem::new(
            vec![1.0, 2.0],
            vec![Constraint::new(vec![1.0], 5.0)],
        );
        assert!(matches!(
            GaRunner::run(&problem, &GaConfig::default()),
            Err(Error::ConstraintLength { index: 0, .. })
        ));
    }

    #[test]
    fn test_unseeded_run_completes() {
        let problem = classic();
        let config = GaConfig::default()
            .with_population_size(6)
            .with_generations_limit(20);
        assert!(config.seed.is_none());

        let result = GaRunner::run(&problem, &config).unwrap();
        assert!(result.best_fitness >= 0.0);
        assert_eq!(result.history.len(), 21);
    }

    #[test]
    fn test_greedy_mutation_strategy_reaches_optimum() {
        let problem = classic();
        let config = classic_config().with_mutation(crate::ga::Mutation::Greedy);
        let result = GaRunner::run(&problem, &config).unwrap();
        assert_eq!(result.best_fitness, 220.0);
    }
}
