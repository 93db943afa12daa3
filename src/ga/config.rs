//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use std::time::Duration;

use crate::error::{Error, Result};

/// Mutation strategy applied to offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// Flip one random bit and keep the result unconditionally.
    #[default]
    Flip,
    /// Flip one random bit, but revert the flip if it lowered fitness.
    ///
    /// Greedy mutation never makes an offspring worse, at the cost of one
    /// extra evaluation per mutated offspring and some diversity.
    Greedy,
}

/// Configuration for the Genetic Algorithm.
///
/// Controls population size, operator probabilities, offspring volume,
/// and termination.
///
/// # Defaults
///
/// ```
/// use mknapsack::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations_limit, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use mknapsack::ga::{GaConfig, Mutation};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_mutate_probability(0.05)
///     .with_mutation(Mutation::Greedy)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of solutions in the population.
    ///
    /// The population is kept duplicate-free, so the size must not exceed
    /// the number of distinct feasible solutions the instance admits.
    /// Typical range: 50–500.
    pub population_size: usize,

    /// Number of generations before termination.
    ///
    /// Zero is allowed: the run evaluates the initial population and
    /// reports its fittest member without evolving.
    pub generations_limit: usize,

    /// Probability of mutating each offspring (0.0–1.0).
    pub mutate_probability: f64,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, the offspring are copies of the
    /// parents.
    pub crossover_probability: f64,

    /// Fraction of the population replaced by offspring each generation
    /// (0.0 exclusive to 1.0 inclusive).
    ///
    /// The offspring count is `ceil(population_size * offsprings_proportion)`,
    /// so any valid proportion produces at least one offspring.
    pub offsprings_proportion: f64,

    /// Pause inserted before each generation.
    ///
    /// [`Duration::ZERO`] (the default) runs flat out. A non-zero delay
    /// paces the loop for step-by-step observation, matching the cadence
    /// of an animated run.
    pub step_delay: Duration,

    /// Whether initialization repairs infeasible random solutions by
    /// clearing random set bits until all constraints hold.
    ///
    /// Without repair, initialization keeps drawing fresh random solutions
    /// and discards infeasible ones, which can exhaust the attempt budget
    /// on tight instances.
    pub repair: bool,

    /// Mutation strategy for offspring.
    pub mutation: Mutation,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations_limit: 500,
            mutate_probability: 0.1,
            crossover_probability: 0.9,
            offsprings_proportion: 0.5,
            step_delay: Duration::ZERO,
            repair: true,
            mutation: Mutation::Flip,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations_limit(mut self, n: usize) -> Self {
        self.generations_limit = n;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutate_probability(mut self, probability: f64) -> Self {
        self.mutate_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Sets the offspring proportion.
    ///
    /// Clamped to `[0.0, 1.0]`; a proportion of exactly zero still fails
    /// [`validate`](Self::validate), since a generation must produce at
    /// least one offspring.
    pub fn with_offsprings_proportion(mut self, proportion: f64) -> Self {
        self.offsprings_proportion = proportion.clamp(0.0, 1.0);
        self
    }

    /// Sets the pause inserted before each generation.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Enables or disables repair of infeasible random solutions during
    /// initialization.
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair = repair;
        self
    }

    /// Sets the mutation strategy.
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns [`Error::Config`] with a description if any parameter is
    /// out of range. The builders clamp, so this mainly guards literal
    /// struct construction.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::Config("population_size must be at least 2".into()));
        }
        if !(0.0..=1.0).contains(&self.mutate_probability) {
            return Err(Error::Config(
                "mutate_probability must be within 0.0..=1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(Error::Config(
                "crossover_probability must be within 0.0..=1.0".into(),
            ));
        }
        if !(self.offsprings_proportion > 0.0 && self.offsprings_proportion <= 1.0) {
            return Err(Error::Config(
                "offsprings_proportion must be within 0.0 (exclusive)..=1.0".into(),
            ));
        }
        Ok(())
    }

    /// Offspring produced per generation: `ceil(size * proportion)`,
    /// never more than the population size.
    pub(crate) fn offspring_count(&self) -> usize {
        let count = (self.population_size as f64 * self.offsprings_proportion).ceil() as usize;
        count.clamp(1, self.population_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.generations_limit, 500);
        assert!((config.mutate_probability - 0.1).abs() < 1e-10);
        assert!((config.crossover_probability - 0.9).abs() < 1e-10);
        assert!((config.offsprings_proportion - 0.5).abs() < 1e-10);
        assert_eq!(config.step_delay, Duration::ZERO);
        assert!(config.repair);
        assert_eq!(config.mutation, Mutation::Flip);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(200)
            .with_generations_limit(1000)
            .with_mutate_probability(0.05)
            .with_crossover_probability(0.8)
            .with_offsprings_proportion(0.25)
            .with_step_delay(Duration::from_millis(10))
            .with_repair(false)
            .with_mutation(Mutation::Greedy)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert_eq!(config.generations_limit, 1000);
        assert!((config.mutate_probability - 0.05).abs() < 1e-10);
        assert!((config.crossover_probability - 0.8).abs() < 1e-10);
        assert!((config.offsprings_proportion - 0.25).abs() < 1e-10);
        assert_eq!(config.step_delay, Duration::from_millis(10));
        assert!(!config.repair);
        assert_eq!(config.mutation, Mutation::Greedy);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_zero_generations() {
        let config = GaConfig::default().with_generations_limit(0);
        assert!(config.validate().is_ok(), "a zero-generation run is legal");
    }

    #[test]
    fn test_validate_zero_offspring_proportion() {
        let config = GaConfig {
            offsprings_proportion: 0.0,
            ..GaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_out_of_range_probability() {
        let config = GaConfig {
            mutate_probability: 1.5,
            ..GaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_probabilities() {
        let config = GaConfig::default()
            .with_mutate_probability(2.0)
            .with_crossover_probability(-0.5)
            .with_offsprings_proportion(1.5);

        assert!((config.mutate_probability - 1.0).abs() < 1e-10);
        assert!((config.crossover_probability - 0.0).abs() < 1e-10);
        assert!((config.offsprings_proportion - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_offspring_count_rounds_up() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_offsprings_proportion(0.5);
        assert_eq!(config.offspring_count(), 5);

        let config = config.with_offsprings_proportion(0.55);
        assert_eq!(config.offspring_count(), 6, "fractional quota rounds up");
    }

    #[test]
    fn test_offspring_count_at_least_one() {
        let config = GaConfig::default()
            .with_population_size(3)
            .with_offsprings_proportion(0.01);
        assert_eq!(config.offspring_count(), 1);
    }

    #[test]
    fn test_offspring_count_full_population() {
        let config = GaConfig::default()
            .with_population_size(8)
            .with_offsprings_proportion(1.0);
        assert_eq!(config.offspring_count(), 8);
    }
}
