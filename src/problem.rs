//! Multi-dimensional 0/1 knapsack problem data.
//!
//! A problem is a set of items, each with a profit, plus one or more
//! capacity constraints. Every constraint assigns a weight to every item
//! and carries a single bag limit; a selection of items is feasible only
//! if it satisfies all constraints simultaneously.
//!
//! All quantities are `f64`. OR-Library instances use integral values, but
//! nothing in the algorithm depends on integrality.

use rand::Rng;
use std::fmt;

use crate::error::{Error, Result};

/// One capacity dimension: per-item weights and the shared bag limit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    /// Weight each item contributes to this dimension when selected.
    /// Must have one entry per item.
    pub weights: Vec<f64>,
    /// Maximum total weight a feasible selection may reach in this
    /// dimension.
    pub bag_limit: f64,
}

impl Constraint {
    pub fn new(weights: Vec<f64>, bag_limit: f64) -> Self {
        Self { weights, bag_limit }
    }
}

/// A multi-dimensional 0/1 knapsack instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Problem {
    /// Profit earned by selecting each item.
    pub profits: Vec<f64>,
    /// Capacity constraints; all must hold for a selection to be feasible.
    pub constraints: Vec<Constraint>,
    /// Known optimal profit for this instance, `0.0` when unknown.
    /// OR-Library files record it in the problem header.
    pub optimal: f64,
}

impl Problem {
    /// Creates a problem with an unknown optimum.
    pub fn new(profits: Vec<f64>, constraints: Vec<Constraint>) -> Self {
        Self {
            profits,
            constraints,
            optimal: 0.0,
        }
    }

    /// Sets the known optimal profit, as recorded in OR-Library headers.
    pub fn with_optimal(mut self, optimal: f64) -> Self {
        self.optimal = optimal;
        self
    }

    /// Number of items in the instance.
    pub fn item_count(&self) -> usize {
        self.profits.len()
    }

    /// Checks the instance is structurally usable.
    ///
    /// Requires at least one item, finite non-negative profits and
    /// weights, finite bag limits, and one weight per item in every
    /// constraint. Run before solving; parsed instances are checked by
    /// the parser already.
    pub fn validate(&self) -> Result<()> {
        if self.profits.is_empty() {
            return Err(Error::Problem("no items".into()));
        }
        for (i, &p) in self.profits.iter().enumerate() {
            if !p.is_finite() || p < 0.0 {
                return Err(Error::Problem(format!("profit {i} is {p}")));
            }
        }
        if !self.optimal.is_finite() {
            return Err(Error::Problem(format!("optimal is {}", self.optimal)));
        }
        for (index, constraint) in self.constraints.iter().enumerate() {
            if constraint.weights.len() != self.profits.len() {
                return Err(Error::ConstraintLength {
                    index,
                    expected: self.profits.len(),
                    found: constraint.weights.len(),
                });
            }
            for (i, &w) in constraint.weights.iter().enumerate() {
                if !w.is_finite() || w < 0.0 {
                    return Err(Error::Problem(format!(
                        "constraint {index}: weight {i} is {w}"
                    )));
                }
            }
            if !constraint.bag_limit.is_finite() {
                return Err(Error::Problem(format!(
                    "constraint {index}: bag limit is {}",
                    constraint.bag_limit
                )));
            }
        }
        Ok(())
    }
}

/// A candidate selection of items, one bit per item.
///
/// Bit `i` set means item `i` is in the knapsack. Solutions compare equal
/// when their bit strings are identical, which is how the population keeps
/// itself duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    bits: Vec<bool>,
}

impl Solution {
    /// The empty selection: no item chosen.
    pub fn zeros(item_count: usize) -> Self {
        Self {
            bits: vec![false; item_count],
        }
    }

    /// Draws each bit from a fair coin.
    pub fn random<R: Rng + ?Sized>(item_count: usize, rng: &mut R) -> Self {
        Self {
            bits: (0..item_count).map(|_| rng.random_bool(0.5)).collect(),
        }
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Number of items the solution spans (selected or not).
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether item `index` is selected.
    pub fn bit(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Indices of the selected items, ascending.
    pub fn selected(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn set(&mut self, index: usize, value: bool) {
        self.bits[index] = value;
    }

    pub(crate) fn flip(&mut self, index: usize) {
        self.bits[index] = !self.bits[index];
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            write!(f, "{}", if b { '1' } else { '0' })?;
        }
        Ok(())
    }
}
