//! OR-Library multi-dimensional knapsack file parsing.
//!
//! Parses the plain-text format of Beasley's OR-Library `mknap` instance
//! files: a stream of whitespace-separated numbers, starting with the
//! number of problems, followed by each problem in turn.
//!
//! ```text
//! 1            number of problems in the file
//! 3 1 220      items, constraints, known optimal (0 when unknown)
//! 60 100 120   profit per item
//! 10 20 30     weights, one row per constraint
//! 50           bag limit per constraint
//! ```
//!
//! Tokens after the declared problems are ignored. Errors carry the
//! zero-based index of the offending token so a mangled file can be
//! located by counting numbers, not lines.

use std::str::SplitWhitespace;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::problem::{Constraint, Problem};

/// Largest count a header may declare; larger values are treated as a
/// corrupt file rather than an allocation request.
const MAX_COUNT: usize = 1 << 20;

/// Parses every problem in an OR-Library instance file.
///
/// Each parsed problem is validated before it is returned, so a file
/// with, say, a negative profit fails here instead of misbehaving inside
/// the solver.
pub fn parse(input: &str) -> Result<Vec<Problem>> {
    let started = Instant::now();
    let mut tokens = Tokens::new(input);

    let problem_count = tokens.next_count("the problem count")?;
    let mut problems = Vec::with_capacity(problem_count.min(64));
    for _ in 0..problem_count {
        problems.push(parse_problem(&mut tokens)?);
    }

    log::debug!(
        "parsed {} problems in {:?}",
        problems.len(),
        started.elapsed()
    );
    Ok(problems)
}

fn parse_problem(tokens: &mut Tokens<'_>) -> Result<Problem> {
    let item_count = tokens.next_count("the item count")?;
    let constraint_count = tokens.next_count("the constraint count")?;
    let optimal = tokens.next_f64("the optimal value")?;

    let mut profits = Vec::new();
    for _ in 0..item_count {
        profits.push(tokens.next_f64("an item profit")?);
    }

    // Weights come as one full row per constraint, then all bag limits.
    let mut weight_rows = Vec::new();
    for _ in 0..constraint_count {
        let mut weights = Vec::new();
        for _ in 0..item_count {
            weights.push(tokens.next_f64("a constraint weight")?);
        }
        weight_rows.push(weights);
    }
    let mut constraints = Vec::new();
    for weights in weight_rows {
        let bag_limit = tokens.next_f64("a bag limit")?;
        constraints.push(Constraint::new(weights, bag_limit));
    }

    let problem = Problem::new(profits, constraints).with_optimal(optimal);
    problem.validate()?;
    Ok(problem)
}

/// Whitespace-token cursor that tracks the index of the token it is
/// about to hand out.
struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            iter: input.split_whitespace(),
            position: 0,
        }
    }

    fn next_token(&mut self, expected: &'static str) -> Result<(usize, &'a str)> {
        let lexeme = self.iter.next().ok_or(Error::ParseEof { expected })?;
        let position = self.position;
        self.position += 1;
        Ok((position, lexeme))
    }

    fn next_f64(&mut self, expected: &'static str) -> Result<f64> {
        let (position, lexeme) = self.next_token(expected)?;
        lexeme.parse().map_err(|_| Error::ParseToken {
            position,
            lexeme: lexeme.to_string(),
        })
    }

    fn next_count(&mut self, expected: &'static str) -> Result<usize> {
        let (position, lexeme) = self.next_token(expected)?;
        lexeme
            .parse::<usize>()
            .ok()
            .filter(|&count| count <= MAX_COUNT)
            .ok_or_else(|| Error::ParseCount {
                position,
                lexeme: lexeme.to_string(),
            })
    }
}
