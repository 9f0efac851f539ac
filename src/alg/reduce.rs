//! # Generalized extremum reduction
//! A family of greedy list-scheduling heuristics parameterized by a [Strategy]:
//!  1. take an extremum along every remaining row (`TASK`) or every column (`RESOURCE`)
//!  1. select one of these candidates by another extremum
//!  1. commit the candidate's task to its resource, drop the task's row and add the committed
//!     value to the resource's column in all remaining rows
//!
//! This repeats until every task is committed. E.g. `MIN-MIN-TASK` is the textbook Min-Min and
//! `MIN-MAX-TASK` is Max-Min (equivalent to [max_min](crate::alg::greedy::max_min)).
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use num_traits::Float;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alg::core::*;
use crate::error::{Error, Result};
use crate::matrix::EtcMatrix;
use crate::monitor::Monitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    /// Position and value of this extremum over `xs`, ties resolved to the lowest index.
    fn find<T: Float>(self, xs: &[T]) -> Option<(usize, T)> {
        match self {
            Self::Min => minimize(xs),
            Self::Max => maximize(xs),
        }
    }
}

/// Whether extrema are taken along rows (tasks) or columns (resources).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Task,
    Resource,
}

/// Reduction strategy written as `<per_line>-<across_lines>-<orientation>`, e.g. `MIN-MAX-TASK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strategy {
    /// extremum taken along each row or column
    pub per_line: Extremum,
    /// extremum used to select one of the per-line candidates
    pub across_lines: Extremum,
    pub orientation: Orientation,
}

impl Strategy {
    /// Textbook Min-Min.
    pub const MIN_MIN_TASK: Strategy =
        Strategy::new(Extremum::Min, Extremum::Min, Orientation::Task);

    /// Max-Min.
    pub const MIN_MAX_TASK: Strategy =
        Strategy::new(Extremum::Min, Extremum::Max, Orientation::Task);

    pub const fn new(per_line: Extremum, across_lines: Extremum, orientation: Orientation) -> Self {
        Self {
            per_line,
            across_lines,
            orientation,
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    /// Parse e.g. `MIN-MAX-TASK` or `max-min-resource`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidStrategy(s.to_string());

        let extremum = |token: &str| match token.to_ascii_uppercase().as_str() {
            "MIN" => Some(Extremum::Min),
            "MAX" => Some(Extremum::Max),
            _ => None,
        };

        let mut tokens = s.trim().split('-');
        let per_line = tokens.next().and_then(extremum).ok_or_else(invalid)?;
        let across_lines = tokens.next().and_then(extremum).ok_or_else(invalid)?;
        let orientation = match tokens.next().map(str::to_ascii_uppercase).as_deref() {
            Some("TASK") => Orientation::Task,
            Some("RESOURCE") => Orientation::Resource,
            _ => return Err(invalid()),
        };

        if tokens.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(per_line, across_lines, orientation))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extremum = |e: Extremum| match e {
            Extremum::Min => "MIN",
            Extremum::Max => "MAX",
        };
        let orientation = match self.orientation {
            Orientation::Task => "TASK",
            Orientation::Resource => "RESOURCE",
        };
        write!(
            f,
            "{}-{}-{}",
            extremum(self.per_line),
            extremum(self.across_lines),
            orientation
        )
    }
}

/// Sequence of committed `(task, resource, value)` triples in commit order.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction<T> {
    pub pairs: Vec<IndexValuePair<T>>,
    pub num_resources: usize,
}

impl<T: Float> Reduction<T> {
    /// Committed (load-adjusted) values in commit order.
    pub fn time_costs(&self) -> Vec<T> {
        self.pairs.iter().map(|p| p.value).collect()
    }

    /// Largest committed value.
    pub fn value(&self) -> T {
        self.pairs.iter().map(|p| p.value).fold(T::zero(), T::max)
    }

    /// Assignment `schedule[task] = resource` with [value](Reduction::value) as its cost.
    pub fn to_solution(&self) -> Solution<T> {
        let mut schedule = vec![0; self.pairs.len()];
        for p in self.pairs.iter() {
            schedule[p.row] = p.col;
        }
        Solution {
            schedule,
            value: self.value(),
            num_resources: self.num_resources,
        }
    }
}

/// Run the reduction described by `strategy` on a private copy of `matrix`.
///
/// ## Example
/// ```
/// # extern crate taskmatch;
/// use taskmatch::EtcMatrix;
/// use taskmatch::alg::reduce::{reduce, Strategy};
///
/// let m = EtcMatrix::<f64>::from_rows([[2., 9.], [6., 1.]]).expect("valid matrix");
/// let strategy: Strategy = "MIN-MIN-TASK".parse().expect("valid strategy");
/// let reduction = reduce(&m, strategy);
///
/// // task 1 goes first (smallest minimum), then task 0
/// assert_eq!(reduction.time_costs(), vec![1., 2.]);
/// assert_eq!(reduction.to_solution().schedule, vec![0, 1]);
/// ```
pub fn reduce<T: Float>(matrix: &EtcMatrix<T>, strategy: Strategy) -> Reduction<T> {
    let n = matrix.num_tasks();
    let r = matrix.num_resources();

    let mut work = matrix.working_copy();
    let mut remaining = (0..n).collect::<Vec<_>>();
    let mut pairs = Vec::with_capacity(n);

    while !remaining.is_empty() {
        let candidates = match strategy.orientation {
            Orientation::Task => remaining
                .iter()
                .filter_map(|&j| {
                    let (col, value) = strategy.per_line.find(&work[j * r..(j + 1) * r])?;
                    Some(IndexValuePair { row: j, col, value })
                })
                .collect::<Vec<_>>(),
            Orientation::Resource => (0..r)
                .filter_map(|i| {
                    let column = remaining
                        .iter()
                        .map(|&j| work[j * r + i])
                        .collect::<Vec<_>>();
                    let (pos, value) = strategy.per_line.find(&column)?;
                    Some(IndexValuePair {
                        row: remaining[pos],
                        col: i,
                        value,
                    })
                })
                .collect::<Vec<_>>(),
        };

        let values = candidates.iter().map(|p| p.value).collect::<Vec<_>>();
        let pair = match strategy.across_lines.find(&values) {
            Some((k, _)) => candidates[k],
            None => break,
        };

        remaining.retain(|&j| j != pair.row);
        for &k in remaining.iter() {
            work[k * r + pair.col] = work[k * r + pair.col] + pair.value;
        }

        pairs.push(pair);
    }

    Reduction {
        pairs,
        num_resources: r,
    }
}

/// [reduce] as a [Solve] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralizedReducer {
    pub strategy: Strategy,
}

impl GeneralizedReducer {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }
}

impl<T: Float> Solve<T> for GeneralizedReducer {
    fn solve<R, M>(
        &self,
        matrix: &EtcMatrix<T>,
        _rng: &mut R,
        _monitor: &mut M,
    ) -> Result<(Solution<T>, Stats<T>)>
    where
        R: Rng + ?Sized,
        M: Monitor + ?Sized,
    {
        let start = Instant::now();

        let solution = reduce(matrix, self.strategy).to_solution();

        let mut stats = Stats::new(
            solution.value,
            matrix.num_resources(),
            matrix.num_tasks(),
            start.elapsed(),
        );
        stats.iterations = matrix.num_tasks() as u64;

        debug!(
            strategy = %self.strategy,
            value = as_f64(solution.value),
            elapsed = ?stats.elapsed,
            "reduction finished"
        );

        Ok((solution, stats))
    }
}
