//! # Synthetic ETC matrices
//! Random instances following the *range-based* generation method: every task gets a base running
//! time drawn from `[1, task_bound)` which is then scaled per resource by a factor drawn from
//! `[1, resource_bound)`. The bounds are controlled by task and resource [Heterogeneity].
//!
//! | heterogeneity | task bound | resource bound |
//! |---------------|------------|----------------|
//! | low           | 100        | 10             |
//! | high          | 3000       | 1000           |
use std::str::FromStr;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, MatrixDefect, Result};
use crate::matrix::EtcMatrix;

/// Degree of variation of task running times (rows) or resource speeds (columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heterogeneity {
    Low,
    High,
}

impl Heterogeneity {
    /// Upper bound of a task's base running time.
    pub fn task_bound(self) -> f64 {
        match self {
            Self::Low => 100.,
            Self::High => 3000.,
        }
    }

    /// Upper bound of a per-resource scaling factor.
    pub fn resource_bound(self) -> f64 {
        match self {
            Self::Low => 10.,
            Self::High => 1000.,
        }
    }
}

impl FromStr for Heterogeneity {
    type Err = Error;

    /// Accepts `low`/`lo` and `high`/`hi` in any letter case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" | "lo" => Ok(Self::Low),
            "high" | "hi" => Ok(Self::High),
            _ => Err(Error::UnknownHeterogeneity(s.to_string())),
        }
    }
}

/// Generate a `num_tasks x num_resources` ETC matrix.
///
/// Draw sequence per task `j` (all factors independent, uniform in `[1, resource_bound)`):
///  1. base time `b[j]` uniform in `[1, task_bound)` is stored in column `0`
///  1. columns `1..R-1` are set to `b[j]` times a factor, after which the last column is
///     overwritten with `b[j]` times a freshly drawn factor
///  1. once all rows are filled, column `0` of every row is multiplied by one more factor
///
/// With a single resource step 2 writes column `0` itself, so that column ends up with two
/// factors on top of the base time. Every entry lies in `[1, task_bound * resource_bound^2)`.
///
/// ## Example
/// ```
/// # extern crate taskmatch;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use taskmatch::{generator, Heterogeneity};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let m = generator::generate(4, 3, Heterogeneity::Low, Heterogeneity::High, &mut rng)
///     .expect("non-empty dimensions");
///
/// assert_eq!((m.num_tasks(), m.num_resources()), (4, 3));
/// assert!(m.rows().flatten().all(|&x| x >= 1.));
/// ```
pub fn generate<R>(
    num_tasks: usize,
    num_resources: usize,
    task_heterogeneity: Heterogeneity,
    resource_heterogeneity: Heterogeneity,
    rng: &mut R,
) -> Result<EtcMatrix<f64>>
where
    R: Rng + ?Sized,
{
    if num_tasks == 0 {
        return Err(MatrixDefect::NoTasks.into());
    }
    if num_resources == 0 {
        return Err(MatrixDefect::NoResources.into());
    }

    let base_dist = Uniform::new(1., task_heterogeneity.task_bound());
    let factor_dist = Uniform::new(1., resource_heterogeneity.resource_bound());

    let mut rows = vec![vec![0f64; num_resources]; num_tasks];

    for row in rows.iter_mut() {
        row[0] = base_dist.sample(rng);
    }

    let last = num_resources - 1;

    for row in rows.iter_mut() {
        let base = row[0];
        let mut col = 1;
        for i in 0..num_resources {
            if i == last {
                col = last;
            }
            row[col] = base * factor_dist.sample(rng);
            col += 1;
        }
    }

    for row in rows.iter_mut() {
        row[0] *= factor_dist.sample(rng);
    }

    debug!(
        num_tasks,
        num_resources,
        ?task_heterogeneity,
        ?resource_heterogeneity,
        "generated ETC matrix"
    );

    EtcMatrix::new(rows)
}
