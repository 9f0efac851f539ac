//! # Task matching on heterogeneous resources
//! Solvers for assigning `n` independent tasks to `R` heterogeneous resources described by an
//! *Estimated Time to Compute* ([ETC](EtcMatrix)) matrix, where `m[(j, i)]` is the running time of
//! task `j` on resource `i`. The objective is to minimize the makespan, i.e. the maximum
//! completion time over all resources (see [cost]).
//!
//! # Algorithms
//! | selector              | solver                                       | kind          |
//! |-----------------------|----------------------------------------------|---------------|
//! | `min-min`             | [min_min](alg::greedy::min_min)              | greedy        |
//! | `max-min`             | [max_min](alg::greedy::max_min)              | greedy        |
//! | `simulated-annealing` | [SimulatedAnnealing](alg::anneal)            | stochastic    |
//! | `pso`                 | [ParticleSwarm](alg::swarm)                  | stochastic    |
//! | e.g. `MIN-MAX-TASK`   | [GeneralizedReducer](alg::reduce)            | greedy        |
//!
//! Note that the solvers do not agree on what the reported cost means. The stochastic solvers
//! and the reducer report the makespan of their schedule, while Min-Min reports the longest single
//! task and Max-Min the largest load-adjusted commit. Use [Solution::completion_times] to get the
//! makespan of any schedule.
//!
//! ## Example
//! ```
//! # extern crate taskmatch;
//! use taskmatch::{EtcMatrix, SolverConfig};
//!
//! let m = EtcMatrix::<f64>::from_rows([[2., 9.], [6., 1.]]).expect("valid matrix");
//!
//! let (solution, stats) = taskmatch::solve(&m, "max-min", &SolverConfig::default())
//!     .expect("known algorithm");
//!
//! assert_eq!(solution.schedule, vec![0, 1]);
//! assert_eq!(stats.value, 2.);
//! ```
use std::fmt;
use std::str::FromStr;

use num_traits::Float;
use rand::Rng;

pub mod alg;
pub mod competition;
pub mod config;
pub mod cost;
pub mod error;
pub mod generator;
pub mod matrix;
pub mod monitor;

pub use alg::anneal::{AnnealingParams, SimulatedAnnealing};
pub use alg::greedy::{MaxMin, MinMin};
pub use alg::reduce::{GeneralizedReducer, Strategy};
pub use alg::swarm::{ParticleSwarm, Problem, SwarmParams};
pub use alg::{Solution, Solve, Stats};
pub use config::SolverConfig;
pub use error::{Error, MatrixDefect, Result};
pub use generator::Heterogeneity;
pub use matrix::EtcMatrix;

use monitor::{Monitor, Unbounded};

/// Task matching algorithm selected by name.
///
/// Parsing is case-insensitive and yields default parameters for the stochastic solvers, see
/// [SolverConfig::algorithm] to apply configured ones. Besides the four named heuristics any
/// reduction [Strategy] (e.g. `MIN-MIN-TASK`) is accepted as well.
///
/// ### Examples
/// ```
/// # extern crate taskmatch;
/// use taskmatch::{Algorithm, Strategy};
///
/// assert_eq!("Min-Min".parse::<Algorithm>(), Ok(Algorithm::MinMin));
/// assert_eq!("min-max-task".parse::<Algorithm>(), Ok(Algorithm::Reduce(Strategy::MIN_MAX_TASK)));
/// assert!("round-robin".parse::<Algorithm>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Algorithm {
    MinMin,
    MaxMin,
    Reduce(Strategy),
    SimulatedAnnealing(AnnealingParams),
    ParticleSwarm(SwarmParams),
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min-min" => Ok(Self::MinMin),
            "max-min" => Ok(Self::MaxMin),
            "simulated-annealing" => Ok(Self::SimulatedAnnealing(AnnealingParams::default())),
            "pso" => Ok(Self::ParticleSwarm(SwarmParams::default())),
            other => other
                .parse::<Strategy>()
                .map(Self::Reduce)
                .map_err(|_| Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinMin => f.write_str("min-min"),
            Self::MaxMin => f.write_str("max-min"),
            Self::Reduce(strategy) => write!(f, "{}", strategy),
            Self::SimulatedAnnealing(_) => f.write_str("simulated-annealing"),
            Self::ParticleSwarm(_) => f.write_str("pso"),
        }
    }
}

impl<T: Float> Solve<T> for Algorithm {
    fn solve<R, M>(
        &self,
        matrix: &EtcMatrix<T>,
        rng: &mut R,
        monitor: &mut M,
    ) -> Result<(Solution<T>, Stats<T>)>
    where
        R: Rng + ?Sized,
        M: Monitor + ?Sized,
    {
        match self {
            Self::MinMin => MinMin.solve(matrix, rng, monitor),
            Self::MaxMin => MaxMin.solve(matrix, rng, monitor),
            Self::Reduce(strategy) => {
                GeneralizedReducer::new(*strategy).solve(matrix, rng, monitor)
            }
            Self::SimulatedAnnealing(params) => {
                SimulatedAnnealing::new(*params).solve(matrix, rng, monitor)
            }
            Self::ParticleSwarm(params) => ParticleSwarm::new(*params).solve(matrix, rng, monitor),
        }
    }
}

/// Solve `matrix` with the algorithm named by `selector`: matrix in, `(assignment, cost)` out.
///
/// The run uses a single random generator derived from `config` and is not time limited. Use
/// [Solve] directly with a custom [Monitor] to interrupt long searches.
pub fn solve<T: Float>(
    matrix: &EtcMatrix<T>,
    selector: &str,
    config: &SolverConfig,
) -> Result<(Solution<T>, Stats<T>)> {
    let algorithm = config.algorithm(selector)?;
    let mut rng = config.rng();
    algorithm.solve(matrix, &mut rng, &mut Unbounded)
}
