use std::time::Instant;

use num_traits::Float;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::alg::core::*;
use crate::alg::stochastic::{Mutate, SwapMutation};
use crate::cost::evaluate_discrete;
use crate::error::{Error, Result};
use crate::matrix::EtcMatrix;
use crate::monitor::{Monitor, SearchCommand};

/// Geometric cooling schedule of [simulated annealing](SimulatedAnnealing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingParams {
    /// starting temperature
    pub initial_temperature: f64,
    /// `t <- t * (1 - cooling_rate)` after every step
    pub cooling_rate: f64,
    /// the search stops once `t <= min_temperature`
    pub min_temperature: f64,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            initial_temperature: 10_000.,
            cooling_rate: 0.003,
            min_temperature: 1.,
        }
    }
}

impl AnnealingParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.cooling_rate > 0. && self.cooling_rate < 1.) {
            return Err(Error::invalid_parameter(
                "cooling_rate",
                format!("must lie in (0, 1), got {}", self.cooling_rate),
            ));
        }
        if !(self.min_temperature > 0.) || !self.min_temperature.is_finite() {
            return Err(Error::invalid_parameter(
                "min_temperature",
                format!("must be positive and finite, got {}", self.min_temperature),
            ));
        }
        if !self.initial_temperature.is_finite() {
            return Err(Error::invalid_parameter(
                "initial_temperature",
                format!("must be finite, got {}", self.initial_temperature),
            ));
        }
        Ok(())
    }

    /// Number of steps until the schedule freezes.
    pub fn num_steps(&self) -> u64 {
        let mut t = self.initial_temperature;
        let mut steps = 0;
        while t > self.min_temperature {
            t *= 1. - self.cooling_rate;
            steps += 1;
        }
        steps
    }
}

/// Simulated annealing over permutations of a square matrix.
///
/// The search starts from the identity assignment (task `j` on resource `j`) and in every step
/// swaps the resources of two distinct random tasks. A candidate replaces the current solution if
/// it is strictly better or, otherwise, with probability `exp((c - c') / t)` where `c` and `c'`
/// are the current and candidate makespans and `t` is the temperature. The best solution seen is
/// tracked independently of the current one and returned at the end.
///
/// Since moves only permute the identity, every returned schedule is a permutation of `0..n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatedAnnealing {
    pub params: AnnealingParams,
}

impl SimulatedAnnealing {
    pub fn new(params: AnnealingParams) -> Self {
        Self { params }
    }
}

impl<T: Float> Solve<T> for SimulatedAnnealing {
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
        anneal(matrix, &self.params, rng, monitor)
    }
}

/// Run [SimulatedAnnealing] with given parameters.
///
/// Fails with [DimensionMismatch](Error::DimensionMismatch) unless the matrix is square.
///
/// ## Example
/// ```
/// # extern crate taskmatch;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use taskmatch::EtcMatrix;
/// use taskmatch::alg::anneal::{anneal, AnnealingParams};
/// use taskmatch::monitor::Unbounded;
///
/// let m = EtcMatrix::<f64>::from_rows([[9., 1.], [1., 9.]]).expect("valid matrix");
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let (solution, _) = anneal(&m, &AnnealingParams::default(), &mut rng, &mut Unbounded)
///     .expect("square matrix");
///
/// assert_eq!(solution.schedule, vec![1, 0]);
/// assert_eq!(solution.value, 1.);
/// ```
pub fn anneal<T, R, M>(
    matrix: &EtcMatrix<T>,
    params: &AnnealingParams,
    rng: &mut R,
    monitor: &mut M,
) -> Result<(Solution<T>, Stats<T>)>
where
    T: Float,
    R: Rng + ?Sized,
    M: Monitor + ?Sized,
{
    let start = Instant::now();

    let n = matrix.num_tasks();
    let r = matrix.num_resources();

    if !matrix.is_square() {
        return Err(Error::DimensionMismatch {
            tasks: n,
            resources: r,
            reason: "simulated annealing requires as many tasks as resources",
        });
    }

    params.validate()?;

    let mut current = (0..n).collect::<Vec<_>>();
    let mut current_cost = evaluate_discrete(matrix, &current);

    let mut best = current.clone();
    let mut best_cost = current_cost;

    let mut stats = Stats::new(best_cost, r, n, start.elapsed());

    // a single task has no neighbours
    let swap = match SwapMutation::new(n) {
        Some(swap) => swap,
        None => {
            debug!(num_tasks = n, "simulated annealing: nothing to permute");
            return Ok((
                Solution {
                    schedule: best,
                    value: best_cost,
                    num_resources: r,
                },
                stats,
            ));
        }
    };

    let mut t = params.initial_temperature;

    while t > params.min_temperature {
        monitor.on_step();
        if let SearchCommand::Terminate(reason) = monitor.search_command() {
            info!(%reason, iterations = stats.iterations, "simulated annealing interrupted");
            stats.interrupted = true;
            break;
        }

        let candidate = swap.copy_mutate(&current, rng);
        let candidate_cost = evaluate_discrete(matrix, &candidate);

        if accept(current_cost, candidate_cost, t, rng) {
            current.clone_from(&candidate);
            current_cost = candidate_cost;
            stats.accepted += 1;
        }

        if candidate_cost < best_cost {
            trace!(
                iteration = stats.iterations,
                temperature = t,
                value = as_f64(candidate_cost),
                "simulated annealing improved"
            );
            best = candidate;
            best_cost = candidate_cost;
            stats.improvements += 1;
        }

        t *= 1. - params.cooling_rate;
        stats.iterations += 1;
    }

    stats.value = best_cost;
    stats.elapsed = start.elapsed();

    debug!(
        num_tasks = n,
        value = as_f64(best_cost),
        iterations = stats.iterations,
        accepted = stats.accepted,
        elapsed = ?stats.elapsed,
        "simulated annealing finished"
    );

    Ok((
        Solution {
            schedule: best,
            value: best_cost,
            num_resources: r,
        },
        stats,
    ))
}

/// Metropolis criterion: always accept strict improvements, otherwise accept with probability
/// `exp((current - candidate) / t)`.
fn accept<T, R>(current: T, candidate: T, t: f64, rng: &mut R) -> bool
where
    T: Float,
    R: Rng + ?Sized,
{
    if candidate < current {
        return true;
    }
    let delta = (current - candidate).to_f64().unwrap_or(f64::NEG_INFINITY);
    (delta / t).exp() > rng.gen::<f64>()
}
