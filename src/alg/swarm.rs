use std::time::Instant;

use num_traits::Float;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::alg::core::*;
use crate::alg::stochastic::uniform_vec;
use crate::cost::{evaluate_continuous, remap_index};
use crate::error::{Error, Result};
use crate::matrix::EtcMatrix;
use crate::monitor::{Monitor, SearchCommand};

/// Continuous search space of the swarm.
///
/// Every one of the `num_vars` coordinates ranges over the same domain `[var_min, var_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// number of tasks
    pub num_vars: usize,
    pub var_min: i64,
    pub var_max: i64,
}

impl Problem {
    /// One coordinate per task, each ranging over resource indices `[0, R)`.
    pub fn for_matrix<T>(matrix: &EtcMatrix<T>) -> Self {
        Self {
            num_vars: matrix.num_tasks(),
            var_min: 0,
            var_max: matrix.num_resources() as i64,
        }
    }

    fn validate<T>(&self, matrix: &EtcMatrix<T>) -> Result<()> {
        if self.num_vars != matrix.num_tasks() {
            return Err(Error::DimensionMismatch {
                tasks: matrix.num_tasks(),
                resources: matrix.num_resources(),
                reason: "particle dimension must equal the number of tasks",
            });
        }
        if self.var_max <= self.var_min {
            return Err(Error::invalid_parameter(
                "var_max",
                format!("empty domain [{}, {})", self.var_min, self.var_max),
            ));
        }
        if self.var_max <= 0 {
            return Err(Error::invalid_parameter(
                "var_max",
                format!("velocity range [-{0}, {0}) is empty", self.var_max),
            ));
        }
        Ok(())
    }
}

/// Parameters of the [particle swarm](ParticleSwarm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmParams {
    pub max_iterations: usize,
    pub population_size: usize,
    /// personal acceleration coefficient
    pub c1: f64,
    /// social acceleration coefficient
    pub c2: f64,
    /// inertia weight
    pub w: f64,
    /// inertia damping applied after every iteration
    pub w_damp: f64,
}

impl Default for SwarmParams {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            population_size: 50,
            c1: 1.796180,
            c2: 1.796180,
            w: 0.729844,
            w_damp: 0.995,
        }
    }
}

impl SwarmParams {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::invalid_parameter(
                "population_size",
                "the swarm needs at least one particle",
            ));
        }
        for (name, value) in [
            ("c1", self.c1),
            ("c2", self.c2),
            ("w", self.w),
            ("w_damp", self.w_damp),
        ] {
            if !value.is_finite() {
                return Err(Error::invalid_parameter(
                    name,
                    format!("must be finite, got {}", value),
                ));
            }
        }
        if self.max_iterations == 0 {
            warn!("max_iterations is 0, the swarm is only initialized");
        }
        if self.w_damp > 1. {
            warn!(w_damp = self.w_damp, "inertia weight grows every iteration");
        }
        Ok(())
    }
}

/// A point of the search space together with its cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position<T> {
    pub position: Vec<f64>,
    pub cost: T,
}

impl<T> Position<T> {
    /// Resource assignment this position maps to in a matrix with `num_resources` columns.
    pub fn schedule(&self, num_resources: usize) -> Vec<usize> {
        self.position
            .iter()
            .map(|&x| remap_index(x as i64, num_resources))
            .collect()
    }
}

/// Single member of the swarm. Every particle owns its vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle<T> {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub best_position: Vec<f64>,
    pub cost: T,
    pub best_cost: T,
}

/// Result of a [pso] run.
#[derive(Debug, Clone)]
pub struct SwarmOutcome<T> {
    /// best position found by any particle
    pub best: Position<T>,
    /// final state of all particles
    pub population: Vec<Particle<T>>,
    /// global best cost after each completed iteration (non-increasing)
    pub history: Vec<T>,
    pub stats: Stats<T>,
}

impl<T: Copy> SwarmOutcome<T> {
    pub fn to_solution(&self) -> Solution<T> {
        Solution {
            schedule: self.best.schedule(self.stats.num_resources),
            value: self.best.cost,
            num_resources: self.stats.num_resources,
        }
    }
}

/// Particle Swarm Optimization over continuous positions that truncate to resource indices.
///
/// Each particle starts at a position uniform in `[var_min, var_max)` with velocity uniform in
/// `[-var_max, var_max)`. In every iteration each particle moves by
///
/// ```text
/// v <- w * v + c1 * r1 * (p_best - x) + c2 * r2 * (g_best - x)
/// x <- clamp(x + v, var_min, var_max - 1)
/// ```
///
/// where `r1` and `r2` are fresh uniform vectors in `[0, 1)` (drawn per coordinate) and the
/// position is scored by [evaluate_continuous] on its integer truncation. After a full sweep the
/// inertia decays `w <- w * w_damp`. The search runs for exactly `max_iterations` sweeps unless
/// the monitor terminates it earlier.
///
/// ## Example
/// ```
/// # extern crate taskmatch;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use taskmatch::EtcMatrix;
/// use taskmatch::alg::swarm::{pso, Problem, SwarmParams};
/// use taskmatch::monitor::Unbounded;
///
/// let m = EtcMatrix::<f64>::from_rows([[1., 8.], [8., 1.]]).expect("valid matrix");
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let problem = Problem::for_matrix(&m);
/// let params = SwarmParams::default();
///
/// let outcome = pso(&problem, &m, &params, &mut rng, &mut Unbounded).expect("valid parameters");
///
/// assert_eq!(outcome.history.len(), 500);
/// assert_eq!(outcome.best.cost, 1.);
/// assert_eq!(outcome.to_solution().schedule, vec![0, 1]);
/// ```
pub fn pso<T, R, M>(
    problem: &Problem,
    matrix: &EtcMatrix<T>,
    params: &SwarmParams,
    rng: &mut R,
    monitor: &mut M,
) -> Result<SwarmOutcome<T>>
where
    T: Float,
    R: Rng + ?Sized,
    M: Monitor + ?Sized,
{
    let start = Instant::now();

    problem.validate(matrix)?;
    params.validate()?;

    let n = problem.num_vars;
    let var_min = problem.var_min as f64;
    let var_max = problem.var_max as f64;
    let upper = (problem.var_max - 1) as f64;

    let score = |position: &[f64]| {
        let truncated = position.iter().map(|&x| x as i64).collect::<Vec<_>>();
        evaluate_continuous(matrix, &truncated)
    };

    let mut best = Position {
        position: Vec::new(),
        cost: T::infinity(),
    };

    let mut population = Vec::with_capacity(params.population_size);

    for _ in 0..params.population_size {
        let position = uniform_vec(var_min, var_max, n, rng);
        let velocity = uniform_vec(-var_max, var_max, n, rng);
        let cost = score(&position);

        let particle = Particle {
            best_position: position.clone(),
            position,
            velocity,
            cost,
            best_cost: cost,
        };

        // the first particle seeds the global best even if its cost overflowed to infinity
        if population.is_empty() || particle.best_cost < best.cost {
            best.position.clone_from(&particle.best_position);
            best.cost = particle.best_cost;
        }

        population.push(particle);
    }

    debug!(
        num_vars = n,
        population_size = params.population_size,
        value = as_f64(best.cost),
        "swarm initialized"
    );

    let mut stats = Stats::new(
        best.cost,
        matrix.num_resources(),
        matrix.num_tasks(),
        start.elapsed(),
    );
    let mut history = Vec::with_capacity(params.max_iterations);
    let mut w = params.w;

    for iteration in 0..params.max_iterations {
        monitor.on_step();
        if let SearchCommand::Terminate(reason) = monitor.search_command() {
            info!(%reason, iteration, "particle swarm interrupted");
            stats.interrupted = true;
            break;
        }

        for particle in population.iter_mut() {
            let r1 = uniform_vec(0., 1., n, rng);
            let r2 = uniform_vec(0., 1., n, rng);

            for k in 0..n {
                let x = particle.position[k];
                particle.velocity[k] = w * particle.velocity[k]
                    + params.c1 * r1[k] * (particle.best_position[k] - x)
                    + params.c2 * r2[k] * (best.position[k] - x);
                particle.position[k] = (x + particle.velocity[k]).max(var_min).min(upper);
            }

            particle.cost = score(&particle.position);

            if particle.cost < particle.best_cost {
                particle.best_position.clone_from(&particle.position);
                particle.best_cost = particle.cost;

                if particle.best_cost < best.cost {
                    trace!(
                        iteration,
                        value = as_f64(particle.best_cost),
                        "particle swarm improved"
                    );
                    best.position.clone_from(&particle.best_position);
                    best.cost = particle.best_cost;
                    stats.improvements += 1;
                }
            }
        }

        w *= params.w_damp;
        history.push(best.cost);
        stats.iterations += 1;
    }

    stats.value = best.cost;
    stats.elapsed = start.elapsed();

    debug!(
        num_vars = n,
        value = as_f64(best.cost),
        iterations = stats.iterations,
        improvements = stats.improvements,
        elapsed = ?stats.elapsed,
        "particle swarm finished"
    );

    Ok(SwarmOutcome {
        best,
        population,
        history,
        stats,
    })
}

/// [pso] over the natural search space of the matrix (see [Problem::for_matrix]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleSwarm {
    pub params: SwarmParams,
}

impl ParticleSwarm {
    pub fn new(params: SwarmParams) -> Self {
        Self { params }
    }
}

impl<T: Float> Solve<T> for ParticleSwarm {
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
        let problem = Problem::for_matrix(matrix);
        let outcome = pso(&problem, matrix, &self.params, rng, monitor)?;
        Ok((outcome.to_solution(), outcome.stats))
    }
}
