//! # Solver configuration
//! Tunables of the stochastic solvers and the random seed, loadable from any serde format.
//! Every field has a default so a partial (or empty) document is a valid configuration.
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alg::anneal::AnnealingParams;
use crate::alg::swarm::SwarmParams;
use crate::error::Result;
use crate::Algorithm;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// fixed seed for reproducible runs, fresh entropy if missing
    pub seed: Option<u64>,
    pub annealing: AnnealingParams,
    pub swarm: SwarmParams,
}

impl SolverConfig {
    /// Random generator for a single run.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.annealing.validate()?;
        self.swarm.validate()
    }

    /// Parse an algorithm `selector` and equip it with the parameters of this configuration.
    ///
    /// ## Example
    /// ```
    /// # extern crate taskmatch;
    /// use taskmatch::{Algorithm, SolverConfig};
    ///
    /// let mut config = SolverConfig::default();
    /// config.swarm.population_size = 10;
    ///
    /// match config.algorithm("PSO").expect("known algorithm") {
    ///     Algorithm::ParticleSwarm(params) => assert_eq!(params.population_size, 10),
    ///     other => panic!("unexpected {}", other),
    /// }
    /// ```
    pub fn algorithm(&self, selector: &str) -> Result<Algorithm> {
        let algorithm = match selector.parse::<Algorithm>()? {
            Algorithm::SimulatedAnnealing(_) => Algorithm::SimulatedAnnealing(self.annealing),
            Algorithm::ParticleSwarm(_) => Algorithm::ParticleSwarm(self.swarm),
            other => other,
        };
        debug!(%algorithm, seed = ?self.seed, "algorithm selected");
        Ok(algorithm)
    }
}
