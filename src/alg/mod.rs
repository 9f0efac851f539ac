pub mod core;

pub mod anneal;
pub mod greedy;
pub mod reduce;
pub mod stochastic;
pub mod swarm;

pub use self::core::{IndexValuePair, Solution, Solve, Stats};
