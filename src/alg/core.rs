use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;

use num_traits::Float;
use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::EtcMatrix;
use crate::monitor::Monitor;

/// Data structure holding resulting `schedule` and objective `value`.
///
/// The schedule is represented as a vector of resources which is indexed by tasks. Additionally,
/// this structure records the value of the schedule and original number of resources.
///
/// Note that the meaning of `value` depends on the solver that produced it, see
/// [Algorithm](crate::Algorithm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution<T> {
    /// assignment: task j -> resource i (i.e. `schedule[j] = i`)
    pub schedule: Vec<usize>,
    /// cost of the schedule as reported by the solver
    pub value: T,
    /// number of resources
    pub num_resources: usize,
}

impl<T> Solution<T> {
    /// Generate schedule in the form of a Gantt chart, i.e. as mapping: `resource -> [tasks]`.
    ///
    /// # Example
    /// ```
    /// # extern crate taskmatch;
    /// let solution = taskmatch::Solution {
    ///     schedule: vec![0, 1, 0, 2], value: 2., num_resources: 3,
    /// };
    /// let gantt = solution.gantt_schedule();
    /// assert_eq!(gantt[&0], vec![0, 2]);
    /// assert_eq!(gantt[&1], vec![1]);
    /// assert_eq!(gantt[&2], vec![3]);
    /// ```
    pub fn gantt_schedule(&self) -> HashMap<usize, Vec<usize>> {
        let mut gantt: HashMap<usize, Vec<usize>> = HashMap::with_capacity(self.num_resources);

        for (task, resource) in self.schedule.iter().enumerate() {
            match gantt.entry(*resource) {
                Entry::Occupied(mut e) => e.get_mut().push(task),
                Entry::Vacant(e) => {
                    e.insert(vec![task]);
                }
            }
        }

        gantt
    }

    /// Compute distribution of tasks to resources, i.e. `loads[resource] = #tasks`
    ///
    /// # Example
    /// ```
    /// # extern crate taskmatch;
    /// let solution = taskmatch::Solution {
    ///     schedule: vec![0, 1, 0, 2], value: 2., num_resources: 3,
    /// };
    /// assert_eq!(solution.task_loads(), vec![2, 1, 1]);
    /// ```
    pub fn task_loads(&self) -> Vec<u32> {
        let mut task_dist = vec![0u32; self.num_resources];
        for resource in self.schedule.iter() {
            task_dist[*resource] += 1;
        }
        task_dist
    }
}

impl<T: Float> Solution<T> {
    /// Completion time of each resource under this schedule: `c[i] = sum_{z[j] = i} m[(j, i)]`.
    ///
    /// The makespan is the maximum of these regardless of how the solver defines `value`.
    ///
    /// # Panics
    /// If the schedule does not fit the matrix.
    pub fn completion_times(&self, matrix: &EtcMatrix<T>) -> Vec<T> {
        let mut c = vec![T::zero(); matrix.num_resources()];
        for (j, &i) in self.schedule.iter().enumerate() {
            c[i] = c[i] + matrix[(j, i)];
        }
        c
    }
}

/// Data structure that contains various statistics collected during the search.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats<T> {
    /// cost of the returned solution
    pub value: T,
    /// number of resources
    pub num_resources: usize,
    /// number of tasks
    pub num_tasks: usize,
    /// elapsed time since solving started
    pub elapsed: Duration,
    /// no. main loop iterations (reduction rounds, annealing steps or swarm iterations)
    pub iterations: u64,
    /// no. candidate moves accepted as the current solution (simulated annealing)
    pub accepted: u64,
    /// no. times the best known solution improved
    pub improvements: u64,
    /// true iff a [Monitor] terminated the search early
    pub interrupted: bool,
}

impl<T> Stats<T> {
    /// Create new stats with all counters set to 0.
    pub fn new(value: T, num_resources: usize, num_tasks: usize, elapsed: Duration) -> Self {
        Self {
            value,
            num_resources,
            num_tasks,
            elapsed,
            iterations: 0,
            accepted: 0,
            improvements: 0,
            interrupted: false,
        }
    }
}

/// Common interface of all solvers.
///
/// Deterministic solvers ignore both the random generator and the monitor.
pub trait Solve<T: Float> {
    fn solve<R, M>(
        &self,
        matrix: &EtcMatrix<T>,
        rng: &mut R,
        monitor: &mut M,
    ) -> Result<(Solution<T>, Stats<T>)>
    where
        R: Rng + ?Sized,
        M: Monitor + ?Sized;
}

/// Location and value of an extremum found during a matrix reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexValuePair<T> {
    /// task (row) of the original matrix
    pub row: usize,
    /// resource (column)
    pub col: usize,
    pub value: T,
}

/// Find `(argmin_x x, min_x x)` over `xs` or `None` if `xs` is empty.
/// If the minimum is not strict, item with the lowest index is returned. NaN ranks above every
/// other value.
#[inline]
pub(crate) fn minimize<T: Float>(xs: &[T]) -> Option<(usize, T)> {
    extremum(xs, |x, best| x < best)
}

/// Find `(argmax_x x, max_x x)` over `xs` or `None` if `xs` is empty.
/// If the maximum is not strict, item with the lowest index is returned. NaN ranks above every
/// other value.
#[inline]
pub(crate) fn maximize<T: Float>(xs: &[T]) -> Option<(usize, T)> {
    extremum(xs, |x, best| x > best)
}

#[inline]
fn extremum<T, F>(xs: &[T], better: F) -> Option<(usize, T)>
where
    T: Float,
    F: Fn(OrderedFloat<T>, OrderedFloat<T>) -> bool,
{
    let (&first, rest) = xs.split_first()?;

    let mut arg = 0;
    let mut best = OrderedFloat(first);

    for (i, &x) in rest.iter().enumerate() {
        let x = OrderedFloat(x);
        if better(x, best) {
            arg = i + 1;
            best = x;
        }
    }

    Some((arg, best.into_inner()))
}

/// Lossy view of a cost value for logging.
#[inline]
pub(crate) fn as_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(&[], None)]
    #[case(&[3.], Some((0, 3.)))]
    #[case(&[3., 1., 2., 1.], Some((1, 1.)))]
    #[case(&[2., 2., 2.], Some((0, 2.)))]
    fn minimize_first(#[case] xs: &[f64], #[case] expected: Option<(usize, f64)>) {
        assert_eq!(minimize(xs), expected);
    }

    #[rstest]
    #[case(&[], None)]
    #[case(&[3.], Some((0, 3.)))]
    #[case(&[1., 4., 2., 4.], Some((1, 4.)))]
    #[case(&[2., 2., 2.], Some((0, 2.)))]
    fn maximize_first(#[case] xs: &[f64], #[case] expected: Option<(usize, f64)>) {
        assert_eq!(maximize(xs), expected);
    }

    #[rstest]
    #[case::leading(&[f64::NAN, 2., 1.], 2, 0)]
    #[case::inner(&[3., f64::NAN, 1., 5.], 2, 1)]
    #[case::trailing(&[3., 1., f64::NAN], 1, 2)]
    fn nan_ranks_highest(#[case] xs: &[f64], #[case] argmin: usize, #[case] argmax: usize) {
        assert_eq!(minimize(xs).map(|(i, _)| i), Some(argmin));
        assert_eq!(maximize(xs).map(|(i, _)| i), Some(argmax));
        assert!(maximize(xs).map_or(false, |(_, x)| x.is_nan()));
    }

    #[test]
    fn completion_times() {
        let m = EtcMatrix::<f64>::from_rows([[2., 9.], [6., 1.], [3., 3.]]).expect("valid matrix");
        let solution = Solution {
            schedule: vec![0, 1, 0],
            value: 5.,
            num_resources: 2,
        };
        assert_eq!(solution.completion_times(&m), vec![5., 1.]);
    }
}
