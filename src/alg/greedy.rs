use std::time::Instant;

use num_traits::Float;
use rand::Rng;
use tracing::debug;

use crate::alg::core::*;
use crate::error::Result;
use crate::matrix::EtcMatrix;
use crate::monitor::Monitor;

/// Row-sequential Min-Min heuristic.
///
/// Tasks are committed strictly in their original order: task `j` goes to the resource with the
/// smallest entry in its (already loaded) row and that entry is then added to the same column of
/// all later rows, modelling the load the resource has accumulated.
///
/// Note that this differs from the textbook Min-Min which, in every round, picks the globally
/// smallest completion time among all unassigned task-resource pairs. The textbook variant is
/// available as [Strategy::MIN_MIN_TASK](crate::alg::reduce::Strategy::MIN_MIN_TASK).
///
/// The reported `value` is `max_j m[(j, z[j])]` taken from the original matrix, i.e. the longest
/// single task, not the makespan of the schedule.
///
/// Runs in `O(n^2 * R)` time where `n` is the number of tasks and `R` the number of resources.
///
/// ## Example
/// ```
/// # extern crate taskmatch;
/// use taskmatch::EtcMatrix;
/// use taskmatch::alg::greedy::min_min;
///
/// let m = EtcMatrix::<f64>::from_rows([[2., 9.], [6., 1.]]).expect("valid matrix");
/// let (solution, _) = min_min(&m);
///
/// assert_eq!(solution.schedule, vec![0, 1]);
/// assert_eq!(solution.value, 2.);
/// ```
pub fn min_min<T: Float>(matrix: &EtcMatrix<T>) -> (Solution<T>, Stats<T>) {
    let start = Instant::now();

    let n = matrix.num_tasks();
    let r = matrix.num_resources();

    let mut work = matrix.working_copy();
    let mut schedule = vec![0usize; n];

    for j in 0..n {
        if let Some((i, c)) = minimize(&work[j * r..(j + 1) * r]) {
            schedule[j] = i;
            // fold resource load into all rows that are still to be assigned
            for k in (j + 1)..n {
                work[k * r + i] = work[k * r + i] + c;
            }
        }
    }

    let value = schedule
        .iter()
        .enumerate()
        .map(|(j, &i)| matrix[(j, i)])
        .fold(T::zero(), T::max);

    let mut stats = Stats::new(value, r, n, start.elapsed());
    stats.iterations = n as u64;

    debug!(
        num_tasks = n,
        num_resources = r,
        value = as_f64(value),
        elapsed = ?stats.elapsed,
        "min-min finished"
    );

    (
        Solution {
            schedule,
            value,
            num_resources: r,
        },
        stats,
    )
}

/// Max-Min heuristic.
///
/// In every round the minimum of each remaining row is computed and the row whose minimum is the
/// **largest** is committed to that minimum's resource (ties go to the lowest task index). The
/// committed value is then added to the same column of all remaining rows.
///
/// The reported `value` is the largest committed (load-adjusted) value over all rounds.
///
/// Row minima are cached between rounds and recomputed only for rows whose minimum sits in the
/// column that was just loaded; other entries never decrease, so the cached minimum stays valid.
///
/// ## Example
/// ```
/// # extern crate taskmatch;
/// use taskmatch::EtcMatrix;
/// use taskmatch::alg::greedy::max_min;
///
/// let m = EtcMatrix::<f64>::from_rows([[2., 9.], [6., 1.]]).expect("valid matrix");
/// let (solution, _) = max_min(&m);
///
/// assert_eq!(solution.schedule, vec![0, 1]);
/// assert_eq!(solution.value, 2.);
/// ```
pub fn max_min<T: Float>(matrix: &EtcMatrix<T>) -> (Solution<T>, Stats<T>) {
    let start = Instant::now();

    let n = matrix.num_tasks();
    let r = matrix.num_resources();

    let mut work = matrix.working_copy();
    let mut schedule = vec![0usize; n];
    let mut value = T::zero();

    // `minima[j] = (argmin, min)` of the current (loaded) row `j`
    let mut minima = (0..n)
        .map(|j| minimize(&work[j * r..(j + 1) * r]).unwrap_or((0, T::zero())))
        .collect::<Vec<_>>();

    // unassigned tasks in increasing order
    let mut remaining = (0..n).collect::<Vec<_>>();

    while !remaining.is_empty() {
        let candidates = remaining.iter().map(|&j| minima[j].1).collect::<Vec<_>>();

        let (pos, c) = match maximize(&candidates) {
            Some(max) => max,
            None => break,
        };

        let j = remaining.remove(pos);
        let i = minima[j].0;

        schedule[j] = i;
        value = value.max(c);

        for &k in remaining.iter() {
            work[k * r + i] = work[k * r + i] + c;
            if minima[k].0 == i {
                minima[k] = minimize(&work[k * r..(k + 1) * r]).unwrap_or(minima[k]);
            }
        }
    }

    let mut stats = Stats::new(value, r, n, start.elapsed());
    stats.iterations = n as u64;

    debug!(
        num_tasks = n,
        num_resources = r,
        value = as_f64(value),
        elapsed = ?stats.elapsed,
        "max-min finished"
    );

    (
        Solution {
            schedule,
            value,
            num_resources: r,
        },
        stats,
    )
}

/// [min_min] as a [Solve] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMin;

impl<T: Float> Solve<T> for MinMin {
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
        Ok(min_min(matrix))
    }
}

/// [max_min] as a [Solve] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxMin;

impl<T: Float> Solve<T> for MaxMin {
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
        Ok(max_min(matrix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn etc(rows: Vec<Vec<f64>>) -> EtcMatrix<f64> {
        EtcMatrix::new(rows).expect("valid matrix")
    }

    #[rstest]
    #[case::single(vec![vec![7.]], vec![0], 7.)]
    #[case::two_by_two(vec![vec![2., 9.], vec![6., 1.]], vec![0, 1], 2.)]
    #[case::loaded(vec![vec![4., 2., 6.], vec![3., 5., 1.], vec![2., 3., 4.]], vec![1, 2, 0], 2.)]
    #[case::longest_task(vec![vec![1., 5.], vec![4., 6.], vec![3., 2.]], vec![0, 0, 1], 4.)]
    #[case::row_order(vec![vec![1., 2.], vec![2., 9.]], vec![0, 0], 2.)]
    #[case::ties(vec![vec![3., 3., 3.], vec![3., 3., 3.]], vec![0, 1], 3.)]
    fn min_min_feasible(
        #[case] rows: Vec<Vec<f64>>,
        #[case] schedule: Vec<usize>,
        #[case] value: f64,
    ) {
        let n = rows.len();
        let (solution, stats) = min_min(&etc(rows));
        assert_eq!(solution.schedule, schedule);
        assert_eq!(solution.value, value);
        assert_eq!(stats.value, value);
        assert_eq!(stats.num_tasks, n);
    }

    #[rstest]
    #[case::single(vec![vec![7.]], vec![0], 7.)]
    #[case::two_by_two(vec![vec![2., 9.], vec![6., 1.]], vec![0, 1], 2.)]
    #[case::loaded(vec![vec![4., 2., 6.], vec![3., 5., 1.], vec![2., 3., 4.]], vec![1, 2, 0], 2.)]
    #[case::recomputed_minimum(vec![vec![1., 5.], vec![4., 6.], vec![3., 2.]], vec![0, 0, 1], 5.)]
    #[case::largest_first(vec![vec![1., 2.], vec![2., 9.]], vec![1, 0], 2.)]
    #[case::ties(vec![vec![3., 3., 3.], vec![3., 3., 3.]], vec![0, 1], 3.)]
    fn max_min_feasible(
        #[case] rows: Vec<Vec<f64>>,
        #[case] schedule: Vec<usize>,
        #[case] value: f64,
    ) {
        let n = rows.len();
        let (solution, stats) = max_min(&etc(rows));
        assert_eq!(solution.schedule, schedule);
        assert_eq!(solution.value, value);
        assert_eq!(stats.value, value);
        assert_eq!(stats.num_tasks, n);
    }

    #[test]
    fn input_matrix_is_untouched() {
        let m = etc(vec![vec![2., 9.], vec![6., 1.], vec![4., 4.]]);
        let copy = m.clone();
        let _ = min_min(&m);
        let _ = max_min(&m);
        assert_eq!(m, copy);
    }
}
