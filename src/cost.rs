//! # Makespan evaluation
//! The cost of an assignment `z` (task `j` runs on resource `z[j]`) is the maximum completion time
//! over all resources, where the completion time of resource `i` is the sum of `m[(j, i)]` over
//! all tasks `j` assigned to it.
//!
//! There are two evaluators with the same definition but different index handling:
//!  - [evaluate_continuous] accepts arbitrary integer positions (as produced by truncating PSO
//!    particles) and folds out-of-range values back via [remap_index]
//!  - [evaluate_discrete] expects valid resource indices and treats anything else as a bug
//!
//! An assignment without any task yields the [no_load] sentinel `-1` which is never a valid cost
//! because ETC entries are non-negative.
use num_traits::Float;

use crate::error::{Error, Result};
use crate::matrix::EtcMatrix;

/// Sentinel cost of an assignment that puts no load on any resource.
#[inline]
pub fn no_load<T: Float>() -> T {
    -T::one()
}

/// `true` iff `cost` is the [no_load] sentinel rather than an actual makespan.
#[inline]
pub fn is_no_load<T: Float>(cost: T) -> bool {
    cost == no_load()
}

/// Map an integer position onto a resource index in `0..num_resources`.
///
/// Values inside the range are kept. Anything else is reduced modulo `num_resources - 1` (with a
/// non-negative remainder), so e.g. with 4 resources `5 -> 2` and `-1 -> 2`. With a single
/// resource everything maps to `0`.
///
/// ## Example
/// ```
/// # extern crate taskmatch;
/// use taskmatch::cost::remap_index;
///
/// assert_eq!(remap_index(3, 4), 3);
/// assert_eq!(remap_index(4, 4), 1);
/// assert_eq!(remap_index(9, 4), 0);
/// assert_eq!(remap_index(-1, 4), 2);
/// ```
pub fn remap_index(value: i64, num_resources: usize) -> usize {
    let r = num_resources as i64;
    if (0..r).contains(&value) {
        value as usize
    } else if r > 1 {
        value.rem_euclid(r - 1) as usize
    } else {
        0
    }
}

/// Makespan of integer positions, remapping out-of-range values with [remap_index].
///
/// # Panics
/// If `positions` is longer than the number of tasks.
pub fn evaluate_continuous<T: Float>(matrix: &EtcMatrix<T>, positions: &[i64]) -> T {
    let r = matrix.num_resources();
    accumulate(matrix, positions.iter().map(|&value| remap_index(value, r)))
}

/// Makespan of an assignment of tasks to resource indices.
///
/// # Panics
/// If `assignment` is longer than the number of tasks or contains a resource index outside
/// `0..num_resources`. Use [try_evaluate_discrete] for untrusted input.
///
/// ## Example
/// ```
/// # extern crate taskmatch;
/// use taskmatch::EtcMatrix;
/// use taskmatch::cost::evaluate_discrete;
///
/// let m = EtcMatrix::<f64>::from_rows([[2., 9.], [6., 1.], [3., 3.]]).unwrap();
/// assert_eq!(evaluate_discrete(&m, &[0, 1, 0]), 5.);
/// assert_eq!(evaluate_discrete(&m, &[]), -1.);
/// ```
pub fn evaluate_discrete<T: Float>(matrix: &EtcMatrix<T>, assignment: &[usize]) -> T {
    accumulate(matrix, assignment.iter().copied())
}

/// Checked variant of [evaluate_discrete].
pub fn try_evaluate_discrete<T: Float>(matrix: &EtcMatrix<T>, assignment: &[usize]) -> Result<T> {
    let tasks = matrix.num_tasks();
    let resources = matrix.num_resources();

    if assignment.len() > tasks {
        return Err(Error::DimensionMismatch {
            tasks,
            resources,
            reason: "assignment is longer than the number of tasks",
        });
    }

    if let Some((task, &resource)) = assignment
        .iter()
        .enumerate()
        .find(|(_, &i)| i >= resources)
    {
        return Err(Error::IndexOutOfRange {
            task,
            resource,
            num_resources: resources,
        });
    }

    Ok(evaluate_discrete(matrix, assignment))
}

/// Sum running times per resource and return `max_i c[i]` or [no_load] for no tasks.
fn accumulate<T, I>(matrix: &EtcMatrix<T>, assignment: I) -> T
where
    T: Float,
    I: IntoIterator<Item = usize>,
{
    let mut c = vec![T::zero(); matrix.num_resources()];
    let mut assigned = false;

    for (j, i) in assignment.into_iter().enumerate() {
        c[i] = c[i] + matrix[(j, i)];
        assigned = true;
    }

    if !assigned {
        return no_load();
    }

    c.into_iter().fold(T::zero(), T::max)
}
