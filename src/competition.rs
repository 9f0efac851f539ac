//! # Competition
//! Several participants may solve the same matrix independently. The winning submission is the
//! one with the lowest cost; among equal costs the first one observed wins. Submissions carrying
//! the [no-load sentinel](crate::cost::no_load) (or NaN) never win.
use itertools::Itertools;
use num_traits::Float;
use ordered_float::OrderedFloat;

use crate::cost::is_no_load;

/// Pick the best `(participant, cost)` pair or `None` if no submission qualifies.
///
/// ## Example
/// ```
/// # extern crate taskmatch;
/// use taskmatch::competition::select_best;
///
/// let results = vec![("p1", 12.), ("p2", 9.), ("p3", 9.), ("p4", -1.)];
/// assert_eq!(select_best(results), Some(("p2", 9.)));
/// ```
pub fn select_best<K, T, I>(results: I) -> Option<(K, T)>
where
    T: Float,
    I: IntoIterator<Item = (K, T)>,
{
    let candidates = results
        .into_iter()
        .filter(|(_, cost)| !cost.is_nan() && !is_no_load(*cost))
        .collect::<Vec<_>>();

    let winner = candidates
        .iter()
        .map(|(_, cost)| OrderedFloat(*cost))
        .position_min()?;

    candidates.into_iter().nth(winner)
}
