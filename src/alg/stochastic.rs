use rand::distributions::{Distribution, Uniform};
use rand::Rng;

pub trait Mutate<T: Clone> {
    fn mutate<R>(&self, xs: &mut [T], rng: &mut R)
    where
        R: Rng + ?Sized;

    fn copy_mutate<R>(&self, xs: &[T], rng: &mut R) -> Vec<T>
    where
        R: Rng + ?Sized,
    {
        let mut xs = xs.to_vec();
        self.mutate(&mut xs, rng);
        xs
    }
}

/// Exchanges the values at two distinct positions drawn uniformly at random.
///
/// Applied to a permutation it always yields a different permutation.
#[derive(Debug, Clone)]
pub struct SwapMutation {
    first_dist: Uniform<usize>,
    second_dist: Uniform<usize>,
}

impl SwapMutation {
    /// Swap mutation for vectors of length `n` or `None` if `n < 2` (no two distinct positions).
    pub fn new(n: usize) -> Option<SwapMutation> {
        if n < 2 {
            return None;
        }
        Some(SwapMutation {
            first_dist: Uniform::new(0, n),
            second_dist: Uniform::new(0, n - 1),
        })
    }

    /// Draw an unordered pair of distinct positions.
    pub fn positions<R>(&self, rng: &mut R) -> (usize, usize)
    where
        R: Rng + ?Sized,
    {
        let i = self.first_dist.sample(rng);
        // skip over `i` so that `j` is uniform on the remaining positions
        let mut j = self.second_dist.sample(rng);
        if j >= i {
            j += 1;
        }
        (i, j)
    }
}

impl<T: Clone> Mutate<T> for SwapMutation {
    fn mutate<R>(&self, xs: &mut [T], rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let (i, j) = self.positions(rng);
        xs.swap(i, j);
    }
}

/// Vector of `n` independent samples, uniform in `[low, high)`.
///
/// # Panics
/// If `low >= high`.
pub fn uniform_vec<R>(low: f64, high: f64, n: usize, rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let dist = Uniform::new(low, high);
    (0..n).map(|_| dist.sample(rng)).collect()
}
