use std::sync::atomic::AtomicBool;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use rstest::*;

use taskmatch::alg::anneal::{anneal, AnnealingParams};
use taskmatch::cost::evaluate_discrete;
use taskmatch::monitor::{InterruptMonitor, TimeLimitMonitor, Unbounded};
use taskmatch::{generator, EtcMatrix, Error, Heterogeneity, SimulatedAnnealing, Solve};

fn instance(n: usize, seed: u64) -> EtcMatrix<f64> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    generator::generate(n, n, Heterogeneity::High, Heterogeneity::Low, &mut rng)
        .expect("non-empty dimensions")
}

#[rstest]
#[case(2, 1)]
#[case(5, 2)]
#[case(12, 3)]
fn returns_permutation(#[case] n: usize, #[case] seed: u64) {
    let m = instance(n, seed);
    let mut rng = Pcg64Mcg::seed_from_u64(seed);

    let (solution, stats) = SimulatedAnnealing::default()
        .solve(&m, &mut rng, &mut Unbounded)
        .expect("square matrix");

    let mut resources = solution.schedule.clone();
    resources.sort_unstable();
    assert_eq!(resources, (0..n).collect::<Vec<_>>());

    // never worse than the starting identity assignment
    let identity = (0..n).collect::<Vec<_>>();
    assert!(solution.value <= evaluate_discrete(&m, &identity));
    assert_eq!(solution.value, evaluate_discrete(&m, &solution.schedule));

    assert_eq!(stats.iterations, AnnealingParams::default().num_steps());
    assert!(stats.accepted <= stats.iterations);
    assert!(!stats.interrupted);
}

#[test]
fn single_task() {
    let m = EtcMatrix::<f64>::from_rows([[13.]]).expect("valid matrix");
    let mut rng = Pcg64Mcg::seed_from_u64(0);

    let (solution, stats) = anneal(&m, &AnnealingParams::default(), &mut rng, &mut Unbounded)
        .expect("square matrix");

    assert_eq!(solution.schedule, vec![0]);
    assert_eq!(solution.value, 13.);
    assert_eq!(stats.iterations, 0);
}

#[test]
fn non_square_is_rejected() {
    let m = EtcMatrix::<f64>::from_rows([[1., 2.], [3., 4.], [5., 6.]]).expect("valid matrix");
    let mut rng = Pcg64Mcg::seed_from_u64(0);

    let result = anneal(&m, &AnnealingParams::default(), &mut rng, &mut Unbounded);

    assert!(matches!(
        result,
        Err(Error::DimensionMismatch {
            tasks: 3,
            resources: 2,
            ..
        })
    ));
}

#[test]
fn seeded_runs_are_reproducible() {
    let m = instance(8, 4);

    let run = |seed| {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        anneal(&m, &AnnealingParams::default(), &mut rng, &mut Unbounded)
            .expect("square matrix")
            .0
    };

    assert_eq!(run(99), run(99));
}

#[test]
fn interrupted_before_first_step() {
    let m = instance(6, 5);
    let mut rng = Pcg64Mcg::seed_from_u64(5);

    let stop = AtomicBool::new(true);
    let mut monitor = InterruptMonitor::new(&stop);

    let (solution, stats) = anneal(&m, &AnnealingParams::default(), &mut rng, &mut monitor)
        .expect("square matrix");

    assert!(stats.interrupted);
    assert_eq!(stats.iterations, 0);
    assert_eq!(solution.schedule, (0..6).collect::<Vec<_>>());
}

#[test]
fn expired_time_limit() {
    let m = instance(6, 6);
    let mut rng = Pcg64Mcg::seed_from_u64(6);
    let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0);

    let (_, stats) = anneal(&m, &AnnealingParams::default(), &mut rng, &mut monitor)
        .expect("square matrix");

    assert!(stats.interrupted);
    assert_eq!(stats.iterations, 0);
}
