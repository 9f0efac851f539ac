use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use rstest::*;

use taskmatch::cost::{evaluate_continuous, evaluate_discrete, is_no_load};
use taskmatch::monitor::Unbounded;
use taskmatch::{generator, Algorithm, EtcMatrix, Heterogeneity, SolverConfig, Solve};

#[rstest]
#[case(6, 3, 1)]
#[case(4, 4, 2)]
#[case(1, 5, 3)]
#[case(9, 1, 4)]
fn evaluators_agree_in_range(
    #[case] num_tasks: usize,
    #[case] num_resources: usize,
    #[case] seed: u64,
) {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let m = generator::generate(
        num_tasks,
        num_resources,
        Heterogeneity::High,
        Heterogeneity::High,
        &mut rng,
    )
    .expect("non-empty dimensions");

    let dist = Uniform::new(0, num_resources);
    for _ in 0..20 {
        let assignment = (0..num_tasks)
            .map(|_| dist.sample(&mut rng))
            .collect::<Vec<_>>();
        let positions = assignment.iter().map(|&i| i as i64).collect::<Vec<_>>();
        assert_eq!(
            evaluate_discrete(&m, &assignment),
            evaluate_continuous(&m, &positions)
        );
    }
}

#[rstest]
#[case(Heterogeneity::Low, Heterogeneity::Low)]
#[case(Heterogeneity::Low, Heterogeneity::High)]
#[case(Heterogeneity::High, Heterogeneity::Low)]
#[case(Heterogeneity::High, Heterogeneity::High)]
fn generated_entries_within_bounds(
    #[case] task_het: Heterogeneity,
    #[case] res_het: Heterogeneity,
) {
    let upper = task_het.task_bound() * res_het.resource_bound() * res_het.resource_bound();
    let mut rng = Pcg64Mcg::seed_from_u64(8);

    let first =
        generator::generate(12, 5, task_het, res_het, &mut rng).expect("non-empty dimensions");
    let second =
        generator::generate(12, 5, task_het, res_het, &mut rng).expect("non-empty dimensions");

    for m in [&first, &second] {
        assert_eq!((m.num_tasks(), m.num_resources()), (12, 5));
        assert!(m.rows().flatten().all(|&x| (1. ..upper).contains(&x)));
    }
    assert_ne!(first, second);
}

#[rstest]
#[case("min-min")]
#[case("max-min")]
#[case("simulated-annealing")]
#[case("pso")]
#[case("MIN-MIN-TASK")]
#[case("MAX-MAX-RESOURCE")]
fn every_solver_on_single_entry(#[case] selector: &str) {
    let m = EtcMatrix::<f64>::from_rows([[3.5]]).expect("valid matrix");
    let config = SolverConfig {
        seed: Some(1),
        ..Default::default()
    };

    let (solution, stats) = taskmatch::solve(&m, selector, &config).expect("known algorithm");

    assert_eq!(solution.schedule, vec![0]);
    assert_eq!(solution.value, 3.5);
    assert_eq!(stats.value, 3.5);
    assert!(!is_no_load(solution.value));
}

#[rstest]
#[case("min-min")]
#[case("max-min")]
#[case("simulated-annealing")]
#[case("pso")]
fn every_solver_is_feasible(#[case] selector: &str) {
    let mut rng = Pcg64Mcg::seed_from_u64(12);
    let m = generator::generate(6, 6, Heterogeneity::Low, Heterogeneity::Low, &mut rng)
        .expect("non-empty dimensions");

    let mut config = SolverConfig::default();
    config.swarm.max_iterations = 50;
    config.swarm.population_size = 10;
    let algorithm: Algorithm = config.algorithm(selector).expect("known algorithm");

    let (solution, stats) = algorithm.solve(&m, &mut rng, &mut Unbounded).expect("feasible input");

    assert_eq!(solution.schedule.len(), 6);
    assert!(solution.schedule.iter().all(|&i| i < 6));
    assert_eq!(stats.num_tasks, 6);
    assert_eq!(stats.num_resources, 6);
}
