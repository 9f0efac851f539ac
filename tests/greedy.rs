use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use rstest::*;

use taskmatch::alg::greedy::{max_min, min_min};
use taskmatch::alg::reduce::reduce;
use taskmatch::{generator, EtcMatrix, Heterogeneity, Strategy};

fn scenario() -> EtcMatrix<f64> {
    EtcMatrix::from_rows([[2., 9.], [6., 1.]]).expect("valid matrix")
}

#[test]
fn max_min_scenario() {
    let (solution, stats) = max_min(&scenario());

    // row minima 2 (col 0) and 1 (col 1), the larger one is committed first
    assert_eq!(solution.schedule, vec![0, 1]);
    assert_eq!(solution.value, 2.);
    assert_eq!(stats.value, 2.);
    assert_eq!(stats.num_tasks, 2);
    assert_eq!(stats.num_resources, 2);
}

#[test]
fn min_min_scenario() {
    let (solution, _) = min_min(&scenario());

    // row 1 becomes [8, 1] after task 0 loads resource 0
    assert_eq!(solution.schedule, vec![0, 1]);
    assert_eq!(solution.value, 2.);
}

#[test]
fn min_min_is_row_sequential() {
    // the textbook variant would commit the global minimum 1 of task 0 last
    let m = EtcMatrix::<f64>::from_rows([[2., 2.5], [1., 9.]]).expect("valid matrix");

    let (solution, _) = min_min(&m);
    assert_eq!(solution.schedule, vec![0, 0]);
    assert_eq!(solution.value, 2.);

    let reduction = reduce(&m, Strategy::MIN_MIN_TASK);
    assert_eq!(reduction.to_solution().schedule, vec![1, 0]);
    assert_eq!(reduction.time_costs(), vec![1., 2.5]);
}

#[rstest]
#[case(1, 1, Heterogeneity::Low, Heterogeneity::Low)]
#[case(5, 3, Heterogeneity::High, Heterogeneity::Low)]
#[case(16, 4, Heterogeneity::Low, Heterogeneity::High)]
#[case(3, 8, Heterogeneity::High, Heterogeneity::High)]
fn feasible_on_random_instances(
    #[case] num_tasks: usize,
    #[case] num_resources: usize,
    #[case] task_het: Heterogeneity,
    #[case] res_het: Heterogeneity,
) {
    let mut rng = Pcg64Mcg::seed_from_u64((num_tasks * 100 + num_resources) as u64);
    let m = generator::generate(num_tasks, num_resources, task_het, res_het, &mut rng)
        .expect("non-empty dimensions");

    for (solution, _) in [min_min(&m), max_min(&m)] {
        assert_eq!(solution.schedule.len(), num_tasks);
        assert!(solution.schedule.iter().all(|&i| i < num_resources));
        assert_eq!(solution.num_resources, num_resources);
    }

    // Max-Min is the MIN-MAX-TASK reduction
    let (solution, _) = max_min(&m);
    assert_eq!(solution, reduce(&m, Strategy::MIN_MAX_TASK).to_solution());
}

#[test]
fn single_entry() {
    let m = EtcMatrix::<f64>::from_rows([[42.]]).expect("valid matrix");
    for (solution, _) in [min_min(&m), max_min(&m)] {
        assert_eq!(solution.schedule, vec![0]);
        assert_eq!(solution.value, 42.);
    }
}
