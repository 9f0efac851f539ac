use std::collections::HashMap;

use taskmatch::{EtcMatrix, Solution};

#[test]
fn gantt_schedule() {
    let solution = Solution {
        schedule: vec![0, 1, 0, 2],
        value: 2.,
        num_resources: 3,
    };

    let mut expected = HashMap::new();
    expected.insert(0, vec![0, 2]);
    expected.insert(1, vec![1]);
    expected.insert(2, vec![3]);

    assert_eq!(solution.gantt_schedule(), expected);
}

#[test]
fn task_distribution_to_resources() {
    // no tasks
    let solution = Solution {
        schedule: vec![],
        value: 0.,
        num_resources: 3,
    };
    assert_eq!(solution.task_loads(), vec![0, 0, 0]);

    // single resource
    let solution = Solution {
        schedule: vec![0; 4],
        value: 4.,
        num_resources: 1,
    };
    assert_eq!(solution.task_loads(), vec![4]);

    // non-trivial distribution
    let solution = Solution {
        schedule: vec![0, 1, 0, 2],
        value: 2.,
        num_resources: 3,
    };
    assert_eq!(solution.task_loads(), vec![2, 1, 1]);
}

#[test]
fn completion_times_ignore_reported_value() {
    let m = EtcMatrix::<f64>::from_rows([[2., 9.], [6., 1.], [4., 4.]]).expect("valid matrix");

    // Min-Min style value: longest single task rather than the makespan
    let solution = Solution {
        schedule: vec![0, 1, 0],
        value: 4.,
        num_resources: 2,
    };

    let completion = solution.completion_times(&m);
    assert_eq!(completion, vec![6., 1.]);
    assert_eq!(completion.iter().copied().fold(0., f64::max), 6.);
}

#[test]
fn json_round_trip() {
    let solution = Solution {
        schedule: vec![1, 0, 1],
        value: 7.5,
        num_resources: 2,
    };

    let json = serde_json::to_string(&solution).expect("serializable");
    assert_eq!(
        json,
        r#"{"schedule":[1,0,1],"value":7.5,"num_resources":2}"#
    );

    let back: Solution<f64> = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back, solution);
}
