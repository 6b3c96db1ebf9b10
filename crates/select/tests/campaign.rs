use samplebox_select::{
    ActiveLearningSelector, SamplingPointSelector, SelectError, SelectorConfig,
};
use std::collections::HashSet;

fn xsinx(x: f64) -> f64 {
    (x - 3.5) * ((x - 3.5) / std::f64::consts::PI).sin()
}

fn initial_points(n: usize, lower: f64, upper: f64) -> (Vec<f64>, Vec<f64>) {
    let xt: Vec<f64> = (0..n)
        .map(|i| lower + (upper - lower) * i as f64 / (n - 1) as f64)
        .collect();
    let yt = xt.iter().map(|x| xsinx(*x)).collect();
    (xt, yt)
}

fn run_campaign(config: SelectorConfig, n_points: usize) -> Vec<f64> {
    let mut selector = ActiveLearningSelector::new(config).expect("selector created");
    selector.reset(n_points).unwrap();
    let (xt, yt) = initial_points(15, 0., 25.);
    selector.set_initial_points(&xt, &yt).unwrap();
    selector.set_feasible_regions(&[0.], &[25.]).unwrap();

    let mut suggested = vec![];
    while selector.has_next_input() {
        let x = selector.get_next_input().unwrap();
        selector.inform(x, xsinx(x)).unwrap();
        suggested.push(x);
    }
    suggested
}

#[test]
fn test_campaign_over_single_region() {
    let mut selector =
        ActiveLearningSelector::new(SelectorConfig::default().seed(42)).expect("selector created");
    selector.reset(10).unwrap();
    let (xt, yt) = initial_points(15, 0., 25.);
    selector.set_initial_points(&xt, &yt).unwrap();
    selector.set_feasible_regions(&[0.], &[25.]).unwrap();
    let initial: HashSet<usize> = selector.sample_point_indices().iter().copied().collect();
    assert_eq!(initial.len(), 15);

    let mut suggested = HashSet::new();
    for _ in 0..10 {
        assert!(selector.has_next_input());
        let min_dist = selector.min_index_distance();
        let stop = selector.stop_percentage();
        let occupied = selector.sample_point_indices().to_vec();

        let x = selector.get_next_input().unwrap();
        assert!((0. ..=25.).contains(&x), "x = {x}");
        let idx = selector.grid().unwrap().snap(x);
        assert!(!initial.contains(&idx));
        assert!(suggested.insert(idx), "index {idx} suggested twice");
        if selector.stop_percentage() == stop {
            assert!(occupied.iter().all(|o| idx.abs_diff(*o) >= min_dist));
        }
        selector.inform(x, xsinx(x)).unwrap();
    }
    assert!(!selector.has_next_input());
    assert_eq!(suggested.len(), 10);
    assert_eq!(selector.sample_point_indices().len(), 25);
    assert_eq!(selector.sampled_points().unwrap().nrows(), 25);
}

#[test]
fn test_campaign_is_reproducible_with_seed() {
    let first = run_campaign(SelectorConfig::default().seed(7), 5);
    let second = run_campaign(SelectorConfig::default().seed(7), 5);
    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

#[test]
fn test_failed_sampling_is_never_suggested_again() {
    let mut selector =
        ActiveLearningSelector::new(SelectorConfig::default().seed(3)).expect("selector created");
    selector.reset(6).unwrap();
    let (xt, yt) = initial_points(15, 0., 25.);
    selector.set_initial_points(&xt, &yt).unwrap();
    selector.set_feasible_regions(&[0.], &[25.]).unwrap();

    let failed = selector.get_next_input().unwrap();
    selector.inform_failure(failed).unwrap();
    while selector.has_next_input() {
        let x = selector.get_next_input().unwrap();
        assert_ne!(x, failed);
        selector.inform(x, xsinx(x)).unwrap();
    }
    assert_eq!(selector.current_index(), 6);
    // the failed sampling brings no output
    assert_eq!(selector.sampled_points().unwrap().nrows(), 20);
    assert_eq!(selector.sample_point_indices().len(), 21);
}

#[test]
fn test_campaign_stops_when_grid_is_full() {
    let config = SelectorConfig::default().grid_resolution(30).seed(0);
    let mut selector = ActiveLearningSelector::new(config).expect("selector created");
    selector.reset(100).unwrap();
    let (xt, yt) = initial_points(15, 0., 10.);
    selector.set_initial_points(&xt, &yt).unwrap();
    selector.set_feasible_regions(&[0.], &[25.]).unwrap();
    let n_initial = selector.sample_point_indices().len();

    let mut suggested = HashSet::new();
    while selector.has_next_input() {
        let x = selector.get_next_input().unwrap();
        assert!(suggested.insert(selector.grid().unwrap().snap(x)));
        selector.inform(x, xsinx(x)).unwrap();
    }
    assert_eq!(suggested.len(), 30 - n_initial);
    assert!(selector.stop_percentage() < 0.63912041);
    assert!(matches!(
        selector.get_next_input(),
        Err(SelectError::PreconditionError(_))
    ));
}
