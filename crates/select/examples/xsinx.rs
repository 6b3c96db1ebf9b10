use samplebox_select::{
    ActiveLearningSelector, EquidistantSelector, SamplingPointSelector, SelectorConfig,
};

fn xsinx(x: f64) -> f64 {
    (x - 3.5) * ((x - 3.5) / std::f64::consts::PI).sin()
}

fn main() {
    let xt: Vec<f64> = (0..15).map(|i| 25. * i as f64 / 14.).collect();
    let yt: Vec<f64> = xt.iter().map(|x| xsinx(*x)).collect();

    let mut selector = ActiveLearningSelector::new(SelectorConfig::default().seed(42))
        .expect("Selector created");
    selector.reset(20).expect("Campaign started");
    selector
        .set_initial_points(&xt, &yt)
        .expect("Initial points set");
    // x in [10, 12] is not reachable
    selector
        .set_feasible_regions(&[0., 12.], &[10., 25.])
        .expect("Feasible regions set");

    while selector.has_next_input() {
        let x = selector.get_next_input().expect("Next input");
        let y = xsinx(x);
        println!("Active learning sample xsinx({x:.4}) = {y:.4}");
        selector.inform(x, y).expect("Sample recorded");
    }

    let mut equidistant = EquidistantSelector::new();
    equidistant.set_complete_points(&[0., 5., 10., 15., 20., 25.]);
    equidistant
        .set_initial_points(&[0., 10.], &[xsinx(0.), xsinx(10.)])
        .expect("Initial points set");
    while equidistant.has_next_input() {
        let x = equidistant.get_next_input().expect("Next input");
        println!("Equidistant sample xsinx({x}) = {:.4}", xsinx(x));
        equidistant.inform(x, xsinx(x)).expect("Sample recorded");
    }
}
