use criterion::{Criterion, criterion_group, criterion_main};
use samplebox_select::{ActiveLearningSelector, SamplingPointSelector, SelectorConfig};

fn xsinx(x: f64) -> f64 {
    (x - 3.5) * ((x - 3.5) / std::f64::consts::PI).sin()
}

fn criterion_select(c: &mut Criterion) {
    let sizes = [15, 50, 100];

    let mut group = c.benchmark_group("select");
    group.sample_size(10);
    for size in sizes {
        let xt: Vec<f64> = (0..size).map(|i| 25. * i as f64 / (size - 1) as f64).collect();
        let yt: Vec<f64> = xt.iter().map(|x| xsinx(*x)).collect();
        group.bench_function(format!("next-input-{size}-samples"), |b| {
            b.iter(|| {
                let mut selector =
                    ActiveLearningSelector::new(SelectorConfig::default().seed(42))
                        .expect("Selector created");
                selector.reset(1).expect("Campaign started");
                selector.set_initial_points(&xt, &yt).expect("Initial points");
                selector
                    .set_feasible_regions(&[0.], &[25.])
                    .expect("Feasible regions");
                std::hint::black_box(selector.get_next_input().expect("Next input"))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_select);
criterion_main!(benches);
