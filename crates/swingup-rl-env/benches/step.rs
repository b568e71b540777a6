use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swingup_rl_env::prelude::*;

fn bench_step(c: &mut Criterion) {
    let mut env = SwingUpEnv::new(SwingUpConfig {
        seed: Some(0),
        max_steps: usize::MAX,
        ..Default::default()
    })
    .unwrap();
    let mut sign = 1.0;

    c.bench_function("swing_up_step", |b| {
        b.iter(|| {
            sign = -sign;
            let step = env.step(ContinuousAction::from(sign * 0.2)).unwrap();
            if step.done {
                env.reset().unwrap();
            }
            black_box(step.observation)
        });
    });
}

fn bench_reset(c: &mut Criterion) {
    let mut env = SwingUpEnv::new(SwingUpConfig {
        seed: Some(1),
        ..Default::default()
    })
    .unwrap();
    c.bench_function("swing_up_reset", |b| b.iter(|| black_box(env.reset().unwrap())));
}

criterion_group!(benches, bench_step, bench_reset);
criterion_main!(benches);
