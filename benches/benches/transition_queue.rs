// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_transition::{Easing, TransformState, TransformationQueue};

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition/chain");

    // Queue `len` animated transitions and step frames until all settle.
    for len in [4_usize, 64, 512] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("advance_16ms", len), &len, |b, &len| {
            b.iter_batched(
                || {
                    let mut queue = TransformationQueue::<usize>::new();
                    let current = TransformState::IDENTITY;
                    for i in 0..len {
                        let x = -(i as f64) * 10.0;
                        let target = TransformState::new(1.0, x, 0.0)
                            .with_duration(100)
                            .with_easing(Easing::EaseOutCubic);
                        let _ = queue.push(&current, target, i).expect("finite target");
                    }
                    queue
                },
                |mut queue| {
                    let mut now = 0_u64;
                    let mut settled = 0_usize;
                    while !queue.is_idle() {
                        settled += queue.advance(now).len();
                        black_box(queue.rendered());
                        now += 16;
                    }
                    black_box(settled);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("cancel_mid_flight", |b| {
        b.iter_batched(
            || {
                let mut queue = TransformationQueue::<()>::new();
                let target = TransformState::new(2.0, -100.0, -100.0).with_duration(300);
                let _ = queue
                    .push(&TransformState::IDENTITY, target, ())
                    .expect("finite target");
                let _ = queue.advance(0);
                let _ = queue.advance(150);
                queue
            },
            |mut queue| black_box(queue.cancel()),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_chain);
criterion_main!(benches);
