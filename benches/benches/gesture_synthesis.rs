// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Point;
use understory_gesture::{GestureSynthesizer, PointerInput, PointerPhase};

/// One pointer pressing, moving `moves` times, then lifting.
fn drag_stream(moves: u64) -> Vec<PointerInput> {
    let mut inputs = Vec::with_capacity(moves as usize + 2);
    inputs.push(PointerInput::new(1, PointerPhase::Down, Point::new(0.0, 0.0), 0));
    for i in 1..=moves {
        let x = i as f64 * 3.0;
        inputs.push(PointerInput::new(1, PointerPhase::Move, Point::new(x, 0.0), i * 8));
    }
    let end = moves as f64 * 3.0;
    inputs.push(PointerInput::new(
        1,
        PointerPhase::Up,
        Point::new(end, 0.0),
        moves * 8 + 200,
    ));
    inputs
}

/// Two pointers pinching apart.
fn pinch_stream(moves: u64) -> Vec<PointerInput> {
    let mut inputs = vec![
        PointerInput::new(1, PointerPhase::Down, Point::new(100.0, 100.0), 0),
        PointerInput::new(2, PointerPhase::Down, Point::new(120.0, 100.0), 1),
    ];
    for i in 1..=moves {
        let spread = i as f64;
        let t = 1 + i * 8;
        inputs.push(PointerInput::new(1, PointerPhase::Move, Point::new(100.0 - spread, 100.0), t));
        inputs.push(PointerInput::new(2, PointerPhase::Move, Point::new(120.0 + spread, 100.0), t));
    }
    let t = 1 + moves * 8 + 200;
    inputs.push(PointerInput::new(2, PointerPhase::Up, Point::new(120.0, 100.0), t));
    inputs.push(PointerInput::new(1, PointerPhase::Up, Point::new(100.0, 100.0), t));
    inputs
}

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/synthesize");

    for moves in [64_u64, 512, 4_096] {
        group.throughput(Throughput::Elements(moves));

        let drag = drag_stream(moves);
        group.bench_with_input(BenchmarkId::new("drag", moves), &drag, |b, inputs| {
            b.iter_batched(
                GestureSynthesizer::default,
                |mut synth| {
                    let mut emitted = 0_usize;
                    for input in inputs {
                        emitted += synth.on_pointer(input).len();
                    }
                    black_box(emitted);
                },
                BatchSize::SmallInput,
            );
        });

        let pinch = pinch_stream(moves);
        group.bench_with_input(BenchmarkId::new("pinch", moves), &pinch, |b, inputs| {
            b.iter_batched(
                GestureSynthesizer::default,
                |mut synth| {
                    let mut emitted = 0_usize;
                    for input in inputs {
                        emitted += synth.on_pointer(input).len();
                    }
                    black_box(emitted);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_synthesize);
criterion_main!(benches);
