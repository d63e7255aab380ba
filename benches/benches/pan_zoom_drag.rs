// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Size};
use understory_gesture::{PointerInput, PointerPhase};
use understory_pan_zoom::{
    BoundaryConfig, BoundaryInterceptor, BoundaryMode, FixedHost, PanZoomController,
    ScaleLimitInterceptor,
};

fn controller(mode: BoundaryMode) -> PanZoomController<FixedHost> {
    let host = FixedHost::new(Size::new(800.0, 600.0), Size::new(4_000.0, 3_000.0));
    PanZoomController::builder()
        .host(host)
        .interceptor(ScaleLimitInterceptor::default())
        .interceptor(BoundaryInterceptor::new(
            BoundaryConfig::default().with_mode(mode),
        ))
        .build()
        .expect("valid host")
}

/// A drag that runs past the left edge and back.
fn overdrag(moves: u64) -> Vec<PointerInput> {
    let mut inputs = vec![PointerInput::new(
        1,
        PointerPhase::Down,
        Point::new(400.0, 300.0),
        0,
    )];
    for i in 1..=moves {
        let phase = (i % 200) as f64;
        let x = 400.0 + if phase < 100.0 { phase * 6.0 } else { (200.0 - phase) * 6.0 };
        inputs.push(PointerInput::new(1, PointerPhase::Move, Point::new(x, 300.0), i * 8));
    }
    inputs.push(PointerInput::new(
        1,
        PointerPhase::Up,
        Point::new(400.0, 300.0),
        moves * 8 + 200,
    ));
    inputs
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("pan_zoom/drag");

    for moves in [64_u64, 512, 4_096] {
        group.throughput(Throughput::Elements(moves));
        let inputs = overdrag(moves);

        for (name, mode) in [("stop", BoundaryMode::Stop), ("slow", BoundaryMode::Slow)] {
            group.bench_with_input(BenchmarkId::new(name, moves), &inputs, |b, inputs| {
                b.iter_batched(
                    || controller(mode),
                    |mut pz| {
                        for input in inputs {
                            pz.handle_pointer(input).expect("valid proposals");
                        }
                        black_box(pz.current_state());
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_drag);
criterion_main!(benches);
