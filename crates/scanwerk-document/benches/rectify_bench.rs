// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the scanwerk-document crate. Covers the
// perspective rectification hot path on a synthetic photo-sized raster.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use scanwerk_core::types::{CornerSet, Point};
use scanwerk_document::PerspectiveRectifier;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark rectification of a near-rectangular quadrilateral marked on an
/// 800x600 source — the typical size and corner layout of a handheld document
/// photo after downscaling. The resampling loop dominates; the 8x8 solve is
/// noise by comparison.
fn bench_rectify(c: &mut Criterion) {
    let source = RgbaImage::from_fn(800, 600, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let corners = CornerSet::new([
        Point::new(100.0, 100.0),
        Point::new(700.0, 120.0),
        Point::new(680.0, 580.0),
        Point::new(120.0, 560.0),
    ]);

    c.bench_function("rectify (800x600 -> 600x460)", |b| {
        b.iter(|| {
            let out = PerspectiveRectifier::rectify(black_box(&source), black_box(&corners))
                .expect("rectify");
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_rectify);
criterion_main!(benches);
