//! Benchmarks for hit-testing, frame painting and formula highlighting.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::cast_precision_loss
)]

#[path = "../tests/common/mod.rs"]
mod common;

use common::MockEngine;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlgrid::formula::highlight;
use xlgrid::{Axis, DisplayList, GridConfig, GridView, SheetLayout, Viewport};

/// A layout with scattered custom sizes and hidden bands, like a worked sheet.
fn worked_layout(custom: u32) -> SheetLayout {
    let mut layout = SheetLayout::new(&GridConfig::default());
    for i in 1..=custom {
        layout.rows.set_size(i * 7, 18 + i % 30);
        layout.columns.set_size(i * 3, 60 + i % 90);
        if i % 50 == 0 {
            layout.set_hidden(Axis::Row, i * 11, true);
        }
    }
    layout.set_frozen(2, 1);
    layout
}

/// Hit-testing points across the viewport, far down the sheet.
fn bench_cell_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_at");
    for custom in [0_u32, 1_000, 50_000] {
        let layout = worked_layout(custom);
        let mut viewport = Viewport::new();
        viewport.resize(1600.0, 1000.0);
        viewport.set_scroll(20_000.0, 400_000.0, &layout);
        let points: Vec<(f64, f64)> = (0..40)
            .flat_map(|i| (0..25).map(move |j| (f64::from(i) * 40.0 + 3.0, f64::from(j) * 40.0 + 3.0)))
            .collect();

        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(custom), &points, |b, points| {
            b.iter(|| {
                for &(x, y) in points {
                    black_box(viewport.cell_at(black_box(x), black_box(y), &layout));
                }
            });
        });
    }
    group.finish();
}

/// One full frame into a display list, with a filled screen of cells.
fn bench_render(c: &mut Criterion) {
    let engine = (1..=60).fold(MockEngine::new(), |engine, row| {
        (1..=20).fold(engine, |engine, column| {
            let text = if column % 2 == 0 {
                format!("{}", row * column)
            } else {
                format!("label {row}-{column}")
            };
            engine.with_cell(row, column, &text)
        })
    });
    let mut view = GridView::new(engine, GridConfig::default());
    view.resize(1600.0, 1000.0);
    view.engine_mut().select_range(3, 2, 12, 6);

    c.bench_function("render_frame", |b| {
        let mut surface = DisplayList::new(1600.0, 1000.0);
        b.iter(|| {
            surface.clear();
            view.render(&mut surface);
            black_box(surface.ops.len())
        });
    });
}

fn bench_highlight(c: &mut Criterion) {
    let names: Vec<String> = ["Sheet1", "Data", "Q1 2024"].iter().map(|s| (*s).to_string()).collect();
    let formula = "=SUM(A1:B20)+IF(Data!C3>0,'Q1 2024'!$D$4*2,VLOOKUP(E5,Data!A:C,3,FALSE))-A1";

    c.bench_function("highlight_formula", |b| {
        b.iter(|| highlight(black_box(formula), 0, &names))
    });
}

criterion_group!(benches, bench_cell_at, bench_render, bench_highlight);
criterion_main!(benches);
