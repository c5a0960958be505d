// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use cellgraph::format::{export_model, parse_model};
use cellgraph::model::{CellModel, VertexSpec};
use cellgraph::ops::{link_vertices, LinkOptions};
use cellgraph::store::{DocumentFile, PageSelector};

mod profiler;

fn chain_model(vertices: usize) -> CellModel {
    let mut model = CellModel::new();
    for idx in 0..vertices {
        let spec = VertexSpec::new(format!("node {idx}"), (idx % 20) as f64 * 140.0, 0.0)
            .kind(if idx % 3 == 0 { "ellipse" } else { "rectangle" });
        model.add_vertex(&format!("v{idx}"), spec).expect("add_vertex");
        if idx > 0 {
            let (from, to) = (format!("v{}", idx - 1), format!("v{idx}"));
            link_vertices(&mut model, &from, &to, LinkOptions::default().label("next"))
                .expect("link_vertices");
        }
    }
    model
}

// Group names and case ids stay stable so results compare across refactors.
fn benches_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store.model_text");
    for (case, vertices) in [("small", 20), ("medium", 300)] {
        let model = chain_model(vertices);
        let text = export_model(&model);
        group.bench_function(format!("export_{case}"), |b| {
            b.iter(|| black_box(export_model(black_box(&model)).len()))
        });
        group.bench_function(format!("parse_{case}"), |b| {
            b.iter(|| black_box(parse_model(black_box(&text)).expect("parse_model").len()))
        });
    }
    group.finish();

    // one page rewritten among several untouched siblings
    let mut group = c.benchmark_group("store.save_page");
    let model = chain_model(100);
    group.bench_function("io_medium_four_pages", |b| {
        b.iter_batched_ref(
            || {
                let dir = tempfile::tempdir().expect("tempdir");
                let file = DocumentFile::new(dir.path().join("bench.drawio"));
                for name in ["a", "b", "c", "d"] {
                    file.save_page(&model, Some(name)).expect("seed page");
                }
                (dir, file)
            },
            |(_dir, file)| {
                file.save_page(black_box(&model), Some("c")).expect("save_page");
                black_box(file.load_page(&PageSelector::Index(2)).expect("load_page").len())
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_store
}
criterion_main!(benches);
