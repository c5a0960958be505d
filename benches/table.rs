// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use cellgraph::model::CellModel;
use cellgraph::table::{create_table, insert_column, read_table, remove_column, TableSpec};

mod profiler;

fn table_model(columns: usize, rows: usize) -> CellModel {
    let headers: Vec<String> = (0..columns).map(|col| format!("col{col}")).collect();
    let mut spec = TableSpec::new(headers).at(40.0, 40.0);
    for row in 0..rows {
        spec = spec.row((0..columns).map(|col| format!("r{row}c{col}")));
    }
    let mut model = CellModel::new();
    create_table(&mut model, "bench", spec).expect("create_table");
    model
}

// Group names and case ids stay stable so results compare across refactors.
fn benches_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("table.read");
    for (case, columns, rows) in [("small", 4, 10), ("medium", 8, 100), ("large", 12, 500)] {
        let model = table_model(columns, rows);
        group.throughput(Throughput::Elements((columns * rows) as u64));
        group.bench_function(case, |b| {
            b.iter(|| black_box(read_table(black_box(&model), "bench").expect("read_table")))
        });
    }
    group.finish();

    // inserting at column 0 shifts every existing cell
    let mut group = c.benchmark_group("table.insert_column_front");
    for (case, columns, rows) in [("small", 4, 10), ("medium", 8, 100)] {
        let model = table_model(columns, rows);
        group.bench_function(case, |b| {
            b.iter_batched_ref(
                || model.clone(),
                |model| insert_column(model, "bench", "front", Some(0)).expect("insert_column"),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = c.benchmark_group("table.remove_column_front");
    let model = table_model(8, 100);
    group.bench_function("medium", |b| {
        b.iter_batched_ref(
            || model.clone(),
            |model| remove_column(model, "bench", 0usize).expect("remove_column"),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_table
}
criterion_main!(benches);
