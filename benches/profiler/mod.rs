// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared criterion configuration. Sampling knobs come from the environment so CI can shorten
//! runs without editing the benches.

use std::time::Duration;

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse().ok()).unwrap_or(default)
}

pub fn criterion() -> Criterion {
    let frequency: i32 = env_or("PROFILE_FREQ", 100).clamp(1, 1000);
    let sample_size: usize = env_or("BENCH_SAMPLE_SIZE", 40).clamp(10, 200);
    let warmup: u64 = env_or("BENCH_WARMUP_SECS", 2).clamp(1, 60);
    let measurement: u64 = env_or("BENCH_MEASUREMENT_SECS", 4).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup))
        .measurement_time(Duration::from_secs(measurement))
        .with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
}
