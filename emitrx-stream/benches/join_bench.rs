// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{BenchmarkId, Criterion, Throughput};
use emitrx_core::Subject;
use emitrx_stream::SyncExt;
use std::hint::black_box;

pub fn bench_sync_with(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_with");
    let sizes = [100usize, 1000usize, 10000];

    for &size in &sizes {
        let id = BenchmarkId::from_parameter(format!("m{size}"));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(id, &size, |bencher, &size| {
            bencher.iter(|| {
                let (left, right) = (Subject::<usize>::new(), Subject::<usize>::new());
                let subscription = left.emitter().sync_with(right.emitter()).for_each(|pair| {
                    black_box(pair);
                });
                for i in 0..size {
                    let _ = left.next(i);
                    let _ = right.next(i);
                }
                subscription.ok()
            });
        });
    }

    group.finish();
}
