// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{BenchmarkId, Criterion, Throughput};
use emitrx_core::{Emitter, Subject};
use emitrx_stream::merge;
use std::hint::black_box;

pub fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let input_counts = [2usize, 8];
    let sizes = [100usize, 1000usize];

    for &inputs in &input_counts {
        for &size in &sizes {
            let id = BenchmarkId::from_parameter(format!("n{inputs}_m{size}"));
            group.throughput(Throughput::Elements((inputs * size) as u64));
            group.bench_with_input(id, &(inputs, size), |bencher, &(inputs, size)| {
                bencher.iter(|| {
                    let subjects: Vec<Subject<usize>> =
                        (0..inputs).map(|_| Subject::new()).collect();
                    let emitters: Vec<Emitter<usize>> =
                        subjects.iter().map(Subject::emitter).collect();
                    let merged = merge(emitters);
                    let subscription = merged.for_each(|v| {
                        black_box(v);
                    });
                    for i in 0..size {
                        for subject in &subjects {
                            let _ = subject.next(i);
                        }
                    }
                    subscription.ok()
                });
            });
        }
    }

    group.finish();
}
