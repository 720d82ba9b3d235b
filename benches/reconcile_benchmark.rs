//! Reconciliation benchmarks.
//!
//! Measures one auto-refresh pass over a rendered window of records: a pass
//! where nothing changed, one where a tenth of the records changed, and one
//! where a tenth of the window is new and lands at the head.
//!
//! Run with: cargo bench --bench reconcile_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use pagelist::model::{Items, Record};
use pagelist::state::{ListConfig, ListSession};
use pagelist::view::LineViewFactory;
use std::time::Duration;

const WINDOWS: [usize; 3] = [100, 1_000, 10_000];

fn record(id: &str, revision: usize) -> Record {
    let line = format!(
        r#"{{"id":"{id}","msg":"event {id}","revision":{revision},"level":"info"}}"#
    );
    Record::parse(&line, "id").expect("fixture record parses")
}

fn window(size: usize) -> Vec<Record> {
    (0..size).map(|i| record(&format!("k{i}"), 0)).collect()
}

/// A session with `items` already loaded as a single page.
fn loaded_session(items: Vec<Record>) -> ListSession<Record, LineViewFactory> {
    let config = ListConfig::new()
        .with_page_size(items.len())
        .expect("window is non-empty")
        .with_auto_refresh(Duration::from_secs(5));
    let mut session = ListSession::new(config, LineViewFactory::new("id", 120));
    let request = session.begin_load().expect("fresh session issues a load");
    session.complete_load(request, Ok(Items::new(items, 0)));
    session
}

fn benchmark_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for size in WINDOWS {
        let baseline = window(size);

        let unchanged = baseline.clone();
        group.bench_with_input(BenchmarkId::new("unchanged", size), &size, |b, _| {
            b.iter_batched(
                || (loaded_session(baseline.clone()), unchanged.clone()),
                |(mut session, response)| black_box(session.reconcile(response)),
                BatchSize::LargeInput,
            );
        });

        let patched: Vec<Record> = (0..size)
            .map(|i| record(&format!("k{i}"), usize::from(i % 10 == 0)))
            .collect();
        group.bench_with_input(BenchmarkId::new("patch_tenth", size), &size, |b, _| {
            b.iter_batched(
                || (loaded_session(baseline.clone()), patched.clone()),
                |(mut session, response)| black_box(session.reconcile(response)),
                BatchSize::LargeInput,
            );
        });

        let prepended: Vec<Record> = (0..size / 10)
            .map(|i| record(&format!("new{i}"), 0))
            .chain(baseline.iter().take(size - size / 10).cloned())
            .collect();
        group.bench_with_input(BenchmarkId::new("prepend_tenth", size), &size, |b, _| {
            b.iter_batched(
                || (loaded_session(baseline.clone()), prepended.clone()),
                |(mut session, response)| black_box(session.reconcile(response)),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_reconcile);
criterion_main!(benches);
