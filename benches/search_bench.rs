// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Benchmarks for pattern search.
//!
//! Measures search throughput at multiple input sizes for three pattern
//! shapes: a single literal (prefilter path), a capture with cross-event
//! references and unbounded repetition, and a backtracking-heavy bounded
//! repetition. Also measures per-period queries, `sort_events` and the
//! parse + compile cost of a textual pattern.
#![allow(missing_docs, clippy::cast_possible_truncation)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use event_patterns::common::timestamp::MICROS_PER_SECOND;
use event_patterns::pattern::predicate::{kind, same_as, success};
use event_patterns::{
    parse_pattern, search, search_with, sort_events, CompiledPattern, Event, EventKind, Pattern,
    Query, SearchConfig,
};

/// Possession-like stream: runs of passes ending in a shot or a carry,
/// alternating teams between possessions.
fn make_events(num_events: usize) -> Vec<Event> {
    (0..num_events)
        .map(|i| {
            let possession = i / 6;
            let team = if possession % 2 == 0 { "home" } else { "away" };
            let kind = match i % 6 {
                5 if possession % 3 == 0 => EventKind::Carry,
                5 => EventKind::Shot,
                _ => EventKind::Pass,
            };
            Event::new(kind, (i as i64) * MICROS_PER_SECOND)
                .with_team(team)
                .with_success(i % 7 != 0)
                .with_period(if i < num_events / 2 { 1 } else { 2 })
        })
        .collect()
}

fn lit(tag: &str) -> Pattern<Event> {
    Pattern::literal(kind(tag))
}

fn build_up_pattern() -> CompiledPattern<Event> {
    let same_team = |tag: &str| Pattern::literal(kind::<Event>(tag).and(same_as("p1", "team")));
    let pattern = Pattern::capture("p1", kind::<Event>("pass").and(success()))
        .then(same_team("pass").one_or_more().unwrap())
        .then(same_team("shot"));
    CompiledPattern::compile(pattern).unwrap()
}

fn backtracking_pattern() -> CompiledPattern<Event> {
    let pattern = lit("pass")
        .between(2, 6)
        .unwrap()
        .then(lit("pass").or(lit("carry")))
        .then(lit("shot"));
    CompiledPattern::compile(pattern).unwrap()
}

fn bench_search_literal(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_literal");
    let pattern = CompiledPattern::compile(lit("shot")).unwrap();

    for &n in &[100_usize, 1_000, 10_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let events = make_events(n);
            b.iter(|| search(black_box(&events), &pattern).len());
        });
    }

    group.finish();
}

fn bench_search_build_up(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_build_up");
    let pattern = build_up_pattern();

    for &n in &[100_usize, 1_000, 10_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let events = make_events(n);
            b.iter(|| search(black_box(&events), &pattern).len());
        });
    }

    group.finish();
}

fn bench_search_backtracking(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_backtracking");
    let pattern = backtracking_pattern();

    for &n in &[100_usize, 1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("prefilter", n), &n, |b, &n| {
            let events = make_events(n);
            b.iter(|| search(black_box(&events), &pattern).len());
        });
        group.bench_with_input(BenchmarkId::new("no_prefilter", n), &n, |b, &n| {
            let events = make_events(n);
            let config = SearchConfig::default().with_prefilter(false);
            b.iter(|| search_with(black_box(&events), &pattern, &config).len());
        });
    }

    group.finish();
}

fn bench_query_periods(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_periods");
    let query = Query::new(build_up_pattern()).with_event_types(["pass", "shot"]);

    for &n in &[1_000_usize, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let events = make_events(n);
            b.iter(|| query.run(black_box(&events)).len());
        });
    }

    group.finish();
}

fn bench_sort_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_events");

    for &n in &[1_000_usize, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("presorted", n), &n, |b, &n| {
            let events = make_events(n);
            b.iter(|| {
                let mut events = events.clone();
                sort_events(black_box(&mut events));
                events.len()
            });
        });
        group.bench_with_input(BenchmarkId::new("reversed", n), &n, |b, &n| {
            let mut reversed = make_events(n);
            reversed.reverse();
            b.iter(|| {
                let mut events = reversed.clone();
                sort_events(black_box(&mut events));
                events.len()
            });
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let predicates = [kind::<Event>("pass"), kind("shot"), kind("carry"), success()];
    c.bench_function("parse_and_compile", |b| {
        b.iter(|| {
            let pattern = parse_pattern(
                black_box("(?<p1>(?4))(?1){2,8}((?2)|(?3)(?2))(?<end>.)?(?2)"),
                &predicates,
            )
            .unwrap();
            CompiledPattern::compile(pattern).unwrap().len()
        });
    });
}

criterion_group!(
    benches,
    bench_search_literal,
    bench_search_build_up,
    bench_search_backtracking,
    bench_query_periods,
    bench_sort_events,
    bench_compile
);
criterion_main!(benches);
