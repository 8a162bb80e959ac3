//! Benchmark: search and in-place replacement on `sstring::SString`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sstring::{GrowthPolicy, NPOS, SString};

/// Deterministic haystack of `len` bytes: runs of filler with `needle`
/// inserted every `every` bytes.
fn make_haystack(len: usize, needle: &[u8], every: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut i = 0usize;
    while out.len() < len {
        if i % every == 0 {
            out.extend_from_slice(needle);
        } else {
            out.push(b'a' + (i % 23) as u8);
        }
        i += 1;
    }
    out.truncate(len);
    out
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    for &len in &[1_000usize, 100_000] {
        let s = SString::from_bytes(&make_haystack(len, b"needle", 97));

        group.bench_with_input(BenchmarkId::new("find_all", len), &s, |b, s| {
            b.iter(|| {
                let mut at = 0;
                let mut hits = 0usize;
                while let Some(i) = s.find(at, black_box(b"needle")) {
                    hits += 1;
                    at = i + 1;
                }
                hits
            });
        });

        group.bench_with_input(BenchmarkId::new("rfind_all", len), &s, |b, s| {
            b.iter(|| {
                let mut at = NPOS;
                let mut hits = 0usize;
                while let Some(i) = s.rfind(at, black_box(b"needle")) {
                    hits += 1;
                    if i == 0 {
                        break;
                    }
                    at = i + b"needle".len() - 2;
                }
                hits
            });
        });

        group.bench_with_input(BenchmarkId::new("count", len), &s, |b, s| {
            b.iter(|| s.count(0, black_box(b"needle")));
        });
    }
    group.finish();
}

fn bench_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace");
    for &len in &[1_000usize, 100_000] {
        let haystack = make_haystack(len, b"abc", 13);

        group.bench_with_input(BenchmarkId::new("shrink", len), &haystack, |b, h| {
            b.iter(|| {
                let mut s = SString::from_bytes(h);
                s.replace(0, b"abc", b"x").unwrap();
                s.len()
            });
        });

        group.bench_with_input(BenchmarkId::new("grow", len), &haystack, |b, h| {
            b.iter(|| {
                let mut s = SString::from_bytes(h);
                s.replace(0, b"abc", b"longer").unwrap();
                s.len()
            });
        });

        group.bench_with_input(BenchmarkId::new("remove", len), &haystack, |b, h| {
            b.iter(|| {
                let mut s = SString::from_bytes(h);
                s.remove(0, b"abc");
                s.len()
            });
        });
    }
    group.finish();
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    for policy in GrowthPolicy::ALL {
        group.bench_function(BenchmarkId::new("concat_10k", format!("{policy:?}")), |b| {
            b.iter(|| {
                let mut s = SString::empty_with(policy);
                for _ in 0..10_000 {
                    s.concat(black_box(b"0123456789")).unwrap();
                }
                s.len()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search, bench_replace, bench_append);
criterion_main!(benches);
