//! Criterion micro-benchmarks for append, sort, range search and string
//! splitting.

use std::cmp::Ordering;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dynvec::{split_string, DynVec, DESTROY_STR_ITEM};
use dynvec_bench::{random_joined_string, random_u64s};

fn as_u64(elem: &[u8]) -> u64 {
    u64::from_ne_bytes(elem.try_into().unwrap())
}

fn cmp_u64(a: &[u8], b: &[u8]) -> Ordering {
    as_u64(a).cmp(&as_u64(b))
}

fn bench_push(c: &mut Criterion) {
    let values = random_u64s(4096);
    c.bench_function("push_4096_u64", |b| {
        b.iter(|| {
            let mut vec = DynVec::of::<u64>();
            for v in &values {
                vec.push(Some(&v.to_ne_bytes())).unwrap();
            }
            black_box(vec.len())
        })
    });
}

fn bench_append_array(c: &mut Criterion) {
    let bytes: Vec<u8> = random_u64s(4096)
        .iter()
        .flat_map(|v| v.to_ne_bytes())
        .collect();
    c.bench_function("append_array_4096_u64", |b| {
        b.iter(|| {
            let mut vec = DynVec::of::<u64>();
            vec.append_array(Some(&bytes), 4096).unwrap();
            black_box(vec.len())
        })
    });
}

fn bench_sort(c: &mut Criterion) {
    let values = random_u64s(4096);
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
    c.bench_function("sort_4096_u64", |b| {
        b.iter(|| {
            let mut vec = DynVec::of::<u64>();
            vec.append_array(Some(&bytes), 4096).unwrap();
            vec.sort_unstable_by(cmp_u64);
            black_box(vec.len())
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let mut values = random_u64s(4096);
    values.sort_unstable();
    let mut vec = DynVec::of::<u64>();
    for v in &values {
        vec.push(Some(&v.to_ne_bytes())).unwrap();
    }
    let keys = random_u64s(256);
    c.bench_function("search_256_keys_in_4096", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for key in &keys {
                if vec.search(&key.to_ne_bytes(), cmp_u64).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

fn bench_split_string(c: &mut Criterion) {
    let input = random_joined_string(512, ':');
    c.bench_function("split_string_512_chunks", |b| {
        b.iter(|| {
            let mut vec = DynVec::of_with_destroy::<usize>(DESTROY_STR_ITEM);
            split_string(&input, &mut vec, ':', false).unwrap();
            black_box(vec.len())
        })
    });
}

criterion_group!(
    benches,
    bench_push,
    bench_append_array,
    bench_sort,
    bench_search,
    bench_split_string
);
criterion_main!(benches);
