//! Deterministic input generation shared by the dynvec benchmarks.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Fixed seed so runs are comparable across machines and commits.
pub const BENCH_SEED: u64 = 0x5eed_d1_5eed;

/// `n` pseudo-random u64 values from a seeded ChaCha8 stream.
pub fn random_u64s(n: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(BENCH_SEED);
    (0..n).map(|_| rng.gen()).collect()
}

/// A separator-joined string of `n` short pseudo-random chunks.
pub fn random_joined_string(n: usize, sep: char) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(BENCH_SEED ^ 1);
    let mut out = String::new();
    for i in 0..n {
        if i > 0 {
            out.push(sep);
        }
        let len = rng.gen_range(0..12);
        for _ in 0..len {
            out.push(rng.gen_range(b'a'..=b'z') as char);
        }
    }
    out
}
