//! Seeded sampling without replacement
//!
//! The sampler is a partial Fisher-Yates shuffle over the positions `0..len`,
//! driven by [`StdRng`] seeded with [`seed_from_u64`](SeedableRng::seed_from_u64).
//! For draw `i` in `0..n` a position `j` is taken uniformly from `i..len` and
//! swapped into slot `i`; the first `n` slots are the sample. Draws go
//! through `u64` ranges so the result does not depend on the target's pointer
//! width. `StdRng` is ChaCha12 in the rand 0.8 line the workspace pins; the
//! output is reproducible for a given seed within that line only.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used for every middle sample
pub const SAMPLE_SEED: u64 = 42;

/// Choose `n` distinct positions from `0..len`, returned in ascending order.
///
/// When `n >= len` every position is returned.
pub fn sample_positions(len: usize, n: usize, seed: u64) -> Vec<usize> {
    if n >= len {
        return (0..len).collect();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions: Vec<usize> = (0..len).collect();
    for i in 0..n {
        let j = rng.gen_range(i as u64..len as u64) as usize;
        positions.swap(i, j);
    }

    positions.truncate(n);
    positions.sort_unstable();
    positions
}
