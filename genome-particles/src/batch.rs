//! Williams batch sizing for streaming large particle sets.

/// Advisory chunk size `max(1, ⌊√n · log₂ n⌋)`, 1 for `n <= 0`.
///
/// Grows as O(√n log n) so per-batch memory stays bounded while the batch
/// count stays manageable from thousands to tens of millions of elements.
pub fn williams_batch_size(n: i64) -> usize {
    if n <= 0 {
        return 1;
    }

    let n = n as f64;
    ((n.sqrt() * n.log2()).floor() as usize).max(1)
}
