//! Splits a trial count into contiguous `[start, end)` ranges so each worker
//! folds its own partial tally; trial seeds are derived from the absolute
//! trial index, so the split never changes results.

/// Split `total` items into up to `num_batches` ranges, as evenly as possible.
/// Earlier batches absorb the remainder.
///
/// # Example
/// ```
/// # use skirmish::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + usize::from(i < remainder);
        ranges.push((start, start + size));
        start += size;
    }
    ranges
}
