/// Continuous percentile over values already sorted ascending.
///
/// `fraction` is in `[0, 1]`. The position `fraction * (len - 1)` is linearly
/// interpolated between its two bracketing order statistics.
pub fn percentile_cont(sorted: &[u64], fraction: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&fraction) {
        return None;
    }

    let position = fraction * (sorted.len() - 1) as f64;
    let lower_index = position.floor() as usize;
    let upper_index = position.ceil() as usize;

    let lower = sorted[lower_index] as f64;
    if lower_index == upper_index || upper_index >= sorted.len() {
        return Some(lower);
    }

    let weight = position - lower_index as f64;
    let upper = sorted[upper_index] as f64;
    Some(lower + (upper - lower) * weight)
}

/// Median (50th percentile), sorting a copy of the input first.
pub fn median(values: &[u64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    percentile_cont(&sorted, 0.5)
}

pub fn mean(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: u128 = values.iter().map(|&v| v as u128).sum();
    Some(sum as f64 / values.len() as f64)
}

/// SQL `RANK()` over values already in ranking order: equal neighbours share a
/// rank and the next distinct value skips past the tie.
pub fn competition_ranks<T: PartialEq>(ordered: &[T]) -> Vec<u32> {
    let mut ranks: Vec<u32> = Vec::with_capacity(ordered.len());
    for (i, value) in ordered.iter().enumerate() {
        let rank = if i > 0 && ordered[i - 1] == *value {
            ranks[i - 1]
        } else {
            (i + 1) as u32
        };
        ranks.push(rank);
    }
    ranks
}
