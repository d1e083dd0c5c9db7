//! Primitive samplers shared by every entity generator.
//!
//! All functions are total: empty inputs yield `None` or an empty
//! result, never a panic.

use crate::rng::RandomSource;
use chrono::{DateTime, Duration, Utc};

/// Index of a weight-proportional draw over `weights`.
///
/// Negative weights count as zero. Floating-point drift past the end
/// of the cumulative walk falls back to the last index, which also
/// covers the all-zero case.
pub fn weighted_index<R: RandomSource + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    let mut roll = rng.next_f64() * total;
    for (i, w) in weights.iter().enumerate() {
        let w = w.max(0.0);
        if roll < w {
            return Some(i);
        }
        roll -= w;
    }
    Some(weights.len() - 1)
}

/// Pick one of `items` with probability proportional to the parallel
/// `weights`. Mismatched lengths use the shorter prefix.
pub fn weighted_choice<'a, T, R: RandomSource + ?Sized>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut R,
) -> Option<&'a T> {
    let n = items.len().min(weights.len());
    weighted_index(&weights[..n], rng).map(|i| &items[i])
}

/// Weighted draw over `(value, weight)` pairs, the shape config tables use.
pub fn weighted_pair<'a, T, R: RandomSource + ?Sized>(
    pairs: &'a [(T, f64)],
    rng: &mut R,
) -> Option<&'a T> {
    let weights: Vec<f64> = pairs.iter().map(|(_, w)| *w).collect();
    weighted_index(&weights, rng).map(|i| &pairs[i].0)
}

/// Uniform float in [min, max).
pub fn uniform<R: RandomSource + ?Sized>(min: f64, max: f64, rng: &mut R) -> f64 {
    min + (max - min) * rng.next_f64()
}

/// Uniform integer in [min, max], inclusive on both ends.
pub fn uniform_int<R: RandomSource + ?Sized>(min: u64, max: u64, rng: &mut R) -> u64 {
    if max <= min {
        return min;
    }
    min + rng.next_u64_below(max - min + 1)
}

/// Uniform pick from a slice.
pub fn pick<'a, T, R: RandomSource + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    Some(&items[rng.next_u64_below(items.len() as u64) as usize])
}

/// `n` distinct picks (fewer if the slice is shorter), in draw order.
/// Partial Fisher-Yates over an index vector.
pub fn pick_distinct<'a, T, R: RandomSource + ?Sized>(
    items: &'a [T],
    n: usize,
    rng: &mut R,
) -> Vec<&'a T> {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    let take = n.min(items.len());
    for i in 0..take {
        let j = i + rng.next_u64_below((indices.len() - i) as u64) as usize;
        indices.swap(i, j);
    }
    indices[..take].iter().map(|&i| &items[i]).collect()
}

/// Uniform instant in [start, end). Returns `start` for an empty span.
pub fn date_between<R: RandomSource + ?Sized>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rng: &mut R,
) -> DateTime<Utc> {
    let span_ms = (end - start).num_milliseconds();
    if span_ms <= 0 {
        return start;
    }
    start + Duration::milliseconds(rng.next_u64_below(span_ms as u64) as i64)
}

/// Uniform instant between `max_days` and `min_days` before `now`.
pub fn days_ago<R: RandomSource + ?Sized>(
    now: DateTime<Utc>,
    min_days: f64,
    max_days: f64,
    rng: &mut R,
) -> DateTime<Utc> {
    let days = uniform(min_days, max_days, rng);
    now - Duration::seconds((days * 86_400.0) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GeneratorSlot, RngBank};

    /// Replays a fixed list of unit-interval values.
    struct Scripted {
        values: Vec<f64>,
        at: usize,
    }

    impl RandomSource for Scripted {
        fn next_u64(&mut self) -> u64 {
            let v = self.values[self.at % self.values.len()];
            self.at += 1;
            ((v * (1u64 << 53) as f64) as u64) << 11
        }
    }

    fn scripted(values: &[f64]) -> Scripted {
        Scripted { values: values.to_vec(), at: 0 }
    }

    #[test]
    fn weighted_choice_walks_cumulative_weights() {
        let items = ["a", "b", "c"];
        let weights = [1.0, 2.0, 1.0];
        // total 4: a=[0,1) b=[1,3) c=[3,4)
        assert_eq!(weighted_choice(&items, &weights, &mut scripted(&[0.10])), Some(&"a"));
        assert_eq!(weighted_choice(&items, &weights, &mut scripted(&[0.30])), Some(&"b"));
        assert_eq!(weighted_choice(&items, &weights, &mut scripted(&[0.74])), Some(&"b"));
        assert_eq!(weighted_choice(&items, &weights, &mut scripted(&[0.80])), Some(&"c"));
    }

    #[test]
    fn empty_and_zero_weights_are_total() {
        let empty: [u8; 0] = [];
        let mut rng = RngBank::new(1).for_generator(GeneratorSlot::Customer, 0);
        assert_eq!(weighted_choice(&empty, &[], &mut rng), None);
        assert_eq!(weighted_choice(&[1, 2, 3], &[0.0, 0.0, 0.0], &mut rng), Some(&3));
        assert_eq!(weighted_choice(&[1, 2, 3], &[1.0], &mut rng), Some(&1));
    }

    #[test]
    fn pick_distinct_never_repeats() {
        let mut rng = RngBank::new(5).for_generator(GeneratorSlot::Insight, 0);
        let items = [1, 2, 3, 4, 5, 6];
        for _ in 0..200 {
            let mut picked: Vec<i32> = pick_distinct(&items, 3, &mut rng).into_iter().copied().collect();
            picked.sort_unstable();
            picked.dedup();
            assert_eq!(picked.len(), 3);
        }
        assert_eq!(pick_distinct(&items, 10, &mut rng).len(), 6);
    }

    #[test]
    fn date_between_respects_bounds() {
        let mut rng = RngBank::new(3).for_generator(GeneratorSlot::Transaction, 0);
        let end = Utc::now();
        let start = end - Duration::days(10);
        for _ in 0..1_000 {
            let d = date_between(start, end, &mut rng);
            assert!(d >= start && d < end);
        }
        assert_eq!(date_between(end, start, &mut rng), end);
    }
}
