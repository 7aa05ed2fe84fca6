//! Algorithms for uniform random sampling from iterators of known length. They are written to be
//! generic over the container type so that callers can sample node ids straight out of a graph
//! without collecting them first.

use crate::rand::seq::index::sample as choose_range;
use crate::rand::Rng;

/// Sample a random element uniformly from a container of known length.
///
/// We do not assume the container is randomly indexable, only that it can be iterated over.
/// Exactly one value is drawn from `rng` when the container is not empty, and none otherwise.
pub fn sample_single_from_known_length<I, R, T>(rng: &mut R, mut iter: I) -> Option<T>
where
    R: Rng,
    I: ExactSizeIterator<Item = T>,
{
    let len = iter.len();
    if len == 0 {
        return None;
    }
    let index = rng.random_range(0..len);
    // The set need not be randomly indexable, so we have to use the `nth` method.
    iter.nth(index)
}

/// Sample multiple random elements uniformly without replacement from a container of known
/// length. The selected elements are returned in iteration order. If more samples are requested
/// than are in the container, every element is returned.
pub fn sample_multiple_from_known_length<I, R, T>(rng: &mut R, iter: I, requested: usize) -> Vec<T>
where
    R: Rng,
    I: ExactSizeIterator<Item = T>,
{
    let requested = requested.min(iter.len());
    if requested == 0 {
        return Vec::new();
    }

    let mut indexes = Vec::with_capacity(requested);
    indexes.extend(choose_range(rng, iter.len(), requested));
    indexes.sort_unstable();
    let mut index_iterator = indexes.into_iter().peekable();
    let mut selected = Vec::with_capacity(requested);

    for (idx, item) in iter.enumerate() {
        match index_iterator.peek() {
            Some(&next_idx) if next_idx == idx => {
                selected.push(item);
                index_iterator.next();
            }
            Some(_) => {}
            None => break,
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::HashSet;

    #[test]
    fn single_from_empty_is_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        let empty: Vec<u32> = Vec::new();
        assert_eq!(sample_single_from_known_length(&mut rng, empty.iter()), None);
    }

    #[test]
    fn single_is_reproducible() {
        let data: Vec<u32> = (0..50).collect();
        let mut a = SmallRng::seed_from_u64(9);
        let mut b = SmallRng::seed_from_u64(9);
        for _ in 0..20 {
            assert_eq!(
                sample_single_from_known_length(&mut a, data.iter()),
                sample_single_from_known_length(&mut b, data.iter())
            );
        }
    }

    #[test]
    fn multiple_basic() {
        let data: Vec<u32> = (0..1000).collect();
        let requested = 100;
        let mut rng = SmallRng::seed_from_u64(42);
        let sample = sample_multiple_from_known_length(&mut rng, data.iter().copied(), requested);

        assert_eq!(sample.len(), requested);
        assert!(sample.iter().all(|v| *v < 1000));
        // Returned in iteration order without duplicates
        assert!(sample.windows(2).all(|w| w[0] < w[1]));
        let unique: HashSet<_> = sample.iter().collect();
        assert_eq!(unique.len(), sample.len());
    }

    #[test]
    fn multiple_more_than_available() {
        let data: Vec<u32> = (0..5).collect();
        let mut rng = SmallRng::seed_from_u64(42);
        let sample = sample_multiple_from_known_length(&mut rng, data.iter().copied(), 10);
        assert_eq!(sample, data);
        assert!(sample_multiple_from_known_length(&mut rng, data.iter(), 0).is_empty());
    }

    // Draws many single samples from ten values and compares the histogram with the uniform
    // expectation using a chi-square statistic with 9 degrees of freedom.
    #[test]
    fn single_is_uniform() {
        let data: Vec<usize> = (0..10).collect();
        let draws = 20_000;
        let mut counts = [0usize; 10];
        let mut rng = SmallRng::seed_from_u64(2024);
        for _ in 0..draws {
            let value = sample_single_from_known_length(&mut rng, data.iter().copied()).unwrap();
            counts[value] += 1;
        }

        let expected = draws as f64 / 10.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&obs| {
                let diff = (obs as f64) - expected;
                diff * diff / expected
            })
            .sum();

        // Critical χ²₀.₉₉₉ for df=9 is 27.877
        assert!(
            chi_square < 27.877,
            "sample is not uniform: χ² = {}, counts = {:?}",
            chi_square,
            counts
        );
    }
}
