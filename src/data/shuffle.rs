// ============================================================
// Layer 4 - Seeded Shuffle
// ============================================================
// Reorders parallel collections with ONE permutation so that
// sentence i and label i stay together after shuffling.
//
// How it works:
//   1. Seed a ChaCha8 generator from the caller's seed
//   2. Fisher-Yates shuffle the index list 0..n
//   3. Apply that index list to every parallel collection
//
// ChaCha8 output is fixed for a given seed on every platform,
// so the same seed and the same length always give the same
// permutation.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Permutation of 0..len derived from `seed`.
///
/// Position i of the result holds the original index that
/// ends up at position i.
pub fn permutation(len: usize, seed: u64) -> Vec<usize> {
    let mut rng   = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(&mut rng);
    order
}

/// Reorder `items` so that position i holds `items[order[i]]`.
///
/// `order` must be a permutation of 0..items.len().
pub fn apply_permutation<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    debug_assert_eq!(items.len(), order.len());

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order
        .iter()
        .filter_map(|&i| slots.get_mut(i).and_then(Option::take))
        .collect()
}

/// Shuffle two parallel vectors with the same seeded permutation.
pub fn shuffle_pair<A, B>(a: Vec<A>, b: Vec<B>, seed: u64) -> (Vec<A>, Vec<B>) {
    let order = permutation(a.len(), seed);

    tracing::debug!("Shuffling {} paired items with seed {}", order.len(), seed);

    (apply_permutation(a, &order), apply_permutation(b, &order))
}
