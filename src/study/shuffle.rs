//! Uniform shuffles for presentation order

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

/// A uniformly random permutation of `0..len` (Fisher–Yates)
pub fn permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

/// Grow a permutation of `0..order.len()` to cover `0..len`.
///
/// Existing entries keep their positions; the new indices are shuffled
/// among themselves and appended.
pub fn extend_permutation<R: Rng + ?Sized>(order: &mut Vec<usize>, len: usize, rng: &mut R) {
    let mut added: Vec<usize> = (order.len()..len).collect();
    added.shuffle(rng);
    order.extend(added);
}

/// Whether `order` is a permutation of `0..len`
pub fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = HashSet::with_capacity(len);
    order.iter().all(|&i| i < len && seen.insert(i))
}
