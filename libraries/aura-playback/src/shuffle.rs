//! Shuffle order generation
//!
//! Orders are permutations of queue indices; the tracks themselves never
//! move, so turning shuffle off restores the handed-over order exactly.

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Random play order over `len` items
///
/// When `first` is given that index stays at the front and only the rest
/// is shuffled (Fisher-Yates).
pub fn shuffled_order(len: usize, first: Option<usize>) -> Vec<usize> {
    shuffled_order_with(&mut thread_rng(), len, first)
}

/// [`shuffled_order`] with an explicit random source
pub fn shuffled_order_with<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    first: Option<usize>,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();

    match first.filter(|&i| i < len) {
        Some(first) => {
            order.swap(0, first);
            order[1..].shuffle(rng);
        }
        None => order.shuffle(rng),
    }

    order
}
