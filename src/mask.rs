//! Deterministic, monotonic reveal masks.
//!
//! A mask marks which positions of a fixed-length sequence are visible. The
//! positions are revealed in a shuffled order that depends only on the seed,
//! so revealing one more position never hides a previously revealed one.

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// Linear-congruential generator driving the shuffle.
#[derive(Debug, Clone, Copy)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        // (a * b + c) mod m only depends on a mod m, and reducing up front keeps
        // the multiplication far away from overflow.
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    fn next(&mut self) -> u64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state
    }
}

/// The shuffled reveal order for one `(length, seed)` family of masks.
///
/// Build it once and ask it for masks at any reveal count; every mask of the
/// family shares the same order, which is what makes reveals monotonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleOrder {
    order: Vec<usize>,
    rank: Vec<usize>,
}

impl ShuffleOrder {
    pub fn new(length: usize, seed: u64) -> Self {
        let mut order: Vec<usize> = (0..length).collect();
        let mut lcg = Lcg::new(seed);
        for i in (1..length).rev() {
            let j = (lcg.next() % (i as u64 + 1)) as usize;
            order.swap(i, j);
        }

        let mut rank = vec![0; length];
        for (position, &index) in order.iter().enumerate() {
            rank[index] = position;
        }

        Self { order, rank }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Indices in the order they get revealed.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Whether `index` is visible once `revealed` positions are shown.
    pub fn is_revealed(&self, index: usize, revealed: usize) -> bool {
        self.rank.get(index).is_some_and(|&rank| rank < revealed)
    }

    /// Materialize the mask for `revealed` visible positions (clamped to the length).
    pub fn mask(&self, revealed: usize) -> Vec<bool> {
        let mut mask = vec![false; self.len()];
        for &index in &self.order[..revealed.min(self.len())] {
            mask[index] = true;
        }
        mask
    }
}

/// Boolean mask of `length` entries with exactly `revealed` of them set.
///
/// Identical arguments always give identical masks, and the set of revealed
/// indices at `n` is a subset of the set at `n + 1`.
pub fn generate_mask(length: usize, revealed: usize, seed: u64) -> Vec<bool> {
    ShuffleOrder::new(length, seed).mask(revealed)
}
