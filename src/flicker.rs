use crate::color::ColorPair;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// A colour together with the moment it was rolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldColor {
    pub color: ColorPair,
    pub last_change: f64,
}

/// Per-key colour memory that keeps a flickering glyph on one colour for at
/// least `hold` seconds before a new one may be rolled.
#[derive(Debug, Clone)]
pub struct FlickerHold<K> {
    hold: f64,
    states: HashMap<K, HeldColor>,
}

impl<K: Eq + Hash> FlickerHold<K> {
    pub fn new(hold_ms: u64) -> Self {
        Self {
            hold: hold_ms as f64 / 1000.0,
            states: HashMap::new(),
        }
    }

    /// The colour to show for `key` at `now`, rolling a fresh one when nothing
    /// is held yet or the hold has run out.
    pub fn color_for(&mut self, key: K, now: f64, roll: impl FnOnce() -> ColorPair) -> ColorPair {
        match self.states.entry(key) {
            Entry::Occupied(mut entry) => {
                if now - entry.get().last_change > self.hold {
                    entry.insert(HeldColor {
                        color: roll(),
                        last_change: now,
                    });
                }
                entry.get().color
            }
            Entry::Vacant(entry) => {
                entry
                    .insert(HeldColor {
                        color: roll(),
                        last_change: now,
                    })
                    .color
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&HeldColor> {
        self.states.get(key)
    }

    pub fn forget(&mut self, key: &K) {
        self.states.remove(key);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
