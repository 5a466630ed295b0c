//! Transposition table: direct-mapped, power-of-two sized, always-replace.
//!
//! The table memoizes search results; it is never load-bearing for
//! correctness. Entries store the full 64-bit key for verification, so an
//! index collision can only waste a probe, not corrupt a result.

use meitner_core::mov::Move;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// What a stored score proves about the node it came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, FromPrimitive)]
#[repr(u8)]
pub enum Bound {
    Exact = 0,
    Lower = 1,
    Upper = 2,
}

/// One table slot.
#[derive(Clone, Debug)]
pub struct Entry {
    key: u64,
    score: i32,
    depth: u8,
    bound: u8,
    mov: Move,
}

impl Entry {
    #[inline(always)]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// The stored score, still in node-relative mate form; callers convert
    /// with `score::score_from_tt`.
    #[inline(always)]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[inline(always)]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[inline(always)]
    pub fn bound(&self) -> Bound {
        Bound::from_u8(self.bound).expect("bound byte is always written from a Bound")
    }

    #[inline(always)]
    pub fn mov(&self) -> Move {
        self.mov
    }
}

impl Default for Entry {
    fn default() -> Self {
        Entry {
            key: 0,
            score: 0,
            depth: 0,
            bound: Bound::Exact as u8,
            mov: Move::null(),
        }
    }
}

pub struct TranspositionTable {
    entries: Vec<Entry>,
    mask: usize,
}

impl TranspositionTable {
    /// Creates a table using roughly `mb` megabytes, rounded down to a
    /// power-of-two entry count so indexing is a mask.
    pub fn new(mb: usize) -> Self {
        let mut tt = TranspositionTable {
            entries: Vec::new(),
            mask: 0,
        };
        tt.resize(mb);
        tt
    }

    /// Resizes to roughly `mb` megabytes, discarding all entries.
    pub fn resize(&mut self, mb: usize) {
        let count = Self::entry_count_from_mb(mb);
        self.entries.clear();
        self.entries.resize(count, Entry::default());
        self.mask = count - 1;
    }

    fn entry_count_from_mb(mb: usize) -> usize {
        let desired = mb.max(1) * 1024 * 1024 / std::mem::size_of::<Entry>();
        // Round down to a power of two.
        1 << (usize::BITS - 1 - desired.leading_zeros())
    }

    /// Number of slots.
    #[inline(always)]
    pub fn capacity_entries(&self) -> usize {
        self.mask + 1
    }

    /// Actual size in megabytes.
    pub fn capacity_mb(&self) -> usize {
        self.capacity_entries() * std::mem::size_of::<Entry>() / 1024 / 1024
    }

    /// Zeroes every slot.
    pub fn clear(&mut self) {
        self.entries.fill(Entry::default());
    }

    #[inline(always)]
    fn idx(&self, key: u64) -> usize {
        key as usize & self.mask
    }

    /// Unconditionally overwrites the slot for `key`.
    pub fn store(&mut self, key: u64, score: i32, depth: u8, bound: Bound, mov: Move) {
        let idx = self.idx(key);
        self.entries[idx] = Entry {
            key,
            score,
            depth,
            bound: bound as u8,
            mov,
        };
    }

    /// Returns the entry for `key` regardless of depth. Used for move
    /// ordering and principal-variation walking.
    #[inline]
    pub fn probe(&self, key: u64) -> Option<&Entry> {
        let entry = &self.entries[self.idx(key)];
        if entry.key == key {
            Some(entry)
        } else {
            None
        }
    }

    /// Returns the entry for `key` only if it was searched at least
    /// `depth` deep.
    #[inline]
    pub fn lookup(&self, key: u64, depth: u8) -> Option<&Entry> {
        self.probe(key).filter(|entry| entry.depth >= depth)
    }

    /// Rough fill factor per mille, sampled over the first thousand slots.
    pub fn hashfull(&self) -> usize {
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample]
            .iter()
            .filter(|e| e.key != 0)
            .count();
        used * 1000 / sample
    }
}
