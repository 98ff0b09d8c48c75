//! MRU cache of known line-index/char-offset pairs
//!
//! Line/offset translation over a gap buffer is a linear scan, so lookups
//! start from the nearest previously resolved pair instead of the start of
//! the document. The table is tiny and fixed-size; probing it is cheaper
//! than any scan it saves.
//!
//! Slot 0 is pinned to `(0, 0)` forever: line index 0 always starts at
//! offset 0, even for an "empty" document, which still holds the synthetic
//! end-of-buffer marker. Pinning gives every search a valid fallback entry,
//! so callers never observe a miss.

use crate::constants::CACHE_SIZE;

/// Sentinel for an unoccupied slot. The `-1` participates in the distance
/// arithmetic of the nearest-match searches, which is why entries are stored
/// as `isize` pairs: a sentinel can never win against the pinned `(0, 0)`
/// slot for any non-negative query.
const EMPTY: (isize, isize) = (-1, -1);

/// Fixed-capacity MRU table mapping line indices (0-based) to the char
/// offset of the first character on that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionCache {
    entries: [(isize, isize); CACHE_SIZE],
}

impl PositionCache {
    pub fn new() -> Self {
        let mut entries = [EMPTY; CACHE_SIZE];
        entries[0] = (0, 0); // invariant line-index/char-offset relation
        Self { entries }
    }

    /// Return the entry whose line index is nearest to `line_index` and
    /// promote it to most-recently-used. Ties go to the lower slot.
    pub fn nearest_by_line(&mut self, line_index: usize) -> (usize, usize) {
        let mut nearest_match = 0;
        let mut nearest_distance = isize::MAX;
        for (i, entry) in self.entries.iter().enumerate() {
            let distance = (line_index as isize - entry.0).abs();
            if distance < nearest_distance {
                nearest_distance = distance;
                nearest_match = i;
            }
        }

        let nearest = self.entries[nearest_match];
        self.make_head(nearest_match);
        (nearest.0 as usize, nearest.1 as usize)
    }

    /// Return the entry whose stored offset is nearest to `char_offset` and
    /// promote it to most-recently-used. Ties go to the lower slot.
    pub fn nearest_by_offset(&mut self, char_offset: usize) -> (usize, usize) {
        let mut nearest_match = 0;
        let mut nearest_distance = isize::MAX;
        for (i, entry) in self.entries.iter().enumerate() {
            let distance = (char_offset as isize - entry.1).abs();
            if distance < nearest_distance {
                nearest_distance = distance;
                nearest_match = i;
            }
        }

        let nearest = self.entries[nearest_match];
        self.make_head(nearest_match);
        (nearest.0 as usize, nearest.1 as usize)
    }

    /// Record a freshly resolved pair. Line 0 is ignored - its slot is
    /// immutable. A line already present in a non-pinned slot is overwritten
    /// in place; otherwise the least-recently-used slot is evicted.
    pub fn update(&mut self, line_index: usize, char_offset: usize) {
        if line_index == 0 {
            return; // line 0 always has offset 0
        }

        if !self.replace_entry(line_index, char_offset) {
            self.insert_entry(line_index, char_offset);
        }
    }

    /// Reset every non-pinned entry holding an offset at or beyond
    /// `from_offset`. Called after every mutation with the lowest affected
    /// offset, since any cached offset past the edit point may be stale.
    pub fn invalidate_from(&mut self, from_offset: usize) {
        for entry in self.entries.iter_mut().skip(1) {
            if entry.1 >= from_offset as isize {
                *entry = EMPTY;
            }
        }
    }

    /// Move `entries[new_head]` to the front of the scan order. Slot 0 never
    /// moves; slot 1 is the most-recently-used position.
    fn make_head(&mut self, new_head: usize) {
        if new_head == 0 {
            return;
        }

        let temp = self.entries[new_head];
        for i in (2..=new_head).rev() {
            self.entries[i] = self.entries[i - 1];
        }
        self.entries[1] = temp;
    }

    fn replace_entry(&mut self, line_index: usize, char_offset: usize) -> bool {
        for entry in self.entries.iter_mut().skip(1) {
            if entry.0 == line_index as isize {
                entry.1 = char_offset as isize;
                return true;
            }
        }
        false
    }

    fn insert_entry(&mut self, line_index: usize, char_offset: usize) {
        // Rotate the furthest slot to the front, then overwrite it.
        self.make_head(CACHE_SIZE - 1);
        self.entries[1] = (line_index as isize, char_offset as isize);
    }
}

impl Default for PositionCache {
    fn default() -> Self {
        Self::new()
    }
}
