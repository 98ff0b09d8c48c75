//! Gap buffer implementation for efficient text editing
//!
//! The character store keeps its free capacity as a movable "gap" inside the
//! backing array, so a run of inserts and deletes near the same spot touches
//! only the characters between the old and new edit point. Line numbering is
//! maintained incrementally and line/offset translation starts from the
//! nearest entry of an MRU [`PositionCache`] instead of the document start.
//!
//! All public positions are logical character offsets (the text with the gap
//! removed). The logical-to-real mapping lives in exactly two helpers,
//! [`GapBuffer::real_index`] and [`GapBuffer::logical_index`]; scans that
//! walk the raw array skip the gap at the boundary instead of re-deriving
//! the mapping.

pub mod position_cache;

use crate::constants::{EOF_CHAR, INITIAL_CAPACITY, NEWLINE};
use crate::error::{CoreError, ErrorKind, Result};
use position_cache::PositionCache;
use std::cell::RefCell;
use std::fmt::{self, Display};

/// Text buffer with a movable gap and an incrementally maintained line count.
///
/// # Offset validity
///
/// The hot-path primitives (`char_at`, `insert`, `delete`, `substring`) do
/// not return errors for out-of-range offsets: the contract is that callers
/// pass valid logical offsets. Unlike the reference design, an invalid
/// offset here fails fast - a `debug_assert` plus the backing slice's own
/// bounds check - rather than silently desynchronizing the gap. Line-number
/// queries, by contrast, take arbitrary input and report invalid lines as
/// [`CoreError`]s.
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// Backing store: `[text-before-gap | gap | text-after-gap]`
    contents: Vec<char>,
    /// First index of the gap (first unused slot)
    gap_start: usize,
    /// One past the last gap slot (first used slot after the gap)
    gap_end: usize,
    /// Number of newline characters + 1; always >= 1
    line_count: usize,
    /// Cache of resolved line/offset pairs; interior mutability so that
    /// read-only queries can promote and record entries
    cache: RefCell<PositionCache>,
}

impl GapBuffer {
    /// Create an empty buffer with the default initial capacity
    pub fn new() -> Self {
        GapBuffer {
            contents: vec!['\0'; INITIAL_CAPACITY],
            gap_start: 0,
            gap_end: INITIAL_CAPACITY,
            line_count: 1,
            cache: RefCell::new(PositionCache::new()),
        }
    }

    /// Create a buffer pre-loaded with `text`
    pub fn from_str(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.insert(0, text);
        buffer
    }

    /// Adopt an existing character vector as the buffer contents. The gap
    /// starts empty; the line count is seeded by scanning for newlines.
    pub fn from_chars(chars: Vec<char>) -> Self {
        let len = chars.len();
        let line_count = 1 + chars.iter().filter(|&&c| c == NEWLINE).count();
        GapBuffer {
            contents: chars,
            gap_start: len,
            gap_end: len,
            line_count,
            cache: RefCell::new(PositionCache::new()),
        }
    }

    /// Current logical character count (excluding the gap)
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len() - self.gap_size()
    }

    /// Check if the buffer holds no characters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of lines; at least 1 even for an empty buffer
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Character at logical `offset`.
    ///
    /// No range check beyond fail-fast: an invalid offset panics instead of
    /// returning garbage. Callers own offset validity.
    #[must_use]
    pub fn char_at(&self, offset: usize) -> char {
        debug_assert!(offset < self.len(), "char_at: offset {offset} out of range");
        self.contents[self.real_index(offset)]
    }

    /// Characters in `[start, end)` in logical order, skipping the gap.
    /// `end` is clamped to `len()`.
    #[must_use]
    pub fn substring(&self, start: usize, end: usize) -> String {
        debug_assert!(start <= self.len(), "substring: start {start} out of range");
        let end = end.min(self.len());
        if start >= end {
            return String::new();
        }

        let mut text = String::with_capacity(end - start);
        let mut real = self.real_index(start);
        for _ in start..end {
            text.push(self.contents[real]);
            real += 1;
            // skip the gap
            if real == self.gap_start {
                real = self.gap_end;
            }
        }
        text
    }

    /// Offset of the first character of 1-based line `line_number`.
    ///
    /// Resolution starts from the nearest cached line/offset pair and scans
    /// forward or backward from there; a successful resolution feeds the
    /// cache for the next query.
    pub fn line_start_offset(&self, line_number: usize) -> Result<usize> {
        if line_number == 0 || line_number > self.line_count {
            return Err(CoreError::new(
                ErrorKind::InvalidLine,
                crate::constants::errors::INVALID_LINE,
                format!("line {line_number} outside 1..={}", self.line_count),
            ));
        }

        let line_index = line_number - 1;
        // start the search from the nearest known line/offset pair
        let (cache_line, cache_offset) = self.cache.borrow_mut().nearest_by_line(line_index);

        let offset = if line_index > cache_line {
            self.find_offset_forward(line_index, cache_line, cache_offset)
        } else if line_index < cache_line {
            self.find_offset_backward(line_index, cache_line, cache_offset)
        } else {
            Some(cache_offset)
        };

        match offset {
            Some(offset) => {
                // seek successful
                self.cache.borrow_mut().update(line_index, offset);
                Ok(offset)
            }
            None => Err(CoreError::critical(
                ErrorKind::Internal,
                crate::constants::errors::OFFSET_NOT_FOUND,
                format!("scan exhausted resolving line {line_number}"),
            )),
        }
    }

    /// Number of characters on 1-based line `line_number`, up to but not
    /// including its newline or the end-of-buffer marker. 0 if the line
    /// does not exist.
    #[must_use]
    pub fn line_length(&self, line_number: usize) -> usize {
        let Ok(start) = self.line_start_offset(line_number) else {
            return 0;
        };

        let mut length = 0;
        let mut real = self.real_index(start);
        while real < self.contents.len()
            && self.contents[real] != NEWLINE
            && self.contents[real] != EOF_CHAR
        {
            length += 1;
            real += 1;
            // skip the gap
            if real == self.gap_start {
                real = self.gap_end;
            }
        }
        length
    }

    /// Text of 1-based line `line_number`, without its terminator
    pub fn line_text(&self, line_number: usize) -> Result<String> {
        let start = self.line_start_offset(line_number)?;
        let length = self.line_length(line_number);
        Ok(self.substring(start, start + length))
    }

    /// 1-based line number containing `char_offset`, or 0 if the offset is
    /// unreachable. 0 cannot occur for a valid offset; callers treat it as
    /// an internal consistency failure, not as line zero.
    #[must_use]
    pub fn line_of(&self, char_offset: usize) -> usize {
        debug_assert!(char_offset <= self.len(), "line_of: offset {char_offset} out of range");

        let (cache_line, cache_offset) = self.cache.borrow_mut().nearest_by_offset(char_offset);
        let mut line = cache_line;
        let mut real = self.real_index(cache_offset);
        let target = self.real_index(char_offset);
        // last newline boundary crossed, as (line, first offset of line)
        let mut last_known: Option<(usize, usize)> = None;

        if target > real {
            // search forward
            while real < target && real < self.contents.len() {
                if self.contents[real] == NEWLINE {
                    line += 1;
                    last_known = Some((line, self.logical_index(real) + 1));
                }

                real += 1;
                // skip the gap
                if real == self.gap_start {
                    real = self.gap_end;
                }
            }
        } else if target < real {
            // search backward
            while real > target && real > 0 {
                // skip behind the gap
                if real == self.gap_end {
                    real = self.gap_start;
                }
                real -= 1;

                if self.contents[real] == NEWLINE {
                    last_known = Some((line, self.logical_index(real) + 1));
                    debug_assert!(line > 0, "line_of: newline above line 0");
                    line -= 1;
                }
            }
        }

        if real == target {
            if let Some((known_line, known_offset)) = last_known {
                self.cache.borrow_mut().update(known_line, known_offset);
            }
            line + 1
        } else {
            0
        }
    }

    /// Insert `text` at logical `offset`. Shifts the gap to the insertion
    /// point, growing the backing array when the gap cannot hold `text`.
    pub fn insert(&mut self, offset: usize, text: &str) {
        debug_assert!(offset <= self.len(), "insert: offset {offset} out of range");

        let insert_index = self.real_index(offset);

        // shift gap to the insertion point, whichever direction is shorter
        if insert_index != self.gap_end {
            if insert_index < self.gap_start {
                self.shift_gap_left(insert_index);
            } else {
                self.shift_gap_right(insert_index);
            }
        }

        let length = text.chars().count();
        if length >= self.gap_size() {
            self.expand_buffer(length - self.gap_size());
        }

        for c in text.chars() {
            if c == NEWLINE {
                self.line_count += 1;
            }
            self.contents[self.gap_start] = c;
            self.gap_start += 1;
        }

        self.cache.borrow_mut().invalidate_from(offset);
    }

    /// Insert `text` at the end of the buffer
    pub fn append(&mut self, text: &str) {
        self.insert(self.len(), text);
    }

    /// Delete the logical range `[start, end)`. The range must be ordered
    /// and in bounds.
    pub fn delete(&mut self, start: usize, end: usize) {
        debug_assert!(start <= end, "delete: start {start} > end {end}");
        debug_assert!(end <= self.len(), "delete: end {end} out of range");

        // shift gap so that it begins exactly at the range end
        if end != self.gap_start {
            if end < self.gap_start {
                self.shift_gap_left(end);
            } else {
                self.shift_gap_right(end + self.gap_size());
            }
        }

        // swallow the range into the gap
        for _ in 0..(end - start) {
            self.gap_start -= 1;
            if self.contents[self.gap_start] == NEWLINE {
                self.line_count -= 1;
            }
        }

        self.cache.borrow_mut().invalidate_from(start);
    }

    /// Replace `[start, end)` with `text`: a delete followed by an insert,
    /// not an atomic primitive. The cache is invalidated by both halves.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) {
        self.delete(start, end);
        self.insert(start, text);
    }

    /// Characters sitting inside the gap, starting at `gap_start`.
    ///
    /// After a deletion the swallowed characters remain physically intact at
    /// the front of the gap until the next mutation moves or overwrites it.
    /// The edit log uses this window to materialize delete payloads lazily;
    /// nothing else should.
    pub(crate) fn gap_text(&self, char_count: usize) -> String {
        debug_assert!(
            self.gap_start + char_count <= self.gap_end,
            "gap_text: {char_count} chars exceeds gap size"
        );
        self.contents[self.gap_start..self.gap_start + char_count]
            .iter()
            .collect()
    }

    /// Map a logical offset to its index in the backing array
    fn real_index(&self, offset: usize) -> usize {
        if offset < self.gap_start {
            offset
        } else {
            offset + self.gap_size()
        }
    }

    /// Map a backing-array index to its logical offset
    fn logical_index(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index - self.gap_size()
        }
    }

    fn gap_size(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Move the gap left so that `gap_start == new_gap_start`
    fn shift_gap_left(&mut self, new_gap_start: usize) {
        while self.gap_start > new_gap_start {
            self.gap_end -= 1;
            self.gap_start -= 1;
            self.contents[self.gap_end] = self.contents[self.gap_start];
        }
    }

    /// Move the gap right so that `gap_end == new_gap_end`
    fn shift_gap_right(&mut self, new_gap_end: usize) {
        while self.gap_end < new_gap_end {
            self.contents[self.gap_start] = self.contents[self.gap_end];
            self.gap_start += 1;
            self.gap_end += 1;
        }
    }

    /// Reallocate the backing array with a wider gap. The growth amount
    /// doubles the capacity with a small floor so repeated inserts
    /// amortize.
    fn expand_buffer(&mut self, min_increment: usize) {
        let increase = min_increment.max(self.contents.len() * 2 + 2);
        let mut grown = vec!['\0'; self.contents.len() + increase];

        grown[..self.gap_start].copy_from_slice(&self.contents[..self.gap_start]);
        let after_gap = self.contents.len() - self.gap_end;
        if after_gap > 0 {
            let new_gap_end = self.gap_end + increase;
            grown[new_gap_end..].copy_from_slice(&self.contents[self.gap_end..]);
        }

        self.gap_end += increase;
        self.contents = grown;
    }

    /// Scan forward from a known `(start_line, start_offset)` pair to the
    /// first character of `target_line`. `None` when the scan runs off the
    /// end of the buffer before reaching the target line.
    fn find_offset_forward(
        &self,
        target_line: usize,
        start_line: usize,
        start_offset: usize,
    ) -> Option<usize> {
        let mut line = start_line;
        let mut real = self.real_index(start_offset);

        while line < target_line && real < self.contents.len() {
            if self.contents[real] == NEWLINE {
                line += 1;
            }
            real += 1;

            // skip the gap
            if real == self.gap_start {
                real = self.gap_end;
            }
        }

        if line != target_line {
            return None;
        }
        Some(self.logical_index(real))
    }

    /// Scan backward from a known `(start_line, start_offset)` pair to the
    /// newline terminating line `target_line - 1`; the target's first
    /// character is one past it. Line index 0 is always offset 0.
    fn find_offset_backward(
        &self,
        target_line: usize,
        start_line: usize,
        start_offset: usize,
    ) -> Option<usize> {
        if target_line == 0 {
            return Some(0);
        }

        let mut line = start_line;
        let mut real = self.real_index(start_offset);

        while line >= target_line {
            // skip behind the gap
            if real == self.gap_end {
                real = self.gap_start;
            }
            if real == 0 {
                return None;
            }
            real -= 1;

            if self.contents[real] == NEWLINE {
                line -= 1;
            }
        }

        // now at the newline of the line before target_line
        Some(self.logical_index(real) + 1)
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.substring(0, self.len()))
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
