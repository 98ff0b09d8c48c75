//! Undo/Redo history with time-proximity coalescing
//!
//! The log is two stacks merged into one `Vec` with a movable `top` cursor:
//! entries below `top` are undoable, entries at or above it are redoable.
//! Consecutive same-kind edits that touch (insert appends, backspace runs)
//! and land within the merge window extend the previous entry instead of
//! pushing a new one, so "type a burst" undoes as one step. Explicit groups
//! (batch edits) tie programmatic compound edits into one undo unit.
//!
//! Payload text is captured lazily: an entry that is still extendable holds
//! no copy of its text, only its span. The payload is materialized the
//! moment the entry becomes immutable history - when the next edit is
//! pushed, or when the entry itself is undone.

use crate::buffer::GapBuffer;
use crate::constants::{MAX_UNDO_ENTRIES, MERGE_WINDOW_MS};

/// What a logged edit did to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
}

/// One reversible edit span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    kind: EditKind,
    /// Logical start of the span
    start: usize,
    /// Logical end of the span (exclusive)
    end: usize,
    /// Entries sharing a group id undo and redo together
    group_id: u64,
    /// Time of the edit, milliseconds; drives merge eligibility
    timestamp_ms: u64,
    /// Payload text, captured once the entry stops being extendable
    text: Option<String>,
}

impl Command {
    /// Pin down the payload while it is still recoverable from the buffer.
    ///
    /// For an insert the span is still present in the buffer. For a delete
    /// the swallowed characters still sit inside the gap, which holds until
    /// the next buffer mutation - and this is only called before one.
    fn materialize(&mut self, buffer: &GapBuffer) {
        if self.text.is_some() {
            return;
        }
        self.text = Some(match self.kind {
            EditKind::Insert => buffer.substring(self.start, self.end),
            EditKind::Delete => buffer.gap_text(self.end - self.start),
        });
    }

    /// Reverse this edit on the buffer; returns the suggested caret
    fn undo(&mut self, buffer: &mut GapBuffer) -> usize {
        self.materialize(buffer);
        match self.kind {
            EditKind::Insert => {
                buffer.delete(self.start, self.end);
                self.start
            }
            EditKind::Delete => {
                buffer.insert(self.start, self.text.as_deref().unwrap_or(""));
                self.end
            }
        }
    }

    /// Re-apply this edit on the buffer; returns the suggested caret.
    /// Only reachable after `undo`, so the payload is always materialized.
    fn redo(&mut self, buffer: &mut GapBuffer) -> usize {
        match self.kind {
            EditKind::Insert => {
                buffer.insert(self.start, self.text.as_deref().unwrap_or(""));
                self.end
            }
            EditKind::Delete => {
                buffer.delete(self.start, self.end);
                self.start
            }
        }
    }
}

/// Bounded undo/redo log over a [`GapBuffer`]
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: Vec<Command>,
    /// Entries below `top` are undoable; entries at/above it are redoable
    top: usize,
    /// Group id for the next pushed entry
    group_id: u64,
    /// While set, pushes do not advance the group id
    batch_edit: bool,
    merge_window_ms: u64,
    max_entries: usize,
}

impl UndoStack {
    /// Create a log with the default merge window and capacity
    pub fn new() -> Self {
        Self::with_config(MERGE_WINDOW_MS, MAX_UNDO_ENTRIES)
    }

    /// Create a log with a custom merge window and capacity
    pub fn with_config(merge_window_ms: u64, max_entries: usize) -> Self {
        UndoStack {
            entries: Vec::new(),
            top: 0,
            group_id: 0,
            batch_edit: false,
            merge_window_ms,
            max_entries,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.top > 0
    }

    pub fn can_redo(&self) -> bool {
        self.top < self.entries.len()
    }

    /// Total number of logged entries, undoable and redoable
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_batch_edit(&self) -> bool {
        self.batch_edit
    }

    /// Suppress group-id advancement so subsequent edits form one undo unit
    pub fn begin_batch_edit(&mut self) {
        self.batch_edit = true;
    }

    /// Close the current batch; the next edit starts a fresh group
    pub fn end_batch_edit(&mut self) {
        self.batch_edit = false;
        self.group_id += 1;
    }

    /// Record an insertion of `[start, end)` about to be applied to the
    /// buffer. Must be called before the mutation itself.
    pub fn capture_insert(&mut self, buffer: &GapBuffer, start: usize, end: usize, timestamp_ms: u64) {
        if self.merge_into_insert(start, end, timestamp_ms) {
            return;
        }
        self.push(
            buffer,
            Command {
                kind: EditKind::Insert,
                start,
                end,
                group_id: self.group_id,
                timestamp_ms,
                text: None,
            },
        );
    }

    /// Record a deletion of `[start, end)` about to be applied to the
    /// buffer. Must be called before the mutation itself.
    pub fn capture_delete(&mut self, buffer: &GapBuffer, start: usize, end: usize, timestamp_ms: u64) {
        if self.merge_into_delete(start, end, timestamp_ms) {
            return;
        }
        self.push(
            buffer,
            Command {
                kind: EditKind::Delete,
                start,
                end,
                group_id: self.group_id,
                timestamp_ms,
                text: None,
            },
        );
    }

    /// Reconcile the log with an insertion of `length` characters at
    /// `offset` about to be applied outside capture. Must be called before
    /// the mutation itself.
    ///
    /// The pending payload is pinned down while the buffer still holds it,
    /// the redo tail is abandoned, and every recorded span is shifted past
    /// the edit point so later undos land on the text they recorded. An
    /// insertion splitting a recorded span leaves that entry and everything
    /// older unrecoverable; those entries are dropped.
    pub fn rebase_insert(&mut self, buffer: &GapBuffer, offset: usize, length: usize) {
        self.seal(buffer);

        // Walk newest to oldest, mapping the edit point back through each
        // entry's inverse so span comparisons happen in that entry's frame.
        let mut offset = offset;
        let mut split_at = None;
        for i in (0..self.entries.len()).rev() {
            let entry = &mut self.entries[i];
            let span = entry.end - entry.start;
            match entry.kind {
                EditKind::Insert => {
                    if offset <= entry.start {
                        entry.start += length;
                        entry.end += length;
                    } else if offset >= entry.end {
                        offset -= span;
                    } else {
                        split_at = Some(i);
                        break;
                    }
                }
                EditKind::Delete => {
                    if offset <= entry.start {
                        entry.start += length;
                        entry.end += length;
                    } else {
                        offset += span;
                    }
                }
            }
        }

        if let Some(i) = split_at {
            self.entries.drain(..=i);
        }
        self.top = self.entries.len();
    }

    /// Reconcile the log with a deletion of `[start, end)` about to be
    /// applied outside capture. Must be called before the mutation itself.
    ///
    /// Counterpart of [`UndoStack::rebase_insert`]: spans past the range
    /// shift down, and an entry whose recorded text the range touches is
    /// dropped along with everything older.
    pub fn rebase_delete(&mut self, buffer: &GapBuffer, start: usize, end: usize) {
        self.seal(buffer);

        let length = end - start;
        let (mut start, mut end) = (start, end);
        let mut split_at = None;
        for i in (0..self.entries.len()).rev() {
            let entry = &mut self.entries[i];
            let span = entry.end - entry.start;
            match entry.kind {
                EditKind::Insert => {
                    if end <= entry.start {
                        entry.start -= length;
                        entry.end -= length;
                    } else if start >= entry.end {
                        start -= span;
                        end -= span;
                    } else {
                        // the range eats into this entry's recorded text
                        split_at = Some(i);
                        break;
                    }
                }
                EditKind::Delete => {
                    if end <= entry.start {
                        entry.start -= length;
                        entry.end -= length;
                    } else if start >= entry.start {
                        start += span;
                        end += span;
                    } else {
                        // the range straddles the spot where this entry's
                        // text comes back
                        split_at = Some(i);
                        break;
                    }
                }
            }
        }

        if let Some(i) = split_at {
            self.entries.drain(..=i);
        }
        self.top = self.entries.len();
    }

    /// Make the whole log immutable history: abandon the redo tail and
    /// materialize the pending payload, which also ends its merge
    /// eligibility. The payload read is only sound while the buffer is
    /// untouched since that entry's mutation, so this must run before any
    /// mutation the log did not capture.
    fn seal(&mut self, buffer: &GapBuffer) {
        self.entries.truncate(self.top);
        if let Some(prev) = self.entries.last_mut() {
            prev.materialize(buffer);
        }
    }

    /// Undo the most recent group of entries. Returns the suggested caret
    /// position (the earliest-undone entry's start for inserts, end for
    /// deletes), or `None` when there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut GapBuffer) -> Option<usize> {
        if !self.can_undo() {
            return None;
        }

        let group_id = self.entries[self.top - 1].group_id;
        let mut caret = None;
        while self.top > 0 && self.entries[self.top - 1].group_id == group_id {
            self.top -= 1;
            caret = Some(self.entries[self.top].undo(buffer));
        }
        caret
    }

    /// Redo the next group of entries. Returns the suggested caret position
    /// (the last-redone entry's end for inserts, start for deletes), or
    /// `None` when there is nothing to redo.
    pub fn redo(&mut self, buffer: &mut GapBuffer) -> Option<usize> {
        if !self.can_redo() {
            return None;
        }

        let group_id = self.entries[self.top].group_id;
        let mut caret = None;
        while self.top < self.entries.len() && self.entries[self.top].group_id == group_id {
            caret = Some(self.entries[self.top].redo(buffer));
            self.top += 1;
        }
        caret
    }

    /// Drop the whole history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.top = 0;
        self.batch_edit = false;
    }

    /// Extend the previous insert entry in place when the new insertion
    /// continues it: same kind, still extendable, contiguous at its end,
    /// and within the merge window.
    fn merge_into_insert(&mut self, start: usize, end: usize, timestamp_ms: u64) -> bool {
        if !self.extendable_top() {
            return false;
        }
        let prev = &mut self.entries[self.top - 1];
        if prev.kind != EditKind::Insert
            || prev.text.is_some()
            || prev.end != start
            || timestamp_ms.saturating_sub(prev.timestamp_ms) >= self.merge_window_ms
        {
            return false;
        }

        prev.end = end;
        prev.timestamp_ms = timestamp_ms;
        true
    }

    /// Extend the previous delete entry in place for a contiguous backward
    /// deletion (repeated backspace): the new range ends where the previous
    /// entry starts. Forward deletion does not coalesce.
    fn merge_into_delete(&mut self, start: usize, end: usize, timestamp_ms: u64) -> bool {
        if !self.extendable_top() {
            return false;
        }
        let prev = &mut self.entries[self.top - 1];
        if prev.kind != EditKind::Delete
            || prev.text.is_some()
            || prev.start != end
            || timestamp_ms.saturating_sub(prev.timestamp_ms) >= self.merge_window_ms
        {
            return false;
        }

        prev.start = start;
        prev.timestamp_ms = timestamp_ms;
        true
    }

    /// Only the top of the whole log can be extended: there must be an
    /// undoable entry and no redo tail above it.
    fn extendable_top(&self) -> bool {
        self.top > 0 && self.top == self.entries.len()
    }

    fn push(&mut self, buffer: &GapBuffer, command: Command) {
        // a fresh edit truncates the redo branch
        self.entries.truncate(self.top);

        // the previous entry becomes immutable history; pin its payload
        // down while the buffer still holds it
        if let Some(prev) = self.entries.last_mut() {
            prev.materialize(buffer);
        }

        self.entries.push(command);
        self.top = self.entries.len();

        if !self.batch_edit {
            self.group_id += 1;
        }

        // bounded history: evict the oldest undoable entry
        if self.top > self.max_entries {
            self.entries.remove(0);
            self.top -= 1;
        }
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
