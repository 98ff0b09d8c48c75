//! Document facade: one text buffer plus its edit history
//!
//! This is the surface the view/controller layer talks to. Mutations take a
//! `capture` flag deciding whether the edit lands in the undo log, and a
//! caller-supplied timestamp that drives history coalescing. Queries
//! delegate to the buffer.
//!
//! Every document carries exactly one synthetic end-of-buffer marker at its
//! final logical position. The marker is part of the logical length but
//! excluded from [`Document::text`] snapshots, and normal edits may not
//! touch it.

use crate::buffer::GapBuffer;
use crate::constants::EOF_CHAR;
use crate::error::Result;
use crate::history::UndoStack;

/// A single in-memory text document with undo/redo
#[derive(Debug, Clone)]
pub struct Document {
    buffer: GapBuffer,
    history: UndoStack,
}

impl Document {
    /// Create an empty document: one line, holding only the end marker
    pub fn new() -> Self {
        let mut buffer = GapBuffer::new();
        buffer.insert(0, &EOF_CHAR.to_string());
        Document {
            buffer,
            history: UndoStack::new(),
        }
    }

    /// Create a document pre-loaded with `text` and no history
    pub fn from_str(text: &str) -> Self {
        let mut document = Self::new();
        document.set_text(text);
        document
    }

    /// Bulk content replacement, used by the file-loading collaborator.
    ///
    /// Clears the buffer, appends each line of `text` with an explicit line
    /// terminator, re-appends the end marker, and drops all history. None
    /// of it is capturable.
    pub fn set_text(&mut self, text: &str) {
        let mut buffer = GapBuffer::new();
        for line in text.lines() {
            buffer.append(line);
            buffer.append("\n");
        }
        buffer.append(&EOF_CHAR.to_string());

        self.buffer = buffer;
        self.history.clear();
    }

    /// Full-text snapshot for the file-writing collaborator. Everything
    /// before the end marker.
    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.substring(0, self.buffer.len() - 1)
    }

    /// Logical character count, end marker included
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// A document is never shorter than its end marker
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.len() <= 1
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    #[must_use]
    pub fn char_at(&self, offset: usize) -> char {
        self.buffer.char_at(offset)
    }

    #[must_use]
    pub fn substring(&self, start: usize, end: usize) -> String {
        self.buffer.substring(start, end)
    }

    pub fn line_start_offset(&self, line_number: usize) -> Result<usize> {
        self.buffer.line_start_offset(line_number)
    }

    #[must_use]
    pub fn line_length(&self, line_number: usize) -> usize {
        self.buffer.line_length(line_number)
    }

    pub fn line_text(&self, line_number: usize) -> Result<String> {
        self.buffer.line_text(line_number)
    }

    #[must_use]
    pub fn line_of(&self, char_offset: usize) -> usize {
        self.buffer.line_of(char_offset)
    }

    /// Insert `text` at `offset`. With `capture` set the edit is recorded
    /// in the undo log before the buffer changes; without it the log is
    /// rebased past the edit so the entries it keeps stay undoable.
    pub fn insert(&mut self, offset: usize, text: &str, capture: bool, timestamp_ms: u64) {
        assert!(
            offset < self.buffer.len(),
            "insert: offset {offset} would land past the end marker"
        );

        let length = text.chars().count();
        if capture {
            self.history
                .capture_insert(&self.buffer, offset, offset + length, timestamp_ms);
        } else {
            self.history.rebase_insert(&self.buffer, offset, length);
        }
        self.buffer.insert(offset, text);
    }

    /// Delete `[start, end)`. The range may not include the end marker.
    pub fn delete(&mut self, start: usize, end: usize, capture: bool, timestamp_ms: u64) {
        assert!(
            end < self.buffer.len(),
            "delete: range touches the end marker"
        );

        if capture {
            self.history
                .capture_delete(&self.buffer, start, end, timestamp_ms);
        } else {
            self.history.rebase_delete(&self.buffer, start, end);
        }
        self.buffer.delete(start, end);
    }

    /// Replace `[start, end)` with `text`: a delete followed by an insert,
    /// captured (if at all) as two history entries.
    pub fn replace(&mut self, start: usize, end: usize, text: &str, capture: bool, timestamp_ms: u64) {
        self.delete(start, end, capture, timestamp_ms);
        self.insert(start, text, capture, timestamp_ms);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo the most recent edit group; returns the suggested caret
    pub fn undo(&mut self) -> Option<usize> {
        self.history.undo(&mut self.buffer)
    }

    /// Redo the most recently undone edit group; returns the suggested caret
    pub fn redo(&mut self) -> Option<usize> {
        self.history.redo(&mut self.buffer)
    }

    pub fn begin_batch_edit(&mut self) {
        self.history.begin_batch_edit();
    }

    pub fn end_batch_edit(&mut self) {
        self.history.end_batch_edit();
    }

    pub fn is_batch_edit(&self) -> bool {
        self.history.is_batch_edit()
    }

    /// Read access to the underlying buffer
    #[must_use]
    pub fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
