//! Global constants for the textcore engine

/// Initial capacity of an empty gap buffer, in characters
pub const INITIAL_CAPACITY: usize = 16;

/// Number of slots in the line/offset position cache (minimum 1)
pub const CACHE_SIZE: usize = 4;

/// Maximum number of undoable entries retained by the edit log
pub const MAX_UNDO_ENTRIES: usize = 50;

/// Default merge window for coalescing adjacent edits, in milliseconds
pub const MERGE_WINDOW_MS: u64 = 1000;

/// Synthetic end-of-buffer marker. Exactly one lives at the final logical
/// position of every document; normal edits never duplicate or remove it.
pub const EOF_CHAR: char = '\u{FFFF}';

/// Line terminator appended by the bulk-load path
pub const NEWLINE: char = '\n';

pub mod errors {
    // Error Codes
    pub const INVALID_LINE: &str = "INVALID_LINE";
    pub const OFFSET_NOT_FOUND: &str = "OFFSET_NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const GENERIC_ERROR: &str = "GENERIC_ERROR";
}
