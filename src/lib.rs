//! textcore - the in-memory text storage engine of an editable-text component
//!
//! The engine is three parts, leaf to root:
//! - [`buffer::position_cache::PositionCache`]: a tiny MRU table of known
//!   line/offset pairs that keeps line lookups from rescanning the document
//! - [`buffer::GapBuffer`]: the character store with a movable gap, which
//!   absorbs localized edits in amortized O(1) and maintains the line count
//! - [`history::UndoStack`]: a coalescing undo/redo log over the buffer
//!
//! [`document::Document`] wires the three together behind the interface the
//! view/controller layer consumes.

pub mod buffer;
pub mod constants;
pub mod document;
pub mod error;
pub mod history;

pub use buffer::GapBuffer;
pub use document::Document;
pub use error::{CoreError, ErrorKind, ErrorSeverity, Result};
pub use history::UndoStack;
