//! Core shared types for Lathe.
//!
//! This crate is intentionally small: text spans, single-document text edits,
//! and the cooperative cancellation primitives threaded through the syntax,
//! semantic and refactoring layers.

mod cancel;
mod edit;
mod text;

pub use cancel::{CancellationToken, Cancelled, CancellationTokenExt};
pub use edit::{apply_text_edits, EditError, FileId, TextEdit};
pub use smol_str::SmolStr;
pub use text::{LineCol, LineIndex, TextSpan};
pub use text_size::{TextRange, TextSize};
