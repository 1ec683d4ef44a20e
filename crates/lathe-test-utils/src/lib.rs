//! Utilities shared by Lathe tests.
//!
//! Fixtures mark the selection inline with comment markers:
//!
//! - `/*caret*/` for an empty selection,
//! - `/*start*/ ... /*end*/` for a drag selection.
//!
//! The markers are stripped and the selection is returned as a [`TextSpan`].

mod fixtures;
mod logs;

pub use fixtures::{extract_caret, extract_range, extract_selection};
pub use logs::{capture_logs, CapturedLogs};
