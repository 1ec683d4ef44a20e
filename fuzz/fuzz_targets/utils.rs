use std::str;

pub const MAX_INPUT_SIZE: usize = 64 * 1024;

/// A UTF-8 view of `data` capped at `MAX_INPUT_SIZE`.
///
/// If the cap splits a multibyte character, up to 3 bytes are trimmed.
#[inline]
pub fn truncate_utf8(data: &[u8]) -> Option<&str> {
    let cap = data.len().min(MAX_INPUT_SIZE);
    for trim in 0..=3 {
        if cap < trim {
            break;
        }
        if let Ok(text) = str::from_utf8(&data[..cap - trim]) {
            return Some(text);
        }
    }
    None
}
