use std::str;

/// Inputs are capped so a single case cannot spend seconds in the analysis.
pub const MAX_INPUT_SIZE: usize = 64 * 1024;

/// At most this many member lines are turned into a class.
#[allow(dead_code)]
pub const MAX_MEMBERS: usize = 512;

/// UTF-8 prefix of `data`, at most [`MAX_INPUT_SIZE`] bytes.
///
/// Cutting at the cap can split a code point; up to 3 trailing bytes are
/// dropped to recover. Inputs that are not UTF-8 at all yield `None`.
#[inline]
pub fn truncate_utf8(data: &[u8]) -> Option<&str> {
    let cap = data.len().min(MAX_INPUT_SIZE);
    (0..=3.min(cap)).find_map(|trim| str::from_utf8(&data[..cap - trim]).ok())
}
