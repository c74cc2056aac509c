//! Permissive UTF-8 decoding

use std::str;

/// Decode `bytes` as UTF-8, dropping invalid sequences.
///
/// Returns the decoded text and the number of bytes dropped.
pub fn decode_lossy(bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0;
    let mut rest = bytes;

    loop {
        match str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                // `valid_up_to` marks a prefix that is valid UTF-8
                text.push_str(str::from_utf8(valid).unwrap_or_default());
                // None means the input ended mid-sequence
                let skip = e.error_len().unwrap_or(after.len());
                dropped += skip;
                rest = &after[skip..];
            }
        }
    }

    (text, dropped)
}
