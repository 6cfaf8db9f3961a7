//! String canonicalisation, hashing and display helpers.

use std::borrow::Cow;

/// String form used for equality and hashing.
///
/// Character strings whose characters all fit in one byte are downgraded
/// to bytes, so a byte string and a character string holding the same
/// characters compare and hash alike.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Canonical<'a> {
    pub(crate) bytes: Cow<'a, [u8]>,
    /// Holds characters above U+00FF, encoded as UTF-8
    pub(crate) wide: bool,
}

pub(crate) fn canonical(bytes: &[u8], utf8: bool) -> Canonical<'_> {
    if !utf8 || bytes.is_ascii() {
        return Canonical {
            bytes: Cow::Borrowed(bytes),
            wide: false,
        };
    }
    let text = String::from_utf8_lossy(bytes);
    let narrow: Option<Vec<u8>> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect();
    match narrow {
        Some(latin1) => Canonical {
            bytes: Cow::Owned(latin1),
            wide: false,
        },
        None => Canonical {
            bytes: Cow::Borrowed(bytes),
            wide: true,
        },
    }
}

/// Jenkins one-at-a-time hash.
pub(crate) fn one_at_a_time(seed: u32, bytes: &[u8]) -> u32 {
    let mut hash = seed;
    for &byte in bytes {
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}

/// Quotes a string slot for dumps.
pub(crate) fn escape(bytes: &[u8], utf8: bool) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    if utf8 {
        for c in String::from_utf8_lossy(bytes).chars() {
            match c {
                '"' | '\\' => {
                    out.push('\\');
                    out.push(c);
                }
                c if c.is_ascii_graphic() || c == ' ' => out.push(c),
                c => out.push_str(&format!("\\x{{{:x}}}", u32::from(c))),
            }
        }
    } else {
        for &b in bytes {
            match b {
                b'"' | b'\\' => {
                    out.push('\\');
                    out.push(char::from(b));
                }
                b if b.is_ascii_graphic() || b == b' ' => out.push(char::from(b)),
                b => out.push_str(&format!("\\{:o}", b)),
            }
        }
    }
    out.push('"');
    out
}
