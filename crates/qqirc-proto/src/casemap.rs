//! IRC case-mapping functions.
//!
//! Implements the `rfc1459` case mapping advertised by the gateway, where
//! `[]\~` are the uppercase forms of `{}|^`.

/// Convert a single character to IRC lowercase using RFC 1459 case mapping.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => (c as u8 + 32) as char,
        _ => c,
    }
}

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(irc_lower_char).collect()
}

/// Compare two strings using IRC case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.chars()
            .zip(b.chars())
            .all(|(ca, cb)| irc_lower_char(ca) == irc_lower_char(cb))
}
