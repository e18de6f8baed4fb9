//! IRC formatting code handling.
//!
//! Strips mIRC-style formatting from text before it leaves IRC.
//!
//! # IRC Format Codes
//! - 0x02 (^B): Bold
//! - 0x03 (^C): Color (followed by optional foreground,background)
//! - 0x0F (^O): Reset all formatting
//! - 0x16 (^V): Reverse/Inverse
//! - 0x1D (^]): Italics
//! - 0x1F (^_): Underline
//!
//! White-on-white text (`^C0,0`) is treated as hidden: it and everything
//! after it is dropped.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::CharIndices;

/// IRC format control characters.
const FORMAT_CHARS: &[char] = &[
    '\x02', // Bold
    '\x03', // Color
    '\x0F', // Reset
    '\x16', // Reverse
    '\x1D', // Italics
    '\x1F', // Underline
];

/// Extension trait for handling formatted IRC strings.
pub trait FormattedStringExt<'a> {
    /// Check if the string contains any IRC formatting codes.
    fn is_formatted(&self) -> bool;

    /// Strip all IRC formatting codes from the string, dropping hidden text.
    ///
    /// Returns `Cow::Borrowed` if no formatting was present.
    fn strip_formatting(self) -> Cow<'a, str>;
}

impl<'a> FormattedStringExt<'a> for &'a str {
    fn is_formatted(&self) -> bool {
        self.contains(FORMAT_CHARS)
    }

    fn strip_formatting(self) -> Cow<'a, str> {
        if !self.is_formatted() {
            return Cow::Borrowed(self);
        }
        Cow::Owned(ColorParser::new(self).strip())
    }
}

impl FormattedStringExt<'static> for String {
    fn is_formatted(&self) -> bool {
        self.as_str().is_formatted()
    }

    fn strip_formatting(self) -> Cow<'static, str> {
        if !self.is_formatted() {
            return Cow::Owned(self);
        }
        Cow::Owned(ColorParser::new(&self).strip())
    }
}

struct ColorParser<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> ColorParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
        }
    }

    fn strip(mut self) -> String {
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '\x03' => {
                    if self.color_is_hidden() {
                        break;
                    }
                }
                c if FORMAT_CHARS.contains(&c) => {}
                c => out.push(c),
            }
        }
        out
    }

    /// Up to two digits; returns the parsed value if any digit was present.
    fn number(&mut self) -> Option<u8> {
        let mut value: Option<u8> = None;
        for _ in 0..2 {
            match self.chars.peek() {
                Some(&(_, d)) if d.is_ascii_digit() => {
                    self.chars.next();
                    let digit = d as u8 - b'0';
                    value = Some(value.unwrap_or(0) * 10 + digit);
                }
                _ => break,
            }
        }
        value
    }

    /// Consume the arguments of a `^C` code. A comma is part of the code
    /// only when a background digit follows it.
    fn color_is_hidden(&mut self) -> bool {
        let Some(fg) = self.number() else {
            return false;
        };

        let mut lookahead = self.chars.clone();
        let has_bg = matches!(lookahead.next(), Some((_, ',')))
            && matches!(lookahead.peek(), Some(&(_, d)) if d.is_ascii_digit());
        if !has_bg {
            return false;
        }

        self.chars.next();
        let bg = self.number();
        fg == 0 && bg == Some(0)
    }
}
