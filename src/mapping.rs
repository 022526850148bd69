//! Mapping of code points in hostname labels.
//!
//! Before a label can be encoded or compared, it needs to be brought into
//! a canonical form. This module implements the subset of the mapping
//! step of [UTS #46] that is relevant for hostnames:
//!
//! * default-ignorable code points such as the soft hyphen or zero width
//!   space are removed,
//! * compatibility variants, most notably full-width forms, are folded
//!   into their standard forms via NFKC,
//! * everything is converted to lower case,
//! * with transitional processing, the deviation characters are mapped
//!   the way IDNA2003 did it, i.e., ß becomes ss, final sigma becomes
//!   sigma, and the zero width joiners are dropped,
//! * and finally the label is recomposed into NFC.
//!
//! The result is then checked against the set of code points that may
//! appear in a hostname label at all. In ASCII, these are the lower case
//! letters, digits, and the hyphen. Beyond ASCII, letters, numbers, and
//! combining marks are allowed. Everything else, i.e., control characters,
//! white space, punctuation, symbols, and unassigned code points, is
//! rejected.
//!
//! None of this depends on the locale.
//!
//! [UTS #46]: https://www.unicode.org/reports/tr46/

use crate::profile::Profile;
use alloc::string::{String, ToString};
use core::fmt;
use tracing::trace;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

//------------ map_label -----------------------------------------------------

/// Maps a single label according to the given profile.
///
/// Returns the mapped label or an error naming the first code point that
/// is not allowed in a hostname.
pub fn map_label(
    label: &str,
    profile: &Profile,
) -> Result<String, MappingError> {
    let folded: String = label
        .chars()
        .filter(|&ch| !is_ignored(ch))
        .nfkc()
        .flat_map(char::to_lowercase)
        .collect();

    let mut mapped = String::with_capacity(folded.len());
    for ch in folded.chars() {
        match ch {
            '\u{00DF}' if profile.transitional() => mapped.push_str("ss"),
            '\u{03C2}' if profile.transitional() => mapped.push('\u{03C3}'),
            '\u{200C}' | '\u{200D}' if profile.transitional() => {}
            _ => mapped.push(ch),
        }
    }
    let mapped: String = mapped.nfc().collect();

    if let Some(ch) = mapped.chars().find(|&ch| !is_permitted(ch)) {
        trace!(label, ch = %ch.escape_unicode(), "disallowed code point");
        return Err(MappingError::new(label, ch));
    }
    Ok(mapped)
}

/// Returns whether a code point is silently dropped.
fn is_ignored(ch: char) -> bool {
    matches!(
        ch,
        '\u{00AD}'
            | '\u{034F}'
            | '\u{180B}'..='\u{180D}'
            | '\u{180F}'
            | '\u{200B}'
            | '\u{2060}'
            | '\u{FE00}'..='\u{FE0F}'
            | '\u{FEFF}'
            | '\u{E0100}'..='\u{E01EF}'
    )
}

/// Returns whether a mapped code point may appear in a label.
fn is_permitted(ch: char) -> bool {
    if ch.is_ascii() {
        matches!(ch, 'a'..='z' | '0'..='9' | '-')
    } else {
        ch.is_alphanumeric() || is_combining_mark(ch)
    }
}

//------------ MappingError --------------------------------------------------

/// A label contained a code point that isn’t allowed in hostnames.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MappingError {
    /// The label as it was given.
    label: String,

    /// The offending code point after mapping.
    ch: char,
}

impl MappingError {
    fn new(label: &str, ch: char) -> Self {
        MappingError {
            label: label.to_string(),
            ch,
        }
    }

    /// Returns the label that failed to map.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the disallowed code point.
    pub fn ch(&self) -> char {
        self.ch
    }
}

//--- Display and Error

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "hostname label {:?} contains disallowed character U+{:04X}",
            self.label, self.ch as u32
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MappingError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    fn map(label: &str) -> Result<String, MappingError> {
        map_label(label, &Profile::COMPARISON)
    }

    #[test]
    fn case_folding() {
        assert_eq!(map("HashiCorp").unwrap(), "hashicorp");
        assert_eq!(map("Испытание").unwrap(), "испытание");
        assert_eq!(map("ÜBER").unwrap(), "über");
    }

    #[test]
    fn width_folding() {
        assert_eq!(
            map("\u{FF25}\u{FF38}\u{FF21}\u{FF2D}\u{FF30}\u{FF2C}\u{FF25}")
                .unwrap(),
            "example"
        );
        assert_eq!(map("\u{FF11}\u{FF12}\u{FF13}").unwrap(), "123");
    }

    #[test]
    fn normalization() {
        // Combining diaeresis gets composed.
        assert_eq!(map("mu\u{0308}nchen").unwrap(), "münchen");
        assert_eq!(map("m\u{00FC}nchen").unwrap(), "münchen");
    }

    #[test]
    fn transitional() {
        assert_eq!(map("Stra\u{00DF}e").unwrap(), "strasse");
        assert_eq!(map("STRA\u{1E9E}E").unwrap(), "strasse");
        assert_eq!(
            map("\u{03B2}\u{03CC}\u{03BB}\u{03BF}\u{03C2}").unwrap(),
            "\u{03B2}\u{03CC}\u{03BB}\u{03BF}\u{03C3}"
        );
        assert_eq!(map("a\u{200D}b").unwrap(), "ab");
        assert_eq!(map("a\u{200C}b").unwrap(), "ab");
    }

    #[test]
    fn ignored() {
        assert_eq!(map("ex\u{00AD}ample").unwrap(), "example");
        assert_eq!(map("ex\u{200B}ample").unwrap(), "example");
        assert_eq!(map("\u{FEFF}example").unwrap(), "example");
    }

    #[test]
    fn disallowed() {
        let err = map("foo bar").unwrap_err();
        assert_eq!(err.label(), "foo bar");
        assert_eq!(err.ch(), ' ');
        assert_eq!(map("foo_bar").unwrap_err().ch(), '_');
        assert_eq!(map("foo\u{0000}").unwrap_err().ch(), '\u{0000}');
        assert_eq!(map("a\u{2603}").unwrap_err().ch(), '\u{2603}');
        assert_eq!(map("a!").unwrap_err().ch(), '!');
        assert_eq!(map("a\u{FFFD}").unwrap_err().ch(), '\u{FFFD}');
    }

    #[test]
    fn idempotent() {
        for label in
            ["HashiCorp", "mu\u{0308}nchen", "Stra\u{00DF}e", "\u{FF21}b"]
        {
            let once = map(label).unwrap();
            assert_eq!(map(&once).unwrap(), once);
        }
    }
}
