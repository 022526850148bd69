//! Hostname labels.
//!
//! A hostname is a sequence of *labels* separated by dots. When humans
//! type hostnames, they don’t necessarily use the ASCII full stop for
//! this, though. East Asian input methods commonly produce the
//! ideographic full stop or one of its full-width or half-width variants.
//! IDNA treats all of these as equivalent label separators and so do we.
//!
//! The [`LabelIter`] produced by [`Label::iter_str`] walks over the labels
//! of a string lazily and performs no validation whatsoever. In
//! particular, it happily produces empty labels for adjacent separators or
//! a leading or trailing separator. It is up to the caller to decide what
//! to do with those.

use core::{fmt, str};

//------------ Constants -----------------------------------------------------

/// The ASCII Compatible Encoding prefix.
///
/// A label starting with this prefix is in punycode form.
pub const ACE_PREFIX: &str = "xn--";

/// The characters recognized as label separators.
///
/// These are the ASCII full stop plus the ideographic full stop and its
/// full-width and half-width forms.
pub const SEPARATORS: [char; 4] =
    ['.', '\u{3002}', '\u{FF0E}', '\u{FF61}'];

/// Returns whether `ch` is one of the recognized label separators.
pub fn is_separator(ch: char) -> bool {
    SEPARATORS.contains(&ch)
}

/// Returns whether `label` starts with the ACE prefix.
///
/// The comparison ignores ASCII case, so `XN--` and `Xn--` match, too.
pub fn has_ace_prefix(label: &str) -> bool {
    label
        .as_bytes()
        .get(..ACE_PREFIX.len())
        .map(|head| head.eq_ignore_ascii_case(ACE_PREFIX.as_bytes()))
        .unwrap_or(false)
}

//------------ Label ---------------------------------------------------------

/// A single label of a hostname string.
///
/// The label references the raw text between two separators (or the start
/// or end of the string). It also knows its position in the hostname and
/// whether it was the final label.
///
/// Labels are cheap, transient values. Two labels compare equal if their
/// content and position are equal.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Label<'a> {
    /// The raw content of the label.
    text: &'a str,

    /// The zero-based index of the label within the hostname.
    index: usize,

    /// Whether this is the last label of the hostname.
    last: bool,
}

impl<'a> Label<'a> {
    /// Domain name labels have a maximum length of 63 octets.
    pub const MAX_LEN: usize = 63;

    /// Returns an iterator over the labels of `s`.
    pub fn iter_str(s: &'a str) -> LabelIter<'a> {
        LabelIter::new(s)
    }

    /// Returns the raw text of the label.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Returns the zero-based position of the label in the hostname.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns whether this is the last label of the hostname.
    pub fn is_last(&self) -> bool {
        self.last
    }

    /// Returns whether the label is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns whether this label is the root label.
    ///
    /// The root label is an empty label at the end of a hostname that
    /// isn’t the only label, i.e., what you get for a trailing dot.
    pub fn is_root(&self) -> bool {
        self.last && self.index > 0 && self.text.is_empty()
    }

    /// Returns whether the label starts with the ACE prefix.
    pub fn is_ace(&self) -> bool {
        has_ace_prefix(self.text)
    }
}

//--- Display and Debug

impl<'a> fmt::Display for Label<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.text)
    }
}

impl<'a> fmt::Debug for Label<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Label")
            .field("text", &self.text)
            .field("index", &self.index)
            .field("last", &self.last)
            .finish()
    }
}

//------------ LabelIter -----------------------------------------------------

/// An iterator over the labels in a hostname string.
///
/// The iterator always produces at least one label, even for an empty
/// string. A string with _n_ separators produces exactly _n + 1_ labels.
#[derive(Clone, Debug)]
pub struct LabelIter<'a> {
    /// The remaining part of the string.
    ///
    /// This is `None` once the last label has been returned.
    rest: Option<&'a str>,

    /// The index of the next label.
    index: usize,
}

impl<'a> LabelIter<'a> {
    /// Creates a new iterator over the labels of `s`.
    pub fn new(s: &'a str) -> Self {
        LabelIter {
            rest: Some(s),
            index: 0,
        }
    }

    /// Returns whether the iterator has produced all labels.
    pub fn is_done(&self) -> bool {
        self.rest.is_none()
    }
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = Label<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        let (text, rest) =
            match rest.char_indices().find(|&(_, ch)| is_separator(ch)) {
                Some((pos, ch)) => {
                    (&rest[..pos], Some(&rest[pos + ch.len_utf8()..]))
                }
                None => (rest, None),
            };
        let label = Label {
            text,
            index: self.index,
            last: rest.is_none(),
        };
        self.rest = rest;
        self.index += 1;
        Some(label)
    }
}

impl<'a> core::iter::FusedIterator for LabelIter<'a> {}

//============ Testing =======================================================
