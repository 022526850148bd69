//! Encoding and decoding of punycode.
//!
//! Punycode is defined in [RFC 3492]. It is a variable-length integer
//! encoding that represents an arbitrary sequence of Unicode code points
//! using only the letters, digits, and hyphen allowed in the host names of
//! the DNS. A label in punycode starts with all its basic (i.e., ASCII)
//! code points in order, followed by a hyphen if there were any, and then
//! the insertion positions and values of all remaining code points encoded
//! as a sequence of generalized variable-length integers.
//!
//! The module provides the raw codec via [`encode_into`],
//! [`encode_string`], and [`decode_string`], as well as the conversion of
//! entire labels to and from their ASCII Compatible Encoding (ACE) form
//! with its `xn--` prefix via [`to_ace`] and [`from_ace`].
//!
//! [RFC 3492]: https://tools.ietf.org/html/rfc3492

use crate::label::{has_ace_prefix, ACE_PREFIX};
use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

//------------ Parameters ----------------------------------------------------

// The bootstring parameters for punycode as given in section 5 of the RFC.

const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;

/// The delimiter between basic code points and the encoded deltas.
const DELIMITER: char = '-';

/// The maximum length of input the codec accepts.
///
/// For encoding, this is in code points. For decoding, it is in octets,
/// which also limits the number of decoded code points. Both encoder and
/// decoder take time quadratic in the length of a label, so this keeps
/// the cost per label bounded. It is far beyond anything that fits into
/// a DNS label.
pub const MAX_INPUT_LEN: usize = 1024;

//------------ Convenience Functions -----------------------------------------

/// Encodes a Unicode string into punycode and appends it to `target`.
///
/// The result does not include the ACE prefix. A string that consists of
/// basic code points only is still encoded, which results in the string
/// followed by a hyphen. Use [`to_ace`] if you want a label left alone if
/// it is ASCII.
///
/// The function fails if the input is longer than [`MAX_INPUT_LEN`] code
/// points or if the encoder overflows. Neither can happen for anything
/// that fits into a domain name label.
pub fn encode_into(
    input: &str,
    target: &mut String,
) -> Result<(), EncodeError> {
    let input_len = input.chars().count();
    if input_len > MAX_INPUT_LEN {
        return Err(EncodeError(()));
    }
    let input_len = input_len as u32;
    let mut basic_len = 0u32;
    for ch in input.chars() {
        if ch.is_ascii() {
            target.push(ch);
            basic_len += 1;
        }
    }
    if basic_len > 0 {
        target.push(DELIMITER);
    }

    let mut n = INITIAL_N;
    let mut delta = 0u32;
    let mut bias = INITIAL_BIAS;
    let mut handled = basic_len;

    while handled < input_len {
        // The smallest code point not yet handled. There is one since
        // handled < input_len.
        let Some(m) = input.chars().map(u32::from).filter(|&c| c >= n).min()
        else {
            break;
        };
        delta = (m - n)
            .checked_mul(handled + 1)
            .and_then(|inc| delta.checked_add(inc))
            .ok_or(EncodeError(()))?;
        n = m;

        for c in input.chars().map(u32::from) {
            if c < n {
                delta = delta.checked_add(1).ok_or(EncodeError(()))?;
            }
            if c == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = threshold(k, bias);
                    if q < t {
                        break;
                    }
                    target.push(encode_digit(t + (q - t) % (BASE - t)));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                target.push(encode_digit(q));
                bias = adapt(delta, handled + 1, handled == basic_len);
                delta = 0;
                handled += 1;
            }
        }
        delta = delta.checked_add(1).ok_or(EncodeError(()))?;
        n += 1;
    }
    Ok(())
}

/// Encodes a Unicode string into punycode and returns it as a new string.
pub fn encode_string(input: &str) -> Result<String, EncodeError> {
    let mut res = String::with_capacity(input.len());
    encode_into(input, &mut res)?;
    Ok(res)
}

/// Decodes a punycode string.
///
/// The input must not contain the ACE prefix. Digits are accepted in
/// either case. Basic code points before the last delimiter are copied
/// as is. Input longer than [`MAX_INPUT_LEN`] octets is rejected.
pub fn decode_string(input: &str) -> Result<String, DecodeError> {
    if input.len() > MAX_INPUT_LEN {
        return Err(DecodeError::TooLong(input.len()));
    }
    let (basic, extended) = match input.rfind(DELIMITER) {
        // A delimiter at the very start is not a delimiter since there
        // are no basic code points before it.
        Some(pos) if pos > 0 => (&input[..pos], &input[pos + 1..]),
        _ => ("", input),
    };
    if let Some(ch) = basic.chars().find(|ch| !ch.is_ascii()) {
        return Err(DecodeError::NonBasic(ch));
    }

    let mut output: Vec<char> = basic.chars().collect();
    let mut n = INITIAL_N;
    let mut i = 0u32;
    let mut bias = INITIAL_BIAS;
    let mut chars = extended.chars().peekable();

    while chars.peek().is_some() {
        let old_i = i;
        let mut w = 1u32;
        let mut k = BASE;
        loop {
            let ch = chars.next().ok_or(DecodeError::ShortInput)?;
            let digit = decode_digit(ch).ok_or(DecodeError::IllegalChar(ch))?;
            i = digit
                .checked_mul(w)
                .and_then(|inc| i.checked_add(inc))
                .ok_or(DecodeError::Overflow)?;
            let t = threshold(k, bias);
            if digit < t {
                break;
            }
            w = w.checked_mul(BASE - t).ok_or(DecodeError::Overflow)?;
            k += BASE;
        }
        let len = u32::try_from(output.len() + 1)
            .map_err(|_| DecodeError::Overflow)?;
        bias = adapt(i - old_i, len, old_i == 0);
        n = n.checked_add(i / len).ok_or(DecodeError::Overflow)?;
        i %= len;
        let ch = char::from_u32(n).ok_or(DecodeError::InvalidCodePoint(n))?;
        output.insert(i as usize, ch);
        i += 1;
    }
    Ok(output.into_iter().collect())
}

//------------ ACE Labels ----------------------------------------------------

/// Converts a label into its ACE form.
///
/// Labels that consist of ASCII characters only are returned unchanged.
/// All other labels are punycode encoded and prefixed with `xn--`.
pub fn to_ace(label: &str) -> Result<Cow<str>, EncodeError> {
    if label.is_ascii() {
        return Ok(Cow::Borrowed(label));
    }
    let mut res = String::with_capacity(ACE_PREFIX.len() + label.len());
    res.push_str(ACE_PREFIX);
    encode_into(label, &mut res)?;
    Ok(Cow::Owned(res))
}

/// Converts a label from its ACE form into Unicode.
///
/// Labels without the ACE prefix are returned unchanged. For labels with
/// the prefix, the remainder is decoded. Since there is exactly one
/// correct encoding for each Unicode label, decoding fails if encoding the
/// result again doesn’t produce the original label (ignoring ASCII case).
/// This also rejects ACE labels that decode to plain ASCII.
pub fn from_ace(label: &str) -> Result<Cow<str>, DecodeError> {
    if !has_ace_prefix(label) {
        return Ok(Cow::Borrowed(label));
    }
    let encoded = &label[ACE_PREFIX.len()..];
    let decoded = decode_string(encoded)?;
    match to_ace(&decoded) {
        Ok(ace) if ace.eq_ignore_ascii_case(label) => Ok(Cow::Owned(decoded)),
        _ => Err(DecodeError::NotCanonical),
    }
}

//------------ Helpers -------------------------------------------------------

/// Bias adaptation function from section 6.1 of the RFC.
fn adapt(delta: u32, num_points: u32, first_time: bool) -> u32 {
    let mut delta = if first_time { delta / DAMP } else { delta / 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (((BASE - T_MIN + 1) * delta) / (delta + SKEW))
}

/// Returns the threshold for the digit at position `k`.
fn threshold(k: u32, bias: u32) -> u32 {
    if k <= bias {
        T_MIN
    } else if k >= bias + T_MAX {
        T_MAX
    } else {
        k - bias
    }
}

/// Returns the character for a digit value.
///
/// The value must be less than `BASE`.
fn encode_digit(value: u32) -> char {
    debug_assert!(value < BASE);
    ENCODE_ALPHABET[value as usize]
}

/// Returns the value of a digit character or `None` if it isn’t one.
fn decode_digit(ch: char) -> Option<u32> {
    match ch {
        'a'..='z' => Some(u32::from(ch) - u32::from('a')),
        'A'..='Z' => Some(u32::from(ch) - u32::from('A')),
        '0'..='9' => Some(u32::from(ch) - u32::from('0') + 26),
        _ => None,
    }
}

//------------ Constants -----------------------------------------------------

/// The alphabet used for encoding digits.
///
/// Digit values 0 to 25 are the letters, values 26 to 35 the decimal
/// digits. We only ever produce lower case.
const ENCODE_ALPHABET: [char; 36] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', // 0x00 .. 0x07
    'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', // 0x08 .. 0x0F
    'q', 'r', 's', 't', 'u', 'v', 'w', 'x', // 0x10 .. 0x17
    'y', 'z', '0', '1', '2', '3', '4', '5', // 0x18 .. 0x1F
    '6', '7', '8', '9', // 0x20 .. 0x23
];

//============ Error Types ===================================================

//------------ EncodeError ---------------------------------------------------

/// The input was too long to be encoded.
///
/// This can only happen for input far longer than any domain name label.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncodeError(());

//--- Display and Error

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("input too long for punycode encoding")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding punycode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// A character was encountered that isn’t a punycode digit.
    IllegalChar(char),

    /// A non-ASCII character appeared before the delimiter.
    NonBasic(char),

    /// The input ended in the middle of a variable-length integer.
    ShortInput,

    /// A decoded value overflowed.
    Overflow,

    /// The decoded value is not a Unicode scalar value.
    InvalidCodePoint(u32),

    /// The label isn’t the canonical encoding of its decoded form.
    NotCanonical,

    /// The input is longer than [`MAX_INPUT_LEN`] octets.
    TooLong(usize),
}

//--- Display and Error

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeError::IllegalChar(ch) => {
                write!(f, "illegal punycode digit {:?}", ch)
            }
            DecodeError::NonBasic(ch) => {
                write!(f, "non-basic code point {:?} before delimiter", ch)
            }
            DecodeError::ShortInput => f.write_str("incomplete punycode"),
            DecodeError::Overflow => f.write_str("punycode overflow"),
            DecodeError::InvalidCodePoint(n) => {
                write!(f, "invalid code point U+{:04X}", n)
            }
            DecodeError::NotCanonical => {
                f.write_str("non-canonical punycode label")
            }
            DecodeError::TooLong(len) => {
                write!(f, "punycode of {} octets is too long", len)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use alloc::format;

    /// Sample strings from section 7.1 of RFC 3492.
    const SAMPLES: &[(&str, &str)] = &[
        // (A) Arabic (Egyptian)
        (
            "\u{0644}\u{064A}\u{0647}\u{0645}\u{0627}\u{0628}\u{062A}\
             \u{0643}\u{0644}\u{0645}\u{0648}\u{0634}\u{0639}\u{0631}\
             \u{0628}\u{064A}\u{061F}",
            "egbpdaj6bu4bxfgehfvwxn",
        ),
        // (B) Chinese (simplified)
        (
            "\u{4ED6}\u{4EEC}\u{4E3A}\u{4EC0}\u{4E48}\u{4E0D}\u{8BF4}\
             \u{4E2D}\u{6587}",
            "ihqwcrb4cv8a8dqg056pqjye",
        ),
        // (L) 3<nen>B<gumi><kinpachi><sensei>
        (
            "3\u{5E74}B\u{7D44}\u{91D1}\u{516B}\u{5148}\u{751F}",
            "3B-ww4c5e180e575a65lsy2b",
        ),
        // (S) -> $1.00 <-
        ("-> $1.00 <-", "-> $1.00 <--"),
    ];

    #[test]
    fn encode_samples() {
        for (decoded, encoded) in SAMPLES {
            assert_eq!(encode_string(decoded).unwrap(), *encoded);
        }
        assert_eq!(encode_string("bücher").unwrap(), "bcher-kva");
        assert_eq!(encode_string("münchen").unwrap(), "mnchen-3ya");
        assert_eq!(encode_string("испытание").unwrap(), "80akhbyknj4f");
        assert_eq!(encode_string("").unwrap(), "");
    }

    #[test]
    fn decode_samples() {
        for (decoded, encoded) in SAMPLES {
            assert_eq!(decode_string(encoded).unwrap(), *decoded);
        }
        assert_eq!(decode_string("bcher-kva").unwrap(), "bücher");
        // Basic code points keep their case.
        assert_eq!(decode_string("BCHER-KVA").unwrap(), "BüCHER");
    }

    #[test]
    fn decode_mixed_case_digits() {
        assert_eq!(decode_string("80AKHBYKNJ4F").unwrap(), "испытание");
        assert_eq!(decode_string("mnchen-3YA").unwrap(), "münchen");
    }

    #[test]
    fn round_trip() {
        // Labels with many insertions and repeated code points.
        for label in [
            "ü",
            "üüü",
            "aüaüa",
            "испытание",
            "日本語",
            "παράδειγμα",
            "\u{1F600}smile",
            "ab\u{10FFFF}",
        ] {
            let encoded = encode_string(label).unwrap();
            assert_eq!(decode_string(&encoded).unwrap(), label);
        }
    }

    #[test]
    fn decode_errors() {
        assert_eq!(decode_string("a-é"), Err(DecodeError::IllegalChar('é')));
        assert_eq!(decode_string("é-a"), Err(DecodeError::NonBasic('é')));
        assert_eq!(decode_string("a-!"), Err(DecodeError::IllegalChar('!')));
        assert_eq!(decode_string("-kva"), Err(DecodeError::IllegalChar('-')));
        assert_eq!(decode_string("b"), Err(DecodeError::ShortInput));
        assert_eq!(
            decode_string("99999999999999"),
            Err(DecodeError::Overflow)
        );
    }

    #[test]
    fn ace_labels() {
        assert_eq!(to_ace("example").unwrap(), "example");
        assert_eq!(to_ace("münchen").unwrap(), "xn--mnchen-3ya");
        assert_eq!(to_ace("испытание").unwrap(), "xn--80akhbyknj4f");

        assert_eq!(from_ace("example").unwrap(), "example");
        assert_eq!(from_ace("xn--mnchen-3ya").unwrap(), "münchen");
        assert_eq!(from_ace("XN--MNCHEN-3YA").unwrap(), "münchen");
        assert_eq!(from_ace("xn--80akhbyknj4f").unwrap(), "испытание");
    }

    #[test]
    fn long_input() {
        let wide: String = (0x4E00..0x4E00 + 20_000)
            .filter_map(char::from_u32)
            .collect();
        assert_eq!(encode_string(&wide), Err(EncodeError(())));
        assert!(to_ace(&wide).is_err());

        let limit: String =
            (0x4E00..0x4E00 + 1024).filter_map(char::from_u32).collect();
        let encoded = encode_string(&limit).unwrap();
        assert!(encoded.len() > MAX_INPUT_LEN);
        assert_eq!(
            decode_string(&encoded),
            Err(DecodeError::TooLong(encoded.len()))
        );

        let digits = "a".repeat(20_000);
        assert_eq!(
            decode_string(&digits),
            Err(DecodeError::TooLong(20_000))
        );
        assert_eq!(
            from_ace(&format!("xn--{}", digits)),
            Err(DecodeError::TooLong(20_000))
        );
    }

    #[test]
    fn ace_not_canonical() {
        // Decodes to plain ASCII.
        assert_eq!(from_ace("xn--abc-"), Err(DecodeError::NotCanonical));
        assert_eq!(from_ace("xn--"), Err(DecodeError::NotCanonical));
        assert_eq!(from_ace("xn--mnchen-3y"), Err(DecodeError::ShortInput));
    }
}
