//! Processing profiles.
//!
//! A [`Profile`] combines label splitting, code point mapping, and the
//! punycode codec into the conversion of entire hostnames. There are
//! exactly two profiles:
//!
//! * [`Profile::DISPLAY`] is very liberal. It normalizes but imposes
//!   none of the validation rules. Its purpose is to produce something
//!   readable for a user interface.
//! * [`Profile::COMPARISON`] combines the same normalization with
//!   validation rules that prevent the use of ambiguous or invalid
//!   hostnames. Its ASCII output is what hostnames are compared by.
//!
//! Both profiles are immutable constants and can be used from any number
//! of threads at the same time.

use crate::error::{HostnameError, LabelSyntax};
use crate::label::{has_ace_prefix, Label};
use crate::mapping::map_label;
use crate::punycode::{self, DecodeError};
use alloc::string::String;
use tracing::{debug, trace};
use unicode_normalization::char::is_combining_mark;

//------------ Profile -------------------------------------------------------

/// The rules for processing hostnames.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Profile {
    /// Map the IDNA2003 deviation characters.
    transitional: bool,

    /// Accept labels that already are in ACE form.
    allow_ace_input: bool,

    /// Enforce the length limits of the DNS.
    verify_dns_length: bool,

    /// Check hyphen placement and leading combining marks.
    validate_labels: bool,
}

impl Profile {
    /// The lenient profile for producing display forms.
    pub const DISPLAY: Profile = Profile {
        transitional: true,
        allow_ace_input: true,
        verify_dns_length: false,
        validate_labels: false,
    };

    /// The strict profile for producing the comparison form.
    pub const COMPARISON: Profile = Profile {
        transitional: true,
        allow_ace_input: false,
        verify_dns_length: true,
        validate_labels: true,
    };

    /// The maximum length of an encoded hostname without a trailing dot.
    pub const MAX_LEN: usize = 253;

    /// Returns whether transitional mapping is applied.
    pub fn transitional(&self) -> bool {
        self.transitional
    }

    /// Returns whether labels in ACE form are accepted as input.
    pub fn allow_ace_input(&self) -> bool {
        self.allow_ace_input
    }

    /// Returns whether the DNS length limits are enforced.
    pub fn verify_dns_length(&self) -> bool {
        self.verify_dns_length
    }

    /// Returns whether label syntax is validated.
    pub fn validate_labels(&self) -> bool {
        self.validate_labels
    }
}

/// # Conversion
///
impl Profile {
    /// Converts a hostname into its ASCII form.
    ///
    /// All labels are mapped and those containing non-ASCII characters are
    /// punycode encoded. The labels are joined with ASCII full stops in
    /// their original order. A trailing separator is kept as a trailing
    /// dot.
    pub fn to_ascii(&self, given: &str) -> Result<String, HostnameError> {
        if given.is_empty() {
            debug!("empty hostname");
            return Err(HostnameError::EmptyInput);
        }

        // Users must give us human readable labels. Check this before any
        // mapping happens so that we don’t do any work for nothing.
        if !self.allow_ace_input {
            if let Some(label) = Label::iter_str(given).find(Label::is_ace) {
                debug!(label = label.as_str(), "punycode label given");
                return Err(HostnameError::PunycodeRejected(
                    label.as_str().into(),
                ));
            }
        }

        let mut res = String::with_capacity(given.len());
        for label in Label::iter_str(given) {
            if label.index() > 0 {
                res.push('.');
            }
            if label.is_root() {
                break;
            }
            res.push_str(&self.label_to_ascii(label)?);
        }

        if self.verify_dns_length {
            let len =
                res.strip_suffix('.').unwrap_or(res.as_str()).len();
            if len > Self::MAX_LEN {
                debug!(len, "hostname too long");
                return Err(HostnameError::TotalLengthExceeded(len));
            }
        }
        Ok(res)
    }

    /// Converts a hostname into its Unicode form.
    ///
    /// All labels are mapped. Labels in ACE form are decoded and the
    /// result mapped again, so that the output is a fixed point of the
    /// conversion. The labels are joined with ASCII full stops.
    pub fn to_unicode(&self, given: &str) -> Result<String, HostnameError> {
        if given.is_empty() {
            return Err(HostnameError::EmptyInput);
        }

        let mut res = String::with_capacity(given.len());
        for label in Label::iter_str(given) {
            if label.index() > 0 {
                res.push('.');
            }
            if label.is_root() {
                break;
            }
            let mapped = map_label(label.as_str(), self)?;
            if !has_ace_prefix(&mapped) {
                res.push_str(&mapped);
                continue;
            }
            let decoded = punycode::from_ace(&mapped)
                .map_err(|err| HostnameError::decode(label.as_str(), err))?;
            let decoded = map_label(&decoded, self)?;
            if has_ace_prefix(&decoded) {
                return Err(HostnameError::decode(
                    label.as_str(),
                    DecodeError::NotCanonical,
                ));
            }
            res.push_str(&decoded);
        }
        Ok(res)
    }

    /// Converts a single, non-root label into ASCII.
    fn label_to_ascii(&self, label: Label) -> Result<String, HostnameError> {
        let raw = label.as_str();
        let mapped = map_label(raw, self).map_err(|err| {
            debug!(label = raw, "{}", err);
            err
        })?;

        if has_ace_prefix(&mapped) {
            // Full-width or otherwise disguised ACE prefixes only show
            // after mapping.
            if !self.allow_ace_input {
                debug!(label = raw, "punycode label given");
                return Err(HostnameError::PunycodeRejected(raw.into()));
            }
            punycode::from_ace(&mapped)
                .map_err(|err| HostnameError::decode(raw, err))?;
            return Ok(mapped);
        }

        if self.validate_labels {
            check_syntax(&mapped)?;
        }

        // Every code point takes at least one octet in the ACE form, so
        // overly long labels can be refused before encoding them.
        if self.verify_dns_length
            && mapped.chars().count() > Label::MAX_LEN
        {
            debug!(label = raw, len = mapped.len(), "bad label length");
            return Err(HostnameError::label_length(&mapped));
        }

        let ace = punycode::to_ace(&mapped)?.into_owned();
        trace!(label = raw, ace = ace.as_str(), "converted label");
        if self.verify_dns_length
            && (ace.is_empty() || ace.len() > Label::MAX_LEN)
        {
            debug!(label = raw, len = ace.len(), "bad label length");
            return Err(HostnameError::label_length(&ace));
        }
        Ok(ace)
    }
}

/// Checks the syntax rules for a mapped label that isn’t in ACE form.
fn check_syntax(label: &str) -> Result<(), HostnameError> {
    let reason = if label.starts_with('-') {
        LabelSyntax::LeadingHyphen
    } else if label.ends_with('-') {
        LabelSyntax::TrailingHyphen
    } else if label.get(2..4) == Some("--") {
        LabelSyntax::ReservedHyphens
    } else if label.chars().next().map_or(false, is_combining_mark) {
        LabelSyntax::LeadingCombiningMark
    } else {
        return Ok(());
    };
    debug!(label, %reason, "invalid label syntax");
    Err(HostnameError::label_syntax(label, reason))
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use alloc::string::ToString;
    use alloc::{format, vec};

    fn ascii(s: &str) -> Result<String, HostnameError> {
        Profile::COMPARISON.to_ascii(s)
    }

    #[test]
    fn comparison_ascii() {
        assert_eq!(ascii("example.com").unwrap(), "example.com");
        assert_eq!(ascii("HashiCorp.com").unwrap(), "hashicorp.com");
        assert_eq!(ascii("invalid").unwrap(), "invalid");
        assert_eq!(ascii("example.com.").unwrap(), "example.com.");
        assert_eq!(ascii("a\u{3002}b\u{FF0E}c").unwrap(), "a.b.c");
    }

    #[test]
    fn comparison_unicode() {
        assert_eq!(ascii("münchen.de").unwrap(), "xn--mnchen-3ya.de");
        assert_eq!(
            ascii("mu\u{0308}nchen.de").unwrap(),
            "xn--mnchen-3ya.de"
        );
        assert_eq!(
            ascii("Испытание.com").unwrap(),
            "xn--80akhbyknj4f.com"
        );
        assert_eq!(ascii("Straße.de").unwrap(), "strasse.de");
    }

    #[test]
    fn empty() {
        assert_eq!(ascii(""), Err(HostnameError::EmptyInput));
        assert_eq!(
            ascii("blah..blah"),
            Err(HostnameError::LabelLengthExceeded {
                label: String::new(),
                len: 0
            })
        );
        assert!(ascii(".").is_err());
        assert!(ascii(".com").is_err());
        assert!(ascii("com..").is_err());
        assert!(ascii("\u{00AD}.com").is_err());
    }

    #[test]
    fn punycode_rejected() {
        for s in ["xn--mnchen-3ya.de", "XN--mnchen-3ya.de", "a.Xn--b"] {
            assert!(matches!(
                ascii(s),
                Err(HostnameError::PunycodeRejected(_))
            ));
        }
        // The prefix only appears after width folding.
        assert_eq!(
            ascii("\u{FF58}\u{FF4E}--abc.de"),
            Err(HostnameError::PunycodeRejected(
                "\u{FF58}\u{FF4E}--abc".to_string()
            ))
        );
        // Punycode is fine for display.
        assert_eq!(
            Profile::DISPLAY.to_ascii("xn--mnchen-3ya.de").unwrap(),
            "xn--mnchen-3ya.de"
        );
    }

    #[test]
    fn mapping_error() {
        assert_eq!(
            ascii("foo bar.com").unwrap_err().to_string(),
            "hostname label \"foo bar\" contains disallowed character U+0020"
        );
        assert!(matches!(
            ascii("foo_bar.com"),
            Err(HostnameError::Mapping(_))
        ));
    }

    #[test]
    fn label_syntax() {
        fn reason(s: &str) -> Option<LabelSyntax> {
            match ascii(s) {
                Err(HostnameError::InvalidLabelSyntax { reason, .. }) => {
                    Some(reason)
                }
                _ => None,
            }
        }

        assert_eq!(reason("-foo.com"), Some(LabelSyntax::LeadingHyphen));
        assert_eq!(reason("foo-.com"), Some(LabelSyntax::TrailingHyphen));
        assert_eq!(reason("ab--cd.com"), Some(LabelSyntax::ReservedHyphens));
        assert_eq!(
            reason("\u{0308}a.com"),
            Some(LabelSyntax::LeadingCombiningMark)
        );
        assert_eq!(reason("a-b.com"), None);
        assert_eq!(reason("a--b.com"), None);

        // Display doesn’t care.
        assert_eq!(
            Profile::DISPLAY.to_ascii("-foo-.com").unwrap(),
            "-foo-.com"
        );
    }

    #[test]
    fn lengths() {
        let label = "a".repeat(63);
        assert_eq!(ascii(&label).unwrap(), label);

        let long = "a".repeat(64);
        assert_eq!(
            ascii(&long),
            Err(HostnameError::LabelLengthExceeded {
                label: long.clone(),
                len: 64
            })
        );

        // The limit applies to the encoded form.
        let wide = "ü".repeat(60);
        assert!(matches!(
            ascii(&wide),
            Err(HostnameError::LabelLengthExceeded { .. })
        ));

        // Refused by code point count before encoding.
        let huge: String = (0x4E00..0x4E00 + 20_000)
            .filter_map(char::from_u32)
            .collect();
        assert_eq!(
            ascii(&huge),
            Err(HostnameError::LabelLengthExceeded {
                label: huge.clone(),
                len: huge.len()
            })
        );

        // 4 * 63 + 3 = 255
        let labels = vec![label.as_str(); 4];
        let name = labels.join(".");
        assert_eq!(
            ascii(&name),
            Err(HostnameError::TotalLengthExceeded(255))
        );

        // 3 * 63 + 62 + 3 = 254, still one too many.
        let name = format!("{}.{}", labels[..3].join("."), "a".repeat(62));
        assert_eq!(
            ascii(&name),
            Err(HostnameError::TotalLengthExceeded(254))
        );

        // 3 * 63 + 61 + 3 = 253 fits, with or without trailing dot.
        let name = format!("{}.{}", labels[..3].join("."), "a".repeat(61));
        assert_eq!(ascii(&name).unwrap(), name);
        let name = format!("{}.", name);
        assert_eq!(ascii(&name).unwrap(), name);

        // Display doesn’t care.
        assert_eq!(Profile::DISPLAY.to_ascii(&long).unwrap(), long);
    }

    #[test]
    fn to_unicode() {
        let display = Profile::DISPLAY;
        assert_eq!(
            display.to_unicode("xn--mnchen-3ya.de").unwrap(),
            "münchen.de"
        );
        assert_eq!(
            display.to_unicode("XN--80AKHBYKNJ4F.COM").unwrap(),
            "испытание.com"
        );
        assert_eq!(display.to_unicode("a..b").unwrap(), "a..b");
        assert_eq!(display.to_unicode("a.b.").unwrap(), "a.b.");
        assert!(matches!(
            display.to_unicode("xn--abc-.com"),
            Err(HostnameError::PunycodeDecode {
                error: DecodeError::NotCanonical,
                ..
            })
        ));
        assert!(matches!(
            display.to_unicode("xn--mnchen-3y.de"),
            Err(HostnameError::PunycodeDecode {
                error: DecodeError::ShortInput,
                ..
            })
        ));
    }
}
