//! Error types.
//!
//! All failures of hostname processing are reported through
//! [`HostnameError`]. Callers should treat every variant as ‘input
//! rejected.’ The information carried by the variants is meant for
//! diagnostic messages only.

use crate::mapping::MappingError;
use crate::punycode::{DecodeError, EncodeError};
use alloc::string::String;
use core::fmt;

//------------ HostnameError -------------------------------------------------

/// A hostname could not be processed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HostnameError {
    /// The input was the empty string.
    EmptyInput,

    /// A label was given in punycode form.
    ///
    /// Service hostnames must be given in Unicode. The label is included.
    PunycodeRejected(String),

    /// A label contained a code point not allowed in hostnames.
    Mapping(MappingError),

    /// A label was empty or longer than 63 octets after encoding.
    LabelLengthExceeded {
        /// The label in its encoded form.
        label: String,

        /// The length of the encoded label in octets.
        len: usize,
    },

    /// The entire hostname was longer than 253 octets after encoding.
    ///
    /// The value is the length of the encoded hostname without a trailing
    /// dot.
    TotalLengthExceeded(usize),

    /// A label violated the syntax rules for hostname labels.
    InvalidLabelSyntax {
        /// The offending label after mapping.
        label: String,

        /// Which rule was violated.
        reason: LabelSyntax,
    },

    /// A label in ACE form could not be decoded.
    PunycodeDecode {
        /// The label that failed to decode.
        label: String,

        /// What exactly went wrong.
        error: DecodeError,
    },

    /// A label was too long to be punycode encoded.
    PunycodeEncode(EncodeError),

    /// Octets claimed to be a hostname in comparison form but aren’t.
    NotComparisonForm,

    /// The octets buffer for the hostname was too short.
    ShortBuf,
}

impl HostnameError {
    pub(crate) fn label_length(label: &str) -> Self {
        HostnameError::LabelLengthExceeded {
            label: label.into(),
            len: label.len(),
        }
    }

    pub(crate) fn label_syntax(label: &str, reason: LabelSyntax) -> Self {
        HostnameError::InvalidLabelSyntax {
            label: label.into(),
            reason,
        }
    }

    pub(crate) fn decode(label: &str, error: DecodeError) -> Self {
        HostnameError::PunycodeDecode {
            label: label.into(),
            error,
        }
    }
}

//--- From

impl From<MappingError> for HostnameError {
    fn from(err: MappingError) -> Self {
        HostnameError::Mapping(err)
    }
}

impl From<EncodeError> for HostnameError {
    fn from(err: EncodeError) -> Self {
        HostnameError::PunycodeEncode(err)
    }
}

//--- Display and Error

impl fmt::Display for HostnameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            HostnameError::EmptyInput => {
                f.write_str("empty string is not a valid hostname")
            }
            HostnameError::PunycodeRejected(ref label) => write!(
                f,
                "hostname label {:?} specified in punycode format; \
                 service hostnames must be given in unicode",
                label
            ),
            HostnameError::Mapping(ref err) => err.fmt(f),
            HostnameError::LabelLengthExceeded { ref label, len } => {
                if len == 0 {
                    f.write_str("empty hostname label")
                } else {
                    write!(
                        f,
                        "hostname label {:?} is {} octets long, \
                         maximum is 63",
                        label, len
                    )
                }
            }
            HostnameError::TotalLengthExceeded(len) => write!(
                f,
                "hostname is {} octets long, maximum is 253",
                len
            ),
            HostnameError::InvalidLabelSyntax { ref label, reason } => {
                write!(f, "hostname label {:?} {}", label, reason)
            }
            HostnameError::PunycodeDecode { ref label, error } => {
                write!(f, "hostname label {:?}: {}", label, error)
            }
            HostnameError::PunycodeEncode(ref err) => err.fmt(f),
            HostnameError::NotComparisonForm => {
                f.write_str("hostname not in comparison form")
            }
            HostnameError::ShortBuf => f.write_str("short buffer"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HostnameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            HostnameError::Mapping(ref err) => Some(err),
            HostnameError::PunycodeDecode { ref error, .. } => Some(error),
            HostnameError::PunycodeEncode(ref err) => Some(err),
            _ => None,
        }
    }
}

//------------ LabelSyntax ---------------------------------------------------

/// The label syntax rule that was violated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LabelSyntax {
    /// The label starts with a hyphen.
    LeadingHyphen,

    /// The label ends with a hyphen.
    TrailingHyphen,

    /// The label has hyphens in the third and fourth position.
    ///
    /// This form is reserved for ACE labels.
    ReservedHyphens,

    /// The label starts with a combining mark.
    LeadingCombiningMark,
}

impl fmt::Display for LabelSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            LabelSyntax::LeadingHyphen => "starts with a hyphen",
            LabelSyntax::TrailingHyphen => "ends with a hyphen",
            LabelSyntax::ReservedHyphens => {
                "has hyphens in the third and fourth position"
            }
            LabelSyntax::LeadingCombiningMark => {
                "starts with a combining mark"
            }
        })
    }
}

//============ Testing =======================================================
