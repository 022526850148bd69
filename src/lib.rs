//! Normalization and validation of service hostnames.
//!
//! This crate deals with hostnames that humans type in to identify a
//! service, for instance as part of a module or provider address. Such
//! hostnames may contain non-ASCII characters and there are usually many
//! ways to write what users would consider the same hostname. They differ
//! in letter case, may use full-width characters, decomposed accents, or
//! a different kind of full stop between labels.
//!
//! The crate provides two different normal forms for such hostnames:
//!
//! * The *display form* is meant for showing hostnames to humans. It is
//!   produced by [`for_display`]. The function never fails. Instead, it
//!   returns an empty string if the input can’t be normalized at all.
//! * The *comparison form* is meant for storing and comparing hostnames.
//!   It is produced by [`for_comparison`] and is represented by the
//!   [`Hostname`] type. Producing it applies a number of additional
//!   validation rules and fails if any of them are violated. Two
//!   hostnames in comparison form are equal if and only if their octets
//!   are equal.
//!
//! Use [`is_valid`] if all you need to know is whether a hostname would be
//! accepted for comparison.
//!
//! The building blocks are available, too: [`label`] splits hostnames
//! into labels, [`mapping`] maps the code points of a single label,
//! [`punycode`] provides the codec for the ASCII compatible encoding of
//! labels, and [`profile`] combines all these into the two processing
//! profiles.
//!
//! # Example
//!
//! ```
//! use svchost::{for_comparison, for_display};
//!
//! let name = for_comparison("Испытание.com").unwrap();
//! assert_eq!(name.as_str(), "xn--80akhbyknj4f.com");
//! assert_eq!(name.for_display(), "испытание.com");
//! assert_eq!(for_display("HashiCorp.COM"), "hashicorp.com");
//! assert!(for_comparison("xn--80akhbyknj4f.com").is_err());
//! ```
//!
//! # Reference of Feature Flags
//!
//! The following is the complete list of the feature flags available.
//!
//! * `bytes`: Enables using the type `Bytes` from the
//!   [bytes](https://github.com/tokio-rs/bytes) crate as octets sequence
//!   for hostnames.
//! * `heapless`: enables the use of the `Vec` type from the
//!   [heapless](https://github.com/japaric/heapless) crate as octets
//!   sequence for hostnames.
//! * `serde`: Enables serde serialization for [`Hostname`].
//! * `std`: support for the Rust std library. This feature is enabled by
//!   default.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
#[allow(unused_imports)] // Import macros even if unused.
#[macro_use]
extern crate std;

extern crate alloc;

pub use self::error::{HostnameError, LabelSyntax};
pub use self::hostname::Hostname;
pub use self::profile::Profile;

pub mod error;
pub mod label;
pub mod mapping;
pub mod profile;
pub mod punycode;

mod hostname;

use alloc::string::String;
use alloc::vec::Vec;
use tracing::debug;

//------------ for_display ---------------------------------------------------

/// Converts a hostname into a form suitable for display.
///
/// The hostname is normalized via the display profile and all labels in
/// ACE form are decoded. The result is what users should be shown.
///
/// The display form is not suitable for comparing hostnames since it
/// doesn’t apply any validation. If the hostname cannot be normalized at
/// all, the function returns an empty string.
pub fn for_display(given: &str) -> String {
    Profile::DISPLAY
        .to_ascii(given)
        .and_then(|ascii| Profile::DISPLAY.to_unicode(&ascii))
        .unwrap_or_else(|err| {
            debug!(given, "cannot convert hostname for display: {}", err);
            String::new()
        })
}

//------------ is_valid ------------------------------------------------------

/// Returns whether a hostname is acceptable for comparison.
///
/// This is true exactly if [`for_comparison`] succeeds.
pub fn is_valid(given: &str) -> bool {
    Profile::COMPARISON.to_ascii(given).is_ok()
}

//------------ for_comparison ------------------------------------------------

/// Converts a hostname into its comparison form.
///
/// The hostname must be given in Unicode. Labels in ACE form, i.e., those
/// starting with `xn--` in any letter case, are rejected.
///
/// The returned value stores the hostname in a `Vec<u8>`. If you need a
/// different octets sequence, use [`Hostname::for_comparison_in`].
pub fn for_comparison(
    given: &str,
) -> Result<Hostname<Vec<u8>>, HostnameError> {
    Hostname::vec_for_comparison(given)
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(for_display("HashiCorp.com"), "hashicorp.com");
        assert_eq!(for_display("xn--80akhbyknj4f.com"), "испытание.com");
        assert_eq!(for_display("Испытание.com"), "испытание.com");
        assert_eq!(for_display(""), "");
        assert_eq!(for_display("foo bar"), "");
        assert_eq!(for_display("xn--mnchen-3y.de"), "");
    }

    #[test]
    fn valid() {
        assert!(is_valid("hashicorp.com"));
        assert!(is_valid("invalid"));
        assert!(is_valid("example.com."));
        assert!(!is_valid(""));
        assert!(!is_valid("xn--80akhbyknj4f.com"));
        assert!(!is_valid("-foo.com"));
        assert!(!is_valid("foo..com"));
    }

    #[test]
    fn comparison() {
        assert_eq!(
            for_comparison("Испытание.com").unwrap().as_str(),
            "xn--80akhbyknj4f.com"
        );
        assert_eq!(
            for_comparison("XN--80AKHBYKNJ4F.com"),
            Err(HostnameError::PunycodeRejected("XN--80AKHBYKNJ4F".into()))
        );
        assert_eq!(for_comparison(""), Err(HostnameError::EmptyInput));
    }
}
