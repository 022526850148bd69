//! Hostnames in comparison form.
//!
//! This is a private module. Its public types are re-exported by the parent.

use crate::error::HostnameError;
use crate::label::{Label, LabelIter};
use crate::profile::Profile;
use alloc::string::String;
use alloc::vec::Vec;
#[cfg(feature = "bytes")]
use bytes::Bytes;
use core::str::FromStr;
use core::{borrow, cmp, fmt, hash, str};
use octseq::builder::{
    EmptyBuilder, FreezeBuilder, FromBuilder, OctetsBuilder,
};
use octseq::octets::OctetsFrom;
#[cfg(feature = "serde")]
use octseq::serde::{DeserializeOctets, SerializeOctets};

//------------ Hostname ------------------------------------------------------

/// A hostname in its storage and comparison form.
///
/// The type wraps an octets sequence that contains a hostname that has
/// passed through the comparison profile: all labels are mapped, labels
/// with non-ASCII characters are punycode encoded, and all the validation
/// rules have been checked. Because of that, two values can be compared
/// simply by comparing their octets. This is what the `PartialEq`, `Ord`,
/// and `Hash` implementations do.
///
/// Values of this type are not suitable for display in a user interface
/// since the punycode labels are unreadable for humans. Use
/// [`for_display`][Self::for_display] to get a form suitable for that.
///
/// The only way to get a value is through the comparison profile, either
/// via [`for_comparison`][crate::for_comparison] and its variants or by
/// re-validating octets previously taken from a hostname with
/// [`from_octets`][Self::from_octets].
#[derive(Clone)]
#[repr(transparent)]
pub struct Hostname<Octs: ?Sized>(Octs);

/// # Creating Values
///
impl<Octs> Hostname<Octs> {
    /// Creates a hostname from the underlying octets without any check.
    ///
    /// # Safety
    ///
    /// The octets must have been produced by the comparison profile. In
    /// particular, they must be ASCII.
    pub(crate) const unsafe fn from_octets_unchecked(octets: Octs) -> Self {
        Self(octets)
    }

    /// Normalizes and validates a user-supplied hostname.
    ///
    /// The hostname is converted via the comparison profile and the
    /// result is placed into a newly built octets sequence. This fails if
    /// the hostname is invalid or with [`HostnameError::ShortBuf`] if the
    /// octets builder runs out of space.
    pub fn for_comparison_in(given: &str) -> Result<Self, HostnameError>
    where
        Octs: FromBuilder,
        <Octs as FromBuilder>::Builder:
            EmptyBuilder + FreezeBuilder<Octets = Octs>,
    {
        let ascii = Profile::COMPARISON.to_ascii(given)?;
        let mut builder = <Octs as FromBuilder>::Builder::empty();
        builder
            .append_slice(ascii.as_bytes())
            .map_err(|_| HostnameError::ShortBuf)?;
        Ok(unsafe { Self::from_octets_unchecked(builder.freeze()) })
    }

    /// Creates a hostname from octets that are already in comparison form.
    ///
    /// This is intended for reading back hostnames that have been stored
    /// somewhere. The octets are converted into their display form which
    /// is then passed through the comparison profile again. Only if this
    /// results in exactly the same octets is the value accepted.
    pub fn from_octets(octets: Octs) -> Result<Self, HostnameError>
    where
        Octs: AsRef<[u8]>,
    {
        Hostname::<[u8]>::check_slice(octets.as_ref())?;
        Ok(unsafe { Self::from_octets_unchecked(octets) })
    }
}

impl Hostname<[u8]> {
    /// Checks that a slice contains a hostname in comparison form.
    fn check_slice(slice: &[u8]) -> Result<(), HostnameError> {
        let s = match str::from_utf8(slice) {
            Ok(s) if s.is_ascii() => s,
            _ => return Err(HostnameError::NotComparisonForm),
        };
        let display = Profile::COMPARISON.to_unicode(s)?;
        if Profile::COMPARISON.to_ascii(&display)?.as_bytes() != slice {
            return Err(HostnameError::NotComparisonForm);
        }
        Ok(())
    }
}

impl Hostname<Vec<u8>> {
    /// Normalizes a hostname into a `Vec<u8>`.
    pub fn vec_for_comparison(given: &str) -> Result<Self, HostnameError> {
        Self::for_comparison_in(given)
    }
}

#[cfg(feature = "bytes")]
impl Hostname<Bytes> {
    /// Normalizes a hostname into a `Bytes` value.
    pub fn bytes_for_comparison(given: &str) -> Result<Self, HostnameError> {
        Self::for_comparison_in(given)
    }
}

/// # Conversions
///
impl<Octs: ?Sized> Hostname<Octs> {
    /// Returns a reference to the underlying octets sequence.
    pub fn as_octets(&self) -> &Octs {
        &self.0
    }

    /// Converts the hostname into the underlying octets sequence.
    pub fn into_octets(self) -> Octs
    where
        Octs: Sized,
    {
        self.0
    }

    /// Returns a reference to the underlying octets slice.
    pub fn as_slice(&self) -> &[u8]
    where
        Octs: AsRef<[u8]>,
    {
        self.0.as_ref()
    }

    /// Returns the hostname in comparison form as a string slice.
    pub fn as_str(&self) -> &str
    where
        Octs: AsRef<[u8]>,
    {
        // SAFETY: A hostname only ever contains ASCII.
        unsafe { str::from_utf8_unchecked(self.0.as_ref()) }
    }

    /// Returns a hostname using a reference to the octets.
    pub fn for_ref(&self) -> Hostname<&Octs> {
        unsafe { Hostname::from_octets_unchecked(&self.0) }
    }
}

/// # Properties
///
impl<Octs: AsRef<[u8]> + ?Sized> Hostname<Octs> {
    /// Returns the length of the hostname in octets.
    pub fn len(&self) -> usize {
        self.0.as_ref().len()
    }

    /// Returns whether the hostname is empty.
    ///
    /// This is never the case but clippy insists on having this method.
    pub fn is_empty(&self) -> bool {
        self.0.as_ref().is_empty()
    }

    /// Returns whether the hostname ends in a dot.
    pub fn is_absolute(&self) -> bool {
        self.0.as_ref().ends_with(b".")
    }

    /// Returns an iterator over the labels of the hostname.
    ///
    /// The labels are in comparison form. If the hostname ends in a dot,
    /// the last label is the empty root label.
    pub fn labels(&self) -> LabelIter<'_> {
        Label::iter_str(self.as_str())
    }

    /// Returns the number of labels including a possible root label.
    pub fn label_count(&self) -> usize {
        self.labels().count()
    }
}

/// # Display Form
///
impl<Octs: AsRef<[u8]> + ?Sized> Hostname<Octs> {
    /// Returns the hostname in a form suitable for display.
    ///
    /// All punycode labels are converted back into Unicode.
    ///
    /// Note that this doesn’t necessarily produce the same result as
    /// running the original input through [`for_display`][crate::for_display]
    /// since the comparison form went through stricter processing.
    ///
    /// # Panics
    ///
    /// Since the hostname has passed validation, decoding can’t fail. If it
    /// does, the value was created in some illegitimate way and the method
    /// panics.
    pub fn for_display(&self) -> String {
        match Profile::COMPARISON.to_unicode(self.as_str()) {
            Ok(res) => res,
            Err(err) => panic!(
                "for_display called on invalid hostname {:?}: {}",
                self.as_str(),
                err
            ),
        }
    }
}

//--- AsRef

impl<Octs: AsRef<[u8]> + ?Sized> AsRef<[u8]> for Hostname<Octs> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<Octs: AsRef<[u8]> + ?Sized> AsRef<str> for Hostname<Octs> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<Octs: AsRef<[u8]> + ?Sized> borrow::Borrow<[u8]> for Hostname<Octs> {
    fn borrow(&self) -> &[u8] {
        self.0.as_ref()
    }
}

//--- OctetsFrom

impl<Octs, SrcOcts> OctetsFrom<Hostname<SrcOcts>> for Hostname<Octs>
where
    Octs: OctetsFrom<SrcOcts>,
{
    type Error = Octs::Error;

    fn try_octets_from(
        source: Hostname<SrcOcts>,
    ) -> Result<Self, Self::Error> {
        Octs::try_octets_from(source.0)
            .map(|octets| unsafe { Self::from_octets_unchecked(octets) })
    }
}

//--- FromStr

impl<Octs> FromStr for Hostname<Octs>
where
    Octs: FromBuilder,
    <Octs as FromBuilder>::Builder:
        EmptyBuilder + FreezeBuilder<Octets = Octs>,
{
    type Err = HostnameError;

    /// Normalizes and validates a user-supplied hostname.
    ///
    /// This is the same as [`Hostname::for_comparison_in`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_comparison_in(s)
    }
}

//--- PartialEq and Eq

impl<Octs, Other> PartialEq<Hostname<Other>> for Hostname<Octs>
where
    Octs: AsRef<[u8]> + ?Sized,
    Other: AsRef<[u8]> + ?Sized,
{
    fn eq(&self, other: &Hostname<Other>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<Octs: AsRef<[u8]> + ?Sized> Eq for Hostname<Octs> {}

//--- PartialOrd and Ord

impl<Octs, Other> PartialOrd<Hostname<Other>> for Hostname<Octs>
where
    Octs: AsRef<[u8]> + ?Sized,
    Other: AsRef<[u8]> + ?Sized,
{
    fn partial_cmp(&self, other: &Hostname<Other>) -> Option<cmp::Ordering> {
        Some(self.as_slice().cmp(other.as_slice()))
    }
}

impl<Octs: AsRef<[u8]> + ?Sized> Ord for Hostname<Octs> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

//--- Hash

impl<Octs: AsRef<[u8]> + ?Sized> hash::Hash for Hostname<Octs> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

//--- Display and Debug

impl<Octs: AsRef<[u8]> + ?Sized> fmt::Display for Hostname<Octs> {
    /// Formats the hostname in comparison form.
    ///
    /// Use [`Hostname::for_display`] for showing hostnames to humans.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<Octs: AsRef<[u8]> + ?Sized> fmt::Debug for Hostname<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hostname({:?})", self.as_str())
    }
}

//--- Serialize and Deserialize

#[cfg(feature = "serde")]
impl<Octs> serde::Serialize for Hostname<Octs>
where
    Octs: AsRef<[u8]> + SerializeOctets + ?Sized,
{
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_newtype_struct("Hostname", self.as_str())
        } else {
            serializer.serialize_newtype_struct(
                "Hostname",
                &self.0.as_serialized_octets(),
            )
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, Octs> serde::Deserialize<'de> for Hostname<Octs>
where
    Octs: FromBuilder + DeserializeOctets<'de> + AsRef<[u8]>,
    <Octs as FromBuilder>::Builder:
        FreezeBuilder<Octets = Octs> + EmptyBuilder,
{
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        use core::marker::PhantomData;

        struct InnerVisitor<'de, T: DeserializeOctets<'de>>(T::Visitor);

        impl<'de, Octs> serde::de::Visitor<'de> for InnerVisitor<'de, Octs>
        where
            Octs: FromBuilder + DeserializeOctets<'de> + AsRef<[u8]>,
            <Octs as FromBuilder>::Builder:
                FreezeBuilder<Octets = Octs> + EmptyBuilder,
        {
            type Value = Hostname<Octs>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a hostname in comparison form")
            }

            fn visit_str<E: serde::de::Error>(
                self,
                v: &str,
            ) -> Result<Self::Value, E> {
                Hostname::<[u8]>::check_slice(v.as_bytes())
                    .map_err(E::custom)?;
                let mut builder = <Octs as FromBuilder>::Builder::empty();
                builder
                    .append_slice(v.as_bytes())
                    .map_err(|_| E::custom(HostnameError::ShortBuf))?;
                Ok(unsafe {
                    Hostname::from_octets_unchecked(builder.freeze())
                })
            }

            fn visit_borrowed_bytes<E: serde::de::Error>(
                self,
                value: &'de [u8],
            ) -> Result<Self::Value, E> {
                self.0.visit_borrowed_bytes(value).and_then(|octets| {
                    Hostname::from_octets(octets).map_err(E::custom)
                })
            }

            #[cfg(feature = "std")]
            fn visit_byte_buf<E: serde::de::Error>(
                self,
                value: std::vec::Vec<u8>,
            ) -> Result<Self::Value, E> {
                self.0.visit_byte_buf(value).and_then(|octets| {
                    Hostname::from_octets(octets).map_err(E::custom)
                })
            }
        }

        struct NewtypeVisitor<T>(PhantomData<T>);

        impl<'de, Octs> serde::de::Visitor<'de> for NewtypeVisitor<Octs>
        where
            Octs: FromBuilder + DeserializeOctets<'de> + AsRef<[u8]>,
            <Octs as FromBuilder>::Builder:
                FreezeBuilder<Octets = Octs> + EmptyBuilder,
        {
            type Value = Hostname<Octs>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a hostname in comparison form")
            }

            fn visit_newtype_struct<D: serde::Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<Self::Value, D::Error> {
                if deserializer.is_human_readable() {
                    deserializer
                        .deserialize_str(InnerVisitor(Octs::visitor()))
                } else {
                    Octs::deserialize_with_visitor(
                        deserializer,
                        InnerVisitor(Octs::visitor()),
                    )
                }
            }
        }

        deserializer.deserialize_newtype_struct(
            "Hostname",
            NewtypeVisitor(PhantomData),
        )
    }
}

//============ Testing =======================================================
