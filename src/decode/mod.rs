//! Decoding data in BER.
//!
//! Decoding happens in three steps. First, the [scanner][scan] turns a
//! sequence of octets into a tree of [`Tlv`]s without looking at what the
//! tags mean. Then, for each value, the [stripper][strip] checks and
//! removes the tags of the expected type, leaving a bare value. Finally,
//! the type’s [`Decode::decode_value`] interprets the bare value, for a
//! CHOICE type with the help of the [resolver][resolve] and for SEQUENCE
//! and SET types with the help of the [component assignment][sequence].
//!
//! All steps are controlled by a [`Config`] that determines which length
//! forms are acceptable and how deeply values may be nested.

pub use self::choice::{
    decode_alternative, decode_choice, is_my_message, resolve, select,
};
pub use self::components::{decode_field, sequence, set};
pub use self::scan::{Input, Scan, scan, scan_all, scan_at};
pub use self::strip::strip;

use bytes::Bytes;
use crate::descriptor::{Descriptor, Typed};
use crate::error::{Error, Segment};
use crate::length::LengthForms;
use crate::tlv::Tlv;

mod choice;
mod components;
mod scan;
mod strip;


//------------ Decode --------------------------------------------------------

/// A type that can be decoded from a bare value.
///
/// Implementations only deal with the content of the type. Tags are checked
/// and removed before [`decode_value`][Self::decode_value] is called
/// according to the descriptor given by the [`Typed`] super trait or, for
/// implicitly or explicitly tagged uses of the type, by
/// [`decode_as`].
pub trait Decode: Typed + Sized {
    /// Decodes a value from a bare value.
    ///
    /// For types with tags, `value` has its tags removed. For an untagged
    /// CHOICE or ANY type, `value` is the complete TLV.
    fn decode_value(value: Tlv, config: &Config) -> Result<Self, Error>;
}

/// Decodes a value of type `T` from a TLV.
pub fn decode_tlv<T: Decode>(tlv: Tlv, config: &Config) -> Result<T, Error> {
    decode_as(tlv, T::descriptor(), config)
}

/// Decodes a value of type `T` from a TLV using a different descriptor.
///
/// This is used for implicitly or explicitly tagged uses of a type.
pub fn decode_as<T: Decode>(
    tlv: Tlv, descriptor: &Descriptor, config: &Config
) -> Result<T, Error> {
    let value = strip(tlv, descriptor)?;
    T::decode_value(value, config).map_err(|err| {
        err.within(Segment::Type(descriptor.name()))
    })
}

/// Decodes a value of type `T` from a slice.
///
/// The slice must contain exactly one complete TLV.
pub fn from_slice<T: Decode>(data: &[u8], config: &Config) -> Result<T, Error> {
    decode_tlv(scan_all(data, config)?, config)
}

/// Decodes a value of type `T` from bytes.
///
/// Primitive content is not copied but shared with `data`.
pub fn from_bytes<T: Decode>(
    data: &Bytes, config: &Config
) -> Result<T, Error> {
    decode_tlv(scan_all(data, config)?, config)
}


//------------ Config --------------------------------------------------------

/// The configuration for decoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// The length forms accepted by the scanner.
    forms: LengthForms,

    /// The maximum nesting depth of values.
    max_depth: usize,
}

impl Config {
    /// The default maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Creates the default configuration.
    ///
    /// This accepts all length forms and a nesting depth of
    /// [`DEFAULT_MAX_DEPTH`][Self::DEFAULT_MAX_DEPTH].
    pub const fn new() -> Self {
        Config {
            forms: LengthForms::ALL,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the accepted length forms.
    pub const fn with_forms(mut self, forms: LengthForms) -> Self {
        self.forms = forms;
        self
    }

    /// Sets the maximum nesting depth.
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn forms(&self) -> LengthForms {
        self.forms
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
