//! The tag-length-value engine of a codec for the Basic Encoding Rules.
//!
//! This crate implements the parts of an ASN.1 codec for BER and its
//! restricted variants CER and DER, defined in ITU-T Recommendation X.690,
//! that are independent of any concrete ASN.1 type: the representation of
//! encoded values, the handling of tags and lengths, canonical ordering,
//! and the resolution of CHOICE alternatives.
//!
//! Every encoded value is a [`Tlv`]: identifier octets carrying a [`Tag`],
//! length octets, and content that is either a sequence of octets or a
//! sequence of nested TLVs. The [`decode`] module turns octets into TLVs
//! and TLVs into values of Rust types, the [`encode`] module goes the other
//! way. Types describe themselves via a static [`Descriptor`] listing their
//! tags and, for CHOICE types, their alternatives.
//!
//! Implementations of the traits [`Encode`] and [`Decode`] are provided for
//! a few built-in types in the [`builtin`] module.

pub use self::buffer::Buffer;
pub use self::decode::Decode;
pub use self::descriptor::{Descriptor, Typed};
pub use self::encode::Encode;
pub use self::error::{Error, ErrorKind, Operation, Segment};
pub use self::ident::{Class, Tag};
pub use self::length::{Length, LengthForm, LengthForms};
pub use self::mode::{Ber, Cer, Der, Mode};
pub use self::tlv::{Content, Octets, Tlv};

pub mod builtin;
pub mod decode;
pub mod descriptor;
pub mod encode;

mod buffer;
mod error;
mod ident;
mod length;
mod mode;
mod tlv;
