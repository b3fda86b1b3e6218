//! Encoding data in BER.
//!
//! This modules provides means to encode data in BER, CER, or DER.
//!
//! Encoding mirrors decoding. A type implementing [`Encode`] produces a
//! _bare value_, a [`Tlv`] without identifier and length octets for its
//! content only. The [tag wrapper][wrap] then adds the tags of the type’s
//! descriptor, producing a complete TLV. Constructed types assemble their
//! bare value from the complete TLVs of their components. For SET and SET
//! OF types, the [canonical orderer][canonical_set] brings the components
//! into the order required by the mode.
//!
//! The [`Mode`] is selected at the type level. It determines whether
//! constructed values use the definite or indefinite length form and
//! which values are sorted.

pub use self::order::{canonical_set, canonical_set_of};
pub use self::wrap::wrap;

use crate::descriptor::{Descriptor, Field, Typed};
use crate::error::{Error, Segment};
use crate::mode::Mode;
use crate::tlv::Tlv;

mod order;
mod wrap;


//------------ Encode --------------------------------------------------------

/// A type that can be encoded into a bare value.
pub trait Encode: Typed {
    /// Encodes the content of the value.
    ///
    /// For a CHOICE type, this is the complete TLV of the chosen
    /// alternative.
    fn encode_value<M: Mode>(&self) -> Result<Tlv, Error>;
}

/// Encodes a value into a complete TLV.
pub fn encode_tlv<M: Mode, T: Encode + ?Sized>(
    value: &T
) -> Result<Tlv, Error> {
    encode_as::<M, T>(value, T::descriptor())
}

/// Encodes a value into a complete TLV using a different descriptor.
///
/// This is used for implicitly or explicitly tagged uses of a type.
pub fn encode_as<M: Mode, T: Encode + ?Sized>(
    value: &T, descriptor: &Descriptor
) -> Result<Tlv, Error> {
    let bare = value.encode_value::<M>().map_err(|err| {
        err.within(Segment::Type(descriptor.name()))
    })?;
    Ok(wrap::<M>(bare, descriptor.tags()))
}

/// Encodes the value of a component into a complete TLV.
pub fn encode_field<M: Mode, T: Encode + ?Sized>(
    field: &Field, value: &T
) -> Result<Tlv, Error> {
    encode_as::<M, T>(value, field.descriptor()).map_err(|err| {
        err.within(Segment::Field(field.name()))
    })
}

/// Encodes a value into a new vec.
pub fn to_vec<M: Mode, T: Encode + ?Sized>(
    value: &T
) -> Result<Vec<u8>, Error> {
    encode_tlv::<M, T>(value).map(|tlv| tlv.to_vec())
}
