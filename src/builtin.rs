//! Encoding and decoding of some built-in types.
//!
//! This module provides the [`Encode`] and [`Decode`] implementations for
//! the Rust integer types and `bool` as the ASN.1 INTEGER and BOOLEAN
//! types as well as a few types for NULL, OCTET STRING, SEQUENCE OF, and
//! SET OF.

use bytes::{Bytes, BytesMut};
use crate::decode::{self, Config, Decode};
use crate::descriptor::{self, Descriptor, Typed};
use crate::encode::{self, Encode};
use crate::error::{Error, Segment};
use crate::mode::Mode;
use crate::tlv::{Content, Tlv};


//------------ INTEGER -------------------------------------------------------

macro_rules! signed_impl {
    ( $type:ident ) => {
        impl Typed for $type {
            fn descriptor() -> &'static Descriptor {
                &descriptor::INTEGER
            }
        }

        impl Encode for $type {
            fn encode_value<M: Mode>(&self) -> Result<Tlv, Error> {
                Ok(Tlv::primitive(minimal_signed(&self.to_be_bytes())))
            }
        }

        impl Decode for $type {
            fn decode_value(
                value: Tlv, _config: &Config
            ) -> Result<Self, Error> {
                $type::try_from(decode_i64(value)?).map_err(|_| {
                    Error::malformed("INTEGER out of range")
                })
            }
        }
    }
}

signed_impl!(i8);
signed_impl!(i16);
signed_impl!(i32);
signed_impl!(i64);

/// Returns the two’s complement octets without redundant leading octets.
///
/// The first nine bits of the result are never all the same.
fn minimal_signed(octets: &[u8]) -> Bytes {
    let mut start = 0;
    while let (Some(&first), Some(&second)) = (
        octets.get(start), octets.get(start + 1)
    ) {
        if (first == 0 && second & 0x80 == 0)
            || (first == 0xFF && second & 0x80 != 0)
        {
            start += 1
        }
        else {
            break
        }
    }
    Bytes::copy_from_slice(octets.get(start..).unwrap_or_default())
}

/// Decodes the content of an INTEGER into an `i64`.
fn decode_i64(value: Tlv) -> Result<i64, Error> {
    let octets = value.into_value()?;
    match (octets.first(), octets.get(1).map(|x| x & 0x80 != 0)) {
        (None, _) => return Err(Error::malformed("empty INTEGER")),
        (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
            return Err(Error::malformed("INTEGER not in minimal form"))
        }
        _ => { }
    }
    if octets.len() > 8 {
        return Err(Error::malformed("INTEGER out of range"))
    }

    // Start with all ones for a negative number so the sign extends.
    let mut res: i64 = match octets.first() {
        Some(first) if first & 0x80 != 0 => -1,
        _ => 0
    };
    for &octet in octets.iter() {
        res = (res << 8) | i64::from(octet);
    }
    Ok(res)
}


//------------ BOOLEAN -------------------------------------------------------

impl Typed for bool {
    fn descriptor() -> &'static Descriptor {
        &descriptor::BOOLEAN
    }
}

impl Encode for bool {
    fn encode_value<M: Mode>(&self) -> Result<Tlv, Error> {
        if *self {
            Ok(Tlv::primitive(&b"\xff"[..]))
        }
        else {
            Ok(Tlv::primitive(&b"\x00"[..]))
        }
    }
}

impl Decode for bool {
    /// Decodes a BOOLEAN.
    ///
    /// Any non-zero value is `true` as permitted by BER.
    fn decode_value(value: Tlv, _config: &Config) -> Result<Self, Error> {
        match &value.into_value()?[..] {
            [octet] => Ok(*octet != 0),
            _ => Err(Error::malformed("invalid BOOLEAN")),
        }
    }
}


//------------ Null ----------------------------------------------------------

/// A value of the NULL type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Null;

impl Typed for Null {
    fn descriptor() -> &'static Descriptor {
        &descriptor::NULL
    }
}

impl Encode for Null {
    fn encode_value<M: Mode>(&self) -> Result<Tlv, Error> {
        Ok(Tlv::primitive(Bytes::new()))
    }
}

impl Decode for Null {
    fn decode_value(value: Tlv, _config: &Config) -> Result<Self, Error> {
        if value.into_value()?.is_empty() {
            Ok(Null)
        }
        else {
            Err(Error::malformed("invalid NULL"))
        }
    }
}


//------------ OctetString ---------------------------------------------------

/// A value of the OCTET STRING type.
///
/// When decoding, the constructed form is accepted and its segments are
/// joined. Encoding always uses the primitive form.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct OctetString(pub Bytes);

impl OctetString {
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Typed for OctetString {
    fn descriptor() -> &'static Descriptor {
        &descriptor::OCTET_STRING
    }
}

impl Encode for OctetString {
    fn encode_value<M: Mode>(&self) -> Result<Tlv, Error> {
        Ok(Tlv::primitive(self.0.clone()))
    }
}

impl Decode for OctetString {
    fn decode_value(value: Tlv, config: &Config) -> Result<Self, Error> {
        match value.into_content() {
            Content::Primitive(octets) => Ok(OctetString(octets)),
            Content::Constructed(segments) => {
                let mut res = BytesMut::new();
                for (idx, segment) in segments.into_iter().enumerate() {
                    let segment: OctetString = decode::decode_tlv(
                        segment, config
                    ).map_err(|err| err.within(Segment::Element(idx)))?;
                    res.extend_from_slice(segment.as_slice());
                }
                Ok(OctetString(res.freeze()))
            }
        }
    }
}


//------------ SequenceOf and SetOf ------------------------------------------

/// A value of a SEQUENCE OF type.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SequenceOf<T>(pub Vec<T>);

/// A value of a SET OF type.
///
/// Under CER and DER, the elements are encoded in the order of their
/// encodings. Decoding keeps the order found in the data.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SetOf<T>(pub Vec<T>);

impl<T> Typed for SequenceOf<T> {
    fn descriptor() -> &'static Descriptor {
        &descriptor::SEQUENCE
    }
}

impl<T> Typed for SetOf<T> {
    fn descriptor() -> &'static Descriptor {
        &descriptor::SET
    }
}

impl<T: Encode> Encode for SequenceOf<T> {
    fn encode_value<M: Mode>(&self) -> Result<Tlv, Error> {
        encode_elements::<M, T>(&self.0)
    }
}

impl<T: Encode> Encode for SetOf<T> {
    fn encode_value<M: Mode>(&self) -> Result<Tlv, Error> {
        let mut res = encode_elements::<M, T>(&self.0)?;
        encode::canonical_set_of::<M>(&mut res)?;
        Ok(res)
    }
}

impl<T: Decode> Decode for SequenceOf<T> {
    fn decode_value(value: Tlv, config: &Config) -> Result<Self, Error> {
        decode_elements(value, config).map(SequenceOf)
    }
}

impl<T: Decode> Decode for SetOf<T> {
    fn decode_value(value: Tlv, config: &Config) -> Result<Self, Error> {
        decode_elements(value, config).map(SetOf)
    }
}

fn encode_elements<M: Mode, T: Encode>(
    elements: &[T]
) -> Result<Tlv, Error> {
    let mut res = Vec::with_capacity(elements.len());
    for (idx, element) in elements.iter().enumerate() {
        res.push(
            encode::encode_tlv::<M, T>(element).map_err(|err| {
                err.within(Segment::Element(idx))
            })?
        );
    }
    Ok(Tlv::constructed_from(res))
}

fn decode_elements<T: Decode>(
    value: Tlv, config: &Config
) -> Result<Vec<T>, Error> {
    value.into_children()?.into_iter().enumerate().map(|(idx, child)| {
        decode::decode_tlv(child, config).map_err(|err| {
            err.within(Segment::Element(idx))
        })
    }).collect()
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::from_slice;
    use crate::encode::to_vec;
    use crate::error::ErrorKind;
    use crate::mode::{Ber, Cer, Der};
    use super::*;

    fn der<T: Encode>(value: &T) -> Vec<u8> {
        to_vec::<Der, T>(value).unwrap()
    }

    fn ber<T: Decode>(data: &[u8]) -> Result<T, Error> {
        from_slice(data, &Config::default())
    }

    #[test]
    fn encode_integers() {
        assert_eq!(der(&0i64), b"\x02\x01\x00");
        assert_eq!(der(&5i64), b"\x02\x01\x05");
        assert_eq!(der(&127i64), b"\x02\x01\x7f");
        assert_eq!(der(&128i64), b"\x02\x02\x00\x80");
        assert_eq!(der(&-1i64), b"\x02\x01\xff");
        assert_eq!(der(&-128i64), b"\x02\x01\x80");
        assert_eq!(der(&-129i64), b"\x02\x02\xff\x7f");
        assert_eq!(der(&0x1234i16), b"\x02\x02\x12\x34");
        assert_eq!(der(&i8::MIN), b"\x02\x01\x80");
        assert_eq!(
            der(&i64::MAX), b"\x02\x08\x7f\xff\xff\xff\xff\xff\xff\xff"
        );
    }

    #[test]
    fn decode_integers() {
        assert_eq!(ber::<i64>(b"\x02\x01\x05").unwrap(), 5);
        assert_eq!(ber::<i64>(b"\x02\x02\xff\x7f").unwrap(), -129);
        assert_eq!(ber::<i32>(b"\x02\x02\x00\x80").unwrap(), 128);
        assert_eq!(ber::<i8>(b"\x02\x01\x80").unwrap(), -128);
        assert_eq!(
            ber::<i64>(b"\x02\x08\x80\x00\x00\x00\x00\x00\x00\x00").unwrap(),
            i64::MIN
        );
        assert!(ber::<i8>(b"\x02\x02\x00\x80").is_err());
        assert!(ber::<i64>(b"\x02\x00").is_err());
        assert!(ber::<i64>(b"\x02\x02\x00\x05").is_err());
        assert!(ber::<i64>(b"\x02\x02\xff\x80").is_err());
        assert!(
            ber::<i64>(b"\x02\x09\x01\x00\x00\x00\x00\x00\x00\x00\x00")
                .is_err()
        );
        assert!(ber::<i64>(b"\x22\x03\x02\x01\x05").is_err());
    }

    #[test]
    fn booleans_and_null() {
        assert_eq!(der(&true), b"\x01\x01\xff");
        assert_eq!(der(&false), b"\x01\x01\x00");
        assert!(ber::<bool>(b"\x01\x01\x01").unwrap());
        assert!(!ber::<bool>(b"\x01\x01\x00").unwrap());
        assert!(ber::<bool>(b"\x01\x02\x00\x00").is_err());
        assert_eq!(der(&Null), b"\x05\x00");
        assert_eq!(ber::<Null>(b"\x05\x00").unwrap(), Null);
        assert!(ber::<Null>(b"\x05\x01\x00").is_err());
    }

    #[test]
    fn octet_strings() {
        let value = OctetString(Bytes::from_static(b"foo"));
        assert_eq!(der(&value), b"\x04\x03foo");
        assert_eq!(ber::<OctetString>(b"\x04\x03foo").unwrap(), value);
        assert_eq!(
            ber::<OctetString>(
                b"\x24\x80\x04\x02fo\x24\x03\x04\x01o\x00\x00"
            ).unwrap(),
            value
        );
        let err = ber::<OctetString>(b"\x24\x03\x02\x01\x05").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TagMismatch { .. }));
    }

    #[test]
    fn sequence_of() {
        let value = SequenceOf(vec![1i64, 2, 3]);
        let encoded = der(&value);
        assert_eq!(encoded, b"\x30\x09\x02\x01\x01\x02\x01\x02\x02\x01\x03");
        assert_eq!(ber::<SequenceOf<i64>>(&encoded).unwrap(), value);
        assert_eq!(
            to_vec::<Cer, _>(&value).unwrap(),
            b"\x30\x80\x02\x01\x01\x02\x01\x02\x02\x01\x03\x00\x00"
        );
    }

    #[test]
    fn set_of() {
        let value = SetOf(vec![256i64, 3, -1]);
        assert_eq!(
            to_vec::<Ber, _>(&value).unwrap(),
            b"\x31\x0a\x02\x02\x01\x00\x02\x01\x03\x02\x01\xff"
        );
        assert_eq!(
            der(&value),
            b"\x31\x0a\x02\x01\x03\x02\x01\xff\x02\x02\x01\x00"
        );
        assert_eq!(
            ber::<SetOf<i64>>(&der(&value)).unwrap(),
            SetOf(vec![3, -1, 256])
        );
    }

    #[test]
    fn element_paths() {
        let err = ber::<SequenceOf<i64>>(
            b"\x30\x06\x02\x01\x01\x01\x01\x00"
        ).unwrap_err();
        assert_eq!(
            err.to_string(),
            "while BER-decoding type 'SEQUENCE': element #1: \
             type 'INTEGER': tag mismatch: expected INTEGER, \
             received BOOLEAN"
        );
    }
}
