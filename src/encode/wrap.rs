//! Adding tags to a value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::ident::Tag;
use crate::mode::Mode;
use crate::tlv::Tlv;


//------------ wrap ----------------------------------------------------------

/// Adds the tags in `tags` to a value.
///
/// The tags are applied from the inside out, starting at index 0. If the
/// value is a bare value, the first tag is assigned to it directly. This is
/// how a type gets its own tag and how implicit tagging works. Every other
/// tag wraps the value so far in a new constructed TLV, which is how
/// explicit tagging works.
///
/// Each layer receives freshly computed identifier and length octets.
/// Under CER, constructed layers use the indefinite length form. Otherwise,
/// the shortest definite form is used.
///
/// If `tags` is empty, the value is returned unchanged.
pub fn wrap<M: Mode>(value: Tlv, tags: &[Tag]) -> Tlv {
    let mut tags = tags.iter();
    let Some(&first) = tags.next() else {
        return value
    };

    let mut node = if value.is_bare() {
        value
    }
    else {
        Tlv::wrapping(value)
    };
    node.add_header(first, M::INDEFINITE_CONSTRUCTED);
    for &tag in tags {
        node = Tlv::wrapping(node);
        node.add_header(tag, M::INDEFINITE_CONSTRUCTED);
    }
    log::trace!("{} value tagged as {}", M::NAME, node.tag());
    node
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::{self, Config, Scan};
    use crate::length::LengthForm;
    use crate::mode::{Ber, Cer, Der};
    use super::*;

    fn int() -> Tlv {
        Tlv::primitive(&b"\x05"[..])
    }

    #[test]
    fn no_tags() {
        assert_eq!(wrap::<Der>(int(), &[]), int());
        let tagged = wrap::<Der>(int(), &[Tag::INTEGER]);
        assert_eq!(wrap::<Der>(tagged.clone(), &[]), tagged);
    }

    #[test]
    fn implicit() {
        let tlv = wrap::<Ber>(int(), &[Tag::ctx(0)]);
        assert_eq!(tlv.to_vec(), b"\x80\x01\x05");
        assert!(tlv.is_complete());
        assert!(tlv.is_tag_known());
    }

    #[test]
    fn explicit() {
        let tlv = wrap::<Der>(int(), &[Tag::INTEGER, Tag::ctx(1)]);
        assert_eq!(tlv.to_vec(), b"\xa1\x03\x02\x01\x05");

        // Wrapping an already tagged value is explicit, too.
        let tlv = wrap::<Der>(tlv, &[Tag::application(2)]);
        assert_eq!(tlv.to_vec(), b"\x62\x05\xa1\x03\x02\x01\x05");
    }

    #[test]
    fn cer_indefinite() {
        let tlv = wrap::<Cer>(int(), &[Tag::INTEGER, Tag::ctx(1)]);
        assert_eq!(tlv.length_form(), LengthForm::Indefinite);
        assert_eq!(tlv.to_vec(), b"\xa1\x80\x02\x01\x05\x00\x00");

        let seq = wrap::<Cer>(
            Tlv::constructed_from(vec![wrap::<Cer>(int(), &[Tag::INTEGER])]),
            &[Tag::SEQUENCE]
        );
        assert_eq!(seq.to_vec(), b"\x30\x80\x02\x01\x05\x00\x00");
    }

    #[test]
    fn long_lengths() {
        let tlv = wrap::<Der>(
            Tlv::primitive(vec![0u8; 300]), &[Tag::OCTET_STRING, Tag::ctx(0)]
        );
        let encoded = tlv.to_vec();
        assert_eq!(&encoded[..8], b"\xa0\x82\x01\x30\x04\x82\x01\x2c");
        assert_eq!(encoded.len(), 308);
    }

    #[test]
    fn large_tag_numbers() {
        let tlv = wrap::<Ber>(int(), &[Tag::ctx(31)]);
        assert_eq!(tlv.to_vec(), b"\x9f\x1f\x01\x05");
        let tlv = wrap::<Ber>(int(), &[Tag::ctx(200)]);
        assert_eq!(tlv.to_vec(), b"\x9f\x81\x48\x01\x05");
    }

    #[test]
    fn scan_wrapped() {
        let config = Config::default();
        for tags in [
            &[Tag::INTEGER][..],
            &[Tag::ctx(0)][..],
            &[Tag::INTEGER, Tag::ctx(3), Tag::private(40)][..],
        ] {
            for tlv in [
                wrap::<Ber>(int(), tags),
                wrap::<Cer>(int(), tags),
                wrap::<Der>(int(), tags),
            ] {
                let encoded = tlv.to_vec();
                assert_eq!(
                    decode::scan(&encoded[..], &config).unwrap(),
                    Scan::Complete { tlv, consumed: encoded.len() }
                );
            }
        }
    }
}
