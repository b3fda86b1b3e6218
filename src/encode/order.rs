//! Canonical ordering of the children of constructed values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::cmp::Ordering;
use crate::error::{Error, Operation};
use crate::mode::Mode;
use crate::tlv::Tlv;


//------------ Comparing and Sorting -----------------------------------------

/// # Canonical Order
///
impl Tlv {
    /// Compares two values by their complete encoding.
    ///
    /// This is the order of X.690, 11.6: the encodings are compared as
    /// unsigned octet strings with a shorter encoding sorting first if it
    /// is a prefix of the longer one. The encodings are not assembled for
    /// this but produced as needed.
    pub fn compare_encoding(&self, other: &Self) -> Ordering {
        self.octets().cmp(other.octets())
    }

    /// Compares two values by their tag.
    ///
    /// This is the canonical order of X.680, 8.6: universal before
    /// application before context-specific before private tags, and
    /// within a class by tag number.
    pub fn compare_tags(&self, other: &Self) -> Ordering {
        self.tag().cmp(&other.tag())
    }

    /// Sorts the children of a constructed value by their encoding.
    ///
    /// The sort is stable. It fails for a primitive value.
    pub fn sort_by_encoding(&mut self) -> Result<(), Error> {
        self.children_mut()?.sort_by(Tlv::compare_encoding);
        Ok(())
    }

    /// Sorts the children of a constructed value by their tag.
    ///
    /// The sort is stable. It fails for a primitive value.
    pub fn sort_by_tag(&mut self) -> Result<(), Error> {
        self.children_mut()?.sort_by(Tlv::compare_tags);
        Ok(())
    }
}


//------------ canonical_set_of and canonical_set ----------------------------

/// Brings the members of a bare SET OF value into canonical order.
///
/// Under CER and DER, the members are sorted by their encoding. Under BER
/// they are left alone.
pub fn canonical_set_of<M: Mode>(value: &mut Tlv) -> Result<(), Error> {
    if M::SORT_SET_OF {
        value.sort_by_encoding()
    }
    else {
        value.check_constructed().map_err(|_| {
            Error::internal(
                Operation::Encode, "SET OF value is not constructed"
            )
        })
    }
}

/// Brings the components of a bare SET value into canonical order.
///
/// Under CER and DER, the components are sorted by their tag. Under BER
/// they are left alone.
pub fn canonical_set<M: Mode>(value: &mut Tlv) -> Result<(), Error> {
    if M::SORT_SET {
        value.sort_by_tag()
    }
    else {
        value.check_constructed().map_err(|_| {
            Error::internal(
                Operation::Encode, "SET value is not constructed"
            )
        })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::encode::wrap;
    use crate::error::ErrorKind;
    use crate::ident::Tag;
    use crate::mode::{Ber, Cer, Der};
    use super::*;

    fn prim(tag: Tag, content: &'static [u8]) -> Tlv {
        wrap::<Der>(Tlv::primitive(content), &[tag])
    }

    fn encodings(value: &Tlv) -> Vec<Vec<u8>> {
        value.children().iter().map(Tlv::to_vec).collect()
    }

    #[test]
    fn compare_encoding() {
        let a = prim(Tag::OCTET_STRING, b"\x01");
        let b = prim(Tag::OCTET_STRING, b"\x02");
        let long = prim(Tag::OCTET_STRING, b"\x01\x00");
        assert_eq!(a.compare_encoding(&b), Ordering::Less);
        assert_eq!(b.compare_encoding(&a), Ordering::Greater);
        assert_eq!(a.compare_encoding(&a.clone()), Ordering::Equal);
        // 04 01 01 vs. 04 02 01 00: the length octet decides.
        assert_eq!(a.compare_encoding(&long), Ordering::Less);
        assert_eq!(long.compare_encoding(&b), Ordering::Greater);
    }

    #[test]
    fn compare_prefix() {
        // Bare values so the length octets don't interfere.
        let short = Tlv::constructed_from(vec![prim(Tag::NULL, b"")]);
        let mut long = short.clone();
        long.push(prim(Tag::NULL, b"")).unwrap();
        assert_eq!(short.compare_encoding(&long), Ordering::Less);
        assert_eq!(long.compare_encoding(&short), Ordering::Greater);
    }

    #[test]
    fn sort_by_encoding() {
        let mut set = Tlv::constructed_from(vec![
            prim(Tag::INTEGER, b"\x05"),
            prim(Tag::BOOLEAN, b"\xff"),
            prim(Tag::INTEGER, b"\x01\x00"),
            prim(Tag::INTEGER, b"\x01"),
        ]);
        set.sort_by_encoding().unwrap();
        assert_eq!(
            encodings(&set),
            [
                b"\x01\x01\xff".to_vec(),
                b"\x02\x01\x01".to_vec(),
                b"\x02\x01\x05".to_vec(),
                b"\x02\x02\x01\x00".to_vec(),
            ]
        );

        // Idempotent.
        let sorted = set.clone();
        set.sort_by_encoding().unwrap();
        assert_eq!(set, sorted);
    }

    #[test]
    fn sort_is_stable() {
        let mut set = Tlv::constructed_from(vec![
            prim(Tag::ctx(1), b"b"),
            prim(Tag::ctx(0), b"x"),
            prim(Tag::ctx(1), b"a"),
            prim(Tag::ctx(0), b"y"),
        ]);
        set.sort_by_tag().unwrap();
        assert_eq!(
            encodings(&set),
            [
                b"\x80\x01x".to_vec(),
                b"\x80\x01y".to_vec(),
                b"\x81\x01b".to_vec(),
                b"\x81\x01a".to_vec(),
            ]
        );
    }

    #[test]
    fn sort_by_tag_classes() {
        let mut set = Tlv::constructed_from(vec![
            prim(Tag::private(0), b""),
            prim(Tag::ctx(2), b""),
            prim(Tag::application(9), b""),
            prim(Tag::INTEGER, b""),
            prim(Tag::ctx(1), b""),
        ]);
        set.sort_by_tag().unwrap();
        let tags: Vec<_> = set.children().iter().map(Tlv::tag).collect();
        assert_eq!(
            tags,
            [
                Tag::INTEGER, Tag::application(9), Tag::ctx(1), Tag::ctx(2),
                Tag::private(0)
            ]
        );
    }

    #[test]
    fn sort_primitive() {
        let mut value = prim(Tag::INTEGER, b"\x01");
        assert!(matches!(
            value.sort_by_encoding().unwrap_err().kind(),
            ErrorKind::Internal(_)
        ));
        assert!(value.sort_by_tag().is_err());
        assert!(canonical_set_of::<Ber>(&mut value).is_err());
        assert!(canonical_set::<Ber>(&mut value).is_err());
    }

    #[test]
    fn canonical_modes() {
        let members = vec![
            prim(Tag::ctx(1), b"\x02"),
            prim(Tag::ctx(0), b"\x01"),
        ];

        let mut value = Tlv::constructed_from(members.clone());
        canonical_set_of::<Ber>(&mut value).unwrap();
        canonical_set::<Ber>(&mut value).unwrap();
        assert_eq!(value.children(), members.as_slice());

        let mut value = Tlv::constructed_from(members.clone());
        canonical_set::<Cer>(&mut value).unwrap();
        assert_eq!(value.children()[0].tag(), Tag::ctx(0));
        let mut value = Tlv::constructed_from(members.clone());
        canonical_set_of::<Cer>(&mut value).unwrap();
        assert_eq!(value.children()[0].tag(), Tag::ctx(0));

        let mut value = Tlv::constructed_from(members);
        canonical_set::<Der>(&mut value).unwrap();
        assert_eq!(value.children()[0].tag(), Tag::ctx(0));
    }
}
