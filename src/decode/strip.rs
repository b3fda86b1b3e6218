//! Removing the tags of a type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::descriptor::{Descriptor, Kind};
use crate::error::{Error, ErrorKind, Segment};
use crate::ident::Tag;
use crate::tlv::{Content, Tlv};


//------------ strip ---------------------------------------------------------

/// Checks and removes the tags of a type from a TLV.
///
/// The tags of `descriptor` are checked from the outermost to the
/// innermost. Every tag but the innermost one is an explicit tag, so the
/// TLV must be constructed with exactly one child which is then checked
/// against the next tag.
///
/// What happens with the innermost layer depends on the kind of type. For
/// a plain type, the TLV’s identifier and length octets are removed and the
/// bare value is returned. For a tagged CHOICE or ANY type, the innermost
/// tag is an explicit tag, too, and its single child is returned as is.
///
/// If the descriptor doesn’t have any tags, the TLV is returned untouched.
/// A TLV whose tag is not known is accepted for any tag.
pub fn strip(tlv: Tlv, descriptor: &Descriptor) -> Result<Tlv, Error> {
    strip_tags(tlv, descriptor).map_err(|err| {
        err.within(Segment::Type(descriptor.name()))
    })
}

fn strip_tags(tlv: Tlv, descriptor: &Descriptor) -> Result<Tlv, Error> {
    let tags = descriptor.tags();
    if tags.is_empty() {
        return Ok(tlv)
    }

    let mut node = tlv;
    for (idx, &expected) in tags.iter().enumerate().rev() {
        check_tag(&node, expected)?;
        if idx == 0 {
            break
        }
        if !node.is_constructed() {
            return Err(Error::decode(ErrorKind::MissingTags { missing: idx }))
        }
        node = single_child(node)?;
    }

    match descriptor.kind() {
        Kind::Plain => {
            node.strip_header();
            Ok(node)
        }
        Kind::Choice(_) | Kind::Any => {
            node.check_constructed()?;
            single_child(node)
        }
    }
}

fn check_tag(node: &Tlv, expected: Tag) -> Result<(), Error> {
    if node.is_tag_known() && node.tag() != expected {
        Err(Error::decode(ErrorKind::TagMismatch {
            expected, received: node.tag()
        }))
    }
    else {
        Ok(())
    }
}

/// Returns the only child of a constructed node.
fn single_child(node: Tlv) -> Result<Tlv, Error> {
    let Content::Constructed(children) = node.into_content() else {
        return Err(Error::decode(ErrorKind::NotConstructed))
    };
    let mut children = children.into_iter();
    match (children.next(), children.next()) {
        (Some(child), None) => Ok(child),
        (None, _) => Err(Error::malformed("missing TLV inside explicit tag")),
        (Some(_), Some(_)) => Err(Error::decode(ErrorKind::Superfluous)),
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::descriptor::{self, Alternative};
    use crate::encode::wrap;
    use crate::mode::{Ber, Cer};
    use super::*;

    static IMPLICIT: Descriptor = Descriptor::plain("Implicit", &[Tag::ctx(0)]);
    static EXPLICIT: Descriptor = Descriptor::plain(
        "Explicit", &[Tag::INTEGER, Tag::ctx(0), Tag::application(3)]
    );
    static ALTERNATIVES: [Alternative; 1] = [
        Alternative::new("int", &descriptor::INTEGER)
    ];
    static TAGGED_CHOICE: Descriptor = Descriptor::choice(
        "Tagged", &[Tag::ctx(7)], &ALTERNATIVES
    );

    fn int() -> Tlv {
        Tlv::primitive(&b"\x05"[..])
    }

    #[test]
    fn no_tags() {
        let tlv = wrap::<Ber>(int(), &[Tag::INTEGER]);
        assert_eq!(strip(tlv.clone(), &descriptor::ANY).unwrap(), tlv);
    }

    #[test]
    fn implicit() {
        let tlv = wrap::<Ber>(int(), IMPLICIT.tags());
        assert_eq!(tlv.to_vec(), b"\x80\x01\x05");
        assert_eq!(strip(tlv, &IMPLICIT).unwrap(), int());
    }

    #[test]
    fn explicit() {
        let tlv = wrap::<Ber>(int(), EXPLICIT.tags());
        assert_eq!(tlv.to_vec(), b"\x63\x05\xa0\x03\x02\x01\x05");
        assert_eq!(strip(tlv, &EXPLICIT).unwrap(), int());

        let tlv = wrap::<Cer>(int(), EXPLICIT.tags());
        assert_eq!(strip(tlv, &EXPLICIT).unwrap(), int());
    }

    #[test]
    fn tag_mismatch() {
        let tlv = wrap::<Ber>(int(), &[Tag::INTEGER, Tag::ctx(1)]);
        let err = strip(tlv, &EXPLICIT).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::TagMismatch {
                expected: Tag::application(3), received: Tag::ctx(1)
            }
        );
        assert_eq!(
            err.path().collect::<Vec<_>>(), [&Segment::Type("Explicit")]
        );

        let tlv = wrap::<Ber>(
            int(), &[Tag::OCTET_STRING, Tag::ctx(0), Tag::application(3)]
        );
        assert_eq!(
            strip(tlv, &EXPLICIT).unwrap_err().kind(),
            &ErrorKind::TagMismatch {
                expected: Tag::INTEGER, received: Tag::OCTET_STRING
            }
        );
    }

    #[test]
    fn missing_tags() {
        let tlv = wrap::<Ber>(int(), &[Tag::application(3)]);
        assert_eq!(
            strip(tlv, &EXPLICIT).unwrap_err().kind(),
            &ErrorKind::MissingTags { missing: 2 }
        );
    }

    #[test]
    fn superfluous() {
        let mut outer = Tlv::constructed_from(vec![
            wrap::<Ber>(int(), &[Tag::INTEGER]),
            wrap::<Ber>(int(), &[Tag::INTEGER]),
        ]);
        outer.add_header(Tag::ctx(7), false);
        assert_eq!(
            strip(outer, &TAGGED_CHOICE).unwrap_err().kind(),
            &ErrorKind::Superfluous
        );

        let mut empty = Tlv::constructed();
        empty.add_header(Tag::ctx(7), false);
        assert!(strip(empty, &TAGGED_CHOICE).is_err());
    }

    #[test]
    fn tagged_choice() {
        let inner = wrap::<Ber>(int(), &[Tag::INTEGER]);
        let tlv = wrap::<Ber>(inner.clone(), TAGGED_CHOICE.tags());
        assert_eq!(tlv.to_vec(), b"\xa7\x03\x02\x01\x05");
        assert_eq!(strip(tlv, &TAGGED_CHOICE).unwrap(), inner);

        let prim = wrap::<Ber>(int(), &[Tag::ctx(7)]);
        assert_eq!(
            strip(prim, &TAGGED_CHOICE).unwrap_err().kind(),
            &ErrorKind::NotConstructed
        );
    }

    #[test]
    fn unknown_tag_accepted() {
        let partial = Tlv::partial(None, Content::Primitive(Default::default()));
        assert!(strip(partial, &IMPLICIT).is_ok());
    }
}
