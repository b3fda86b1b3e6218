//! Resolving CHOICE alternatives.
//!
//! This is a private module. Its public items are re-exported by the parent.
//!
//! Which alternative of a CHOICE is present is decided by trying the
//! alternatives in the order they were declared and picking the first one
//! that accepts the TLV. Accepting is decided by [`is_my_message`] which
//! only looks at the TLV’s tag. The same check decides whether an OPTIONAL
//! component of a SEQUENCE is present.

use crate::descriptor::{Alternative, Descriptor, Kind};
use crate::error::{Error, ErrorKind, Operation, Segment};
use crate::tlv::Tlv;
use super::{Config, Decode, decode_as, strip};


/// The maximum nesting of untagged CHOICE types when probing.
const MAX_PROBE_DEPTH: usize = 32;


//------------ is_my_message -------------------------------------------------

/// Returns whether a TLV may be a value of the given type.
///
/// For a type with tags, this is the case if the TLV has the type’s
/// outermost tag. For an untagged CHOICE, it is the case if any of its
/// alternatives accepts the TLV. An untagged ANY type accepts everything.
///
/// A TLV whose tag isn’t known, i.e., a partial TLV from incomplete data,
/// is always accepted.
///
/// The check doesn’t allocate and doesn’t change anything.
pub fn is_my_message(descriptor: &Descriptor, tlv: &Tlv) -> bool {
    probe(descriptor, tlv, 0)
}

fn probe(descriptor: &Descriptor, tlv: &Tlv, depth: usize) -> bool {
    if !tlv.is_tag_known() {
        return true
    }
    if let Some(tag) = descriptor.outermost_tag() {
        return tag == tlv.tag()
    }
    match descriptor.kind() {
        Kind::Choice(alternatives) => {
            if depth >= MAX_PROBE_DEPTH {
                log::warn!(
                    "untagged CHOICE types nested too deeply in '{}'",
                    descriptor.name()
                );
                return false
            }
            alternatives.iter().any(|alternative| {
                probe(alternative.descriptor(), tlv, depth + 1)
            })
        }
        Kind::Any | Kind::Plain => true,
    }
}


//------------ select and resolve --------------------------------------------

/// Returns the index of the first alternative accepting the TLV.
pub fn select(alternatives: &[Alternative], tlv: &Tlv) -> Option<usize> {
    alternatives.iter().position(|alternative| {
        let res = is_my_message(alternative.descriptor(), tlv);
        log::trace!(
            "alternative '{}' {} {}",
            alternative.name(),
            if res { "accepts" } else { "rejects" },
            tlv.tag()
        );
        res
    })
}

/// Returns the index of the alternative of a CHOICE type present in a TLV.
///
/// The TLV must already have the CHOICE type’s own tags removed.
pub fn resolve(descriptor: &Descriptor, tlv: &Tlv) -> Result<usize, Error> {
    let Kind::Choice(alternatives) = descriptor.kind() else {
        return Err(Error::internal(Operation::Decode, format!(
            "type '{}' is not a CHOICE", descriptor.name()
        )))
    };
    match select(alternatives, tlv) {
        Some(idx) => {
            log::debug!(
                "selected alternative '{}' of '{}'",
                alternatives.get(idx).map(Alternative::name).unwrap_or(""),
                descriptor.name()
            );
            Ok(idx)
        }
        None => {
            Err(Error::decode(ErrorKind::NoAlternative {
                received: tlv.tag()
            }))
        }
    }
}

/// Removes the tags of a CHOICE type and resolves its alternative.
///
/// Returns the index of the alternative and its complete TLV. The caller
/// then only decodes the winning alternative, for instance via
/// [`decode_alternative`].
pub fn decode_choice(
    descriptor: &Descriptor, tlv: Tlv
) -> Result<(usize, Tlv), Error> {
    let tlv = strip(tlv, descriptor)?;
    let idx = resolve(descriptor, &tlv).map_err(|err| {
        err.within(Segment::Type(descriptor.name()))
    })?;
    Ok((idx, tlv))
}

/// Decodes the TLV of an alternative.
pub fn decode_alternative<T: Decode>(
    alternative: &Alternative, tlv: Tlv, config: &Config
) -> Result<T, Error> {
    decode_as(tlv, alternative.descriptor(), config).map_err(|err| {
        err.within(Segment::Alternative(alternative.name()))
    })
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::descriptor;
    use crate::encode::wrap;
    use crate::ident::Tag;
    use crate::mode::Ber;
    use super::*;

    static FIRST: Descriptor = Descriptor::plain("First", &[Tag::ctx(0)]);
    static SECOND: Descriptor = Descriptor::plain("Second", &[Tag::ctx(1)]);
    static ALSO_FIRST: Descriptor = Descriptor::plain(
        "AlsoFirst", &[Tag::INTEGER, Tag::ctx(0)]
    );

    static INNER_ALTERNATIVES: [Alternative; 2] = [
        Alternative::new("first", &FIRST),
        Alternative::new("second", &SECOND),
    ];
    static INNER: Descriptor = Descriptor::choice(
        "Inner", &[], &INNER_ALTERNATIVES
    );

    static OUTER_ALTERNATIVES: [Alternative; 3] = [
        Alternative::new("bool", &descriptor::BOOLEAN),
        Alternative::new("inner", &INNER),
        Alternative::new("also-first", &ALSO_FIRST),
    ];
    static OUTER: Descriptor = Descriptor::choice(
        "Outer", &[], &OUTER_ALTERNATIVES
    );

    static LOOP_ALTERNATIVES: [Alternative; 1] = [
        Alternative::new("self", &LOOP),
    ];
    static LOOP: Descriptor = Descriptor::choice(
        "Loop", &[], &LOOP_ALTERNATIVES
    );

    fn tlv(tags: &[Tag]) -> Tlv {
        wrap::<Ber>(Tlv::primitive(&b"\x05"[..]), tags)
    }

    #[test]
    fn probe_tagged() {
        assert!(is_my_message(&FIRST, &tlv(&[Tag::ctx(0)])));
        assert!(!is_my_message(&FIRST, &tlv(&[Tag::ctx(1)])));
        assert!(is_my_message(&ALSO_FIRST, &tlv(&[Tag::ctx(0)])));
        assert!(is_my_message(&descriptor::ANY, &tlv(&[Tag::ctx(9)])));
    }

    #[test]
    fn probe_untagged_choice() {
        assert!(is_my_message(&OUTER, &tlv(&[Tag::ctx(1)])));
        assert!(is_my_message(&OUTER, &tlv(&[Tag::BOOLEAN])));
        assert!(!is_my_message(&OUTER, &tlv(&[Tag::ctx(2)])));
        assert!(!is_my_message(&LOOP, &tlv(&[Tag::ctx(2)])));
    }

    #[test]
    fn probe_unknown_tag() {
        let partial = Tlv::primitive(&b""[..]);
        assert!(is_my_message(&FIRST, &partial));
        assert!(is_my_message(&OUTER, &partial));
    }

    #[test]
    fn earliest_alternative_wins() {
        // Both "inner" and "also-first" accept [0].
        assert_eq!(select(&OUTER_ALTERNATIVES, &tlv(&[Tag::ctx(0)])), Some(1));
        assert_eq!(resolve(&OUTER, &tlv(&[Tag::ctx(0)])).unwrap(), 1);
        assert_eq!(resolve(&OUTER, &tlv(&[Tag::BOOLEAN])).unwrap(), 0);
    }

    #[test]
    fn no_alternative() {
        let err = resolve(&OUTER, &tlv(&[Tag::ctx(2)])).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::NoAlternative { received: Tag::ctx(2) }
        );
        let err = resolve(&FIRST, &tlv(&[Tag::ctx(0)])).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Internal(_)));
        assert_eq!(err.operation(), Operation::Decode);

        let err = decode_choice(&OUTER, tlv(&[Tag::ctx(2)])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "while BER-decoding type 'Outer': \
             invalid tag or unknown alternative: [2]"
        );
    }

    #[test]
    fn decode_tagged_choice() {
        static TAGGED: Descriptor = Descriptor::choice(
            "Tagged", &[Tag::ctx(4)], &INNER_ALTERNATIVES
        );
        let inner = tlv(&[Tag::ctx(1)]);
        let (idx, value) = decode_choice(
            &TAGGED, wrap::<Ber>(inner.clone(), TAGGED.tags())
        ).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(value, inner);
    }
}
