//! Assigning the children of SEQUENCE and SET values to components.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::descriptor::{Field, Presence};
use crate::error::{Error, ErrorKind, Segment};
use crate::tlv::Tlv;
use super::{Config, Decode, decode_as, is_my_message};


//------------ sequence ------------------------------------------------------

/// Assigns the children of a bare SEQUENCE value to its components.
///
/// The children are taken in order. A mandatory component always takes
/// the next child. An OPTIONAL or DEFAULT component only takes it if
/// [`is_my_message`] accepts it and is left empty otherwise.
///
/// Returns one entry per component in `fields`. It is an error if a
/// mandatory component finds no child left or if there are children left
/// after the last component.
pub fn sequence(
    value: Tlv, fields: &[Field]
) -> Result<Vec<Option<Tlv>>, Error> {
    let mut children = value.into_children()?.into_iter().peekable();
    let mut res = Vec::with_capacity(fields.len());
    for field in fields {
        let present = match children.peek() {
            Some(child) => match field.presence() {
                Presence::Mandatory => true,
                Presence::Optional | Presence::Default => {
                    is_my_message(field.descriptor(), child)
                }
            },
            None => {
                if !field.is_omittable() {
                    return Err(Error::decode(
                        ErrorKind::MissingComponent(field.name())
                    ).within(Segment::Field(field.name())))
                }
                false
            }
        };
        if present {
            res.push(children.next());
        }
        else {
            log::debug!("component '{}' omitted", field.name());
            res.push(None);
        }
    }
    if children.next().is_some() {
        return Err(Error::decode(ErrorKind::Superfluous))
    }
    Ok(res)
}


//------------ set -----------------------------------------------------------

/// Assigns the children of a bare SET value to its components.
///
/// Each child is assigned to the first component whose type accepts it.
/// Children not accepted by any component are ignored. It is an error if a
/// component receives more than one child or if a mandatory component
/// doesn’t receive any.
pub fn set(value: Tlv, fields: &[Field]) -> Result<Vec<Option<Tlv>>, Error> {
    let mut res: Vec<Option<Tlv>> = fields.iter().map(|_| None).collect();
    for child in value.into_children()? {
        let slot = fields.iter().zip(res.iter_mut()).find(|(field, _)| {
            is_my_message(field.descriptor(), &child)
        });
        match slot {
            Some((field, slot)) => {
                if slot.is_some() {
                    return Err(Error::decode(
                        ErrorKind::DuplicateComponent(field.name())
                    ).within(Segment::Field(field.name())))
                }
                log::trace!("{} assigned to '{}'", child.tag(), field.name());
                *slot = Some(child);
            }
            None => {
                log::trace!("ignoring unknown component {}", child.tag());
            }
        }
    }
    for (field, slot) in fields.iter().zip(res.iter()) {
        if slot.is_none() && !field.is_omittable() {
            return Err(Error::decode(
                ErrorKind::MissingComponent(field.name())
            ).within(Segment::Field(field.name())))
        }
    }
    Ok(res)
}


//------------ decode_field --------------------------------------------------

/// Decodes the TLV assigned to a component if there is one.
pub fn decode_field<T: Decode>(
    field: &Field, tlv: Option<Tlv>, config: &Config
) -> Result<Option<T>, Error> {
    tlv.map(|tlv| {
        decode_as(tlv, field.descriptor(), config).map_err(|err| {
            err.within(Segment::Field(field.name()))
        })
    }).transpose()
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::descriptor::{self, Descriptor};
    use crate::encode::wrap;
    use crate::ident::Tag;
    use crate::mode::Ber;
    use super::*;

    static A: Descriptor = Descriptor::plain("INTEGER", &[Tag::ctx(0)]);
    static B: Descriptor = Descriptor::plain("INTEGER", &[Tag::ctx(1)]);
    static C: Descriptor = Descriptor::plain("INTEGER", &[Tag::ctx(2)]);

    static FIELDS: [Field; 3] = [
        Field::optional("a", &A),
        Field::mandatory("b", &B),
        Field::with_default("c", &C),
    ];

    fn child(number: u32) -> Tlv {
        wrap::<Ber>(Tlv::primitive(vec![number as u8]), &[Tag::ctx(number)])
    }

    fn value(numbers: &[u32]) -> Tlv {
        Tlv::constructed_from(numbers.iter().map(|&n| child(n)).collect())
    }

    fn present(res: &[Option<Tlv>]) -> Vec<bool> {
        res.iter().map(Option::is_some).collect()
    }

    #[test]
    fn sequence_components() {
        let res = sequence(value(&[0, 1, 2]), &FIELDS).unwrap();
        assert_eq!(present(&res), [true, true, true]);
        assert_eq!(res[2], Some(child(2)));

        let res = sequence(value(&[1]), &FIELDS).unwrap();
        assert_eq!(present(&res), [false, true, false]);
        assert_eq!(res[1], Some(child(1)));

        let res = sequence(value(&[1, 2]), &FIELDS).unwrap();
        assert_eq!(present(&res), [false, true, true]);
    }

    #[test]
    fn sequence_errors() {
        let err = sequence(value(&[0]), &FIELDS).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MissingComponent("b"));

        let err = sequence(value(&[1, 2, 2]), &FIELDS).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Superfluous);

        let err = sequence(child(0), &FIELDS).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotConstructed);
    }

    #[test]
    fn sequence_mandatory_takes_mismatch() {
        // The mandatory component takes the child regardless so that
        // decoding it reports the tag mismatch.
        let res = sequence(value(&[2]), &FIELDS).unwrap();
        assert_eq!(present(&res), [false, true, false]);
        assert_eq!(res[1], Some(child(2)));
    }

    #[test]
    fn set_components() {
        let res = set(value(&[2, 0, 1]), &FIELDS).unwrap();
        assert_eq!(present(&res), [true, true, true]);
        assert_eq!(res[0], Some(child(0)));

        let res = set(value(&[1, 5]), &FIELDS).unwrap();
        assert_eq!(present(&res), [false, true, false]);
    }

    #[test]
    fn set_errors() {
        let err = set(value(&[1, 1]), &FIELDS).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::DuplicateComponent("b"));

        let err = set(value(&[0, 2]), &FIELDS).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MissingComponent("b"));
        assert!(err.to_string().contains("component 'b'"));
    }

    #[test]
    fn decode_missing_field() {
        let res: Option<i64> = decode_field(
            &FIELDS[0], None, &Config::default()
        ).unwrap();
        assert_eq!(res, None);

        let err = decode_field::<i64>(
            &Field::mandatory("x", &descriptor::INTEGER),
            Some(child(0)), &Config::default()
        ).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::TagMismatch {
                expected: Tag::INTEGER, received: Tag::ctx(0)
            }
        );
        assert!(err.to_string().contains("component 'x': type 'INTEGER'"));
    }
}
