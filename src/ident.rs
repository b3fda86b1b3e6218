//! Tags and the identifier octets that encode them.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use smallvec::SmallVec;
use crate::error::Error;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class. The number is an unsigned integer.
///
/// In BER encoding, the tag becomes part of the identifier octets by
/// combining it with a bit indicating whether a value is primitive or
/// constructed. See [`Tag::to_ident`] for how that happens.
///
/// Tags are ordered the way X.680 orders them for the canonical order of
/// SET components: by class first, universal before application before
/// context-specific before private, then by number.
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32`. This should be more
/// than enough in practice.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    /// The class of the tag.
    class: Class,

    /// The number of the tag within its class.
    number: u32,
}

impl Tag {
    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in class “universal” with the given number.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in class “application” with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in class “context dependent” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in class “private” with the given number.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns the identifier octets for this tag.
    ///
    /// Numbers up to 30 are encoded in the lower five bits of a single
    /// octet. Larger numbers set these five bits to all ones and follow up
    /// with the number in base 128, most significant group first, where
    /// every octet but the last one has its left-most bit set.
    pub fn to_ident(self, constructed: bool) -> IdentOctets {
        let mut first = self.class.into_u8();
        if constructed {
            first |= 0x20;
        }

        let mut res = IdentOctets::new();
        if self.number <= 0x1e {
            res.push(first | self.number as u8);
            return res
        }
        res.push(first | 0x1f);

        // The number is at least 31 here, so there is at least one group.
        let groups = (u32::BITS - self.number.leading_zeros() + 6) / 7;
        for i in (0..groups).rev() {
            let octet = ((self.number >> (i * 7)) & 0x7f) as u8;
            if i == 0 {
                res.push(octet)
            }
            else {
                res.push(octet | 0x80)
            }
        }
        res
    }
}

/// # Universal Tags
///
/// The tags X.680, 8.4, assigns to the built-in types.
///
impl Tag {
    /// End-of-contents.
    ///
    /// Also the placeholder tag of a bare value that has not been tagged
    /// yet.
    pub const END_OF_CONTENTS: Self = Self::universal(0);

    pub const BOOLEAN: Self = Self::universal(1);
    pub const INTEGER: Self = Self::universal(2);
    pub const BIT_STRING: Self = Self::universal(3);
    pub const OCTET_STRING: Self = Self::universal(4);
    pub const NULL: Self = Self::universal(5);
    pub const OID: Self = Self::universal(6);
    pub const OBJECT_DESCRIPTOR: Self = Self::universal(7);
    /// EXTERNAL and INSTANCE OF.
    pub const EXTERNAL: Self = Self::universal(8);
    pub const REAL: Self = Self::universal(9);
    pub const ENUMERATED: Self = Self::universal(10);
    pub const EMBEDDED_PDV: Self = Self::universal(11);
    pub const UTF8_STRING: Self = Self::universal(12);
    pub const RELATIVE_OID: Self = Self::universal(13);
    /// SEQUENCE and SEQUENCE OF.
    pub const SEQUENCE: Self = Self::universal(16);
    /// SET and SET OF.
    pub const SET: Self = Self::universal(17);
    pub const NUMERIC_STRING: Self = Self::universal(18);
    pub const PRINTABLE_STRING: Self = Self::universal(19);
    pub const TELETEX_STRING: Self = Self::universal(20);
    pub const VIDEOTEX_STRING: Self = Self::universal(21);
    pub const IA5_STRING: Self = Self::universal(22);
    pub const UTC_TIME: Self = Self::universal(23);
    pub const GENERALIZED_TIME: Self = Self::universal(24);
    pub const GRAPHIC_STRING: Self = Self::universal(25);
    pub const VISIBLE_STRING: Self = Self::universal(26);
    pub const GENERAL_STRING: Self = Self::universal(27);
    pub const UNIVERSAL_STRING: Self = Self::universal(28);
    pub const CHARACTER_STRING: Self = Self::universal(29);
    pub const BMP_STRING: Self = Self::universal(30);

    /// Returns the name of the type owning a universal tag.
    ///
    /// Returns `None` for tags of other classes and for unassigned
    /// universal tag numbers.
    pub fn universal_name(self) -> Option<&'static str> {
        if self.class != Class::Universal {
            return None
        }
        UNIVERSAL_NAMES.get(self.number as usize).copied().flatten()
    }
}

/// The names of the universal types indexed by tag number.
static UNIVERSAL_NAMES: [Option<&str>; 31] = [
    None, Some("BOOLEAN"), Some("INTEGER"), Some("BIT STRING"),
    Some("OCTET STRING"), Some("NULL"), Some("OBJECT IDENTIFIER"),
    Some("ObjectDescriptor"), Some("EXTERNAL"), Some("REAL"),
    Some("ENUMERATED"), Some("EMBEDDED PDV"), Some("UTF8String"),
    Some("RELATIVE-OID"), None, None, Some("SEQUENCE"), Some("SET"),
    Some("NumericString"), Some("PrintableString"), Some("TeletexString"),
    Some("VideotexString"), Some("IA5String"), Some("UTCTime"),
    Some("GeneralizedTime"), Some("GraphicString"), Some("VisibleString"),
    Some("GeneralString"), Some("UniversalString"), Some("CHARACTER STRING"),
    Some("BMPString"),
];

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = self.universal_name() {
            return f.write_str(name)
        }
        let prefix = match self.class {
            Class::Universal => "UNIVERSAL ",
            Class::Application => "APPLICATION ",
            Class::Context => "",
            Class::Private => "PRIVATE ",
        };
        write!(f, "[{}{}]", prefix, self.number)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ IdentOctets ---------------------------------------------------

/// The encoded identifier octets.
///
/// Since tag numbers are limited to 32 bits, there are at most six octets.
pub type IdentOctets = SmallVec<[u8; 6]>;


//------------ Ident ---------------------------------------------------------

/// Parsed identifier octets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ident {
    /// The tag encoded in the octets.
    tag: Tag,

    /// Whether the constructed bit was set.
    constructed: bool,

    /// The number of octets the identifier occupied.
    len: usize,
}

impl Ident {
    /// Parses identifier octets from the beginning of `data`.
    ///
    /// Returns `Ok(None)` if `data` ends before the identifier octets do.
    pub fn parse(data: &[u8]) -> Result<Option<Self>, Error> {
        let Some(&first) = data.first() else {
            return Ok(None)
        };
        let class = Class::from_u8(first);
        let constructed = first & 0x20 != 0;

        // Low tag number form.
        if (first & 0x1f) < 0x1f {
            return Ok(Some(Ident {
                tag: Tag::new(class, u32::from(first & 0x1f)),
                constructed,
                len: 1,
            }))
        }

        let mut number = 0u32;
        for (idx, &octet) in data.iter().enumerate().skip(1) {
            if idx == 1 && octet == 0x80 {
                return Err(Error::malformed(
                    "leading zero in tag number"
                ))
            }
            if number > (u32::MAX >> 7) {
                return Err(Error::malformed("tag number is too big"))
            }
            number = (number << 7) | u32::from(octet & 0x7f);
            if octet & 0x80 == 0 {
                return Ok(Some(Ident {
                    tag: Tag::new(class, number),
                    constructed,
                    len: idx + 1,
                }))
            }
        }
        Ok(None)
    }

    /// Returns the tag.
    pub fn tag(self) -> Tag {
        self.tag
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Returns the number of octets of the encoded identifier.
    pub fn len(self) -> usize {
        self.len
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// The order of the variants is the canonical order of X.680, 8.6.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    /// Returns the class encoded in the top two bits of an octet.
    const fn from_u8(octet: u8) -> Self {
        match octet >> 6 {
            0 => Self::Universal,
            1 => Self::Application,
            2 => Self::Context,
            _ => Self::Private,
        }
    }

    /// Returns the class in the top two bits of an identifier octet.
    const fn into_u8(self) -> u8 {
        (self as u8) << 6
    }
}


//============ Tests =========================================================
