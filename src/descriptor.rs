//! Static descriptions of types.
//!
//! Encoding and decoding is driven by a [`Descriptor`] for each type which
//! provides the name of the type for diagnostics, the list of tags it is
//! tagged with, and, for CHOICE types, the list of alternatives. This
//! module also provides descriptors for the universal types.

use std::fmt;
use crate::ident::Tag;


//------------ Typed ---------------------------------------------------------

/// A type that has a descriptor.
pub trait Typed {
    /// Returns the descriptor of the type.
    fn descriptor() -> &'static Descriptor;
}


//------------ Descriptor ----------------------------------------------------

/// The description of a type.
///
/// The tag list is ordered from the inside out: the tag at index 0 is the
/// innermost tag, i.e., the one closest to the content, while the last tag
/// is the one appearing first in the encoded data. An empty list means that
/// the type has no tag of its own which is the case for untagged CHOICE and
/// ANY types.
///
/// Implicit tagging replaces the innermost tag, so an `[0] IMPLICIT
/// INTEGER` has the tag list `[[0]]`. Explicit tagging adds a tag, so an
/// `[0] EXPLICIT INTEGER` has the tag list `[INTEGER, [0]]`.
#[derive(Clone, Copy, Debug)]
pub struct Descriptor {
    /// The name of the type.
    name: &'static str,

    /// The tags, innermost first.
    tags: &'static [Tag],

    /// What kind of type this is.
    kind: Kind,
}

impl Descriptor {
    /// Creates a new descriptor.
    pub const fn new(
        name: &'static str, tags: &'static [Tag], kind: Kind
    ) -> Self {
        Descriptor { name, tags, kind }
    }

    /// Creates the descriptor of a plain type.
    pub const fn plain(name: &'static str, tags: &'static [Tag]) -> Self {
        Self::new(name, tags, Kind::Plain)
    }

    /// Creates the descriptor of a CHOICE type.
    ///
    /// If `tags` is not empty, the innermost tag is an explicit tag around
    /// the chosen alternative.
    pub const fn choice(
        name: &'static str,
        tags: &'static [Tag],
        alternatives: &'static [Alternative],
    ) -> Self {
        Self::new(name, tags, Kind::Choice(alternatives))
    }

    /// Creates the descriptor of an open type.
    pub const fn any(name: &'static str, tags: &'static [Tag]) -> Self {
        Self::new(name, tags, Kind::Any)
    }

    /// Returns the name of the type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the tag list, innermost first.
    pub fn tags(&self) -> &'static [Tag] {
        self.tags
    }

    /// Returns the tag appearing first in the encoded data, if any.
    pub fn outermost_tag(&self) -> Option<Tag> {
        self.tags.last().copied()
    }

    /// Returns the kind of the type.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the alternatives of a CHOICE type.
    ///
    /// Returns an empty slice for all other types.
    pub fn alternatives(&self) -> &'static [Alternative] {
        match self.kind {
            Kind::Choice(alternatives) => alternatives,
            _ => &[],
        }
    }

    /// Returns a value displaying the tag list, outermost tag first.
    pub fn print_tags(&self) -> TagList {
        TagList(self.tags)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.print_tags())
    }
}


//------------ Kind ----------------------------------------------------------

/// The kind of a type as far as tag handling is concerned.
#[derive(Clone, Copy, Debug)]
pub enum Kind {
    /// A type whose encoding starts with its own tags.
    Plain,

    /// A CHOICE type with the given alternatives in declaration order.
    Choice(&'static [Alternative]),

    /// An open type whose content can be anything.
    Any,
}


//------------ Alternative ---------------------------------------------------

/// One alternative of a CHOICE type.
#[derive(Clone, Copy, Debug)]
pub struct Alternative {
    name: &'static str,
    descriptor: &'static Descriptor,
}

impl Alternative {
    pub const fn new(
        name: &'static str, descriptor: &'static Descriptor
    ) -> Self {
        Alternative { name, descriptor }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }
}


//------------ Field ---------------------------------------------------------

/// One component of a SEQUENCE or SET type.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    name: &'static str,
    descriptor: &'static Descriptor,
    presence: Presence,
}

impl Field {
    pub const fn new(
        name: &'static str,
        descriptor: &'static Descriptor,
        presence: Presence,
    ) -> Self {
        Field { name, descriptor, presence }
    }

    pub const fn mandatory(
        name: &'static str, descriptor: &'static Descriptor
    ) -> Self {
        Self::new(name, descriptor, Presence::Mandatory)
    }

    pub const fn optional(
        name: &'static str, descriptor: &'static Descriptor
    ) -> Self {
        Self::new(name, descriptor, Presence::Optional)
    }

    pub const fn with_default(
        name: &'static str, descriptor: &'static Descriptor
    ) -> Self {
        Self::new(name, descriptor, Presence::Default)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Returns whether the component may be missing from the encoding.
    pub fn is_omittable(&self) -> bool {
        !matches!(self.presence, Presence::Mandatory)
    }
}


//------------ Presence ------------------------------------------------------

/// Whether a component has to be present.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Presence {
    /// The component must always be present.
    Mandatory,

    /// The component is OPTIONAL.
    Optional,

    /// The component has a DEFAULT value and can be left out.
    Default,
}


//------------ TagList -------------------------------------------------------

/// Displays a tag list outermost tag first.
#[derive(Clone, Copy, Debug)]
pub struct TagList(&'static [Tag]);

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut tags = self.0.iter().rev();
        match tags.next() {
            Some(tag) => write!(f, "{}", tag)?,
            None => return f.write_str("<no tags>"),
        }
        for tag in tags {
            write!(f, " {}", tag)?;
        }
        Ok(())
    }
}


//------------ Universal Types -----------------------------------------------

pub static BOOLEAN: Descriptor = Descriptor::plain("BOOLEAN", &[Tag::BOOLEAN]);
pub static INTEGER: Descriptor = Descriptor::plain("INTEGER", &[Tag::INTEGER]);
pub static BIT_STRING: Descriptor = Descriptor::plain(
    "BIT STRING", &[Tag::BIT_STRING]
);
pub static OCTET_STRING: Descriptor = Descriptor::plain(
    "OCTET STRING", &[Tag::OCTET_STRING]
);
pub static NULL: Descriptor = Descriptor::plain("NULL", &[Tag::NULL]);
pub static OBJECT_IDENTIFIER: Descriptor = Descriptor::plain(
    "OBJECT IDENTIFIER", &[Tag::OID]
);
pub static OBJECT_DESCRIPTOR: Descriptor = Descriptor::plain(
    "ObjectDescriptor", &[Tag::OBJECT_DESCRIPTOR]
);
pub static EXTERNAL: Descriptor = Descriptor::plain(
    "EXTERNAL", &[Tag::EXTERNAL]
);
pub static REAL: Descriptor = Descriptor::plain("REAL", &[Tag::REAL]);
pub static ENUMERATED: Descriptor = Descriptor::plain(
    "ENUMERATED", &[Tag::ENUMERATED]
);
pub static EMBEDDED_PDV: Descriptor = Descriptor::plain(
    "EMBEDDED PDV", &[Tag::EMBEDDED_PDV]
);
pub static UTF8_STRING: Descriptor = Descriptor::plain(
    "UTF8String", &[Tag::UTF8_STRING]
);
pub static RELATIVE_OID: Descriptor = Descriptor::plain(
    "RELATIVE-OID", &[Tag::RELATIVE_OID]
);
pub static SEQUENCE: Descriptor = Descriptor::plain(
    "SEQUENCE", &[Tag::SEQUENCE]
);
pub static SET: Descriptor = Descriptor::plain("SET", &[Tag::SET]);
pub static NUMERIC_STRING: Descriptor = Descriptor::plain(
    "NumericString", &[Tag::NUMERIC_STRING]
);
pub static PRINTABLE_STRING: Descriptor = Descriptor::plain(
    "PrintableString", &[Tag::PRINTABLE_STRING]
);
pub static TELETEX_STRING: Descriptor = Descriptor::plain(
    "TeletexString", &[Tag::TELETEX_STRING]
);
pub static VIDEOTEX_STRING: Descriptor = Descriptor::plain(
    "VideotexString", &[Tag::VIDEOTEX_STRING]
);
pub static IA5_STRING: Descriptor = Descriptor::plain(
    "IA5String", &[Tag::IA5_STRING]
);
pub static UTC_TIME: Descriptor = Descriptor::plain(
    "UTCTime", &[Tag::UTC_TIME]
);
pub static GENERALIZED_TIME: Descriptor = Descriptor::plain(
    "GeneralizedTime", &[Tag::GENERALIZED_TIME]
);
pub static GRAPHIC_STRING: Descriptor = Descriptor::plain(
    "GraphicString", &[Tag::GRAPHIC_STRING]
);
pub static VISIBLE_STRING: Descriptor = Descriptor::plain(
    "VisibleString", &[Tag::VISIBLE_STRING]
);
pub static GENERAL_STRING: Descriptor = Descriptor::plain(
    "GeneralString", &[Tag::GENERAL_STRING]
);
pub static UNIVERSAL_STRING: Descriptor = Descriptor::plain(
    "UniversalString", &[Tag::UNIVERSAL_STRING]
);
pub static CHARACTER_STRING: Descriptor = Descriptor::plain(
    "CHARACTER STRING", &[Tag::CHARACTER_STRING]
);
pub static BMP_STRING: Descriptor = Descriptor::plain(
    "BMPString", &[Tag::BMP_STRING]
);

/// An untagged CHOICE without any alternatives.
pub static CHOICE: Descriptor = Descriptor::choice("CHOICE", &[], &[]);

/// An untagged open type.
pub static ANY: Descriptor = Descriptor::any("ANY", &[]);


//------------ CHARACTER STRING ----------------------------------------------

/// The components of the CHARACTER STRING type.
///
/// This is the associated SEQUENCE type of X.680, 44.5, with automatic
/// tags.
pub static CHARACTER_STRING_FIELDS: [Field; 3] = [
    Field::mandatory("identification", &IDENTIFICATION),
    Field::optional(
        "data-value-descriptor", &CHARACTER_STRING_DATA_VALUE_DESCRIPTOR
    ),
    Field::mandatory("string-value", &CHARACTER_STRING_STRING_VALUE),
];

pub static CHARACTER_STRING_DATA_VALUE_DESCRIPTOR: Descriptor =
    Descriptor::plain("ObjectDescriptor", &[Tag::ctx(1)]);

pub static CHARACTER_STRING_STRING_VALUE: Descriptor =
    Descriptor::plain("OCTET STRING", &[Tag::ctx(2)]);

/// The identification CHOICE of CHARACTER STRING and EMBEDDED PDV.
///
/// Being a CHOICE, automatic tagging makes its tag explicit.
pub static IDENTIFICATION: Descriptor = Descriptor::choice(
    "identification", &[Tag::ctx(0)], &IDENTIFICATION_ALTERNATIVES
);

pub static IDENTIFICATION_ALTERNATIVES: [Alternative; 6] = [
    Alternative::new("syntaxes", &IDENTIFICATION_SYNTAXES),
    Alternative::new("syntax", &IDENTIFICATION_SYNTAX),
    Alternative::new(
        "presentation-context-id", &IDENTIFICATION_PRESENTATION_CONTEXT_ID
    ),
    Alternative::new(
        "context-negotiation", &IDENTIFICATION_CONTEXT_NEGOTIATION
    ),
    Alternative::new("transfer-syntax", &IDENTIFICATION_TRANSFER_SYNTAX),
    Alternative::new("fixed", &IDENTIFICATION_FIXED),
];

pub static IDENTIFICATION_SYNTAXES: Descriptor =
    Descriptor::plain("SEQUENCE", &[Tag::ctx(0)]);

pub static IDENTIFICATION_SYNTAXES_FIELDS: [Field; 2] = [
    Field::mandatory("abstract", &IDENTIFICATION_SYNTAXES_ABSTRACT),
    Field::mandatory("transfer", &IDENTIFICATION_SYNTAXES_TRANSFER),
];

pub static IDENTIFICATION_SYNTAXES_ABSTRACT: Descriptor =
    Descriptor::plain("OBJECT IDENTIFIER", &[Tag::ctx(0)]);

pub static IDENTIFICATION_SYNTAXES_TRANSFER: Descriptor =
    Descriptor::plain("OBJECT IDENTIFIER", &[Tag::ctx(1)]);

pub static IDENTIFICATION_SYNTAX: Descriptor =
    Descriptor::plain("OBJECT IDENTIFIER", &[Tag::ctx(1)]);

pub static IDENTIFICATION_PRESENTATION_CONTEXT_ID: Descriptor =
    Descriptor::plain("INTEGER", &[Tag::ctx(2)]);

pub static IDENTIFICATION_CONTEXT_NEGOTIATION: Descriptor =
    Descriptor::plain("SEQUENCE", &[Tag::ctx(3)]);

pub static IDENTIFICATION_CONTEXT_NEGOTIATION_FIELDS: [Field; 2] = [
    Field::mandatory(
        "presentation-context-id",
        &IDENTIFICATION_CONTEXT_NEGOTIATION_PRESENTATION_CONTEXT_ID
    ),
    Field::mandatory(
        "transfer-syntax",
        &IDENTIFICATION_CONTEXT_NEGOTIATION_TRANSFER_SYNTAX
    ),
];

pub static IDENTIFICATION_CONTEXT_NEGOTIATION_PRESENTATION_CONTEXT_ID:
    Descriptor = Descriptor::plain("INTEGER", &[Tag::ctx(0)]);

pub static IDENTIFICATION_CONTEXT_NEGOTIATION_TRANSFER_SYNTAX: Descriptor =
    Descriptor::plain("OBJECT IDENTIFIER", &[Tag::ctx(1)]);

pub static IDENTIFICATION_TRANSFER_SYNTAX: Descriptor =
    Descriptor::plain("OBJECT IDENTIFIER", &[Tag::ctx(4)]);

pub static IDENTIFICATION_FIXED: Descriptor =
    Descriptor::plain("NULL", &[Tag::ctx(5)]);


//============ Tests =========================================================
