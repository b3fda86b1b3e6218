//! The in-memory representation of encoded values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{io, slice};
use bytes::{BufMut, Bytes};
use crate::error::{Error, ErrorKind, Operation};
use crate::ident::{IdentOctets, Tag};
use crate::length::{Length, LengthForm, LengthOctets};


//------------ Tlv -----------------------------------------------------------

/// A single encoded value.
///
/// A TLV consists of the identifier octets carrying the tag (the ‘T’), the
/// length octets (the ‘L’), and the content (the ‘V’). The content is
/// either a sequence of octets for a primitive value or a sequence of
/// nested TLVs for a constructed value.
///
/// The identifier and length octets are kept verbatim. This allows
/// re-serializing a scanned value byte for byte and comparing values by
/// their encoding.
///
/// # Bare values
///
/// The encoder of a type produces its content only. Such a _bare value_
/// has no identifier and length octets yet and carries the placeholder tag
/// [`Tag::END_OF_CONTENTS`]. It is turned into a complete TLV by
/// [`wrap`][crate::encode::wrap]. Likewise,
/// [`strip`][crate::decode::strip] turns a scanned TLV back into a bare
/// value for the decoder of a type.
///
/// A constructed TLV with indefinite length is followed by the two
/// end-of-contents octets when serialized. These are not kept as a child.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tlv {
    /// The tag.
    tag: Tag,

    /// Whether the tag has actually been read or assigned.
    tag_known: bool,

    /// Whether this value has complete identifier and length octets.
    complete: bool,

    /// The form of the length octets.
    length_form: LengthForm,

    /// The identifier octets.
    tag_octets: IdentOctets,

    /// The length octets.
    length_octets: LengthOctets,

    /// The content.
    content: Content,
}

/// # Creating Values
///
impl Tlv {
    /// Creates a bare primitive value with the given content octets.
    pub fn primitive(content: impl Into<Bytes>) -> Self {
        Self::bare(Content::Primitive(content.into()))
    }

    /// Creates a bare constructed value without any children.
    pub fn constructed() -> Self {
        Self::constructed_from(Vec::new())
    }

    /// Creates a bare constructed value from a list of children.
    pub fn constructed_from(children: Vec<Tlv>) -> Self {
        Self::bare(Content::Constructed(children))
    }

    /// Creates a bare constructed value with `child` as its sole child.
    pub fn wrapping(child: Tlv) -> Self {
        Self::constructed_from(vec![child])
    }

    fn bare(content: Content) -> Self {
        Tlv {
            tag: Tag::END_OF_CONTENTS,
            tag_known: false,
            complete: false,
            length_form: LengthForm::Short,
            tag_octets: IdentOctets::new(),
            length_octets: LengthOctets::new(),
            content,
        }
    }

    /// Creates a value from its parts as found in encoded data.
    pub(crate) fn from_parts(
        tag: Tag,
        tag_octets: IdentOctets,
        length_form: LengthForm,
        length_octets: LengthOctets,
        content: Content,
    ) -> Self {
        Tlv {
            tag,
            tag_known: true,
            complete: true,
            length_form,
            tag_octets,
            length_octets,
            content,
        }
    }

    /// Creates a value for data that ended prematurely.
    ///
    /// If `tag` is `None`, not even the identifier octets were available.
    pub(crate) fn partial(tag: Option<Tag>, content: Content) -> Self {
        let mut res = Self::bare(content);
        if let Some(tag) = tag {
            res.tag = tag;
            res.tag_known = true;
        }
        res
    }

    /// Appends a child to a bare constructed value.
    ///
    /// Fails if the value already has a header since its length octets
    /// would no longer match the content.
    pub fn push(&mut self, child: Tlv) -> Result<(), Error> {
        if !self.is_bare() {
            return Err(Error::internal(
                Operation::Encode, "cannot add a child to a tagged value"
            ))
        }
        self.children_mut()?.push(child);
        Ok(())
    }

    /// Returns a mutable reference to the children.
    pub(crate) fn children_mut(&mut self) -> Result<&mut Vec<Tlv>, Error> {
        match self.content {
            Content::Constructed(ref mut children) => Ok(children),
            Content::Primitive(_) => {
                Err(Error::internal(
                    Operation::Encode, "primitive value has no children"
                ))
            }
        }
    }
}

/// # Access to the Parts
///
impl Tlv {
    /// Returns the tag.
    ///
    /// For a bare value this is [`Tag::END_OF_CONTENTS`].
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns whether the tag has been read or assigned.
    pub fn is_tag_known(&self) -> bool {
        self.tag_known
    }

    /// Returns whether identifier and length octets are complete.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns whether this is a bare value without a header.
    pub fn is_bare(&self) -> bool {
        !self.tag_known && self.tag_octets.is_empty()
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(&self) -> bool {
        matches!(self.content, Content::Constructed(_))
    }

    /// Returns the form of the length octets.
    pub fn length_form(&self) -> LengthForm {
        self.length_form
    }

    /// Returns the identifier octets.
    pub fn tag_octets(&self) -> &[u8] {
        &self.tag_octets
    }

    /// Returns the length octets.
    pub fn length_octets(&self) -> &[u8] {
        &self.length_octets
    }

    /// Returns the content.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Converts the value into its content.
    pub fn into_content(self) -> Content {
        self.content
    }

    /// Returns the content octets of a primitive value.
    pub fn value(&self) -> Option<&Bytes> {
        match self.content {
            Content::Primitive(ref value) => Some(value),
            Content::Constructed(_) => None,
        }
    }

    /// Returns the children of a constructed value.
    ///
    /// A primitive value has no children.
    pub fn children(&self) -> &[Tlv] {
        match self.content {
            Content::Primitive(_) => &[],
            Content::Constructed(ref children) => children,
        }
    }

    /// Converts a constructed value into its children.
    pub fn into_children(self) -> Result<Vec<Tlv>, Error> {
        match self.content {
            Content::Constructed(children) => Ok(children),
            Content::Primitive(_) => {
                Err(Error::decode(ErrorKind::NotConstructed))
            }
        }
    }

    /// Converts a primitive value into its content octets.
    pub fn into_value(self) -> Result<Bytes, Error> {
        match self.content {
            Content::Primitive(value) => Ok(value),
            Content::Constructed(_) => {
                Err(Error::malformed("a primitive value was expected"))
            }
        }
    }

    /// Checks that the value is constructed.
    pub fn check_constructed(&self) -> Result<(), Error> {
        if self.is_constructed() {
            Ok(())
        }
        else {
            Err(Error::decode(ErrorKind::NotConstructed))
        }
    }
}

/// # Headers
///
impl Tlv {
    /// Sets the tag and produces fresh identifier and length octets.
    ///
    /// Constructed values get an indefinite length if `indefinite` is
    /// `true`. Everything else gets the shortest definite length.
    pub(crate) fn add_header(&mut self, tag: Tag, indefinite: bool) {
        let constructed = self.is_constructed();
        let length = if constructed && indefinite {
            Length::Indefinite
        }
        else {
            Length::Definite(self.content_len())
        };
        self.tag = tag;
        self.tag_known = true;
        self.complete = true;
        self.tag_octets = tag.to_ident(constructed);
        self.length_form = length.form();
        self.length_octets = length.to_octets();
    }

    /// Removes identifier and length octets, making this a bare value.
    pub(crate) fn strip_header(&mut self) {
        self.tag = Tag::END_OF_CONTENTS;
        self.tag_known = false;
        self.complete = false;
        self.length_form = LengthForm::Short;
        self.tag_octets.clear();
        self.length_octets.clear();
    }
}

/// # Encoding
///
impl Tlv {
    /// Returns the length of the content octets.
    ///
    /// For constructed values this includes the full encoding of all
    /// children.
    pub fn content_len(&self) -> usize {
        match self.content {
            Content::Primitive(ref value) => value.len(),
            Content::Constructed(ref children) => {
                children.iter().map(Tlv::encoded_len).sum()
            }
        }
    }

    /// Returns the length of the complete encoding.
    pub fn encoded_len(&self) -> usize {
        self.tag_octets.len() + self.length_octets.len()
            + self.content_len() + self.eoc().len()
    }

    /// Returns the trailing end-of-contents octets.
    fn eoc(&self) -> &'static [u8] {
        if self.is_constructed()
            && self.length_form == LengthForm::Indefinite
        {
            b"\0\0"
        }
        else {
            b""
        }
    }

    /// Returns an iterator over the octets of the complete encoding.
    ///
    /// The encoding is produced on the fly.
    pub fn octets(&self) -> Octets {
        Octets::new(self)
    }

    /// Returns the octet at position `pos` of the complete encoding.
    pub fn octet_at(&self, pos: usize) -> Result<u8, Error> {
        self.octets().nth(pos).ok_or_else(|| {
            Error::internal(Operation::Encode, format!(
                "octet position {} beyond encoded length {}",
                pos, self.encoded_len()
            ))
        })
    }

    /// Appends the complete encoding to a buffer.
    pub fn append_encoded<B: BufMut>(&self, target: &mut B) {
        target.put_slice(&self.tag_octets);
        target.put_slice(&self.length_octets);
        match self.content {
            Content::Primitive(ref value) => target.put_slice(value),
            Content::Constructed(ref children) => {
                for child in children {
                    child.append_encoded(target)
                }
            }
        }
        target.put_slice(self.eoc());
    }

    /// Writes the complete encoding to a writer.
    pub fn write_encoded<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(&self.tag_octets)?;
        target.write_all(&self.length_octets)?;
        match self.content {
            Content::Primitive(ref value) => target.write_all(value)?,
            Content::Constructed(ref children) => {
                for child in children {
                    child.write_encoded(target)?
                }
            }
        }
        target.write_all(self.eoc())
    }

    /// Returns the complete encoding in a new vec.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut res = Vec::with_capacity(self.encoded_len());
        self.append_encoded(&mut res);
        res
    }
}


//------------ Content -------------------------------------------------------

/// The content of a TLV.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Content {
    /// The content octets of a primitive value.
    Primitive(Bytes),

    /// The children of a constructed value.
    Constructed(Vec<Tlv>),
}


//------------ Octets --------------------------------------------------------

/// An iterator over the octets of an encoded TLV.
///
/// Created by [`Tlv::octets`].
#[derive(Clone, Debug)]
pub struct Octets<'a> {
    /// The pending pieces, the next one last.
    stack: Vec<Piece<'a>>,
}

#[derive(Clone, Debug)]
enum Piece<'a> {
    Octets(slice::Iter<'a, u8>),
    Children(slice::Iter<'a, Tlv>),
}

impl<'a> Octets<'a> {
    fn new(tlv: &'a Tlv) -> Self {
        let mut res = Octets { stack: Vec::new() };
        res.push_tlv(tlv);
        res
    }

    fn push_tlv(&mut self, tlv: &'a Tlv) {
        self.stack.push(Piece::Octets(tlv.eoc().iter()));
        match tlv.content {
            Content::Primitive(ref value) => {
                self.stack.push(Piece::Octets(value.iter()))
            }
            Content::Constructed(ref children) => {
                self.stack.push(Piece::Children(children.iter()))
            }
        }
        self.stack.push(Piece::Octets(tlv.length_octets.iter()));
        self.stack.push(Piece::Octets(tlv.tag_octets.iter()));
    }
}

impl<'a> Iterator for Octets<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            let child = match self.stack.last_mut()? {
                Piece::Octets(iter) => match iter.next() {
                    Some(&octet) => return Some(octet),
                    None => None,
                }
                Piece::Children(iter) => iter.next(),
            };
            match child {
                Some(child) => self.push_tlv(child),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}


//============ Tests =========================================================
