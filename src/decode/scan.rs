//! Scanning octets into TLVs.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::ops::Range;
use bytes::Bytes;
use crate::error::{Error, ErrorKind, Operation};
use crate::ident::{Ident, IdentOctets};
use crate::length::{Length, LengthOctets};
use crate::tlv::{Content, Tlv};
use super::Config;


//------------ Input ---------------------------------------------------------

/// Data that can be scanned.
///
/// The scanner needs to look at the octets and to produce the content of
/// primitive values. Scanning [`Bytes`] shares the content with the
/// scanned data while scanning a slice copies it.
pub trait Input {
    /// Returns the octets of the data.
    fn octets(&self) -> &[u8];

    /// Returns the content for the given range of octets.
    ///
    /// The range is guaranteed to be within the data.
    fn value(&self, range: Range<usize>) -> Bytes;
}

impl Input for [u8] {
    fn octets(&self) -> &[u8] {
        self
    }

    fn value(&self, range: Range<usize>) -> Bytes {
        self.get(range).map(Bytes::copy_from_slice).unwrap_or_default()
    }
}

impl Input for Bytes {
    fn octets(&self) -> &[u8] {
        self.as_ref()
    }

    fn value(&self, range: Range<usize>) -> Bytes {
        self.slice(range)
    }
}


//------------ Scan ----------------------------------------------------------

/// The result of scanning.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Scan {
    /// A complete TLV was found.
    Complete {
        /// The TLV.
        tlv: Tlv,

        /// The number of octets it occupied.
        consumed: usize,
    },

    /// The data ended before the TLV did.
    ///
    /// Scanning can be tried again once more data is available.
    Incomplete {
        /// Whatever could be learned about the TLV so far.
        ///
        /// If the identifier octets were available, the tag is known. For
        /// a constructed value, the children found so far are included.
        partial: Tlv,
    },
}

impl Scan {
    /// Returns whether a complete TLV was found.
    pub fn is_complete(&self) -> bool {
        matches!(self, Scan::Complete { .. })
    }
}

/// Scans a single TLV from the beginning of `input`.
pub fn scan<I: Input + ?Sized>(
    input: &I, config: &Config
) -> Result<Scan, Error> {
    scan_at(input, 0, config)
}

/// Scans a single TLV starting at `offset` into `input`.
///
/// Positions reported in errors are relative to the start of `input`.
pub fn scan_at<I: Input + ?Sized>(
    input: &I, offset: usize, config: &Config
) -> Result<Scan, Error> {
    let scanner = Scanner { input, data: input.octets(), config };
    let limit = scanner.data.len();
    if offset > limit {
        return Err(Error::internal(
            Operation::Decode, "scan offset beyond end of data"
        ))
    }
    match scanner.tlv(offset, limit, false, 0)? {
        Step::Done(tlv, end) => {
            log::debug!(
                "scanned {} at offset {}, {} octets",
                tlv.tag(), offset, end - offset
            );
            Ok(Scan::Complete { tlv, consumed: end - offset })
        }
        Step::Partial(partial) => {
            log::debug!("incomplete TLV at offset {}", offset);
            Ok(Scan::Incomplete { partial })
        }
    }
}

/// Scans exactly one complete TLV from `input`.
///
/// Running out of data is an error of kind [`ErrorKind::Incomplete`] and
/// data left after the TLV is an error, too.
pub fn scan_all<I: Input + ?Sized>(
    input: &I, config: &Config
) -> Result<Tlv, Error> {
    let len = input.octets().len();
    match scan(input, config)? {
        Scan::Complete { tlv, consumed } => {
            if consumed < len {
                Err(Error::malformed("trailing data after TLV").at(consumed))
            }
            else {
                Ok(tlv)
            }
        }
        Scan::Incomplete { .. } => {
            Err(Error::decode(ErrorKind::Incomplete).at(len))
        }
    }
}


//------------ Scanner -------------------------------------------------------

struct Scanner<'a, I: ?Sized> {
    input: &'a I,
    data: &'a [u8],
    config: &'a Config,
}

/// The outcome of scanning one TLV.
enum Step {
    /// A complete TLV ending at the given position.
    Done(Tlv, usize),

    /// The data ended early.
    Partial(Tlv),
}

impl<'a, I: Input + ?Sized> Scanner<'a, I> {
    /// Scans the TLV starting at `start`.
    ///
    /// The TLV must end before `limit`. If `bounded` is `true`, `limit` is
    /// the end of an enclosing definite-length value and running into it
    /// is an error. Otherwise, it is the end of the data and running into
    /// it means the data is incomplete.
    fn tlv(
        &self, start: usize, limit: usize, bounded: bool, depth: usize
    ) -> Result<Step, Error> {
        if depth > self.config.max_depth() {
            return Err(Error::decode(
                ErrorKind::TooDeep(self.config.max_depth())
            ).at(start))
        }

        let Some(ident) = Ident::parse(
            self.slice(start, limit)
        ).map_err(|err| err.at(start))? else {
            return self.short(
                bounded, start,
                Tlv::partial(None, Content::Primitive(Bytes::new()))
            )
        };
        let length_start = start + ident.len();

        let Some((length, form, length_len)) = Length::parse(
            self.slice(length_start, limit)
        ).map_err(|err| err.at(length_start))? else {
            return self.short(
                bounded, length_start, partial(ident, Vec::new())
            )
        };
        if !self.config.forms().contains(form) {
            return Err(Error::malformed(
                format!("length form {:?} not accepted", form)
            ).at(length_start))
        }
        let value_start = length_start + length_len;

        let tag_octets = IdentOctets::from_slice(
            self.slice(start, length_start)
        );
        let length_octets = LengthOctets::from_slice(
            self.slice(length_start, value_start)
        );

        match length {
            Length::Definite(len) => {
                let end = match value_start.checked_add(len) {
                    Some(end) if end <= limit => end,
                    _ => {
                        let children = if ident.is_constructed() && !bounded {
                            self.partial_children(value_start, limit, depth)?
                        }
                        else {
                            Vec::new()
                        };
                        return self.short(
                            bounded, value_start, partial(ident, children)
                        )
                    }
                };
                let content = if ident.is_constructed() {
                    Content::Constructed(
                        self.children(value_start, end, depth)?
                    )
                }
                else {
                    Content::Primitive(self.input.value(value_start..end))
                };
                Ok(Step::Done(
                    Tlv::from_parts(
                        ident.tag(), tag_octets, form, length_octets, content
                    ),
                    end
                ))
            }
            Length::Indefinite => {
                if !ident.is_constructed() {
                    return Err(Error::malformed(
                        "indefinite length on a primitive value"
                    ).at(length_start))
                }
                let mut children = Vec::new();
                let mut pos = value_start;
                loop {
                    match self.slice(pos, limit) {
                        [] | [0x00] => {
                            return self.short(
                                bounded, pos, partial(ident, children)
                            )
                        }
                        [0x00, 0x00, ..] => {
                            return Ok(Step::Done(
                                Tlv::from_parts(
                                    ident.tag(), tag_octets, form,
                                    length_octets,
                                    Content::Constructed(children)
                                ),
                                pos + 2
                            ))
                        }
                        [0x00, ..] => {
                            return Err(Error::malformed(
                                "end-of-contents with non-zero length"
                            ).at(pos))
                        }
                        [0x20, ..] => {
                            return Err(Error::malformed(
                                "constructed end-of-contents"
                            ).at(pos))
                        }
                        _ => { }
                    }
                    match self.tlv(pos, limit, bounded, depth + 1)? {
                        Step::Done(child, end) => {
                            children.push(child);
                            pos = end;
                        }
                        Step::Partial(child) => {
                            children.push(child);
                            return Ok(Step::Partial(
                                partial(ident, children)
                            ))
                        }
                    }
                }
            }
        }
    }

    /// Scans the children of a definite-length constructed value.
    fn children(
        &self, mut pos: usize, end: usize, depth: usize
    ) -> Result<Vec<Tlv>, Error> {
        let mut res = Vec::new();
        while pos < end {
            match self.tlv(pos, end, true, depth + 1)? {
                Step::Done(child, child_end) => {
                    res.push(child);
                    pos = child_end;
                }
                Step::Partial(_) => {
                    return Err(Error::malformed(
                        "TLV overruns its enclosing value"
                    ).at(pos))
                }
            }
        }
        Ok(res)
    }

    /// Scans what is there of the children of a cut off value.
    fn partial_children(
        &self, mut pos: usize, limit: usize, depth: usize
    ) -> Result<Vec<Tlv>, Error> {
        let mut res = Vec::new();
        while pos < limit {
            match self.tlv(pos, limit, false, depth + 1)? {
                Step::Done(child, child_end) => {
                    res.push(child);
                    pos = child_end;
                }
                Step::Partial(child) => {
                    res.push(child);
                    break
                }
            }
        }
        Ok(res)
    }

    /// Handles running out of data at `pos`.
    fn short(
        &self, bounded: bool, pos: usize, partial: Tlv
    ) -> Result<Step, Error> {
        if bounded {
            Err(Error::malformed("TLV overruns its enclosing value").at(pos))
        }
        else {
            Ok(Step::Partial(partial))
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        self.data.get(start..end).unwrap_or_default()
    }
}

/// Creates the partial TLV for identifier octets and children so far.
fn partial(ident: Ident, children: Vec<Tlv>) -> Tlv {
    let content = if ident.is_constructed() {
        Content::Constructed(children)
    }
    else {
        Content::Primitive(Bytes::new())
    };
    Tlv::partial(Some(ident.tag()), content)
}


//============ Tests =========================================================
