//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::ops;
use smallvec::SmallVec;
use crate::error::Error;


//------------ Length --------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-contents marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets. The value 0xFF for the first octet is
/// reserved.
///
/// When encoding, we always use the shortest possible form.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Length {
    /// A definite length of the given number of content octets.
    Definite(usize),

    /// An indefinite length.
    Indefinite,
}

impl Length {
    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns the form used when encoding this length.
    pub fn form(self) -> LengthForm {
        match self {
            Length::Definite(len) if len <= 0x7F => LengthForm::Short,
            Length::Definite(_) => LengthForm::Long,
            Length::Indefinite => LengthForm::Indefinite,
        }
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Definite(len) if len > 0x7F => {
                LEN - encoded_start_idx(len) + 1
            }
            _ => 1,
        }
    }

    /// Returns the encoded length octets.
    pub fn to_octets(self) -> LengthOctets {
        let mut res = LengthOctets::new();
        match self {
            Length::Definite(len) if len > 0x7F => {
                let idx = encoded_start_idx(len);
                debug_assert!(idx < LEN);

                // LEN will never be greater than 126 bytes. Also, `idx` won’t
                // be greater than LEN, so the subtraction here is fine.
                res.push(((LEN - idx) | 0x80) as u8);
                res.extend(len.to_be_bytes().iter().skip(idx).copied());
            }
            Length::Definite(len) => res.push(len as u8),
            Length::Indefinite => res.push(0x80),
        }
        res
    }

    /// Parses length octets from the beginning of `data`.
    ///
    /// Returns the length, the form it was encoded in, and the number of
    /// octets used. Returns `Ok(None)` if `data` ends before the length
    /// octets do. Leading zero octets are accepted in the long form.
    pub fn parse(
        data: &[u8]
    ) -> Result<Option<(Self, LengthForm, usize)>, Error> {
        let Some(&first) = data.first() else {
            return Ok(None)
        };
        match first {
            // Bit 7 clear: short form.
            n if (n & 0x80) == 0 => {
                Ok(Some((Length::Definite(n.into()), LengthForm::Short, 1)))
            }

            // 0x80: indefinite.
            0x80 => Ok(Some((Length::Indefinite, LengthForm::Indefinite, 1))),

            // 0xFF: reserved.
            0xFF => Err(Error::malformed("illegal length octets")),

            // Anything else: clear left bit, number of octets.
            n => {
                let count = usize::from(n & 0x7F);
                let Some(octets) = data.get(1..count + 1) else {
                    return Ok(None)
                };
                let mut len = 0usize;
                for &octet in octets {
                    if len > (usize::MAX >> 8) {
                        return Err(Error::malformed(
                            "length of V is too big"
                        ))
                    }
                    len = (len << 8) | usize::from(octet);
                }
                Ok(Some((Length::Definite(len), LengthForm::Long, count + 1)))
            }
        }
    }
}

/// The number of octets in a `usize`.
const LEN: usize = usize::BITS as usize / 8;

/// Returns the index of the first non-zero octet of `len`.
fn encoded_start_idx(len: usize) -> usize {
    (len.leading_zeros() / 8) as usize
}


//------------ LengthOctets --------------------------------------------------

/// The encoded length octets.
pub type LengthOctets = SmallVec<[u8; 9]>;


//------------ LengthForm ----------------------------------------------------

/// The form used to encode a length.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LengthForm {
    /// A single octet definite length.
    #[default]
    Short,

    /// A definite length in multiple octets.
    Long,

    /// An indefinite length.
    Indefinite,
}

impl LengthForm {
    /// Returns the set of forms containing only this form.
    pub fn as_forms(self) -> LengthForms {
        match self {
            LengthForm::Short => LengthForms::SHORT,
            LengthForm::Long => LengthForms::LONG,
            LengthForm::Indefinite => LengthForms::INDEFINITE,
        }
    }
}


//------------ LengthForms ---------------------------------------------------

/// A set of length forms accepted when decoding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LengthForms(u8);

impl LengthForms {
    /// Accept the short definite form.
    pub const SHORT: Self = LengthForms(0x01);

    /// Accept the long definite form.
    pub const LONG: Self = LengthForms(0x02);

    /// Accept the indefinite form.
    pub const INDEFINITE: Self = LengthForms(0x04);

    /// Accept both definite forms.
    pub const DEFINITE: Self = LengthForms(0x03);

    /// Accept all forms.
    pub const ALL: Self = LengthForms(0x07);

    /// Returns whether `form` is part of the set.
    pub fn contains(self, form: LengthForm) -> bool {
        self.0 & form.as_forms().0 != 0
    }
}

impl Default for LengthForms {
    fn default() -> Self {
        Self::ALL
    }
}

impl ops::BitOr for LengthForms {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        LengthForms(self.0 | other.0)
    }
}


//============ Tests =========================================================
