//! A buffer for streaming encoded data.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::{Buf, BytesMut};
use crate::decode::{self, Config, Scan};
use crate::error::Error;
use crate::tlv::Tlv;


//------------ Buffer --------------------------------------------------------

/// A buffer collecting encoded data.
///
/// Data is appended at the end and consumed from the front. This makes the
/// buffer useful for both sides of a stream: encoded values can be
/// collected via [`put_tlv`][Self::put_tlv] before being written out, and
/// received octets can be added via [`put_slice`][Self::put_slice] until
/// [`next_tlv`][Self::next_tlv] finds a complete value.
///
/// Consumed data is only released by [`compact`][Self::compact].
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    /// The data.
    data: BytesMut,

    /// The number of octets at the start of `data` already consumed.
    pos: usize,
}

impl Buffer {
    /// Creates a new, empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Buffer { data: BytesMut::with_capacity(capacity), pos: 0 }
    }

    /// Appends octets to the end of the buffer.
    pub fn put_slice(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    /// Appends the complete encoding of a TLV to the end of the buffer.
    pub fn put_tlv(&mut self, tlv: &Tlv) {
        self.data.reserve(tlv.encoded_len());
        tlv.append_encoded(&mut self.data)
    }

    /// Returns the data not consumed yet.
    pub fn read_data(&self) -> &[u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }

    /// Returns the octet at `pos` of the data not consumed yet.
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.read_data().get(pos).copied()
    }

    /// Returns the number of octets not consumed yet.
    pub fn len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns whether all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of octets consumed since the last compaction.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Marks `len` octets as consumed.
    ///
    /// At most the remaining data is consumed.
    pub fn advance(&mut self, len: usize) {
        self.pos += len.min(self.len());
    }

    /// Scans the next TLV and consumes it.
    ///
    /// Returns `Ok(None)` if the data ends before the TLV does. In this
    /// case, nothing is consumed and the call can be repeated after more
    /// data has been added.
    ///
    /// Positions in errors are relative to the start of the buffer as of
    /// the last compaction.
    pub fn next_tlv(&mut self, config: &Config) -> Result<Option<Tlv>, Error> {
        match decode::scan_at(&self.data[..], self.pos, config)? {
            Scan::Complete { tlv, consumed } => {
                self.pos += consumed;
                Ok(Some(tlv))
            }
            Scan::Incomplete { .. } => Ok(None),
        }
    }

    /// Releases consumed data.
    pub fn compact(&mut self) {
        self.data.advance(self.pos);
        self.pos = 0;
    }

    /// Removes all data.
    pub fn clear(&mut self) {
        self.data.clear();
        self.pos = 0;
    }

    /// Takes the data not consumed yet out of the buffer.
    pub fn take(&mut self) -> BytesMut {
        self.compact();
        self.data.split()
    }
}


//============ Tests =========================================================
