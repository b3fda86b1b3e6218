//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::borrow::Cow;
use std::{error, fmt};
use smallvec::SmallVec;
use crate::ident::Tag;


//------------ Error ---------------------------------------------------------

/// An error happened while encoding or decoding data.
///
/// Apart from the [`ErrorKind`] describing what went wrong, the error
/// collects a path of [`Segment`]s describing where it went wrong. The path
/// is extended while the error travels outwards through the nested types
/// via [`Error::within`]. If the error was caused by a specific position
/// in the input data, this is available, too.
///
/// The complete diagnostic is only assembled when the error is displayed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    /// Did this happen while encoding or decoding?
    operation: Operation,

    /// What happened.
    kind: ErrorKind,

    /// Where it happened, innermost segment first.
    path: SmallVec<[Segment; 4]>,

    /// The offset into the input data, if known.
    pos: Option<usize>,
}

impl Error {
    /// Creates a new error.
    pub fn new(operation: Operation, kind: ErrorKind) -> Self {
        Error { operation, kind, path: SmallVec::new(), pos: None }
    }

    /// Creates a new decoding error.
    pub fn decode(kind: ErrorKind) -> Self {
        Self::new(Operation::Decode, kind)
    }

    /// Creates a new encoding error.
    pub fn encode(kind: ErrorKind) -> Self {
        Self::new(Operation::Encode, kind)
    }

    /// Creates an error for malformed encoded data.
    pub fn malformed(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::decode(ErrorKind::Malformed(msg.into()))
    }

    /// Creates an error for incorrect use of the crate.
    pub fn internal(
        operation: Operation, msg: impl Into<Cow<'static, str>>
    ) -> Self {
        Self::new(operation, ErrorKind::Internal(msg.into()))
    }

    /// Adds the next outer segment to the path.
    pub fn within(mut self, segment: Segment) -> Self {
        self.path.push(segment);
        self
    }

    /// Sets the position of the error unless it is already known.
    ///
    /// Positions are relative to the start of the scanned data.
    pub fn at(mut self, pos: usize) -> Self {
        if self.pos.is_none() {
            self.pos = Some(pos)
        }
        self
    }

    /// Returns whether this happened while encoding or decoding.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns what happened.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the path, outermost segment first.
    pub fn path(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.path.iter().rev()
    }

    /// Returns the position in the input data if available.
    pub fn pos(&self) -> Option<usize> {
        self.pos
    }

    /// Returns whether the error was caused by running out of data.
    ///
    /// Such errors can be cured by trying again with more data.
    pub fn is_incomplete(&self) -> bool {
        matches!(self.kind, ErrorKind::Incomplete)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::decode(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "while {}", self.operation)?;
        let mut path = self.path();
        if let Some(first) = path.next() {
            write!(f, " {}", first)?;
            for segment in path {
                write!(f, ": {}", segment)?;
            }
        }
        write!(f, ": {}", self.kind)?;
        if let Some(pos) = self.pos {
            write!(f, " (at offset {})", pos)?;
        }
        Ok(())
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.kind)
    }
}


//------------ ErrorKind -----------------------------------------------------

/// What went wrong.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// The data ended before the TLV was complete.
    ///
    /// This can be recovered from by providing more data.
    #[error("TLV is not complete")]
    Incomplete,

    /// The data is not correctly encoded.
    #[error("{0}")]
    Malformed(Cow<'static, str>),

    /// A tag other than the expected one was found.
    #[error("tag mismatch: expected {expected}, received {received}")]
    TagMismatch {
        expected: Tag,
        received: Tag,
    },

    /// A primitive value was found where more tags were expected.
    #[error("the other (innermost {missing}) tag(s) are missing")]
    MissingTags {
        missing: usize,
    },

    /// None of the alternatives of a CHOICE accepted the value.
    #[error("invalid tag or unknown alternative: {received}")]
    NoAlternative {
        received: Tag,
    },

    /// A primitive value was found where a constructed one was expected.
    #[error("a constructed value was expected")]
    NotConstructed,

    /// A mandatory component was missing.
    #[error("missing value for component '{0}'")]
    MissingComponent(&'static str),

    /// A component was present more than once.
    #[error("duplicated value for component '{0}'")]
    DuplicateComponent(&'static str),

    /// There were more TLVs than components.
    #[error("superfluous TLV(s) at the end of a constructed value")]
    Superfluous,

    /// The values were nested too deeply.
    #[error("values nested deeper than {0} levels")]
    TooDeep(usize),

    /// The crate was used incorrectly.
    #[error("internal error: {0}")]
    Internal(Cow<'static, str>),
}


//------------ Operation -----------------------------------------------------

/// The operation during which an error happened.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    Encode,
    Decode,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Operation::Encode => f.write_str("BER-encoding"),
            Operation::Decode => f.write_str("BER-decoding"),
        }
    }
}


//------------ Segment -------------------------------------------------------

/// A step along the path to the place where an error happened.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Segment {
    /// Inside a value of the named type.
    Type(&'static str),

    /// Inside the named component of a SEQUENCE or SET.
    Field(&'static str),

    /// Inside the named alternative of a CHOICE.
    Alternative(&'static str),

    /// Inside the element with the given index of a SEQUENCE OF or SET OF.
    Element(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Segment::Type(name) => write!(f, "type '{}'", name),
            Segment::Field(name) => write!(f, "component '{}'", name),
            Segment::Alternative(name) => {
                write!(f, "alternative '{}'", name)
            }
            Segment::Element(idx) => write!(f, "element #{}", idx),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_with_path() {
        let err = Error::decode(ErrorKind::TagMismatch {
            expected: Tag::ctx(0),
            received: Tag::ctx(1),
        }).within(Segment::Field("bar")).within(Segment::Type("Foo"));
        assert_eq!(
            err.to_string(),
            "while BER-decoding type 'Foo': component 'bar': \
             tag mismatch: expected [0], received [1]"
        );
    }

    #[test]
    fn display_without_path() {
        let err = Error::malformed("illegal length octets").at(3).at(7);
        assert_eq!(err.pos(), Some(3));
        assert_eq!(
            err.to_string(),
            "while BER-decoding: illegal length octets (at offset 3)"
        );
    }

    #[test]
    fn incomplete() {
        assert!(Error::from(ErrorKind::Incomplete).is_incomplete());
        assert!(!Error::internal(Operation::Encode, "oops").is_incomplete());
    }

    #[test]
    fn internal_operation() {
        let err = Error::internal(Operation::Decode, "oops");
        assert_eq!(err.operation(), Operation::Decode);
        assert_eq!(err.to_string(), "while BER-decoding: internal error: oops");
        assert_eq!(
            Error::internal(Operation::Encode, "oops").to_string(),
            "while BER-encoding: internal error: oops"
        );
    }

    #[test]
    fn path_order() {
        let err = Error::malformed("x")
            .within(Segment::Element(2))
            .within(Segment::Alternative("alt"));
        let path: Vec<_> = err.path().cloned().collect();
        assert_eq!(
            path,
            [Segment::Alternative("alt"), Segment::Element(2)]
        );
    }
}
