//! The encoding modes.
//!
//! This is a private module. Its public items are re-exported by the parent.


//------------ Ber, Cer, Der -------------------------------------------------

/// Basic Encoding Rules.
///
/// These are the most flexible rules. When encoding, we use definite
/// lengths throughout and keep the members of SET and SET OF values in the
/// order they were given.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ber;

/// Canonical Encoding Rules.
///
/// These rules always employ indefinite length encoding for constructed
/// values. The members of SET values are sorted by their tag and the
/// members of SET OF values by their encoding.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Cer;

/// Distinguished Encoding Rules.
///
/// These rules always employ definite length values. The members of SET
/// values are sorted by their tag and the members of SET OF values by
/// their encoding.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Der;


//------------ Mode ----------------------------------------------------------

/// One of the modes.
///
/// The mode is picked at the type level when encoding. Decoding accepts
/// everything BER allows and is configured through
/// [`decode::Config`][crate::decode::Config] instead.
pub trait Mode {
    /// The name of the rules for use in diagnostics.
    const NAME: &'static str;

    /// Are constructed values encoded with indefinite length?
    const INDEFINITE_CONSTRUCTED: bool;

    /// Are the members of SET OF values sorted by their encoding?
    const SORT_SET_OF: bool;

    /// Are the members of SET values sorted by their tag?
    const SORT_SET: bool;
}

impl Mode for Ber {
    const NAME: &'static str = "BER";
    const INDEFINITE_CONSTRUCTED: bool = false;
    const SORT_SET_OF: bool = false;
    const SORT_SET: bool = false;
}

impl Mode for Cer {
    const NAME: &'static str = "CER";
    const INDEFINITE_CONSTRUCTED: bool = true;
    const SORT_SET_OF: bool = true;
    const SORT_SET: bool = true;
}

impl Mode for Der {
    const NAME: &'static str = "DER";
    const INDEFINITE_CONSTRUCTED: bool = false;
    const SORT_SET_OF: bool = true;
    const SORT_SET: bool = true;
}
