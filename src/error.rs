//! Error types.

use core::fmt;

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The text before the first `':'` is not a valid scheme name.
    ///
    /// The error index points to the first byte of the scheme.
    InvalidScheme,
    /// The port subcomponent contains a non-digit character.
    ///
    /// The error index points to the offending character.
    InvalidPort,
    /// A square bracket in the authority has no counterpart.
    ///
    /// The error index points to the bracket.
    UnbalancedBracket,
    /// Unexpected character in the host: a colon outside of an IP literal,
    /// or anything but a colon right after one.
    ///
    /// The error index points to the character.
    UnexpectedChar,
    /// The port is numeric but outside of `1..=65535`.
    ///
    /// The error index points to the first digit of the port.
    PortOutOfRange,
}

/// An error occurred when parsing a URI.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) const fn new(index: usize, kind: ParseErrorKind) -> Self {
        Self { index, kind }
    }

    /// Returns the index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ParseErrorKind::InvalidScheme => "invalid scheme at index ",
            ParseErrorKind::InvalidPort => "non-numeric port at index ",
            ParseErrorKind::UnbalancedBracket => "unbalanced bracket at index ",
            ParseErrorKind::UnexpectedChar => "unexpected character at index ",
            ParseErrorKind::PortOutOfRange => "port out of range at index ",
        };
        write!(f, "{}{}", msg, self.index)
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ParseError {}

/// An error occurred when committing a port outside of `1..=65535` to a [`Uri`].
///
/// [`Uri`]: crate::Uri
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct InvalidPortError {
    pub(crate) port: u32,
}

impl InvalidPortError {
    /// Returns the rejected port value.
    ///
    /// Ports too large to fit in `u32` are reported as [`u32::MAX`].
    #[must_use]
    pub fn port(&self) -> u32 {
        self.port
    }
}

impl fmt::Display for InvalidPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {} is outside of the range 1..=65535", self.port)
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for InvalidPortError {}
