//! Error types for the jjnet network model.
//!
//! Organized by the layer that raises them: tag expression parsing,
//! network access, and strategy hooks (populators, perturbators, tracers).

use std::error::Error;
use std::fmt;

/// What went wrong while parsing a tag expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The expression string was empty.
    Empty,
    /// A character that cannot start or continue the current production.
    UnexpectedChar(char),
    /// Input ended where a tag, comparison or group was expected.
    UnexpectedEnd,
    /// A `(` without its matching `)`.
    UnterminatedGroup,
    /// A complete expression was parsed but input remains.
    NotFullyConsumed,
}

/// A malformed or partially consumed tag expression.
///
/// `position` is the byte offset of the offending input and `fragment`
/// the unparsed remainder starting at that offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the expression.
    pub position: usize,
    /// The remainder of the expression from `position`.
    pub fragment: String,
    /// Classification of the failure.
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(expression: &str, position: usize, kind: ParseErrorKind) -> Self {
        let fragment = expression.get(position..).unwrap_or_default().to_string();
        Self {
            position,
            fragment,
            kind,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::Empty => write!(f, "empty tag expression"),
            ParseErrorKind::UnexpectedChar(c) => {
                write!(f, "unexpected '{c}' at {}: '{}'", self.position, self.fragment)
            }
            ParseErrorKind::UnexpectedEnd => {
                write!(f, "unexpected end of expression at {}", self.position)
            }
            ParseErrorKind::UnterminatedGroup => {
                write!(f, "unterminated group at {}: '{}'", self.position, self.fragment)
            }
            ParseErrorKind::NotFullyConsumed => write!(
                f,
                "expression not fully consumed at {}: '{}'",
                self.position, self.fragment
            ),
        }
    }
}

impl Error for ParseError {}

/// Errors from [`Network`](crate::Network) access and queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkError {
    /// Contact index past the end of the contact list.
    ContactOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of contacts in the network.
        len: usize,
    },
    /// Circuit index past the end of the circuit list.
    CircuitOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of circuits in the network.
        len: usize,
    },
    /// A circuit references a contact that does not exist.
    DanglingContactRef {
        /// Index of the offending circuit, or the index it would have taken.
        circuit: usize,
        /// The contact index named by the reference.
        contact: usize,
        /// Number of contacts in the network.
        len: usize,
    },
    /// A tag expression used for filtering could not be parsed.
    Parse(ParseError),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContactOutOfRange { index, len } => {
                write!(f, "contact index {index} out of range (network has {len})")
            }
            Self::CircuitOutOfRange { index, len } => {
                write!(f, "circuit index {index} out of range (network has {len})")
            }
            Self::DanglingContactRef {
                circuit,
                contact,
                len,
            } => write!(
                f,
                "circuit {circuit} references contact {contact} but network has {len} contacts"
            ),
            Self::Parse(e) => write!(f, "tag expression: {e}"),
        }
    }
}

impl Error for NetworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for NetworkError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

/// Errors raised by strategy hooks (populators, perturbators, tracers).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookError {
    /// A network access or tag query failed.
    Network(NetworkError),
    /// A trace sink could not be opened or written.
    Io {
        /// File the sink was writing to.
        path: String,
        /// Description of the I/O failure.
        reason: String,
    },
    /// Any other strategy failure.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Io { path, reason } => write!(f, "i/o on '{path}': {reason}"),
            Self::Failed { reason } => write!(f, "{reason}"),
        }
    }
}

impl Error for HookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NetworkError> for HookError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl From<ParseError> for HookError {
    fn from(e: ParseError) -> Self {
        Self::Network(NetworkError::Parse(e))
    }
}
