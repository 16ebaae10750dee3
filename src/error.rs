//! Parse error reporting.
//!
//! Parsing never fails outright: the parser recovers from every malformed
//! construct and always produces a best-effort document. Each recovery is
//! reported to a caller-supplied sink as a [`ParseError`], up to the
//! configured limit ([`DEFAULT_ERROR_LIMIT`](crate::DEFAULT_ERROR_LIMIT)
//! by default), after which further reports are dropped silently while
//! parsing continues.
//!
//! ## Examples
//!
//! ```rust
//! use sprig::ErrorKind;
//!
//! let mut errors = Vec::new();
//! let doc = sprig::parse_with(b"Key \"left open", |error| errors.push(error));
//!
//! assert_eq!(doc.children[0].data[0], b"left open");
//! assert_eq!(errors[0].kind, ErrorKind::StringNotClosed);
//! assert_eq!((errors[0].line, errors[0].column), (1, 5));
//! ```

use std::fmt;

use thiserror::Error;

/// Everything that can go wrong, and be recovered from, while parsing.
///
/// The kinds ending in `NotClosed` point at the opening marker of the
/// construct that was left open; all others point at the offending byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A byte not permitted in the current context was skipped.
    #[error("illegal character")]
    IllegalCharacter,
    /// The source ended while a `#`-opened node was still open.
    #[error("node not closed")]
    NodeNotClosed,
    /// The source ended inside a `/* ... */` comment.
    #[error("comment not closed")]
    CommentNotClosed,
    /// A line break or the end of the source was reached inside a string;
    /// the partial content is kept.
    #[error("string not closed")]
    StringNotClosed,
    /// The source ended inside a `{ ... }` block; the partial content is
    /// kept.
    #[error("block not closed")]
    BlockNotClosed,
    /// A stray `#` close marker at the outermost level.
    #[error("too many node closing markers")]
    TooManyNodeClosingMarkers,
    /// An unknown codec name after `{`; the block is read as text.
    #[error("bad block codec")]
    BadCodec,
    /// Nesting went deeper than the configured recursion limit; the
    /// offending subtree is skipped.
    #[error("recursion limit reached")]
    RecursionLimitReached,
    /// Trailing characters on a line that must end after whitespace, such
    /// as the line carrying a block codec.
    #[error("expected end of line")]
    RequireNewline,
    /// A `\` followed by a byte outside the escape table; the marker is
    /// dropped.
    #[error("invalid escape character")]
    InvalidEscape,
    /// A `}` at the text indentation of a block. It closes nothing and is
    /// kept as literal text; escape it as `\}` if that was intended.
    #[error("misplaced block close marker")]
    BadBlockClose,
}

impl ErrorKind {
    /// Returns `true` for the kinds that merely flag suspicious input and
    /// leave the affected value fully usable.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            ErrorKind::RequireNewline | ErrorKind::InvalidEscape | ErrorKind::BadBlockClose
        )
    }
}

/// A single recovered parse error, delivered to the error sink.
///
/// `line` and `column` are 1-based. `byte` carries the offending character
/// for the kinds that have one and NUL for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub byte: u8,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.kind, self.line, self.column)?;
        if self.byte != 0 {
            if self.byte.is_ascii_graphic() {
                write!(f, " ('{}')", self.byte as char)?;
            } else {
                write!(f, " ({:#04x})", self.byte)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
