//! # sprig
//!
//! A parser and writer for the Sprig format: a human-readable,
//! tree-structured configuration and data-interchange format whose syntax
//! borrows from shell command lines.
//!
//! ## The format in one example
//!
//! ```text
//! // A node per line: an identifier followed by data values.
//! title "My project"
//! keywords config tree-structured
//!
//! #server
//!     host localhost
//!     port 8080
//!     motd {
//!         Welcome!
//!         Second line of the greeting.
//!     }
//!     icon { base64
//!         AAECAwQF
//!     }
//! #
//! ```
//!
//! - Every node has an identifier and optional data values on the same
//!   line; `#header` ... `#` wraps nested child nodes around a scope.
//! - Values are bare identifiers, quoted strings with C-style escapes, or
//!   `{ ... }` blocks: multi-line text with the common indentation
//!   stripped, optionally base64-decoded via the `base64` codec.
//! - `//` and `/* ... */` comments, `;` to separate nodes on one line, and
//!   a trailing `\` to continue a data line are all supported. Both LF and
//!   CRLF sources are accepted; the writer emits LF.
//!
//! ## Parsing
//!
//! ```rust
//! let doc = sprig::parse(b"server localhost 8080");
//!
//! let server = doc.find("server").unwrap();
//! assert_eq!(server.data_at(0), Some(&b"localhost"[..]));
//! assert_eq!(server.int_at(1), Some(8080));
//! ```
//!
//! Parsing never fails: malformed input is reported through an optional
//! error sink while the parser recovers and keeps going, so a best-effort
//! document always comes back.
//!
//! ```rust
//! let mut errors = Vec::new();
//! let doc = sprig::parse_with(b"ok \"unterminated", |error| errors.push(error));
//!
//! assert_eq!(doc.children[0].id, b"ok");
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].kind, sprig::ErrorKind::StringNotClosed);
//! ```
//!
//! ## Zero-copy parsing
//!
//! [`parse_view`] parses destructively in place: escape sequences and
//! base64 payloads are decoded into the source buffer itself, and the
//! resulting [`DocumentView`] borrows every byte string from that buffer
//! instead of allocating its own.
//!
//! ```rust
//! let mut source = b"greeting \"hello\\nworld\"".to_vec();
//! let view = sprig::parse_view(&mut source);
//! assert_eq!(view.children[0].data[0], b"hello\nworld".as_slice());
//! ```
//!
//! ## Writing
//!
//! ```rust
//! let mut doc = sprig::Document::default();
//! let mut node = sprig::Document::new("greeting");
//! node.push_data("hello world");
//! doc.push_child(node);
//!
//! assert_eq!(sprig::to_vec(&doc), b"greeting \"hello world\"\n");
//! ```
//!
//! The writer picks the most compact spelling for every value, and its
//! output always parses back to an equal tree. The one asymmetry is the
//! root: a root id or root data has no spelling in the format and is
//! silently dropped.

pub mod document;
pub mod error;
pub mod options;

mod base64;
mod chars;
mod parser;
mod scanner;
mod writer;

pub use document::{parse_bool, parse_integer, Document, DocumentView, Node};
pub use error::{ErrorKind, ParseError};
pub use options::{
    Indentation, ParseOptions, WriteOptions, DEFAULT_ERROR_LIMIT, DEFAULT_RECURSION_LIMIT,
};

use std::io;

/// Parses `source` into a new document, discarding any parse errors.
///
/// # Examples
///
/// ```rust
/// let doc = sprig::parse(b"Key data1 data2");
/// assert_eq!(doc.children[0].id, b"Key");
/// assert_eq!(doc.children[0].data.len(), 2);
/// ```
#[must_use]
pub fn parse(source: &[u8]) -> Document {
    parse_with(source, |_| {})
}

/// Parses `source` into a new document, reporting recovered errors to
/// `on_error` in source order.
#[must_use]
pub fn parse_with<F: FnMut(ParseError)>(source: &[u8], on_error: F) -> Document {
    parse_with_options(source, ParseOptions::default(), on_error)
}

/// Parses `source` into a new document with explicit limits.
///
/// # Examples
///
/// ```rust
/// use sprig::ParseOptions;
///
/// let mut reported = 0;
/// let options = ParseOptions::new().with_error_limit(1);
/// let doc = sprig::parse_with_options(b"\x01\x01\x01", options, |_| reported += 1);
/// assert!(doc.children.is_empty());
/// assert_eq!(reported, 1);
/// ```
#[must_use]
pub fn parse_with_options<F: FnMut(ParseError)>(
    source: &[u8],
    options: ParseOptions,
    on_error: F,
) -> Document {
    let mut doc = Document::default();
    parser::parse_into_owned(&mut doc, source, &options, on_error);
    doc
}

/// Parses `source` and appends the resulting nodes to `doc`'s children,
/// discarding any parse errors.
///
/// # Examples
///
/// ```rust
/// let mut doc = sprig::Document::default();
/// sprig::parse_into(&mut doc, b"First");
/// sprig::parse_into(&mut doc, b"Second");
/// assert_eq!(doc.children.len(), 2);
/// ```
pub fn parse_into(doc: &mut Document, source: &[u8]) {
    parse_into_with(doc, source, |_| {});
}

/// Parses `source` and appends the resulting nodes to `doc`'s children,
/// reporting recovered errors to `on_error`.
pub fn parse_into_with<F: FnMut(ParseError)>(doc: &mut Document, source: &[u8], on_error: F) {
    parser::parse_into_owned(doc, source, &ParseOptions::default(), on_error);
}

/// Parses `source` destructively in place, discarding any parse errors.
///
/// The returned [`DocumentView`] borrows every byte string from `source`,
/// which must stay alive and untouched for as long as the view is used.
/// No storage is allocated for the values themselves: decoded forms are
/// written back over their encoded spelling inside the buffer.
///
/// # Examples
///
/// ```rust
/// let mut source = b"Key value".to_vec();
/// let view = sprig::parse_view(&mut source);
/// assert_eq!(view.children[0].id, b"Key".as_slice());
/// ```
pub fn parse_view(source: &mut [u8]) -> DocumentView<'_> {
    parse_view_with(source, |_| {})
}

/// Parses `source` destructively in place, reporting recovered errors to
/// `on_error`.
pub fn parse_view_with<F: FnMut(ParseError)>(
    source: &mut [u8],
    on_error: F,
) -> DocumentView<'_> {
    parse_view_with_options(source, ParseOptions::default(), on_error)
}

/// Parses `source` destructively in place with explicit limits.
pub fn parse_view_with_options<F: FnMut(ParseError)>(
    source: &mut [u8],
    options: ParseOptions,
    on_error: F,
) -> DocumentView<'_> {
    let mut doc = DocumentView::default();
    doc.children = parser::parse_view_children(source, &options, on_error);
    doc
}

/// Parses `source` destructively in place and appends the resulting nodes
/// to `doc`'s children, discarding any parse errors.
pub fn parse_view_into<'a>(doc: &mut DocumentView<'a>, source: &'a mut [u8]) {
    parse_view_into_with(doc, source, |_| {});
}

/// Parses `source` destructively in place and appends the resulting nodes
/// to `doc`'s children, reporting recovered errors to `on_error`.
pub fn parse_view_into_with<'a, F: FnMut(ParseError)>(
    doc: &mut DocumentView<'a>,
    source: &'a mut [u8],
    on_error: F,
) {
    doc.children
        .extend(parser::parse_view_children(source, &ParseOptions::default(), on_error));
}

/// Renders `document` with the default formatting.
///
/// The output is guaranteed to parse back to a tree equal to `document`,
/// except that a non-empty root id or root data is dropped.
///
/// # Examples
///
/// ```rust
/// let doc = sprig::parse(b"Key  value ; Other");
/// assert_eq!(sprig::to_vec(&doc), b"Key value\nOther\n");
/// ```
#[must_use]
pub fn to_vec<D: AsRef<[u8]>>(document: &Node<D>) -> Vec<u8> {
    to_vec_with_options(document, WriteOptions::default())
}

/// Renders `document` with explicit formatting options.
#[must_use]
pub fn to_vec_with_options<D: AsRef<[u8]>>(document: &Node<D>, options: WriteOptions) -> Vec<u8> {
    writer::write_document(document, &options)
}

/// Renders `document` to `writer` with the default formatting.
///
/// # Errors
///
/// Returns an error when writing to `writer` fails.
pub fn to_writer<W: io::Write, D: AsRef<[u8]>>(writer: W, document: &Node<D>) -> io::Result<()> {
    to_writer_with_options(writer, document, WriteOptions::default())
}

/// Renders `document` to `writer` with explicit formatting options.
///
/// # Errors
///
/// Returns an error when writing to `writer` fails.
pub fn to_writer_with_options<W: io::Write, D: AsRef<[u8]>>(
    mut writer: W,
    document: &Node<D>,
    options: WriteOptions,
) -> io::Result<()> {
    writer.write_all(&to_vec_with_options(document, options))
}
