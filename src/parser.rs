//! The recursive-descent parser.
//!
//! One state machine serves both storage variants. Its contexts mirror the
//! grammar: a node body is a sequence of headers (plus nested bodies opened
//! by `#`), a header is an identifier or string followed by same-line data,
//! and data values are identifiers, strings, or indented blocks with an
//! optional base64 codec. Every malformed construct is reported through the
//! error sink and recovered from, so the parser always runs to the end of
//! the source and yields a best-effort tree.
//!
//! The variants differ only in how captured text is materialized, which is
//! what [`Materialize`] abstracts: the owned strategy copies bytes into
//! growable buffers, while the view strategy tracks spans of the source and
//! decodes escapes and base64 payloads in place. In-place decoding is sound
//! because no decoded form is longer than its encoded spelling, so the
//! write cursor can never overtake the read cursor.

use crate::base64;
use crate::chars;
use crate::document::Node;
use crate::error::{ErrorKind, ParseError};
use crate::options::ParseOptions;
use crate::scanner::{self, Scanner};

/// Value materialization strategy, implemented once per storage variant.
pub(crate) trait Materialize {
    type Data;

    fn source(&self) -> &[u8];
    /// Starts an empty value anchored at `pos`.
    fn begin(&mut self, pos: usize) -> Self::Data;
    /// Appends the source range `[start, start + len)` to the value.
    fn push_slice(&mut self, dst: &mut Self::Data, start: usize, len: usize);
    /// Appends a single literal byte to the value.
    fn push_byte(&mut self, dst: &mut Self::Data, byte: u8);
    /// Runs the base64 decoder over the value, shrinking it in place.
    fn decode_base64(&mut self, dst: &mut Self::Data);
}

/// Owned materialization: values are copied out of the source buffer.
pub(crate) struct OwnedStrategy<'s> {
    source: &'s [u8],
}

impl Materialize for OwnedStrategy<'_> {
    type Data = Vec<u8>;

    fn source(&self) -> &[u8] {
        self.source
    }

    fn begin(&mut self, _pos: usize) -> Vec<u8> {
        Vec::new()
    }

    fn push_slice(&mut self, dst: &mut Vec<u8>, start: usize, len: usize) {
        dst.extend_from_slice(&self.source[start..start + len]);
    }

    fn push_byte(&mut self, dst: &mut Vec<u8>, byte: u8) {
        dst.push(byte);
    }

    fn decode_base64(&mut self, dst: &mut Vec<u8>) {
        let decoded = base64::decode_in_place(dst);
        dst.truncate(decoded);
    }
}

/// A range of the source buffer; the view-mode value representation.
#[derive(Clone, Copy, Default)]
pub(crate) struct Span {
    start: usize,
    len: usize,
}

/// View materialization: values stay inside the caller's buffer, and
/// decoded bytes are written back over their own encoded spelling.
///
/// A value's write position trails the read cursor by construction: every
/// appended byte corresponds to at least one consumed source byte, so the
/// `copy_within` below only ever moves bytes backwards (or not at all, for
/// a value whose decoded form is exactly its source spelling).
pub(crate) struct ViewStrategy<'s> {
    source: &'s mut [u8],
}

impl Materialize for ViewStrategy<'_> {
    type Data = Span;

    fn source(&self) -> &[u8] {
        self.source
    }

    fn begin(&mut self, pos: usize) -> Span {
        Span { start: pos, len: 0 }
    }

    fn push_slice(&mut self, dst: &mut Span, start: usize, len: usize) {
        let write = dst.start + dst.len;
        if write != start {
            self.source.copy_within(start..start + len, write);
        }
        dst.len += len;
    }

    fn push_byte(&mut self, dst: &mut Span, byte: u8) {
        self.source[dst.start + dst.len] = byte;
        dst.len += 1;
    }

    fn decode_base64(&mut self, dst: &mut Span) {
        dst.len = base64::decode_in_place(&mut self.source[dst.start..dst.start + dst.len]);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DataKind {
    Identifier,
    Str,
    Block,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CommentKind {
    NotAComment,
    StayedOnSameLine,
    PassedToNextLine,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Codec {
    Text,
    Base64,
}

pub(crate) struct Parser<M, F> {
    strategy: M,
    scanner: Scanner,
    on_error: F,
    errors_left: usize,
    recursion_limit: usize,
}

impl<M: Materialize, F: FnMut(ParseError)> Parser<M, F> {
    fn new(strategy: M, options: &ParseOptions, on_error: F) -> Self {
        Parser {
            strategy,
            scanner: Scanner::default(),
            on_error,
            errors_left: options.error_limit,
            recursion_limit: options.recursion_limit,
        }
    }

    // Scanner access.

    fn current(&self) -> u8 {
        self.scanner.current(self.strategy.source())
    }

    fn peek_next(&self) -> u8 {
        self.scanner.peek_next(self.strategy.source())
    }

    fn at_eof(&self) -> bool {
        self.scanner.is_eof(self.strategy.source())
    }

    fn pos(&self) -> usize {
        self.scanner.pos
    }

    fn advance(&mut self) {
        self.scanner.advance(self.strategy.source());
    }

    fn skip_while(&mut self, pred: impl FnMut(u8) -> bool) -> bool {
        self.scanner.skip_while(self.strategy.source(), pred)
    }

    fn read_while(&mut self, pred: impl FnMut(u8) -> bool) -> usize {
        self.scanner.read_while(self.strategy.source(), pred)
    }

    /// Appends the `len` bytes just consumed to `value`.
    fn capture(&mut self, value: &mut M::Data, len: usize) {
        let start = self.scanner.pos - len;
        self.strategy.push_slice(value, start, len);
    }

    fn source_matches(&self, start: usize, len: usize, expected: &[u8]) -> bool {
        &self.strategy.source()[start..start + len] == expected
    }

    fn report(&mut self, kind: ErrorKind, byte: u8, pos: usize) {
        if self.errors_left == 0 {
            return;
        }
        self.errors_left -= 1;
        let (line, column) = scanner::line_column(self.strategy.source(), pos);
        (self.on_error)(ParseError {
            kind,
            byte,
            line,
            column,
        });
    }

    // Parsing contexts.

    /// Parses a node body: the sequence of headers, nested bodies, and
    /// comments making up `node`'s children. `level` is the nesting depth;
    /// `opened_at` is the position of the `#` that opened this body.
    fn parse_node_body(&mut self, node: &mut Node<M::Data>, level: usize, opened_at: usize) {
        while self.skip_while(|ch| chars::is_whitespace(ch) || chars::is_newline(ch)) {
            if self.current() == b'/' && self.skip_comment() != CommentKind::NotAComment {
                continue;
            }

            let nested_at = self.pos();
            let nested = self.current() == b'#';
            if nested {
                self.advance();
                if self.at_eof()
                    || chars::is_whitespace(self.current())
                    || chars::is_newline(self.current())
                {
                    // A bare `#` closes the enclosing body.
                    if level == 0 {
                        self.report(ErrorKind::TooManyNodeClosingMarkers, chars::NUL, nested_at);
                    }
                    return;
                }
            }

            match self.detect_data_kind() {
                Some(kind @ (DataKind::Identifier | DataKind::Str)) => {
                    let mut child = Node {
                        id: self.parse_single_data(kind),
                        data: Vec::new(),
                        children: Vec::new(),
                    };
                    self.parse_node_data(&mut child);

                    if level + 1 >= self.recursion_limit {
                        self.report(ErrorKind::RecursionLimitReached, chars::NUL, nested_at);
                        self.skip_while(|ch| !chars::is_newline(ch));
                    } else if nested {
                        self.parse_node_body(&mut child, level + 1, nested_at);
                    }

                    node.children.push(child);
                }
                _ => {
                    self.report(ErrorKind::IllegalCharacter, self.current(), self.pos());
                    // A `#` here starts a nested header on the next pass.
                    if self.current() != b'#' {
                        self.advance();
                    }
                }
            }
        }

        if level > 0 {
            self.report(ErrorKind::NodeNotClosed, chars::NUL, opened_at);
        }
    }

    /// Parses the same-line data values of a node.
    fn parse_node_data(&mut self, node: &mut Node<M::Data>) {
        while self.skip_while(chars::is_whitespace) {
            let ch = self.current();
            if ch == b'/' {
                match self.skip_comment() {
                    // A comment reaching the next line ends the data context.
                    CommentKind::PassedToNextLine => return,
                    CommentKind::StayedOnSameLine => continue,
                    CommentKind::NotAComment => {}
                }
            }

            if ch == b';' {
                self.advance();
                return;
            }
            if ch == b'\\' {
                self.advance();
                self.skip_whitespace_until_newline();
                continue;
            }
            if chars::is_newline(ch) {
                return;
            }

            match self.detect_data_kind() {
                Some(kind) => {
                    let value = self.parse_single_data(kind);
                    node.data.push(value);
                }
                None => {
                    self.report(ErrorKind::IllegalCharacter, ch, self.pos());
                    self.advance();
                }
            }
        }
    }

    fn detect_data_kind(&self) -> Option<DataKind> {
        let ch = self.current();
        if chars::is_identifier(ch) {
            Some(DataKind::Identifier)
        } else if ch == b'"' {
            Some(DataKind::Str)
        } else if ch == b'{' {
            Some(DataKind::Block)
        } else {
            None
        }
    }

    fn parse_single_data(&mut self, kind: DataKind) -> M::Data {
        match kind {
            DataKind::Identifier => self.parse_identifier(),
            DataKind::Str => self.parse_string(),
            DataKind::Block => self.parse_block(),
        }
    }

    fn parse_identifier(&mut self) -> M::Data {
        let mut value = self.strategy.begin(self.pos());
        let len = self.read_while(chars::is_identifier);
        self.capture(&mut value, len);
        value
    }

    /// Parses a quoted string; the cursor sits on the opening quote.
    fn parse_string(&mut self) -> M::Data {
        let opened_at = self.pos();
        self.advance();

        let mut value = self.strategy.begin(self.pos());
        while !self.at_eof() {
            let len =
                self.read_while(|ch| ch != b'"' && !chars::is_newline(ch) && ch != b'\\');
            self.capture(&mut value, len);

            if self.current() == b'"' {
                self.advance();
                return value;
            } else if self.current() == b'\\' {
                self.read_escape(&mut value);
            } else {
                // Unterminated: leave the newline for the enclosing context.
                break;
            }
        }

        self.report(ErrorKind::StringNotClosed, chars::NUL, opened_at);
        value
    }

    /// Parses a `{ ... }` block; the cursor sits on the opening brace.
    fn parse_block(&mut self) -> M::Data {
        let opened_at = self.pos();
        self.advance();

        if !self.skip_while(chars::is_whitespace) {
            self.report(ErrorKind::BlockNotClosed, chars::NUL, opened_at);
            let pos = self.pos();
            return self.strategy.begin(pos);
        }

        let base64_block =
            chars::is_identifier(self.current()) && self.parse_block_codec() == Codec::Base64;
        self.skip_whitespace_until_newline();

        let mut value = self.parse_block_body(opened_at, base64_block);
        if base64_block {
            self.strategy.decode_base64(&mut value);
        }
        value
    }

    fn parse_block_codec(&mut self) -> Codec {
        let codec_at = self.pos();
        let len = self.read_while(chars::is_identifier);

        if self.source_matches(codec_at, len, b"base64") {
            return Codec::Base64;
        }
        if !self.source_matches(codec_at, len, b"text") {
            self.report(ErrorKind::BadCodec, chars::NUL, codec_at);
        }
        Codec::Text
    }

    /// Parses the indented body of a block. The whitespace before the first
    /// content line sets the indentation column stripped from every
    /// following line; a `}` before that column closes the block.
    fn parse_block_body(&mut self, opened_at: usize, base64_block: bool) -> M::Data {
        let before_indent = self.pos();
        self.skip_while(chars::is_whitespace);
        let column_depth = self.pos() - before_indent;

        let pos = self.pos();
        let mut value = self.strategy.begin(pos);
        let mut first_line = true;
        let mut line_start = before_indent;

        while !self.at_eof() {
            if self.current() == b'}' {
                if first_line || self.pos() - line_start < column_depth {
                    self.advance();
                    return value;
                }
                // A close marker at the text indentation is literal text.
                self.report(ErrorKind::BadBlockClose, chars::NUL, self.pos());
            }

            // Base64 bodies join their lines without separators.
            if !first_line && !base64_block {
                self.strategy.push_byte(&mut value, b'\n');
            }

            self.parse_block_line(&mut value);

            // Strip up to one indentation's worth of whitespace.
            line_start = self.pos();
            let target = line_start + column_depth;
            while !self.at_eof() && self.pos() < target && chars::is_whitespace(self.current()) {
                self.advance();
            }

            first_line = false;
        }

        self.report(ErrorKind::BlockNotClosed, chars::NUL, opened_at);
        value
    }

    /// Parses one line of a block body up to and including its line break.
    fn parse_block_line(&mut self, value: &mut M::Data) {
        while !self.at_eof() {
            let len = self.read_while(|ch| !chars::is_newline(ch) && ch != b'\\');
            self.capture(value, len);

            if self.at_eof() {
                break;
            } else if chars::is_newline(self.current()) {
                self.advance();
                return;
            } else {
                self.read_escape(value);
            }
        }
    }

    /// Skips a comment if the cursor sits on one, classifying how far it
    /// reached.
    fn skip_comment(&mut self) -> CommentKind {
        let opened_at = self.pos();
        match self.peek_next() {
            b'*' => {
                self.advance();
                self.advance();

                let mut kind = CommentKind::StayedOnSameLine;
                while !self.at_eof() {
                    if self.current() == b'*' && self.peek_next() == b'/' {
                        self.advance();
                        self.advance();
                        return kind;
                    }
                    if chars::is_newline(self.current()) {
                        kind = CommentKind::PassedToNextLine;
                    }
                    self.advance();
                }

                self.report(ErrorKind::CommentNotClosed, chars::NUL, opened_at);
                kind
            }
            b'/' => {
                self.skip_while(|ch| !chars::is_newline(ch));
                CommentKind::PassedToNextLine
            }
            _ => CommentKind::NotAComment,
        }
    }

    /// Skips trailing whitespace and the line break ending the current
    /// line, reporting anything else found in between.
    fn skip_whitespace_until_newline(&mut self) {
        self.skip_while(chars::is_whitespace);

        if !chars::is_newline(self.current()) {
            self.report(ErrorKind::RequireNewline, self.current(), self.pos());
            self.skip_while(|ch| !chars::is_newline(ch));
        }

        if !self.at_eof() {
            self.advance();
        }
    }

    /// Consumes a `\` escape, appending its literal byte. On an invalid
    /// escape the marker is dropped and the offending byte is left for the
    /// enclosing context.
    fn read_escape(&mut self, value: &mut M::Data) {
        self.advance();
        let ch = self.current();
        match chars::unescape(ch) {
            Some(byte) => {
                self.strategy.push_byte(value, byte);
                self.advance();
            }
            None => {
                self.report(ErrorKind::InvalidEscape, ch, self.pos());
            }
        }
    }
}

/// Parses `source`, appending the resulting nodes to `doc`'s children.
pub(crate) fn parse_into_owned<F: FnMut(ParseError)>(
    doc: &mut Node<Vec<u8>>,
    source: &[u8],
    options: &ParseOptions,
    on_error: F,
) {
    let mut parser = Parser::new(OwnedStrategy { source }, options, on_error);
    parser.parse_node_body(doc, 0, 0);
}

/// Parses `source` in place and returns the top-level nodes as views into
/// it.
pub(crate) fn parse_view_children<'a, F: FnMut(ParseError)>(
    source: &'a mut [u8],
    options: &ParseOptions,
    on_error: F,
) -> Vec<Node<&'a [u8]>> {
    let mut root = Node::<Span>::default();
    {
        let mut parser = Parser::new(
            ViewStrategy {
                source: &mut *source,
            },
            options,
            on_error,
        );
        parser.parse_node_body(&mut root, 0, 0);
    }

    let source: &'a [u8] = source;
    root.children
        .into_iter()
        .map(|child| materialize_spans(child, source))
        .collect()
}

fn materialize_spans<'a>(node: Node<Span>, source: &'a [u8]) -> Node<&'a [u8]> {
    Node {
        id: &source[node.id.start..node.id.start + node.id.len],
        data: node
            .data
            .into_iter()
            .map(|span| &source[span.start..span.start + span.len])
            .collect(),
        children: node
            .children
            .into_iter()
            .map(|child| materialize_spans(child, source))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_strategy_reuses_source_bytes_in_place() {
        let mut buf = b"hello".to_vec();
        let mut strategy = ViewStrategy { source: &mut buf };

        let mut span = strategy.begin(0);
        strategy.push_slice(&mut span, 0, 5);
        assert_eq!(span.start, 0);
        assert_eq!(span.len, 5);
        // A perfectly overlapping append must leave the buffer untouched.
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn view_strategy_moves_later_bytes_backwards() {
        let mut buf = b"..abc".to_vec();
        let mut strategy = ViewStrategy { source: &mut buf };

        let mut span = strategy.begin(0);
        strategy.push_slice(&mut span, 2, 3);
        assert_eq!(span.len, 3);
        assert_eq!(&buf[..3], b"abc");
    }

    #[test]
    fn view_strategy_decodes_base64_in_place() {
        let mut buf = b"aGVsbG8=".to_vec();
        let mut strategy = ViewStrategy { source: &mut buf };

        let mut span = strategy.begin(0);
        strategy.push_slice(&mut span, 0, 8);
        strategy.decode_base64(&mut span);
        assert_eq!(span.len, 5);
        assert_eq!(&buf[..5], b"hello");
    }
}
