//! Document emission.
//!
//! The writer walks the tree and picks, for every identifier and data
//! value, the most compact spelling the parser reads back verbatim: a bare
//! identifier, a quoted string, an indented block, or a base64 block for
//! binary payloads. Output always uses LF line endings.
//!
//! The root node is the document itself: its own id and data have no
//! spelling in the format and are not emitted, only its children are.

use crate::base64;
use crate::chars;
use crate::document::Node;
use crate::options::WriteOptions;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Identifier,
    Str,
    Block,
    BlockBase64,
}

/// Renders `doc` with the given options.
pub(crate) fn write_document<D: AsRef<[u8]>>(doc: &Node<D>, options: &WriteOptions) -> Vec<u8> {
    let mut writer = DocumentWriter {
        out: Vec::new(),
        options,
        indent_byte: options.indentation.as_byte(),
    };
    writer.write_node(doc, 0);
    writer.out
}

struct DocumentWriter<'o> {
    out: Vec<u8>,
    options: &'o WriteOptions,
    indent_byte: u8,
}

impl DocumentWriter<'_> {
    fn write_node<D: AsRef<[u8]>>(&mut self, node: &Node<D>, depth: usize) {
        if depth > 0 {
            self.write_indent(depth - 1);
            if !node.children.is_empty() {
                self.out.push(b'#');
            }

            let id = node.id.as_ref();
            if id.iter().all(|&ch| chars::is_identifier(ch)) {
                self.out.extend_from_slice(id);
            } else {
                self.write_string(id);
            }

            for value in &node.data {
                self.write_data(value.as_ref(), depth - 1);
            }
            self.out.push(b'\n');
        }

        for child in &node.children {
            self.write_node(child, depth + 1);
        }

        if depth > 0 && !node.children.is_empty() {
            self.write_indent(depth - 1);
            self.out.extend_from_slice(b"#\n");
        }
    }

    fn write_data(&mut self, value: &[u8], depth: usize) {
        self.out.push(b' ');
        match self.classify_data(value) {
            ValueKind::Identifier => self.out.extend_from_slice(value),
            ValueKind::Str => self.write_string(value),
            ValueKind::Block => self.write_block(value, depth),
            ValueKind::BlockBase64 => self.write_base64(value, depth),
        }
    }

    /// Picks the representation for a data value: base64 when the scanned
    /// prefix holds a binary byte, a block for anything at or above the
    /// block threshold, a bare identifier when every byte allows it, and a
    /// quoted string otherwise.
    fn classify_data(&self, value: &[u8]) -> ValueKind {
        if value.is_empty() {
            return ValueKind::Str;
        }

        let check = value
            .len()
            .min(self.options.binary_check_limit.max(self.options.block_threshold));
        let mut identifier = true;
        for &ch in &value[..check] {
            if !chars::is_identifier(ch) {
                identifier = false;
            }
            if chars::is_binary(ch) {
                return ValueKind::BlockBase64;
            }
        }

        if value.len() >= self.options.block_threshold {
            ValueKind::Block
        } else if identifier {
            ValueKind::Identifier
        } else {
            ValueKind::Str
        }
    }

    fn write_string(&mut self, value: &[u8]) {
        self.out.push(b'"');
        for &ch in value {
            if ch == b'\\' {
                self.out.extend_from_slice(b"\\\\");
            } else if ch == b'"' {
                self.out.extend_from_slice(b"\\\"");
            } else if chars::is_newline(ch) {
                self.out.push(b'\\');
                self.out.push(chars::escape_letter(ch));
            } else {
                self.out.push(ch);
            }
        }
        self.out.push(b'"');
    }

    fn write_block(&mut self, value: &[u8], depth: usize) {
        self.out.extend_from_slice(b"{\n");
        if !value.is_empty() {
            self.write_indent(depth + 1);
            for (i, &ch) in value.iter().enumerate() {
                if i == 0 && chars::is_whitespace(ch) {
                    // Escaped, or it would be eaten as indentation.
                    self.out.push(b'\\');
                    self.out.push(ch);
                } else if ch == b'\\' {
                    self.out.extend_from_slice(b"\\\\");
                } else if ch == b'\n' {
                    self.out.push(b'\n');
                    self.write_indent(depth + 1);
                } else if ch == b'\r' {
                    self.out.push(b'\\');
                    self.out.push(chars::escape_letter(ch));
                } else {
                    self.out.push(ch);
                }
            }
            self.out.push(b'\n');
        }
        self.write_indent(depth);
        self.out.push(b'}');
    }

    fn write_base64(&mut self, value: &[u8], depth: usize) {
        self.out.extend_from_slice(b"{ base64\n");
        if !value.is_empty() {
            self.write_indent(depth + 1);

            let aligned = value.len() - value.len() % 3;
            let mut line_chars = 0;
            let mut i = 0;
            while i < aligned {
                let group = base64::encode_group(&value[i..i + 3]);
                self.out.extend_from_slice(&group);
                line_chars += 4;

                if line_chars >= self.options.base64_line_width && i + 1 < aligned {
                    self.out.push(b'\n');
                    self.write_indent(depth + 1);
                    line_chars = 0;
                }
                i += 3;
            }

            if value.len() % 3 != 0 {
                let group = base64::encode_group(&value[aligned..]);
                self.out.extend_from_slice(&group);
            }
            self.out.push(b'\n');
        }
        self.write_indent(depth);
        self.out.push(b'}');
    }

    fn write_indent(&mut self, depth: usize) {
        let count = self.options.indent_width * depth;
        self.out.resize(self.out.len() + count, self.indent_byte);
    }
}
