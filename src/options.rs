//! Parsing and writing configuration.
//!
//! This module provides the two option structs:
//!
//! - [`ParseOptions`]: safety limits applied while parsing
//! - [`WriteOptions`]: formatting choices applied while writing
//!
//! Both follow the builder pattern and have sensible defaults, so most
//! callers never touch them and use the plain [`parse`](crate::parse) /
//! [`to_vec`](crate::to_vec) entry points instead.
//!
//! ## Examples
//!
//! ```rust
//! use sprig::{Indentation, ParseOptions, WriteOptions};
//!
//! // Stop reporting after the first error, cap nesting at 64 levels.
//! let parse_options = ParseOptions::new()
//!     .with_error_limit(1)
//!     .with_recursion_limit(64);
//! let doc = sprig::parse_with_options(b"Key value", parse_options, |_| {});
//!
//! // Four-space indentation instead of tabs.
//! let write_options = WriteOptions::new()
//!     .with_indentation(Indentation::Spaces)
//!     .with_indent_width(4);
//! let text = sprig::to_vec_with_options(&doc, write_options);
//! assert_eq!(text, b"Key value\n");
//! ```

/// The default maximum nesting depth for `#`-nested nodes. Deeper nodes
/// are reported and skipped, which keeps hostile input from exhausting the
/// stack.
pub const DEFAULT_RECURSION_LIMIT: usize = 2000;

/// The default number of errors reported before the sink goes quiet.
pub const DEFAULT_ERROR_LIMIT: usize = 10;

/// Safety limits applied while parsing.
///
/// # Examples
///
/// ```rust
/// use sprig::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert_eq!(options.recursion_limit, sprig::DEFAULT_RECURSION_LIMIT);
/// assert_eq!(options.error_limit, sprig::DEFAULT_ERROR_LIMIT);
/// ```
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Maximum nesting depth; subtrees beyond it are reported and skipped.
    pub recursion_limit: usize,
    /// Number of errors delivered to the sink before further errors are
    /// silently dropped.
    pub error_limit: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            error_limit: DEFAULT_ERROR_LIMIT,
        }
    }
}

impl ParseOptions {
    /// Creates the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Sets the number of errors reported before the sink goes quiet.
    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }
}

/// The character used for indentation in writer output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Indentation {
    /// Indent with tab characters.
    #[default]
    Tabs,
    /// Indent with spaces.
    Spaces,
}

impl Indentation {
    /// Returns the byte this indentation kind emits.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Indentation::Tabs => b'\t',
            Indentation::Spaces => b' ',
        }
    }
}

/// Formatting choices applied while writing a document.
///
/// # Examples
///
/// ```rust
/// use sprig::{Indentation, WriteOptions};
///
/// let options = WriteOptions::new()
///     .with_indentation(Indentation::Spaces)
///     .with_indent_width(2)
///     .with_block_threshold(256)
///     .with_base64_line_width(76);
/// ```
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Whether to indent with tabs or spaces.
    pub indentation: Indentation,
    /// Indentation characters emitted per nesting level.
    pub indent_width: usize,
    /// Values at least this long are always written as blocks.
    pub block_threshold: usize,
    /// How many leading bytes to scan for binary content. A value with any
    /// binary byte in the scanned prefix is written as a base64 block. The
    /// scan always covers at least `block_threshold` bytes.
    pub binary_check_limit: usize,
    /// Base64 characters per line, rounded up to a multiple of four. Zero
    /// folds after every group.
    pub base64_line_width: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            indentation: Indentation::Tabs,
            indent_width: 1,
            block_threshold: 128,
            binary_check_limit: usize::MAX,
            base64_line_width: 60,
        }
    }
}

impl WriteOptions {
    /// Creates the default formatting: tab indentation, one character per
    /// level, 128-byte block threshold, full binary scan, 60-character
    /// base64 lines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation character.
    #[must_use]
    pub fn with_indentation(mut self, indentation: Indentation) -> Self {
        self.indentation = indentation;
        self
    }

    /// Sets the number of indentation characters per nesting level.
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Sets the length at which values are forced into block form.
    #[must_use]
    pub fn with_block_threshold(mut self, threshold: usize) -> Self {
        self.block_threshold = threshold;
        self
    }

    /// Sets how many leading bytes are scanned for binary content.
    #[must_use]
    pub fn with_binary_check_limit(mut self, limit: usize) -> Self {
        self.binary_check_limit = limit;
        self
    }

    /// Sets the base64 line width.
    #[must_use]
    pub fn with_base64_line_width(mut self, width: usize) -> Self {
        self.base64_line_width = width;
        self
    }
}
