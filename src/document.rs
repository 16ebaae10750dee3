//! The Sprig document tree.
//!
//! A document is a tree of nodes. Every node carries an identifier, an
//! ordered list of data values, and an ordered list of children; all three
//! are byte strings or containers of byte strings, since the format is
//! 8-bit clean and values may hold arbitrary binary data.
//!
//! Two storage variants share one shape through the generic [`Node`]:
//!
//! - [`Document`] owns its bytes and is independent of the parsed source.
//! - [`DocumentView`] borrows every byte string from the buffer it was
//!   parsed from; see [`parse_view`](crate::parse_view).
//!
//! Equality is structural, order-sensitive, and works across the two
//! variants, so an owned parse and a view parse of the same source compare
//! equal.
//!
//! ## Examples
//!
//! ```rust
//! let doc = sprig::parse(b"server localhost 8080 true");
//!
//! let server = doc.find("server").unwrap();
//! assert_eq!(server.data_at(0), Some(&b"localhost"[..]));
//! assert_eq!(server.int_at(1), Some(8080));
//! assert_eq!(server.bool_at(2), Some(true));
//! ```

use std::fmt;

/// A node in a Sprig document tree, generic over byte-string storage.
///
/// `D` is `Vec<u8>` in the owned [`Document`] variant and `&[u8]` in the
/// borrowed [`DocumentView`] variant. The root node of a parsed document
/// conventionally has an empty `id` and no `data`; only its `children`
/// carry content.
#[derive(Clone, Default)]
pub struct Node<D> {
    /// The identifier of this node. Normally empty for the root.
    pub id: D,
    /// The data values from the node's header line, in source order.
    pub data: Vec<D>,
    /// The nested children of this node, in source order.
    pub children: Vec<Node<D>>,
}

/// An owned document; every byte string has its own storage.
pub type Document = Node<Vec<u8>>;

/// A borrowed document; every byte string aliases the source buffer it was
/// parsed from, which must outlive the tree.
pub type DocumentView<'a> = Node<&'a [u8]>;

impl Document {
    /// Creates a node with the given identifier and no data or children.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sprig::Document;
    ///
    /// let node = Document::new("server");
    /// assert_eq!(node.id, b"server");
    /// assert!(node.data.is_empty());
    /// ```
    #[must_use]
    pub fn new(id: impl AsRef<[u8]>) -> Self {
        Document {
            id: id.as_ref().to_vec(),
            data: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Appends a data value to this node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sprig::Document;
    ///
    /// let mut node = Document::new("server");
    /// node.push_data("localhost");
    /// node.push_data("8080");
    ///
    /// let mut doc = Document::default();
    /// doc.push_child(node);
    /// assert_eq!(sprig::to_vec(&doc), b"server localhost 8080\n");
    /// ```
    pub fn push_data(&mut self, value: impl AsRef<[u8]>) {
        self.data.push(value.as_ref().to_vec());
    }

    /// Appends a child node.
    pub fn push_child(&mut self, child: Document) {
        self.children.push(child);
    }
}

impl<D: AsRef<[u8]>> Node<D> {
    /// Returns the first child whose id equals `key`, if any.
    ///
    /// Lookup is a linear scan with case-sensitive byte equality; repeated
    /// ids are allowed, and [`Node::children_by_id`] visits them all.
    pub fn find(&self, key: impl AsRef<[u8]>) -> Option<&Node<D>> {
        let key = key.as_ref();
        self.children.iter().find(|child| child.id.as_ref() == key)
    }

    /// Returns the last child whose id equals `key`, if any.
    pub fn find_last(&self, key: impl AsRef<[u8]>) -> Option<&Node<D>> {
        let key = key.as_ref();
        self.children.iter().rev().find(|child| child.id.as_ref() == key)
    }

    /// Iterates over the children whose id equals `key`, in document order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let doc = sprig::parse(b"item a\nother\nitem b");
    /// let values: Vec<_> = doc
    ///     .children_by_id("item")
    ///     .filter_map(|node| node.data_at(0))
    ///     .collect();
    /// assert_eq!(values, [b"a", b"b"]);
    /// ```
    pub fn children_by_id<'a, K>(&'a self, key: K) -> impl Iterator<Item = &'a Node<D>>
    where
        K: AsRef<[u8]> + 'a,
    {
        self.children
            .iter()
            .filter(move |child| child.id.as_ref() == key.as_ref())
    }

    /// Iterates over the children whose id equals `key`, last match first.
    pub fn children_by_id_rev<'a, K>(&'a self, key: K) -> impl Iterator<Item = &'a Node<D>>
    where
        K: AsRef<[u8]> + 'a,
    {
        self.children
            .iter()
            .rev()
            .filter(move |child| child.id.as_ref() == key.as_ref())
    }

    /// Returns the data value at `index`, if present.
    pub fn data_at(&self, index: usize) -> Option<&[u8]> {
        self.data.get(index).map(|value| value.as_ref())
    }

    /// Reads the data value at `index` as a boolean.
    ///
    /// Only the exact byte strings `true` and `false` qualify; anything
    /// else, including a missing value, yields `None`.
    pub fn bool_at(&self, index: usize) -> Option<bool> {
        self.data_at(index).and_then(parse_bool)
    }

    /// Reads the data value at `index` as a base-10 integer; see
    /// [`parse_integer`] for the accepted grammar.
    pub fn int_at(&self, index: usize) -> Option<i64> {
        self.data_at(index).and_then(parse_integer)
    }

    /// Appends clones of `other`'s data and children onto this node.
    pub fn merge_from(&mut self, other: &Node<D>)
    where
        D: Clone,
    {
        self.data.extend(other.data.iter().cloned());
        self.children.extend(other.children.iter().cloned());
    }

    /// Moves `other`'s data and children onto this node, leaving `other`
    /// with empty data and children.
    pub fn merge_take(&mut self, other: &mut Node<D>) {
        self.data.append(&mut other.data);
        self.children.append(&mut other.children);
    }
}

impl<A: AsRef<[u8]>, B: AsRef<[u8]>> PartialEq<Node<B>> for Node<A> {
    fn eq(&self, other: &Node<B>) -> bool {
        self.id.as_ref() == other.id.as_ref()
            && self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.as_ref() == b.as_ref())
            && self.children == other.children
    }
}

impl<A: AsRef<[u8]>> Eq for Node<A> {}

impl<D: AsRef<[u8]>> fmt::Debug for Node<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &String::from_utf8_lossy(self.id.as_ref()))
            .field(
                "data",
                &self
                    .data
                    .iter()
                    .map(|value| String::from_utf8_lossy(value.as_ref()))
                    .collect::<Vec<_>>(),
            )
            .field("children", &self.children)
            .finish()
    }
}

/// Interprets `value` as a boolean: exactly `true` or `false`.
///
/// # Examples
///
/// ```rust
/// assert_eq!(sprig::parse_bool(b"true"), Some(true));
/// assert_eq!(sprig::parse_bool(b"false"), Some(false));
/// assert_eq!(sprig::parse_bool(b"TRUE"), None);
/// assert_eq!(sprig::parse_bool(b""), None);
/// ```
#[must_use]
pub fn parse_bool(value: &[u8]) -> Option<bool> {
    match value {
        b"true" => Some(true),
        b"false" => Some(false),
        _ => None,
    }
}

/// Interprets `value` as a base-10 integer matching `[-+]?[0-9']*`.
///
/// `'` is skipped as a digit spacer, an empty value reads as zero, and any
/// other byte makes the whole value invalid. There is no overflow check;
/// out-of-range values wrap.
///
/// # Examples
///
/// ```rust
/// assert_eq!(sprig::parse_integer(b"-50"), Some(-50));
/// assert_eq!(sprig::parse_integer(b"1'000'000"), Some(1_000_000));
/// assert_eq!(sprig::parse_integer(b""), Some(0));
/// assert_eq!(sprig::parse_integer(b"12px"), None);
/// ```
#[must_use]
pub fn parse_integer(value: &[u8]) -> Option<i64> {
    let mut result: i64 = 0;
    let mut negative = false;
    for (i, &ch) in value.iter().enumerate() {
        match ch {
            b'-' if i == 0 => negative = true,
            b'+' if i == 0 => {}
            b'0'..=b'9' => {
                result = result
                    .wrapping_mul(10)
                    .wrapping_add(i64::from(ch - b'0'));
            }
            b'\'' => {}
            _ => return None,
        }
    }
    Some(if negative { result.wrapping_neg() } else { result })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_parsing_is_exact() {
        assert_eq!(parse_bool(b"true"), Some(true));
        assert_eq!(parse_bool(b"false"), Some(false));
        assert_eq!(parse_bool(b""), None);
        assert_eq!(parse_bool(b"truthy"), None);
    }

    #[test]
    fn integer_parsing() {
        assert_eq!(parse_integer(b""), Some(0));
        assert_eq!(parse_integer(b"-"), Some(0));
        assert_eq!(parse_integer(b"+"), Some(0));
        assert_eq!(parse_integer(b"+10"), Some(10));
        assert_eq!(parse_integer(b"-10"), Some(-10));
        assert_eq!(parse_integer(b"1'0"), Some(10));
        assert_eq!(parse_integer(b"error"), None);
        assert_eq!(parse_integer(b"10-"), None);
        assert_eq!(parse_integer(b"9223372036854775807"), Some(i64::MAX));
    }

    #[test]
    fn cross_variant_equality() {
        let mut owned = Document::new("Key");
        owned.push_data("value");

        let view: DocumentView<'_> = Node {
            id: b"Key".as_slice(),
            data: vec![b"value".as_slice()],
            children: Vec::new(),
        };

        assert_eq!(owned, view);
        assert_eq!(view, owned);
    }

    #[test]
    fn merge_take_drains_the_source() {
        let mut target = Document::new("");
        let mut source = Document::new("");
        source.push_data("one");
        source.push_child(Document::new("child"));

        target.merge_take(&mut source);

        assert!(source.data.is_empty());
        assert!(source.children.is_empty());
        assert_eq!(target.data.len(), 1);
        assert_eq!(target.children.len(), 1);
    }
}
