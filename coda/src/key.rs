//! Keys and paths used to address fields and report where a failure happened.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Identifies a field within a keyed or unkeyed container.
///
/// Every key has a string form; keys that logically represent a sequence
/// index (or an integer-valued map key) additionally carry an integer form.
/// Keys are constructed per access, immutable, and cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodingKey {
    name: Cow<'static, str>,
    index: Option<usize>,
}

impl CodingKey {
    /// The conventional key used by `super_encoder()`/`super_decoder()` on
    /// keyed containers.
    pub const SUPER: CodingKey = CodingKey {
        name: Cow::Borrowed("super"),
        index: None,
    };

    /// A key addressing a named field.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        CodingKey {
            name: name.into(),
            index: None,
        }
    }

    /// A synthetic key addressing a sequence element by position.
    ///
    /// Always valid for any index. Renders as `[index]` in a [`CodingPath`].
    pub fn index(index: usize) -> Self {
        CodingKey {
            name: Cow::Owned(format!("Index {index}")),
            index: Some(index),
        }
    }

    /// Attach an integer form to a named key (e.g. an integer-valued map key
    /// whose canonical spelling is its decimal string).
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// The string form of this key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The integer form of this key, when one exists.
    pub fn int_value(&self) -> Option<usize> {
        self.index
    }

    /// Whether this is a synthetic sequence-index key built by
    /// [`CodingKey::index`].
    pub fn is_index(&self) -> bool {
        match self.index {
            Some(index) => self.name == format!("Index {index}"),
            None => false,
        }
    }
}

impl fmt::Display for CodingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&'static str> for CodingKey {
    fn from(name: &'static str) -> Self {
        CodingKey::new(name)
    }
}

impl From<String> for CodingKey {
    fn from(name: String) -> Self {
        CodingKey::new(name)
    }
}

impl From<usize> for CodingKey {
    fn from(index: usize) -> Self {
        CodingKey::index(index)
    }
}

/// The nesting chain from the document root to the current value.
///
/// Grows when entering a nested container or value, shrinks on leaving
/// scope. Used exclusively for diagnostics — never for lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodingPath {
    keys: Vec<CodingKey>,
}

impl CodingPath {
    /// An empty path (the document root).
    pub const fn root() -> Self {
        CodingPath { keys: Vec::new() }
    }

    /// Append a key in place.
    pub fn push(&mut self, key: CodingKey) {
        self.keys.push(key);
    }

    /// Remove and return the last key.
    pub fn pop(&mut self) -> Option<CodingKey> {
        self.keys.pop()
    }

    /// The key closest to the current value.
    pub fn last(&self) -> Option<&CodingKey> {
        self.keys.last()
    }

    /// A copy of this path with `key` appended.
    ///
    /// Containers hand a child path to every nested container and error they
    /// produce; the copy discipline keeps parents untouched by children.
    pub fn child(&self, key: &CodingKey) -> Self {
        let mut keys = Vec::with_capacity(self.keys.len() + 1);
        keys.extend_from_slice(&self.keys);
        keys.push(key.clone());
        CodingPath { keys }
    }

    /// The keys in root-to-leaf order.
    pub fn keys(&self) -> &[CodingKey] {
        &self.keys
    }

    /// Number of keys in the path.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the path is at the document root.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<Vec<CodingKey>> for CodingPath {
    fn from(keys: Vec<CodingKey>) -> Self {
        CodingPath { keys }
    }
}

impl fmt::Display for CodingPath {
    /// Renders like `outer.items[3].name`, or `<root>` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return f.write_str("<root>");
        }
        for (position, key) in self.keys.iter().enumerate() {
            if key.is_index() {
                write!(f, "[{}]", key.int_value().unwrap_or(0))?;
            } else if position == 0 {
                f.write_str(key.name())?;
            } else {
                write!(f, ".{}", key.name())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn index_keys_have_both_forms() {
        let key = CodingKey::index(3);
        assert_eq!(key.name(), "Index 3");
        assert_eq!(key.int_value(), Some(3));
        assert!(key.is_index());
    }

    #[test]
    fn named_keys_are_not_indices() {
        assert!(!CodingKey::new("items").is_index());
        // An attached integer form alone does not make a key an index key.
        assert!(!CodingKey::new("7").with_index(7).is_index());
    }

    #[test]
    fn path_renders_dotted_names_and_bracketed_indices() {
        let mut path = CodingPath::root();
        assert_eq!(path.to_string(), "<root>");
        path.push(CodingKey::new("a"));
        path.push(CodingKey::new("b"));
        path.push(CodingKey::index(1));
        assert_eq!(path.to_string(), "a.b[1]");
        path.push(CodingKey::new("name"));
        assert_eq!(path.to_string(), "a.b[1].name");
    }

    #[test]
    fn child_copies_instead_of_sharing() {
        let parent = CodingPath::root().child(&CodingKey::new("a"));
        let child = parent.child(&CodingKey::index(0));
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.last(), Some(&CodingKey::index(0)));
    }
}
