//! Side-channel context threaded through an encode or decode pass.

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

/// Identifies an entry in a [`UserInfo`] map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserInfoKey(Cow<'static, str>);

impl UserInfoKey {
    /// A key with the given name.
    pub const fn new(name: &'static str) -> Self {
        UserInfoKey(Cow::Borrowed(name))
    }

    /// The key's name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for UserInfoKey {
    fn from(name: &'static str) -> Self {
        UserInfoKey::new(name)
    }
}

/// Arbitrary contextual values made available to every container during a
/// single encode or decode pass.
///
/// Populated on the root encoder/decoder before the pass starts and
/// read-only during traversal. Values are stored type-erased and retrieved
/// with a typed [`get`](UserInfo::get).
#[derive(Clone, Default)]
pub struct UserInfo {
    entries: BTreeMap<UserInfoKey, Arc<dyn Any + Send + Sync>>,
}

impl UserInfo {
    /// An empty context map.
    pub fn new() -> Self {
        UserInfo::default()
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<UserInfoKey>, value: T) {
        self.entries.insert(key.into(), Arc::new(value));
    }

    /// Retrieve the entry under `key`, if present and of type `T`.
    pub fn get<T: Any>(&self, key: &UserInfoKey) -> Option<&T> {
        self.entries.get(key)?.downcast_ref()
    }

    /// Whether an entry exists under `key`.
    pub fn contains(&self, key: &UserInfoKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are type-erased; only the keys are printable.
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: UserInfoKey = UserInfoKey::new("limit");

    #[test]
    fn typed_round_trip() {
        let mut info = UserInfo::new();
        info.insert(LIMIT, 32usize);
        assert_eq!(info.get::<usize>(&LIMIT), Some(&32));
        // Wrong type yields nothing rather than a panic.
        assert_eq!(info.get::<i32>(&LIMIT), None);
        assert_eq!(info.get::<usize>(&UserInfoKey::new("missing")), None);
    }

    #[test]
    fn clone_shares_entries() {
        let mut info = UserInfo::new();
        info.insert("name", alloc::string::String::from("coda"));
        let copy = info.clone();
        assert!(copy.contains(&UserInfoKey::new("name")));
        assert_eq!(copy.len(), 1);
    }
}
