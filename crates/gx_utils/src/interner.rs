use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::Hash;

use crate::hash::HashMap;

// -----------------------------------------------------------------------------
// Interner

/// Assigns small sequential ids to keys in the order they are first seen.
///
/// Ids start at `0` and never change for the lifetime of the interner,
/// until [`clear`](Interner::clear) is called.
///
/// # Examples
///
/// ```
/// use gx_utils::Interner;
///
/// let mut types = Interner::new();
/// assert_eq!(types.intern("a"), 0);
/// assert_eq!(types.intern("b"), 1);
/// assert_eq!(types.intern("a"), 0);
///
/// let order: Vec<_> = types.iter().collect();
/// assert_eq!(order, [(0, &"a"), (1, &"b")]);
/// ```
#[derive(Debug, Clone)]
pub struct Interner<K> {
    ids: HashMap<K, u32>,
    keys: Vec<K>,
}

impl<K> Default for Interner<K> {
    #[inline]
    fn default() -> Self {
        Self {
            ids: HashMap::default(),
            keys: Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> Interner<K> {
    /// Creates an empty interner.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `key`, assigning the next free id if it is new.
    pub fn intern(&mut self, key: K) -> u32 {
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = self.keys.len() as u32;
        self.keys.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    /// Returns the id of `key` if it has been interned.
    pub fn get<Q>(&self, key: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.get(key).copied()
    }

    /// Returns the key with the given id.
    #[inline]
    pub fn resolve(&self, id: u32) -> Option<&K> {
        self.keys.get(id as usize)
    }

    /// Iterates `(id, key)` pairs in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u32, &K)> {
        self.keys.iter().enumerate().map(|(id, key)| (id as u32, key))
    }

    /// Number of interned keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if nothing has been interned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Forgets every key, keeping allocations.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Interner;
    use alloc::string::String;

    #[test]
    fn first_seen_order() {
        let mut interner = Interner::<String>::new();
        assert_eq!(interner.intern("b".into()), 0);
        assert_eq!(interner.intern("a".into()), 1);
        assert_eq!(interner.intern("b".into()), 0);
        assert_eq!(interner.get("a"), Some(1));
        assert_eq!(interner.resolve(0).map(String::as_str), Some("b"));
        assert_eq!(interner.len(), 2);

        interner.clear();
        assert!(interner.is_empty());
        assert_eq!(interner.intern("a".into()), 0);
    }
}
