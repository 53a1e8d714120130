//! tagmap is the small sorted map that carries a measurement's tags and
//! fields. Think of it as a specialized hashmap. Measurements rarely have more
//! than a handful of entries, so a sorted vector searched by bisection beats
//! hashing, and iteration comes out in key order for free.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Borrow;
use std::cmp;
use std::slice::Iter;

/// The tagmap key, value collection. Behaves similarly to
/// `std::collections::BTreeMap` but with a specialized implementation for
/// fast searching over a small collection.
#[derive(Clone, Debug, PartialEq)]
pub struct TagMap<K, V> {
    inner: Vec<(K, V)>,
}

impl<'a, K, V> IntoIterator for &'a TagMap<K, V> {
    type Item = &'a (K, V);
    type IntoIter = Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K, V> TagMap<K, V>
where
    K: cmp::Ord,
{
    /// Create a `tagmap::Iter`. Entries come out in key order.
    pub fn iter(&self) -> Iter<(K, V)> {
        self.inner.iter()
    }

    /// Get a value from the tagmap, if it exists.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: cmp::Ord,
    {
        match self.inner.binary_search_by(|entry| entry.0.borrow().cmp(key)) {
            Ok(idx) => Some(&self.inner[idx].1),
            Err(_) => None,
        }
    }

    /// Determine if the tagmap is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Insert a key / value into self
    ///
    /// This method will return the value previously stored under the given key,
    /// if there was such a value.
    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        match self.inner.binary_search_by(|entry| entry.0.cmp(&key)) {
            Ok(idx) => {
                self.inner.push((key, val));
                let old = self.inner.swap_remove(idx);
                Some(old.1)
            }
            Err(idx) => {
                self.inner.insert(idx, (key, val));
                None
            }
        }
    }

    /// Return the length of the tagmap. This is the total number of key /
    /// values stored in the map.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> Default for TagMap<K, V> {
    fn default() -> TagMap<K, V> {
        TagMap {
            inner: Vec::with_capacity(8),
        }
    }
}

impl<K, V> Serialize for TagMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for &(ref k, ref v) in &self.inner {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::{QuickCheck, TestResult};

    #[test]
    fn insert_replaces_existing_key() {
        let mut tags: TagMap<String, String> = TagMap::default();
        assert_eq!(None, tags.insert("host".into(), "a".into()));
        assert_eq!(Some("a".to_string()), tags.insert("host".into(), "b".into()));
        assert_eq!(1, tags.len());
        assert_eq!(Some(&"b".to_string()), tags.get("host"));
    }

    #[test]
    fn iteration_is_key_ordered() {
        fn inner(pairs: Vec<(u16, u16)>) -> TestResult {
            let mut tags = TagMap::default();
            for (k, v) in pairs {
                tags.insert(k, v);
            }
            let keys: Vec<u16> = tags.iter().map(|&(k, _)| k).collect();
            let mut sorted = keys.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(keys, sorted);
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .quickcheck(inner as fn(Vec<(u16, u16)>) -> TestResult);
    }

    #[test]
    fn serializes_as_map() {
        let mut tags: TagMap<String, String> = TagMap::default();
        tags.insert("zone".into(), "b".into());
        tags.insert("host".into(), "a".into());
        let json = ::serde_json::to_string(&tags).unwrap();
        assert_eq!(r#"{"host":"a","zone":"b"}"#, json);
    }
}
