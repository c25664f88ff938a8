use std::collections::{btree_map::Entry, BTreeMap};

use super::{HeaderName, HeaderValue};

/// A set of message headers
///
/// [`HeaderMap`] is a multimap of [`HeaderName`]. Values stored under the
/// same name keep their insertion order. Names are compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    headers: BTreeMap<HeaderName, Vec<HeaderValue>>,
}

impl HeaderMap {
    /// Create an empty `HeaderMap`
    ///
    /// This function will not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headers: BTreeMap::new(),
        }
    }

    /// Set `name` to `value`, dropping any previous value
    pub fn insert(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, vec![value]);
    }

    /// Add `value` after any value already stored for `name`
    pub fn append(&mut self, name: HeaderName, value: HeaderValue) {
        match self.headers.entry(name) {
            Entry::Vacant(vacant) => {
                vacant.insert(vec![value]);
            }
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().push(value);
            }
        }
    }

    pub fn remove(&mut self, name: &HeaderName) {
        self.headers.remove(name);
    }

    /// Returns the first value stored for `name`
    #[must_use]
    pub fn get(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.get_all(name).first()
    }

    /// Returns every value stored for `name`, in insertion order
    #[must_use]
    pub fn get_all(&self, name: &HeaderName) -> &[HeaderValue] {
        self.headers.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, name: &HeaderName) -> bool {
        self.headers.contains_key(name)
    }

    /// Returns the number of keys stored in the map
    ///
    /// This number will be less than or equal to [`HeaderMap::len`].
    #[must_use]
    pub fn keys_len(&self) -> usize {
        self.headers.len()
    }

    /// Returns the number of values stored in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.values().map(Vec::len).sum()
    }

    /// Returns true if the map contains no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn clear(&mut self) {
        self.headers.clear();
    }

    /// Iterate over every name together with its values
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&'_ HeaderName, &'_ [HeaderValue])> {
        self.headers
            .iter()
            .map(|(name, values)| (name, values.as_slice()))
    }
}

impl FromIterator<(HeaderName, HeaderValue)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (HeaderName, HeaderValue)>>(iter: I) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

impl Extend<(HeaderName, HeaderValue)> for HeaderMap {
    fn extend<T: IntoIterator<Item = (HeaderName, HeaderValue)>>(&mut self, iter: T) {
        iter.into_iter().for_each(|(name, value)| {
            self.append(name, value);
        });
    }
}
