//! Chained hash index with load-factor driven growth.
//!
//! [`AssociativeIndex`] backs the street map's coordinate lookup and the
//! per-search bookkeeping of the router. Buckets are chains of entries; a
//! key lives in bucket `hash(key) % bucket_count`. Whenever an insert pushes
//! `len / bucket_count` above the configured maximum, the bucket array
//! doubles and every entry is moved into its new bucket.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::mem;

use rustc_hash::FxBuildHasher;
use thiserror::Error;

/// Bucket count of a new or reset index.
pub const MIN_BUCKETS: usize = 8;

/// Load factor above which the bucket array doubles.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.5;

/// Errors returned by [`AssociativeIndex::with_max_load_factor`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LoadFactorError {
    /// The maximum load factor must be finite and strictly positive.
    #[error("maximum load factor must be finite and positive, got {0}")]
    OutOfRange(f64),
}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Generic key to value map using separate chaining.
///
/// Keys are unique: associating an existing key replaces its value. There is
/// no removal; [`AssociativeIndex::reset`] clears everything.
///
/// # Examples
/// ```
/// use courier_core::AssociativeIndex;
///
/// let mut index = AssociativeIndex::new();
/// index.associate("depot", 1);
/// index.associate("depot", 2);
/// assert_eq!(index.len(), 1);
/// assert_eq!(index.find("depot"), Some(&2));
///
/// if let Some(value) = index.find_mut("depot") {
///     *value += 1;
/// }
/// assert_eq!(index.find("depot"), Some(&3));
/// assert_eq!(index.find("missing"), None);
/// ```
#[derive(Clone)]
pub struct AssociativeIndex<K, V, S = FxBuildHasher> {
    buckets: Vec<Vec<Entry<K, V>>>,
    len: usize,
    max_load_factor: f64,
    hasher: S,
}

impl<K, V> AssociativeIndex<K, V> {
    /// Create an empty index with [`MIN_BUCKETS`] buckets and the default
    /// maximum load factor.
    pub fn new() -> Self {
        Self::with_hasher(FxBuildHasher)
    }

    /// Create an empty index that grows once `len / buckets` exceeds
    /// `max_load_factor`.
    pub fn with_max_load_factor(max_load_factor: f64) -> Result<Self, LoadFactorError> {
        Self::with_max_load_factor_and_hasher(max_load_factor, FxBuildHasher)
    }
}

// `FxBuildHasher` has no `Debug`, so only the associations are shown.
impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for AssociativeIndex<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for AssociativeIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> AssociativeIndex<K, V, S> {
    /// Create an empty index hashing keys with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            buckets: empty_buckets(MIN_BUCKETS),
            len: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hasher,
        }
    }

    /// Create an empty index with both a custom load factor and hasher.
    pub fn with_max_load_factor_and_hasher(
        max_load_factor: f64,
        hasher: S,
    ) -> Result<Self, LoadFactorError> {
        if !(max_load_factor.is_finite() && max_load_factor > 0.0) {
            return Err(LoadFactorError::OutOfRange(max_load_factor));
        }
        Ok(Self {
            max_load_factor,
            ..Self::with_hasher(hasher)
        })
    }

    /// Number of associations.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no associations.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Configured maximum load factor.
    pub const fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Remove every association and shrink back to [`MIN_BUCKETS`] buckets.
    pub fn reset(&mut self) {
        self.buckets = empty_buckets(MIN_BUCKETS);
        self.len = 0;
    }

    /// Iterate over every `(key, value)` pair in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flatten()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Iterate over every key in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    fn exceeds_load_factor(&self) -> bool {
        let load = self.len as f64 / self.buckets.len() as f64;
        load > self.max_load_factor
    }
}

impl<K, V, S> AssociativeIndex<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Associate `value` with `key`.
    ///
    /// Returns the previous value when `key` was already present; in that
    /// case the size does not change and no growth is triggered.
    pub fn associate(&mut self, key: K, value: V) -> Option<V> {
        if let Some(existing) = self.find_mut(&key) {
            return Some(mem::replace(existing, value));
        }
        self.insert_new(key, value);
        None
    }

    /// Return the value for `key`, inserting `make()` first if it is absent.
    pub fn find_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        let bucket = self.bucket_of(&key);
        let existing = self.buckets[bucket]
            .iter()
            .position(|entry| entry.key == key);
        let (bucket, position) = match existing {
            Some(position) => (bucket, position),
            None => self.insert_new(key, make()),
        };
        &mut self.buckets[bucket][position].value
    }

    /// Look up the value associated with `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_of(key);
        self.buckets
            .get(bucket)?
            .iter()
            .find(|entry| entry.key.borrow() == key)
            .map(|entry| &entry.value)
    }

    /// Look up the value associated with `key` for in-place modification.
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_of(key);
        self.buckets
            .get_mut(bucket)?
            .iter_mut()
            .find(|entry| entry.key.borrow() == key)
            .map(|entry| &mut entry.value)
    }

    /// Whether `key` has an association.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    fn bucket_of<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        bucket_index(self.hasher.hash_one(key), self.buckets.len())
    }

    /// Insert a key known to be absent and return its `(bucket, position)`.
    ///
    /// Growth happens when the new entry would push the load factor above
    /// the maximum, so the entry lands directly in its final bucket.
    fn insert_new(&mut self, key: K, value: V) -> (usize, usize) {
        self.len += 1;
        if self.exceeds_load_factor() {
            self.grow();
        }
        let bucket = self.bucket_of(&key);
        let chain = &mut self.buckets[bucket];
        chain.push(Entry { key, value });
        (bucket, chain.len() - 1)
    }

    /// Double the bucket array and move every entry into its new bucket.
    fn grow(&mut self) {
        let doubled = self.buckets.len().saturating_mul(2);
        let old = mem::replace(&mut self.buckets, empty_buckets(doubled));
        for entry in old.into_iter().flatten() {
            let bucket = self.bucket_of(&entry.key);
            self.buckets[bucket].push(entry);
        }
    }
}

impl<K, V, S> Extend<(K, V)> for AssociativeIndex<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.associate(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for AssociativeIndex<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

fn empty_buckets<K, V>(count: usize) -> Vec<Vec<Entry<K, V>>> {
    std::iter::repeat_with(Vec::new).take(count).collect()
}

// The remainder is below `bucket_count`, so narrowing back cannot truncate.
fn bucket_index(hash: u64, bucket_count: usize) -> usize {
    (hash % bucket_count as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::hash::{BuildHasherDefault, Hasher};

    /// Sends every key to the same bucket.
    #[derive(Default)]
    struct CollidingHasher;

    impl Hasher for CollidingHasher {
        fn finish(&self) -> u64 {
            7
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    #[fixture]
    fn index() -> AssociativeIndex<u32, String> {
        AssociativeIndex::new()
    }

    #[rstest]
    fn starts_empty_with_minimum_buckets(index: AssociativeIndex<u32, String>) {
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), MIN_BUCKETS);
        assert_eq!(index.find(&1), None);
    }

    #[rstest]
    fn debug_lists_associations(mut index: AssociativeIndex<u32, String>) {
        index.associate(3, "tofu".into());
        assert_eq!(format!("{index:?}"), r#"{3: "tofu"}"#);
    }

    #[rstest]
    fn overwrite_keeps_size(mut index: AssociativeIndex<u32, String>) {
        assert_eq!(index.associate(1, "a".into()), None);
        assert_eq!(index.associate(1, "b".into()), Some("a".into()));
        assert_eq!(index.len(), 1);
        assert_eq!(index.find(&1).map(String::as_str), Some("b"));
    }

    #[rstest]
    fn grows_when_load_factor_exceeded(mut index: AssociativeIndex<u32, String>) {
        for key in 0..4 {
            index.associate(key, key.to_string());
        }
        // 4 / 8 is exactly the limit, not above it.
        assert_eq!(index.bucket_count(), 8);
        index.associate(4, "4".into());
        assert_eq!(index.bucket_count(), 16);
        for key in 5..9 {
            index.associate(key, key.to_string());
        }
        assert_eq!(index.bucket_count(), 32);
        for key in 0..9 {
            assert_eq!(index.find(&key), Some(&key.to_string()));
        }
    }

    #[rstest]
    fn overwrite_never_triggers_growth(mut index: AssociativeIndex<u32, String>) {
        for key in 0..4 {
            index.associate(key, String::new());
        }
        for _ in 0..10 {
            index.associate(3, "again".into());
        }
        assert_eq!(index.bucket_count(), 8);
        assert_eq!(index.len(), 4);
    }

    #[rstest]
    fn reset_returns_to_minimum(mut index: AssociativeIndex<u32, String>) {
        index.extend((0..100).map(|key| (key, String::new())));
        assert!(index.bucket_count() > MIN_BUCKETS);
        index.reset();
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), MIN_BUCKETS);
        assert_eq!(index.find(&42), None);
    }

    #[rstest]
    fn find_mut_edits_in_place(mut index: AssociativeIndex<u32, String>) {
        index.associate(9, "nine".into());
        if let Some(value) = index.find_mut(&9) {
            value.push('!');
        }
        assert_eq!(index.find(&9).map(String::as_str), Some("nine!"));
    }

    #[rstest]
    fn find_or_insert_with_only_builds_once(mut index: AssociativeIndex<u32, String>) {
        index.find_or_insert_with(1, || "first".into()).push('+');
        index.find_or_insert_with(1, || "second".into()).push('+');
        assert_eq!(index.find(&1).map(String::as_str), Some("first++"));
        assert_eq!(index.len(), 1);
    }

    #[rstest]
    fn find_or_insert_with_survives_growth(mut index: AssociativeIndex<u32, String>) {
        for key in 0..4 {
            index.associate(key, String::new());
        }
        *index.find_or_insert_with(4, String::new) = "grown".into();
        assert_eq!(index.bucket_count(), 16);
        assert_eq!(index.find(&4).map(String::as_str), Some("grown"));
    }

    #[rstest]
    fn colliding_keys_chain_in_one_bucket() {
        let mut index: AssociativeIndex<u32, u32, BuildHasherDefault<CollidingHasher>> =
            AssociativeIndex::with_hasher(BuildHasherDefault::default());
        for key in 0..50 {
            index.associate(key, key * 2);
        }
        index.associate(10, 0);
        assert_eq!(index.len(), 50);
        assert_eq!(index.find(&10), Some(&0));
        assert_eq!(index.find(&49), Some(&98));
        assert_eq!(index.iter().count(), 50);
    }

    #[rstest]
    fn borrowed_lookup_for_string_keys() {
        let mut index: AssociativeIndex<String, u8> = AssociativeIndex::new();
        index.associate("Westwood Blvd".to_owned(), 1);
        assert!(index.contains_key("Westwood Blvd"));
        assert_eq!(index.find("Gayley Ave"), None);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_load_factor(#[case] factor: f64) {
        let result = AssociativeIndex::<u8, u8>::with_max_load_factor(factor);
        assert!(matches!(result, Err(LoadFactorError::OutOfRange(_))));
    }

    #[rstest]
    fn custom_load_factor_delays_growth() {
        let mut index =
            AssociativeIndex::<u8, u8>::with_max_load_factor(2.0).expect("valid factor");
        for key in 0..16 {
            index.associate(key, key);
        }
        assert_eq!(index.bucket_count(), 8);
        index.associate(16, 16);
        assert_eq!(index.bucket_count(), 16);
    }
}
