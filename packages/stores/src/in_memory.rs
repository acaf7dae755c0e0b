//! In-memory store keyed by full, normalized key strings.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use pathkv_core::{key, Bytes, Context, Error, Listing, Reader, Result, Store};

/// A memory-backed store, notably useful for caching and generated data.
///
/// Keys are stored flat; `list` synthesizes directories by scanning every
/// key for the requested prefix. That makes `list` linear in the number of
/// stored keys in exchange for trivial `read`/`write`/`delete`.
///
/// One mutex guards the whole map, so operations on one instance never
/// overlap. Values are `Bytes` and are shared with callers, not copied.
///
/// # Example
///
/// ```rust
/// use pathkv_core::{Bytes, Context, Reader, Store};
/// use pathkv_stores::InMemoryStore;
///
/// let ctx = Context::background();
/// let store = InMemoryStore::new();
///
/// store.write(&ctx, "users/alice", Bytes::from_static(b"Alice")).unwrap();
/// assert_eq!(store.read(&ctx, "users/alice").unwrap(), Bytes::from_static(b"Alice"));
/// assert_eq!(store.list(&ctx, "").unwrap().dirs, vec!["users".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    content: Mutex<HashMap<String, Bytes>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.content().len()
    }

    /// Whether no values are stored.
    pub fn is_empty(&self) -> bool {
        self.content().is_empty()
    }

    // The map has no multi-step invariants, so a poisoned lock is still usable.
    fn content(&self) -> MutexGuard<'_, HashMap<String, Bytes>> {
        self.content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Children of `prefix` among `keys`, mapped to whether each is a directory.
///
/// `prefix` must be empty or end with the separator.
fn children<'a>(keys: impl Iterator<Item = &'a str>, prefix: &str) -> BTreeMap<&'a str, bool> {
    let mut subkeys: BTreeMap<&str, bool> = BTreeMap::new();
    for k in keys {
        let Some(child) = k.strip_prefix(prefix) else {
            continue;
        };

        match child.split_once(key::SEPARATOR) {
            Some((dir, _)) => {
                subkeys.insert(dir, true);
            }
            None => {
                // A name seen as a directory anywhere stays a directory.
                subkeys.entry(child).or_insert(false);
            }
        }
    }
    subkeys
}

impl Reader for InMemoryStore {
    fn list(&self, ctx: &Context, key: &str) -> Result<Listing> {
        ctx.check()?;

        let mut prefix = key::normalize(key);
        if !prefix.is_empty() {
            prefix.push(key::SEPARATOR);
        }

        let content = self.content();
        let subkeys = children(content.keys().map(String::as_str), &prefix);
        if subkeys.is_empty() {
            return Err(Error::KeyNotFound);
        }

        // BTreeMap iteration keeps both partitions sorted.
        let mut listing = Listing::default();
        for (name, is_dir) in subkeys {
            if is_dir {
                listing.dirs.push(name.to_string());
            } else {
                listing.blobs.push(name.to_string());
            }
        }
        Ok(listing)
    }

    fn read(&self, ctx: &Context, key: &str) -> Result<Bytes> {
        ctx.check()?;

        self.content()
            .get(&key::normalize(key))
            .cloned()
            .ok_or(Error::KeyNotFound)
    }
}

impl Store for InMemoryStore {
    fn write(&self, ctx: &Context, key: &str, value: Bytes) -> Result<()> {
        ctx.check()?;

        let normalized = key::normalize(key);
        if normalized.is_empty() {
            return Err(Error::InvalidKey {
                key: key.to_string(),
            });
        }
        self.content().insert(normalized, value);
        Ok(())
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        ctx.check()?;

        self.content().remove(&key::normalize(key));
        Ok(())
    }
}
