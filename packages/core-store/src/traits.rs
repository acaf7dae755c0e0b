//! Core traits: Reader, Store.

use std::sync::Arc;

use bytes::Bytes;

use crate::{Context, Result};

/// The immediate children of a key, one level down.
///
/// Names are bare segments, not full keys: join them onto the listed key to
/// address a child. Both lists are sorted and free of duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    /// Names that have further children below them.
    pub dirs: Vec<String>,
    /// Names that hold a value.
    pub blobs: Vec<String>,
}

impl Listing {
    pub fn new(dirs: Vec<String>, blobs: Vec<String>) -> Self {
        Self { dirs, blobs }
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.blobs.is_empty()
    }
}

/// Read and explore a key-value structure with an imposed `/`-directory
/// structure.
///
/// Implementations should use the most obvious layout and no extra metadata,
/// so that they can be laid over data created by hand or by other tools.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Reader>`.
pub trait Reader: Send + Sync {
    /// List the next level of blobs and imposed directories under `key`.
    ///
    /// If `key` has no children, implementations may return either an empty
    /// [`Listing`] or [`Error::KeyNotFound`](crate::Error::KeyNotFound).
    /// Callers must accept both.
    fn list(&self, ctx: &Context, key: &str) -> Result<Listing>;

    /// Read the value stored at `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(bytes)` - The exact bytes last written.
    /// * `Err(Error::KeyNotFound)` - No value is stored at `key`. A key that
    ///   only exists as a directory prefix of other keys is not present.
    /// * `Err(_)` - Any other failure.
    fn read(&self, ctx: &Context, key: &str) -> Result<Bytes>;
}

/// A simple key-value store with an imposed `/`-directory structure.
///
/// `Store` is a lowest common denominator and is not suitable for
/// transactional use. Implementations must be thread-safe.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Store>`.
pub trait Store: Reader {
    /// Set the value for `key`, creating any implied parent directories.
    fn write(&self, ctx: &Context, key: &str, value: Bytes) -> Result<()>;

    /// Delete the value at `key`. Deleting a key that is not present is not
    /// an error. Children of `key` are not touched.
    fn delete(&self, ctx: &Context, key: &str) -> Result<()>;
}

// Blanket implementations for references, boxes and shared pointers

impl<T: Reader + ?Sized> Reader for &T {
    fn list(&self, ctx: &Context, key: &str) -> Result<Listing> {
        (**self).list(ctx, key)
    }

    fn read(&self, ctx: &Context, key: &str) -> Result<Bytes> {
        (**self).read(ctx, key)
    }
}

impl<T: Store + ?Sized> Store for &T {
    fn write(&self, ctx: &Context, key: &str, value: Bytes) -> Result<()> {
        (**self).write(ctx, key, value)
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        (**self).delete(ctx, key)
    }
}

impl<T: Reader + ?Sized> Reader for Box<T> {
    fn list(&self, ctx: &Context, key: &str) -> Result<Listing> {
        self.as_ref().list(ctx, key)
    }

    fn read(&self, ctx: &Context, key: &str) -> Result<Bytes> {
        self.as_ref().read(ctx, key)
    }
}

impl<T: Store + ?Sized> Store for Box<T> {
    fn write(&self, ctx: &Context, key: &str, value: Bytes) -> Result<()> {
        self.as_ref().write(ctx, key, value)
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        self.as_ref().delete(ctx, key)
    }
}

impl<T: Reader + ?Sized> Reader for Arc<T> {
    fn list(&self, ctx: &Context, key: &str) -> Result<Listing> {
        self.as_ref().list(ctx, key)
    }

    fn read(&self, ctx: &Context, key: &str) -> Result<Bytes> {
        self.as_ref().read(ctx, key)
    }
}

impl<T: Store + ?Sized> Store for Arc<T> {
    fn write(&self, ctx: &Context, key: &str, value: Bytes) -> Result<()> {
        self.as_ref().write(ctx, key, value)
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        self.as_ref().delete(ctx, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Flat store that never lists anything.
    struct TestStore {
        data: Mutex<BTreeMap<String, Bytes>>,
    }

    impl TestStore {
        fn new() -> Self {
            Self {
                data: Mutex::new(BTreeMap::new()),
            }
        }
    }

    impl Reader for TestStore {
        fn list(&self, _ctx: &Context, _key: &str) -> Result<Listing> {
            Ok(Listing::default())
        }

        fn read(&self, _ctx: &Context, key: &str) -> Result<Bytes> {
            self.data
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or(Error::KeyNotFound)
        }
    }

    impl Store for TestStore {
        fn write(&self, _ctx: &Context, key: &str, value: Bytes) -> Result<()> {
            self.data.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        fn delete(&self, _ctx: &Context, key: &str) -> Result<()> {
            self.data.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[test]
    fn object_safety_works() {
        let ctx = Context::background();
        let store = TestStore::new();
        let dyn_store: &dyn Store = &store;

        dyn_store
            .write(&ctx, "test", Bytes::from_static(b"data"))
            .unwrap();
        assert_eq!(
            dyn_store.read(&ctx, "test").unwrap(),
            Bytes::from_static(b"data")
        );
    }

    #[test]
    fn box_dyn_works() {
        let ctx = Context::background();
        let boxed: Box<dyn Store> = Box::new(TestStore::new());

        boxed
            .write(&ctx, "dyn_test", Bytes::from_static(b"dyn_data"))
            .unwrap();
        assert_eq!(
            boxed.read(&ctx, "dyn_test").unwrap(),
            Bytes::from_static(b"dyn_data")
        );
    }

    #[test]
    fn arc_blanket_impl_works() {
        let ctx = Context::background();
        let shared = Arc::new(TestStore::new());
        let other = Arc::clone(&shared);

        shared
            .write(&ctx, "arc_test", Bytes::from_static(b"arc_data"))
            .unwrap();
        assert_eq!(
            other.read(&ctx, "arc_test").unwrap(),
            Bytes::from_static(b"arc_data")
        );

        other.delete(&ctx, "arc_test").unwrap();
        assert!(shared.read(&ctx, "arc_test").unwrap_err().is_not_found());
    }

    #[test]
    fn listing_is_empty() {
        assert!(Listing::default().is_empty());
        assert!(!Listing::new(vec!["a".into()], vec![]).is_empty());
    }
}
