//! A namespaced view over another store.

use bytes::Bytes;

use crate::key;
use crate::{Context, Listing, Reader, Result, Store};

/// A view of `parent` under a fixed "directory" key.
///
/// Every key is joined onto the prefix and forwarded unchanged to the parent.
/// The view holds no data and adds no locking; it is exactly as thread-safe as
/// its parent. Pass `&store`, `Box<_>` or `Arc<_>` as the parent to share it.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use pathkv_core::{Context, Reader, Store, SubStore};
/// # use pathkv_core::{Listing, Result};
/// # use std::collections::HashMap;
/// # use std::sync::Mutex;
/// # #[derive(Default)]
/// # struct Map(Mutex<HashMap<String, Bytes>>);
/// # impl Reader for Map {
/// #     fn list(&self, _: &Context, _: &str) -> Result<Listing> { Ok(Listing::default()) }
/// #     fn read(&self, _: &Context, k: &str) -> Result<Bytes> {
/// #         self.0.lock().unwrap().get(k).cloned().ok_or(pathkv_core::Error::KeyNotFound)
/// #     }
/// # }
/// # impl Store for Map {
/// #     fn write(&self, _: &Context, k: &str, v: Bytes) -> Result<()> {
/// #         self.0.lock().unwrap().insert(k.to_string(), v);
/// #         Ok(())
/// #     }
/// #     fn delete(&self, _: &Context, k: &str) -> Result<()> {
/// #         self.0.lock().unwrap().remove(k);
/// #         Ok(())
/// #     }
/// # }
///
/// let ctx = Context::background();
/// let parent = Map::default();
/// let users = SubStore::new(&parent, "users");
///
/// users.write(&ctx, "alice", Bytes::from_static(b"hi")).unwrap();
/// assert_eq!(parent.read(&ctx, "users/alice").unwrap(), Bytes::from_static(b"hi"));
/// ```
#[derive(Clone, Debug)]
pub struct SubStore<S> {
    parent: S,
    prefix: String,
}

impl<S> SubStore<S> {
    pub fn new(parent: S, prefix: impl Into<String>) -> Self {
        Self {
            parent,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn parent(&self) -> &S {
        &self.parent
    }

    pub fn into_parent(self) -> S {
        self.parent
    }

    fn full_key(&self, key: &str) -> String {
        key::join(&self.prefix, key)
    }
}

impl<S: Reader> Reader for SubStore<S> {
    fn list(&self, ctx: &Context, key: &str) -> Result<Listing> {
        self.parent.list(ctx, &self.full_key(key))
    }

    fn read(&self, ctx: &Context, key: &str) -> Result<Bytes> {
        self.parent.read(ctx, &self.full_key(key))
    }
}

impl<S: Store> Store for SubStore<S> {
    fn write(&self, ctx: &Context, key: &str, value: Bytes) -> Result<()> {
        self.parent.write(ctx, &self.full_key(key), value)
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        self.parent.delete(ctx, &self.full_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every key it is called with.
    #[derive(Default)]
    struct RecordingStore {
        seen: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }

        fn record(&self, key: &str) {
            self.seen.lock().unwrap().push(key.to_string());
        }
    }

    impl Reader for RecordingStore {
        fn list(&self, _ctx: &Context, key: &str) -> Result<Listing> {
            self.record(key);
            Ok(Listing::default())
        }

        fn read(&self, _ctx: &Context, key: &str) -> Result<Bytes> {
            self.record(key);
            Ok(Bytes::new())
        }
    }

    impl Store for RecordingStore {
        fn write(&self, _ctx: &Context, key: &str, _value: Bytes) -> Result<()> {
            self.record(key);
            Ok(())
        }

        fn delete(&self, _ctx: &Context, key: &str) -> Result<()> {
            self.record(key);
            Ok(())
        }
    }

    #[test]
    fn every_operation_is_prefixed() {
        let ctx = Context::background();
        let parent = RecordingStore::default();
        let sub = SubStore::new(&parent, "ns");

        sub.list(&ctx, "").unwrap();
        sub.read(&ctx, "a").unwrap();
        sub.write(&ctx, "/b/", Bytes::new()).unwrap();
        sub.delete(&ctx, "c//d").unwrap();

        assert_eq!(parent.seen(), vec!["ns", "ns/a", "ns/b", "ns/c/d"]);
    }

    #[test]
    fn nested_sub_stores_compose() {
        let ctx = Context::background();
        let parent = RecordingStore::default();
        let outer = SubStore::new(&parent, "a");
        let inner = SubStore::new(&outer, "b/");

        inner.read(&ctx, "c").unwrap();
        assert_eq!(parent.seen(), vec!["a/b/c"]);
        assert_eq!(inner.prefix(), "b/");
        assert_eq!(inner.parent().prefix(), "a");
    }

    #[test]
    fn reader_only_parent() {
        struct OnlyReads;

        impl Reader for OnlyReads {
            fn list(&self, _ctx: &Context, _key: &str) -> Result<Listing> {
                Ok(Listing::default())
            }

            fn read(&self, _ctx: &Context, key: &str) -> Result<Bytes> {
                Ok(Bytes::copy_from_slice(key.as_bytes()))
            }
        }

        let sub = SubStore::new(OnlyReads, "docs");
        let data = sub.read(&Context::background(), "intro").unwrap();
        assert_eq!(data, Bytes::from_static(b"docs/intro"));
        let _parent: OnlyReads = sub.into_parent();
    }
}
