//! Conformance checks every `Store` implementation must pass.
//!
//! Backends synthesize directories in very different ways, so each backend's
//! tests run this whole suite against a fresh, empty store:
//!
//! ```rust,ignore
//! #[test]
//! fn conformance() {
//!     pathkv_core::trait_test_suite::run_all(|| MyStore::new());
//! }
//! ```

use std::thread;

use bytes::Bytes;

use crate::{Context, Error, Listing, Reader, Store, SubStore};

const TEST_DATA: &[u8] = b"testdata";

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn write_key<S: Store + ?Sized>(store: &S, key: &str) {
    store
        .write(&Context::background(), key, Bytes::from_static(TEST_DATA))
        .unwrap_or_else(|e| panic!("write({}) failed: {}", key, e));
}

/// List `key`, treating `KeyNotFound` as an empty listing.
pub fn list_or_empty<S: Store + ?Sized>(store: &S, key: &str) -> Listing {
    match store.list(&Context::background(), key) {
        Ok(listing) => listing,
        Err(Error::KeyNotFound) => Listing::default(),
        Err(e) => panic!("list({}) failed: {}", key, e),
    }
}

pub fn assert_list<S: Store + ?Sized>(store: &S, key: &str, dirs: &[&str], blobs: &[&str]) {
    let actual = list_or_empty(store, key);
    let expected = Listing::new(strings(dirs), strings(blobs));
    assert_eq!(actual, expected, "list({}) mismatch", key);
}

pub fn assert_not_found<S: Store + ?Sized>(store: &S, key: &str) {
    match store.read(&Context::background(), key) {
        Err(Error::KeyNotFound) => {}
        other => panic!("read({}) returned {:?}, want KeyNotFound", key, other),
    }
}

pub fn round_trip_works<S: Store + ?Sized>(store: &S) {
    let ctx = Context::background();

    write_key(store, "bar/baz.txt");
    let data = store.read(&ctx, "bar/baz.txt").unwrap();
    assert_eq!(&data[..], TEST_DATA);

    // Arbitrary bytes, including an empty value, come back unchanged.
    let binary = Bytes::from_static(&[0x00, 0xff, 0x10, 0x80, b'\n']);
    store.write(&ctx, "bin", binary.clone()).unwrap();
    assert_eq!(store.read(&ctx, "bin").unwrap(), binary);

    store.write(&ctx, "empty", Bytes::new()).unwrap();
    assert!(store.read(&ctx, "empty").unwrap().is_empty());

    assert_not_found(store, "not_present");
}

pub fn overwrite_works<S: Store + ?Sized>(store: &S) {
    let ctx = Context::background();

    store
        .write(&ctx, "value", Bytes::from_static(b"first, and longer"))
        .unwrap();
    store
        .write(&ctx, "value", Bytes::from_static(b"second"))
        .unwrap();
    assert_eq!(
        store.read(&ctx, "value").unwrap(),
        Bytes::from_static(b"second")
    );

    // Repeating an identical write is harmless.
    store
        .write(&ctx, "value", Bytes::from_static(b"second"))
        .unwrap();
    assert_eq!(
        store.read(&ctx, "value").unwrap(),
        Bytes::from_static(b"second")
    );
}

pub fn surrounding_separators_are_ignored<S: Store + ?Sized>(store: &S) {
    let ctx = Context::background();

    store
        .write(&ctx, "/foo/bar/", Bytes::from_static(TEST_DATA))
        .unwrap();
    assert_eq!(&store.read(&ctx, "foo/bar").unwrap()[..], TEST_DATA);
    assert_eq!(&store.read(&ctx, "/foo/bar").unwrap()[..], TEST_DATA);
    assert_list(store, "/foo/", &[], &["bar"]);

    store.delete(&ctx, "foo/bar/").unwrap();
    assert_not_found(store, "foo/bar");
}

pub fn delete_works<S: Store + ?Sized>(store: &S) {
    let ctx = Context::background();

    write_key(store, "bar/baz.txt");
    write_key(store, "bar/qux.txt");
    store.delete(&ctx, "bar/baz.txt").unwrap();

    assert_not_found(store, "bar/baz.txt");
    assert_eq!(&store.read(&ctx, "bar/qux.txt").unwrap()[..], TEST_DATA);
    assert_list(store, "bar", &[], &["qux.txt"]);

    store.delete(&ctx, "bar/qux.txt").unwrap();
    assert_list(store, "bar", &[], &[]);
}

pub fn delete_absent_is_ok<S: Store + ?Sized>(store: &S) {
    let ctx = Context::background();

    store.delete(&ctx, "never/written").unwrap();
    assert_not_found(store, "never/written");

    write_key(store, "once");
    store.delete(&ctx, "once").unwrap();
    store.delete(&ctx, "once").unwrap();
    assert_not_found(store, "once");
}

pub fn directory_is_not_a_value<S: Store + ?Sized>(store: &S) {
    write_key(store, "dir/leaf");
    assert_not_found(store, "dir");
}

pub fn key_under_blob_is_absent<S: Store + ?Sized>(store: &S) {
    let ctx = Context::background();
    write_key(store, "leaf");

    assert_not_found(store, "leaf/child");
    assert_not_found(store, "leaf/child/deeper");
    store.delete(&ctx, "leaf/child").unwrap();

    // A blob has no children.
    assert_list(store, "leaf", &[], &[]);
    assert_list(store, "leaf/child", &[], &[]);

    assert_eq!(&store.read(&ctx, "leaf").unwrap()[..], TEST_DATA);
}

pub fn interior_separators_collapse<S: Store + ?Sized>(store: &S) {
    let ctx = Context::background();

    store
        .write(&ctx, "a//b", Bytes::from_static(TEST_DATA))
        .unwrap();
    assert_eq!(&store.read(&ctx, "a/b").unwrap()[..], TEST_DATA);
    assert_eq!(&store.read(&ctx, "/a//b").unwrap()[..], TEST_DATA);
    assert_list(store, "", &["a"], &[]);
    assert_list(store, "a", &[], &["b"]);
    assert_list(store, "a//", &[], &["b"]);

    store.delete(&ctx, "a///b").unwrap();
    assert_not_found(store, "a/b");
}

pub fn list_works<S: Store + ?Sized>(store: &S) {
    assert_list(store, "", &[], &[]);

    write_key(store, "foo.txt");
    assert_list(store, "", &[], &["foo.txt"]);

    write_key(store, "bar/baz.txt");
    write_key(store, "bar/foo/baz.txt");
    assert_list(store, "", &["bar"], &["foo.txt"]);
    assert_list(store, "bar", &["foo"], &["baz.txt"]);
    assert_list(store, "bar/foo", &[], &["baz.txt"]);
    assert_list(store, "missing", &[], &[]);
}

pub fn list_is_sorted<S: Store + ?Sized>(store: &S) {
    for key in ["c", "a", "b/x", "B/y", "aa", "d/e/f"] {
        write_key(store, key);
    }
    assert_list(store, "", &["B", "b", "d"], &["a", "aa", "c"]);
}

pub fn sub_store_works<S: Store + ?Sized>(store: &S) {
    let ctx = Context::background();
    let sub = SubStore::new(store, "ns");

    sub.write(&ctx, "k", Bytes::from_static(b"v")).unwrap();
    assert_eq!(store.read(&ctx, "ns/k").unwrap(), Bytes::from_static(b"v"));

    write_key(store, "ns/dir/leaf");
    assert_eq!(
        sub.read(&ctx, "dir/leaf").unwrap(),
        store.read(&ctx, "ns/dir/leaf").unwrap()
    );
    assert_eq!(list_or_empty(&sub, ""), list_or_empty(store, "ns"));
    assert_list(&sub, "", &["dir"], &["k"]);

    sub.delete(&ctx, "k").unwrap();
    assert_not_found(store, "ns/k");
    assert_not_found(&sub, "k");
}

pub fn concurrent_writes_work<S: Store + ?Sized>(store: &S) {
    const WRITERS: usize = 8;
    const KEYS_PER_WRITER: usize = 25;

    thread::scope(|scope| {
        for writer in 0..WRITERS {
            scope.spawn(move || {
                let ctx = Context::background();
                for i in 0..KEYS_PER_WRITER {
                    let key = format!("w{}/k{}", writer, i);
                    store
                        .write(&ctx, &key, Bytes::from(key.clone().into_bytes()))
                        .unwrap();
                }
            });
        }
    });

    let ctx = Context::background();
    for writer in 0..WRITERS {
        for i in 0..KEYS_PER_WRITER {
            let key = format!("w{}/k{}", writer, i);
            assert_eq!(&store.read(&ctx, &key).unwrap()[..], key.as_bytes());
        }
    }
    assert_eq!(list_or_empty(store, "").dirs.len(), WRITERS);
}

pub fn cancelled_context_fails<S: Store + ?Sized>(store: &S) {
    write_key(store, "present");

    let (ctx, cancel) = Context::background().with_cancel();
    cancel.cancel();

    assert!(matches!(store.list(&ctx, ""), Err(Error::Cancelled)));
    assert!(matches!(store.read(&ctx, "present"), Err(Error::Cancelled)));
    assert!(matches!(
        store.write(&ctx, "other", Bytes::new()),
        Err(Error::Cancelled)
    ));
    assert!(matches!(
        store.delete(&ctx, "present"),
        Err(Error::Cancelled)
    ));

    // Nothing happened.
    assert_eq!(
        &store.read(&Context::background(), "present").unwrap()[..],
        TEST_DATA
    );
    assert_not_found(store, "other");
}

/// Run every check, each against a fresh store from `store_factory`.
pub fn run_all<S: Store, F: FnMut() -> S>(mut store_factory: F) {
    round_trip_works(&store_factory());
    overwrite_works(&store_factory());
    surrounding_separators_are_ignored(&store_factory());
    delete_works(&store_factory());
    delete_absent_is_ok(&store_factory());
    directory_is_not_a_value(&store_factory());
    key_under_blob_is_absent(&store_factory());
    interior_separators_collapse(&store_factory());
    list_works(&store_factory());
    list_is_sorted(&store_factory());
    sub_store_works(&store_factory());
    concurrent_writes_work(&store_factory());
    cancelled_context_fails(&store_factory());
}
