//! JSON convenience wrappers around `read` and `write`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Context, Reader, Result, Store};

/// Read the value at `key` and decode it from JSON.
///
/// A missing key surfaces as `Error::KeyNotFound`; a decode failure as
/// `Error::Json`.
pub fn read_json<T, R>(reader: &R, ctx: &Context, key: &str) -> Result<T>
where
    T: DeserializeOwned,
    R: Reader + ?Sized,
{
    let data = reader.read(ctx, key)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Encode `value` as JSON and write it at `key`.
pub fn write_json<T, S>(store: &S, ctx: &Context, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    let data = serde_json::to_vec(value)?;
    store.write(ctx, key, data.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Listing};
    use bytes::Bytes;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct User {
        name: String,
        age: u32,
    }

    /// Holds a single value regardless of key.
    #[derive(Default)]
    struct Cell(Mutex<Option<Bytes>>);

    impl Reader for Cell {
        fn list(&self, _ctx: &Context, _key: &str) -> Result<Listing> {
            Ok(Listing::default())
        }

        fn read(&self, _ctx: &Context, _key: &str) -> Result<Bytes> {
            self.0.lock().unwrap().clone().ok_or(Error::KeyNotFound)
        }
    }

    impl Store for Cell {
        fn write(&self, _ctx: &Context, _key: &str, value: Bytes) -> Result<()> {
            *self.0.lock().unwrap() = Some(value);
            Ok(())
        }

        fn delete(&self, _ctx: &Context, _key: &str) -> Result<()> {
            *self.0.lock().unwrap() = None;
            Ok(())
        }
    }

    #[test]
    fn write_then_read_json() {
        let ctx = Context::background();
        let store = Cell::default();
        let alice = User {
            name: "Alice".to_string(),
            age: 30,
        };

        write_json(&store, &ctx, "users/alice", &alice).unwrap();
        let raw = store.read(&ctx, "users/alice").unwrap();
        assert_eq!(&raw[..], br#"{"name":"Alice","age":30}"#);

        let back: User = read_json(&store, &ctx, "users/alice").unwrap();
        assert_eq!(back, alice);
    }

    #[test]
    fn missing_key_stays_not_found() {
        let store = Cell::default();
        let err = read_json::<User, _>(&store, &Context::background(), "nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn malformed_json_is_json_error() {
        let ctx = Context::background();
        let store = Cell::default();
        store
            .write(&ctx, "bad", Bytes::from_static(b"not json"))
            .unwrap();

        let err = read_json::<User, _>(&store, &ctx, "bad").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
