//! Typed views over one table of the raw byte store.

use crate::convert::Converter;
use crate::error::{StoreError, StoreResult};
use crate::raw::{KvRead, KvWrite};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// A stateless typed view of one named table.
///
/// `S` is the store handle; the wrapper owns the converters and the table
/// name, never the entries. Constructing a `TypedMap<&MemoryKv, _, _>`
/// yields a read-only handle with no write methods, while
/// `TypedMap<&mut MemoryKv, _, _>` exposes the full surface, so "validate
/// must not mutate" is enforced by the handle type rather than by
/// convention.
pub struct TypedMap<S, KC, VC> {
    store: S,
    table: String,
    _converters: PhantomData<(KC, VC)>,
}

impl<S, KC, VC> TypedMap<S, KC, VC> {
    pub fn new(store: S, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            _converters: PhantomData,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl<S, KC, VC> TypedMap<S, KC, VC>
where
    S: Deref,
    S::Target: KvRead,
    KC: Converter,
    VC: Converter,
{
    /// Decode the value stored under `key`, if any.
    ///
    /// A present value that fails to decode is a fatal
    /// [`StoreError::Decode`], never `None`.
    pub fn get(&self, key: &KC::Value) -> StoreResult<Option<VC::Value>> {
        let raw_key = self.encode_key(key)?;
        match self.store.get(&self.table, &raw_key) {
            Some(bytes) => VC::decode(&bytes).map(Some).map_err(|err| StoreError::Decode {
                table: self.table.clone(),
                detail: err.to_string(),
            }),
            None => Ok(None),
        }
    }

    pub fn has(&self, key: &KC::Value) -> StoreResult<bool> {
        let raw_key = self.encode_key(key)?;
        Ok(self.store.contains(&self.table, &raw_key))
    }

    /// Count of entries currently visible through this map.
    pub fn size(&self) -> usize {
        self.store.len(&self.table)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Visit every currently-present entry exactly once, in storage order,
    /// lazily decoding each. Iteration is single-threaded; a decode
    /// failure aborts it with the error.
    pub fn for_each(&self, mut f: impl FnMut(KC::Value, VC::Value)) -> StoreResult<()> {
        let mut failure = None;
        self.store.for_each(&self.table, &mut |raw_key, raw_value| {
            let key = match KC::decode(raw_key) {
                Ok(key) => key,
                Err(err) => {
                    failure = Some(StoreError::Decode {
                        table: self.table.clone(),
                        detail: format!("key: {err}"),
                    });
                    return false;
                }
            };
            let value = match VC::decode(raw_value) {
                Ok(value) => value,
                Err(err) => {
                    failure = Some(StoreError::Decode {
                        table: self.table.clone(),
                        detail: err.to_string(),
                    });
                    return false;
                }
            };
            f(key, value);
            true
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn encode_key(&self, key: &KC::Value) -> StoreResult<Vec<u8>> {
        KC::encode(key).map_err(|err| StoreError::Encode {
            table: self.table.clone(),
            detail: err.to_string(),
        })
    }
}

impl<S, KC, VC> TypedMap<S, KC, VC>
where
    S: DerefMut,
    S::Target: KvWrite,
    KC: Converter,
    VC: Converter,
{
    /// Insert or replace the entry for `key`. Overwriting replaces the
    /// value without changing `size`.
    pub fn set(&mut self, key: &KC::Value, value: &VC::Value) -> StoreResult<()> {
        let raw_key = self.encode_key(key)?;
        let raw_value = VC::encode(value).map_err(|err| StoreError::Encode {
            table: self.table.clone(),
            detail: err.to_string(),
        })?;
        self.store.put(&self.table, raw_key, raw_value);
        Ok(())
    }

    /// Remove the entry for `key`; no-op when absent.
    pub fn delete(&mut self, key: &KC::Value) -> StoreResult<()> {
        let raw_key = self.encode_key(key)?;
        self.store.delete(&self.table, &raw_key);
        Ok(())
    }

    /// Remove every entry. No partial clear is visible to a subsequent
    /// read within the same execution.
    pub fn clear(&mut self) {
        self.store.clear(&self.table);
    }
}
