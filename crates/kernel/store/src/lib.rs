//! Typed key-value storage for the conclave kernel.
//!
//! Governance state lives in a byte-oriented store of named tables. This
//! crate provides the seam between that store and the semantic types the
//! engine works with:
//!
//! - [`KvRead`] / [`KvWrite`]: the raw byte-store interface. The engine
//!   never assumes more than these traits; the store behind them is an
//!   external collaborator.
//! - [`MemoryKv`]: a deterministic in-memory reference store. Iteration
//!   order is byte-lexicographic, so every replica walks entries the same
//!   way.
//! - [`Converter`]: symmetric encode/decode between one semantic type and
//!   bytes, with the round-trip law `decode(encode(x)) == x`.
//! - [`TypedMap`]: a stateless view of one table through a key converter
//!   and a value converter. Wrappers are constructed per access and own no
//!   entries.
//!
//! A present value that fails to decode is corruption and surfaces as a
//! fatal [`StoreError::Decode`], never as absence: masking it would let a
//! replica silently diverge.

#![deny(unsafe_code)]

pub mod convert;
pub mod error;
pub mod raw;
pub mod typed;

pub use convert::{
    BoolConverter, BytesConverter, ConvertError, Converter, JsonConverter, StringConverter,
    U16Converter, U32Converter, U64Converter,
};
pub use error::{StoreError, StoreResult};
pub use raw::{KvRead, KvWrite, MemoryKv};
pub use typed::TypedMap;
