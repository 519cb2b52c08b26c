use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the typed store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A present value failed to decode. Fatal for that read: corrupt
    /// persisted bytes must never be reported as absence.
    #[error("decode failed in table {table}: {detail}")]
    Decode { table: String, detail: String },

    /// A key or value could not be encoded for storage.
    #[error("encode failed in table {table}: {detail}")]
    Encode { table: String, detail: String },
}
