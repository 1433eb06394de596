//! Error types for the mood-history store.

use thiserror::Error;

/// Failure of a store operation that the caller has to react to.
///
/// "Not found" is never an error: `update_by_id` and `delete_by_id` report it
/// as `Ok(false)`, and a rejected import is `Ok(false)` as well.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key/value substrate failed to read or write the slot.
    #[error("storage substrate failure: {0:#}")]
    Storage(#[from] anyhow::Error),

    /// The slot holds data that does not decode as an observation history.
    #[error("emotion history is unreadable: {reason}")]
    Corrupt { reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// NaN and infinities cannot be written to the slot and read back.
    #[error("confidence {value} is not a finite number")]
    NonFiniteConfidence { value: f64 },

    #[error("no observation id is left above {max}")]
    IdsExhausted { max: i64 },
}

/// Why a snapshot was refused by `import_snapshot`.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("snapshot is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("snapshot top level must be an array, found {found}")]
    NotASequence { found: &'static str },

    #[error("record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
