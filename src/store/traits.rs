//! Key/value store trait.

use super::error::StoreError;
use crate::models::RawRecord;

/// A table of string keys and serialized values.
pub trait KeyValueStore {
    /// All records whose key starts with `prefix`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be queried.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<RawRecord>, StoreError>;

    /// The value stored under exactly `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be queried.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}
