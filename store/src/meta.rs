//! Metadata storage trait.

use crate::StoreError;

/// Key holding the id the next registered group will receive.
pub const NEXT_GROUP_ID_KEY: &str = "next_group_id";

/// Trait for storing database metadata (schema version, id counter).
///
/// This is a generic key-value store for internal bookkeeping that doesn't
/// belong in the record store or an index.
pub trait MetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Get the current database schema version (0 on a fresh database).
    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match self.get_meta("schema_version")? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption("schema_version has unexpected byte length".into())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.put_meta("schema_version", &version.to_le_bytes())
    }

    /// The id the next registered group will receive. Ids start at 1.
    fn next_group_id(&self) -> Result<u64, StoreError> {
        match self.get_meta(NEXT_GROUP_ID_KEY)? {
            Some(bytes) => decode_group_id(&bytes),
            None => Ok(1),
        }
    }
}

/// Decode a big-endian `next_group_id` value.
pub fn decode_group_id(bytes: &[u8]) -> Result<u64, StoreError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StoreError::Corruption("next_group_id has unexpected byte length".into()))?;
    Ok(u64::from_be_bytes(arr))
}
