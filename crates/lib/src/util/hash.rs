//! Content fingerprints for evaluated values.
//!
//! - `ObjectHash`: a truncated 20-character hash identifying a value
//! - `ContentHash`: a full 64-character hash for verification
//! - `hash_bytes()`: arbitrary byte hashing

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::OBJ_HASH_PREFIX_LEN;

pub type HashError = serde_json::Error;

/// A content-addressed hash identifying a unique value.
///
/// The hash is a 20-character truncated SHA-256 of the JSON-serialized value.
/// Maps serialize in key order, so equal values always hash equally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHash(pub String);

impl std::fmt::Display for ObjectHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn compute_hash(&self) -> Result<ObjectHash, HashError> {
    let serialized = serde_json::to_string(self)?;
    let full = hash_bytes(serialized.as_bytes());
    Ok(ObjectHash(full.0[..OBJ_HASH_PREFIX_LEN].to_string()))
  }
}

/// A full 64-character SHA256 hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(hex::encode(hasher.finalize()))
}
