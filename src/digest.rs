//! Content digests.
//!
//! A `Digest` is the SHA-256 of a byte buffer, used as (a) the cache key
//! alongside language, (b) an input to stable entity/relationship/chunk IDs,
//! and (c) the identity half of a `SourceUnit` (§3: "path + digest uniquely
//! identify one run"). Kept as a fixed-size byte array rather than a hex
//! `String` so it is `Copy`, cheap to hash, and cheap to compare.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(#[serde(with = "hex_bytes")] pub [u8; 32]);

impl Digest {
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let out = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&out);
        Self(bytes)
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// First 8 bytes as a `u64`, used as a compact hash-map key when a full
    /// 32-byte digest is overkill (e.g. entity/relationship stable IDs).
    #[must_use]
    pub fn truncated_u64(&self) -> u64 {
        u64::from_be_bytes(self.0[..8].try_into().expect("8 bytes"))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        s.serialize_str(&hex)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let mut out = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            if i >= 32 {
                break;
            }
            let hex = std::str::from_utf8(chunk).map_err(serde::de::Error::custom)?;
            out[i] = u8::from_str_radix(hex, 16).map_err(serde::de::Error::custom)?;
        }
        Ok(out)
    }
}

/// Compute a stable `u64` identifier from an arbitrary number of string/byte
/// parts, used for entity/relationship/chunk IDs (§3: `id = H(...)`). Parts
/// are joined with a separator byte that cannot appear in any part's UTF-8
/// encoding ambiguously across boundaries (`0x00`), so `H("ab", "c")` and
/// `H("a", "bc")` never collide.
#[must_use]
pub fn stable_id(parts: &[&[u8]]) -> u64 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
        hasher.update([0u8]);
    }
    let out = hasher.finalize();
    u64::from_be_bytes(out[..8].try_into().expect("8 bytes"))
}
