use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte Blake3 digest identifying a built transaction
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    pub const ZERO: Digest = Digest([0u8; 32]);

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Compute Blake3 digest of data
pub fn hash_blake3(data: &[u8]) -> Digest {
    let hash = blake3::hash(data);
    Digest(*hash.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let data = b"test data";
        assert_eq!(hash_blake3(data), hash_blake3(data));
        assert_ne!(hash_blake3(data), Digest::ZERO);
        assert_eq!(hash_blake3(data).to_hex().len(), 64);
    }
}
