use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Length in bytes of account addresses and object ids
pub const ADDRESS_LENGTH: usize = 32;

/// Ledger account address, always written as `0x` + 64 hex digits
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Parse a user-supplied address. Only the full-length form is accepted,
    /// so a truncated paste never ends up as a transfer recipient.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| CoreError::InvalidAddress(s.to_string()))?;
        if digits.len() != ADDRESS_LENGTH * 2 {
            return Err(CoreError::InvalidAddress(s.to_string()));
        }
        let bytes = hex::decode(digits).map_err(|_| CoreError::InvalidAddress(s.to_string()))?;
        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Address(arr))
    }

    /// Generate a random address (fixtures and sample configs)
    pub fn random() -> Self {
        Address(rand::random())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// Identifier of an on-ledger object (coins, shared pool, capabilities)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectId(pub [u8; ADDRESS_LENGTH]);

impl ObjectId {
    /// Well-known shared clock object
    pub const CLOCK: ObjectId = ObjectId::from_u8(6);

    pub const fn from_u8(last: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = last;
        ObjectId(bytes)
    }

    /// Parse an object id. Short forms such as `0x6` are left-padded with zeros.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| CoreError::InvalidObjectId(s.to_string()))?;
        if digits.is_empty() || digits.len() > ADDRESS_LENGTH * 2 {
            return Err(CoreError::InvalidObjectId(s.to_string()));
        }
        let padded = format!("{:0>width$}", digits, width = ADDRESS_LENGTH * 2);
        let bytes = hex::decode(padded).map_err(|_| CoreError::InvalidObjectId(s.to_string()))?;
        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(ObjectId(arr))
    }

    /// Generate a random object id (fixtures and sample snapshots)
    pub fn random() -> Self {
        ObjectId(rand::random())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ObjectId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse(s)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({self})")
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                <$ty>::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(Address);
string_serde!(ObjectId);
