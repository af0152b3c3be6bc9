use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::address::ObjectId;

/// Amount of a coin in base units
pub type Amount = u64;

/// Fully qualified coin type, `<package>::<module>::<Name>`
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoinType {
    pub package: ObjectId,
    pub module: String,
    pub name: String,
}

impl CoinType {
    pub fn new(package: ObjectId, module: &str, name: &str) -> Result<Self, CoreError> {
        if !is_identifier(module) || !is_identifier(name) {
            return Err(CoreError::InvalidCoinType(format!("{package}::{module}::{name}")));
        }
        Ok(CoinType {
            package,
            module: module.to_string(),
            name: name.to_string(),
        })
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidCoinType(s.to_string());
        let mut parts = s.split("::");
        let (Some(package), Some(module), Some(name), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let package = ObjectId::parse(package).map_err(|_| invalid())?;
        Self::new(package, module, name).map_err(|_| invalid())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

impl FromStr for CoinType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoinType::parse(s)
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.name)
    }
}

impl fmt::Debug for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoinType({self})")
    }
}

impl Serialize for CoinType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CoinType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CoinType::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A discrete coin object owned by an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinObject {
    pub coin_type: CoinType,
    pub coin_object_id: ObjectId,
    pub version: u64,
    pub balance: Amount,
}

/// Convert a user-typed decimal amount ("1.5") into base units.
pub fn parse_amount(input: &str, decimals: u8) -> Result<Amount, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidAmount {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("empty"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected a non-negative decimal number"));
    }
    if frac.len() > decimals as usize {
        return Err(invalid(&format!("at most {decimals} fractional digits")));
    }

    let scale = 10u64
        .checked_pow(decimals as u32)
        .ok_or_else(|| invalid("unsupported decimals"))?;
    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("too large"))?
    };
    let frac_units: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse().map_err(|_| invalid("too large"))?
    };

    whole
        .checked_mul(scale)
        .and_then(|units| units.checked_add(frac_units))
        .ok_or_else(|| invalid("too large"))
}

/// Render base units as a decimal string without trailing zeros.
pub fn format_amount(amount: Amount, decimals: u8) -> String {
    let Some(scale) = 10u64.checked_pow(decimals as u32) else {
        return amount.to_string();
    };
    let whole = amount / scale;
    let frac = amount % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac, width = decimals as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
