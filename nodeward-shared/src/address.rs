//! Ledger address type.
//!
//! A 20 byte account or contract address. The all-zero address is the
//! "not registered" sentinel returned by the on-ledger registry for unknown
//! nodes, so callers check `is_zero` before treating a lookup as a hit.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::NodewardError;

/// Length of a ledger address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20 byte ledger address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Wrap raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// True for the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn parse(s: &str) -> Result<Self, NodewardError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| NodewardError::Config(format!("invalid address {s:?}: {e}")))?;
        let bytes: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            NodewardError::Config(format!(
                "invalid address {s:?}: expected {ADDRESS_LEN} bytes, got {}",
                b.len()
            ))
        })?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = NodewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        let addr = Address::parse("0x00000000219ab540356cbb839cbe05303d7705fa").unwrap();
        assert_eq!(
            addr.to_string(),
            "0x00000000219ab540356cbb839cbe05303d7705fa"
        );
    }

    #[test]
    fn parse_without_prefix() {
        let with = Address::parse("0x1111111111111111111111111111111111111111").unwrap();
        let without = Address::parse("1111111111111111111111111111111111111111").unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn zero_sentinel() {
        assert!(Address::ZERO.is_zero());
        let addr = Address::parse("0x0000000000000000000000000000000000000000").unwrap();
        assert!(addr.is_zero());
        let nonzero = Address::parse("0x0000000000000000000000000000000000000001").unwrap();
        assert!(!nonzero.is_zero());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xzz11111111111111111111111111111111111111").is_err());
    }

    #[test]
    fn serde_as_hex_string() {
        let addr = Address::parse("0x2222222222222222222222222222222222222222").unwrap();
        let yaml = serde_yaml::to_string(&addr).unwrap();
        assert!(yaml.contains("0x2222222222222222222222222222222222222222"));
        let back: Address = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, addr);
    }
}
