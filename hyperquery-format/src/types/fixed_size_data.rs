use super::Hex;
use crate::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::result::Result as StdResult;

/// Fixed width byte array that travels as `0x` prefixed hex.
///
/// Parsing is case-insensitive and strict about width: unlike node responses, query
/// inputs are never padded or truncated to fit.
#[derive(
    Clone,
    PartialEq,
    Eq,
    Hash,
    derive_more::From,
    derive_more::Into,
    derive_more::Deref,
    PartialOrd,
    Ord,
)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct FixedSizeData<const N: usize>(Box<[u8; N]>);

impl<const N: usize> Default for FixedSizeData<N> {
    fn default() -> Self {
        Self(Box::new([0; N]))
    }
}

impl<const N: usize> AsRef<[u8]> for FixedSizeData<N> {
    fn as_ref(&self) -> &[u8] {
        &*self.0
    }
}

impl<const N: usize> From<[u8; N]> for FixedSizeData<N> {
    fn from(buf: [u8; N]) -> Self {
        Self(Box::new(buf))
    }
}

impl<const N: usize> TryFrom<Vec<u8>> for FixedSizeData<N> {
    type Error = Error;

    fn try_from(buf: Vec<u8>) -> Result<FixedSizeData<N>> {
        let len = buf.len();
        let buf: Box<[u8; N]> = buf.try_into().map_err(|_| Error::UnexpectedLength {
            expected: N,
            got: len,
        })?;

        Ok(FixedSizeData(buf))
    }
}

impl<const N: usize> Hex for FixedSizeData<N> {
    fn encode_hex(&self) -> String {
        encode_hex(self.as_ref())
    }

    fn decode_hex(hex: &str) -> Result<Self> {
        let hex = decode_hex(hex)?;
        Self::try_from(hex)
    }
}

impl<const N: usize> std::str::FromStr for FixedSizeData<N> {
    type Err = Error;

    fn from_str(s: &str) -> StdResult<Self, Self::Err> {
        Self::decode_hex(s)
    }
}

impl<const N: usize> fmt::Display for FixedSizeData<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode_hex())
    }
}

struct FixedSizeDataVisitor<const N: usize>;

impl<const N: usize> Visitor<'_> for FixedSizeDataVisitor<N> {
    type Value = FixedSizeData<N>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(&format!("hex string for {N} byte data"))
    }

    fn visit_str<E>(self, value: &str) -> StdResult<Self::Value, E>
    where
        E: de::Error,
    {
        FixedSizeData::decode_hex(value).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedSizeData<N> {
    fn deserialize<D>(deserializer: D) -> StdResult<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(FixedSizeDataVisitor)
    }
}

impl<const N: usize> Serialize for FixedSizeData<N> {
    fn serialize<S>(&self, serializer: S) -> StdResult<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode_hex(self.as_ref()))
    }
}

fn encode_hex(buf: &[u8]) -> String {
    format!("0x{}", faster_hex::hex_string(buf))
}

fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let val = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| Error::InvalidHexPrefix(value.to_owned()))?;

    if val.len() % 2 != 0 {
        return Err(Error::DecodeHex(format!(
            "odd number of hex digits: {}",
            val.len()
        )));
    }

    let mut dst = vec![0; val.len() / 2];
    faster_hex::hex_decode(val.as_bytes(), &mut dst).map_err(|e| Error::DecodeHex(e.to_string()))?;
    Ok(dst)
}

impl<const N: usize> fmt::Debug for FixedSizeData<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedSizeData<{}>({})", N, self.encode_hex())
    }
}
