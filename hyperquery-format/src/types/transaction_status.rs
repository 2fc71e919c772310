use crate::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::result::Result as StdResult;
use std::str::FromStr;

use super::Hex;

/// Receipt status of a transaction. Travels as the bare number `0` or `1` in queries.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum TransactionStatus {
    Success,
    Failure,
}

impl TransactionStatus {
    pub fn from_u8(val: u8) -> Result<Self> {
        match val {
            1 => Ok(Self::Success),
            0 => Ok(Self::Failure),
            _ => Err(Error::UnknownTransactionStatus(val.to_string())),
        }
    }

    pub fn from_u64(val: u64) -> Result<Self> {
        u8::try_from(val)
            .map_err(|_| Error::UnknownTransactionStatus(val.to_string()))
            .and_then(Self::from_u8)
    }

    pub fn to_u8(&self) -> u8 {
        match self {
            Self::Success => 1,
            Self::Failure => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "0x1",
            Self::Failure => "0x0",
        }
    }
}

/// Accepts both the decimal (`"1"`) and the rpc hex (`"0x1"`) spelling.
impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0x1" | "1" => Ok(Self::Success),
            "0x0" | "0" => Ok(Self::Failure),
            _ => Err(Error::UnknownTransactionStatus(s.to_owned())),
        }
    }
}

struct TransactionStatusVisitor;

impl Visitor<'_> for TransactionStatusVisitor {
    type Value = TransactionStatus;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("transaction status code 0 or 1")
    }

    fn visit_u64<E>(self, value: u64) -> StdResult<Self::Value, E>
    where
        E: de::Error,
    {
        TransactionStatus::from_u64(value).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_i64<E>(self, value: i64) -> StdResult<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(value)
            .map_err(|_| E::custom(Error::UnknownTransactionStatus(value.to_string())))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_str<E>(self, value: &str) -> StdResult<Self::Value, E>
    where
        E: de::Error,
    {
        TransactionStatus::from_str(value).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for TransactionStatus {
    fn deserialize<D>(deserializer: D) -> StdResult<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TransactionStatusVisitor)
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S>(&self, serializer: S) -> StdResult<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.to_u8())
    }
}

impl Hex for TransactionStatus {
    fn encode_hex(&self) -> String {
        self.as_str().to_owned()
    }

    fn decode_hex(hex: &str) -> Result<Self> {
        Self::from_str(hex)
    }
}

impl fmt::Debug for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionStatus({})", self.to_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::TransactionStatus;
    use serde_test::{assert_de_tokens, assert_tokens, Token};

    #[test]
    fn test_serde() {
        assert_tokens(&TransactionStatus::Success, &[Token::U8(1)]);
        assert_tokens(&TransactionStatus::Failure, &[Token::U8(0)]);
    }

    #[test]
    fn test_de_rpc_hex() {
        assert_de_tokens(&TransactionStatus::Success, &[Token::Str("0x1")]);
        assert_de_tokens(&TransactionStatus::Failure, &[Token::Str("0")]);
    }

    #[test]
    #[should_panic]
    fn test_de_unknown() {
        assert_de_tokens(&TransactionStatus::Success, &[Token::U64(3)]);
    }

    #[test]
    fn test_from_u64_rejects_large() {
        assert!(TransactionStatus::from_u64(257).is_err());
        assert_eq!(
            TransactionStatus::from_u64(1).unwrap(),
            TransactionStatus::Success
        );
    }

    #[test]
    fn test_json_forms() {
        let parsed: Vec<TransactionStatus> = serde_json::from_str(r#"[1, "0x0", "1"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                TransactionStatus::Success,
                TransactionStatus::Failure,
                TransactionStatus::Success
            ]
        );
        assert!(serde_json::from_str::<TransactionStatus>("-1").is_err());
        assert_eq!(serde_json::to_string(&TransactionStatus::Failure).unwrap(), "0");
    }
}
