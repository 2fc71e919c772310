//! Predicate keys and the normalisation of user supplied predicate values.
use crate::transaction::AuthorizationSelection;
use crate::{Error, Result};
use arrayvec::ArrayVec;
use hyperquery_format::{FixedSizeData, Hex, LogArgument, TransactionStatus};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use strum::IntoEnumIterator;

/// Name of a filter inside a selection clause. Not every key is valid for every selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter, strum_macros::IntoStaticStr,
)]
pub enum PredicateKey {
    #[strum(serialize = "hash")]
    Hash,
    #[strum(serialize = "miner")]
    Miner,
    #[strum(serialize = "address")]
    Address,
    #[strum(serialize = "topics")]
    Topics,
    #[strum(serialize = "from_")]
    From,
    #[strum(serialize = "to_")]
    To,
    #[strum(serialize = "sighash")]
    Sighash,
    #[strum(serialize = "status")]
    Status,
    #[strum(serialize = "kind")]
    Kind,
    #[strum(serialize = "contractAddress")]
    ContractAddress,
    #[strum(serialize = "authorizationList")]
    AuthorizationList,
    #[strum(serialize = "chainId")]
    ChainId,
    #[strum(serialize = "callType")]
    CallType,
    #[strum(serialize = "rewardType")]
    RewardType,
}

impl PredicateKey {
    /// Name of the key on the wire.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Looks up a key by its wire name. `from` and `to` are accepted for `from_` and `to_`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "from" => Some(Self::From),
            "to" => Some(Self::To),
            name => Self::iter().find(|key| key.as_str() == name),
        }
    }
}

impl fmt::Display for PredicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values handed to a predicate, in the shape they come from the caller.
///
/// Text is what a form field produces: hex strings, decimal or `0x` numbers and labels.
/// It is parsed and normalised according to the key it is assigned to.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValues {
    Text(Vec<String>),
    Numbers(Vec<u64>),
    /// Positional log topic slots, at most four.
    TopicSlots(Vec<Vec<String>>),
    Authorizations(Vec<AuthorizationSelection>),
}

impl PredicateValues {
    pub fn text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Text(values.into_iter().map(Into::into).collect())
    }

    fn into_text(self, key: PredicateKey) -> Result<Vec<String>> {
        match self {
            Self::Text(values) => Ok(values),
            _ => Err(shape(key, "text values")),
        }
    }
}

fn shape(key: PredicateKey, expected: &'static str) -> Error {
    Error::UnexpectedValueShape {
        predicate: key.as_str(),
        expected,
    }
}

fn dedup<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn parse_hex<const N: usize>(field: &str, value: &str) -> Result<FixedSizeData<N>> {
    FixedSizeData::decode_hex(value.trim()).map_err(|source| Error::MalformedHexValue {
        field: field.to_owned(),
        value: value.to_owned(),
        source,
    })
}

fn parse_hex_values<const N: usize>(
    field: &str,
    values: &[String],
) -> Result<Vec<FixedSizeData<N>>> {
    let parsed = values
        .iter()
        .map(|v| parse_hex(field, v))
        .collect::<Result<Vec<_>>>()?;
    Ok(dedup(parsed))
}

fn parse_number(key: PredicateKey, value: &str) -> Result<u64> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|e| Error::InvalidValue {
        field: key.as_str().to_owned(),
        value: value.to_owned(),
        reason: e.to_string(),
    })
}

fn numbers(key: PredicateKey, values: PredicateValues) -> Result<Vec<u64>> {
    match values {
        PredicateValues::Numbers(n) => Ok(n),
        PredicateValues::Text(t) => t.iter().map(|v| parse_number(key, v)).collect(),
        _ => Err(shape(key, "numbers")),
    }
}

/// Hex values of width `N`, lower-cased and deduplicated.
pub(crate) fn hex_list<const N: usize>(
    key: PredicateKey,
    values: PredicateValues,
) -> Result<Vec<FixedSizeData<N>>> {
    let values = values.into_text(key)?;
    parse_hex_values(key.as_str(), &values)
}

/// Deduplicated numbers no larger than `max`.
pub(crate) fn number_list(
    key: PredicateKey,
    values: PredicateValues,
    max: u64,
) -> Result<Vec<u64>> {
    let numbers = numbers(key, values)?;
    if let Some(n) = numbers.iter().find(|&&n| n > max) {
        return Err(Error::InvalidValue {
            field: key.as_str().to_owned(),
            value: n.to_string(),
            reason: format!("Must be at most {max}."),
        });
    }
    Ok(dedup(numbers))
}

/// Trimmed, lower-cased, deduplicated labels.
pub(crate) fn label_list(key: PredicateKey, values: PredicateValues) -> Result<Vec<String>> {
    let values = values.into_text(key)?;
    let labels = values
        .iter()
        .map(|v| {
            let label = v.trim().to_lowercase();
            if label.is_empty() {
                Err(Error::InvalidValue {
                    field: key.as_str().to_owned(),
                    value: v.clone(),
                    reason: "Labels can't be blank.".to_owned(),
                })
            } else {
                Ok(label)
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(dedup(labels))
}

pub(crate) fn single_status(
    key: PredicateKey,
    values: PredicateValues,
) -> Result<TransactionStatus> {
    let codes = numbers(key, values)?;
    let code = match codes.as_slice() {
        [code] => *code,
        _ => {
            return Err(Error::InvalidValue {
                field: key.as_str().to_owned(),
                value: format!("{codes:?}"),
                reason: "Expected exactly one status code.".to_owned(),
            })
        }
    };
    TransactionStatus::from_u64(code).map_err(|e| Error::InvalidValue {
        field: key.as_str().to_owned(),
        value: code.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn topic_slots(
    key: PredicateKey,
    values: PredicateValues,
) -> Result<ArrayVec<Vec<LogArgument>, 4>> {
    let slots = match values {
        PredicateValues::TopicSlots(slots) => slots,
        _ => return Err(shape(key, "topic slots")),
    };

    let mut topics = ArrayVec::new();
    for (i, slot) in slots.iter().enumerate() {
        let slot = parse_hex_values(&format!("{key}[{i}]"), slot)?;
        topics.try_push(slot).map_err(|_| Error::InvalidValue {
            field: key.as_str().to_owned(),
            value: slots.len().to_string(),
            reason: "At most 4 topic slots are allowed.".to_owned(),
        })?;
    }
    Ok(topics)
}

pub(crate) fn authorizations(
    key: PredicateKey,
    values: PredicateValues,
) -> Result<Vec<AuthorizationSelection>> {
    match values {
        PredicateValues::Authorizations(list) => Ok(list),
        _ => Err(shape(key, "authorization selections")),
    }
}
