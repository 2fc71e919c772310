use crate::catalog::EntityKind;
use crate::validate::Findings;
use std::result::Result as StdResult;
use thiserror::Error as ThisError;

/// Failure of a query construction operation.
///
/// The same variants are produced whether a document is assembled edit by edit or decoded
/// from JSON, so both paths report problems identically.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    #[error("Invalid entity kind \"{0}\". Expected one of block, transaction, log or trace.")]
    InvalidEntityKind(String),
    #[error("Predicate \"{predicate}\" is not valid for {selection} selections.")]
    UnknownPredicate {
        selection: &'static str,
        predicate: String,
    },
    #[error("Malformed hex value for \"{field}\": \"{value}\". {source}")]
    MalformedHexValue {
        field: String,
        value: String,
        source: hyperquery_format::Error,
    },
    #[error("Invalid value for \"{field}\": \"{value}\". {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Values for \"{predicate}\" must be given as {expected}.")]
    UnexpectedValueShape {
        predicate: &'static str,
        expected: &'static str,
    },
    #[error("Invalid block range. from_block={from_block} to_block={to_block:?}")]
    InvalidRange {
        from_block: i128,
        to_block: Option<i128>,
    },
    #[error("Index {index} is out of range for {entity} selections. There are {len} of them.")]
    IndexOutOfRange {
        entity: EntityKind,
        index: usize,
        len: usize,
    },
    #[error("Unknown {entity} field \"{field}\".")]
    UnknownField { entity: EntityKind, field: String },
    #[error("Invalid {entity} cap {value}. Caps can't be negative.")]
    InvalidCap { entity: EntityKind, value: i128 },
    #[error("Query has blocking findings:\n{0}")]
    Invalid(Findings),
    #[error("Failed to serialize query: {0}")]
    Serialize(String),
}

pub type Result<T> = StdResult<T, Error>;

/// Failure to turn externally supplied JSON into a [`crate::QueryDocument`].
#[derive(Debug, ThisError)]
pub enum DecodeError {
    #[error("Query JSON is malformed at \"{path}\": {source}")]
    Syntax {
        path: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Query(#[from] Error),
}

impl DecodeError {
    /// The construction error behind this failure, if the JSON itself was well formed.
    pub fn query_error(&self) -> Option<&Error> {
        match self {
            Self::Syntax { .. } => None,
            Self::Query(e) => Some(e),
        }
    }
}
