//! JSON wire format of a query.
//!
//! Encoding refuses documents with blocking findings. Decoding does not trust the shape
//! of its input: unknown keys and `null`s are rejected, and every value goes through the
//! same builder operations as an interactive edit before the result is validated.
use crate::block::BlockSelection;
use crate::catalog::EntityKind;
use crate::log::LogSelection;
use crate::predicate::{PredicateKey, PredicateValues};
use crate::query::{FieldSelection, JoinMode, QueryDocument};
use crate::selection::Selection;
use crate::trace::TraceSelection;
use crate::transaction::{AuthorizationSelection, TransactionSelection};
use crate::{DecodeError, Error, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Turns a document into the JSON object the server expects.
pub fn encode(doc: &QueryDocument) -> Result<Value> {
    let findings = doc.validate();
    if findings.has_errors() {
        return Err(Error::Invalid(findings));
    }
    serde_json::to_value(doc).map_err(|e| Error::Serialize(e.to_string()))
}

pub fn encode_to_string(doc: &QueryDocument) -> Result<String> {
    encode(doc).map(|value| value.to_string())
}

/// Parses and validates a query from JSON text.
pub fn decode(json: &str) -> std::result::Result<QueryDocument, DecodeError> {
    let mut de = serde_json::Deserializer::from_str(json);
    let raw: RawQuery = serde_path_to_error::deserialize(&mut de).map_err(syntax)?;
    de.end().map_err(|source| DecodeError::Syntax {
        path: ".".to_owned(),
        source,
    })?;
    Ok(raw.into_document()?)
}

/// Same as [`decode`] for an already parsed JSON value.
pub fn decode_value(value: Value) -> std::result::Result<QueryDocument, DecodeError> {
    let raw: RawQuery = serde_path_to_error::deserialize(value).map_err(syntax)?;
    Ok(raw.into_document()?)
}

fn syntax(e: serde_path_to_error::Error<serde_json::Error>) -> DecodeError {
    DecodeError::Syntax {
        path: e.path().to_string(),
        source: e.into_inner(),
    }
}

/// Missing keys become `None` through `#[serde(default)]`, an explicit `null` is an error.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawQuery {
    from_block: i128,
    #[serde(default, deserialize_with = "present")]
    to_block: Option<i128>,
    #[serde(default, deserialize_with = "present")]
    logs: Option<Vec<RawLogSelection>>,
    #[serde(default, deserialize_with = "present")]
    transactions: Option<Vec<RawTransactionSelection>>,
    #[serde(default, deserialize_with = "present")]
    traces: Option<Vec<RawTraceSelection>>,
    #[serde(default, deserialize_with = "present")]
    blocks: Option<Vec<RawBlockSelection>>,
    #[serde(default)]
    include_all_blocks: bool,
    field_selection: RawFieldSelection,
    #[serde(default, deserialize_with = "present")]
    max_num_blocks: Option<i128>,
    #[serde(default, deserialize_with = "present")]
    max_num_transactions: Option<i128>,
    #[serde(default, deserialize_with = "present")]
    max_num_logs: Option<i128>,
    #[serde(default, deserialize_with = "present")]
    max_num_traces: Option<i128>,
    #[serde(default)]
    join_mode: JoinMode,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldSelection {
    #[serde(default)]
    block: Vec<String>,
    #[serde(default)]
    transaction: Vec<String>,
    #[serde(default)]
    log: Vec<String>,
    #[serde(default)]
    trace: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlockSelection {
    #[serde(default, deserialize_with = "present")]
    hash: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    miner: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLogSelection {
    #[serde(default, deserialize_with = "present")]
    address: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    topics: Option<Vec<Vec<String>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawAuthorizationSelection {
    #[serde(default, deserialize_with = "present")]
    chain_id: Option<Vec<u64>>,
    #[serde(default, deserialize_with = "present")]
    address: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawTransactionSelection {
    #[serde(rename = "from_", alias = "from", default, deserialize_with = "present")]
    from: Option<Vec<String>>,
    #[serde(rename = "to_", alias = "to", default, deserialize_with = "present")]
    to: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    sighash: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    status: Option<u64>,
    #[serde(default, deserialize_with = "present")]
    kind: Option<Vec<u64>>,
    #[serde(default, deserialize_with = "present")]
    contract_address: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    authorization_list: Option<Vec<RawAuthorizationSelection>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawTraceSelection {
    #[serde(rename = "from_", alias = "from", default, deserialize_with = "present")]
    from: Option<Vec<String>>,
    #[serde(rename = "to_", alias = "to", default, deserialize_with = "present")]
    to: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    address: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    call_type: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    reward_type: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    kind: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    sighash: Option<Vec<String>>,
}

/// Sets `key` on `sel` if the raw value was present.
fn apply<S: Selection>(sel: S, key: PredicateKey, values: Option<PredicateValues>) -> Result<S> {
    match values {
        Some(values) => sel.with_predicate(key, values),
        None => Ok(sel),
    }
}

fn text(values: Option<Vec<String>>) -> Option<PredicateValues> {
    values.map(PredicateValues::Text)
}

fn numbers(values: Option<Vec<u64>>) -> Option<PredicateValues> {
    values.map(PredicateValues::Numbers)
}

fn convert_all<R, T>(raw: Option<Vec<R>>, f: fn(R) -> Result<T>) -> Result<Option<Vec<T>>> {
    raw.map(|items| items.into_iter().map(f).collect())
        .transpose()
}

impl RawBlockSelection {
    fn into_selection(self) -> Result<BlockSelection> {
        let sel = BlockSelection::default();
        let sel = apply(sel, PredicateKey::Hash, text(self.hash))?;
        apply(sel, PredicateKey::Miner, text(self.miner))
    }
}

impl RawLogSelection {
    fn into_selection(self) -> Result<LogSelection> {
        let sel = LogSelection::default();
        let sel = apply(sel, PredicateKey::Address, text(self.address))?;
        apply(
            sel,
            PredicateKey::Topics,
            self.topics.map(PredicateValues::TopicSlots),
        )
    }
}

impl RawAuthorizationSelection {
    fn into_selection(self) -> Result<AuthorizationSelection> {
        let sel = AuthorizationSelection::default();
        let sel = apply(sel, PredicateKey::ChainId, numbers(self.chain_id))?;
        apply(sel, PredicateKey::Address, text(self.address))
    }
}

impl RawTransactionSelection {
    fn into_selection(self) -> Result<TransactionSelection> {
        let authorization_list =
            convert_all(self.authorization_list, RawAuthorizationSelection::into_selection)?;

        let sel = TransactionSelection::default();
        let sel = apply(sel, PredicateKey::From, text(self.from))?;
        let sel = apply(sel, PredicateKey::To, text(self.to))?;
        let sel = apply(sel, PredicateKey::Sighash, text(self.sighash))?;
        let sel = apply(
            sel,
            PredicateKey::Status,
            self.status.map(|s| PredicateValues::Numbers(vec![s])),
        )?;
        let sel = apply(sel, PredicateKey::Kind, numbers(self.kind))?;
        let sel = apply(
            sel,
            PredicateKey::ContractAddress,
            text(self.contract_address),
        )?;
        apply(
            sel,
            PredicateKey::AuthorizationList,
            authorization_list.map(PredicateValues::Authorizations),
        )
    }
}

impl RawTraceSelection {
    fn into_selection(self) -> Result<TraceSelection> {
        let sel = TraceSelection::default();
        let sel = apply(sel, PredicateKey::From, text(self.from))?;
        let sel = apply(sel, PredicateKey::To, text(self.to))?;
        let sel = apply(sel, PredicateKey::Address, text(self.address))?;
        let sel = apply(sel, PredicateKey::CallType, text(self.call_type))?;
        let sel = apply(sel, PredicateKey::RewardType, text(self.reward_type))?;
        let sel = apply(sel, PredicateKey::Kind, text(self.kind))?;
        apply(sel, PredicateKey::Sighash, text(self.sighash))
    }
}

impl RawFieldSelection {
    fn into_selection(self) -> Result<FieldSelection> {
        FieldSelection::default()
            .with_fields(EntityKind::Block, &self.block)?
            .with_fields(EntityKind::Transaction, &self.transaction)?
            .with_fields(EntityKind::Log, &self.log)?
            .with_fields(EntityKind::Trace, &self.trace)
    }
}

impl RawQuery {
    fn into_document(self) -> Result<QueryDocument> {
        let mut doc = QueryDocument::default()
            .set_block_range(self.from_block, self.to_block)?
            .set_cap(EntityKind::Block, self.max_num_blocks)?
            .set_cap(EntityKind::Transaction, self.max_num_transactions)?
            .set_cap(EntityKind::Log, self.max_num_logs)?
            .set_cap(EntityKind::Trace, self.max_num_traces)?
            .set_include_all_blocks(self.include_all_blocks)
            .set_join_mode(self.join_mode);

        doc.field_selection = self.field_selection.into_selection()?;
        // assigned directly so a present but empty list survives until validation
        doc.logs = convert_all(self.logs, RawLogSelection::into_selection)?;
        doc.transactions = convert_all(self.transactions, RawTransactionSelection::into_selection)?;
        doc.traces = convert_all(self.traces, RawTraceSelection::into_selection)?;
        doc.blocks = convert_all(self.blocks, RawBlockSelection::into_selection)?;

        let findings = doc.validate();
        if findings.has_errors() {
            return Err(Error::Invalid(findings));
        }
        Ok(doc)
    }
}
