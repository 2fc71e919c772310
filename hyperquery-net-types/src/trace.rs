use crate::catalog::{CatalogField, EntityKind};
use crate::predicate::{hex_list, label_list, PredicateKey, PredicateValues};
use crate::selection::{unsupported, Selection};
use crate::types::Sighash;
use crate::validate::{check_labels, check_list, Findings};
use crate::Result;
use hyperquery_format::Address;
use serde::{Deserialize, Serialize};

/// Call type, reward type and kind labels are compared lower-cased, e.g. `"delegatecall"`,
/// `"block"` or `"create"`.
#[derive(Default, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TraceSelection {
    #[serde(rename = "from_", skip_serializing_if = "Option::is_none")]
    pub from: Option<Vec<Address>>,
    #[serde(rename = "to_", skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<Address>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sighash: Option<Vec<Sighash>>,
}

impl Selection for TraceSelection {
    const NAME: &'static str = "trace";
    const PREDICATES: &'static [PredicateKey] = &[
        PredicateKey::From,
        PredicateKey::To,
        PredicateKey::Address,
        PredicateKey::CallType,
        PredicateKey::RewardType,
        PredicateKey::Kind,
        PredicateKey::Sighash,
    ];

    fn has_predicate(&self, key: PredicateKey) -> bool {
        match key {
            PredicateKey::From => self.from.is_some(),
            PredicateKey::To => self.to.is_some(),
            PredicateKey::Address => self.address.is_some(),
            PredicateKey::CallType => self.call_type.is_some(),
            PredicateKey::RewardType => self.reward_type.is_some(),
            PredicateKey::Kind => self.kind.is_some(),
            PredicateKey::Sighash => self.sighash.is_some(),
            _ => false,
        }
    }

    fn set_predicate(&mut self, key: PredicateKey, values: PredicateValues) -> Result<()> {
        match key {
            PredicateKey::From => self.from = Some(hex_list(key, values)?),
            PredicateKey::To => self.to = Some(hex_list(key, values)?),
            PredicateKey::Address => self.address = Some(hex_list(key, values)?),
            PredicateKey::CallType => self.call_type = Some(label_list(key, values)?),
            PredicateKey::RewardType => self.reward_type = Some(label_list(key, values)?),
            PredicateKey::Kind => self.kind = Some(label_list(key, values)?),
            PredicateKey::Sighash => self.sighash = Some(hex_list(key, values)?),
            _ => return Err(unsupported::<Self>(key)),
        }
        Ok(())
    }

    fn clear_predicate(&mut self, key: PredicateKey) {
        match key {
            PredicateKey::From => self.from = None,
            PredicateKey::To => self.to = None,
            PredicateKey::Address => self.address = None,
            PredicateKey::CallType => self.call_type = None,
            PredicateKey::RewardType => self.reward_type = None,
            PredicateKey::Kind => self.kind = None,
            PredicateKey::Sighash => self.sighash = None,
            _ => (),
        }
    }

    fn collect_findings(&self, path: &str, findings: &mut Findings) {
        check_list(findings, path, PredicateKey::From, self.from.as_deref());
        check_list(findings, path, PredicateKey::To, self.to.as_deref());
        check_list(findings, path, PredicateKey::Address, self.address.as_deref());
        check_labels(findings, path, PredicateKey::CallType, self.call_type.as_deref());
        check_labels(findings, path, PredicateKey::RewardType, self.reward_type.as_deref());
        check_labels(findings, path, PredicateKey::Kind, self.kind.as_deref());
        check_list(findings, path, PredicateKey::Sighash, self.sighash.as_deref());
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::EnumIter,
    strum_macros::IntoStaticStr,
)]
pub enum TraceField {
    From,
    To,
    CallType,
    Gas,
    Input,
    Init,
    Value,
    Author,
    RewardType,
    BlockHash,
    BlockNumber,
    Address,
    Code,
    GasUsed,
    Output,
    Subtraces,
    TraceAddress,
    TransactionHash,
    TransactionPosition,
    Kind,
    Error,
}

impl CatalogField for TraceField {
    const ENTITY: EntityKind = EntityKind::Trace;
}
