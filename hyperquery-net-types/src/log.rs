use crate::catalog::{CatalogField, EntityKind};
use crate::predicate::{hex_list, topic_slots, PredicateKey, PredicateValues};
use crate::selection::{unsupported, Selection};
use crate::validate::{check_list, check_not_empty, check_unique, Findings};
use crate::Result;
use arrayvec::ArrayVec;
use hyperquery_format::{Address, LogArgument};
use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct LogSelection {
    /// Address of the contract, any logs that has any of these addresses will be returned.
    /// Absent means match all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,
    /// Topics to match, each member of the top level array is another array, if the nth topic matches any
    ///  topic specified in nth element of topics, the log will be returned. An empty slot matches any topic
    ///  in that position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<ArrayVec<Vec<LogArgument>, 4>>,
}

impl Selection for LogSelection {
    const NAME: &'static str = "log";
    const PREDICATES: &'static [PredicateKey] = &[PredicateKey::Address, PredicateKey::Topics];

    fn has_predicate(&self, key: PredicateKey) -> bool {
        match key {
            PredicateKey::Address => self.address.is_some(),
            PredicateKey::Topics => self.topics.is_some(),
            _ => false,
        }
    }

    fn set_predicate(&mut self, key: PredicateKey, values: PredicateValues) -> Result<()> {
        match key {
            PredicateKey::Address => self.address = Some(hex_list(key, values)?),
            PredicateKey::Topics => self.topics = Some(topic_slots(key, values)?),
            _ => return Err(unsupported::<Self>(key)),
        }
        Ok(())
    }

    fn clear_predicate(&mut self, key: PredicateKey) {
        match key {
            PredicateKey::Address => self.address = None,
            PredicateKey::Topics => self.topics = None,
            _ => (),
        }
    }

    fn collect_findings(&self, path: &str, findings: &mut Findings) {
        check_list(findings, path, PredicateKey::Address, self.address.as_deref());
        check_not_empty(findings, path, PredicateKey::Topics, self.topics.as_deref());
        for (i, slot) in self.topics.iter().flatten().enumerate() {
            check_unique(findings, &format!("{path}.{}[{i}]", PredicateKey::Topics), slot);
        }
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
pub enum LogField {
    Removed,
    LogIndex,
    TransactionIndex,
    TransactionHash,
    BlockHash,
    BlockNumber,
    Address,
    Data,
    Topic0,
    Topic1,
    Topic2,
    Topic3,
}

impl CatalogField for LogField {
    const ENTITY: EntityKind = EntityKind::Log;
}
