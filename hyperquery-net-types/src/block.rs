use crate::catalog::{CatalogField, EntityKind};
use crate::predicate::{hex_list, PredicateKey, PredicateValues};
use crate::selection::{unsupported, Selection};
use crate::validate::{check_list, Findings};
use crate::Result;
use hyperquery_format::{Address, Hash};
use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BlockSelection {
    /// Hash of a block, any blocks that have one of these hashes will be returned.
    /// Absent means match all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<Vec<Hash>>,
    /// Miner address of a block, any blocks that have one of these miners will be returned.
    /// Absent means match all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miner: Option<Vec<Address>>,
}

impl Selection for BlockSelection {
    const NAME: &'static str = "block";
    const PREDICATES: &'static [PredicateKey] = &[PredicateKey::Hash, PredicateKey::Miner];

    fn has_predicate(&self, key: PredicateKey) -> bool {
        match key {
            PredicateKey::Hash => self.hash.is_some(),
            PredicateKey::Miner => self.miner.is_some(),
            _ => false,
        }
    }

    fn set_predicate(&mut self, key: PredicateKey, values: PredicateValues) -> Result<()> {
        match key {
            PredicateKey::Hash => self.hash = Some(hex_list(key, values)?),
            PredicateKey::Miner => self.miner = Some(hex_list(key, values)?),
            _ => return Err(unsupported::<Self>(key)),
        }
        Ok(())
    }

    fn clear_predicate(&mut self, key: PredicateKey) {
        match key {
            PredicateKey::Hash => self.hash = None,
            PredicateKey::Miner => self.miner = None,
            _ => (),
        }
    }

    fn collect_findings(&self, path: &str, findings: &mut Findings) {
        check_list(findings, path, PredicateKey::Hash, self.hash.as_deref());
        check_list(findings, path, PredicateKey::Miner, self.miner.as_deref());
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
pub enum BlockField {
    Number,
    Hash,
    ParentHash,
    Nonce,
    Sha3Uncles,
    LogsBloom,
    TransactionsRoot,
    StateRoot,
    ReceiptsRoot,
    Miner,
    Difficulty,
    TotalDifficulty,
    ExtraData,
    Size,
    GasLimit,
    GasUsed,
    Timestamp,
    Uncles,
    BaseFeePerGas,
    BlobGasUsed,
    ExcessBlobGas,
    ParentBeaconBlockRoot,
    WithdrawalsRoot,
    Withdrawals,
    L1BlockNumber,
    SendCount,
    SendRoot,
    MixHash,
}

impl CatalogField for BlockField {
    const ENTITY: EntityKind = EntityKind::Block;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use hex_literal::hex;

    #[test]
    fn test_miner_collapses_case() {
        let sel = BlockSelection::default()
            .with_predicate(
                PredicateKey::Miner,
                PredicateValues::text([
                    "0x95222290DD7278Aa3Ddd389Cc1E1d165CC4BAfe5",
                    "0x95222290dd7278aa3ddd389cc1e1d165cc4bafe5",
                ]),
            )
            .unwrap();

        assert_eq!(
            sel.miner,
            Some(vec![Address::from(hex!(
                "95222290dd7278aa3ddd389cc1e1d165cc4bafe5"
            ))])
        );
        assert!(sel.hash.is_none());
    }

    #[test]
    fn test_rejects_log_predicate() {
        let err = BlockSelection::default()
            .with_predicate(PredicateKey::Topics, PredicateValues::TopicSlots(vec![]))
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnknownPredicate {
                selection: "block",
                predicate: "topics".to_owned()
            }
        );
    }

    #[test]
    fn test_short_hash_is_malformed() {
        let err = BlockSelection::default()
            .with_predicate(PredicateKey::Hash, PredicateValues::text(["0x1234"]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedHexValue { ref field, ref value, .. } if field == "hash" && value == "0x1234"
        ));
    }
}
