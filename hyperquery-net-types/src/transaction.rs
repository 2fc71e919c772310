use crate::catalog::{CatalogField, EntityKind};
use crate::predicate::{
    authorizations, hex_list, number_list, single_status, PredicateKey, PredicateValues,
};
use crate::selection::{unsupported, Selection};
use crate::types::Sighash;
use crate::validate::{check_list, check_not_empty, Findings};
use crate::{Error, Result};
use hyperquery_format::{Address, TransactionStatus};
use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationSelection {
    /// List of chain ids to match in the transaction authorizationList
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Vec<u64>>,
    /// List of addresses to match in the transaction authorizationList
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,
}

impl Selection for AuthorizationSelection {
    const NAME: &'static str = "authorization";
    const PREDICATES: &'static [PredicateKey] = &[PredicateKey::ChainId, PredicateKey::Address];

    fn has_predicate(&self, key: PredicateKey) -> bool {
        match key {
            PredicateKey::ChainId => self.chain_id.is_some(),
            PredicateKey::Address => self.address.is_some(),
            _ => false,
        }
    }

    fn set_predicate(&mut self, key: PredicateKey, values: PredicateValues) -> Result<()> {
        match key {
            PredicateKey::ChainId => self.chain_id = Some(number_list(key, values, u64::MAX)?),
            PredicateKey::Address => self.address = Some(hex_list(key, values)?),
            _ => return Err(unsupported::<Self>(key)),
        }
        Ok(())
    }

    fn clear_predicate(&mut self, key: PredicateKey) {
        match key {
            PredicateKey::ChainId => self.chain_id = None,
            PredicateKey::Address => self.address = None,
            _ => (),
        }
    }

    fn collect_findings(&self, path: &str, findings: &mut Findings) {
        check_list(findings, path, PredicateKey::ChainId, self.chain_id.as_deref());
        check_list(findings, path, PredicateKey::Address, self.address.as_deref());
    }
}

#[derive(Default, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSelection {
    /// Address the transaction should originate from. If transaction.from matches any of these, the transaction
    /// will be returned. Keep in mind that this has an and relationship with to filter, so each transaction should
    /// match both of them. Absent means match all.
    #[serde(rename = "from_", skip_serializing_if = "Option::is_none")]
    pub from: Option<Vec<Address>>,
    /// Address the transaction should go to. If transaction.to matches any of these, the transaction will
    /// be returned. Keep in mind that this has an and relationship with from filter, so each transaction should
    /// match both of them. Absent means match all.
    #[serde(rename = "to_", skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<Address>>,
    /// If first 4 bytes of transaction input matches any of these, transaction will be returned. Absent means match all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sighash: Option<Vec<Sighash>>,
    /// If transaction.status matches this value, the transaction will be returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    /// If transaction.type matches any of these values, the transaction will be returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<Vec<u8>>,
    /// If transaction.contract_address matches any of these values, the transaction will be returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Vec<Address>>,
    /// List of authorizations from eip-7702 transactions, the query will return transactions that match any of these selections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_list: Option<Vec<AuthorizationSelection>>,
}

impl Selection for TransactionSelection {
    const NAME: &'static str = "transaction";
    const PREDICATES: &'static [PredicateKey] = &[
        PredicateKey::From,
        PredicateKey::To,
        PredicateKey::Sighash,
        PredicateKey::Status,
        PredicateKey::Kind,
        PredicateKey::ContractAddress,
        PredicateKey::AuthorizationList,
    ];

    fn has_predicate(&self, key: PredicateKey) -> bool {
        match key {
            PredicateKey::From => self.from.is_some(),
            PredicateKey::To => self.to.is_some(),
            PredicateKey::Sighash => self.sighash.is_some(),
            PredicateKey::Status => self.status.is_some(),
            PredicateKey::Kind => self.kind.is_some(),
            PredicateKey::ContractAddress => self.contract_address.is_some(),
            PredicateKey::AuthorizationList => self.authorization_list.is_some(),
            _ => false,
        }
    }

    fn set_predicate(&mut self, key: PredicateKey, values: PredicateValues) -> Result<()> {
        match key {
            PredicateKey::From => self.from = Some(hex_list(key, values)?),
            PredicateKey::To => self.to = Some(hex_list(key, values)?),
            PredicateKey::Sighash => self.sighash = Some(hex_list(key, values)?),
            PredicateKey::Status => self.status = Some(single_status(key, values)?),
            PredicateKey::Kind => {
                let kinds = number_list(key, values, u8::MAX.into())?
                    .into_iter()
                    .map(|k| {
                        u8::try_from(k).map_err(|e| Error::InvalidValue {
                            field: key.as_str().to_owned(),
                            value: k.to_string(),
                            reason: e.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                self.kind = Some(kinds);
            }
            PredicateKey::ContractAddress => self.contract_address = Some(hex_list(key, values)?),
            PredicateKey::AuthorizationList => {
                self.authorization_list = Some(authorizations(key, values)?)
            }
            _ => return Err(unsupported::<Self>(key)),
        }
        Ok(())
    }

    fn clear_predicate(&mut self, key: PredicateKey) {
        match key {
            PredicateKey::From => self.from = None,
            PredicateKey::To => self.to = None,
            PredicateKey::Sighash => self.sighash = None,
            PredicateKey::Status => self.status = None,
            PredicateKey::Kind => self.kind = None,
            PredicateKey::ContractAddress => self.contract_address = None,
            PredicateKey::AuthorizationList => self.authorization_list = None,
            _ => (),
        }
    }

    fn collect_findings(&self, path: &str, findings: &mut Findings) {
        check_list(findings, path, PredicateKey::From, self.from.as_deref());
        check_list(findings, path, PredicateKey::To, self.to.as_deref());
        check_list(findings, path, PredicateKey::Sighash, self.sighash.as_deref());
        check_list(findings, path, PredicateKey::Kind, self.kind.as_deref());
        check_list(
            findings,
            path,
            PredicateKey::ContractAddress,
            self.contract_address.as_deref(),
        );
        check_not_empty(
            findings,
            path,
            PredicateKey::AuthorizationList,
            self.authorization_list.as_deref(),
        );

        for (i, auth) in self.authorization_list.iter().flatten().enumerate() {
            auth.collect_findings(&format!("{path}.authorizationList[{i}]"), findings);
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
pub enum TransactionField {
    BlockHash,
    BlockNumber,
    From,
    Gas,
    GasPrice,
    Hash,
    Input,
    Nonce,
    To,
    TransactionIndex,
    Value,
    V,
    R,
    S,
    YParity,
    MaxPriorityFeePerGas,
    MaxFeePerGas,
    ChainId,
    AccessList,
    AuthorizationList,
    MaxFeePerBlobGas,
    BlobVersionedHashes,
    CumulativeGasUsed,
    EffectiveGasPrice,
    GasUsed,
    ContractAddress,
    LogsBloom,
    Kind,
    Root,
    Status,
    L1Fee,
    L1GasPrice,
    L1GasUsed,
    L1FeeScalar,
    GasUsedForL1,
}

impl CatalogField for TransactionField {
    const ENTITY: EntityKind = EntityKind::Transaction;
}
