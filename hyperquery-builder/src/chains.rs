//! Chains a query can be sent to, as published by the chain list service.
use std::path::Path;

use anyhow::{Context, Result};
use hyperquery_net_types::{fields_for, EntityKind};
use serde::{Deserialize, Serialize};

/// Feature flag of chains that serve trace data.
pub const TRACES_FEATURE: &str = "TRACES";

/// A chain served by HyperSync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    /// Name used in the chain's HyperSync url, e.g. `"eth"`.
    pub name: String,
    /// Service tier label, e.g. `"STONE"`. Not interpreted here.
    pub tier: String,
    /// Chain id, unique within the list.
    pub chain_id: u64,
    /// `"evm"` or `"fuel"`.
    pub ecosystem: String,
    /// Optional data the chain serves on top of blocks, transactions and logs.
    pub additional_features: Option<Vec<String>>,
}

impl Chain {
    /// Feature names are compared case-insensitively.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.additional_features
            .iter()
            .flatten()
            .any(|f| f.eq_ignore_ascii_case(feature))
    }

    /// Whether trace data can be queried on this chain.
    pub fn supports_traces(&self) -> bool {
        self.has_feature(TRACES_FEATURE)
    }

    /// Selectable fields per entity kind. The catalog is the same for every ecosystem.
    pub fn catalog(&self) -> Vec<(EntityKind, Vec<&'static str>)> {
        EntityKind::all()
            .into_iter()
            .map(|kind| (kind, fields_for(kind)))
            .collect()
    }
}

#[derive(Deserialize)]
struct RawChain {
    name: Option<String>,
    tier: Option<String>,
    chain_id: Option<u64>,
    ecosystem: Option<String>,
    additional_features: Option<Vec<String>>,
}

fn infer_features(name: &str) -> Option<Vec<String>> {
    name.ends_with("-traces")
        .then(|| vec![TRACES_FEATURE.to_owned()])
}

impl RawChain {
    fn normalize(self) -> Option<Chain> {
        let name = self.name.filter(|n| !n.is_empty())?;
        let chain_id = self.chain_id.filter(|&id| id != 0)?;
        let additional_features = self
            .additional_features
            .or_else(|| infer_features(&name));

        Some(Chain {
            tier: self.tier.unwrap_or_else(|| "STONE".to_owned()),
            ecosystem: self.ecosystem.unwrap_or_else(|| "evm".to_owned()),
            name,
            chain_id,
            additional_features,
        })
    }
}

/// Normalised chain records sorted by name, ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChainList(Vec<Chain>);

impl ChainList {
    /// Parses a JSON array of chain records. Entries without a name or chain id are dropped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawChain> = serde_json::from_str(json).context("parse chain list")?;

        let mut chains = Vec::with_capacity(raw.len());
        for (i, entry) in raw.into_iter().enumerate() {
            match entry.normalize() {
                Some(chain) => chains.push(chain),
                None => log::warn!("dropping chain list entry {i} without a name or chain id"),
            }
        }
        chains.sort_by_cached_key(|c| c.name.to_lowercase());

        Ok(Self(chains))
    }

    /// Reads a chain list from a JSON file, see [`ChainList::from_json`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read chain list {}", path.display()))?;
        Self::from_json(&data)
    }

    /// Looks up a chain by id.
    pub fn get(&self, chain_id: u64) -> Option<&Chain> {
        self.0.iter().find(|c| c.chain_id == chain_id)
    }

    /// Looks up a chain by name.
    pub fn by_name(&self, name: &str) -> Option<&Chain> {
        self.0.iter().find(|c| c.name == name)
    }

    /// Chains in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Chain> {
        self.0.iter()
    }

    /// Number of chains.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the list has no chains.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
