use std::str::FromStr;

use ckb_jsonrpc_types::{DepType as JsonDepType, Script as JsonScript, ScriptHashType as JsonHashType};
use ckb_sdk::NetworkType;
use ckb_types::core::{DepType, ScriptHashType};
use ckb_types::packed::{CellDep, OutPoint};
use ckb_types::prelude::{Builder, Entity, Pack};
use ckb_types::H256;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use crate::types::token::TokenDescriptor;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// testnet
    Aggron4,
    /// mainnet
    Lina,
}

impl Network {
    pub fn network_type(&self) -> NetworkType {
        match self {
            Network::Aggron4 => NetworkType::Testnet,
            Network::Lina => NetworkType::Mainnet,
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aggron4" | "testnet" => Ok(Network::Aggron4),
            "lina" | "mainnet" => Ok(Network::Lina),
            _ => Err(format!("unknown network type: {}", s)),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Constructor, Debug)]
pub struct PwScriptConfig {
    pub code_hash: H256,
    pub hash_type: JsonHashType,
}

impl PwScriptConfig {
    pub fn hash_type(&self) -> ScriptHashType {
        self.hash_type.clone().into()
    }
}

#[derive(Deserialize, Serialize, Clone, Constructor, Debug)]
pub struct PwCellDep {
    pub transaction_hash: H256,
    pub cell_index: u32,
    pub dep_type: JsonDepType,
}

impl From<&PwCellDep> for CellDep {
    fn from(cell_dep: &PwCellDep) -> Self {
        let dep_type: DepType = cell_dep.dep_type.clone().into();
        CellDep::new_builder()
            .out_point(OutPoint::new(
                cell_dep.transaction_hash.pack(),
                cell_dep.cell_index,
            ))
            .dep_type(dep_type.into())
            .build()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct PwTokenConfig {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub script: JsonScript,
}

impl From<&PwTokenConfig> for TokenDescriptor {
    fn from(token: &PwTokenConfig) -> Self {
        TokenDescriptor::new(
            token.script.clone().into(),
            token.symbol.clone(),
            token.name.clone(),
            token.decimals,
        )
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct PwConfig {
    pub network: Network,
    pub ckb_url: String,
    pub ckb_indexer_url: String,
    /// PW-Lock
    pub source_lock: PwScriptConfig,
    /// Omni-Lock
    pub destination_lock: PwScriptConfig,
    /// Appended to every migration transaction in this exact order.
    pub cell_deps: Vec<PwCellDep>,
    /// Flat transaction fee in shannons.
    pub fee: u64,
    /// Extra shannons added to every migrated cell.
    pub rebase_surcharge: u64,
    #[serde(default)]
    pub tokens: Vec<PwTokenConfig>,
}

/// Packed, read-only view of a [`PwConfig`] handed to every component at
/// construction. Switching networks means building a new one.
#[derive(Clone, Debug)]
pub struct MigrationDeps {
    pub network: NetworkType,
    pub source_code_hash: H256,
    pub source_hash_type: ScriptHashType,
    pub destination_code_hash: H256,
    pub destination_hash_type: ScriptHashType,
    pub cell_deps: Vec<CellDep>,
    pub fee: u64,
    pub rebase_surcharge: u64,
    pub catalog: Vec<TokenDescriptor>,
}

impl From<&PwConfig> for MigrationDeps {
    fn from(config: &PwConfig) -> Self {
        MigrationDeps {
            network: config.network.network_type(),
            source_code_hash: config.source_lock.code_hash.clone(),
            source_hash_type: config.source_lock.hash_type(),
            destination_code_hash: config.destination_lock.code_hash.clone(),
            destination_hash_type: config.destination_lock.hash_type(),
            cell_deps: config.cell_deps.iter().map(Into::into).collect(),
            fee: config.fee,
            rebase_surcharge: config.rebase_surcharge,
            catalog: config.tokens.iter().map(Into::into).collect(),
        }
    }
}
