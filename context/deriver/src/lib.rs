use std::str::FromStr;

use pwup_protocol::ckb_sdk::{Address, AddressPayload, NetworkType};
use pwup_protocol::ckb_types::bytes::{BufMut, Bytes, BytesMut};
use pwup_protocol::ckb_types::core::ScriptHashType;
use pwup_protocol::ckb_types::packed::Script;
use pwup_protocol::ckb_types::prelude::{Builder, Entity, Pack};
use pwup_protocol::types::account::Account;
use pwup_protocol::types::context::AddressInfo;
use pwup_protocol::{log, MigrationDeps, PwResult, H256};

mod error;
pub use error::DeriverError;

#[cfg(test)]
mod tests;

/// Omni-Lock auth flag of an Ethereum account
const OMNI_FLAG_ETHEREUM: u8 = 0x01;
/// Omni-Lock args flag without any optional mode, i.e. the owner itself
const OMNI_FLAG_OWNER: u8 = 0x00;

/// Maps accounts to the PW-Lock (source) and Omni-Lock (destination) scripts
/// of one network. Stateless apart from the network constants.
#[derive(Clone, Debug)]
pub struct AddressDeriver {
    network: NetworkType,
    source_code_hash: H256,
    source_hash_type: ScriptHashType,
    destination_code_hash: H256,
    destination_hash_type: ScriptHashType,
}

impl AddressDeriver {
    pub fn new(deps: &MigrationDeps) -> Self {
        AddressDeriver {
            network: deps.network,
            source_code_hash: deps.source_code_hash.clone(),
            source_hash_type: deps.source_hash_type,
            destination_code_hash: deps.destination_code_hash.clone(),
            destination_hash_type: deps.destination_hash_type,
        }
    }

    pub fn network(&self) -> NetworkType {
        self.network
    }

    pub fn derive_source_lock(&self, account: &Account) -> Script {
        build_script(
            &self.source_code_hash,
            self.source_hash_type,
            Bytes::copy_from_slice(account.as_bytes()),
        )
    }

    pub fn derive_destination_lock(&self, account: &Account) -> Script {
        let mut args = BytesMut::with_capacity(account.as_bytes().len() + 2);
        args.put_u8(OMNI_FLAG_ETHEREUM);
        args.put_slice(account.as_bytes());
        args.put_u8(OMNI_FLAG_OWNER);
        build_script(
            &self.destination_code_hash,
            self.destination_hash_type,
            args.freeze(),
        )
    }

    /// Full-format (ckb2021) address of `lock` on the configured network.
    pub fn to_address(&self, lock: &Script) -> PwResult<String> {
        let hash_type = ScriptHashType::try_from(lock.hash_type())
            .map_err(|_| DeriverError::UnsupportedHashType(lock.hash_type().as_slice()[0]))?;
        let payload = AddressPayload::new_full(hash_type, lock.code_hash(), lock.args().raw_data());
        Ok(Address::new(self.network, payload, true).to_string())
    }

    pub fn to_lock_script(&self, address: &str) -> PwResult<Script> {
        let ckb_address = Address::from_str(address)
            .map_err(|err| DeriverError::InvalidAddress(address.into(), err.to_string()))?;
        if ckb_address.network() != self.network {
            return Err(DeriverError::InvalidAddress(
                address.into(),
                format!("expect {} address", self.network.to_prefix()),
            )
            .into());
        }
        Ok(ckb_address.payload().into())
    }

    pub fn is_source_family(&self, lock: &Script) -> bool {
        same_family(lock, &self.source_code_hash, self.source_hash_type)
    }

    pub fn is_destination_family(&self, lock: &Script) -> bool {
        same_family(lock, &self.destination_code_hash, self.destination_hash_type)
    }

    pub fn address_info(&self, account: &Account) -> PwResult<AddressInfo> {
        let source_lock = self.derive_source_lock(account);
        let destination_lock = self.derive_destination_lock(account);
        let source_address = self.to_address(&source_lock)?;
        let destination_address = self.to_address(&destination_lock)?;
        log::debug!(
            "account {} => pw-lock {}, omni-lock {}",
            account,
            source_address,
            destination_address
        );
        Ok(AddressInfo {
            account: *account,
            source_lock,
            source_address,
            destination_lock,
            destination_address,
        })
    }
}

fn build_script(code_hash: &H256, hash_type: ScriptHashType, args: Bytes) -> Script {
    Script::new_builder()
        .code_hash(code_hash.pack())
        .hash_type(hash_type.into())
        .args(args.pack())
        .build()
}

fn same_family(lock: &Script, code_hash: &H256, hash_type: ScriptHashType) -> bool {
    let hash_type: pwup_protocol::ckb_types::packed::Byte = hash_type.into();
    lock.code_hash().as_slice() == code_hash.as_bytes()
        && lock.hash_type().as_slice() == hash_type.as_slice()
}
