use pwup_config::preset;
use pwup_protocol::ckb_types::core::ScriptHashType;
use pwup_protocol::ckb_types::prelude::{Entity, Unpack};
use pwup_protocol::types::account::Account;
use pwup_protocol::types::config::Network;
use pwup_protocol::types::error::ErrorType;
use pwup_protocol::{MigrationDeps, TestVars};

use crate::AddressDeriver;

fn deriver(network: Network) -> AddressDeriver {
    AddressDeriver::new(&MigrationDeps::from(&preset(network)))
}

fn owner() -> Account {
    TestVars::OWNER_ACCOUNT.parse().unwrap()
}

#[test]
fn source_lock_args_are_account() {
    let deriver = deriver(Network::Aggron4);
    let lock = deriver.derive_source_lock(&owner());
    let args: Vec<u8> = lock.args().unpack();
    assert_eq!(args, owner().as_bytes());
    assert!(deriver.is_source_family(&lock));
    assert!(!deriver.is_destination_family(&lock));
}

#[test]
fn destination_lock_args_are_flagged_account() {
    let deriver = deriver(Network::Aggron4);
    let lock = deriver.derive_destination_lock(&owner());
    let args: Vec<u8> = lock.args().unpack();
    assert_eq!(args.len(), 22);
    assert_eq!(args[0], 0x01);
    assert_eq!(&args[1..21], owner().as_bytes());
    assert_eq!(args[21], 0x00);
    assert!(deriver.is_destination_family(&lock));
    let hash_type: pwup_protocol::ckb_types::packed::Byte = ScriptHashType::Type.into();
    assert_eq!(lock.hash_type().as_slice(), hash_type.as_slice());
}

#[test]
fn address_round_trip() {
    for network in [Network::Aggron4, Network::Lina] {
        let deriver = deriver(network);
        for account in [TestVars::OWNER_ACCOUNT, TestVars::OTHER_ACCOUNT] {
            let account: Account = account.parse().unwrap();
            let source = deriver.derive_source_lock(&account);
            let destination = deriver.derive_destination_lock(&account);
            let source_address = deriver.to_address(&source).unwrap();
            let destination_address = deriver.to_address(&destination).unwrap();
            assert_eq!(
                deriver.to_lock_script(&source_address).unwrap().as_slice(),
                source.as_slice()
            );
            assert_eq!(
                deriver
                    .to_lock_script(&destination_address)
                    .unwrap()
                    .as_slice(),
                destination.as_slice()
            );
        }
    }
}

#[test]
fn address_prefix_follows_network() {
    let testnet = deriver(Network::Aggron4);
    let mainnet = deriver(Network::Lina);
    let info = testnet.address_info(&owner()).unwrap();
    assert!(info.source_address.starts_with("ckt1"));
    assert!(info.destination_address.starts_with("ckt1"));
    let info = mainnet.address_info(&owner()).unwrap();
    assert!(info.source_address.starts_with("ckb1"));
}

#[test]
fn distinct_accounts_distinct_addresses() {
    let deriver = deriver(Network::Aggron4);
    let owner = deriver.address_info(&owner()).unwrap();
    let other = deriver
        .address_info(&TestVars::OTHER_ACCOUNT.parse().unwrap())
        .unwrap();
    assert_ne!(owner.source_address, other.source_address);
    assert_ne!(owner.destination_address, other.destination_address);
    assert_ne!(owner.source_address, owner.destination_address);
}

#[test]
fn reject_garbage_address() {
    let err = deriver(Network::Aggron4)
        .to_lock_script("ckt1-not-an-address")
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Deriver);
}

#[test]
fn reject_address_of_other_network() {
    let mainnet_address = deriver(Network::Lina)
        .address_info(&owner())
        .unwrap()
        .destination_address;
    let err = deriver(Network::Aggron4)
        .to_lock_script(&mainnet_address)
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Deriver);
}
