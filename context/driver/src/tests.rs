use pwup_config::preset;
use pwup_context_assembler::AssemblerImpl;
use pwup_context_deriver::AddressDeriver;
use pwup_protocol::ckb_types::bytes::Bytes;
use pwup_protocol::ckb_types::core::TransactionView;
use pwup_protocol::ckb_types::packed::{self, WitnessArgs};
use pwup_protocol::ckb_types::prelude::{Builder, Entity, Pack, Unpack};
use pwup_protocol::mock::{keccak256, recover_account, token_cell, token_data, MockCkbClient, TestSigner};
use pwup_protocol::traits::{Assembler, Driver};
use pwup_protocol::types::assembler::{AssembledTransfer, SIGNATURE_LEN};
use pwup_protocol::types::config::Network;
use pwup_protocol::types::error::ErrorType;
use pwup_protocol::types::token::TokenGroup;
use pwup_protocol::{tokio, MigrationDeps, TestVars::*, H256};

use crate::{normalize_signature, DriverImpl};

async fn assemble(rpc: &MockCkbClient, signer: &TestSigner) -> AssembledTransfer {
    let deps = MigrationDeps::from(&preset(Network::Aggron4));
    let info = AddressDeriver::new(&deps)
        .address_info(&signer.account())
        .unwrap();
    let usdc = deps.catalog[0].clone();
    let cell = token_cell(
        0,
        &info.source_lock,
        &usdc.type_script,
        20_000_000_000,
        token_data(500),
    );
    AssemblerImpl::new(rpc, &deps)
        .build_transfer(
            &[TokenGroup::new(usdc, cell, 500)],
            &info.source_lock,
            &info.destination_address,
            None,
        )
        .await
        .expect("assemble")
}

fn witness_lock(tx: &TransactionView) -> Vec<u8> {
    let witness: Bytes = tx.witnesses().get(0).unwrap().unpack();
    let witness_args = WitnessArgs::from_slice(&witness).expect("witness args");
    let lock: Bytes = witness_args.lock().to_opt().unwrap().unpack();
    lock.to_vec()
}

fn signature(v: u8) -> Vec<u8> {
    let mut signature = vec![0x11u8; 32];
    signature.extend_from_slice(&[0x22u8; 32]);
    signature.push(v);
    signature
}

#[test]
fn normalize_recovery_id() {
    assert_eq!(normalize_signature(&signature(27)).unwrap()[64], 0);
    assert_eq!(normalize_signature(&signature(28)).unwrap()[64], 1);
    assert_eq!(normalize_signature(&signature(0)).unwrap()[64], 0);
    assert_eq!(normalize_signature(&signature(1)).unwrap()[64], 1);
    assert_eq!(normalize_signature(&signature(27)).unwrap()[..64], signature(27)[..64]);
}

#[tokio::test]
async fn embed_is_idempotent_on_v() {
    let rpc = MockCkbClient::new();
    let signer = TestSigner::new(*OWNER_SECRET_KEY);
    let transfer = assemble(&rpc, &signer).await;
    let driver = DriverImpl::new(&rpc);

    let with_27 = driver
        .embed_signature(transfer.tx.clone(), &signature(27))
        .unwrap();
    let with_0 = driver
        .embed_signature(transfer.tx.clone(), &signature(0))
        .unwrap();
    assert_eq!(with_27.data().as_slice(), with_0.data().as_slice());
    assert_eq!(witness_lock(&with_27), signature(0));

    // the witness is outside of the transaction hash
    assert_eq!(with_27.hash().as_slice(), transfer.tx.hash().as_slice());
    assert_eq!(with_27.witnesses().len(), 1);
}

#[tokio::test]
async fn reject_wrong_signature_length() {
    let rpc = MockCkbClient::new();
    let signer = TestSigner::new(*OWNER_SECRET_KEY);
    let transfer = assemble(&rpc, &signer).await;
    let driver = DriverImpl::new(&rpc);
    for len in [0usize, 64, 66, 130] {
        let err = driver
            .embed_signature(transfer.tx.clone(), &vec![27u8; len])
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Driver);
        assert_eq!(
            err.message(),
            format!("Signature must be 65 bytes, got {}", len)
        );
    }
}

#[tokio::test]
async fn embedded_signature_recovers_to_account() {
    let rpc = MockCkbClient::new();
    let signer = TestSigner::new(*OWNER_SECRET_KEY);
    let transfer = assemble(&rpc, &signer).await;
    let raw = signer.personal_sign(&transfer.digest);
    assert!(raw[64] >= 27);

    let signed = DriverImpl::new(&rpc)
        .embed_signature(transfer.tx, &raw)
        .unwrap();
    let lock = witness_lock(&signed);
    assert!(lock[64] <= 1);
    assert_eq!(recover_account(&transfer.digest, &lock), Some(signer.account()));
}

#[tokio::test]
async fn signed_witness_has_the_width_hashed_into_the_digest() {
    let rpc = MockCkbClient::new();
    let signer = TestSigner::new(*OWNER_SECRET_KEY);
    let transfer = assemble(&rpc, &signer).await;
    let signed = DriverImpl::new(&rpc)
        .embed_signature(transfer.tx.clone(), &signer.personal_sign(&transfer.digest))
        .unwrap();
    assert_eq!(witness_lock(&signed).len(), SIGNATURE_LEN);

    // zeroing the embedded lock gives back the witness the digest commits to
    let zeroed = WitnessArgs::new_builder()
        .lock(Some(Bytes::from(vec![0u8; witness_lock(&signed).len()])).pack())
        .build();
    let mut message = signed.hash().raw_data().to_vec();
    message.extend_from_slice(&(zeroed.as_slice().len() as u64).to_le_bytes());
    message.extend_from_slice(zeroed.as_slice());
    assert_eq!(H256::from(keccak256(&message)), transfer.digest);
}

#[tokio::test]
async fn broadcast_returns_transaction_hash() {
    let rpc = MockCkbClient::new();
    let signer = TestSigner::new(*OWNER_SECRET_KEY);
    let transfer = assemble(&rpc, &signer).await;
    let driver = DriverImpl::new(&rpc);
    let signed = driver
        .embed_signature(transfer.tx, &signer.personal_sign(&transfer.digest))
        .unwrap();

    let hash = driver.send_transaction(signed.clone()).await.expect("send");
    let expected: H256 = signed.hash().unpack();
    assert_eq!(hash, expected);
    let sent = rpc.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        packed::Transaction::from(sent[0].clone()).as_slice(),
        signed.data().as_slice()
    );
}

#[tokio::test]
async fn broadcast_error_carries_transaction() {
    let rpc = MockCkbClient::new();
    rpc.set_send_failure(Some("PoolRejectedDuplicatedTransaction"));
    let signer = TestSigner::new(*OWNER_SECRET_KEY);
    let transfer = assemble(&rpc, &signer).await;
    let driver = DriverImpl::new(&rpc);
    let err = driver.send_transaction(transfer.tx).await.unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Driver);
    assert!(err.message().contains("PoolRejectedDuplicatedTransaction"));
    assert!(err.message().contains("\"cell_deps\""));
    assert!(rpc.sent_transactions().is_empty());
}
