use pwup_protocol::ckb_types::bytes::Bytes;
use pwup_protocol::ckb_types::core::{Capacity, TransactionView};
use pwup_protocol::ckb_types::packed::{CellOutput, Script, WitnessArgs};
use pwup_protocol::ckb_types::prelude::{Builder, Entity, Pack, Unpack};
use pwup_protocol::types::assembler::SIGNATURE_LEN;
use pwup_protocol::types::cell::PwCell;
use pwup_protocol::{PwResult, H256};
use sha3::{Digest, Keccak256};

use crate::error::AssemblerError;

/// Message signed through `personal_sign`:
/// `keccak256(tx_hash || le64(len(w)) || w)`, where `w` is the serialized
/// `WitnessArgs` whose lock holds 65 zero bytes.
pub fn get_transaction_digest(tx: &TransactionView) -> H256 {
    let mut keccak = Keccak256::new();
    keccak.update(tx.hash().raw_data());
    // prepare empty witness for digest
    let witness_for_digest = WitnessArgs::new_builder()
        .lock(Some(Bytes::from(vec![0u8; SIGNATURE_LEN])).pack())
        .build();
    let witness_len = witness_for_digest.as_bytes().len() as u64;
    keccak.update(witness_len.to_le_bytes());
    keccak.update(witness_for_digest.as_bytes());
    let mut message = [0u8; 32];
    message.copy_from_slice(&keccak.finalize());
    message.into()
}

pub fn occupied_capacity(output: &CellOutput, data_len: usize) -> PwResult<u64> {
    let data_capacity = Capacity::bytes(data_len)
        .map_err(|err| AssemblerError::CapacityOverflow(err.to_string()))?;
    let occupied = output
        .occupied_capacity(data_capacity)
        .map_err(|err| AssemblerError::CapacityOverflow(err.to_string()))?;
    Ok(occupied.as_u64())
}

/// Successor of `cell` at `lock`: same type script and data, capacity raised
/// by `surcharge`.
pub fn rebase_output(cell: &PwCell, lock: &Script, surcharge: u64) -> PwResult<CellOutput> {
    let capacity = cell.capacity().checked_add(surcharge).ok_or_else(|| {
        AssemblerError::CapacityOverflow(format!("{} + {}", cell.capacity(), surcharge))
    })?;
    Ok(cell
        .output
        .clone()
        .as_builder()
        .lock(lock.clone())
        .capacity(capacity.pack())
        .build())
}

pub fn change_output(lock: &Script, capacity: u64) -> CellOutput {
    CellOutput::new_builder()
        .lock(lock.clone())
        .capacity(capacity.pack())
        .build()
}

pub fn with_capacity(output: &CellOutput, capacity: u64) -> CellOutput {
    output.clone().as_builder().capacity(capacity.pack()).build()
}

pub fn sum_capacity<'a>(outputs: impl Iterator<Item = &'a CellOutput>) -> u128 {
    outputs
        .map(|output| Unpack::<u64>::unpack(&output.capacity()) as u128)
        .sum()
}
