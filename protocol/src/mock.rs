//! In-memory stand-ins for the node, the indexer and an Ethereum wallet,
//! shared by the test suites of every component crate.

use std::io;
use std::sync::{Arc, Mutex};

use ckb_jsonrpc_types::{JsonBytes, OutputsValidator, Transaction};
use ckb_types::bytes::Bytes;
use ckb_types::packed::{self, CellOutput, OutPoint, Script};
use ckb_types::prelude::{Builder, Entity, IntoTransactionView, Pack, Unpack};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use sha3::{Digest, Keccak256};

use crate::traits::{CkbClient, RPC};
use crate::types::account::Account;
use crate::types::cell::PwCell;
use crate::types::error::{ErrorType, PwError};
use crate::types::indexer::{IndexerCell, Pagination, ScriptSearchMode, ScriptType, SearchKey};
use crate::{PwResult, TestVars, H256};

#[derive(Default)]
struct MockState {
    cells: Vec<PwCell>,
    sent: Vec<Transaction>,
    indexer_failure: bool,
    ignore_search_mode: bool,
    send_failure: Option<String>,
    fetch_count: usize,
}

/// Live cells kept in insertion order; `get_cells` pages through them with an
/// opaque cursor like the real indexer.
#[derive(Clone, Default)]
pub struct MockCkbClient {
    state: Arc<Mutex<MockState>>,
}

impl MockCkbClient {
    pub fn new() -> Self {
        MockCkbClient::default()
    }

    pub fn with_cells(cells: Vec<PwCell>) -> Self {
        let client = MockCkbClient::new();
        cells.into_iter().for_each(|cell| client.push_cell(cell));
        client
    }

    pub fn push_cell(&self, cell: PwCell) {
        self.state.lock().expect("mock state").cells.push(cell);
    }

    pub fn set_indexer_failure(&self, fail: bool) {
        self.state.lock().expect("mock state").indexer_failure = fail;
    }

    /// Behave like an indexer without `script_search_mode` support, which
    /// always matches the searched script args by prefix.
    pub fn set_ignore_search_mode(&self, ignore: bool) {
        self.state.lock().expect("mock state").ignore_search_mode = ignore;
    }

    pub fn set_send_failure(&self, reason: Option<&str>) {
        self.state.lock().expect("mock state").send_failure = reason.map(Into::into);
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().expect("mock state").sent.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().expect("mock state").fetch_count
    }

    fn query(
        &self,
        search_key: &SearchKey,
        limit: u32,
        cursor: Option<JsonBytes>,
    ) -> PwResult<Pagination<IndexerCell>> {
        let mut state = self.state.lock().expect("mock state");
        state.fetch_count += 1;
        if state.indexer_failure {
            return Err(transport_error("indexer connection reset"));
        }
        let start = cursor.map(|c| decode_cursor(c.as_bytes())).unwrap_or(0);
        let mode = if state.ignore_search_mode {
            ScriptSearchMode::Prefix
        } else {
            search_key.script_search_mode.unwrap_or(ScriptSearchMode::Prefix)
        };
        let matched = state
            .cells
            .iter()
            .filter(|cell| matches_search_key(cell, search_key, mode))
            .collect::<Vec<_>>();
        let objects = matched
            .iter()
            .skip(start)
            .take(limit as usize)
            .map(|cell| to_indexer_cell(cell))
            .collect::<Vec<_>>();
        let next = start + objects.len();
        Ok(Pagination {
            objects,
            last_cursor: JsonBytes::from_vec((next as u64).to_le_bytes().to_vec()),
        })
    }
}

impl CkbClient for MockCkbClient {
    fn send_transaction(
        &self,
        tx: &Transaction,
        _outputs_validator: Option<OutputsValidator>,
    ) -> RPC<H256> {
        let result = {
            let mut state = self.state.lock().expect("mock state");
            match &state.send_failure {
                Some(reason) => Err(transport_error(reason)),
                None => {
                    state.sent.push(tx.clone());
                    let hash: H256 = packed::Transaction::from(tx.clone())
                        .into_view()
                        .hash()
                        .unpack();
                    Ok(hash)
                }
            }
        };
        Box::pin(async move { result })
    }

    fn fetch_live_cells(
        &self,
        search_key: SearchKey,
        limit: u32,
        cursor: Option<JsonBytes>,
    ) -> RPC<Pagination<IndexerCell>> {
        let result = self.query(&search_key, limit, cursor);
        Box::pin(async move { result })
    }
}

fn transport_error(reason: &str) -> PwError {
    PwError::new(
        ErrorType::CkbClient,
        Box::new(io::Error::new(io::ErrorKind::Other, reason.to_string())),
    )
}

fn decode_cursor(bytes: &[u8]) -> usize {
    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    u64::from_le_bytes(buf) as usize
}

fn in_range(value: u64, range: &[ckb_jsonrpc_types::Uint64; 2]) -> bool {
    let (min, max): (u64, u64) = (range[0].clone().into(), range[1].clone().into());
    value >= min && value < max
}

fn matches_script(script: &Script, wanted: &Script, mode: ScriptSearchMode) -> bool {
    if script.code_hash().as_slice() != wanted.code_hash().as_slice()
        || script.hash_type().as_slice() != wanted.hash_type().as_slice()
    {
        return false;
    }
    let args: Bytes = script.args().unpack();
    let wanted_args: Bytes = wanted.args().unpack();
    match mode {
        ScriptSearchMode::Exact => args == wanted_args,
        ScriptSearchMode::Prefix => args.starts_with(&wanted_args),
        ScriptSearchMode::Partial => {
            wanted_args.is_empty()
                || args
                    .windows(wanted_args.len())
                    .any(|window| window == &wanted_args[..])
        }
    }
}

fn matches_search_key(cell: &PwCell, key: &SearchKey, mode: ScriptSearchMode) -> bool {
    let script: Script = key.script.clone().into();
    let primary = match key.script_type {
        ScriptType::Lock => Some(cell.lock_script()),
        ScriptType::Type => cell.type_script(),
    };
    match primary {
        Some(primary) if matches_script(&primary, &script, mode) => {}
        _ => return false,
    }
    let filter = match &key.filter {
        Some(filter) => filter,
        None => return true,
    };
    if let Some(type_filter) = &filter.script {
        let wanted: Script = type_filter.clone().into();
        match cell.type_script() {
            Some(type_script) if matches_script(&type_script, &wanted, ScriptSearchMode::Prefix) => {}
            _ => return false,
        }
    }
    if let Some(range) = &filter.script_len_range {
        let len = cell
            .type_script()
            .map(|script| 33 + script.args().raw_data().len() as u64)
            .unwrap_or(0);
        if !in_range(len, range) {
            return false;
        }
    }
    if let Some(range) = &filter.output_data_len_range {
        if !in_range(cell.data.len() as u64, range) {
            return false;
        }
    }
    true
}

fn to_indexer_cell(cell: &PwCell) -> IndexerCell {
    IndexerCell {
        output: cell.output.clone().into(),
        output_data: Some(JsonBytes::from_bytes(cell.data.clone())),
        out_point: cell.out_point.clone().into(),
        block_number: 0u64.into(),
        tx_index: 0u32.into(),
    }
}

pub fn out_point(index: u32) -> OutPoint {
    OutPoint::new(TestVars::FAKE_TX_HASH.pack(), index)
}

/// SUDT type script of the test network, keyed by `args`.
pub fn sudt_script(args: &H256) -> Script {
    Script::new_builder()
        .code_hash(TestVars::USDC_CODE_HASH.pack())
        .hash_type(ckb_types::core::ScriptHashType::Type.into())
        .args(args.as_bytes().pack())
        .build()
}

pub fn token_data(amount: u128) -> Bytes {
    Bytes::from(amount.to_le_bytes().to_vec())
}

pub fn token_cell(index: u32, lock: &Script, type_script: &Script, capacity: u64, data: Bytes) -> PwCell {
    let output = CellOutput::new_builder()
        .capacity(capacity.pack())
        .lock(lock.clone())
        .type_(Some(type_script.clone()).pack())
        .build();
    PwCell::new(out_point(index), output, data)
}

pub fn bare_cell(index: u32, lock: &Script, capacity: u64) -> PwCell {
    let output = CellOutput::new_builder()
        .capacity(capacity.pack())
        .lock(lock.clone())
        .build();
    PwCell::new(out_point(index), output, Bytes::new())
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&Keccak256::digest(data));
    hash
}

/// `keccak256("\x19Ethereum Signed Message:\n32" || digest)`, the message an
/// Ethereum wallet really signs on `personal_sign`.
pub fn personal_message_hash(digest: &[u8]) -> [u8; 32] {
    let mut message = format!("\x19Ethereum Signed Message:\n{}", digest.len()).into_bytes();
    message.extend_from_slice(digest);
    keccak256(&message)
}

/// Local key standing in for a browser wallet.
#[derive(Clone)]
pub struct TestSigner {
    secp: Secp256k1<All>,
    secret_key: SecretKey,
}

impl TestSigner {
    pub fn new(secret_key: SecretKey) -> Self {
        TestSigner {
            secp: Secp256k1::new(),
            secret_key,
        }
    }

    pub fn account(&self) -> Account {
        let pubkey = PublicKey::from_secret_key(&self.secp, &self.secret_key);
        let hash = keccak256(&pubkey.serialize_uncompressed()[1..]);
        Account::from_slice(&hash[12..]).expect("20 bytes")
    }

    /// Signature in wallet convention, `v` in {27, 28}.
    pub fn personal_sign(&self, digest: &H256) -> [u8; 65] {
        let message =
            Message::from_slice(&personal_message_hash(digest.as_bytes())).expect("32 bytes");
        let (recovery_id, compact) = self
            .secp
            .sign_ecdsa_recoverable(&message, &self.secret_key)
            .serialize_compact();
        let mut signature = [0u8; 65];
        signature[..64].copy_from_slice(&compact);
        signature[64] = recovery_id.to_i32() as u8 + 27;
        signature
    }
}

/// Recover the signing account from a ledger-convention signature
/// (`v` in {0, 1}).
pub fn recover_account(digest: &H256, signature: &[u8]) -> Option<Account> {
    if signature.len() != 65 {
        return None;
    }
    let recovery_id = RecoveryId::from_i32(signature[64] as i32).ok()?;
    let signature = RecoverableSignature::from_compact(&signature[..64], recovery_id).ok()?;
    let message = Message::from_slice(&personal_message_hash(digest.as_bytes())).ok()?;
    let pubkey = Secp256k1::verification_only()
        .recover_ecdsa(&message, &signature)
        .ok()?;
    let hash = keccak256(&pubkey.serialize_uncompressed()[1..]);
    Account::from_slice(&hash[12..]).ok()
}
