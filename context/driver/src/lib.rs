use pwup_protocol::ckb_jsonrpc_types::{OutputsValidator, TransactionView as JsonTxView};
use pwup_protocol::ckb_types::bytes::Bytes;
use pwup_protocol::ckb_types::core::TransactionView;
use pwup_protocol::ckb_types::packed::WitnessArgs;
use pwup_protocol::ckb_types::prelude::{Builder, Entity, Pack};
use pwup_protocol::serde_json::to_string;
use pwup_protocol::traits::{CkbClient, Driver};
use pwup_protocol::types::assembler::SIGNATURE_LEN;
use pwup_protocol::{async_trait, log, PwResult, H256};

mod error;
pub use error::DriverError;

#[cfg(test)]
mod tests;

pub struct DriverImpl<C: CkbClient> {
    rpc_client: C,
}

impl<C: CkbClient> DriverImpl<C> {
    pub fn new(rpc_client: &C) -> DriverImpl<C> {
        DriverImpl {
            rpc_client: rpc_client.clone(),
        }
    }
}

/// Brings an Ethereum `r || s || v` signature into the `{0, 1}` recovery id
/// convention of the on-chain lock.
pub fn normalize_signature(raw_signature: &[u8]) -> PwResult<[u8; SIGNATURE_LEN]> {
    if raw_signature.len() != SIGNATURE_LEN {
        return Err(DriverError::MalformedSignature(raw_signature.len()).into());
    }
    let mut signature = [0u8; SIGNATURE_LEN];
    signature.copy_from_slice(raw_signature);
    if signature[SIGNATURE_LEN - 1] >= 27 {
        signature[SIGNATURE_LEN - 1] -= 27;
    }
    Ok(signature)
}

#[async_trait]
impl<C: CkbClient> Driver for DriverImpl<C> {
    fn embed_signature(
        &self,
        tx: TransactionView,
        raw_signature: &[u8],
    ) -> PwResult<TransactionView> {
        let signature = normalize_signature(raw_signature)?;
        if tx.witnesses().is_empty() {
            return Err(DriverError::MissingWitnessSlot.into());
        }
        let witness = WitnessArgs::new_builder()
            .lock(Some(Bytes::from(signature.to_vec())).pack())
            .build()
            .as_bytes();
        let mut witnesses = tx.witnesses().into_iter().collect::<Vec<_>>();
        witnesses[0] = witness.pack();
        Ok(tx.as_advanced_builder().set_witnesses(witnesses).build())
    }

    async fn send_transaction(&self, tx: TransactionView) -> PwResult<H256> {
        let hash = self
            .rpc_client
            .send_transaction(&tx.data().into(), Some(OutputsValidator::Passthrough))
            .await
            .map_err(|err| {
                DriverError::BroadcastError(
                    err.to_string(),
                    to_string(&JsonTxView::from(tx)).unwrap_or_default(),
                )
            })?;
        log::info!("transaction sent, hash = {:#x}", hash);
        Ok(hash)
    }
}
