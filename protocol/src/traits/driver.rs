use ckb_types::core::TransactionView;

use crate::{async_trait, PwResult, H256};

#[async_trait]
pub trait Driver {
    fn embed_signature(
        &self,
        tx: TransactionView,
        raw_signature: &[u8],
    ) -> PwResult<TransactionView>;

    async fn send_transaction(&self, tx: TransactionView) -> PwResult<H256>;
}
