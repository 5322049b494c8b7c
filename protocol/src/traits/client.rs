use std::{future::Future, pin::Pin};

use ckb_jsonrpc_types::{JsonBytes, OutputsValidator, Transaction};

use crate::types::indexer::{IndexerCell, Pagination, SearchKey};
use crate::{PwResult, H256};

pub trait CkbClient: Send + Sync + Clone {
    // ckb api
    fn send_transaction(
        &self,
        tx: &Transaction,
        outputs_validator: Option<OutputsValidator>,
    ) -> RPC<H256>;

    // indexer api
    fn fetch_live_cells(
        &self,
        search_key: SearchKey,
        limit: u32,
        cursor: Option<JsonBytes>,
    ) -> RPC<Pagination<IndexerCell>>;
}

pub type RPC<T> = Pin<Box<dyn Future<Output = PwResult<T>> + Send + 'static>>;
