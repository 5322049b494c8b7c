use futures::FutureExt;
use reqwest::{Client, Url};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use pwup_protocol::ckb_jsonrpc_types::{JsonBytes, OutputsValidator, Transaction, Uint32};
use pwup_protocol::ckb_types::H256;
use pwup_protocol::log;
use pwup_protocol::serde_json::{self, json};
use pwup_protocol::traits::{CkbClient, RPC};
use pwup_protocol::types::error::PwError;
use pwup_protocol::types::indexer::{IndexerCell, Order, Pagination, SearchKey};
use pwup_protocol::PwResult;

use crate::error::RpcError;

#[allow(clippy::upper_case_acronyms)]
enum Target {
    CKB,
    Indexer,
}

macro_rules! jsonrpc {
    ($method:expr, $id:expr, $self:ident, $return:ty$(, $params:ident$(,)?)*) => {{
        let params = serde_json::to_value(($($params,)*))
            .map_err(|e| RpcError::SerializeParams($method, e.to_string()));
        let id = $self.id.fetch_add(1, Ordering::Relaxed);
        let url = match $id {
            Target::CKB => $self.ckb_uri.clone(),
            Target::Indexer => $self.indexer_uri.clone(),
        };
        let raw = $self.raw.clone();
        async move {
            let params = params?;
            let request = json!({
                "id": id,
                "jsonrpc": "2.0",
                "method": $method,
                "params": params,
            });
            log::debug!("jsonrpc #{} {}", id, $method);
            let resp = raw
                .post(url)
                .json(&request)
                .send()
                .await
                .map_err(|e| RpcError::Transport($method, e.to_string()))?;
            let output = resp
                .json::<jsonrpc_core::response::Output>()
                .await
                .map_err(|e| RpcError::Transport($method, e.to_string()))?;

            let result: PwResult<$return> = match output {
                jsonrpc_core::response::Output::Success(success) => {
                    serde_json::from_value::<$return>(success.result)
                        .map_err(|e| PwError::from(RpcError::DecodeResult($method, e.to_string())))
                }
                jsonrpc_core::response::Output::Failure(failure) => Err(RpcError::Rejected(
                    $method,
                    failure.error.code.code(),
                    failure.error.message,
                )
                .into()),
            };
            result
        }
    }}
}

/// JSON-RPC transport to a CKB node and its indexer.
#[derive(Clone)]
pub struct RpcClient {
    raw: Client,
    ckb_uri: Url,
    indexer_uri: Url,
    id: Arc<AtomicU64>,
}

impl RpcClient {
    pub fn new(ckb_uri: &str, indexer_uri: &str) -> PwResult<Self> {
        let ckb_uri = Url::parse(ckb_uri)
            .map_err(|e| RpcError::InvalidUrl("ckb", ckb_uri.into(), e.to_string()))?;
        let indexer_uri = Url::parse(indexer_uri)
            .map_err(|e| RpcError::InvalidUrl("indexer", indexer_uri.into(), e.to_string()))?;

        Ok(RpcClient {
            raw: Client::new(),
            ckb_uri,
            indexer_uri,
            id: Arc::new(AtomicU64::new(0)),
        })
    }
}

impl CkbClient for RpcClient {
    fn send_transaction(
        &self,
        tx: &Transaction,
        outputs_validator: Option<OutputsValidator>,
    ) -> RPC<H256> {
        jsonrpc!(
            "send_transaction",
            Target::CKB,
            self,
            H256,
            tx,
            outputs_validator
        )
        .boxed()
    }

    fn fetch_live_cells(
        &self,
        search_key: SearchKey,
        limit: u32,
        cursor: Option<JsonBytes>,
    ) -> RPC<Pagination<IndexerCell>> {
        let order = Order::Asc;
        let limit = Uint32::from(limit);

        jsonrpc!(
            "get_cells",
            Target::Indexer,
            self,
            Pagination<IndexerCell>,
            search_key,
            order,
            limit,
            cursor,
        )
        .boxed()
    }
}
