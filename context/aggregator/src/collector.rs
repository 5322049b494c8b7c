use std::collections::VecDeque;

use pwup_protocol::ckb_jsonrpc_types::JsonBytes;
use pwup_protocol::ckb_types::packed::Script;
use pwup_protocol::ckb_types::prelude::Entity;
use pwup_protocol::traits::CkbClient;
use pwup_protocol::types::cell::PwCell;
use pwup_protocol::types::indexer::{CellFilter, SearchKey};
use pwup_protocol::{log, PwResult};

use crate::error::AggregatorError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pull-based cursor over the live cells matching a filter. Pages are
/// fetched lazily, one round trip per exhausted buffer, so the caller decides
/// between items whether to keep going. Cells whose lock is not exactly the
/// filter lock are dropped, whatever args matching the indexer applied.
pub struct CellCollector<'a, C: CkbClient> {
    rpc_client: &'a C,
    lock: Script,
    search_key: SearchKey,
    page_size: u32,
    cursor: Option<JsonBytes>,
    buffer: VecDeque<PwCell>,
    exhausted: bool,
}

impl<'a, C: CkbClient> CellCollector<'a, C> {
    pub fn new(rpc_client: &'a C, filter: &CellFilter) -> Self {
        CellCollector {
            rpc_client,
            lock: filter.lock.clone(),
            search_key: filter.into(),
            page_size: DEFAULT_PAGE_SIZE,
            cursor: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// `Ok(None)` once the indexer cursor is drained.
    pub async fn next(&mut self) -> PwResult<Option<PwCell>> {
        while self.buffer.is_empty() && !self.exhausted {
            self.fetch_page().await?;
        }
        Ok(self.buffer.pop_front())
    }

    /// Drains the remaining cells into memory.
    pub async fn collect_all(mut self) -> PwResult<Vec<PwCell>> {
        let mut cells = vec![];
        while let Some(cell) = self.next().await? {
            cells.push(cell);
        }
        Ok(cells)
    }

    async fn fetch_page(&mut self) -> PwResult<()> {
        let page = self
            .rpc_client
            .fetch_live_cells(
                self.search_key.clone(),
                self.page_size,
                self.cursor.take(),
            )
            .await
            .map_err(|err| AggregatorError::IndexerRpcError(err.to_string()))?;
        if page.objects.is_empty() || page.last_cursor.is_empty() {
            self.exhausted = true;
        } else {
            self.cursor = Some(page.last_cursor);
        }
        for cell in page.objects.into_iter().map(PwCell::from) {
            if cell.lock_script().as_slice() != self.lock.as_slice() {
                log::debug!("skip cell {} under a foreign lock", cell.out_point);
                continue;
            }
            self.buffer.push_back(cell);
        }
        Ok(())
    }
}
