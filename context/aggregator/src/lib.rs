use pwup_protocol::ckb_types::packed::Script;
use pwup_protocol::traits::{Aggregator, CkbClient};
use pwup_protocol::types::indexer::CellFilter;
use pwup_protocol::types::token::{TokenDescriptor, TokenGroup};
use pwup_protocol::{async_trait, log, PwResult};

mod collector;
mod error;

#[cfg(test)]
mod tests;

pub use collector::{CellCollector, DEFAULT_PAGE_SIZE};
pub use error::AggregatorError;

/// Length of the little-endian u128 amount leading a token cell's data.
pub const BALANCE_LEN: usize = 16;

pub struct AggregatorImpl<C: CkbClient> {
    rpc_client: C,
    page_size: u32,
}

impl<C: CkbClient> AggregatorImpl<C> {
    pub fn new(rpc_client: &C) -> Self {
        AggregatorImpl {
            rpc_client: rpc_client.clone(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(rpc_client: &C, page_size: u32) -> Self {
        AggregatorImpl {
            rpc_client: rpc_client.clone(),
            page_size,
        }
    }
}

pub fn decode_balance(data: &[u8]) -> Option<u128> {
    let mut amount = [0u8; BALANCE_LEN];
    amount.copy_from_slice(data.get(..BALANCE_LEN)?);
    Some(u128::from_le_bytes(amount))
}

#[async_trait]
impl<C: CkbClient> Aggregator for AggregatorImpl<C> {
    async fn list_token_groups(
        &self,
        lock: &Script,
        catalog: &[TokenDescriptor],
    ) -> PwResult<Vec<TokenGroup>> {
        let mut collector =
            CellCollector::new(&self.rpc_client, &CellFilter::by_lock(lock)).page_size(self.page_size);
        let mut groups: Vec<TokenGroup> = vec![];
        while let Some(cell) = collector.next().await? {
            let type_script = match cell.type_script() {
                Some(script) => script,
                None => continue,
            };
            let descriptor = match catalog.iter().find(|token| token.matches(&type_script)) {
                Some(descriptor) => descriptor,
                None => continue,
            };
            let balance = match decode_balance(&cell.data) {
                Some(balance) => balance,
                None => {
                    log::warn!(
                        "skip {} cell with {} bytes of data",
                        descriptor.symbol,
                        cell.data.len()
                    );
                    continue;
                }
            };
            let key = descriptor.args();
            match groups
                .iter_mut()
                .find(|group| group.descriptor.args() == key)
            {
                Some(group) => {
                    group.amount = group
                        .amount
                        .checked_add(balance)
                        .ok_or_else(|| AggregatorError::BalanceOverflow(descriptor.symbol.clone()))?;
                    group.cells.push(cell);
                }
                None => groups.push(TokenGroup::new(descriptor.clone(), cell, balance)),
            }
        }
        log::info!("listed {} token groups", groups.len());
        Ok(groups)
    }

    async fn capacity_of(&self, lock: &Script) -> PwResult<u64> {
        let mut collector =
            CellCollector::new(&self.rpc_client, &CellFilter::by_lock(lock)).page_size(self.page_size);
        let mut capacity = 0u64;
        while let Some(cell) = collector.next().await? {
            capacity = capacity.saturating_add(cell.capacity());
        }
        Ok(capacity)
    }
}
