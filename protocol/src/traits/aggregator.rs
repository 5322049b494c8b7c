use ckb_types::packed::Script;

use crate::types::token::{TokenDescriptor, TokenGroup};
use crate::{async_trait, PwResult};

#[async_trait]
pub trait Aggregator {
    async fn list_token_groups(
        &self,
        lock: &Script,
        catalog: &[TokenDescriptor],
    ) -> PwResult<Vec<TokenGroup>>;

    async fn capacity_of(&self, lock: &Script) -> PwResult<u64>;
}
