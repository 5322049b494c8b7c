use ckb_types::packed::Script;

use crate::types::assembler::AssembledTransfer;
use crate::types::context::CancelFlag;
use crate::types::token::TokenGroup;
use crate::{async_trait, PwResult};

#[async_trait]
pub trait Assembler {
    async fn build_transfer(
        &self,
        groups: &[TokenGroup],
        source_lock: &Script,
        destination_address: &str,
        cancel: Option<&CancelFlag>,
    ) -> PwResult<AssembledTransfer>;
}
