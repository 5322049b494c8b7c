use pwup_protocol::derive_more::Display;
use pwup_protocol::types::error::{ErrorType, PwError};

#[derive(Display, Debug)]
pub enum AggregatorError {
    #[display(fmt = "Indexer request failed: {}", _0)]
    IndexerRpcError(String),

    #[display(fmt = "Total balance of {} overflows u128", _0)]
    BalanceOverflow(String),
}

impl std::error::Error for AggregatorError {}

impl From<AggregatorError> for PwError {
    fn from(error: AggregatorError) -> PwError {
        PwError::new(ErrorType::Aggregator, Box::new(error))
    }
}
