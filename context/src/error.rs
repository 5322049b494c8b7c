use pwup_protocol::derive_more::Display;
use pwup_protocol::types::error::{ErrorType, PwError};

#[derive(Display, Debug)]
pub enum ContextError {
    #[display(fmt = "Wallet is not connected")]
    NotConnected,

    #[display(fmt = "Wallet returned no account")]
    NoAccount,

    #[display(fmt = "Another transfer is in progress")]
    TransferInProgress,
}

impl std::error::Error for ContextError {}

impl From<ContextError> for PwError {
    fn from(error: ContextError) -> PwError {
        PwError::new(ErrorType::Context, Box::new(error))
    }
}
