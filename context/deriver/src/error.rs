use pwup_protocol::derive_more::Display;
use pwup_protocol::types::error::{ErrorType, PwError};

#[derive(Display, Debug)]
pub enum DeriverError {
    #[display(fmt = "Invalid address: {}, reason = {}", _0, _1)]
    InvalidAddress(String, String),

    #[display(fmt = "Lock script hash_type is not supported, hash_type = {}", _0)]
    UnsupportedHashType(u8),
}

impl std::error::Error for DeriverError {}

impl From<DeriverError> for PwError {
    fn from(error: DeriverError) -> PwError {
        PwError::new(ErrorType::Deriver, Box::new(error))
    }
}
