use pwup_protocol::derive_more::Display;
use pwup_protocol::types::error::{ErrorType, PwError};

#[derive(Display, Debug)]
pub enum RpcError {
    #[display(fmt = "Invalid {} url: {}, reason = {}", _0, _1, _2)]
    InvalidUrl(&'static str, String, String),

    #[display(fmt = "Cannot serialize params of {}: {}", _0, _1)]
    SerializeParams(&'static str, String),

    #[display(fmt = "{} failed: {}", _0, _1)]
    Transport(&'static str, String),

    #[display(fmt = "{} returned an unexpected result: {}", _0, _1)]
    DecodeResult(&'static str, String),

    #[display(fmt = "{} rejected, code = {}, message = {}", _0, _1, _2)]
    Rejected(&'static str, i64, String),
}

impl std::error::Error for RpcError {}

impl From<RpcError> for PwError {
    fn from(error: RpcError) -> PwError {
        PwError::new(ErrorType::CkbClient, Box::new(error))
    }
}
