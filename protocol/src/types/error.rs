use derive_more::{Constructor, Display};
use std::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Deriver,
    Aggregator,
    Assembler,
    Driver,
    Context,
    Config,
    Wallet,
    CkbClient,
    Hex,
}

#[derive(Debug, Constructor, Display)]
#[display(fmt = "Type: {:?}, Message: {}", error_type, message)]
pub struct PwError {
    error_type: ErrorType,
    message: Box<dyn Error + Send>,
}

impl PwError {
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Message of the component error without the type tag, suitable for
    /// showing verbatim to the user.
    pub fn message(&self) -> String {
        self.message.to_string()
    }
}

impl Error for PwError {}

pub type PwResult<T> = Result<T, PwError>;
