use pwup_protocol::derive_more::Display;
use pwup_protocol::types::error::{ErrorType, PwError};

#[derive(Display, Debug)]
pub enum DriverError {
    #[display(fmt = "Signature must be 65 bytes, got {}", _0)]
    MalformedSignature(usize),

    #[display(fmt = "Transaction has no witness slot to fill")]
    MissingWitnessSlot,

    #[display(fmt = "{}, tx = {}", _0, _1)]
    BroadcastError(String, String),
}

impl std::error::Error for DriverError {}

impl From<DriverError> for PwError {
    fn from(error: DriverError) -> PwError {
        PwError::new(ErrorType::Driver, Box::new(error))
    }
}
