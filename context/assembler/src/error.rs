use pwup_protocol::derive_more::Display;
use pwup_protocol::types::amount::humanize_ckb;
use pwup_protocol::types::error::{ErrorType, PwError};

#[derive(Display, Debug)]
pub enum AssemblerError {
    #[display(fmt = "Invalid destination address: {}, reason = {}", _0, _1)]
    InvalidAddress(String, String),

    #[display(fmt = "Destination address is not an Omni-Lock address: {}", _0)]
    UnsupportedDestination(String),

    #[display(
        fmt = "From address CKB is not enough, send at least {} CKB to {} to continue",
        "humanize_ckb(*shortfall)",
        address
    )]
    InsufficientCapacity {
        shortfall: u64,
        needed: u64,
        address: String,
    },

    #[display(fmt = "No token cell selected")]
    NothingToMigrate,

    #[display(fmt = "Input cell is not owned by the source lock, out_point = {}", _0)]
    ForeignInput(String),

    #[display(fmt = "Capacity overflow: {}", _0)]
    CapacityOverflow(String),

    #[display(fmt = "Top-up scan cancelled")]
    Cancelled,

    #[display(fmt = "Transaction capacity mismatch ({}:{})", _0, _1)]
    TransactionCapacityError(u64, u64),
}

impl std::error::Error for AssemblerError {}

impl From<AssemblerError> for PwError {
    fn from(error: AssemblerError) -> PwError {
        PwError::new(ErrorType::Assembler, Box::new(error))
    }
}
