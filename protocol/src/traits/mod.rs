mod aggregator;
mod assembler;
mod client;
mod driver;
mod wallet;

pub use aggregator::Aggregator;
pub use assembler::Assembler;
pub use client::{CkbClient, RPC};
pub use driver::Driver;
pub use wallet::{MockWallet, Wallet};
