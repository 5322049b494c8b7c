mod client;
mod error;


pub use client::RpcClient;
pub use error::RpcError;
