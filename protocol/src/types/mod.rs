pub mod account;
pub mod amount;
pub mod assembler;
pub mod cell;
pub mod config;
pub mod context;
pub mod error;
pub mod indexer;
pub mod token;
