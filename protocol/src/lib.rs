pub mod mock;
pub mod traits;
pub mod types;

mod logger;

pub use async_trait::async_trait;
pub use ckb_jsonrpc_types;
pub use ckb_sdk;
pub use ckb_types;
pub use ckb_types::H256;
pub use derive_more;
pub use hex;
pub use lazy_static::lazy_static;
pub use log;
pub use mockall;
pub use secp256k1;
pub use serde_json;
pub use tokio;

pub use logger::Logger;
pub use types::config::MigrationDeps;
pub use types::error::PwResult;

#[allow(non_snake_case)]
pub mod TestVars {
    use crate::ckb_types::{h256, H256};
    use crate::lazy_static;

    pub const CKB_URL: &str = "https://testnet.ckb.dev/rpc";
    pub const CKB_INDEXER_URL: &str = "https://testnet.ckb.dev/indexer";

    pub const OWNER_PRIVATE_KEY: H256 =
        h256!("0x9a8fc5c463841c152800ec45ef4ceb03586177a7e6a9f34a6e40256310325e43");
    pub const OWNER_ACCOUNT: &str = "0x8d3e6d8bc6e0dbd4eb2e7c0a9d2b8a1e1f5c6b7a";
    pub const OTHER_ACCOUNT: &str = "0x1f0c4ab5b6a9e2d9f1e8a5c3d7b2e4f6a8c0e2d4";

    pub const FEE: u64 = 100_000;
    pub const REBASE_SURCHARGE: u64 = 200_000_000;

    pub const USDC_CODE_HASH: H256 =
        h256!("0xc5e5dcf215925f7ef4dfaf5f4b4f105bc321c02776d6e7d52a1db3fcd9d011a4");
    pub const USDC_ARGS: H256 =
        h256!("0x58bef38794236b315b7c23fd8132d7f42676228d659b291936e8c6c7ba9f064e");
    pub const OTHER_TOKEN_ARGS: H256 =
        h256!("0x2a1b9c8d7e6f5a4b3c2d1e0f9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b");

    pub const FAKE_TX_HASH: H256 =
        h256!("0x1111111111111111111111111111111111111111111111111111111111111111");

    lazy_static! {
        pub static ref OWNER_SECRET_KEY: crate::secp256k1::SecretKey =
            crate::secp256k1::SecretKey::from_slice(OWNER_PRIVATE_KEY.as_bytes())
                .expect("test private key");
    }
}
