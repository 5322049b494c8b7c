use ckb_types::bytes::Bytes;
use mockall::automock;

use crate::types::account::Account;
use crate::{async_trait, PwResult, H256};

/// Ethereum-style wallet provider.
#[automock]
#[async_trait]
pub trait Wallet: Send + Sync {
    async fn request_accounts(&self) -> PwResult<Vec<Account>>;

    /// `personal_sign` over the raw 32-byte digest. Returns `r || s || v`
    /// where `v` is usually 27 or 28.
    async fn personal_sign(&self, account: &Account, digest: &H256) -> PwResult<Bytes>;
}
