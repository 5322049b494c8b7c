use std::io::{self, Write};

use pwup_protocol::ckb_types::bytes::Bytes;
use pwup_protocol::derive_more::Display;
use pwup_protocol::traits::Wallet;
use pwup_protocol::types::account::Account;
use pwup_protocol::types::error::{ErrorType, PwError};
use pwup_protocol::{async_trait, hex, tokio, PwResult, H256};

#[derive(Display, Debug)]
pub enum WalletError {
    #[display(fmt = "Cannot read signature: {}", _0)]
    ReadSignature(String),

    #[display(fmt = "Signature is not a hex string")]
    InvalidSignatureHex,
}

impl std::error::Error for WalletError {}

impl From<WalletError> for PwError {
    fn from(error: WalletError) -> PwError {
        PwError::new(ErrorType::Wallet, Box::new(error))
    }
}

/// Terminal stand-in for a browser wallet: shows the digest and reads back
/// the `personal_sign` result produced elsewhere.
pub struct StdinWallet {
    account: Account,
}

impl StdinWallet {
    pub fn new(account: Account) -> Self {
        StdinWallet { account }
    }
}

#[async_trait]
impl Wallet for StdinWallet {
    async fn request_accounts(&self) -> PwResult<Vec<Account>> {
        Ok(vec![self.account])
    }

    async fn personal_sign(&self, account: &Account, digest: &H256) -> PwResult<Bytes> {
        println!("personal_sign the message below with {}", account);
        println!("{:#x}", digest);
        print!("signature: ");
        io::stdout()
            .flush()
            .map_err(|err| WalletError::ReadSignature(err.to_string()))?;

        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            io::stdin().read_line(&mut line).map(|_| line)
        })
        .await
        .map_err(|err| WalletError::ReadSignature(err.to_string()))?
        .map_err(|err| WalletError::ReadSignature(err.to_string()))?;

        let line = line.trim();
        let signature = hex::decode(line.strip_prefix("0x").unwrap_or(line))
            .map_err(|_| WalletError::InvalidSignatureHex)?;
        Ok(Bytes::from(signature))
    }
}
