use std::fmt::{self, Display};
use std::str::FromStr;

use derive_more::Display as DisplayDerive;

use crate::types::error::{ErrorType, PwError};

pub const ACCOUNT_LEN: usize = 20;

#[derive(DisplayDerive, Debug)]
pub enum AccountError {
    #[display(fmt = "Account is not a hex string, account = {}", _0)]
    InvalidHex(String),

    #[display(fmt = "Account must be {} bytes, got {}", ACCOUNT_LEN, _0)]
    InvalidLength(usize),
}

impl std::error::Error for AccountError {}

impl From<AccountError> for PwError {
    fn from(error: AccountError) -> PwError {
        PwError::new(ErrorType::Hex, Box::new(error))
    }
}

/// Externally-owned Ethereum-style account, i.e. the 20 bytes of an
/// `0x`-prefixed Ethereum address.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Account([u8; ACCOUNT_LEN]);

impl Account {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, AccountError> {
        if bytes.len() != ACCOUNT_LEN {
            return Err(AccountError::InvalidLength(bytes.len()));
        }
        let mut account = [0u8; ACCOUNT_LEN];
        account.copy_from_slice(bytes);
        Ok(Account(account))
    }
}

impl From<[u8; ACCOUNT_LEN]> for Account {
    fn from(bytes: [u8; ACCOUNT_LEN]) -> Self {
        Account(bytes)
    }
}

impl FromStr for Account {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(trimmed).map_err(|_| AccountError::InvalidHex(s.into()))?;
        Account::from_slice(&bytes)
    }
}

impl Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_and_without_prefix() {
        let a: Account = "0x8d3e6d8bc6e0dbd4eb2e7c0a9d2b8a1e1f5c6b7a".parse().unwrap();
        let b: Account = "8D3E6D8BC6E0DBD4EB2E7C0A9D2B8A1E1F5C6B7A".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "0x8d3e6d8bc6e0dbd4eb2e7c0a9d2b8a1e1f5c6b7a");
    }

    #[test]
    fn reject_wrong_length() {
        assert!(matches!(
            "0x1234".parse::<Account>(),
            Err(AccountError::InvalidLength(2))
        ));
        assert!(matches!(
            "0xzz".parse::<Account>(),
            Err(AccountError::InvalidHex(_))
        ));
    }
}
