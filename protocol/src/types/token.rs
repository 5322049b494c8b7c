use ckb_types::bytes::Bytes;
use ckb_types::packed::Script;
use ckb_types::prelude::{Entity, Unpack};
use derive_more::Constructor;

use crate::types::amount::{humanize, HumanizeOptions};
use crate::types::cell::PwCell;

/// Static whitelist entry. Two descriptors denote the same token iff their
/// type scripts are equal.
#[derive(Clone, Debug, Constructor)]
pub struct TokenDescriptor {
    pub type_script: Script,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

impl TokenDescriptor {
    /// Structural equality on `{code_hash, hash_type, args}`.
    pub fn matches(&self, script: &Script) -> bool {
        self.type_script.code_hash().as_slice() == script.code_hash().as_slice()
            && self.type_script.hash_type().as_slice() == script.hash_type().as_slice()
            && self.type_script.args().as_slice() == script.args().as_slice()
    }

    pub fn args(&self) -> Bytes {
        self.type_script.args().unpack()
    }
}

impl PartialEq for TokenDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.type_script)
    }
}

impl Eq for TokenDescriptor {}

/// Cells of one token held by one lock. `amount` always equals the sum of
/// the cells' balances and `cells` is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGroup {
    pub descriptor: TokenDescriptor,
    pub cells: Vec<PwCell>,
    pub amount: u128,
}

impl TokenGroup {
    pub fn new(descriptor: TokenDescriptor, cell: PwCell, balance: u128) -> Self {
        TokenGroup {
            descriptor,
            cells: vec![cell],
            amount: balance,
        }
    }

    pub fn capacity(&self) -> u64 {
        self.cells.iter().map(PwCell::capacity).sum()
    }

    pub fn display_amount(&self) -> String {
        humanize(
            self.amount,
            &HumanizeOptions::new(self.descriptor.decimals as u32)
                .symbol(&self.descriptor.symbol),
        )
    }
}
