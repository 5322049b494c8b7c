use ckb_types::core::TransactionView;
use ckb_types::H256;
use derive_more::Constructor;

/// Byte width of a recoverable secp256k1 signature, `r || s || v`. Both the
/// zeroed lock hashed into the digest and the embedded signature use it.
pub const SIGNATURE_LEN: usize = 65;

/// How the flat fee got paid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeeTier {
    /// Deducted from the migrated output at this index.
    Squeeze(usize),
    /// Paid by extra bare capacity cells; a change output went back to the
    /// source lock.
    TopUp { cells: usize, collected: u64 },
}

/// Unsigned transaction together with the digest the wallet has to sign.
/// The only permitted change afterwards is filling the witness slot.
#[derive(Clone, Debug, Constructor)]
pub struct AssembledTransfer {
    pub tx: TransactionView,
    pub digest: H256,
    pub fee_tier: FeeTier,
}
