use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ckb_types::packed::Script;

use crate::types::account::Account;

/// Everything derived from one wallet account. Invalidated as a whole when
/// the wallet reports another account.
#[derive(Clone, Debug)]
pub struct AddressInfo {
    pub account: Account,
    pub source_lock: Script,
    pub source_address: String,
    pub destination_lock: Script,
    pub destination_address: String,
}

/// Cancellation signal shared between the caller and a running top-up scan.
#[derive(Clone, Default, Debug)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
