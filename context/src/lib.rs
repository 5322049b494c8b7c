use std::sync::atomic::{AtomicBool, Ordering};

use pwup_context_aggregator::AggregatorImpl;
use pwup_context_assembler::AssemblerImpl;
use pwup_context_deriver::AddressDeriver;
use pwup_context_driver::DriverImpl;
use pwup_protocol::tokio::{self, sync::RwLock};
use pwup_protocol::traits::{Aggregator, Assembler, CkbClient, Driver, Wallet};
use pwup_protocol::types::account::Account;
use pwup_protocol::types::context::{AddressInfo, CancelFlag};
use pwup_protocol::types::token::{TokenDescriptor, TokenGroup};
use pwup_protocol::{log, MigrationDeps, PwResult, H256};

mod error;
pub use error::ContextError;


/// Clears the busy flag however the transfer attempt ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(busy: &'a AtomicBool) -> PwResult<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ContextError::TransferInProgress)?;
        Ok(BusyGuard(busy))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One wallet session on one network. Switching networks means building
/// another context from another [`MigrationDeps`].
pub struct ContextImpl<C: CkbClient, W: Wallet> {
    pub deriver: AddressDeriver,
    pub aggregator: AggregatorImpl<C>,
    pub assembler: AssemblerImpl<C>,
    pub driver: DriverImpl<C>,

    wallet: W,
    catalog: Vec<TokenDescriptor>,
    session: RwLock<Option<AddressInfo>>,
    busy: AtomicBool,
}

impl<C: CkbClient, W: Wallet> ContextImpl<C, W> {
    pub fn new(rpc_client: &C, wallet: W, deps: &MigrationDeps) -> ContextImpl<C, W> {
        ContextImpl {
            deriver: AddressDeriver::new(deps),
            aggregator: AggregatorImpl::new(rpc_client),
            assembler: AssemblerImpl::new(rpc_client, deps),
            driver: DriverImpl::new(rpc_client),
            wallet,
            catalog: deps.catalog.clone(),
            session: RwLock::new(None),
            busy: AtomicBool::new(false),
        }
    }

    pub fn catalog(&self) -> &[TokenDescriptor] {
        &self.catalog
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn connect(&self) -> PwResult<AddressInfo> {
        let accounts = self.wallet.request_accounts().await?;
        self.account_changed(&accounts)
            .await?
            .ok_or_else(|| ContextError::NoAccount.into())
    }

    /// Re-derives every address from the first reported account; an empty
    /// list ends the session.
    pub async fn account_changed(&self, accounts: &[Account]) -> PwResult<Option<AddressInfo>> {
        let info = match accounts.first() {
            Some(account) => Some(self.deriver.address_info(account)?),
            None => None,
        };
        match &info {
            Some(info) => log::info!("connected account {}", info.account),
            None => log::info!("wallet disconnected"),
        }
        *self.session.write().await = info.clone();
        Ok(info)
    }

    pub async fn disconnect(&self) {
        *self.session.write().await = None;
    }

    pub async fn address_info(&self) -> PwResult<AddressInfo> {
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(|| ContextError::NotConnected.into())
    }

    /// Token groups at the PW-Lock and the Omni-Lock address, listed
    /// concurrently.
    pub async fn list_both(&self) -> PwResult<(Vec<TokenGroup>, Vec<TokenGroup>)> {
        let info = self.address_info().await?;
        let (source, destination) = tokio::join!(
            self.aggregator
                .list_token_groups(&info.source_lock, &self.catalog),
            self.aggregator
                .list_token_groups(&info.destination_lock, &self.catalog),
        );
        Ok((source?, destination?))
    }

    pub async fn capacity(&self) -> PwResult<(u64, u64)> {
        let info = self.address_info().await?;
        let (source, destination) = tokio::join!(
            self.aggregator.capacity_of(&info.source_lock),
            self.aggregator.capacity_of(&info.destination_lock),
        );
        Ok((source?, destination?))
    }

    /// Build, sign through the wallet, embed and broadcast. `destination`
    /// defaults to the account's own Omni-Lock address.
    pub async fn migrate(
        &self,
        groups: &[TokenGroup],
        destination: Option<&str>,
        cancel: Option<&CancelFlag>,
    ) -> PwResult<H256> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        let info = self.address_info().await?;
        let destination = destination.unwrap_or(&info.destination_address);
        log::info!(
            "migrate {} token groups from {} to {}",
            groups.len(),
            info.source_address,
            destination
        );

        let transfer = self
            .assembler
            .build_transfer(groups, &info.source_lock, destination, cancel)
            .await?;
        let signature = self
            .wallet
            .personal_sign(&info.account, &transfer.digest)
            .await?;
        let tx = self.driver.embed_signature(transfer.tx, &signature)?;
        self.driver.send_transaction(tx).await
    }
}
