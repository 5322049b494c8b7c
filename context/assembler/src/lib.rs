use pwup_context_aggregator::CellCollector;
use pwup_context_deriver::AddressDeriver;
use pwup_protocol::ckb_types::bytes::Bytes;
use pwup_protocol::ckb_types::core::TransactionView;
use pwup_protocol::ckb_types::packed::{CellDep, CellOutput, Script};
use pwup_protocol::ckb_types::prelude::{Entity, Pack, Unpack};
use pwup_protocol::traits::{Assembler, CkbClient};
use pwup_protocol::types::assembler::{AssembledTransfer, FeeTier};
use pwup_protocol::types::cell::PwCell;
use pwup_protocol::types::context::CancelFlag;
use pwup_protocol::types::indexer::CellFilter;
use pwup_protocol::types::token::TokenGroup;
use pwup_protocol::{async_trait, log, MigrationDeps, PwResult};

mod error;
mod helper;


pub use error::AssemblerError;
pub use helper::get_transaction_digest;

pub struct AssemblerImpl<C: CkbClient> {
    rpc_client: C,
    deriver: AddressDeriver,
    cell_deps: Vec<CellDep>,
    fee: u64,
    rebase_surcharge: u64,
}

impl<C: CkbClient> AssemblerImpl<C> {
    pub fn new(rpc_client: &C, deps: &MigrationDeps) -> AssemblerImpl<C> {
        AssemblerImpl {
            rpc_client: rpc_client.clone(),
            deriver: AddressDeriver::new(deps),
            cell_deps: deps.cell_deps.clone(),
            fee: deps.fee,
            rebase_surcharge: deps.rebase_surcharge,
        }
    }

    fn check_destination(&self, destination_address: &str) -> PwResult<Script> {
        let lock = self
            .deriver
            .to_lock_script(destination_address)
            .map_err(|err| {
                AssemblerError::InvalidAddress(destination_address.into(), err.message())
            })?;
        if !self.deriver.is_destination_family(&lock) {
            return Err(AssemblerError::UnsupportedDestination(destination_address.into()).into());
        }
        Ok(lock)
    }

    /// Pulls bare capacity cells of `source_lock` until `needed` is covered.
    /// The cancel flag is only consulted before asking for the next cell.
    async fn collect_top_up(
        &self,
        source_lock: &Script,
        needed: u64,
        cancel: Option<&CancelFlag>,
    ) -> PwResult<(Vec<PwCell>, u64)> {
        let mut collector = CellCollector::new(&self.rpc_client, &CellFilter::bare_capacity(source_lock));
        let mut cells = vec![];
        let mut collected = 0u64;
        while collected < needed {
            if cancel.map(CancelFlag::is_cancelled).unwrap_or(false) {
                return Err(AssemblerError::Cancelled.into());
            }
            let cell = match collector.next().await? {
                Some(cell) => cell,
                None => break,
            };
            if !cell.is_bare() {
                continue;
            }
            collected = collected.saturating_add(cell.capacity());
            log::debug!(
                "top-up cell #{} adds {} shannons, {}/{}",
                cells.len(),
                cell.capacity(),
                collected,
                needed
            );
            cells.push(cell);
        }
        Ok((cells, collected))
    }
}

#[async_trait]
impl<C: CkbClient> Assembler for AssemblerImpl<C> {
    async fn build_transfer(
        &self,
        groups: &[TokenGroup],
        source_lock: &Script,
        destination_address: &str,
        cancel: Option<&CancelFlag>,
    ) -> PwResult<AssembledTransfer> {
        let destination_lock = self.check_destination(destination_address)?;

        // flatten token cells, group order then cell order
        let mut inputs = groups
            .iter()
            .flat_map(|group| group.cells.iter().cloned())
            .collect::<Vec<_>>();
        if inputs.is_empty() {
            return Err(AssemblerError::NothingToMigrate.into());
        }
        if let Some(foreign) = inputs
            .iter()
            .find(|cell| cell.lock_script().as_slice() != source_lock.as_slice())
        {
            return Err(AssemblerError::ForeignInput(foreign.out_point.to_string()).into());
        }
        let migrated = inputs.len();

        let mut outputs = inputs
            .iter()
            .map(|cell| helper::rebase_output(cell, &destination_lock, self.rebase_surcharge))
            .collect::<PwResult<Vec<CellOutput>>>()?;
        let mut outputs_data = inputs
            .iter()
            .map(|cell| cell.data.clone())
            .collect::<Vec<Bytes>>();

        let total_surcharge = self
            .rebase_surcharge
            .checked_mul(migrated as u64)
            .ok_or_else(|| AssemblerError::CapacityOverflow("rebase surcharge".into()))?;
        let deduction = self
            .fee
            .checked_add(total_surcharge)
            .ok_or_else(|| AssemblerError::CapacityOverflow("fee".into()))?;

        // tier 1, the first output able to pay fee and surcharges by itself.
        // The surcharges are deducted too, so inputs still equal outputs plus fee.
        let mut squeezed = None;
        for (i, output) in outputs.iter().enumerate() {
            let capacity: u64 = output.capacity().unpack();
            let occupied = helper::occupied_capacity(output, outputs_data[i].len())?;
            if capacity.saturating_sub(occupied) >= deduction {
                squeezed = Some((i, capacity - deduction));
                break;
            }
        }

        let fee_tier = match squeezed {
            Some((i, capacity)) => {
                outputs[i] = helper::with_capacity(&outputs[i], capacity);
                log::info!("fee paid by output #{}", i);
                FeeTier::Squeeze(i)
            }
            None => {
                // tier 2, top up with bare capacity cells and return the change
                let change_template = helper::change_output(source_lock, 0);
                let needed = helper::occupied_capacity(&change_template, 0)?
                    .checked_add(deduction)
                    .ok_or_else(|| AssemblerError::CapacityOverflow("needed".into()))?;
                let (cells, collected) = self.collect_top_up(source_lock, needed, cancel).await?;
                if collected < needed {
                    let address = self.deriver.to_address(source_lock)?;
                    return Err(AssemblerError::InsufficientCapacity {
                        shortfall: needed - collected,
                        needed,
                        address,
                    }
                    .into());
                }
                log::info!(
                    "fee paid by {} extra cells with {} shannons",
                    cells.len(),
                    collected
                );
                let top_up = FeeTier::TopUp {
                    cells: cells.len(),
                    collected,
                };
                inputs.extend(cells);
                outputs.push(helper::change_output(source_lock, collected - deduction));
                outputs_data.push(Bytes::new());
                top_up
            }
        };

        let inputs_capacity = helper::sum_capacity(inputs.iter().map(|cell| &cell.output));
        let outputs_capacity = helper::sum_capacity(outputs.iter());
        if inputs_capacity != outputs_capacity + self.fee as u128 {
            return Err(AssemblerError::TransactionCapacityError(
                inputs_capacity as u64,
                outputs_capacity as u64,
            )
            .into());
        }

        let tx = TransactionView::new_advanced_builder()
            .inputs(inputs.iter().map(PwCell::as_input))
            .outputs(outputs)
            .outputs_data(outputs_data.iter().map(|data| data.pack()))
            .cell_deps(self.cell_deps.clone())
            .witness(Bytes::new().pack())
            .build();
        let digest = helper::get_transaction_digest(&tx);
        log::debug!("transaction {:#x} digest {:#x}", tx.hash(), digest);

        Ok(AssembledTransfer::new(tx, digest, fee_tier))
    }
}
