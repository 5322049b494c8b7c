use ckb_jsonrpc_types::JsonBytes;
use ckb_types::bytes::Bytes;
use ckb_types::packed::{CellInput, CellOutput, OutPoint, Script};
use ckb_types::prelude::{Builder, Entity, Unpack};
use derive_more::Constructor;

use crate::types::indexer::IndexerCell;

/// A live cell as observed from the indexer. Never mutated: migrating a cell
/// means consuming this one and creating a successor output.
#[derive(Clone, Debug, Constructor)]
pub struct PwCell {
    pub out_point: OutPoint,
    pub output: CellOutput,
    pub data: Bytes,
}

impl PwCell {
    pub fn capacity(&self) -> u64 {
        self.output.capacity().unpack()
    }

    pub fn lock_script(&self) -> Script {
        self.output.lock()
    }

    pub fn type_script(&self) -> Option<Script> {
        self.output.type_().to_opt()
    }

    /// Plain capacity cell: no type script and no data.
    pub fn is_bare(&self) -> bool {
        self.type_script().is_none() && self.data.is_empty()
    }

    pub fn as_input(&self) -> CellInput {
        CellInput::new_builder()
            .previous_output(self.out_point.clone())
            .build()
    }
}

impl PartialEq for PwCell {
    fn eq(&self, other: &Self) -> bool {
        self.out_point.as_slice() == other.out_point.as_slice()
            && self.output.as_slice() == other.output.as_slice()
            && self.data == other.data
    }
}

impl Eq for PwCell {}

impl From<IndexerCell> for PwCell {
    fn from(cell: IndexerCell) -> Self {
        PwCell {
            out_point: cell.out_point.into(),
            output: cell.output.into(),
            data: cell
                .output_data
                .map(JsonBytes::into_bytes)
                .unwrap_or_default(),
        }
    }
}
