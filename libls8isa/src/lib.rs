use std::sync::Arc;

use masks::Masks;
use operation::table::OperationTable;
use params::{ArchParams, ParamsError};

pub mod format;
pub mod masks;
pub mod operation;
pub mod params;
pub mod program;

/// A value held by a register or a memory cell, truncated to the configured bit count.
pub type Word = u16;

pub type Register = usize;

pub const DEFAULT_BIT_COUNT: u32 = 8;

/// Everything derived from the bit count, built once and shared read-only by processors.
#[derive(Debug, Clone)]
pub struct Architecture {
    pub params: ArchParams,
    pub masks: Masks,
    pub operations: OperationTable,
}

impl Architecture {
    pub fn new(bit_count: u32) -> Result<Self, ParamsError> {
        Ok(Self::from_params(ArchParams::new(bit_count)?))
    }

    pub fn from_params(params: ArchParams) -> Self {
        let masks = Masks::new(&params);
        let operations = OperationTable::new(&params, &masks);

        Self {
            params,
            masks,
            operations,
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for Architecture {
    fn default() -> Self {
        Self::from_params(ArchParams::default())
    }
}
