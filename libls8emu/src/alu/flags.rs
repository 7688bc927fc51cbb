use bitflags::bitflags;
use libls8isa::{
    masks::block,
    params::{FLAG_EQ_SHIFT, FLAG_GT_SHIFT, FLAG_LT_SHIFT, FLAG_WIDTH},
};

bitflags! {
    /// Comparison outcome bits. The composites are queries, never stored on their own.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ALUFlags: u16 {
        const EQ = block(FLAG_WIDTH, FLAG_EQ_SHIFT);
        const GT = block(FLAG_WIDTH, FLAG_GT_SHIFT);
        const LT = block(FLAG_WIDTH, FLAG_LT_SHIFT);

        const NEQ = Self::LT.bits() | Self::GT.bits();
        const NGT = Self::LT.bits() | Self::EQ.bits();
        const NLT = Self::EQ.bits() | Self::GT.bits();
    }
}
