use std::fmt::Display;

use bimap::BiMap;
use lazy_static::lazy_static;

lazy_static! {
    /// Canonical 8-bit opcodes. Existing programs depend on these exact values.
    static ref OPERATION_OPCODE_BIMAP: BiMap<Operation, u8> = BiMap::from_iter([
        (Operation::Nop, 0b0000_0000),
        (Operation::Halt, 0b0000_0001),
        (Operation::ReturnFromCall, 0b0001_0001),
        (Operation::ReturnFromInterrupt, 0b0001_0011),
        (Operation::Push, 0b0100_0101),
        (Operation::Pop, 0b0100_0110),
        (Operation::PrintNumber, 0b0100_0111),
        (Operation::PrintAlpha, 0b0100_1000),
        (Operation::Call, 0b0101_0000),
        (Operation::Interrupt, 0b0101_0010),
        (Operation::Jump, 0b0101_0100),
        (Operation::JumpEqual, 0b0101_0101),
        (Operation::JumpNotEqual, 0b0101_0110),
        (Operation::JumpGreater, 0b0101_0111),
        (Operation::JumpLess, 0b0101_1000),
        (Operation::JumpLessEqual, 0b0101_1001),
        (Operation::JumpGreaterEqual, 0b0101_1010),
        (Operation::Increment, 0b0110_0101),
        (Operation::Decrement, 0b0110_0110),
        (Operation::BitwiseNot, 0b0110_1001),
        (Operation::LoadImmediate, 0b1000_0010),
        (Operation::Load, 0b1000_0011),
        (Operation::Store, 0b1000_0100),
        (Operation::Add, 0b1010_0000),
        (Operation::Subtract, 0b1010_0001),
        (Operation::Multiply, 0b1010_0010),
        (Operation::Divide, 0b1010_0011),
        (Operation::Modulo, 0b1010_0100),
        (Operation::Compare, 0b1010_0111),
        (Operation::BitwiseAnd, 0b1010_1000),
        (Operation::BitwiseOr, 0b1010_1010),
        (Operation::BitwiseXor, 0b1010_1011),
        (Operation::ShiftLeft, 0b1010_1100),
        (Operation::ShiftRight, 0b1010_1101),
    ]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Nop,
    Halt,

    ReturnFromCall,
    ReturnFromInterrupt,

    Push,
    Pop,

    PrintNumber,
    PrintAlpha,

    Call,
    Interrupt,

    Jump,
    JumpEqual,
    JumpNotEqual,
    JumpGreater,
    JumpLess,
    JumpLessEqual,
    JumpGreaterEqual,

    Increment,
    Decrement,
    BitwiseNot,

    LoadImmediate,
    Load,
    Store,

    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Compare,

    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
}

impl Operation {
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        OPERATION_OPCODE_BIMAP.get_by_right(&opcode).copied()
    }

    /// The canonical 8-bit opcode.
    pub fn opcode(&self) -> u8 {
        *OPERATION_OPCODE_BIMAP
            .get_by_left(self)
            .expect("No opcode mapping for operation")
    }

    /// Every listed operation, ordered by canonical opcode.
    pub fn all() -> Vec<Self> {
        let mut operations: Vec<_> = OPERATION_OPCODE_BIMAP.left_values().copied().collect();
        operations.sort_by_key(|operation| operation.opcode());
        operations
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nop => "NO OPERATION",
            Self::Halt => "HALT",
            Self::ReturnFromCall => "RETURN FROM CALL",
            Self::ReturnFromInterrupt => "RETURN FROM INTERRUPT",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::PrintNumber => "PRINT NUMBER",
            Self::PrintAlpha => "PRINT ALPHA",
            Self::Call => "CALL",
            Self::Interrupt => "INTERRUPT",
            Self::Jump => "JUMP",
            Self::JumpEqual => "JUMP WHEN FLAGGED EQUAL",
            Self::JumpNotEqual => "JUMP WHEN FLAGGED NOT EQUAL",
            Self::JumpGreater => "JUMP WHEN FLAGGED GREATER THAN",
            Self::JumpLess => "JUMP WHEN FLAGGED LESS THAN",
            Self::JumpLessEqual => "JUMP WHEN FLAGGED LESS THAN OR EQUAL",
            Self::JumpGreaterEqual => "JUMP WHEN FLAGGED GREATER THAN OR EQUAL",
            Self::Increment => "INCREMENT",
            Self::Decrement => "DECREMENT",
            Self::BitwiseNot => "BITWISE NOT",
            Self::LoadImmediate => "LOAD IMMEDIATE",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVISION",
            Self::Modulo => "MODULO",
            Self::Compare => "COMPARE",
            Self::BitwiseAnd => "BITWISE AND",
            Self::BitwiseOr => "BITWISE OR",
            Self::BitwiseXor => "BITWISE XOR",
            Self::ShiftLeft => "BITWISE SHIFT LEFT",
            Self::ShiftRight => "BITWISE SHIFT RIGHT",
        }
    }

    pub fn code_name(&self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Halt => "HLT",
            Self::ReturnFromCall => "RET",
            Self::ReturnFromInterrupt => "IRET",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::PrintNumber => "PRN",
            Self::PrintAlpha => "PRA",
            Self::Call => "CALL",
            Self::Interrupt => "INT",
            Self::Jump => "JMP",
            Self::JumpEqual => "JEQ",
            Self::JumpNotEqual => "JNE",
            Self::JumpGreater => "JGT",
            Self::JumpLess => "JLT",
            Self::JumpLessEqual => "JLE",
            Self::JumpGreaterEqual => "JGE",
            Self::Increment => "INC",
            Self::Decrement => "DEC",
            Self::BitwiseNot => "NOT",
            Self::LoadImmediate => "LDI",
            Self::Load => "LD",
            Self::Store => "ST",
            Self::Add => "ADD",
            Self::Subtract => "SUB",
            Self::Multiply => "MUL",
            Self::Divide => "DIV",
            Self::Modulo => "MOD",
            Self::Compare => "CMP",
            Self::BitwiseAnd => "AND",
            Self::BitwiseOr => "OR",
            Self::BitwiseXor => "XOR",
            Self::ShiftLeft => "SHL",
            Self::ShiftRight => "SHR",
        }
    }

    /// Whether the word `offset` positions after the opcode is a literal value rather than a register index.
    pub fn operand_is_immediate(&self, offset: usize) -> bool {
        matches!((self, offset), (Self::LoadImmediate, 2))
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code_name())
    }
}
