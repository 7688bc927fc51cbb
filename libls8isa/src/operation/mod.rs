use std::fmt::Display;

use kind::Operation;

use crate::{masks::Masks, params::ArchParams, Word};

pub mod kind;
pub mod table;

/// The four subfields packed into an opcode word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeFields {
    pub args: u8,
    pub uses_alu: bool,
    pub sets_pointer: bool,
    pub identifier: u8,
}

impl OpcodeFields {
    pub fn decode(opcode: Word, params: &ArchParams, masks: &Masks) -> Self {
        let field = |field: crate::params::Field, mask: Word| {
            field.extract(masks.and_mask(opcode, mask))
        };

        Self {
            args: field(params.operation_args, masks.operation_args) as u8,
            uses_alu: field(params.operation_uses_alu, masks.operation_uses_alu) != 0,
            sets_pointer: field(params.operation_sets_pointer, masks.operation_sets_pointer) != 0,
            identifier: field(params.operation_identifier, masks.operation_identifier) as u8,
        }
    }

    pub fn encode(&self, params: &ArchParams) -> Word {
        params.operation_args.insert(self.args as Word)
            | params.operation_uses_alu.insert(self.uses_alu as Word)
            | params.operation_sets_pointer.insert(self.sets_pointer as Word)
            | params.operation_identifier.insert(self.identifier as Word)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    pub opcode: Word,
    pub operation: Operation,
    pub name: &'static str,
    pub code_name: &'static str,
    pub args: u8,
    pub uses_alu: bool,
    pub sets_pointer: bool,
    pub identifier: u8,
}

impl OperationDescriptor {
    pub fn new(opcode: Word, operation: Operation, fields: OpcodeFields) -> Self {
        Self {
            opcode,
            operation,
            name: operation.name(),
            code_name: operation.code_name(),
            args: fields.args,
            uses_alu: fields.uses_alu,
            sets_pointer: fields.sets_pointer,
            identifier: fields.identifier,
        }
    }

    pub fn fields(&self) -> OpcodeFields {
        OpcodeFields {
            args: self.args,
            uses_alu: self.uses_alu,
            sets_pointer: self.sets_pointer,
            identifier: self.identifier,
        }
    }

    /// Words taken by the opcode and its operands.
    pub fn word_count(&self) -> usize {
        1 + self.args as usize
    }
}

impl Display for OperationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{} ({}) args={} alu={} sets_pointer={} id={}",
            self.code_name,
            self.name,
            self.args,
            self.uses_alu as u8,
            self.sets_pointer as u8,
            self.identifier
        ))
    }
}
