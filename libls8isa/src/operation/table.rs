use std::collections::HashMap;

use thiserror::Error;

use crate::{masks::Masks, params::ArchParams, Word};

use super::{kind::Operation, OpcodeFields, OperationDescriptor};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OperationTableError {
    #[error("Unknown opcode {0:#04x}")]
    UnknownOpcode(Word),
}

/// Descriptors for every listed opcode, keyed by the opcode word of the configured layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTable {
    descriptors: HashMap<Word, OperationDescriptor>,
}

impl OperationTable {
    pub fn new(params: &ArchParams, masks: &Masks) -> Self {
        // The listed opcodes are written for the 8-bit layout.
        let canonical_params = ArchParams::default();
        let canonical_masks = Masks::new(&canonical_params);

        let descriptors = Operation::all()
            .into_iter()
            .map(|operation| {
                let fields = OpcodeFields::decode(
                    operation.opcode() as Word,
                    &canonical_params,
                    &canonical_masks,
                );
                let opcode = masks.word_mask(fields.encode(params));

                (opcode, OperationDescriptor::new(opcode, operation, fields))
            })
            .collect();

        Self { descriptors }
    }

    pub fn contains(&self, opcode: Word) -> bool {
        self.descriptors.contains_key(&opcode)
    }

    pub fn get(&self, opcode: Word) -> Result<&OperationDescriptor, OperationTableError> {
        self.descriptors
            .get(&opcode)
            .ok_or(OperationTableError::UnknownOpcode(opcode))
    }

    pub fn by_operation(&self, operation: Operation) -> Option<&OperationDescriptor> {
        self.descriptors
            .values()
            .find(|descriptor| descriptor.operation == operation)
    }

    /// Descriptors in ascending opcode order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        let mut descriptors: Vec<_> = self.descriptors.values().collect();
        descriptors.sort_by_key(|descriptor| descriptor.opcode);
        descriptors.into_iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (ArchParams, Masks, OperationTable) {
        let params = ArchParams::default();
        let masks = Masks::new(&params);
        let table = OperationTable::new(&params, &masks);
        (params, masks, table)
    }

    #[test]
    fn lists_every_operation() {
        let (_, _, table) = table();

        assert_eq!(table.len(), 34);
        assert!(table.contains(0x82));
        assert!(!table.contains(0xFF));
        assert_eq!(table.get(0xFF), Err(OperationTableError::UnknownOpcode(0xFF)));
    }

    #[test]
    fn decodes_load_immediate() {
        let (_, _, table) = table();
        let descriptor = table.get(0b1000_0010).unwrap();

        assert_eq!(descriptor.operation, Operation::LoadImmediate);
        assert_eq!(descriptor.code_name, "LDI");
        assert_eq!(descriptor.name, "LOAD IMMEDIATE");
        assert_eq!(descriptor.args, 2);
        assert!(!descriptor.uses_alu);
        assert!(!descriptor.sets_pointer);
        assert_eq!(descriptor.identifier, 2);
    }

    #[test]
    fn control_transfers_set_the_pointer() {
        let (_, _, table) = table();

        for operation in [
            Operation::Call,
            Operation::ReturnFromCall,
            Operation::Jump,
            Operation::JumpEqual,
            Operation::JumpNotEqual,
            Operation::JumpGreater,
            Operation::JumpLess,
            Operation::JumpLessEqual,
            Operation::JumpGreaterEqual,
        ] {
            let descriptor = table.by_operation(operation).unwrap();
            assert!(descriptor.sets_pointer, "{}", descriptor);
        }

        assert!(!table.get(0x47).unwrap().sets_pointer);
        assert!(!table.get(0x01).unwrap().sets_pointer);
    }

    #[test]
    fn alu_marker() {
        let (_, _, table) = table();

        assert!(table.get(0xA0).unwrap().uses_alu);
        assert!(table.get(0x65).unwrap().uses_alu);
        assert!(!table.get(0x45).unwrap().uses_alu);
    }

    #[test]
    fn fields_round_trip_to_the_opcode() {
        let (params, masks, table) = table();

        for descriptor in table.iter() {
            let fields = OpcodeFields::decode(descriptor.opcode, &params, &masks);

            assert_eq!(fields, descriptor.fields());
            assert_eq!(fields.encode(&params), descriptor.opcode);
            assert_eq!(descriptor.opcode, descriptor.operation.opcode() as Word);
        }
    }

    #[test]
    fn wider_layout_keeps_the_fields() {
        let params = ArchParams::new(16).unwrap();
        let masks = Masks::new(&params);
        let table = OperationTable::new(&params, &masks);

        let descriptor = table.by_operation(Operation::LoadImmediate).unwrap();

        assert_eq!(descriptor.opcode, 0b1000_0000_0000_0010);
        assert_eq!(descriptor.args, 2);
        assert_eq!(
            OpcodeFields::decode(descriptor.opcode, &params, &masks),
            descriptor.fields()
        );
    }

    #[test]
    fn iterates_in_opcode_order() {
        let (_, _, table) = table();
        let opcodes: Vec<_> = table.iter().map(|descriptor| descriptor.opcode).collect();

        let mut sorted = opcodes.clone();
        sorted.sort();

        assert_eq!(opcodes, sorted);
        assert_eq!(opcodes.first(), Some(&0x00));
        assert_eq!(opcodes.last(), Some(&0xAD));
    }
}
