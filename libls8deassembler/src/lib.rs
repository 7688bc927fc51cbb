use std::{fmt::Display, iter::Peekable};

use libls8isa::{
    operation::{table::OperationTable, OperationDescriptor},
    Word,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeassembledOperation {
    pub address: usize,
    pub descriptor: OperationDescriptor,
    pub operands: Vec<Word>,
}

impl Display for DeassembledOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.descriptor.code_name)?;

        for (index, operand) in self.operands.iter().enumerate() {
            f.write_str(if index == 0 { " " } else { ", " })?;

            // Operand 0 is the word right after the opcode.
            if self.descriptor.operation.operand_is_immediate(index + 1) {
                f.write_fmt(format_args!("{}", operand))?;
            } else {
                f.write_fmt(format_args!("R{}", operand))?;
            }
        }

        Ok(())
    }
}

pub struct Deassembler<'a, I>
where
    I: Iterator<Item = &'a Word>,
{
    operations: &'a OperationTable,
    code_iter: Peekable<I>,
    address: usize,
}

impl<'a, I> Deassembler<'a, I>
where
    I: Iterator<Item = &'a Word>,
{
    pub fn new(operations: &'a OperationTable, code_iter: I) -> Self {
        Self {
            operations,
            code_iter: code_iter.peekable(),
            address: 0,
        }
    }

    pub fn deassemble(mut self) -> Result<Vec<DeassembledOperation>, String> {
        let mut output = Vec::new();

        while self.code_iter.peek().is_some() {
            output.push(self.deassemble_operation()?);
        }

        Ok(output)
    }

    /// One line per operation, prefixed with its address. Stops at the first word it can't decode.
    pub fn deassemble_text(mut self) -> String {
        let mut lines = Vec::new();

        while self.code_iter.peek().is_some() {
            let address = self.address;

            match self.deassemble_operation() {
                Ok(operation) => lines.push(format!("{:#04x}: {}", address, operation)),
                Err(e) => {
                    lines.push(format!("{:#04x}: {}", address, e));
                    break;
                }
            }
        }

        lines.join("\n")
    }

    pub fn deassemble_operation(&mut self) -> Result<DeassembledOperation, String> {
        let address = self.address;
        let opcode = self
            .next_word()
            .ok_or("<out of deassembler bounds>".to_string())?;

        let descriptor = *self
            .operations
            .get(opcode)
            .map_err(|e| format!("<{}>", e))?;

        let operands = (0..descriptor.args)
            .map(|_| self.next_word().ok_or("<incomplete operands>".to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DeassembledOperation {
            address,
            descriptor,
            operands,
        })
    }

    pub fn deassemble_operation_text(&mut self) -> String {
        match self.deassemble_operation() {
            Ok(operation) => format!("{}", operation),
            Err(e) => e,
        }
    }

    fn next_word(&mut self) -> Option<Word> {
        let word = *self.code_iter.next()?;
        self.address += 1;
        Some(word)
    }
}
