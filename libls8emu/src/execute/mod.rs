use libls8isa::{operation::kind::Operation, Register, Word};
use thiserror::Error;

use crate::{output::Output, HaltReason, Processor};

pub mod handlers;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOk {
    Normal,
    Halted,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteErr {
    #[error("Unknown opcode {opcode:#04x} at {address:#04x}")]
    UnknownOpcode { opcode: Word, address: Word },

    #[error("Operation {operation} at {address:#04x} is not implemented")]
    UnimplementedOperation { operation: Operation, address: Word },

    #[error("Memory access violation at {0:#x}")]
    MemoryAccessViolation(usize),

    #[error("Register R{0} out of range")]
    RegisterOutOfRange(Word),

    #[error("Division by zero at {address:#04x}")]
    DivisionByZero { address: Word },

    #[error("Stack overflow")]
    StackOverflow,

    #[error("Stack underflow")]
    StackUnderflow,

    #[error("Processor is not running")]
    NotRunning,
}

impl<O> Processor<O>
where
    O: Output,
{
    /// Starts the processor if needed and executes until it stops.
    pub fn run(&mut self) -> Result<(), ExecuteErr> {
        self.start();

        while self.is_running() {
            self.step()?;
        }

        Ok(())
    }

    /// Like [`Self::run`], but gives up after `limit` cycles and leaves the processor running.
    pub fn run_cycles(&mut self, limit: u64) -> Result<ExecuteOk, ExecuteErr> {
        self.start();

        for _ in 0..limit {
            if let ExecuteOk::Halted = self.step()? {
                return Ok(ExecuteOk::Halted);
            }
        }

        Ok(ExecuteOk::Normal)
    }

    /// One fetch-decode-execute-advance cycle. Any fault stops the processor.
    pub fn step(&mut self) -> Result<ExecuteOk, ExecuteErr> {
        if !self.is_running() {
            return Err(ExecuteErr::NotRunning);
        }

        match self.execute_operation() {
            Ok(ExecuteOk::Halted) => {
                self.cycles += 1;
                self.halt(HaltReason::Halted);
                Ok(ExecuteOk::Halted)
            }
            Ok(ExecuteOk::Normal) => {
                self.cycles += 1;
                Ok(ExecuteOk::Normal)
            }
            Err(e) => {
                log::warn!("{}", e);
                self.halt(HaltReason::Fault(e));
                Err(e)
            }
        }
    }

    fn execute_operation(&mut self) -> Result<ExecuteOk, ExecuteErr> {
        let address = self.program_pointer;
        let opcode = self.mem(address)?;

        let descriptor = *self
            .arch
            .operations
            .get(opcode)
            .map_err(|_| ExecuteErr::UnknownOpcode { opcode, address })?;

        let handler = self
            .handlers
            .get(opcode as usize)
            .copied()
            .flatten()
            .ok_or(ExecuteErr::UnimplementedOperation {
                operation: descriptor.operation,
                address,
            })?;

        // Resolved before the handler so running off memory has no side effects.
        // HLT leaves the pointer on itself.
        let next = if descriptor.sets_pointer || descriptor.operation == Operation::Halt {
            None
        } else {
            Some(self.advance_target(descriptor.word_count())?)
        };

        log::trace!("{:#04x}: {}", address, descriptor.code_name);

        let outcome = handler(self, &descriptor)?;

        if let (ExecuteOk::Normal, Some(next)) = (outcome, next) {
            self.program_pointer = next;
        }

        Ok(outcome)
    }

    /// Address `words` past the program pointer, if it is inside memory.
    pub(crate) fn advance_target(&self, words: usize) -> Result<Word, ExecuteErr> {
        let target = self.program_pointer as usize + words;

        if target >= self.memory.len() {
            return Err(ExecuteErr::MemoryAccessViolation(target));
        }

        Ok(target as Word)
    }

    pub(crate) fn advance(&mut self, words: usize) -> Result<(), ExecuteErr> {
        self.program_pointer = self.advance_target(words)?;
        Ok(())
    }

    /// Word `index` positions after the opcode.
    fn operand(&self, index: usize) -> Result<Word, ExecuteErr> {
        let addr = self.program_pointer as usize + index;
        self.memory
            .read(addr)
            .ok_or(ExecuteErr::MemoryAccessViolation(addr))
    }

    /// Register index named by operand `index`.
    fn reg_operand(&self, index: usize) -> Result<Register, ExecuteErr> {
        let register = self.operand(index)?;

        if register as usize >= self.reg_file.len() {
            return Err(ExecuteErr::RegisterOutOfRange(register));
        }

        Ok(register as Register)
    }

    fn reg(&self, index: Register) -> Result<Word, ExecuteErr> {
        self.reg_file
            .register(index)
            .ok_or(ExecuteErr::RegisterOutOfRange(index as Word))
    }

    fn set_reg(&mut self, index: Register, value: Word) -> Result<(), ExecuteErr> {
        self.reg_file
            .set_register(index, value)
            .map(|_| ())
            .ok_or(ExecuteErr::RegisterOutOfRange(index as Word))
    }

    fn mem(&self, addr: Word) -> Result<Word, ExecuteErr> {
        self.memory
            .read(addr as usize)
            .ok_or(ExecuteErr::MemoryAccessViolation(addr as usize))
    }

    fn set_mem(&mut self, addr: Word, value: Word) -> Result<(), ExecuteErr> {
        self.memory
            .write(addr as usize, value)
            .map(|_| ())
            .ok_or(ExecuteErr::MemoryAccessViolation(addr as usize))
    }

    fn push(&mut self, value: Word) -> Result<(), ExecuteErr> {
        let register = self.arch.params.register_of_stack_pointer;
        let stack_pointer = self.reg(register)?;

        if stack_pointer >= self.arch.masks.word {
            return Err(ExecuteErr::StackOverflow);
        }

        let stack_pointer = stack_pointer + 1;
        self.set_mem(stack_pointer, value)?;
        self.set_reg(register, stack_pointer)
    }

    fn pop(&mut self) -> Result<Word, ExecuteErr> {
        let register = self.arch.params.register_of_stack_pointer;
        let stack_pointer = self.reg(register)?;

        if stack_pointer == 0 {
            return Err(ExecuteErr::StackUnderflow);
        }

        let value = self.mem(stack_pointer)?;
        self.set_reg(register, stack_pointer - 1)?;
        Ok(value)
    }
}
