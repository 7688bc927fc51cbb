use std::sync::Arc;

use alu::{flags::ALUFlags, ALU};
use execute::{handlers::Handler, ExecuteErr};
use libls8isa::{
    format::{format_word, Radix},
    Architecture, Register, Word,
};
use memory::Memory;
use output::{Output, StdoutOutput};
use regfile::RegFile;
use thiserror::Error;

pub mod alu;
pub mod execute;
pub mod memory;
pub mod output;
pub mod regfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Stopped,
    Running,
}

/// Why the processor last left the running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// A HLT instruction was executed.
    Halted,
    /// The caller stopped the processor.
    Stopped,
    Fault(ExecuteErr),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    #[error("Program of {len} words doesn't fit into memory of {size} words")]
    TooLarge { len: usize, size: usize },
}

pub struct Processor<O = StdoutOutput>
where
    O: Output,
{
    pub memory: Memory,
    pub reg_file: RegFile,
    pub alu: ALU,
    pub program_pointer: Word,
    pub output: O,

    arch: Arc<Architecture>,
    handlers: Vec<Option<Handler<O>>>,
    state: State,
    halt_reason: Option<HaltReason>,
    cycles: u64,
}

impl<O> Processor<O>
where
    O: Output,
{
    pub fn new(arch: Arc<Architecture>, output: O) -> Self {
        let params = &arch.params;
        let masks = arch.masks;

        let mut reg_file = RegFile::new(params.register_count(), masks);
        reg_file.set_register(
            params.register_of_stack_pointer,
            params.initial_stack_pointer(),
        );

        let memory = Memory::new(params.word_size, masks);

        let mut handlers = vec![None; params.word_size];
        for descriptor in arch.operations.iter() {
            handlers[descriptor.opcode as usize] = Self::handler_for(descriptor.operation);
        }

        Self {
            memory,
            reg_file,
            alu: ALU::new(masks),
            program_pointer: 0,
            output,

            arch,
            handlers,
            state: State::Stopped,
            halt_reason: None,
            cycles: 0,
        }
    }

    /// Writes `program` to consecutive addresses from 0.
    pub fn load(&mut self, program: &[Word]) -> Result<(), LoadError> {
        self.memory
            .load(0, program)
            .ok_or(LoadError::TooLarge {
                len: program.len(),
                size: self.memory.len(),
            })?;

        log::debug!("Loaded {} words", program.len());
        Ok(())
    }

    pub fn arch(&self) -> &Architecture {
        &self.arch
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halt_reason
    }

    /// Operations executed since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn start(&mut self) {
        if self.state == State::Stopped {
            log::debug!("Starting at {:#04x}", self.program_pointer);
            self.state = State::Running;
            self.halt_reason = None;
        }
    }

    pub fn stop(&mut self) {
        if self.state == State::Running {
            self.halt(HaltReason::Stopped);
        }
    }

    pub(crate) fn halt(&mut self, reason: HaltReason) {
        log::debug!(
            "Stopping at {:#04x} after {} cycles: {:?}",
            self.program_pointer,
            self.cycles,
            reason
        );

        self.state = State::Stopped;
        self.halt_reason = Some(reason);
    }

    pub fn register(&self, index: Register) -> Option<Word> {
        self.reg_file.register(index)
    }

    pub fn stack_pointer(&self) -> Word {
        self.reserved_register(self.arch.params.register_of_stack_pointer)
    }

    pub fn interrupt_status(&self) -> Word {
        self.reserved_register(self.arch.params.register_of_interrupt_status)
    }

    pub fn interrupt_mask(&self) -> Word {
        self.reserved_register(self.arch.params.register_of_interrupt_mask)
    }

    fn reserved_register(&self, index: Register) -> Word {
        // Reserved indices are always inside the register file.
        self.reg_file.register(index).unwrap_or_default()
    }

    pub fn flag_eq(&self) -> bool {
        self.alu.flagged(ALUFlags::EQ)
    }

    pub fn flag_gt(&self) -> bool {
        self.alu.flagged(ALUFlags::GT)
    }

    pub fn flag_lt(&self) -> bool {
        self.alu.flagged(ALUFlags::LT)
    }

    pub fn flag_neq(&self) -> bool {
        self.alu.flagged_any(ALUFlags::NEQ)
    }

    pub fn flag_ngt(&self) -> bool {
        self.alu.flagged_any(ALUFlags::NGT)
    }

    pub fn flag_nlt(&self) -> bool {
        self.alu.flagged_any(ALUFlags::NLT)
    }

    /// One line of pointer, stack pointer, flags, the next three memory words and all registers.
    pub fn trace_line(&self) -> String {
        let bit_count = self.arch.params.bit_count;
        let hex = |value: Word| format_word(value, Radix::Hexadecimal, bit_count);

        let upcoming = (0..3)
            .map(|offset| {
                self.memory
                    .read(self.program_pointer as usize + offset)
                    .map(hex)
                    .unwrap_or_else(|| "--".to_string())
            })
            .collect::<Vec<_>>()
            .join(" ");

        let registers = self
            .reg_file
            .iter()
            .map(|value| hex(*value))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            "TRACE --- {} {} {} | {} | {}",
            hex(self.program_pointer),
            hex(self.stack_pointer()),
            hex(self.alu.flags.bits()),
            upcoming,
            registers
        )
    }
}

impl<O> Processor<O>
where
    O: Output,
{
    /// Pointers, reserved registers, flags and halt reason, for end-of-run dumps.
    pub fn status_line(&self) -> String {
        let bit_count = self.arch.params.bit_count;
        let hex = |value: Word| format_word(value, Radix::Hexadecimal, bit_count);

        let halt_reason = match self.halt_reason {
            None => "running".to_string(),
            Some(HaltReason::Halted) => "halted".to_string(),
            Some(HaltReason::Stopped) => "stopped".to_string(),
            Some(HaltReason::Fault(e)) => format!("fault: {}", e),
        };

        format!(
            "PP {} SP {} IS {} IM {} | EQ {} GT {} LT {} | {} cycles, {}",
            hex(self.program_pointer),
            hex(self.stack_pointer()),
            hex(self.interrupt_status()),
            hex(self.interrupt_mask()),
            self.flag_eq() as u8,
            self.flag_gt() as u8,
            self.flag_lt() as u8,
            self.cycles,
            halt_reason
        )
    }
}

impl Processor<StdoutOutput> {
    pub fn with_stdout(arch: Arc<Architecture>) -> Self {
        Self::new(arch, StdoutOutput)
    }
}
