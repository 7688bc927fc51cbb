use libls8isa::{
    operation::{kind::Operation, OperationDescriptor},
    Word,
};

use crate::{
    alu::{flags::ALUFlags, ALU},
    output::{self, Output},
    Processor,
};

use super::{ExecuteErr, ExecuteOk};

pub type Handler<O> = fn(&mut Processor<O>, &OperationDescriptor) -> Result<ExecuteOk, ExecuteErr>;

type HandlerResult = Result<ExecuteOk, ExecuteErr>;

impl<O> Processor<O>
where
    O: Output,
{
    /// Handler bound to `operation`, resolved once per opcode when the processor is built.
    pub(crate) fn handler_for(operation: Operation) -> Option<Handler<O>> {
        let handler: Handler<O> = match operation {
            Operation::Nop => Self::nop,
            Operation::Halt => Self::halt_operation,

            Operation::LoadImmediate => Self::load_immediate,
            Operation::Load => Self::load_operation,
            Operation::Store => Self::store,

            Operation::Push => Self::push_operation,
            Operation::Pop => Self::pop_operation,
            Operation::Call => Self::call,
            Operation::ReturnFromCall => Self::return_from_call,

            Operation::PrintNumber => Self::print_number,
            Operation::PrintAlpha => Self::print_alpha,

            Operation::Increment => |this, _| this.unary(ALU::inc),
            Operation::Decrement => |this, _| this.unary(ALU::dec),
            Operation::BitwiseNot => |this, _| this.unary(ALU::not),

            Operation::Add => |this, _| this.binary(|alu, a, b| Some(alu.add(a, b))),
            Operation::Subtract => |this, _| this.binary(|alu, a, b| Some(alu.sub(a, b))),
            Operation::Multiply => |this, _| this.binary(|alu, a, b| Some(alu.mul(a, b))),
            Operation::Divide => |this, _| this.binary(|alu, a, b| alu.div(a, b)),
            Operation::Modulo => |this, _| this.binary(|alu, a, b| alu.modulo(a, b)),
            Operation::BitwiseAnd => |this, _| this.binary(|alu, a, b| Some(alu.and(a, b))),
            Operation::BitwiseOr => |this, _| this.binary(|alu, a, b| Some(alu.or(a, b))),
            Operation::BitwiseXor => |this, _| this.binary(|alu, a, b| Some(alu.xor(a, b))),
            Operation::ShiftLeft => |this, _| this.binary(|alu, a, b| Some(alu.shl(a, b))),
            Operation::ShiftRight => |this, _| this.binary(|alu, a, b| Some(alu.shr(a, b))),
            Operation::Compare => Self::compare,

            Operation::Jump => |this, descriptor| this.jump_if(descriptor, true),
            Operation::JumpEqual => |this, descriptor| {
                let condition = this.alu.flagged(ALUFlags::EQ);
                this.jump_if(descriptor, condition)
            },
            Operation::JumpNotEqual => |this, descriptor| {
                let condition = this.alu.flagged_any(ALUFlags::NEQ);
                this.jump_if(descriptor, condition)
            },
            Operation::JumpGreater => |this, descriptor| {
                let condition = this.alu.flagged(ALUFlags::GT);
                this.jump_if(descriptor, condition)
            },
            Operation::JumpLess => |this, descriptor| {
                let condition = this.alu.flagged(ALUFlags::LT);
                this.jump_if(descriptor, condition)
            },
            Operation::JumpLessEqual => |this, descriptor| {
                let condition = this.alu.flagged_any(ALUFlags::NGT);
                this.jump_if(descriptor, condition)
            },
            Operation::JumpGreaterEqual => |this, descriptor| {
                let condition = this.alu.flagged_any(ALUFlags::NLT);
                this.jump_if(descriptor, condition)
            },

            // Interrupts aren't modelled.
            Operation::Interrupt | Operation::ReturnFromInterrupt => return None,
        };

        Some(handler)
    }

    fn nop(&mut self, _: &OperationDescriptor) -> HandlerResult {
        Ok(ExecuteOk::Normal)
    }

    fn halt_operation(&mut self, _: &OperationDescriptor) -> HandlerResult {
        Ok(ExecuteOk::Halted)
    }

    fn load_immediate(&mut self, _: &OperationDescriptor) -> HandlerResult {
        let dest = self.reg_operand(1)?;
        let value = self.operand(2)?;

        self.set_reg(dest, value)?;
        Ok(ExecuteOk::Normal)
    }

    fn load_operation(&mut self, _: &OperationDescriptor) -> HandlerResult {
        let dest = self.reg_operand(1)?;
        let src_addr = self.reg(self.reg_operand(2)?)?;

        let value = self.mem(src_addr)?;
        self.set_reg(dest, value)?;
        Ok(ExecuteOk::Normal)
    }

    fn store(&mut self, _: &OperationDescriptor) -> HandlerResult {
        let dest_addr = self.reg(self.reg_operand(1)?)?;
        let value = self.reg(self.reg_operand(2)?)?;

        self.set_mem(dest_addr, value)?;
        Ok(ExecuteOk::Normal)
    }

    fn push_operation(&mut self, _: &OperationDescriptor) -> HandlerResult {
        let value = self.reg(self.reg_operand(1)?)?;

        self.push(value)?;
        Ok(ExecuteOk::Normal)
    }

    fn pop_operation(&mut self, _: &OperationDescriptor) -> HandlerResult {
        let dest = self.reg_operand(1)?;

        let value = self.pop()?;
        self.set_reg(dest, value)?;
        Ok(ExecuteOk::Normal)
    }

    fn call(&mut self, descriptor: &OperationDescriptor) -> HandlerResult {
        let target = self.reg(self.reg_operand(1)?)?;
        let return_addr = self.advance_target(descriptor.word_count())?;

        self.push(return_addr)?;
        self.program_pointer = target;
        Ok(ExecuteOk::Normal)
    }

    fn return_from_call(&mut self, _: &OperationDescriptor) -> HandlerResult {
        self.program_pointer = self.pop()?;
        Ok(ExecuteOk::Normal)
    }

    fn print_number(&mut self, _: &OperationDescriptor) -> HandlerResult {
        let value = self.reg(self.reg_operand(1)?)?;

        self.output.print_number(value);
        Ok(ExecuteOk::Normal)
    }

    fn print_alpha(&mut self, _: &OperationDescriptor) -> HandlerResult {
        let value = self.reg(self.reg_operand(1)?)?;

        self.output.print_alpha(output::alpha(value));
        Ok(ExecuteOk::Normal)
    }

    fn compare(&mut self, _: &OperationDescriptor) -> HandlerResult {
        let a = self.reg(self.reg_operand(1)?)?;
        let b = self.reg(self.reg_operand(2)?)?;

        self.alu.compare(a, b);
        Ok(ExecuteOk::Normal)
    }

    /// Ra ← op(Ra)
    fn unary(&mut self, op: fn(&ALU, Word) -> Word) -> HandlerResult {
        let reg_a = self.reg_operand(1)?;
        let a = self.reg(reg_a)?;

        let result = op(&self.alu, a);
        self.set_reg(reg_a, result)?;
        Ok(ExecuteOk::Normal)
    }

    /// Ra ← op(Ra, Rb). `None` from the ALU means a zero divisor.
    fn binary<F>(&mut self, op: F) -> HandlerResult
    where
        F: FnOnce(&ALU, Word, Word) -> Option<Word>,
    {
        let reg_a = self.reg_operand(1)?;
        let a = self.reg(reg_a)?;
        let b = self.reg(self.reg_operand(2)?)?;

        let result = op(&self.alu, a, b).ok_or(ExecuteErr::DivisionByZero {
            address: self.program_pointer,
        })?;

        self.set_reg(reg_a, result)?;
        Ok(ExecuteOk::Normal)
    }

    /// Moves to Ra when `condition` holds, otherwise past this instruction.
    fn jump_if(&mut self, descriptor: &OperationDescriptor, condition: bool) -> HandlerResult {
        let target = self.reg(self.reg_operand(1)?)?;

        if condition {
            self.program_pointer = target;
        } else {
            self.advance(descriptor.word_count())?;
        }

        Ok(ExecuteOk::Normal)
    }
}
