//! Concrete interpreter for ALU programs

use crate::ir::{Instruction, Operand};
use crate::semantics::expr::{BinaryOp, EvalError};
use crate::semantics::state::ConcreteState;

/// Map a binary instruction to its operator
pub fn binary_op(instruction: &Instruction) -> Option<BinaryOp> {
    match instruction {
        Instruction::Inp { .. } => None,
        Instruction::Add { .. } => Some(BinaryOp::Add),
        Instruction::Mul { .. } => Some(BinaryOp::Mul),
        Instruction::Div { .. } => Some(BinaryOp::Div),
        Instruction::Mod { .. } => Some(BinaryOp::Mod),
        Instruction::Eql { .. } => Some(BinaryOp::Eql),
    }
}

fn eval_operand(state: &ConcreteState, operand: &Operand) -> i64 {
    match operand {
        Operand::Register(reg) => state.get(*reg),
        Operand::Immediate(imm) => *imm,
    }
}

/// Apply a single instruction, reading from `digits` on `inp`
pub fn apply_instruction_concrete(
    mut state: ConcreteState,
    instruction: &Instruction,
    digits: &[i64],
) -> Result<ConcreteState, EvalError> {
    let rd = instruction.destination();
    match (binary_op(instruction), instruction.operand()) {
        (Some(op), Some(rm)) => {
            let value = op.apply(state.get(rd), eval_operand(&state, &rm))?;
            state.set(rd, value);
        }
        _ => {
            let index = state.next_input();
            let digit = digits
                .get(index)
                .copied()
                .ok_or(EvalError::UnboundInput(index))?;
            state.set(rd, digit);
        }
    }
    Ok(state)
}

/// Run a whole program from the all-zero state
pub fn run_concrete(program: &[Instruction], digits: &[i64]) -> Result<ConcreteState, EvalError> {
    program
        .iter()
        .try_fold(ConcreteState::new(), |state, instruction| {
            apply_instruction_concrete(state, instruction, digits)
        })
}
