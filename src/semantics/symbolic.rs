//! Program loader: symbolic execution of an ALU program
//!
//! Each instruction replaces its destination register with a new
//! expression built from the current register contents and immediately
//! normalized, so register values stay small shared DAGs.

use log::debug;

use crate::ir::{Instruction, Operand};
use crate::semantics::concrete::binary_op;
use crate::semantics::expr::Expr;
use crate::semantics::simplify::normalize;
use crate::semantics::state::SymbolicState;

fn operand_expr(state: &SymbolicState, operand: &Operand) -> Expr {
    match operand {
        Operand::Register(reg) => state.get(*reg).clone(),
        Operand::Immediate(imm) => Expr::literal(*imm),
    }
}

/// Apply a single instruction to the symbolic register file
pub fn apply_instruction_symbolic(state: &mut SymbolicState, instruction: &Instruction) {
    let rd = instruction.destination();
    match (binary_op(instruction), instruction.operand()) {
        (Some(op), Some(rm)) => {
            let lhs = state.get(rd).clone();
            let rhs = operand_expr(state, &rm);
            let expr = normalize(&Expr::binary(op, lhs, rhs));
            state.set(rd, expr);
        }
        _ => {
            let input = state.take_input();
            state.set(rd, input);
        }
    }
}

/// Symbolically execute a program from all-zero registers
pub fn load_program(program: &[Instruction]) -> SymbolicState {
    let mut state = SymbolicState::new();
    for instruction in program {
        apply_instruction_symbolic(&mut state, instruction);
    }
    debug!(
        "loaded {} instructions reading {} inputs",
        program.len(),
        state.inputs_read()
    );
    for (reg, expr) in state.iter() {
        debug!("  {}: {} nodes, range {}", reg, expr.node_count(), expr.range());
    }
    state
}
