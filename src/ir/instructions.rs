//! ALU instruction definitions

#![allow(dead_code)]

use crate::ir::types::{Operand, Register};
use std::fmt;

/// Instructions understood by the ALU
///
/// Every binary instruction stores its result back into `rd`, reading `rd`
/// as the left-hand operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Read the next input digit into `rd`
    Inp { rd: Register },
    Add { rd: Register, rm: Operand },
    Mul { rd: Register, rm: Operand },
    /// Truncating integer division
    Div { rd: Register, rm: Operand },
    /// Remainder with the sign of the dividend
    Mod { rd: Register, rm: Operand },
    /// 1 if both operands are equal, 0 otherwise
    Eql { rd: Register, rm: Operand },
}

impl Instruction {
    /// Get the destination register for this instruction
    pub fn destination(&self) -> Register {
        match self {
            Instruction::Inp { rd }
            | Instruction::Add { rd, .. }
            | Instruction::Mul { rd, .. }
            | Instruction::Div { rd, .. }
            | Instruction::Mod { rd, .. }
            | Instruction::Eql { rd, .. } => *rd,
        }
    }

    /// Get the second operand of a binary instruction
    pub fn operand(&self) -> Option<Operand> {
        match self {
            Instruction::Inp { .. } => None,
            Instruction::Add { rm, .. }
            | Instruction::Mul { rm, .. }
            | Instruction::Div { rm, .. }
            | Instruction::Mod { rm, .. }
            | Instruction::Eql { rm, .. } => Some(*rm),
        }
    }

    /// Returns true if this instruction consumes an input digit
    pub fn reads_input(&self) -> bool {
        matches!(self, Instruction::Inp { .. })
    }

    /// Get all source registers used by this instruction
    pub fn source_registers(&self) -> Vec<Register> {
        match self {
            Instruction::Inp { .. } => vec![],
            _ => {
                let mut regs = vec![self.destination()];
                if let Some(Operand::Register(r)) = self.operand() {
                    regs.push(r);
                }
                regs
            }
        }
    }

    /// The instruction mnemonic as written in program text
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Inp { .. } => "inp",
            Instruction::Add { .. } => "add",
            Instruction::Mul { .. } => "mul",
            Instruction::Div { .. } => "div",
            Instruction::Mod { .. } => "mod",
            Instruction::Eql { .. } => "eql",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand() {
            Some(rm) => write!(f, "{} {} {}", self.mnemonic(), self.destination(), rm),
            None => write!(f, "{} {}", self.mnemonic(), self.destination()),
        }
    }
}

/// Count the input digits a program consumes
pub fn count_inputs(program: &[Instruction]) -> usize {
    program.iter().filter(|instr| instr.reads_input()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_display() {
        let inp = Instruction::Inp { rd: Register::W };
        assert_eq!(format!("{}", inp), "inp w");

        let add = Instruction::Add {
            rd: Register::Z,
            rm: Operand::Register(Register::Y),
        };
        assert_eq!(format!("{}", add), "add z y");

        let modulo = Instruction::Mod {
            rd: Register::X,
            rm: Operand::Immediate(26),
        };
        assert_eq!(format!("{}", modulo), "mod x 26");

        let div = Instruction::Div {
            rd: Register::Z,
            rm: Operand::Immediate(-3),
        };
        assert_eq!(format!("{}", div), "div z -3");
    }

    #[test]
    fn test_destination() {
        let instr = Instruction::Eql {
            rd: Register::X,
            rm: Operand::Register(Register::W),
        };
        assert_eq!(instr.destination(), Register::X);
        assert_eq!(Instruction::Inp { rd: Register::W }.destination(), Register::W);
    }

    #[test]
    fn test_source_registers() {
        let inp = Instruction::Inp { rd: Register::W };
        assert!(inp.source_registers().is_empty());

        let mul = Instruction::Mul {
            rd: Register::Y,
            rm: Operand::Register(Register::X),
        };
        assert_eq!(mul.source_registers(), vec![Register::Y, Register::X]);

        let add_imm = Instruction::Add {
            rd: Register::Y,
            rm: Operand::Immediate(25),
        };
        assert_eq!(add_imm.source_registers(), vec![Register::Y]);
    }

    #[test]
    fn test_count_inputs() {
        let program = vec![
            Instruction::Inp { rd: Register::W },
            Instruction::Add {
                rd: Register::Z,
                rm: Operand::Register(Register::W),
            },
            Instruction::Inp { rd: Register::X },
        ];
        assert_eq!(count_inputs(&program), 2);
        assert!(program[0].reads_input());
        assert!(!program[1].reads_input());
    }
}
