//! Core types for the ALU program representation

use std::fmt;

/// The four ALU registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Register {
    W,
    X,
    Y,
    Z,
}

impl Register {
    /// All registers in slot order
    pub const ALL: [Register; 4] = [Register::W, Register::X, Register::Y, Register::Z];

    /// Slot index of this register (w=0 .. z=3)
    pub fn index(&self) -> usize {
        match self {
            Register::W => 0,
            Register::X => 1,
            Register::Y => 2,
            Register::Z => 3,
        }
    }

    /// Create register from slot index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::W => write!(f, "w"),
            Register::X => write!(f, "x"),
            Register::Y => write!(f, "y"),
            Register::Z => write!(f, "z"),
        }
    }
}

impl std::str::FromStr for Register {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" => Ok(Register::W),
            "x" => Ok(Register::X),
            "y" => Ok(Register::Y),
            "z" => Ok(Register::Z),
            _ => Err(format!("unknown register: {}", s)),
        }
    }
}

/// Second operand of a binary instruction - either a register or a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Register(Register),
    Immediate(i64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(reg) => write!(f, "{}", reg),
            Operand::Immediate(imm) => write!(f, "{}", imm),
        }
    }
}
