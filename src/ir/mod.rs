//! Intermediate representation for ALU programs

pub mod instructions;
pub mod types;

// Re-export commonly used types
pub use instructions::{count_inputs, Instruction};
pub use types::{Operand, Register};
