//! Register files for concrete and symbolic execution

#![allow(dead_code)]

use std::fmt;

use crate::ir::Register;
use crate::semantics::expr::Expr;

/// Concrete register values plus the number of input digits consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConcreteState {
    registers: [i64; 4],
    inputs_consumed: usize,
}

impl ConcreteState {
    /// All registers zero, no input consumed
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reg: Register) -> i64 {
        self.registers[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: i64) {
        self.registers[reg.index()] = value;
    }

    pub fn inputs_consumed(&self) -> usize {
        self.inputs_consumed
    }

    /// Advance the input cursor, returning the position just consumed
    pub(crate) fn next_input(&mut self) -> usize {
        let index = self.inputs_consumed;
        self.inputs_consumed += 1;
        index
    }
}

impl fmt::Display for ConcreteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reg) in Register::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={}", reg, self.get(*reg))?;
        }
        Ok(())
    }
}

/// Symbolic register contents plus the index the next input will receive
#[derive(Debug, Clone)]
pub struct SymbolicState {
    registers: [Expr; 4],
    next_input: usize,
}

impl SymbolicState {
    /// Every register holds `Literal(0)`
    pub fn new() -> Self {
        Self {
            registers: std::array::from_fn(|_| Expr::literal(0)),
            next_input: 0,
        }
    }

    pub fn get(&self, reg: Register) -> &Expr {
        &self.registers[reg.index()]
    }

    pub fn set(&mut self, reg: Register, expr: Expr) {
        self.registers[reg.index()] = expr;
    }

    /// Number of inputs read so far
    pub fn inputs_read(&self) -> usize {
        self.next_input
    }

    /// A fresh input node for the next unread position
    pub(crate) fn take_input(&mut self) -> Expr {
        let expr = Expr::input(self.next_input);
        self.next_input += 1;
        expr
    }

    pub fn iter(&self) -> impl Iterator<Item = (Register, &Expr)> {
        Register::ALL.iter().map(move |reg| (*reg, self.get(*reg)))
    }
}

impl Default for SymbolicState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_state() {
        let mut state = ConcreteState::new();
        assert_eq!(state.get(Register::Z), 0);
        state.set(Register::Z, -4);
        state.set(Register::W, 9);
        assert_eq!(state.get(Register::Z), -4);
        assert_eq!(state.next_input(), 0);
        assert_eq!(state.next_input(), 1);
        assert_eq!(state.inputs_consumed(), 2);
        assert_eq!(state.to_string(), "w=9 x=0 y=0 z=-4");
    }

    #[test]
    fn test_symbolic_state() {
        let mut state = SymbolicState::new();
        for (_, expr) in state.iter() {
            assert_eq!(expr.as_literal(), Some(0));
        }
        let first = state.take_input();
        let second = state.take_input();
        assert_eq!(first.as_input(), Some(0));
        assert_eq!(second.as_input(), Some(1));
        assert_eq!(state.inputs_read(), 2);

        state.set(Register::X, second);
        assert_eq!(state.get(Register::X).as_input(), Some(1));
    }
}
