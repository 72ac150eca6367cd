//! Semantic analysis of ALU programs: ranges, expressions, simplification,
//! and concrete and symbolic execution

pub mod concrete;
pub mod expr;
pub mod range;
pub mod simplify;
pub mod state;
pub mod symbolic;

// Re-export main functionality
pub use concrete::run_concrete;
pub use expr::{Assignment, BinaryOp, EvalError, Expr, ExprKind, ExprVisitor};
pub use range::{Continuous, Range};
pub use simplify::{normalize, simplify};
#[allow(unused_imports)]
pub use state::{ConcreteState, SymbolicState};
pub use symbolic::load_program;
