//! Program generators for cross-checking the analyzer against the
//! concrete interpreter

pub mod random;

#[allow(unused_imports)]
pub use random::{
    BlockParams, RandomProgramConfig, edge_case_digits, monad_program, random_digits,
    random_monad_blocks,
};
