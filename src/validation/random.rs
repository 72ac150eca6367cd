//! Random and MONAD-shaped program generation for cross-checking

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ir::{Instruction, Operand, Register};
use crate::semantics::expr::{INPUT_MAX, INPUT_MIN};

/// Longest random program whose register values are guaranteed to stay
/// within `i64` for any input digits
pub const MAX_SAFE_LENGTH: usize = 24;

const DIVISORS: [i64; 7] = [2, 3, 5, 7, 26, -3, -7];

/// Configuration for random program generation
#[derive(Debug, Clone)]
pub struct RandomProgramConfig {
    /// Total number of instructions, including `inp`
    pub length: usize,
    /// Number of `inp` instructions
    pub inputs: usize,
    /// Seed for reproducible generation; a random seed is drawn if unset
    pub seed: Option<u64>,
}

impl Default for RandomProgramConfig {
    fn default() -> Self {
        RandomProgramConfig {
            length: 16,
            inputs: 3,
            seed: None,
        }
    }
}

impl RandomProgramConfig {
    /// Set the program length, capped at [`MAX_SAFE_LENGTH`]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.clamp(1, MAX_SAFE_LENGTH);
        self.inputs = self.inputs.min(self.length);
        self
    }

    pub fn with_inputs(mut self, inputs: usize) -> Self {
        self.inputs = inputs.clamp(1, self.length);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> ChaCha8Rng {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        ChaCha8Rng::seed_from_u64(seed)
    }

    /// Endless stream of random programs
    pub fn programs(&self) -> impl Iterator<Item = Vec<Instruction>> {
        let mut rng = self.rng();
        let config = self.clone();
        std::iter::from_fn(move || Some(random_program(&config, &mut rng)))
    }
}

fn random_register<R: Rng>(rng: &mut R) -> Register {
    Register::ALL[rng.random_range(0..Register::ALL.len())]
}

fn random_binary<R: Rng>(rng: &mut R) -> Instruction {
    let rd = random_register(rng);
    match rng.random_range(0..10) {
        0..=2 => {
            let rm = if rng.random_bool(0.5) {
                Operand::Register(random_register(rng))
            } else {
                Operand::Immediate(rng.random_range(-10..=26))
            };
            Instruction::Add { rd, rm }
        }
        3..=4 => Instruction::Mul {
            rd,
            rm: Operand::Immediate(rng.random_range(-5..=5)),
        },
        5..=6 => Instruction::Div {
            rd,
            rm: Operand::Immediate(DIVISORS[rng.random_range(0..DIVISORS.len())]),
        },
        7 => Instruction::Mod {
            rd,
            rm: Operand::Immediate(DIVISORS[rng.random_range(0..DIVISORS.len())]),
        },
        _ => {
            let rm = if rng.random_bool(0.6) {
                Operand::Register(random_register(rng))
            } else {
                Operand::Immediate(rng.random_range(0..=9))
            };
            Instruction::Eql { rd, rm }
        }
    }
}

/// Generate one random program.
///
/// Divisors are always nonzero literals and multipliers are small literals,
/// so programs never divide by zero and never overflow.
pub fn random_program<R: Rng>(config: &RandomProgramConfig, rng: &mut R) -> Vec<Instruction> {
    let mut program = Vec::with_capacity(config.length);
    let mut inputs_left = config.inputs;

    for slot in 0..config.length {
        let slots_left = config.length - slot;
        let read = inputs_left > 0
            && (slot == 0 || rng.random_bool(inputs_left as f64 / slots_left as f64));
        if read {
            program.push(Instruction::Inp {
                rd: random_register(rng),
            });
            inputs_left -= 1;
        } else {
            program.push(random_binary(rng));
        }
    }

    program
}

/// Random digit assignment of the given length
pub fn random_digits<R: Rng>(rng: &mut R, count: usize) -> Vec<i64> {
    (0..count)
        .map(|_| rng.random_range(INPUT_MIN..=INPUT_MAX))
        .collect()
}

/// Digit sequences at the corners of the input domain
pub fn edge_case_digits(count: usize) -> Vec<Vec<i64>> {
    vec![
        vec![INPUT_MIN; count],
        vec![INPUT_MAX; count],
        (0..count)
            .map(|i| if i % 2 == 0 { INPUT_MIN } else { INPUT_MAX })
            .collect(),
        (0..count)
            .map(|i| if i % 2 == 0 { INPUT_MAX } else { INPUT_MIN })
            .collect(),
    ]
}

/// Parameters of one 18-instruction MONAD block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockParams {
    /// `div z` operand: 1 pushes a base-26 digit, 26 pops one
    pub divisor: i64,
    /// Added to the top of the stack before comparing with the input
    pub check: i64,
    /// Added to the input before pushing it
    pub offset: i64,
}

impl BlockParams {
    pub fn push(check: i64, offset: i64) -> Self {
        Self {
            divisor: 1,
            check,
            offset,
        }
    }

    pub fn pop(check: i64, offset: i64) -> Self {
        Self {
            divisor: 26,
            check,
            offset,
        }
    }
}

/// One MONAD block
pub fn monad_block(params: &BlockParams) -> Vec<Instruction> {
    use Register::{W, X, Y, Z};
    let reg = Operand::Register;
    let imm = Operand::Immediate;
    vec![
        Instruction::Inp { rd: W },
        Instruction::Mul { rd: X, rm: imm(0) },
        Instruction::Add { rd: X, rm: reg(Z) },
        Instruction::Mod { rd: X, rm: imm(26) },
        Instruction::Div {
            rd: Z,
            rm: imm(params.divisor),
        },
        Instruction::Add {
            rd: X,
            rm: imm(params.check),
        },
        Instruction::Eql { rd: X, rm: reg(W) },
        Instruction::Eql { rd: X, rm: imm(0) },
        Instruction::Mul { rd: Y, rm: imm(0) },
        Instruction::Add { rd: Y, rm: imm(25) },
        Instruction::Mul { rd: Y, rm: reg(X) },
        Instruction::Add { rd: Y, rm: imm(1) },
        Instruction::Mul { rd: Z, rm: reg(Y) },
        Instruction::Mul { rd: Y, rm: imm(0) },
        Instruction::Add { rd: Y, rm: reg(W) },
        Instruction::Add {
            rd: Y,
            rm: imm(params.offset),
        },
        Instruction::Mul { rd: Y, rm: reg(X) },
        Instruction::Add { rd: Z, rm: reg(Y) },
    ]
}

/// Concatenate MONAD blocks into one program
pub fn monad_program(blocks: &[BlockParams]) -> Vec<Instruction> {
    blocks.iter().flat_map(monad_block).collect()
}

/// Random balanced push/pop block list with `pairs` matched pairs
pub fn random_monad_blocks<R: Rng>(rng: &mut R, pairs: usize) -> Vec<BlockParams> {
    let mut blocks = Vec::with_capacity(pairs * 2);
    let (mut pushes_left, mut depth) = (pairs, 0usize);
    while pushes_left > 0 || depth > 0 {
        let push = depth == 0 || (pushes_left > 0 && rng.random_bool(0.5));
        if push {
            blocks.push(BlockParams::push(
                rng.random_range(10..=15),
                rng.random_range(1..=16),
            ));
            pushes_left -= 1;
            depth += 1;
        } else {
            blocks.push(BlockParams::pop(
                rng.random_range(-16..=-1),
                rng.random_range(1..=16),
            ));
            depth -= 1;
        }
    }
    blocks
}
