use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

mod ir;
mod parser;
mod search;
mod semantics;
mod validation;

use ir::{Instruction, Register, count_inputs};
use search::config::{Algorithm, Direction, SearchConfig};
use search::parallel::{ParallelConfig, run_parallel_search};
use search::{
    BacktrackingSearch, ExhaustiveSearch, SearchAlgorithm, SearchResult, create_search,
};
use semantics::state::SymbolicState;
use semantics::{Assignment, run_concrete};
use validation::random::{
    RandomProgramConfig, edge_case_digits, monad_program, random_digits, random_monad_blocks,
};

/// Exit status when no assignment reaches the target value, or the
/// checked digits leave the register at another value
const EXIT_NO_SOLUTION: i32 = 2;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "alusolve")]
#[command(about = "alusolve - symbolic analyzer and digit solver for ALU programs")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Enable verbose output (debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

/// CLI register selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliRegister {
    W,
    X,
    Y,
    Z,
}

impl From<CliRegister> for Register {
    fn from(cli: CliRegister) -> Self {
        match cli {
            CliRegister::W => Register::W,
            CliRegister::X => Register::X,
            CliRegister::Y => Register::Y,
            CliRegister::Z => Register::Z,
        }
    }
}

/// CLI algorithm selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliAlgorithm {
    /// Depth-first search pruned by value ranges
    Backtracking,
    /// Enumerate every assignment (only practical for a few inputs)
    Exhaustive,
}

impl From<CliAlgorithm> for Algorithm {
    fn from(cli: CliAlgorithm) -> Self {
        match cli {
            CliAlgorithm::Backtracking => Algorithm::Backtracking,
            CliAlgorithm::Exhaustive => Algorithm::Exhaustive,
        }
    }
}

#[derive(clap::Args)]
struct SolveArgs {
    /// Path to the ALU program
    program: PathBuf,
    /// Find the smallest model number instead of the largest
    #[arg(long)]
    smallest: bool,
    /// Value the register must hold at the end
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    target: i64,
    /// Register to solve for
    #[arg(long, short, value_enum, default_value = "z")]
    register: CliRegister,
    /// Search algorithm to use
    #[arg(long, value_enum, default_value = "backtracking")]
    algorithm: CliAlgorithm,
    /// Worker threads for the backtracking search (0 = one per core)
    #[arg(long, short = 'j')]
    jobs: Option<usize>,
    /// Print search statistics
    #[arg(long)]
    stats: bool,
}

impl From<&SolveArgs> for SearchConfig {
    fn from(args: &SolveArgs) -> Self {
        let direction = if args.smallest {
            Direction::Smallest
        } else {
            Direction::Largest
        };
        SearchConfig::default()
            .with_algorithm(args.algorithm.into())
            .with_direction(direction)
            .with_target_value(args.target)
            .with_register(args.register.into())
    }
}

impl SolveArgs {
    /// Parallel settings, if more than one worker was asked for
    fn parallel_config(&self) -> Option<ParallelConfig> {
        match self.jobs {
            None | Some(1) => None,
            Some(0) => Some(ParallelConfig::default()),
            Some(n) => Some(ParallelConfig::default().with_workers(n)),
        }
    }
}

#[derive(clap::Args)]
struct FuzzArgs {
    /// Number of random programs to check
    #[arg(long, default_value_t = 200)]
    count: usize,
    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
    /// Instructions per random program
    #[arg(long, default_value_t = 16)]
    length: usize,
    /// Inputs read by each random program
    #[arg(long, default_value_t = 3)]
    inputs: usize,
}

impl From<&FuzzArgs> for RandomProgramConfig {
    fn from(args: &FuzzArgs) -> Self {
        let config = RandomProgramConfig::default()
            .with_length(args.length)
            .with_inputs(args.inputs);
        match args.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the simplified expression of each register
    Show {
        /// Path to the ALU program
        program: PathBuf,
        /// Only show this register
        #[arg(long, short, value_enum)]
        register: Option<CliRegister>,
        /// Multi-line indented output
        #[arg(long)]
        pretty: bool,
    },
    /// Find the largest (or smallest) digits that drive a register to a value
    Solve(SolveArgs),
    /// Run the program on concrete digits
    Check {
        /// Path to the ALU program
        program: PathBuf,
        /// Input digits, e.g. 13579246899999
        digits: String,
        /// Register expected to hold the target value
        #[arg(long, short, value_enum, default_value = "z")]
        register: CliRegister,
        /// Value the register must hold
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        target: i64,
    },
    /// Cross-check the analyzer against the concrete interpreter
    Fuzz(FuzzArgs),
}

// --- Commands ---

fn load(path: &PathBuf) -> Result<SymbolicState, Box<dyn std::error::Error>> {
    let program = parser::parse_file(path)?;
    info!(
        "parsed {} instructions ({} inputs) from {}",
        program.len(),
        count_inputs(&program),
        path.display()
    );
    Ok(semantics::load_program(&program))
}

fn show_program(
    path: &PathBuf,
    register: Option<Register>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = load(path)?;
    let registers: Vec<Register> = match register {
        Some(reg) => vec![reg],
        None => Register::ALL.to_vec(),
    };

    for reg in registers {
        let expr = state.get(reg);
        if pretty {
            println!("{}:", reg);
            println!("{}", expr.pretty("  "));
        } else {
            println!("{}: {}", reg, expr);
        }
        println!(
            "  range: {}, inputs: {}, nodes: {}",
            expr.range(),
            expr.input_indices().len(),
            expr.node_count()
        );
    }
    Ok(())
}

fn solve_program(args: &SolveArgs, verbose: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let state = load(&args.program)?;
    let config = SearchConfig::from(args).with_verbose(verbose);
    let expr = state.get(config.register);
    debug!(
        "solving {} = {} over {} inputs with {}",
        config.register,
        config.target_value,
        expr.input_indices().len(),
        config.algorithm
    );

    let result: SearchResult = match (config.algorithm, args.parallel_config()) {
        (Algorithm::Backtracking, Some(parallel_config)) => {
            info!("using {} workers", parallel_config.num_workers);
            run_parallel_search(expr, &config, &parallel_config)?.best_result
        }
        (Algorithm::Exhaustive, Some(_)) => {
            warn!("--jobs is ignored by the exhaustive search");
            create_search(config.algorithm).search(expr, &config)?
        }
        (algorithm, None) => create_search(algorithm).search(expr, &config)?,
    };

    if args.stats {
        println!("{}", result.statistics.format_summary());
    }

    match result.solution() {
        Some(solution) => {
            let complete = solution.complete(state.inputs_read(), config.direction);
            println!("{}", complete.model_number());
            Ok(true)
        }
        None => {
            eprintln!(
                "No assignment drives {} to {}",
                config.register, config.target_value
            );
            Ok(false)
        }
    }
}

fn parse_digits(text: &str) -> Result<Vec<i64>, String> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| match c.to_digit(10) {
            Some(d) if d >= 1 => Ok(i64::from(d)),
            _ => Err(format!("Invalid digit '{}': expected 1-9", c)),
        })
        .collect()
}

fn check_program(
    path: &PathBuf,
    digits: &str,
    register: Register,
    target: i64,
) -> Result<bool, Box<dyn std::error::Error>> {
    let program = parser::parse_file(path)?;
    let digits = parse_digits(digits)?;
    let needed = count_inputs(&program);
    if digits.len() != needed {
        return Err(format!(
            "program reads {} inputs but {} digits were given",
            needed,
            digits.len()
        )
        .into());
    }

    let state = run_concrete(&program, &digits)?;
    println!("{}", state);
    let valid = state.get(register) == target;
    println!(
        "{} = {}: {}",
        register,
        state.get(register),
        if valid { "valid" } else { "invalid" }
    );
    Ok(valid)
}

/// Counters for one fuzz run
#[derive(Debug, Default)]
struct FuzzReport {
    programs: usize,
    assignments: usize,
    searches: usize,
    failures: usize,
}

fn report_failure(report: &mut FuzzReport, program: &[Instruction], message: String) {
    report.failures += 1;
    eprintln!("mismatch: {}", message);
    for instruction in program {
        eprintln!("  {}", instruction);
    }
}

/// Check loaded expressions and their ranges against concrete execution
fn fuzz_semantics(
    report: &mut FuzzReport,
    program: &[Instruction],
    inputs: usize,
    rng: &mut ChaCha8Rng,
) {
    let state = semantics::load_program(program);
    let mut samples = edge_case_digits(inputs);
    samples.extend((0..8).map(|_| random_digits(rng, inputs)));

    for digits in samples {
        let Ok(concrete) = run_concrete(program, &digits) else {
            continue;
        };
        report.assignments += 1;
        let assignment = Assignment::from_digits(&digits);
        for reg in Register::ALL {
            let expected = concrete.get(reg);
            let expr = state.get(reg);
            match expr.evaluate(&assignment) {
                Ok(value) if value == expected => {}
                other => {
                    let message = format!(
                        "{} under {}: {:?}, expected {}",
                        reg, assignment, other, expected
                    );
                    report_failure(report, program, message);
                    return;
                }
            }
            if !expr.range().includes(expected) {
                let message = format!(
                    "{} range {} misses {} under {}",
                    reg,
                    expr.range(),
                    expected,
                    assignment
                );
                report_failure(report, program, message);
                return;
            }
        }
    }
}

/// Pruned and exhaustive search must agree on a reachable target
fn fuzz_search(
    report: &mut FuzzReport,
    program: &[Instruction],
    inputs: usize,
    rng: &mut ChaCha8Rng,
) {
    let digits = random_digits(rng, inputs);
    let Ok(concrete) = run_concrete(program, &digits) else {
        return;
    };
    let state = semantics::load_program(program);
    let expr = state.get(Register::Z);

    for direction in [Direction::Largest, Direction::Smallest] {
        let config = SearchConfig::default()
            .with_direction(direction)
            .with_target_value(concrete.get(Register::Z));
        let pruned = BacktrackingSearch::new().search(expr, &config);
        let brute = ExhaustiveSearch::new().search(expr, &config);
        report.searches += 1;
        match (pruned, brute) {
            (Ok(p), Ok(b)) if p.outcome == b.outcome && p.is_solved() => {}
            (p, b) => {
                let message = format!(
                    "{} search for z = {}: pruned {:?}, exhaustive {:?}",
                    direction,
                    config.target_value,
                    p.map(|r| r.outcome),
                    b.map(|r| r.outcome)
                );
                report_failure(report, program, message);
                return;
            }
        }
    }
}

fn fuzz(args: &FuzzArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = RandomProgramConfig::from(args);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("fuzzing {} programs (seed {})", args.count, seed);
    let config = config.with_seed(seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
    let mut report = FuzzReport::default();

    for program in config.programs().take(args.count) {
        report.programs += 1;
        fuzz_semantics(&mut report, &program, config.inputs, &mut rng);
        fuzz_search(&mut report, &program, config.inputs, &mut rng);
    }

    // Balanced MONAD-shaped programs exercise the push/pop structure
    for pairs in 1..=2 {
        let blocks = random_monad_blocks(&mut rng, pairs);
        let program = monad_program(&blocks);
        report.programs += 1;
        fuzz_semantics(&mut report, &program, pairs * 2, &mut rng);
        fuzz_search(&mut report, &program, pairs * 2, &mut rng);
    }

    println!(
        "fuzz: {} programs, {} assignments, {} searches, {} failures",
        report.programs, report.assignments, report.searches, report.failures
    );
    if report.failures > 0 {
        return Err(format!("{} mismatches found", report.failures).into());
    }
    Ok(())
}

// --- Main Function ---
fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_micros()
        .init();

    let outcome = match &args.command {
        Commands::Show {
            program,
            register,
            pretty,
        } => show_program(program, register.map(Register::from), *pretty).map(|()| true),
        Commands::Solve(solve_args) => solve_program(solve_args, args.verbose),
        Commands::Check {
            program,
            digits,
            register,
            target,
        } => check_program(program, digits, (*register).into(), *target),
        Commands::Fuzz(fuzz_args) => fuzz(fuzz_args).map(|()| true),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_NO_SOLUTION),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
