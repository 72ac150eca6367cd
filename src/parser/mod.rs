//! Program text parser for ALU programs
//!
//! One instruction per line: a mnemonic followed by whitespace-separated
//! operands, e.g. `inp w`, `add x z`, `mod x 26`.

use std::fmt;
use std::path::Path;

use crate::ir::{Instruction, Operand, Register};

/// Classification of a parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Mnemonic is not one of inp/add/mul/div/mod/eql
    UnknownOperator,
    /// A register position names something other than w/x/y/z
    UnknownRegister,
    /// Second operand is neither a register nor an integer literal
    InvalidOperand,
    /// Wrong number of operands for the mnemonic
    OperandCount,
    /// `div` or `mod` by the literal 0
    ZeroDivisor,
    /// The program contains no instructions
    EmptyProgram,
    /// The program file could not be read
    Io,
}

/// Parse error with location information
#[derive(Debug, Clone)]
pub struct ParseError {
    pub line_number: usize,
    pub kind: ParseErrorKind,
    pub message: String,
    pub line_content: String,
}

impl ParseError {
    pub fn new(
        line_number: usize,
        kind: ParseErrorKind,
        message: impl Into<String>,
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            kind,
            message: message.into(),
            line_content: line_content.into(),
        }
    }

    /// True for errors that name an unknown operator or register
    pub fn is_malformed_instruction(&self) -> bool {
        matches!(
            self.kind,
            ParseErrorKind::UnknownOperator | ParseErrorKind::UnknownRegister
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line_content.is_empty() {
            write!(f, "line {}: {}", self.line_number, self.message)
        } else {
            write!(
                f,
                "line {}: {}\n  | {}",
                self.line_number, self.message, self.line_content
            )
        }
    }
}

impl std::error::Error for ParseError {}

/// Failure to parse a single field, before line information is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: ParseErrorKind,
    pub message: String,
}

impl FieldError {
    fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of parsing a single line
#[derive(Debug)]
pub enum LineResult {
    /// An instruction was parsed
    Instruction(Instruction),
    /// Line was empty or a comment
    Skip,
}

/// Parse a register name
pub fn parse_register(s: &str) -> Result<Register, FieldError> {
    s.parse::<Register>()
        .map_err(|message| FieldError::new(ParseErrorKind::UnknownRegister, message))
}

/// Parse an operand (register or integer literal)
pub fn parse_operand(s: &str) -> Result<Operand, FieldError> {
    if let Ok(reg) = s.parse::<Register>() {
        return Ok(Operand::Register(reg));
    }
    s.parse::<i64>().map(Operand::Immediate).map_err(|e| {
        FieldError::new(
            ParseErrorKind::InvalidOperand,
            format!("invalid operand '{}': {}", s, e),
        )
    })
}

/// Strip comments from a line (handles # and ;)
fn strip_comments(line: &str) -> &str {
    let end = line.find(['#', ';']).unwrap_or(line.len());
    &line[..end]
}

fn expect_operands(mnemonic: &str, operands: &[&str], count: usize) -> Result<(), FieldError> {
    if operands.len() != count {
        return Err(FieldError::new(
            ParseErrorKind::OperandCount,
            format!(
                "{} requires {} operand{}, got {}",
                mnemonic,
                count,
                if count == 1 { "" } else { "s" },
                operands.len()
            ),
        ));
    }
    Ok(())
}

/// Build an instruction from a mnemonic and its operand fields
pub fn parse_instruction(mnemonic: &str, operands: &[&str]) -> Result<Instruction, FieldError> {
    if mnemonic == "inp" {
        expect_operands(mnemonic, operands, 1)?;
        let rd = parse_register(operands[0])?;
        return Ok(Instruction::Inp { rd });
    }

    let build: fn(Register, Operand) -> Instruction = match mnemonic {
        "add" => |rd, rm| Instruction::Add { rd, rm },
        "mul" => |rd, rm| Instruction::Mul { rd, rm },
        "div" => |rd, rm| Instruction::Div { rd, rm },
        "mod" => |rd, rm| Instruction::Mod { rd, rm },
        "eql" => |rd, rm| Instruction::Eql { rd, rm },
        _ => {
            return Err(FieldError::new(
                ParseErrorKind::UnknownOperator,
                format!("unknown instruction: {}", mnemonic),
            ))
        }
    };

    expect_operands(mnemonic, operands, 2)?;
    let rd = parse_register(operands[0])?;
    let rm = parse_operand(operands[1])?;

    if matches!(mnemonic, "div" | "mod") && rm == Operand::Immediate(0) {
        return Err(FieldError::new(
            ParseErrorKind::ZeroDivisor,
            format!("{} by literal zero", mnemonic),
        ));
    }

    Ok(build(rd, rm))
}

/// Parse a single line of program text
pub fn parse_line(line: &str) -> Result<LineResult, FieldError> {
    let code = strip_comments(line);
    let mut fields = code.split_whitespace();

    let mnemonic = match fields.next() {
        Some(m) => m,
        None => return Ok(LineResult::Skip),
    };
    let operands: Vec<&str> = fields.collect();

    parse_instruction(mnemonic, &operands).map(LineResult::Instruction)
}

/// Parse program text into a sequence of instructions
pub fn parse_program(text: &str) -> Result<Vec<Instruction>, ParseError> {
    let mut instructions = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(LineResult::Instruction(instr)) => instructions.push(instr),
            Ok(LineResult::Skip) => {}
            Err(e) => return Err(ParseError::new(idx + 1, e.kind, e.message, line.trim())),
        }
    }

    if instructions.is_empty() {
        return Err(ParseError::new(
            0,
            ParseErrorKind::EmptyProgram,
            "no instructions found",
            "",
        ));
    }

    Ok(instructions)
}

/// Parse a program file
pub fn parse_file(path: &Path) -> Result<Vec<Instruction>, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ParseError::new(
            0,
            ParseErrorKind::Io,
            format!("failed to read {}: {}", path.display(), e),
            "",
        )
    })?;
    parse_program(&text)
}
