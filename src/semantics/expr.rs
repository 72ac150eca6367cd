//! Symbolic expressions over input digits
//!
//! An [`Expr`] is a cheaply clonable handle to an immutable node. Nodes are
//! shared freely, so a program's register values form a DAG rather than a
//! tree. Each node lazily caches its [`Range`] and, once computed, its
//! normalized form under the empty assignment.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::semantics::range::Range;

/// Smallest value an input digit can take
pub const INPUT_MIN: i64 = 1;
/// Largest value an input digit can take
pub const INPUT_MAX: i64 = 9;

/// Error produced by concrete evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// The expression references an input index with no bound value
    UnboundInput(usize),
    /// A division or modulo by zero was reached
    DivisionByZero,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundInput(index) => write!(f, "input i{} is not bound", index),
            EvalError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Binary operators of the ALU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Mul,
    Div,
    Mod,
    Eql,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eql => "==",
        }
    }

    /// Apply the operator to concrete values
    pub fn apply(&self, lhs: i64, rhs: i64) -> Result<i64, EvalError> {
        match self {
            BinaryOp::Add => Ok(lhs.wrapping_add(rhs)),
            BinaryOp::Mul => Ok(lhs.wrapping_mul(rhs)),
            BinaryOp::Div if rhs == 0 => Err(EvalError::DivisionByZero),
            BinaryOp::Div => Ok(lhs.wrapping_div(rhs)),
            BinaryOp::Mod if rhs == 0 => Err(EvalError::DivisionByZero),
            BinaryOp::Mod => Ok(lhs.wrapping_rem(rhs)),
            BinaryOp::Eql => Ok((lhs == rhs) as i64),
        }
    }

    /// Range of the operator applied to operands drawn from the given ranges
    pub fn range(&self, lhs: &Range, rhs: &Range) -> Range {
        match self {
            BinaryOp::Add => lhs.add(rhs),
            BinaryOp::Mul => lhs.multiply(rhs),
            BinaryOp::Div => lhs.divide(rhs),
            BinaryOp::Mod => lhs.modulo(rhs),
            BinaryOp::Eql => lhs.equals(rhs),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Node variants
#[derive(Debug)]
pub enum ExprKind {
    Literal(i64),
    /// The input digit at this position
    Input(usize),
    Binary { op: BinaryOp, lhs: Expr, rhs: Expr },
}

#[derive(Debug)]
struct Node {
    kind: ExprKind,
    /// Lowest and highest input index referenced below this node
    inputs: Option<(usize, usize)>,
    range: OnceLock<Range>,
    /// Normal form under the empty assignment; `None` means the node is
    /// already normal
    normalized: OnceLock<Option<Expr>>,
}

/// Shared handle to an immutable expression node
#[derive(Clone)]
pub struct Expr(Arc<Node>);

impl Expr {
    fn from_kind(kind: ExprKind) -> Self {
        let inputs = match &kind {
            ExprKind::Literal(_) => None,
            ExprKind::Input(index) => Some((*index, *index)),
            ExprKind::Binary { lhs, rhs, .. } => match (lhs.input_span(), rhs.input_span()) {
                (Some((a, b)), Some((c, d))) => Some((a.min(c), b.max(d))),
                (span, None) | (None, span) => span,
            },
        };
        Expr(Arc::new(Node {
            kind,
            inputs,
            range: OnceLock::new(),
            normalized: OnceLock::new(),
        }))
    }

    pub fn literal(value: i64) -> Self {
        Self::from_kind(ExprKind::Literal(value))
    }

    pub fn input(index: usize) -> Self {
        Self::from_kind(ExprKind::Input(index))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::from_kind(ExprKind::Binary { op, lhs, rhs })
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Mul, lhs, rhs)
    }

    pub fn div(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Div, lhs, rhs)
    }

    pub fn modulo(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Mod, lhs, rhs)
    }

    pub fn eql(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Eql, lhs, rhs)
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    pub fn as_literal(&self) -> Option<i64> {
        match self.kind() {
            ExprKind::Literal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<usize> {
        match self.kind() {
            ExprKind::Input(index) => Some(*index),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<(BinaryOp, &Expr, &Expr)> {
        match self.kind() {
            ExprKind::Binary { op, lhs, rhs } => Some((*op, lhs, rhs)),
            _ => None,
        }
    }

    /// True for literal and input nodes
    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind(), ExprKind::Binary { .. })
    }

    /// Lowest and highest input index referenced, if any
    pub fn input_span(&self) -> Option<(usize, usize)> {
        self.0.inputs
    }

    pub fn ptr_eq(a: &Expr, b: &Expr) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Node identity, stable for the lifetime of the node
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Values this expression can take with every input ranging over
    /// `INPUT_MIN..=INPUT_MAX`. Computed once per node.
    pub fn range(&self) -> &Range {
        self.0.range.get_or_init(|| match self.kind() {
            ExprKind::Literal(value) => Range::single(*value),
            ExprKind::Input(_) => Range::continuous(INPUT_MIN, INPUT_MAX, 1),
            ExprKind::Binary { op, lhs, rhs } => op.range(lhs.range(), rhs.range()),
        })
    }

    /// Cached normal form under the empty assignment
    pub(crate) fn normal_form(&self) -> Option<Expr> {
        if self.is_leaf() {
            return Some(self.clone());
        }
        self.0
            .normalized
            .get()
            .map(|cached| cached.clone().unwrap_or_else(|| self.clone()))
    }

    pub(crate) fn record_normal_form(&self, normal: &Expr) {
        let value = if Expr::ptr_eq(self, normal) {
            None
        } else {
            Some(normal.clone())
        };
        // a concurrent writer stores an equivalent form
        let _ = self.0.normalized.set(value);
    }

    pub(crate) fn mark_normalized(&self) {
        let _ = self.0.normalized.set(None);
    }

    /// Evaluate with every referenced input bound by `assignment`
    pub fn evaluate(&self, assignment: &Assignment) -> Result<i64, EvalError> {
        let mut memo = HashMap::new();
        self.evaluate_with(assignment, &mut memo)
    }

    fn evaluate_with(
        &self,
        assignment: &Assignment,
        memo: &mut HashMap<usize, i64>,
    ) -> Result<i64, EvalError> {
        match self.kind() {
            ExprKind::Literal(value) => Ok(*value),
            ExprKind::Input(index) => assignment
                .get(*index)
                .ok_or(EvalError::UnboundInput(*index)),
            ExprKind::Binary { op, lhs, rhs } => {
                if let Some(value) = memo.get(&self.id()) {
                    return Ok(*value);
                }
                let l = lhs.evaluate_with(assignment, memo)?;
                let r = rhs.evaluate_with(assignment, memo)?;
                let value = op.apply(l, r)?;
                memo.insert(self.id(), value);
                Ok(value)
            }
        }
    }

    /// Walk every edge below this node, calling the visitor on each node
    /// reached. Shared subexpressions are visited once per path, so the cost
    /// grows with the number of paths; use [`Expr::for_each_unique`] on large
    /// DAGs.
    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit(self);
        if let ExprKind::Binary { lhs, rhs, .. } = self.kind() {
            lhs.accept(visitor);
            rhs.accept(visitor);
        }
    }

    /// Call `f` once for each distinct node, children before parents.
    ///
    /// This is the deduplicated counterpart of [`Expr::accept`]. The solver
    /// finds its positions through it (see [`Expr::input_indices`]), since
    /// loaded programs share subexpressions heavily.
    pub fn for_each_unique(&self, mut f: impl FnMut(&Expr)) {
        let mut seen = HashSet::new();
        let mut stack = vec![(self.clone(), false)];
        while let Some((expr, expanded)) = stack.pop() {
            if expanded {
                f(&expr);
                continue;
            }
            if !seen.insert(expr.id()) {
                continue;
            }
            stack.push((expr.clone(), true));
            if let ExprKind::Binary { lhs, rhs, .. } = expr.kind() {
                stack.push((rhs.clone(), false));
                stack.push((lhs.clone(), false));
            }
        }
    }

    /// Distinct input indices referenced, in ascending order. Visits each
    /// node once.
    pub fn input_indices(&self) -> Vec<usize> {
        let mut indices = BTreeSet::new();
        self.for_each_unique(|e| {
            if let Some(index) = e.as_input() {
                indices.insert(index);
            }
        });
        indices.into_iter().collect()
    }

    /// Number of distinct nodes in the DAG
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.for_each_unique(|_| count += 1);
        count
    }

    /// Multi-line rendering, one operand per line for compound operands
    pub fn pretty(&self, indent: &str) -> String {
        let mut lines = Vec::new();
        self.pretty_lines(indent, 0, &mut lines);
        lines.join("\n")
    }

    fn is_simple(&self) -> bool {
        match self.kind() {
            ExprKind::Literal(_) | ExprKind::Input(_) => true,
            ExprKind::Binary {
                op: BinaryOp::Eql,
                lhs,
                rhs,
            } => lhs.is_leaf_or_simple_arith() && rhs.is_leaf_or_simple_arith(),
            ExprKind::Binary { lhs, rhs, .. } => lhs.is_leaf() && rhs.is_leaf(),
        }
    }

    fn is_leaf_or_simple_arith(&self) -> bool {
        match self.kind() {
            ExprKind::Binary {
                op: BinaryOp::Eql, ..
            } => false,
            _ => self.is_simple(),
        }
    }

    fn pretty_lines(&self, indent: &str, level: usize, lines: &mut Vec<String>) {
        let pad = indent.repeat(level);
        let inner = indent.repeat(level + 1);
        match self.kind() {
            ExprKind::Binary { op, lhs, rhs } if !self.is_simple() => {
                lines.push(format!("{}(", pad));
                lhs.pretty_lines(indent, level + 1, lines);
                lines.push(format!("{}{}", inner, op));
                rhs.pretty_lines(indent, level + 1, lines);
                if *op == BinaryOp::Eql {
                    lines.push(format!("{}? 1 : 0", inner));
                }
                lines.push(format!("{})", pad));
            }
            _ => lines.push(format!("{}{}", pad, self)),
        }
    }
}

/// Receives each node reached by [`Expr::accept`]
pub trait ExprVisitor {
    fn visit(&mut self, expr: &Expr);
}

impl<F: FnMut(&Expr)> ExprVisitor for F {
    fn visit(&mut self, expr: &Expr) {
        self(expr)
    }
}

fn structurally_equal(a: &Expr, b: &Expr, proven: &mut HashSet<(usize, usize)>) -> bool {
    if Expr::ptr_eq(a, b) {
        return true;
    }
    match (a.kind(), b.kind()) {
        (ExprKind::Literal(x), ExprKind::Literal(y)) => x == y,
        (ExprKind::Input(x), ExprKind::Input(y)) => x == y,
        (
            ExprKind::Binary {
                op: op_a,
                lhs: lhs_a,
                rhs: rhs_a,
            },
            ExprKind::Binary {
                op: op_b,
                lhs: lhs_b,
                rhs: rhs_b,
            },
        ) => {
            if op_a != op_b || a.input_span() != b.input_span() {
                return false;
            }
            if proven.contains(&(a.id(), b.id())) {
                return true;
            }
            let equal = structurally_equal(lhs_a, lhs_b, proven)
                && structurally_equal(rhs_a, rhs_b, proven);
            if equal {
                proven.insert((a.id(), b.id()));
            }
            equal
        }
        _ => false,
    }
}

/// Structural equality; shared nodes compare equal without descending
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        structurally_equal(self, other, &mut HashSet::new())
    }
}

impl Eq for Expr {}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Literal(value) => write!(f, "{}", value),
            ExprKind::Input(index) => write!(f, "i{}", index),
            ExprKind::Binary {
                op: BinaryOp::Add,
                lhs,
                rhs,
            } => match rhs.as_literal() {
                Some(value) if value < 0 => write!(f, "({} - {})", lhs, value.unsigned_abs()),
                _ => write!(f, "({} + {})", lhs, rhs),
            },
            ExprKind::Binary {
                op: BinaryOp::Eql,
                lhs,
                rhs,
            } => write!(f, "({} == {} ? 1 : 0)", lhs, rhs),
            ExprKind::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self)
    }
}

/// Concrete digit values bound to input positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<usize, i64>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `digits[k]` to input `k`
    pub fn from_digits(digits: &[i64]) -> Self {
        Self {
            values: digits.iter().copied().enumerate().collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.values.get(&index).copied()
    }

    pub fn bind(&mut self, index: usize, value: i64) {
        self.values.insert(index, value);
    }

    /// A copy of this assignment with one more binding
    pub fn with(&self, index: usize, value: i64) -> Self {
        let mut extended = self.clone();
        extended.bind(index, value);
        extended
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if any index in `lo..=hi` is bound
    pub fn binds_any(&self, lo: usize, hi: usize) -> bool {
        self.values.range(lo..=hi).next().is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (index, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "i{}={}", index, value)?;
        }
        write!(f, "}}")
    }
}
