//! Algebraic simplification under a partial input assignment
//!
//! Simplification is post-order: operands are simplified first, then the
//! node is rebuilt through [`Simplifier::rewrite`], which applies the local
//! rules for its operator and finally collapses any node whose range holds
//! a single value into a literal.
//!
//! Results under the empty assignment are cached on each node. Under a
//! non-empty assignment, nodes that reference no bound input reuse that
//! cache; everything else is memoized for the duration of one call only.

use std::collections::HashMap;

use crate::semantics::expr::{Assignment, BinaryOp, Expr, ExprKind};

/// Simplify `expr` with the inputs in `assignment` replaced by their values.
///
/// The result evaluates to the same value as `expr` for every completion of
/// `assignment` under which `expr` evaluates without a division by zero.
pub fn simplify(expr: &Expr, assignment: &Assignment) -> Expr {
    let mut simplifier = Simplifier::new(assignment);
    if assignment.is_empty() {
        simplifier.normalize(expr)
    } else {
        simplifier.simplify_node(expr)
    }
}

/// Simplify under the empty assignment, using the per-node cache
pub fn normalize(expr: &Expr) -> Expr {
    simplify(expr, &Assignment::new())
}

struct Simplifier<'a> {
    assignment: &'a Assignment,
    /// Per-call results keyed by node identity; the original node is kept
    /// alive alongside its result so the key cannot be reused
    memo: HashMap<usize, (Expr, Expr)>,
}

impl<'a> Simplifier<'a> {
    fn new(assignment: &'a Assignment) -> Self {
        Self {
            assignment,
            memo: HashMap::new(),
        }
    }

    /// Empty-assignment simplification through the node cache
    fn normalize(&mut self, expr: &Expr) -> Expr {
        if let Some(normal) = expr.normal_form() {
            return normal;
        }
        let Some((op, lhs, rhs)) = expr.as_binary() else {
            return expr.clone();
        };
        let l = self.normalize(lhs);
        let r = self.normalize(rhs);
        let result = self.rewrite(op, l, r, Some(expr));
        expr.record_normal_form(&result);
        result
    }

    fn simplify_node(&mut self, expr: &Expr) -> Expr {
        match expr.kind() {
            ExprKind::Literal(_) => expr.clone(),
            ExprKind::Input(index) => match self.assignment.get(*index) {
                Some(value) => Expr::literal(value),
                None => expr.clone(),
            },
            ExprKind::Binary { op, lhs, rhs } => {
                let bound = expr
                    .input_span()
                    .is_some_and(|(lo, hi)| self.assignment.binds_any(lo, hi));
                if !bound {
                    return self.normalize(expr);
                }
                if let Some((_, result)) = self.memo.get(&expr.id()) {
                    return result.clone();
                }
                let l = self.simplify_node(lhs);
                let r = self.simplify_node(rhs);
                let result = self.rewrite(*op, l, r, Some(expr));
                self.memo.insert(expr.id(), (expr.clone(), result.clone()));
                result
            }
        }
    }

    /// Rebuild `op(l, r)` from simplified operands
    fn rewrite(&mut self, op: BinaryOp, l: Expr, r: Expr, original: Option<&Expr>) -> Expr {
        // a literal zero divisor is never folded
        if matches!(op, BinaryOp::Div | BinaryOp::Mod) && r.as_literal() == Some(0) {
            return finish_unfolded(op, l, r, original);
        }

        if let (Some(a), Some(b)) = (l.as_literal(), r.as_literal()) {
            if let Ok(value) = op.apply(a, b) {
                return Expr::literal(value);
            }
        }

        let rewritten = match op {
            BinaryOp::Add => self.rewrite_add(&l, &r),
            BinaryOp::Mul => self.rewrite_mul(&l, &r),
            BinaryOp::Div => self.rewrite_div(&l, &r),
            BinaryOp::Mod => self.rewrite_mod(&l, &r),
            BinaryOp::Eql => self.rewrite_eql(&l, &r),
        };
        if let Some(expr) = rewritten {
            return expr;
        }

        let node = match original {
            Some(orig) => match orig.as_binary() {
                Some((_, ol, or)) if Expr::ptr_eq(ol, &l) && Expr::ptr_eq(or, &r) => orig.clone(),
                _ => fresh(op, l, r),
            },
            None => fresh(op, l, r),
        };
        match node.range().single_value() {
            Some(value) => Expr::literal(value),
            None => node,
        }
    }

    fn add(&mut self, l: Expr, r: Expr) -> Expr {
        self.rewrite(BinaryOp::Add, l, r, None)
    }

    fn mul(&mut self, l: Expr, r: Expr) -> Expr {
        self.rewrite(BinaryOp::Mul, l, r, None)
    }

    fn div(&mut self, l: Expr, r: Expr) -> Expr {
        self.rewrite(BinaryOp::Div, l, r, None)
    }

    fn modulo(&mut self, l: Expr, r: Expr) -> Expr {
        self.rewrite(BinaryOp::Mod, l, r, None)
    }

    fn sum_of(&mut self, terms: Vec<Expr>) -> Expr {
        let mut terms = terms.into_iter();
        let Some(first) = terms.next() else {
            return Expr::literal(0);
        };
        terms.fold(first, |acc, term| self.add(acc, term))
    }

    fn rewrite_add(&mut self, l: &Expr, r: &Expr) -> Option<Expr> {
        if l.as_literal().is_some() && r.as_literal().is_none() {
            return Some(self.add(r.clone(), l.clone()));
        }
        let c = r.as_literal();
        if c == Some(0) {
            return Some(l.clone());
        }
        if let (Some(c2), Some((BinaryOp::Add, x, c1))) = (c, l.as_binary()) {
            if let Some(c1) = c1.as_literal() {
                return Some(self.add(x.clone(), Expr::literal(c1.wrapping_add(c2))));
            }
        }
        // keep the constant outermost: a + (y + c) -> (a + y) + c
        if let Some((BinaryOp::Add, y, c)) = r.as_binary() {
            if c.as_literal().is_some() {
                let inner = self.add(l.clone(), y.clone());
                return Some(self.add(inner, c.clone()));
            }
        }
        None
    }

    fn rewrite_mul(&mut self, l: &Expr, r: &Expr) -> Option<Expr> {
        if l.as_literal().is_some() && r.as_literal().is_none() {
            return Some(self.mul(r.clone(), l.clone()));
        }
        let c = r.as_literal()?;
        match c {
            0 => return Some(Expr::literal(0)),
            1 => return Some(l.clone()),
            _ => {}
        }
        match l.as_binary() {
            Some((BinaryOp::Mul, x, k)) => {
                let k = k.as_literal()?;
                Some(self.mul(x.clone(), Expr::literal(k.wrapping_mul(c))))
            }
            Some((BinaryOp::Add, a, b)) => {
                let a = self.mul(a.clone(), r.clone());
                let b = self.mul(b.clone(), r.clone());
                Some(self.add(a, b))
            }
            _ => None,
        }
    }

    fn rewrite_div(&mut self, l: &Expr, r: &Expr) -> Option<Expr> {
        if l.as_literal() == Some(0) && !r.range().includes(0) {
            return Some(Expr::literal(0));
        }
        if l == r && !r.range().includes(0) {
            return Some(Expr::literal(1));
        }
        // (x * y) / y -> x
        if let Some((BinaryOp::Mul, x, y)) = l.as_binary() {
            if !r.range().includes(0) {
                if y == r {
                    return Some(x.clone());
                }
                if x == r {
                    return Some(y.clone());
                }
            }
        }

        let c = r.as_literal()?;
        match c {
            1 => return Some(l.clone()),
            -1 => return Some(self.mul(l.clone(), Expr::literal(-1))),
            _ => {}
        }
        let bound = c.saturating_abs() - 1;
        if l.range().within(-bound, bound) {
            return Some(Expr::literal(0));
        }

        match l.as_binary() {
            Some((BinaryOp::Mul, x, k)) => {
                let k = k.as_literal()?;
                if k.checked_rem(c) == Some(0) {
                    return Some(self.mul(x.clone(), Expr::literal(k / c)));
                }
                if c.checked_rem(k) == Some(0) {
                    return Some(self.div(x.clone(), Expr::literal(c / k)));
                }
                None
            }
            Some((BinaryOp::Div, x, c1)) => {
                let c1 = c1.as_literal()?;
                if c1 > 0 && c > 0 {
                    let combined = c1.checked_mul(c)?;
                    return Some(self.div(x.clone(), Expr::literal(combined)));
                }
                None
            }
            Some((BinaryOp::Add, _, _)) => {
                let (multiples, rest) = self.split_sum(l, c)?;
                let mut terms: Vec<Expr> = multiples
                    .into_iter()
                    .map(|m| self.div(m, Expr::literal(c)))
                    .collect();
                let rest = self.div(rest, Expr::literal(c));
                terms.push(rest);
                Some(self.sum_of(terms))
            }
            _ => None,
        }
    }

    fn rewrite_mod(&mut self, l: &Expr, r: &Expr) -> Option<Expr> {
        if l.as_literal() == Some(0) && !r.range().includes(0) {
            return Some(Expr::literal(0));
        }

        let c = r.as_literal()?;
        if c == 1 || c == -1 {
            return Some(Expr::literal(0));
        }
        let bound = c.saturating_abs() - 1;
        if l.range().within(0, bound) || l.range().within(-bound, 0) {
            return Some(l.clone());
        }
        if is_multiple_of(l, c) {
            return Some(Expr::literal(0));
        }

        match l.as_binary() {
            Some((BinaryOp::Mod, x, c1)) if c1.as_literal() == Some(c) => {
                Some(self.modulo(x.clone(), r.clone()))
            }
            Some((BinaryOp::Add, _, _)) => {
                let (_, rest) = self.split_sum(l, c)?;
                Some(self.modulo(rest, r.clone()))
            }
            _ => None,
        }
    }

    fn rewrite_eql(&mut self, l: &Expr, r: &Expr) -> Option<Expr> {
        if l.as_literal().is_some() && r.as_literal().is_none() {
            return Some(self.rewrite(BinaryOp::Eql, r.clone(), l.clone(), None));
        }
        if !l.range().intersects(r.range()) {
            return Some(Expr::literal(0));
        }
        if l == r {
            return Some(Expr::literal(1));
        }
        None
    }

    /// Split a sum into the terms that are multiples of `c` and the sum of
    /// the remaining terms. Only succeeds when at least one term is a
    /// multiple and both parts are known to share a sign, so that
    /// truncating division and remainder distribute over the split.
    fn split_sum(&mut self, sum: &Expr, c: i64) -> Option<(Vec<Expr>, Expr)> {
        let mut terms = Vec::new();
        sum_terms(sum, &mut terms);
        let (multiples, others): (Vec<Expr>, Vec<Expr>) =
            terms.into_iter().partition(|t| is_multiple_of(t, c));
        if multiples.is_empty() {
            return None;
        }

        let multiple_sum = self.sum_of(multiples.clone());
        let rest = self.sum_of(others);
        let (m, r) = (multiple_sum.range(), rest.range());
        let same_sign =
            (m.is_nonnegative() && r.is_nonnegative()) || (m.is_nonpositive() && r.is_nonpositive());
        if !same_sign {
            return None;
        }
        Some((multiples, rest))
    }
}

fn fresh(op: BinaryOp, l: Expr, r: Expr) -> Expr {
    let node = Expr::binary(op, l, r);
    node.mark_normalized();
    node
}

fn finish_unfolded(op: BinaryOp, l: Expr, r: Expr, original: Option<&Expr>) -> Expr {
    if let Some(orig) = original {
        if let Some((_, ol, or)) = orig.as_binary() {
            if Expr::ptr_eq(ol, &l) && Expr::ptr_eq(or, &r) {
                return orig.clone();
            }
        }
    }
    fresh(op, l, r)
}

/// Operands of a (nested) sum, left to right
fn sum_terms(expr: &Expr, out: &mut Vec<Expr>) {
    match expr.as_binary() {
        Some((BinaryOp::Add, l, r)) => {
            sum_terms(l, out);
            sum_terms(r, out);
        }
        _ => out.push(expr.clone()),
    }
}

/// True if every value of `expr` is a multiple of `c`
fn is_multiple_of(expr: &Expr, c: i64) -> bool {
    if let Some(value) = expr.as_literal() {
        return value.checked_rem(c) == Some(0);
    }
    if let Some((BinaryOp::Mul, _, k)) = expr.as_binary() {
        if k.as_literal().is_some_and(|k| k.checked_rem(c) == Some(0)) {
            return true;
        }
    }
    expr.range().all_multiples_of(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::expr::EvalError;
    use crate::semantics::range::Range;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn lit(v: i64) -> Expr {
        Expr::literal(v)
    }

    fn inp(i: usize) -> Expr {
        Expr::input(i)
    }

    fn empty() -> Assignment {
        Assignment::new()
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(normalize(&Expr::add(lit(2), lit(3))), lit(5));
        assert_eq!(normalize(&Expr::mul(lit(-4), lit(3))), lit(-12));
        assert_eq!(normalize(&Expr::div(lit(-7), lit(2))), lit(-3));
        assert_eq!(normalize(&Expr::modulo(lit(-7), lit(2))), lit(-1));
    }

    #[test]
    fn test_equals_short_circuit() {
        assert_eq!(normalize(&Expr::eql(lit(5), lit(8))), lit(0));
        assert_eq!(normalize(&Expr::eql(lit(5), lit(5))), lit(1));
        // 10..18 never meets 1..9
        assert_eq!(normalize(&Expr::eql(Expr::add(inp(0), lit(9)), inp(1))), lit(0));
        assert_eq!(normalize(&Expr::eql(inp(2), inp(2))), lit(1));
        // overlapping ranges keep the comparison
        let kept = normalize(&Expr::eql(inp(0), inp(1)));
        assert_eq!(kept, Expr::eql(inp(0), inp(1)));
    }

    #[test]
    fn test_identities() {
        assert_eq!(normalize(&Expr::add(inp(0), lit(0))), inp(0));
        assert_eq!(normalize(&Expr::add(lit(0), inp(0))), inp(0));
        assert_eq!(normalize(&Expr::mul(inp(0), lit(1))), inp(0));
        assert_eq!(normalize(&Expr::mul(inp(0), lit(0))), lit(0));
        assert_eq!(normalize(&Expr::mul(lit(0), inp(3))), lit(0));
        assert_eq!(normalize(&Expr::div(lit(0), inp(3))), lit(0));
        assert_eq!(normalize(&Expr::div(inp(3), lit(1))), inp(3));
        assert_eq!(
            normalize(&Expr::div(inp(3), lit(-1))),
            Expr::mul(inp(3), lit(-1))
        );
        assert_eq!(normalize(&Expr::modulo(inp(3), lit(1))), lit(0));
    }

    #[test]
    fn test_literal_moves_right_and_reassociates() {
        assert_eq!(normalize(&Expr::add(lit(4), inp(0))), Expr::add(inp(0), lit(4)));
        assert_eq!(
            normalize(&Expr::add(Expr::add(inp(0), lit(4)), lit(-1))),
            Expr::add(inp(0), lit(3))
        );
        assert_eq!(
            normalize(&Expr::mul(lit(3), Expr::mul(inp(0), lit(5)))),
            Expr::mul(inp(0), lit(15))
        );
        assert_eq!(
            normalize(&Expr::add(inp(1), Expr::add(inp(0), lit(2)))),
            Expr::add(Expr::add(inp(1), inp(0)), lit(2))
        );
    }

    #[test]
    fn test_multiplication_distributes_over_sum() {
        let expr = Expr::mul(Expr::add(inp(0), lit(5)), lit(26));
        assert_eq!(
            normalize(&expr),
            Expr::add(Expr::mul(inp(0), lit(26)), lit(130))
        );
    }

    #[test]
    fn test_small_dividend_divides_to_zero() {
        assert_eq!(normalize(&Expr::div(inp(0), lit(26))), lit(0));
        assert_eq!(normalize(&Expr::div(Expr::add(inp(0), lit(16)), lit(26))), lit(0));
        // 1..9 / 5 still varies
        assert_eq!(normalize(&Expr::div(inp(0), lit(5))), Expr::div(inp(0), lit(5)));
    }

    #[test]
    fn test_division_cancellation() {
        assert_eq!(normalize(&Expr::div(Expr::mul(inp(0), lit(26)), lit(26))), inp(0));
        assert_eq!(
            normalize(&Expr::div(Expr::mul(inp(0), lit(52)), lit(26))),
            Expr::mul(inp(0), lit(2))
        );
        assert_eq!(
            normalize(&Expr::div(Expr::mul(inp(0), lit(2)), lit(6))),
            Expr::div(inp(0), lit(3))
        );
        let y = Expr::add(inp(1), lit(1));
        assert_eq!(normalize(&Expr::div(Expr::mul(inp(0), y.clone()), y.clone())), inp(0));
        assert_eq!(normalize(&Expr::div(y.clone(), y)), lit(1));
    }

    #[test]
    fn test_nested_division_merges() {
        let big = Expr::mul(inp(0), inp(1));
        let expr = Expr::div(Expr::div(big.clone(), lit(2)), lit(3));
        assert_eq!(normalize(&expr), Expr::div(big, lit(6)));
    }

    #[test]
    fn test_division_distributes_over_aligned_sum() {
        // (i0 * 26 + i1 + 2) / 26 -> i0
        let expr = Expr::div(
            Expr::add(Expr::mul(inp(0), lit(26)), Expr::add(inp(1), lit(2))),
            lit(26),
        );
        assert_eq!(normalize(&expr), inp(0));
    }

    #[test]
    fn test_division_keeps_mixed_sign_sum() {
        // i0 * 26 + (i1 - 20): the remainder part may be negative
        let expr = Expr::div(
            Expr::add(Expr::mul(inp(0), lit(26)), Expr::add(inp(1), lit(-20))),
            lit(26),
        );
        let simplified = normalize(&expr);
        assert!(matches!(simplified.as_binary(), Some((BinaryOp::Div, _, _))));
    }

    #[test]
    fn test_modulo_rules() {
        assert_eq!(normalize(&Expr::modulo(Expr::add(inp(0), lit(5)), lit(26))), Expr::add(inp(0), lit(5)));
        assert_eq!(normalize(&Expr::modulo(Expr::mul(inp(0), lit(26)), lit(26))), lit(0));
        assert_eq!(normalize(&Expr::modulo(Expr::mul(inp(0), lit(52)), lit(26))), lit(0));

        let expr = Expr::modulo(
            Expr::add(Expr::mul(inp(0), lit(26)), Expr::add(inp(1), lit(2))),
            lit(26),
        );
        assert_eq!(normalize(&expr), Expr::add(inp(1), lit(2)));

        let x = Expr::mul(inp(0), inp(1));
        let twice = Expr::modulo(Expr::modulo(x.clone(), lit(7)), lit(7));
        assert_eq!(normalize(&twice), Expr::modulo(x, lit(7)));
    }

    #[test]
    fn test_literal_zero_divisor_is_not_folded() {
        let expr = Expr::div(lit(5), lit(0));
        let simplified = normalize(&expr);
        assert!(Expr::ptr_eq(&simplified, &expr));
        let expr = Expr::modulo(inp(0), lit(0));
        assert_eq!(normalize(&expr), Expr::modulo(inp(0), lit(0)));
    }

    #[test]
    fn test_range_collapse_to_literal() {
        // (i0 % 1) + 4 has the single value 4
        let expr = Expr::add(Expr::modulo(inp(0), lit(1)), lit(4));
        assert_eq!(normalize(&expr), lit(4));
        // the equality of the first MONAD block is always false
        let x = Expr::add(lit(0), lit(11));
        let cond = Expr::eql(Expr::eql(x, inp(0)), lit(0));
        assert_eq!(normalize(&cond), lit(1));
    }

    #[test]
    fn test_assignment_substitutes_inputs() {
        let expr = Expr::add(Expr::mul(inp(0), lit(26)), inp(1));
        let a = Assignment::from_digits(&[3]);
        assert_eq!(simplify(&expr, &a), Expr::add(inp(1), lit(78)));
        let a = Assignment::from_digits(&[3, 4]);
        assert_eq!(simplify(&expr, &a), lit(82));
    }

    #[test]
    fn test_partial_assignment_resolves_equality() {
        // (i0 + 3 == i1) with i0 = 7 can never hold
        let expr = Expr::eql(Expr::add(inp(0), lit(3)), inp(1));
        assert_eq!(simplify(&expr, &Assignment::from_digits(&[7])), lit(0));
        assert_eq!(
            simplify(&expr, &Assignment::from_digits(&[2])),
            Expr::eql(inp(1), lit(5))
        );
    }

    #[test]
    fn test_normalized_form_is_cached() {
        let expr = Expr::add(Expr::add(inp(0), lit(2)), lit(3));
        let first = normalize(&expr);
        let second = normalize(&expr);
        assert!(Expr::ptr_eq(&first, &second));
        assert!(Expr::ptr_eq(&normalize(&first), &first));
    }

    #[test]
    fn test_untouched_subgraph_reuses_normal_form() {
        let tail = Expr::mul(Expr::add(inp(3), lit(1)), inp(4));
        let normal_tail = normalize(&tail);
        let expr = Expr::add(inp(0), tail.clone());
        let simplified = simplify(&expr, &Assignment::from_digits(&[2]));
        let (_, lhs, _) = simplified.as_binary().unwrap();
        assert!(Expr::ptr_eq(lhs, &normal_tail));
    }

    /// Random expressions over a handful of inputs, for soundness checks
    /// against concrete evaluation. Divisors are either nonzero literals or
    /// arbitrary subexpressions, which may evaluate to zero; some operands
    /// reuse the left-hand subtree so the result is a DAG.
    fn random_expr(rng: &mut ChaCha8Rng, depth: usize, inputs: usize) -> Expr {
        if depth == 0 || rng.random_bool(0.25) {
            return if rng.random_bool(0.5) {
                inp(rng.random_range(0..inputs))
            } else {
                lit(rng.random_range(-12..=12))
            };
        }
        let lhs = random_expr(rng, depth - 1, inputs);
        let rhs = if rng.random_bool(0.15) {
            lhs.clone()
        } else {
            random_expr(rng, depth - 1, inputs)
        };
        let literal_divisor = rng.random_bool(0.5);
        match rng.random_range(0..5) {
            0 => Expr::add(lhs, rhs),
            1 => Expr::mul(lhs, rhs),
            2 => Expr::eql(lhs, rhs),
            3 if literal_divisor => {
                let d = [-7, -3, -2, 2, 3, 5, 26][rng.random_range(0..7)];
                Expr::div(lhs, lit(d))
            }
            3 => Expr::div(lhs, rhs),
            _ if literal_divisor => {
                let d = [-7, -3, 2, 3, 5, 26][rng.random_range(0..6)];
                Expr::modulo(lhs, lit(d))
            }
            _ => Expr::modulo(lhs, rhs),
        }
    }

    fn all_digits(count: usize) -> Vec<Vec<i64>> {
        let mut out = vec![Vec::new()];
        for _ in 0..count {
            out = out
                .into_iter()
                .flat_map(|prefix| {
                    (1..=9).map(move |d| {
                        let mut next = prefix.clone();
                        next.push(d);
                        next
                    })
                })
                .collect();
        }
        out
    }

    #[test]
    fn test_simplification_soundness() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for _ in 0..300 {
            let expr = random_expr(&mut rng, 4, 3);
            let normal = normalize(&expr);
            for _ in 0..20 {
                let digits: Vec<i64> = (0..3).map(|_| rng.random_range(1..=9)).collect();
                let full = Assignment::from_digits(&digits);
                let Ok(expected) = expr.evaluate(&full) else {
                    continue;
                };
                assert_eq!(normal.evaluate(&full), Ok(expected), "{} vs {}", expr, normal);

                let partial = Assignment::from_digits(&digits[..1]);
                let simplified = simplify(&expr, &partial);
                assert_eq!(simplified.evaluate(&full), Ok(expected), "{} vs {}", expr, simplified);
            }
        }
    }

    #[test]
    fn test_range_soundness() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..300 {
            let expr = random_expr(&mut rng, 4, 2);
            let range: Range = expr.range().clone();
            for a in 1..=9 {
                for b in 1..=9 {
                    if let Ok(value) = expr.evaluate(&Assignment::from_digits(&[a, b])) {
                        assert!(range.includes(value), "{} not in {} for {}", value, range, expr);
                    }
                }
            }
        }
    }

    #[test]
    fn test_idempotence() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let expr = random_expr(&mut rng, 5, 3);
            let once = simplify(&expr, &empty());
            let twice = simplify(&once, &empty());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_soundness_with_expression_divisors() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xd1_5e);
        let assignments = all_digits(3);
        let mut checked_zero_divisor = false;
        for _ in 0..150 {
            let expr = random_expr(&mut rng, 4, 3);
            let normal = normalize(&expr);
            let range = expr.range().clone();
            assert_eq!(simplify(&normal, &empty()), normal, "{}", expr);

            for digits in &assignments {
                let full = Assignment::from_digits(digits);
                let expected = match expr.evaluate(&full) {
                    Ok(value) => value,
                    Err(EvalError::DivisionByZero) => {
                        checked_zero_divisor = true;
                        continue;
                    }
                    Err(e) => panic!("{} on {}: {}", expr, full, e),
                };
                assert!(range.includes(expected), "{} not in {} for {}", expected, range, expr);
                assert_eq!(normal.evaluate(&full), Ok(expected), "{} vs {}", expr, normal);

                let partial = Assignment::from_digits(&digits[..2]);
                let simplified = simplify(&expr, &partial);
                assert_eq!(simplified.evaluate(&full), Ok(expected), "{} vs {}", expr, simplified);
            }
        }
        assert!(checked_zero_divisor);
    }
}
