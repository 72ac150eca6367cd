//! Abstract value sets for expression outputs
//!
//! A [`Range`] over-approximates (and, where the arithmetic allows, exactly
//! describes) the values an expression can produce when every input digit
//! ranges over its domain. Ranges are built from arithmetic progressions
//! ([`Continuous`]) and are kept sorted and merged so that equal value sets
//! usually share one representation.
//!
//! Invariant for every operator: the returned range contains every value
//! the operator can produce from operands drawn from the argument ranges.
//! Divisors never take the value 0; executions that would divide by zero
//! are outside the program's domain, so 0 is removed from divisor ranges
//! before the quotient or remainder is computed.

#![allow(dead_code)]

use std::fmt;

/// Largest operand-pair product that is enumerated value by value.
pub const ENUMERATION_LIMIT: u64 = 1 << 12;

/// Largest number of member pairs combined one pair at a time.
const SPAN_PAIR_LIMIT: usize = 64;

/// Work budget for the empirical phase of the modulo bound search.
const MODULO_PROBE_BUDGET: u64 = 1 << 16;

/// How many preceding members a new member is checked against when merging.
const MERGE_WINDOW: usize = 16;

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.min(i64::MAX as u64) as i64
}

/// Inclusive arithmetic progression `min, min + step, ..., max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Continuous {
    min: i64,
    max: i64,
    step: i64,
}

impl Continuous {
    /// Create a progression. Bounds are swapped if reversed, a step below 1
    /// becomes 1, and `max` is pulled down onto the progression.
    pub fn new(min: i64, max: i64, step: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let step = step.max(1);
        let span = max as i128 - min as i128;
        let max = (min as i128 + span - span % step as i128) as i64;
        if min == max {
            Self { min, max, step: 1 }
        } else {
            Self { min, max, step }
        }
    }

    pub fn single(value: i64) -> Self {
        Self {
            min: value,
            max: value,
            step: 1,
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn is_single(&self) -> bool {
        self.min == self.max
    }

    /// Step used for alignment arithmetic: 0 for a single value
    fn stride(&self) -> i64 {
        if self.is_single() {
            0
        } else {
            self.step
        }
    }

    /// Number of values in the progression
    pub fn len(&self) -> u64 {
        let span = self.max as i128 - self.min as i128;
        (span / self.step as i128 + 1).min(u64::MAX as i128) as u64
    }

    pub fn includes(&self, value: i64) -> bool {
        value >= self.min
            && value <= self.max
            && (value as i128 - self.min as i128) % self.step as i128 == 0
    }

    pub fn values(&self) -> impl Iterator<Item = i64> {
        let Continuous { min, step, .. } = *self;
        (0..self.len()).map(move |k| min.wrapping_add((k as i64).wrapping_mul(step)))
    }

    /// True if every value of `other` is also a value of `self`
    pub fn contains(&self, other: &Continuous) -> bool {
        other.min >= self.min
            && other.max <= self.max
            && self.includes(other.min)
            && (other.is_single() || other.step % self.step == 0)
    }

    /// True if every value is a multiple of `divisor`
    pub fn all_multiples_of(&self, divisor: i64) -> bool {
        divisor != 0 && self.min % divisor == 0 && self.stride() % divisor == 0
    }

    /// Smallest value at or above `bound`
    fn first_at_or_above(&self, bound: i64) -> Option<i64> {
        if bound > self.max {
            return None;
        }
        if bound <= self.min {
            return Some(self.min);
        }
        let offset = bound as i128 - self.min as i128;
        let steps = (offset + self.step as i128 - 1) / self.step as i128;
        let value = self.min as i128 + steps * self.step as i128;
        (value <= self.max as i128).then_some(value as i64)
    }

    /// Largest value at or below `bound`
    fn last_at_or_below(&self, bound: i64) -> Option<i64> {
        if bound < self.min {
            return None;
        }
        if bound >= self.max {
            return Some(self.max);
        }
        let offset = bound as i128 - self.min as i128;
        Some((self.min as i128 + offset / self.step as i128 * self.step as i128) as i64)
    }

    /// Split into the strictly negative part, whether 0 is present, and
    /// the strictly positive part
    fn split_sign(&self) -> (Option<Continuous>, bool, Option<Continuous>) {
        let negative = self
            .last_at_or_below(-1)
            .map(|last| Continuous::new(self.min, last, self.step));
        let positive = self
            .first_at_or_above(1)
            .map(|first| Continuous::new(first, self.max, self.step));
        (negative, self.includes(0), positive)
    }

    fn negated(&self) -> Continuous {
        Continuous::new(-self.max, -self.min, self.step)
    }

    /// Union of two progressions if it is itself a progression
    fn merge(&self, other: &Continuous) -> Option<Continuous> {
        let (a, b) = if (self.min, self.max) <= (other.min, other.max) {
            (self, other)
        } else {
            (other, self)
        };
        if a.contains(b) {
            return Some(*a);
        }
        if b.contains(a) {
            return Some(*b);
        }
        let stride = match (a.is_single(), b.is_single()) {
            (true, true) => b.min - a.min,
            (true, false) => b.step,
            (false, true) => a.step,
            (false, false) if a.step == b.step => a.step,
            _ => return None,
        };
        let gap = b.min as i128 - a.min as i128;
        if gap % stride as i128 != 0 || b.min as i128 > a.max as i128 + stride as i128 {
            return None;
        }
        Some(Continuous::new(a.min, a.max.max(b.max), stride))
    }

    /// Values common to both progressions
    fn intersection(&self, other: &Continuous) -> Option<Continuous> {
        let lo = self.min.max(other.min);
        let hi = self.max.min(other.max);
        if lo > hi {
            return None;
        }
        if self.is_single() {
            return other.includes(self.min).then_some(*self);
        }
        if other.is_single() {
            return self.includes(other.min).then_some(*other);
        }

        // walk the coarser progression; its values cycle modulo the finer
        // step within `finer.step` iterations
        let (coarse, fine) = if self.step >= other.step {
            (self, other)
        } else {
            (other, self)
        };
        let mut candidate = coarse.first_at_or_above(lo)?;
        for _ in 0..fine.step {
            if candidate > hi {
                return None;
            }
            if fine.includes(candidate) {
                let lcm = coarse.step as i128 / gcd(coarse.step, fine.step) as i128
                    * fine.step as i128;
                let span = hi as i128 - candidate as i128;
                if lcm > span {
                    return Some(Continuous::single(candidate));
                }
                let last = candidate as i128 + span / lcm * lcm;
                return Some(Continuous::new(candidate, last as i64, lcm as i64));
            }
            candidate = candidate.checked_add(coarse.step)?;
        }
        None
    }
}

impl fmt::Display for Continuous {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.min)
        } else if self.step != 1 {
            write!(f, "{}..{} step {}", self.min, self.max, self.step)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

/// Hull of a set of progressions: overall bounds with the coarsest step
/// that still covers every member
fn hull_of(spans: impl IntoIterator<Item = Continuous>) -> Option<Continuous> {
    let mut spans = spans.into_iter();
    let first = spans.next()?;
    let (mut lo, mut hi, mut stride) = (first.min, first.max, first.stride());
    for span in spans {
        stride = gcd(gcd(stride, span.stride()), span.min.wrapping_sub(first.min));
        lo = lo.min(span.min);
        hi = hi.max(span.max);
    }
    Some(Continuous::new(lo, hi, stride))
}

/// Possible output values of an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Range {
    /// No possible values
    Empty,
    Continuous(Continuous),
    /// Disjoint-ish union of at least two progressions, sorted by bounds
    Compound(Vec<Continuous>),
}

impl Range {
    pub fn single(value: i64) -> Self {
        Range::Continuous(Continuous::single(value))
    }

    pub fn continuous(min: i64, max: i64, step: i64) -> Self {
        Range::Continuous(Continuous::new(min, max, step))
    }

    /// Build a range from any number of progressions, merging members that
    /// overlap, touch or nest
    pub fn from_spans(spans: impl IntoIterator<Item = Continuous>) -> Self {
        let mut spans: Vec<Continuous> = spans.into_iter().collect();
        spans.sort_by_key(|s| (s.min, s.max));

        let mut merged: Vec<Continuous> = Vec::with_capacity(spans.len());
        for span in spans {
            let mut current = span;
            loop {
                let window_start = merged.len().saturating_sub(MERGE_WINDOW);
                let hit = merged[window_start..]
                    .iter()
                    .enumerate()
                    .rev()
                    .find_map(|(i, m)| m.merge(&current).map(|joined| (window_start + i, joined)));
                match hit {
                    Some((i, joined)) => {
                        merged.remove(i);
                        current = joined;
                    }
                    None => break,
                }
            }
            merged.push(current);
        }
        merged.sort_by_key(|s| (s.min, s.max));

        match merged.len() {
            0 => Range::Empty,
            1 => Range::Continuous(merged[0]),
            _ => Range::Compound(merged),
        }
    }

    /// Build a range from a list of integer values
    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Self {
        let mut values: Vec<i64> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();

        let mut spans = Vec::new();
        let mut i = 0;
        while i < values.len() {
            let start = values[i];
            if i + 1 == values.len() {
                spans.push(Continuous::single(start));
                break;
            }
            let step = values[i + 1] - start;
            let mut j = i + 1;
            while j + 1 < values.len() && values[j + 1] - values[j] == step {
                j += 1;
            }
            spans.push(Continuous::new(start, values[j], step));
            i = j + 1;
        }

        Range::from_spans(spans)
    }

    /// Member progressions, in sorted order
    pub fn spans(&self) -> &[Continuous] {
        match self {
            Range::Empty => &[],
            Range::Continuous(c) => std::slice::from_ref(c),
            Range::Compound(members) => members,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Range::Empty)
    }

    /// The only value of this range, if it has exactly one
    pub fn single_value(&self) -> Option<i64> {
        match self {
            Range::Continuous(c) if c.is_single() => Some(c.min),
            _ => None,
        }
    }

    pub fn min(&self) -> Option<i64> {
        self.spans().iter().map(|s| s.min).min()
    }

    pub fn max(&self) -> Option<i64> {
        self.spans().iter().map(|s| s.max).max()
    }

    /// Number of values, counting values shared by members once per member
    pub fn len(&self) -> u64 {
        self.spans()
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.len()))
    }

    pub fn includes(&self, value: i64) -> bool {
        self.spans().iter().any(|s| s.includes(value))
    }

    /// Lazily enumerate the values of this range
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.spans().iter().flat_map(|s| s.values())
    }

    /// True if all values lie within `lo..=hi`
    pub fn within(&self, lo: i64, hi: i64) -> bool {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) => min >= lo && max <= hi,
            _ => true,
        }
    }

    pub fn is_nonnegative(&self) -> bool {
        self.min().map_or(true, |min| min >= 0)
    }

    pub fn is_nonpositive(&self) -> bool {
        self.max().map_or(true, |max| max <= 0)
    }

    /// True if every value is a multiple of `divisor`
    pub fn all_multiples_of(&self, divisor: i64) -> bool {
        self.spans().iter().all(|s| s.all_multiples_of(divisor))
    }

    /// True if the ranges share at least one value
    pub fn intersects(&self, other: &Range) -> bool {
        match (self.min(), self.max(), other.min(), other.max()) {
            (Some(a_min), Some(a_max), Some(b_min), Some(b_max)) => {
                if a_max < b_min || b_max < a_min {
                    return false;
                }
            }
            _ => return false,
        }
        self.spans()
            .iter()
            .any(|a| other.spans().iter().any(|b| a.intersection(b).is_some()))
    }

    /// Values present in both ranges
    pub fn intersection(&self, other: &Range) -> Range {
        let mut parts = Vec::new();
        for a in self.spans() {
            for b in other.spans() {
                parts.extend(a.intersection(b));
            }
        }
        Range::from_spans(parts)
    }

    /// True if both ranges are known to describe the same value set
    pub fn same_values(&self, other: &Range) -> bool {
        if self == other {
            return true;
        }
        if self.min() != other.min() || self.max() != other.max() {
            return false;
        }
        if self.len() > ENUMERATION_LIMIT || other.len() > ENUMERATION_LIMIT {
            return false;
        }
        let collect = |r: &Range| {
            let mut v: Vec<i64> = r.values().collect();
            v.sort_unstable();
            v.dedup();
            v
        };
        collect(self) == collect(other)
    }

    /// This range with the value 0 removed
    pub fn without_zero(&self) -> Range {
        let mut parts = Vec::new();
        for span in self.spans() {
            let (negative, _, positive) = span.split_sign();
            parts.extend(negative);
            parts.extend(positive);
        }
        Range::from_spans(parts)
    }

    /// Hulls of the negative part, the zero value, and the positive part
    fn sign_hulls(&self) -> Vec<Continuous> {
        let mut negatives = Vec::new();
        let mut positives = Vec::new();
        let mut zero = false;
        for span in self.spans() {
            let (negative, has_zero, positive) = span.split_sign();
            negatives.extend(negative);
            positives.extend(positive);
            zero |= has_zero;
        }
        let mut hulls: Vec<Continuous> = Vec::with_capacity(3);
        hulls.extend(hull_of(negatives));
        if zero {
            hulls.push(Continuous::single(0));
        }
        hulls.extend(hull_of(positives));
        hulls
    }

    /// Shared driver for binary range arithmetic.
    ///
    /// Each member pair is resolved analytically by `exact` when possible,
    /// then by enumeration when small, then by `hull`. When there are too
    /// many member pairs the whole product is enumerated if small enough,
    /// otherwise the hull is taken over sign-split hulls of both operands.
    fn combine(
        &self,
        other: &Range,
        op: impl Fn(i64, i64) -> i64,
        exact: impl Fn(&Continuous, &Continuous) -> Option<Continuous>,
        hull: impl Fn(&Continuous, &Continuous) -> Continuous,
    ) -> Range {
        if self.is_empty() || other.is_empty() {
            return Range::Empty;
        }
        let (lhs, rhs) = (self.spans(), other.spans());
        let op = &op;

        if lhs.len() * rhs.len() <= SPAN_PAIR_LIMIT {
            let mut parts = Vec::new();
            for a in lhs {
                for b in rhs {
                    if let Some(span) = exact(a, b) {
                        parts.push(span);
                    } else if a.len().saturating_mul(b.len()) <= ENUMERATION_LIMIT {
                        let values = a.values().flat_map(|x| b.values().map(move |y| op(x, y)));
                        parts.extend_from_slice(Range::from_values(values).spans());
                    } else {
                        parts.push(hull(a, b));
                    }
                }
            }
            return Range::from_spans(parts);
        }

        if self.len().saturating_mul(other.len()) <= ENUMERATION_LIMIT {
            let values = self
                .values()
                .flat_map(|x| other.values().map(move |y| op(x, y)));
            return Range::from_values(values);
        }

        let (lhs_hulls, rhs_hulls) = (self.sign_hulls(), other.sign_hulls());
        let pieces = lhs_hulls
            .iter()
            .flat_map(|a| rhs_hulls.iter().map(|b| hull(a, b)))
            .collect::<Vec<_>>();
        hull_of(pieces).map_or(Range::Empty, Range::Continuous)
    }

    /// Range of `lhs + rhs`
    pub fn add(&self, other: &Range) -> Range {
        self.combine(
            other,
            |a, b| a.wrapping_add(b),
            |a, b| {
                let step = match (a.is_single(), b.is_single()) {
                    (true, _) => b.step,
                    (_, true) => a.step,
                    _ if a.step == b.step => a.step,
                    _ => return None,
                };
                Some(Continuous::new(
                    a.min.saturating_add(b.min),
                    a.max.saturating_add(b.max),
                    step,
                ))
            },
            |a, b| {
                Continuous::new(
                    a.min.saturating_add(b.min),
                    a.max.saturating_add(b.max),
                    gcd(a.stride(), b.stride()),
                )
            },
        )
    }

    /// Range of `lhs * rhs`
    pub fn multiply(&self, other: &Range) -> Range {
        self.combine(
            other,
            |a, b| a.wrapping_mul(b),
            |a, b| {
                let (factor, span) = match (a.is_single(), b.is_single()) {
                    (true, _) => (a.min, b),
                    (_, true) => (b.min, a),
                    _ => return None,
                };
                if factor == 0 {
                    return Some(Continuous::single(0));
                }
                Some(Continuous::new(
                    span.min.saturating_mul(factor),
                    span.max.saturating_mul(factor),
                    span.step.saturating_mul(factor.saturating_abs()),
                ))
            },
            |a, b| {
                let corners = [
                    a.min.saturating_mul(b.min),
                    a.min.saturating_mul(b.max),
                    a.max.saturating_mul(b.min),
                    a.max.saturating_mul(b.max),
                ];
                corner_hull(&corners)
            },
        )
    }

    /// Range of `lhs / rhs` with truncating division
    pub fn divide(&self, divisor: &Range) -> Range {
        let divisor = divisor.without_zero();
        self.combine(
            &divisor,
            |a, b| a.wrapping_div(b),
            |a, b| {
                (a.is_single() && b.is_single())
                    .then(|| Continuous::single(a.min.wrapping_div(b.min)))
            },
            |a, b| {
                // truncating division is monotone in the dividend, and for a
                // divisor of fixed sign monotone in the divisor, so the
                // extremes sit on the corners
                if b.min <= 0 && b.max >= 0 {
                    let bound = a.min.saturating_abs().max(a.max.saturating_abs());
                    return Continuous::new(-bound, bound, 1);
                }
                let corners = [
                    a.min.wrapping_div(b.min),
                    a.min.wrapping_div(b.max),
                    a.max.wrapping_div(b.min),
                    a.max.wrapping_div(b.max),
                ];
                corner_hull(&corners)
            },
        )
    }

    /// Range of `lhs % rhs` where the remainder takes the sign of the dividend.
    ///
    /// The result is always reported as a step-1 interval whose bounds are
    /// exact whenever the probe phase completes within its budget.
    pub fn modulo(&self, divisor: &Range) -> Range {
        let divisor = divisor.without_zero();
        if self.is_empty() || divisor.is_empty() {
            return Range::Empty;
        }
        if let (Some(a), Some(b)) = (self.single_value(), divisor.single_value()) {
            return Range::single(a.wrapping_rem(b));
        }

        let magnitude = divisor
            .spans()
            .iter()
            .map(|s| s.min.unsigned_abs().max(s.max.unsigned_abs()))
            .max()
            .unwrap_or(1);
        let largest_remainder = magnitude.saturating_sub(1).min(i64::MAX as u64) as i64;

        // partition the dividend by sign
        let mut negatives = Vec::new();
        let mut positives = Vec::new();
        let mut zero = false;
        for span in self.spans() {
            let (negative, has_zero, positive) = span.split_sign();
            negatives.extend(negative);
            positives.extend(positive);
            zero |= has_zero;
        }

        // phase 1: analytic bounds per partition
        let mut analytic: Option<(i64, i64)> = None;
        let widen = |bounds: &mut Option<(i64, i64)>, lo: i64, hi: i64| {
            *bounds = Some(match *bounds {
                Some((a, b)) => (a.min(lo), b.max(hi)),
                None => (lo, hi),
            });
        };
        if let Some(lowest) = negatives.iter().map(|s| s.min).min() {
            widen(&mut analytic, -(lowest.saturating_abs().min(largest_remainder)), 0);
        }
        if zero {
            widen(&mut analytic, 0, 0);
        }
        if let Some(highest) = positives.iter().map(|s| s.max).max() {
            widen(&mut analytic, 0, highest.min(largest_remainder));
        }
        let Some((analytic_lo, analytic_hi)) = analytic else {
            return Range::Empty;
        };

        // phase 2: probe each partition against each divisor magnitude until
        // the probed bounds reach the analytic ones or the budget runs out
        let mut budget = MODULO_PROBE_BUDGET;
        if divisor.len() > budget {
            return Range::continuous(analytic_lo, analytic_hi, 1);
        }
        let mut magnitudes: Vec<i64> = divisor.values().map(|d| d.saturating_abs()).collect();
        magnitudes.sort_unstable();
        magnitudes.dedup();
        budget -= divisor.len();

        let mut probed: Option<(i64, i64)> = zero.then_some((0, 0));
        for &modulus in magnitudes.iter().rev() {
            for span in &negatives {
                let Some((lo, hi)) = residue_bounds(&span.negated(), modulus, &mut budget) else {
                    return Range::continuous(analytic_lo, analytic_hi, 1);
                };
                widen(&mut probed, -hi, -lo);
            }
            for span in &positives {
                let Some((lo, hi)) = residue_bounds(span, modulus, &mut budget) else {
                    return Range::continuous(analytic_lo, analytic_hi, 1);
                };
                widen(&mut probed, lo, hi);
            }
            if probed == Some((analytic_lo, analytic_hi)) {
                break;
            }
        }

        match probed {
            Some((lo, hi)) => Range::continuous(lo, hi, 1),
            None => Range::continuous(analytic_lo, analytic_hi, 1),
        }
    }

    /// Range of an equality test
    pub fn equals(&self, _other: &Range) -> Range {
        Range::continuous(0, 1, 1)
    }
}

fn corner_hull(corners: &[i64]) -> Continuous {
    let lo = corners.iter().copied().min().unwrap_or(0);
    let hi = corners.iter().copied().max().unwrap_or(0);
    Continuous::new(lo, hi, 1)
}

/// Exact minimum and maximum of `v % modulus` over a strictly positive
/// progression. Returns `None` when the enumeration budget is exhausted.
fn residue_bounds(span: &Continuous, modulus: i64, budget: &mut u64) -> Option<(i64, i64)> {
    if modulus == 1 {
        return Some((0, 0));
    }
    if span.max < modulus {
        return Some((span.min, span.max));
    }
    let count = span.len();
    if span.is_single() {
        return Some((span.min % modulus, span.min % modulus));
    }

    // the residues cycle with period modulus / gcd(step, modulus); a full
    // cycle reaches every residue congruent to min modulo the gcd
    let g = gcd(span.step, modulus);
    let period = (modulus / g) as u64;
    if count >= period {
        let base = span.min.rem_euclid(g);
        return Some((base, modulus - g + base));
    }

    *budget = budget.checked_sub(count)?;
    let mut lo = i64::MAX;
    let mut hi = i64::MIN;
    for value in span.values() {
        let r = value % modulus;
        lo = lo.min(r);
        hi = hi.max(r);
    }
    Some((lo, hi))
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Empty => write!(f, "<>"),
            Range::Continuous(c) => write!(f, "{}", c),
            Range::Compound(members) => {
                write!(f, "<")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", m)?;
                }
                write!(f, ">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> Range {
        Range::continuous(1, 9, 1)
    }

    fn sorted_values(r: &Range) -> Vec<i64> {
        let mut v: Vec<i64> = r.values().collect();
        v.sort_unstable();
        v.dedup();
        v
    }

    /// Brute-force reference for binary range arithmetic
    fn brute(a: &Range, b: &Range, op: impl Fn(i64, i64) -> Option<i64>) -> Vec<i64> {
        let op = &op;
        let mut out: Vec<i64> = a
            .values()
            .flat_map(|x| b.values().filter_map(move |y| op(x, y)).collect::<Vec<_>>())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    #[test]
    fn test_continuous_normalization() {
        let c = Continuous::new(9, 1, 1);
        assert_eq!((c.min(), c.max()), (1, 9));

        let c = Continuous::new(0, 10, 3);
        assert_eq!(c.max(), 9);

        let c = Continuous::new(4, 4, 7);
        assert_eq!(c.step(), 1);
        assert!(c.is_single());
    }

    #[test]
    fn test_continuous_includes() {
        let c = Continuous::new(-6, 12, 3);
        assert!(c.includes(-6));
        assert!(c.includes(0));
        assert!(c.includes(12));
        assert!(!c.includes(1));
        assert!(!c.includes(15));
        assert_eq!(c.len(), 7);
    }

    #[test]
    fn test_from_values_runs() {
        assert_eq!(Range::from_values(vec![3, 1, 2]), Range::continuous(1, 3, 1));
        assert_eq!(Range::from_values(vec![0, 4, 8, 12]), Range::continuous(0, 12, 4));
        assert_eq!(Range::from_values(vec![7]), Range::single(7));
        assert_eq!(Range::from_values(Vec::<i64>::new()), Range::Empty);

        let r = Range::from_values(vec![1, 2, 3, 10, 11]);
        assert_eq!(
            r,
            Range::Compound(vec![Continuous::new(1, 3, 1), Continuous::new(10, 11, 1)])
        );
        assert_eq!(r.to_string(), "<1..3,10..11>");
    }

    #[test]
    fn test_from_spans_merges_touching_and_nested() {
        let r = Range::from_spans(vec![Continuous::new(1, 5, 1), Continuous::new(6, 9, 1)]);
        assert_eq!(r, Range::continuous(1, 9, 1));

        let r = Range::from_spans(vec![Continuous::new(0, 20, 2), Continuous::new(4, 8, 4)]);
        assert_eq!(r, Range::continuous(0, 20, 2));

        let r = Range::from_spans(vec![Continuous::new(1, 5, 1), Continuous::new(3, 12, 1)]);
        assert_eq!(r, Range::continuous(1, 12, 1));

        let r = Range::from_spans(vec![Continuous::single(5), Continuous::new(0, 4, 1)]);
        assert_eq!(r, Range::continuous(0, 5, 1));
    }

    #[test]
    fn test_from_spans_keeps_misaligned_members() {
        let r = Range::from_spans(vec![Continuous::new(0, 10, 2), Continuous::new(1, 9, 2)]);
        assert!(matches!(r, Range::Compound(ref m) if m.len() == 2));
        assert_eq!(sorted_values(&r), (0..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_intersection() {
        let a = Range::continuous(0, 30, 3);
        let b = Range::continuous(0, 30, 5);
        assert_eq!(a.intersection(&b), Range::continuous(0, 30, 15));
        assert!(a.intersects(&b));

        let odd = Range::continuous(1, 9, 2);
        let even = Range::continuous(0, 10, 2);
        assert_eq!(odd.intersection(&even), Range::Empty);
        assert!(!odd.intersects(&even));

        assert!(digits().intersects(&Range::single(9)));
        assert!(!digits().intersects(&Range::single(10)));
        assert!(!digits().intersects(&Range::Empty));
    }

    #[test]
    fn test_same_values() {
        let a = Range::from_spans(vec![Continuous::new(0, 10, 2), Continuous::new(1, 9, 2)]);
        assert!(a.same_values(&Range::continuous(0, 10, 1)));
        assert!(!a.same_values(&Range::continuous(0, 11, 1)));
        assert!(Range::Empty.same_values(&Range::Empty));
    }

    #[test]
    fn test_add_equal_steps_stays_continuous() {
        assert_eq!(digits().add(&digits()), Range::continuous(2, 18, 1));
        assert_eq!(
            Range::continuous(0, 10, 2).add(&Range::continuous(1, 5, 2)),
            Range::continuous(1, 15, 2)
        );
        assert_eq!(digits().add(&Range::single(-5)), Range::continuous(-4, 4, 1));
    }

    #[test]
    fn test_add_mixed_steps_is_exact() {
        let a = Range::continuous(0, 52, 26);
        let b = digits();
        let sum = a.add(&b);
        assert_eq!(sorted_values(&sum), brute(&a, &b, |x, y| Some(x + y)));
    }

    #[test]
    fn test_multiply_by_single() {
        assert_eq!(digits().multiply(&Range::single(26)), Range::continuous(26, 234, 26));
        assert_eq!(
            Range::single(-2).multiply(&digits()),
            Range::continuous(-18, -2, 2)
        );
        assert_eq!(digits().multiply(&Range::single(0)), Range::single(0));
    }

    #[test]
    fn test_multiply_two_spans_is_exact_when_small() {
        let a = Range::continuous(0, 1, 1);
        let b = Range::continuous(1, 26, 25);
        let product = a.multiply(&b);
        assert_eq!(sorted_values(&product), vec![0, 1, 26]);

        let sq = digits().multiply(&digits());
        assert_eq!(sorted_values(&sq), brute(&digits(), &digits(), |x, y| Some(x * y)));
    }

    #[test]
    fn test_divide() {
        assert_eq!(Range::single(15).divide(&Range::single(-5)), Range::single(-3));
        assert_eq!(digits().divide(&Range::single(3)), Range::continuous(0, 3, 1));
        assert_eq!(digits().divide(&digits()), Range::continuous(0, 9, 1));
    }

    #[test]
    fn test_divide_excludes_zero_divisor() {
        let divisor = Range::continuous(-2, 2, 1);
        let quotient = Range::continuous(-6, 6, 3).divide(&divisor);
        let expected = brute(&Range::continuous(-6, 6, 3), &divisor, |x, y| {
            (y != 0).then(|| x / y)
        });
        assert_eq!(sorted_values(&quotient), expected);

        assert_eq!(digits().divide(&Range::single(0)), Range::Empty);
    }

    #[test]
    fn test_divide_large_uses_corner_hull() {
        let big = Range::continuous(0, 1_000_000, 1);
        let q = big.divide(&Range::continuous(2, 26, 1));
        assert_eq!(q.min(), Some(0));
        assert_eq!(q.max(), Some(500_000));

        let neg = Range::continuous(-1_000_000, -1, 1);
        let q = neg.divide(&Range::continuous(-26, -2, 1));
        assert_eq!(q.min(), Some(0));
        assert_eq!(q.max(), Some(500_000));
    }

    #[test]
    fn test_modulo_literals() {
        assert_eq!(Range::single(15).modulo(&Range::single(4)), Range::continuous(3, 3, 1));
        assert_eq!(Range::single(5).modulo(&Range::single(3)), Range::single(2));
        assert_eq!(Range::single(-7).modulo(&Range::single(3)), Range::single(-1));
    }

    #[test]
    fn test_modulo_inputs() {
        assert_eq!(digits().modulo(&digits()), Range::continuous(0, 8, 1));
        assert_eq!(digits().modulo(&Range::single(3)), Range::continuous(0, 2, 1));
        // no wrap-around when every dividend is below the modulus
        assert_eq!(digits().modulo(&Range::single(26)), Range::continuous(1, 9, 1));
    }

    #[test]
    fn test_modulo_negative_dividend() {
        let dividend = Range::continuous(-18, -2, 2);
        assert_eq!(dividend.modulo(&Range::single(4)), Range::continuous(-2, 0, 1));
    }

    #[test]
    fn test_modulo_aligned_dividend_is_zero() {
        let dividend = Range::continuous(26, 26 * 40, 26);
        assert_eq!(dividend.modulo(&Range::single(26)), Range::single(0));
        assert_eq!(dividend.modulo(&Range::single(13)), Range::single(0));
    }

    #[test]
    fn test_modulo_bounds_match_brute_force() {
        let cases = [
            (Range::continuous(-20, 20, 3), Range::continuous(2, 7, 1)),
            (Range::continuous(5, 60, 5), Range::continuous(-9, -3, 2)),
            (Range::continuous(-40, -1, 1), Range::single(26)),
            (Range::continuous(0, 100, 10), Range::continuous(-4, 4, 1)),
        ];
        for (a, b) in cases {
            let r = a.modulo(&b);
            let expected = brute(&a, &b, |x, y| (y != 0).then(|| x % y));
            assert_eq!(r.min(), expected.first().copied(), "{} % {}", a, b);
            assert_eq!(r.max(), expected.last().copied(), "{} % {}", a, b);
        }
    }

    #[test]
    fn test_modulo_large_dividend_full_cycle() {
        let dividend = Range::continuous(0, 26_i64.pow(6), 1);
        assert_eq!(dividend.modulo(&Range::single(26)), Range::continuous(0, 25, 1));
    }

    #[test]
    fn test_equals_range_is_boolean() {
        assert_eq!(digits().equals(&digits()), Range::continuous(0, 1, 1));
    }

    #[test]
    fn test_without_zero() {
        let r = Range::continuous(-2, 2, 1).without_zero();
        assert!(!r.includes(0));
        assert_eq!(sorted_values(&r), vec![-2, -1, 1, 2]);
        assert_eq!(Range::single(0).without_zero(), Range::Empty);
    }

    #[test]
    fn test_all_multiples_of() {
        assert!(Range::continuous(26, 260, 26).all_multiples_of(26));
        assert!(Range::continuous(0, 52, 26).all_multiples_of(13));
        assert!(!Range::continuous(0, 52, 13).all_multiples_of(26));
        assert!(Range::single(0).all_multiples_of(7));
    }

    #[test]
    fn test_lazy_values() {
        let big = Range::continuous(0, i64::MAX / 2, 1);
        let first: Vec<i64> = big.values().take(3).collect();
        assert_eq!(first, vec![0, 1, 2]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Range::single(3).to_string(), "3");
        assert_eq!(digits().to_string(), "1..9");
        assert_eq!(Range::continuous(0, 18, 2).to_string(), "0..18 step 2");
        assert_eq!(Range::Empty.to_string(), "<>");
    }
}
