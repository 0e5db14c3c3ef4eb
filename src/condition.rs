//! Condition evaluation for `#if` and `#elif`
//!
//! A condition is a flat list of atoms joined by `&&` and `||`, each atom optionally negated
//! with `!`. There are no parentheses and exactly two precedence levels: every `&&` binds
//! before any `||`.
//!
//! The engine parses the line and pushes one [Match] cell per atom. A cell carries whether the
//! atom passed plus the operator that joins it to its left neighbour. The operator flag is
//! sticky during parsing: it stays set for following atoms until another operator shows up.
//!
//! Reduction runs two backward passes over the cells. The first folds every AND cell into its
//! left neighbour, the second does the same for OR cells. Exactly one cell must remain.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Match: u8 {
        const PASS = 1 << 0;
        const AND = 1 << 1;
        const OR = 1 << 2;
    }
}

/// Cells collected while parsing one condition line
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    cells: Vec<Match>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one atom result joined by `operator` (empty for the first atom).
    pub fn push(&mut self, operator: Match, passed: bool) {
        let mut cell = operator & (Match::AND | Match::OR);
        cell.set(Match::PASS, passed);
        self.cells.push(cell);
    }

    /// Reduce the cells. `None` when they do not collapse to a single result.
    pub fn evaluate(mut self) -> Option<bool> {
        fold(&mut self.cells, Match::AND, |lhs, rhs| lhs && rhs);
        fold(&mut self.cells, Match::OR, |lhs, rhs| lhs || rhs);

        match self.cells.as_slice() {
            [only] => Some(only.contains(Match::PASS)),
            _ => None,
        }
    }
}

fn fold(cells: &mut Vec<Match>, operator: Match, combine: impl Fn(bool, bool) -> bool) {
    for index in (1..cells.len()).rev() {
        if !cells[index].contains(operator) {
            continue;
        }
        let rhs = cells.remove(index);
        let lhs = &mut cells[index - 1];
        let passed = combine(lhs.contains(Match::PASS), rhs.contains(Match::PASS));
        lhs.set(Match::PASS, passed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(cells: &[(Match, bool)]) -> Conditions {
        let mut conditions = Conditions::new();
        for (operator, passed) in cells {
            conditions.push(*operator, *passed);
        }
        conditions
    }

    #[test]
    fn test_single_atom() {
        assert_eq!(conditions(&[(Match::empty(), true)]).evaluate(), Some(true));
        assert_eq!(conditions(&[(Match::empty(), false)]).evaluate(), Some(false));
    }

    #[test]
    fn test_and_binds_before_or() {
        // A && B || C with A and C true, B false
        let cells = [
            (Match::empty(), true),
            (Match::AND, false),
            (Match::OR, true),
        ];
        assert_eq!(conditions(&cells).evaluate(), Some(true));

        // A || B && C with A false, B true, C false
        let cells = [
            (Match::empty(), false),
            (Match::OR, true),
            (Match::AND, false),
        ];
        assert_eq!(conditions(&cells).evaluate(), Some(false));
    }

    #[test]
    fn test_chained_and() {
        let cells = [
            (Match::empty(), true),
            (Match::AND, true),
            (Match::AND, false),
        ];
        assert_eq!(conditions(&cells).evaluate(), Some(false));
    }

    #[test]
    fn test_missing_operator_does_not_reduce() {
        let cells = [(Match::empty(), true), (Match::empty(), true)];
        assert_eq!(conditions(&cells).evaluate(), None);
    }

    #[test]
    fn test_empty_does_not_reduce() {
        assert_eq!(Conditions::new().evaluate(), None);
    }

    #[test]
    fn test_leading_operator_is_kept_on_first_cell() {
        assert_eq!(conditions(&[(Match::AND, true)]).evaluate(), Some(true));
    }
}
