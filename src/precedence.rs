// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Operator precedence and associativity tables.
//!
//! PostgreSQL 9.5 changed the precedence of `=`, the inequality
//! operators, and the `IS` tests. Both ladders live here; the parser
//! and the SQL printer select one through [`PrecedenceMode`] so that a
//! tree parsed in one mode prints back to text that re-parses
//! identically in that mode.

/// Which precedence ladder applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PrecedenceMode {
    /// PostgreSQL 9.4 and earlier.
    Pre95,
    /// PostgreSQL 9.5 and later.
    #[default]
    Current,
}

/// Parser configuration, also stamped onto trees and element-parseable
/// lists so SQL fragments added later parse the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParserOptions {
    pub precedence: PrecedenceMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    NonAssoc,
}

/// The 9.5+ ladder, low to high. The pre-9.5 ladder reuses these values
/// where the two agree and the `OLD_*` values where they differ.
pub mod prec {
    pub const OR: u16 = 10;
    pub const AND: u16 = 20;
    pub const NOT: u16 = 30;
    /// 9.5+: all of the `IS` tests, below comparisons.
    pub const IS: u16 = 40;
    /// 9.5+: `< > = <= >= <>`, non-associative.
    pub const COMPARISON: u16 = 50;
    pub const PATTERN: u16 = 60;
    pub const OVERLAPS: u16 = 70;
    pub const BETWEEN: u16 = 80;
    pub const IN: u16 = 90;
    pub const POSTFIX_OP: u16 = 100;
    pub const GENERIC_OP: u16 = 110;
    pub const ADD: u16 = 130;
    pub const MUL: u16 = 140;
    pub const EXP: u16 = 150;
    pub const AT_TIME_ZONE: u16 = 160;
    pub const COLLATE: u16 = 170;
    pub const UNARY_MINUS: u16 = 180;
    pub const TYPECAST: u16 = 190;
    pub const ATOM: u16 = 666;

    /// pre-9.5: `=` sat on its own level just above `NOT`,
    /// right-associative.
    pub const OLD_EQUALS: u16 = 35;
    /// pre-9.5: strict inequality `<` `>`, non-associative.
    pub const OLD_INEQUALITY: u16 = 45;
    /// pre-9.5: the `IS` tests bound tighter than any operator below
    /// addition.
    pub const OLD_IS: u16 = 115;
}

/// Precedence and associativity of an [`OperatorExpression`] operator
/// string. `prefix` distinguishes unary prefix usage of `+`/`-`/`not`
/// and generic operators.
///
/// [`OperatorExpression`]: crate::ast::OperatorExpression
pub fn operator_info(op: &str, prefix: bool, mode: PrecedenceMode) -> (u16, Assoc) {
    use prec::*;

    if prefix {
        return match op {
            "not" => (NOT, Assoc::Right),
            _ => (UNARY_MINUS, Assoc::Right),
        };
    }
    if is_is_operator(op) {
        return match mode {
            PrecedenceMode::Current => (IS, Assoc::NonAssoc),
            PrecedenceMode::Pre95 => (OLD_IS, Assoc::NonAssoc),
        };
    }
    match (op, mode) {
        ("=", PrecedenceMode::Current) => (COMPARISON, Assoc::NonAssoc),
        ("=", PrecedenceMode::Pre95) => (OLD_EQUALS, Assoc::Right),
        ("<" | ">", PrecedenceMode::Current) => (COMPARISON, Assoc::NonAssoc),
        ("<" | ">", PrecedenceMode::Pre95) => (OLD_INEQUALITY, Assoc::NonAssoc),
        ("<=" | ">=" | "<>", PrecedenceMode::Current) => (COMPARISON, Assoc::NonAssoc),
        ("<=" | ">=" | "<>", PrecedenceMode::Pre95) => (GENERIC_OP, Assoc::Left),
        ("overlaps", _) => (OVERLAPS, Assoc::NonAssoc),
        ("at time zone", _) => (AT_TIME_ZONE, Assoc::Left),
        ("+" | "-", _) => (ADD, Assoc::Left),
        ("*" | "/" | "%", _) => (MUL, Assoc::Left),
        ("^", _) => (EXP, Assoc::Left),
        _ => (GENERIC_OP, Assoc::Left),
    }
}

/// The `IS`-family operator strings, including the postfix tests.
pub fn is_is_operator(op: &str) -> bool {
    matches!(
        op,
        "is null"
            | "is not null"
            | "is true"
            | "is not true"
            | "is false"
            | "is not false"
            | "is unknown"
            | "is not unknown"
            | "is document"
            | "is not document"
            | "is distinct from"
            | "is not distinct from"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_disagree_where_9_5_changed_the_ladder() {
        let current = operator_info("=", false, PrecedenceMode::Current);
        let pre95 = operator_info("=", false, PrecedenceMode::Pre95);
        assert_eq!(current, (prec::COMPARISON, Assoc::NonAssoc));
        assert_eq!(pre95, (prec::OLD_EQUALS, Assoc::Right));

        let current = operator_info("<=", false, PrecedenceMode::Current);
        let pre95 = operator_info("<=", false, PrecedenceMode::Pre95);
        assert_eq!(current, (prec::COMPARISON, Assoc::NonAssoc));
        assert_eq!(pre95, (prec::GENERIC_OP, Assoc::Left));

        let current = operator_info("is null", false, PrecedenceMode::Current);
        let pre95 = operator_info("is null", false, PrecedenceMode::Pre95);
        assert!(current.0 < operator_info("=", false, PrecedenceMode::Current).0);
        assert!(pre95.0 > operator_info("=", false, PrecedenceMode::Pre95).0);
    }

    #[test]
    fn arithmetic_is_mode_independent() {
        for mode in [PrecedenceMode::Pre95, PrecedenceMode::Current] {
            assert_eq!(operator_info("+", false, mode), (prec::ADD, Assoc::Left));
            assert_eq!(operator_info("^", false, mode), (prec::EXP, Assoc::Left));
            assert_eq!(operator_info("||", false, mode), (prec::GENERIC_OP, Assoc::Left));
        }
    }
}
