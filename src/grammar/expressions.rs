// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Scalar expression parsing.
//!
//! A precedence-climbing loop over the mode-selected operator tables;
//! the `restricted` flag parses `b_expr` — the grammar's expression
//! form without top-level `AND`/`OR`/`NOT`/`IN`/`BETWEEN`/pattern
//! operators, required for `BETWEEN` bounds.

//  Climbing structure after
//    https://matklad.github.io/2020/04/13/simple-but-powerful-pratt-parsing.html

use crate::ast::*;
use crate::error::Result;
use crate::lexer::{Keyword as Kw, TokenKind};
use crate::precedence::{operator_info, prec, Assoc, PrecedenceMode};
use crate::T;

use super::{
    parse_col_id, parse_col_label, parse_comma_separated, parse_order_by_element,
    parse_qualified_name, parse_select_statement, parse_simple_typename,
    parse_type_function_name, parse_typename, qualified_from_parts, Cursor,
};

pub(crate) fn parse_expr(p: &mut Cursor) -> Result<NodeId> {
    expr_prec(p, 0, false)
}

pub(crate) fn parse_b_expr(p: &mut Cursor) -> Result<NodeId> {
    expr_prec(p, 0, true)
}

fn expr_prec(p: &mut Cursor, min_prec: u16, restricted: bool) -> Result<NodeId> {
    let mut left = parse_prefix(p, restricted)?;

    loop {
        let token = p.current().kind;
        match token {
            T![::] => {
                if prec::TYPECAST < min_prec {
                    break;
                }
                p.bump();
                let type_name = parse_typename(p)?;
                left = p.push(Node::TypecastExpression(TypecastExpression {
                    argument: left,
                    type_name,
                }));
            }
            TokenKind::Keyword(Kw::COLLATE) => {
                if prec::COLLATE < min_prec {
                    break;
                }
                p.bump();
                let collation = parse_qualified_name(p)?;
                left = p.push(Node::CollateExpression(CollateExpression {
                    argument: left,
                    collation,
                }));
            }
            TokenKind::Keyword(Kw::AT) => {
                if !(p.nth_at_kw(1, Kw::TIME) && p.nth_at_kw(2, Kw::ZONE)) {
                    break;
                }
                if prec::AT_TIME_ZONE < min_prec {
                    break;
                }
                p.bump();
                p.bump();
                p.bump();
                let right = expr_prec(p, prec::AT_TIME_ZONE + 1, restricted)?;
                left = binary(p, "at time zone", left, right);
            }
            T![^] => {
                if prec::EXP < min_prec {
                    break;
                }
                p.bump();
                let right = parse_operator_rhs(p, "^", prec::EXP + 1, restricted)?;
                left = binary(p, "^", left, right);
            }
            T![*] | T![/] | T![%] => {
                if prec::MUL < min_prec {
                    break;
                }
                let op = p.bump().value;
                let right = parse_operator_rhs(p, &op, prec::MUL + 1, restricted)?;
                left = binary(p, &op, left, right);
            }
            T![+] | T![-] => {
                if prec::ADD < min_prec {
                    break;
                }
                let op = p.bump().value;
                let right = parse_operator_rhs(p, &op, prec::ADD + 1, restricted)?;
                left = binary(p, &op, left, right);
            }
            T![=] | T![<] | T![>] | T![<=] | T![>=] | T![<>] => {
                let op = token.op_text().expect("comparison operator");
                let (op_prec, assoc) = operator_info(op, false, p.mode);
                if op_prec < min_prec {
                    break;
                }
                p.bump();
                let next = if assoc == Assoc::Right { op_prec } else { op_prec + 1 };
                let right = parse_operator_rhs(p, op, next, restricted)?;
                left = binary(p, op, left, right);
            }
            TokenKind::Op => {
                if starts_expression(p, 1) {
                    if prec::GENERIC_OP < min_prec {
                        break;
                    }
                    let op = p.bump().value;
                    let right = parse_operator_rhs(p, &op, prec::GENERIC_OP + 1, restricted)?;
                    left = binary(p, &op, left, right);
                } else {
                    if prec::POSTFIX_OP < min_prec {
                        break;
                    }
                    let op = p.bump().value;
                    left = p.push(Node::OperatorExpression(OperatorExpression {
                        op,
                        left: Some(left),
                        right: None,
                    }));
                }
            }
            TokenKind::Keyword(Kw::AND) if !restricted => {
                if prec::AND < min_prec {
                    break;
                }
                p.bump();
                let term = expr_prec(p, prec::AND + 1, false)?;
                left = logical(p, LogicalOp::And, left, term);
            }
            TokenKind::Keyword(Kw::OR) if !restricted => {
                if prec::OR < min_prec {
                    break;
                }
                p.bump();
                let term = expr_prec(p, prec::OR + 1, false)?;
                left = logical(p, LogicalOp::Or, left, term);
            }
            TokenKind::Keyword(Kw::NOT) if !restricted => {
                // infix NOT only before BETWEEN/IN/LIKE/ILIKE/SIMILAR
                let (op_prec, negated) = match p.nth(1).kind {
                    TokenKind::Keyword(Kw::BETWEEN) => (prec::BETWEEN, true),
                    TokenKind::Keyword(Kw::IN) => (prec::IN, true),
                    TokenKind::Keyword(Kw::LIKE | Kw::ILIKE | Kw::SIMILAR) => {
                        (prec::PATTERN, true)
                    }
                    _ => (0, false),
                };
                if !negated || op_prec < min_prec {
                    break;
                }
                p.bump();
                left = parse_negatable(p, left, true)?;
            }
            TokenKind::Keyword(Kw::BETWEEN | Kw::IN | Kw::LIKE | Kw::ILIKE) if !restricted => {
                let op_prec = match token {
                    TokenKind::Keyword(Kw::BETWEEN) => prec::BETWEEN,
                    TokenKind::Keyword(Kw::IN) => prec::IN,
                    _ => prec::PATTERN,
                };
                if op_prec < min_prec {
                    break;
                }
                left = parse_negatable(p, left, false)?;
            }
            TokenKind::Keyword(Kw::SIMILAR) if !restricted => {
                if !p.nth_at_kw(1, Kw::TO) || prec::PATTERN < min_prec {
                    break;
                }
                left = parse_negatable(p, left, false)?;
            }
            TokenKind::Keyword(Kw::OVERLAPS) if !restricted => {
                if prec::OVERLAPS < min_prec {
                    break;
                }
                p.bump();
                let right = expr_prec(p, prec::OVERLAPS + 1, false)?;
                left = binary(p, "overlaps", left, right);
            }
            TokenKind::Keyword(Kw::ISNULL) if !restricted => {
                if is_prec(p.mode) < min_prec {
                    break;
                }
                p.bump();
                left = postfix(p, "is null", left);
            }
            TokenKind::Keyword(Kw::NOTNULL) if !restricted => {
                if is_prec(p.mode) < min_prec {
                    break;
                }
                p.bump();
                left = postfix(p, "is not null", left);
            }
            TokenKind::Keyword(Kw::IS) => {
                if is_prec(p.mode) < min_prec {
                    break;
                }
                match parse_is_test(p, left, restricted)? {
                    Some(node) => left = node,
                    None => break,
                }
            }
            _ => break,
        }
    }

    Ok(left)
}

fn is_prec(mode: PrecedenceMode) -> u16 {
    match mode {
        PrecedenceMode::Current => prec::IS,
        PrecedenceMode::Pre95 => prec::OLD_IS,
    }
}

fn binary(p: &mut Cursor, op: &str, left: NodeId, right: NodeId) -> NodeId {
    p.push(Node::OperatorExpression(OperatorExpression {
        op: op.to_owned(),
        left: Some(left),
        right: Some(right),
    }))
}

fn postfix(p: &mut Cursor, op: &str, left: NodeId) -> NodeId {
    p.push(Node::OperatorExpression(OperatorExpression {
        op: op.to_owned(),
        left: Some(left),
        right: None,
    }))
}

/// Appends to an n-ary chain of the same operator instead of nesting.
fn logical(p: &mut Cursor, op: LogicalOp, left: NodeId, term: NodeId) -> NodeId {
    let appended = match p.tree.node_mut(left) {
        Node::LogicalExpression(l) if l.op == op => {
            l.terms.push(term);
            true
        }
        _ => false,
    };
    if appended {
        p.tree.set_parent_of(term, Some(left));
        return left;
    }
    p.push(Node::LogicalExpression(LogicalExpression {
        op,
        terms: vec![left, term],
    }))
}

/// `BETWEEN`/`IN`/`LIKE`/`ILIKE`/`SIMILAR TO` after the optional
/// negating `NOT` was consumed.
fn parse_negatable(p: &mut Cursor, left: NodeId, negated: bool) -> Result<NodeId> {
    let not = if negated { "not " } else { "" };
    match p.current().kind {
        TokenKind::Keyword(Kw::BETWEEN) => {
            p.bump();
            let variant = if p.eat_kw(Kw::SYMMETRIC) {
                " symmetric"
            } else if p.eat_kw(Kw::ASYMMETRIC) {
                " asymmetric"
            } else {
                ""
            };
            let low = parse_b_expr(p)?;
            p.expect_kw(Kw::AND)?;
            let high = expr_prec(p, prec::BETWEEN + 1, false)?;
            Ok(p.push(Node::BetweenExpression(BetweenExpression {
                op: format!("{not}between{variant}"),
                argument: left,
                left: low,
                right: high,
            })))
        }
        TokenKind::Keyword(Kw::IN) => {
            p.bump();
            p.expect(T!['('])?;
            let right = if at_select_start(p) {
                let stmt = parse_select_statement(p)?;
                p.expect(T![')'])?;
                stmt
            } else {
                let elements = parse_comma_separated(p, parse_expr)?;
                p.expect(T![')'])?;
                p.list(ListKind::Expression, elements)
            };
            Ok(p.push(Node::InExpression(InExpression {
                op: format!("{not}in"),
                argument: left,
                right,
            })))
        }
        TokenKind::Keyword(Kw::LIKE | Kw::ILIKE) => {
            let op = p.bump().value;
            finish_pattern(p, left, format!("{not}{op}"))
        }
        TokenKind::Keyword(Kw::SIMILAR) => {
            p.bump();
            p.expect_kw(Kw::TO)?;
            finish_pattern(p, left, format!("{not}similar to"))
        }
        _ => Err(p.expected("BETWEEN, IN, LIKE, ILIKE or SIMILAR TO")),
    }
}

fn finish_pattern(p: &mut Cursor, argument: NodeId, op: String) -> Result<NodeId> {
    let pattern = expr_prec(p, prec::PATTERN + 1, false)?;
    let escape = if p.eat_kw(Kw::ESCAPE) {
        Some(expr_prec(p, prec::PATTERN + 1, false)?)
    } else {
        None
    };
    Ok(p.push(Node::PatternMatchingExpression(PatternMatchingExpression {
        op,
        argument,
        pattern,
        escape,
    })))
}

/// The `IS` tests. Returns `None` without consuming anything when the
/// test at hand is not allowed in a `b_expr`.
fn parse_is_test(p: &mut Cursor, left: NodeId, restricted: bool) -> Result<Option<NodeId>> {
    let not_offset = if p.nth_at_kw(1, Kw::NOT) { 1 } else { 0 };
    let test = p.nth(1 + not_offset).kind;
    if restricted {
        // b_expr admits only IS DISTINCT FROM, IS OF and IS DOCUMENT
        let allowed = matches!(
            test,
            TokenKind::Keyword(Kw::DISTINCT | Kw::OF | Kw::DOCUMENT)
        );
        if !allowed {
            return Ok(None);
        }
    }
    let mode = p.mode;
    p.bump();
    let not = if p.eat_kw(Kw::NOT) { "not " } else { "" };
    let node = match p.current().kind {
        TokenKind::Keyword(Kw::NULL) => {
            p.bump();
            postfix(p, &format!("is {not}null"), left)
        }
        TokenKind::Keyword(Kw::TRUE) => {
            p.bump();
            postfix(p, &format!("is {not}true"), left)
        }
        TokenKind::Keyword(Kw::FALSE) => {
            p.bump();
            postfix(p, &format!("is {not}false"), left)
        }
        TokenKind::Keyword(Kw::UNKNOWN) => {
            p.bump();
            postfix(p, &format!("is {not}unknown"), left)
        }
        TokenKind::Keyword(Kw::DOCUMENT) => {
            p.bump();
            postfix(p, &format!("is {not}document"), left)
        }
        TokenKind::Keyword(Kw::DISTINCT) => {
            p.bump();
            p.expect_kw(Kw::FROM)?;
            let right = expr_prec(p, is_prec(mode) + 1, restricted)?;
            binary(p, &format!("is {not}distinct from"), left, right)
        }
        TokenKind::Keyword(Kw::OF) => {
            p.bump();
            p.expect(T!['('])?;
            let types = parse_comma_separated(p, parse_typename)?;
            p.expect(T![')'])?;
            p.push(Node::IsOfExpression(IsOfExpression {
                not: !not.is_empty(),
                argument: left,
                types,
            }))
        }
        _ => return Err(p.expected("NULL, TRUE, FALSE, UNKNOWN, DISTINCT FROM, OF or DOCUMENT")),
    };
    Ok(Some(node))
}

/// Right-hand side of a binary operator: either a plain operand or the
/// `ANY`/`ALL`/`SOME` form.
fn parse_operator_rhs(
    p: &mut Cursor,
    _op: &str,
    min_prec: u16,
    restricted: bool,
) -> Result<NodeId> {
    let sub = match p.current().kind {
        TokenKind::Keyword(Kw::ANY) => Some(SubselectOp::Any),
        TokenKind::Keyword(Kw::ALL) => Some(SubselectOp::All),
        TokenKind::Keyword(Kw::SOME) => Some(SubselectOp::Some),
        _ => None,
    };
    if let Some(op) = sub {
        if p.nth_at(1, T!['(']) {
            p.bump();
            p.bump();
            let statement = if at_select_start(p) {
                parse_select_statement(p)?
            } else {
                // the array variant, e.g. `= any(col)`
                parse_expr(p)?
            };
            p.expect(T![')'])?;
            return Ok(p.push(Node::SubselectExpression(SubselectExpression {
                op: Some(op),
                statement,
            })));
        }
    }
    expr_prec(p, min_prec, restricted)
}

fn parse_prefix(p: &mut Cursor, restricted: bool) -> Result<NodeId> {
    match p.current().kind {
        TokenKind::Keyword(Kw::NOT) if !restricted => {
            p.bump();
            let operand = expr_prec(p, prec::NOT, false)?;
            Ok(p.push(Node::OperatorExpression(OperatorExpression {
                op: "not".to_owned(),
                left: None,
                right: Some(operand),
            })))
        }
        T![+] | T![-] => {
            let op = p.bump().value;
            let operand = expr_prec(p, prec::UNARY_MINUS, restricted)?;
            // fold `- literal` into a negative numeric constant
            if op == "-" {
                if let Node::Constant(c) = p.tree.node_mut(operand) {
                    if matches!(
                        c.kind,
                        ConstKind::Integer | ConstKind::Float | ConstKind::Numeric
                    ) && !c.value.starts_with('-')
                    {
                        c.value.insert(0, '-');
                        return Ok(operand);
                    }
                }
            }
            Ok(p.push(Node::OperatorExpression(OperatorExpression {
                op,
                left: None,
                right: Some(operand),
            })))
        }
        TokenKind::Op => {
            let op = p.bump().value;
            let operand = expr_prec(p, prec::UNARY_MINUS, restricted)?;
            Ok(p.push(Node::OperatorExpression(OperatorExpression {
                op,
                left: None,
                right: Some(operand),
            })))
        }
        _ => parse_c_expr(p),
    }
}

/// Whether the token `n` ahead can begin an expression; decides
/// postfix vs. binary use of a generic operator.
fn starts_expression(p: &Cursor, n: usize) -> bool {
    match p.nth(n).kind {
        TokenKind::Ident
        | TokenKind::QuotedIdent
        | TokenKind::StringConst
        | TokenKind::BitConst
        | TokenKind::IntegerConst
        | TokenKind::FloatConst
        | TokenKind::NumericConst
        | TokenKind::Positional
        | TokenKind::NamedParam
        | TokenKind::LParen
        | TokenKind::Op
        | TokenKind::Plus
        | TokenKind::Minus => true,
        TokenKind::Keyword(kw) => {
            kw.is_col_id()
                || matches!(
                    kw,
                    Kw::NOT
                        | Kw::NULL
                        | Kw::TRUE
                        | Kw::FALSE
                        | Kw::CASE
                        | Kw::CAST
                        | Kw::ARRAY
                        | Kw::CURRENT_DATE
                        | Kw::CURRENT_TIME
                        | Kw::CURRENT_TIMESTAMP
                        | Kw::LOCALTIME
                        | Kw::LOCALTIMESTAMP
                        | Kw::CURRENT_ROLE
                        | Kw::CURRENT_USER
                        | Kw::SESSION_USER
                        | Kw::USER
                        | Kw::CURRENT_CATALOG
                        | Kw::CURRENT_SCHEMA
                )
        }
        _ => false,
    }
}

pub(crate) fn at_select_start(p: &Cursor) -> bool {
    matches!(
        p.current().kind,
        TokenKind::Keyword(Kw::SELECT | Kw::VALUES | Kw::WITH | Kw::TABLE)
    )
}

// ---------------------------------------------------------------------
// atoms

fn parse_c_expr(p: &mut Cursor) -> Result<NodeId> {
    match p.current().kind {
        TokenKind::IntegerConst => {
            let token = p.bump();
            Ok(constant(p, ConstKind::Integer, token.value))
        }
        TokenKind::FloatConst => {
            let token = p.bump();
            Ok(constant(p, ConstKind::Float, token.value))
        }
        TokenKind::NumericConst => {
            let token = p.bump();
            Ok(constant(p, ConstKind::Numeric, token.value))
        }
        TokenKind::StringConst => {
            let token = p.bump();
            Ok(constant(p, ConstKind::String, token.value))
        }
        TokenKind::BitConst => {
            let token = p.bump();
            Ok(constant(p, ConstKind::Bit, token.value))
        }
        TokenKind::Positional => {
            let token = p.bump();
            let index = token.value.parse::<u32>().map_err(|_| {
                crate::error::Error::syntax(token.position(), "parameter number out of range")
            })?;
            let param = p.push(Node::Parameter(Parameter {
                kind: ParameterKind::Positional(index),
            }));
            parse_opt_indirection(p, param)
        }
        TokenKind::NamedParam => {
            let token = p.bump();
            let param = p.push(Node::Parameter(Parameter {
                kind: ParameterKind::Named(token.value),
            }));
            parse_opt_indirection(p, param)
        }
        T!['('] => parse_parenthesized(p),
        TokenKind::Keyword(kw) => parse_keyword_atom(p, kw),
        TokenKind::Ident | TokenKind::QuotedIdent => parse_name_atom(p),
        _ => Err(p.expected("an expression")),
    }
}

fn constant(p: &mut Cursor, kind: ConstKind, value: String) -> NodeId {
    p.push(Node::Constant(Constant { kind, value }))
}

/// `(` already current: subselect, row constructor or plain
/// parenthesized expression, each with optional indirection.
fn parse_parenthesized(p: &mut Cursor) -> Result<NodeId> {
    p.expect(T!['('])?;
    if at_select_start(p) {
        let statement = parse_select_statement(p)?;
        p.expect(T![')'])?;
        let sub = p.push(Node::SubselectExpression(SubselectExpression {
            op: None,
            statement,
        }));
        return parse_opt_indirection(p, sub);
    }
    let first = parse_expr(p)?;
    if p.eat(T![,]) {
        let mut elements = vec![first];
        elements.extend(parse_comma_separated(p, parse_expr)?);
        p.expect(T![')'])?;
        return Ok(p.push(Node::RowExpression(RowExpression {
            elements,
            explicit: false,
        })));
    }
    p.expect(T![')'])?;
    parse_opt_indirection(p, first)
}

/// Field selections and subscripts after a base expression.
fn parse_opt_indirection(p: &mut Cursor, base: NodeId) -> Result<NodeId> {
    let mut items = Vec::new();
    loop {
        if p.at(T![.]) {
            if p.nth_at(1, T![*]) {
                p.bump();
                p.bump();
                items.push(p.push(Node::Star));
                break;
            }
            if matches!(
                p.nth(1).kind,
                TokenKind::Ident | TokenKind::QuotedIdent | TokenKind::Keyword(_)
            ) {
                p.bump();
                let field = parse_col_label(p)?;
                items.push(field);
                continue;
            }
            break;
        }
        if p.at(T!['[']) {
            items.push(parse_array_indexes(p)?);
            continue;
        }
        break;
    }
    if items.is_empty() {
        Ok(base)
    } else {
        Ok(p.push(Node::Indirection(Indirection {
            argument: base,
            items,
        })))
    }
}

/// `[expr]`, `[expr:expr]`, `[:expr]`, `[expr:]` or `[:]`.
pub(crate) fn parse_array_indexes(p: &mut Cursor) -> Result<NodeId> {
    p.expect(T!['['])?;
    let mut slice = false;
    let mut lower = None;
    let mut upper = None;
    // `a[1:b]` lexes the upper bound as the named parameter `:b`
    fn named_upper(p: &mut Cursor<'_>) -> NodeId {
        let token = p.bump();
        let ident = p.identifier(token.value);
        p.push(Node::ColumnReference(ColumnReference { parts: vec![ident] }))
    }
    if p.at(TokenKind::NamedParam) {
        slice = true;
        upper = Some(named_upper(p));
    } else if p.eat(T![:]) {
        slice = true;
        if !p.at(T![']']) {
            upper = Some(parse_expr(p)?);
        }
    } else {
        lower = Some(parse_expr(p)?);
        if p.at(TokenKind::NamedParam) {
            slice = true;
            upper = Some(named_upper(p));
        } else if p.eat(T![:]) {
            slice = true;
            if !p.at(T![']']) {
                upper = Some(parse_expr(p)?);
            }
        }
    }
    p.expect(T![']'])?;
    if !slice {
        // `[i]` stores the subscript as the upper bound
        upper = lower.take();
    }
    Ok(p.push(Node::ArrayIndexes(ArrayIndexes {
        lower,
        upper,
        slice,
    })))
}

fn parse_keyword_atom(p: &mut Cursor, kw: Kw) -> Result<NodeId> {
    match kw {
        Kw::TRUE | Kw::FALSE => {
            let token = p.bump();
            Ok(constant(p, ConstKind::Bool, token.value))
        }
        Kw::NULL => {
            p.bump();
            Ok(constant(p, ConstKind::Null, "null".to_owned()))
        }
        Kw::CASE => parse_case(p),
        Kw::CAST => {
            p.bump();
            p.expect(T!['('])?;
            let argument = parse_expr(p)?;
            p.expect_kw(Kw::AS)?;
            let type_name = parse_typename(p)?;
            p.expect(T![')'])?;
            Ok(p.push(Node::TypecastExpression(TypecastExpression {
                argument,
                type_name,
            })))
        }
        Kw::EXISTS => {
            p.bump();
            p.expect(T!['('])?;
            let statement = parse_select_statement(p)?;
            p.expect(T![')'])?;
            Ok(p.push(Node::SubselectExpression(SubselectExpression {
                op: Some(SubselectOp::Exists),
                statement,
            })))
        }
        Kw::ARRAY => {
            p.bump();
            if p.at(T!['(']) {
                p.bump();
                let statement = parse_select_statement(p)?;
                p.expect(T![')'])?;
                return Ok(p.push(Node::SubselectExpression(SubselectExpression {
                    op: Some(SubselectOp::Array),
                    statement,
                })));
            }
            parse_array_literal(p)
        }
        Kw::ROW => {
            p.bump();
            p.expect(T!['('])?;
            let elements = if p.at(T![')']) {
                Vec::new()
            } else {
                parse_comma_separated(p, parse_expr)?
            };
            p.expect(T![')'])?;
            Ok(p.push(Node::RowExpression(RowExpression {
                elements,
                explicit: true,
            })))
        }
        Kw::GROUPING => {
            p.bump();
            p.expect(T!['('])?;
            let arguments = parse_comma_separated(p, parse_expr)?;
            p.expect(T![')'])?;
            Ok(p.push(Node::GroupingExpression(GroupingExpression { arguments })))
        }
        Kw::DEFAULT => {
            // only valid inside INSERT/VALUES/SET; the server validates
            p.bump();
            Ok(p.push(Node::SetToDefault))
        }
        Kw::COALESCE | Kw::GREATEST | Kw::LEAST | Kw::NULLIF => {
            let token = p.bump();
            p.expect(T!['('])?;
            let arguments = parse_comma_separated(p, parse_expr)?;
            p.expect(T![')'])?;
            let name = p.identifier(token.value);
            let name = qualified_from_parts(p, vec![name])?;
            let arguments = p.list(ListKind::FunctionArg, arguments);
            Ok(p.push(Node::FunctionExpression(FunctionExpression {
                name,
                arguments,
                star: false,
                distinct: false,
                variadic: false,
                order: None,
                within_group: None,
                filter: None,
                over: None,
            })))
        }
        Kw::EXTRACT => {
            p.bump();
            p.expect(T!['('])?;
            let field = parse_extract_field(p)?;
            p.expect_kw(Kw::FROM)?;
            let source = parse_expr(p)?;
            p.expect(T![')'])?;
            let field = constant(p, ConstKind::String, field);
            Ok(catalog_function(p, "date_part", vec![field, source]))
        }
        Kw::POSITION => {
            p.bump();
            p.expect(T!['('])?;
            let needle = parse_b_expr(p)?;
            p.expect_kw(Kw::IN)?;
            let haystack = parse_b_expr(p)?;
            p.expect(T![')'])?;
            // position(B in A) is pg_catalog.position(A, B)
            Ok(catalog_function(p, "position", vec![haystack, needle]))
        }
        Kw::SUBSTRING => {
            p.bump();
            p.expect(T!['('])?;
            let args = parse_substring_args(p)?;
            p.expect(T![')'])?;
            Ok(catalog_function(p, "substring", args))
        }
        Kw::OVERLAY => {
            p.bump();
            p.expect(T!['('])?;
            let string = parse_expr(p)?;
            p.expect_kw(Kw::PLACING)?;
            let placing = parse_expr(p)?;
            p.expect_kw(Kw::FROM)?;
            let from = parse_expr(p)?;
            let mut args = vec![string, placing, from];
            if p.eat_kw(Kw::FOR) {
                args.push(parse_expr(p)?);
            }
            p.expect(T![')'])?;
            Ok(catalog_function(p, "overlay", args))
        }
        Kw::TRIM => {
            p.bump();
            p.expect(T!['('])?;
            let (name, args) = parse_trim_args(p)?;
            p.expect(T![')'])?;
            Ok(catalog_function(p, name, args))
        }
        Kw::TREAT => Err(crate::error::Error::NotImplemented(
            "TREAT(... AS ...) is not supported".into(),
        )),
        Kw::COLLATION => {
            if !p.nth_at_kw(1, Kw::FOR) {
                return Err(p.expected("an expression"));
            }
            p.bump();
            p.bump();
            p.expect(T!['('])?;
            let argument = parse_expr(p)?;
            p.expect(T![')'])?;
            Ok(catalog_function(p, "pg_collation_for", vec![argument]))
        }
        Kw::CURRENT_DATE => {
            p.bump();
            Ok(value_function(p, SqlValueFunctionName::CurrentDate, None))
        }
        Kw::CURRENT_TIME => parse_value_function_with_precision(p, SqlValueFunctionName::CurrentTime),
        Kw::CURRENT_TIMESTAMP => {
            parse_value_function_with_precision(p, SqlValueFunctionName::CurrentTimestamp)
        }
        Kw::LOCALTIME => parse_value_function_with_precision(p, SqlValueFunctionName::Localtime),
        Kw::LOCALTIMESTAMP => {
            parse_value_function_with_precision(p, SqlValueFunctionName::Localtimestamp)
        }
        Kw::CURRENT_ROLE => {
            p.bump();
            Ok(value_function(p, SqlValueFunctionName::CurrentRole, None))
        }
        Kw::CURRENT_USER => {
            p.bump();
            Ok(value_function(p, SqlValueFunctionName::CurrentUser, None))
        }
        Kw::SESSION_USER => {
            p.bump();
            Ok(value_function(p, SqlValueFunctionName::SessionUser, None))
        }
        Kw::USER => {
            p.bump();
            Ok(value_function(p, SqlValueFunctionName::User, None))
        }
        Kw::CURRENT_CATALOG => {
            p.bump();
            Ok(value_function(p, SqlValueFunctionName::CurrentCatalog, None))
        }
        Kw::CURRENT_SCHEMA => {
            p.bump();
            Ok(value_function(p, SqlValueFunctionName::CurrentSchema, None))
        }
        Kw::XMLCONCAT => {
            let token = p.bump();
            p.expect(T!['('])?;
            let arguments = parse_comma_separated(p, parse_expr)?;
            p.expect(T![')'])?;
            let name = p.identifier(token.value);
            let name = qualified_from_parts(p, vec![name])?;
            let arguments = p.list(ListKind::FunctionArg, arguments);
            Ok(p.push(Node::FunctionExpression(FunctionExpression {
                name,
                arguments,
                star: false,
                distinct: false,
                variadic: false,
                order: None,
                within_group: None,
                filter: None,
                over: None,
            })))
        }
        Kw::XMLELEMENT => super::parse_xml_element(p),
        Kw::XMLEXISTS => super::parse_xml_exists(p),
        Kw::XMLFOREST => super::parse_xml_forest(p),
        Kw::XMLPARSE => super::parse_xml_parse(p),
        Kw::XMLPI => super::parse_xml_pi(p),
        Kw::XMLROOT => super::parse_xml_root(p),
        Kw::XMLSERIALIZE => super::parse_xml_serialize(p),
        Kw::INTERVAL => {
            // a literal follows; otherwise `interval` is a column name
            if p.nth_at(1, TokenKind::StringConst) || p.nth_at(1, T!['(']) {
                super::parse_interval_literal(p)
            } else {
                parse_name_atom(p)
            }
        }
        Kw::BIGINT
        | Kw::BIT
        | Kw::BOOLEAN
        | Kw::CHAR
        | Kw::CHARACTER
        | Kw::DEC
        | Kw::DECIMAL
        | Kw::DOUBLE
        | Kw::FLOAT
        | Kw::INT
        | Kw::INTEGER
        | Kw::NATIONAL
        | Kw::NCHAR
        | Kw::NUMERIC
        | Kw::REAL
        | Kw::SMALLINT
        | Kw::TIME
        | Kw::TIMESTAMP
        | Kw::VARCHAR => {
            // `typename 'literal'`, else the keyword is a column name
            let mark = p.mark();
            if let Ok(type_name) = parse_simple_typename(p) {
                if p.at(TokenKind::StringConst) {
                    let token = p.bump();
                    let argument = constant(p, ConstKind::String, token.value);
                    return Ok(p.push(Node::TypecastExpression(TypecastExpression {
                        argument,
                        type_name,
                    })));
                }
            }
            p.rewind(mark);
            parse_name_atom(p)
        }
        _ => parse_name_atom(p),
    }
}

fn value_function(p: &mut Cursor, function: SqlValueFunctionName, precision: Option<u32>) -> NodeId {
    p.push(Node::SqlValueFunction(SqlValueFunction {
        function,
        precision,
    }))
}

fn parse_value_function_with_precision(
    p: &mut Cursor,
    function: SqlValueFunctionName,
) -> Result<NodeId> {
    p.bump();
    let precision = if p.eat(T!['(']) {
        let value = parse_iconst(p)?;
        p.expect(T![')'])?;
        Some(value)
    } else {
        None
    };
    Ok(value_function(p, function, precision))
}

pub(crate) fn parse_iconst(p: &mut Cursor) -> Result<u32> {
    let token = p.expect(TokenKind::IntegerConst)?;
    token
        .value
        .parse::<u32>()
        .map_err(|_| crate::error::Error::syntax(token.position(), "integer out of range"))
}

/// An unqualified `pg_catalog` function call, the normalized form of
/// the special-syntax functions.
fn catalog_function(p: &mut Cursor, name: &str, args: Vec<NodeId>) -> NodeId {
    let schema = p.identifier("pg_catalog");
    let relation = p.identifier(name);
    let name = p.push(Node::QualifiedName(QualifiedName {
        catalog: None,
        schema: Some(schema),
        relation,
    }));
    let arguments = p.list(ListKind::FunctionArg, args);
    p.push(Node::FunctionExpression(FunctionExpression {
        name,
        arguments,
        star: false,
        distinct: false,
        variadic: false,
        order: None,
        within_group: None,
        filter: None,
        over: None,
    }))
}

fn parse_extract_field(p: &mut Cursor) -> Result<String> {
    match p.current().kind {
        TokenKind::Ident | TokenKind::StringConst => Ok(p.bump().value),
        TokenKind::Keyword(
            Kw::YEAR | Kw::MONTH | Kw::DAY | Kw::HOUR | Kw::MINUTE | Kw::SECOND,
        ) => Ok(p.bump().value),
        _ => Err(p.expected("an extract field")),
    }
}

/// `substring(a, b, c)`, `substring(a FROM b [FOR c])` and
/// `substring(a FOR c)`; all normalize to positional arguments.
fn parse_substring_args(p: &mut Cursor) -> Result<Vec<NodeId>> {
    let string = parse_expr(p)?;
    if p.eat(T![,]) {
        let mut args = vec![string];
        args.extend(parse_comma_separated(p, parse_expr)?);
        return Ok(args);
    }
    if p.eat_kw(Kw::FROM) {
        let from = parse_expr(p)?;
        let mut args = vec![string, from];
        if p.eat_kw(Kw::FOR) {
            args.push(parse_expr(p)?);
        }
        return Ok(args);
    }
    if p.eat_kw(Kw::FOR) {
        // substring(x FOR n) counts from position 1
        let one = constant(p, ConstKind::Integer, "1".to_owned());
        let length = parse_expr(p)?;
        return Ok(vec![string, one, length]);
    }
    Ok(vec![string])
}

/// Maps the `TRIM` syntax onto `btrim`/`ltrim`/`rtrim`.
fn parse_trim_args(p: &mut Cursor) -> Result<(&'static str, Vec<NodeId>)> {
    let name = if p.eat_kw(Kw::LEADING) {
        "ltrim"
    } else if p.eat_kw(Kw::TRAILING) {
        "rtrim"
    } else {
        p.eat_kw(Kw::BOTH);
        "btrim"
    };
    if p.eat_kw(Kw::FROM) {
        let args = parse_comma_separated(p, parse_expr)?;
        return Ok((name, args));
    }
    let first = parse_expr(p)?;
    if p.eat_kw(Kw::FROM) {
        let string = parse_expr(p)?;
        return Ok((name, vec![string, first]));
    }
    let mut args = vec![first];
    while p.eat(T![,]) {
        args.push(parse_expr(p)?);
    }
    Ok((name, args))
}

fn parse_case(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::CASE)?;
    let argument = if p.at_kw(Kw::WHEN) {
        None
    } else {
        Some(parse_expr(p)?)
    };
    let mut when_clauses = Vec::new();
    while p.eat_kw(Kw::WHEN) {
        let when = parse_expr(p)?;
        p.expect_kw(Kw::THEN)?;
        let then = parse_expr(p)?;
        when_clauses.push(p.push(Node::WhenExpression(WhenExpression { when, then })));
    }
    if when_clauses.is_empty() {
        return Err(p.expected("WHEN"));
    }
    let else_clause = if p.eat_kw(Kw::ELSE) {
        Some(parse_expr(p)?)
    } else {
        None
    };
    p.expect_kw(Kw::END)?;
    Ok(p.push(Node::CaseExpression(CaseExpression {
        argument,
        when_clauses,
        else_clause,
    })))
}

/// `[...]` after the `ARRAY` keyword; inner arrays may drop the
/// keyword.
fn parse_array_literal(p: &mut Cursor) -> Result<NodeId> {
    p.expect(T!['['])?;
    let mut elements = Vec::new();
    if !p.at(T![']']) {
        loop {
            let element = if p.at(T!['[']) {
                parse_array_literal(p)?
            } else {
                parse_expr(p)?
            };
            elements.push(element);
            if !p.eat(T![,]) {
                break;
            }
        }
    }
    p.expect(T![']'])?;
    Ok(p.push(Node::ArrayExpression(ArrayExpression { elements })))
}

/// Identifier-led atom: column reference, function call or
/// `typename 'literal'`.
fn parse_name_atom(p: &mut Cursor) -> Result<NodeId> {
    let mut parts = vec![match p.current().kind {
        TokenKind::Keyword(kw) if !kw.is_col_id() && kw.is_type_func_name() => {
            // type/function-name keywords are only valid when a call
            // follows, e.g. `left('ab', 1)`
            if !p.nth_at(1, T!['(']) {
                return Err(p.expected("an expression"));
            }
            parse_type_function_name_part(p)?
        }
        _ => parse_col_id(p)?,
    }];
    let mut star = false;
    while p.at(T![.]) {
        if p.nth_at(1, T![*]) {
            p.bump();
            p.bump();
            star = true;
            break;
        }
        p.bump();
        parts.push(parse_col_label(p)?);
    }

    if !star && p.at(T!['(']) {
        let name = qualified_from_parts(p, parts)?;
        return parse_function_expression(p, name);
    }
    if !star && p.at(TokenKind::StringConst) {
        // `typename 'literal'`
        let name = qualified_from_parts(p, parts)?;
        let type_name = p.push(Node::TypeName(TypeName {
            name,
            modifiers: None,
            bounds: Vec::new(),
        }));
        let token = p.bump();
        let argument = constant(p, ConstKind::String, token.value);
        return Ok(p.push(Node::TypecastExpression(TypecastExpression {
            argument,
            type_name,
        })));
    }

    if star {
        parts.push(p.push(Node::Star));
    }
    let column = p.push(Node::ColumnReference(ColumnReference { parts }));
    parse_opt_indirection(p, column)
}

fn parse_type_function_name_part(p: &mut Cursor) -> Result<NodeId> {
    let token = p.bump();
    Ok(p.identifier(token.value))
}

/// `name := value` / `name => value` / plain expression argument.
pub(crate) fn parse_function_argument(p: &mut Cursor) -> Result<NodeId> {
    let named = matches!(
        p.current().kind,
        TokenKind::Ident | TokenKind::QuotedIdent | TokenKind::Keyword(_)
    ) && matches!(p.nth(1).kind, T![:=] | T![=>]);
    if named {
        let name = parse_type_function_name(p)?;
        p.bump();
        let value = parse_expr(p)?;
        return Ok(p.push(Node::NamedFunctionArgument(NamedFunctionArgument {
            name,
            value,
        })));
    }
    parse_expr(p)
}

/// Call syntax after the name: argument list, then the aggregate and
/// window decorations. A trailing string constant re-interprets the
/// whole call as `typename(modifiers) 'literal'`.
fn parse_function_expression(p: &mut Cursor, name: NodeId) -> Result<NodeId> {
    p.expect(T!['('])?;
    let mut star = false;
    let mut distinct = false;
    let mut variadic = false;
    let mut arguments = Vec::new();
    let mut order = None;

    if p.at(T![*]) && p.nth_at(1, T![')']) {
        p.bump();
        star = true;
    } else if !p.at(T![')']) {
        if p.eat_kw(Kw::DISTINCT) {
            distinct = true;
        } else {
            p.eat_kw(Kw::ALL);
        }
        loop {
            if p.eat_kw(Kw::VARIADIC) {
                variadic = true;
            }
            arguments.push(parse_function_argument(p)?);
            if variadic || !p.at(T![,]) {
                break;
            }
            p.bump();
        }
        if p.at_kw(Kw::ORDER) {
            p.bump();
            p.expect_kw(Kw::BY)?;
            let elements = parse_comma_separated(p, parse_order_by_element)?;
            order = Some(p.list(ListKind::OrderBy, elements));
        }
    }
    p.expect(T![')'])?;

    // `myty(3) 'x'` — a type with modifiers, not a call
    if p.at(TokenKind::StringConst) && !star && !distinct && !variadic && order.is_none() {
        let all_plain = arguments
            .iter()
            .all(|id| p.tree.node(*id).is_scalar_expression());
        if all_plain {
            let modifiers = if arguments.is_empty() {
                None
            } else {
                Some(p.list(ListKind::Expression, arguments))
            };
            let type_name = p.push(Node::TypeName(TypeName {
                name,
                modifiers,
                bounds: Vec::new(),
            }));
            let token = p.bump();
            let argument = constant(p, ConstKind::String, token.value);
            return Ok(p.push(Node::TypecastExpression(TypecastExpression {
                argument,
                type_name,
            })));
        }
    }

    let within_group = if p.at_kw(Kw::WITHIN) {
        p.bump();
        p.expect_kw(Kw::GROUP)?;
        p.expect(T!['('])?;
        p.expect_kw(Kw::ORDER)?;
        p.expect_kw(Kw::BY)?;
        let elements = parse_comma_separated(p, parse_order_by_element)?;
        p.expect(T![')'])?;
        Some(p.list(ListKind::OrderBy, elements))
    } else {
        None
    };
    let filter = if p.at_kw(Kw::FILTER) {
        p.bump();
        p.expect(T!['('])?;
        p.expect_kw(Kw::WHERE)?;
        let condition = parse_expr(p)?;
        p.expect(T![')'])?;
        Some(condition)
    } else {
        None
    };
    let over = if p.eat_kw(Kw::OVER) {
        if p.at(T!['(']) {
            Some(super::parse_window_specification(p)?)
        } else {
            let ref_name = parse_col_id(p)?;
            Some(p.push(Node::WindowDefinition(WindowDefinition {
                name: None,
                ref_name: Some(ref_name),
                partition: None,
                order: None,
                frame: None,
            })))
        }
    } else {
        None
    };

    let arguments = p.list(ListKind::FunctionArg, arguments);
    Ok(p.push(Node::FunctionExpression(FunctionExpression {
        name,
        arguments,
        star,
        distinct,
        variadic,
        order,
        within_group,
        filter,
        over,
    })))
}

#[cfg(test)]
mod tests {
    use expect_test::{expect, Expect};

    use crate::precedence::{ParserOptions, PrecedenceMode};
    use crate::Parser;

    fn check(input: &str, expected_tree: Expect) {
        let tree = Parser::default().parse_expression(input).unwrap();
        expected_tree.assert_eq(&tree.dump());
    }

    fn check_pre95(input: &str, expected_tree: Expect) {
        let parser = Parser::new(ParserOptions {
            precedence: PrecedenceMode::Pre95,
        });
        let tree = parser.parse_expression(input).unwrap();
        expected_tree.assert_eq(&tree.dump());
    }

    #[test]
    fn parse_arithmetic_precedence() {
        check(
            "1 + 2 * 3",
            expect![[r#"
                OperatorExpression "+"
                  Constant Integer "1"
                  OperatorExpression "*"
                    Constant Integer "2"
                    Constant Integer "3"
            "#]],
        );
    }

    #[test]
    fn parse_logical_chains_flatten() {
        check(
            "a or b or c and d",
            expect![[r#"
                LogicalExpression or
                  ColumnReference
                    Identifier "a"
                  ColumnReference
                    Identifier "b"
                  LogicalExpression and
                    ColumnReference
                      Identifier "c"
                    ColumnReference
                      Identifier "d"
            "#]],
        );
    }

    #[test]
    fn parse_is_null_binds_below_comparison() {
        check(
            "1 = 2 is null",
            expect![[r#"
                OperatorExpression "is null"
                  OperatorExpression "="
                    Constant Integer "1"
                    Constant Integer "2"
            "#]],
        );
    }

    #[test]
    fn parse_is_null_binds_tighter_before_9_5() {
        check_pre95(
            "1 = 2 is null",
            expect![[r#"
                OperatorExpression "="
                  Constant Integer "1"
                  OperatorExpression "is null"
                    Constant Integer "2"
            "#]],
        );
    }

    #[test]
    fn parse_not_between_with_b_expr_bounds() {
        check(
            "a not between symmetric 1 + 1 and 4",
            expect![[r#"
                BetweenExpression "not between symmetric"
                  ColumnReference
                    Identifier "a"
                  OperatorExpression "+"
                    Constant Integer "1"
                    Constant Integer "1"
                  Constant Integer "4"
            "#]],
        );
    }

    #[test]
    fn parse_unary_minus_folds_into_constants() {
        check(
            "- 1 + - x",
            expect![[r#"
                OperatorExpression "+"
                  Constant Integer "-1"
                  OperatorExpression "-"
                    ColumnReference
                      Identifier "x"
            "#]],
        );
    }

    #[test]
    fn parse_postfix_operator() {
        // a trailing operator with nothing to its right is postfix
        check(
            "x !",
            expect![[r#"
                OperatorExpression "!"
                  ColumnReference
                    Identifier "x"
            "#]],
        );
    }

    #[test]
    fn parse_indirection_and_slices() {
        check(
            "a.b[1][2:3].*",
            expect![[r#"
                Indirection
                  ColumnReference
                    Identifier "a"
                    Identifier "b"
                  ArrayIndexes
                    Constant Integer "1"
                  ArrayIndexes slice
                    Constant Integer "2"
                    Constant Integer "3"
                  Star
            "#]],
        );
    }

    #[test]
    fn parse_function_decorations() {
        check(
            "sum(distinct a order by b) filter (where c > 0) over (partition by d)",
            expect![[r#"
                FunctionExpression distinct
                  QualifiedName
                    Identifier "sum"
                  FunctionArgumentList
                    ColumnReference
                      Identifier "a"
                  OrderByList
                    OrderByElement
                      ColumnReference
                        Identifier "b"
                  OperatorExpression ">"
                    ColumnReference
                      Identifier "c"
                    Constant Integer "0"
                  WindowDefinition
                    ExpressionList
                      ColumnReference
                        Identifier "d"
            "#]],
        );
    }

    #[test]
    fn parse_typename_literal_and_interval() {
        check(
            "interval '1' hour",
            expect![[r#"
                TypecastExpression
                  Constant String "1"
                  IntervalTypeName hour
            "#]],
        );
        check(
            "numeric(10, 2) '4.5'",
            expect![[r#"
                TypecastExpression
                  Constant String "4.5"
                  TypeName
                    QualifiedName
                      Identifier "pg_catalog"
                      Identifier "numeric"
                    ExpressionList
                      Constant Integer "10"
                      Constant Integer "2"
            "#]],
        );
    }

    #[test]
    fn parse_any_subselect_operand() {
        check(
            "a < any (select b from t)",
            expect![[r#"
                OperatorExpression "<"
                  ColumnReference
                    Identifier "a"
                  SubselectExpression any
                    Select
                      TargetList
                        TargetElement
                          ColumnReference
                            Identifier "b"
                      FromList
                        RelationReference
                          QualifiedName
                            Identifier "t"
            "#]],
        );
    }

    #[test]
    fn parse_special_function_syntax_normalizes() {
        check(
            "extract(epoch from ts)",
            expect![[r#"
                FunctionExpression
                  QualifiedName
                    Identifier "pg_catalog"
                    Identifier "date_part"
                  FunctionArgumentList
                    Constant String "epoch"
                    ColumnReference
                      Identifier "ts"
            "#]],
        );
    }

    #[test]
    fn reject_bad_expressions() {
        let parser = Parser::default();
        assert!(parser.parse_expression("1 +").is_err());
        assert!(parser.parse_expression("case x end").is_err());
        assert!(parser.parse_expression("f(a,)").is_err());
        assert!(parser.parse_expression("a between 1").is_err());
    }
}
