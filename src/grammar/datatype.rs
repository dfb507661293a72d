// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Type name parsing.
//!
//! SQL-standard spellings fold to their `pg_catalog` names (`int` →
//! `pg_catalog.int4`, `double precision` → `pg_catalog.float8`, …) the
//! same way the PostgreSQL parser resolves them, so printed output
//! names the identical type.

use crate::ast::*;
use crate::error::{Error, Result};
use crate::lexer::{Keyword as Kw, TokenKind};
use crate::T;

use super::{
    parse_attr_name_chain, parse_comma_separated, parse_expr, parse_iconst,
    parse_type_function_name, qualified_from_parts, Cursor,
};

/// `Typename`: a simple type followed by optional array bounds
/// (`[]`, `[3]`, `ARRAY`, `ARRAY[3]`).
pub(crate) fn parse_typename(p: &mut Cursor) -> Result<NodeId> {
    let base = parse_simple_typename(p)?;
    let mut bounds = Vec::new();
    if p.at_kw(Kw::ARRAY) {
        p.bump();
        if p.eat(T!['[']) {
            bounds.push(Some(parse_iconst(p)?));
            p.expect(T![']'])?;
        } else {
            bounds.push(None);
        }
    } else {
        while p.at(T!['[']) {
            p.bump();
            if p.at(T![']']) {
                bounds.push(None);
            } else {
                bounds.push(Some(parse_iconst(p)?));
            }
            p.expect(T![']'])?;
        }
    }
    if bounds.is_empty() {
        return Ok(base);
    }
    let position = p.position();
    match p.tree.node_mut(base) {
        Node::TypeName(t) => {
            t.bounds = bounds;
            Ok(base)
        }
        _ => Err(Error::syntax(
            position,
            "this type cannot have array bounds here",
        )),
    }
}

/// `SimpleTypename`: standard spellings and generic names, without
/// array bounds.
pub(crate) fn parse_simple_typename(p: &mut Cursor) -> Result<NodeId> {
    match p.current().kind {
        TokenKind::Keyword(Kw::INT | Kw::INTEGER) => catalog_after_kw(p, "int4"),
        TokenKind::Keyword(Kw::SMALLINT) => catalog_after_kw(p, "int2"),
        TokenKind::Keyword(Kw::BIGINT) => catalog_after_kw(p, "int8"),
        TokenKind::Keyword(Kw::REAL) => catalog_after_kw(p, "float4"),
        TokenKind::Keyword(Kw::BOOLEAN) => catalog_after_kw(p, "bool"),
        TokenKind::Keyword(Kw::FLOAT) => {
            p.bump();
            let name = if p.eat(T!['(']) {
                let precision = parse_iconst(p)?;
                p.expect(T![')'])?;
                match precision {
                    1..=24 => "float4",
                    25..=53 => "float8",
                    _ => {
                        return Err(Error::syntax(
                            p.position(),
                            "precision for type float must be between 1 and 53",
                        ))
                    }
                }
            } else {
                "float8"
            };
            catalog_type(p, name, None)
        }
        TokenKind::Keyword(Kw::DOUBLE) => {
            p.bump();
            p.expect_kw(Kw::PRECISION)?;
            catalog_type(p, "float8", None)
        }
        TokenKind::Keyword(Kw::DECIMAL | Kw::DEC | Kw::NUMERIC) => {
            p.bump();
            let modifiers = parse_opt_type_modifiers(p)?;
            catalog_type(p, "numeric", modifiers)
        }
        TokenKind::Keyword(Kw::BIT) => {
            p.bump();
            let varying = p.eat_kw(Kw::VARYING);
            let modifiers = parse_opt_type_modifiers(p)?;
            catalog_type(p, if varying { "varbit" } else { "bit" }, modifiers)
        }
        TokenKind::Keyword(Kw::NATIONAL) => {
            p.bump();
            if !p.eat_kw(Kw::CHARACTER) && !p.eat_kw(Kw::CHAR) {
                return Err(p.expected("CHARACTER"));
            }
            parse_character_rest(p)
        }
        TokenKind::Keyword(Kw::CHARACTER | Kw::CHAR | Kw::NCHAR) => {
            p.bump();
            parse_character_rest(p)
        }
        TokenKind::Keyword(Kw::VARCHAR) => {
            p.bump();
            let modifiers = parse_opt_type_modifiers(p)?;
            catalog_type(p, "varchar", modifiers)
        }
        TokenKind::Keyword(Kw::TIMESTAMP) => parse_datetime_rest(p, "timestamp", "timestamptz"),
        TokenKind::Keyword(Kw::TIME) => parse_datetime_rest(p, "time", "timetz"),
        TokenKind::Keyword(Kw::INTERVAL) => {
            p.bump();
            let (mask, precision) = parse_opt_interval_qual(p)?;
            Ok(p.push(Node::IntervalTypeName(IntervalTypeName { mask, precision })))
        }
        _ => {
            // GenericType: possibly qualified, possibly with modifiers
            let first = parse_type_function_name(p)?;
            let parts = parse_attr_name_chain(p, first)?;
            let name = qualified_from_parts(p, parts)?;
            let modifiers = parse_opt_type_modifiers(p)?;
            Ok(p.push(Node::TypeName(TypeName {
                name,
                modifiers,
                bounds: Vec::new(),
            })))
        }
    }
}

fn parse_character_rest(p: &mut Cursor) -> Result<NodeId> {
    let varying = p.eat_kw(Kw::VARYING);
    let modifiers = parse_opt_type_modifiers(p)?;
    catalog_type(p, if varying { "varchar" } else { "bpchar" }, modifiers)
}

fn parse_datetime_rest(
    p: &mut Cursor,
    plain: &'static str,
    with_tz: &'static str,
) -> Result<NodeId> {
    p.bump();
    let modifiers = parse_opt_type_modifiers(p)?;
    let name = if p.at_kw(Kw::WITH) && p.nth_at_kw(1, Kw::TIME) {
        p.bump();
        p.expect_kw(Kw::TIME)?;
        p.expect_kw(Kw::ZONE)?;
        with_tz
    } else {
        if p.eat_kw(Kw::WITHOUT) {
            p.expect_kw(Kw::TIME)?;
            p.expect_kw(Kw::ZONE)?;
        }
        plain
    };
    catalog_type(p, name, modifiers)
}

fn catalog_after_kw(p: &mut Cursor, name: &str) -> Result<NodeId> {
    p.bump();
    catalog_type(p, name, None)
}

fn catalog_type(p: &mut Cursor, name: &str, modifiers: Option<NodeId>) -> Result<NodeId> {
    let schema = p.identifier("pg_catalog");
    let relation = p.identifier(name);
    let name = p.push(Node::QualifiedName(QualifiedName {
        catalog: None,
        schema: Some(schema),
        relation,
    }));
    Ok(p.push(Node::TypeName(TypeName {
        name,
        modifiers,
        bounds: Vec::new(),
    })))
}

fn parse_opt_type_modifiers(p: &mut Cursor) -> Result<Option<NodeId>> {
    if !p.at(T!['(']) {
        return Ok(None);
    }
    p.bump();
    let elements = parse_comma_separated(p, parse_expr)?;
    p.expect(T![')'])?;
    Ok(Some(p.list(ListKind::Expression, elements)))
}

/// `INTERVAL` in expression position: `INTERVAL '1 day' [qual]` or
/// `INTERVAL (p) '...'`.
pub(crate) fn parse_interval_literal(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::INTERVAL)?;
    let precision = if p.eat(T!['(']) {
        let precision = parse_iconst(p)?;
        p.expect(T![')'])?;
        Some(precision)
    } else {
        None
    };
    let token = p.expect(TokenKind::StringConst)?;
    let argument = p.push(Node::Constant(Constant {
        kind: ConstKind::String,
        value: token.value,
    }));
    let (mask, qual_precision) = if precision.is_none() {
        parse_opt_interval_qual(p)?
    } else {
        (None, None)
    };
    let type_name = p.push(Node::IntervalTypeName(IntervalTypeName {
        mask,
        precision: precision.or(qual_precision),
    }));
    Ok(p.push(Node::TypecastExpression(TypecastExpression {
        argument,
        type_name,
    })))
}

/// `opt_interval`: the field mask after `INTERVAL`, e.g. `DAY TO
/// SECOND(3)`.
fn parse_opt_interval_qual(p: &mut Cursor) -> Result<(Option<String>, Option<u32>)> {
    let first = match p.current().kind {
        TokenKind::Keyword(
            Kw::YEAR | Kw::MONTH | Kw::DAY | Kw::HOUR | Kw::MINUTE | Kw::SECOND,
        ) => p.bump().value,
        T!['('] => {
            p.bump();
            let precision = parse_iconst(p)?;
            p.expect(T![')'])?;
            return Ok((None, Some(precision)));
        }
        _ => return Ok((None, None)),
    };
    let mut precision = None;
    if first == "second" && p.eat(T!['(']) {
        precision = Some(parse_iconst(p)?);
        p.expect(T![')'])?;
        return Ok((Some(first), precision));
    }
    if !p.at_kw(Kw::TO) {
        return Ok((Some(first), None));
    }
    p.bump();
    let second = match p.current().kind {
        TokenKind::Keyword(Kw::MONTH | Kw::HOUR | Kw::MINUTE | Kw::SECOND) => p.bump().value,
        _ => return Err(p.expected("MONTH, HOUR, MINUTE or SECOND")),
    };
    if second == "second" && p.eat(T!['(']) {
        precision = Some(parse_iconst(p)?);
        p.expect(T![')'])?;
    }
    Ok((Some(format!("{first} to {second}")), precision))
}
