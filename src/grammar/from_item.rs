// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! `FROM` items: relations, joins, subselects, range functions,
//! `ROWS FROM`, `TABLESAMPLE` and `XMLTABLE`.

use crate::ast::*;
use crate::error::{Error, Result};
use crate::lexer::{Keyword as Kw, TokenKind};
use crate::T;

use super::{
    at_col_id, parse_alias_clause, parse_attr_name_chain, parse_col_id, parse_comma_separated,
    parse_expr, parse_function_argument, parse_qualified_name, parse_select_statement,
    parse_typename, parse_xml_table, qualified_from_parts, Cursor,
};

/// A `FROM` list element with its trailing join chain, left
/// associative.
pub(crate) fn parse_from_item(p: &mut Cursor) -> Result<NodeId> {
    let mut left = parse_joinless_item(p)?;
    loop {
        let natural = if p.at_kw(Kw::NATURAL) {
            p.bump();
            true
        } else {
            false
        };
        let kind = match p.current().kind {
            TokenKind::Keyword(Kw::CROSS) if !natural => {
                p.bump();
                p.expect_kw(Kw::JOIN)?;
                let right = parse_joinless_item(p)?;
                left = p.push(Node::JoinExpression(JoinExpression {
                    kind: JoinType::Cross,
                    natural: false,
                    left,
                    right,
                    using_columns: None,
                    on: None,
                    alias: None,
                }));
                continue;
            }
            TokenKind::Keyword(Kw::JOIN) => JoinType::Inner,
            TokenKind::Keyword(Kw::INNER) => {
                p.bump();
                JoinType::Inner
            }
            TokenKind::Keyword(Kw::LEFT) => {
                p.bump();
                p.eat_kw(Kw::OUTER);
                JoinType::Left
            }
            TokenKind::Keyword(Kw::RIGHT) => {
                p.bump();
                p.eat_kw(Kw::OUTER);
                JoinType::Right
            }
            TokenKind::Keyword(Kw::FULL) => {
                p.bump();
                p.eat_kw(Kw::OUTER);
                JoinType::Full
            }
            _ if natural => return Err(p.expected("a join type")),
            _ => break,
        };
        p.expect_kw(Kw::JOIN)?;
        let right = parse_joinless_item(p)?;
        let (on, using_columns) = if natural {
            (None, None)
        } else if p.eat_kw(Kw::ON) {
            (Some(parse_expr(p)?), None)
        } else if p.eat_kw(Kw::USING) {
            (None, Some(super::parse_name_list(p)?))
        } else {
            return Err(p.expected("ON or USING"));
        };
        left = p.push(Node::JoinExpression(JoinExpression {
            kind,
            natural,
            left,
            right,
            using_columns,
            on,
            alias: None,
        }));
    }
    Ok(left)
}

fn parse_joinless_item(p: &mut Cursor) -> Result<NodeId> {
    let lateral = p.eat_kw(Kw::LATERAL);
    match p.current().kind {
        T!['('] => {
            if at_select_start_behind_paren(p) {
                p.bump();
                let statement = parse_select_statement(p)?;
                p.expect(T![')'])?;
                let (alias, column_aliases) = parse_alias_clause(p)?;
                Ok(p.push(Node::RangeSubselect(RangeSubselect {
                    statement,
                    lateral,
                    alias,
                    column_aliases,
                })))
            } else {
                if lateral {
                    return Err(p.expected("a subquery or function after LATERAL"));
                }
                p.bump();
                let inner = parse_from_item(p)?;
                p.expect(T![')'])?;
                let (alias, _) = parse_alias_clause(p)?;
                if let Some(alias) = alias {
                    if !matches!(p.tree.node(inner), Node::JoinExpression(_)) {
                        return Err(Error::syntax(
                            p.position(),
                            "alias on a parenthesized FROM item requires a join",
                        ));
                    }
                    if let Node::JoinExpression(j) = p.tree.node_mut(inner) {
                        j.alias = Some(alias);
                    }
                    p.tree.set_parent_of(alias, Some(inner));
                }
                Ok(inner)
            }
        }
        TokenKind::Keyword(Kw::ROWS) => parse_rows_from(p, lateral),
        TokenKind::Keyword(Kw::XMLTABLE) => parse_xml_table(p, lateral),
        TokenKind::Keyword(Kw::ONLY) => {
            if lateral {
                return Err(p.expected("a subquery or function after LATERAL"));
            }
            p.bump();
            let name = parse_qualified_name(p)?;
            parse_relation_rest(p, name, Some(false))
        }
        _ => {
            let first = parse_col_id(p)?;
            let parts = parse_attr_name_chain(p, first)?;
            if p.at(T!['(']) {
                let name = qualified_from_parts(p, parts)?;
                let function = parse_range_function_call(p, name)?;
                return parse_range_function_rest(p, function, lateral);
            }
            if lateral {
                return Err(p.expected("a subquery or function after LATERAL"));
            }
            let name = qualified_from_parts(p, parts)?;
            let inherit = if p.eat(T![*]) { Some(true) } else { None };
            parse_relation_rest(p, name, inherit)
        }
    }
}

/// Whether the `(` at hand opens a subselect rather than a
/// parenthesized join.
fn at_select_start_behind_paren(p: &Cursor) -> bool {
    matches!(
        p.nth(1).kind,
        TokenKind::Keyword(Kw::SELECT | Kw::VALUES | Kw::WITH | Kw::TABLE)
    )
}

fn parse_relation_rest(
    p: &mut Cursor,
    name: NodeId,
    inherit: Option<bool>,
) -> Result<NodeId> {
    let (alias, column_aliases) = parse_alias_clause(p)?;
    let relation = p.push(Node::RelationReference(RelationReference {
        name,
        inherit,
        alias,
        column_aliases,
    }));
    if !p.at_kw(Kw::TABLESAMPLE) {
        return Ok(relation);
    }
    p.bump();
    let method = parse_qualified_name(p)?;
    p.expect(T!['('])?;
    let arguments = parse_comma_separated(p, parse_expr)?;
    p.expect(T![')'])?;
    let repeatable = if p.eat_kw(Kw::REPEATABLE) {
        p.expect(T!['('])?;
        let seed = parse_expr(p)?;
        p.expect(T![')'])?;
        Some(seed)
    } else {
        None
    };
    Ok(p.push(Node::TableSample(TableSample {
        relation,
        method,
        arguments,
        repeatable,
    })))
}

/// Plain `name(args)` as used in range position and `ROWS FROM`.
fn parse_range_function_call(p: &mut Cursor, name: NodeId) -> Result<NodeId> {
    p.expect(T!['('])?;
    let arguments = if p.at(T![')']) {
        Vec::new()
    } else {
        parse_comma_separated(p, parse_function_argument)?
    };
    p.expect(T![')'])?;
    let arguments = p.list(ListKind::FunctionArg, arguments);
    Ok(p.push(Node::FunctionCall(FunctionCall { name, arguments })))
}

fn parse_range_function_rest(
    p: &mut Cursor,
    function: NodeId,
    lateral: bool,
) -> Result<NodeId> {
    let ordinality = parse_with_ordinality(p)?;
    let (alias, column_aliases, column_definitions) = parse_function_alias(p)?;
    Ok(p.push(Node::RangeFunctionCall(RangeFunctionCall {
        function,
        lateral,
        ordinality,
        alias,
        column_aliases,
        column_definitions,
    })))
}

fn parse_with_ordinality(p: &mut Cursor) -> Result<bool> {
    if p.at_kw(Kw::WITH) && p.nth_at_kw(1, Kw::ORDINALITY) {
        p.bump();
        p.bump();
        return Ok(true);
    }
    Ok(false)
}

fn parse_rows_from(p: &mut Cursor, lateral: bool) -> Result<NodeId> {
    p.expect_kw(Kw::ROWS)?;
    p.expect_kw(Kw::FROM)?;
    p.expect(T!['('])?;
    let elements = parse_comma_separated(p, |p| {
        let name = parse_qualified_name(p)?;
        let function = parse_range_function_call(p, name)?;
        let column_definitions = if p.at_kw(Kw::AS) {
            p.bump();
            Some(parse_column_definition_list(p)?)
        } else {
            None
        };
        Ok(p.push(Node::RowsFromElement(RowsFromElement {
            function,
            column_definitions,
        })))
    })?;
    p.expect(T![')'])?;
    let ordinality = parse_with_ordinality(p)?;
    let (alias, column_aliases) = parse_alias_clause(p)?;
    Ok(p.push(Node::RowsFrom(RowsFrom {
        elements,
        lateral,
        ordinality,
        alias,
        column_aliases,
    })))
}

/// Alias of a range function; the parenthesized list may be bare
/// column names or column definitions with types.
fn parse_function_alias(
    p: &mut Cursor,
) -> Result<(Option<NodeId>, Option<Vec<NodeId>>, Option<Vec<NodeId>>)> {
    let alias = if p.eat_kw(Kw::AS) {
        if p.at(T!['(']) {
            let (names, defs) = parse_alias_items(p)?;
            return Ok((None, names, defs));
        }
        Some(parse_col_id(p)?)
    } else if at_col_id(p) {
        Some(parse_col_id(p)?)
    } else {
        return Ok((None, None, None));
    };
    if p.at(T!['(']) {
        let (names, defs) = parse_alias_items(p)?;
        return Ok((alias, names, defs));
    }
    Ok((alias, None, None))
}

/// `(a, b)` or `(a int, b text)`; mixing names and definitions is
/// rejected like the server does.
fn parse_alias_items(
    p: &mut Cursor,
) -> Result<(Option<Vec<NodeId>>, Option<Vec<NodeId>>)> {
    p.expect(T!['('])?;
    let mut names = Vec::new();
    let mut defs = Vec::new();
    loop {
        let name = parse_col_id(p)?;
        if p.at(T![,]) || p.at(T![')']) {
            names.push(name);
        } else {
            let type_name = parse_typename(p)?;
            defs.push(p.push(Node::ColumnDefinition(ColumnDefinition {
                name,
                type_name,
            })));
        }
        if !p.eat(T![,]) {
            break;
        }
    }
    p.expect(T![')'])?;
    match (names.is_empty(), defs.is_empty()) {
        (false, true) => Ok((Some(names), None)),
        (true, false) => Ok((None, Some(defs))),
        (true, true) => Err(p.expected("column aliases")),
        (false, false) => Err(Error::syntax(
            p.position(),
            "cannot mix column aliases and column definitions",
        )),
    }
}

fn parse_column_definition_list(p: &mut Cursor) -> Result<Vec<NodeId>> {
    p.expect(T!['('])?;
    let defs = parse_comma_separated(p, |p| {
        let name = parse_col_id(p)?;
        let type_name = parse_typename(p)?;
        Ok(p.push(Node::ColumnDefinition(ColumnDefinition { name, type_name })))
    })?;
    p.expect(T![')'])?;
    Ok(defs)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Parser, SqlBuilderOptions, SqlBuilderWalker};

    fn sql(input: &str) -> String {
        let tree = Parser::default().parse_statement(input).unwrap();
        let mut walker = SqlBuilderWalker::new(SqlBuilderOptions::compact());
        tree.sql(&mut walker).unwrap()
    }

    #[test]
    fn parse_joins() {
        assert_eq!(
            sql("select * from a join b on a.x = b.x left outer join c using (y, z)"),
            "select * from a join b on a.x = b.x left join c using (y, z)"
        );
        assert_eq!(
            sql("select * from a natural right join b"),
            "select * from a natural right join b"
        );
        assert_eq!(
            sql("select * from (a cross join b) as j"),
            "select * from (a cross join b) as j"
        );
        assert_eq!(
            sql("select * from a join (b join c on b.x = c.x) on a.y = b.y"),
            "select * from a join (b join c on b.x = c.x) on a.y = b.y"
        );
    }

    #[test]
    fn parse_relations_and_aliases() {
        assert_eq!(sql("select * from only t"), "select * from only t");
        assert_eq!(sql("select * from t *"), "select * from t *");
        assert_eq!(
            sql("select t.* from s.t x (a, b)"),
            "select t.* from s.t as x (a, b)"
        );
    }

    #[test]
    fn parse_subselects_in_from() {
        assert_eq!(
            sql("select * from (select 1) as s (x)"),
            "select * from (select 1) as s (x)"
        );
        assert_eq!(
            sql("select * from t, lateral (select t.a) s"),
            "select * from t, lateral (select t.a) as s"
        );
    }

    #[test]
    fn parse_range_functions() {
        assert_eq!(
            sql("select * from generate_series(1, 3) with ordinality as g (i, n)"),
            "select * from generate_series(1, 3) with ordinality as g (i, n)"
        );
        assert_eq!(
            sql("select * from json_to_record(j) as r (a pg_catalog.int4, b text)"),
            "select * from json_to_record(j) as r (a pg_catalog.int4, b \"text\")"
        );
        assert_eq!(
            sql("select * from rows from (f(1), g() as (a pg_catalog.int4)) as r"),
            "select * from rows from (f(1), g() as (a pg_catalog.int4)) as r"
        );
        assert_eq!(
            sql("select * from lateral f(x := 1)"),
            "select * from lateral f(x := 1)"
        );
    }

    #[test]
    fn parse_tablesample() {
        assert_eq!(
            sql("select * from t tablesample bernoulli(10) repeatable (7)"),
            "select * from t tablesample bernoulli(10) repeatable (7)"
        );
    }

    #[test]
    fn reject_bad_from_items() {
        let parser = Parser::default();
        assert!(parser.parse_statement("select * from a natural b").is_err());
        assert!(parser.parse_statement("select * from a join b").is_err());
        assert!(parser
            .parse_statement("select * from f() as (a, b pg_catalog.int4)")
            .is_err());
    }
}
