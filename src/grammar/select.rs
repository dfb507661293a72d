// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! `SELECT`/`VALUES` statements: set operations, `WITH`, the clause
//! roster of a simple select and the shared tail clauses
//! (`ORDER BY`/`LIMIT`/`OFFSET`/locking).

use crate::ast::*;
use crate::error::{Error, Result};
use crate::lexer::{Keyword as Kw, TokenKind};
use crate::T;

use super::{
    at_col_id, parse_col_id, parse_comma_separated, parse_delete, parse_expr, parse_from_item,
    parse_insert, parse_name_list, parse_qualified_name, parse_update, Cursor,
};

/// Set-operation precedence: `UNION`/`EXCEPT` bind loosest,
/// `INTERSECT` tighter, a parenthesized or simple select tightest.
pub(crate) fn set_op_precedence(op: SetOp) -> u8 {
    match op {
        SetOp::Union | SetOp::Except => 1,
        SetOp::Intersect => 2,
    }
}

/// Any of the five statements this library accepts.
pub(crate) fn parse_statement(p: &mut Cursor) -> Result<NodeId> {
    match p.current().kind {
        TokenKind::Keyword(Kw::INSERT) => parse_insert(p, None),
        TokenKind::Keyword(Kw::UPDATE) => parse_update(p, None),
        TokenKind::Keyword(Kw::DELETE) => parse_delete(p, None),
        TokenKind::Keyword(Kw::WITH) => {
            let with = parse_with_clause(p)?;
            match p.current().kind {
                TokenKind::Keyword(Kw::INSERT) => parse_insert(p, Some(with)),
                TokenKind::Keyword(Kw::UPDATE) => parse_update(p, Some(with)),
                TokenKind::Keyword(Kw::DELETE) => parse_delete(p, Some(with)),
                _ => parse_select_rest(p, Some(with)),
            }
        }
        _ => parse_select_statement(p),
    }
}

/// `SELECT`/`VALUES`/`TABLE` with set operations and tail clauses.
pub(crate) fn parse_select_statement(p: &mut Cursor) -> Result<NodeId> {
    let with = if p.at_kw(Kw::WITH) {
        Some(parse_with_clause(p)?)
    } else {
        None
    };
    parse_select_rest(p, with)
}

fn parse_select_rest(p: &mut Cursor, with: Option<NodeId>) -> Result<NodeId> {
    let node = parse_set_op_tree(p, 0)?;
    if let Some(with) = with {
        attach_with(p, node, with)?;
    }
    parse_select_tail(p, node)?;
    Ok(node)
}

fn parse_set_op_tree(p: &mut Cursor, min_prec: u8) -> Result<NodeId> {
    let mut left = parse_select_operand(p)?;
    loop {
        let op = match p.current().kind {
            TokenKind::Keyword(Kw::UNION) => SetOp::Union,
            TokenKind::Keyword(Kw::EXCEPT) => SetOp::Except,
            TokenKind::Keyword(Kw::INTERSECT) => SetOp::Intersect,
            _ => break,
        };
        let prec = set_op_precedence(op);
        if prec < min_prec {
            break;
        }
        p.bump();
        let all = if p.eat_kw(Kw::ALL) {
            true
        } else {
            p.eat_kw(Kw::DISTINCT);
            false
        };
        let right = parse_set_op_tree(p, prec + 1)?;
        left = p.push(Node::SetOpSelect(SetOpSelectStmt {
            with: None,
            op,
            all,
            left,
            right,
            order: None,
            limit: None,
            offset: None,
            locking: None,
        }));
    }
    Ok(left)
}

fn parse_select_operand(p: &mut Cursor) -> Result<NodeId> {
    match p.current().kind {
        T!['('] => {
            p.bump();
            let inner = parse_select_statement(p)?;
            p.expect(T![')'])?;
            Ok(inner)
        }
        TokenKind::Keyword(Kw::SELECT) => parse_simple_select(p),
        TokenKind::Keyword(Kw::VALUES) => parse_values_clause(p),
        TokenKind::Keyword(Kw::TABLE) => parse_table_sugar(p),
        _ => Err(p.expected("SELECT, VALUES, TABLE or a parenthesized query")),
    }
}

fn parse_simple_select(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::SELECT)?;

    let distinct = if p.eat_kw(Kw::DISTINCT) {
        let on = if p.eat_kw(Kw::ON) {
            p.expect(T!['('])?;
            let elements = parse_comma_separated(p, parse_expr)?;
            p.expect(T![')'])?;
            Some(p.list(ListKind::Expression, elements))
        } else {
            None
        };
        Some(DistinctClause { on })
    } else {
        p.eat_kw(Kw::ALL);
        None
    };

    let targets = if at_target_list_start(p) {
        let elements = parse_comma_separated(p, parse_target_element)?;
        Some(p.list(ListKind::Target, elements))
    } else {
        Some(p.list(ListKind::Target, Vec::new()))
    };

    let from = if p.eat_kw(Kw::FROM) {
        let elements = parse_comma_separated(p, parse_from_item)?;
        Some(p.list(ListKind::From, elements))
    } else {
        None
    };

    let where_clause = if p.eat_kw(Kw::WHERE) {
        let condition = parse_expr(p)?;
        Some(p.push(Node::WhereOrHavingClause(WhereOrHavingClause {
            condition: Some(condition),
        })))
    } else {
        None
    };

    let group = if p.at_kw(Kw::GROUP) {
        p.bump();
        p.expect_kw(Kw::BY)?;
        let elements = parse_comma_separated(p, parse_group_by_element)?;
        Some(p.list(ListKind::GroupBy, elements))
    } else {
        None
    };

    let having = if p.eat_kw(Kw::HAVING) {
        let condition = parse_expr(p)?;
        Some(p.push(Node::WhereOrHavingClause(WhereOrHavingClause {
            condition: Some(condition),
        })))
    } else {
        None
    };

    let window = if p.eat_kw(Kw::WINDOW) {
        let elements = parse_comma_separated(p, parse_named_window)?;
        Some(p.list(ListKind::Window, elements))
    } else {
        None
    };

    Ok(p.push(Node::Select(SelectStmt {
        with: None,
        distinct,
        targets,
        from,
        where_clause,
        group,
        having,
        window,
        order: None,
        limit: None,
        offset: None,
        locking: None,
    })))
}

fn at_target_list_start(p: &Cursor) -> bool {
    !matches!(
        p.current().kind,
        TokenKind::Eof
            | TokenKind::Semicolon
            | TokenKind::RParen
            | TokenKind::Keyword(
                Kw::FROM
                    | Kw::WHERE
                    | Kw::GROUP
                    | Kw::HAVING
                    | Kw::WINDOW
                    | Kw::ORDER
                    | Kw::LIMIT
                    | Kw::OFFSET
                    | Kw::FETCH
                    | Kw::FOR
                    | Kw::UNION
                    | Kw::INTERSECT
                    | Kw::EXCEPT
            )
    )
}

/// `expr [AS label | bare_label]` or the bare `*`.
pub(crate) fn parse_target_element(p: &mut Cursor) -> Result<NodeId> {
    if p.at(T![*]) {
        p.bump();
        let star = p.push(Node::Star);
        let expression = p.push(Node::ColumnReference(ColumnReference { parts: vec![star] }));
        return Ok(p.push(Node::TargetElement(TargetElement {
            expression,
            alias: None,
        })));
    }
    let expression = parse_expr(p)?;
    let alias = if p.eat_kw(Kw::AS) {
        Some(super::parse_col_label(p)?)
    } else if matches!(
        p.current().kind,
        TokenKind::Ident | TokenKind::QuotedIdent
    ) {
        // a bare alias must be a plain identifier
        let token = p.bump();
        Some(p.identifier(token.value))
    } else {
        None
    };
    Ok(p.push(Node::TargetElement(TargetElement { expression, alias })))
}

fn parse_values_clause(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::VALUES)?;
    let rows = parse_comma_separated(p, |p| {
        p.expect(T!['('])?;
        let elements = parse_comma_separated(p, parse_expr)?;
        p.expect(T![')'])?;
        Ok(p.list(ListKind::Expression, elements))
    })?;
    let rows = p.list(ListKind::Row, rows);
    Ok(p.push(Node::Values(ValuesStmt {
        with: None,
        rows,
        order: None,
        limit: None,
        offset: None,
        locking: None,
    })))
}

/// `TABLE name` is shorthand for `SELECT * FROM name`.
fn parse_table_sugar(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::TABLE)?;
    let inherit = if p.eat_kw(Kw::ONLY) { Some(false) } else { None };
    let name = parse_qualified_name(p)?;
    let inherit = if inherit.is_none() && p.eat(T![*]) {
        Some(true)
    } else {
        inherit
    };
    let relation = p.push(Node::RelationReference(RelationReference {
        name,
        inherit,
        alias: None,
        column_aliases: None,
    }));
    let from = p.list(ListKind::From, vec![relation]);
    let star = p.push(Node::Star);
    let column = p.push(Node::ColumnReference(ColumnReference { parts: vec![star] }));
    let target = p.push(Node::TargetElement(TargetElement {
        expression: column,
        alias: None,
    }));
    let targets = p.list(ListKind::Target, vec![target]);
    Ok(p.push(Node::Select(SelectStmt {
        with: None,
        distinct: None,
        targets: Some(targets),
        from: Some(from),
        where_clause: None,
        group: None,
        having: None,
        window: None,
        order: None,
        limit: None,
        offset: None,
        locking: None,
    })))
}

// ---------------------------------------------------------------------
// WITH

pub(crate) fn parse_with_clause(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::WITH)?;
    let recursive = p.eat_kw(Kw::RECURSIVE);
    let ctes = parse_comma_separated(p, parse_common_table_expression)?;
    let ctes = p.list(ListKind::Cte, ctes);
    Ok(p.push(Node::WithClause(WithClause { recursive, ctes })))
}

pub(crate) fn parse_common_table_expression(p: &mut Cursor) -> Result<NodeId> {
    let name = parse_col_id(p)?;
    let columns = if p.at(T!['(']) {
        Some(parse_name_list(p)?)
    } else {
        None
    };
    p.expect_kw(Kw::AS)?;
    p.expect(T!['('])?;
    let statement = super::parse_statement(p)?;
    p.expect(T![')'])?;
    Ok(p.push(Node::CommonTableExpression(CommonTableExpression {
        name,
        columns,
        statement,
    })))
}

fn attach_with(p: &mut Cursor, node: NodeId, with: NodeId) -> Result<()> {
    let position = p.position();
    let slot = match p.tree.node_mut(node) {
        Node::Select(n) => &mut n.with,
        Node::SetOpSelect(n) => &mut n.with,
        Node::Values(n) => &mut n.with,
        _ => return Err(Error::syntax(position, "WITH cannot attach here")),
    };
    if slot.is_some() {
        return Err(Error::syntax(position, "multiple WITH clauses not allowed"));
    }
    *slot = Some(with);
    p.tree.set_parent_of(with, Some(node));
    Ok(())
}

// ---------------------------------------------------------------------
// tail clauses

/// `ORDER BY`, `LIMIT`/`OFFSET`/`FETCH` (either order) and locking
/// clauses after the set-operation tree.
fn parse_select_tail(p: &mut Cursor, node: NodeId) -> Result<()> {
    if p.at_kw(Kw::ORDER) {
        p.bump();
        p.expect_kw(Kw::BY)?;
        let elements = parse_comma_separated(p, parse_order_by_element)?;
        let list = p.list(ListKind::OrderBy, elements);
        attach_tail(p, node, Tail::Order, list)?;
    }
    loop {
        match p.current().kind {
            TokenKind::Keyword(Kw::LIMIT) => {
                p.bump();
                if !p.eat_kw(Kw::ALL) {
                    let value = parse_expr(p)?;
                    attach_tail(p, node, Tail::Limit, value)?;
                }
            }
            TokenKind::Keyword(Kw::OFFSET) => {
                p.bump();
                let value = parse_expr(p)?;
                // the SQL:2008 spelling `OFFSET n ROWS`
                if !p.eat_kw(Kw::ROWS) {
                    p.eat_kw(Kw::ROW);
                }
                attach_tail(p, node, Tail::Offset, value)?;
            }
            TokenKind::Keyword(Kw::FETCH) => {
                p.bump();
                if !p.eat_kw(Kw::FIRST) && !p.eat_kw(Kw::NEXT) {
                    return Err(p.expected("FIRST or NEXT"));
                }
                let value = if p.at_kw(Kw::ROW) || p.at_kw(Kw::ROWS) {
                    p.push(Node::Constant(Constant {
                        kind: ConstKind::Integer,
                        value: "1".to_owned(),
                    }))
                } else {
                    parse_expr(p)?
                };
                if !p.eat_kw(Kw::ROWS) && !p.eat_kw(Kw::ROW) {
                    return Err(p.expected("ROW or ROWS"));
                }
                p.expect_kw(Kw::ONLY)?;
                attach_tail(p, node, Tail::Limit, value)?;
            }
            TokenKind::Keyword(Kw::FOR) => {
                let element = parse_locking_element(p)?;
                let list = match locking_list(p, node) {
                    Some(list) => list,
                    None => {
                        let list = p.list(ListKind::Locking, Vec::new());
                        attach_tail(p, node, Tail::Locking, list)?;
                        list
                    }
                };
                if let Node::List(l) = p.tree.node_mut(list) {
                    l.elements.push(element);
                }
                p.tree.set_parent_of(element, Some(list));
            }
            _ => break,
        }
    }
    Ok(())
}

enum Tail {
    Order,
    Limit,
    Offset,
    Locking,
}

impl Tail {
    fn name(&self) -> &'static str {
        match self {
            Tail::Order => "ORDER BY",
            Tail::Limit => "LIMIT",
            Tail::Offset => "OFFSET",
            Tail::Locking => "FOR locking",
        }
    }
}

fn attach_tail(p: &mut Cursor, node: NodeId, tail: Tail, value: NodeId) -> Result<()> {
    let position = p.position();
    let slot = match p.tree.node_mut(node) {
        Node::Select(n) => match tail {
            Tail::Order => &mut n.order,
            Tail::Limit => &mut n.limit,
            Tail::Offset => &mut n.offset,
            Tail::Locking => &mut n.locking,
        },
        Node::SetOpSelect(n) => match tail {
            Tail::Order => &mut n.order,
            Tail::Limit => &mut n.limit,
            Tail::Offset => &mut n.offset,
            Tail::Locking => &mut n.locking,
        },
        Node::Values(n) => match tail {
            Tail::Order => &mut n.order,
            Tail::Limit => &mut n.limit,
            Tail::Offset => &mut n.offset,
            Tail::Locking => &mut n.locking,
        },
        other => {
            let name = other.kind_name();
            return Err(Error::syntax(
                position,
                format!("{} cannot attach to {name}", tail.name()),
            ));
        }
    };
    if slot.is_some() {
        return Err(Error::syntax(
            position,
            format!("multiple {} clauses not allowed", tail.name()),
        ));
    }
    *slot = Some(value);
    p.tree.set_parent_of(value, Some(node));
    Ok(())
}

fn locking_list(p: &mut Cursor, node: NodeId) -> Option<NodeId> {
    match p.tree.node(node) {
        Node::Select(n) => n.locking,
        Node::SetOpSelect(n) => n.locking,
        Node::Values(n) => n.locking,
        _ => None,
    }
}

/// `FOR UPDATE/NO KEY UPDATE/SHARE/KEY SHARE [OF rel, ...]
/// [NOWAIT | SKIP LOCKED]`.
pub(crate) fn parse_locking_element(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::FOR)?;
    let strength = if p.eat_kw(Kw::UPDATE) {
        LockStrength::Update
    } else if p.eat_kw(Kw::NO) {
        p.expect_kw(Kw::KEY)?;
        p.expect_kw(Kw::UPDATE)?;
        LockStrength::NoKeyUpdate
    } else if p.eat_kw(Kw::SHARE) {
        LockStrength::Share
    } else if p.eat_kw(Kw::KEY) {
        p.expect_kw(Kw::SHARE)?;
        LockStrength::KeyShare
    } else {
        return Err(p.expected("UPDATE, NO KEY UPDATE, SHARE or KEY SHARE"));
    };
    let relations = if p.eat_kw(Kw::OF) {
        parse_comma_separated(p, parse_qualified_name)?
    } else {
        Vec::new()
    };
    let wait = if p.eat_kw(Kw::NOWAIT) {
        Some(LockWait::Nowait)
    } else if p.at_kw(Kw::SKIP) && p.nth_at_kw(1, Kw::LOCKED) {
        p.bump();
        p.bump();
        Some(LockWait::SkipLocked)
    } else {
        None
    };
    Ok(p.push(Node::LockingElement(LockingElement {
        strength,
        relations,
        wait,
    })))
}

// ---------------------------------------------------------------------
// ORDER BY and GROUP BY elements

pub(crate) fn parse_order_by_element(p: &mut Cursor) -> Result<NodeId> {
    let expression = parse_expr(p)?;
    let mut using_op = None;
    let direction = if p.eat_kw(Kw::ASC) {
        Some(SortDirection::Asc)
    } else if p.eat_kw(Kw::DESC) {
        Some(SortDirection::Desc)
    } else if p.eat_kw(Kw::USING) {
        let token = p.current().clone();
        match token.kind.op_text() {
            Some(op) => {
                p.bump();
                using_op = Some(op.to_owned());
            }
            None if token.kind == TokenKind::Op => {
                p.bump();
                using_op = Some(token.value);
            }
            None => return Err(p.expected("an operator")),
        }
        Some(SortDirection::Using)
    } else {
        None
    };
    let nulls = if p.eat_kw(Kw::NULLS) {
        if p.eat_kw(Kw::FIRST) {
            Some(NullsOrder::First)
        } else {
            p.expect_kw(Kw::LAST)?;
            Some(NullsOrder::Last)
        }
    } else {
        None
    };
    Ok(p.push(Node::OrderByElement(OrderByElement {
        expression,
        direction,
        using_op,
        nulls,
    })))
}

/// One element of `GROUP BY`: expression, `ROLLUP`/`CUBE`,
/// `GROUPING SETS` or the empty grouping set `()`.
pub(crate) fn parse_group_by_element(p: &mut Cursor) -> Result<NodeId> {
    match p.current().kind {
        TokenKind::Keyword(Kw::ROLLUP) => parse_cube_or_rollup(p, CubeOrRollup::Rollup),
        TokenKind::Keyword(Kw::CUBE) => parse_cube_or_rollup(p, CubeOrRollup::Cube),
        TokenKind::Keyword(Kw::GROUPING) if p.nth_at_kw(1, Kw::SETS) => {
            p.bump();
            p.bump();
            p.expect(T!['('])?;
            let sets = parse_comma_separated(p, parse_group_by_element)?;
            p.expect(T![')'])?;
            Ok(p.push(Node::GroupingSetsClause(GroupingSetsClause { sets })))
        }
        T!['('] if p.nth_at(1, T![')']) => {
            p.bump();
            p.bump();
            Ok(p.push(Node::EmptyGroupingSet))
        }
        _ => parse_expr(p),
    }
}

fn parse_cube_or_rollup(p: &mut Cursor, kind: CubeOrRollup) -> Result<NodeId> {
    p.bump();
    p.expect(T!['('])?;
    let arguments = parse_comma_separated(p, parse_expr)?;
    p.expect(T![')'])?;
    Ok(p.push(Node::CubeOrRollupClause(CubeOrRollupClause {
        kind,
        arguments,
    })))
}

// ---------------------------------------------------------------------
// windows

/// `name AS (spec)` in a `WINDOW` clause.
fn parse_named_window(p: &mut Cursor) -> Result<NodeId> {
    let name = parse_col_id(p)?;
    p.expect_kw(Kw::AS)?;
    let window = parse_window_specification(p)?;
    if let Node::WindowDefinition(w) = p.tree.node_mut(window) {
        w.name = Some(name);
    }
    p.tree.set_parent_of(name, Some(window));
    Ok(window)
}

/// A parenthesized window specification:
/// `([existing] [PARTITION BY ...] [ORDER BY ...] [frame])`.
pub(crate) fn parse_window_specification(p: &mut Cursor) -> Result<NodeId> {
    p.expect(T!['('])?;
    let ref_name = if at_col_id(p)
        && !matches!(
            p.current().kind,
            TokenKind::Keyword(Kw::PARTITION | Kw::ORDER | Kw::RANGE | Kw::ROWS)
        ) {
        Some(parse_col_id(p)?)
    } else {
        None
    };
    let partition = if p.at_kw(Kw::PARTITION) {
        p.bump();
        p.expect_kw(Kw::BY)?;
        let elements = parse_comma_separated(p, parse_expr)?;
        Some(p.list(ListKind::Expression, elements))
    } else {
        None
    };
    let order = if p.at_kw(Kw::ORDER) {
        p.bump();
        p.expect_kw(Kw::BY)?;
        let elements = parse_comma_separated(p, parse_order_by_element)?;
        Some(p.list(ListKind::OrderBy, elements))
    } else {
        None
    };
    let frame = parse_opt_frame_clause(p)?;
    p.expect(T![')'])?;
    Ok(p.push(Node::WindowDefinition(WindowDefinition {
        name: None,
        ref_name,
        partition,
        order,
        frame,
    })))
}

fn parse_opt_frame_clause(p: &mut Cursor) -> Result<Option<NodeId>> {
    let mode = if p.eat_kw(Kw::RANGE) {
        FrameMode::Range
    } else if p.eat_kw(Kw::ROWS) {
        FrameMode::Rows
    } else {
        return Ok(None);
    };
    let (start, end) = if p.eat_kw(Kw::BETWEEN) {
        let start = parse_frame_bound(p)?;
        p.expect_kw(Kw::AND)?;
        let end = parse_frame_bound(p)?;
        (start, Some(end))
    } else {
        (parse_frame_bound(p)?, None)
    };
    Ok(Some(p.push(Node::WindowFrameClause(WindowFrameClause {
        mode,
        start,
        end,
    }))))
}

fn parse_frame_bound(p: &mut Cursor) -> Result<NodeId> {
    let (kind, value) = if p.eat_kw(Kw::UNBOUNDED) {
        if p.eat_kw(Kw::PRECEDING) {
            (FrameBoundKind::UnboundedPreceding, None)
        } else {
            p.expect_kw(Kw::FOLLOWING)?;
            (FrameBoundKind::UnboundedFollowing, None)
        }
    } else if p.at_kw(Kw::CURRENT) {
        p.bump();
        p.expect_kw(Kw::ROW)?;
        (FrameBoundKind::CurrentRow, None)
    } else {
        let value = parse_expr(p)?;
        if p.eat_kw(Kw::PRECEDING) {
            (FrameBoundKind::Preceding, Some(value))
        } else {
            p.expect_kw(Kw::FOLLOWING)?;
            (FrameBoundKind::Following, Some(value))
        }
    };
    Ok(p.push(Node::WindowFrameBound(WindowFrameBound { kind, value })))
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
    fn parse_simple_selects() {
        assert_eq!(sql("SELECT 1"), "select 1");
        assert_eq!(sql("select all a, b AS x from t"), "select a, b as x from t");
        assert_eq!(
            sql("SELECT DISTINCT ON (a) a, b FROM t"),
            "select distinct on (a) a, b from t"
        );
        assert_eq!(sql("TABLE foo"), "select * from foo");
    }

    #[test]
    fn parse_set_operations() {
        assert_eq!(
            sql("select 1 union select 2 intersect select 3"),
            "select 1 union select 2 intersect select 3"
        );
        assert_eq!(
            sql("select 1 union (select 2 union all select 3)"),
            "select 1 union (select 2 union all select 3)"
        );
        assert_eq!(
            sql("(select 1 order by 1) union select 2"),
            "(select 1 order by 1) union select 2"
        );
    }

    #[test]
    fn parse_tail_clauses() {
        assert_eq!(
            sql("select a from t order by a desc nulls last limit 10 offset 5"),
            "select a from t order by a desc nulls last limit 10 offset 5"
        );
        assert_eq!(
            sql("select a from t offset 2 rows fetch first 5 rows only"),
            "select a from t limit 5 offset 2"
        );
        assert_eq!(sql("select a from t fetch next row only"), "select a from t limit 1");
        assert_eq!(
            sql("select * from t for no key update of t skip locked for share nowait"),
            "select * from t for no key update of t skip locked for share nowait"
        );
    }

    #[test]
    fn parse_grouping() {
        assert_eq!(
            sql("select a from t group by rollup (a), cube (a, b), ()"),
            "select a from t group by rollup(a), cube(a, b), ()"
        );
        assert_eq!(
            sql("select a from t group by grouping sets (a, (a, b), ())"),
            "select a from t group by grouping sets (a, (a, b), ())"
        );
        assert_eq!(
            sql("select a from t group by a having count(*) > 1"),
            "select a from t group by a having count(*) > 1"
        );
    }

    #[test]
    fn parse_window_clauses() {
        assert_eq!(
            sql("select count(*) over () from t"),
            "select count(*) over () from t"
        );
        assert_eq!(
            sql("select sum(a) over w from t window w as (partition by b order by c rows between 1 preceding and current row)"),
            "select sum(a) over w from t window w as (partition by b order by c rows between 1 preceding and current row)"
        );
        assert_eq!(
            sql("select first_value(a) over (w range unbounded preceding) from t window w as (order by a)"),
            "select first_value(a) over (w range unbounded preceding) from t window w as (order by a)"
        );
    }

    #[test]
    fn parse_with_clauses() {
        assert_eq!(
            sql("with x as (select 1) select * from x"),
            "with x as (select 1) select * from x"
        );
        assert_eq!(
            sql("with recursive t (n) as (select 1 union all select n + 1 from t) select n from t limit 3"),
            "with recursive t (n) as (select 1 union all select n + 1 from t) select n from t limit 3"
        );
        assert_eq!(
            sql("with d as (delete from t returning id) select * from d"),
            "with d as (delete from t returning id) select * from d"
        );
    }

    #[test]
    fn parse_values() {
        assert_eq!(
            sql("values (1, 'a'), (2, default)"),
            "values (1, 'a'), (2, default)"
        );
        assert_eq!(
            sql("values (1) union select 2"),
            "values (1) union select 2"
        );
    }

    #[test]
    fn reject_duplicate_tails() {
        let parser = Parser::default();
        let err = parser.parse_statement("select 1 limit 2 limit 3").unwrap_err();
        assert!(err.to_string().contains("multiple"), "{err}");
        assert!(parser.parse_statement("select 1 order by 1 order by 2").is_err());
        assert!(parser.parse_statement("select from from").is_err());
    }
}
