// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! `INSERT`, `UPDATE` and `DELETE` statements.

use crate::ast::*;
use crate::error::Result;
use crate::lexer::{Keyword as Kw, TokenKind};
use crate::T;

use super::{
    at_col_id, parse_col_id, parse_comma_separated, parse_expr, parse_from_item,
    parse_qualified_name, parse_select_statement, parse_target_element, Cursor,
};

pub(crate) fn parse_insert(p: &mut Cursor, with: Option<NodeId>) -> Result<NodeId> {
    p.expect_kw(Kw::INSERT)?;
    p.expect_kw(Kw::INTO)?;
    let relation = parse_qualified_name(p)?;
    let alias = if p.eat_kw(Kw::AS) {
        Some(parse_col_id(p)?)
    } else {
        None
    };
    let target = p.push(Node::InsertTarget(InsertTarget { relation, alias }));

    let columns = if p.at(T!['(']) && !at_select_start_behind(p) {
        p.bump();
        let elements = parse_comma_separated(p, parse_set_target_element)?;
        p.expect(T![')'])?;
        Some(p.list(ListKind::SetTarget, elements))
    } else {
        None
    };

    let overriding = if p.at_kw(Kw::OVERRIDING) {
        p.bump();
        let overriding = if p.eat_kw(Kw::SYSTEM) {
            Overriding::System
        } else {
            p.expect_kw(Kw::USER)?;
            Overriding::User
        };
        p.expect_kw(Kw::VALUE)?;
        Some(overriding)
    } else {
        None
    };

    let source = if p.at_kw(Kw::DEFAULT) && p.nth_at_kw(1, Kw::VALUES) {
        p.bump();
        p.bump();
        None
    } else {
        Some(parse_select_statement(p)?)
    };

    let on_conflict = if p.at_kw(Kw::ON) {
        p.bump();
        p.expect_kw(Kw::CONFLICT)?;
        Some(parse_on_conflict(p)?)
    } else {
        None
    };

    let returning = parse_opt_returning(p)?;

    Ok(p.push(Node::Insert(InsertStmt {
        with,
        target,
        columns,
        overriding,
        source,
        on_conflict,
        returning,
    })))
}

fn at_select_start_behind(p: &Cursor) -> bool {
    matches!(
        p.nth(1).kind,
        TokenKind::Keyword(Kw::SELECT | Kw::VALUES | Kw::WITH | Kw::TABLE)
    ) || p.nth_at(1, T!['('])
}

fn parse_on_conflict(p: &mut Cursor) -> Result<NodeId> {
    let target = if p.at(T!['(']) {
        let params = parse_index_parameters(p)?;
        Some(ConflictTarget::IndexParameters(params))
    } else if p.at_kw(Kw::ON) {
        p.bump();
        p.expect_kw(Kw::CONSTRAINT)?;
        let name = parse_col_id(p)?;
        Some(ConflictTarget::Constraint(name))
    } else {
        None
    };
    p.expect_kw(Kw::DO)?;
    let (action, set, condition) = if p.eat_kw(Kw::NOTHING) {
        (OnConflictAction::Nothing, None, None)
    } else {
        p.expect_kw(Kw::UPDATE)?;
        p.expect_kw(Kw::SET)?;
        let elements = parse_comma_separated(p, parse_set_clause)?;
        let set = p.list(ListKind::SetClause, elements);
        let condition = if p.eat_kw(Kw::WHERE) {
            Some(parse_expr(p)?)
        } else {
            None
        };
        (OnConflictAction::Update, Some(set), condition)
    };
    Ok(p.push(Node::OnConflictClause(OnConflictClause {
        target,
        action,
        set,
        condition,
    })))
}

/// `(index_elem, ...) [WHERE predicate]`.
fn parse_index_parameters(p: &mut Cursor) -> Result<NodeId> {
    p.expect(T!['('])?;
    let elements = parse_comma_separated(p, parse_index_element)?;
    p.expect(T![')'])?;
    let condition = if p.eat_kw(Kw::WHERE) {
        Some(parse_expr(p)?)
    } else {
        None
    };
    Ok(p.push(Node::IndexParameters(IndexParameters {
        elements,
        condition,
    })))
}

fn parse_index_element(p: &mut Cursor) -> Result<NodeId> {
    let expression = if p.at(T!['(']) {
        p.bump();
        let expression = parse_expr(p)?;
        p.expect(T![')'])?;
        expression
    } else {
        // a bare column or a windowless function call
        parse_expr(p)?
    };
    let collation = if p.eat_kw(Kw::COLLATE) {
        Some(parse_qualified_name(p)?)
    } else {
        None
    };
    let nulls_order_ahead = p.at_kw(Kw::NULLS)
        && (p.nth_at_kw(1, Kw::FIRST) || p.nth_at_kw(1, Kw::LAST));
    let opclass = if at_col_id(p) && !nulls_order_ahead {
        Some(parse_qualified_name(p)?)
    } else {
        None
    };
    let direction = if p.eat_kw(Kw::ASC) {
        Some(SortDirection::Asc)
    } else if p.eat_kw(Kw::DESC) {
        Some(SortDirection::Desc)
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
    Ok(p.push(Node::IndexElement(IndexElement {
        expression,
        collation,
        opclass,
        direction,
        nulls,
    })))
}

pub(crate) fn parse_update(p: &mut Cursor, with: Option<NodeId>) -> Result<NodeId> {
    p.expect_kw(Kw::UPDATE)?;
    let target = parse_update_or_delete_target(p)?;
    p.expect_kw(Kw::SET)?;
    let elements = parse_comma_separated(p, parse_set_clause)?;
    let set = p.list(ListKind::SetClause, elements);

    let from = if p.eat_kw(Kw::FROM) {
        let elements = parse_comma_separated(p, parse_from_item)?;
        Some(p.list(ListKind::From, elements))
    } else {
        None
    };
    let where_clause = parse_opt_where_clause(p)?;
    let returning = parse_opt_returning(p)?;

    Ok(p.push(Node::Update(UpdateStmt {
        with,
        target,
        set,
        from,
        where_clause,
        returning,
    })))
}

pub(crate) fn parse_delete(p: &mut Cursor, with: Option<NodeId>) -> Result<NodeId> {
    p.expect_kw(Kw::DELETE)?;
    p.expect_kw(Kw::FROM)?;
    let target = parse_update_or_delete_target(p)?;

    let using = if p.eat_kw(Kw::USING) {
        let elements = parse_comma_separated(p, parse_from_item)?;
        Some(p.list(ListKind::From, elements))
    } else {
        None
    };
    let where_clause = parse_opt_where_clause(p)?;
    let returning = parse_opt_returning(p)?;

    Ok(p.push(Node::Delete(DeleteStmt {
        with,
        target,
        using,
        where_clause,
        returning,
    })))
}

/// `[ONLY] name [*] [[AS] alias]`.
fn parse_update_or_delete_target(p: &mut Cursor) -> Result<NodeId> {
    let only = p.eat_kw(Kw::ONLY);
    let relation = parse_qualified_name(p)?;
    let inherit = if only {
        Some(false)
    } else if p.eat(T![*]) {
        Some(true)
    } else {
        None
    };
    let alias = if p.eat_kw(Kw::AS) {
        Some(parse_col_id(p)?)
    } else if at_col_id(p) && !p.at_kw(Kw::SET) {
        Some(parse_col_id(p)?)
    } else {
        None
    };
    Ok(p.push(Node::UpdateOrDeleteTarget(UpdateOrDeleteTarget {
        relation,
        alias,
        inherit,
    })))
}

fn parse_opt_where_clause(p: &mut Cursor) -> Result<Option<NodeId>> {
    if !p.eat_kw(Kw::WHERE) {
        return Ok(None);
    }
    let condition = parse_expr(p)?;
    Ok(Some(p.push(Node::WhereOrHavingClause(
        WhereOrHavingClause {
            condition: Some(condition),
        },
    ))))
}

fn parse_opt_returning(p: &mut Cursor) -> Result<Option<NodeId>> {
    if !p.eat_kw(Kw::RETURNING) {
        return Ok(None);
    }
    let elements = parse_comma_separated(p, parse_target_element)?;
    Ok(Some(p.list(ListKind::Target, elements)))
}

/// One `SET` assignment: `target = value` or `(targets) = row-or-sub`.
pub(crate) fn parse_set_clause(p: &mut Cursor) -> Result<NodeId> {
    if p.at(T!['(']) {
        p.bump();
        let targets = parse_comma_separated(p, parse_set_target_element)?;
        p.expect(T![')'])?;
        p.expect(T![=])?;
        let value = parse_expr(p)?;
        return Ok(p.push(Node::MultipleSetClause(MultipleSetClause {
            targets,
            value,
        })));
    }
    let target = parse_set_target_element(p)?;
    p.expect(T![=])?;
    let value = parse_expr(p)?;
    Ok(p.push(Node::SingleSetClause(SingleSetClause { target, value })))
}

/// Column with optional indirection, the left side of assignments and
/// `INSERT` column lists.
pub(crate) fn parse_set_target_element(p: &mut Cursor) -> Result<NodeId> {
    let name = parse_col_id(p)?;
    let mut indirection = Vec::new();
    loop {
        if p.at(T![.]) {
            p.bump();
            indirection.push(super::parse_col_label(p)?);
            continue;
        }
        if p.at(T!['[']) {
            indirection.push(super::parse_array_indexes(p)?);
            continue;
        }
        break;
    }
    Ok(p.push(Node::SetTargetElement(SetTargetElement {
        name,
        indirection,
    })))
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
    fn parse_insert() {
        assert_eq!(
            sql("INSERT INTO t (a, b) VALUES (1, DEFAULT)"),
            "insert into t (a, b) values (1, default)"
        );
        assert_eq!(
            sql("insert into t default values returning *"),
            "insert into t default values returning *"
        );
        assert_eq!(
            sql("insert into s.t as x (a[1], b.c) select * from u"),
            "insert into s.t as x (a[1], b.c) select * from u"
        );
        assert_eq!(
            sql("insert into t overriding system value select 1"),
            "insert into t overriding system value select 1"
        );
    }

    #[test]
    fn parse_on_conflict() {
        assert_eq!(
            sql("insert into t values (1) on conflict do nothing"),
            "insert into t values (1) on conflict do nothing"
        );
        assert_eq!(
            sql("insert into t values (1) on conflict on constraint t_pkey do nothing"),
            "insert into t values (1) on conflict on constraint t_pkey do nothing"
        );
        assert_eq!(
            sql("insert into t (a) values (1) on conflict (a desc nulls last) where a > 0 do update set a = excluded.a where t.a < excluded.a"),
            "insert into t (a) values (1) on conflict (a desc nulls last) where a > 0 do update set a = excluded.a where t.a < excluded.a"
        );
        assert_eq!(
            sql("insert into t values (1) on conflict ((lower(a)) collate \"C\" text_pattern_ops) do nothing"),
            "insert into t values (1) on conflict ((lower(a)) collate \"C\" text_pattern_ops) do nothing"
        );
    }

    #[test]
    fn parse_update() {
        assert_eq!(
            sql("update t set a = 1, (b, c) = (2, 3) where a > 0 returning a"),
            "update t set a = 1, (b, c) = (2, 3) where a > 0 returning a"
        );
        assert_eq!(
            sql("update only t x set a = default"),
            "update only t as x set a = default"
        );
        assert_eq!(
            sql("update t set (a, b) = (select 1, 2) from u where t.id = u.id"),
            "update t set (a, b) = (select 1, 2) from u where t.id = u.id"
        );
    }

    #[test]
    fn parse_delete() {
        assert_eq!(
            sql("delete from t using u where t.id = u.id returning t.*"),
            "delete from t using u where t.id = u.id returning t.*"
        );
        assert_eq!(sql("delete from only t as x"), "delete from only t as x");
    }

    #[test]
    fn reject_malformed_dml() {
        let parser = Parser::default();
        assert!(parser.parse_statement("insert t values (1)").is_err());
        assert!(parser.parse_statement("update t set").is_err());
        assert!(parser.parse_statement("delete t").is_err());
        assert!(parser
            .parse_statement("insert into t values (1) on conflict do replace")
            .is_err());
    }
}
