// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Query-building scenarios: splicing set operations into arbitrary
//! tree positions and growing conditions, with parent links intact
//! throughout.

use pg_ast_builder::ast::Node;
use pg_ast_builder::{NodeId, Parser, SqlBuilderOptions, SqlBuilderWalker, SyntaxTree};
use pretty_assertions::assert_eq;

fn parse(sql: &str) -> SyntaxTree {
    Parser::default().parse_statement(sql).unwrap()
}

fn print(tree: &SyntaxTree) -> String {
    let mut walker = SqlBuilderWalker::new(SqlBuilderOptions::compact());
    tree.sql(&mut walker).unwrap()
}

fn where_condition(tree: &SyntaxTree) -> NodeId {
    let clause = match tree.node(tree.root()) {
        Node::Select(n) => n.where_clause.expect("statement has a WHERE clause"),
        other => panic!("expected a Select, got {}", other.kind_name()),
    };
    match tree.node(clause) {
        Node::WhereOrHavingClause(c) => c.condition.expect("clause has a condition"),
        other => panic!("expected a WhereOrHavingClause, got {}", other.kind_name()),
    }
}

#[test]
fn union_all_after_parse() {
    let mut tree = parse("select * from foo");
    tree.union(tree.root(), "select * from bar", true).unwrap();
    tree.check_consistency().unwrap();
    assert_eq!(print(&tree), "select * from foo union all select * from bar");
}

#[test]
fn except_on_the_right_operand_gets_parenthesized() {
    let mut tree = parse("select * from foo intersect select * from bar");
    let right = match tree.node(tree.root()) {
        Node::SetOpSelect(n) => n.right,
        other => panic!("expected a SetOpSelect, got {}", other.kind_name()),
    };
    tree.except(right, "select * from baz", false).unwrap();
    tree.check_consistency().unwrap();
    assert_eq!(
        print(&tree),
        "select * from foo intersect (select * from bar except select * from baz)"
    );
}

#[test]
fn intersect_inside_a_range_subselect() {
    let mut tree = parse("select foo.* from (select * from foosource) as foo");
    let from = match tree.node(tree.root()) {
        Node::Select(n) => n.from.expect("statement has a FROM clause"),
        other => panic!("expected a Select, got {}", other.kind_name()),
    };
    let inner = match tree.node(tree.list_elements(from).unwrap()[0]) {
        Node::RangeSubselect(n) => n.statement,
        other => panic!("expected a RangeSubselect, got {}", other.kind_name()),
    };
    tree.intersect(inner, "select * from barsource", false)
        .unwrap();
    tree.check_consistency().unwrap();
    assert_eq!(
        print(&tree),
        "select foo.* from (select * from foosource intersect select * from barsource) as foo"
    );
}

#[test]
fn set_ops_inside_scalar_subqueries() {
    let mut tree = parse(
        "select * from foo where foo_id in (select id from bar) or foo_name > any(select baz_name from baz)",
    );
    let condition = where_condition(&tree);
    let (in_subquery, any_subquery) = match tree.node(condition) {
        Node::LogicalExpression(l) => {
            let in_subquery = match tree.node(l.terms[0]) {
                Node::InExpression(i) => i.right,
                other => panic!("expected an InExpression, got {}", other.kind_name()),
            };
            let comparison = match tree.node(l.terms[1]) {
                Node::OperatorExpression(o) => o.right.expect("binary operator"),
                other => panic!("expected an OperatorExpression, got {}", other.kind_name()),
            };
            let any_subquery = match tree.node(comparison) {
                Node::SubselectExpression(s) => s.statement,
                other => panic!("expected a SubselectExpression, got {}", other.kind_name()),
            };
            (in_subquery, any_subquery)
        }
        other => panic!("expected a LogicalExpression, got {}", other.kind_name()),
    };
    tree.union(in_subquery, "select id from quux", false).unwrap();
    tree.except(any_subquery, "select xyzzy_name from xyzzy", false)
        .unwrap();
    tree.check_consistency().unwrap();
    assert_eq!(
        print(&tree),
        "select * from foo where foo_id in (select id from bar union select id from quux) \
         or foo_name > any(select baz_name from baz except select xyzzy_name from xyzzy)"
    );
}

#[test]
fn spliced_nodes_change_parents_exactly_once() {
    let mut tree = parse("select * from foo");
    let old_root = tree.root();
    let first = tree.union(old_root, "select * from bar", false).unwrap();
    let second = tree.intersect(first, "select * from baz", false).unwrap();
    assert_eq!(tree.root(), second);
    assert_eq!(tree.parent(first), Some(second));
    assert_eq!(tree.parent(old_root), Some(first));
    tree.check_consistency().unwrap();
    // the union binds looser, so the left operand keeps its parentheses
    assert_eq!(
        print(&tree),
        "(select * from foo union select * from bar) intersect select * from baz"
    );
}
