// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The abstract syntax tree: an arena of typed nodes with parent
//! back-links, plus the mutation helpers that let query builders
//! splice set operations and grow `WHERE` clauses without breaking
//! those links.
//!
//! Node ownership runs root-to-leaf through [`NodeId`] indices; the
//! back-links exist for navigation and invariant checking only. Nodes
//! that become unreachable through mutation or parser backtracking stay
//! in the arena as inert garbage and are freed with the tree.

mod nodes;

pub use nodes::*;

use crate::error::{Error, Result};
use crate::grammar::{self, Fragment};
use crate::precedence::ParserOptions;

/// Index of a node within its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
struct Entry {
    node: Node,
    parent: Option<NodeId>,
}

/// A parsed statement or fragment, together with every node it owns.
///
/// Trees are created by [`Parser`](crate::Parser) and carry the parser
/// options they were built with, so raw SQL spliced in later parses
/// under the same precedence mode.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SyntaxTree {
    entries: Vec<Entry>,
    root: NodeId,
    options: ParserOptions,
}

impl SyntaxTree {
    pub(crate) fn with_options(options: ParserOptions) -> Self {
        Self {
            entries: Vec::new(),
            root: NodeId(0),
            options,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.entries[id.index()].node
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.entries[id.index()].node
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).children()
    }

    /// Appends a node whose children were just created; their parent
    /// links are pointed at the new node.
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.entries.len() as u32);
        for child in node.children() {
            self.entries[child.index()].parent = Some(id);
        }
        self.entries.push(Entry { node, parent: None });
        id
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub(crate) fn set_parent_of(&mut self, child: NodeId, parent: Option<NodeId>) {
        self.entries[child.index()].parent = parent;
    }

    // -----------------------------------------------------------------
    // mutation

    /// Replaces the child `old` of `parent` with `new`, detaching `new`
    /// from wherever it was before.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Result<()> {
        if old == new {
            return Ok(());
        }
        // `new` must not be an ancestor of `parent`
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == new {
                return Err(Error::InvalidArgument(
                    "replacement would create a cycle".into(),
                ));
            }
            cursor = self.parent(id);
        }
        if !self.node(parent).children().contains(&old) {
            return Err(Error::InvalidArgument(format!(
                "{} has no such child to replace",
                self.node(parent).kind_name()
            )));
        }
        self.detach(new)?;
        self.node_mut(parent).replace_child(old, new);
        self.entries[old.index()].parent = None;
        self.entries[new.index()].parent = Some(parent);
        Ok(())
    }

    /// Unlinks `id` from its parent, if any. Fails when the parent's
    /// slot is grammatically required.
    fn detach(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.parent(id) else {
            return Ok(());
        };
        if !self.node_mut(parent).remove_child(id) {
            return Err(Error::InvalidArgument(format!(
                "cannot detach a required child of {}",
                self.node(parent).kind_name()
            )));
        }
        self.entries[id.index()].parent = None;
        Ok(())
    }

    /// `UNION [ALL]` with a freshly parsed right side; see
    /// [`splice_set_op`](Self::splice_set_op).
    pub fn union(&mut self, id: NodeId, sql: &str, all: bool) -> Result<NodeId> {
        let right = self.parse_select_fragment(sql)?;
        self.splice_set_op(id, SetOp::Union, all, right)
    }

    pub fn intersect(&mut self, id: NodeId, sql: &str, all: bool) -> Result<NodeId> {
        let right = self.parse_select_fragment(sql)?;
        self.splice_set_op(id, SetOp::Intersect, all, right)
    }

    pub fn except(&mut self, id: NodeId, sql: &str, all: bool) -> Result<NodeId> {
        let right = self.parse_select_fragment(sql)?;
        self.splice_set_op(id, SetOp::Except, all, right)
    }

    fn parse_select_fragment(&mut self, sql: &str) -> Result<NodeId> {
        let options = self.options;
        grammar::parse_fragment(self, options, sql, Fragment::SelectStatement)
    }

    /// Wraps the select-like node `id` into a new `SetOpSelect` with
    /// `right` as the other operand. The new node takes `id`'s place in
    /// its parent (or as the tree root) and is returned.
    pub fn splice_set_op(
        &mut self,
        id: NodeId,
        op: SetOp,
        all: bool,
        right: NodeId,
    ) -> Result<NodeId> {
        for operand in [id, right] {
            if !self.node(operand).is_select_common() {
                return Err(Error::InvalidArgument(format!(
                    "{} cannot be a set operation operand",
                    self.node(operand).kind_name()
                )));
            }
        }
        self.detach(right)?;
        let parent = self.parent(id);
        let set_op = self.push(Node::SetOpSelect(SetOpSelectStmt {
            with: None,
            op,
            all,
            left: id,
            right,
            order: None,
            limit: None,
            offset: None,
            locking: None,
        }));
        match parent {
            Some(parent) => {
                self.node_mut(parent).replace_child(id, set_op);
                self.entries[set_op.index()].parent = Some(parent);
            }
            None => {
                if self.root == id {
                    self.root = set_op;
                }
            }
        }
        Ok(set_op)
    }

    /// Adds `sql` to a [`WhereOrHavingClause`] condition under `AND`.
    pub fn where_and(&mut self, clause: NodeId, sql: &str) -> Result<NodeId> {
        let options = self.options;
        let expr = grammar::parse_fragment(self, options, sql, Fragment::Expression)?;
        self.grow_condition(clause, LogicalOp::And, expr)
    }

    /// Adds `sql` to a [`WhereOrHavingClause`] condition under `OR`.
    pub fn where_or(&mut self, clause: NodeId, sql: &str) -> Result<NodeId> {
        let options = self.options;
        let expr = grammar::parse_fragment(self, options, sql, Fragment::Expression)?;
        self.grow_condition(clause, LogicalOp::Or, expr)
    }

    /// Node-level version of [`where_and`](Self::where_and)/
    /// [`where_or`](Self::where_or): an absent condition is set
    /// directly, a logical expression of the same operator is appended
    /// to, anything else gets wrapped. Returns the id of the condition
    /// after the mutation.
    pub fn grow_condition(
        &mut self,
        clause: NodeId,
        op: LogicalOp,
        expr: NodeId,
    ) -> Result<NodeId> {
        let Node::WhereOrHavingClause(c) = self.node(clause) else {
            return Err(Error::InvalidArgument(format!(
                "cannot grow a condition on {}",
                self.node(clause).kind_name()
            )));
        };
        if !self.node(expr).is_scalar_expression() {
            return Err(Error::InvalidArgument(format!(
                "{} is not a scalar expression",
                self.node(expr).kind_name()
            )));
        }
        let current = c.condition;
        self.detach(expr)?;
        let condition = match current {
            None => {
                self.entries[expr.index()].parent = Some(clause);
                expr
            }
            Some(existing) => {
                let appended = match self.node_mut(existing) {
                    Node::LogicalExpression(l) if l.op == op => {
                        l.terms.push(expr);
                        true
                    }
                    _ => false,
                };
                if appended {
                    self.entries[expr.index()].parent = Some(existing);
                    return Ok(existing);
                }
                let combined = self.push(Node::LogicalExpression(LogicalExpression {
                    op,
                    terms: vec![existing, expr],
                }));
                self.entries[combined.index()].parent = Some(clause);
                combined
            }
        };
        if let Node::WhereOrHavingClause(c) = self.node_mut(clause) {
            c.condition = Some(condition);
        }
        Ok(condition)
    }

    // -----------------------------------------------------------------
    // list editing

    /// Creates an empty, detached list. A `parseable` list accepts raw
    /// SQL fragments as elements, parsed with this tree's options; a
    /// non-parseable one rejects them with
    /// [`Error::InvalidArgument`].
    pub fn new_list(&mut self, kind: ListKind, parseable: bool) -> NodeId {
        let parser = parseable.then_some(self.options);
        self.push(Node::List(NodeList::new(kind, Vec::new(), parser)))
    }

    fn list_kind(&self, list: NodeId) -> Result<ListKind> {
        match self.node(list) {
            Node::List(l) => Ok(l.kind),
            other => Err(Error::InvalidArgument(format!(
                "{} is not a list",
                other.kind_name()
            ))),
        }
    }

    fn check_list_element(&self, kind: ListKind, element: NodeId) -> Result<()> {
        if !kind.accepts(self.node(element)) {
            return Err(Error::InvalidArgument(format!(
                "{} cannot hold a {} element",
                kind.name(),
                self.node(element).kind_name()
            )));
        }
        Ok(())
    }

    pub fn list_len(&self, list: NodeId) -> Result<usize> {
        Ok(self.list_elements(list)?.len())
    }

    pub fn list_elements(&self, list: NodeId) -> Result<Vec<NodeId>> {
        match self.node(list) {
            Node::List(l) => Ok(l.elements.clone()),
            other => Err(Error::InvalidArgument(format!(
                "{} is not a list",
                other.kind_name()
            ))),
        }
    }

    /// Appends `element`, enforcing the list's element type.
    pub fn list_push(&mut self, list: NodeId, element: NodeId) -> Result<()> {
        let kind = self.list_kind(list)?;
        self.check_list_element(kind, element)?;
        self.detach(element)?;
        if let Node::List(l) = self.node_mut(list) {
            l.elements.push(element);
        }
        self.entries[element.index()].parent = Some(list);
        Ok(())
    }

    pub fn list_insert(&mut self, list: NodeId, index: usize, element: NodeId) -> Result<()> {
        let kind = self.list_kind(list)?;
        self.check_list_element(kind, element)?;
        if index > self.list_len(list)? {
            return Err(Error::InvalidArgument(format!(
                "index {index} out of bounds"
            )));
        }
        self.detach(element)?;
        if let Node::List(l) = self.node_mut(list) {
            l.elements.insert(index, element);
        }
        self.entries[element.index()].parent = Some(list);
        Ok(())
    }

    /// Replaces the element at `index`, returning the detached old one.
    pub fn list_replace(&mut self, list: NodeId, index: usize, element: NodeId) -> Result<NodeId> {
        let kind = self.list_kind(list)?;
        self.check_list_element(kind, element)?;
        if index >= self.list_len(list)? {
            return Err(Error::InvalidArgument(format!(
                "index {index} out of bounds"
            )));
        }
        self.detach(element)?;
        let old = match self.node_mut(list) {
            Node::List(l) => std::mem::replace(&mut l.elements[index], element),
            _ => unreachable!("checked by list_kind"),
        };
        self.entries[old.index()].parent = None;
        self.entries[element.index()].parent = Some(list);
        Ok(old)
    }

    /// Removes and returns the element at `index`.
    pub fn list_remove(&mut self, list: NodeId, index: usize) -> Result<NodeId> {
        if index >= self.list_len(list)? {
            return Err(Error::InvalidArgument(format!(
                "index {index} out of bounds"
            )));
        }
        let old = match self.node_mut(list) {
            Node::List(l) => l.elements.remove(index),
            _ => unreachable!("checked by list_len"),
        };
        self.entries[old.index()].parent = None;
        Ok(old)
    }

    /// Parses `sql` as an element of the list's kind and appends it.
    /// Only lists stamped with parser options can do this.
    pub fn list_push_sql(&mut self, list: NodeId, sql: &str) -> Result<NodeId> {
        let element = self.parse_list_element(list, sql)?;
        self.list_push(list, element)?;
        Ok(element)
    }

    /// Parses `sql` and replaces the element at `index` with it.
    pub fn list_replace_sql(&mut self, list: NodeId, index: usize, sql: &str) -> Result<NodeId> {
        let element = self.parse_list_element(list, sql)?;
        self.list_replace(list, index, element)?;
        Ok(element)
    }

    fn parse_list_element(&mut self, list: NodeId, sql: &str) -> Result<NodeId> {
        let (kind, options) = match self.node(list) {
            Node::List(l) => (l.kind, l.parser),
            other => {
                return Err(Error::InvalidArgument(format!(
                    "{} is not a list",
                    other.kind_name()
                )))
            }
        };
        let Some(options) = options else {
            return Err(Error::InvalidArgument(format!(
                "{} holds no parser, cannot accept raw SQL",
                kind.name()
            )));
        };
        grammar::parse_fragment(self, options, sql, Fragment::for_list(kind))
    }

    // -----------------------------------------------------------------
    // inspection

    /// Verifies the parent-link invariants over every node reachable
    /// from the root: each child points back at its parent, and no node
    /// is reached twice (single parent, acyclic).
    pub fn check_consistency(&self) -> Result<()> {
        let mut seen = vec![false; self.entries.len()];
        let mut stack = vec![self.root];
        seen[self.root.index()] = true;
        while let Some(id) = stack.pop() {
            for child in self.node(id).children() {
                if seen[child.index()] {
                    return Err(Error::InvalidArgument(format!(
                        "{} is reachable twice",
                        self.node(child).kind_name()
                    )));
                }
                seen[child.index()] = true;
                if self.parent(child) != Some(id) {
                    return Err(Error::InvalidArgument(format!(
                        "{} child of {} has a stale parent link",
                        self.node(child).kind_name(),
                        self.node(id).kind_name()
                    )));
                }
                stack.push(child);
            }
        }
        Ok(())
    }

    /// Indented structural dump of the subtree under `id`, used by
    /// snapshot tests and structural comparisons.
    pub fn dump_node(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    /// [`dump_node`](Self::dump_node) from the root.
    pub fn dump(&self) -> String {
        self.dump_node(self.root)
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(self.node(id).kind_name());
        if let Some(detail) = self.node(id).detail() {
            out.push(' ');
            out.push_str(&detail);
        }
        out.push('\n');
        for child in self.node(id).children() {
            self.dump_into(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Parser, SqlBuilderOptions, SqlBuilderWalker};
    use pretty_assertions::assert_eq;

    fn parse(sql: &str) -> SyntaxTree {
        Parser::default().parse_statement(sql).unwrap()
    }

    fn print(tree: &SyntaxTree) -> String {
        let mut walker = SqlBuilderWalker::new(SqlBuilderOptions::compact());
        tree.sql(&mut walker).unwrap()
    }

    fn target_list(tree: &SyntaxTree) -> NodeId {
        match tree.node(tree.root()) {
            Node::Select(n) => n.targets.unwrap(),
            other => panic!("expected a Select root, got {}", other.kind_name()),
        }
    }

    fn where_clause(tree: &SyntaxTree) -> NodeId {
        match tree.node(tree.root()) {
            Node::Select(n) => n.where_clause.unwrap(),
            other => panic!("expected a Select root, got {}", other.kind_name()),
        }
    }

    #[test]
    fn parents_point_back_at_their_children() {
        let tree = parse("select a, b + 1 from t join u on t.x = u.x where a > 0");
        tree.check_consistency().unwrap();
        for child in tree.children(tree.root()) {
            assert_eq!(tree.parent(child), Some(tree.root()));
        }
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn union_replaces_the_root() {
        let mut tree = parse("select * from foo");
        let old_root = tree.root();
        let set_op = tree.union(old_root, "select * from bar", true).unwrap();
        assert_eq!(tree.root(), set_op);
        assert_eq!(tree.parent(old_root), Some(set_op));
        tree.check_consistency().unwrap();
        assert_eq!(print(&tree), "select * from foo union all select * from bar");
    }

    #[test]
    fn where_or_grows_an_n_ary_chain() {
        let mut tree = parse("select * from t where a = 1");
        let clause = where_clause(&tree);
        tree.where_or(clause, "b = 2").unwrap();
        tree.where_or(clause, "c = 3").unwrap();
        assert_eq!(print(&tree), "select * from t where a = 1 or b = 2 or c = 3");
        tree.where_and(clause, "d = 4").unwrap();
        assert_eq!(
            print(&tree),
            "select * from t where (a = 1 or b = 2 or c = 3) and d = 4"
        );
        tree.check_consistency().unwrap();
    }

    #[test]
    fn typed_lists_reject_wrong_variants() {
        let mut tree = parse("select a from t");
        let targets = target_list(&tree);
        let relation = match tree.node(tree.root()) {
            Node::Select(n) => tree.list_elements(n.from.unwrap()).unwrap()[0],
            _ => unreachable!(),
        };
        let before = tree.list_len(targets).unwrap();
        let err = tree.list_push(targets, relation).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");
        assert_eq!(tree.list_len(targets).unwrap(), before);
        tree.check_consistency().unwrap();
    }

    #[test]
    fn element_parseable_lists_take_raw_sql() {
        let mut tree = parse("select a from t");
        let targets = target_list(&tree);
        tree.list_push_sql(targets, "b + 1 as c").unwrap();
        assert_eq!(print(&tree), "select a, b + 1 as c from t");
        tree.list_replace_sql(targets, 0, "42 as answer").unwrap();
        assert_eq!(print(&tree), "select 42 as answer, b + 1 as c from t");
        tree.check_consistency().unwrap();
    }

    #[test]
    fn lists_without_a_parser_reject_raw_sql() {
        let mut tree = parse("select a from t");
        let bare = tree.new_list(ListKind::Expression, false);
        let err = tree.list_push_sql(bare, "1 + 2").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");
        let parseable = tree.new_list(ListKind::Expression, true);
        tree.list_push_sql(parseable, "1 + 2").unwrap();
        assert_eq!(tree.list_len(parseable).unwrap(), 1);
    }

    #[test]
    fn replace_child_refuses_cycles() {
        let mut tree = parse("select * from t where a in (select b from u)");
        let clause = where_clause(&tree);
        let root = tree.root();
        let err = tree.replace_child(clause, tree.children(clause)[0], root);
        assert!(matches!(err, Err(Error::InvalidArgument(_))), "{err:?}");
    }

    #[test]
    fn list_editing_keeps_parent_links() {
        let mut tree = parse("select a, b, c from t");
        let targets = target_list(&tree);
        let removed = tree.list_remove(targets, 1).unwrap();
        assert_eq!(tree.parent(removed), None);
        assert_eq!(print(&tree), "select a, c from t");
        tree.list_insert(targets, 1, removed).unwrap();
        assert_eq!(tree.parent(removed), Some(targets));
        assert_eq!(print(&tree), "select a, b, c from t");
        tree.check_consistency().unwrap();
    }
}
