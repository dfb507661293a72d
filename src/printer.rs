// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The SQL printer: a [`Walker`] that renders a tree back to SQL text
//! which re-parses, under the same precedence mode, to a structurally
//! equal tree.
//!
//! The load-bearing part is argument parenthesization: every operand
//! is wrapped exactly when the precedence/associativity rules require
//! it, under the 9.5+ tables (`Current`) or under both tables at once
//! (`Compat`, for output that is safe on either side of the 9.5
//! precedence change).

use crate::ast::*;
use crate::error::{Error, Result};
use crate::lexer::Keyword;
use crate::precedence::{operator_info, prec, Assoc, PrecedenceMode};
use crate::walker::Walker;

/// Which servers the emitted parentheses must be correct for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParenthesesMode {
    /// Valid on both pre-9.5 and current servers.
    Compat,
    /// Valid on 9.5 and later.
    #[default]
    Current,
}

#[derive(Debug, Clone)]
pub struct SqlBuilderOptions {
    /// One indentation level.
    pub indent: String,
    /// Separator between statement clauses; empty prints compact
    /// single-line SQL.
    pub linebreak: String,
    /// Soft line-length target for list joining.
    pub wrap: Option<usize>,
    pub parentheses: ParenthesesMode,
}

impl Default for SqlBuilderOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_owned(),
            linebreak: "\n".to_owned(),
            wrap: None,
            parentheses: ParenthesesMode::default(),
        }
    }
}

impl SqlBuilderOptions {
    /// Single-line output, no indentation.
    pub fn compact() -> Self {
        Self {
            indent: String::new(),
            linebreak: String::new(),
            wrap: None,
            ..Self::default()
        }
    }
}

/// The SQL-rendering walker.
#[derive(Debug, Default)]
pub struct SqlBuilderWalker {
    options: SqlBuilderOptions,
    depth: usize,
}

impl SqlBuilderWalker {
    pub fn new(options: SqlBuilderOptions) -> Self {
        Self { options, depth: 0 }
    }

    pub fn options(&self) -> &SqlBuilderOptions {
        &self.options
    }

    /// Renders the subtree under `id`.
    pub fn print(&mut self, tree: &SyntaxTree, id: NodeId) -> Result<String> {
        tree.dispatch(id, self)
    }

    fn pretty(&self) -> bool {
        !self.options.linebreak.is_empty()
    }

    /// Separator between statement clauses at the current depth.
    fn clause_sep(&self) -> String {
        if self.pretty() {
            format!("{}{}", self.options.linebreak, self.options.indent.repeat(self.depth))
        } else {
            " ".to_owned()
        }
    }

    /// Joins list items, breaking lines when a `wrap` width is set.
    /// Line breaks inside items reset the running width.
    fn implode(&self, sep: &str, items: &[String]) -> String {
        let Some(width) = self.options.wrap else {
            return items.join(sep);
        };
        if !self.pretty() {
            return items.join(sep);
        }
        let indent = self.options.indent.repeat(self.depth + 1);
        let break_sep = format!("{}{}{}", sep.trim_end(), self.options.linebreak, indent);
        let mut out = String::new();
        let mut line = 0usize;
        for (i, item) in items.iter().enumerate() {
            let first = item.split('\n').next().unwrap_or(item).len();
            if i > 0 {
                if line + sep.len() + first > width {
                    out.push_str(&break_sep);
                    line = indent.len();
                } else {
                    out.push_str(sep);
                    line += sep.len();
                }
            }
            out.push_str(item);
            match item.rsplit_once('\n') {
                Some((_, tail)) => line = tail.len(),
                None => line += item.len(),
            }
        }
        out
    }

    /// Renders a statement inside parentheses, one level deeper.
    fn embedded_statement(&mut self, tree: &SyntaxTree, id: NodeId) -> Result<String> {
        self.depth += 1;
        let body = self.print(tree, id);
        self.depth -= 1;
        let body = body?;
        if self.pretty() {
            let inner = self.options.indent.repeat(self.depth + 1);
            let outer = self.options.indent.repeat(self.depth);
            let lb = &self.options.linebreak;
            Ok(format!("({lb}{inner}{body}{lb}{outer})"))
        } else {
            Ok(format!("({body})"))
        }
    }

    // -----------------------------------------------------------------
    // precedence

    /// The precedence modes the configured parentheses must hold under.
    fn modes(&self) -> &'static [PrecedenceMode] {
        match self.options.parentheses {
            ParenthesesMode::Current => &[PrecedenceMode::Current],
            ParenthesesMode::Compat => &[PrecedenceMode::Current, PrecedenceMode::Pre95],
        }
    }

    fn expression_precedence(
        &self,
        tree: &SyntaxTree,
        id: NodeId,
        mode: PrecedenceMode,
    ) -> (u16, Assoc) {
        match tree.node(id) {
            Node::OperatorExpression(n) => operator_info(&n.op, n.left.is_none(), mode),
            Node::LogicalExpression(n) => match n.op {
                LogicalOp::And => (prec::AND, Assoc::Left),
                LogicalOp::Or => (prec::OR, Assoc::Left),
            },
            Node::BetweenExpression(_) => (prec::BETWEEN, Assoc::NonAssoc),
            Node::PatternMatchingExpression(_) => (prec::PATTERN, Assoc::NonAssoc),
            Node::InExpression(_) => (prec::IN, Assoc::NonAssoc),
            Node::IsOfExpression(_) => match mode {
                PrecedenceMode::Current => (prec::IS, Assoc::NonAssoc),
                PrecedenceMode::Pre95 => (prec::OLD_IS, Assoc::NonAssoc),
            },
            Node::CollateExpression(_) => (prec::COLLATE, Assoc::Left),
            Node::TypecastExpression(_) => (prec::TYPECAST, Assoc::Left),
            _ => (prec::ATOM, Assoc::Left),
        }
    }

    /// Prints `child` as an operand of `parent`, parenthesized when the
    /// active mode(s) require it.
    fn operand(
        &mut self,
        tree: &SyntaxTree,
        parent: NodeId,
        child: NodeId,
        side: Side,
    ) -> Result<String> {
        let text = self.print(tree, child)?;
        let mut wrap = false;
        for &mode in self.modes() {
            let (child_prec, _) = self.expression_precedence(tree, child, mode);
            let (parent_prec, parent_assoc) = match side {
                // BETWEEN bounds are b_expr; effectively typecast-level
                Side::Bound => (prec::TYPECAST, Assoc::NonAssoc),
                _ => self.expression_precedence(tree, parent, mode),
            };
            if needs_parentheses(child_prec, parent_prec, parent_assoc, side) {
                wrap = true;
            }
        }
        Ok(if wrap { format!("({text})") } else { text })
    }

    // -----------------------------------------------------------------
    // lexical rendering

    fn render_identifier(&self, value: &str) -> String {
        let mut chars = value.chars();
        let plain = match chars.next() {
            Some(c) if c.is_ascii_lowercase() || c == '_' => chars
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$'),
            _ => false,
        };
        if plain && Keyword::lookup(value).is_none() {
            value.to_owned()
        } else {
            format!("\"{}\"", value.replace('"', "\"\""))
        }
    }

    fn render_string(&self, value: &str) -> String {
        if !value.contains('\'') && !value.contains('\\') {
            return format!("'{value}'");
        }
        // dollar quoting; the tag must not collide with the content
        let mut n = 0usize;
        loop {
            let tag = if n == 0 {
                "$$".to_owned()
            } else {
                format!("$_{n}$")
            };
            let closes_early =
                format!("{value}{tag}").find(&tag) != Some(value.len());
            if !closes_early {
                return format!("{tag}{value}{tag}");
            }
            n += 1;
        }
    }

    fn ident_of(&self, tree: &SyntaxTree, id: NodeId) -> Result<String> {
        match tree.node(id) {
            Node::Identifier(n) => Ok(self.render_identifier(&n.value)),
            other => Err(Error::InvalidArgument(format!(
                "expected an Identifier, found {}",
                other.kind_name()
            ))),
        }
    }

    fn ident_list(&self, tree: &SyntaxTree, ids: &[NodeId]) -> Result<String> {
        let parts: Result<Vec<_>> = ids.iter().map(|id| self.ident_of(tree, *id)).collect();
        Ok(parts?.join(", "))
    }

    fn print_list(&mut self, tree: &SyntaxTree, ids: &[NodeId], sep: &str) -> Result<String> {
        let mut parts = Vec::with_capacity(ids.len());
        for id in ids {
            parts.push(self.print(tree, *id)?);
        }
        Ok(self.implode(sep, &parts))
    }

    fn elements_of(&self, tree: &SyntaxTree, id: NodeId) -> Result<Vec<NodeId>> {
        match tree.node(id) {
            Node::List(l) => Ok(l.elements.clone()),
            other => Err(Error::InvalidArgument(format!(
                "expected a list, found {}",
                other.kind_name()
            ))),
        }
    }

    fn list_items(&mut self, tree: &SyntaxTree, id: NodeId, sep: &str) -> Result<String> {
        let elements = self.elements_of(tree, id)?;
        self.print_list(tree, &elements, sep)
    }

    // -----------------------------------------------------------------
    // clause helpers

    fn alias_suffix(
        &mut self,
        tree: &SyntaxTree,
        alias: Option<NodeId>,
        columns: &Option<Vec<NodeId>>,
    ) -> Result<String> {
        let mut out = String::new();
        if let Some(alias) = alias {
            out.push_str(" as ");
            out.push_str(&self.ident_of(tree, alias)?);
        }
        if let Some(columns) = columns {
            if alias.is_none() {
                out.push_str(" as");
            }
            out.push_str(&format!(" ({})", self.ident_list(tree, columns)?));
        }
        Ok(out)
    }

    /// The shared `ORDER BY`/`LIMIT`/`OFFSET`/locking tail.
    fn select_tail_clauses(
        &mut self,
        tree: &SyntaxTree,
        order: Option<NodeId>,
        limit: Option<NodeId>,
        offset: Option<NodeId>,
        locking: Option<NodeId>,
        clauses: &mut Vec<String>,
    ) -> Result<()> {
        if let Some(order) = order {
            let items = self.list_items(tree, order, ", ")?;
            clauses.push(format!("order by {items}"));
        }
        if let Some(limit) = limit {
            let value = self.print(tree, limit)?;
            clauses.push(format!("limit {value}"));
        }
        if let Some(offset) = offset {
            let value = self.print(tree, offset)?;
            clauses.push(format!("offset {value}"));
        }
        if let Some(locking) = locking {
            for element in self.elements_of(tree, locking)? {
                clauses.push(self.print(tree, element)?);
            }
        }
        Ok(())
    }

    fn with_prefix(
        &mut self,
        tree: &SyntaxTree,
        with: Option<NodeId>,
        clauses: &mut Vec<String>,
    ) -> Result<()> {
        if let Some(with) = with {
            clauses.push(self.print(tree, with)?);
        }
        Ok(())
    }

    /// Parenthesization of set-operation operands: the left side needs
    /// parentheses when it carries tail clauses or binds looser; the
    /// right side also when it binds equally (set ops associate left).
    fn set_op_operand(
        &mut self,
        tree: &SyntaxTree,
        operand: NodeId,
        parent_prec: u8,
        right_side: bool,
    ) -> Result<String> {
        let own = set_op_precedence(tree, operand);
        let needs = select_has_tail(tree, operand)
            || own < parent_prec
            || (right_side && own == parent_prec);
        if needs {
            self.embedded_statement(tree, operand)
        } else {
            self.print(tree, operand)
        }
    }

    fn function_name(&mut self, tree: &SyntaxTree, id: NodeId) -> Result<String> {
        if let Node::QualifiedName(n) = tree.node(id) {
            if n.catalog.is_none() && n.schema.is_none() {
                if let Node::Identifier(ident) = tree.node(n.relation) {
                    // keyword-called functions print bare to keep their
                    // special parse path
                    if matches!(
                        ident.value.as_str(),
                        "coalesce" | "greatest" | "least" | "nullif" | "xmlconcat"
                    ) {
                        return Ok(ident.value.clone());
                    }
                }
            }
        }
        self.print(tree, id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    /// `BETWEEN` bound.
    Bound,
}

fn needs_parentheses(child: u16, parent: u16, parent_assoc: Assoc, side: Side) -> bool {
    if child < parent {
        return true;
    }
    match parent_assoc {
        Assoc::NonAssoc => child <= parent,
        Assoc::Right => side == Side::Left && child <= parent,
        Assoc::Left => matches!(side, Side::Right | Side::Bound) && child <= parent,
    }
}

/// `UNION`/`EXCEPT` bind looser than `INTERSECT`; anything else is an
/// atomic operand.
fn set_op_precedence(tree: &SyntaxTree, id: NodeId) -> u8 {
    match tree.node(id) {
        Node::SetOpSelect(n) => match n.op {
            SetOp::Union | SetOp::Except => 1,
            SetOp::Intersect => 2,
        },
        _ => 3,
    }
}

fn select_has_tail(tree: &SyntaxTree, id: NodeId) -> bool {
    match tree.node(id) {
        Node::Select(n) => {
            n.with.is_some()
                || n.order.is_some()
                || n.limit.is_some()
                || n.offset.is_some()
                || n.locking.is_some()
        }
        Node::SetOpSelect(n) => {
            n.with.is_some()
                || n.order.is_some()
                || n.limit.is_some()
                || n.offset.is_some()
                || n.locking.is_some()
        }
        Node::Values(n) => {
            n.with.is_some()
                || n.order.is_some()
                || n.limit.is_some()
                || n.offset.is_some()
                || n.locking.is_some()
        }
        _ => false,
    }
}

impl SyntaxTree {
    /// Renders the whole tree with the given printer.
    pub fn sql(&self, walker: &mut SqlBuilderWalker) -> Result<String> {
        walker.print(self, self.root())
    }
}

impl Walker for SqlBuilderWalker {
    type Output = Result<String>;

    fn walk_select(&mut self, tree: &SyntaxTree, _id: NodeId, node: &SelectStmt) -> Result<String> {
        let mut clauses = Vec::new();
        self.with_prefix(tree, node.with, &mut clauses)?;

        let mut head = "select".to_owned();
        if let Some(distinct) = &node.distinct {
            head.push_str(" distinct");
            if let Some(on) = distinct.on {
                let items = self.list_items(tree, on, ", ")?;
                head.push_str(&format!(" on ({items})"));
            }
        }
        if let Some(targets) = node.targets {
            let items = self.list_items(tree, targets, ", ")?;
            if !items.is_empty() {
                head.push(' ');
                head.push_str(&items);
            }
        }
        clauses.push(head);

        if let Some(from) = node.from {
            let items = self.list_items(tree, from, ", ")?;
            clauses.push(format!("from {items}"));
        }
        if let Some(where_clause) = node.where_clause {
            let condition = self.print(tree, where_clause)?;
            if !condition.is_empty() {
                clauses.push(format!("where {condition}"));
            }
        }
        if let Some(group) = node.group {
            let items = self.list_items(tree, group, ", ")?;
            clauses.push(format!("group by {items}"));
        }
        if let Some(having) = node.having {
            let condition = self.print(tree, having)?;
            if !condition.is_empty() {
                clauses.push(format!("having {condition}"));
            }
        }
        if let Some(window) = node.window {
            let items = self.list_items(tree, window, ", ")?;
            clauses.push(format!("window {items}"));
        }
        self.select_tail_clauses(tree, node.order, node.limit, node.offset, node.locking, &mut clauses)?;
        Ok(clauses.join(&self.clause_sep()))
    }

    fn walk_set_op_select(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &SetOpSelectStmt,
    ) -> Result<String> {
        let own = match node.op {
            SetOp::Union | SetOp::Except => 1,
            SetOp::Intersect => 2,
        };
        let mut clauses = Vec::new();
        self.with_prefix(tree, node.with, &mut clauses)?;
        clauses.push(self.set_op_operand(tree, node.left, own, false)?);
        let mut op = node.op.text().to_owned();
        if node.all {
            op.push_str(" all");
        }
        clauses.push(op);
        clauses.push(self.set_op_operand(tree, node.right, own, true)?);
        self.select_tail_clauses(tree, node.order, node.limit, node.offset, node.locking, &mut clauses)?;
        Ok(clauses.join(&self.clause_sep()))
    }

    fn walk_values(&mut self, tree: &SyntaxTree, _id: NodeId, node: &ValuesStmt) -> Result<String> {
        let mut clauses = Vec::new();
        self.with_prefix(tree, node.with, &mut clauses)?;
        let mut rows = Vec::new();
        for row in self.elements_of(tree, node.rows)? {
            let items = self.list_items(tree, row, ", ")?;
            rows.push(format!("({items})"));
        }
        clauses.push(format!("values {}", self.implode(", ", &rows)));
        self.select_tail_clauses(tree, node.order, node.limit, node.offset, node.locking, &mut clauses)?;
        Ok(clauses.join(&self.clause_sep()))
    }

    fn walk_insert(&mut self, tree: &SyntaxTree, _id: NodeId, node: &InsertStmt) -> Result<String> {
        let mut clauses = Vec::new();
        self.with_prefix(tree, node.with, &mut clauses)?;
        let mut head = format!("insert into {}", self.print(tree, node.target)?);
        if let Some(columns) = node.columns {
            let items = self.list_items(tree, columns, ", ")?;
            head.push_str(&format!(" ({items})"));
        }
        clauses.push(head);
        if let Some(overriding) = node.overriding {
            clauses.push(
                match overriding {
                    Overriding::System => "overriding system value",
                    Overriding::User => "overriding user value",
                }
                .to_owned(),
            );
        }
        match node.source {
            Some(source) => clauses.push(self.print(tree, source)?),
            None => clauses.push("default values".to_owned()),
        }
        if let Some(on_conflict) = node.on_conflict {
            clauses.push(self.print(tree, on_conflict)?);
        }
        if let Some(returning) = node.returning {
            let items = self.list_items(tree, returning, ", ")?;
            clauses.push(format!("returning {items}"));
        }
        Ok(clauses.join(&self.clause_sep()))
    }

    fn walk_update(&mut self, tree: &SyntaxTree, _id: NodeId, node: &UpdateStmt) -> Result<String> {
        let mut clauses = Vec::new();
        self.with_prefix(tree, node.with, &mut clauses)?;
        clauses.push(format!("update {}", self.print(tree, node.target)?));
        let items = self.list_items(tree, node.set, ", ")?;
        clauses.push(format!("set {items}"));
        if let Some(from) = node.from {
            let items = self.list_items(tree, from, ", ")?;
            clauses.push(format!("from {items}"));
        }
        if let Some(where_clause) = node.where_clause {
            let condition = self.print(tree, where_clause)?;
            if !condition.is_empty() {
                clauses.push(format!("where {condition}"));
            }
        }
        if let Some(returning) = node.returning {
            let items = self.list_items(tree, returning, ", ")?;
            clauses.push(format!("returning {items}"));
        }
        Ok(clauses.join(&self.clause_sep()))
    }

    fn walk_delete(&mut self, tree: &SyntaxTree, _id: NodeId, node: &DeleteStmt) -> Result<String> {
        let mut clauses = Vec::new();
        self.with_prefix(tree, node.with, &mut clauses)?;
        clauses.push(format!("delete from {}", self.print(tree, node.target)?));
        if let Some(using) = node.using {
            let items = self.list_items(tree, using, ", ")?;
            clauses.push(format!("using {items}"));
        }
        if let Some(where_clause) = node.where_clause {
            let condition = self.print(tree, where_clause)?;
            if !condition.is_empty() {
                clauses.push(format!("where {condition}"));
            }
        }
        if let Some(returning) = node.returning {
            let items = self.list_items(tree, returning, ", ")?;
            clauses.push(format!("returning {items}"));
        }
        Ok(clauses.join(&self.clause_sep()))
    }

    fn walk_with_clause(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &WithClause,
    ) -> Result<String> {
        let items = self.list_items(tree, node.ctes, ", ")?;
        if node.recursive {
            Ok(format!("with recursive {items}"))
        } else {
            Ok(format!("with {items}"))
        }
    }

    fn walk_common_table_expression(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &CommonTableExpression,
    ) -> Result<String> {
        let mut out = self.ident_of(tree, node.name)?;
        if let Some(columns) = &node.columns {
            out.push_str(&format!(" ({})", self.ident_list(tree, columns)?));
        }
        out.push_str(" as ");
        out.push_str(&self.embedded_statement(tree, node.statement)?);
        Ok(out)
    }

    fn walk_where_or_having_clause(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &WhereOrHavingClause,
    ) -> Result<String> {
        match node.condition {
            Some(condition) => self.print(tree, condition),
            None => Ok(String::new()),
        }
    }

    fn walk_on_conflict_clause(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &OnConflictClause,
    ) -> Result<String> {
        let mut out = "on conflict".to_owned();
        match &node.target {
            Some(ConflictTarget::IndexParameters(params)) => {
                out.push(' ');
                out.push_str(&self.print(tree, *params)?);
            }
            Some(ConflictTarget::Constraint(name)) => {
                out.push_str(" on constraint ");
                out.push_str(&self.ident_of(tree, *name)?);
            }
            None => {}
        }
        match node.action {
            OnConflictAction::Nothing => out.push_str(" do nothing"),
            OnConflictAction::Update => {
                out.push_str(" do update set ");
                let set = node.set.ok_or_else(|| {
                    Error::InvalidArgument("DO UPDATE without a SET list".into())
                })?;
                out.push_str(&self.list_items(tree, set, ", ")?);
                if let Some(condition) = node.condition {
                    out.push_str(" where ");
                    out.push_str(&self.print(tree, condition)?);
                }
            }
        }
        Ok(out)
    }

    fn walk_locking_element(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &LockingElement,
    ) -> Result<String> {
        let mut out = format!("for {}", node.strength.text());
        if !node.relations.is_empty() {
            let mut names = Vec::new();
            for relation in &node.relations {
                names.push(self.print(tree, *relation)?);
            }
            out.push_str(&format!(" of {}", names.join(", ")));
        }
        match node.wait {
            Some(LockWait::Nowait) => out.push_str(" nowait"),
            Some(LockWait::SkipLocked) => out.push_str(" skip locked"),
            None => {}
        }
        Ok(out)
    }

    fn walk_window_definition(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &WindowDefinition,
    ) -> Result<String> {
        let bare_ref = node.name.is_none()
            && node.partition.is_none()
            && node.order.is_none()
            && node.frame.is_none();
        if bare_ref {
            if let Some(ref_name) = node.ref_name {
                return self.ident_of(tree, ref_name);
            }
        }
        let mut parts = Vec::new();
        if let Some(ref_name) = node.ref_name {
            parts.push(self.ident_of(tree, ref_name)?);
        }
        if let Some(partition) = node.partition {
            parts.push(format!("partition by {}", self.list_items(tree, partition, ", ")?));
        }
        if let Some(order) = node.order {
            parts.push(format!("order by {}", self.list_items(tree, order, ", ")?));
        }
        if let Some(frame) = node.frame {
            parts.push(self.print(tree, frame)?);
        }
        let spec = format!("({})", parts.join(" "));
        match node.name {
            Some(name) => Ok(format!("{} as {spec}", self.ident_of(tree, name)?)),
            None => Ok(spec),
        }
    }

    fn walk_window_frame_clause(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &WindowFrameClause,
    ) -> Result<String> {
        let mode = match node.mode {
            FrameMode::Range => "range",
            FrameMode::Rows => "rows",
        };
        let start = self.print(tree, node.start)?;
        match node.end {
            Some(end) => {
                let end = self.print(tree, end)?;
                Ok(format!("{mode} between {start} and {end}"))
            }
            None => Ok(format!("{mode} {start}")),
        }
    }

    fn walk_window_frame_bound(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &WindowFrameBound,
    ) -> Result<String> {
        match node.kind {
            FrameBoundKind::UnboundedPreceding => Ok("unbounded preceding".to_owned()),
            FrameBoundKind::UnboundedFollowing => Ok("unbounded following".to_owned()),
            FrameBoundKind::CurrentRow => Ok("current row".to_owned()),
            FrameBoundKind::Preceding | FrameBoundKind::Following => {
                let value = node.value.ok_or_else(|| {
                    Error::InvalidArgument("frame bound without an offset value".into())
                })?;
                let value = self.print(tree, value)?;
                let direction = if node.kind == FrameBoundKind::Preceding {
                    "preceding"
                } else {
                    "following"
                };
                Ok(format!("{value} {direction}"))
            }
        }
    }

    fn walk_order_by_element(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &OrderByElement,
    ) -> Result<String> {
        let mut out = self.print(tree, node.expression)?;
        match node.direction {
            Some(SortDirection::Asc) => out.push_str(" asc"),
            Some(SortDirection::Desc) => out.push_str(" desc"),
            Some(SortDirection::Using) => {
                let op = node.using_op.as_deref().ok_or_else(|| {
                    Error::InvalidArgument("USING sort direction without an operator".into())
                })?;
                out.push_str(&format!(" using {op}"));
            }
            None => {}
        }
        match node.nulls {
            Some(NullsOrder::First) => out.push_str(" nulls first"),
            Some(NullsOrder::Last) => out.push_str(" nulls last"),
            None => {}
        }
        Ok(out)
    }

    fn walk_operator_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &OperatorExpression,
    ) -> Result<String> {
        match (node.left, node.right) {
            (Some(left), Some(right)) => {
                let left = self.operand(tree, id, left, Side::Left)?;
                let right = self.operand(tree, id, right, Side::Right)?;
                Ok(format!("{left} {} {right}", node.op))
            }
            (None, Some(right)) => {
                let right = self.operand(tree, id, right, Side::Right)?;
                Ok(format!("{} {right}", node.op))
            }
            (Some(left), None) => {
                let left = self.operand(tree, id, left, Side::Left)?;
                Ok(format!("{left} {}", node.op))
            }
            (None, None) => Err(Error::InvalidArgument(
                "operator expression without operands".into(),
            )),
        }
    }

    fn walk_logical_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &LogicalExpression,
    ) -> Result<String> {
        let op = match node.op {
            LogicalOp::And => " and ",
            LogicalOp::Or => " or ",
        };
        let mut parts = Vec::with_capacity(node.terms.len());
        for (i, term) in node.terms.iter().enumerate() {
            let side = if i == 0 { Side::Left } else { Side::Right };
            parts.push(self.operand(tree, id, *term, side)?);
        }
        if parts.is_empty() {
            return Err(Error::InvalidArgument(
                "logical expression without terms".into(),
            ));
        }
        Ok(self.implode(op, &parts))
    }

    fn walk_between_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &BetweenExpression,
    ) -> Result<String> {
        let argument = self.operand(tree, id, node.argument, Side::Left)?;
        let low = self.operand(tree, id, node.left, Side::Bound)?;
        let high = self.operand(tree, id, node.right, Side::Bound)?;
        Ok(format!("{argument} {} {low} and {high}", node.op))
    }

    fn walk_pattern_matching_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &PatternMatchingExpression,
    ) -> Result<String> {
        let argument = self.operand(tree, id, node.argument, Side::Left)?;
        let pattern = self.operand(tree, id, node.pattern, Side::Right)?;
        let mut out = format!("{argument} {} {pattern}", node.op);
        if let Some(escape) = node.escape {
            let escape = self.operand(tree, id, escape, Side::Right)?;
            out.push_str(&format!(" escape {escape}"));
        }
        Ok(out)
    }

    fn walk_in_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &InExpression,
    ) -> Result<String> {
        let argument = self.operand(tree, id, node.argument, Side::Left)?;
        let right = match tree.node(node.right) {
            Node::List(l) => {
                let items = self.print_list(tree, &l.elements.clone(), ", ")?;
                format!("({items})")
            }
            n if n.is_statement() => self.embedded_statement(tree, node.right)?,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "IN right-hand side cannot be {}",
                    other.kind_name()
                )))
            }
        };
        Ok(format!("{argument} {} {right}", node.op))
    }

    fn walk_is_of_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &IsOfExpression,
    ) -> Result<String> {
        let argument = self.operand(tree, id, node.argument, Side::Left)?;
        let types = self.print_list(tree, &node.types, ", ")?;
        let not = if node.not { "not " } else { "" };
        Ok(format!("{argument} is {not}of ({types})"))
    }

    fn walk_collate_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &CollateExpression,
    ) -> Result<String> {
        let argument = self.operand(tree, id, node.argument, Side::Left)?;
        let collation = self.print(tree, node.collation)?;
        Ok(format!("{argument} collate {collation}"))
    }

    fn walk_typecast_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &TypecastExpression,
    ) -> Result<String> {
        let argument = self.operand(tree, id, node.argument, Side::Left)?;
        let type_name = self.print(tree, node.type_name)?;
        Ok(format!("{argument}::{type_name}"))
    }

    fn walk_case_expression(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &CaseExpression,
    ) -> Result<String> {
        let mut out = "case".to_owned();
        if let Some(argument) = node.argument {
            out.push(' ');
            out.push_str(&self.print(tree, argument)?);
        }
        for when in &node.when_clauses {
            out.push(' ');
            out.push_str(&self.print(tree, *when)?);
        }
        if let Some(else_clause) = node.else_clause {
            out.push_str(" else ");
            out.push_str(&self.print(tree, else_clause)?);
        }
        out.push_str(" end");
        Ok(out)
    }

    fn walk_when_expression(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &WhenExpression,
    ) -> Result<String> {
        let when = self.print(tree, node.when)?;
        let then = self.print(tree, node.then)?;
        Ok(format!("when {when} then {then}"))
    }

    fn walk_function_expression(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &FunctionExpression,
    ) -> Result<String> {
        let name = self.function_name(tree, node.name)?;
        let mut args = String::new();
        if node.star {
            args.push('*');
        } else {
            if node.distinct {
                args.push_str("distinct ");
            }
            let mut parts = Vec::new();
            let elements = self.elements_of(tree, node.arguments)?;
            for (i, arg) in elements.iter().enumerate() {
                let mut text = self.print(tree, *arg)?;
                if node.variadic && i + 1 == elements.len() {
                    text = format!("variadic {text}");
                }
                parts.push(text);
            }
            args.push_str(&self.implode(", ", &parts));
            if let Some(order) = node.order {
                args.push_str(" order by ");
                args.push_str(&self.list_items(tree, order, ", ")?);
            }
        }
        let mut out = format!("{name}({args})");
        if let Some(within_group) = node.within_group {
            out.push_str(" within group (order by ");
            out.push_str(&self.list_items(tree, within_group, ", ")?);
            out.push(')');
        }
        if let Some(filter) = node.filter {
            out.push_str(" filter (where ");
            out.push_str(&self.print(tree, filter)?);
            out.push(')');
        }
        if let Some(over) = node.over {
            out.push_str(" over ");
            out.push_str(&self.print(tree, over)?);
        }
        Ok(out)
    }

    fn walk_function_call(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &FunctionCall,
    ) -> Result<String> {
        let name = self.function_name(tree, node.name)?;
        let args = self.list_items(tree, node.arguments, ", ")?;
        Ok(format!("{name}({args})"))
    }

    fn walk_named_function_argument(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &NamedFunctionArgument,
    ) -> Result<String> {
        let name = self.ident_of(tree, node.name)?;
        let value = self.print(tree, node.value)?;
        Ok(format!("{name} := {value}"))
    }

    fn walk_array_expression(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &ArrayExpression,
    ) -> Result<String> {
        let mut parts = Vec::with_capacity(node.elements.len());
        for element in &node.elements {
            // nested arrays drop the keyword
            let text = match tree.node(*element) {
                Node::ArrayExpression(_) => {
                    let inner = self.print(tree, *element)?;
                    inner
                        .strip_prefix("array")
                        .map(str::to_owned)
                        .unwrap_or(inner)
                }
                _ => self.print(tree, *element)?,
            };
            parts.push(text);
        }
        Ok(format!("array[{}]", self.implode(", ", &parts)))
    }

    fn walk_row_expression(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &RowExpression,
    ) -> Result<String> {
        let items = self.print_list(tree, &node.elements, ", ")?;
        if node.explicit || node.elements.len() < 2 {
            Ok(format!("row({items})"))
        } else {
            Ok(format!("({items})"))
        }
    }

    fn walk_subselect_expression(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &SubselectExpression,
    ) -> Result<String> {
        let inner = if tree.node(node.statement).is_statement() {
            self.embedded_statement(tree, node.statement)?
        } else {
            // ANY/ALL/SOME over an array expression
            format!("({})", self.print(tree, node.statement)?)
        };
        match node.op {
            Some(op) => Ok(format!("{}{inner}", op.text())),
            None => Ok(inner),
        }
    }

    fn walk_grouping_expression(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &GroupingExpression,
    ) -> Result<String> {
        let items = self.print_list(tree, &node.arguments, ", ")?;
        Ok(format!("grouping({items})"))
    }

    fn walk_set_to_default(&mut self, _tree: &SyntaxTree, _id: NodeId) -> Result<String> {
        Ok("default".to_owned())
    }

    fn walk_constant(&mut self, _tree: &SyntaxTree, _id: NodeId, node: &Constant) -> Result<String> {
        match node.kind {
            ConstKind::String => Ok(self.render_string(&node.value)),
            ConstKind::Bit => {
                if !node.value.starts_with('b') && !node.value.starts_with('x') {
                    return Err(Error::InvalidArgument(format!(
                        "malformed bit-string constant {:?}",
                        node.value
                    )));
                }
                let (prefix, digits) = node.value.split_at(1);
                Ok(format!("{prefix}'{digits}'"))
            }
            ConstKind::Integer | ConstKind::Float | ConstKind::Numeric => Ok(node.value.clone()),
            ConstKind::Bool => Ok(node.value.clone()),
            ConstKind::Null => Ok("null".to_owned()),
        }
    }

    fn walk_parameter(
        &mut self,
        _tree: &SyntaxTree,
        _id: NodeId,
        node: &Parameter,
    ) -> Result<String> {
        match &node.kind {
            ParameterKind::Positional(index) => Ok(format!("${index}")),
            ParameterKind::Named(name) => Ok(format!(":{name}")),
        }
    }

    fn walk_column_reference(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &ColumnReference,
    ) -> Result<String> {
        let mut parts = Vec::with_capacity(node.parts.len());
        for part in &node.parts {
            parts.push(match tree.node(*part) {
                Node::Star => "*".to_owned(),
                _ => self.ident_of(tree, *part)?,
            });
        }
        Ok(parts.join("."))
    }

    fn walk_indirection(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &Indirection,
    ) -> Result<String> {
        let base = self.print(tree, node.argument)?;
        let bare = match tree.node(node.argument) {
            Node::Parameter(_) | Node::SubselectExpression(_) => true,
            // an unparenthesized field chain would re-parse as part of
            // the column reference itself
            Node::ColumnReference(_) => matches!(
                node.items.first().map(|item| tree.node(*item)),
                Some(Node::ArrayIndexes(_))
            ),
            _ => false,
        };
        let mut out = if bare { base } else { format!("({base})") };
        for item in &node.items {
            match tree.node(*item) {
                Node::Star => out.push_str(".*"),
                Node::Identifier(_) => {
                    out.push('.');
                    out.push_str(&self.ident_of(tree, *item)?);
                }
                _ => out.push_str(&self.print(tree, *item)?),
            }
        }
        Ok(out)
    }

    fn walk_array_indexes(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &ArrayIndexes,
    ) -> Result<String> {
        if !node.slice {
            let upper = node.upper.ok_or_else(|| {
                Error::InvalidArgument("subscript without an index".into())
            })?;
            return Ok(format!("[{}]", self.print(tree, upper)?));
        }
        let lower = match node.lower {
            Some(lower) => self.print(tree, lower)?,
            None => String::new(),
        };
        let upper = match node.upper {
            Some(upper) => self.print(tree, upper)?,
            None => String::new(),
        };
        Ok(format!("[{lower}:{upper}]"))
    }

    fn walk_star(&mut self, _tree: &SyntaxTree, _id: NodeId) -> Result<String> {
        Ok("*".to_owned())
    }

    fn walk_sql_value_function(
        &mut self,
        _tree: &SyntaxTree,
        _id: NodeId,
        node: &SqlValueFunction,
    ) -> Result<String> {
        match node.precision {
            Some(precision) => Ok(format!("{}({precision})", node.function.text())),
            None => Ok(node.function.text().to_owned()),
        }
    }

    fn walk_identifier(
        &mut self,
        _tree: &SyntaxTree,
        _id: NodeId,
        node: &Identifier,
    ) -> Result<String> {
        Ok(self.render_identifier(&node.value))
    }

    fn walk_qualified_name(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &QualifiedName,
    ) -> Result<String> {
        let mut parts = Vec::new();
        if let Some(catalog) = node.catalog {
            parts.push(self.ident_of(tree, catalog)?);
        }
        if let Some(schema) = node.schema {
            parts.push(self.ident_of(tree, schema)?);
        }
        parts.push(self.ident_of(tree, node.relation)?);
        Ok(parts.join("."))
    }

    fn walk_type_name(&mut self, tree: &SyntaxTree, _id: NodeId, node: &TypeName) -> Result<String> {
        let mut out = self.print(tree, node.name)?;
        if let Some(modifiers) = node.modifiers {
            out.push_str(&format!("({})", self.list_items(tree, modifiers, ", ")?));
        }
        for bound in &node.bounds {
            match bound {
                Some(size) => out.push_str(&format!("[{size}]")),
                None => out.push_str("[]"),
            }
        }
        Ok(out)
    }

    fn walk_interval_type_name(
        &mut self,
        _tree: &SyntaxTree,
        _id: NodeId,
        node: &IntervalTypeName,
    ) -> Result<String> {
        let mut out = "interval".to_owned();
        if let Some(mask) = &node.mask {
            out.push(' ');
            out.push_str(mask);
        }
        if let Some(precision) = node.precision {
            out.push_str(&format!("({precision})"));
        }
        Ok(out)
    }

    fn walk_index_element(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &IndexElement,
    ) -> Result<String> {
        let expression = self.print(tree, node.expression)?;
        // a bare expression would swallow a following COLLATE on
        // re-parse
        let bare = node.collation.is_none()
            && matches!(
                tree.node(node.expression),
                Node::ColumnReference(_) | Node::FunctionExpression(_) | Node::FunctionCall(_)
            );
        let mut out = if bare {
            expression
        } else {
            format!("({expression})")
        };
        if let Some(collation) = node.collation {
            out.push_str(" collate ");
            out.push_str(&self.print(tree, collation)?);
        }
        if let Some(opclass) = node.opclass {
            out.push(' ');
            out.push_str(&self.print(tree, opclass)?);
        }
        match node.direction {
            Some(SortDirection::Asc) => out.push_str(" asc"),
            Some(SortDirection::Desc) => out.push_str(" desc"),
            _ => {}
        }
        match node.nulls {
            Some(NullsOrder::First) => out.push_str(" nulls first"),
            Some(NullsOrder::Last) => out.push_str(" nulls last"),
            None => {}
        }
        Ok(out)
    }

    fn walk_index_parameters(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &IndexParameters,
    ) -> Result<String> {
        let elements = self.print_list(tree, &node.elements, ", ")?;
        let mut out = format!("({elements})");
        if let Some(condition) = node.condition {
            out.push_str(" where ");
            out.push_str(&self.print(tree, condition)?);
        }
        Ok(out)
    }

    fn walk_relation_reference(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &RelationReference,
    ) -> Result<String> {
        let mut out = String::new();
        if node.inherit == Some(false) {
            out.push_str("only ");
        }
        out.push_str(&self.print(tree, node.name)?);
        if node.inherit == Some(true) {
            out.push_str(" *");
        }
        out.push_str(&self.alias_suffix(tree, node.alias, &node.column_aliases)?);
        Ok(out)
    }

    fn walk_range_function_call(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &RangeFunctionCall,
    ) -> Result<String> {
        let mut out = String::new();
        if node.lateral {
            out.push_str("lateral ");
        }
        out.push_str(&self.print(tree, node.function)?);
        if node.ordinality {
            out.push_str(" with ordinality");
        }
        if let Some(defs) = &node.column_definitions {
            let alias = match node.alias {
                Some(alias) => format!(" {}", self.ident_of(tree, alias)?),
                None => String::new(),
            };
            out.push_str(&format!(
                " as{alias} ({})",
                self.print_list(tree, defs, ", ")?
            ));
        } else {
            out.push_str(&self.alias_suffix(tree, node.alias, &node.column_aliases)?);
        }
        Ok(out)
    }

    fn walk_rows_from(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &RowsFrom,
    ) -> Result<String> {
        let mut out = String::new();
        if node.lateral {
            out.push_str("lateral ");
        }
        out.push_str(&format!(
            "rows from ({})",
            self.print_list(tree, &node.elements, ", ")?
        ));
        if node.ordinality {
            out.push_str(" with ordinality");
        }
        out.push_str(&self.alias_suffix(tree, node.alias, &node.column_aliases)?);
        Ok(out)
    }

    fn walk_rows_from_element(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &RowsFromElement,
    ) -> Result<String> {
        let mut out = self.print(tree, node.function)?;
        if let Some(defs) = &node.column_definitions {
            out.push_str(&format!(" as ({})", self.print_list(tree, defs, ", ")?));
        }
        Ok(out)
    }

    fn walk_join_expression(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &JoinExpression,
    ) -> Result<String> {
        let left = self.print(tree, node.left)?;
        let right = {
            let text = self.print(tree, node.right)?;
            // a join on the right re-associates; keep it grouped
            if matches!(tree.node(node.right), Node::JoinExpression(_)) {
                format!("({text})")
            } else {
                text
            }
        };
        let mut op = String::new();
        if node.natural {
            op.push_str("natural ");
        }
        op.push_str(match node.kind {
            JoinType::Cross => "cross join",
            JoinType::Inner => "join",
            JoinType::Left => "left join",
            JoinType::Right => "right join",
            JoinType::Full => "full join",
        });
        let mut out = format!("{left} {op} {right}");
        if let Some(columns) = &node.using_columns {
            out.push_str(&format!(" using ({})", self.ident_list(tree, columns)?));
        }
        if let Some(on) = node.on {
            out.push_str(" on ");
            out.push_str(&self.print(tree, on)?);
        }
        if let Some(alias) = node.alias {
            out = format!("({out}) as {}", self.ident_of(tree, alias)?);
        }
        Ok(out)
    }

    fn walk_range_subselect(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &RangeSubselect,
    ) -> Result<String> {
        let mut out = String::new();
        if node.lateral {
            out.push_str("lateral ");
        }
        out.push_str(&self.embedded_statement(tree, node.statement)?);
        out.push_str(&self.alias_suffix(tree, node.alias, &node.column_aliases)?);
        Ok(out)
    }

    fn walk_xml_table(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &XmlTable,
    ) -> Result<String> {
        let mut out = String::new();
        if node.lateral {
            out.push_str("lateral ");
        }
        out.push_str("xmltable(");
        if let Some(namespaces) = &node.namespaces {
            out.push_str(&format!(
                "xmlnamespaces({}), ",
                self.print_list(tree, namespaces, ", ")?
            ));
        }
        out.push_str(&self.print(tree, node.row_expression)?);
        out.push_str(" passing ");
        out.push_str(&self.print(tree, node.document_expression)?);
        out.push_str(" columns ");
        out.push_str(&self.print_list(tree, &node.columns, ", ")?);
        out.push(')');
        out.push_str(&self.alias_suffix(tree, node.alias, &node.column_aliases)?);
        Ok(out)
    }

    fn walk_table_sample(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &TableSample,
    ) -> Result<String> {
        let relation = self.print(tree, node.relation)?;
        let method = self.print(tree, node.method)?;
        let arguments = self.print_list(tree, &node.arguments, ", ")?;
        let mut out = format!("{relation} tablesample {method}({arguments})");
        if let Some(repeatable) = node.repeatable {
            out.push_str(&format!(" repeatable ({})", self.print(tree, repeatable)?));
        }
        Ok(out)
    }

    fn walk_insert_target(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &InsertTarget,
    ) -> Result<String> {
        let mut out = self.print(tree, node.relation)?;
        if let Some(alias) = node.alias {
            out.push_str(" as ");
            out.push_str(&self.ident_of(tree, alias)?);
        }
        Ok(out)
    }

    fn walk_update_or_delete_target(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &UpdateOrDeleteTarget,
    ) -> Result<String> {
        let mut out = String::new();
        if node.inherit == Some(false) {
            out.push_str("only ");
        }
        out.push_str(&self.print(tree, node.relation)?);
        if node.inherit == Some(true) {
            out.push_str(" *");
        }
        if let Some(alias) = node.alias {
            out.push_str(" as ");
            out.push_str(&self.ident_of(tree, alias)?);
        }
        Ok(out)
    }

    fn walk_column_definition(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &ColumnDefinition,
    ) -> Result<String> {
        let name = self.ident_of(tree, node.name)?;
        let type_name = self.print(tree, node.type_name)?;
        Ok(format!("{name} {type_name}"))
    }

    fn walk_target_element(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &TargetElement,
    ) -> Result<String> {
        let mut out = self.print(tree, node.expression)?;
        if let Some(alias) = node.alias {
            out.push_str(" as ");
            out.push_str(&self.ident_of(tree, alias)?);
        }
        Ok(out)
    }

    fn walk_set_target_element(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &SetTargetElement,
    ) -> Result<String> {
        let mut out = self.ident_of(tree, node.name)?;
        for item in &node.indirection {
            match tree.node(*item) {
                Node::Identifier(_) => {
                    out.push('.');
                    out.push_str(&self.ident_of(tree, *item)?);
                }
                _ => out.push_str(&self.print(tree, *item)?),
            }
        }
        Ok(out)
    }

    fn walk_single_set_clause(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &SingleSetClause,
    ) -> Result<String> {
        let target = self.print(tree, node.target)?;
        let value = self.print(tree, node.value)?;
        Ok(format!("{target} = {value}"))
    }

    fn walk_multiple_set_clause(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &MultipleSetClause,
    ) -> Result<String> {
        let targets = self.print_list(tree, &node.targets, ", ")?;
        let value = self.print(tree, node.value)?;
        Ok(format!("({targets}) = {value}"))
    }

    fn walk_xml_element(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &XmlElement,
    ) -> Result<String> {
        let mut parts = vec![format!("name {}", self.ident_of(tree, node.name)?)];
        if let Some(attributes) = &node.attributes {
            parts.push(format!(
                "xmlattributes({})",
                self.print_list(tree, attributes, ", ")?
            ));
        }
        for item in &node.content {
            parts.push(self.print(tree, *item)?);
        }
        Ok(format!("xmlelement({})", parts.join(", ")))
    }

    fn walk_xml_forest(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &XmlForest,
    ) -> Result<String> {
        Ok(format!(
            "xmlforest({})",
            self.print_list(tree, &node.elements, ", ")?
        ))
    }

    fn walk_xml_parse(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &XmlParse,
    ) -> Result<String> {
        let kind = match node.kind {
            XmlDocOrContent::Document => "document",
            XmlDocOrContent::Content => "content",
        };
        let argument = self.print(tree, node.argument)?;
        let whitespace = if node.preserve_whitespace {
            " preserve whitespace"
        } else {
            ""
        };
        Ok(format!("xmlparse({kind} {argument}{whitespace})"))
    }

    fn walk_xml_pi(&mut self, tree: &SyntaxTree, _id: NodeId, node: &XmlPi) -> Result<String> {
        let name = self.ident_of(tree, node.name)?;
        match node.content {
            Some(content) => {
                let content = self.print(tree, content)?;
                Ok(format!("xmlpi(name {name}, {content})"))
            }
            None => Ok(format!("xmlpi(name {name})")),
        }
    }

    fn walk_xml_root(&mut self, tree: &SyntaxTree, _id: NodeId, node: &XmlRoot) -> Result<String> {
        let argument = self.print(tree, node.argument)?;
        let version = match node.version {
            Some(version) => self.print(tree, version)?,
            None => "no value".to_owned(),
        };
        let mut out = format!("xmlroot({argument}, version {version}");
        match node.standalone {
            Some(XmlStandalone::Yes) => out.push_str(", standalone yes"),
            Some(XmlStandalone::No) => out.push_str(", standalone no"),
            Some(XmlStandalone::NoValue) => out.push_str(", standalone no value"),
            None => {}
        }
        out.push(')');
        Ok(out)
    }

    fn walk_xml_serialize(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &XmlSerialize,
    ) -> Result<String> {
        let kind = match node.kind {
            XmlDocOrContent::Document => "document",
            XmlDocOrContent::Content => "content",
        };
        let argument = self.print(tree, node.argument)?;
        let type_name = self.print(tree, node.type_name)?;
        Ok(format!("xmlserialize({kind} {argument} as {type_name})"))
    }

    fn walk_xml_namespace(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &XmlNamespace,
    ) -> Result<String> {
        let uri = self.print(tree, node.uri)?;
        match node.name {
            Some(name) => Ok(format!("{uri} as {}", self.ident_of(tree, name)?)),
            None => Ok(format!("default {uri}")),
        }
    }

    fn walk_xml_column_definition(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &XmlColumnDefinition,
    ) -> Result<String> {
        let mut out = self.ident_of(tree, node.name)?;
        if node.for_ordinality {
            out.push_str(" for ordinality");
            return Ok(out);
        }
        let type_name = node.type_name.ok_or_else(|| {
            Error::InvalidArgument("XMLTABLE column without a type".into())
        })?;
        out.push(' ');
        out.push_str(&self.print(tree, type_name)?);
        if let Some(path) = node.path {
            out.push_str(" path ");
            out.push_str(&self.print(tree, path)?);
        }
        if let Some(default) = node.default {
            out.push_str(" default ");
            out.push_str(&self.print(tree, default)?);
        }
        match node.not_null {
            Some(true) => out.push_str(" not null"),
            Some(false) => out.push_str(" null"),
            None => {}
        }
        Ok(out)
    }

    fn walk_empty_grouping_set(&mut self, _tree: &SyntaxTree, _id: NodeId) -> Result<String> {
        Ok("()".to_owned())
    }

    fn walk_cube_or_rollup_clause(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &CubeOrRollupClause,
    ) -> Result<String> {
        let kind = match node.kind {
            CubeOrRollup::Cube => "cube",
            CubeOrRollup::Rollup => "rollup",
        };
        let items = self.print_list(tree, &node.arguments, ", ")?;
        Ok(format!("{kind}({items})"))
    }

    fn walk_grouping_sets_clause(
        &mut self,
        tree: &SyntaxTree,
        _id: NodeId,
        node: &GroupingSetsClause,
    ) -> Result<String> {
        let items = self.print_list(tree, &node.sets, ", ")?;
        Ok(format!("grouping sets ({items})"))
    }

    fn walk_list(&mut self, tree: &SyntaxTree, _id: NodeId, node: &NodeList) -> Result<String> {
        self.print_list(tree, &node.elements.clone(), ", ")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::precedence::PrecedenceMode;
    use crate::{Parser, ParserOptions};

    fn print_with(tree: &SyntaxTree, options: SqlBuilderOptions) -> String {
        let mut walker = SqlBuilderWalker::new(options);
        tree.sql(&mut walker).unwrap()
    }

    fn sql(input: &str) -> String {
        let tree = Parser::default().parse_statement(input).unwrap();
        print_with(&tree, SqlBuilderOptions::compact())
    }

    fn expr(input: &str) -> String {
        let tree = Parser::default().parse_expression(input).unwrap();
        print_with(&tree, SqlBuilderOptions::compact())
    }

    #[test]
    fn reparenthesizes_from_the_tree_shape() {
        assert_eq!(expr("(1 + 2) * 3"), "(1 + 2) * 3");
        assert_eq!(expr("1 + 2 * 3"), "1 + 2 * 3");
        assert_eq!(expr("-(1 + 2)"), "- (1 + 2)");
        assert_eq!(expr("not (a or b)"), "not (a or b)");
        assert_eq!(expr("(a or b) and c"), "(a or b) and c");
        assert_eq!(expr("2 ^ (3 ^ 4)"), "2 ^ (3 ^ 4)");
        assert_eq!(expr("(2 ^ 3) ^ 4"), "2 ^ 3 ^ 4");
    }

    #[test]
    fn between_bounds_stay_b_expr() {
        assert_eq!(expr("a between 1 + 1 and 5"), "a between (1 + 1) and 5");
        assert_eq!(expr("a between 1 and 2::pg_catalog.int4"), "a between 1 and (2::pg_catalog.int4)");
    }

    #[test]
    fn is_tests_under_both_parenthesis_modes() {
        let tree = Parser::default().parse_statement("select 1 = 2 is null").unwrap();
        assert_eq!(print_with(&tree, SqlBuilderOptions::compact()), "select 1 = 2 is null");
        let compat = SqlBuilderOptions {
            parentheses: ParenthesesMode::Compat,
            ..SqlBuilderOptions::compact()
        };
        assert_eq!(print_with(&tree, compat), "select (1 = 2) is null");
    }

    #[test]
    fn pre95_trees_print_their_own_shape() {
        let parser = Parser::new(ParserOptions {
            precedence: PrecedenceMode::Pre95,
        });
        let tree = parser.parse_statement("select 1 = 2 is null").unwrap();
        // pre-9.5 bound the IS test tighter than `=`
        assert_eq!(
            print_with(&tree, SqlBuilderOptions::compact()),
            "select 1 = (2 is null)"
        );
    }

    #[test]
    fn identifiers_quote_keywords_and_case() {
        assert_eq!(
            sql(r#"select "SELECT", "select", foo, "foo" from t"#),
            r#"select "SELECT", "select", foo, foo from t"#
        );
        assert_eq!(sql(r#"select a from "my table""#), r#"select a from "my table""#);
    }

    #[test]
    fn constants_pick_safe_quoting() {
        assert_eq!(expr("'plain'"), "'plain'");
        assert_eq!(expr("'it''s'"), "$$it's$$");
        assert_eq!(expr(r"e'back\\slash'"), r"$$back\slash$$");
        assert_eq!(expr("$x$a$$b$x$"), "$_1$a$$b$_1$");
        assert_eq!(expr("b'01'"), "b'01'");
        assert_eq!(expr("3.5"), "3.5");
        assert_eq!(expr("null"), "null");
    }

    #[test]
    fn pretty_printing_breaks_clauses() {
        let tree = Parser::default()
            .parse_statement("select a from t where a = 1")
            .unwrap();
        assert_eq!(
            print_with(&tree, SqlBuilderOptions::default()),
            "select a\nfrom t\nwhere a = 1"
        );
    }

    #[test]
    fn pretty_printing_indents_subqueries() {
        let tree = Parser::default()
            .parse_statement("select a from (select a from t) as s")
            .unwrap();
        let options = SqlBuilderOptions {
            indent: "  ".to_owned(),
            ..SqlBuilderOptions::default()
        };
        assert_eq!(
            print_with(&tree, options),
            "select a\nfrom (\n  select a\n  from t\n) as s"
        );
    }

    #[test]
    fn wrap_keeps_lines_under_the_target() {
        let tree = Parser::default()
            .parse_statement("select aaaaaaaaaa, bbbbbbbbbb, cccccccccc from t")
            .unwrap();
        let options = SqlBuilderOptions {
            indent: "  ".to_owned(),
            wrap: Some(20),
            ..SqlBuilderOptions::default()
        };
        assert_eq!(
            print_with(&tree, options),
            "select aaaaaaaaaa,\n  bbbbbbbbbb,\n  cccccccccc\nfrom t"
        );
    }

    #[test]
    fn nested_arrays_drop_the_keyword() {
        assert_eq!(expr("array[[1, 2], [3, 4]]"), "array[[1, 2], [3, 4]]");
        assert_eq!(expr("array[1, 2]"), "array[1, 2]");
    }

    #[test]
    fn indirection_parenthesizes_non_atomic_bases() {
        assert_eq!(expr("($1).f"), "$1.f");
        assert_eq!(expr("(a.b).c"), "(a.b).c");
        assert_eq!(expr("(row(1, 2)).f"), "(row(1, 2)).f");
        assert_eq!(expr("a[1:2]"), "a[1:2]");
        assert_eq!(expr("a[:]"), "a[:]");
    }
}
