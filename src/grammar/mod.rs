// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Recursive descent parsing of the PostgreSQL query grammar.
//!
//! One file per grammar area; every production is a
//! `parse_*(p: &mut Cursor) -> Result<NodeId>` function building nodes
//! into the tree the cursor borrows. The cursor is rewindable — a
//! handful of ambiguous productions (function call vs. type name with
//! modifiers) parse ahead and back out.

mod datatype;
mod dml;
mod expressions;
mod from_item;
mod select;
mod xml;

pub(crate) use datatype::*;
pub(crate) use dml::*;
pub(crate) use expressions::*;
pub(crate) use from_item::*;
pub(crate) use select::*;
pub(crate) use xml::*;

use text_size::TextSize;

use crate::ast::{Identifier, ListKind, Node, NodeId, NodeList, SyntaxTree};
use crate::error::{Error, Result};
use crate::lexer::{self, Keyword, Token, TokenKind};
use crate::precedence::{ParserOptions, PrecedenceMode};
use crate::T;

/// The reusable parser facade. One instance per precedence
/// configuration; individual parse calls share nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Parses one complete `SELECT`/`VALUES`/`INSERT`/`UPDATE`/`DELETE`
    /// statement, trailing semicolon allowed.
    pub fn parse_statement(&self, sql: &str) -> Result<SyntaxTree> {
        tracing::trace!(sql, "parse_statement");
        self.parse_root(sql, Fragment::Statement)
    }

    /// Parses a `SELECT`/`VALUES` statement (set operations included).
    pub fn parse_select_statement(&self, sql: &str) -> Result<SyntaxTree> {
        tracing::trace!(sql, "parse_select_statement");
        self.parse_root(sql, Fragment::SelectStatement)
    }

    /// Parses a scalar expression.
    pub fn parse_expression(&self, sql: &str) -> Result<SyntaxTree> {
        tracing::trace!(sql, "parse_expression");
        self.parse_root(sql, Fragment::Expression)
    }

    /// Parses a comma-separated expression list.
    pub fn parse_expression_list(&self, sql: &str) -> Result<SyntaxTree> {
        self.parse_root(sql, Fragment::ExpressionList)
    }

    /// Parses a comma-separated target list (`a, b as c`).
    pub fn parse_target_list(&self, sql: &str) -> Result<SyntaxTree> {
        self.parse_root(sql, Fragment::TargetList)
    }

    /// Parses a comma-separated `FROM` list.
    pub fn parse_from_list(&self, sql: &str) -> Result<SyntaxTree> {
        self.parse_root(sql, Fragment::FromList)
    }

    /// Parses a comma-separated `ORDER BY` list.
    pub fn parse_order_by_list(&self, sql: &str) -> Result<SyntaxTree> {
        self.parse_root(sql, Fragment::OrderByList)
    }

    /// Parses a window definition, parentheses included.
    pub fn parse_window_definition(&self, sql: &str) -> Result<SyntaxTree> {
        self.parse_root(sql, Fragment::WindowDefinition)
    }

    /// Parses one `SET` target (`col`, `col.field`, `col[1]`).
    pub fn parse_set_target_element(&self, sql: &str) -> Result<SyntaxTree> {
        self.parse_root(sql, Fragment::SetTargetElement)
    }

    /// Parses an `INSERT` column list.
    pub fn parse_insert_target_list(&self, sql: &str) -> Result<SyntaxTree> {
        self.parse_root(sql, Fragment::InsertTargetList)
    }

    /// Parses an `UPDATE .. SET` clause list.
    pub fn parse_set_clause_list(&self, sql: &str) -> Result<SyntaxTree> {
        self.parse_root(sql, Fragment::SetClauseList)
    }

    fn parse_root(&self, sql: &str, fragment: Fragment) -> Result<SyntaxTree> {
        let mut tree = SyntaxTree::with_options(self.options);
        let root = parse_fragment(&mut tree, self.options, sql, fragment)?;
        tree.set_root(root);
        Ok(tree)
    }
}

/// A sub-grammar entry point; what element-parseable lists and the
/// statement facade hand to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fragment {
    Statement,
    SelectStatement,
    Expression,
    ExpressionList,
    TargetElement,
    TargetList,
    FromItem,
    FromList,
    OrderByElement,
    OrderByList,
    GroupByElement,
    WindowDefinition,
    LockingElement,
    Cte,
    SetClause,
    SetClauseList,
    SetTargetElement,
    InsertTargetList,
    FunctionArgument,
}

impl Fragment {
    /// The fragment that parses one element of the given list kind.
    pub(crate) fn for_list(kind: ListKind) -> Self {
        match kind {
            ListKind::Expression => Self::Expression,
            ListKind::Target => Self::TargetElement,
            ListKind::From => Self::FromItem,
            ListKind::OrderBy => Self::OrderByElement,
            ListKind::GroupBy => Self::GroupByElement,
            ListKind::Window => Self::WindowDefinition,
            ListKind::Locking => Self::LockingElement,
            ListKind::Cte => Self::Cte,
            ListKind::SetClause => Self::SetClause,
            ListKind::SetTarget => Self::SetTargetElement,
            ListKind::Row => Self::ExpressionList,
            ListKind::FunctionArg => Self::FunctionArgument,
        }
    }
}

/// Parses `sql` as the given fragment into `tree`, returning the root
/// node of the fragment. Used by the facade above and by
/// element-parseable lists and mutation helpers on [`SyntaxTree`].
pub(crate) fn parse_fragment(
    tree: &mut SyntaxTree,
    options: ParserOptions,
    sql: &str,
    fragment: Fragment,
) -> Result<NodeId> {
    let mut p = Cursor::new(tree, sql, options.precedence)?;
    let node = match fragment {
        Fragment::Statement => {
            let node = parse_statement(&mut p)?;
            p.eat(T![;]);
            node
        }
        Fragment::SelectStatement => {
            let node = parse_select_statement(&mut p)?;
            p.eat(T![;]);
            node
        }
        Fragment::Expression => parse_expr(&mut p)?,
        Fragment::ExpressionList => {
            let elements = parse_comma_separated(&mut p, parse_expr)?;
            p.list(ListKind::Expression, elements)
        }
        Fragment::TargetElement => parse_target_element(&mut p)?,
        Fragment::TargetList => {
            let elements = parse_comma_separated(&mut p, parse_target_element)?;
            p.list(ListKind::Target, elements)
        }
        Fragment::FromItem => parse_from_item(&mut p)?,
        Fragment::FromList => {
            let elements = parse_comma_separated(&mut p, parse_from_item)?;
            p.list(ListKind::From, elements)
        }
        Fragment::OrderByElement => parse_order_by_element(&mut p)?,
        Fragment::OrderByList => {
            let elements = parse_comma_separated(&mut p, parse_order_by_element)?;
            p.list(ListKind::OrderBy, elements)
        }
        Fragment::GroupByElement => parse_group_by_element(&mut p)?,
        Fragment::WindowDefinition => parse_window_specification(&mut p)?,
        Fragment::LockingElement => parse_locking_element(&mut p)?,
        Fragment::Cte => parse_common_table_expression(&mut p)?,
        Fragment::SetClause => parse_set_clause(&mut p)?,
        Fragment::SetClauseList => {
            let elements = parse_comma_separated(&mut p, parse_set_clause)?;
            p.list(ListKind::SetClause, elements)
        }
        Fragment::SetTargetElement => parse_set_target_element(&mut p)?,
        Fragment::InsertTargetList => {
            let elements = parse_comma_separated(&mut p, parse_set_target_element)?;
            p.list(ListKind::SetTarget, elements)
        }
        Fragment::FunctionArgument => parse_function_argument(&mut p)?,
    };
    p.expect_eof()?;
    Ok(node)
}

/// Rewindable cursor over the cooked token stream, building nodes into
/// the borrowed tree.
pub(crate) struct Cursor<'t> {
    tokens: Vec<Token>,
    pos: usize,
    pub(crate) tree: &'t mut SyntaxTree,
    pub(crate) mode: PrecedenceMode,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(tree: &'t mut SyntaxTree, sql: &str, mode: PrecedenceMode) -> Result<Self> {
        let tokens = lexer::tokenize(sql)?;
        Ok(Self {
            tokens,
            pos: 0,
            tree,
            mode,
        })
    }

    pub(crate) fn current(&self) -> &Token {
        self.nth(0)
    }

    /// `n` tokens ahead, clamped to the end-of-input token.
    pub(crate) fn nth(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub(crate) fn at_kw(&self, kw: Keyword) -> bool {
        self.current().kind == TokenKind::Keyword(kw)
    }

    pub(crate) fn nth_at(&self, n: usize, kind: TokenKind) -> bool {
        self.nth(n).kind == kind
    }

    pub(crate) fn nth_at_kw(&self, n: usize, kw: Keyword) -> bool {
        self.nth(n).kind == TokenKind::Keyword(kw)
    }

    /// Consumes and returns the current token.
    pub(crate) fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_kw(&mut self, kw: Keyword) -> bool {
        if self.at_kw(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.expected(&token_kind_desc(kind)))
        }
    }

    pub(crate) fn expect_kw(&mut self, kw: Keyword) -> Result<Token> {
        if self.at_kw(kw) {
            Ok(self.bump())
        } else {
            Err(self.expected(kw.as_str()))
        }
    }

    pub(crate) fn expect_eof(&mut self) -> Result<()> {
        if self.at(T![EOF]) {
            Ok(())
        } else {
            Err(self.expected("end of input"))
        }
    }

    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    pub(crate) fn rewind(&mut self, mark: usize) {
        self.pos = mark;
    }

    pub(crate) fn position(&self) -> TextSize {
        self.current().position()
    }

    pub(crate) fn expected(&self, what: &str) -> Error {
        Error::syntax(
            self.position(),
            format!("expected {what}, found {}", token_desc(self.current())),
        )
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.tree.push(node)
    }

    /// A typed list stamped with this cursor's parser options.
    pub(crate) fn list(&mut self, kind: ListKind, elements: Vec<NodeId>) -> NodeId {
        let options = ParserOptions {
            precedence: self.mode,
        };
        self.tree
            .push(Node::List(NodeList::new(kind, elements, Some(options))))
    }

    pub(crate) fn identifier(&mut self, value: impl Into<String>) -> NodeId {
        self.push(Node::Identifier(Identifier {
            value: value.into(),
        }))
    }
}

fn token_desc(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_owned(),
        TokenKind::Keyword(kw) => kw.as_str().to_owned(),
        TokenKind::Ident | TokenKind::QuotedIdent => format!("identifier \"{}\"", token.value),
        _ => format!("\"{}\"", token.value),
    }
}

fn token_kind_desc(kind: TokenKind) -> String {
    match kind {
        TokenKind::Keyword(kw) => kw.as_str().to_owned(),
        TokenKind::Ident => "identifier".to_owned(),
        TokenKind::Eof => "end of input".to_owned(),
        other => match other.op_text() {
            Some(op) => format!("\"{op}\""),
            None => match other {
                TokenKind::LParen => "\"(\"".to_owned(),
                TokenKind::RParen => "\")\"".to_owned(),
                TokenKind::LBracket => "\"[\"".to_owned(),
                TokenKind::RBracket => "\"]\"".to_owned(),
                TokenKind::Comma => "\",\"".to_owned(),
                TokenKind::Semicolon => "\";\"".to_owned(),
                TokenKind::Dot => "\".\"".to_owned(),
                TokenKind::Typecast => "\"::\"".to_owned(),
                _ => format!("{other:?}"),
            },
        },
    }
}

pub(crate) fn parse_comma_separated<T>(
    p: &mut Cursor,
    mut item: impl FnMut(&mut Cursor) -> Result<T>,
) -> Result<Vec<T>> {
    let mut out = vec![item(p)?];
    while p.eat(T![,]) {
        out.push(item(p)?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------
// identifiers and names

/// `ColId`: identifier, unreserved keyword or column-name keyword.
pub(crate) fn parse_col_id(p: &mut Cursor) -> Result<NodeId> {
    match p.current().kind {
        TokenKind::Ident | TokenKind::QuotedIdent => {
            let token = p.bump();
            Ok(p.identifier(token.value))
        }
        TokenKind::Keyword(kw) if kw.is_col_id() => {
            let token = p.bump();
            Ok(p.identifier(token.value))
        }
        _ => Err(p.expected("identifier")),
    }
}

pub(crate) fn at_col_id(p: &Cursor) -> bool {
    matches!(
        p.current().kind,
        TokenKind::Ident | TokenKind::QuotedIdent
    ) || matches!(p.current().kind, TokenKind::Keyword(kw) if kw.is_col_id())
}

/// `ColLabel`: identifier or any keyword at all.
pub(crate) fn parse_col_label(p: &mut Cursor) -> Result<NodeId> {
    match p.current().kind {
        TokenKind::Ident | TokenKind::QuotedIdent | TokenKind::Keyword(_) => {
            let token = p.bump();
            Ok(p.identifier(token.value))
        }
        _ => Err(p.expected("identifier")),
    }
}

/// `type_function_name`: identifier, unreserved or type/function-name
/// keyword.
pub(crate) fn parse_type_function_name(p: &mut Cursor) -> Result<NodeId> {
    match p.current().kind {
        TokenKind::Ident | TokenKind::QuotedIdent => {
            let token = p.bump();
            Ok(p.identifier(token.value))
        }
        TokenKind::Keyword(kw) if kw.is_type_func_name() => {
            let token = p.bump();
            Ok(p.identifier(token.value))
        }
        _ => Err(p.expected("identifier")),
    }
}

/// Dotted name of up to three parts; the head is a `ColId`, later parts
/// are `ColLabel`s.
pub(crate) fn parse_qualified_name(p: &mut Cursor) -> Result<NodeId> {
    let first = parse_col_id(p)?;
    build_qualified(p, first)
}

/// Finishes a dotted name whose head identifier was already parsed.
pub(crate) fn build_qualified(p: &mut Cursor, first: NodeId) -> Result<NodeId> {
    let mut parts = vec![first];
    while p.at(T![.]) && !p.nth_at(1, T![*]) {
        p.bump();
        parts.push(parse_col_label(p)?);
    }
    qualified_from_parts(p, parts)
}

/// `(. attr_name)*` after an already-parsed head identifier.
pub(crate) fn parse_attr_name_chain(p: &mut Cursor, first: NodeId) -> Result<Vec<NodeId>> {
    let mut parts = vec![first];
    while p.at(T![.]) {
        p.bump();
        parts.push(parse_col_label(p)?);
    }
    Ok(parts)
}

pub(crate) fn qualified_from_parts(p: &mut Cursor, mut parts: Vec<NodeId>) -> Result<NodeId> {
    if parts.len() > 3 {
        return Err(Error::syntax(
            p.position(),
            "improper qualified name (too many dotted names)",
        ));
    }
    let relation = parts.pop().expect("at least one part");
    let schema = parts.pop();
    let catalog = parts.pop();
    Ok(p.push(Node::QualifiedName(crate::ast::QualifiedName {
        catalog,
        schema,
        relation,
    })))
}

/// Bare column alias name list: `(a, b, c)`.
pub(crate) fn parse_name_list(p: &mut Cursor) -> Result<Vec<NodeId>> {
    p.expect(T!['('])?;
    let names = parse_comma_separated(p, parse_col_id)?;
    p.expect(T![')'])?;
    Ok(names)
}

/// `[AS] alias [(col, ...)]`; without `AS` the alias must be a `ColId`.
pub(crate) fn parse_alias_clause(
    p: &mut Cursor,
) -> Result<(Option<NodeId>, Option<Vec<NodeId>>)> {
    let alias = if p.eat_kw(Keyword::AS) {
        Some(parse_col_id(p)?)
    } else if at_col_id(p) {
        Some(parse_col_id(p)?)
    } else {
        return Ok((None, None));
    };
    let columns = if p.at(T!['(']) {
        Some(parse_name_list(p)?)
    } else {
        None
    };
    Ok((alias, columns))
}
