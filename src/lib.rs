// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! PostgreSQL query parser, mutable AST and SQL builder.
//!
//! The pipeline: SQL text goes through the [`lexer`] into the
//! recursive descent parser ([`Parser`]), which builds a
//! [`SyntaxTree`] of typed nodes with parent back-links. The tree can
//! be inspected and rewritten (splicing set operations, growing
//! `WHERE` clauses, editing typed lists — raw SQL fragments included),
//! and the [`SqlBuilderWalker`] prints it back to SQL that re-parses
//! to the same tree, re-parenthesizing expressions from operator
//! precedence and associativity.
//!
//! ```
//! use pg_ast_builder::{Parser, SqlBuilderOptions, SqlBuilderWalker};
//!
//! let parser = Parser::default();
//! let mut tree = parser.parse_statement("select * from foo")?;
//! tree.union(tree.root(), "select * from bar", true)?;
//!
//! let mut printer = SqlBuilderWalker::new(SqlBuilderOptions::compact());
//! assert_eq!(
//!     tree.sql(&mut printer)?,
//!     "select * from foo union all select * from bar",
//! );
//! # Ok::<(), pg_ast_builder::Error>(())
//! ```
//!
//! Supported input is the `SELECT`/`INSERT`/`UPDATE`/`DELETE` surface
//! of PostgreSQL 9.4 through 10, including set operations, CTEs,
//! window clauses, `ON CONFLICT`, grouping sets and `XMLTABLE`. The
//! parser can apply either the pre-9.5 or the current operator
//! precedence rules ([`PrecedenceMode`]), and the printer can emit
//! parentheses that are safe on both ([`ParenthesesMode::Compat`]).

pub mod ast;
pub mod lexer;

mod error;
mod grammar;
mod precedence;
mod printer;
mod walker;

pub use ast::{Node, NodeId, SyntaxTree};
pub use error::{Error, Result};
pub use grammar::Parser;
pub use precedence::{ParserOptions, PrecedenceMode};
pub use printer::{ParenthesesMode, SqlBuilderOptions, SqlBuilderWalker};
pub use walker::Walker;
