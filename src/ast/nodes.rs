// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The closed family of AST node variants.
//!
//! Child links are [`NodeId`] indices into the owning [`SyntaxTree`]
//! arena; the arena also maintains the parent back-links. Multiword
//! operators (`"not between symmetric"`, `"is distinct from"`, …) are
//! kept as the grammar's own strings rather than enums — they are
//! domain data shared between parser and printer.
//!
//! [`SyntaxTree`]: super::SyntaxTree

use crate::precedence::ParserOptions;

use super::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SetOp {
    Union,
    Intersect,
    Except,
}

impl SetOp {
    pub fn text(self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::Intersect => "intersect",
            Self::Except => "except",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum JoinType {
    Cross,
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SortDirection {
    Asc,
    Desc,
    /// `USING op`; the operator lives in [`OrderByElement::using_op`].
    Using,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FrameMode {
    Range,
    Rows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FrameBoundKind {
    UnboundedPreceding,
    Preceding,
    CurrentRow,
    Following,
    UnboundedFollowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LockStrength {
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

impl LockStrength {
    pub fn text(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::NoKeyUpdate => "no key update",
            Self::Share => "share",
            Self::KeyShare => "key share",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LockWait {
    Nowait,
    SkipLocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OnConflictAction {
    Nothing,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Overriding {
    System,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SubselectOp {
    Exists,
    Array,
    Any,
    All,
    Some,
}

impl SubselectOp {
    pub fn text(self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::Array => "array",
            Self::Any => "any",
            Self::All => "all",
            Self::Some => "some",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConstKind {
    String,
    /// Bit or hex; the value keeps its `b`/`x` prefix.
    Bit,
    Integer,
    Float,
    Numeric,
    Bool,
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParameterKind {
    Positional(u32),
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SqlValueFunctionName {
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    Localtime,
    Localtimestamp,
    CurrentRole,
    CurrentUser,
    SessionUser,
    User,
    CurrentCatalog,
    CurrentSchema,
}

impl SqlValueFunctionName {
    pub fn text(self) -> &'static str {
        match self {
            Self::CurrentDate => "current_date",
            Self::CurrentTime => "current_time",
            Self::CurrentTimestamp => "current_timestamp",
            Self::Localtime => "localtime",
            Self::Localtimestamp => "localtimestamp",
            Self::CurrentRole => "current_role",
            Self::CurrentUser => "current_user",
            Self::SessionUser => "session_user",
            Self::User => "user",
            Self::CurrentCatalog => "current_catalog",
            Self::CurrentSchema => "current_schema",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum XmlDocOrContent {
    Document,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum XmlStandalone {
    Yes,
    No,
    NoValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CubeOrRollup {
    Cube,
    Rollup,
}

/// `DISTINCT` / `DISTINCT ON (...)` on a `SELECT`. Plain `ALL` is the
/// absence of this clause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DistinctClause {
    /// `DISTINCT ON` expression list, if any.
    pub on: Option<NodeId>,
}

/// `ON CONFLICT` arbiter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConflictTarget {
    /// `(index_elems) [WHERE ...]` — an [`IndexParameters`] node.
    IndexParameters(NodeId),
    /// `ON CONSTRAINT name` — an [`Identifier`] node.
    Constraint(NodeId),
}

/// Element type restriction of a [`NodeList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ListKind {
    Expression,
    Target,
    From,
    OrderBy,
    GroupBy,
    Window,
    Locking,
    Cte,
    SetClause,
    SetTarget,
    /// `VALUES` rows; each element is an `Expression` list.
    Row,
    FunctionArg,
}

impl ListKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Expression => "ExpressionList",
            Self::Target => "TargetList",
            Self::From => "FromList",
            Self::OrderBy => "OrderByList",
            Self::GroupBy => "GroupByList",
            Self::Window => "WindowList",
            Self::Locking => "LockingList",
            Self::Cte => "CteList",
            Self::SetClause => "SetClauseList",
            Self::SetTarget => "SetTargetList",
            Self::Row => "RowList",
            Self::FunctionArg => "FunctionArgumentList",
        }
    }

    /// Whether `node` may be an element of a list of this kind.
    pub fn accepts(self, node: &Node) -> bool {
        match self {
            Self::Expression => node.is_scalar_expression(),
            Self::Target => matches!(node, Node::TargetElement(_)),
            Self::From => node.is_from_item(),
            Self::OrderBy => matches!(node, Node::OrderByElement(_)),
            Self::GroupBy => {
                node.is_scalar_expression()
                    || matches!(
                        node,
                        Node::EmptyGroupingSet
                            | Node::CubeOrRollupClause(_)
                            | Node::GroupingSetsClause(_)
                    )
            }
            Self::Window => matches!(node, Node::WindowDefinition(_)),
            Self::Locking => matches!(node, Node::LockingElement(_)),
            Self::Cte => matches!(node, Node::CommonTableExpression(_)),
            Self::SetClause => {
                matches!(node, Node::SingleSetClause(_) | Node::MultipleSetClause(_))
            }
            Self::SetTarget => matches!(node, Node::SetTargetElement(_)),
            Self::Row => matches!(node, Node::List(l) if l.kind == Self::Expression),
            Self::FunctionArg => {
                node.is_scalar_expression() || matches!(node, Node::NamedFunctionArgument(_))
            }
        }
    }
}

/// A homogeneous, ordered node list. Lists created by the parser are
/// stamped with its [`ParserOptions`] and can then ingest raw SQL
/// fragments as elements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeList {
    pub kind: ListKind,
    pub elements: Vec<NodeId>,
    pub parser: Option<ParserOptions>,
}

impl NodeList {
    pub fn new(kind: ListKind, elements: Vec<NodeId>, parser: Option<ParserOptions>) -> Self {
        Self {
            kind,
            elements,
            parser,
        }
    }
}

// ---------------------------------------------------------------------
// statements

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectStmt {
    pub with: Option<NodeId>,
    pub distinct: Option<DistinctClause>,
    pub targets: Option<NodeId>,
    pub from: Option<NodeId>,
    pub where_clause: Option<NodeId>,
    pub group: Option<NodeId>,
    pub having: Option<NodeId>,
    pub window: Option<NodeId>,
    pub order: Option<NodeId>,
    pub limit: Option<NodeId>,
    pub offset: Option<NodeId>,
    pub locking: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SetOpSelectStmt {
    pub with: Option<NodeId>,
    pub op: SetOp,
    pub all: bool,
    pub left: NodeId,
    pub right: NodeId,
    pub order: Option<NodeId>,
    pub limit: Option<NodeId>,
    pub offset: Option<NodeId>,
    pub locking: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValuesStmt {
    pub with: Option<NodeId>,
    pub rows: NodeId,
    pub order: Option<NodeId>,
    pub limit: Option<NodeId>,
    pub offset: Option<NodeId>,
    pub locking: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InsertStmt {
    pub with: Option<NodeId>,
    pub target: NodeId,
    pub columns: Option<NodeId>,
    pub overriding: Option<Overriding>,
    /// `None` means `DEFAULT VALUES`.
    pub source: Option<NodeId>,
    pub on_conflict: Option<NodeId>,
    pub returning: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UpdateStmt {
    pub with: Option<NodeId>,
    pub target: NodeId,
    pub set: NodeId,
    pub from: Option<NodeId>,
    pub where_clause: Option<NodeId>,
    pub returning: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeleteStmt {
    pub with: Option<NodeId>,
    pub target: NodeId,
    pub using: Option<NodeId>,
    pub where_clause: Option<NodeId>,
    pub returning: Option<NodeId>,
}

// ---------------------------------------------------------------------
// clauses

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WithClause {
    pub recursive: bool,
    pub ctes: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommonTableExpression {
    pub name: NodeId,
    pub columns: Option<Vec<NodeId>>,
    pub statement: NodeId,
}

/// Wrapper for `WHERE`/`HAVING` conditions so they can be grown with
/// [`SyntaxTree::where_and`]/[`SyntaxTree::where_or`].
///
/// [`SyntaxTree::where_and`]: super::SyntaxTree::where_and
/// [`SyntaxTree::where_or`]: super::SyntaxTree::where_or
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WhereOrHavingClause {
    pub condition: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OnConflictClause {
    pub target: Option<ConflictTarget>,
    pub action: OnConflictAction,
    pub set: Option<NodeId>,
    pub condition: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LockingElement {
    pub strength: LockStrength,
    pub relations: Vec<NodeId>,
    pub wait: Option<LockWait>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindowDefinition {
    /// Name when defined in a `WINDOW` clause (`WINDOW w AS (...)`).
    pub name: Option<NodeId>,
    /// Referenced window this one refines (`(w ORDER BY ...)`).
    pub ref_name: Option<NodeId>,
    pub partition: Option<NodeId>,
    pub order: Option<NodeId>,
    pub frame: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindowFrameClause {
    pub mode: FrameMode,
    pub start: NodeId,
    pub end: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindowFrameBound {
    pub kind: FrameBoundKind,
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OrderByElement {
    pub expression: NodeId,
    pub direction: Option<SortDirection>,
    pub using_op: Option<String>,
    pub nulls: Option<NullsOrder>,
}

// ---------------------------------------------------------------------
// scalar expressions

/// Unary prefix (`left` absent), unary postfix (`right` absent) or
/// binary operator application. The operator is kept as its grammar
/// string, e.g. `"+"`, `"is not distinct from"`, `"at time zone"`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OperatorExpression {
    pub op: String,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

/// N-ary `AND`/`OR`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LogicalExpression {
    pub op: LogicalOp,
    pub terms: Vec<NodeId>,
}

/// `a [NOT] BETWEEN [SYMMETRIC|ASYMMETRIC] x AND y`; the variant is in
/// the operator string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BetweenExpression {
    pub op: String,
    pub argument: NodeId,
    pub left: NodeId,
    pub right: NodeId,
}

/// `LIKE`/`ILIKE`/`SIMILAR TO` with optional `ESCAPE`, negated forms in
/// the operator string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PatternMatchingExpression {
    pub op: String,
    pub argument: NodeId,
    pub pattern: NodeId,
    pub escape: Option<NodeId>,
}

/// `a [NOT] IN (...)`; `right` is an expression list or a subselect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InExpression {
    pub op: String,
    pub argument: NodeId,
    pub right: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IsOfExpression {
    pub not: bool,
    pub argument: NodeId,
    pub types: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CollateExpression {
    pub argument: NodeId,
    pub collation: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypecastExpression {
    pub argument: NodeId,
    pub type_name: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CaseExpression {
    pub argument: Option<NodeId>,
    pub when_clauses: Vec<NodeId>,
    pub else_clause: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WhenExpression {
    pub when: NodeId,
    pub then: NodeId,
}

/// A function call in scalar position, carrying the aggregate/window
/// decorations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionExpression {
    pub name: NodeId,
    pub arguments: NodeId,
    /// `count(*)`.
    pub star: bool,
    pub distinct: bool,
    pub variadic: bool,
    /// `ORDER BY` inside the argument list.
    pub order: Option<NodeId>,
    pub within_group: Option<NodeId>,
    pub filter: Option<NodeId>,
    pub over: Option<NodeId>,
}

/// A plain function call, as used in range items (`FROM f(...)`,
/// `ROWS FROM`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionCall {
    pub name: NodeId,
    pub arguments: NodeId,
}

/// `name := value` / `name => value` function argument.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NamedFunctionArgument {
    pub name: NodeId,
    pub value: NodeId,
}

/// `ARRAY[...]`; nested arrays drop the keyword when printed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArrayExpression {
    pub elements: Vec<NodeId>,
}

/// `ROW(...)` or the parenthesized form `(a, b)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RowExpression {
    pub elements: Vec<NodeId>,
    /// Written with the `ROW` keyword.
    pub explicit: bool,
}

/// A parenthesized subquery in scalar position, optionally under
/// `EXISTS`/`ARRAY`/`ANY`/`ALL`/`SOME`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SubselectExpression {
    pub op: Option<SubselectOp>,
    pub statement: NodeId,
}

/// `GROUPING(...)` in a target list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupingExpression {
    pub arguments: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Constant {
    pub kind: ConstKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Parameter {
    pub kind: ParameterKind,
}

/// Possibly-qualified column reference; parts are [`Identifier`]s with
/// an optional trailing [`Node::Star`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnReference {
    pub parts: Vec<NodeId>,
}

/// Base expression followed by a chain of field selections and
/// subscripts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Indirection {
    pub argument: NodeId,
    pub items: Vec<NodeId>,
}

/// `[i]` or `[i:j]` subscript within an [`Indirection`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArrayIndexes {
    pub lower: Option<NodeId>,
    pub upper: Option<NodeId>,
    pub slice: bool,
}

/// `CURRENT_DATE`, `CURRENT_USER` and friends; printed in their bare
/// keyword form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SqlValueFunction {
    pub function: SqlValueFunctionName,
    pub precision: Option<u32>,
}

// ---------------------------------------------------------------------
// names and types

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Identifier {
    pub value: String,
}

/// Up to three-part qualified name (`catalog.schema.relation`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QualifiedName {
    pub catalog: Option<NodeId>,
    pub schema: Option<NodeId>,
    pub relation: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeName {
    pub name: NodeId,
    pub modifiers: Option<NodeId>,
    /// Array dimensions; `int[]` has one `None` bound.
    pub bounds: Vec<Option<u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IntervalTypeName {
    /// Field mask like `"day to second"`, when written.
    pub mask: Option<String>,
    pub precision: Option<u32>,
}

/// Column or expression within an `ON CONFLICT` arbiter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndexElement {
    pub expression: NodeId,
    pub collation: Option<NodeId>,
    pub opclass: Option<NodeId>,
    pub direction: Option<SortDirection>,
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndexParameters {
    pub elements: Vec<NodeId>,
    pub condition: Option<NodeId>,
}

// ---------------------------------------------------------------------
// range (FROM) items

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RelationReference {
    pub name: NodeId,
    /// `ONLY name` is `Some(false)`, `name *` is `Some(true)`.
    pub inherit: Option<bool>,
    pub alias: Option<NodeId>,
    pub column_aliases: Option<Vec<NodeId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RangeFunctionCall {
    pub function: NodeId,
    pub lateral: bool,
    pub ordinality: bool,
    pub alias: Option<NodeId>,
    pub column_aliases: Option<Vec<NodeId>>,
    /// `AS (col type, ...)` definitions for record-returning functions.
    pub column_definitions: Option<Vec<NodeId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RowsFrom {
    pub elements: Vec<NodeId>,
    pub lateral: bool,
    pub ordinality: bool,
    pub alias: Option<NodeId>,
    pub column_aliases: Option<Vec<NodeId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RowsFromElement {
    pub function: NodeId,
    pub column_definitions: Option<Vec<NodeId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct JoinExpression {
    pub kind: JoinType,
    pub natural: bool,
    pub left: NodeId,
    pub right: NodeId,
    pub using_columns: Option<Vec<NodeId>>,
    pub on: Option<NodeId>,
    /// Alias of a parenthesized join.
    pub alias: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RangeSubselect {
    pub statement: NodeId,
    pub lateral: bool,
    pub alias: Option<NodeId>,
    pub column_aliases: Option<Vec<NodeId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlTable {
    pub namespaces: Option<Vec<NodeId>>,
    pub row_expression: NodeId,
    pub document_expression: NodeId,
    pub columns: Vec<NodeId>,
    pub lateral: bool,
    pub alias: Option<NodeId>,
    pub column_aliases: Option<Vec<NodeId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableSample {
    pub relation: NodeId,
    pub method: NodeId,
    pub arguments: Vec<NodeId>,
    pub repeatable: Option<NodeId>,
}

/// `INSERT INTO` target relation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InsertTarget {
    pub relation: NodeId,
    pub alias: Option<NodeId>,
}

/// `UPDATE`/`DELETE FROM` target relation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UpdateOrDeleteTarget {
    pub relation: NodeId,
    pub alias: Option<NodeId>,
    pub inherit: Option<bool>,
}

/// `name type` in a range function column definition list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnDefinition {
    pub name: NodeId,
    pub type_name: NodeId,
}

// ---------------------------------------------------------------------
// target and set-clause elements

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TargetElement {
    pub expression: NodeId,
    pub alias: Option<NodeId>,
}

/// Column (with optional indirection) on the left side of `SET` or in
/// an `INSERT` column list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SetTargetElement {
    pub name: NodeId,
    pub indirection: Vec<NodeId>,
}

/// `SET col = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SingleSetClause {
    pub target: NodeId,
    pub value: NodeId,
}

/// `SET (a, b) = (...)` / `SET (a, b) = (subselect)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MultipleSetClause {
    pub targets: Vec<NodeId>,
    pub value: NodeId,
}

// ---------------------------------------------------------------------
// XML

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlElement {
    pub name: NodeId,
    /// `XMLATTRIBUTES(...)` content, `expr [AS name]` elements.
    pub attributes: Option<Vec<NodeId>>,
    pub content: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlForest {
    pub elements: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlParse {
    pub kind: XmlDocOrContent,
    pub argument: NodeId,
    pub preserve_whitespace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlPi {
    pub name: NodeId,
    pub content: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlRoot {
    pub argument: NodeId,
    /// `None` is `VERSION NO VALUE`.
    pub version: Option<NodeId>,
    pub standalone: Option<XmlStandalone>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlSerialize {
    pub kind: XmlDocOrContent,
    pub argument: NodeId,
    pub type_name: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlNamespace {
    pub uri: NodeId,
    /// Absent for `DEFAULT uri`.
    pub name: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlColumnDefinition {
    pub name: NodeId,
    pub for_ordinality: bool,
    pub type_name: Option<NodeId>,
    pub path: Option<NodeId>,
    pub default: Option<NodeId>,
    pub not_null: Option<bool>,
}

// ---------------------------------------------------------------------
// grouping

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CubeOrRollupClause {
    pub kind: CubeOrRollup,
    pub arguments: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupingSetsClause {
    pub sets: Vec<NodeId>,
}

// ---------------------------------------------------------------------
// the node family

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Node {
    // statements
    Select(SelectStmt),
    SetOpSelect(SetOpSelectStmt),
    Values(ValuesStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    // clauses
    WithClause(WithClause),
    CommonTableExpression(CommonTableExpression),
    WhereOrHavingClause(WhereOrHavingClause),
    OnConflictClause(OnConflictClause),
    LockingElement(LockingElement),
    WindowDefinition(WindowDefinition),
    WindowFrameClause(WindowFrameClause),
    WindowFrameBound(WindowFrameBound),
    OrderByElement(OrderByElement),
    // scalar expressions
    OperatorExpression(OperatorExpression),
    LogicalExpression(LogicalExpression),
    BetweenExpression(BetweenExpression),
    PatternMatchingExpression(PatternMatchingExpression),
    InExpression(InExpression),
    IsOfExpression(IsOfExpression),
    CollateExpression(CollateExpression),
    TypecastExpression(TypecastExpression),
    CaseExpression(CaseExpression),
    WhenExpression(WhenExpression),
    FunctionExpression(FunctionExpression),
    FunctionCall(FunctionCall),
    NamedFunctionArgument(NamedFunctionArgument),
    ArrayExpression(ArrayExpression),
    RowExpression(RowExpression),
    SubselectExpression(SubselectExpression),
    GroupingExpression(GroupingExpression),
    SetToDefault,
    Constant(Constant),
    Parameter(Parameter),
    ColumnReference(ColumnReference),
    Indirection(Indirection),
    ArrayIndexes(ArrayIndexes),
    Star,
    SqlValueFunction(SqlValueFunction),
    // names and types
    Identifier(Identifier),
    QualifiedName(QualifiedName),
    TypeName(TypeName),
    IntervalTypeName(IntervalTypeName),
    IndexElement(IndexElement),
    IndexParameters(IndexParameters),
    // range items
    RelationReference(RelationReference),
    RangeFunctionCall(RangeFunctionCall),
    RowsFrom(RowsFrom),
    RowsFromElement(RowsFromElement),
    JoinExpression(JoinExpression),
    RangeSubselect(RangeSubselect),
    XmlTable(XmlTable),
    TableSample(TableSample),
    InsertTarget(InsertTarget),
    UpdateOrDeleteTarget(UpdateOrDeleteTarget),
    ColumnDefinition(ColumnDefinition),
    // target and set-clause elements
    TargetElement(TargetElement),
    SetTargetElement(SetTargetElement),
    SingleSetClause(SingleSetClause),
    MultipleSetClause(MultipleSetClause),
    // XML
    XmlElement(XmlElement),
    XmlForest(XmlForest),
    XmlParse(XmlParse),
    XmlPi(XmlPi),
    XmlRoot(XmlRoot),
    XmlSerialize(XmlSerialize),
    XmlNamespace(XmlNamespace),
    XmlColumnDefinition(XmlColumnDefinition),
    // grouping
    EmptyGroupingSet,
    CubeOrRollupClause(CubeOrRollupClause),
    GroupingSetsClause(GroupingSetsClause),
    // lists
    List(NodeList),
}

impl Node {
    /// Variant name, used in dumps and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Select(_) => "Select",
            Node::SetOpSelect(_) => "SetOpSelect",
            Node::Values(_) => "Values",
            Node::Insert(_) => "Insert",
            Node::Update(_) => "Update",
            Node::Delete(_) => "Delete",
            Node::WithClause(_) => "WithClause",
            Node::CommonTableExpression(_) => "CommonTableExpression",
            Node::WhereOrHavingClause(_) => "WhereOrHavingClause",
            Node::OnConflictClause(_) => "OnConflictClause",
            Node::LockingElement(_) => "LockingElement",
            Node::WindowDefinition(_) => "WindowDefinition",
            Node::WindowFrameClause(_) => "WindowFrameClause",
            Node::WindowFrameBound(_) => "WindowFrameBound",
            Node::OrderByElement(_) => "OrderByElement",
            Node::OperatorExpression(_) => "OperatorExpression",
            Node::LogicalExpression(_) => "LogicalExpression",
            Node::BetweenExpression(_) => "BetweenExpression",
            Node::PatternMatchingExpression(_) => "PatternMatchingExpression",
            Node::InExpression(_) => "InExpression",
            Node::IsOfExpression(_) => "IsOfExpression",
            Node::CollateExpression(_) => "CollateExpression",
            Node::TypecastExpression(_) => "TypecastExpression",
            Node::CaseExpression(_) => "CaseExpression",
            Node::WhenExpression(_) => "WhenExpression",
            Node::FunctionExpression(_) => "FunctionExpression",
            Node::FunctionCall(_) => "FunctionCall",
            Node::NamedFunctionArgument(_) => "NamedFunctionArgument",
            Node::ArrayExpression(_) => "ArrayExpression",
            Node::RowExpression(_) => "RowExpression",
            Node::SubselectExpression(_) => "SubselectExpression",
            Node::GroupingExpression(_) => "GroupingExpression",
            Node::SetToDefault => "SetToDefault",
            Node::Constant(_) => "Constant",
            Node::Parameter(_) => "Parameter",
            Node::ColumnReference(_) => "ColumnReference",
            Node::Indirection(_) => "Indirection",
            Node::ArrayIndexes(_) => "ArrayIndexes",
            Node::Star => "Star",
            Node::SqlValueFunction(_) => "SqlValueFunction",
            Node::Identifier(_) => "Identifier",
            Node::QualifiedName(_) => "QualifiedName",
            Node::TypeName(_) => "TypeName",
            Node::IntervalTypeName(_) => "IntervalTypeName",
            Node::IndexElement(_) => "IndexElement",
            Node::IndexParameters(_) => "IndexParameters",
            Node::RelationReference(_) => "RelationReference",
            Node::RangeFunctionCall(_) => "RangeFunctionCall",
            Node::RowsFrom(_) => "RowsFrom",
            Node::RowsFromElement(_) => "RowsFromElement",
            Node::JoinExpression(_) => "JoinExpression",
            Node::RangeSubselect(_) => "RangeSubselect",
            Node::XmlTable(_) => "XmlTable",
            Node::TableSample(_) => "TableSample",
            Node::InsertTarget(_) => "InsertTarget",
            Node::UpdateOrDeleteTarget(_) => "UpdateOrDeleteTarget",
            Node::ColumnDefinition(_) => "ColumnDefinition",
            Node::TargetElement(_) => "TargetElement",
            Node::SetTargetElement(_) => "SetTargetElement",
            Node::SingleSetClause(_) => "SingleSetClause",
            Node::MultipleSetClause(_) => "MultipleSetClause",
            Node::XmlElement(_) => "XmlElement",
            Node::XmlForest(_) => "XmlForest",
            Node::XmlParse(_) => "XmlParse",
            Node::XmlPi(_) => "XmlPi",
            Node::XmlRoot(_) => "XmlRoot",
            Node::XmlSerialize(_) => "XmlSerialize",
            Node::XmlNamespace(_) => "XmlNamespace",
            Node::XmlColumnDefinition(_) => "XmlColumnDefinition",
            Node::EmptyGroupingSet => "EmptyGroupingSet",
            Node::CubeOrRollupClause(_) => "CubeOrRollupClause",
            Node::GroupingSetsClause(_) => "GroupingSetsClause",
            Node::List(l) => l.kind.name(),
        }
    }

    /// Short scalar payload summary for structural dumps; `None` when
    /// the variant name says it all.
    pub fn detail(&self) -> Option<String> {
        match self {
            Node::SetOpSelect(n) => Some(if n.all {
                format!("{} all", n.op.text())
            } else {
                n.op.text().to_owned()
            }),
            Node::Select(n) => n.distinct.as_ref().map(|_| "distinct".to_owned()),
            Node::Insert(n) if n.source.is_none() => Some("default values".to_owned()),
            Node::WithClause(n) if n.recursive => Some("recursive".to_owned()),
            Node::OperatorExpression(n) => Some(format!("{:?}", n.op)),
            Node::LogicalExpression(n) => Some(
                match n.op {
                    LogicalOp::And => "and",
                    LogicalOp::Or => "or",
                }
                .to_owned(),
            ),
            Node::BetweenExpression(n) => Some(format!("{:?}", n.op)),
            Node::PatternMatchingExpression(n) => Some(format!("{:?}", n.op)),
            Node::InExpression(n) => Some(format!("{:?}", n.op)),
            Node::IsOfExpression(n) if n.not => Some("not".to_owned()),
            Node::FunctionExpression(n) => {
                let mut flags = Vec::new();
                if n.star {
                    flags.push("star");
                }
                if n.distinct {
                    flags.push("distinct");
                }
                if n.variadic {
                    flags.push("variadic");
                }
                (!flags.is_empty()).then(|| flags.join(" "))
            }
            Node::RowExpression(n) if n.explicit => Some("row".to_owned()),
            Node::SubselectExpression(n) => n.op.map(|op| op.text().to_owned()),
            Node::Constant(n) => Some(format!("{:?} {:?}", n.kind, n.value)),
            Node::Parameter(n) => Some(match &n.kind {
                ParameterKind::Positional(i) => format!("${i}"),
                ParameterKind::Named(name) => format!(":{name}"),
            }),
            Node::ArrayIndexes(n) if n.slice => Some("slice".to_owned()),
            Node::SqlValueFunction(n) => Some(n.function.text().to_owned()),
            Node::Identifier(n) => Some(format!("{:?}", n.value)),
            Node::IntervalTypeName(n) => {
                let mut parts = Vec::new();
                if let Some(mask) = &n.mask {
                    parts.push(mask.clone());
                }
                if let Some(p) = n.precision {
                    parts.push(format!("({p})"));
                }
                (!parts.is_empty()).then(|| parts.join(" "))
            }
            Node::TypeName(n) if !n.bounds.is_empty() => {
                Some("array".to_owned())
            }
            Node::JoinExpression(n) => {
                let kind = match n.kind {
                    JoinType::Cross => "cross",
                    JoinType::Inner => "inner",
                    JoinType::Left => "left",
                    JoinType::Right => "right",
                    JoinType::Full => "full",
                };
                Some(if n.natural {
                    format!("natural {kind}")
                } else {
                    kind.to_owned()
                })
            }
            Node::RelationReference(n) => n.inherit.map(|i| {
                if i { "inherit".to_owned() } else { "only".to_owned() }
            }),
            Node::LockingElement(n) => Some(format!("for {}", n.strength.text())),
            Node::WindowFrameClause(n) => Some(
                match n.mode {
                    FrameMode::Range => "range",
                    FrameMode::Rows => "rows",
                }
                .to_owned(),
            ),
            Node::WindowFrameBound(n) => Some(
                match n.kind {
                    FrameBoundKind::UnboundedPreceding => "unbounded preceding",
                    FrameBoundKind::Preceding => "preceding",
                    FrameBoundKind::CurrentRow => "current row",
                    FrameBoundKind::Following => "following",
                    FrameBoundKind::UnboundedFollowing => "unbounded following",
                }
                .to_owned(),
            ),
            Node::OrderByElement(n) => {
                let mut parts = Vec::new();
                match n.direction {
                    Some(SortDirection::Asc) => parts.push("asc".to_owned()),
                    Some(SortDirection::Desc) => parts.push("desc".to_owned()),
                    Some(SortDirection::Using) => {
                        parts.push(format!("using {}", n.using_op.as_deref().unwrap_or("?")))
                    }
                    None => {}
                }
                match n.nulls {
                    Some(NullsOrder::First) => parts.push("nulls first".to_owned()),
                    Some(NullsOrder::Last) => parts.push("nulls last".to_owned()),
                    None => {}
                }
                (!parts.is_empty()).then(|| parts.join(" "))
            }
            Node::OnConflictClause(n) => Some(
                match n.action {
                    OnConflictAction::Nothing => "do nothing",
                    OnConflictAction::Update => "do update",
                }
                .to_owned(),
            ),
            Node::CubeOrRollupClause(n) => Some(
                match n.kind {
                    CubeOrRollup::Cube => "cube",
                    CubeOrRollup::Rollup => "rollup",
                }
                .to_owned(),
            ),
            Node::XmlParse(n) => Some(
                match n.kind {
                    XmlDocOrContent::Document => "document",
                    XmlDocOrContent::Content => "content",
                }
                .to_owned(),
            ),
            Node::XmlSerialize(n) => Some(
                match n.kind {
                    XmlDocOrContent::Document => "document",
                    XmlDocOrContent::Content => "content",
                }
                .to_owned(),
            ),
            Node::XmlColumnDefinition(n) if n.for_ordinality => {
                Some("for ordinality".to_owned())
            }
            _ => None,
        }
    }

    /// Whether this node can stand in scalar expression position.
    pub fn is_scalar_expression(&self) -> bool {
        matches!(
            self,
            Node::OperatorExpression(_)
                | Node::LogicalExpression(_)
                | Node::BetweenExpression(_)
                | Node::PatternMatchingExpression(_)
                | Node::InExpression(_)
                | Node::IsOfExpression(_)
                | Node::CollateExpression(_)
                | Node::TypecastExpression(_)
                | Node::CaseExpression(_)
                | Node::FunctionExpression(_)
                | Node::FunctionCall(_)
                | Node::ArrayExpression(_)
                | Node::RowExpression(_)
                | Node::SubselectExpression(_)
                | Node::GroupingExpression(_)
                | Node::SetToDefault
                | Node::Constant(_)
                | Node::Parameter(_)
                | Node::ColumnReference(_)
                | Node::Indirection(_)
                | Node::SqlValueFunction(_)
                | Node::XmlElement(_)
                | Node::XmlForest(_)
                | Node::XmlParse(_)
                | Node::XmlPi(_)
                | Node::XmlRoot(_)
                | Node::XmlSerialize(_)
        )
    }

    /// Whether this node can be an element of a `FROM` list.
    pub fn is_from_item(&self) -> bool {
        matches!(
            self,
            Node::RelationReference(_)
                | Node::RangeFunctionCall(_)
                | Node::RowsFrom(_)
                | Node::JoinExpression(_)
                | Node::RangeSubselect(_)
                | Node::XmlTable(_)
                | Node::TableSample(_)
        )
    }

    /// Whether this node is a statement that can participate in set
    /// operations and carry `ORDER BY`/`LIMIT`/`OFFSET`/locking.
    pub fn is_select_common(&self) -> bool {
        matches!(
            self,
            Node::Select(_) | Node::SetOpSelect(_) | Node::Values(_)
        )
    }

    pub fn is_statement(&self) -> bool {
        self.is_select_common()
            || matches!(self, Node::Insert(_) | Node::Update(_) | Node::Delete(_))
    }

    /// All direct children, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        // A clone is walked so the slot enumeration exists only once;
        // node payloads are small.
        let mut out = Vec::new();
        self.clone().for_each_slot_mut(|slot| match slot {
            SlotMut::Id(id) => out.push(*id),
            SlotMut::Opt(opt) => out.extend(opt.iter().copied()),
            SlotMut::Vec(ids) => out.extend(ids.iter().copied()),
        });
        out
    }

    /// Replaces the child `old` with `new`; returns whether a slot
    /// matched.
    pub(super) fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        let mut hit = false;
        self.for_each_slot_mut(|slot| match slot {
            SlotMut::Id(id) => {
                if *id == old {
                    *id = new;
                    hit = true;
                }
            }
            SlotMut::Opt(opt) => {
                if *opt == Some(old) {
                    *opt = Some(new);
                    hit = true;
                }
            }
            SlotMut::Vec(ids) => {
                for id in ids.iter_mut() {
                    if *id == old {
                        *id = new;
                        hit = true;
                    }
                }
            }
        });
        hit
    }

    /// Removes the child `old` where the grammar allows absence;
    /// returns `false` if the slot is required.
    pub(super) fn remove_child(&mut self, old: NodeId) -> bool {
        let mut hit = false;
        let mut required = false;
        self.for_each_slot_mut(|slot| match slot {
            SlotMut::Id(id) => {
                if *id == old {
                    required = true;
                }
            }
            SlotMut::Opt(opt) => {
                if *opt == Some(old) {
                    *opt = None;
                    hit = true;
                }
            }
            SlotMut::Vec(ids) => {
                if ids.contains(&old) {
                    ids.retain(|id| *id != old);
                    hit = true;
                }
            }
        });
        hit && !required
    }

    fn for_each_slot_mut(&mut self, mut f: impl FnMut(SlotMut<'_>)) {
        use SlotMut::*;
        match self {
            Node::Select(n) => {
                f(Opt(&mut n.with));
                if let Some(d) = &mut n.distinct {
                    f(Opt(&mut d.on));
                }
                f(Opt(&mut n.targets));
                f(Opt(&mut n.from));
                f(Opt(&mut n.where_clause));
                f(Opt(&mut n.group));
                f(Opt(&mut n.having));
                f(Opt(&mut n.window));
                f(Opt(&mut n.order));
                f(Opt(&mut n.limit));
                f(Opt(&mut n.offset));
                f(Opt(&mut n.locking));
            }
            Node::SetOpSelect(n) => {
                f(Opt(&mut n.with));
                f(Id(&mut n.left));
                f(Id(&mut n.right));
                f(Opt(&mut n.order));
                f(Opt(&mut n.limit));
                f(Opt(&mut n.offset));
                f(Opt(&mut n.locking));
            }
            Node::Values(n) => {
                f(Opt(&mut n.with));
                f(Id(&mut n.rows));
                f(Opt(&mut n.order));
                f(Opt(&mut n.limit));
                f(Opt(&mut n.offset));
                f(Opt(&mut n.locking));
            }
            Node::Insert(n) => {
                f(Opt(&mut n.with));
                f(Id(&mut n.target));
                f(Opt(&mut n.columns));
                f(Opt(&mut n.source));
                f(Opt(&mut n.on_conflict));
                f(Opt(&mut n.returning));
            }
            Node::Update(n) => {
                f(Opt(&mut n.with));
                f(Id(&mut n.target));
                f(Id(&mut n.set));
                f(Opt(&mut n.from));
                f(Opt(&mut n.where_clause));
                f(Opt(&mut n.returning));
            }
            Node::Delete(n) => {
                f(Opt(&mut n.with));
                f(Id(&mut n.target));
                f(Opt(&mut n.using));
                f(Opt(&mut n.where_clause));
                f(Opt(&mut n.returning));
            }
            Node::WithClause(n) => f(Id(&mut n.ctes)),
            Node::CommonTableExpression(n) => {
                f(Id(&mut n.name));
                if let Some(cols) = &mut n.columns {
                    f(Vec(cols));
                }
                f(Id(&mut n.statement));
            }
            Node::WhereOrHavingClause(n) => f(Opt(&mut n.condition)),
            Node::OnConflictClause(n) => {
                match &mut n.target {
                    Some(ConflictTarget::IndexParameters(id)) => f(Id(id)),
                    Some(ConflictTarget::Constraint(id)) => f(Id(id)),
                    None => {}
                }
                f(Opt(&mut n.set));
                f(Opt(&mut n.condition));
            }
            Node::LockingElement(n) => f(Vec(&mut n.relations)),
            Node::WindowDefinition(n) => {
                f(Opt(&mut n.name));
                f(Opt(&mut n.ref_name));
                f(Opt(&mut n.partition));
                f(Opt(&mut n.order));
                f(Opt(&mut n.frame));
            }
            Node::WindowFrameClause(n) => {
                f(Id(&mut n.start));
                f(Opt(&mut n.end));
            }
            Node::WindowFrameBound(n) => f(Opt(&mut n.value)),
            Node::OrderByElement(n) => f(Id(&mut n.expression)),
            Node::OperatorExpression(n) => {
                f(Opt(&mut n.left));
                f(Opt(&mut n.right));
            }
            Node::LogicalExpression(n) => f(Vec(&mut n.terms)),
            Node::BetweenExpression(n) => {
                f(Id(&mut n.argument));
                f(Id(&mut n.left));
                f(Id(&mut n.right));
            }
            Node::PatternMatchingExpression(n) => {
                f(Id(&mut n.argument));
                f(Id(&mut n.pattern));
                f(Opt(&mut n.escape));
            }
            Node::InExpression(n) => {
                f(Id(&mut n.argument));
                f(Id(&mut n.right));
            }
            Node::IsOfExpression(n) => {
                f(Id(&mut n.argument));
                f(Vec(&mut n.types));
            }
            Node::CollateExpression(n) => {
                f(Id(&mut n.argument));
                f(Id(&mut n.collation));
            }
            Node::TypecastExpression(n) => {
                f(Id(&mut n.argument));
                f(Id(&mut n.type_name));
            }
            Node::CaseExpression(n) => {
                f(Opt(&mut n.argument));
                f(Vec(&mut n.when_clauses));
                f(Opt(&mut n.else_clause));
            }
            Node::WhenExpression(n) => {
                f(Id(&mut n.when));
                f(Id(&mut n.then));
            }
            Node::FunctionExpression(n) => {
                f(Id(&mut n.name));
                f(Id(&mut n.arguments));
                f(Opt(&mut n.order));
                f(Opt(&mut n.within_group));
                f(Opt(&mut n.filter));
                f(Opt(&mut n.over));
            }
            Node::FunctionCall(n) => {
                f(Id(&mut n.name));
                f(Id(&mut n.arguments));
            }
            Node::NamedFunctionArgument(n) => {
                f(Id(&mut n.name));
                f(Id(&mut n.value));
            }
            Node::ArrayExpression(n) => f(Vec(&mut n.elements)),
            Node::RowExpression(n) => f(Vec(&mut n.elements)),
            Node::SubselectExpression(n) => f(Id(&mut n.statement)),
            Node::GroupingExpression(n) => f(Vec(&mut n.arguments)),
            Node::SetToDefault | Node::Star | Node::EmptyGroupingSet => {}
            Node::Constant(_) | Node::Parameter(_) | Node::Identifier(_) => {}
            Node::IntervalTypeName(_) => {}
            Node::ColumnReference(n) => f(Vec(&mut n.parts)),
            Node::Indirection(n) => {
                f(Id(&mut n.argument));
                f(Vec(&mut n.items));
            }
            Node::ArrayIndexes(n) => {
                f(Opt(&mut n.lower));
                f(Opt(&mut n.upper));
            }
            Node::SqlValueFunction(_) => {}
            Node::QualifiedName(n) => {
                f(Opt(&mut n.catalog));
                f(Opt(&mut n.schema));
                f(Id(&mut n.relation));
            }
            Node::TypeName(n) => {
                f(Id(&mut n.name));
                f(Opt(&mut n.modifiers));
            }
            Node::IndexElement(n) => {
                f(Id(&mut n.expression));
                f(Opt(&mut n.collation));
                f(Opt(&mut n.opclass));
            }
            Node::IndexParameters(n) => {
                f(Vec(&mut n.elements));
                f(Opt(&mut n.condition));
            }
            Node::RelationReference(n) => {
                f(Id(&mut n.name));
                f(Opt(&mut n.alias));
                if let Some(cols) = &mut n.column_aliases {
                    f(Vec(cols));
                }
            }
            Node::RangeFunctionCall(n) => {
                f(Id(&mut n.function));
                f(Opt(&mut n.alias));
                if let Some(cols) = &mut n.column_aliases {
                    f(Vec(cols));
                }
                if let Some(defs) = &mut n.column_definitions {
                    f(Vec(defs));
                }
            }
            Node::RowsFrom(n) => {
                f(Vec(&mut n.elements));
                f(Opt(&mut n.alias));
                if let Some(cols) = &mut n.column_aliases {
                    f(Vec(cols));
                }
            }
            Node::RowsFromElement(n) => {
                f(Id(&mut n.function));
                if let Some(defs) = &mut n.column_definitions {
                    f(Vec(defs));
                }
            }
            Node::JoinExpression(n) => {
                f(Id(&mut n.left));
                f(Id(&mut n.right));
                if let Some(cols) = &mut n.using_columns {
                    f(Vec(cols));
                }
                f(Opt(&mut n.on));
                f(Opt(&mut n.alias));
            }
            Node::RangeSubselect(n) => {
                f(Id(&mut n.statement));
                f(Opt(&mut n.alias));
                if let Some(cols) = &mut n.column_aliases {
                    f(Vec(cols));
                }
            }
            Node::XmlTable(n) => {
                if let Some(ns) = &mut n.namespaces {
                    f(Vec(ns));
                }
                f(Id(&mut n.row_expression));
                f(Id(&mut n.document_expression));
                f(Vec(&mut n.columns));
                f(Opt(&mut n.alias));
                if let Some(cols) = &mut n.column_aliases {
                    f(Vec(cols));
                }
            }
            Node::TableSample(n) => {
                f(Id(&mut n.relation));
                f(Id(&mut n.method));
                f(Vec(&mut n.arguments));
                f(Opt(&mut n.repeatable));
            }
            Node::InsertTarget(n) => {
                f(Id(&mut n.relation));
                f(Opt(&mut n.alias));
            }
            Node::UpdateOrDeleteTarget(n) => {
                f(Id(&mut n.relation));
                f(Opt(&mut n.alias));
            }
            Node::ColumnDefinition(n) => {
                f(Id(&mut n.name));
                f(Id(&mut n.type_name));
            }
            Node::TargetElement(n) => {
                f(Id(&mut n.expression));
                f(Opt(&mut n.alias));
            }
            Node::SetTargetElement(n) => {
                f(Id(&mut n.name));
                f(Vec(&mut n.indirection));
            }
            Node::SingleSetClause(n) => {
                f(Id(&mut n.target));
                f(Id(&mut n.value));
            }
            Node::MultipleSetClause(n) => {
                f(Vec(&mut n.targets));
                f(Id(&mut n.value));
            }
            Node::XmlElement(n) => {
                f(Id(&mut n.name));
                if let Some(attrs) = &mut n.attributes {
                    f(Vec(attrs));
                }
                f(Vec(&mut n.content));
            }
            Node::XmlForest(n) => f(Vec(&mut n.elements)),
            Node::XmlParse(n) => f(Id(&mut n.argument)),
            Node::XmlPi(n) => {
                f(Id(&mut n.name));
                f(Opt(&mut n.content));
            }
            Node::XmlRoot(n) => {
                f(Id(&mut n.argument));
                f(Opt(&mut n.version));
            }
            Node::XmlSerialize(n) => {
                f(Id(&mut n.argument));
                f(Id(&mut n.type_name));
            }
            Node::XmlNamespace(n) => {
                f(Id(&mut n.uri));
                f(Opt(&mut n.name));
            }
            Node::XmlColumnDefinition(n) => {
                f(Id(&mut n.name));
                f(Opt(&mut n.type_name));
                f(Opt(&mut n.path));
                f(Opt(&mut n.default));
            }
            Node::CubeOrRollupClause(n) => f(Vec(&mut n.arguments)),
            Node::GroupingSetsClause(n) => f(Vec(&mut n.sets)),
            Node::List(n) => f(Vec(&mut n.elements)),
        }
    }
}

enum SlotMut<'a> {
    Id(&'a mut NodeId),
    Opt(&'a mut Option<NodeId>),
    Vec(&'a mut Vec<NodeId>),
}
