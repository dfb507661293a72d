// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The walker protocol: one `walk_*` method per node variant,
//! dispatched through [`SyntaxTree::dispatch`]. Nodes carry no
//! rendering or analysis logic of their own; anything that consumes a
//! tree implements this trait. The SQL printer is the canonical
//! implementation.

use crate::ast::*;

/// A visitor over the closed node family. `Output` is whatever the
/// walk computes; the printer returns `Result<String>`.
pub trait Walker {
    type Output;

    fn walk_select(&mut self, tree: &SyntaxTree, id: NodeId, node: &SelectStmt) -> Self::Output;
    fn walk_set_op_select(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &SetOpSelectStmt,
    ) -> Self::Output;
    fn walk_values(&mut self, tree: &SyntaxTree, id: NodeId, node: &ValuesStmt) -> Self::Output;
    fn walk_insert(&mut self, tree: &SyntaxTree, id: NodeId, node: &InsertStmt) -> Self::Output;
    fn walk_update(&mut self, tree: &SyntaxTree, id: NodeId, node: &UpdateStmt) -> Self::Output;
    fn walk_delete(&mut self, tree: &SyntaxTree, id: NodeId, node: &DeleteStmt) -> Self::Output;

    fn walk_with_clause(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &WithClause,
    ) -> Self::Output;
    fn walk_common_table_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &CommonTableExpression,
    ) -> Self::Output;
    fn walk_where_or_having_clause(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &WhereOrHavingClause,
    ) -> Self::Output;
    fn walk_on_conflict_clause(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &OnConflictClause,
    ) -> Self::Output;
    fn walk_locking_element(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &LockingElement,
    ) -> Self::Output;
    fn walk_window_definition(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &WindowDefinition,
    ) -> Self::Output;
    fn walk_window_frame_clause(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &WindowFrameClause,
    ) -> Self::Output;
    fn walk_window_frame_bound(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &WindowFrameBound,
    ) -> Self::Output;
    fn walk_order_by_element(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &OrderByElement,
    ) -> Self::Output;

    fn walk_operator_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &OperatorExpression,
    ) -> Self::Output;
    fn walk_logical_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &LogicalExpression,
    ) -> Self::Output;
    fn walk_between_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &BetweenExpression,
    ) -> Self::Output;
    fn walk_pattern_matching_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &PatternMatchingExpression,
    ) -> Self::Output;
    fn walk_in_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &InExpression,
    ) -> Self::Output;
    fn walk_is_of_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &IsOfExpression,
    ) -> Self::Output;
    fn walk_collate_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &CollateExpression,
    ) -> Self::Output;
    fn walk_typecast_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &TypecastExpression,
    ) -> Self::Output;
    fn walk_case_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &CaseExpression,
    ) -> Self::Output;
    fn walk_when_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &WhenExpression,
    ) -> Self::Output;
    fn walk_function_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &FunctionExpression,
    ) -> Self::Output;
    fn walk_function_call(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &FunctionCall,
    ) -> Self::Output;
    fn walk_named_function_argument(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &NamedFunctionArgument,
    ) -> Self::Output;
    fn walk_array_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &ArrayExpression,
    ) -> Self::Output;
    fn walk_row_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &RowExpression,
    ) -> Self::Output;
    fn walk_subselect_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &SubselectExpression,
    ) -> Self::Output;
    fn walk_grouping_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &GroupingExpression,
    ) -> Self::Output;
    fn walk_set_to_default(&mut self, tree: &SyntaxTree, id: NodeId) -> Self::Output;
    fn walk_constant(&mut self, tree: &SyntaxTree, id: NodeId, node: &Constant) -> Self::Output;
    fn walk_parameter(&mut self, tree: &SyntaxTree, id: NodeId, node: &Parameter)
        -> Self::Output;
    fn walk_column_reference(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &ColumnReference,
    ) -> Self::Output;
    fn walk_indirection(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &Indirection,
    ) -> Self::Output;
    fn walk_array_indexes(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &ArrayIndexes,
    ) -> Self::Output;
    fn walk_star(&mut self, tree: &SyntaxTree, id: NodeId) -> Self::Output;
    fn walk_sql_value_function(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &SqlValueFunction,
    ) -> Self::Output;

    fn walk_identifier(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &Identifier,
    ) -> Self::Output;
    fn walk_qualified_name(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &QualifiedName,
    ) -> Self::Output;
    fn walk_type_name(&mut self, tree: &SyntaxTree, id: NodeId, node: &TypeName) -> Self::Output;
    fn walk_interval_type_name(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &IntervalTypeName,
    ) -> Self::Output;
    fn walk_index_element(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &IndexElement,
    ) -> Self::Output;
    fn walk_index_parameters(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &IndexParameters,
    ) -> Self::Output;

    fn walk_relation_reference(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &RelationReference,
    ) -> Self::Output;
    fn walk_range_function_call(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &RangeFunctionCall,
    ) -> Self::Output;
    fn walk_rows_from(&mut self, tree: &SyntaxTree, id: NodeId, node: &RowsFrom) -> Self::Output;
    fn walk_rows_from_element(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &RowsFromElement,
    ) -> Self::Output;
    fn walk_join_expression(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &JoinExpression,
    ) -> Self::Output;
    fn walk_range_subselect(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &RangeSubselect,
    ) -> Self::Output;
    fn walk_xml_table(&mut self, tree: &SyntaxTree, id: NodeId, node: &XmlTable) -> Self::Output;
    fn walk_table_sample(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &TableSample,
    ) -> Self::Output;
    fn walk_insert_target(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &InsertTarget,
    ) -> Self::Output;
    fn walk_update_or_delete_target(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &UpdateOrDeleteTarget,
    ) -> Self::Output;
    fn walk_column_definition(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &ColumnDefinition,
    ) -> Self::Output;

    fn walk_target_element(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &TargetElement,
    ) -> Self::Output;
    fn walk_set_target_element(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &SetTargetElement,
    ) -> Self::Output;
    fn walk_single_set_clause(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &SingleSetClause,
    ) -> Self::Output;
    fn walk_multiple_set_clause(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &MultipleSetClause,
    ) -> Self::Output;

    fn walk_xml_element(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &XmlElement,
    ) -> Self::Output;
    fn walk_xml_forest(&mut self, tree: &SyntaxTree, id: NodeId, node: &XmlForest)
        -> Self::Output;
    fn walk_xml_parse(&mut self, tree: &SyntaxTree, id: NodeId, node: &XmlParse) -> Self::Output;
    fn walk_xml_pi(&mut self, tree: &SyntaxTree, id: NodeId, node: &XmlPi) -> Self::Output;
    fn walk_xml_root(&mut self, tree: &SyntaxTree, id: NodeId, node: &XmlRoot) -> Self::Output;
    fn walk_xml_serialize(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &XmlSerialize,
    ) -> Self::Output;
    fn walk_xml_namespace(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &XmlNamespace,
    ) -> Self::Output;
    fn walk_xml_column_definition(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &XmlColumnDefinition,
    ) -> Self::Output;

    fn walk_empty_grouping_set(&mut self, tree: &SyntaxTree, id: NodeId) -> Self::Output;
    fn walk_cube_or_rollup_clause(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &CubeOrRollupClause,
    ) -> Self::Output;
    fn walk_grouping_sets_clause(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        node: &GroupingSetsClause,
    ) -> Self::Output;

    fn walk_list(&mut self, tree: &SyntaxTree, id: NodeId, node: &NodeList) -> Self::Output;
}

impl SyntaxTree {
    /// Invokes the walker method matching the node's variant.
    pub fn dispatch<W: Walker>(&self, id: NodeId, walker: &mut W) -> W::Output {
        match self.node(id) {
            Node::Select(n) => walker.walk_select(self, id, n),
            Node::SetOpSelect(n) => walker.walk_set_op_select(self, id, n),
            Node::Values(n) => walker.walk_values(self, id, n),
            Node::Insert(n) => walker.walk_insert(self, id, n),
            Node::Update(n) => walker.walk_update(self, id, n),
            Node::Delete(n) => walker.walk_delete(self, id, n),
            Node::WithClause(n) => walker.walk_with_clause(self, id, n),
            Node::CommonTableExpression(n) => walker.walk_common_table_expression(self, id, n),
            Node::WhereOrHavingClause(n) => walker.walk_where_or_having_clause(self, id, n),
            Node::OnConflictClause(n) => walker.walk_on_conflict_clause(self, id, n),
            Node::LockingElement(n) => walker.walk_locking_element(self, id, n),
            Node::WindowDefinition(n) => walker.walk_window_definition(self, id, n),
            Node::WindowFrameClause(n) => walker.walk_window_frame_clause(self, id, n),
            Node::WindowFrameBound(n) => walker.walk_window_frame_bound(self, id, n),
            Node::OrderByElement(n) => walker.walk_order_by_element(self, id, n),
            Node::OperatorExpression(n) => walker.walk_operator_expression(self, id, n),
            Node::LogicalExpression(n) => walker.walk_logical_expression(self, id, n),
            Node::BetweenExpression(n) => walker.walk_between_expression(self, id, n),
            Node::PatternMatchingExpression(n) => {
                walker.walk_pattern_matching_expression(self, id, n)
            }
            Node::InExpression(n) => walker.walk_in_expression(self, id, n),
            Node::IsOfExpression(n) => walker.walk_is_of_expression(self, id, n),
            Node::CollateExpression(n) => walker.walk_collate_expression(self, id, n),
            Node::TypecastExpression(n) => walker.walk_typecast_expression(self, id, n),
            Node::CaseExpression(n) => walker.walk_case_expression(self, id, n),
            Node::WhenExpression(n) => walker.walk_when_expression(self, id, n),
            Node::FunctionExpression(n) => walker.walk_function_expression(self, id, n),
            Node::FunctionCall(n) => walker.walk_function_call(self, id, n),
            Node::NamedFunctionArgument(n) => walker.walk_named_function_argument(self, id, n),
            Node::ArrayExpression(n) => walker.walk_array_expression(self, id, n),
            Node::RowExpression(n) => walker.walk_row_expression(self, id, n),
            Node::SubselectExpression(n) => walker.walk_subselect_expression(self, id, n),
            Node::GroupingExpression(n) => walker.walk_grouping_expression(self, id, n),
            Node::SetToDefault => walker.walk_set_to_default(self, id),
            Node::Constant(n) => walker.walk_constant(self, id, n),
            Node::Parameter(n) => walker.walk_parameter(self, id, n),
            Node::ColumnReference(n) => walker.walk_column_reference(self, id, n),
            Node::Indirection(n) => walker.walk_indirection(self, id, n),
            Node::ArrayIndexes(n) => walker.walk_array_indexes(self, id, n),
            Node::Star => walker.walk_star(self, id),
            Node::SqlValueFunction(n) => walker.walk_sql_value_function(self, id, n),
            Node::Identifier(n) => walker.walk_identifier(self, id, n),
            Node::QualifiedName(n) => walker.walk_qualified_name(self, id, n),
            Node::TypeName(n) => walker.walk_type_name(self, id, n),
            Node::IntervalTypeName(n) => walker.walk_interval_type_name(self, id, n),
            Node::IndexElement(n) => walker.walk_index_element(self, id, n),
            Node::IndexParameters(n) => walker.walk_index_parameters(self, id, n),
            Node::RelationReference(n) => walker.walk_relation_reference(self, id, n),
            Node::RangeFunctionCall(n) => walker.walk_range_function_call(self, id, n),
            Node::RowsFrom(n) => walker.walk_rows_from(self, id, n),
            Node::RowsFromElement(n) => walker.walk_rows_from_element(self, id, n),
            Node::JoinExpression(n) => walker.walk_join_expression(self, id, n),
            Node::RangeSubselect(n) => walker.walk_range_subselect(self, id, n),
            Node::XmlTable(n) => walker.walk_xml_table(self, id, n),
            Node::TableSample(n) => walker.walk_table_sample(self, id, n),
            Node::InsertTarget(n) => walker.walk_insert_target(self, id, n),
            Node::UpdateOrDeleteTarget(n) => walker.walk_update_or_delete_target(self, id, n),
            Node::ColumnDefinition(n) => walker.walk_column_definition(self, id, n),
            Node::TargetElement(n) => walker.walk_target_element(self, id, n),
            Node::SetTargetElement(n) => walker.walk_set_target_element(self, id, n),
            Node::SingleSetClause(n) => walker.walk_single_set_clause(self, id, n),
            Node::MultipleSetClause(n) => walker.walk_multiple_set_clause(self, id, n),
            Node::XmlElement(n) => walker.walk_xml_element(self, id, n),
            Node::XmlForest(n) => walker.walk_xml_forest(self, id, n),
            Node::XmlParse(n) => walker.walk_xml_parse(self, id, n),
            Node::XmlPi(n) => walker.walk_xml_pi(self, id, n),
            Node::XmlRoot(n) => walker.walk_xml_root(self, id, n),
            Node::XmlSerialize(n) => walker.walk_xml_serialize(self, id, n),
            Node::XmlNamespace(n) => walker.walk_xml_namespace(self, id, n),
            Node::XmlColumnDefinition(n) => walker.walk_xml_column_definition(self, id, n),
            Node::EmptyGroupingSet => walker.walk_empty_grouping_set(self, id),
            Node::CubeOrRollupClause(n) => walker.walk_cube_or_rollup_clause(self, id, n),
            Node::GroupingSetsClause(n) => walker.walk_grouping_sets_clause(self, id, n),
            Node::List(n) => walker.walk_list(self, id, n),
        }
    }
}
