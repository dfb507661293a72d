// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The XML function family: `XMLELEMENT`, `XMLFOREST`, `XMLPARSE`,
//! `XMLPI`, `XMLROOT`, `XMLSERIALIZE`, `XMLEXISTS` and the `XMLTABLE`
//! range item.

use crate::ast::*;
use crate::error::Result;
use crate::lexer::{Keyword as Kw, TokenKind};
use crate::T;

use super::{
    parse_b_expr, parse_col_id, parse_col_label, parse_comma_separated, parse_expr,
    parse_typename, Cursor,
};

/// `XMLELEMENT(NAME name [, XMLATTRIBUTES(...)] [, content ...])`.
pub(crate) fn parse_xml_element(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::XMLELEMENT)?;
    p.expect(T!['('])?;
    p.expect_kw(Kw::NAME)?;
    let name = parse_col_label(p)?;
    let mut attributes = None;
    let mut content = Vec::new();
    while p.eat(T![,]) {
        if attributes.is_none() && content.is_empty() && p.at_kw(Kw::XMLATTRIBUTES) {
            p.bump();
            p.expect(T!['('])?;
            attributes = Some(parse_comma_separated(p, parse_xml_attribute)?);
            p.expect(T![')'])?;
            continue;
        }
        content.push(parse_expr(p)?);
    }
    p.expect(T![')'])?;
    Ok(p.push(Node::XmlElement(XmlElement {
        name,
        attributes,
        content,
    })))
}

/// `expr [AS name]`, shared by `XMLATTRIBUTES` and `XMLFOREST`.
fn parse_xml_attribute(p: &mut Cursor) -> Result<NodeId> {
    let expression = parse_b_expr(p)?;
    let alias = if p.eat_kw(Kw::AS) {
        Some(parse_col_label(p)?)
    } else {
        None
    };
    Ok(p.push(Node::TargetElement(TargetElement { expression, alias })))
}

pub(crate) fn parse_xml_forest(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::XMLFOREST)?;
    p.expect(T!['('])?;
    let elements = parse_comma_separated(p, parse_xml_attribute)?;
    p.expect(T![')'])?;
    Ok(p.push(Node::XmlForest(XmlForest { elements })))
}

/// `XMLPARSE(DOCUMENT|CONTENT expr [PRESERVE|STRIP WHITESPACE])`.
pub(crate) fn parse_xml_parse(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::XMLPARSE)?;
    p.expect(T!['('])?;
    let kind = parse_document_or_content(p)?;
    let argument = parse_expr(p)?;
    let preserve_whitespace = if p.eat_kw(Kw::PRESERVE) {
        p.expect_kw(Kw::WHITESPACE)?;
        true
    } else {
        if p.eat_kw(Kw::STRIP) {
            p.expect_kw(Kw::WHITESPACE)?;
        }
        false
    };
    p.expect(T![')'])?;
    Ok(p.push(Node::XmlParse(XmlParse {
        kind,
        argument,
        preserve_whitespace,
    })))
}

fn parse_document_or_content(p: &mut Cursor) -> Result<XmlDocOrContent> {
    if p.eat_kw(Kw::DOCUMENT) {
        Ok(XmlDocOrContent::Document)
    } else {
        p.expect_kw(Kw::CONTENT)?;
        Ok(XmlDocOrContent::Content)
    }
}

/// `XMLPI(NAME name [, content])`.
pub(crate) fn parse_xml_pi(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::XMLPI)?;
    p.expect(T!['('])?;
    p.expect_kw(Kw::NAME)?;
    let name = parse_col_label(p)?;
    let content = if p.eat(T![,]) {
        Some(parse_expr(p)?)
    } else {
        None
    };
    p.expect(T![')'])?;
    Ok(p.push(Node::XmlPi(XmlPi { name, content })))
}

/// `XMLROOT(xml, VERSION expr|NO VALUE [, STANDALONE ...])`.
pub(crate) fn parse_xml_root(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::XMLROOT)?;
    p.expect(T!['('])?;
    let argument = parse_expr(p)?;
    p.expect(T![,])?;
    p.expect_kw(Kw::VERSION)?;
    let version = if p.at_kw(Kw::NO) && p.nth_at_kw(1, Kw::VALUE) {
        p.bump();
        p.bump();
        None
    } else {
        Some(parse_expr(p)?)
    };
    let standalone = if p.eat(T![,]) {
        p.expect_kw(Kw::STANDALONE)?;
        if p.eat_kw(Kw::YES) {
            Some(XmlStandalone::Yes)
        } else if p.at_kw(Kw::NO) && p.nth_at_kw(1, Kw::VALUE) {
            p.bump();
            p.bump();
            Some(XmlStandalone::NoValue)
        } else {
            p.expect_kw(Kw::NO)?;
            Some(XmlStandalone::No)
        }
    } else {
        None
    };
    p.expect(T![')'])?;
    Ok(p.push(Node::XmlRoot(XmlRoot {
        argument,
        version,
        standalone,
    })))
}

/// `XMLSERIALIZE(DOCUMENT|CONTENT expr AS typename)`.
pub(crate) fn parse_xml_serialize(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::XMLSERIALIZE)?;
    p.expect(T!['('])?;
    let kind = parse_document_or_content(p)?;
    let argument = parse_expr(p)?;
    p.expect_kw(Kw::AS)?;
    let type_name = parse_typename(p)?;
    p.expect(T![')'])?;
    Ok(p.push(Node::XmlSerialize(XmlSerialize {
        kind,
        argument,
        type_name,
    })))
}

/// `XMLEXISTS(path PASSING doc)`, normalized to
/// `pg_catalog.xmlexists(path, doc)`.
pub(crate) fn parse_xml_exists(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::XMLEXISTS)?;
    p.expect(T!['('])?;
    let path = parse_b_expr(p)?;
    let document = parse_xmlexists_argument(p)?;
    p.expect(T![')'])?;

    let schema = p.identifier("pg_catalog");
    let relation = p.identifier("xmlexists");
    let name = p.push(Node::QualifiedName(QualifiedName {
        catalog: None,
        schema: Some(schema),
        relation,
    }));
    let arguments = p.list(ListKind::FunctionArg, vec![path, document]);
    Ok(p.push(Node::FunctionExpression(FunctionExpression {
        name,
        arguments,
        star: false,
        distinct: false,
        variadic: false,
        order: None,
        within_group: None,
        filter: None,
        over: None,
    })))
}

/// `PASSING [BY REF] expr [BY REF]`.
fn parse_xmlexists_argument(p: &mut Cursor) -> Result<NodeId> {
    p.expect_kw(Kw::PASSING)?;
    if p.at_kw(Kw::BY) && p.nth_at_kw(1, Kw::REF) {
        p.bump();
        p.bump();
    }
    let document = parse_b_expr(p)?;
    if p.at_kw(Kw::BY) && p.nth_at_kw(1, Kw::REF) {
        p.bump();
        p.bump();
    }
    Ok(document)
}

/// The `XMLTABLE(...)` range item.
pub(crate) fn parse_xml_table(p: &mut Cursor, lateral: bool) -> Result<NodeId> {
    p.expect_kw(Kw::XMLTABLE)?;
    p.expect(T!['('])?;
    let namespaces = if p.at_kw(Kw::XMLNAMESPACES) {
        p.bump();
        p.expect(T!['('])?;
        let namespaces = parse_comma_separated(p, parse_xml_namespace)?;
        p.expect(T![')'])?;
        p.expect(T![,])?;
        Some(namespaces)
    } else {
        None
    };
    let row_expression = parse_b_expr(p)?;
    let document_expression = parse_xmlexists_argument(p)?;
    p.expect_kw(Kw::COLUMNS)?;
    let columns = parse_comma_separated(p, parse_xmltable_column)?;
    p.expect(T![')'])?;

    let (alias, column_aliases) = super::parse_alias_clause(p)?;
    Ok(p.push(Node::XmlTable(XmlTable {
        namespaces,
        row_expression,
        document_expression,
        columns,
        lateral,
        alias,
        column_aliases,
    })))
}

/// `b_expr AS name` or `DEFAULT b_expr`.
fn parse_xml_namespace(p: &mut Cursor) -> Result<NodeId> {
    if p.eat_kw(Kw::DEFAULT) {
        let uri = parse_b_expr(p)?;
        return Ok(p.push(Node::XmlNamespace(XmlNamespace { uri, name: None })));
    }
    let uri = parse_b_expr(p)?;
    p.expect_kw(Kw::AS)?;
    let name = parse_col_label(p)?;
    Ok(p.push(Node::XmlNamespace(XmlNamespace {
        uri,
        name: Some(name),
    })))
}

/// `name FOR ORDINALITY` or `name type [PATH expr] [DEFAULT expr]
/// [NOT NULL | NULL]`.
fn parse_xmltable_column(p: &mut Cursor) -> Result<NodeId> {
    let name = parse_col_id(p)?;
    if p.at_kw(Kw::FOR) && p.nth_at_kw(1, Kw::ORDINALITY) {
        p.bump();
        p.bump();
        return Ok(p.push(Node::XmlColumnDefinition(XmlColumnDefinition {
            name,
            for_ordinality: true,
            type_name: None,
            path: None,
            default: None,
            not_null: None,
        })));
    }
    let type_name = Some(parse_typename(p)?);
    let mut path = None;
    let mut default = None;
    let mut not_null = None;
    loop {
        match p.current().kind {
            // PATH is no keyword; the server checks the spelling too
            TokenKind::Ident if p.current().value == "path" && path.is_none() => {
                p.bump();
                path = Some(parse_b_expr(p)?);
            }
            TokenKind::Keyword(Kw::DEFAULT) if default.is_none() => {
                p.bump();
                default = Some(parse_b_expr(p)?);
            }
            TokenKind::Keyword(Kw::NOT) if p.nth_at_kw(1, Kw::NULL) => {
                p.bump();
                p.bump();
                not_null = Some(true);
            }
            TokenKind::Keyword(Kw::NULL) => {
                p.bump();
                not_null = Some(false);
            }
            _ => break,
        }
    }
    Ok(p.push(Node::XmlColumnDefinition(XmlColumnDefinition {
        name,
        for_ordinality: false,
        type_name,
        path,
        default,
        not_null,
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
    fn parse_xml_constructors() {
        assert_eq!(
            sql("select xmlelement(name el, xmlattributes(1 as a, b), 'body')"),
            "select xmlelement(name el, xmlattributes(1 as a, b), 'body')"
        );
        assert_eq!(
            sql("select xmlforest(a, b as c)"),
            "select xmlforest(a, b as c)"
        );
        assert_eq!(
            sql("select xmlpi(name php, 'echo 1;'), xmlconcat(a, b)"),
            "select xmlpi(name php, 'echo 1;'), xmlconcat(a, b)"
        );
        assert_eq!(
            sql("select xmlroot(d, version no value, standalone no)"),
            "select xmlroot(d, version no value, standalone no)"
        );
    }

    #[test]
    fn parse_xml_parse_and_serialize() {
        assert_eq!(
            sql("select xmlparse(content doc)"),
            "select xmlparse(content doc)"
        );
        assert_eq!(
            sql("select xmlparse(document doc preserve whitespace)"),
            "select xmlparse(document doc preserve whitespace)"
        );
        assert_eq!(
            sql("select xmlserialize(content x as varchar)"),
            "select xmlserialize(content x as pg_catalog.varchar)"
        );
    }

    #[test]
    fn parse_xml_predicates() {
        assert_eq!(
            sql("select x is document, xmlexists('/r' passing by ref d)"),
            "select x is document, pg_catalog.\"xmlexists\"('/r', d)"
        );
    }

    #[test]
    fn parse_xmltable() {
        assert_eq!(
            sql("select * from xmltable('/r/x' passing d columns a varchar path '/a' default 'z' not null, b for ordinality) as xt"),
            "select * from xmltable('/r/x' passing d columns a pg_catalog.varchar path '/a' default 'z' not null, b for ordinality) as xt"
        );
        assert_eq!(
            sql("select * from xmltable(xmlnamespaces('http://x' as x, default 'http://y'), '/x:r' passing d columns c \"text\")"),
            "select * from xmltable(xmlnamespaces('http://x' as x, default 'http://y'), '/x:r' passing d columns c \"text\")"
        );
    }
}
