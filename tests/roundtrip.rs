// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Parse/print/parse round-trips over a statement corpus: printed SQL
//! must re-parse to a structurally equal tree under the same
//! precedence mode, printing must be idempotent, and `Compat`
//! parentheses must read the same under both precedence modes.

use pg_ast_builder::{
    ParenthesesMode, Parser, ParserOptions, PrecedenceMode, SqlBuilderOptions, SqlBuilderWalker,
    SyntaxTree,
};
use pretty_assertions::assert_eq;

const STATEMENTS: &[&str] = &[
    "select 1",
    "select * from foo",
    "select t.*, a as x, b y, 'lit' from t",
    "select distinct a, b from t",
    "select distinct on (a, b) a, b, c from t",
    "select a from only t",
    "select a from t *",
    "select t.* from s.t as x (a, b)",
    "select * from a join b on a.id = b.id left join c using (x, y)",
    "select * from a natural full join b",
    "select * from a cross join b, c",
    "select * from (a join b on a.x = b.x) as j",
    "select * from (select 1) as s (x)",
    "select * from t, lateral (select t.a) as s",
    "select * from generate_series(1, 3) with ordinality as g (i, n)",
    "select * from rows from (f(1), g() as (a pg_catalog.int4)) as r",
    "select * from t tablesample bernoulli(10) repeatable (7)",
    "select count(*), count(distinct a), sum(a order by b) from t",
    "select percentile_cont(0.5) within group (order by a) filter (where b > 0) from t",
    "select rank() over (partition by a order by b desc nulls first) from t",
    "select sum(a) over w from t window w as (order by b rows between 1 preceding and unbounded following)",
    "select f(a := 1, b := x)",
    "select f(variadic a)",
    "select case when a then 1 else 2 end, case a when 1 then 'x' end from t",
    "select coalesce(a, 0), nullif(a, b), greatest(1, 2), least(1, 2)",
    "select pg_catalog.date_part('epoch', ts) from t",
    "select a::pg_catalog.int4, b::pg_catalog.numeric(10, 2), c::pg_catalog.int4[]",
    "select '1 day'::interval, '1'::interval hour, '1.5'::interval(3)",
    "select b'0101', x'ff', 3.5, 1e10, -42, $1, :name",
    "select row(1, 2), (1, 2, 3), array[1, 2], array[[1], [2]]",
    "select a.b[1].c, (a.b).c, ($1).f, x[1:2], y[:], z[2:]",
    "select (select 1), exists(select 1), not exists(select 1)",
    "select a < any (select b from t), c = all (select d from u)",
    "select (a, b) overlaps (c, d)",
    "select a collate \"C\" from t",
    "select ts at time zone 'UTC' from t",
    "select current_date, current_timestamp(3), current_user, localtime",
    "select a is distinct from b, c is not null, d is true, e is of (pg_catalog.int4)",
    "select a between symmetric 1 and 2, b not between 3 and 4 from t",
    "select a like 'x%' escape '!', b not similar to c from t",
    "select a in (1, 2), b not in (select c from u) from t",
    "select \"SELECT\", \"select\" from \"my table\"",
    "select 1 union select 2 intersect select 3",
    "select 1 union (select 2 union all select 3)",
    "(select 1 order by 1) union select 2",
    "select a from t group by rollup(a), cube(a, b), grouping sets (a, (a, b), ()), ()",
    "select a, grouping(a) from t group by a having count(*) > 1",
    "select a from t order by a using <, b desc nulls last limit 10 offset 5",
    "select * from t where a = 1 for update of t nowait for key share",
    "with recursive r (n) as (select 1 union all select n + 1 from r) select n from r limit 3",
    "with d as (delete from old_rows returning id) insert into archive select * from d",
    "values (1, 'a'), (2, default)",
    "insert into t default values",
    "insert into t (a, b) values (1, default) returning *",
    "insert into t as x (a) select b from u on conflict (a) where a > 0 do update set a = excluded.a where x.a < excluded.a",
    "insert into t values (1) on conflict on constraint t_pkey do nothing",
    "insert into t overriding user value select 1",
    "update t as x set a = 1, (b, c) = (2, 3), d = default where x.a > 0 returning x.*",
    "update t set (a, b) = (select 1, 2) from u where t.id = u.id",
    "delete from only t as x using u where x.id = u.id returning x.*",
    "select xmlelement(name el, xmlattributes(a as x, b), 'body'), xmlforest(a, b as c)",
    "select xmlpi(name php, 'echo'), xmlroot(d, version '1.0', standalone yes), xmlconcat(a, b)",
    "select xmlparse(document doc preserve whitespace), xmlserialize(content x as pg_catalog.varchar)",
    "select * from xmltable('/r/x' passing d columns a pg_catalog.varchar path '/a' default 'z' not null, b for ordinality) as xt",
];

fn print(tree: &SyntaxTree, parentheses: ParenthesesMode) -> String {
    let mut walker = SqlBuilderWalker::new(SqlBuilderOptions {
        parentheses,
        ..SqlBuilderOptions::compact()
    });
    tree.sql(&mut walker).unwrap()
}

#[test]
fn round_trips_to_an_equal_tree() {
    // `Current` parentheses target 9.5+ re-parsing; a pre-9.5 reader
    // needs the `Compat` ones
    let configurations = [
        (PrecedenceMode::Current, ParenthesesMode::Current),
        (PrecedenceMode::Pre95, ParenthesesMode::Compat),
    ];
    for (mode, parentheses) in configurations {
        let parser = Parser::new(ParserOptions { precedence: mode });
        for input in STATEMENTS {
            let first = parser
                .parse_statement(input)
                .unwrap_or_else(|e| panic!("{input}: {e}"));
            first.check_consistency().unwrap();
            let printed = print(&first, parentheses);
            let second = parser
                .parse_statement(&printed)
                .unwrap_or_else(|e| panic!("{input} printed as {printed}: {e}"));
            assert_eq!(second.dump(), first.dump(), "round-trip of {input}");
            assert_eq!(
                print(&second, parentheses),
                printed,
                "idempotence of {input}"
            );
        }
    }
}

#[test]
fn pretty_output_parses_to_the_same_tree_too() {
    let parser = Parser::default();
    for input in STATEMENTS {
        let first = parser.parse_statement(input).unwrap();
        let mut pretty = SqlBuilderWalker::new(SqlBuilderOptions {
            wrap: Some(40),
            ..SqlBuilderOptions::default()
        });
        let printed = first.sql(&mut pretty).unwrap();
        let second = parser
            .parse_statement(&printed)
            .unwrap_or_else(|e| panic!("{input} pretty-printed as {printed}: {e}"));
        assert_eq!(second.dump(), first.dump(), "pretty round-trip of {input}");
    }
}

#[test]
fn compat_parentheses_read_the_same_under_both_modes() {
    let current = Parser::default();
    let pre95 = Parser::new(ParserOptions {
        precedence: PrecedenceMode::Pre95,
    });
    for input in STATEMENTS {
        let tree = current.parse_statement(input).unwrap();
        let printed = print(&tree, ParenthesesMode::Compat);
        let as_current = current
            .parse_statement(&printed)
            .unwrap_or_else(|e| panic!("{printed}: {e}"));
        let as_pre95 = pre95
            .parse_statement(&printed)
            .unwrap_or_else(|e| panic!("{printed}: {e}"));
        assert_eq!(as_current.dump(), tree.dump(), "compat/current of {input}");
        assert_eq!(as_pre95.dump(), tree.dump(), "compat/pre95 of {input}");
    }
}

#[test]
fn mode_sensitive_inputs_differ_between_modes() {
    let current = Parser::default();
    let pre95 = Parser::new(ParserOptions {
        precedence: PrecedenceMode::Pre95,
    });
    let input = "select 1 = 2 is null";
    assert_ne!(
        current.parse_statement(input).unwrap().dump(),
        pre95.parse_statement(input).unwrap().dump(),
    );
}
