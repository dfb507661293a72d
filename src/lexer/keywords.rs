// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The PostgreSQL keyword table.
//!
//! Every keyword carries the PostgreSQL 10 parser classification, which
//! decides where it may double as an identifier: unreserved keywords are
//! valid column and table names, column-name keywords are valid column
//! names but not function names, type-or-function-name keywords the
//! other way around, and fully reserved keywords are never identifiers
//! unless quoted.

use std::collections::HashMap;

use lazy_static::lazy_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum KeywordCategory {
    Unreserved,
    ColName,
    TypeFuncName,
    Reserved,
}

/// Defines the [`Keyword`] enum, its uppercase spelling table and the
/// category lookup in one place so the three can never drift apart.
macro_rules! define_keywords {
    ($($ident:ident => $cat:ident),* $(,)?) => {
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub enum Keyword {
            $($ident),*
        }

        pub const ALL_KEYWORDS: &[Keyword] = &[$(Keyword::$ident),*];

        impl Keyword {
            /// Uppercase spelling, mainly for error messages.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$ident => stringify!($ident)),*
                }
            }

            pub fn category(self) -> KeywordCategory {
                match self {
                    $(Self::$ident => KeywordCategory::$cat),*
                }
            }
        }
    };
}

define_keywords!(
    ABORT => Unreserved,
    ABSOLUTE => Unreserved,
    ACCESS => Unreserved,
    ACTION => Unreserved,
    ADD => Unreserved,
    ADMIN => Unreserved,
    AFTER => Unreserved,
    AGGREGATE => Unreserved,
    ALL => Reserved,
    ALSO => Unreserved,
    ALTER => Unreserved,
    ALWAYS => Unreserved,
    ANALYSE => Reserved,
    ANALYZE => Reserved,
    AND => Reserved,
    ANY => Reserved,
    ARRAY => Reserved,
    AS => Reserved,
    ASC => Reserved,
    ASSERTION => Unreserved,
    ASSIGNMENT => Unreserved,
    ASYMMETRIC => Reserved,
    AT => Unreserved,
    ATTACH => Unreserved,
    ATTRIBUTE => Unreserved,
    AUTHORIZATION => TypeFuncName,
    BACKWARD => Unreserved,
    BEFORE => Unreserved,
    BEGIN => Unreserved,
    BETWEEN => ColName,
    BIGINT => ColName,
    BINARY => TypeFuncName,
    BIT => ColName,
    BOOLEAN => ColName,
    BOTH => Reserved,
    BY => Unreserved,
    CACHE => Unreserved,
    CALLED => Unreserved,
    CASCADE => Unreserved,
    CASCADED => Unreserved,
    CASE => Reserved,
    CAST => Reserved,
    CATALOG => Unreserved,
    CHAIN => Unreserved,
    CHAR => ColName,
    CHARACTER => ColName,
    CHARACTERISTICS => Unreserved,
    CHECK => Reserved,
    CHECKPOINT => Unreserved,
    CLASS => Unreserved,
    CLOSE => Unreserved,
    CLUSTER => Unreserved,
    COALESCE => ColName,
    COLLATE => Reserved,
    COLLATION => TypeFuncName,
    COLUMN => Reserved,
    COLUMNS => Unreserved,
    COMMENT => Unreserved,
    COMMENTS => Unreserved,
    COMMIT => Unreserved,
    COMMITTED => Unreserved,
    CONCURRENTLY => TypeFuncName,
    CONFIGURATION => Unreserved,
    CONFLICT => Unreserved,
    CONNECTION => Unreserved,
    CONSTRAINT => Reserved,
    CONSTRAINTS => Unreserved,
    CONTENT => Unreserved,
    CONTINUE => Unreserved,
    CONVERSION => Unreserved,
    COPY => Unreserved,
    COST => Unreserved,
    CREATE => Reserved,
    CROSS => TypeFuncName,
    CSV => Unreserved,
    CUBE => Unreserved,
    CURRENT => Unreserved,
    CURRENT_CATALOG => Reserved,
    CURRENT_DATE => Reserved,
    CURRENT_ROLE => Reserved,
    CURRENT_SCHEMA => TypeFuncName,
    CURRENT_TIME => Reserved,
    CURRENT_TIMESTAMP => Reserved,
    CURRENT_USER => Reserved,
    CURSOR => Unreserved,
    CYCLE => Unreserved,
    DATA => Unreserved,
    DATABASE => Unreserved,
    DAY => Unreserved,
    DEALLOCATE => Unreserved,
    DEC => ColName,
    DECIMAL => ColName,
    DECLARE => Unreserved,
    DEFAULT => Reserved,
    DEFAULTS => Unreserved,
    DEFERRABLE => Reserved,
    DEFERRED => Unreserved,
    DEFINER => Unreserved,
    DELETE => Unreserved,
    DELIMITER => Unreserved,
    DELIMITERS => Unreserved,
    DEPENDS => Unreserved,
    DESC => Reserved,
    DETACH => Unreserved,
    DICTIONARY => Unreserved,
    DISABLE => Unreserved,
    DISCARD => Unreserved,
    DISTINCT => Reserved,
    DO => Reserved,
    DOCUMENT => Unreserved,
    DOMAIN => Unreserved,
    DOUBLE => Unreserved,
    DROP => Unreserved,
    EACH => Unreserved,
    ELSE => Reserved,
    ENABLE => Unreserved,
    ENCODING => Unreserved,
    ENCRYPTED => Unreserved,
    END => Reserved,
    ENUM => Unreserved,
    ESCAPE => Unreserved,
    EVENT => Unreserved,
    EXCEPT => Reserved,
    EXCLUDE => Unreserved,
    EXCLUDING => Unreserved,
    EXCLUSIVE => Unreserved,
    EXECUTE => Unreserved,
    EXISTS => ColName,
    EXPLAIN => Unreserved,
    EXTENSION => Unreserved,
    EXTERNAL => Unreserved,
    EXTRACT => ColName,
    FALSE => Reserved,
    FAMILY => Unreserved,
    FETCH => Reserved,
    FILTER => Unreserved,
    FIRST => Unreserved,
    FLOAT => ColName,
    FOLLOWING => Unreserved,
    FOR => Reserved,
    FORCE => Unreserved,
    FOREIGN => Reserved,
    FORWARD => Unreserved,
    FREEZE => TypeFuncName,
    FROM => Reserved,
    FULL => TypeFuncName,
    FUNCTION => Unreserved,
    FUNCTIONS => Unreserved,
    GENERATED => Unreserved,
    GLOBAL => Unreserved,
    GRANT => Reserved,
    GRANTED => Unreserved,
    GREATEST => ColName,
    GROUP => Reserved,
    GROUPING => ColName,
    HANDLER => Unreserved,
    HAVING => Reserved,
    HEADER => Unreserved,
    HOLD => Unreserved,
    HOUR => Unreserved,
    IDENTITY => Unreserved,
    IF => Unreserved,
    ILIKE => TypeFuncName,
    IMMEDIATE => Unreserved,
    IMMUTABLE => Unreserved,
    IMPLICIT => Unreserved,
    IMPORT => Unreserved,
    IN => Reserved,
    INCLUDING => Unreserved,
    INCREMENT => Unreserved,
    INDEX => Unreserved,
    INDEXES => Unreserved,
    INHERIT => Unreserved,
    INHERITS => Unreserved,
    INITIALLY => Reserved,
    INLINE => Unreserved,
    INNER => TypeFuncName,
    INOUT => ColName,
    INPUT => Unreserved,
    INSENSITIVE => Unreserved,
    INSERT => Unreserved,
    INSTEAD => Unreserved,
    INT => ColName,
    INTEGER => ColName,
    INTERSECT => Reserved,
    INTERVAL => ColName,
    INTO => Reserved,
    INVOKER => Unreserved,
    IS => TypeFuncName,
    ISNULL => TypeFuncName,
    ISOLATION => Unreserved,
    JOIN => TypeFuncName,
    KEY => Unreserved,
    LABEL => Unreserved,
    LANGUAGE => Unreserved,
    LARGE => Unreserved,
    LAST => Unreserved,
    LATERAL => Reserved,
    LEADING => Reserved,
    LEAKPROOF => Unreserved,
    LEAST => ColName,
    LEFT => TypeFuncName,
    LEVEL => Unreserved,
    LIKE => TypeFuncName,
    LIMIT => Reserved,
    LISTEN => Unreserved,
    LOAD => Unreserved,
    LOCAL => Unreserved,
    LOCALTIME => Reserved,
    LOCALTIMESTAMP => Reserved,
    LOCATION => Unreserved,
    LOCK => Unreserved,
    LOCKED => Unreserved,
    LOGGED => Unreserved,
    MAPPING => Unreserved,
    MATCH => Unreserved,
    MATERIALIZED => Unreserved,
    MAXVALUE => Unreserved,
    METHOD => Unreserved,
    MINUTE => Unreserved,
    MINVALUE => Unreserved,
    MODE => Unreserved,
    MONTH => Unreserved,
    MOVE => Unreserved,
    NAME => Unreserved,
    NAMES => Unreserved,
    NATIONAL => ColName,
    NATURAL => TypeFuncName,
    NCHAR => ColName,
    NEW => Unreserved,
    NEXT => Unreserved,
    NO => Unreserved,
    NONE => ColName,
    NOT => Reserved,
    NOTHING => Unreserved,
    NOTIFY => Unreserved,
    NOTNULL => TypeFuncName,
    NOWAIT => Unreserved,
    NULL => Reserved,
    NULLIF => ColName,
    NULLS => Unreserved,
    NUMERIC => ColName,
    OBJECT => Unreserved,
    OF => Unreserved,
    OFF => Unreserved,
    OFFSET => Reserved,
    OIDS => Unreserved,
    OLD => Unreserved,
    ON => Reserved,
    ONLY => Reserved,
    OPERATOR => Unreserved,
    OPTION => Unreserved,
    OPTIONS => Unreserved,
    OR => Reserved,
    ORDER => Reserved,
    ORDINALITY => Unreserved,
    OUT => ColName,
    OUTER => TypeFuncName,
    OVER => Unreserved,
    OVERLAPS => TypeFuncName,
    OVERLAY => ColName,
    OVERRIDING => Unreserved,
    OWNED => Unreserved,
    OWNER => Unreserved,
    PARALLEL => Unreserved,
    PARSER => Unreserved,
    PARTIAL => Unreserved,
    PARTITION => Unreserved,
    PASSING => Unreserved,
    PASSWORD => Unreserved,
    PLACING => Reserved,
    PLANS => Unreserved,
    POLICY => Unreserved,
    POSITION => ColName,
    PRECEDING => Unreserved,
    PRECISION => ColName,
    PREPARE => Unreserved,
    PREPARED => Unreserved,
    PRESERVE => Unreserved,
    PRIMARY => Reserved,
    PRIOR => Unreserved,
    PRIVILEGES => Unreserved,
    PROCEDURAL => Unreserved,
    PROCEDURE => Unreserved,
    PROGRAM => Unreserved,
    PUBLICATION => Unreserved,
    QUOTE => Unreserved,
    RANGE => Unreserved,
    READ => Unreserved,
    REAL => ColName,
    REASSIGN => Unreserved,
    RECHECK => Unreserved,
    RECURSIVE => Unreserved,
    REF => Unreserved,
    REFERENCES => Reserved,
    REFERENCING => Unreserved,
    REFRESH => Unreserved,
    REINDEX => Unreserved,
    RELATIVE => Unreserved,
    RELEASE => Unreserved,
    RENAME => Unreserved,
    REPEATABLE => Unreserved,
    REPLACE => Unreserved,
    REPLICA => Unreserved,
    RESET => Unreserved,
    RESTART => Unreserved,
    RESTRICT => Unreserved,
    RETURNING => Reserved,
    RETURNS => Unreserved,
    REVOKE => Unreserved,
    RIGHT => TypeFuncName,
    ROLE => Unreserved,
    ROLLBACK => Unreserved,
    ROLLUP => Unreserved,
    ROW => ColName,
    ROWS => Unreserved,
    RULE => Unreserved,
    SAVEPOINT => Unreserved,
    SCHEMA => Unreserved,
    SCHEMAS => Unreserved,
    SCROLL => Unreserved,
    SEARCH => Unreserved,
    SECOND => Unreserved,
    SECURITY => Unreserved,
    SELECT => Reserved,
    SEQUENCE => Unreserved,
    SEQUENCES => Unreserved,
    SERIALIZABLE => Unreserved,
    SERVER => Unreserved,
    SESSION => Unreserved,
    SESSION_USER => Reserved,
    SET => Unreserved,
    SETOF => ColName,
    SETS => Unreserved,
    SHARE => Unreserved,
    SHOW => Unreserved,
    SIMILAR => TypeFuncName,
    SIMPLE => Unreserved,
    SKIP => Unreserved,
    SMALLINT => ColName,
    SNAPSHOT => Unreserved,
    SOME => Reserved,
    SQL => Unreserved,
    STABLE => Unreserved,
    STANDALONE => Unreserved,
    START => Unreserved,
    STATEMENT => Unreserved,
    STATISTICS => Unreserved,
    STDIN => Unreserved,
    STDOUT => Unreserved,
    STORAGE => Unreserved,
    STRICT => Unreserved,
    STRIP => Unreserved,
    SUBSCRIPTION => Unreserved,
    SUBSTRING => ColName,
    SYMMETRIC => Reserved,
    SYSID => Unreserved,
    SYSTEM => Unreserved,
    TABLE => Reserved,
    TABLES => Unreserved,
    TABLESAMPLE => TypeFuncName,
    TABLESPACE => Unreserved,
    TEMP => Unreserved,
    TEMPLATE => Unreserved,
    TEMPORARY => Unreserved,
    TEXT => Unreserved,
    THEN => Reserved,
    TIME => ColName,
    TIMESTAMP => ColName,
    TO => Reserved,
    TRAILING => Reserved,
    TRANSACTION => Unreserved,
    TRANSFORM => Unreserved,
    TREAT => ColName,
    TRIGGER => Unreserved,
    TRIM => ColName,
    TRUE => Reserved,
    TRUNCATE => Unreserved,
    TRUSTED => Unreserved,
    TYPE => Unreserved,
    TYPES => Unreserved,
    UESCAPE => Unreserved,
    UNBOUNDED => Unreserved,
    UNCOMMITTED => Unreserved,
    UNENCRYPTED => Unreserved,
    UNION => Reserved,
    UNIQUE => Reserved,
    UNKNOWN => Unreserved,
    UNLISTEN => Unreserved,
    UNLOGGED => Unreserved,
    UNTIL => Unreserved,
    UPDATE => Unreserved,
    USER => Reserved,
    USING => Reserved,
    VACUUM => Unreserved,
    VALID => Unreserved,
    VALIDATE => Unreserved,
    VALIDATOR => Unreserved,
    VALUE => Unreserved,
    VALUES => ColName,
    VARCHAR => ColName,
    VARIADIC => Reserved,
    VARYING => Unreserved,
    VERBOSE => TypeFuncName,
    VERSION => Unreserved,
    VIEW => Unreserved,
    VIEWS => Unreserved,
    VOLATILE => Unreserved,
    WHEN => Reserved,
    WHERE => Reserved,
    WHITESPACE => Unreserved,
    WINDOW => Reserved,
    WITH => Reserved,
    WITHIN => Unreserved,
    WITHOUT => Unreserved,
    WORK => Unreserved,
    WRAPPER => Unreserved,
    WRITE => Unreserved,
    XML => Unreserved,
    XMLATTRIBUTES => ColName,
    XMLCONCAT => ColName,
    XMLELEMENT => ColName,
    XMLEXISTS => ColName,
    XMLFOREST => ColName,
    XMLNAMESPACES => ColName,
    XMLPARSE => ColName,
    XMLPI => ColName,
    XMLROOT => ColName,
    XMLSERIALIZE => ColName,
    XMLTABLE => ColName,
    YEAR => Unreserved,
    YES => Unreserved,
    ZONE => Unreserved,
);

lazy_static! {
    static ref KEYWORD_MAP: HashMap<String, Keyword> = ALL_KEYWORDS
        .iter()
        .map(|kw| (kw.as_str().to_ascii_lowercase(), *kw))
        .collect();
}

impl Keyword {
    /// Case-insensitive lookup against the keyword table.
    pub fn lookup(ident: &str) -> Option<Keyword> {
        KEYWORD_MAP.get(&ident.to_ascii_lowercase()).copied()
    }

    /// Lowercase canonical spelling, the form the SQL printer emits.
    pub fn text(self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    /// Usable as a column, table or alias name (`ColId`).
    pub fn is_col_id(self) -> bool {
        matches!(
            self.category(),
            KeywordCategory::Unreserved | KeywordCategory::ColName
        )
    }

    /// Usable as a function or type name.
    pub fn is_type_func_name(self) -> bool {
        matches!(
            self.category(),
            KeywordCategory::Unreserved | KeywordCategory::TypeFuncName
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Keyword::lookup("SeLeCt"), Some(Keyword::SELECT));
        assert_eq!(Keyword::lookup("uescape"), Some(Keyword::UESCAPE));
        assert_eq!(Keyword::lookup("foo"), None);
    }

    #[test]
    fn categories() {
        assert_eq!(Keyword::SELECT.category(), KeywordCategory::Reserved);
        assert_eq!(Keyword::BETWEEN.category(), KeywordCategory::ColName);
        assert_eq!(Keyword::ILIKE.category(), KeywordCategory::TypeFuncName);
        assert_eq!(Keyword::ROLLUP.category(), KeywordCategory::Unreserved);
        assert!(Keyword::ROLLUP.is_col_id());
        assert!(!Keyword::SELECT.is_col_id());
        assert!(Keyword::LIKE.is_type_func_name());
        assert!(!Keyword::INTERVAL.is_type_func_name());
    }
}
