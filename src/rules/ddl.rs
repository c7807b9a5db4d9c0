//! Table and statement level DDL rules.
//!
//! Redshift physical-design clauses (`DISTKEY`, `SORTKEY`, `ENCODE`,
//! `DISTSTYLE`) have no Snowflake equivalent and are discarded. Statements
//! Snowflake handles differently (`ALTER TABLE`, `GRANT`, session `SET`,
//! `CREATE INDEX`) are discarded whole; when they span several lines the
//! rule opens a suppression region that runs to the statement terminator.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    Rewrite, Rule, RuleCategory, RuleInfo, Terminator, discard_statement, lexical, substitute
};
use crate::translator::LineContext;

static DEFAULT_SYSDATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+DEFAULT\s+SYSDATE\b").expect("valid regex"));

static ALTER_TABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<pre>\s*)(?P<clause>ALTER\s+TABLE\b.*)$").expect("valid regex")
});

static OWNER_TO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\bOWNER\s+TO\b.*$").expect("valid regex"));

static GRANT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<pre>\s*)(?P<clause>(?:GRANT|REVOKE)\s.*)$").expect("valid regex")
});

static CREATE_TABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCREATE\s+TABLE\s+").expect("valid regex"));

static CREATE_TABLE_IF_NOT_EXISTS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bCREATE\s+TABLE\s+IF\s+NOT\s+EXISTS\b").expect("valid regex")
});

static DISTKEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\bDISTKEY\b(?:\s*\([^)]*\))?").expect("valid regex"));

/// Table-level `SORTKEY` whose column list is not closed on this line. It
/// must open the table options: start of line, or right after the `)` that
/// closes the column list, optionally behind `DISTSTYLE`.
static SORTKEY_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<pre>\s*(?:\)\s*)?)(?P<clause>(?:DISTSTYLE\s+\w+\s+)?(?:COMPOUND\s+|INTERLEAVED\s+)?SORTKEY\s*(?:\([^)]*)?)\s*$"
    )
    .expect("valid regex")
});

static SORTKEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\b(?:COMPOUND\s+|INTERLEAVED\s+)?SORTKEY\b(?:\s*\([^)]*\)|\s+AUTO\b)?")
        .expect("valid regex")
});

static CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:\bDEFAULT\s+)?(?:\bCHARACTER\s+SET|\bCHARSET)\s*=?\s*utf8(?:mb[34])?\b")
        .expect("valid regex")
});

static AUTO_INCREMENT_OPTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\bAUTO_INCREMENT\s*=\s*\d+").expect("valid regex"));

static AUTO_INCREMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAUTO_INCREMENT\b").expect("valid regex"));

static DEFAULT_ZERO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDEFAULT\s*'0'").expect("valid regex"));

static DEFAULT_ZERO_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<clause>DEFAULT\s*'0000-00-00')(?P<after>\s|,|$)").expect("valid regex")
});

static DEFAULT_ZERO_TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<clause>DEFAULT\s*'0000-00-00 00:00:00(?:\.0*)?')(?P<after>\s|,|$)")
        .expect("valid regex")
});

static BINARY_DEFAULT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<ty>\b(?:VAR)?BINARY\b(?:\s*\(\s*\d+\s*\))?)(?P<mods>[^,]*?)(?P<default>\s+DEFAULT\s+(?:'[^']*'|[^\s,]+))"
    )
    .expect("valid regex")
});

static SESSION_SET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<pre>\s*)(?P<clause>SET\s+\S.*)$").expect("valid regex")
});

static ENCODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+ENCODE\s+\w+").expect("valid regex"));

static DISTSTYLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\bDISTSTYLE\s+\w+").expect("valid regex"));

/// pg_dump form: `DEFAULT "identity"(oid, 0, '1,1'::text)`, optionally with
/// the text wrapped in a varchar cast.
static IDENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\s*\bDEFAULT\s+"?identity"?\(\s*\d+\s*,\s*\d+\s*,\s*\(*'\(?(?P<seed>-?\d+)\s*,\s*(?P<step>-?\d+)\)?'(?:::(?:character varying|varchar))?\)*::text\s*\)"#
    )
    .expect("valid regex")
});

static VIEW_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<pre>\s*CREATE\s+(?:OR\s+REPLACE\s+)?VIEW\s+)(?P<name>[A-Za-z_][A-Za-z0-9_$]*)(?P<post>(?:\s|\().*|)$"
    )
    .expect("valid regex")
});

static CREATE_INDEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<pre>.*?)(?P<clause>\bCREATE\s+(?:UNIQUE\s+|BITMAP\s+)?INDEX\b.*)$")
        .expect("valid regex")
});

/// `DEFAULT SYSDATE` is dropped: Snowflake column defaults must be literals
pub struct DefaultSysdate;

impl Rule for DefaultSysdate {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL001",
            name:     "DEFAULT SYSDATE dropped",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &DEFAULT_SYSDATE_REGEX, "")
    }
}

/// `ALTER TABLE` statements are discarded
///
/// Covers `ADD PRIMARY KEY` and `OWNER TO` forms spread over several lines.
pub struct AlterTable;

impl Rule for AlterTable {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL002",
            name:     "ALTER TABLE discarded",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        ALTER_TABLE_REGEX.captures(line).map(|caps| discard_statement(&caps))
    }
}

pub struct OwnerTo;

impl Rule for OwnerTo {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL003",
            name:     "OWNER TO discarded",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let found = OWNER_TO_REGEX.find(line)?;
        if !lexical::is_code_at(line, found.start()) {
            return None;
        }
        Some(Rewrite::new(&line[..found.start()], found.as_str().trim()))
    }
}

/// Privileges are managed through Snowflake roles, not copied grants
pub struct Grant;

impl Rule for Grant {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL004",
            name:     "GRANT/REVOKE discarded",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        GRANT_REGEX.captures(line).map(|caps| discard_statement(&caps))
    }
}

pub struct CreateTable;

impl Rule for CreateTable {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL005",
            name:     "CREATE TABLE to CREATE OR REPLACE TABLE",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        // OR REPLACE and IF NOT EXISTS are mutually exclusive in Snowflake
        if lexical::matches_outside_literals(line, &CREATE_TABLE_IF_NOT_EXISTS_REGEX) {
            return None;
        }
        substitute(line, &CREATE_TABLE_REGEX, "CREATE OR REPLACE TABLE ")
    }
}

pub struct Distkey;

impl Rule for Distkey {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL006",
            name:     "DISTKEY dropped",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &DISTKEY_REGEX, "")
    }
}

/// A `SORTKEY (` whose column list continues on following lines is
/// discarded through the end of the statement
pub struct SortkeyBlock;

impl Rule for SortkeyBlock {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL007",
            name:     "Multi-line SORTKEY suppressed",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let caps = SORTKEY_BLOCK_REGEX.captures(line)?;
        let clause = caps.name("clause")?;
        if !lexical::is_code_at(line, clause.start()) {
            return None;
        }
        Some(Rewrite::new(&caps["pre"], clause.as_str().trim()).suppress(Terminator::STATEMENT))
    }
}

pub struct Sortkey;

impl Rule for Sortkey {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL008",
            name:     "SORTKEY dropped",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &SORTKEY_REGEX, "")
    }
}

pub struct Charset;

impl Rule for Charset {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL009",
            name:     "CHARACTER SET utf8 dropped",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &CHARSET_REGEX, "")
    }
}

/// MySQL `AUTO_INCREMENT` column attribute; the `AUTO_INCREMENT=n` table
/// option has no equivalent and is dropped
pub struct AutoIncrement;

impl Rule for AutoIncrement {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL010",
            name:     "AUTO_INCREMENT to AUTOINCREMENT",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        match substitute(line, &AUTO_INCREMENT_OPTION_REGEX, "") {
            Some(option) => Some(option),
            None => substitute(line, &AUTO_INCREMENT_REGEX, "AUTOINCREMENT")
        }
    }
}

pub struct DefaultZero;

impl Rule for DefaultZero {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL011",
            name:     "DEFAULT '0' to DEFAULT 0",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let found = DEFAULT_ZERO_REGEX.find(line)?;
        Some(Rewrite::new(
            DEFAULT_ZERO_REGEX.replace_all(line, "DEFAULT 0").into_owned(),
            found.as_str()
        ))
    }
}

/// Zero dates only parse once cast explicitly
pub struct DefaultZeroDate;

impl Rule for DefaultZeroDate {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL012",
            name:     "Zero date default cast to DATE",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let caps = DEFAULT_ZERO_DATE_REGEX.captures(line)?;
        Some(Rewrite::new(
            DEFAULT_ZERO_DATE_REGEX
                .replace_all(line, "${clause}::DATE${after}")
                .into_owned(),
            &caps["clause"]
        ))
    }
}

pub struct DefaultZeroTimestamp;

impl Rule for DefaultZeroTimestamp {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL013",
            name:     "Zero timestamp default cast to TIMESTAMP",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let caps = DEFAULT_ZERO_TIMESTAMP_REGEX.captures(line)?;
        Some(Rewrite::new(
            DEFAULT_ZERO_TIMESTAMP_REGEX
                .replace_all(line, "${clause}::TIMESTAMP${after}")
                .into_owned(),
            &caps["clause"]
        ))
    }
}

pub struct BinaryDefault;

impl Rule for BinaryDefault {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL014",
            name:     "DEFAULT on BINARY column dropped",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let caps = BINARY_DEFAULT_REGEX.captures(line)?;
        Some(Rewrite::new(
            BINARY_DEFAULT_REGEX
                .replace_all(line, "${ty}${mods}")
                .into_owned(),
            caps["default"].trim()
        ))
    }
}

/// Session `SET` statements
///
/// Only fires at the start of a statement, so the `SET` clause of a
/// multi-line `UPDATE` is left alone.
pub struct SessionSet;

impl Rule for SessionSet {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL015",
            name:     "Session SET discarded",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, ctx: &LineContext) -> Option<Rewrite> {
        if !ctx.at_statement_start() {
            return None;
        }
        SESSION_SET_REGEX
            .captures(line)
            .map(|caps| discard_statement(&caps))
    }
}

pub struct Encode;

impl Rule for Encode {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL016",
            name:     "ENCODE dropped",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &ENCODE_REGEX, "")
    }
}

pub struct Diststyle;

impl Rule for Diststyle {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL017",
            name:     "DISTSTYLE dropped",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &DISTSTYLE_REGEX, "")
    }
}

/// Redshift identity default to `IDENTITY(seed,step)`
pub struct Identity;

impl Rule for Identity {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL018",
            name:     "Redshift identity default to IDENTITY",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let found = IDENTITY_REGEX.find(line)?;
        Some(Rewrite::new(
            IDENTITY_REGEX
                .replace_all(line, " IDENTITY(${seed},${step})")
                .into_owned(),
            found.as_str().trim()
        ))
    }
}

/// Unqualified view names are placed in the schema named after the document,
/// upper-cased like Snowflake's unquoted identifiers
pub struct ViewSchema;

impl Rule for ViewSchema {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL019",
            name:     "View qualified with document schema",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, ctx: &LineContext) -> Option<Rewrite> {
        let schema = ctx.document()?.to_ascii_uppercase();
        let caps = VIEW_NAME_REGEX.captures(line)?;
        let name = &caps["name"];
        Some(Rewrite::new(
            format!("{}{}.{}{}", &caps["pre"], schema, name, &caps["post"]),
            name
        ))
    }
}

/// Snowflake has no secondary indexes
pub struct CreateIndex;

impl Rule for CreateIndex {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DDL020",
            name:     "CREATE INDEX discarded",
            category: RuleCategory::Ddl
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let caps = CREATE_INDEX_REGEX.captures(line)?;
        let clause = caps.name("clause")?;
        if !lexical::is_code_at(line, clause.start()) {
            return None;
        }
        Some(discard_statement(&caps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Control;

    fn ctx() -> LineContext {
        LineContext::new(None)
    }

    #[test]
    fn test_create_table() {
        let rw = CreateTable.apply("CREATE TABLE foo (", &ctx()).unwrap();
        assert_eq!(rw.line, "CREATE OR REPLACE TABLE foo (");
        assert_eq!(rw.note, "CREATE TABLE");
        assert!(CreateTable.apply(&rw.line, &ctx()).is_none());
    }

    #[test]
    fn test_create_table_if_not_exists_untouched() {
        assert!(
            CreateTable
                .apply("CREATE TABLE IF NOT EXISTS foo (", &ctx())
                .is_none()
        );
    }

    #[test]
    fn test_default_sysdate() {
        let rw = DefaultSysdate
            .apply("  created_at TIMESTAMP DEFAULT SYSDATE ENCODE az64,", &ctx())
            .unwrap();
        assert_eq!(rw.line, "  created_at TIMESTAMP ENCODE az64,");
    }

    #[test]
    fn test_alter_table_terminated() {
        let rw = AlterTable
            .apply("ALTER TABLE foo OWNER TO admin;", &ctx())
            .unwrap();
        assert_eq!(rw.line, "");
        assert_eq!(rw.control, Control::TerminateLine);
        assert!(rw.discards_statement);
    }

    #[test]
    fn test_alter_table_multiline_suppresses() {
        let rw = AlterTable.apply("ALTER TABLE foo", &ctx()).unwrap();
        assert_eq!(rw.control, Control::EnterSuppression(Terminator::STATEMENT));
    }

    #[test]
    fn test_owner_to() {
        let rw = OwnerTo.apply("CREATE SCHEMA s OWNER TO admin;", &ctx()).unwrap();
        assert_eq!(rw.line, "CREATE SCHEMA s");
        assert_eq!(rw.note, "OWNER TO admin;");
        assert!(!rw.discards_statement);
        assert!(OwnerTo.apply("  owner VARCHAR(10),", &ctx()).is_none());
    }

    #[test]
    fn test_grant() {
        let rw = Grant.apply("GRANT SELECT ON foo TO bar;", &ctx()).unwrap();
        assert_eq!(rw.line, "");
        assert_eq!(rw.control, Control::TerminateLine);
    }

    #[test]
    fn test_distkey() {
        let rw = Distkey.apply("  id INTEGER DISTKEY,", &ctx()).unwrap();
        assert_eq!(rw.line, "  id INTEGER,");
        let rw = Distkey.apply(") DISTKEY(id)", &ctx()).unwrap();
        assert_eq!(rw.line, ")");
        assert!(Distkey.apply("DISTSTYLE KEY", &ctx()).is_none());
    }

    #[test]
    fn test_sortkey_block() {
        let rw = SortkeyBlock.apply("SORTKEY (", &ctx()).unwrap();
        assert_eq!(rw.line, "");
        assert_eq!(rw.note, "SORTKEY (");
        assert_eq!(rw.control, Control::EnterSuppression(Terminator::STATEMENT));
        assert!(!rw.discards_statement);
        let rw = SortkeyBlock.apply(") COMPOUND SORTKEY(a,", &ctx()).unwrap();
        assert_eq!(rw.line, ") ");
    }

    #[test]
    fn test_sortkey_closed_is_not_block() {
        assert!(SortkeyBlock.apply("SORTKEY(a, b);", &ctx()).is_none());
        assert!(SortkeyBlock.apply("SORTKEY AUTO;", &ctx()).is_none());
    }

    #[test]
    fn test_column_sortkey_is_not_block() {
        assert!(SortkeyBlock.apply("  id INT SORTKEY", &ctx()).is_none());
        assert!(SortkeyBlock.apply("  id INT SORTKEY,", &ctx()).is_none());
        let rw = Sortkey.apply("  id INT SORTKEY", &ctx()).unwrap();
        assert_eq!(rw.line, "  id INT");
    }

    #[test]
    fn test_sortkey_block_after_diststyle() {
        let rw = SortkeyBlock.apply(") DISTSTYLE KEY SORTKEY (", &ctx()).unwrap();
        assert_eq!(rw.line, ") ");
        assert_eq!(rw.note, "DISTSTYLE KEY SORTKEY (");
    }

    #[test]
    fn test_sortkey_inline() {
        let rw = Sortkey.apply(") SORTKEY(a, b);", &ctx()).unwrap();
        assert_eq!(rw.line, ");");
        let rw = Sortkey.apply(") INTERLEAVED SORTKEY (a);", &ctx()).unwrap();
        assert_eq!(rw.line, ");");
    }

    #[test]
    fn test_charset_and_auto_increment() {
        let rw = Charset
            .apply(") ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;", &ctx())
            .unwrap();
        assert_eq!(rw.line, ") ENGINE=InnoDB;");
        let rw = AutoIncrement
            .apply("  id INT NOT NULL AUTO_INCREMENT,", &ctx())
            .unwrap();
        assert_eq!(rw.line, "  id INT NOT NULL AUTOINCREMENT,");
        let rw = AutoIncrement.apply(") AUTO_INCREMENT=42;", &ctx()).unwrap();
        assert_eq!(rw.line, ");");
    }

    #[test]
    fn test_zero_defaults() {
        let rw = DefaultZero.apply("  n INT DEFAULT '0',", &ctx()).unwrap();
        assert_eq!(rw.line, "  n INT DEFAULT 0,");
        let rw = DefaultZeroDate
            .apply("  d DATE DEFAULT '0000-00-00',", &ctx())
            .unwrap();
        assert_eq!(rw.line, "  d DATE DEFAULT '0000-00-00'::DATE,");
        assert!(DefaultZeroDate.apply(&rw.line, &ctx()).is_none());
        let rw = DefaultZeroTimestamp
            .apply("  t DATETIME DEFAULT '0000-00-00 00:00:00'", &ctx())
            .unwrap();
        assert_eq!(rw.line, "  t DATETIME DEFAULT '0000-00-00 00:00:00'::TIMESTAMP");
        assert!(DefaultZeroTimestamp.apply(&rw.line, &ctx()).is_none());
    }

    #[test]
    fn test_binary_default() {
        let rw = BinaryDefault
            .apply("  flag BINARY(1) NOT NULL DEFAULT 0,", &ctx())
            .unwrap();
        assert_eq!(rw.line, "  flag BINARY(1) NOT NULL,");
        assert_eq!(rw.note, "DEFAULT 0");
    }

    #[test]
    fn test_session_set_needs_statement_start() {
        let rw = SessionSet
            .apply("SET search_path TO analytics;", &ctx())
            .unwrap();
        assert_eq!(rw.line, "");
        let mut inside_update = ctx();
        inside_update.record_line("UPDATE foo", Some("UPDATE foo"));
        assert!(SessionSet.apply("SET a = 1", &inside_update).is_none());
    }

    #[test]
    fn test_encode_and_diststyle() {
        let rw = Encode.apply("  name VARCHAR(20) ENCODE lzo,", &ctx()).unwrap();
        assert_eq!(rw.line, "  name VARCHAR(20),");
        let rw = Diststyle.apply(") DISTSTYLE EVEN;", &ctx()).unwrap();
        assert_eq!(rw.line, ");");
    }

    #[test]
    fn test_identity() {
        let rw = Identity
            .apply(
                "  id BIGINT NOT NULL DEFAULT \"identity\"(101235, 0, '1,1'::text),",
                &ctx()
            )
            .unwrap();
        assert_eq!(rw.line, "  id BIGINT NOT NULL IDENTITY(1,1),");
        let rw = Identity
            .apply(
                "  id INTEGER DEFAULT \"identity\"(5, 0, ('100,10'::varchar)::text)",
                &ctx()
            )
            .unwrap();
        assert_eq!(rw.line, "  id INTEGER IDENTITY(100,10)");
    }

    #[test]
    fn test_view_schema() {
        let ctx = LineContext::new(Some("sales"));
        let rw = ViewSchema.apply("CREATE OR REPLACE VIEW v_orders AS", &ctx).unwrap();
        assert_eq!(rw.line, "CREATE OR REPLACE VIEW SALES.v_orders AS");
        assert!(ViewSchema.apply(&rw.line, &ctx).is_none());
        assert!(ViewSchema.apply("CREATE VIEW", &ctx).is_none());
        assert!(
            ViewSchema
                .apply("CREATE VIEW v AS", &LineContext::new(None))
                .is_none()
        );
    }

    #[test]
    fn test_create_index() {
        let rw = CreateIndex
            .apply("CREATE UNIQUE INDEX ix ON foo (a);", &ctx())
            .unwrap();
        assert_eq!(rw.line, "");
        assert_eq!(rw.control, Control::TerminateLine);
        assert!(rw.discards_statement);
        let rw = CreateIndex.apply("CREATE INDEX ix ON foo", &ctx()).unwrap();
        assert_eq!(rw.control, Control::EnterSuppression(Terminator::STATEMENT));
    }
}
