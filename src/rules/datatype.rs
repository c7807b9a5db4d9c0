//! Column data type rules.

use std::sync::LazyLock;

use regex::Regex;

use super::{Rewrite, Rule, RuleCategory, RuleInfo, lexical, substitute};
use crate::translator::LineContext;

/// Widest precision Snowflake accepts for fixed-point numbers
const MAX_DECIMAL_PRECISION: u32 = 38;

static CHAR_LENGTH_UNIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<ty>(?:VAR)?CHAR)\s*\(\s*(?P<n>\d+)\s+(?:BYTE|CHAR)\s*\)")
        .expect("valid regex")
});

static NVARCHAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNVARCHAR\b").expect("valid regex"));

static NCHAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNCHAR\b").expect("valid regex"));

static FLOAT_N_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFLOAT[48]\b").expect("valid regex"));

static UNSIGNED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+UNSIGNED\b").expect("valid regex"));

static DECIMAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<ty>DECIMAL|NUMERIC)\s*\(\s*(?P<p>\d+)\s*,\s*(?P<s>\d+)\s*\)")
        .expect("valid regex")
});

static FLOAT_DOUBLE_SCALE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<ty>FLOAT|DOUBLE)\s*\(\s*\d+\s*,\s*\d+\s*\)").expect("valid regex")
});

static LONG_TEXT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:LONG|MEDIUM)TEXT\b").expect("valid regex"));

static BPCHAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bbpchar\b").expect("valid regex"));

static CHARACTER_VARYING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcharacter\s+varying\b").expect("valid regex"));

static INT_DISPLAY_WIDTH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bINT\s*\(\s*\d+\s*\)").expect("valid regex"));

static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:INTEGER|BIGINT)\b").expect("valid regex"));

/// `JSON` in a type position: after whitespace or a `::` cast.
static JSON_TYPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?P<lead>\s|::)JSON\b").expect("valid regex"));

pub struct CharLengthUnit;

impl Rule for CharLengthUnit {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE001",
            name:     "CHAR(n BYTE) length unit dropped",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &CHAR_LENGTH_UNIT_REGEX, "${ty}(${n})")
    }
}

pub struct Nvarchar;

impl Rule for Nvarchar {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE002",
            name:     "NVARCHAR to VARCHAR",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &NVARCHAR_REGEX, "VARCHAR")
    }
}

pub struct Nchar;

impl Rule for Nchar {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE003",
            name:     "NCHAR to CHAR",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &NCHAR_REGEX, "CHAR")
    }
}

pub struct FloatN;

impl Rule for FloatN {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE004",
            name:     "FLOAT4/FLOAT8 to FLOAT",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &FLOAT_N_REGEX, "FLOAT")
    }
}

pub struct Unsigned;

impl Rule for Unsigned {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE005",
            name:     "UNSIGNED dropped",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &UNSIGNED_REGEX, "")
    }
}

/// Precision above 38 is clamped; the scale is kept
pub struct DecimalPrecision;

impl Rule for DecimalPrecision {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE006",
            name:     "DECIMAL precision clamped to 38",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        lexical::rewrite_outside_literals(line, &DECIMAL_REGEX, |caps| {
            let precision: u32 = caps["p"].parse().ok()?;
            if !caps["ty"].eq_ignore_ascii_case("DECIMAL") || precision <= MAX_DECIMAL_PRECISION
            {
                return None;
            }
            Some(format!(
                "{}({},{})",
                &caps["ty"], MAX_DECIMAL_PRECISION, &caps["s"]
            ))
        })
        .map(|(rewritten, clause)| Rewrite::new(rewritten, clause))
    }
}

pub struct FloatDoubleScale;

impl Rule for FloatDoubleScale {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE007",
            name:     "FLOAT(p,s)/DOUBLE(p,s) precision dropped",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &FLOAT_DOUBLE_SCALE_REGEX, "${ty}")
    }
}

pub struct LongText;

impl Rule for LongText {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE008",
            name:     "LONGTEXT/MEDIUMTEXT to STRING",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &LONG_TEXT_REGEX, "STRING")
    }
}

pub struct Bpchar;

impl Rule for Bpchar {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE009",
            name:     "bpchar to char",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &BPCHAR_REGEX, "char")
    }
}

pub struct CharacterVarying;

impl Rule for CharacterVarying {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE010",
            name:     "character varying to varchar",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &CHARACTER_VARYING_REGEX, "varchar")
    }
}

/// MySQL display width, `INT(11)`
pub struct IntDisplayWidth;

impl Rule for IntDisplayWidth {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE011",
            name:     "INT(n) to INTEGER",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &INT_DISPLAY_WIDTH_REGEX, "INTEGER")
    }
}

pub struct Integer;

impl Rule for Integer {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE012",
            name:     "INTEGER/BIGINT to NUMERIC(18,0)",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &INTEGER_REGEX, "NUMERIC(18,0)")
    }
}

/// Fractional `NUMERIC(p,s)` becomes `DOUBLE`; scale 0 stays fixed-point
pub struct NumericScale;

impl Rule for NumericScale {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE013",
            name:     "NUMERIC(p,s>0) to DOUBLE",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        lexical::rewrite_outside_literals(line, &DECIMAL_REGEX, |caps| {
            let scale: u32 = caps["s"].parse().ok()?;
            (caps["ty"].eq_ignore_ascii_case("NUMERIC") && scale > 0).then(|| "DOUBLE".to_string())
        })
        .map(|(rewritten, clause)| Rewrite::new(rewritten, clause))
    }
}

pub struct Json;

impl Rule for Json {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "TYPE014",
            name:     "JSON to VARIANT",
            category: RuleCategory::DataType
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &JSON_TYPE_REGEX, "${lead}VARIANT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(rule: &dyn Rule, line: &str) -> Option<String> {
        rule.apply(line, &LineContext::default()).map(|rw| rw.line)
    }

    #[test]
    fn test_char_length_unit() {
        assert_eq!(
            apply(&CharLengthUnit, "  code VARCHAR2(10 BYTE),").as_deref(),
            None
        );
        assert_eq!(
            apply(&CharLengthUnit, "  code CHAR(10 BYTE),").as_deref(),
            Some("  code CHAR(10),")
        );
        assert_eq!(
            apply(&CharLengthUnit, "  name VARCHAR(20 CHAR) NOT NULL,").as_deref(),
            Some("  name VARCHAR(20) NOT NULL,")
        );
    }

    #[test]
    fn test_national_types() {
        assert_eq!(
            apply(&Nvarchar, "  a NVARCHAR(10),").as_deref(),
            Some("  a VARCHAR(10),")
        );
        assert_eq!(apply(&Nchar, "  b nchar(2),").as_deref(), Some("  b CHAR(2),"));
        assert!(apply(&Nchar, "  b NVARCHAR(2),").is_none());
    }

    #[test]
    fn test_float_n() {
        assert_eq!(apply(&FloatN, "  x FLOAT8,").as_deref(), Some("  x FLOAT,"));
        assert!(apply(&FloatN, "  x FLOAT,").is_none());
    }

    #[test]
    fn test_unsigned() {
        assert_eq!(
            apply(&Unsigned, "  n INT(10) UNSIGNED NOT NULL,").as_deref(),
            Some("  n INT(10) NOT NULL,")
        );
    }

    #[test]
    fn test_decimal_precision_clamped() {
        assert_eq!(
            apply(&DecimalPrecision, "  amt DECIMAL(65,30),").as_deref(),
            Some("  amt DECIMAL(38,30),")
        );
        assert!(apply(&DecimalPrecision, "  amt DECIMAL(38,2),").is_none());
        assert!(apply(&DecimalPrecision, "  amt NUMERIC(65,3),").is_none());
    }

    #[test]
    fn test_float_double_scale() {
        assert_eq!(
            apply(&FloatDoubleScale, "  r DOUBLE(10,2) DEFAULT NULL,").as_deref(),
            Some("  r DOUBLE DEFAULT NULL,")
        );
        assert!(apply(&FloatDoubleScale, "  r FLOAT(10),").is_none());
    }

    #[test]
    fn test_long_text() {
        assert_eq!(apply(&LongText, "  body longtext,").as_deref(), Some("  body STRING,"));
        assert_eq!(apply(&LongText, "  body MEDIUMTEXT").as_deref(), Some("  body STRING"));
    }

    #[test]
    fn test_postgres_type_names() {
        assert_eq!(
            apply(&Bpchar, "  flag bpchar(1),").as_deref(),
            Some("  flag char(1),")
        );
        assert_eq!(
            apply(&CharacterVarying, "  name character varying(256),").as_deref(),
            Some("  name varchar(256),")
        );
    }

    #[test]
    fn test_integer_chain() {
        let widened = apply(&IntDisplayWidth, "  id INT(11) NOT NULL,").unwrap();
        assert_eq!(widened, "  id INTEGER NOT NULL,");
        assert_eq!(
            apply(&Integer, &widened).as_deref(),
            Some("  id NUMERIC(18,0) NOT NULL,")
        );
        assert!(apply(&Integer, "  id NUMERIC(18,0) NOT NULL,").is_none());
        assert_eq!(
            apply(&Integer, "SELECT a::bigint").as_deref(),
            Some("SELECT a::NUMERIC(18,0)")
        );
    }

    #[test]
    fn test_numeric_scale() {
        assert_eq!(
            apply(&NumericScale, "  price NUMERIC(12,2),").as_deref(),
            Some("  price DOUBLE,")
        );
        assert!(apply(&NumericScale, "  id NUMERIC(18,0),").is_none());
    }

    #[test]
    fn test_json_type() {
        assert_eq!(apply(&Json, "  doc JSON,").as_deref(), Some("  doc VARIANT,"));
        assert_eq!(apply(&Json, "SELECT x::json").as_deref(), Some("SELECT x::VARIANT"));
        assert!(apply(&Json, "SELECT PARSE_JSON(x)").is_none());
        assert!(apply(&Json, "SELECT JSON_EXTRACT_PATH_TEXT(x, 'a')").is_none());
    }

    #[test]
    fn test_types_inside_literals_untouched() {
        assert!(apply(&Integer, "SELECT 'integer'").is_none());
        assert!(apply(&LongText, "COMMENT 'longtext column'").is_none());
    }
}
