//! Rule operators and the matcher that applies them.
//!
//! Rule literals are always stored as raw text. They are interpreted here,
//! against an already-parsed actual value. Malformed literals never match:
//! a badly configured rule must not award points.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kind::{parse_bool, parse_number, Scalar};

lazy_static! {
    /// A `between` literal: two unsigned bounds joined by `,`, `to`, `..` (or
    /// longer) or `-`. Bounds may carry an exponent, e.g. `1e-3`.
    static ref RANGE_LITERAL: Regex = Regex::new(
        r"(?i)^\s*((?:\d+(?:\.\d*)?|\.\d+)(?:e[+-]?\d+)?)\s*(?:,|to|\.{2,}|-)\s*((?:\d+(?:\.\d*)?|\.\d+)(?:e[+-]?\d+)?)\s*$"
    )
    .unwrap();
}

/// An operator name that is not part of the supported set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown operator: '{0}'")]
pub struct UnknownOperator(pub String);

/// Comparison operator of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Between,
    In,
    NotIn,
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 10] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Between,
        Operator::In,
        Operator::NotIn,
        Operator::Contains,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Between => "between",
            Operator::In => "in",
            Operator::NotIn => "notin",
            Operator::Contains => "contains",
        }
    }

    /// Operators that only make sense for numbers.
    pub const fn is_numeric_comparison(self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le | Operator::Between
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == trimmed)
            .ok_or_else(|| UnknownOperator(trimmed.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = UnknownOperator;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

/// Decide whether a rule matches a parsed actual value.
///
/// Missing values never reach this function; the engine records them as
/// skipped beforehand.
pub fn matches(operator: Operator, literal: &str, actual: &Scalar) -> bool {
    match operator {
        Operator::Eq => equals(literal, actual).unwrap_or(false),
        // An uncomparable literal fails `!=` too, it does not default to true.
        Operator::Ne => equals(literal, actual).map(|eq| !eq).unwrap_or(false),
        Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le => {
            compare(operator, literal, actual)
        }
        Operator::Between => match (actual.as_number(), parse_range(literal)) {
            (Some(n), Some((min, max))) => min <= n && n <= max,
            _ => false,
        },
        Operator::In => {
            let list = parse_list(literal);
            let actual = actual.to_string();
            list.iter().any(|item| *item == actual)
        }
        Operator::NotIn => {
            let list = parse_list(literal);
            if list.is_empty() {
                return false;
            }
            let actual = actual.to_string();
            !list.iter().any(|item| *item == actual)
        }
        Operator::Contains => {
            if literal.trim().is_empty() {
                return false;
            }
            actual
                .to_string()
                .to_lowercase()
                .contains(&literal.to_lowercase())
        }
    }
}

/// Type-aware equality. `None` when the literal cannot be read as the
/// actual value's type.
fn equals(literal: &str, actual: &Scalar) -> Option<bool> {
    match actual {
        Scalar::Number(n) => parse_number(literal).map(|expected| *n == expected),
        Scalar::Boolean(b) => parse_bool(literal).map(|expected| *b == expected),
        Scalar::Text(s) => Some(s == literal.trim()),
    }
}

fn compare(operator: Operator, literal: &str, actual: &Scalar) -> bool {
    let (Some(n), Some(threshold)) = (actual.as_number(), parse_number(literal)) else {
        return false;
    };

    match operator {
        Operator::Gt => n > threshold,
        Operator::Lt => n < threshold,
        Operator::Ge => n >= threshold,
        Operator::Le => n <= threshold,
        _ => false,
    }
}

/// Parse a `between` literal into `(min, max)`.
///
/// `"25,45"`, `"25 to 45"`, `"25..45"` and `"25 - 45"` are equivalent. Anything
/// other than exactly two numeric bounds is malformed. A `-` outside an
/// exponent is a delimiter, so negative bounds cannot be expressed.
pub fn parse_range(literal: &str) -> Option<(f64, f64)> {
    let caps = RANGE_LITERAL.captures(literal)?;
    Some((parse_number(&caps[1])?, parse_number(&caps[2])?))
}

/// Parse an `in`/`notin` literal into its trimmed, non-empty items.
pub fn parse_list(literal: &str) -> Vec<&str> {
    literal
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Scalar {
        Scalar::Number(n)
    }

    fn text(s: &str) -> Scalar {
        Scalar::Text(s.to_string())
    }

    #[test]
    fn test_operator_round_trip_names() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
        assert_eq!(" between ".parse::<Operator>().unwrap(), Operator::Between);
        assert!("BETWEEN".parse::<Operator>().is_err());
        assert_eq!(
            "~=".parse::<Operator>(),
            Err(UnknownOperator("~=".to_string()))
        );
    }

    #[test]
    fn test_operator_serde() {
        let op: Operator = serde_json::from_str("\"notin\"").unwrap();
        assert_eq!(op, Operator::NotIn);
        assert_eq!(serde_json::to_string(&Operator::Ge).unwrap(), "\">=\"");
        assert!(serde_json::from_str::<Operator>("\"like\"").is_err());
    }

    #[test]
    fn test_numeric_equality() {
        assert!(matches(Operator::Eq, "25", &num(25.0)));
        assert!(matches(Operator::Eq, " 25.0 ", &num(25.0)));
        assert!(!matches(Operator::Eq, "26", &num(25.0)));
        assert!(matches(Operator::Ne, "26", &num(25.0)));
    }

    #[test]
    fn test_not_equal_with_unparsable_numeric_literal_fails() {
        assert!(!matches(Operator::Eq, "abc", &num(25.0)));
        assert!(!matches(Operator::Ne, "abc", &num(25.0)));
    }

    #[test]
    fn test_boolean_equality() {
        assert!(matches(Operator::Eq, "true", &Scalar::Boolean(true)));
        assert!(matches(Operator::Eq, "FALSE", &Scalar::Boolean(false)));
        assert!(matches(Operator::Ne, "false", &Scalar::Boolean(true)));
        assert!(!matches(Operator::Ne, "maybe", &Scalar::Boolean(true)));
    }

    #[test]
    fn test_string_equality_is_case_sensitive() {
        assert!(matches(Operator::Eq, "Salaried", &text("Salaried")));
        assert!(!matches(Operator::Eq, "salaried", &text("Salaried")));
        assert!(matches(Operator::Ne, "salaried", &text("Salaried")));
    }

    #[test]
    fn test_ordering_operators() {
        assert!(matches(Operator::Gt, "50000", &num(60000.0)));
        assert!(!matches(Operator::Gt, "60000", &num(60000.0)));
        assert!(matches(Operator::Ge, "60000", &num(60000.0)));
        assert!(matches(Operator::Lt, "18", &num(17.0)));
        assert!(matches(Operator::Le, "18", &num(18.0)));
        assert!(!matches(Operator::Gt, "oops", &num(1.0)));
    }

    #[test]
    fn test_ordering_never_matches_non_numbers() {
        assert!(!matches(Operator::Gt, "1", &text("5")));
        assert!(!matches(Operator::Le, "1", &Scalar::Boolean(true)));
        assert!(!matches(Operator::Between, "1,10", &text("5")));
    }

    #[test]
    fn test_between_delimiters() {
        for literal in ["25,45", "25 to 45", "25 TO 45", "25-45", "25 - 45", "25..45", "25...45"] {
            assert_eq!(parse_range(literal), Some((25.0, 45.0)), "literal {literal}");
        }
    }

    #[test]
    fn test_between_exponent_bounds() {
        assert_eq!(parse_range("1e-3,5"), Some((0.001, 5.0)));
        assert_eq!(parse_range("1E-3 to 2e+2"), Some((0.001, 200.0)));
        assert_eq!(parse_range("2.5e-1-7"), Some((0.25, 7.0)));
        assert_eq!(parse_range(".5..1.5"), Some((0.5, 1.5)));
        assert!(matches(Operator::Between, "1e-3,1e-2", &num(0.005)));
    }

    #[test]
    fn test_between_bounds_inclusive() {
        assert!(matches(Operator::Between, "20,39", &num(20.0)));
        assert!(matches(Operator::Between, "20,39", &num(39.0)));
        assert!(!matches(Operator::Between, "20,39", &num(39.5)));
        assert!(matches(Operator::Between, "0.5..1.5", &num(1.0)));
    }

    #[test]
    fn test_between_malformed() {
        assert_eq!(parse_range("25"), None);
        assert_eq!(parse_range("1,2,3"), None);
        assert_eq!(parse_range("a to b"), None);
        assert_eq!(parse_range(""), None);
        assert_eq!(parse_range("-5,10"), None);
        assert_eq!(parse_range("5,10,"), None);
        assert!(!matches(Operator::Between, "25", &num(25.0)));
    }

    #[test]
    fn test_in_and_notin() {
        let literal = "Salaried, Self-Employed";
        assert!(matches(Operator::In, literal, &text("Salaried")));
        assert!(matches(Operator::In, literal, &text("Self-Employed")));
        assert!(!matches(Operator::In, literal, &text("Retired")));
        assert!(matches(Operator::NotIn, literal, &text("Retired")));
        assert!(!matches(Operator::NotIn, literal, &text("Salaried")));
    }

    #[test]
    fn test_in_uses_string_form_of_numbers() {
        assert!(matches(Operator::In, "1,2,3", &num(2.0)));
        assert!(!matches(Operator::In, "1.0,2.0", &num(2.0)));
    }

    #[test]
    fn test_empty_lists_never_match() {
        assert!(!matches(Operator::In, " , ,", &text("x")));
        assert!(!matches(Operator::NotIn, "", &text("x")));
        assert_eq!(parse_list(" a ,, b "), vec!["a", "b"]);
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        assert!(matches(Operator::Contains, "VIP", &text("this is a vip client")));
        assert!(matches(Operator::Contains, "vip", &text("VIP")));
        assert!(!matches(Operator::Contains, "VIP", &text("regular")));
        assert!(!matches(Operator::Contains, "  ", &text("a b")));
    }
}
