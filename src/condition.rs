//! Condition parsing and evaluation.
//!
//! A condition has the shape `<key> <operator> <value>`. The key names a
//! variable in the environment mapping; the value is a literal. Comparisons are
//! numeric when both sides parse as `f64`, otherwise they compare the raw
//! strings byte-wise. `startsWith` and `endsWith` are always string tests.

use crate::env::Environment;
use std::fmt;
use std::str::FromStr;

/// Comparison operators, in the priority order used to split condition text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    StartsWith,
    EndsWith,
}

impl Operator {
    /// All operators in detection priority order.
    pub const ALL: [Operator; 8] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Ge,
        Operator::Le,
        Operator::Gt,
        Operator::Lt,
        Operator::StartsWith,
        Operator::EndsWith,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
        }
    }

    /// Applies the operator to an environment value and a literal.
    pub fn compare(&self, env_value: &str, literal: &str) -> bool {
        match self {
            Operator::StartsWith => return env_value.starts_with(literal),
            Operator::EndsWith => return env_value.ends_with(literal),
            _ => {}
        }

        if let (Ok(lhs), Ok(rhs)) = (env_value.parse::<f64>(), literal.parse::<f64>()) {
            return self.apply(&lhs, &rhs);
        }
        self.apply(env_value, literal)
    }

    fn apply<T: PartialOrd + ?Sized>(&self, lhs: &T, rhs: &T) -> bool {
        match self {
            Operator::Eq => lhs == rhs,
            Operator::Ne => lhs != rhs,
            Operator::Ge => lhs >= rhs,
            Operator::Le => lhs <= rhs,
            Operator::Gt => lhs > rhs,
            Operator::Lt => lhs < rhs,
            Operator::StartsWith | Operator::EndsWith => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a supported operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// Comma separated list of supported operators, for diagnostics.
pub fn supported_operators() -> String {
    Operator::ALL.iter().map(Operator::as_str).collect::<Vec<_>>().join(", ")
}

/// A parsed `<key> <operator> <value>` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub key: String,
    pub operator: Operator,
    pub value: String,
}

impl Condition {
    /// Parses condition text.
    ///
    /// The first operator (in [`Operator::ALL`] order) that occurs surrounded by
    /// single spaces splits the text. The split must produce exactly two parts.
    /// Surrounding quotes are removed from the value.
    ///
    /// Returns `None` when no operator is found or the split is ambiguous.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let operator = Operator::ALL
            .into_iter()
            .find(|op| text.contains(&format!(" {} ", op.as_str())))?;

        let separator = format!(" {} ", operator.as_str());
        let parts: Vec<&str> = text.split(separator.as_str()).collect();
        let [key, value] = parts.as_slice() else {
            return None;
        };

        Some(Self {
            key: key.trim().to_string(),
            operator,
            value: value.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string(),
        })
    }

    /// Evaluates the condition against `env`. A missing key reads as "".
    pub fn evaluate(&self, env: &Environment) -> bool {
        self.operator.compare(env.get(&self.key).unwrap_or_default(), &self.value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.key, self.operator, self.value)
    }
}

/// Evaluates `key operator literal` against `env`.
///
/// An operator outside the supported set evaluates to `false`.
pub fn evaluate(key: &str, operator: &str, literal: &str, env: &Environment) -> bool {
    match operator.parse::<Operator>() {
        Ok(op) => op.compare(env.get(key).unwrap_or_default(), literal),
        Err(_) => false,
    }
}
