// expr.rs — Matcher AST and evaluation.
//
// The AST is deliberately closed: every matcher a config can express is one
// of these variants, so evaluation is total and auditable. There is no
// escape hatch into arbitrary code.

use tw_event::ToolCallEvent;

/// An event field a comparison can read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// The operation kind (`tool`).
    Tool,
    /// A named input parameter (`input.<key>`).
    Input(String),
}

impl Field {
    /// Resolve the field against an event.
    ///
    /// `None` means the field is absent (an input key the event doesn't
    /// carry). Non-string input values resolve to their canonical JSON
    /// text so comparisons still apply.
    fn resolve(&self, event: &ToolCallEvent) -> Option<String> {
        match self {
            Field::Tool => Some(event.tool.clone()),
            Field::Input(key) => event.input_text(key),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Tool => f.write_str("tool"),
            Field::Input(key) => write!(f, "input.{}", key),
        }
    }
}

/// Comparison operators on string-valued fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Ne,
    Contains,
    StartsWith,
    EndsWith,
}

/// A parsed matcher expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `field op "literal"`
    Compare {
        field: Field,
        op: Cmp,
        value: String,
    },
    /// `field in ["a", "b", ...]`
    In { field: Field, values: Vec<String> },
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate this matcher against an event. Pure and total.
    ///
    /// Missing fields never satisfy a positive comparison. The one negative
    /// operator, `!=`, is true for a missing field: the field provably does
    /// not equal the literal.
    pub fn matches(&self, event: &ToolCallEvent) -> bool {
        match self {
            Expr::Compare { field, op, value } => match (field.resolve(event), op) {
                (Some(actual), Cmp::Eq) => actual == *value,
                (Some(actual), Cmp::Ne) => actual != *value,
                (Some(actual), Cmp::Contains) => actual.contains(value.as_str()),
                (Some(actual), Cmp::StartsWith) => actual.starts_with(value.as_str()),
                (Some(actual), Cmp::EndsWith) => actual.ends_with(value.as_str()),
                (None, Cmp::Ne) => true,
                (None, _) => false,
            },
            Expr::In { field, values } => field
                .resolve(event)
                .map(|actual| values.iter().any(|v| *v == actual))
                .unwrap_or(false),
            Expr::Not(inner) => !inner.matches(event),
            Expr::And(lhs, rhs) => lhs.matches(event) && rhs.matches(event),
            Expr::Or(lhs, rhs) => lhs.matches(event) || rhs.matches(event),
        }
    }
}
