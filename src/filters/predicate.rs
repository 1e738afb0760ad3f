//! Typed predicate built from dashboard filters
//!
//! A [`Predicate`] is an ordered list of [`Condition`]s joined with `AND`.
//! It has two renderings:
//!
//! - [`Predicate::to_sql`] produces the SQL text of the condition, with
//!   string literals escaped; it is used for logging and display.
//! - [`Predicate::to_expr`] produces a Polars expression with the selected
//!   values bound as literals; it is what query execution applies, so
//!   filter values never become part of any SQL text that gets parsed.

use polars::prelude::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column IN ('a', 'b')`
    In {
        column: &'static str,
        values: Vec<String>,
    },
    /// `column >= bound`
    AtLeast { column: &'static str, bound: f64 },
    /// `column <= bound`
    AtMost { column: &'static str, bound: f64 },
}

impl Condition {
    pub fn column(&self) -> &'static str {
        match self {
            Self::In { column, .. }
            | Self::AtLeast { column, .. }
            | Self::AtMost { column, .. } => column,
        }
    }

    pub fn to_sql(&self) -> String {
        match self {
            Self::In { column, values } => {
                let literals: Vec<String> = values.iter().map(|v| quote_literal(v)).collect();
                format!("{} IN ({})", quote_ident(column), literals.join(", "))
            }
            Self::AtLeast { column, bound } => format!("{} >= {bound}", quote_ident(column)),
            Self::AtMost { column, bound } => format!("{} <= {bound}", quote_ident(column)),
        }
    }

    pub fn to_expr(&self) -> Expr {
        match self {
            Self::In { column, values } => {
                let accepted = Series::new("accepted".into(), values.as_slice());
                col(*column).is_in(lit(accepted))
            }
            Self::AtLeast { column, bound } => col(*column).gt_eq(lit(*bound)),
            Self::AtMost { column, bound } => col(*column).lt_eq(lit(*bound)),
        }
    }
}

/// Conditions AND-combined in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column IN (values)`; an empty selection adds nothing
    pub fn is_in(mut self, column: &'static str, values: &[String]) -> Self {
        if !values.is_empty() {
            self.conditions.push(Condition::In {
                column,
                values: values.to_vec(),
            });
        }
        self
    }

    pub fn at_least(mut self, column: &'static str, bound: Option<f64>) -> Self {
        if let Some(bound) = bound {
            self.conditions.push(Condition::AtLeast { column, bound });
        }
        self
    }

    pub fn at_most(mut self, column: &'static str, bound: Option<f64>) -> Self {
        if let Some(bound) = bound {
            self.conditions.push(Condition::AtMost { column, bound });
        }
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// SQL boolean expression; empty string when nothing is filtered
    pub fn to_sql(&self) -> String {
        self.conditions
            .iter()
            .map(Condition::to_sql)
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// `WHERE <predicate>`, or an empty string when nothing is filtered
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.to_sql())
        }
    }

    /// Row filter with bound values; `None` selects every row
    pub fn to_expr(&self) -> Option<Expr> {
        self.conditions
            .iter()
            .map(Condition::to_expr)
            .reduce(|acc, expr| acc.and(expr))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Quote an identifier unless it is a plain `[A-Za-z_][A-Za-z0-9_]*` name
pub fn quote_ident(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if plain {
        name.to_owned()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Single-quoted SQL string literal with embedded quotes doubled
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
