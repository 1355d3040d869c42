//! SQL text generation for one batch of mapped rows.
//!
//! Every generated file is self-contained:
//!
//! ```text
//! START TRANSACTION;
//!
//! -- purge preamble (first batch only)
//! -- Insert batch data
//! INSERT INTO partners (`partnerCode`, ..., `isActive`) VALUES ('P-1', ..., 1);
//!
//! COMMIT;
//! ```
//!
//! The column list is resolved once per run into an [`InsertPlan`]; rendering
//! a batch only formats literals.

use std::fmt::Write as _;

use itertools::Itertools;
use log::debug;

use crate::{
    batch::Batch,
    data::{Row, Value},
    profile::{ExportProfile, PurgePlan},
};

pub const NULL_LITERAL: &str = "NULL";
pub const ACTIVE_LITERAL: &str = "1";

/// Renders a value as a SQL literal.
///
/// Strings only have their single quotes doubled. The missing-number sentinel
/// (NaN or an infinity) is only recognised on floats; a string cell that reads
/// `NaN` stays a quoted string.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => NULL_LITERAL.to_string(),
        Value::String(s) => quote(s),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) if !f.is_finite() => NULL_LITERAL.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        Value::Boolean(true) => quote("True"),
        Value::Boolean(false) => quote("False"),
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Backtick-quoted identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PlannedValue {
    Column(usize),
    Active,
}

/// Resolved INSERT column list: which row position feeds each target column.
#[derive(Debug, Clone)]
pub struct InsertPlan {
    table: String,
    columns: Vec<(String, PlannedValue)>,
    column_list: String,
}

impl InsertPlan {
    pub fn new(headers: &[String], profile: &ExportProfile) -> Self {
        let mut columns = Vec::with_capacity(headers.len() + 1);
        for (idx, header) in headers.iter().enumerate() {
            if profile.is_excluded(header) {
                continue;
            }
            columns.push((header.clone(), PlannedValue::Column(idx)));
            if let Some(dual) = profile.dual_cased(header) {
                columns.push((dual.alias(), PlannedValue::Column(idx)));
            }
        }
        if let Some(active) = &profile.active_column {
            columns.push((active.clone(), PlannedValue::Active));
        }
        let column_list = columns
            .iter()
            .map(|(name, _)| quote_identifier(name))
            .join(", ");
        debug!("Insert columns for `{}`: {column_list}", profile.table);
        Self {
            table: profile.table.clone(),
            columns,
            column_list,
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn insert_statement(&self, row: &Row) -> String {
        let values = self
            .columns
            .iter()
            .map(|(_, planned)| match planned {
                PlannedValue::Column(idx) => row.get(*idx).map_or_else(
                    || NULL_LITERAL.to_string(),
                    literal,
                ),
                PlannedValue::Active => ACTIVE_LITERAL.to_string(),
            })
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({values});",
            self.table, self.column_list
        )
    }
}

/// Chunked delete sequence clearing the target table before the first batch.
pub fn purge_preamble(table: &str, plan: &PurgePlan) -> String {
    let mut out = String::new();
    out.push_str("-- Purge existing rows in capped chunks to bound undo log growth\n");
    out.push_str("SET autocommit = 0;\n");
    for _ in 0..plan.chunks {
        let _ = writeln!(out, "DELETE FROM {table} LIMIT {};", plan.chunk_limit);
        out.push_str("COMMIT;\n");
    }
    let _ = writeln!(out, "DELETE FROM {table};");
    out.push_str("COMMIT;\n");
    out.push_str("SET autocommit = 1;\n");
    out
}

pub struct SqlEmitter<'a> {
    plan: InsertPlan,
    purge: Option<&'a PurgePlan>,
    table: &'a str,
}

impl<'a> SqlEmitter<'a> {
    pub fn new(headers: &[String], profile: &'a ExportProfile) -> Self {
        Self {
            plan: InsertPlan::new(headers, profile),
            purge: profile.purge.as_ref(),
            table: &profile.table,
        }
    }

    pub fn plan(&self) -> &InsertPlan {
        &self.plan
    }

    /// Full script text for one batch.
    pub fn render(&self, batch: &Batch<'_>) -> String {
        let mut out = String::with_capacity(64 + batch.len() * 256);
        out.push_str("START TRANSACTION;\n\n");
        if batch.is_first()
            && let Some(plan) = self.purge
        {
            out.push_str(&purge_preamble(self.table, plan));
            out.push('\n');
        }
        out.push_str("-- Insert batch data\n");
        for row in batch.rows {
            out.push_str(&self.plan.insert_statement(row));
            out.push('\n');
        }
        out.push_str("\nCOMMIT;\n");
        out
    }
}
