//! Schema mapping from source-locale headers to target field names.
//!
//! A [`ColumnMapping`] is an explicit value handed to [`ColumnMapping::apply`],
//! never global state, so alternative schemas can be exercised in tests or
//! loaded from a profile file.
//!
//! Applying a mapping performs three steps over a loaded [`RowSet`]:
//!
//! 1. columns whose *original* header is listed in `drop_columns` are removed;
//! 2. remaining headers found among the `from` keys are renamed to `to`;
//!    unmapped headers pass through unchanged;
//! 3. every column named in `date_columns` (a target name) is coerced to
//!    [`Value::Date`]. Values that cannot be read as a date become
//!    [`Value::Null`]; this never fails the run.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    data::{RowSet, Value, parse_naive_date},
    error::ConvertError,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

impl ColumnRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMapping {
    #[serde(default)]
    pub columns: Vec<ColumnRename>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drop_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_columns: Vec<String>,
}

/// How a single source header is treated by a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderFate<'a> {
    Renamed(&'a str),
    Unmapped,
    Dropped,
}

/// Counters describing what [`ColumnMapping::apply`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingReport {
    pub renamed: usize,
    pub dropped: Vec<String>,
    pub unmapped: Vec<String>,
    /// Per date column, how many non-null values could not be parsed.
    pub coerced_to_null: BTreeMap<String, usize>,
}

impl ColumnMapping {
    /// The partner export layout: Korean spreadsheet headers to camelCase
    /// fields of the `partners` table.
    pub fn partners() -> Self {
        const RENAMES: &[(&str, &str)] = &[
            ("거래처코드", "partnerCode"),
            ("거래처명", "partnerName"),
            ("간판명", "signboardName"),
            ("지점", "officeName"),
            ("지점코드", "officeCode"),
            ("현재 담당 사번", "currentManagerEmployeeId"),
            ("현재 담당 영업사원", "currentManagerName"),
            ("이전 담당 사번", "previousManagerEmployeeId"),
            ("이전 담당 영업사원", "previousManagerName"),
            ("담당변경일", "managerChangedDate"),
            ("담당변경사유", "managerChangeReason"),
            ("채널", "channel"),
            ("RTM채널", "rtmChannel"),
            ("거래처등급", "partnerGrade"),
            ("거래처관리등급", "managementGrade"),
            ("사업자번호", "businessNumber"),
            ("대표자성명(점주 성명)", "ownerName"),
            ("우편번호(사업자기준)", "postalCode"),
            ("기본주소(사업자기준)", "businessAddress"),
            ("위도", "latitude"),
            ("경도", "longitude"),
        ];
        Self {
            columns: RENAMES
                .iter()
                .map(|(from, to)| ColumnRename::new(*from, *to))
                .collect(),
            drop_columns: vec!["거래처코드.1".to_string()],
            date_columns: vec!["managerChangedDate".to_string()],
        }
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        let mut seen = HashSet::new();
        for rename in &self.columns {
            if rename.from.is_empty() || rename.to.is_empty() {
                return Err(ConvertError::InvalidProfile(
                    "column renames require non-empty 'from' and 'to'".to_string(),
                ));
            }
            if !seen.insert(rename.from.as_str()) {
                return Err(ConvertError::InvalidProfile(format!(
                    "source header '{}' is mapped more than once",
                    rename.from
                )));
            }
        }
        Ok(())
    }

    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|rename| rename.from == source)
            .map(|rename| rename.to.as_str())
    }

    pub fn fate_of(&self, source: &str) -> HeaderFate<'_> {
        if self.drop_columns.iter().any(|name| name == source) {
            HeaderFate::Dropped
        } else if let Some(target) = self.target_for(source) {
            HeaderFate::Renamed(target)
        } else {
            HeaderFate::Unmapped
        }
    }

    /// Maps a loaded row set in place and reports what changed.
    pub fn apply(&self, rows: &mut RowSet) -> Result<MappingReport, ConvertError> {
        self.validate()?;
        let lookup: HashMap<&str, &str> = self
            .columns
            .iter()
            .map(|rename| (rename.from.as_str(), rename.to.as_str()))
            .collect();

        let mut report = MappingReport::default();
        let mut keep = Vec::with_capacity(rows.headers.len());
        let mut headers = Vec::with_capacity(rows.headers.len());
        for (idx, original) in rows.headers.iter().enumerate() {
            if self.drop_columns.iter().any(|name| name == original) {
                report.dropped.push(original.clone());
                continue;
            }
            let target = match lookup.get(original.as_str()) {
                Some(target) => {
                    report.renamed += 1;
                    (*target).to_string()
                }
                None => {
                    report.unmapped.push(original.clone());
                    original.clone()
                }
            };
            keep.push(idx);
            headers.push(target);
        }

        let mut unique = HashSet::with_capacity(headers.len());
        for header in &headers {
            if !unique.insert(header.as_str()) {
                return Err(ConvertError::DuplicateColumn(header.clone()));
            }
        }

        if keep.len() != rows.headers.len() {
            for row in &mut rows.rows {
                let mut retained = Vec::with_capacity(keep.len());
                for &idx in &keep {
                    retained.push(std::mem::replace(&mut row[idx], Value::Null));
                }
                *row = retained;
            }
        }
        rows.headers = headers;

        for column in &self.date_columns {
            let Some(idx) = rows.column_index(column) else {
                debug!("Date column '{column}' not present; skipping coercion");
                continue;
            };
            let failures = coerce_dates(rows, idx);
            if failures > 0 {
                warn!(
                    "{failures} value(s) in '{column}' could not be read as dates and were set to NULL"
                );
            }
            report.coerced_to_null.insert(column.clone(), failures);
        }

        if !report.unmapped.is_empty() {
            debug!("Unmapped column(s) kept as-is: {:?}", report.unmapped);
        }
        Ok(report)
    }
}

fn coerce_dates(rows: &mut RowSet, idx: usize) -> usize {
    let mut failures = 0;
    for row in &mut rows.rows {
        let coerced = match &row[idx] {
            Value::Date(_) | Value::Null => continue,
            Value::String(text) => parse_naive_date(text).map(Value::Date),
            // Digits-only cells such as 20240701 arrive as integers.
            Value::Integer(int) if (10_000_101..=99_991_231).contains(int) => {
                parse_naive_date(&int.to_string()).map(Value::Date)
            }
            _ => None,
        };
        row[idx] = match coerced {
            Some(value) => value,
            None => {
                failures += 1;
                Value::Null
            }
        };
    }
    failures
}
