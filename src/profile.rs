//! Export profile: every constant that shapes the generated SQL and driver
//! script, persisted as YAML.
//!
//! The built-in [`ExportProfile::default`] reproduces the partner import. A
//! profile file only needs the fields it changes; everything else falls back
//! to the partner defaults.

use std::{fs::File, io::BufReader, path::Path};

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

use crate::{error::ConvertError, mapping::ColumnMapping};

pub const DEFAULT_TABLE: &str = "partners";
pub const DEFAULT_BATCH_SIZE: usize = 5000;
pub const DEFAULT_PURGE_CHUNKS: usize = 7;
pub const DEFAULT_PURGE_CHUNK_LIMIT: usize = 10_000;
pub const DEFAULT_DB_COMMAND: &str = "platform";

/// Capped deletes emitted ahead of the first batch's inserts. Each chunk is
/// followed by its own `COMMIT`, then one unbounded delete clears the rest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurgePlan {
    #[serde(default = "PurgePlan::default_chunks")]
    pub chunks: usize,
    #[serde(default = "PurgePlan::default_chunk_limit")]
    pub chunk_limit: usize,
}

impl PurgePlan {
    const fn default_chunks() -> usize {
        DEFAULT_PURGE_CHUNKS
    }

    const fn default_chunk_limit() -> usize {
        DEFAULT_PURGE_CHUNK_LIMIT
    }
}

impl Default for PurgePlan {
    fn default() -> Self {
        Self {
            chunks: DEFAULT_PURGE_CHUNKS,
            chunk_limit: DEFAULT_PURGE_CHUNK_LIMIT,
        }
    }
}

/// A column the target schema stores twice under two spellings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DualCasedColumn {
    /// Second spelling derived as snake_case of the name.
    Derived(String),
    Explicit { name: String, alias: String },
}

impl DualCasedColumn {
    pub fn name(&self) -> &str {
        match self {
            DualCasedColumn::Derived(name) => name,
            DualCasedColumn::Explicit { name, .. } => name,
        }
    }

    pub fn alias(&self) -> String {
        match self {
            DualCasedColumn::Derived(name) => name.to_snake_case(),
            DualCasedColumn::Explicit { alias, .. } => alias.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportProfile {
    pub table: String,
    pub mapping: ColumnMapping,
    /// Columns populated by the database itself; never inserted from the sheet.
    pub excluded_columns: Vec<String>,
    /// Flag column appended to every INSERT with the value `1`.
    pub active_column: Option<String>,
    pub dual_cased_columns: Vec<DualCasedColumn>,
    /// `None` disables the purge preamble entirely.
    pub purge: Option<PurgePlan>,
    /// Database CLI the driver script pipes each file into.
    pub db_command: String,
}

impl Default for ExportProfile {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            mapping: ColumnMapping::partners(),
            excluded_columns: vec![
                "createdAt".to_string(),
                "updatedAt".to_string(),
                "isActive".to_string(),
            ],
            active_column: Some("isActive".to_string()),
            dual_cased_columns: vec![
                DualCasedColumn::Derived("currentManagerEmployeeId".to_string()),
                DualCasedColumn::Derived("previousManagerEmployeeId".to_string()),
            ],
            purge: Some(PurgePlan::default()),
            db_command: DEFAULT_DB_COMMAND.to_string(),
        }
    }
}

impl ExportProfile {
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let file = File::open(path).map_err(|err| {
            ConvertError::InvalidProfile(format!("opening {}: {err}", path.display()))
        })?;
        let profile: ExportProfile = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| {
                ConvertError::InvalidProfile(format!("parsing {}: {err}", path.display()))
            })?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConvertError> {
        serde_yaml::to_string(self)
            .map_err(|err| ConvertError::InvalidProfile(format!("serializing profile: {err}")))
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        if !is_plain_identifier(&self.table) {
            return Err(ConvertError::InvalidProfile(format!(
                "table name '{}' must contain only letters, digits, or underscores",
                self.table
            )));
        }
        if self.db_command.trim().is_empty() {
            return Err(ConvertError::InvalidProfile(
                "db_command must not be empty".to_string(),
            ));
        }
        if let Some(plan) = &self.purge
            && plan.chunk_limit == 0
        {
            return Err(ConvertError::InvalidProfile(
                "purge.chunk_limit must be positive".to_string(),
            ));
        }
        self.mapping.validate()
    }

    pub fn is_excluded(&self, column: &str) -> bool {
        self.excluded_columns.iter().any(|name| name == column)
    }

    pub fn dual_cased(&self, column: &str) -> Option<&DualCasedColumn> {
        self.dual_cased_columns
            .iter()
            .find(|dual| dual.name() == column)
    }

    /// File name of the SQL script for a 1-based batch index.
    pub fn batch_file_name(&self, index: usize) -> String {
        format!("{}_batch_{index}.sql", self.table)
    }
}

fn is_plain_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
