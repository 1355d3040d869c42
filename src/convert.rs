//! End-to-end conversion: load, map, batch, emit SQL files, write the driver
//! script.
//!
//! Everything that can reject the input (batch size, profile, source file,
//! mapping) runs before the output directory is created, so a failed run
//! leaves no partial output behind.

use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;

use crate::{
    batch::{self, Batch},
    cli::ConvertArgs,
    error::ConvertError,
    io_utils,
    loader::{self, LoadOptions},
    profile::{DEFAULT_BATCH_SIZE, ExportProfile},
    script::{DRIVER_SCRIPT_NAME, render_driver_script},
    sql::SqlEmitter,
};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub batch_size: usize,
    pub load: LoadOptions,
}

impl ConvertOptions {
    pub fn new(source: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            load: LoadOptions::default(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFile {
    pub index: usize,
    pub path: PathBuf,
    /// 0-based, end-exclusive positions of the rows written to this file.
    pub records: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub total_rows: usize,
    pub batch_files: Vec<BatchFile>,
    pub driver_script: PathBuf,
}

pub fn convert(
    options: &ConvertOptions,
    profile: &ExportProfile,
) -> Result<ConversionSummary, ConvertError> {
    batch::validate_batch_size(options.batch_size)?;
    profile.validate()?;

    let mut rows = loader::load(&options.source, &options.load)?;
    let report = profile.mapping.apply(&mut rows)?;
    info!(
        "Mapped {} column(s); dropped {:?}; {} left unmapped",
        report.renamed,
        report.dropped,
        report.unmapped.len()
    );
    let batches = batch::partition(&rows.rows, options.batch_size)?;

    io_utils::ensure_output_dir(&options.output_dir)?;
    let emitter = SqlEmitter::new(&rows.headers, profile);
    let mut batch_files = Vec::with_capacity(batches.len());
    for batch in &batches {
        batch_files.push(write_batch(&options.output_dir, profile, &emitter, batch)?);
    }

    let file_names: Vec<String> = batch_files
        .iter()
        .map(|file| profile.batch_file_name(file.index))
        .collect();
    let driver_script = options.output_dir.join(DRIVER_SCRIPT_NAME);
    io_utils::write_text_file(
        &driver_script,
        &render_driver_script(&profile.db_command, &file_names),
    )?;
    io_utils::mark_executable(&driver_script)?;
    info!("Created execution script: {}", driver_script.display());
    info!("Total SQL files created: {}", batch_files.len());

    Ok(ConversionSummary {
        total_rows: rows.len(),
        batch_files,
        driver_script,
    })
}

fn write_batch(
    output_dir: &Path,
    profile: &ExportProfile,
    emitter: &SqlEmitter<'_>,
    batch: &Batch<'_>,
) -> Result<BatchFile, ConvertError> {
    let path = output_dir.join(profile.batch_file_name(batch.index));
    let text = emitter.render(batch);
    io_utils::write_text_file(&path, &text)?;
    let records = batch.span();
    info!(
        "Created SQL file: {} (Records {} to {})",
        path.display(),
        records.start + 1,
        records.end
    );
    Ok(BatchFile {
        index: batch.index,
        path,
        records,
    })
}

pub fn execute(args: &ConvertArgs) -> Result<()> {
    let profile = crate::load_profile(args.profile.as_deref())?;
    let options = ConvertOptions {
        source: args.input.clone(),
        output_dir: args.output_dir.clone(),
        batch_size: args.batch_size,
        load: crate::load_options(&args.source)?,
    };
    info!(
        "Converting '{}' into {}-row batches under {:?}",
        options.source.display(),
        options.batch_size,
        options.output_dir
    );
    let summary = convert(&options, &profile)
        .with_context(|| format!("Converting {:?}", options.source))?;
    info!(
        "Wrote {} record(s) into {} SQL file(s)",
        summary.total_rows,
        summary.batch_files.len()
    );
    Ok(())
}
