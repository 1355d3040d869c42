pub mod batch;
pub mod cli;
pub mod convert;
pub mod data;
pub mod error;
pub mod io_utils;
pub mod loader;
pub mod mapping;
pub mod preview;
pub mod probe;
pub mod profile;
pub mod script;
pub mod sql;
pub mod table;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, ProfileArgs, SourceArgs},
    loader::LoadOptions,
    profile::ExportProfile,
};

pub use crate::{
    convert::{ConversionSummary, ConvertOptions, convert},
    error::ConvertError,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("partner_batches", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => convert::execute(&args),
        Commands::Probe(args) => probe::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Profile(args) => handle_profile(&args),
    }
}

fn handle_profile(args: &ProfileArgs) -> Result<()> {
    let yaml = ExportProfile::default().to_yaml_string()?;
    match &args.output {
        Some(path) => {
            io_utils::write_text_file(path, &yaml)
                .with_context(|| format!("Writing profile template to {path:?}"))?;
            info!("Default export profile written to {path:?}");
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

/// The profile named on the command line, or the built-in partner profile.
pub(crate) fn load_profile(path: Option<&Path>) -> Result<ExportProfile> {
    match path {
        Some(path) => {
            let profile = ExportProfile::load(path)
                .with_context(|| format!("Loading export profile from {path:?}"))?;
            debug!("Using export profile {path:?} for table `{}`", profile.table);
            Ok(profile)
        }
        None => Ok(ExportProfile::default()),
    }
}

pub(crate) fn load_options(args: &SourceArgs) -> Result<LoadOptions> {
    Ok(LoadOptions {
        sheet: args.sheet.clone(),
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    })
}
