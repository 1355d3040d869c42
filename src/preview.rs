use anyhow::{Context, Result};
use log::info;

use crate::{cli::PreviewArgs, loader, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let profile = crate::load_profile(args.profile.as_deref())?;
    let options = crate::load_options(&args.source)?;
    let mut rows = loader::load(&args.input, &options)
        .with_context(|| format!("Reading {:?}", args.input))?;
    profile
        .mapping
        .apply(&mut rows)
        .with_context(|| format!("Mapping columns of {:?}", args.input))?;

    let shown: Vec<Vec<String>> = rows
        .rows
        .iter()
        .take(args.rows)
        .map(|row| row.iter().map(|value| value.as_display()).collect())
        .collect();
    print!(
        "{}",
        table::render_table(&rows.headers, &shown, args.max_width)
    );
    info!(
        "Displayed {} of {} mapped row(s) from {:?}",
        shown.len(),
        rows.len(),
        args.input
    );
    Ok(())
}
