//! Source inspection: sheets, headers, and how each header will be mapped.

use anyhow::{Context, Result, anyhow};
use log::warn;

use crate::{
    cli::ProbeArgs,
    data::RowSet,
    loader::{self, LoadOptions},
    mapping::{ColumnMapping, HeaderFate},
    table,
};

pub fn execute(args: &ProbeArgs) -> Result<()> {
    let profile = crate::load_profile(args.profile.as_deref())?;
    let base = crate::load_options(&args.source)?;
    let sheets = loader::sheet_names(&args.input)
        .with_context(|| format!("Listing sheets in {:?}", args.input))?;

    if sheets.is_empty() {
        let rows = loader::load(&args.input, &base)
            .with_context(|| format!("Reading {:?}", args.input))?;
        print!("{}", describe(None, &rows, &profile.mapping, args.sample_rows));
        return Ok(());
    }

    println!("Sheets: {}", sheets.join(", "));
    if let Some(wanted) = args.source.sheet.as_deref() {
        let position = sheets
            .iter()
            .position(|sheet| sheet == wanted)
            .ok_or_else(|| anyhow!("Sheet '{wanted}' not found in {:?}", args.input))?;
        let rows = loader::load(&args.input, &base)
            .with_context(|| format!("Reading sheet '{wanted}' from {:?}", args.input))?;
        let report = describe(
            Some((position + 1, wanted)),
            &rows,
            &profile.mapping,
            args.sample_rows,
        );
        print!("\n{report}");
        return Ok(());
    }

    for (idx, sheet) in sheets.iter().enumerate() {
        let options = LoadOptions {
            sheet: Some(sheet.clone()),
            ..base.clone()
        };
        match loader::load(&args.input, &options) {
            Ok(rows) => {
                let report = describe(
                    Some((idx + 1, sheet.as_str())),
                    &rows,
                    &profile.mapping,
                    args.sample_rows,
                );
                print!("\n{report}");
            }
            Err(err) => warn!("Skipping sheet '{sheet}': {err}"),
        }
    }
    Ok(())
}

/// Text report for one table: counts, header fates, and sample rows.
pub fn describe(
    sheet: Option<(usize, &str)>,
    rows: &RowSet,
    mapping: &ColumnMapping,
    sample_rows: usize,
) -> String {
    let mut out = String::new();
    if let Some((position, name)) = sheet {
        out.push_str(&format!("[Sheet {position}: {name}]\n"));
    }
    out.push_str(&format!("Rows: {}\n", rows.len()));
    out.push_str(&format!("Columns: {}\n", rows.headers.len()));

    let header_rows: Vec<Vec<String>> = rows
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let fate = match mapping.fate_of(header) {
                HeaderFate::Renamed(target) => target.to_string(),
                HeaderFate::Unmapped => "(unmapped)".to_string(),
                HeaderFate::Dropped => "(dropped)".to_string(),
            };
            vec![(idx + 1).to_string(), header.clone(), fate]
        })
        .collect();
    let header_titles = vec!["#".to_string(), "source".to_string(), "target".to_string()];
    out.push_str(&table::render_table(&header_titles, &header_rows, 0));

    if sample_rows > 0 && !rows.is_empty() {
        out.push_str("\nSample rows:\n");
        let samples: Vec<Vec<String>> = rows
            .rows
            .iter()
            .take(sample_rows)
            .map(|row| row.iter().map(|value| value.as_display()).collect())
            .collect();
        out.push_str(&table::render_table(&rows.headers, &samples, 16));
    }
    out
}
