//! File system helpers shared by the loader and the output writers.
//!
//! - **Delimited input**: extension-based delimiter detection (`.tsv` -> tab,
//!   everything else -> comma), manual override, and decoding via
//!   `encoding_rs` (UTF-8 by default).
//! - **Output**: directory creation, whole-file writes, and the executable
//!   bit for the generated driver script.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

use crate::error::ConvertError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// True for inputs read as delimited text rather than as a workbook.
pub fn is_delimited_text(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ["csv", "tsv", "txt"].iter().any(|known| ext.eq_ignore_ascii_case(known))
    )
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
) -> Result<csv::Reader<BufReader<File>>, ConvertError> {
    let file = File::open(path).map_err(|err| ConvertError::unreadable(path, err))?;
    Ok(open_csv_reader(BufReader::new(file), delimiter))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    // Strip a UTF-8 BOM so it never ends up in the first header.
    let bytes = if encoding == UTF_8 {
        bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
    } else {
        bytes
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn ensure_output_dir(dir: &Path) -> Result<(), ConvertError> {
    fs::create_dir_all(dir).map_err(|err| ConvertError::output(dir, err))
}

/// Writes `contents` to `path`, replacing any previous file.
pub fn write_text_file(path: &Path, contents: &str) -> Result<(), ConvertError> {
    let file = File::create(path).map_err(|err| ConvertError::output(path, err))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|err| ConvertError::output(path, err))
}

#[cfg(unix)]
pub fn mark_executable(path: &Path) -> Result<(), ConvertError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|err| ConvertError::output(path, err))
}

#[cfg(not(unix))]
pub fn mark_executable(_path: &Path) -> Result<(), ConvertError> {
    Ok(())
}
