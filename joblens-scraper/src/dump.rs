//! Serialisation of collected records to a JSON file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::record::JobRecord;

/// Default output file: current local timestamp, e.g.
/// `2024-05-01T14:30:05.json`.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!("{}.json", Local::now().format("%Y-%m-%dT%H:%M:%S")))
}

/// Write the records to `path` as a pretty-printed JSON array.
///
/// Four-space indentation, field names and record order preserved,
/// non-ASCII characters written verbatim (serde_json does not escape
/// them), trailing newline.
pub fn write_records(records: &[JobRecord], path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut writer, formatter);
    records
        .serialize(&mut serializer)
        .context("failed to serialize records")?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(
        target: "dump",
        records = records.len(),
        path = %path.display(),
        "wrote scraped records"
    );
    Ok(())
}
