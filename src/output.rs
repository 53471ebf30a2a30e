use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::OutputError;
use crate::logging::LogContext;

/// Write `value` as 2-space indented JSON to `dir/filename`, replacing any existing file.
///
/// The directory is created when missing.
pub fn write_json<T: Serialize>(dir: &Path, filename: &str, value: &T) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);

    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    LogContext::new("output", "write_json")
        .with_metadata("path", serde_json::json!(path.display().to_string()))
        .info("Data saved");

    Ok(path)
}
