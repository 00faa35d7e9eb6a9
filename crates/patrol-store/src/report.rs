//! Reading and atomically writing report documents

use crate::error::StoreError;
use crate::manifest::Manifest;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write `value` as pretty JSON, replacing `path` atomically
///
/// The document is written to a temporary file in the same directory and
/// renamed over the destination, so readers see either the old or the new
/// report, never a partial one.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Persist {
        path: path.display().to_string(),
        message: e.error.to_string(),
    })?;
    Ok(())
}

/// Read a JSON document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Read a finalized `report.json`
pub fn read_report(path: &Path) -> Result<Manifest, StoreError> {
    read_json(path)
}

/// Atomically replace a `report.json`
pub fn write_report(path: &Path, manifest: &Manifest) -> Result<(), StoreError> {
    write_json_atomic(path, manifest)
}
