use std::{
    fs::{create_dir_all, read_to_string, rename, write as write_file},
    path::Path,
};

use _model::StoreRecord;
use anyhow::{Context, Result};
use serde::Serialize;

/// Replaces `path` with the whole list, pretty-printed.
pub fn write(path: &Path, records: &[StoreRecord]) -> Result<()> {
    write_json(path, records)
}

pub fn read(path: &Path) -> Result<Vec<StoreRecord>> {
    let raw = read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Writes next to the target and renames over it, so readers never see a
/// half-written file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|x| !x.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }

    let mut contents = serde_json::to_string_pretty(value)?;
    contents.push('\n');

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    write_file(&tmp, &contents).with_context(|| format!("failed to write {}", path.display()))?;
    rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
