use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{
    errors::{LedgerError, LedgerResult},
    utils::paths::ensure_dir,
};

use super::PersistenceMedium;

const LEDGER_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed medium storing the ledger under `<dir>/<key>.json`.
///
/// Writes are staged to a sibling `.tmp` file and renamed into place, so a failed
/// save leaves the previously committed file untouched.
#[derive(Debug, Clone)]
pub struct JsonFileMedium {
    path: PathBuf,
}

impl JsonFileMedium {
    pub fn new(dir: impl Into<PathBuf>, key: &str) -> LedgerResult<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self {
            path: dir.join(format!("{}.{}", canonical_key(key), LEDGER_EXTENSION)),
        })
    }

    /// Uses an explicit file path; parent directories are created on first save.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceMedium for JsonFileMedium {
    fn load(&self) -> LedgerResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(LedgerError::Io(err)),
        }
    }

    fn save(&self, bytes: &[u8]) -> LedgerResult<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let tmp = tmp_path(&self.path);
        let result = write_atomic(&tmp, bytes)
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(LedgerError::from));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> LedgerResult<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}
