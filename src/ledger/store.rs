//! Loading and atomically persisting ledger documents.

use std::{
    fs,
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use super::{LedgerError, Validate};

/// Suffix of the copy kept when a ledger file fails to load.
const CORRUPT_SUFFIX: &str = "corrupt";

/// Reads and validates a ledger. Returns `Ok(None)` if the file does not exist.
pub(crate) fn load<T>(path: &Path) -> Result<Option<T>, LedgerError>
where
    T: DeserializeOwned + Validate,
{
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            return Err(LedgerError::corrupt(path, err))
        }
        Err(err) => return Err(LedgerError::io(path, err)),
    };

    let ledger: T =
        serde_json::from_str(&contents).map_err(|err| LedgerError::corrupt(path, err))?;
    ledger
        .validate()
        .map_err(|reason| LedgerError::corrupt(path, reason))?;

    Ok(Some(ledger))
}

/// Reads a ledger, falling back to an empty one if it is absent or its
/// contents do not load. Such a file is copied aside first so its contents
/// survive the next write.
///
/// A file that exists but cannot be read is an error, so the caller never
/// overwrites history it could not see.
pub(crate) fn load_or_default<T>(path: &Path) -> Result<T, LedgerError>
where
    T: DeserializeOwned + Validate + Default,
{
    match load(path) {
        Ok(Some(ledger)) => Ok(ledger),
        Ok(None) => {
            debug!("No ledger at '{}', starting empty.", path.display());
            Ok(T::default())
        }
        Err(err @ LedgerError::Corrupt { .. }) => {
            warn!("{err}; continuing with an empty ledger.");
            preserve_unreadable(path);
            Ok(T::default())
        }
        Err(err) => Err(err),
    }
}

/// Serializes `ledger` to a temporary file next to `path` and renames it into
/// place, so readers never observe a partially written ledger.
pub(crate) fn persist<T: Serialize>(path: &Path, ledger: &T) -> Result<(), LedgerError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|err| LedgerError::io(&dir, err))?;

    let tmp = NamedTempFile::new_in(&dir).map_err(|err| LedgerError::io(&dir, err))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        ledger
            .serialize(&mut serializer)
            .map_err(|err| LedgerError::io(path, err.into()))?;
        writer.flush().map_err(|err| LedgerError::io(path, err))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|err| LedgerError::io(path, err))?;

    tmp.persist(path)
        .map_err(|err| LedgerError::io(path, err.error))?;

    Ok(())
}

fn preserve_unreadable(path: &Path) {
    if !path.exists() {
        return;
    }

    let mut backup = path.as_os_str().to_owned();
    backup.push(".");
    backup.push(CORRUPT_SUFFIX);
    let backup = PathBuf::from(backup);

    match fs::copy(path, &backup) {
        Ok(_) => warn!(
            "Kept a copy of the unreadable ledger at '{}'.",
            backup.display()
        ),
        Err(err) => warn!(
            "Could not keep a copy of the unreadable ledger '{}': {err}",
            path.display()
        ),
    }
}
