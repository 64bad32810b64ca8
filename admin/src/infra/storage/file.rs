//! [`Storage`] backed by a JSON file.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use tracerr::Traced;
use tracing as log;

use super::{Error, Storage};

/// Values stored in a [`File`].
type Entries = BTreeMap<String, String>;

/// [`Storage`] persisting values into a single JSON object file.
///
/// A missing file is treated as an empty [`Storage`]. The file is rewritten
/// as a whole on every change, so concurrent writers are not supported.
#[derive(Clone, Debug)]
pub struct File {
    /// Path of the backing file.
    path: PathBuf,
}

impl File {
    /// Creates a new [`File`] [`Storage`] backed by the provided `path`.
    ///
    /// Nothing is touched on disk until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all the currently stored [`Entries`].
    fn read(&self) -> Result<Entries, Traced<Error>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Entries::new());
            }
            Err(e) => return Err(tracerr::new!(Error::Io(e))),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }
        serde_json::from_slice(&bytes).map_err(tracerr::from_and_wrap!(=> Error))
    }

    /// Replaces the stored [`Entries`] with the provided ones.
    ///
    /// Writes a sibling temporary file first and renames it over the backing
    /// one, so a crash never leaves a truncated file behind.
    fn write(&self, entries: &Entries) -> Result<(), Traced<Error>> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty())
        {
            fs::create_dir_all(dir).map_err(tracerr::from_and_wrap!(=> Error))?;
        }

        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes).map_err(tracerr::from_and_wrap!(=> Error))?;
        fs::rename(&tmp, &self.path).map_err(tracerr::from_and_wrap!(=> Error))?;

        log::trace!(path = %self.path.display(), "storage file written");
        Ok(())
    }
}

impl Storage for File {
    fn get(&self, key: &str) -> Result<Option<String>, Traced<Error>> {
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), Traced<Error>> {
        let mut entries = self.read()?;
        _ = entries.insert(key.to_owned(), value);
        self.write(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), Traced<Error>> {
        let mut entries = self.read()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write(&entries)
    }
}
