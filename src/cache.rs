mod key;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;

pub use self::key::{CacheKey, KeyRule};
use crate::prelude::*;

/// On-disk response cache: one `<key>.json` file per cache key.
///
/// The store is the only thing that touches the files in its directory.
pub struct Store {
    root: PathBuf,
}

#[derive(Serialize)]
struct CachedDocumentRef<'a> {
    response: &'a Value,
}

#[derive(Deserialize)]
struct CachedDocument {
    response: Value,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    pub fn exists(&self, key: &CacheKey) -> bool {
        self.path(key).is_file()
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(key = %key))]
    pub fn load(&self, key: &CacheKey) -> Result<Value> {
        let path = self.path(key);
        let response = read_document(&path).map_err(|source| Error::CacheRead { path, source })?;
        debug!("loaded");
        Ok(response)
    }

    /// Write the response wrapped into `{"response": …}` and return the file path.
    ///
    /// Readers never observe a partially written file: the document goes to a temporary file
    /// in the same directory first, and is renamed over the target afterwards.
    #[instrument(skip_all, level = Level::DEBUG, fields(key = %key))]
    pub fn save(&self, key: &CacheKey, response: &Value) -> Result<PathBuf> {
        let path = self.path(key);
        match write_document(&self.root, &path, response) {
            Ok(()) => {
                debug!(path = %path.display(), "saved");
                Ok(path)
            }
            Err(source) => Err(Error::CacheWrite { path, source }),
        }
    }
}

fn read_document(path: &Path) -> io::Result<Value> {
    let document: CachedDocument = serde_json::from_slice(&fs::read(path)?)?;
    Ok(document.response)
}

fn write_document(root: &Path, path: &Path, response: &Value) -> io::Result<()> {
    fs::create_dir_all(root)?;
    let mut file = NamedTempFile::new_in(root)?;
    serde_json::to_writer_pretty(&mut file, &CachedDocumentRef { response })?;
    file.write_all(b"\n")?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    Ok(())
}
