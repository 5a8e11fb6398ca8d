//! Icon file storage
//!
//! Icon images live as plain files under a single root directory, one file per
//! icon row, named after the row. Names are file names only; anything that
//! could reach outside the root is refused.

use std::io;
use std::path::{Path, PathBuf};

/// Directory of stored icon images
#[derive(Debug, Clone)]
pub struct IconStorage {
    root: PathBuf,
}

impl IconStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> io::Result<PathBuf> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if !plain {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid icon file name {name}"),
            ));
        }
        Ok(self.root.join(name))
    }

    /// Write an icon, replacing any file of the same name
    pub async fn save(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path(name)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored icon file");
        Ok(())
    }

    pub async fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.path(name)?).await
    }

    /// Whether a file is stored under `name`; invalid names never exist
    pub async fn exists(&self, name: &str) -> bool {
        match self.path(name) {
            Ok(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    pub async fn rename(&self, from: &str, to: &str) -> io::Result<()> {
        tokio::fs::rename(self.path(from)?, self.path(to)?).await
    }

    pub async fn remove(&self, name: &str) -> io::Result<()> {
        tokio::fs::remove_file(self.path(name)?).await
    }
}
