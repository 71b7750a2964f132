use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use trove_engine::{Catalog, CatalogError, CatalogLoader};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("could not read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog {path} is invalid: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// Reads the reference catalog from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileCatalogLoader {
    path: PathBuf,
}

impl FileCatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogLoader for FileCatalogLoader {
    type Error = LoaderError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        let raw = fs::read_to_string(&self.path).map_err(|source| LoaderError::Io {
            path: self.path.clone(),
            source,
        })?;
        Catalog::from_json(&raw).map_err(|source| LoaderError::Catalog {
            path: self.path.clone(),
            source,
        })
    }
}

/// Sample catalog shipped in the workspace `assets/data` directory.
pub fn default_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("assets")
        .join("data")
        .join("catalog.json")
}
