use crate::InvertedIndex;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Bumped whenever the serialized layout of [`InvertedIndex`] changes.
pub const INDEX_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: usize,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn for_index(index: &InvertedIndex, created_at: impl Into<String>) -> Self {
        Self {
            num_docs: index.num_docs(),
            num_terms: index.num_terms(),
            created_at: created_at.into(),
            version: INDEX_VERSION,
        }
    }
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn index(&self) -> PathBuf { self.root.join("index.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    let path = paths.index();
    tracing::debug!(path = %path.display(), "saving index");
    let mut f = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let bytes = bincode::serialize(index)?;
    f.write_all(&bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved index");
    Ok(())
}

/// Load a saved index, refusing files written with a different layout version.
pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let meta = load_meta(paths)?;
    if meta.version != INDEX_VERSION {
        bail!(
            "index at {} has version {}, expected {}",
            paths.root.display(),
            meta.version,
            INDEX_VERSION
        );
    }
    let path = paths.index();
    tracing::debug!(path = %path.display(), version = meta.version, "loading index");
    let mut f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let index: InvertedIndex = bincode::deserialize(&buf)?;
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "loaded index");
    Ok(index)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let path = paths.meta();
    let mut f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}
