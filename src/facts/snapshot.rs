//! Datasets stored as JSON files on disk.

use crate::Result;
use crate::facts::{RepoSpec, RepositoryClient, RepositoryDataset};
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{EnrichableExt, IntoAppError};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

const LOG_TARGET: &str = "  snapshot";

/// Load a dataset snapshot from a JSON file.
pub fn load_snapshot(path: impl AsRef<Utf8Path>) -> Result<RepositoryDataset> {
    let path = path.as_ref();

    let file = File::open(path).into_app_err_with(|| format!("unable to open snapshot '{path}'"))?;
    let dataset: RepositoryDataset =
        serde_json::from_reader(BufReader::new(file)).into_app_err_with(|| format!("unable to parse snapshot '{path}'"))?;

    log::debug!(target: LOG_TARGET, "Loaded snapshot for '{dataset}' from '{path}'");
    Ok(dataset)
}

/// Write a dataset snapshot to a JSON file, creating parent directories as needed.
pub fn save_snapshot(dataset: &RepositoryDataset, path: impl AsRef<Utf8Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).into_app_err_with(|| format!("unable to create directory '{parent}'"))?;
    }

    let file = File::create(path).into_app_err_with(|| format!("unable to create snapshot '{path}'"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dataset).into_app_err_with(|| format!("unable to write snapshot '{path}'"))?;
    writer.flush().into_app_err_with(|| format!("unable to write snapshot '{path}'"))?;

    log::debug!(target: LOG_TARGET, "Saved snapshot for '{dataset}' to '{path}'");
    Ok(())
}

/// Serves datasets from a directory of snapshots laid out as `{dir}/{owner}/{repo}.json`.
#[derive(Debug, Clone)]
pub struct SnapshotClient {
    dir: Utf8PathBuf,
}

impl SnapshotClient {
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Location of the snapshot for the given repository.
    #[must_use]
    pub fn snapshot_path(&self, repo: &RepoSpec) -> Utf8PathBuf {
        self.dir.join(repo.owner()).join(format!("{}.json", repo.repo()))
    }
}

impl RepositoryClient for SnapshotClient {
    async fn fetch(&self, repo: &RepoSpec) -> Result<RepositoryDataset> {
        let path = self.snapshot_path(repo);

        tokio::task::spawn_blocking(move || load_snapshot(path))
            .await
            .into_app_err("snapshot loading task panicked")?
            .map_err(|e| e.enrich_with(|| format!("could not load a dataset for repository '{repo}'")))
    }
}
