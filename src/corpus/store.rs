//! Local corpus store
//!
//! Corpus packages live under `<root>/corpora/<name>/`, the same layout the
//! NLTK downloader uses, so an existing `~/nltk_data` is picked up as-is.
//! A missing package is fetched as `<base_url>/corpora/<name>.zip` into the
//! first root and unpacked next to the archive.

use crate::config::PipelineConfig;
use crate::errors::{PipelineError, Result};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Directory under each root that holds corpus packages.
const CORPORA_DIR: &str = "corpora";

/// Delay before the first retry; doubles on each further attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Resolves corpus names to unpacked directories, fetching when needed.
#[derive(Debug)]
pub struct CorpusStore {
    /// Search roots; downloads go into the first one
    roots: Vec<PathBuf>,
    base_url: String,
    retries: u32,
    timeout: Duration,
    offline: bool,
    /// Corpora already resolved during this process
    resolved: FxHashMap<String, PathBuf>,
}

impl CorpusStore {
    /// Store rooted at a single directory, with default fetch settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            roots: vec![root.into()],
            base_url: defaults.base_url,
            retries: defaults.fetch_retries,
            timeout: Duration::from_secs(defaults.fetch_timeout_secs),
            offline: false,
            resolved: FxHashMap::default(),
        }
    }

    /// Store configured from a pipeline config.
    ///
    /// With an explicit `data_dir` only that directory is used. Otherwise
    /// the platform data directory comes first, followed by the usual NLTK
    /// locations.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let roots = match &config.data_dir {
            Some(dir) => vec![dir.clone()],
            None => default_roots(),
        };
        Self {
            roots,
            base_url: config.base_url.clone(),
            retries: config.fetch_retries,
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            offline: config.offline,
            resolved: FxHashMap::default(),
        }
    }

    /// Set the package index base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the number of download retries
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Enable or disable offline mode
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Search roots, in priority order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Make sure `name` is unpacked locally and return its directory.
    ///
    /// Idempotent: the first successful resolution is cached for the rest of
    /// the process.
    pub fn ensure_available(&mut self, name: &str) -> Result<PathBuf> {
        if let Some(path) = self.resolved.get(name) {
            return Ok(path.clone());
        }

        let path = match self.locate(name)? {
            Some(path) => path,
            None => self.fetch(name)?,
        };

        info!(corpus = name, path = %path.display(), "corpus available");
        self.resolved.insert(name.to_string(), path.clone());
        Ok(path)
    }

    /// Look for an unpacked directory, or an archive to unpack, in every root.
    fn locate(&self, name: &str) -> Result<Option<PathBuf>> {
        for root in &self.roots {
            let corpora = root.join(CORPORA_DIR);
            let dir = corpora.join(name);
            if dir.is_dir() {
                debug!(corpus = name, path = %dir.display(), "found unpacked corpus");
                return Ok(Some(dir));
            }

            let archive = corpora.join(format!("{}.zip", name));
            if archive.is_file() {
                debug!(corpus = name, path = %archive.display(), "found corpus archive");
                return unpack(name, &archive, &corpora).map(Some);
            }
        }
        Ok(None)
    }

    /// Download the package into the first root and unpack it.
    fn fetch(&self, name: &str) -> Result<PathBuf> {
        let root = self.roots.first().ok_or_else(|| {
            PipelineError::corpus_unavailable(name, "no data directory configured")
        })?;

        if self.offline {
            return Err(PipelineError::corpus_unavailable(
                name,
                format!("not found under {} and offline mode is on", root.display()),
            )
            .with_hint(
                "Run `corpus-tally fetch` with network access, \
                 or point --data-dir at an nltk_data directory",
            ));
        }

        let corpora = root.join(CORPORA_DIR);
        std::fs::create_dir_all(&corpora).map_err(|e| {
            let message = format!("cannot create {}: {}", corpora.display(), e);
            PipelineError::corpus_unavailable(name, message)
        })?;

        let base_url = self.base_url.trim_end_matches('/');
        let url = format!("{}/{}/{}.zip", base_url, CORPORA_DIR, name);
        let archive = corpora.join(format!("{}.zip", name));
        self.download_with_retry(name, &url, &archive)?;
        unpack(name, &archive, &corpora)
    }

    fn download_with_retry(&self, name: &str, url: &str, dest: &Path) -> Result<()> {
        let mut backoff = RETRY_BACKOFF;
        let mut attempt = 0;
        loop {
            attempt += 1;
            info!(corpus = name, url, attempt, "downloading corpus package");
            match self.download(name, url, dest) {
                Ok(()) => return Ok(()),
                Err(err) if err.is_retriable() && attempt <= self.retries => {
                    warn!(corpus = name, attempt, error = %err, "download failed, retrying");
                    std::thread::sleep(backoff);
                    backoff *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn download(&self, name: &str, url: &str, dest: &Path) -> Result<()> {
        let unavailable =
            |e: reqwest::Error| PipelineError::corpus_unavailable(name, e.to_string());

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(unavailable)?;
        let response = client.get(url).send().map_err(unavailable)?;

        let status = response.status();
        if status.is_client_error() {
            // A missing package will not appear on retry.
            return Err(PipelineError::corpus_format(
                name,
                format!("package index returned {} for {}", status, url),
            ));
        }
        if !status.is_success() {
            return Err(PipelineError::corpus_unavailable(
                name,
                format!("package index returned {} for {}", status, url),
            ));
        }

        let bytes = response.bytes().map_err(unavailable)?;
        let partial = dest.with_extension("zip.part");
        std::fs::write(&partial, &bytes)
            .and_then(|_| std::fs::rename(&partial, dest))
            .map_err(|e| {
                let message = format!("cannot store {}: {}", dest.display(), e);
                PipelineError::corpus_unavailable(name, message)
            })?;

        debug!(corpus = name, bytes = bytes.len(), "downloaded corpus package");
        Ok(())
    }
}

/// Ensure a corpus is present locally, fetching it on first use.
pub fn ensure_corpus_available(store: &mut CorpusStore, name: &str) -> Result<PathBuf> {
    store.ensure_available(name)
}

/// Platform data directory first, then the conventional NLTK locations.
fn default_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    roots.push(data_dir.join("corpus_tally").join("nltk_data"));
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join("nltk_data"));
    }
    roots.push(PathBuf::from("/usr/share/nltk_data"));
    roots.push(PathBuf::from("/usr/local/share/nltk_data"));
    roots
}

/// Unpack `archive` into `corpora` and return `corpora/<name>`.
fn unpack(name: &str, archive: &Path, corpora: &Path) -> Result<PathBuf> {
    let file = File::open(archive).map_err(|e| {
        PipelineError::corpus_format(name, format!("cannot open {}: {}", archive.display(), e))
    })?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| PipelineError::corpus_format(name, format!("bad archive: {}", e)))?;
    zip.extract(corpora).map_err(|e| {
        PipelineError::corpus_format(name, format!("cannot unpack archive: {}", e))
    })?;

    let dir = corpora.join(name);
    if !dir.is_dir() {
        return Err(PipelineError::corpus_format(
            name,
            format!("archive {} has no top-level '{}' directory", archive.display(), name),
        ));
    }
    info!(corpus = name, path = %dir.display(), "unpacked corpus package");
    Ok(dir)
}
