//! In-memory catalog plus the handles it is synchronized through.
//!
//! The editor moves `Unloaded -> Loaded -> Mutated* -> Persisted` and back
//! to `Mutated` on further edits. Every I/O boundary is absorbed into a
//! status line and an outcome value; only misuse (bad index) is an `Err`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::CmsConfig;
use crate::error::{CmsError, Result};
use crate::model::{Catalog, CategoryDef, CategoryId, Descriptions, Entry, CATEGORIES};
use crate::services::capability::{Confirm, DirectoryPicker, LogStatus, PickResult, StatusSink};
use crate::services::loader::{self, CatalogFetcher, HttpFetcher, LoadSource};
use crate::services::naming;
use crate::services::normalize::{self, NormalizeReport};
use crate::services::storage::{
    self, DirHandle, DownloadBackend, DownloadSink, FileHandle, HandleBackend,
    ProjectRootBackend, StorageBackend, Stored,
};
use crate::services::validate::{self, PathIssue};

pub const REMOVE_PROMPT: &str = "Remove this photo from the JSON?";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EditorState {
    Unloaded,
    Loaded,
    Mutated,
    Persisted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(LoadSource),
    /// The handle could not be read or parsed; the catalog is unchanged.
    HandleFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOutcome {
    Unavailable,
    Cancelled,
    /// Root remembered; `loaded` tells whether `data/projectsData.json` was read.
    Selected { root: PathBuf, loaded: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Stored),
    Cancelled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub outcome: SaveOutcome,
    pub normalized: NormalizeReport,
    pub issues: Vec<PathIssue>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "to", content = "path", rename_all = "snake_case")]
pub enum Placement {
    ProjectRoot(PathBuf),
    Download(PathBuf),
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddOutcome {
    Added { src: String, placement: Placement },
    /// An entry with the same `src` already exists; nothing was written.
    Duplicate { src: String },
    Failed { src: String, reason: String },
}

pub struct CatalogEditor {
    catalog: Catalog,
    state: EditorState,
    fetcher: Option<Box<dyn CatalogFetcher>>,
    embedded: Option<Value>,
    json_handle: Option<FileHandle>,
    project_root: Option<DirHandle>,
    downloads: DownloadSink,
    sink: Box<dyn StatusSink>,
    last_status: String,
}

impl CatalogEditor {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Catalog::new(),
            state: EditorState::Unloaded,
            fetcher: None,
            embedded: None,
            json_handle: None,
            project_root: None,
            downloads: DownloadSink::new(download_dir),
            sink: Box::new(LogStatus),
            last_status: String::new(),
        }
    }

    pub fn from_config(cfg: &CmsConfig) -> Result<Self> {
        let mut editor = Self::new(cfg.download_dir.clone());

        if let Some(url) = cfg.data_url.as_deref().filter(|u| !u.trim().is_empty()) {
            let fetcher = HttpFetcher::new(url, Duration::from_secs(cfg.http_timeout_secs))?;
            editor.fetcher = Some(Box::new(fetcher));
        }

        editor.embedded = cfg.load_embedded();

        if let Some(root) = &cfg.project_root {
            if !cfg.fs_access {
                log::warn!("project_root ignored: fs_access is disabled");
            } else if let Err(e) = editor.attach_project_root(root) {
                log::warn!("project_root {} not usable: {e}", root.display());
            }
        }

        Ok(editor)
    }

    pub fn with_fetcher(mut self, fetcher: impl CatalogFetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    pub fn with_embedded(mut self, legacy: Value) -> Self {
        self.embedded = Some(legacy);
        self
    }

    pub fn with_json_handle(mut self, handle: FileHandle) -> Self {
        self.json_handle = Some(handle);
        self
    }

    pub fn with_status_sink(mut self, sink: impl StatusSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn entries(&self, category: CategoryId) -> &[Entry] {
        self.catalog.list(category)
    }

    pub fn categories(&self) -> &'static [CategoryDef] {
        &CATEGORIES
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.last_status
    }

    pub fn json_handle(&self) -> Option<&FileHandle> {
        self.json_handle.as_ref()
    }

    pub fn project_root(&self) -> Option<&DirHandle> {
        self.project_root.as_ref()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.last_status = message.into();
        self.sink.status(&self.last_status);
    }

    /// Fetch, then embedded legacy data, then the file handle, then the
    /// empty skeleton. The first usable source replaces the catalog.
    pub fn load(&mut self) -> LoadOutcome {
        self.set_status("Loading JSON...");

        if let Some(fetcher) = &self.fetcher {
            match fetcher.fetch().and_then(loader::catalog_from_document) {
                Ok(catalog) => {
                    self.replace_catalog(catalog);
                    self.set_status("JSON loaded via fetch.");
                    return LoadOutcome::Loaded(LoadSource::Fetch);
                }
                Err(e) => log::debug!("fetch unavailable: {e}"),
            }
        }

        if let Some(legacy) = &self.embedded {
            let catalog = crate::services::legacy::adapt(legacy);
            self.replace_catalog(catalog);
            self.set_status("JSON loaded from embedded page data.");
            return LoadOutcome::Loaded(LoadSource::Embedded);
        }

        if self.json_handle.is_some() {
            return self.load_from_handle();
        }

        self.replace_catalog(Catalog::new());
        self.set_status("No JSON found - using empty structure.");
        LoadOutcome::Loaded(LoadSource::Empty)
    }

    pub fn reload(&mut self) -> LoadOutcome {
        self.load()
    }

    /// Reads the cached file handle. A read or parse failure keeps the
    /// current catalog.
    pub fn load_from_handle(&mut self) -> LoadOutcome {
        let Some(handle) = &self.json_handle else {
            self.set_status("Failed to read JSON handle.");
            return LoadOutcome::HandleFailed("no file handle".into());
        };

        let parsed = handle
            .read()
            .and_then(|bytes| loader::decode_document(&bytes))
            .and_then(loader::catalog_from_document);

        match parsed {
            Ok(catalog) => {
                self.replace_catalog(catalog);
                self.set_status("projectsData.json loaded via handle.");
                LoadOutcome::Loaded(LoadSource::Handle)
            }
            Err(e) => {
                log::error!("reading {} failed: {e}", handle.path().display());
                self.set_status("Failed to read JSON handle.");
                LoadOutcome::HandleFailed(e.to_string())
            }
        }
    }

    fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.state = EditorState::Loaded;
    }

    /// Remembers `root` and opens (creating if needed) its data file, without loading it.
    pub fn attach_project_root(&mut self, root: &Path) -> Result<()> {
        if !root.is_dir() {
            return Err(CmsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            )));
        }

        let dir = DirHandle::new(root);
        self.project_root = Some(dir.clone());
        self.json_handle = Some(dir.data_file()?);
        Ok(())
    }

    pub fn enable_fs(&mut self, picker: &mut dyn DirectoryPicker) -> FsOutcome {
        let root = match picker.pick() {
            PickResult::Unavailable => {
                self.set_status("File System Access not available in this environment.");
                return FsOutcome::Unavailable;
            }
            PickResult::Cancelled => {
                self.set_status("Folder selection cancelled.");
                return FsOutcome::Cancelled;
            }
            PickResult::Chosen(p) => p,
        };

        if !root.is_dir() {
            log::error!("picked path {} is not a directory", root.display());
            self.set_status("Folder selection cancelled.");
            return FsOutcome::Cancelled;
        }

        let dir = DirHandle::new(&root);
        self.set_status(format!("Project folder selected: {}", dir.name()));

        let data_file = dir.data_file();
        self.project_root = Some(dir);

        match data_file {
            Ok(handle) => {
                self.json_handle = Some(handle);
                let loaded = matches!(self.load_from_handle(), LoadOutcome::Loaded(_));
                FsOutcome::Selected { root, loaded }
            }
            Err(e) => {
                log::warn!("could not open data file under {}: {e}", root.display());
                self.set_status(
                    "Folder chosen, could not open projectsData.json automatically.",
                );
                FsOutcome::Selected {
                    root,
                    loaded: false,
                }
            }
        }
    }

    pub fn normalize(&mut self) -> NormalizeReport {
        let report = normalize::normalize(&mut self.catalog);
        if report.removed > 0 || report.completed_descriptions > 0 {
            self.state = EditorState::Mutated;
        }
        report
    }

    pub fn validate(&self) -> Vec<PathIssue> {
        validate::validate_paths(&self.catalog)
    }

    /// Normalizes, checks paths (asking `confirm` when some are off) and
    /// writes through the first storage backend that works.
    pub fn save(&mut self, confirm: &mut dyn Confirm) -> SaveReport {
        let normalized = self.normalize();
        let issues = self.validate();

        if !issues.is_empty() {
            for issue in &issues {
                log::warn!(
                    "path issue in {}: '{}' does not start with '{}'",
                    issue.category,
                    issue.src,
                    issue.expected_prefix
                );
            }

            let prompt = format!(
                "Found {} images with unexpected paths. Continue saving?\n(see log for details)",
                issues.len()
            );
            if !confirm.confirm(&prompt) {
                self.set_status("Save cancelled - fix the paths.");
                return SaveReport {
                    outcome: SaveOutcome::Cancelled,
                    normalized,
                    issues,
                };
            }
        }

        let outcome = match self.catalog.to_pretty_json() {
            Ok(content) => self.persist(&content),
            Err(e) => {
                log::error!("serializing catalog failed: {e}");
                self.set_status(format!("Save failed: {e}"));
                SaveOutcome::Failed(e.to_string())
            }
        };

        SaveReport {
            outcome,
            normalized,
            issues,
        }
    }

    fn persist(&mut self, content: &str) -> SaveOutcome {
        let result = {
            let handle = self.json_handle.as_ref().map(HandleBackend);
            let root = self.project_root.as_ref().map(ProjectRootBackend);
            let download = DownloadBackend(&self.downloads);

            let mut backends: Vec<&dyn StorageBackend> = Vec::with_capacity(3);
            if let Some(h) = &handle {
                backends.push(h);
            }
            if let Some(r) = &root {
                backends.push(r);
            }
            backends.push(&download);

            storage::persist(&backends, content)
        };

        match result {
            Ok(stored) => {
                match &stored {
                    Stored::Handle(_) => {
                        self.set_status("projectsData.json saved successfully.");
                    }
                    Stored::ProjectRoot(handle) => {
                        self.json_handle = Some(handle.clone());
                        self.set_status(format!(
                            "projectsData.json saved to {}/{}",
                            storage::DATA_DIR,
                            storage::DATA_FILE
                        ));
                    }
                    Stored::Download(path) => {
                        self.set_status(format!(
                            "JSON prepared for download at {} (replace {}/{} manually).",
                            path.display(),
                            storage::DATA_DIR,
                            storage::DATA_FILE
                        ));
                    }
                }
                self.state = EditorState::Persisted;
                SaveOutcome::Saved(stored)
            }
            Err(e) => {
                log::error!("every storage backend failed: {e}");
                self.set_status(format!("Save failed: {e}"));
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn add_image(&mut self, category: CategoryId, payload: &[u8], name: &str) -> AddOutcome {
        self.add_image_at(category, payload, name, naming::now_millis())
    }

    /// Stores the payload under `<timestamp>_<sanitized name>` in the
    /// category folder and appends an entry for it.
    pub fn add_image_at(
        &mut self,
        category: CategoryId,
        payload: &[u8],
        name: &str,
        timestamp_ms: i64,
    ) -> AddOutcome {
        let folder = category.folder();
        let stored = naming::stored_name(timestamp_ms, name);
        let src = format!("{folder}/{stored}");

        if self.catalog.contains_src(category, &src) {
            log::debug!("{src} already listed under {category}, not added");
            return AddOutcome::Duplicate { src };
        }

        let placed = match &self.project_root {
            Some(root) => root
                .write_file(folder, &stored, payload)
                .map(Placement::ProjectRoot),
            None => self.downloads.offer(&stored, payload).map(Placement::Download),
        };

        let placement = match placed {
            Ok(p) => p,
            Err(e) => {
                log::error!("adding {src} failed: {e}");
                self.set_status(format!("Error adding image: {e}"));
                return AddOutcome::Failed {
                    src,
                    reason: e.to_string(),
                };
            }
        };

        self.catalog.list_mut(category).push(Entry::new(src.clone()));
        self.state = EditorState::Mutated;

        match &placement {
            Placement::ProjectRoot(_) => self.set_status(format!("Image copied to {src}")),
            Placement::Download(_) => self.set_status(format!(
                "Image prepared for download. Place it manually at {src}"
            )),
        }

        AddOutcome::Added { src, placement }
    }

    fn check_index(&self, category: CategoryId, index: usize) -> Result<()> {
        let len = self.catalog.list(category).len();
        if index >= len {
            return Err(CmsError::IndexOutOfRange {
                category: category.to_string(),
                index,
                len,
            });
        }
        Ok(())
    }

    /// Removes the entry when `confirm` agrees. `Ok(None)` means declined.
    pub fn remove_entry(
        &mut self,
        category: CategoryId,
        index: usize,
        confirm: &mut dyn Confirm,
    ) -> Result<Option<Entry>> {
        self.check_index(category, index)?;

        if !confirm.confirm(REMOVE_PROMPT) {
            return Ok(None);
        }

        let removed = self.catalog.list_mut(category).remove(index);
        self.state = EditorState::Mutated;
        Ok(Some(removed))
    }

    /// Overwrites the four managed languages; any text is accepted.
    pub fn edit_descriptions(
        &mut self,
        category: CategoryId,
        index: usize,
        descriptions: Descriptions,
    ) -> Result<()> {
        self.check_index(category, index)?;

        let target = &mut self.catalog.list_mut(category)[index].descriptions;
        target.pt = Some(descriptions.pt.unwrap_or_default());
        target.en = Some(descriptions.en.unwrap_or_default());
        target.es = Some(descriptions.es.unwrap_or_default());
        target.fr = Some(descriptions.fr.unwrap_or_default());

        self.state = EditorState::Mutated;
        Ok(())
    }
}
