use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{CmsError, Result};

pub const DATA_DIR: &str = "data";
pub const DATA_FILE: &str = "projectsData.json";

/// A JSON file the editor was granted access to.
///
/// Like a browser file handle it points at a file that already exists; a
/// write never recreates missing parent directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    /// Replaces the whole file.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        write_atomic(&self.path, bytes)
    }
}

/// Project root directory, the target of relative `src` paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirHandle {
    root: PathBuf,
}

impl DirHandle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.to_string_lossy().to_string())
    }

    /// Creates every segment of a `/`-separated relative folder.
    pub fn get_or_create_dir(&self, rel: &str) -> Result<PathBuf> {
        let mut dir = self.root.clone();
        for part in rel.split('/').filter(|p| !p.is_empty()) {
            dir.push(part);
        }
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Opens `rel/name`, creating an empty file when missing.
    pub fn get_or_create_file(&self, rel: &str, name: &str) -> Result<FileHandle> {
        let dir = self.get_or_create_dir(rel)?;
        let path = dir.join(name);

        OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(FileHandle::new(path))
    }

    /// `data/projectsData.json` under the root.
    pub fn data_file(&self) -> Result<FileHandle> {
        self.get_or_create_file(DATA_DIR, DATA_FILE)
    }

    pub fn write_file(&self, rel: &str, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.get_or_create_dir(rel)?.join(name);
        write_atomic(&path, bytes)?;
        Ok(path)
    }
}

/// Stand-in for a browser download: files are dropped into one directory for
/// the user to move into place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSink {
    dir: PathBuf,
}

impl DownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn offer(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        log::info!("download ready: {}", path.display());
        Ok(path)
    }
}

/// Where a persisted catalog ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stored {
    Handle(PathBuf),
    /// Written under the project root; the handle should be cached.
    ProjectRoot(FileHandle),
    Download(PathBuf),
}

pub trait StorageBackend {
    fn name(&self) -> &'static str;

    fn write(&self, content: &str) -> Result<Stored>;
}

pub struct HandleBackend<'a>(pub &'a FileHandle);

impl StorageBackend for HandleBackend<'_> {
    fn name(&self) -> &'static str {
        "file handle"
    }

    fn write(&self, content: &str) -> Result<Stored> {
        self.0.write(content.as_bytes())?;
        Ok(Stored::Handle(self.0.path().to_path_buf()))
    }
}

pub struct ProjectRootBackend<'a>(pub &'a DirHandle);

impl StorageBackend for ProjectRootBackend<'_> {
    fn name(&self) -> &'static str {
        "project folder"
    }

    fn write(&self, content: &str) -> Result<Stored> {
        let handle = self.0.data_file()?;
        handle.write(content.as_bytes())?;
        Ok(Stored::ProjectRoot(handle))
    }
}

pub struct DownloadBackend<'a>(pub &'a DownloadSink);

impl StorageBackend for DownloadBackend<'_> {
    fn name(&self) -> &'static str {
        "download"
    }

    fn write(&self, content: &str) -> Result<Stored> {
        let path = self.0.offer(DATA_FILE, content.as_bytes())?;
        Ok(Stored::Download(path))
    }
}

/// Tries each backend once, in order. Returns the first success, or the
/// last failure when every backend failed.
pub fn persist(backends: &[&dyn StorageBackend], content: &str) -> Result<Stored> {
    let mut last_err: Option<CmsError> = None;

    for backend in backends {
        match backend.write(content) {
            Ok(stored) => {
                log::debug!("catalog stored via {}", backend.name());
                return Ok(stored);
            }
            Err(e) => {
                log::warn!("save via {} failed: {e}", backend.name());
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        CmsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no storage backend available",
        ))
    }))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    fs::write(&tmp, bytes)?;

    // rename replaces an existing target in one step, so the old file stays
    // intact until the new one is complete
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => DATA_FILE.to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
