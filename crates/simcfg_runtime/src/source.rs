//! Where configuration text comes from.
//!
//! A [`Location`] is either a plain file path or a path inside a container,
//! written `<container>!/<inner path>`. Includes resolve relative to the
//! directory of the including location, staying inside the same container.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use simcfg_foundation::{Error, Result};

/// Separator between a container and the path inside it.
pub const CONTAINER_SEPARATOR: &str = "!/";

/// A configuration file location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    container: Option<String>,
    path: PathBuf,
}

impl Location {
    /// A plain file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            container: None,
            path: path.into(),
        }
    }

    /// A file inside a container.
    #[must_use]
    pub fn in_container(container: impl Into<String>, inner: impl AsRef<Path>) -> Self {
        Self {
            container: Some(container.into()),
            path: normalize(inner.as_ref()),
        }
    }

    /// Parses `path` or `container!/inner`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.split_once(CONTAINER_SEPARATOR) {
            Some((container, inner)) => Self::in_container(container, inner),
            None => Self::file(text),
        }
    }

    /// Returns the container name, if any.
    #[must_use]
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// Returns the path (inside the container, if any).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
    }

    /// Resolves an `Include` path against this location's directory.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> Self {
        if relative.contains(CONTAINER_SEPARATOR) {
            return Self::parse(relative);
        }
        let target = Path::new(relative);
        match &self.container {
            Some(container) => {
                if target.has_root() {
                    Self::in_container(container.clone(), target)
                } else {
                    Self::in_container(container.clone(), self.dir().join(target))
                }
            }
            None => {
                if target.is_absolute() {
                    Self::file(target)
                } else {
                    Self::file(self.dir().join(target))
                }
            }
        }
    }

    /// Returns the same location with a different extension.
    #[must_use]
    pub fn with_extension(&self, extension: &str) -> Self {
        Self {
            container: self.container.clone(),
            path: self.path.with_extension(extension),
        }
    }

    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.container {
            Some(container) => write!(f, "{container}{CONTAINER_SEPARATOR}{}", self.path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// Resolves `.` and `..` inside a container, where no real directory exists.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    out
}

/// Reads configuration text.
pub trait SourceProvider {
    /// Reads the whole text at a location.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the location cannot be read.
    fn read(&self, location: &Location) -> Result<String>;

    /// Returns true if the location can be read.
    fn exists(&self, location: &Location) -> bool;
}

/// Reads plain files from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileSystem;

impl SourceProvider for FileSystem {
    fn read(&self, location: &Location) -> Result<String> {
        if location.container().is_some() {
            return Err(Error::io(format!("no container provider for {location}")));
        }
        fs::read_to_string(location.path())
            .map_err(|e| Error::io(format!("failed to read '{location}': {e}")))
    }

    fn exists(&self, location: &Location) -> bool {
        location.container().is_none() && location.path().is_file()
    }
}

/// A named in-memory container of files.
#[derive(Clone, Debug, Default)]
pub struct MemoryArchive {
    name: String,
    files: HashMap<PathBuf, String>,
}

impl MemoryArchive {
    /// Creates an empty container.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: HashMap::new(),
        }
    }

    /// Builder method to add a file.
    #[must_use]
    pub fn with_file(mut self, path: &str, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: &str, text: impl Into<String>) {
        self.files.insert(normalize(Path::new(path)), text.into());
    }

    /// Returns the location of a file in this container.
    #[must_use]
    pub fn location(&self, path: &str) -> Location {
        Location::in_container(self.name.clone(), path)
    }
}

impl SourceProvider for MemoryArchive {
    fn read(&self, location: &Location) -> Result<String> {
        if location.container() != Some(self.name.as_str()) {
            return Err(Error::io(format!("'{location}' is not in container {}", self.name)));
        }
        self.files
            .get(location.path())
            .cloned()
            .ok_or_else(|| Error::io(format!("'{location}' not found")))
    }

    fn exists(&self, location: &Location) -> bool {
        location.container() == Some(self.name.as_str()) && self.files.contains_key(location.path())
    }
}
