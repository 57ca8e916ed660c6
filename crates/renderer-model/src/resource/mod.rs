//! Loading external and inline resource bytes referenced by URI.
//!
//! Only data URIs, absolute (`file:`) paths and relative paths are
//! supported. Other URIs such as HTTP are rejected with
//! [`SchemeError::Unsupported`].

use std::{
    collections::HashMap,
    error::Error,
    fs, io,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use thiserror::Error;

use crate::archive::Archive;

mod scheme;

pub use scheme::{is_data_uri, Scheme, SchemeError};

/// Source of the bytes behind the URIs of a document.
pub trait ResourceLoader {
    type Error: Error + Send + Sync + From<SchemeError> + 'static;

    /// Load the resource at `uri`, `None` if there is no such resource.
    fn resolve(&mut self, uri: &str) -> Result<Option<Bytes>, Self::Error>;

    /// Decode an inline `data:` URI.
    fn decode_data_uri(&mut self, uri: &str) -> Result<Bytes, Self::Error> {
        match Scheme::try_from(uri)? {
            Scheme::Data(_mime, data) => Ok(Bytes::from(data)),
            Scheme::Relative(_) | Scheme::Absolute(_) => Err(SchemeError::BadDataUri.into()),
        }
    }
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for &mut L {
    type Error = L::Error;

    fn resolve(&mut self, uri: &str) -> Result<Option<Bytes>, Self::Error> {
        (**self).resolve(uri)
    }

    fn decode_data_uri(&mut self, uri: &str) -> Result<Bytes, Self::Error> {
        (**self).decode_data_uri(uri)
    }
}

#[derive(Debug, Error)]
pub enum ResourceError<E> {
    #[error(transparent)]
    Scheme(#[from] SchemeError),
    #[error(transparent)]
    Io(E),
}

/// Resources kept in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    resources: HashMap<String, Bytes>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Bytes>) {
        self.resources.insert(path.into(), data.into());
    }

    pub fn with(mut self, path: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(path, data);
        self
    }
}

impl ResourceLoader for MemoryLoader {
    type Error = SchemeError;

    fn resolve(&mut self, uri: &str) -> Result<Option<Bytes>, Self::Error> {
        match Scheme::try_from(uri)? {
            Scheme::Data(_mime, data) => Ok(Some(Bytes::from(data))),
            Scheme::Relative(path) | Scheme::Absolute(path) => {
                Ok(self.resources.get(path).cloned())
            }
        }
    }
}

/// Resources read from the file system, relative paths starting from the
/// directory of the model file.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    base: PathBuf,
}

impl DirectoryLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn read(path: &Path) -> Result<Option<Bytes>, ResourceError<io::Error>> {
        match fs::read(path) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(ResourceError::Io(error)),
        }
    }
}

impl ResourceLoader for DirectoryLoader {
    type Error = ResourceError<io::Error>;

    fn resolve(&mut self, uri: &str) -> Result<Option<Bytes>, Self::Error> {
        match Scheme::try_from(uri)? {
            Scheme::Data(_mime, data) => Ok(Some(Bytes::from(data))),
            Scheme::Relative(path) => Self::read(&self.base.join(path)),
            Scheme::Absolute(path) => Self::read(Path::new(path)),
        }
    }
}

/// Resources read from an [`Archive`], relative paths starting from the
/// directory of the model file inside the archive.
pub struct ArchiveLoader<'a, T, A> {
    archive: &'a mut A,
    base: PathBuf,
    _stream: PhantomData<fn() -> T>,
}

impl<'a, T, A: Archive<T>> ArchiveLoader<'a, T, A> {
    /// `model_path` is the path of the model file inside the archive.
    pub fn new(archive: &'a mut A, model_path: impl AsRef<Path>) -> Self {
        let base = model_path
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            archive,
            base,
            _stream: PhantomData,
        }
    }
}

impl<T, A: Archive<T>> ResourceLoader for ArchiveLoader<'_, T, A> {
    type Error = ResourceError<A::Error>;

    fn resolve(&mut self, uri: &str) -> Result<Option<Bytes>, Self::Error> {
        match Scheme::try_from(uri)? {
            Scheme::Data(_mime, data) => Ok(Some(Bytes::from(data))),
            Scheme::Relative(path) => self
                .archive
                .read(self.base.join(path))
                .map_err(ResourceError::Io),
            Scheme::Absolute(path) => self.archive.read(path).map_err(ResourceError::Io),
        }
    }
}
