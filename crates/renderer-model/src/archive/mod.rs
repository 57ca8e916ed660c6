//! Read-only access to bundles holding a model and its resources.

use std::{
    borrow::Cow,
    error::Error,
    io::{Read, Seek},
    path::Path,
};

use bytes::Bytes;

#[cfg(feature = "tar")]
pub mod tar;
#[cfg(feature = "zip")]
pub mod zip;

pub trait Entry<'a> {
    type Error: Error + Send + Sync + 'static;

    fn name(&self) -> Result<Cow<'_, str>, Self::Error>;
    fn unpack(&mut self) -> Result<Vec<u8>, Self::Error>;
}

pub trait Archive<T>: Sized {
    type Error: Error + Send + Sync + 'static;
    type Entry<'a>: Entry<'a, Error = Self::Error>
    where
        Self: 'a;

    fn new(stream: T) -> Result<Self, Self::Error>
    where
        T: Read + Seek;

    fn by_path<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<Self::Entry<'_>>, Self::Error>;

    /// Unpack the entry at `path`, `None` if the archive has no such entry.
    fn read<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<Bytes>, Self::Error> {
        let Some(mut entry) = self.by_path(path)? else {
            return Ok(None);
        };
        Ok(Some(Bytes::from(entry.unpack()?)))
    }
}
