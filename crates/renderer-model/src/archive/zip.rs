use std::{
    borrow::Cow,
    io::{self, Read, Seek},
    path::{Path, PathBuf},
};

use thiserror::Error;
use zip::{read::ZipFile, ZipArchive};

use super::{Archive, Entry};

#[derive(Debug, Error)]
pub enum ZipError {
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    #[error("File name {} is not valid Unicode", .0.display())]
    BadFileName(PathBuf),
    #[error("File size {0} is too large")]
    FileTooLarge(u64),
}

impl From<io::Error> for ZipError {
    fn from(value: io::Error) -> Self {
        Self::Zip(zip::result::ZipError::Io(value))
    }
}

impl<'a> Entry<'a> for ZipFile<'a> {
    type Error = ZipError;

    fn name(&self) -> Result<Cow<'_, str>, Self::Error> {
        Ok(ZipFile::name(self).into())
    }

    fn unpack(&mut self) -> Result<Vec<u8>, Self::Error> {
        let file_size = self.size();
        let file_size: usize = file_size
            .try_into()
            .map_err(|_| ZipError::FileTooLarge(file_size))?;
        let mut data = Vec::with_capacity(file_size);
        self.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl<T: Read + Seek> Archive<T> for ZipArchive<T> {
    type Error = ZipError;

    type Entry<'a> = ZipFile<'a>
    where
        Self: 'a;

    fn new(stream: T) -> Result<Self, Self::Error> {
        Ok(ZipArchive::new(stream)?)
    }

    fn by_path<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<Self::Entry<'_>>, Self::Error> {
        let path = path.as_ref();
        let name = path
            .to_str()
            .ok_or_else(|| ZipError::BadFileName(path.to_path_buf()))?;
        match self.by_name(name) {
            Ok(entry) => Ok(Some(entry)),
            Err(zip::result::ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}
