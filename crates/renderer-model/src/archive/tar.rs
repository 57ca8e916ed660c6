use std::{
    borrow::Cow,
    collections::HashMap,
    io::{self, Read, Seek, SeekFrom, Take},
    path::{Path, PathBuf},
};

use thiserror::Error;

use super::{Archive, Entry};

#[derive(Debug, Error)]
pub enum TarError {
    #[error(transparent)]
    Tar(#[from] io::Error),
    #[error("File size {0} is too large")]
    FileTooLarge(u64),
    #[error("Bad file name (not unicode)")]
    BadFileName,
}

#[derive(Debug, Clone, Copy)]
struct TarEntryRange {
    position: u64,
    size: u64,
}

/// Tar bundle indexed once on open, so entries can be looked up in any
/// order and any number of times.
pub struct TarArchive<R> {
    reader: R,
    entries: HashMap<PathBuf, TarEntryRange>,
}

impl<R: Read + Seek> TarArchive<R> {
    pub fn open(reader: R) -> Result<Self, TarError> {
        let mut archive = tar::Archive::new(reader);
        let mut entries = HashMap::new();
        for entry in archive.entries_with_seek()? {
            let entry = entry?;
            let path = entry.path()?.into_owned();
            entries.insert(
                path,
                TarEntryRange {
                    position: entry.raw_file_position(),
                    size: entry.size(),
                },
            );
        }
        Ok(Self {
            reader: archive.into_inner(),
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct TarFile<'a, R> {
    path: &'a Path,
    size: u64,
    data: Take<&'a mut R>,
}

impl<'a, R: Read> Entry<'a> for TarFile<'a, R> {
    type Error = TarError;

    fn name(&self) -> Result<Cow<'_, str>, Self::Error> {
        let Some(path) = self.path.to_str() else {
            return Err(TarError::BadFileName);
        };
        Ok(Cow::Borrowed(path))
    }

    fn unpack(&mut self) -> Result<Vec<u8>, Self::Error> {
        let file_size: usize = self
            .size
            .try_into()
            .map_err(|_| TarError::FileTooLarge(self.size))?;
        let mut data = Vec::with_capacity(file_size);
        self.data.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl<R: Read + Seek> Archive<R> for TarArchive<R> {
    type Error = TarError;

    type Entry<'a> = TarFile<'a, R>
    where
        Self: 'a;

    fn new(stream: R) -> Result<Self, Self::Error> {
        Self::open(stream)
    }

    fn by_path<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<Self::Entry<'_>>, Self::Error> {
        let Some((path, range)) = self.entries.get_key_value(path.as_ref()) else {
            return Ok(None);
        };
        self.reader.seek(SeekFrom::Start(range.position))?;
        Ok(Some(TarFile {
            path: path.as_path(),
            size: range.size,
            data: (&mut self.reader).take(range.size),
        }))
    }
}
