use bytes::Bytes;

/// Where the bytes of a [`Buffer`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferSource {
    /// The binary chunk shipped with the document (buffer 0 only).
    Embedded,
    /// An inline `data:` URI.
    DataUri,
    /// An external resource resolved by the resource loader.
    Uri(String),
    /// Created while building, e.g. to back a sparse accessor.
    Synthesized(String),
}

/// A named, immutable block of bytes.
///
/// The storage is reference counted: [`Buffer::data`] and every view derived
/// from it share the same allocation, and none of them can write to it.
#[derive(Debug, Clone)]
pub struct Buffer {
    index: Option<usize>,
    name: Option<String>,
    source: BufferSource,
    data: Bytes,
}

impl Buffer {
    pub(crate) fn new(
        index: Option<usize>,
        name: Option<String>,
        source: BufferSource,
        data: Bytes,
    ) -> Self {
        Self {
            index,
            name,
            source,
            data,
        }
    }

    /// Zero-filled buffer owned by a synthesized accessor.
    pub(crate) fn zeroed(uri: String, byte_length: usize) -> Self {
        Self::new(
            None,
            None,
            BufferSource::Synthesized(uri),
            Bytes::from(vec![0u8; byte_length]),
        )
    }

    /// Position in the document, `None` for synthesized buffers.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn source(&self) -> &BufferSource {
        &self.source
    }

    /// Diagnostic URI: the external URI, or the generated name of a
    /// synthesized buffer.
    pub fn uri(&self) -> Option<&str> {
        match &self.source {
            BufferSource::Uri(uri) | BufferSource::Synthesized(uri) => Some(uri),
            BufferSource::Embedded | BufferSource::DataUri => None,
        }
    }

    pub fn byte_length(&self) -> usize {
        self.data.len()
    }

    /// Zero-copy handle to the whole buffer.
    pub fn data(&self) -> Bytes {
        self.data.clone()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Zero-copy window `[offset, offset + length)`.
    ///
    /// Callers check the range against [`Buffer::byte_length`] first.
    pub(crate) fn window(&self, offset: usize, length: usize) -> Bytes {
        self.data.slice(offset..offset + length)
    }
}

#[cfg(test)]
mod test {
    use bytes::Bytes;

    use super::{Buffer, BufferSource};

    #[test]
    fn window_shares_storage() {
        let buffer = Buffer::new(
            Some(0),
            None,
            BufferSource::Embedded,
            Bytes::from_static(&[1, 2, 3, 4, 5, 6]),
        );
        let window = buffer.window(2, 3);
        assert_eq!(&window[..], &[3, 4, 5]);
        assert_eq!(window.as_ptr(), buffer.as_slice()[2..].as_ptr());
    }

    #[test]
    fn zeroed_buffer_reports_generated_uri() {
        let buffer = Buffer::zeroed("buffer_for_accessor3.bin".to_string(), 12);
        assert_eq!(buffer.byte_length(), 12);
        assert_eq!(buffer.index(), None);
        assert_eq!(buffer.uri(), Some("buffer_for_accessor3.bin"));
        assert!(buffer.as_slice().iter().all(|byte| *byte == 0));
    }
}
