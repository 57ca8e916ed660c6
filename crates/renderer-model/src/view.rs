use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use log::trace;

use crate::{buffer::Buffer, raw::RawBufferTarget, sparse::SparseSubstitution};

/// A byte window `[byte_offset, byte_offset + byte_length)` into a [`Buffer`].
#[derive(Debug)]
pub struct BufferView {
    index: Option<usize>,
    name: Option<String>,
    buffer: Arc<Buffer>,
    byte_offset: usize,
    byte_length: usize,
    byte_stride: Option<usize>,
    target: Option<RawBufferTarget>,
    substitution: Option<SparseSubstitution>,
    patched: OnceLock<Bytes>,
}

impl BufferView {
    pub(crate) fn new(
        index: Option<usize>,
        name: Option<String>,
        buffer: Arc<Buffer>,
        byte_offset: usize,
        byte_length: usize,
        byte_stride: Option<usize>,
        target: Option<RawBufferTarget>,
    ) -> Self {
        Self {
            index,
            name,
            buffer,
            byte_offset,
            byte_length,
            byte_stride,
            target,
            substitution: None,
            patched: OnceLock::new(),
        }
    }

    /// Tightly packed view covering the whole of `buffer`.
    pub(crate) fn dense(buffer: Arc<Buffer>, element_size: usize) -> Self {
        let byte_length = buffer.byte_length();
        Self::new(None, None, buffer, 0, byte_length, Some(element_size), None)
    }

    pub(crate) fn with_substitution(mut self, substitution: SparseSubstitution) -> Self {
        self.substitution = Some(substitution);
        self
    }

    /// Position in the document, `None` for synthesized views.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Distance between two interleaved elements, `None` if tightly packed.
    pub fn byte_stride(&self) -> Option<usize> {
        self.byte_stride
    }

    pub fn target(&self) -> Option<RawBufferTarget> {
        self.target
    }

    /// Whether this view backs a sparse accessor.
    pub fn is_sparse(&self) -> bool {
        self.substitution.is_some()
    }

    /// Bytes covered by this view.
    ///
    /// For a view backing a sparse accessor the first call patches the dense
    /// data and every later call, from any thread, returns that same result.
    pub fn data(&self) -> Bytes {
        let window = self.buffer.window(self.byte_offset, self.byte_length);
        match &self.substitution {
            None => window,
            Some(substitution) => self
                .patched
                .get_or_init(|| {
                    trace!(
                        "Substituting sparse data of accessor #{}",
                        substitution.accessor()
                    );
                    substitution.apply(&window)
                })
                .clone(),
        }
    }
}
