//! Overlay of sparse accessor values onto a dense array.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use crate::{
    accessor::{deinterleave, ComponentType},
    error::{ModelError, ModelResult},
    view::BufferView,
};

/// Component types allowed for sparse indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseIndexType {
    U8,
    U16,
    U32,
}

impl SparseIndexType {
    pub fn from_component_type(component_type: ComponentType) -> Option<Self> {
        match component_type {
            ComponentType::U8 => Some(SparseIndexType::U8),
            ComponentType::U16 => Some(SparseIndexType::U16),
            ComponentType::U32 => Some(SparseIndexType::U32),
            _ => None,
        }
    }

    pub fn size(self) -> usize {
        match self {
            SparseIndexType::U8 => 1,
            SparseIndexType::U16 => 2,
            SparseIndexType::U32 => 4,
        }
    }

    /// Decode `count` little-endian indices from the start of `data`.
    pub fn decode(self, data: &[u8], count: usize) -> Vec<usize> {
        let data = &data[..count * self.size()];
        match self {
            SparseIndexType::U8 => data.iter().map(|index| *index as usize).collect(),
            SparseIndexType::U16 => data
                .chunks_exact(2)
                .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]) as usize)
                .collect(),
            SparseIndexType::U32 => data
                .chunks_exact(4)
                .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize)
                .collect(),
        }
    }
}

/// Base values a sparse accessor starts from before the overlay.
#[derive(Debug)]
pub(crate) struct SparseBase {
    pub view: Arc<BufferView>,
    pub byte_offset: usize,
    pub byte_stride: usize,
}

/// Deferred overlay for the dense view of one sparse accessor.
///
/// Indices are decoded and range-checked when the accessor is linked, so
/// applying the substitution later cannot fail.
#[derive(Debug)]
pub(crate) struct SparseSubstitution {
    accessor: usize,
    count: usize,
    element_size: usize,
    indices: Vec<usize>,
    values: Bytes,
    base: Option<SparseBase>,
}

impl SparseSubstitution {
    /// Decode and validate the overlay of accessor `accessor`.
    ///
    /// `indices` and `values` are the bytes of the sparse indices and values
    /// views, already advanced to their byte offsets.
    pub fn new(
        accessor: usize,
        count: usize,
        element_size: usize,
        index_type: SparseIndexType,
        indices: &[u8],
        values: Bytes,
        base: Option<SparseBase>,
    ) -> ModelResult<Self> {
        let override_count = values.len() / element_size.max(1);
        let indices = index_type.decode(indices, override_count);
        if let Some(index) = indices.iter().copied().find(|index| *index >= count) {
            return Err(ModelError::SparseIndexOutOfRange {
                accessor,
                index,
                count,
            });
        }
        Ok(Self {
            accessor,
            count,
            element_size,
            indices,
            values,
            base,
        })
    }

    pub fn accessor(&self) -> usize {
        self.accessor
    }

    /// Produce the patched dense data from the zero-filled `initial` bytes.
    pub fn apply(&self, initial: &[u8]) -> Bytes {
        let size = self.element_size;
        let mut dense = BytesMut::from(initial);
        if let Some(base) = &self.base {
            let data = base.view.data();
            let values = deinterleave(&data, base.byte_offset, base.byte_stride, size, self.count);
            dense[..values.len()].copy_from_slice(&values);
        }
        for (position, index) in self.indices.iter().enumerate() {
            let value = &self.values[position * size..(position + 1) * size];
            dense[index * size..(index + 1) * size].copy_from_slice(value);
        }
        dense.freeze()
    }
}
