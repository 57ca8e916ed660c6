use std::error::Error;

use thiserror::Error;

use crate::{accessor::ComponentType, index::RecordKind};

pub type BoxedError = Box<dyn Error + Send + Sync + 'static>;

/// Fatal errors raised while building a [`Model`](crate::model::Model).
///
/// Building is all-or-nothing: whenever one of these is returned, no part of
/// the graph survives.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{kind} index {index} is out of bounds (only {len} defined)")]
    MalformedReference {
        kind: RecordKind,
        index: usize,
        len: usize,
    },
    #[error("Missing data for {what}: {reason}")]
    MissingData { what: String, reason: String },
    #[error("Sparse index {index} of accessor #{accessor} exceeds its count {count}")]
    SparseIndexOutOfRange {
        accessor: usize,
        index: usize,
        count: usize,
    },
    #[error("Sparse indices of accessor #{accessor} use {component_type:?}, expected an unsigned integer")]
    InvalidSparseIndexType {
        accessor: usize,
        component_type: ComponentType,
    },
    #[error("Byte range of {what} out of bounds: {length} bytes at offset {offset}, but only {available} available")]
    ByteRangeOutOfBounds {
        what: String,
        offset: usize,
        length: usize,
        available: usize,
    },
    #[error("Node #{node} is its own ancestor")]
    CyclicNodeGraph { node: usize },
    #[error("Failed to load resource {uri}: {source}")]
    Resource {
        uri: String,
        #[source]
        source: BoxedError,
    },
}

impl ModelError {
    pub(crate) fn missing(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingData {
            what: what.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_bounds(
        what: impl Into<String>,
        offset: usize,
        length: usize,
        available: usize,
    ) -> Self {
        Self::ByteRangeOutOfBounds {
            what: what.into(),
            offset,
            length,
            available,
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Check that `[offset, offset + length)` fits into `available` bytes.
pub(crate) fn check_range(
    what: impl FnOnce() -> String,
    offset: usize,
    length: usize,
    available: usize,
) -> ModelResult<()> {
    match offset.checked_add(length) {
        Some(end) if end <= available => Ok(()),
        _ => Err(ModelError::out_of_bounds(what(), offset, length, available)),
    }
}

/// Size in bytes of `count` items of `size` bytes, at most `isize::MAX` so
/// the result can be allocated.
pub(crate) fn checked_size(
    what: impl FnOnce() -> String,
    count: usize,
    size: usize,
) -> ModelResult<usize> {
    let available = isize::MAX as usize;
    match count.checked_mul(size) {
        Some(length) if length <= available => Ok(length),
        _ => Err(ModelError::out_of_bounds(
            what(),
            0,
            count.saturating_mul(size),
            available,
        )),
    }
}
