use std::sync::Arc;

use crate::{
    error::{ModelError, ModelResult},
    index::RecordKind,
};

pub(crate) enum Slot<T> {
    Pending,
    Linking,
    Ready(Arc<T>),
}

/// Check `index` against a sequence of `len` records of `kind`.
pub(crate) fn check_index(kind: RecordKind, index: usize, len: usize) -> ModelResult<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(ModelError::MalformedReference { kind, index, len })
    }
}

/// One slot per raw record of a kind, addressed by position.
pub(crate) struct Arena<T> {
    kind: RecordKind,
    slots: Vec<Slot<T>>,
}

impl<T> Arena<T> {
    pub fn new(kind: RecordKind, len: usize) -> Self {
        Self {
            kind,
            slots: (0..len).map(|_| Slot::Pending).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> ModelResult<&Slot<T>> {
        let index = check_index(self.kind, index, self.slots.len())?;
        Ok(&self.slots[index])
    }

    /// The linked object at `index`.
    pub fn get(&self, index: usize) -> ModelResult<&Arc<T>> {
        match self.slot(index)? {
            Slot::Ready(item) => Ok(item),
            Slot::Pending | Slot::Linking => Err(ModelError::missing(
                format!("{} #{}", self.kind, index),
                "referenced before it was linked",
            )),
        }
    }

    pub fn begin(&mut self, index: usize) {
        self.slots[index] = Slot::Linking;
    }

    pub fn insert(&mut self, index: usize, item: Arc<T>) -> Arc<T> {
        self.slots[index] = Slot::Ready(item.clone());
        item
    }

    /// Every linked object, in record order.
    pub fn into_vec(self) -> ModelResult<Vec<Arc<T>>> {
        let kind = self.kind;
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Slot::Ready(item) => Ok(item),
                Slot::Pending | Slot::Linking => Err(ModelError::missing(
                    format!("{} #{}", kind, index),
                    "never linked",
                )),
            })
            .collect()
    }
}
