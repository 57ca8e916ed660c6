use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

use crate::view::BufferView;

/// Numeric encoding of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    pub fn from_gl(code: u32) -> Option<Self> {
        match code {
            5120 => Some(ComponentType::I8),
            5121 => Some(ComponentType::U8),
            5122 => Some(ComponentType::I16),
            5123 => Some(ComponentType::U16),
            5125 => Some(ComponentType::U32),
            5126 => Some(ComponentType::F32),
            _ => None,
        }
    }

    pub fn gl(self) -> u32 {
        match self {
            ComponentType::I8 => 5120,
            ComponentType::U8 => 5121,
            ComponentType::I16 => 5122,
            ComponentType::U16 => 5123,
            ComponentType::U32 => 5125,
            ComponentType::F32 => 5126,
        }
    }

    /// Size in bytes.
    pub fn size(self) -> usize {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }
}

/// Logical shape of one accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SCALAR" => Some(ElementType::Scalar),
            "VEC2" => Some(ElementType::Vec2),
            "VEC3" => Some(ElementType::Vec3),
            "VEC4" => Some(ElementType::Vec4),
            "MAT2" => Some(ElementType::Mat2),
            "MAT3" => Some(ElementType::Mat3),
            "MAT4" => Some(ElementType::Mat4),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementType::Scalar => "SCALAR",
            ElementType::Vec2 => "VEC2",
            ElementType::Vec3 => "VEC3",
            ElementType::Vec4 => "VEC4",
            ElementType::Mat2 => "MAT2",
            ElementType::Mat3 => "MAT3",
            ElementType::Mat4 => "MAT4",
        }
    }

    pub fn components(self) -> usize {
        match self {
            ElementType::Scalar => 1,
            ElementType::Vec2 => 2,
            ElementType::Vec3 => 3,
            ElementType::Vec4 => 4,
            ElementType::Mat2 => 4,
            ElementType::Mat3 => 9,
            ElementType::Mat4 => 16,
        }
    }
}

/// Size in bytes of one element.
pub fn element_size(component_type: ComponentType, element_type: ElementType) -> usize {
    component_type.size() * element_type.components()
}

#[derive(Debug, Error)]
pub enum AccessorError {
    #[error("Bad accessor component type: expected {expected:?}, but got {actual:?}")]
    BadComponentType {
        expected: ComponentType,
        actual: ComponentType,
    },
}

/// Copy `count` elements of `element_size` bytes, `stride` bytes apart
/// starting at `offset`, into a tightly packed vector.
pub(crate) fn deinterleave(
    data: &[u8],
    offset: usize,
    stride: usize,
    element_size: usize,
    count: usize,
) -> Vec<u8> {
    let mut result = Vec::with_capacity(element_size * count);
    for index in 0..count {
        let start = offset + index * stride;
        result.extend_from_slice(&data[start..start + element_size]);
    }
    result
}

/// Byte span an accessor covers inside its view, `None` on overflow.
pub(crate) fn accessor_span(count: usize, stride: usize, element_size: usize) -> Option<usize> {
    match count.checked_sub(1) {
        None => Some(0),
        Some(last) => last.checked_mul(stride)?.checked_add(element_size),
    }
}

/// Typed, strided view over the bytes of a [`BufferView`].
#[derive(Debug)]
pub struct Accessor {
    pub(crate) index: usize,
    pub(crate) name: Option<String>,
    pub(crate) component_type: ComponentType,
    pub(crate) element_type: ElementType,
    pub(crate) count: usize,
    pub(crate) byte_offset: usize,
    pub(crate) byte_stride: usize,
    pub(crate) normalized: bool,
    pub(crate) min: Option<Vec<f64>>,
    pub(crate) max: Option<Vec<f64>>,
    pub(crate) view: Arc<BufferView>,
}

impl Accessor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Offset of the first element inside the view.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Effective distance between elements: the view's stride, or the
    /// element size when the view is tightly packed.
    pub fn byte_stride(&self) -> usize {
        self.byte_stride
    }

    pub fn element_size(&self) -> usize {
        element_size(self.component_type, self.element_type)
    }

    pub fn normalized(&self) -> bool {
        self.normalized
    }

    pub fn min(&self) -> Option<&[f64]> {
        self.min.as_deref()
    }

    pub fn max(&self) -> Option<&[f64]> {
        self.max.as_deref()
    }

    pub fn view(&self) -> &Arc<BufferView> {
        &self.view
    }

    pub fn is_sparse(&self) -> bool {
        self.view.is_sparse()
    }

    /// Raw bytes of element `index`, zero-copy.
    pub fn element(&self, index: usize) -> Option<Bytes> {
        if index >= self.count {
            return None;
        }
        let start = self.byte_offset + index * self.byte_stride;
        Some(self.view.data().slice(start..start + self.element_size()))
    }

    /// All elements, tightly packed.
    pub fn read_bytes(&self) -> Vec<u8> {
        let data = self.view.data();
        deinterleave(
            &data,
            self.byte_offset,
            self.byte_stride,
            self.element_size(),
            self.count,
        )
    }

    fn expect_component_type(&self, expected: ComponentType) -> Result<(), AccessorError> {
        if self.component_type != expected {
            return Err(AccessorError::BadComponentType {
                expected,
                actual: self.component_type,
            });
        }
        Ok(())
    }

    pub fn read_f32(&self) -> Result<Vec<f32>, AccessorError> {
        self.expect_component_type(ComponentType::F32)?;
        Ok(self
            .read_bytes()
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    pub fn read_u8(&self) -> Result<Vec<u8>, AccessorError> {
        self.expect_component_type(ComponentType::U8)?;
        Ok(self.read_bytes())
    }

    pub fn read_u16(&self) -> Result<Vec<u16>, AccessorError> {
        self.expect_component_type(ComponentType::U16)?;
        Ok(self
            .read_bytes()
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect())
    }

    pub fn read_u32(&self) -> Result<Vec<u32>, AccessorError> {
        self.expect_component_type(ComponentType::U32)?;
        Ok(self
            .read_bytes()
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    /// Index data widened to `u32`.
    pub fn read_indices(&self) -> Result<Vec<u32>, AccessorError> {
        match self.component_type {
            ComponentType::U8 => Ok(self.read_u8()?.into_iter().map(u32::from).collect()),
            ComponentType::U16 => Ok(self.read_u16()?.into_iter().map(u32::from).collect()),
            ComponentType::U32 => self.read_u32(),
            actual => Err(AccessorError::BadComponentType {
                expected: ComponentType::U32,
                actual,
            }),
        }
    }

    /// Floats, with unsigned integer data scaled to `0.0..=1.0`.
    pub fn read_normalized(&self) -> Result<Vec<f32>, AccessorError> {
        match self.component_type {
            ComponentType::U8 => Ok(self
                .read_u8()?
                .into_iter()
                .map(|item| item as f32 / u8::MAX as f32)
                .collect()),
            ComponentType::U16 => Ok(self
                .read_u16()?
                .into_iter()
                .map(|item| item as f32 / u16::MAX as f32)
                .collect()),
            ComponentType::U32 => Ok(self
                .read_u32()?
                .into_iter()
                .map(|item| item as f32 / u32::MAX as f32)
                .collect()),
            _ => self.read_f32(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::{accessor_span, deinterleave, element_size, Accessor, ComponentType, ElementType};
    use crate::{
        buffer::{Buffer, BufferSource},
        view::BufferView,
    };

    fn interleaved_accessor() -> Accessor {
        // Two VEC2<u16> elements, 8 bytes apart, starting at byte 2.
        let data: Vec<u8> = vec![
            0xff, 0xff, 1, 0, 2, 0, 0xee, 0xee, 0xee, 0xee, 3, 0, 4, 0, 0xdd, 0xdd,
        ];
        let buffer = Arc::new(Buffer::new(
            Some(0),
            None,
            BufferSource::Embedded,
            Bytes::from(data),
        ));
        let view = Arc::new(BufferView::new(Some(0), None, buffer, 0, 16, Some(8), None));
        Accessor {
            index: 0,
            name: None,
            component_type: ComponentType::U16,
            element_type: ElementType::Vec2,
            count: 2,
            byte_offset: 2,
            byte_stride: 8,
            normalized: false,
            min: None,
            max: None,
            view,
        }
    }

    #[test]
    fn element_sizes() {
        assert_eq!(element_size(ComponentType::F32, ElementType::Vec3), 12);
        assert_eq!(element_size(ComponentType::U8, ElementType::Mat4), 16);
        assert_eq!(element_size(ComponentType::I16, ElementType::Scalar), 2);
    }

    #[test]
    fn gl_codes_round_trip() {
        for code in [5120, 5121, 5122, 5123, 5125, 5126] {
            let component_type = ComponentType::from_gl(code).unwrap();
            assert_eq!(component_type.gl(), code);
        }
        assert_eq!(ComponentType::from_gl(5124), None);
    }

    #[test]
    fn span_of_strided_elements() {
        assert_eq!(accessor_span(0, 8, 4), Some(0));
        assert_eq!(accessor_span(3, 8, 4), Some(20));
        assert_eq!(accessor_span(usize::MAX / 2, 8, 4), None);
        assert_eq!(accessor_span(2, usize::MAX, 4), None);
    }

    #[test]
    fn deinterleave_skips_padding() {
        let data = [1, 2, 9, 9, 3, 4, 9, 9];
        assert_eq!(deinterleave(&data, 0, 4, 2, 2), vec![1, 2, 3, 4]);
    }

    #[test]
    fn strided_reads() {
        let accessor = interleaved_accessor();
        assert_eq!(accessor.read_u16().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(accessor.read_indices().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(&accessor.element(1).unwrap()[..], &[3, 0, 4, 0]);
        assert!(accessor.element(2).is_none());
        assert!(accessor.read_f32().is_err());
    }
}
