use gl::types::GLenum;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementType {
    Float,
    UnsignedInt,
    UnsignedByte,
}

impl ElementType {
    /// Size of a single component in bytes.
    pub fn size(self) -> usize {
        match self {
            ElementType::Float => std::mem::size_of::<f32>(),
            ElementType::UnsignedInt => std::mem::size_of::<u32>(),
            ElementType::UnsignedByte => std::mem::size_of::<u8>(),
        }
    }

    pub fn gl_enum(self) -> GLenum {
        match self {
            ElementType::Float => gl::FLOAT,
            ElementType::UnsignedInt => gl::UNSIGNED_INT,
            ElementType::UnsignedByte => gl::UNSIGNED_BYTE,
        }
    }
}

/// Component types a layout element can be made of.
pub trait VertexComponent: bytemuck::Pod {
    const ELEMENT_TYPE: ElementType;
    const NORMALIZED: bool = false;
}

impl VertexComponent for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::Float;
}

impl VertexComponent for u32 {
    const ELEMENT_TYPE: ElementType = ElementType::UnsignedInt;
}

impl VertexComponent for u8 {
    const ELEMENT_TYPE: ElementType = ElementType::UnsignedByte;
    const NORMALIZED: bool = true;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexBufferElement {
    pub count: u32,
    pub ty: ElementType,
    pub normalized: bool,
}

impl VertexBufferElement {
    pub fn size(&self) -> usize {
        self.count as usize * self.ty.size()
    }
}

/// Describes how the bytes of a vertex buffer map to shader inputs.
///
/// Elements are assigned attribute indices in push order, so they have to be
/// pushed in the order the shader declares its inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexBufferLayout {
    elements: Vec<VertexBufferElement>,
    stride: usize,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<T: VertexComponent>(&mut self, count: u32) -> &mut Self {
        let element = VertexBufferElement {
            count,
            ty: T::ELEMENT_TYPE,
            normalized: T::NORMALIZED,
        };
        self.stride += element.size();
        self.elements.push(element);
        self
    }

    pub fn elements(&self) -> &[VertexBufferElement] {
        &self.elements
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Byte offset of the element at `index` within one vertex.
    pub fn offset_of(&self, index: usize) -> Option<usize> {
        if index >= self.elements.len() {
            return None;
        }
        Some(self.elements[..index].iter().map(|e| e.size()).sum())
    }

    /// Iterates `(attribute index, element, byte offset)`.
    pub fn attributes(&self) -> impl Iterator<Item = (u32, &VertexBufferElement, usize)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .scan(0, |offset, (i, element)| {
                let current = *offset;
                *offset += element.size();
                Some((i as u32, element, current))
            })
    }
}
