//! Buffer encoder contract and accessor layout types.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Component type of an accessor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum ComponentType {
    Float,
}

impl ComponentType {
    /// glTF component type code.
    #[inline]
    pub fn code(self) -> u32 {
        match self {
            Self::Float => 5126,
        }
    }
}

impl Serialize for ComponentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

/// Element shape of an accessor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "SCALAR")]
    Scalar,
    #[serde(rename = "VEC2")]
    Vec2,
    #[serde(rename = "VEC3")]
    Vec3,
    #[serde(rename = "VEC4")]
    Vec4,
}

impl DataType {
    pub fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            1 => Some(Self::Scalar),
            2 => Some(Self::Vec2),
            3 => Some(Self::Vec3),
            4 => Some(Self::Vec4),
            _ => None,
        }
    }

    #[inline]
    pub fn num_components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
        }
    }
}

/// Packs flat numeric arrays into binary storage owned by the caller.
///
/// The exporter never sees bytes; it receives an opaque handle per array.
pub trait BufferEncoder {
    type Handle: Clone + fmt::Debug;

    fn encode(&mut self, data: &[f32], component_type: ComponentType) -> Self::Handle;
}

/// Index of an encoded buffer view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferViewHandle(pub u32);

/// Encoder that keeps every array in memory, in encode order.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    views: Vec<(ComponentType, Vec<f32>)>,
}

impl InMemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, handle: BufferViewHandle) -> Option<&[f32]> {
        self.views
            .get(handle.0 as usize)
            .map(|(_, data)| data.as_slice())
    }

    /// Number of arrays encoded so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl BufferEncoder for InMemoryEncoder {
    type Handle = BufferViewHandle;

    fn encode(&mut self, data: &[f32], component_type: ComponentType) -> BufferViewHandle {
        let handle = BufferViewHandle(self.views.len() as u32);
        self.views.push((component_type, data.to_vec()));
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_handles_are_sequential() {
        let mut enc = InMemoryEncoder::new();
        let a = enc.encode(&[1.0, 2.0], ComponentType::Float);
        let b = enc.encode(&[3.0], ComponentType::Float);
        assert_eq!((a, b), (BufferViewHandle(0), BufferViewHandle(1)));
        assert_eq!(enc.view(b), Some(&[3.0][..]));
        assert_eq!(enc.view(BufferViewHandle(7)), None);
        assert_eq!(enc.len(), 2);
    }

    #[test]
    fn data_types_follow_arity() {
        assert_eq!(DataType::from_arity(2), Some(DataType::Vec2));
        assert_eq!(DataType::from_arity(5), None);
        assert_eq!(serde_json::to_value(DataType::Vec4).unwrap(), "VEC4");
        assert_eq!(serde_json::to_value(ComponentType::Float).unwrap(), 5126);
    }
}
