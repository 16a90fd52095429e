//! Animated target properties and their vector arity.

use serde::{Deserialize, Serialize};

/// Largest vector an output accessor can carry for one keyframe value.
pub const MAX_ARITY: usize = 4;

/// The property a channel group drives, taken from the last segment of its data path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetProperty {
    Location,
    /// (angle, x, y, z)
    RotationAxisAngle,
    RotationEuler,
    /// (w, x, y, z) in authoring order
    RotationQuaternion,
    Scale,
    /// Scalar property such as a shape key weight.
    Value,
    /// Any property this crate has no fixed arity for.
    Other(String),
}

impl TargetProperty {
    /// Parse a data path such as `location` or `pose.bones["Arm"].rotation_quaternion`.
    pub fn from_data_path(path: &str) -> Self {
        let leaf = path.rsplit('.').next().unwrap_or(path);
        match leaf {
            "location" => Self::Location,
            "rotation_axis_angle" => Self::RotationAxisAngle,
            "rotation_euler" => Self::RotationEuler,
            "rotation_quaternion" => Self::RotationQuaternion,
            "scale" => Self::Scale,
            "value" => Self::Value,
            other => Self::Other(other.to_string()),
        }
    }

    /// Fixed arity for known properties; `None` for [`TargetProperty::Other`].
    #[inline]
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Location | Self::RotationEuler | Self::Scale => Some(3),
            Self::RotationAxisAngle | Self::RotationQuaternion => Some(4),
            Self::Value => Some(1),
            Self::Other(_) => None,
        }
    }

    /// Arity used for a group driving the given component indices.
    ///
    /// Unknown properties get just enough components to hold the highest driven
    /// index (at least one); the result may exceed [`MAX_ARITY`] and is
    /// rejected by group construction in that case.
    pub fn resolve_arity<I>(&self, component_indices: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        match self.arity() {
            Some(n) => n,
            None => component_indices
                .into_iter()
                .map(|i| i + 1)
                .max()
                .unwrap_or(1)
                .max(1),
        }
    }
}
