//! Coordinate remapping applied to keyframe vectors before assembly.
//!
//! The authoring space is Z-up with (w, x, y, z) quaternions; the output space
//! is Y-up with (x, y, z, w) quaternions.

use crate::keyframe::Keyframe;
use crate::property::TargetProperty;

/// Row-major affine transform.
pub type Matrix4 = [[f32; 4]; 4];

pub const IDENTITY: Matrix4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Coordinate conversion for one property's vectors. Must be pure.
pub trait CoordinateRemap {
    fn transform(&self, value: &[f32], property: &TargetProperty, matrix: &Matrix4) -> Vec<f32>;

    /// Convert a Z-up vector to Y-up.
    fn swizzle_y_up(&self, value: &[f32], property: &TargetProperty) -> Vec<f32>;

    /// Reorder components into the output convention.
    fn to_output_order(&self, value: &[f32], _property: &TargetProperty) -> Vec<f32> {
        value.to_vec()
    }
}

/// Pass-through remap for data already in output space.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityRemap;

impl CoordinateRemap for IdentityRemap {
    fn transform(&self, value: &[f32], _property: &TargetProperty, _matrix: &Matrix4) -> Vec<f32> {
        value.to_vec()
    }

    fn swizzle_y_up(&self, value: &[f32], _property: &TargetProperty) -> Vec<f32> {
        value.to_vec()
    }
}

/// Z-up authoring space to Y-up output space.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRemap;

impl CoordinateRemap for StandardRemap {
    fn transform(&self, value: &[f32], property: &TargetProperty, matrix: &Matrix4) -> Vec<f32> {
        match (property, value) {
            (TargetProperty::Location, &[x, y, z]) => (0..3)
                .map(|r| matrix[r][0] * x + matrix[r][1] * y + matrix[r][2] * z + matrix[r][3])
                .collect(),
            _ => value.to_vec(),
        }
    }

    fn swizzle_y_up(&self, value: &[f32], property: &TargetProperty) -> Vec<f32> {
        match (property, value) {
            (TargetProperty::Location | TargetProperty::RotationEuler, &[x, y, z]) => {
                vec![x, z, -y]
            }
            (TargetProperty::Scale, &[x, y, z]) => vec![x, z, y],
            (TargetProperty::RotationQuaternion, &[w, x, y, z]) => vec![w, x, z, -y],
            (TargetProperty::RotationAxisAngle, &[angle, x, y, z]) => vec![angle, x, z, -y],
            _ => value.to_vec(),
        }
    }

    fn to_output_order(&self, value: &[f32], property: &TargetProperty) -> Vec<f32> {
        match (property, value) {
            (TargetProperty::RotationQuaternion, &[w, x, y, z]) => vec![x, y, z, w],
            _ => value.to_vec(),
        }
    }
}

/// Full conversion of one vector: transform, optional Y-up swizzle, output order.
pub fn remap_vector<R>(remap: &R, value: &[f32], property: &TargetProperty, y_up: bool) -> Vec<f32>
where
    R: CoordinateRemap + ?Sized,
{
    let transformed = remap.transform(value, property, &IDENTITY);
    let oriented = if y_up {
        remap.swizzle_y_up(&transformed, property)
    } else {
        transformed
    };
    remap.to_output_order(&oriented, property)
}

/// Remap the value and both tangents of every keyframe.
pub fn remap_keyframes<R>(
    keyframes: &[Keyframe],
    property: &TargetProperty,
    remap: &R,
    y_up: bool,
) -> Vec<Keyframe>
where
    R: CoordinateRemap + ?Sized,
{
    keyframes
        .iter()
        .map(|k| k.map_vectors(|v| remap_vector(remap, v, property, y_up)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_swizzles_to_y_up() {
        let v = remap_vector(&StandardRemap, &[1.0, 2.0, 3.0], &TargetProperty::Location, true);
        assert_eq!(v, vec![1.0, 3.0, -2.0]);
        let v = remap_vector(&StandardRemap, &[1.0, 2.0, 3.0], &TargetProperty::Scale, true);
        assert_eq!(v, vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn quaternions_reorder_even_without_y_up() {
        let q = [1.0, 0.1, 0.2, 0.3];
        let v = remap_vector(&StandardRemap, &q, &TargetProperty::RotationQuaternion, false);
        assert_eq!(v, vec![0.1, 0.2, 0.3, 1.0]);
        let v = remap_vector(&StandardRemap, &q, &TargetProperty::RotationQuaternion, true);
        assert_eq!(v, vec![0.1, 0.3, -0.2, 1.0]);
    }

    #[test]
    fn transform_applies_matrix_to_locations() {
        let mut m = IDENTITY;
        m[0][3] = 10.0;
        let v = StandardRemap.transform(&[1.0, 2.0, 3.0], &TargetProperty::Location, &m);
        assert_eq!(v, vec![11.0, 2.0, 3.0]);
        let s = StandardRemap.transform(&[1.0, 2.0, 3.0], &TargetProperty::Scale, &m);
        assert_eq!(s, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn unknown_properties_pass_through() {
        let prop = TargetProperty::Other("uv_offset".into());
        assert_eq!(remap_vector(&StandardRemap, &[1.0, 2.0], &prop, true), vec![1.0, 2.0]);
        assert_eq!(
            remap_vector(&IdentityRemap, &[1.0, 2.0, 3.0], &TargetProperty::Location, true),
            vec![1.0, 2.0, 3.0]
        );
    }
}
