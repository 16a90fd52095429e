//! Channel groups: the set of scalar curves jointly driving one property.

use crate::curve::{AnimationCurve, ControlPoint, CurveInterpolation};
use crate::error::{ExportError, Result};
use crate::ids::GroupId;
use crate::property::{TargetProperty, MAX_ARITY};

/// One scalar curve driving one component of the target vector.
#[derive(Debug)]
pub struct Channel {
    pub component_index: usize,
    curve: Box<dyn AnimationCurve>,
}

impl Channel {
    pub fn new(component_index: usize, curve: impl AnimationCurve + 'static) -> Self {
        Self::from_boxed(component_index, Box::new(curve))
    }

    pub fn from_boxed(component_index: usize, curve: Box<dyn AnimationCurve>) -> Self {
        Self {
            component_index,
            curve,
        }
    }

    #[inline]
    pub fn curve(&self) -> &dyn AnimationCurve {
        self.curve.as_ref()
    }

    #[inline]
    pub fn control_points(&self) -> &[ControlPoint] {
        self.curve.control_points()
    }
}

/// Channels sharing one target property path.
///
/// Component indices are unique and below the group arity. The channel list may be
/// empty here; extraction reports that as missing data.
#[derive(Debug)]
pub struct ChannelGroup {
    id: GroupId,
    data_path: String,
    property: TargetProperty,
    arity: usize,
    channels: Vec<Channel>,
}

impl ChannelGroup {
    pub fn new(id: GroupId, data_path: impl Into<String>, channels: Vec<Channel>) -> Result<Self> {
        let data_path = data_path.into();
        let property = TargetProperty::from_data_path(&data_path);
        let arity = property.resolve_arity(channels.iter().map(|c| c.component_index));
        if arity > MAX_ARITY {
            return Err(ExportError::invalid_group(
                id,
                format!(
                    "'{data_path}' needs {arity} components; at most {MAX_ARITY} are supported"
                ),
            ));
        }

        let mut seen = [false; MAX_ARITY];
        for channel in &channels {
            let idx = channel.component_index;
            if idx >= arity {
                return Err(ExportError::invalid_group(
                    id,
                    format!("component index {idx} out of range for '{data_path}' (arity {arity})"),
                ));
            }
            if seen[idx] {
                return Err(ExportError::invalid_group(
                    id,
                    format!("component index {idx} is driven twice in '{data_path}'"),
                ));
            }
            seen[idx] = true;
        }

        Ok(Self {
            id,
            data_path,
            property,
            arity,
            channels,
        })
    }

    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    #[inline]
    pub fn data_path(&self) -> &str {
        &self.data_path
    }

    #[inline]
    pub fn property(&self) -> &TargetProperty {
        &self.property
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Mode of the first control point of the first channel.
    pub fn representative_interpolation(&self) -> Option<CurveInterpolation> {
        self.channels
            .first()
            .and_then(|c| c.control_points().first())
            .map(|p| p.interpolation)
    }

    /// Build a full-arity vector, zero-filled where no channel drives a component.
    pub fn scatter<F>(&self, mut component: F) -> Vec<f32>
    where
        F: FnMut(&Channel) -> f32,
    {
        let mut out = vec![0.0; self.arity];
        for channel in &self.channels {
            out[channel.component_index] = component(channel);
        }
        out
    }

    /// Fallible variant of [`ChannelGroup::scatter`].
    pub fn try_scatter<F>(&self, mut component: F) -> Result<Vec<f32>>
    where
        F: FnMut(&Channel) -> Result<f32>,
    {
        let mut out = vec![0.0; self.arity];
        for channel in &self.channels {
            out[channel.component_index] = component(channel)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::KeyframeCurve;

    fn channel(idx: usize, value: f32) -> Channel {
        Channel::new(
            idx,
            KeyframeCurve::from_pairs(&[(0.0, value)], CurveInterpolation::Linear),
        )
    }

    #[test]
    fn scatter_zero_fills_missing_components() {
        let group =
            ChannelGroup::new(GroupId(0), "location", vec![channel(2, 5.0), channel(0, 1.0)])
                .unwrap();
        assert_eq!(group.arity(), 3);
        let v = group.scatter(|c| c.control_points()[0].value);
        assert_eq!(v, vec![1.0, 0.0, 5.0]);
    }

    #[test]
    fn rejects_out_of_range_and_duplicate_indices() {
        let err = ChannelGroup::new(GroupId(4), "scale", vec![channel(3, 0.0)]).unwrap_err();
        assert!(matches!(err, ExportError::InvalidGroup { group: GroupId(4), .. }));

        let err = ChannelGroup::new(GroupId(5), "location", vec![channel(1, 0.0), channel(1, 2.0)])
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidGroup { group: GroupId(5), .. }));

        let err = ChannelGroup::new(GroupId(6), "custom", vec![channel(4, 0.0)]).unwrap_err();
        assert_eq!(err.group(), Some(GroupId(6)));
    }

    #[test]
    fn representative_mode_comes_from_first_point() {
        let group = ChannelGroup::new(GroupId(0), "value", vec![channel(0, 1.0)]).unwrap();
        assert_eq!(
            group.representative_interpolation(),
            Some(CurveInterpolation::Linear)
        );
        let empty = ChannelGroup::new(GroupId(1), "value", vec![]).unwrap();
        assert_eq!(empty.representative_interpolation(), None);
    }
}
