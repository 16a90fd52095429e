//! Hermite tangents for cubic spline samplers, derived from Bezier handles.
//!
//! A Bezier segment whose handles sit on the segment thirds is the Hermite segment
//! with tangents `3 (handle - value) / dt`. The first in-tangent and the last
//! out-tangent are clamped to zero.

use crate::curve::ControlPoint;
use crate::data::ChannelGroup;
use crate::error::{ExportError, Result};

/// In/out tangents of one keyframe, each of the group's arity.
#[derive(Clone, Debug, PartialEq)]
pub struct Tangents {
    pub in_tangent: Vec<f32>,
    pub out_tangent: Vec<f32>,
}

/// Tangents at keyframe `index`, given every keyframe time in seconds.
///
/// Channels must hold a control point at `index`; components no channel drives
/// stay zero.
pub fn synthesize_tangents(group: &ChannelGroup, times: &[f64], index: usize) -> Result<Tangents> {
    let n = times.len();
    if index >= n {
        return Err(ExportError::missing_data(
            group.id(),
            format!("no keyframe {index} among {n}"),
        ));
    }

    let in_tangent = if index == 0 {
        vec![0.0; group.arity()]
    } else {
        let dt = time_delta(group, times, index - 1)?;
        group.try_scatter(|channel| {
            let p = point_at(group, channel.control_points(), channel.component_index, index)?;
            Ok((3.0 * (p.value as f64 - p.left_handle.value as f64) / dt) as f32)
        })?
    };

    let out_tangent = if index + 1 == n {
        vec![0.0; group.arity()]
    } else {
        let dt = time_delta(group, times, index)?;
        group.try_scatter(|channel| {
            let p = point_at(group, channel.control_points(), channel.component_index, index)?;
            Ok((3.0 * (p.right_handle.value as f64 - p.value as f64) / dt) as f32)
        })?
    };

    Ok(Tangents {
        in_tangent,
        out_tangent,
    })
}

/// `times[i + 1] - times[i]`, which must be positive and finite.
fn time_delta(group: &ChannelGroup, times: &[f64], i: usize) -> Result<f64> {
    let dt = times[i + 1] - times[i];
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(ExportError::invalid_domain(
            group.id(),
            format!(
                "keyframes {i} and {} are not strictly increasing ({} -> {})",
                i + 1,
                times[i],
                times[i + 1]
            ),
        ))
    }
}

fn point_at<'a>(
    group: &ChannelGroup,
    points: &'a [ControlPoint],
    component: usize,
    index: usize,
) -> Result<&'a ControlPoint> {
    points.get(index).ok_or_else(|| {
        ExportError::missing_data(
            group.id(),
            format!("channel {component} has no control point {index}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CurveInterpolation, Handle, KeyframeCurve};
    use crate::data::Channel;
    use crate::ids::GroupId;

    fn bezier(time: f64, value: f32, left: f32, right: f32) -> ControlPoint {
        ControlPoint::new(time, value, CurveInterpolation::Bezier).with_handles(
            Handle { time: time - 1.0, value: left },
            Handle { time: time + 1.0, value: right },
        )
    }

    #[test]
    fn interior_tangents_scale_handle_offsets() {
        let curve = KeyframeCurve::new(vec![
            bezier(0.0, 0.0, -1.0, 1.0),
            bezier(2.0, 4.0, 3.0, 6.0),
            bezier(3.0, 5.0, 5.0, 5.0),
        ]);
        let group = ChannelGroup::new(GroupId(0), "value", vec![Channel::new(0, curve)]).unwrap();
        let times = [0.0, 2.0, 3.0];

        let t = synthesize_tangents(&group, &times, 1).unwrap();
        // in: 3 * (4 - 3) / 2, out: 3 * (6 - 4) / 1
        assert_eq!(t.in_tangent, vec![1.5]);
        assert_eq!(t.out_tangent, vec![6.0]);
    }

    #[test]
    fn zero_delta_is_an_invalid_domain() {
        let curve =
            KeyframeCurve::new(vec![bezier(1.0, 0.0, 0.0, 1.0), bezier(1.0, 1.0, 0.0, 1.0)]);
        let group = ChannelGroup::new(GroupId(9), "value", vec![Channel::new(0, curve)]).unwrap();
        let err = synthesize_tangents(&group, &[1.0, 1.0], 0).unwrap_err();
        assert!(matches!(err, ExportError::InvalidDomain { group: GroupId(9), .. }));
    }
}
