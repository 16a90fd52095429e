//! Keyframe extraction: fixed-step baking or authored control points.

use tracing::debug;

use crate::config::ExportSettings;
use crate::curve::CurveInterpolation;
use crate::data::ChannelGroup;
use crate::error::{ExportError, Result};
use crate::keyframe::Keyframe;
use crate::tangents::synthesize_tangents;

/// Upper bound on the keyframes one baked group may produce.
pub const MAX_BAKED_KEYFRAMES: usize = 1 << 24;

/// Ordered keyframes for `group`.
///
/// `baked` is the analyzer's verdict; baked keyframes never carry tangents.
pub fn extract_keyframes(
    group: &ChannelGroup,
    settings: &ExportSettings,
    baked: bool,
) -> Result<Vec<Keyframe>> {
    if group.channels().is_empty() {
        return Err(ExportError::missing_data(
            group.id(),
            format!("'{}' has no channels", group.data_path()),
        ));
    }
    if baked {
        bake_keyframes(group, settings)
    } else {
        native_keyframes(group, settings)
    }
}

/// Evaluate every channel at `start, start + step, ...` while the time stays within `end`.
///
/// The time is accumulated by repeated addition of the step.
pub fn bake_keyframes(group: &ChannelGroup, settings: &ExportSettings) -> Result<Vec<Keyframe>> {
    settings.validate()?;
    let (start, end) = group_domain(group)?;
    let step = settings.bake_step();

    let steps = ((end - start) / step).floor();
    if steps >= MAX_BAKED_KEYFRAMES as f64 {
        return Err(ExportError::invalid_domain(
            group.id(),
            format!("baking [{start}, {end}] every {step} exceeds {MAX_BAKED_KEYFRAMES} keyframes"),
        ));
    }
    let mut keyframes = Vec::with_capacity(steps as usize + 1);
    let mut time = start;
    while time <= end {
        let value = group.scatter(|c| c.curve().evaluate(time));
        keyframes.push(Keyframe::new(settings.to_seconds(time), value));
        if keyframes.len() > MAX_BAKED_KEYFRAMES {
            return Err(ExportError::invalid_domain(
                group.id(),
                format!("bake over [{start}, {end}] exceeded {MAX_BAKED_KEYFRAMES} keyframes"),
            ));
        }
        let next = time + step;
        if next <= time {
            return Err(ExportError::invalid_domain(
                group.id(),
                format!("bake step {step} does not advance past {time}"),
            ));
        }
        time = next;
    }

    debug!(
        "bake: {} '{}' sampled {} keyframes over [{start}, {end}]",
        group.id(),
        group.data_path(),
        keyframes.len()
    );
    Ok(keyframes)
}

/// One keyframe per authored control point, read from the first channel's times.
pub fn native_keyframes(group: &ChannelGroup, settings: &ExportSettings) -> Result<Vec<Keyframe>> {
    settings.validate()?;
    let channels = group.channels();
    let times: Vec<f64> = channels[0].control_points().iter().map(|p| p.time).collect();
    if times.is_empty() {
        return Err(ExportError::missing_data(
            group.id(),
            format!("channel {} has no control points", channels[0].component_index),
        ));
    }
    for channel in channels {
        let len = channel.control_points().len();
        if len != times.len() {
            return Err(ExportError::missing_data(
                group.id(),
                format!(
                    "channel {} has {len} control points, expected {}",
                    channel.component_index,
                    times.len()
                ),
            ));
        }
    }
    if let Some(i) = times
        .windows(2)
        .position(|w| !(w[0].is_finite() && w[1] > w[0]))
    {
        return Err(ExportError::invalid_domain(
            group.id(),
            format!(
                "control point times are not strictly increasing at {} -> {}",
                times[i],
                times[i + 1]
            ),
        ));
    }

    let seconds: Vec<f64> = times.iter().map(|&t| settings.to_seconds(t)).collect();
    let cubic = group.representative_interpolation() == Some(CurveInterpolation::Bezier);

    let mut keyframes = Vec::with_capacity(times.len());
    for (i, &time) in seconds.iter().enumerate() {
        let value = group.scatter(|c| c.control_points()[i].value);
        let key = if cubic {
            let tangents = synthesize_tangents(group, &seconds, i)?;
            Keyframe::with_tangents(time, value, tangents.in_tangent, tangents.out_tangent)
        } else {
            Keyframe::new(time, value)
        };
        keyframes.push(key);
    }
    Ok(keyframes)
}

/// `(min start, max end)` over the domains of every channel that has control points.
fn group_domain(group: &ChannelGroup) -> Result<(f64, f64)> {
    let (start, end) = group
        .channels()
        .iter()
        .filter(|c| !c.control_points().is_empty())
        .map(|c| c.curve().domain())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (s, e)| {
            (lo.min(s), hi.max(e))
        });
    if start == f64::INFINITY && end == f64::NEG_INFINITY {
        return Err(ExportError::missing_data(
            group.id(),
            format!("no channel of '{}' has control points", group.data_path()),
        ));
    }
    if !start.is_finite() || !end.is_finite() || end < start {
        return Err(ExportError::invalid_domain(
            group.id(),
            format!("curve domain [{start}, {end}] is not a finite range"),
        ));
    }
    if end == start {
        return Err(ExportError::missing_data(
            group.id(),
            format!("curve domain [{start}, {end}] has zero length"),
        ));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::KeyframeCurve;
    use crate::data::Channel;
    use crate::ids::GroupId;

    fn linear(pairs: &[(f64, f32)]) -> KeyframeCurve {
        KeyframeCurve::from_pairs(pairs, CurveInterpolation::Linear)
    }

    #[test]
    fn bake_spans_the_union_of_channel_domains() {
        let group = ChannelGroup::new(
            GroupId(0),
            "location",
            vec![
                Channel::new(0, linear(&[(0.0, 0.0), (1.0, 1.0)])),
                Channel::new(2, linear(&[(1.0, 5.0), (2.0, 7.0)])),
            ],
        )
        .unwrap();
        let keys = bake_keyframes(&group, &ExportSettings::new(1.0)).unwrap();
        let times: Vec<f64> = keys.iter().map(|k| k.time()).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
        // Channel 2 holds its first value before its own domain starts.
        assert_eq!(keys[0].value(), &[0.0, 0.0, 5.0]);
        assert_eq!(keys[2].value(), &[1.0, 0.0, 7.0]);
        assert!(keys.iter().all(|k| !k.has_tangents()));
    }

    #[test]
    fn bake_scales_source_units_to_seconds() {
        let group = ChannelGroup::new(
            GroupId(0),
            "value",
            vec![Channel::new(0, linear(&[(0.0, 0.0), (24.0, 1.0)]))],
        )
        .unwrap();
        let settings = ExportSettings::new(0.5).with_source_units_per_second(24.0);
        let keys = bake_keyframes(&group, &settings).unwrap();
        // Steps of 2 source units, 13 samples from 0 to 24 inclusive.
        assert_eq!(keys.len(), 13);
        assert_eq!(keys.last().unwrap().time(), 1.0);
    }

    #[test]
    fn bake_accumulates_inexact_steps() {
        let group = ChannelGroup::new(
            GroupId(0),
            "value",
            vec![Channel::new(0, linear(&[(0.0, 0.0), (1.0, 1.0)]))],
        )
        .unwrap();
        let keys = bake_keyframes(&group, &ExportSettings::new(10.0)).unwrap();
        // Ten additions of 0.1 land just below 1.0; `start + k * step` would give 1.0.
        assert_eq!(keys.len(), 11);
        assert_eq!(keys[3].time(), 0.30000000000000004);
        assert_eq!(keys.last().unwrap().time(), 0.9999999999999999);
    }

    #[test]
    fn oversized_bake_is_an_invalid_domain() {
        let group = ChannelGroup::new(
            GroupId(7),
            "value",
            vec![Channel::new(0, linear(&[(0.0, 0.0), (1.0, 1.0)]))],
        )
        .unwrap();
        let settings = ExportSettings::new(1e300).with_force_sampling(true);
        let err = extract_keyframes(&group, &settings, true).unwrap_err();
        assert!(matches!(err, ExportError::InvalidDomain { group: GroupId(7), .. }));
    }

    #[test]
    fn zero_length_domain_is_missing_data() {
        let group = ChannelGroup::new(
            GroupId(3),
            "value",
            vec![Channel::new(0, linear(&[(2.0, 1.0)]))],
        )
        .unwrap();
        let err = extract_keyframes(&group, &ExportSettings::default(), true).unwrap_err();
        assert!(matches!(err, ExportError::MissingData { group: GroupId(3), .. }));
    }

    #[test]
    fn native_path_requires_control_points_and_order() {
        let empty = ChannelGroup::new(
            GroupId(1),
            "value",
            vec![Channel::new(0, KeyframeCurve::default())],
        )
        .unwrap();
        let err = extract_keyframes(&empty, &ExportSettings::default(), false).unwrap_err();
        assert!(matches!(err, ExportError::MissingData { .. }));

        let unordered = ChannelGroup::new(
            GroupId(2),
            "value",
            vec![Channel::new(0, linear(&[(1.0, 0.0), (0.5, 1.0)]))],
        )
        .unwrap();
        let err = extract_keyframes(&unordered, &ExportSettings::default(), false).unwrap_err();
        assert!(matches!(err, ExportError::InvalidDomain { .. }));
    }

    #[test]
    fn empty_curves_do_not_widen_the_bake_domain() {
        let group = ChannelGroup::new(
            GroupId(0),
            "location",
            vec![
                Channel::new(0, KeyframeCurve::default()),
                Channel::new(1, linear(&[(2.0, 1.0), (3.0, 2.0)])),
            ],
        )
        .unwrap();
        let keys = extract_keyframes(&group, &ExportSettings::new(1.0), true).unwrap();
        let times: Vec<f64> = keys.iter().map(|k| k.time()).collect();
        assert_eq!(times, vec![2.0, 3.0]);

        let hollow = ChannelGroup::new(
            GroupId(1),
            "value",
            vec![Channel::new(0, KeyframeCurve::default())],
        )
        .unwrap();
        let err = extract_keyframes(&hollow, &ExportSettings::default(), true).unwrap_err();
        assert!(matches!(err, ExportError::MissingData { .. }));
    }

    #[test]
    fn no_channels_is_missing_data_on_both_paths() {
        let group = ChannelGroup::new(GroupId(8), "scale", vec![]).unwrap();
        for baked in [true, false] {
            let err = extract_keyframes(&group, &ExportSettings::default(), baked).unwrap_err();
            assert_eq!(err.group(), Some(GroupId(8)));
            assert!(matches!(err, ExportError::MissingData { .. }));
        }
    }
}
