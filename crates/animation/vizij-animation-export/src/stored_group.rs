use serde::Deserialize;
use tracing::warn;

use crate::curve::{ControlPoint, CurveInterpolation, Handle, KeyframeCurve};
use crate::data::{Channel, ChannelGroup};
use crate::error::Result;
use crate::ids::GroupId;

/// Public API: parse an authoring-tool channel group (F-curve layout) into a [`ChannelGroup`].
///
/// Notes:
/// - Control point coordinates are `[time, value]` pairs in source time units.
/// - Missing handles collapse onto the control point (flat tangents).
/// - A missing interpolation defaults to BEZIER; unknown names are kept as
///   [`CurveInterpolation::Other`] so the group is baked.
pub fn parse_channel_group_json(s: &str) -> Result<ChannelGroup> {
    let raw: StoredChannelGroup = serde_json::from_str(s)?;
    let group = GroupId(raw.id);

    let mut channels = Vec::with_capacity(raw.channels.len());
    for rc in raw.channels {
        let mut points = Vec::with_capacity(rc.keyframes.len());
        for rk in rc.keyframes {
            let interpolation = match rk.interpolation.as_deref() {
                None => CurveInterpolation::Bezier,
                Some(name) => {
                    let mode = CurveInterpolation::from_name(name);
                    if mode == CurveInterpolation::Other {
                        warn!(
                            "stored group: {group} '{}' uses unsupported interpolation {name}; \
                             it will be baked",
                            raw.data_path
                        );
                    }
                    mode
                }
            };
            let flat = rk.co;
            let [time, value] = flat;
            let left = rk.handle_left.unwrap_or(flat);
            let right = rk.handle_right.unwrap_or(flat);
            points.push(
                ControlPoint::new(time, value as f32, interpolation)
                    .with_handles(to_handle(left), to_handle(right)),
            );
        }
        channels.push(Channel::new(rc.array_index, KeyframeCurve::new(points)));
    }

    ChannelGroup::new(group, raw.data_path, channels)
}

fn to_handle([time, value]: [f64; 2]) -> Handle {
    Handle {
        time,
        value: value as f32,
    }
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredChannelGroup {
    pub id: u32,
    pub data_path: String,
    pub channels: Vec<StoredChannel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredChannel {
    #[serde(default)]
    pub array_index: usize,
    pub keyframes: Vec<StoredKeyframe>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredKeyframe {
    pub co: [f64; 2],
    #[serde(default)]
    pub handle_left: Option<[f64; 2]>,
    #[serde(default)]
    pub handle_right: Option<[f64; 2]>,
    #[serde(default)]
    pub interpolation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::property::TargetProperty;

    #[test]
    fn parses_channels_and_handles() {
        let json = r#"{
            "id": 5,
            "dataPath": "pose.bones[\"arm\"].location",
            "channels": [
                { "arrayIndex": 1, "keyframes": [
                    { "co": [0, 1], "handleLeft": [-1, 0], "handleRight": [1, 2],
                      "interpolation": "BEZIER" },
                    { "co": [3, 4] }
                ]}
            ]
        }"#;
        let group = parse_channel_group_json(json).unwrap();
        assert_eq!(group.id(), GroupId(5));
        assert_eq!(group.property(), &TargetProperty::Location);
        assert_eq!(group.arity(), 3);

        let points = group.channels()[0].control_points();
        assert_eq!(points[0].right_handle, Handle { time: 1.0, value: 2.0 });
        assert_eq!(points[1].left_handle, Handle { time: 3.0, value: 4.0 });
        assert_eq!(points[1].interpolation, CurveInterpolation::Bezier);
    }

    #[test]
    fn unknown_modes_become_other() {
        let json = r#"{ "id": 0, "dataPath": "value", "channels": [
            { "keyframes": [ { "co": [0, 0], "interpolation": "ELASTIC" } ] }
        ]}"#;
        let group = parse_channel_group_json(json).unwrap();
        assert_eq!(
            group.representative_interpolation(),
            Some(CurveInterpolation::Other)
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_channel_group_json(r#"{ "id": 0 }"#).unwrap_err();
        assert!(matches!(err, ExportError::Parse { .. }));
    }
}
