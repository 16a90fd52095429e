//! Sampler assembly: flatten keyframes into input/output accessors.
//!
//! Output layout per keyframe is `[in_tangent?, value, out_tangent?]`, the glTF
//! convention for cubic spline samplers. The output accessor type follows the
//! value arity, so a cubic sampler reports three elements per keyframe.

use serde::Serialize;
use tracing::debug;

use crate::curve::CurveInterpolation;
use crate::data::ChannelGroup;
use crate::encode::{BufferEncoder, ComponentType, DataType};
use crate::error::{ExportError, Result};
use crate::ids::GroupId;
use crate::keyframe::{Keyframe, Sampler, SamplerInterpolation};

/// Accessor metadata for one encoded array.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor<H> {
    pub buffer_view: H,
    pub component_type: ComponentType,
    pub count: usize,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f32>>,
}

/// Exported sampler: time accessor, value accessor and interpolation tag.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimationSampler<H> {
    pub input: Accessor<H>,
    pub output: Accessor<H>,
    pub interpolation: SamplerInterpolation,
}

/// Output interpolation for a group.
///
/// Baked groups are always STEP. Unsupported modes only reach here through the
/// bake path; should one arrive unbaked it also falls back to STEP.
pub fn resolve_interpolation(group: &ChannelGroup, baked: bool) -> SamplerInterpolation {
    if baked {
        return SamplerInterpolation::Step;
    }
    match group.representative_interpolation() {
        Some(CurveInterpolation::Bezier) => SamplerInterpolation::CubicSpline,
        Some(CurveInterpolation::Linear) => SamplerInterpolation::Linear,
        Some(CurveInterpolation::Constant) | Some(CurveInterpolation::Other) | None => {
            SamplerInterpolation::Step
        }
    }
}

/// Validate, flatten and encode keyframes for `group`.
pub fn assemble_sampler<E>(
    group: GroupId,
    keyframes: &[Keyframe],
    interpolation: SamplerInterpolation,
    encoder: &mut E,
) -> Result<AnimationSampler<E::Handle>>
where
    E: BufferEncoder + ?Sized,
{
    let sampler = Sampler::new(group, keyframes.to_vec(), interpolation)?;

    let times = sampler.times();
    let (min, max) = times
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &t| {
            (lo.min(t), hi.max(t))
        });
    let input = Accessor {
        buffer_view: encoder.encode(&times, ComponentType::Float),
        component_type: ComponentType::Float,
        count: times.len(),
        data_type: DataType::Scalar,
        min: Some(vec![min]),
        max: Some(vec![max]),
    };

    let arity = sampler.value_arity();
    let data_type = DataType::from_arity(arity).ok_or_else(|| {
        ExportError::invalid_group(group, format!("no accessor type holds {arity} components"))
    })?;
    let values = sampler.values();
    let output = Accessor {
        buffer_view: encoder.encode(&values, ComponentType::Float),
        component_type: ComponentType::Float,
        count: values.len() / data_type.num_components(),
        data_type,
        min: None,
        max: None,
    };

    debug!(
        "assemble: {group} {} sampler with {} keyframes, {} output elements",
        interpolation.as_str(),
        input.count,
        output.count
    );

    Ok(AnimationSampler {
        input,
        output,
        interpolation,
    })
}

/// Export an assembled sampler as glTF-shaped JSON.
pub fn export_sampler_json<H: Serialize>(sampler: &AnimationSampler<H>) -> serde_json::Value {
    serde_json::to_value(sampler).unwrap_or(serde_json::Value::Null)
}
