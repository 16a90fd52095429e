//! Output keyframes and the sampler they form.

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::ids::GroupId;

/// One time sample of an exported sampler.
///
/// Fully specified at construction; tangents are either both present (cubic
/// samplers) or both absent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Keyframe {
    time: f64,
    value: Vec<f32>,
    in_tangent: Option<Vec<f32>>,
    out_tangent: Option<Vec<f32>>,
}

impl Keyframe {
    /// Keyframe without tangents (linear and step samplers).
    pub fn new(time: f64, value: Vec<f32>) -> Self {
        Self {
            time,
            value,
            in_tangent: None,
            out_tangent: None,
        }
    }

    /// Keyframe for a cubic spline sampler.
    pub fn with_tangents(
        time: f64,
        value: Vec<f32>,
        in_tangent: Vec<f32>,
        out_tangent: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(value.len(), in_tangent.len());
        debug_assert_eq!(value.len(), out_tangent.len());
        Self {
            time,
            value,
            in_tangent: Some(in_tangent),
            out_tangent: Some(out_tangent),
        }
    }

    /// Time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn value(&self) -> &[f32] {
        &self.value
    }

    #[inline]
    pub fn in_tangent(&self) -> Option<&[f32]> {
        self.in_tangent.as_deref()
    }

    #[inline]
    pub fn out_tangent(&self) -> Option<&[f32]> {
        self.out_tangent.as_deref()
    }

    #[inline]
    pub fn has_tangents(&self) -> bool {
        self.in_tangent.is_some() && self.out_tangent.is_some()
    }

    /// Number of scalars this keyframe contributes to the value array.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.value.len()
            + self.in_tangent.as_ref().map_or(0, Vec::len)
            + self.out_tangent.as_ref().map_or(0, Vec::len)
    }

    /// Apply `f` to the value and to each tangent, keeping the time.
    pub fn map_vectors<F>(&self, f: F) -> Keyframe
    where
        F: Fn(&[f32]) -> Vec<f32>,
    {
        Keyframe {
            time: self.time,
            value: f(&self.value),
            in_tangent: self.in_tangent.as_deref().map(&f),
            out_tangent: self.out_tangent.as_deref().map(&f),
        }
    }

    /// Append `[in_tangent?, value, out_tangent?]` to `out`.
    pub(crate) fn flatten_into(&self, out: &mut Vec<f32>) {
        if let Some(in_tangent) = &self.in_tangent {
            out.extend_from_slice(in_tangent);
        }
        out.extend_from_slice(&self.value);
        if let Some(out_tangent) = &self.out_tangent {
            out.extend_from_slice(out_tangent);
        }
    }
}

/// Interpolation tag of an exported sampler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplerInterpolation {
    #[serde(rename = "LINEAR")]
    Linear,
    #[serde(rename = "STEP")]
    Step,
    #[serde(rename = "CUBICSPLINE")]
    CubicSpline,
}

impl SamplerInterpolation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "LINEAR",
            Self::Step => "STEP",
            Self::CubicSpline => "CUBICSPLINE",
        }
    }
}

/// Ordered keyframes plus one interpolation tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Sampler {
    keyframes: Vec<Keyframe>,
    interpolation: SamplerInterpolation,
}

impl Sampler {
    /// Validate keyframes for `group`: non-empty, strictly increasing times,
    /// constant value length, tangents exactly when cubic.
    pub fn new(
        group: GroupId,
        keyframes: Vec<Keyframe>,
        interpolation: SamplerInterpolation,
    ) -> Result<Self> {
        let Some(first) = keyframes.first() else {
            return Err(ExportError::missing_data(group, "sampler has no keyframes"));
        };
        let value_len = first.value.len();
        let cubic = interpolation == SamplerInterpolation::CubicSpline;

        // Checked on the emitted f32 times; distinct f64 times may collapse.
        let mut last = f32::NEG_INFINITY;
        for (i, key) in keyframes.iter().enumerate() {
            let time = key.time as f32;
            if !key.time.is_finite() || !time.is_finite() || time <= last {
                return Err(ExportError::invalid_domain(
                    group,
                    format!(
                        "keyframe {i} at {} does not follow {last} as a 32-bit time",
                        key.time
                    ),
                ));
            }
            last = time;
            if key.value.len() != value_len {
                return Err(ExportError::invalid_group(
                    group,
                    format!(
                        "keyframe {i} has {} components, expected {value_len}",
                        key.value.len()
                    ),
                ));
            }
            if key.has_tangents() != cubic
                || key.in_tangent.is_some() != key.out_tangent.is_some()
            {
                return Err(ExportError::missing_data(
                    group,
                    format!(
                        "keyframe {i} tangents do not match {} interpolation",
                        interpolation.as_str()
                    ),
                ));
            }
        }

        Ok(Self {
            keyframes,
            interpolation,
        })
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn interpolation(&self) -> SamplerInterpolation {
        self.interpolation
    }

    /// Components per keyframe value (tangents excluded).
    #[inline]
    pub fn value_arity(&self) -> usize {
        self.keyframes[0].value.len()
    }

    pub fn times(&self) -> Vec<f32> {
        self.keyframes.iter().map(|k| k.time as f32).collect()
    }

    /// Flattened value array with tangents interleaved around each value.
    pub fn values(&self) -> Vec<f32> {
        let block = self.keyframes[0].block_len();
        let mut out = Vec::with_capacity(block * self.keyframes.len());
        for key in &self.keyframes {
            key.flatten_into(&mut out);
        }
        out
    }
}
