//! Scalar animation curves as the authoring tool exposes them.
//!
//! Model:
//! - A curve is an ordered list of control points in source time units.
//! - Each control point carries Bezier handles (time, value) on both sides and the
//!   interpolation mode of the segment that starts at it.
//! - [`AnimationCurve`] is the narrow interface the exporter needs; any curve source
//!   that can report its domain, evaluate itself and list its control points can be
//!   exported. [`KeyframeCurve`] is the reference implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-control-point interpolation mode of the authoring tool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurveInterpolation {
    Constant,
    Linear,
    Bezier,
    /// Easing presets and anything else a sampler cannot express natively.
    Other,
}

impl CurveInterpolation {
    /// Map an authoring tool mode name; unknown names become [`CurveInterpolation::Other`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "CONSTANT" => Self::Constant,
            "LINEAR" => Self::Linear,
            "BEZIER" => Self::Bezier,
            _ => Self::Other,
        }
    }

    /// Whether a group using only this mode can be exported without baking.
    #[inline]
    pub fn is_native(self) -> bool {
        matches!(self, Self::Constant | Self::Linear | Self::Bezier)
    }
}

/// One side of a Bezier control handle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    pub time: f64,
    pub value: f32,
}

/// A single authored keyframe of a scalar curve.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub time: f64,
    pub value: f32,
    pub left_handle: Handle,
    pub right_handle: Handle,
    pub interpolation: CurveInterpolation,
}

impl ControlPoint {
    /// Control point with both handles collapsed onto the point itself.
    pub fn new(time: f64, value: f32, interpolation: CurveInterpolation) -> Self {
        let flat = Handle { time, value };
        Self {
            time,
            value,
            left_handle: flat,
            right_handle: flat,
            interpolation,
        }
    }

    pub fn with_handles(mut self, left: Handle, right: Handle) -> Self {
        self.left_handle = left;
        self.right_handle = right;
        self
    }
}

/// Evaluable scalar curve over a finite domain.
pub trait AnimationCurve: fmt::Debug {
    /// `(start, end)` in source time units.
    fn domain(&self) -> (f64, f64);
    fn evaluate(&self, time: f64) -> f32;
    /// Control points ordered by time.
    fn control_points(&self) -> &[ControlPoint];
}

/// Curve backed by its control points.
///
/// Outside its domain the curve holds the first/last value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframeCurve {
    points: Vec<ControlPoint>,
}

impl KeyframeCurve {
    pub fn new(points: Vec<ControlPoint>) -> Self {
        Self { points }
    }

    /// Convenience constructor for curves where every point shares one mode.
    pub fn from_pairs(pairs: &[(f64, f32)], interpolation: CurveInterpolation) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(t, v)| ControlPoint::new(t, v, interpolation))
                .collect(),
        )
    }
}

impl AnimationCurve for KeyframeCurve {
    fn domain(&self) -> (f64, f64) {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first.time, last.time),
            _ => (0.0, 0.0),
        }
    }

    fn evaluate(&self, time: f64) -> f32 {
        let points = &self.points;
        let n = points.len();
        match n {
            0 => 0.0,
            1 => points[0].value,
            _ => {
                if time <= points[0].time {
                    return points[0].value;
                }
                if time >= points[n - 1].time {
                    return points[n - 1].value;
                }
                // First point strictly after `time`; the segment starts one before it.
                let right = points.partition_point(|p| p.time <= time);
                let left = &points[right - 1];
                let right = &points[right];
                evaluate_segment(left, right, time)
            }
        }
    }

    fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }
}

fn evaluate_segment(left: &ControlPoint, right: &ControlPoint, time: f64) -> f32 {
    let span = right.time - left.time;
    if span <= 0.0 {
        return right.value;
    }
    let x = ((time - left.time) / span).clamp(0.0, 1.0);
    match left.interpolation {
        CurveInterpolation::Constant => left.value,
        CurveInterpolation::Linear | CurveInterpolation::Other => {
            lerp(left.value as f64, right.value as f64, x) as f32
        }
        CurveInterpolation::Bezier => {
            // Handle times are clamped into the segment so x(u) stays monotonic.
            let x1 = ((left.right_handle.time - left.time) / span).clamp(0.0, 1.0);
            let x2 = ((right.left_handle.time - left.time) / span).clamp(0.0, 1.0);
            let u = invert_bezier_x(x, x1, x2);
            cubic_bezier(
                left.value as f64,
                left.right_handle.value as f64,
                right.left_handle.value as f64,
                right.value as f64,
                u,
            ) as f32
        }
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Find the Bezier parameter whose time coordinate is `x` by bisection.
#[inline]
fn invert_bezier_x(x: f64, x1: f64, x2: f64) -> f64 {
    // Handles on the segment thirds make x(u) the identity.
    if (x1 - 1.0 / 3.0).abs() < 1e-12 && (x2 - 2.0 / 3.0).abs() < 1e-12 {
        return x;
    }
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut mid = x;
    for _ in 0..48 {
        let bx = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (bx - x).abs() < 1e-12 {
            break;
        }
        if bx < x {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    mid
}
