//! Vizij Animation Export (engine-agnostic)
//!
//! Turns groups of scalar animation curves into glTF-style animation samplers:
//! a time array, a flattened value array and an interpolation tag.
//!
//! Pipeline per channel group:
//! - analyze: decide whether the group needs dense resampling ("baking")
//! - extract: bake at a fixed step, or read authored control points (with Hermite
//!   tangents for Bezier groups)
//! - remap: convert values into the output coordinate convention
//! - assemble: flatten and hand the arrays to a [`BufferEncoder`]
//!
//! [`ExportSession`] ties the steps together and memoizes results per group for
//! the lifetime of one export run.

pub mod analyze;
pub mod assemble;
pub mod cache;
pub mod config;
pub mod curve;
pub mod data;
pub mod encode;
pub mod error;
pub mod extract;
pub mod ids;
pub mod keyframe;
pub mod property;
pub mod remap;
pub mod session;
pub mod stored_group;
pub mod tangents;

// Re-exports for consumers (scene traversal and file writers)
pub use analyze::{bake_reason, needs_baking, BakeReason};
pub use assemble::{
    assemble_sampler, export_sampler_json, resolve_interpolation, Accessor, AnimationSampler,
};
pub use cache::{CacheKey, SamplerCache};
pub use config::ExportSettings;
pub use curve::{AnimationCurve, ControlPoint, CurveInterpolation, Handle, KeyframeCurve};
pub use data::{Channel, ChannelGroup};
pub use encode::{BufferEncoder, BufferViewHandle, ComponentType, DataType, InMemoryEncoder};
pub use error::{ExportError, Result};
pub use extract::{bake_keyframes, extract_keyframes, native_keyframes, MAX_BAKED_KEYFRAMES};
pub use ids::{GroupId, SessionId};
pub use keyframe::{Keyframe, Sampler, SamplerInterpolation};
pub use property::{TargetProperty, MAX_ARITY};
pub use remap::{
    remap_keyframes, remap_vector, CoordinateRemap, IdentityRemap, Matrix4, StandardRemap,
};
pub use session::ExportSession;
pub use stored_group::parse_channel_group_json;
pub use tangents::{synthesize_tangents, Tangents};
