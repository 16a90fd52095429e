//! Decide whether a channel group can be exported as authored keyframes.

use crate::data::ChannelGroup;

/// Why a group has to be densely resampled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BakeReason {
    /// The export settings force sampling.
    ForcedSampling,
    /// The representative mode is not constant, linear or Bezier (or there is none).
    UnsupportedInterpolation,
    /// Control points within the group use different modes.
    MixedInterpolation,
    /// Channels do not share the same control-point times.
    MisalignedKeyframes,
}

/// First rule that forces baking, or `None` when the authored keyframes can be used.
pub fn bake_reason(group: &ChannelGroup, force_sampling: bool) -> Option<BakeReason> {
    if force_sampling {
        return Some(BakeReason::ForcedSampling);
    }

    let representative = match group.representative_interpolation() {
        Some(mode) if mode.is_native() => mode,
        _ => return Some(BakeReason::UnsupportedInterpolation),
    };

    let mixed = group.channels().iter().any(|c| {
        c.control_points()
            .iter()
            .any(|p| p.interpolation != representative)
    });
    if mixed {
        return Some(BakeReason::MixedInterpolation);
    }

    // Equality with the first channel is enough: equal sequences are transitive.
    let reference = group.channels()[0].control_points();
    let misaligned = group.channels()[1..].iter().any(|c| {
        !c.control_points()
            .iter()
            .map(|p| p.time)
            .eq(reference.iter().map(|p| p.time))
    });
    if misaligned {
        return Some(BakeReason::MisalignedKeyframes);
    }

    None
}

/// Must this group be densely resampled?
#[inline]
pub fn needs_baking(group: &ChannelGroup, force_sampling: bool) -> bool {
    bake_reason(group, force_sampling).is_some()
}
