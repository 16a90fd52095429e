//! Error types for sampler export.

use serde::{Deserialize, Serialize};

use crate::ids::GroupId;

/// Export result type.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Failures that abort the export of a channel group.
///
/// Every group-scoped variant names the originating group so the caller can
/// report which part of the asset could not be exported. Unsupported
/// interpolation modes are not errors: those groups are baked instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ExportError {
    /// A group has no channels, or a channel has no control points where they are required.
    #[error("Missing animation data in {group}: {reason}")]
    MissingData { group: GroupId, reason: String },

    /// Non-monotonic, degenerate or non-finite time data.
    #[error("Invalid time domain in {group}: {reason}")]
    InvalidDomain { group: GroupId, reason: String },

    /// Channel component indices that do not fit the target property.
    #[error("Invalid channel group {group}: {reason}")]
    InvalidGroup { group: GroupId, reason: String },

    /// Export settings that cannot drive sampling.
    #[error("Invalid export settings: {reason}")]
    InvalidSettings { reason: String },

    /// Malformed channel group JSON.
    #[error("Parse error: {reason}")]
    Parse { reason: String },
}

impl ExportError {
    pub fn missing_data(group: GroupId, reason: impl Into<String>) -> Self {
        Self::MissingData {
            group,
            reason: reason.into(),
        }
    }

    pub fn invalid_domain(group: GroupId, reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            group,
            reason: reason.into(),
        }
    }

    pub fn invalid_group(group: GroupId, reason: impl Into<String>) -> Self {
        Self::InvalidGroup {
            group,
            reason: reason.into(),
        }
    }

    /// The group this error originated from, if it is group-scoped.
    #[inline]
    pub fn group(&self) -> Option<GroupId> {
        match self {
            Self::MissingData { group, .. }
            | Self::InvalidDomain { group, .. }
            | Self::InvalidGroup { group, .. } => Some(*group),
            Self::InvalidSettings { .. } | Self::Parse { .. } => None,
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingData { .. } => "data",
            Self::InvalidDomain { .. } | Self::InvalidGroup { .. } => "validation",
            Self::InvalidSettings { .. } => "settings",
            Self::Parse { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_scoped_errors_name_their_group() {
        let err = ExportError::missing_data(GroupId(3), "no channels");
        assert_eq!(err.group(), Some(GroupId(3)));
        assert_eq!(err.to_string(), "Missing animation data in group #3: no channels");

        let settings = ExportError::InvalidSettings {
            reason: "frame rate".into(),
        };
        assert_eq!(settings.group(), None);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ExportError::missing_data(GroupId(0), "x").category(), "data");
        assert_eq!(
            ExportError::invalid_domain(GroupId(0), "x").category(),
            "validation"
        );
        let parse: ExportError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(parse.category(), "serialization");
    }

    #[test]
    fn test_serialization() {
        let error = ExportError::invalid_domain(GroupId(1), "duplicate time 2");
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: ExportError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
