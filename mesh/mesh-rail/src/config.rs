//! Rail building configuration.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::RailResult;
use crate::nodes::validate_offset;
use crate::orientation::DegeneratePolicy;

/// Configuration for building and editing rails.
///
/// # Example
///
/// ```
/// use mesh_rail::{DegeneratePolicy, RailConfig};
/// use nalgebra::Vector3;
///
/// let config = RailConfig::default()
///     .with_append_offset(Vector3::new(0.0, 0.0, 2.0))
///     .with_degenerate_policy(DegeneratePolicy::ReusePrevious);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RailConfig {
    /// Offset from the last node at which appended nodes are placed.
    pub append_offset: Vector3<f64>,
    /// How coincident adjacent nodes are handled when building.
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            append_offset: Vector3::new(1.0, 1.0, 1.0),
            degenerate_policy: DegeneratePolicy::Reject,
        }
    }
}

impl RailConfig {
    /// Set the append offset.
    #[must_use]
    pub fn with_append_offset(mut self, offset: Vector3<f64>) -> Self {
        self.append_offset = offset;
        self
    }

    /// Set the degenerate segment policy.
    #[must_use]
    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`RailError::InvalidAppendOffset`](crate::RailError::InvalidAppendOffset)
    /// for a zero or non-finite append offset.
    pub fn validate(&self) -> RailResult<()> {
        validate_offset(&self.append_offset)
    }
}
