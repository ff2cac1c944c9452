//! Error types for rail mesh operations.

use thiserror::Error;

/// Result type for rail mesh operations.
pub type RailResult<T> = Result<T, RailError>;

/// Errors that can occur while editing a rail or building its mesh.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RailError {
    /// The node sequence holds too few nodes to define a rail.
    #[error("rail needs at least {min} nodes, got {actual}")]
    InvalidNodeCount {
        /// Minimum required nodes.
        min: usize,
        /// Actual node count.
        actual: usize,
    },

    /// Two adjacent nodes coincide, so the segment between them has no direction.
    #[error("degenerate rail segment between nodes {index} and {}", .index + 1)]
    DegenerateSegment {
        /// Index of the segment (its first node).
        index: usize,
    },

    /// A node index does not address an existing node.
    #[error("node index {index} out of range for {len} nodes")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of nodes in the sequence.
        len: usize,
    },

    /// A node has a NaN or infinite coordinate.
    #[error("node {index} has a non-finite coordinate")]
    NonFiniteNode {
        /// Index of the offending node.
        index: usize,
    },

    /// Two adjacent nodes are so far apart that their difference overflows `f64`.
    #[error("rail segment between nodes {index} and {} is too long to represent", .index + 1)]
    SegmentOverflow {
        /// Index of the segment (its first node).
        index: usize,
    },

    /// The rail has more nodes than 32-bit mesh indices can address.
    #[error("rail has {actual} nodes, mesh indices support at most {max}")]
    TooManyNodes {
        /// Maximum supported nodes.
        max: usize,
        /// Actual node count.
        actual: usize,
    },

    /// The append offset is zero or non-finite.
    #[error("append offset must be finite and non-zero")]
    InvalidAppendOffset,
}

impl RailError {
    /// Create an invalid node count error against the two-node minimum.
    #[must_use]
    pub const fn too_few_nodes(actual: usize) -> Self {
        Self::InvalidNodeCount {
            min: crate::nodes::MIN_NODES,
            actual,
        }
    }

    /// Check if this is an invalid node count error.
    #[must_use]
    pub const fn is_invalid_node_count(&self) -> bool {
        matches!(self, Self::InvalidNodeCount { .. })
    }

    /// Check if this is a degenerate segment error.
    #[must_use]
    pub const fn is_degenerate_segment(&self) -> bool {
        matches!(self, Self::DegenerateSegment { .. })
    }

    /// Check if this is an index out of range error.
    #[must_use]
    pub const fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}
