//! The ordered control points of a rail.
//!
//! A [`NodeSequence`] always holds at least [`MIN_NODES`] nodes. Every
//! mutation either succeeds and leaves a valid sequence or fails and
//! leaves the sequence untouched.

use nalgebra::{Isometry3, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{RailError, RailResult};

/// Minimum number of nodes a rail can have.
pub const MIN_NODES: usize = 2;

/// Maximum number of nodes a rail mesh can index with `u32` indices.
pub const MAX_NODES: usize = u32::MAX as usize / 3;

/// An ordered sequence of rail nodes in the rail's local space.
///
/// Insertion order defines the polyline: node `i` is connected to node
/// `i + 1`, and cross-sections are laid out in the same order.
///
/// # Example
///
/// ```
/// use mesh_rail::NodeSequence;
/// use nalgebra::{Point3, Vector3};
///
/// let mut nodes = NodeSequence::new();
/// assert_eq!(nodes.len(), 2);
///
/// nodes.append(Vector3::new(1.0, 1.0, 1.0)).unwrap();
/// assert_eq!(nodes.last(), Point3::new(3.0, 3.0, 3.0));
///
/// nodes.remove_last().unwrap();
/// assert!(nodes.remove_last().is_err());
/// assert_eq!(nodes.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Point3<f64>>", into = "Vec<Point3<f64>>"))]
pub struct NodeSequence {
    points: Vec<Point3<f64>>,
}

impl NodeSequence {
    /// Create the default two-node rail: `(1, 1, 1)` to `(2, 2, 2)`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: vec![Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0)],
        }
    }

    /// Create a sequence from existing points.
    ///
    /// # Errors
    ///
    /// Returns [`RailError::InvalidNodeCount`] if fewer than two points are given.
    pub fn try_from_points(points: Vec<Point3<f64>>) -> RailResult<Self> {
        if points.len() < MIN_NODES {
            return Err(RailError::too_few_nodes(points.len()));
        }
        Ok(Self { points })
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the sequence has no nodes. Never true, since a sequence
    /// holds at least [`MIN_NODES`] nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The nodes as a slice, in rail order.
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Get a node by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point3<f64>> {
        self.points.get(index).copied()
    }

    /// The first node.
    #[must_use]
    pub fn first(&self) -> Point3<f64> {
        self.points[0]
    }

    /// The last node.
    #[must_use]
    pub fn last(&self) -> Point3<f64> {
        self.points[self.points.len() - 1]
    }

    /// Iterate over the nodes.
    pub fn iter(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.points.iter()
    }

    /// Append a node at `last + offset`.
    ///
    /// # Errors
    ///
    /// Returns [`RailError::InvalidAppendOffset`] if the offset is zero or
    /// non-finite, since that would stack the new node onto the last one.
    pub fn append(&mut self, offset: Vector3<f64>) -> RailResult<Point3<f64>> {
        validate_offset(&offset)?;
        let node = self.last() + offset;
        self.points.push(node);
        Ok(node)
    }

    /// Push a node without an offset, used to undo [`remove_last`](Self::remove_last).
    pub(crate) fn push(&mut self, node: Point3<f64>) {
        self.points.push(node);
    }

    /// Drop nodes past `len`, used to undo [`append`](Self::append).
    pub(crate) fn truncate(&mut self, len: usize) {
        self.points.truncate(len.max(MIN_NODES));
    }

    /// Put a node back at a known-valid index, used to undo [`move_node`](Self::move_node).
    pub(crate) fn restore(&mut self, index: usize, position: Point3<f64>) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = position;
        }
    }

    /// Remove the last node, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`RailError::InvalidNodeCount`] if the rail would drop below
    /// two nodes. The sequence is left unchanged.
    pub fn remove_last(&mut self) -> RailResult<Point3<f64>> {
        if self.points.len() <= MIN_NODES {
            return Err(RailError::too_few_nodes(self.points.len() - 1));
        }
        self.points.pop().ok_or(RailError::too_few_nodes(0))
    }

    /// Move a node to a new position, returning its previous position.
    ///
    /// # Errors
    ///
    /// Returns [`RailError::IndexOutOfRange`] if `index` does not address a node.
    pub fn move_node(&mut self, index: usize, position: Point3<f64>) -> RailResult<Point3<f64>> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(RailError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, position))
    }

    /// Consecutive node pairs, one per rail segment.
    pub fn segments(&self) -> impl Iterator<Item = (Point3<f64>, Point3<f64>)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Consecutive node pairs mapped through a host-provided point transform.
    ///
    /// Used to draw the rail polyline in whatever space the host renders in.
    pub fn segments_mapped<F>(&self, transform: F) -> Vec<(Point3<f64>, Point3<f64>)>
    where
        F: Fn(&Point3<f64>) -> Point3<f64>,
    {
        let mapped: Vec<Point3<f64>> = self.points.iter().map(transform).collect();
        mapped.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Consecutive node pairs transformed from local into world space.
    #[must_use]
    pub fn transformed_segments(
        &self,
        local_to_world: &Isometry3<f64>,
    ) -> Vec<(Point3<f64>, Point3<f64>)> {
        self.segments_mapped(|p| local_to_world.transform_point(p))
    }
}

impl Default for NodeSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Point3<f64>>> for NodeSequence {
    type Error = RailError;

    fn try_from(points: Vec<Point3<f64>>) -> RailResult<Self> {
        Self::try_from_points(points)
    }
}

impl From<NodeSequence> for Vec<Point3<f64>> {
    fn from(nodes: NodeSequence) -> Self {
        nodes.points
    }
}

impl AsRef<[Point3<f64>]> for NodeSequence {
    fn as_ref(&self) -> &[Point3<f64>] {
        &self.points
    }
}

pub(crate) fn validate_offset(offset: &Vector3<f64>) -> RailResult<()> {
    let finite = offset.iter().all(|c| c.is_finite());
    if !finite || offset.norm_squared() == 0.0 {
        return Err(RailError::InvalidAppendOffset);
    }
    Ok(())
}
