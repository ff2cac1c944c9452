//! Per-node orientation along a rail.
//!
//! Each node gets a forward direction from its neighbours, and that
//! direction is turned into an orthonormal look frame against the global
//! up axis (`+Y`).

use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{RailError, RailResult};
use crate::nodes::MIN_NODES;

/// How zero-length segments (coincident adjacent nodes) are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DegeneratePolicy {
    /// Fail with [`RailError::DegenerateSegment`].
    #[default]
    Reject,
    /// Reuse the direction of the previous valid segment.
    ///
    /// Leading degenerate segments take the first valid direction. A rail
    /// whose segments are all degenerate is still rejected.
    ReusePrevious,
}

/// An orthonormal frame at a rail node.
///
/// `forward` follows the rail, `up` is as close to global `+Y` as the
/// forward direction allows, and `right = up × forward`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Local X axis mapped into rail space.
    pub right: Vector3<f64>,
    /// Local Y axis mapped into rail space.
    pub up: Vector3<f64>,
    /// Local Z axis mapped into rail space (along the rail).
    pub forward: Vector3<f64>,
}

impl Frame {
    /// The frame of a rail running along `+Z`.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            right: Vector3::x(),
            up: Vector3::y(),
            forward: Vector3::z(),
        }
    }

    /// Build a look frame facing `direction` with global `+Y` as up.
    ///
    /// When `direction` is parallel to `±Y` there is no unique right axis;
    /// `+X` is used, so the frame is the identity pitched about X.
    ///
    /// Returns `None` for a zero-length or non-finite direction.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_rail::Frame;
    /// use nalgebra::Vector3;
    ///
    /// let frame = Frame::look_along(Vector3::new(0.0, 0.0, 2.0)).unwrap();
    /// assert_eq!(frame, Frame::identity());
    /// ```
    #[must_use]
    pub fn look_along(direction: Vector3<f64>) -> Option<Self> {
        let forward = normalized(&direction)?;
        let right = normalized(&Vector3::y().cross(&forward)).unwrap_or(Vector3::x());
        let up = forward.cross(&right);

        Some(Self { right, up, forward })
    }

    /// Map a vector from profile space into rail space.
    #[must_use]
    pub fn to_rail(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.right * local.x + self.up * local.y + self.forward * local.z
    }

    /// The frame as a rotation matrix (columns: right, up, forward).
    #[must_use]
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[
            self.right,
            self.up,
            self.forward,
        ]))
    }
}

/// Compute the forward direction at node `index`.
///
/// - first node: `nodes[1] - nodes[0]`
/// - last node: `nodes[i] - nodes[i - 1]`
/// - otherwise: `normalize(nodes[i + 1] - nodes[i]) + normalize(nodes[i] - nodes[i - 1]) / 2`
///
/// The result is not renormalized. The middle-node blend weights the
/// outgoing segment fully and the incoming one by half.
///
/// # Errors
///
/// - [`RailError::InvalidNodeCount`] for fewer than two nodes
/// - [`RailError::IndexOutOfRange`] if `index` is not a node
/// - [`RailError::NonFiniteNode`] if a node has a NaN or infinite coordinate
/// - [`RailError::DegenerateSegment`] if a segment the direction depends on has zero length
/// - [`RailError::SegmentOverflow`] if a segment is too long to represent
///
/// # Example
///
/// ```
/// use mesh_rail::orientation;
/// use nalgebra::{Point3, Vector3};
///
/// let nodes = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(0.0, 0.0, 2.0),
/// ];
/// assert_eq!(orientation(&nodes, 1).unwrap(), Vector3::new(0.0, 0.0, 1.5));
/// ```
pub fn orientation(nodes: &[Point3<f64>], index: usize) -> RailResult<Vector3<f64>> {
    check_nodes(nodes)?;
    if index >= nodes.len() {
        return Err(RailError::IndexOutOfRange {
            index,
            len: nodes.len(),
        });
    }

    direction_at(index, nodes.len(), |segment| {
        let dir = nodes[segment + 1] - nodes[segment];
        if !is_finite(&dir) {
            Err(RailError::SegmentOverflow { index: segment })
        } else if is_degenerate(&dir) {
            Err(RailError::DegenerateSegment { index: segment })
        } else {
            Ok(dir)
        }
    })
}

/// Compute the forward direction of every node in one pass.
///
/// # Errors
///
/// Same as [`orientation`], with zero-length segments resolved by `policy`.
pub fn orientations(
    nodes: &[Point3<f64>],
    policy: DegeneratePolicy,
) -> RailResult<Vec<Vector3<f64>>> {
    check_nodes(nodes)?;
    let segments = segment_directions(nodes, policy)?;

    (0..nodes.len())
        .map(|index| direction_at(index, nodes.len(), |segment| Ok(segments[segment])))
        .collect()
}

/// Raw segment vectors with degenerate ones resolved by `policy`.
fn segment_directions(
    nodes: &[Point3<f64>],
    policy: DegeneratePolicy,
) -> RailResult<Vec<Vector3<f64>>> {
    let raw: Vec<Vector3<f64>> = nodes.windows(2).map(|w| w[1] - w[0]).collect();
    if let Some(index) = raw.iter().position(|d| !is_finite(d)) {
        return Err(RailError::SegmentOverflow { index });
    }

    match policy {
        DegeneratePolicy::Reject => {
            if let Some(index) = raw.iter().position(is_degenerate) {
                return Err(RailError::DegenerateSegment { index });
            }
            Ok(raw)
        }
        DegeneratePolicy::ReusePrevious => {
            let Some(first_valid) = raw.iter().position(|d| !is_degenerate(d)) else {
                return Err(RailError::DegenerateSegment { index: 0 });
            };

            let mut previous = raw[first_valid];
            let mut resolved = Vec::with_capacity(raw.len());
            for (index, dir) in raw.into_iter().enumerate() {
                if is_degenerate(&dir) {
                    warn!(segment = index, "degenerate rail segment, reusing adjacent direction");
                    resolved.push(previous);
                } else {
                    previous = dir;
                    resolved.push(dir);
                }
            }
            Ok(resolved)
        }
    }
}

fn direction_at<F>(index: usize, len: usize, segment: F) -> RailResult<Vector3<f64>>
where
    F: Fn(usize) -> RailResult<Vector3<f64>>,
{
    if index == 0 {
        segment(0)
    } else if index == len - 1 {
        segment(index - 1)
    } else {
        let next = unit(segment(index)?, index)?;
        let prev = unit(segment(index - 1)?, index - 1)?;
        Ok(next + prev / 2.0)
    }
}

fn unit(dir: Vector3<f64>, segment: usize) -> RailResult<Vector3<f64>> {
    normalized(&dir).ok_or(RailError::DegenerateSegment { index: segment })
}

/// Unit vector along `dir`, or `None` if it is non-finite or no longer
/// than `f64::EPSILON`.
///
/// The vector is divided by its largest component before taking the norm,
/// so finite vectors of any magnitude normalize without overflow.
fn normalized(dir: &Vector3<f64>) -> Option<Vector3<f64>> {
    if !is_finite(dir) {
        return None;
    }
    let scale = dir.amax();
    if scale < f64::MIN_POSITIVE {
        return None;
    }
    let scaled = dir / scale;
    let norm = scaled.norm();
    if norm * scale <= f64::EPSILON {
        return None;
    }
    Some(scaled / norm)
}

fn is_degenerate(dir: &Vector3<f64>) -> bool {
    normalized(dir).is_none()
}

fn is_finite(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}

fn check_nodes(nodes: &[Point3<f64>]) -> RailResult<()> {
    if nodes.len() < MIN_NODES {
        return Err(RailError::too_few_nodes(nodes.len()));
    }
    if let Some(index) = nodes
        .iter()
        .position(|p| !p.coords.iter().all(|c| c.is_finite()))
    {
        return Err(RailError::NonFiniteNode { index });
    }
    Ok(())
}
