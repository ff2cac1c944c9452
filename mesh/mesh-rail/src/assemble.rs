//! Stitching cross-sections into a closed tube.
//!
//! Every node contributes three vertices. Adjacent cross-sections are
//! joined by three quads (top, right, left), each split into two
//! triangles, and both ends are closed by a single cap triangle.

use nalgebra::Point3;

use crate::error::{RailError, RailResult};
use crate::mesh::RailMesh;
use crate::nodes::MAX_NODES;
use crate::orientation::{DegeneratePolicy, Frame, orientations};
use crate::section::cross_section;

/// Triangles emitted per rail segment.
pub const FACES_PER_SEGMENT: usize = 6;

/// Number of vertices a rail of `node_count` nodes produces.
#[must_use]
pub const fn vertex_count_for(node_count: usize) -> usize {
    3 * node_count
}

/// Number of triangles a rail of `node_count` nodes produces, caps included.
#[must_use]
pub const fn face_count_for(node_count: usize) -> usize {
    FACES_PER_SEGMENT * node_count.saturating_sub(1) + 2
}

/// Build the tube mesh for a rail.
///
/// # Arguments
///
/// * `nodes` - Rail nodes in order
/// * `policy` - How coincident adjacent nodes are handled
///
/// # Returns
///
/// A closed mesh with `3 * n` vertices and `6 * (n - 1) + 2` faces.
///
/// # Errors
///
/// Returns an error if:
/// - Fewer than 2 nodes are provided
/// - A node has a non-finite coordinate
/// - Two adjacent nodes coincide and `policy` is [`DegeneratePolicy::Reject`]
/// - Two adjacent nodes are too far apart for their difference to be finite
/// - More than [`MAX_NODES`](crate::MAX_NODES) nodes are provided
///
/// # Example
///
/// ```
/// use mesh_rail::{assemble, DegeneratePolicy};
/// use nalgebra::Point3;
///
/// let nodes = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
/// ];
///
/// let mesh = assemble(&nodes, DegeneratePolicy::Reject).unwrap();
/// assert_eq!(mesh.vertex_count(), 6);
/// assert_eq!(mesh.face_count(), 8);
/// ```
pub fn assemble(nodes: &[Point3<f64>], policy: DegeneratePolicy) -> RailResult<RailMesh> {
    check_index_range(nodes.len())?;
    let directions = orientations(nodes, policy)?;

    let n = nodes.len();
    let mut mesh = RailMesh::with_capacity(vertex_count_for(n), face_count_for(n));

    for (index, (node, direction)) in nodes.iter().zip(directions).enumerate() {
        // Blended directions are never zero once every segment is valid.
        let frame = Frame::look_along(direction).ok_or(RailError::DegenerateSegment {
            index: index.min(n - 2),
        })?;
        mesh.vertices.extend(cross_section(node, &frame));
    }

    add_cap(&mut mesh, 0, true);
    for segment in 0..n - 1 {
        add_segment(&mut mesh, segment);
    }
    add_cap(&mut mesh, n - 1, false);

    Ok(mesh)
}

fn check_index_range(node_count: usize) -> RailResult<()> {
    if node_count > MAX_NODES {
        return Err(RailError::TooManyNodes {
            max: MAX_NODES,
            actual: node_count,
        });
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
// Fits: `check_index_range` caps nodes so every ring index is below u32::MAX
const fn ring_start(node: usize) -> u32 {
    (3 * node) as u32
}

/// Add the six side triangles joining cross-section `segment` to the next one.
fn add_segment(mesh: &mut RailMesh, segment: usize) {
    let b = ring_start(segment);

    // Top
    mesh.faces.push([b + 3, b + 1, b]);
    mesh.faces.push([b + 4, b + 1, b + 3]);

    // Right
    mesh.faces.push([b + 4, b + 5, b + 1]);
    mesh.faces.push([b + 1, b + 5, b + 2]);

    // Left
    mesh.faces.push([b + 3, b, b + 5]);
    mesh.faces.push([b + 5, b, b + 2]);
}

/// Add an end cap over the cross-section of `node`.
fn add_cap(mesh: &mut RailMesh, node: usize, is_start: bool) {
    let b = ring_start(node);

    if is_start {
        // Faces back along the rail
        mesh.faces.push([b, b + 1, b + 2]);
    } else {
        mesh.faces.push([b + 2, b + 1, b]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn straight_line() -> Vec<Point3<f64>> {
        vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0)]
    }

    fn bent() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.5, 3.0),
            Point3::new(3.0, 0.5, 3.0),
        ]
    }

    #[test]
    fn counts() {
        assert_eq!(vertex_count_for(2), 6);
        assert_eq!(face_count_for(2), 8);
        assert_eq!(face_count_for(3), 14);
    }

    #[test]
    fn straight_segment_layout() {
        let mesh = assemble(&straight_line(), DegeneratePolicy::Reject).unwrap();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.face_count(), 8);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
        assert_eq!(
            &mesh.faces[1..7],
            &[[3, 1, 0], [4, 1, 3], [4, 5, 1], [1, 5, 2], [3, 0, 5], [5, 0, 2]]
        );
        assert_eq!(mesh.faces[7], [5, 4, 3]);
    }

    #[test]
    fn straight_segment_vertices() {
        let mesh = assemble(&straight_line(), DegeneratePolicy::Reject).unwrap();

        assert_relative_eq!(mesh.vertices[0], Point3::new(-0.1, 0.05, 0.0), epsilon = 1e-15);
        assert_relative_eq!(mesh.vertices[1], Point3::new(0.1, 0.05, 0.0), epsilon = 1e-15);
        assert_relative_eq!(mesh.vertices[2], Point3::new(0.0, -0.05, 0.0), epsilon = 1e-15);
        assert_relative_eq!(mesh.vertices[5], Point3::new(0.0, -0.05, 1.0), epsilon = 1e-15);
    }

    #[test]
    fn caps_face_outward() {
        let mesh = assemble(&straight_line(), DegeneratePolicy::Reject).unwrap();

        let start = mesh.face_normal(0).unwrap();
        let end = mesh.face_normal(mesh.face_count() - 1).unwrap();
        assert!(start.dot(&Vector3::z()) < 0.0);
        assert!(end.dot(&Vector3::z()) > 0.0);
    }

    #[test]
    fn closed_tube_has_prism_volume() {
        // triangle area 0.01, length 1
        let mesh = assemble(&straight_line(), DegeneratePolicy::Reject).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn bent_rail_is_not_inside_out() {
        let mesh = assemble(&bent(), DegeneratePolicy::Reject).unwrap();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.face_count(), face_count_for(4));
        assert!(!mesh.is_inside_out());
    }

    #[test]
    fn side_faces_point_away_from_rail() {
        let nodes = bent();
        let mesh = assemble(&nodes, DegeneratePolicy::Reject).unwrap();

        for face in 1..mesh.face_count() - 1 {
            let [a, b, c] = mesh.triangle(face).unwrap();
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            let segment = (face - 1) / FACES_PER_SEGMENT;
            let axis = nodes[segment + 1] - nodes[segment];
            let t = ((centroid - nodes[segment]).dot(&axis) / axis.norm_squared()).clamp(0.0, 1.0);
            let on_axis = nodes[segment] + axis * t;
            let normal = mesh.face_normal(face).unwrap();
            assert!(
                normal.dot(&(centroid - on_axis)) > 0.0,
                "face {face} points inward"
            );
        }
    }

    #[test]
    fn all_indices_in_range() {
        let mesh = assemble(&bent(), DegeneratePolicy::Reject).unwrap();
        let max = mesh.vertex_count() as u32;
        assert!(mesh.indices().iter().all(|&i| i < max));
    }

    #[test]
    fn index_range_is_capped() {
        assert_eq!(check_index_range(MAX_NODES), Ok(()));
        assert_eq!(
            check_index_range(MAX_NODES + 1),
            Err(RailError::TooManyNodes {
                max: MAX_NODES,
                actual: MAX_NODES + 1,
            })
        );
        // last vertex of the largest rail still fits
        assert!(vertex_count_for(MAX_NODES) - 1 <= u32::MAX as usize);
    }

    #[test]
    fn huge_coordinates_keep_full_sections() {
        let nodes = vec![Point3::origin(), Point3::new(0.0, 0.0, 1e200)];
        let mesh = assemble(&nodes, DegeneratePolicy::Reject).unwrap();

        assert_relative_eq!(mesh.vertices[0], Point3::new(-0.1, 0.05, 0.0), epsilon = 1e-15);
        assert_relative_eq!(mesh.vertices[1], Point3::new(0.1, 0.05, 0.0), epsilon = 1e-15);
        assert_relative_eq!(mesh.vertices[2], Point3::new(0.0, -0.05, 0.0), epsilon = 1e-15);
        assert_eq!(mesh.vertices[4], Point3::new(0.1, 0.05, 1e200));
    }

    #[test]
    fn overflowing_segment_rejected() {
        let nodes = vec![Point3::new(0.0, -1e308, 0.0), Point3::new(0.0, 1e308, 0.0)];
        for policy in [DegeneratePolicy::Reject, DegeneratePolicy::ReusePrevious] {
            assert_eq!(
                assemble(&nodes, policy).unwrap_err(),
                RailError::SegmentOverflow { index: 0 }
            );
        }
    }

    #[test]
    fn too_few_nodes() {
        let err = assemble(&[Point3::origin()], DegeneratePolicy::Reject).unwrap_err();
        assert_eq!(err, RailError::InvalidNodeCount { min: 2, actual: 1 });

        let err = assemble(&[], DegeneratePolicy::ReusePrevious).unwrap_err();
        assert_eq!(err, RailError::InvalidNodeCount { min: 2, actual: 0 });
    }

    #[test]
    fn coincident_nodes_rejected() {
        let nodes = vec![Point3::origin(), Point3::origin()];
        let err = assemble(&nodes, DegeneratePolicy::Reject).unwrap_err();
        assert_eq!(err, RailError::DegenerateSegment { index: 0 });
    }

    #[test]
    fn coincident_nodes_reuse_direction() {
        let nodes = vec![
            Point3::origin(),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let mesh = assemble(&nodes, DegeneratePolicy::ReusePrevious).unwrap();
        assert_eq!(mesh.vertex_count(), 9);
        assert!(mesh.vertices.iter().all(|v| v.iter().all(|c| c.is_finite())));
    }
}
