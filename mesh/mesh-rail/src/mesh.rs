//! The rail collision mesh.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle mesh built from a rail.
///
/// Three vertices per node, concatenated in node order, and triangles as
/// indices into the vertex array.
///
/// # Winding Order
///
/// Faces are **counter-clockwise (CCW) when viewed from outside** the
/// tube, so the mesh has positive signed volume.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RailMesh {
    /// Vertex positions in rail-local space.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into `vertices`.
    pub faces: Vec<[u32; 3]>,
}

impl RailMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create an empty mesh with room for `vertex_count` vertices and `face_count` faces.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no vertices or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Resolve a face to its three vertex positions.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<[Point3<f64>; 3]> {
        let face = self.faces.get(face_index)?;
        Some([
            *self.vertices.get(face[0] as usize)?,
            *self.vertices.get(face[1] as usize)?,
            *self.vertices.get(face[2] as usize)?,
        ])
    }

    /// The index buffer flattened to `[a0, b0, c0, a1, b1, c1, ...]`.
    #[must_use]
    pub fn indices(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }

    /// Flat position and index arrays for collision consumers.
    ///
    /// Positions are `[x0, y0, z0, x1, ...]`.
    #[must_use]
    pub fn to_raw(&self) -> (Vec<f64>, Vec<u32>) {
        let positions = self
            .vertices
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect();
        (positions, self.indices())
    }

    /// Vertex positions narrowed to single precision.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: collision backends store f32 and rail coordinates are small
    pub fn positions_f32(&self) -> Vec<[f32; 3]> {
        self.vertices
            .iter()
            .map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect()
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Sum of signed tetrahedra formed by each face and the origin. A
    /// closed mesh with outward CCW winding gives a positive value.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;

        for &[i0, i1, i2] in &self.faces {
            let v0 = &self.vertices[i0 as usize];
            let v1 = &self.vertices[i1 as usize];
            let v2 = &self.vertices[i2 as usize];

            volume += v0.coords.dot(&v1.coords.cross(&v2.coords));
        }

        volume / 6.0
    }

    /// Check if the mesh appears to be inside-out.
    #[inline]
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        (0..self.faces.len())
            .filter_map(|i| self.triangle(i))
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// Unnormalized face normal (right-hand rule), or `None` for a bad index.
    #[must_use]
    pub fn face_normal(&self, face_index: usize) -> Option<Vector3<f64>> {
        self.triangle(face_index)
            .map(|[a, b, c]| (b - a).cross(&(c - a)))
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), p| (min.inf(p), max.sup(p))),
        )
    }
}
