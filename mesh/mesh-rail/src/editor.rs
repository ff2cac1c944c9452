//! Command API for editing a rail.
//!
//! A [`RailEditor`] pairs a [`NodeSequence`] with the mesh built from it.
//! Each command mutates the nodes and rebuilds the mesh before returning.
//! If the rebuild fails the mutation is undone, so the nodes and the mesh
//! always agree.

use nalgebra::{Isometry3, Point3};
use tracing::debug;

use crate::builder::RailMeshBuilder;
use crate::config::RailConfig;
use crate::error::RailResult;
use crate::mesh::RailMesh;
use crate::nodes::NodeSequence;

/// An editable rail and its current collision mesh.
///
/// # Example
///
/// ```
/// use mesh_rail::{RailConfig, RailEditor};
/// use nalgebra::Point3;
///
/// let mut editor = RailEditor::new(RailConfig::default()).unwrap();
/// assert_eq!(editor.mesh().vertex_count(), 6);
///
/// let mesh = editor.append().unwrap();
/// assert_eq!(mesh.vertex_count(), 9);
///
/// editor.move_node(0, Point3::new(0.0, 0.0, 0.0)).unwrap();
/// editor.remove_last().unwrap();
/// assert!(editor.remove_last().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RailEditor {
    nodes: NodeSequence,
    builder: RailMeshBuilder,
    mesh: RailMesh,
}

impl RailEditor {
    /// Create an editor over the default two-node rail.
    ///
    /// # Errors
    ///
    /// Returns [`RailError::InvalidAppendOffset`](crate::RailError::InvalidAppendOffset)
    /// if the configuration is invalid.
    pub fn new(config: RailConfig) -> RailResult<Self> {
        Self::from_nodes(NodeSequence::new(), config)
    }

    /// Create an editor over an existing node sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the initial
    /// mesh cannot be built.
    pub fn from_nodes(nodes: NodeSequence, config: RailConfig) -> RailResult<Self> {
        config.validate()?;
        let builder = RailMeshBuilder::new(config);
        let mesh = builder.build(nodes.points())?;
        Ok(Self {
            nodes,
            builder,
            mesh,
        })
    }

    /// The current nodes.
    #[must_use]
    pub const fn nodes(&self) -> &NodeSequence {
        &self.nodes
    }

    /// The mesh built from the current nodes.
    #[must_use]
    pub const fn mesh(&self) -> &RailMesh {
        &self.mesh
    }

    /// The editor's configuration.
    #[must_use]
    pub const fn config(&self) -> &RailConfig {
        self.builder.config()
    }

    /// Clone the current mesh for handing to a collision consumer.
    #[must_use]
    pub fn to_mesh(&self) -> RailMesh {
        self.mesh.clone()
    }

    /// Append a node at the last node plus the configured offset and rebuild.
    ///
    /// # Errors
    ///
    /// Returns an error if the rebuild fails; the node is not added.
    pub fn append(&mut self) -> RailResult<&RailMesh> {
        let offset = self.builder.config().append_offset;
        let len = self.nodes.len();
        self.nodes.append(offset)?;

        if let Err(err) = self.rebuild() {
            debug!(error = %err, "Rolling back rail append");
            self.nodes.truncate(len);
            return Err(err);
        }
        Ok(&self.mesh)
    }

    /// Remove the last node and rebuild.
    ///
    /// # Errors
    ///
    /// Returns [`RailError::InvalidNodeCount`](crate::RailError::InvalidNodeCount)
    /// if the rail has only two nodes; nothing is rebuilt.
    pub fn remove_last(&mut self) -> RailResult<&RailMesh> {
        let removed = self.nodes.remove_last()?;

        if let Err(err) = self.rebuild() {
            debug!(error = %err, "Rolling back rail node removal");
            self.nodes.push(removed);
            return Err(err);
        }
        Ok(&self.mesh)
    }

    /// Move node `index` to `position` and rebuild.
    ///
    /// # Errors
    ///
    /// Returns [`RailError::IndexOutOfRange`](crate::RailError::IndexOutOfRange)
    /// for a bad index, or the rebuild error (for example a degenerate
    /// segment); the node keeps its previous position.
    pub fn move_node(&mut self, index: usize, position: Point3<f64>) -> RailResult<&RailMesh> {
        let previous = self.nodes.move_node(index, position)?;

        if let Err(err) = self.rebuild() {
            debug!(error = %err, index, "Rolling back rail node move");
            self.nodes.restore(index, previous);
            return Err(err);
        }
        Ok(&self.mesh)
    }

    /// The rail polyline in world space, for drawing node connections.
    #[must_use]
    pub fn segments_in(&self, local_to_world: &Isometry3<f64>) -> Vec<(Point3<f64>, Point3<f64>)> {
        self.nodes.transformed_segments(local_to_world)
    }

    fn rebuild(&mut self) -> RailResult<()> {
        self.mesh = self.builder.build(self.nodes.points())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RailError;
    use crate::orientation::DegeneratePolicy;
    use nalgebra::Vector3;

    #[test]
    fn new_editor_builds_default_rail() {
        let editor = RailEditor::new(RailConfig::default()).unwrap();
        assert_eq!(editor.nodes(), &NodeSequence::new());
        assert_eq!(editor.mesh().vertex_count(), 6);
        assert_eq!(editor.mesh().face_count(), 8);
    }

    #[test]
    fn new_editor_rejects_bad_config() {
        let config = RailConfig::default().with_append_offset(Vector3::zeros());
        assert_eq!(
            RailEditor::new(config).unwrap_err(),
            RailError::InvalidAppendOffset
        );
    }

    #[test]
    fn append_and_remove_rebuild() {
        let mut editor = RailEditor::new(RailConfig::default()).unwrap();

        assert_eq!(editor.append().unwrap().vertex_count(), 9);
        assert_eq!(editor.nodes().last(), Point3::new(3.0, 3.0, 3.0));

        assert_eq!(editor.remove_last().unwrap().vertex_count(), 6);
        assert_eq!(editor.nodes().len(), 2);
    }

    #[test]
    fn remove_last_on_two_nodes_is_rejected() {
        let mut editor = RailEditor::new(RailConfig::default()).unwrap();
        let before = editor.to_mesh();

        let err = editor.remove_last().unwrap_err();
        assert!(err.is_invalid_node_count());
        assert_eq!(editor.nodes().len(), 2);
        assert_eq!(editor.mesh(), &before);
    }

    #[test]
    fn failed_move_rolls_back() {
        let mut editor = RailEditor::new(RailConfig::default()).unwrap();
        let before = editor.to_mesh();

        let err = editor.move_node(1, Point3::new(1.0, 1.0, 1.0)).unwrap_err();
        assert_eq!(err, RailError::DegenerateSegment { index: 0 });
        assert_eq!(editor.nodes().get(1), Some(Point3::new(2.0, 2.0, 2.0)));
        assert_eq!(editor.mesh(), &before);
    }

    #[test]
    fn failed_append_rolls_back() {
        // Too small to move the new node off the last one
        let config = RailConfig::default().with_append_offset(Vector3::new(1e-20, 0.0, 0.0));
        let mut editor = RailEditor::new(config).unwrap();
        let before = editor.to_mesh();

        let err = editor.append().unwrap_err();
        assert_eq!(err, RailError::DegenerateSegment { index: 1 });
        assert_eq!(editor.nodes(), &NodeSequence::new());
        assert_eq!(editor.mesh(), &before);
    }

    #[test]
    fn move_out_of_range() {
        let mut editor = RailEditor::new(RailConfig::default()).unwrap();
        assert_eq!(
            editor.move_node(7, Point3::origin()).unwrap_err(),
            RailError::IndexOutOfRange { index: 7, len: 2 }
        );
    }

    #[test]
    fn move_rebuilds_mesh() {
        let mut editor = RailEditor::new(RailConfig::default()).unwrap();
        let before = editor.to_mesh();

        let mesh = editor.move_node(1, Point3::new(1.0, 1.0, 4.0)).unwrap().clone();
        assert_ne!(mesh, before);
        assert_eq!(&mesh, editor.mesh());
    }

    #[test]
    fn lenient_policy_allows_coincident_move() {
        let config = RailConfig::default().with_degenerate_policy(DegeneratePolicy::ReusePrevious);
        let mut editor = RailEditor::new(config).unwrap();
        editor.append().unwrap();

        let mesh = editor.move_node(2, Point3::new(2.0, 2.0, 2.0)).unwrap();
        assert_eq!(mesh.vertex_count(), 9);
        assert!(mesh.vertices.iter().all(|v| v.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn segments_in_world_space() {
        let mut editor = RailEditor::new(RailConfig::default()).unwrap();
        editor.append().unwrap();

        let world = Isometry3::translation(0.0, -1.0, 0.0);
        let segments = editor.segments_in(&world);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].1, Point3::new(3.0, 2.0, 3.0));
    }
}
