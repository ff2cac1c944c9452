//! Full rail mesh rebuilds.

use nalgebra::Point3;
use tracing::debug;

use crate::assemble::assemble;
use crate::config::RailConfig;
use crate::error::RailResult;
use crate::mesh::RailMesh;

/// Builds rail meshes from node sequences.
///
/// The builder holds only configuration. Every call to [`build`](Self::build)
/// is a full rebuild from the given nodes with no state carried between
/// calls, so identical input yields bit-identical output.
///
/// # Example
///
/// ```
/// use mesh_rail::RailMeshBuilder;
/// use nalgebra::Point3;
///
/// let builder = RailMeshBuilder::default();
/// let nodes = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(0.0, 0.0, 2.0),
/// ];
///
/// let mesh = builder.build(&nodes).unwrap();
/// assert_eq!(mesh.vertex_count(), 9);
/// assert_eq!(mesh.indices().len(), 42);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RailMeshBuilder {
    config: RailConfig,
}

impl RailMeshBuilder {
    /// Create a builder with the given configuration.
    #[must_use]
    pub const fn new(config: RailConfig) -> Self {
        Self { config }
    }

    /// The builder's configuration.
    #[must_use]
    pub const fn config(&self) -> &RailConfig {
        &self.config
    }

    /// Build the mesh for `nodes`.
    ///
    /// # Errors
    ///
    /// See [`assemble`](crate::assemble()).
    pub fn build(&self, nodes: &[Point3<f64>]) -> RailResult<RailMesh> {
        let mesh = assemble(nodes, self.config.degenerate_policy)?;

        debug!(
            nodes = nodes.len(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "Rebuilt rail mesh"
        );

        Ok(mesh)
    }
}
