//! Collision tube meshes for rails.
//!
//! A rail is an ordered polyline of nodes. This crate places a small
//! triangular cross-section at every node, turned to face along the rail,
//! and stitches consecutive cross-sections into a closed triangle mesh
//! suitable as a simplified collision surface.
//!
//! # Features
//!
//! - **Node editing**: append, remove-last and move commands that keep at least two nodes
//! - **Full rebuilds**: every edit rebuilds the mesh from scratch, deterministically
//! - **Explicit degeneracy handling**: coincident nodes are rejected or resolved by policy
//! - **End caps**: one triangle closing each end, so the tube is watertight
//!
//! # Quick Start
//!
//! ```
//! use mesh_rail::RailMeshBuilder;
//! use nalgebra::Point3;
//!
//! let nodes = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//!
//! let mesh = RailMeshBuilder::default().build(&nodes).unwrap();
//! assert_eq!(mesh.vertex_count(), 6);
//! assert_eq!(mesh.face_count(), 8);
//! ```
//!
//! # Editing
//!
//! ```
//! use mesh_rail::{RailConfig, RailEditor};
//! use nalgebra::Point3;
//!
//! let mut editor = RailEditor::new(RailConfig::default()).unwrap();
//!
//! // New nodes land at the last node plus (1, 1, 1)
//! editor.append().unwrap();
//! assert_eq!(editor.nodes().last(), Point3::new(3.0, 3.0, 3.0));
//!
//! // Moves that collapse a segment are rejected and rolled back
//! assert!(editor.move_node(2, Point3::new(2.0, 2.0, 2.0)).is_err());
//! assert_eq!(editor.mesh().vertex_count(), 9);
//! ```
//!
//! # Coordinate System
//!
//! Node positions are in the rail's local space. Cross-sections are
//! oriented with global `+Y` as up. Faces are counter-clockwise when
//! viewed from outside the tube.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod assemble;
mod builder;
mod config;
mod editor;
mod error;
mod mesh;
mod nodes;
mod orientation;
mod section;

pub use assemble::{FACES_PER_SEGMENT, assemble, face_count_for, vertex_count_for};
pub use builder::RailMeshBuilder;
pub use config::RailConfig;
pub use editor::RailEditor;
pub use error::{RailError, RailResult};
pub use mesh::RailMesh;
pub use nodes::{MAX_NODES, MIN_NODES, NodeSequence};
pub use orientation::{DegeneratePolicy, Frame, orientation, orientations};
pub use section::{PROFILE, cross_section};
