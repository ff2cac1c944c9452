//! The triangular rail cross-section.

use nalgebra::Point3;

use crate::orientation::Frame;

/// The fixed cross-section profile in profile space.
///
/// A flat-topped triangle 0.2 wide and 0.1 tall, lying in the XY plane
/// and centered on the rail line.
pub const PROFILE: [Point3<f64>; 3] = [
    Point3::new(-0.1, 0.05, 0.0),
    Point3::new(0.1, 0.05, 0.0),
    Point3::new(0.0, -0.05, 0.0),
];

/// Place the profile at `node`, rotated into `frame`.
///
/// # Example
///
/// ```
/// use mesh_rail::{cross_section, Frame};
/// use nalgebra::Point3;
///
/// let section = cross_section(&Point3::new(0.0, 0.0, 5.0), &Frame::identity());
/// assert_eq!(section[2], Point3::new(0.0, -0.05, 5.0));
/// ```
#[must_use]
pub fn cross_section(node: &Point3<f64>, frame: &Frame) -> [Point3<f64>; 3] {
    PROFILE.map(|p| node + frame.to_rail(&p.coords))
}
