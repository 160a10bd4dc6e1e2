//! Core mesh types for body and garment scans.
//!
//! This crate provides the foundational types shared by every stage of the
//! fit pipeline:
//!
//! - [`Vertex`] - A point in 3D space with an optional normal
//! - [`ScanMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`revolve`] - Surface-of-revolution builder used for synthetic scans
//!
//! # Units
//!
//! Coordinates are `f64`. Everything downstream of alignment assumes
//! millimeters.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** once a scan has been oriented:
//! - X: width (left/right)
//! - Y: depth (back/front, front is +Y)
//! - Z: height (floor to head)
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//!
//! # Example
//!
//! ```
//! use scan_types::{Vertex, ScanMesh, Point3, MeshTopology};
//!
//! let mut mesh = ScanMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod fixtures;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use fixtures::{revolve, ProfileRing};
pub use mesh::ScanMesh;
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Point2, Point3, Vector2, Vector3};
