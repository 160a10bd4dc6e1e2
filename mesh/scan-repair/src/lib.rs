//! Topology cleanup for raw scans.
//!
//! Raw body and garment scans arrive with noise islands, small holes and
//! high-frequency surface jitter. This crate provides:
//!
//! - [`MeshAdjacency`] - edge/vertex to face lookups
//! - [`keep_largest_component`] - drop floating fragments
//! - [`fill_holes`] - close small boundary loops by ear clipping
//! - [`smooth_laplacian`] - boundary-preserving smoothing
//! - [`clean`] - the three steps in order, with a report
//!
//! None of these operations fail; degenerate input passes through with a
//! report that says nothing was done.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
mod clean;
mod components;
mod holes;
mod smooth;

pub use adjacency::{normalize_edge, vertex_neighbors, MeshAdjacency};
pub use clean::{clean, CleanOptions, CleanReport};
pub use components::{find_components, keep_largest_component, remove_unreferenced_vertices, UnionFind};
pub use holes::{detect_holes, fill_hole_ear_clipping, fill_holes, BoundaryLoop};
pub use smooth::smooth_laplacian;
