//! One-step scan cleanup.

use scan_types::ScanMesh;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::components::keep_largest_component;
use crate::holes::fill_holes;
use crate::smooth::smooth_laplacian;

/// Parameters for the cleanup pipeline.
///
/// # Example
///
/// ```
/// use scan_repair::CleanOptions;
///
/// let options = CleanOptions::default()
///     .with_smoothing_iterations(4)
///     .with_fill_holes(false);
/// assert_eq!(options.max_hole_edges, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CleanOptions {
    /// Keep only the largest connected component. Default: true.
    pub keep_largest_component: bool,

    /// Fill small holes. Default: true.
    pub fill_holes: bool,

    /// Maximum number of edges for a hole to be filled. Default: 100.
    pub max_hole_edges: usize,

    /// Apply Laplacian smoothing. Default: true.
    pub smooth: bool,

    /// Smoothing iterations. Default: 2.
    pub smoothing_iterations: u32,

    /// Smoothing strength per iteration (0.0-1.0). Default: 0.5.
    pub smoothing_lambda: f64,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            keep_largest_component: true,
            fill_holes: true,
            max_hole_edges: 100,
            smooth: true,
            smoothing_iterations: 2,
            smoothing_lambda: 0.5,
        }
    }
}

impl CleanOptions {
    /// Options that change nothing; useful for already-clean synthetic meshes.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            keep_largest_component: false,
            fill_holes: false,
            max_hole_edges: 0,
            smooth: false,
            smoothing_iterations: 0,
            smoothing_lambda: 0.0,
        }
    }

    /// Sets whether to keep only the largest component.
    #[must_use]
    pub const fn with_keep_largest_component(mut self, enabled: bool) -> Self {
        self.keep_largest_component = enabled;
        self
    }

    /// Sets whether to fill holes.
    #[must_use]
    pub const fn with_fill_holes(mut self, enabled: bool) -> Self {
        self.fill_holes = enabled;
        self
    }

    /// Sets the maximum hole size to fill.
    #[must_use]
    pub const fn with_max_hole_edges(mut self, max: usize) -> Self {
        self.max_hole_edges = max;
        self
    }

    /// Sets whether to smooth.
    #[must_use]
    pub const fn with_smooth(mut self, enabled: bool) -> Self {
        self.smooth = enabled;
        self
    }

    /// Sets the number of smoothing iterations.
    #[must_use]
    pub const fn with_smoothing_iterations(mut self, iterations: u32) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    /// Sets the smoothing strength.
    #[must_use]
    pub const fn with_smoothing_lambda(mut self, lambda: f64) -> Self {
        self.smoothing_lambda = lambda;
        self
    }
}

/// What [`clean`] did to a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CleanReport {
    /// Vertex count before cleaning.
    pub original_vertices: usize,
    /// Face count before cleaning.
    pub original_faces: usize,
    /// Vertex count after cleaning.
    pub final_vertices: usize,
    /// Face count after cleaning.
    pub final_faces: usize,
    /// Connected components found (0 if the step was skipped).
    pub components_found: usize,
    /// Holes filled.
    pub holes_filled: usize,
    /// Openings too large to fill.
    pub holes_skipped: usize,
    /// Smoothing iterations applied.
    pub smoothing_iterations: u32,
    /// Human-readable processing log.
    pub log: Vec<String>,
}

impl CleanReport {
    /// Components discarded by the largest-component step.
    #[must_use]
    pub const fn components_removed(&self) -> usize {
        self.components_found.saturating_sub(1)
    }
}

impl std::fmt::Display for CleanReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scan cleanup: {} → {} vertices, {} → {} faces",
            self.original_vertices, self.final_vertices, self.original_faces, self.final_faces
        )?;
        if self.components_removed() > 0 {
            write!(f, ", {} components removed", self.components_removed())?;
        }
        if self.holes_filled > 0 {
            write!(f, ", {} holes filled", self.holes_filled)?;
        }
        if self.smoothing_iterations > 0 {
            write!(f, ", {} smoothing iterations", self.smoothing_iterations)?;
        }
        Ok(())
    }
}

/// Clean a scan in place.
///
/// Steps, each toggled by `options`:
/// 1. Keep the largest connected component
/// 2. Fill holes up to `max_hole_edges`
/// 3. Laplacian smoothing with pinned boundaries
///
/// Never fails: an empty mesh comes back unchanged with an empty log.
///
/// # Example
///
/// ```
/// use scan_repair::{clean, CleanOptions};
/// use scan_types::{revolve, ProfileRing};
///
/// let rings: Vec<_> = (0..4).map(|i| ProfileRing::circle(f64::from(i) * 10.0, 40.0)).collect();
/// let mut mesh = revolve(&rings, 16, false);
/// let report = clean(&mut mesh, &CleanOptions::default());
/// assert_eq!(report.holes_filled, 2);
/// assert!(report.to_string().starts_with("Scan cleanup"));
/// ```
pub fn clean(mesh: &mut ScanMesh, options: &CleanOptions) -> CleanReport {
    let mut report = CleanReport {
        original_vertices: mesh.vertices.len(),
        original_faces: mesh.faces.len(),
        ..CleanReport::default()
    };

    if !mesh.faces.is_empty() {
        if options.keep_largest_component {
            report.components_found = keep_largest_component(mesh);
            report.log.push(format!(
                "Kept largest component of {} components",
                report.components_found
            ));
        }

        if options.fill_holes {
            let (filled, skipped) = fill_holes(mesh, options.max_hole_edges);
            report.holes_filled = filled;
            report.holes_skipped = skipped;
            report.log.push(format!("Filled {filled} holes"));
            if skipped > 0 {
                report.log.push(format!(
                    "Left {skipped} openings larger than {} edges",
                    options.max_hole_edges
                ));
            }
        }

        if options.smooth && options.smoothing_iterations > 0 {
            smooth_laplacian(mesh, options.smoothing_iterations, options.smoothing_lambda);
            report.smoothing_iterations = options.smoothing_iterations;
            report.log.push(format!(
                "Applied Laplacian smoothing ({} iterations)",
                options.smoothing_iterations
            ));
        }
    }

    report.final_vertices = mesh.vertices.len();
    report.final_faces = mesh.faces.len();
    info!("{report}");
    report
}
