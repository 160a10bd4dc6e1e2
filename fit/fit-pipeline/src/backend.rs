//! Mesh processing backends.
//!
//! A backend loads scans and, if it can, cleans, orients and aligns them.
//! Processing steps a backend does not provide return `None` and the
//! pipeline records them as skipped.

use scan_io::IoResult;
use scan_orient::{AlignReport, OrientParams, OrientReport};
use scan_repair::{CleanOptions, CleanReport};
use scan_types::ScanMesh;

use crate::capability::{Capabilities, Feature};

/// Loading and preprocessing of raw scans.
///
/// Only [`name`](Self::name) is required. The provided methods load with
/// [`scan_io::load`] and skip every processing step, which is what a
/// reduced-mode backend wants.
pub trait MeshBackend {
    /// Short identifier for logs and reports.
    fn name(&self) -> &'static str;

    /// Features this backend can serve.
    fn capabilities(&self) -> Capabilities {
        Capabilities::full().without(Feature::MeshProcessing)
    }

    /// Parse scan bytes; `hint` is a filename or bare extension.
    ///
    /// # Errors
    ///
    /// See [`scan_io::load`].
    fn load(&self, bytes: &[u8], hint: &str) -> IoResult<ScanMesh> {
        scan_io::load(bytes, hint)
    }

    /// Repair a scan in place.
    fn clean(&self, _mesh: &mut ScanMesh, _options: &CleanOptions) -> Option<CleanReport> {
        None
    }

    /// Put a body scan upright, centered at the origin.
    fn orient_body(&self, _mesh: &mut ScanMesh, _params: &OrientParams) -> Option<OrientReport> {
        None
    }

    /// Center a garment scan and align its long axis with Z.
    fn orient_garment(&self, _mesh: &mut ScanMesh, _hint: Option<&str>) -> Option<OrientReport> {
        None
    }

    /// Bring both scans to millimeters and overlay the garment on the body.
    fn align(&self, _body: &mut ScanMesh, _garment: &mut ScanMesh) -> Option<AlignReport> {
        None
    }
}

/// The in-crate implementation of every processing step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl MeshBackend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::full()
    }

    fn clean(&self, mesh: &mut ScanMesh, options: &CleanOptions) -> Option<CleanReport> {
        Some(scan_repair::clean(mesh, options))
    }

    fn orient_body(&self, mesh: &mut ScanMesh, params: &OrientParams) -> Option<OrientReport> {
        Some(scan_orient::orient_body_with(mesh, params))
    }

    fn orient_garment(&self, mesh: &mut ScanMesh, hint: Option<&str>) -> Option<OrientReport> {
        Some(scan_orient::orient_garment(mesh, hint))
    }

    fn align(&self, body: &mut ScanMesh, garment: &mut ScanMesh) -> Option<AlignReport> {
        Some(scan_orient::align(body, garment))
    }
}

/// Loads scans as they are. For scans that were cleaned and oriented
/// elsewhere, or when only the analysis stages are wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughBackend;

impl MeshBackend for PassthroughBackend {
    fn name(&self) -> &'static str {
        "passthrough"
    }
}
