//! Scan file I/O.
//!
//! Loads body and garment scans from raw bytes plus a format hint, the way
//! an upload handler receives them, and saves meshes back to disk:
//!
//! - **STL** - Binary and ASCII; triangle soup is welded on load
//! - **PLY** - ASCII and binary, with optional per-vertex normals
//! - **OBJ** - ASCII, with optional `vn` normals
//!
//! Every loaded mesh is validated: it must have at least one face, finite
//! coordinates, and every face index must reference an existing vertex.
//!
//! # Example
//!
//! ```
//! use scan_io::{load, IoError};
//!
//! let stl = b"solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid t\n";
//! let mesh = load(stl, "scan.STL").unwrap();
//! assert_eq!(mesh.faces.len(), 1);
//!
//! assert!(matches!(load(stl, "scan.fbx"), Err(IoError::UnsupportedFormat { .. })));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod obj;
mod ply;
mod stl;

pub use error::{IoError, IoResult};
pub use obj::{parse_obj, write_obj};
pub use ply::{parse_ply, write_ply};
pub use stl::{parse_stl, write_stl};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use scan_types::ScanMesh;
use tracing::debug;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// STL, binary or ASCII.
    Stl,
    /// Wavefront OBJ.
    Obj,
    /// Polygon File Format, binary or ASCII.
    Ply,
}

impl MeshFormat {
    /// Detect the format from a filename or bare extension.
    ///
    /// Accepts `"scan.ply"`, `"PLY"`, `".ply"` or a full path. Matching is
    /// case-insensitive.
    ///
    /// ```
    /// use scan_io::MeshFormat;
    ///
    /// assert_eq!(MeshFormat::from_hint("body.STL"), Some(MeshFormat::Stl));
    /// assert_eq!(MeshFormat::from_hint(".obj"), Some(MeshFormat::Obj));
    /// assert_eq!(MeshFormat::from_hint("ply"), Some(MeshFormat::Ply));
    /// assert_eq!(MeshFormat::from_hint("body"), None);
    /// ```
    #[must_use]
    pub fn from_hint(hint: &str) -> Option<Self> {
        let hint = hint.trim();
        let ext = hint.rsplit_once('.').map_or(hint, |(_, ext)| ext);
        match ext.to_ascii_lowercase().as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            "ply" => Some(Self::Ply),
            _ => None,
        }
    }

    /// Detect the format from a path's extension.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        Self::from_hint(ext)
    }

    /// Canonical file extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
            Self::Ply => "ply",
        }
    }
}

/// Load a mesh from bytes, choosing the parser from `format_hint`.
///
/// # Errors
///
/// - [`IoError::UnsupportedFormat`] if the hint names no supported format
/// - [`IoError::CorruptMesh`] if parsing or validation fails
pub fn load(bytes: &[u8], format_hint: &str) -> IoResult<ScanMesh> {
    let format = MeshFormat::from_hint(format_hint).ok_or_else(|| IoError::unsupported(format_hint))?;
    parse(bytes, format)
}

/// Parse bytes in a known format and validate the result.
///
/// # Errors
///
/// Returns [`IoError::CorruptMesh`] if parsing or validation fails.
pub fn parse(bytes: &[u8], format: MeshFormat) -> IoResult<ScanMesh> {
    let mesh = match format {
        MeshFormat::Stl => parse_stl(bytes)?,
        MeshFormat::Obj => parse_obj(bytes)?,
        MeshFormat::Ply => parse_ply(bytes)?,
    };
    validate(&mesh)?;
    debug!(
        format = format.extension(),
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Loaded mesh"
    );
    Ok(mesh)
}

/// Check the structural invariants every loaded mesh must satisfy.
///
/// # Errors
///
/// Returns [`IoError::CorruptMesh`] describing the first violation.
pub fn validate(mesh: &ScanMesh) -> IoResult<()> {
    if mesh.faces.is_empty() {
        return Err(IoError::corrupt("mesh has no faces"));
    }
    if let Some(face) = mesh.first_invalid_face() {
        return Err(IoError::corrupt(format!(
            "face {face} references a vertex outside 0..{}",
            mesh.vertices.len()
        )));
    }
    if let Some(i) = mesh
        .vertices
        .iter()
        .position(|v| !v.position.coords.iter().all(|c| c.is_finite()))
    {
        return Err(IoError::corrupt(format!("vertex {i} has a non-finite coordinate")));
    }
    Ok(())
}

/// Serialize a mesh into bytes (binary STL/PLY, ASCII OBJ).
///
/// # Errors
///
/// Returns an error if writing into the buffer fails.
pub fn encode(mesh: &ScanMesh, format: MeshFormat) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        MeshFormat::Stl => write_stl(mesh, &mut buf, true)?,
        MeshFormat::Obj => write_obj(mesh, &mut buf)?,
        MeshFormat::Ply => write_ply(mesh, &mut buf, true)?,
    }
    Ok(buf)
}

/// Load a mesh from a file, detecting format from the extension.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, of an unsupported
/// format, or corrupt.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<ScanMesh> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path)
        .ok_or_else(|| IoError::unsupported(path.to_string_lossy()))?;
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    parse(&bytes, format)
}

/// Save a mesh to a file, detecting format from the extension.
///
/// STL and PLY are written in binary.
///
/// # Errors
///
/// Returns an error if the extension is unsupported or the file cannot be
/// written.
pub fn save_mesh<P: AsRef<Path>>(mesh: &ScanMesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path)
        .ok_or_else(|| IoError::unsupported(path.to_string_lossy()))?;
    let writer = BufWriter::new(File::create(path)?);
    match format {
        MeshFormat::Stl => write_stl(mesh, writer, true),
        MeshFormat::Obj => write_obj(mesh, writer),
        MeshFormat::Ply => write_ply(mesh, writer, true),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use scan_types::{revolve, MeshTopology, ProfileRing, Vertex};

    fn tube() -> ScanMesh {
        let rings: Vec<_> = (0..6)
            .map(|i| ProfileRing::circle(f64::from(i) * 20.0, 50.0))
            .collect();
        revolve(&rings, 16, true)
    }

    #[test]
    fn hint_variants() {
        assert_eq!(MeshFormat::from_hint("scan.PLY"), Some(MeshFormat::Ply));
        assert_eq!(MeshFormat::from_hint("/tmp/a.b/scan.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_hint(" stl "), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_hint(""), None);
        assert_eq!(MeshFormat::from_hint("scan.3mf"), None);
    }

    #[test]
    fn unknown_hint_is_unsupported() {
        let err = load(b"whatever", "scan.fbx").unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat { ref hint } if hint == "scan.fbx"));
        assert!(err.is_format_error());
    }

    #[test]
    fn out_of_range_face_is_corrupt() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        let err = load(obj.as_bytes(), "obj").unwrap_err();
        assert!(matches!(err, IoError::CorruptMesh { .. }));
        assert!(err.to_string().contains("face 0"));
    }

    #[test]
    fn faceless_mesh_is_corrupt() {
        let obj = "v 0 0 0\nv 1 0 0\n";
        assert!(matches!(
            load(obj.as_bytes(), "obj"),
            Err(IoError::CorruptMesh { .. })
        ));
    }

    #[test]
    fn non_finite_vertex_is_corrupt() {
        let mut mesh = tube();
        mesh.vertices[0] = Vertex::from_coords(f64::NAN, 0.0, 0.0);
        assert!(validate(&mesh).is_err());
    }

    #[test]
    fn encode_then_load_every_format() {
        let mesh = tube();
        for format in [MeshFormat::Stl, MeshFormat::Obj, MeshFormat::Ply] {
            let bytes = encode(&mesh, format).unwrap();
            let loaded = load(&bytes, format.extension()).unwrap();
            assert_eq!(loaded.face_count(), mesh.face_count(), "{format:?}");
            assert_eq!(loaded.vertex_count(), mesh.vertex_count(), "{format:?}");
        }
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.ply");
        let mesh = tube();
        save_mesh(&mesh, &path).unwrap();
        let loaded = load_mesh(&path).unwrap();
        assert_eq!(loaded.faces, mesh.faces);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_mesh("definitely_missing_scan_01.stl").unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
