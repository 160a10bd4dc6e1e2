//! PLY (Polygon File Format) support.
//!
//! Most structured-light and photogrammetry scanners export PLY. ASCII,
//! binary little-endian and binary big-endian files are read through
//! `ply-rs`.
//!
//! # Supported Properties
//!
//! - Vertex positions (`x`, `y`, `z`) - required
//! - Vertex normals (`nx`, `ny`, `nz`) - optional
//! - Face vertex indices (`vertex_indices` or `vertex_index`); polygons are
//!   fan-triangulated

use std::io::Write;

use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use scan_types::{Point3, ScanMesh, Vector3, Vertex};

use crate::error::{IoError, IoResult};

/// Parse PLY bytes.
///
/// # Errors
///
/// Returns [`IoError::CorruptMesh`] if the header or payload cannot be
/// parsed, or if a vertex lacks a position.
pub fn parse_ply(bytes: &[u8]) -> IoResult<ScanMesh> {
    let mut reader = bytes;
    let parser = Parser::<DefaultElement>::new();

    let header = parser
        .read_header(&mut reader)
        .map_err(|e| IoError::corrupt(format!("failed to parse PLY header: {e}")))?;
    let payload = parser
        .read_payload(&mut reader, &header)
        .map_err(|e| IoError::corrupt(format!("failed to read PLY payload: {e}")))?;

    let mut mesh = ScanMesh::new();

    if let Some(vertex_elements) = payload.get("vertex") {
        mesh.vertices.reserve(vertex_elements.len());
        for (i, element) in vertex_elements.iter().enumerate() {
            let coord = |key: &str| {
                get_float_property(element, key)
                    .ok_or_else(|| IoError::corrupt(format!("vertex {i} has no {key} property")))
            };
            let position = Point3::new(coord("x")?, coord("y")?, coord("z")?);

            let normal = match (
                get_float_property(element, "nx"),
                get_float_property(element, "ny"),
                get_float_property(element, "nz"),
            ) {
                (Some(nx), Some(ny), Some(nz)) => Some(Vector3::new(nx, ny, nz)),
                _ => None,
            };
            mesh.vertices.push(Vertex { position, normal });
        }
    }

    if let Some(face_elements) = payload.get("face") {
        mesh.faces.reserve(face_elements.len());
        for element in face_elements {
            let indices = get_index_list(element);
            if indices.len() >= 3 {
                for i in 1..indices.len() - 1 {
                    mesh.faces.push([indices[0], indices[i], indices[i + 1]]);
                }
            }
        }
    }

    Ok(mesh)
}

/// Extract a float property from a PLY element.
fn get_float_property(element: &DefaultElement, key: &str) -> Option<f64> {
    match element.get(key)? {
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(f64::from(*v)),
        Property::Short(v) => Some(f64::from(*v)),
        _ => None,
    }
}

/// Extract the vertex index list from a face element.
///
/// Negative indices map to `u32::MAX` so index validation rejects them.
fn get_index_list(element: &DefaultElement) -> Vec<u32> {
    let to_u32 = |i: i64| u32::try_from(i).unwrap_or(u32::MAX);
    for key in &["vertex_indices", "vertex_index"] {
        if let Some(prop) = element.get(*key) {
            return match prop {
                Property::ListInt(v) => v.iter().map(|&i| to_u32(i64::from(i))).collect(),
                Property::ListUInt(v) => v.clone(),
                Property::ListUChar(v) => v.iter().map(|&i| u32::from(i)).collect(),
                Property::ListChar(v) => v.iter().map(|&i| to_u32(i64::from(i))).collect(),
                Property::ListShort(v) => v.iter().map(|&i| to_u32(i64::from(i))).collect(),
                Property::ListUShort(v) => v.iter().map(|&i| u32::from(i)).collect(),
                _ => continue,
            };
        }
    }
    Vec::new()
}

/// Write a mesh as PLY.
///
/// Normals are written only when every vertex has one.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_ply<W: Write>(mesh: &ScanMesh, mut writer: W, binary: bool) -> IoResult<()> {
    let with_normals = !mesh.vertices.is_empty() && mesh.vertices.iter().all(|v| v.normal.is_some());

    writeln!(writer, "ply")?;
    if binary {
        writeln!(writer, "format binary_little_endian 1.0")?;
    } else {
        writeln!(writer, "format ascii 1.0")?;
    }
    writeln!(writer, "comment written by scan-io")?;
    writeln!(writer, "element vertex {}", mesh.vertices.len())?;
    for axis in ["x", "y", "z"] {
        writeln!(writer, "property float {axis}")?;
    }
    if with_normals {
        for axis in ["nx", "ny", "nz"] {
            writeln!(writer, "property float {axis}")?;
        }
    }
    writeln!(writer, "element face {}", mesh.faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &mesh.vertices {
        let mut values = vec![v.position.x, v.position.y, v.position.z];
        if with_normals {
            let n = v.normal.unwrap_or_else(Vector3::zeros);
            values.extend([n.x, n.y, n.z]);
        }
        write_vertex_row(&mut writer, &values, binary)?;
    }

    for &[i0, i1, i2] in &mesh.faces {
        if binary {
            writer.write_all(&[3u8])?;
            for i in [i0, i1, i2] {
                #[allow(clippy::cast_possible_wrap)]
                // Wrap: indices above i32::MAX are not representable in this header
                writer.write_all(&(i as i32).to_le_bytes())?;
            }
        } else {
            writeln!(writer, "3 {i0} {i1} {i2}")?;
        }
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: PLY properties are declared as float
fn write_vertex_row<W: Write>(writer: &mut W, values: &[f64], binary: bool) -> IoResult<()> {
    if binary {
        for &v in values {
            writer.write_all(&(v as f32).to_le_bytes())?;
        }
    } else {
        let row: Vec<String> = values.iter().map(|v| format!("{}", *v as f32)).collect();
        writeln!(writer, "{}", row.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use scan_types::MeshTopology;

    const QUAD: &str = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
property float nx
property float ny
property float nz
element face 1
property list uchar int vertex_indices
end_header
0 0 0 0 0 1
1 0 0 0 0 1
1 1 0 0 0 1
0 1 0 0 0 1
4 0 1 2 3
";

    fn quad_mesh() -> ScanMesh {
        parse_ply(QUAD.as_bytes()).unwrap()
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let mesh = quad_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn normals_are_kept() {
        let mesh = quad_mesh();
        assert!(mesh.vertices.iter().all(|v| v.normal == Some(Vector3::z())));
    }

    #[test]
    fn binary_roundtrip() {
        let mesh = quad_mesh();
        let mut buf = Vec::new();
        write_ply(&mesh, &mut buf, true).unwrap();
        let loaded = parse_ply(&buf).unwrap();
        assert_eq!(loaded.faces, mesh.faces);
        assert_eq!(loaded.vertices[2].position, Point3::new(1.0, 1.0, 0.0));
        assert!(loaded.vertices[0].normal.is_some());
    }

    #[test]
    fn ascii_roundtrip() {
        let mesh = quad_mesh();
        let mut buf = Vec::new();
        write_ply(&mesh, &mut buf, false).unwrap();
        let loaded = parse_ply(&buf).unwrap();
        assert_eq!(loaded.face_count(), 2);
        assert_eq!(loaded.vertices[3].position, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn garbage_is_corrupt() {
        let err = parse_ply(b"not a ply file at all").unwrap_err();
        assert!(matches!(err, IoError::CorruptMesh { .. }));
    }
}
