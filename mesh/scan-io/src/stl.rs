//! STL (Stereolithography) support.
//!
//! STL is triangle soup: every facet carries its own three corners. Scans
//! need connectivity, so identical corner positions are merged into one
//! indexed vertex on load.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//! endsolid name
//! ```

use std::io::Write;

use hashbrown::HashMap;
use scan_types::{Point3, ScanMesh, Vector3, Vertex};

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Parse STL bytes, detecting ASCII vs binary.
///
/// # Errors
///
/// Returns [`IoError::CorruptMesh`] if the bytes are truncated or contain
/// malformed facets.
pub fn parse_stl(bytes: &[u8]) -> IoResult<ScanMesh> {
    if bytes.len() < 6 {
        return Err(IoError::corrupt("too small to be an STL file"));
    }

    let soup = if is_binary(bytes) {
        read_binary(bytes)?
    } else {
        read_ascii(bytes)?
    };
    Ok(weld_soup(&soup))
}

/// Binary if the declared facet count matches the byte length exactly, or
/// if the header does not start with `solid`.
fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() >= HEADER_SIZE + 4 {
        let count = facet_count(bytes);
        if HEADER_SIZE + 4 + count * TRIANGLE_SIZE == bytes.len() {
            return true;
        }
        if bytes[..HEADER_SIZE].contains(&0) {
            return true;
        }
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(HEADER_SIZE)]);
    !head.trim_start().starts_with("solid")
}

fn facet_count(bytes: &[u8]) -> usize {
    let raw = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]);
    raw as usize
}

fn read_binary(bytes: &[u8]) -> IoResult<Vec<[Point3<f64>; 3]>> {
    if bytes.len() < HEADER_SIZE + 4 {
        return Err(IoError::corrupt(format!(
            "binary STL header needs {} bytes, got {}",
            HEADER_SIZE + 4,
            bytes.len()
        )));
    }

    let count = facet_count(bytes);
    let body = &bytes[HEADER_SIZE + 4..];
    if body.len() < count * TRIANGLE_SIZE {
        return Err(IoError::corrupt(format!(
            "binary STL declares {count} facets but holds only {}",
            body.len() / TRIANGLE_SIZE
        )));
    }

    Ok(body
        .chunks_exact(TRIANGLE_SIZE)
        .take(count)
        .map(|facet| {
            // Skip the stored normal (12 bytes)
            [
                read_point(&facet[12..24]),
                read_point(&facet[24..36]),
                read_point(&facet[36..48]),
            ]
        })
        .collect())
}

/// Read a point from 12 bytes (3 little-endian f32s).
fn read_point(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

fn read_ascii(bytes: &[u8]) -> IoResult<Vec<[Point3<f64>; 3]>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IoError::corrupt(format!("ASCII STL is not valid UTF-8: {e}")))?;

    let mut soup = Vec::new();
    let mut corners: Vec<Point3<f64>> = Vec::with_capacity(3);
    let mut in_loop = false;

    for (line_no, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" if in_loop => {
                if parts.len() < 4 {
                    return Err(IoError::corrupt(format!(
                        "line {}: vertex needs three coordinates",
                        line_no + 1
                    )));
                }
                let mut coords = [0.0; 3];
                for (slot, token) in coords.iter_mut().zip(&parts[1..4]) {
                    *slot = token.parse().map_err(|_| {
                        IoError::corrupt(format!("line {}: bad coordinate {token:?}", line_no + 1))
                    })?;
                }
                corners.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                if corners.len() != 3 {
                    return Err(IoError::corrupt(format!(
                        "line {}: facet has {} vertices",
                        line_no + 1,
                        corners.len()
                    )));
                }
                soup.push([corners[0], corners[1], corners[2]]);
                corners.clear();
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(soup)
}

/// Merge bit-identical corner positions into shared vertices.
#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
fn weld_soup(soup: &[[Point3<f64>; 3]]) -> ScanMesh {
    let mut mesh = ScanMesh::with_capacity(soup.len() / 2 + 3, soup.len());
    let mut index: HashMap<[u64; 3], u32> = HashMap::with_capacity(soup.len());

    for facet in soup {
        let mut face = [0u32; 3];
        for (slot, p) in face.iter_mut().zip(facet) {
            let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
            *slot = *index.entry(key).or_insert_with(|| {
                mesh.vertices.push(Vertex::new(*p));
                (mesh.vertices.len() - 1) as u32
            });
        }
        mesh.faces.push(face);
    }

    mesh
}

/// Write a mesh as STL.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_stl<W: Write>(mesh: &ScanMesh, mut writer: W, binary: bool) -> IoResult<()> {
    if binary {
        let mut header = [b' '; HEADER_SIZE];
        let text = b"Binary STL written by scan-io";
        header[..text.len()].copy_from_slice(text);
        writer.write_all(&header)?;

        #[allow(clippy::cast_possible_truncation)]
        // Face count: mesh faces limited to u32 range
        let face_count = mesh.faces.len() as u32;
        writer.write_all(&face_count.to_le_bytes())?;

        for (normal, corners) in facets(mesh) {
            write_f32_triplet(&mut writer, normal)?;
            for corner in corners {
                write_f32_triplet(&mut writer, corner)?;
            }
            writer.write_all(&0u16.to_le_bytes())?;
        }
    } else {
        writeln!(writer, "solid scan")?;
        for (n, corners) in facets(mesh) {
            writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n[0], n[1], n[2])?;
            writeln!(writer, "    outer loop")?;
            for c in corners {
                writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", c[0], c[1], c[2])?;
            }
            writeln!(writer, "    endloop")?;
            writeln!(writer, "  endfacet")?;
        }
        writeln!(writer, "endsolid scan")?;
    }
    Ok(())
}

fn facets(mesh: &ScanMesh) -> impl Iterator<Item = ([f64; 3], [[f64; 3]; 3])> + '_ {
    mesh.faces.iter().map(|&[i0, i1, i2]| {
        let p = |i: u32| mesh.vertices[i as usize].position;
        let (v0, v1, v2) = (p(i0), p(i1), p(i2));
        let n = (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        (
            [n.x, n.y, n.z],
            [
                [v0.x, v0.y, v0.z],
                [v1.x, v1.y, v1.z],
                [v2.x, v2.y, v2.z],
            ],
        )
    })
}

/// Write 3 values as little-endian f32s.
#[allow(clippy::cast_possible_truncation)]
// Truncation: STL stores f32
fn write_f32_triplet<W: Write>(writer: &mut W, v: [f64; 3]) -> IoResult<()> {
    for c in v {
        writer.write_all(&(c as f32).to_le_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::unnecessary_raw_string_hashes
)]
mod tests {
    use super::*;
    use scan_types::MeshTopology;

    const TWO_FACETS: &[u8] = br#"solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 1 0 0
      vertex 1 1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test"#;

    #[test]
    fn ascii_facets_share_vertices() {
        let mesh = parse_stl(TWO_FACETS).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces[1], [1, 3, 2]);
    }

    #[test]
    fn binary_roundtrip_keeps_topology() {
        let mesh = parse_stl(TWO_FACETS).unwrap();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf, true).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE + 4 + 2 * TRIANGLE_SIZE);

        let loaded = parse_stl(&buf).unwrap();
        assert_eq!(loaded.face_count(), 2);
        assert_eq!(loaded.vertex_count(), 4);
    }

    #[test]
    fn binary_header_starting_with_solid_is_still_binary() {
        let mesh = parse_stl(TWO_FACETS).unwrap();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf, true).unwrap();
        buf[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&buf).unwrap().face_count(), 2);
    }

    #[test]
    fn truncated_binary_is_corrupt() {
        let mesh = parse_stl(TWO_FACETS).unwrap();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf, true).unwrap();
        buf.truncate(buf.len() - 10);
        buf[0] = b'x';
        assert!(matches!(parse_stl(&buf), Err(IoError::CorruptMesh { .. })));
    }

    #[test]
    fn bad_coordinate_is_corrupt() {
        let text = b"solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 zero\n";
        let err = parse_stl(text).unwrap_err();
        assert!(err.to_string().contains("bad coordinate"));
    }

    #[test]
    fn ascii_roundtrip_is_close() {
        let mesh = parse_stl(TWO_FACETS).unwrap();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf, false).unwrap();
        let loaded = parse_stl(&buf).unwrap();
        assert_eq!(loaded.vertex_count(), 4);
        let v = loaded.vertices[3].position;
        assert!((v.x - 1.0).abs() < 1e-5);
        assert!((v.y - 1.0).abs() < 1e-5);
    }
}
